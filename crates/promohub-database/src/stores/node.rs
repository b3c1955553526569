//! PostgreSQL node store implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use promohub_core::error::{AppError, ErrorKind};
use promohub_core::result::AppResult;
use promohub_core::traits::NodeStore;
use promohub_entity::node::{Node, NodeDraft, OrderUpdate};

/// PostgreSQL-backed [`NodeStore`].
///
/// Listing contracts (sibling ordering, recency) are enforced in SQL;
/// batch writes run inside a single transaction.
#[derive(Debug, Clone)]
pub struct PgNodeStore {
    pool: PgPool,
}

impl PgNodeStore {
    /// Create a new Postgres node store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reject drafts whose parent is missing, inactive, or not a directory.
    async fn check_parent(
        tx: &mut Transaction<'_, Postgres>,
        parent_id: Uuid,
    ) -> AppResult<()> {
        let is_directory: Option<bool> = sqlx::query_scalar(
            "SELECT category = 'directory'::node_category FROM nodes \
             WHERE id = $1 AND active = TRUE",
        )
        .bind(parent_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check parent", e))?;

        match is_directory {
            Some(true) => Ok(()),
            Some(false) => Err(AppError::invalid_reference(format!(
                "Parent {parent_id} is not a directory"
            ))),
            None => Err(AppError::invalid_reference(format!(
                "Parent {parent_id} does not exist"
            ))),
        }
    }

    async fn insert_draft(
        tx: &mut Transaction<'_, Postgres>,
        draft: &NodeDraft,
    ) -> AppResult<Node> {
        sqlx::query_as::<_, Node>(
            "INSERT INTO nodes (name, category, parent_id, sort_order, size_bytes, storage_path) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(&draft.name)
        .bind(draft.category)
        .bind(draft.parent_id)
        .bind(draft.sort_order)
        .bind(draft.size_bytes)
        .bind(&draft.storage_path)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("nodes_parent_id_fkey") =>
            {
                AppError::invalid_reference("Parent node does not exist")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create node", e),
        })
    }
}

#[async_trait]
impl NodeStore for PgNodeStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Node>> {
        sqlx::query_as::<_, Node>("SELECT * FROM nodes WHERE id = $1 AND active = TRUE")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find node", e))
    }

    async fn list_active(&self) -> AppResult<Vec<Node>> {
        sqlx::query_as::<_, Node>(
            "SELECT * FROM nodes WHERE active = TRUE ORDER BY sort_order ASC, created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list nodes", e))
    }

    async fn list_by_parent(&self, parent_id: Option<Uuid>) -> AppResult<Vec<Node>> {
        let query = match parent_id {
            Some(parent) => sqlx::query_as::<_, Node>(
                "SELECT * FROM nodes WHERE parent_id = $1 AND active = TRUE \
                 ORDER BY sort_order ASC, created_at ASC",
            )
            .bind(parent),
            None => sqlx::query_as::<_, Node>(
                "SELECT * FROM nodes WHERE parent_id IS NULL AND active = TRUE \
                 ORDER BY sort_order ASC, created_at ASC",
            ),
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    async fn list_recent_files(&self, limit: i64) -> AppResult<Vec<Node>> {
        sqlx::query_as::<_, Node>(
            "SELECT * FROM nodes WHERE active = TRUE AND category = 'file' \
             ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list recent files", e)
        })
    }

    async fn search_by_name(&self, keyword: &str) -> AppResult<Vec<Node>> {
        let pattern = format!("%{}%", escape_like(keyword));
        sqlx::query_as::<_, Node>(
            "SELECT * FROM nodes WHERE active = TRUE AND name ILIKE $1 \
             ORDER BY sort_order ASC, created_at ASC",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search nodes", e))
    }

    async fn create(&self, draft: NodeDraft) -> AppResult<Node> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        if let Some(parent_id) = draft.parent_id {
            Self::check_parent(&mut tx, parent_id).await?;
        }
        let node = Self::insert_draft(&mut tx, &draft).await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;
        Ok(node)
    }

    async fn create_many(&self, drafts: Vec<NodeDraft>) -> AppResult<Vec<Node>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let mut checked: Vec<Uuid> = Vec::new();
        for draft in &drafts {
            if let Some(parent_id) = draft.parent_id {
                if !checked.contains(&parent_id) {
                    Self::check_parent(&mut tx, parent_id).await?;
                    checked.push(parent_id);
                }
            }
        }

        let mut created = Vec::with_capacity(drafts.len());
        for draft in &drafts {
            created.push(Self::insert_draft(&mut tx, draft).await?);
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;
        Ok(created)
    }

    async fn update_name(&self, id: Uuid, name: &str) -> AppResult<Option<Node>> {
        sqlx::query_as::<_, Node>(
            "UPDATE nodes SET name = $2, updated_at = NOW() \
             WHERE id = $1 AND active = TRUE RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename node", e))
    }

    async fn update_order(&self, updates: &[OrderUpdate]) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        for update in updates {
            sqlx::query(
                "UPDATE nodes SET sort_order = $2, updated_at = NOW() \
                 WHERE id = $1 AND active = TRUE",
            )
            .bind(update.id)
            .bind(update.sort_order)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update node order", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE nodes SET active = FALSE, updated_at = NOW() \
             WHERE id = $1 AND active = TRUE",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete node", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE nodes SET active = FALSE, updated_at = NOW() \
             WHERE id = ANY($1) AND active = TRUE",
        )
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete nodes", e))?;
        Ok(result.rows_affected())
    }
}

/// Escape `ILIKE` metacharacters in a user-supplied keyword.
fn escape_like(keyword: &str) -> String {
    keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
