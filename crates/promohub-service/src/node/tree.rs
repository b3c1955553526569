//! Tree assembly from a flat node list.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use promohub_core::error::AppError;
use promohub_core::result::AppResult;
use promohub_entity::node::{Node, TreeNode};

/// Assemble the forest rooted under `root_parent_id` from a flat node list.
///
/// Runs in linear time: nodes are grouped by parent in one pass, then each
/// group is attached exactly once (groups are removed from the map as they
/// attach). Input order within a sibling group is preserved.
///
/// Nodes whose parent id is absent from the input are dropped. A parent chain
/// that never reaches `root_parent_id` while staying inside the input set can
/// only mean a reference cycle, which is reported as `CycleDetected`.
pub fn build_forest(
    nodes: Vec<Node>,
    root_parent_id: Option<Uuid>,
) -> AppResult<Vec<TreeNode>> {
    let depth_limit = nodes.len();
    let ids: HashSet<Uuid> = nodes.iter().map(|n| n.id).collect();

    let mut groups: HashMap<Option<Uuid>, Vec<Node>> = HashMap::new();
    for node in nodes {
        groups.entry(node.parent_id).or_default().push(node);
    }

    let roots = groups.remove(&root_parent_id).unwrap_or_default();
    let mut forest = Vec::with_capacity(roots.len());
    for root in roots {
        forest.push(attach(root, &mut groups, depth_limit)?);
    }

    let cyclic = groups
        .keys()
        .any(|key| matches!(key, Some(parent) if ids.contains(parent)));
    if cyclic {
        return Err(AppError::cycle_detected(
            "Node parent references form a cycle",
        ));
    }

    Ok(forest)
}

fn attach(
    node: Node,
    groups: &mut HashMap<Option<Uuid>, Vec<Node>>,
    depth_left: usize,
) -> AppResult<TreeNode> {
    if depth_left == 0 {
        return Err(AppError::cycle_detected(
            "Node parent references form a cycle",
        ));
    }

    let child_nodes = groups.remove(&Some(node.id)).unwrap_or_default();
    let mut children = Vec::with_capacity(child_nodes.len());
    for child in child_nodes {
        children.push(attach(child, groups, depth_left - 1)?);
    }

    Ok(TreeNode { node, children })
}
