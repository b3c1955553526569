//! Business logic services for PromoHub.
//!
//! The node hierarchy engine lives in [`node`]; [`archive`] packs a subtree
//! into a zip; [`site`] and [`auth_user`] cover the flat collections.

pub mod archive;
pub mod auth_user;
pub mod node;
pub mod site;

pub use archive::{ArchiveExport, ArchiveService};
pub use auth_user::AuthUserService;
pub use node::service::{DuplicatedSubtree, NewFile, NodeService};
pub use node::upload::{UploadFile, UploadService};
pub use site::SiteService;
