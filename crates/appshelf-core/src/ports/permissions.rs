//! Host permission port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Permission;

/// Errors from querying or requesting a grant.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// The host could not answer the query.
    #[error("Permission query for {permission} failed: {message}")]
    Query {
        /// The permission asked about.
        permission: Permission,
        /// Host error message.
        message: String,
    },

    /// The host cannot show a request flow for this permission.
    #[error("{0} permission cannot be requested on this host")]
    Unsupported(Permission),
}

/// Queries and requests host grants.
///
/// `is_granted` must be cheap; it is called on every download admission.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait PermissionPort: Send + Sync {
    /// Whether `permission` is currently granted.
    fn is_granted(&self, permission: Permission) -> bool;

    /// Start the host's request flow. Resolves once the host has recorded
    /// the user's choice; callers re-check with [`PermissionPort::is_granted`].
    async fn request(&self, permission: Permission) -> Result<(), PermissionError>;
}
