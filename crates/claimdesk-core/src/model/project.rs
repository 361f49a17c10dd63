//! Project entity: the client-owned context a claim is filed against.

use serde::{Deserialize, Serialize};

/// A client project. Soft-deleted only; claims keep referencing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub project_type: String,
    /// Owning client.
    pub client_id: i64,
    pub is_active: bool,
    pub created_at_us: i64,
    pub updated_at_us: i64,
}
