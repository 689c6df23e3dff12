pub mod dto;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::UserRecord;

pub use dto::{StoredDocument, StoredTimestamp, SyllabusRecord};

/// Document database holding syllabus records. Implementations report access
/// refusals as `AppError::PermissionDenied` so callers can tell them apart
/// from other failures.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new record and returns the id the store generated for it.
    async fn add(&self, data: &SyllabusRecord) -> Result<String, AppError>;
    /// Writes the whole record under `id`, creating it if missing.
    async fn set(&self, id: &str, data: &SyllabusRecord) -> Result<(), AppError>;
    async fn get(&self, id: &str) -> Result<Option<SyllabusRecord>, AppError>;
    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<StoredDocument>, AppError>;
    async fn query_all_newest_first(&self) -> Result<Vec<StoredDocument>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn ping(&self) -> Result<(), AppError>;
}

/// Registered identities, as known to the authentication backend.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn register(&self, user: &UserRecord) -> Result<(), AppError>;
    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError>;
}
