use std::sync::Arc;

use tracing::info;

use crate::error::AppError;
use crate::messages;
use crate::models::{Syllabus, UserRecord};
use crate::services::SyllabusService;
use crate::session::Session;
use crate::store::UserDirectory;

/// Read-mostly operations across every owner, open to admins only.
/// Unlike the per-user listing, a refusal from the store is reported.
#[derive(Clone)]
pub struct AdminService {
    syllabi: SyllabusService,
    directory: Option<Arc<dyn UserDirectory>>,
}

impl AdminService {
    pub fn new(syllabi: SyllabusService, directory: Option<Arc<dyn UserDirectory>>) -> Self {
        Self { syllabi, directory }
    }

    fn directory(&self) -> Result<&Arc<dyn UserDirectory>, AppError> {
        self.directory
            .as_ref()
            .ok_or_else(|| AppError::NotConfigured(messages::ADMIN_NOT_CONFIGURED.to_string()))
    }

    pub async fn list_all_syllabi(&self, session: &Session) -> Result<Vec<Syllabus>, AppError> {
        session.require_admin()?;
        self.directory()?;
        let syllabi = self.syllabi.list_all().await?;
        info!("admin {} listed {} syllabi", session.uid, syllabi.len());
        Ok(syllabi)
    }

    pub async fn list_users(&self, session: &Session) -> Result<Vec<UserRecord>, AppError> {
        session.require_admin()?;
        self.directory()?.list_users().await
    }

    pub async fn reassign_owner(
        &self,
        session: &Session,
        id: &str,
        new_owner_id: &str,
    ) -> Result<Syllabus, AppError> {
        session.require_admin()?;
        self.syllabi.reassign_owner(id, new_owner_id).await
    }
}
