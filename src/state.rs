use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::db::{SqliteDocumentStore, SqliteUserDirectory};
use crate::error::AppError;
use crate::genai::{GeminiHttpClient, GenerativeModel};
use crate::services::{AdminService, ReferenceValidator, SyllabusService};
use crate::session::AccessPolicy;
use crate::store::{DocumentStore, UserDirectory};

#[derive(Clone)]
pub struct AppState {
    pub syllabi: SyllabusService,
    pub admin: AdminService,
    pub validator: ReferenceValidator,
    pub policy: Arc<AccessPolicy>,
    pub directory: Option<Arc<dyn UserDirectory>>,
}

impl AppState {
    pub fn new(
        store: Option<Arc<dyn DocumentStore>>,
        directory: Option<Arc<dyn UserDirectory>>,
        model: Option<Arc<dyn GenerativeModel>>,
        policy: AccessPolicy,
    ) -> Self {
        let syllabi = SyllabusService::new(store);
        Self {
            admin: AdminService::new(syllabi.clone(), directory.clone()),
            syllabi,
            validator: ReferenceValidator::new(model),
            policy: Arc::new(policy),
            directory,
        }
    }

    /// Wires the SQLite store, the user directory (only when admins are
    /// configured) and the Gemini client from `config`.
    pub fn from_config(config: &AppConfig, db: Option<SqlitePool>) -> Result<Self, AppError> {
        let policy = AccessPolicy::new(&config.admin_emails);

        let store = db
            .clone()
            .map(|pool| Arc::new(SqliteDocumentStore::new(pool)) as Arc<dyn DocumentStore>);
        let directory = db
            .filter(|_| policy.has_admins())
            .map(|pool| Arc::new(SqliteUserDirectory::new(pool)) as Arc<dyn UserDirectory>);
        let model = match &config.genai {
            Some(genai) => Some(Arc::new(GeminiHttpClient::new(genai.clone())?) as Arc<dyn GenerativeModel>),
            None => None,
        };

        Ok(Self::new(store, directory, model, policy))
    }
}
