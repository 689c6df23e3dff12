use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::editing::drop_stale_validations;
use crate::error::AppError;
use crate::messages;
use crate::models::{LearningUnit, Syllabus, ValidationResult};
use crate::store::{DocumentStore, StoredDocument, SyllabusRecord};

/// Gateway between the editor and the document store.
///
/// Every operation checks that a store is configured and that the
/// identifiers it needs are present before touching the store.
#[derive(Clone)]
pub struct SyllabusService {
    store: Option<Arc<dyn DocumentStore>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    pub syllabus: Syllabus,
    pub warnings: Vec<String>,
}

impl SyllabusService {
    pub fn new(store: Option<Arc<dyn DocumentStore>>) -> Self {
        Self { store }
    }

    fn store(&self) -> Result<&Arc<dyn DocumentStore>, AppError> {
        self.store
            .as_ref()
            .ok_or_else(|| AppError::NotConfigured(messages::STORE_NOT_CONFIGURED.to_string()))
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.store()?.ping().await
    }

    pub async fn create(
        &self,
        owner_id: &str,
        author_name: &str,
        author_email: &str,
    ) -> Result<Syllabus, AppError> {
        let store = self.store()?;
        require(owner_id, messages::NOT_AUTHENTICATED)?;

        let mut syllabus = Syllabus::new_draft(owner_id, author_name, author_email, Utc::now());
        let id = store.add(&SyllabusRecord::from(&syllabus)).await?;
        info!("created syllabus {} for {}", id, owner_id);

        syllabus.id = Some(id);
        Ok(syllabus)
    }

    /// Overwrites the stored document with `syllabus`.
    ///
    /// The stored creation date and owner are authoritative; the update date
    /// always moves forward. Unbalanced evaluation weights are returned as
    /// warnings and do not block the save.
    pub async fn save(&self, syllabus: Syllabus) -> Result<SaveOutcome, AppError> {
        let store = self.store()?;
        let id = match syllabus.id.as_deref() {
            Some(id) if !id.trim().is_empty() && !syllabus.owner_id.trim().is_empty() => id.to_string(),
            _ => return Err(AppError::BadRequest(messages::MISSING_SAVE_IDS.to_string())),
        };
        if let Some(&position) = syllabus.invalid_unit_ranges().first() {
            return Err(AppError::BadRequest(messages::invalid_unit_dates(position)));
        }

        let previous = match store.get(&id).await? {
            Some(record) => Some(record.into_syllabus(id.clone())?),
            None => None,
        };

        let now = Utc::now();
        let syllabus = match &previous {
            Some(prev) => {
                if prev.owner_id != syllabus.owner_id {
                    return Err(AppError::Forbidden(messages::OWNER_CHANGE_REJECTED.to_string()));
                }
                Syllabus {
                    creation_date: prev.creation_date,
                    update_date: next_update_date(prev.update_date, now),
                    ..drop_stale_validations(syllabus, prev)
                }
            }
            None => Syllabus {
                update_date: now,
                ..syllabus
            },
        };

        store.set(&id, &SyllabusRecord::from(&syllabus)).await?;
        info!("saved syllabus {}", id);

        let warnings = syllabus.warnings();
        for warning in &warnings {
            warn!("syllabus {}: {}", id, warning);
        }
        Ok(SaveOutcome { syllabus, warnings })
    }

    /// Syllabi owned by `owner_id`. A store that refuses the query is taken
    /// to mean the user has nothing stored yet.
    pub async fn list(&self, owner_id: &str) -> Result<Vec<Syllabus>, AppError> {
        let store = self.store()?;
        require(owner_id, messages::NOT_AUTHENTICATED)?;

        match store.query_by_owner(owner_id).await {
            Ok(docs) => decode_all(docs),
            Err(AppError::PermissionDenied(detail)) => {
                warn!("listing for {} denied, treating as empty: {}", owner_id, detail);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Syllabus>, AppError> {
        let docs = self.store()?.query_all_newest_first().await?;
        decode_all(docs)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Syllabus>, AppError> {
        let store = self.store()?;
        require(id, messages::MISSING_SYLLABUS_ID)?;

        store
            .get(id)
            .await?
            .map(|record| record.into_syllabus(id.to_string()))
            .transpose()
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let store = self.store()?;
        require(id, messages::MISSING_SYLLABUS_ID)?;

        store.delete(id).await?;
        info!("deleted syllabus {}", id);
        Ok(())
    }

    /// Caches `verdict` on unit `index` of the current stored version.
    ///
    /// The document is read again so edits saved while the verdict was being
    /// produced are kept. When the unit no longer holds `reference` the
    /// verdict is discarded and `None` is returned.
    pub async fn record_validation(
        &self,
        id: &str,
        index: usize,
        reference: &str,
        verdict: ValidationResult,
    ) -> Result<Option<SaveOutcome>, AppError> {
        let current = self.get_by_id(id).await?.ok_or(AppError::NotFound)?;

        let still_current = current
            .learning_units
            .get(index)
            .is_some_and(|unit| unit.apa_reference == reference);
        if !still_current {
            info!("reference of unit {} in {} changed during validation, verdict dropped", index, id);
            return Ok(None);
        }

        let updated = current.with_unit_updated(index, |unit| LearningUnit {
            validation: Some(verdict),
            ..unit
        })?;
        self.save(updated).await.map(Some)
    }

    /// Hands a syllabus over to another owner. This is the only way the owner
    /// of a stored syllabus changes.
    pub async fn reassign_owner(&self, id: &str, new_owner_id: &str) -> Result<Syllabus, AppError> {
        let store = self.store()?;
        require(id, messages::MISSING_SYLLABUS_ID)?;
        require(new_owner_id, messages::MISSING_NEW_OWNER)?;

        let current = store
            .get(id)
            .await?
            .ok_or(AppError::NotFound)?
            .into_syllabus(id.to_string())?;

        let previous_owner = current.owner_id.clone();
        let syllabus = Syllabus {
            owner_id: new_owner_id.to_string(),
            update_date: next_update_date(current.update_date, Utc::now()),
            ..current
        };
        store.set(id, &SyllabusRecord::from(&syllabus)).await?;
        info!("reassigned syllabus {} from {} to {}", id, previous_owner, new_owner_id);
        Ok(syllabus)
    }
}

fn require(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        Err(AppError::BadRequest(message.to_string()))
    } else {
        Ok(())
    }
}

fn decode_all(docs: Vec<StoredDocument>) -> Result<Vec<Syllabus>, AppError> {
    docs.into_iter().map(StoredDocument::into_syllabus).collect()
}

/// `now`, unless the clock has not moved past the stored value.
fn next_update_date(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + TimeDelta::nanoseconds(1)
    }
}
