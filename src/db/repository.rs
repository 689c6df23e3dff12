use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::UserRecord;
use crate::store::{DocumentStore, StoredDocument, SyllabusRecord, UserDirectory};

// SQLite primary result codes that mean "not allowed" rather than "broken".
const SQLITE_PERM: i64 = 3;
const SQLITE_READONLY: i64 = 8;
const SQLITE_AUTH: i64 = 23;

/// Translates access refusals into `PermissionDenied`; every other failure
/// stays a database error.
fn classify(err: sqlx::Error) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        let primary = db_err
            .code()
            .and_then(|code| code.parse::<i64>().ok())
            .map(|code| code & 0xff);
        if matches!(primary, Some(SQLITE_PERM | SQLITE_READONLY | SQLITE_AUTH)) {
            return AppError::PermissionDenied(db_err.message().to_string());
        }
    }
    AppError::Database(err)
}

#[derive(FromRow)]
struct DocumentRow {
    id: String,
    document: String,
}

impl DocumentRow {
    fn decode(self) -> Result<StoredDocument, AppError> {
        Ok(StoredDocument {
            id: self.id,
            data: serde_json::from_str(&self.document)?,
        })
    }
}

/// Syllabus records kept as JSON documents in SQLite. The owner and update
/// time are mirrored into columns so listing can filter and sort.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    db: SqlitePool,
}

impl SqliteDocumentStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    async fn write(&self, id: &str, data: &SyllabusRecord) -> Result<(), AppError> {
        let document = serde_json::to_string(data)?;
        sqlx::query(
            "INSERT INTO syllabuses (id, owner_id, document, update_seconds, update_nanos) VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET owner_id = excluded.owner_id, document = excluded.document,
                update_seconds = excluded.update_seconds, update_nanos = excluded.update_nanos"
        )
        .bind(id)
        .bind(&data.owner_id)
        .bind(document)
        .bind(data.update_date.seconds)
        .bind(data.update_date.nanos as i64)
        .execute(&self.db)
        .await
        .map_err(classify)?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn add(&self, data: &SyllabusRecord) -> Result<String, AppError> {
        let id = Uuid::new_v4().simple().to_string();
        self.write(&id, data).await?;
        Ok(id)
    }

    async fn set(&self, id: &str, data: &SyllabusRecord) -> Result<(), AppError> {
        self.write(id, data).await
    }

    async fn get(&self, id: &str) -> Result<Option<SyllabusRecord>, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>("SELECT id, document FROM syllabuses WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(classify)?;

        row.map(|r| r.decode().map(|doc| doc.data)).transpose()
    }

    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<StoredDocument>, AppError> {
        sqlx::query_as::<_, DocumentRow>(
            "SELECT id, document FROM syllabuses WHERE owner_id = ? ORDER BY update_seconds DESC, update_nanos DESC"
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await
        .map_err(classify)?
        .into_iter()
        .map(DocumentRow::decode)
        .collect()
    }

    async fn query_all_newest_first(&self) -> Result<Vec<StoredDocument>, AppError> {
        sqlx::query_as::<_, DocumentRow>(
            "SELECT id, document FROM syllabuses ORDER BY update_seconds DESC, update_nanos DESC"
        )
        .fetch_all(&self.db)
        .await
        .map_err(classify)?
        .into_iter()
        .map(DocumentRow::decode)
        .collect()
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM syllabuses WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("select 1").execute(&self.db).await.map_err(classify)?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct SqliteUserDirectory {
    db: SqlitePool,
}

impl SqliteUserDirectory {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserDirectory for SqliteUserDirectory {
    async fn register(&self, user: &UserRecord) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO users (uid, email, display_name, registered_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(uid) DO UPDATE SET email = excluded.email, display_name = excluded.display_name"
        )
        .bind(&user.uid)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(now)
        .execute(&self.db)
        .await
        .map_err(classify)?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
        sqlx::query_as::<_, UserRecord>(
            "SELECT uid, email, display_name FROM users ORDER BY registered_at ASC, uid ASC"
        )
        .fetch_all(&self.db)
        .await
        .map_err(classify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;
    use crate::models::Syllabus;

    async fn setup_test_db() -> SqlitePool {
        connect_in_memory().await.expect("Failed to create test db")
    }

    fn record(owner: &str, course: &str) -> SyllabusRecord {
        let mut s = Syllabus::new_draft(owner, "Ana", "ana@x.com", Utc::now());
        s.course_name = course.to_string();
        SyllabusRecord::from(&s)
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let store = SqliteDocumentStore::new(setup_test_db().await);
        let data = record("u1", "Cálculo I");

        let id = store.add(&data).await.expect("Failed to add");
        assert!(!id.is_empty());

        let fetched = store.get(&id).await.expect("Failed to get").expect("Missing");
        assert_eq!(fetched, data);
        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites_whole_document() {
        let store = SqliteDocumentStore::new(setup_test_db().await);
        let id = store.add(&record("u1", "Cálculo I")).await.unwrap();

        let replacement = record("u1", "Cálculo II");
        store.set(&id, &replacement).await.unwrap();

        let fetched = store.get(&id).await.unwrap().unwrap();
        assert_eq!(fetched.course_name, "Cálculo II");
    }

    #[tokio::test]
    async fn test_query_by_owner_filters() {
        let store = SqliteDocumentStore::new(setup_test_db().await);
        store.add(&record("u1", "A")).await.unwrap();
        store.add(&record("u2", "B")).await.unwrap();
        store.add(&record("u1", "C")).await.unwrap();

        let mine = store.query_by_owner("u1").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|d| d.data.owner_id == "u1"));
        assert_eq!(store.query_all_newest_first().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = SqliteDocumentStore::new(setup_test_db().await);
        let id = store.add(&record("u1", "A")).await.unwrap();
        store.delete(&id).await.unwrap();
        assert!(store.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_user_is_idempotent() {
        let directory = SqliteUserDirectory::new(setup_test_db().await);
        let mut user = UserRecord {
            uid: "u1".to_string(),
            email: Some("ana@x.com".to_string()),
            display_name: None,
        };
        directory.register(&user).await.unwrap();
        user.display_name = Some("Ana".to_string());
        directory.register(&user).await.unwrap();

        let users = directory.list_users().await.unwrap();
        assert_eq!(users, vec![user]);
    }
}
