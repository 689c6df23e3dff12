use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::messages;
use crate::models::{Syllabus, UserRecord};
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_NAME_HEADER: &str = "x-user-name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// The authenticated caller. The role is fixed when the session is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Role,
}

/// Decides which identities get the admin role.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    admin_emails: Vec<String>,
}

impl AccessPolicy {
    pub fn new<I, S>(admin_emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            admin_emails: admin_emails
                .into_iter()
                .map(|e| e.as_ref().trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn has_admins(&self) -> bool {
        !self.admin_emails.is_empty()
    }

    pub fn resolve(&self, uid: &str, email: Option<&str>, display_name: Option<&str>) -> Session {
        let role = match email {
            Some(email) if self.admin_emails.contains(&email.trim().to_lowercase()) => Role::Admin,
            _ => Role::User,
        };
        Session {
            uid: uid.to_string(),
            email: email.map(str::to_string),
            display_name: display_name.map(str::to_string),
            role,
        }
    }
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(messages::ADMIN_ONLY.to_string()))
        }
    }

    /// Owners see their own syllabi; admins see every syllabus.
    pub fn authorize(&self, syllabus: &Syllabus) -> Result<(), AppError> {
        if self.is_admin() || syllabus.owner_id == self.uid {
            Ok(())
        } else {
            Err(AppError::Forbidden(messages::NO_VIEW_PERMISSION.to_string()))
        }
    }

    pub fn user_record(&self) -> UserRecord {
        UserRecord {
            uid: self.uid.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let uid = header(parts, USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized(messages::NOT_AUTHENTICATED.to_string()))?;
        Ok(state.policy.resolve(
            uid,
            header(parts, USER_EMAIL_HEADER),
            header(parts, USER_NAME_HEADER),
        ))
    }
}
