use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Path, Request};
use axum::routing::{post, put};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::messages;
use crate::models::*;
use crate::services::SaveOutcome;
use crate::session::Session;
use crate::state::AppState;

#[derive(Serialize)]
struct SyllabusList {
    syllabuses: Vec<Syllabus>,
}

#[derive(Serialize)]
struct UserList {
    users: Vec<UserRecord>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportView {
    #[serde(flatten)]
    readiness: ExportReadiness,
    /// Printed methodology of each unit, in unit order.
    unit_methodologies: Vec<String>,
    syllabus: Syllabus,
}

/// `Json` whose rejections answer with the usual error body.
struct AppJson<T>(T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReassignOwnerRequest {
    new_owner_id: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/session", post(start_session))
        .route("/syllabuses", get(list_syllabuses).post(create_syllabus))
        .route(
            "/syllabuses/{id}",
            get(get_syllabus).put(save_syllabus).delete(delete_syllabus),
        )
        .route("/syllabuses/{id}/export", get(export_syllabus))
        .route(
            "/syllabuses/{id}/units/{index}/validate-reference",
            post(validate_unit_reference),
        )
        .route("/validate-reference", post(validate_reference))
        .route("/admin/syllabuses", get(admin_list_syllabuses))
        .route("/admin/users", get(admin_list_users))
        .route("/admin/syllabuses/{id}/owner", put(admin_reassign_owner))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.syllabi.ping().await?;
    Ok(StatusCode::OK)
}

async fn start_session(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Session>, AppError> {
    if let Some(directory) = &state.directory {
        directory.register(&session.user_record()).await?;
    }
    Ok(Json(session))
}

/// Loads a syllabus the caller is allowed to see.
async fn load_authorized(state: &AppState, session: &Session, id: &str) -> Result<Syllabus, AppError> {
    let syllabus = state
        .syllabi
        .get_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;
    session.authorize(&syllabus)?;
    Ok(syllabus)
}

async fn list_syllabuses(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<SyllabusList>, AppError> {
    let syllabuses = state.syllabi.list(&session.uid).await?;
    Ok(Json(SyllabusList { syllabuses }))
}

async fn create_syllabus(
    State(state): State<AppState>,
    session: Session,
) -> Result<(StatusCode, Json<Syllabus>), AppError> {
    let syllabus = state
        .syllabi
        .create(
            &session.uid,
            session.display_name.as_deref().unwrap_or_default(),
            session.email.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(syllabus)))
}

async fn get_syllabus(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<Syllabus>, AppError> {
    Ok(Json(load_authorized(&state, &session, &id).await?))
}

async fn save_syllabus(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    AppJson(mut syllabus): AppJson<Syllabus>,
) -> Result<Json<SaveOutcome>, AppError> {
    if syllabus.id.as_deref().is_some_and(|body_id| body_id != id) {
        return Err(AppError::BadRequest(messages::ID_MISMATCH.to_string()));
    }
    syllabus.id = Some(id);
    session.authorize(&syllabus)?;

    Ok(Json(state.syllabi.save(syllabus).await?))
}

async fn delete_syllabus(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    load_authorized(&state, &session, &id).await?;
    state.syllabi.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn export_syllabus(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<ExportView>, AppError> {
    let syllabus = load_authorized(&state, &session, &id).await?;
    Ok(Json(ExportView {
        readiness: syllabus.export_readiness(),
        unit_methodologies: syllabus
            .learning_units
            .iter()
            .map(|unit| unit.methodology_display().to_string())
            .collect(),
        syllabus,
    }))
}

async fn validate_unit_reference(
    State(state): State<AppState>,
    session: Session,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Json<ValidationResult>, AppError> {
    let syllabus = load_authorized(&state, &session, &id).await?;
    let reference = syllabus
        .learning_units
        .get(index)
        .map(|unit| unit.apa_reference.clone())
        .ok_or_else(|| AppError::BadRequest(messages::UNIT_NOT_FOUND.to_string()))?;

    let result = state.validator.validate(&reference).await;
    state
        .syllabi
        .record_validation(&id, index, &reference, result.clone())
        .await?;

    Ok(Json(result))
}

async fn validate_reference(
    State(state): State<AppState>,
    _session: Session,
    AppJson(req): AppJson<ValidateReferenceRequest>,
) -> Json<ValidationResult> {
    Json(state.validator.validate(&req.reference_text).await)
}

async fn admin_list_syllabuses(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<SyllabusList>, AppError> {
    let syllabuses = state.admin.list_all_syllabi(&session).await?;
    Ok(Json(SyllabusList { syllabuses }))
}

async fn admin_list_users(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<UserList>, AppError> {
    let users = state.admin.list_users(&session).await?;
    Ok(Json(UserList { users }))
}

async fn admin_reassign_owner(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    AppJson(req): AppJson<ReassignOwnerRequest>,
) -> Result<Json<Syllabus>, AppError> {
    let syllabus = state
        .admin
        .reassign_owner(&session, &id, &req.new_owner_id)
        .await?;
    Ok(Json(syllabus))
}
