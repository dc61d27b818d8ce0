use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::{parse_body, path_id};
use crate::db::Database;
use crate::error::RegistryResult;
use crate::models::{EnrolledProgram, EnrollmentRequest, ProgramEnrollmentRequest};
use crate::services::enrollments;

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/api/enroll", post(enroll))
        .route("/api/clients/:id/enroll", post(enroll_in_program))
        .route("/api/clients/:id/programs", get(list_client_programs))
}

async fn enroll(
    State(db): State<Database>,
    body: Bytes,
) -> RegistryResult<(StatusCode, &'static str)> {
    let request: EnrollmentRequest = parse_body(&body)?;
    enrollments::enroll_client(&db, &request).await?;
    Ok((StatusCode::CREATED, "Client enrolled in program"))
}

async fn enroll_in_program(
    State(db): State<Database>,
    client_id: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> RegistryResult<(StatusCode, Json<EnrolledProgram>)> {
    let request: ProgramEnrollmentRequest = parse_body(&body)?;
    let enrolled =
        enrollments::enroll_client_in_program(&db, path_id(client_id), request.program_id).await?;
    Ok((StatusCode::CREATED, Json(enrolled)))
}

async fn list_client_programs(
    State(db): State<Database>,
    client_id: Result<Path<i64>, PathRejection>,
) -> RegistryResult<Json<Vec<EnrolledProgram>>> {
    // A non-numeric id has no enrollments
    let Some(client_id) = path_id(client_id) else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(enrollments::list_client_programs(&db, client_id).await?))
}
