use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use super::parse_body;
use crate::db::Database;
use crate::error::RegistryResult;
use crate::models::{HealthProgram, NewProgram};
use crate::services::programs;

pub fn routes() -> Router<Database> {
    Router::new().route("/api/programs", post(create_program).get(list_programs))
}

async fn create_program(
    State(db): State<Database>,
    body: Bytes,
) -> RegistryResult<(StatusCode, Json<HealthProgram>)> {
    let request: NewProgram = parse_body(&body)?;
    let program = programs::create_program(&db, &request).await?;
    Ok((StatusCode::CREATED, Json(program)))
}

async fn list_programs(State(db): State<Database>) -> RegistryResult<Json<Vec<HealthProgram>>> {
    Ok(Json(programs::list_programs(&db).await?))
}
