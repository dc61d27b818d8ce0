use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use super::{parse_body, path_id};
use crate::db::Database;
use crate::error::{RegistryError, RegistryResult};
use crate::models::{Client, ClientWithPrograms, NewClient};
use crate::services::clients;

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: Option<String>,
}

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/api/clients", post(create_client).get(list_clients))
        .route("/api/clients/search", get(search_clients))
        .route("/api/clients/:id", get(get_client))
}

async fn create_client(
    State(db): State<Database>,
    body: Bytes,
) -> RegistryResult<(StatusCode, Json<Client>)> {
    let request: NewClient = parse_body(&body)?;
    let client = clients::create_client(&db, &request).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

async fn list_clients(State(db): State<Database>) -> RegistryResult<Json<Vec<Client>>> {
    Ok(Json(clients::list_clients(&db).await?))
}

async fn search_clients(
    State(db): State<Database>,
    Query(params): Query<SearchParams>,
) -> RegistryResult<Json<Vec<Client>>> {
    Ok(Json(clients::search_clients(&db, params.query.as_deref()).await?))
}

async fn get_client(
    State(db): State<Database>,
    id: Result<Path<i64>, PathRejection>,
) -> RegistryResult<Json<ClientWithPrograms>> {
    let id = path_id(id).ok_or_else(|| RegistryError::not_found("Client not found"))?;
    Ok(Json(clients::get_client_with_programs(&db, id).await?))
}
