use tracing::info;

use super::non_blank;
use crate::db::Database;
use crate::error::{RegistryError, RegistryResult};
use crate::models::{Client, ClientWithPrograms, NewClient};

/// Insert a client, then read it back by its generated id
///
/// Blank optional fields are stored as NULL.
pub async fn create_client(db: &Database, request: &NewClient) -> RegistryResult<Client> {
    let first_name = non_blank(request.first_name.as_deref());
    let last_name = non_blank(request.last_name.as_deref());
    let (Some(first_name), Some(last_name)) = (first_name, last_name) else {
        return Err(RegistryError::validation(
            "First name and last name are required",
        ));
    };

    let normalized = NewClient {
        first_name: Some(first_name.to_string()),
        last_name: Some(last_name.to_string()),
        date_of_birth: request.date_of_birth,
        gender: non_blank(request.gender.as_deref()).map(str::to_string),
        contact_number: non_blank(request.contact_number.as_deref()).map(str::to_string),
        email: non_blank(request.email.as_deref()).map(str::to_string),
        address: non_blank(request.address.as_deref()).map(str::to_string),
    };

    let id = db.create_client(&normalized).await?;
    let client = db
        .get_client(id)
        .await?
        .ok_or(RegistryError::Store(sqlx::Error::RowNotFound))?;

    info!(client_id = client.id, "registered client");
    Ok(client)
}

pub async fn list_clients(db: &Database) -> RegistryResult<Vec<Client>> {
    db.list_clients().await
}

pub async fn search_clients(db: &Database, query: Option<&str>) -> RegistryResult<Vec<Client>> {
    let query = query
        .filter(|q| !q.is_empty())
        .ok_or_else(|| RegistryError::validation("Search query is required"))?;

    db.search_clients(query).await
}

/// Client row with the programs it is enrolled in
pub async fn get_client_with_programs(db: &Database, id: i64) -> RegistryResult<ClientWithPrograms> {
    let client = db
        .get_client(id)
        .await?
        .ok_or_else(|| RegistryError::not_found("Client not found"))?;
    let programs = db.get_client_program_summaries(id).await?;

    Ok(ClientWithPrograms { client, programs })
}
