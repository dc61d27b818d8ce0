use tracing::debug;

use super::{with_pool, Database};
use crate::error::RegistryResult;
use crate::models::{Client, NewClient, ProgramSummary};

const CLIENT_COLUMNS: &str =
    "id, first_name, last_name, date_of_birth, gender, contact_number, email, address";

impl Database {
    /// Insert a client, returning the generated id
    ///
    /// The caller is expected to have validated both names.
    pub async fn create_client(&self, client: &NewClient) -> RegistryResult<i64> {
        let id = with_pool!(self, |pool| {
            sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO clients
                    (first_name, last_name, date_of_birth, gender, contact_number, email, address)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id
                "#,
            )
            .bind(client.first_name.as_deref())
            .bind(client.last_name.as_deref())
            .bind(client.date_of_birth)
            .bind(client.gender.as_deref())
            .bind(client.contact_number.as_deref())
            .bind(client.email.as_deref())
            .bind(client.address.as_deref())
            .fetch_one(pool)
            .await
        })?;

        debug!(client_id = id, "inserted client");
        Ok(id)
    }

    pub async fn get_client(&self, id: i64) -> RegistryResult<Option<Client>> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1");
        let client = with_pool!(self, |pool| {
            sqlx::query_as::<_, Client>(&sql)
                .bind(id)
                .fetch_optional(pool)
                .await
        })?;

        Ok(client)
    }

    /// Every client in insertion order
    pub async fn list_clients(&self) -> RegistryResult<Vec<Client>> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients ORDER BY id");
        let clients = with_pool!(self, |pool| {
            sqlx::query_as::<_, Client>(&sql).fetch_all(pool).await
        })?;

        Ok(clients)
    }

    /// Unanchored `LIKE` over first name, last name and contact number
    ///
    /// Case sensitivity follows the store's collation.
    pub async fn search_clients(&self, query: &str) -> RegistryResult<Vec<Client>> {
        let sql = format!(
            "SELECT {CLIENT_COLUMNS} FROM clients \
             WHERE first_name LIKE $1 OR last_name LIKE $1 OR contact_number LIKE $1 \
             ORDER BY id"
        );
        let pattern = format!("%{query}%");
        let clients = with_pool!(self, |pool| {
            sqlx::query_as::<_, Client>(&sql)
                .bind(pattern.as_str())
                .fetch_all(pool)
                .await
        })?;

        debug!(query, matches = clients.len(), "searched clients");
        Ok(clients)
    }

    /// Programs a client is enrolled in, one row per enrollment
    pub async fn get_client_program_summaries(&self, client_id: i64) -> RegistryResult<Vec<ProgramSummary>> {
        let programs = with_pool!(self, |pool| {
            sqlx::query_as::<_, ProgramSummary>(
                r#"
                SELECT hp.id, hp.name, hp.description
                FROM client_programs cp
                JOIN health_programs hp ON cp.program_id = hp.id
                WHERE cp.client_id = $1
                ORDER BY cp.id
                "#,
            )
            .bind(client_id)
            .fetch_all(pool)
            .await
        })?;

        Ok(programs)
    }
}
