use anyhow::{anyhow, Context, Result};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::models::{
    Client, ClientWithPrograms, EnrollmentRequest, HealthProgram, NewClient, NewProgram,
};

/// HTTP client for the registry API
#[derive(Clone)]
pub struct RegistryApi {
    http: reqwest::Client,
    base_url: String,
}

impl RegistryApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        let response = self.http.get(self.url("/api/clients")).send().await?;
        read_json(response).await
    }

    /// `None` when the API answers 404
    pub async fn get_client(&self, id: i64) -> Result<Option<ClientWithPrograms>> {
        let response = self
            .http
            .get(self.url(&format!("/api/clients/{id}")))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        read_json(response).await.map(Some)
    }

    pub async fn search_clients(&self, query: &str) -> Result<Vec<Client>> {
        let response = self
            .http
            .get(self.url("/api/clients/search"))
            .query(&[("query", query)])
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn create_client(&self, client: &NewClient) -> Result<Client> {
        let response = self
            .http
            .post(self.url("/api/clients"))
            .json(client)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn list_programs(&self) -> Result<Vec<HealthProgram>> {
        let response = self.http.get(self.url("/api/programs")).send().await?;
        read_json(response).await
    }

    pub async fn create_program(&self, program: &NewProgram) -> Result<HealthProgram> {
        let response = self
            .http
            .post(self.url("/api/programs"))
            .json(program)
            .send()
            .await?;
        read_json(response).await
    }

    /// Undated enrollment through `POST /api/enroll`
    pub async fn enroll(&self, client_id: i64, program_id: i64) -> Result<()> {
        let request = EnrollmentRequest {
            client_id: Some(client_id),
            program_id: Some(program_id),
        };
        let response = self
            .http
            .post(self.url("/api/enroll"))
            .json(&request)
            .send()
            .await?;

        check_status(response).await?;
        debug!(client_id, program_id, "enrolled client");
        Ok(())
    }
}

/// Non-2xx responses become errors carrying the server's message
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), body = %body, "API request failed");
    if body.trim().is_empty() {
        Err(anyhow!("request failed with status {status}"))
    } else {
        Err(anyhow!(body))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    Ok(response.json::<T>().await?)
}
