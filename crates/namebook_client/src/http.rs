//! reqwest implementation of [`NamesApi`].

use std::time::Duration;

use async_trait::async_trait;
use namebook_core::{NameRecord, NewName};
use reqwest::{Client, Response};
use serde::Serialize;

use crate::api::{ClientError, ClientResult, NamesApi};
use crate::token::MetaTagTokenProvider;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CSRF_HEADER: &str = "X-CSRF-TOKEN";

#[derive(Serialize)]
struct CreateNameRequest<'a> {
    first_name: &'a str,
    last_name: &'a str,
}

/// HTTP client bound to one server; keeps the session cookie between calls.
#[derive(Debug, Clone)]
pub struct HttpNamesApi {
    client: Client,
    base_url: String,
}

impl HttpNamesApi {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Loads the HTML shell, which opens a session and carries its token.
    pub async fn fetch_token(&self) -> ClientResult<MetaTagTokenProvider> {
        let response = self.client.get(self.url("/")).send().await?;
        let html = ensure_success(response)?.text().await?;
        Ok(MetaTagTokenProvider::from_html(&html))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl NamesApi for HttpNamesApi {
    async fn list_names(&self) -> ClientResult<Vec<NameRecord>> {
        let response = self.client.get(self.url("/api/names")).send().await?;
        Ok(ensure_success(response)?.json().await?)
    }

    async fn create_name(&self, name: &NewName, csrf_token: &str) -> ClientResult<NameRecord> {
        let body = CreateNameRequest {
            first_name: name.first_name(),
            last_name: name.last_name(),
        };
        let response = self
            .client
            .post(self.url("/api/names"))
            .header(CSRF_HEADER, csrf_token)
            .json(&body)
            .send()
            .await?;
        Ok(ensure_success(response)?.json().await?)
    }
}

fn ensure_success(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status {
            status: status.as_u16(),
        })
    }
}
