use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    api::types::{ApiError, ReqType},
    config,
};

const LOG_BODY_LIMIT: usize = 500;
const LOG_TOKEN_PREFIX: usize = 8;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Option<String>,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: None,
        }
    }

    pub fn new_with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: Some(base_url.into()),
        }
    }

    pub(crate) async fn resolved_base_url(&self) -> String {
        if let Some(base) = &self.base_url {
            base.clone()
        } else {
            config::await_api_endpoint().await
        }
    }

    /// One POST against the supervisor endpoint. The body is read as text
    /// before decoding so HTML error pages surface as errors instead of panics.
    pub(crate) async fn post_json<B, R>(
        &self,
        req_type: ReqType,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let endpoint = self.resolved_base_url().await;
        let mut request = self
            .client
            .post(&endpoint)
            .query(&[("type", req_type.as_str())])
            .json(body);
        if let Some(token) = bearer {
            log::debug!("{} using bearer {}", req_type.as_str(), redact(token));
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        log::debug!("{} -> {}", req_type.as_str(), endpoint);
        let response = request.send().await.map_err(|e| {
            log::warn!("{} request failed: {}", req_type.as_str(), e);
            ApiError::request_failed(format!("Request failed: {}", e))
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::request_failed(format!("Failed to read response: {}", e)))?;
        log::debug!(
            "{} <- {} {}",
            req_type.as_str(),
            status.as_u16(),
            preview(&text)
        );

        decode_body(&text).map_err(|err| {
            log::warn!("{} returned an unreadable body: {}", req_type.as_str(), err);
            if status.is_success() {
                err
            } else {
                ApiError::request_failed(format!("HTTP {}", status.as_u16()))
            }
        })
    }
}

pub(crate) fn decode_body<R: DeserializeOwned>(text: &str) -> Result<R, ApiError> {
    serde_json::from_str(text)
        .map_err(|e| ApiError::invalid_response(format!("Failed to parse response: {}", e)))
}

pub(crate) fn preview(text: &str) -> &str {
    match text.char_indices().nth(LOG_BODY_LIMIT) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub(crate) fn redact(token: &str) -> String {
    match token.char_indices().nth(LOG_TOKEN_PREFIX) {
        Some((idx, _)) => format!("{}...", &token[..idx]),
        None => "***".to_string(),
    }
}
