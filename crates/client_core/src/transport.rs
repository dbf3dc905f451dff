//! HTTP seam between the roster core and the activities service.

use async_trait::async_trait;
use reqwest::{
    header::{CACHE_CONTROL, PRAGMA},
    Client, RequestBuilder,
};
use serde::de::DeserializeOwned;
use shared::protocol::{activities_url, participants_url, signup_url};
use url::Url;

use crate::error::TransportError;

/// Raw status and body of a completed request. Status interpretation is left
/// to the caller so each operation can pick its own success/failure wording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

#[async_trait]
pub trait ActivitiesTransport: Send + Sync {
    /// `GET /activities`, bypassing any response cache.
    async fn get_activities(&self) -> Result<HttpReply, TransportError>;
    async fn post_signup(&self, activity_name: &str, email: &str)
        -> Result<HttpReply, TransportError>;
    async fn delete_participant(
        &self,
        activity_name: &str,
        email: &str,
    ) -> Result<HttpReply, TransportError>;
}

pub struct MissingTransport;

#[async_trait]
impl ActivitiesTransport for MissingTransport {
    async fn get_activities(&self) -> Result<HttpReply, TransportError> {
        Err(TransportError::Unavailable(
            "no activities service configured".into(),
        ))
    }

    async fn post_signup(
        &self,
        _activity_name: &str,
        _email: &str,
    ) -> Result<HttpReply, TransportError> {
        Err(TransportError::Unavailable(
            "no activities service configured".into(),
        ))
    }

    async fn delete_participant(
        &self,
        _activity_name: &str,
        _email: &str,
    ) -> Result<HttpReply, TransportError> {
        Err(TransportError::Unavailable(
            "no activities service configured".into(),
        ))
    }
}

pub struct HttpActivitiesTransport {
    http: Client,
    base_url: Url,
}

impl HttpActivitiesTransport {
    pub fn new(server_url: &str) -> Result<Self, TransportError> {
        let base_url = Url::parse(server_url).map_err(|source| TransportError::InvalidBaseUrl {
            url: server_url.to_string(),
            source,
        })?;
        Ok(Self::with_client(Client::new(), base_url))
    }

    pub fn with_client(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<HttpReply, TransportError> {
        let wrap = |source: reqwest::Error| TransportError::Request {
            url: url.to_string(),
            source,
        };
        let response = request.send().await.map_err(wrap)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(wrap)?;
        Ok(HttpReply::new(status, body.to_vec()))
    }
}

#[async_trait]
impl ActivitiesTransport for HttpActivitiesTransport {
    async fn get_activities(&self) -> Result<HttpReply, TransportError> {
        let url = activities_url(&self.base_url);
        let request = self
            .http
            .get(url.clone())
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache");
        self.execute(request, &url).await
    }

    async fn post_signup(
        &self,
        activity_name: &str,
        email: &str,
    ) -> Result<HttpReply, TransportError> {
        let url = signup_url(&self.base_url, activity_name, email)?;
        self.execute(self.http.post(url.clone()), &url).await
    }

    async fn delete_participant(
        &self,
        activity_name: &str,
        email: &str,
    ) -> Result<HttpReply, TransportError> {
        let url = participants_url(&self.base_url, activity_name, email)?;
        self.execute(self.http.delete(url.clone()), &url).await
    }
}
