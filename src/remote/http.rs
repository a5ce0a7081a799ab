use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};

use super::wire::decode_processes;
use crate::config::RemoteConfig;
use crate::engine::host::HostService;
use crate::engine::process::ProcessEntry;
use crate::error::FetchError;

/// `HostService` over the service's HTTP endpoints.
pub struct HttpHost {
    client: Client,
    processes_url: String,
    kill_url: String,
}

impl HttpHost {
    pub fn new(config: &RemoteConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &RemoteConfig) -> Self {
        Self {
            client,
            processes_url: config.processes_url(),
            kill_url: config.kill_url(),
        }
    }
}

fn transport(endpoint: &str, err: reqwest::Error) -> FetchError {
    FetchError::Transport {
        endpoint: endpoint.to_string(),
        message: err.to_string(),
    }
}

fn ensure_success(endpoint: &str, response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(FetchError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl HostService for HttpHost {
    async fn fetch_processes(&self) -> Result<Vec<ProcessEntry>, FetchError> {
        let endpoint = self.processes_url.as_str();
        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(|e| transport(endpoint, e))?;
        let response = ensure_success(endpoint, response)?;
        let body = response.bytes().await.map_err(|e| transport(endpoint, e))?;
        decode_processes(&body).map_err(|e| FetchError::Body {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    async fn kill(&self, pid: u32) -> Result<(), FetchError> {
        let endpoint = self.kill_url.as_str();
        let response = self
            .client
            .delete(endpoint)
            .query(&[("pid", pid)])
            .send()
            .await
            .map_err(|e| transport(endpoint, e))?;
        ensure_success(endpoint, response)?;
        Ok(())
    }
}
