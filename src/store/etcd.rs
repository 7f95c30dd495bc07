// Copyright 2025 The Drasi Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! etcd v2 keys API client.
//!
//! Reads single keys with `GET {endpoint}/v2/keys/{key}`. Each `/`-separated
//! segment of the key is percent-encoded, so `?`, `#` and `%` stay part of
//! the key. etcd answers a missing key with HTTP 404 and error code 100,
//! which maps to `Ok(None)`. Directory nodes carry no value and read as an
//! empty string.

use super::{KeyValueStore, StoreError};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

/// etcd error code for a key that does not exist.
pub const KEY_NOT_FOUND: u64 = 100;

/// Request timeout used by [`EtcdStore::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct KeysResponse {
    node: Node,
}

#[derive(Debug, Deserialize)]
struct Node {
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    dir: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error_code: u64,
    #[serde(default)]
    message: String,
}

/// Store backed by an etcd cluster.
///
/// Endpoints are tried in order; the next one is only used when the previous
/// one could not be reached.
#[derive(Debug, Clone)]
pub struct EtcdStore {
    client: reqwest::Client,
    endpoints: Vec<Url>,
}

fn parse_endpoint(endpoint: &str) -> Result<Url, StoreError> {
    let invalid = |reason: String| StoreError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path".to_string()));
    }
    Ok(url)
}

impl EtcdStore {
    pub fn new(endpoints: Vec<String>) -> Result<Self, StoreError> {
        Self::with_timeout(endpoints, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoints: Vec<String>, timeout: Duration) -> Result<Self, StoreError> {
        if endpoints.is_empty() {
            return Err(StoreError::NoEndpoints);
        }

        let endpoints = endpoints
            .iter()
            .map(|endpoint| parse_endpoint(endpoint))
            .collect::<Result<Vec<_>, _>>()?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| StoreError::Transport {
                endpoint: endpoints
                    .iter()
                    .map(Url::as_str)
                    .collect::<Vec<_>>()
                    .join(","),
                source,
            })?;

        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &[Url] {
        &self.endpoints
    }

    fn key_url(endpoint: &Url, key: &str) -> Url {
        let mut url = endpoint.clone();
        // Endpoints are checked to be base URLs at construction.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v2", "keys"])
                .extend(key.split('/').filter(|segment| !segment.is_empty()));
        }
        url
    }

    async fn read_response(
        endpoint: &Url,
        key: &str,
        response: reqwest::Response,
    ) -> Result<Option<String>, StoreError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| StoreError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        if status.is_success() {
            let parsed: KeysResponse =
                serde_json::from_str(&body).map_err(|e| StoreError::MalformedResponse {
                    key: key.to_string(),
                    reason: e.to_string(),
                })?;
            if parsed.node.dir {
                debug!("Key '{key}' is a directory");
            }
            return Ok(Some(parsed.node.value.unwrap_or_default()));
        }

        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(error) if error.error_code == KEY_NOT_FOUND => Ok(None),
            Ok(error) => Err(StoreError::Server {
                key: key.to_string(),
                code: error.error_code,
                message: error.message,
            }),
            Err(_) => Err(StoreError::UnexpectedStatus {
                key: key.to_string(),
                status: status.as_u16(),
            }),
        }
    }
}

#[async_trait]
impl KeyValueStore for EtcdStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut last_error = None;

        for endpoint in &self.endpoints {
            let url = Self::key_url(endpoint, key);
            match self.client.get(url).send().await {
                Ok(response) => return Self::read_response(endpoint, key, response).await,
                Err(source) => {
                    warn!("Failed to reach etcd endpoint {endpoint}: {source}");
                    last_error = Some(StoreError::Transport {
                        endpoint: endpoint.to_string(),
                        source,
                    });
                }
            }
        }

        Err(last_error.unwrap_or(StoreError::NoEndpoints))
    }
}
