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

//! Key-value stores that hydration reads from.
//!
//! The engine needs one operation: fetch the value at an exact key. A missing
//! key is an ordinary outcome (`Ok(None)`); every `Err` is treated as fatal.

pub mod etcd;
pub mod memory;

use async_trait::async_trait;

pub use etcd::EtcdStore;
pub use memory::MemoryStore;

/// Errors raised by a store other than a missing key.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to reach store at {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Store returned error code {code} for key '{key}': {message}")]
    Server {
        key: String,
        code: u64,
        message: String,
    },

    #[error("Store returned unexpected HTTP status {status} for key '{key}'")]
    UnexpectedStatus { key: String, status: u16 },

    #[error("Malformed store response for key '{key}': {reason}")]
    MalformedResponse { key: String, reason: String },

    #[error("Invalid store endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("No store endpoints configured")]
    NoEndpoints,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to a hierarchical key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the raw value stored at `key`, or `None` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}
