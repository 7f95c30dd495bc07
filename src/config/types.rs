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

use crate::coerce::CoercionPolicy;
use crate::diagnostics;
use crate::hydrator::Hydrator;
use crate::key_path::{KeyPathResolver, DEFAULT_SEPARATOR};
use crate::store::{EtcdStore, StoreError};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Settings for connecting a Hydrator to etcd
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydratorSettings {
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,
    #[serde(default)]
    pub folder: String,
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Log every hydrated type and recovered key
    #[serde(default)]
    pub debug: bool,
    /// Fail hydration on values that do not parse
    #[serde(default)]
    pub strict: bool,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for HydratorSettings {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
            folder: String::new(),
            separator: default_separator(),
            debug: false,
            strict: false,
            timeout_ms: default_timeout_ms(),
            log_level: default_log_level(),
        }
    }
}

fn default_endpoints() -> Vec<String> {
    vec!["http://127.0.0.1:2379".to_string()]
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl HydratorSettings {
    pub fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            return Err(anyhow!("At least one etcd endpoint is required"));
        }

        for endpoint in &self.endpoints {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(anyhow!(
                    "Invalid etcd endpoint '{endpoint}' (expected an http:// or https:// URL)"
                ));
            }
        }

        if self.separator.is_empty() {
            return Err(anyhow!("Key separator cannot be empty"));
        }

        if self.folder.ends_with('/') {
            return Err(anyhow!(
                "Folder '{}' must not end with '/'",
                self.folder
            ));
        }

        if self.timeout_ms == 0 {
            return Err(anyhow!("Invalid timeout_ms: 0 (must be positive)"));
        }

        Ok(())
    }

    pub fn policy(&self) -> CoercionPolicy {
        if self.strict {
            CoercionPolicy::Strict
        } else {
            CoercionPolicy::Lenient
        }
    }

    /// Key layout described by these settings.
    pub fn resolver(&self) -> KeyPathResolver {
        KeyPathResolver::new()
            .with_folder(self.folder.clone())
            .with_separator(self.separator.clone())
    }

    /// Build a Hydrator reading from the configured etcd endpoints.
    ///
    /// Diagnostics are on when `debug` is set or `ETCD_HYDRATOR_DEBUG` is.
    pub fn build_hydrator(&self) -> Result<Hydrator, StoreError> {
        let store = EtcdStore::with_timeout(
            self.endpoints.clone(),
            Duration::from_millis(self.timeout_ms),
        )?;

        Ok(Hydrator::builder(Arc::new(store))
            .with_folder(self.folder.clone())
            .with_separator(self.separator.clone())
            .with_diagnostics(diagnostics::sink(
                self.debug || diagnostics::debug_enabled(),
            ))
            .with_policy(self.policy())
            .build())
    }
}
