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
use crate::diagnostics::{self, Diagnostics, NoopDiagnostics};
use crate::hydrator::Hydrator;
use crate::key_path::{KeyPathResolver, DEFAULT_SEPARATOR};
use crate::store::KeyValueStore;
use std::sync::Arc;

/// Builder for creating a Hydrator instance
pub struct HydratorBuilder {
    store: Arc<dyn KeyValueStore>,
    folder: String,
    separator: String,
    diagnostics: Arc<dyn Diagnostics>,
    policy: CoercionPolicy,
}

impl HydratorBuilder {
    /// Create a new HydratorBuilder reading from `store`
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            folder: String::new(),
            separator: DEFAULT_SEPARATOR.to_string(),
            diagnostics: Arc::new(NoopDiagnostics),
            policy: CoercionPolicy::default(),
        }
    }

    /// Place every key under `folder/`
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    /// Join nested key segments with `separator` instead of `.`
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Send verbose output to `diagnostics`
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Log verbose output when `ETCD_HYDRATOR_DEBUG` is set
    pub fn with_env_diagnostics(self) -> Self {
        self.with_diagnostics(diagnostics::from_env())
    }

    /// Set how values that fail to parse are handled
    pub fn with_policy(mut self, policy: CoercionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fail hydration on values that do not parse
    pub fn strict(self) -> Self {
        self.with_policy(CoercionPolicy::Strict)
    }

    pub fn build(self) -> Hydrator {
        let resolver = KeyPathResolver::new()
            .with_folder(self.folder)
            .with_separator(self.separator);
        Hydrator::from_parts(self.store, resolver, self.diagnostics, self.policy)
    }
}
