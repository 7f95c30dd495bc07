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

use crate::field::Kind;
use crate::store::StoreError;

/// Errors that abort a hydration pass.
///
/// Missing keys are not errors. Fields hydrated before the failure keep their
/// new values.
#[derive(Debug, thiserror::Error)]
pub enum HydrateError {
    #[error("Failed to fetch key '{key}': {source}")]
    Store {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("Value '{value}' at key '{key}' is not a valid {kind}: {reason}")]
    Coercion {
        key: String,
        kind: Kind,
        value: String,
        reason: String,
    },
}

impl HydrateError {
    /// The store key being processed when hydration stopped.
    pub fn key(&self) -> &str {
        match self {
            HydrateError::Store { key, .. } | HydrateError::Coercion { key, .. } => key,
        }
    }
}
