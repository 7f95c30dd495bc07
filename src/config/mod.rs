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

//! Hydrator settings.
//!
//! Settings describe how to reach etcd and how keys are laid out. They are
//! read from YAML or JSON files with environment variable interpolation:
//! - `${VAR_NAME}` - Required variable
//! - `${VAR_NAME:-default}` - Variable with default value
//!
//! ```yaml
//! endpoints:
//!   - "${ETCD_ENDPOINT:-http://127.0.0.1:2379}"
//! folder: "${APP_FOLDER:-myapp}"
//! separator: "."
//! strict: false
//! timeout_ms: 5000
//! ```

pub mod env_interpolation;
pub mod loader;
pub mod types;

pub use loader::{from_json_str, from_yaml_str, load_config_file, save_config_file, ConfigError};
pub use types::HydratorSettings;
