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

//! Populate typed configuration structures from an etcd key space.
//!
//! Every leaf field of a structure is mapped to a key derived from its
//! position in the structure (`[folder/]parent.child.leaf`), fetched from a
//! [`KeyValueStore`] and coerced into the field's native type. Fields whose
//! key is missing keep their current value.
//!
//! ```no_run
//! use etcd_hydrator::{hydrate_fields, EtcdStore, Hydrator};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Database {
//!     host: String,
//!     port: u16,
//! }
//!
//! #[derive(Default)]
//! struct AppConfig {
//!     name: String,
//!     database: Database,
//! }
//!
//! hydrate_fields!(Database { value host, value port });
//! hydrate_fields!(AppConfig { value name, nested database });
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = EtcdStore::new(vec!["http://127.0.0.1:2379".to_string()])?;
//! let hydrator = Hydrator::builder(Arc::new(store)).with_folder("myapp").build();
//!
//! // Reads myapp/name, myapp/database.host and myapp/database.port
//! let mut config = AppConfig::default();
//! hydrator.hydrate(&mut config).await?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod coerce;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod field;
pub mod hydrator;
pub mod key_path;
pub mod store;

// Main exports for library users
pub use builder::HydratorBuilder;
pub use coerce::{Coercion, CoercionPolicy};
pub use diagnostics::{Diagnostics, LogDiagnostics, NoopDiagnostics, DEBUG_ENV_VAR};
pub use error::HydrateError;
pub use field::{Field, FieldValue, Hydrate, Kind, Slot};
pub use hydrator::Hydrator;
pub use key_path::{FieldDescriptor, KeyPathResolver, DEFAULT_SEPARATOR};
pub use store::{EtcdStore, KeyValueStore, MemoryStore, StoreError};

pub use config::{load_config_file, save_config_file, ConfigError, HydratorSettings};
