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

//! Verbose hydration output.
//!
//! A [`Diagnostics`] sink is told which type is being hydrated and every
//! key/value pair recovered from the store. Sinks only observe: they are
//! never consulted for control flow.

use log::info;
use std::env;
use std::sync::Arc;

/// Environment variable that turns on verbose output when non-empty.
pub const DEBUG_ENV_VAR: &str = "ETCD_HYDRATOR_DEBUG";

/// Log target used by [`LogDiagnostics`].
pub const DIAGNOSTICS_TARGET: &str = "etcd_hydrator::diagnostics";

pub trait Diagnostics: Send + Sync {
    /// A hydration pass is starting on a value of `type_name`.
    fn hydrating(&self, type_name: &str);

    /// `value` was read from the store at `key`.
    fn recovered(&self, key: &str, value: &str);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn hydrating(&self, _type_name: &str) {}

    fn recovered(&self, _key: &str, _value: &str) {}
}

/// Writes through the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn hydrating(&self, type_name: &str) {
        info!(target: DIAGNOSTICS_TARGET, "Hydrating var: {type_name:?}");
    }

    fn recovered(&self, key: &str, value: &str) {
        info!(target: DIAGNOSTICS_TARGET, "Recovered key {key:?} with value {value:?}");
    }
}

/// Whether [`DEBUG_ENV_VAR`] is set to a non-empty value.
pub fn debug_enabled() -> bool {
    env::var_os(DEBUG_ENV_VAR).is_some_and(|v| !v.is_empty())
}

/// [`LogDiagnostics`] when `enabled`, [`NoopDiagnostics`] otherwise.
pub fn sink(enabled: bool) -> Arc<dyn Diagnostics> {
    if enabled {
        Arc::new(LogDiagnostics)
    } else {
        Arc::new(NoopDiagnostics)
    }
}

/// Sink selected by [`DEBUG_ENV_VAR`].
pub fn from_env() -> Arc<dyn Diagnostics> {
    sink(debug_enabled())
}
