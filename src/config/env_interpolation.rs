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

//! Environment variable interpolation for settings files.
//!
//! POSIX-style references are replaced before the file is parsed:
//! - `${VAR_NAME}` - Simple variable substitution
//! - `${VAR_NAME:-default}` - Variable with default value if unset/empty
//!
//! ```
//! use etcd_hydrator::config::env_interpolation::interpolate;
//! use std::env;
//!
//! env::set_var("DOC_ETCD_HOST", "etcd.internal");
//!
//! let input = "endpoint: http://${DOC_ETCD_HOST}:${DOC_ETCD_PORT:-2379}";
//! let result = interpolate(input).unwrap();
//! assert_eq!(result, "endpoint: http://etcd.internal:2379");
//! ```

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::env;

/// Maximum length for interpolated strings
const MAX_INTERPOLATED_LENGTH: usize = 1_000_000;

lazy_static! {
    /// Captures the variable name (group 1) and the default value (group 3).
    static ref ENV_VAR_PATTERN: Regex = Regex::new(
        r"\$\{([A-Za-z_][A-Za-z0-9_]*)(:-([^}]*))?\}"
    ).expect("Invalid regex pattern");
}

/// Errors that can occur during environment variable interpolation.
#[derive(Debug, thiserror::Error)]
pub enum InterpolationError {
    #[error("Environment variable '{name}' is not set and has no default value")]
    MissingVariable { name: String },

    #[error("Interpolated result exceeds maximum allowed length of {MAX_INTERPOLATED_LENGTH} bytes")]
    ResultTooLarge,
}

/// Value for `${name}` or `${name:-default}`.
fn lookup(name: &str, default: Option<&str>) -> Result<String, InterpolationError> {
    match (env::var(name), default) {
        (Ok(value), _) if !value.is_empty() => Ok(value),
        (Err(env::VarError::NotUnicode(_)), _) => Err(InterpolationError::MissingVariable {
            name: format!("{name} (contains invalid Unicode)"),
        }),
        (_, Some(default)) => Ok(default.to_string()),
        (_, None) => Err(InterpolationError::MissingVariable {
            name: name.to_string(),
        }),
    }
}

/// Interpolate environment variables in `input`.
///
/// A variable that is unset or empty takes its default; without a default
/// it is an error. Expansion is not recursive.
pub fn interpolate(input: &str) -> Result<String, InterpolationError> {
    let mut result = String::with_capacity(input.len());
    let mut rest = 0;

    for caps in ENV_VAR_PATTERN.captures_iter(input) {
        let (Some(reference), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        result.push_str(&input[rest..reference.start()]);
        // Names only; values may be secrets
        debug!("Expanding environment variable {}", name.as_str());
        result.push_str(&lookup(name.as_str(), caps.get(3).map(|m| m.as_str()))?);
        rest = reference.end();

        if result.len() > MAX_INTERPOLATED_LENGTH {
            return Err(InterpolationError::ResultTooLarge);
        }
    }

    result.push_str(&input[rest..]);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_simple_interpolation() {
        env::set_var("TEST_INTERP_FOLDER", "payments");
        env::set_var("TEST_INTERP_SEPARATOR", "/");

        let input = "folder: ${TEST_INTERP_FOLDER}\nseparator: ${TEST_INTERP_SEPARATOR}";
        let result = interpolate(input).unwrap();

        assert_eq!(result, "folder: payments\nseparator: /");
    }

    #[test]
    #[serial]
    fn test_default_used_when_unset_or_empty() {
        env::remove_var("TEST_INTERP_UNSET");
        env::set_var("TEST_INTERP_EMPTY", "");

        assert_eq!(
            interpolate("a: ${TEST_INTERP_UNSET:-one}").unwrap(),
            "a: one"
        );
        assert_eq!(
            interpolate("b: ${TEST_INTERP_EMPTY:-two}").unwrap(),
            "b: two"
        );
        assert_eq!(interpolate("c: ${TEST_INTERP_UNSET:-}").unwrap(), "c: ");
    }

    #[test]
    #[serial]
    fn test_missing_variable_is_an_error() {
        env::remove_var("TEST_INTERP_REQUIRED");

        let err = interpolate("folder: ${TEST_INTERP_REQUIRED}").unwrap_err();
        assert_matches!(err, InterpolationError::MissingVariable { ref name } if name == "TEST_INTERP_REQUIRED");
    }

    #[test]
    #[serial]
    fn test_empty_variable_without_default_is_an_error() {
        env::set_var("TEST_INTERP_BLANK", "");

        assert_matches!(
            interpolate("folder: ${TEST_INTERP_BLANK}"),
            Err(InterpolationError::MissingVariable { .. })
        );
    }

    #[test]
    fn test_text_without_references_is_unchanged() {
        let input = "endpoints:\n  - http://127.0.0.1:2379\nfolder: $HOME {not} ${}";
        assert_eq!(interpolate(input).unwrap(), input);
    }

    #[test]
    #[serial]
    fn test_expansion_is_not_recursive() {
        env::set_var("TEST_INTERP_OUTER", "${TEST_INTERP_INNER}");
        env::set_var("TEST_INTERP_INNER", "expanded");

        assert_eq!(
            interpolate("v: ${TEST_INTERP_OUTER}").unwrap(),
            "v: ${TEST_INTERP_INNER}"
        );
    }
}
