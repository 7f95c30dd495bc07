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

//! Settings file loading with environment variable interpolation.

use super::env_interpolation;
use super::types::HydratorSettings;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Unified error type for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Environment variable interpolation failed: {0}")]
    InterpolationError(#[from] env_interpolation::InterpolationError),

    #[error("Failed to parse config file '{path}': YAML error: {yaml_err}, JSON error: {json_err}")]
    ParseError {
        path: String,
        yaml_err: String,
        json_err: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(#[from] anyhow::Error),
}

/// Deserialize YAML after interpolating environment variables.
///
/// ```
/// use etcd_hydrator::config::loader::from_yaml_str;
/// use etcd_hydrator::HydratorSettings;
/// use std::env;
///
/// env::set_var("DOC_ETCD_FOLDER", "billing");
///
/// let settings: HydratorSettings = from_yaml_str("folder: ${DOC_ETCD_FOLDER}").unwrap();
/// assert_eq!(settings.folder, "billing");
/// ```
pub fn from_yaml_str<T: DeserializeOwned>(s: &str) -> Result<T, ConfigError> {
    let interpolated = env_interpolation::interpolate(s)?;
    Ok(serde_yaml::from_str(&interpolated)?)
}

/// Deserialize JSON after interpolating environment variables.
pub fn from_json_str<T: DeserializeOwned>(s: &str) -> Result<T, ConfigError> {
    let interpolated = env_interpolation::interpolate(s)?;
    Ok(serde_json::from_str(&interpolated)?)
}

/// Settings file formats, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
    Unknown,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Format::Yaml
            }
            _ => Format::Unknown,
        }
    }
}

/// Load and validate HydratorSettings from a file.
///
/// `.json` files are read as JSON and `.yaml`/`.yml` files as YAML. Any other
/// file is tried as YAML first, then as JSON.
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<HydratorSettings, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    let settings: HydratorSettings = match Format::of(path) {
        Format::Yaml => from_yaml_str(&content)?,
        Format::Json => from_json_str(&content)?,
        Format::Unknown => {
            let interpolated = env_interpolation::interpolate(&content)?;
            serde_yaml::from_str(&interpolated).or_else(|yaml_err| {
                serde_json::from_str(&interpolated).map_err(|json_err| ConfigError::ParseError {
                    path: path.display().to_string(),
                    yaml_err: yaml_err.to_string(),
                    json_err: json_err.to_string(),
                })
            })?
        }
    };

    settings.validate()?;
    Ok(settings)
}

/// Save HydratorSettings to a file in YAML format.
///
/// Environment variable references are not preserved; the interpolated
/// values are written.
pub fn save_config_file<P: AsRef<Path>>(
    settings: &HydratorSettings,
    path: P,
) -> Result<(), ConfigError> {
    let content = serde_yaml::to_string(settings)?;
    Ok(fs::write(path, content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serial_test::serial;
    use std::env;
    use tempfile::NamedTempFile;

    #[test]
    #[serial]
    fn test_load_config_file_with_env_vars() {
        env::set_var("TEST_ETCD_ENDPOINT", "http://etcd-0:2379");
        env::set_var("TEST_ETCD_FOLDER", "orders");

        let content = r#"
endpoints:
  - ${TEST_ETCD_ENDPOINT}
folder: ${TEST_ETCD_FOLDER}
strict: true
"#;

        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), content).unwrap();

        let settings = load_config_file(temp_file.path()).unwrap();

        assert_eq!(settings.endpoints, vec!["http://etcd-0:2379".to_string()]);
        assert_eq!(settings.folder, "orders");
        assert!(settings.strict);
        assert_eq!(settings.separator, ".");
    }

    #[test]
    #[serial]
    fn test_load_config_file_with_defaults() {
        env::remove_var("TEST_MISSING_FOLDER");

        let content = "folder: ${TEST_MISSING_FOLDER:-fallback}\n";

        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), content).unwrap();

        let settings = load_config_file(temp_file.path()).unwrap();
        assert_eq!(settings.folder, "fallback");
    }

    #[test]
    #[serial]
    fn test_load_config_file_missing_required_var() {
        env::remove_var("TEST_REQUIRED_FOLDER");

        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "folder: ${TEST_REQUIRED_FOLDER}\n").unwrap();

        let result = load_config_file(temp_file.path());
        assert_matches!(result, Err(ConfigError::InterpolationError(_)));
    }

    #[test]
    fn test_load_json_config_file() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(
            temp_file.path(),
            r#"{"folder": "json", "separator": "/", "timeout_ms": 250}"#,
        )
        .unwrap();

        let settings = load_config_file(temp_file.path()).unwrap();
        assert_eq!(settings.folder, "json");
        assert_eq!(settings.separator, "/");
        assert_eq!(settings.timeout_ms, 250);
    }

    #[test]
    fn test_extension_selects_format() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("hydrator.json");
        fs::write(&json_path, r#"{"folder": "from-json"}"#).unwrap();
        assert_eq!(load_config_file(&json_path).unwrap().folder, "from-json");

        // YAML that is not JSON is reported as a JSON error for a .json file.
        let mislabeled = dir.path().join("mislabeled.json");
        fs::write(&mislabeled, "folder: yaml-only\n").unwrap();
        assert_matches!(
            load_config_file(&mislabeled),
            Err(ConfigError::JsonError(_))
        );

        let yaml_path = dir.path().join("hydrator.YML");
        fs::write(&yaml_path, "folder: [unclosed\n").unwrap();
        assert_matches!(load_config_file(&yaml_path), Err(ConfigError::YamlError(_)));
    }

    #[test]
    fn test_unknown_extension_reports_both_parse_errors() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "folder: [unclosed\n").unwrap();

        assert_matches!(
            load_config_file(temp_file.path()),
            Err(ConfigError::ParseError { .. })
        );
    }

    #[test]
    fn test_invalid_settings_fail_validation() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "endpoints: []\n").unwrap();

        let result = load_config_file(temp_file.path());
        assert_matches!(result, Err(ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_save_and_load_config_file() {
        let temp_file = NamedTempFile::new().unwrap();

        let settings = HydratorSettings {
            folder: "saved".to_string(),
            debug: true,
            ..Default::default()
        };

        save_config_file(&settings, temp_file.path()).unwrap();
        let loaded = load_config_file(temp_file.path()).unwrap();

        assert_eq!(loaded, settings);
    }
}
