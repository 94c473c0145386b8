//! YAML loader with `!secret` and `!env_var` tag support

use crate::error::{ConfigError, ConfigResult};
use crate::secrets::Secrets;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Loads YAML and substitutes custom tags
pub struct YamlLoader {
    secrets: Secrets,
}

impl YamlLoader {
    /// Create a loader reading `secrets.yaml` from `config_dir`
    pub fn new(config_dir: &Path) -> ConfigResult<Self> {
        Ok(Self {
            secrets: Secrets::load(config_dir)?,
        })
    }

    pub fn with_secrets(secrets: Secrets) -> Self {
        Self { secrets }
    }

    /// Load and process a YAML file
    pub fn load_file(&self, path: &Path) -> ConfigResult<Value> {
        debug!("Loading YAML file: {:?}", path);
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.load_string(&content, path)
    }

    /// Load and process YAML from a string
    pub fn load_string(&self, content: &str, source_path: &Path) -> ConfigResult<Value> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseYaml {
            path: source_path.to_path_buf(),
            source: e,
        })?;
        self.process_value(value)
    }

    fn process_value(&self, value: Value) -> ConfigResult<Value> {
        match value {
            Value::Tagged(tagged) => self.process_tagged(*tagged),
            Value::Mapping(map) => {
                let mut result = serde_yaml::Mapping::new();
                for (k, v) in map {
                    result.insert(self.process_value(k)?, self.process_value(v)?);
                }
                Ok(Value::Mapping(result))
            }
            Value::Sequence(seq) => seq
                .into_iter()
                .map(|v| self.process_value(v))
                .collect::<ConfigResult<Vec<_>>>()
                .map(Value::Sequence),
            _ => Ok(value),
        }
    }

    fn process_tagged(&self, tagged: serde_yaml::value::TaggedValue) -> ConfigResult<Value> {
        let tag = tagged.tag.to_string();
        trace!("Processing tag '{}' with value {:?}", tag, tagged.value);

        match tag.as_str() {
            "!secret" => {
                let key = tag_argument(&tag, tagged.value)?;
                let secret = self.secrets.get(&key)?;
                debug!("Substituted secret: {}", key);
                Ok(Value::String(secret.to_string()))
            }
            "!env_var" => {
                let var = tag_argument(&tag, tagged.value)?;
                let value = std::env::var(&var)
                    .map_err(|_| ConfigError::EnvVarNotFound { var: var.clone() })?;
                debug!("Substituted env var: {}", var);
                Ok(Value::String(value))
            }
            _ => {
                // Unknown tag: keep it, but still substitute inside it
                let processed = self.process_value(tagged.value)?;
                Ok(Value::Tagged(Box::new(serde_yaml::value::TaggedValue {
                    tag: tagged.tag,
                    value: processed,
                })))
            }
        }
    }
}

fn tag_argument(tag: &str, value: Value) -> ConfigResult<String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(ConfigError::InvalidValue {
            key: tag.to_string(),
            reason: "argument must be a string".to_string(),
        }),
    }
}

/// Load a YAML file, reading secrets from the file's directory
pub fn load_yaml(path: impl AsRef<Path>) -> ConfigResult<Value> {
    let path = path.as_ref();
    let config_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    YamlLoader::new(&config_dir)?.load_file(path)
}
