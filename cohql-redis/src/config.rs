use crate::registry::FieldTypeRegistry;
use crate::translator::{Translator, TranslatorOptions};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Field schema plus translator options, as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fields: FieldTypeRegistry,
    #[serde(default)]
    pub options: TranslatorOptions,
}

impl Config {
    /// Load from a YAML file, or JSON when the extension is `.json`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::debug!(
            "Loaded {} field types from {}",
            config.fields.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn translator(&self) -> Translator {
        Translator::new(self.fields.clone()).with_options(self.options.clone())
    }
}
