use crate::error::TranslationError;
use crate::types::FieldType;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

/// Field name to field type mapping, fixed for the lifetime of a translator.
///
/// Lookups are exact and case-sensitive. A missing field is only an error once
/// a comparison actually references it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct FieldTypeRegistry {
    fields: HashMap<String, FieldType>,
}

impl FieldTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, replacing any previous type for `name`.
    pub fn with_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.insert(name.into(), field_type);
        self
    }

    /// Build from `name -> "TEXT" | "TAG" | "NUMERIC"` pairs, the shape field
    /// schemas are usually written in.
    pub fn from_type_names<I, K, V>(entries: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut fields = HashMap::new();
        for (name, type_name) in entries {
            let name = name.into();
            let field_type = FieldType::from_str(type_name.as_ref())
                .map_err(|e| anyhow::anyhow!("Field {}: {}", name, e))?;
            fields.insert(name, field_type);
        }
        Ok(Self { fields })
    }

    pub fn resolve(&self, field: &str) -> Result<FieldType, TranslationError> {
        self.fields
            .get(field)
            .copied()
            .ok_or_else(|| TranslationError::UnknownField(field.to_string()))
    }

    pub fn get(&self, field: &str) -> Option<FieldType> {
        self.fields.get(field).copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Entries sorted by field name.
    pub fn entries(&self) -> Vec<(&str, FieldType)> {
        let mut entries: Vec<(&str, FieldType)> = self
            .fields
            .iter()
            .map(|(name, field_type)| (name.as_str(), *field_type))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Combine two registries; entries from `other` win on conflict.
    pub fn merged(mut self, other: FieldTypeRegistry) -> Self {
        self.fields.extend(other.fields);
        self
    }
}

impl<K: Into<String>> FromIterator<(K, FieldType)> for FieldTypeRegistry {
    fn from_iter<T: IntoIterator<Item = (K, FieldType)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, field_type)| (name.into(), field_type))
                .collect(),
        }
    }
}
