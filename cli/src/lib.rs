pub mod argparse;
pub mod runner;
pub mod utils;

/// Error type for CLI setup failures
#[derive(Debug)]
pub enum CliError {
    ConfigLoad(anyhow::Error),
    InvalidFieldSpec(String),
    InvalidFieldType(anyhow::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::ConfigLoad(e) => {
                write!(
                    f,
                    "Failed to load config: {e:#}\n\nThe file must be YAML (or JSON with a .json extension), e.g.\n  fields:\n    name: TEXT\n    role: TAG\n    age: NUMERIC"
                )
            }
            CliError::InvalidFieldSpec(spec) => {
                write!(
                    f,
                    "Invalid field spec: '{}'\n\nUse --field NAME=TYPE where TYPE is TEXT, TAG or NUMERIC.",
                    spec
                )
            }
            CliError::InvalidFieldType(e) => {
                write!(f, "Invalid --field override: {e:#}")
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigLoad(e) => Some(e.as_ref()),
            CliError::InvalidFieldSpec(_) => None,
            CliError::InvalidFieldType(e) => Some(e.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load_display_keeps_cause() {
        let error = CliError::ConfigLoad(
            anyhow::anyhow!("No such file").context("Failed to read config file: x.yaml"),
        );
        let display_msg = format!("{}", error);

        assert!(display_msg.contains("Failed to load config"));
        assert!(display_msg.contains("x.yaml"));
        assert!(display_msg.contains("No such file"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_invalid_field_spec_display() {
        let error = CliError::InvalidFieldSpec("role".to_string());
        let display_msg = format!("{}", error);

        assert!(display_msg.contains("'role'"));
        assert!(display_msg.contains("--field NAME=TYPE"));
        assert!(std::error::Error::source(&error).is_none());
    }

    #[test]
    fn test_invalid_field_type_display() {
        let error = CliError::InvalidFieldType(anyhow::anyhow!("Field loc: Invalid field type: GEO"));
        let display_msg = format!("{}", error);

        assert!(display_msg.contains("--field"));
        assert!(display_msg.contains("GEO"));
    }
}
