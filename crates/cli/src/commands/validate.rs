//! Validate command
//!
//! Runs the full form validation over a recorded values file, the same
//! checks a form performs when it is submitted.

use crate::output;
use anyhow::Context;
use civic_forms::{EngineConfig, FormValues, ValidationErrors, load_schema};
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ValidateArgs {
    /// Schema file (.json or .toml)
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Values file (.json or .toml) mapping field names to values
    #[arg(long, value_name = "FILE")]
    pub values: PathBuf,
}

/// Read a values file; dot-path keys such as `entries.0.debit` are kept flat
pub fn load_values(path: &Path) -> anyhow::Result<FormValues> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read values file {}", path.display()))?;
    let values = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => {
            let table: toml::Table = toml::from_str(&text)
                .with_context(|| format!("Invalid TOML in {}", path.display()))?;
            serde_json::from_value(serde_json::to_value(table)?)?
        }
        _ => serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?,
    };
    Ok(values)
}

/// Validate `values` against the schema file
pub fn run(
    schema_path: &Path,
    values: &FormValues,
    config: &EngineConfig,
) -> anyhow::Result<Result<(), ValidationErrors>> {
    let schema = load_schema(schema_path)?;
    let validation = schema.validation_schema(config)?;
    Ok(validation.validate(&schema.fields, values))
}

pub fn execute(args: ValidateArgs, config: &EngineConfig) -> anyhow::Result<()> {
    let values = load_values(&args.values)?;
    output::info(&format!(
        "Validating {} against {}",
        args.values.display(),
        args.schema.display()
    ));

    match run(&args.schema, &values, config)? {
        Ok(()) => {
            output::success("All fields are valid");
            Ok(())
        }
        Err(errors) => {
            for (field, message) in &errors.fields {
                output::error(&format!("{}: {}", field, message));
            }
            for message in &errors.form {
                output::error(message);
            }
            anyhow::bail!("{} validation errors", errors.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
name = "collection_receipt"

[[fields]]
name = "payor"
kind = "text"
required = true

[[fields]]
name = "amount"
kind = "number"
required = true
min = 0
"#;

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_valid_values() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "receipt.toml", SCHEMA);
        let values = write(dir.path(), "values.json", r#"{"payor": "Juan Cruz", "amount": 150}"#);

        let values = load_values(&values).unwrap();
        let result = run(&schema, &values, &EngineConfig::default()).unwrap();
        assert!(result.is_ok());
    }

    #[test]
    fn test_missing_required_field() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(dir.path(), "receipt.toml", SCHEMA);
        let values = write(dir.path(), "values.toml", "amount = 150\n");

        let values = load_values(&values).unwrap();
        let errors = run(&schema, &values, &EngineConfig::default())
            .unwrap()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.get("payor").is_some());
    }

    #[test]
    fn test_unreadable_values() {
        let dir = tempfile::tempdir().unwrap();
        let values = write(dir.path(), "values.json", "{ not json");
        assert!(load_values(&values).is_err());
    }
}
