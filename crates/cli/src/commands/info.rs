//! Info command

use crate::output;
use civic_forms::{FormSchema, load_schema};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args)]
pub struct InfoArgs {
    /// Schema file (.json or .toml)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// One table row per field: name, kind, label, required, options
pub fn field_rows(schema: &FormSchema) -> Vec<Vec<String>> {
    schema
        .fields
        .iter()
        .map(|field| {
            vec![
                field.name.clone(),
                field.kind.as_tag().to_string(),
                field.display_label(),
                if field.required { "yes" } else { "" }.to_string(),
                if field.kind.is_choice() {
                    field.options.len().to_string()
                } else {
                    String::new()
                },
            ]
        })
        .collect()
}

pub fn execute(args: InfoArgs) -> anyhow::Result<()> {
    let schema = load_schema(&args.file)?;

    let title = if schema.title.is_empty() {
        schema.name.clone()
    } else {
        format!("{} ({})", schema.title, schema.name)
    };
    println!("{}", title.cyan().bold());
    println!();

    output::table(
        &["Name", "Kind", "Label", "Required", "Options"],
        &field_rows(&schema),
    );

    if !schema.rules.is_empty() {
        println!();
        println!("{}", "Rules".bold());
        for rule in &schema.rules {
            println!("  {} on {}", rule.tag(), rule.fields().join(", "));
        }
    }

    for warning in schema.warnings() {
        output::warning(&warning);
    }
    Ok(())
}
