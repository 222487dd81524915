//! Command dispatch and the text each command prints.
//!
//! The report builders return strings so they can be tested without a
//! terminal; only [`run`] touches stdout, stderr and files.

use crate::args::{Cli, Command};
use crate::settings::{self, AppSettings};
use crate::templates::load_user_templates;
use anyhow::Context;
use indexmap::IndexMap;
use medinotes_core::{FieldValue, NoteTemplate, TemplateRegistry, Validation};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

/// Exit status of `validate` when required fields are missing.
const EXIT_INVALID: u8 = 2;

pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = settings::load_settings();

    match cli.command {
        Command::Config { init } => {
            if init {
                init_settings(&settings)?;
            }
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Command::Types => {
            let registry = load_registry(&settings)?;
            print!("{}", types_report(&registry));
        }
        Command::Fields { template } => {
            let registry = load_registry(&settings)?;
            print!("{}", fields_report(&registry, &template)?);
        }
        Command::Validate { template, input } => {
            let registry = load_registry(&settings)?;
            let note = build_note(&registry, &template, read_fields(&input)?)?;
            let validation = note.validate();
            print!("{}", validation_report(&validation));
            if !validation.is_valid {
                return Ok(ExitCode::from(EXIT_INVALID));
            }
        }
        Command::Render { template, input, output } => {
            let registry = load_registry(&settings)?;
            let note = build_note(&registry, &template, read_fields(&input)?)?;
            let validation = note.validate();
            if !validation.is_valid {
                eprintln!(
                    "Warning: {} note is missing required fields: {}",
                    note.template_type(),
                    validation.missing_fields.join(", ")
                );
            }
            write_output(&note.render(), output.as_deref())?;
        }
        Command::Export { template, input, output } => {
            let registry = load_registry(&settings)?;
            let note = build_note(&registry, &template, read_fields(&input)?)?;
            let json = note.export_snapshot().to_json()?;
            write_output(&format!("{json}\n"), output.as_deref())?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Built-in templates, then user templates, with the configured render options.
pub fn load_registry(settings: &AppSettings) -> anyhow::Result<TemplateRegistry> {
    let mut registry = TemplateRegistry::new().context("Failed to load built-in templates")?;
    registry.set_options(settings.render.clone());
    load_user_templates(&mut registry, Path::new(&settings.template_directory));
    Ok(registry)
}

fn init_settings(settings: &AppSettings) -> anyhow::Result<()> {
    let path = settings::settings_file_path();
    if path.exists() {
        eprintln!("Settings already exist at {}", path.display());
        return Ok(());
    }
    settings::save_settings_to(&path, settings)?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}

/// Reads a JSON object of field values from `source`, or stdin when `source` is `-`.
pub fn read_fields(source: &str) -> anyhow::Result<IndexMap<String, FieldValue>> {
    let json = if source == "-" {
        io::read_to_string(io::stdin()).context("Failed to read field values from stdin")?
    } else {
        fs::read_to_string(source).with_context(|| format!("Failed to read {source}"))?
    };
    parse_fields(&json).with_context(|| format!("Invalid field values in {source}"))
}

/// Each value must be a string or an array of strings.
pub fn parse_fields(json: &str) -> anyhow::Result<IndexMap<String, FieldValue>> {
    Ok(serde_json::from_str(json)?)
}

pub fn build_note(
    registry: &TemplateRegistry,
    template: &str,
    fields: IndexMap<String, FieldValue>,
) -> anyhow::Result<NoteTemplate> {
    let mut note = registry.create(template)?;
    note.set_fields(fields);
    Ok(note)
}

pub fn types_report(registry: &TemplateRegistry) -> String {
    let mut out = String::new();
    for tag in registry.list_types() {
        if let Ok(schema) = registry.get_schema(&tag) {
            out.push_str(&format!("{:<12}{}\n", schema.name, schema.title));
        }
    }
    out
}

pub fn fields_report(registry: &TemplateRegistry, template: &str) -> anyhow::Result<String> {
    let schema = registry.get_schema(template)?;
    let mut out = format!("{} ({})\n", schema.title, schema.name);
    if !schema.description.is_empty() {
        out.push_str(&format!("{}\n", schema.description));
    }
    for (heading, fields) in [("Required", &schema.required), ("Optional", &schema.optional)] {
        out.push_str(&format!("\n{heading}:\n"));
        if fields.is_empty() {
            out.push_str("  (none)\n");
        }
        for field in fields {
            out.push_str(&format!("  {field}\n"));
        }
    }
    Ok(out)
}

pub fn validation_report(validation: &Validation) -> String {
    if validation.is_valid {
        return "valid\n".to_string();
    }
    let mut out = String::from("missing required fields:\n");
    for field in &validation.missing_fields {
        out.push_str(&format!("  - {field}\n"));
    }
    out
}

fn write_output(text: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}
