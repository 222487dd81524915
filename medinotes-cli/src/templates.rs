//! User template files.
//!
//! Every `*.json` file in the template directory holds one template
//! definition. Files load in filename order after the built-in templates, so a
//! user file may replace a built-in type by reusing its name.

use medinotes_core::TemplateRegistry;
use std::fs;
use std::path::Path;

/// Registers every readable `*.json` definition in `dir`.
///
/// A missing directory registers nothing. Files that cannot be read or fail
/// validation are logged and skipped. Returns the tags that were registered.
pub fn load_user_templates(registry: &mut TemplateRegistry, dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("template directory {} not loaded: {e}", dir.display());
            return Vec::new();
        }
    };

    let mut paths: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    paths.sort();

    let mut loaded = Vec::new();
    for path in paths {
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) => {
                log::warn!("skipping {}: {e}", path.display());
                continue;
            }
        };
        match registry.register_json(&source) {
            Ok(tag) => {
                log::info!("loaded template '{tag}' from {}", path.display());
                loaded.push(tag);
            }
            Err(e) => log::warn!("skipping {}: {}", path.display(), e.user_message()),
        }
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CLINIC: &str = r#"{ "name": "clinic", "required": ["reason"], "optional": ["plan"] }"#;

    #[test]
    fn test_missing_directory_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let mut registry = TemplateRegistry::new().unwrap();
        let loaded = load_user_templates(&mut registry, &dir.path().join("absent"));
        assert!(loaded.is_empty());
        assert_eq!(registry.list_types().len(), 3);
    }

    #[test]
    fn test_loads_json_files_and_skips_others() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("clinic.json"), CLINIC).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a template").unwrap();

        let mut registry = TemplateRegistry::new().unwrap();
        let loaded = load_user_templates(&mut registry, dir.path());

        assert_eq!(loaded, vec!["clinic"]);
        assert!(registry.schema_exists("clinic"));
    }

    #[test]
    fn test_invalid_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a_broken.json"), "{ nope").unwrap();
        fs::write(
            dir.path().join("b_overlap.json"),
            r#"{ "name": "bad", "required": ["x"], "optional": ["x"] }"#,
        )
        .unwrap();
        fs::write(dir.path().join("c_clinic.json"), CLINIC).unwrap();

        let mut registry = TemplateRegistry::new().unwrap();
        let loaded = load_user_templates(&mut registry, dir.path());

        assert_eq!(loaded, vec!["clinic"]);
        assert!(!registry.schema_exists("bad"));
    }

    #[test]
    fn test_user_file_replaces_builtin() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("consult.json"),
            r#"{ "name": "consult", "title": "CLINIC CONSULT", "required": ["reason"] }"#,
        )
        .unwrap();

        let mut registry = TemplateRegistry::new().unwrap();
        load_user_templates(&mut registry, dir.path());

        let schema = registry.get_schema("consult").unwrap();
        assert_eq!(schema.title, "CLINIC CONSULT");
        assert_eq!(schema.required, vec!["reason"]);
    }
}
