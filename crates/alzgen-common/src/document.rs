//! Reading structured reference documents from disk.
//!
//! The format is chosen by file extension: `.yaml`/`.yml` go through
//! serde_yaml, everything else is treated as JSON.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{AlzgenError, Result};

/// Document formats accepted for reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }
}

/// Parse a document from an in-memory string.
pub fn parse_str<T: DeserializeOwned>(content: &str, format: DocumentFormat) -> Result<T> {
    match format {
        DocumentFormat::Json => serde_json::from_str(content)
            .map_err(|e| AlzgenError::config(format!("malformed JSON document: {e}"))),
        DocumentFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| AlzgenError::config(format!("malformed YAML document: {e}"))),
    }
}

/// Read and parse a reference document. Any failure is a configuration error.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AlzgenError::config(format!("cannot read {}: {e}", path.display()))
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "read reference document");
    parse_str(&content, DocumentFormat::from_path(path)).map_err(|e| match e {
        AlzgenError::Configuration(msg) => {
            AlzgenError::config(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("rules.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("rules.YML")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("rules.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("rules")), DocumentFormat::Json);
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = read_document::<HashMap<String, f64>>(Path::new("/nonexistent/rules.json"))
            .unwrap_err();
        assert!(matches!(err, AlzgenError::Configuration(_)));
    }

    #[test]
    fn test_malformed_file_names_path() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = read_document::<HashMap<String, f64>>(file.path()).unwrap_err();
        let AlzgenError::Configuration(msg) = err else {
            panic!("expected configuration error");
        };
        assert!(msg.contains(&file.path().display().to_string()));
    }
}
