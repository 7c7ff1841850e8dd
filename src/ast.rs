//! Data model shared by the extractor, the assembler and the build driver.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DipperError, DipperResult};

/// One `.sql` file handed to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    /// File name without extension; the default query name.
    pub name: String,
    /// File name with extension, as shown in generated docs.
    pub file_name: String,
    /// Raw file content.
    pub text: String,
}

impl SourceUnit {
    /// Build a unit from a file name and its content.
    pub fn new(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let name = Path::new(&file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone());

        Self {
            name,
            file_name,
            text: text.into(),
        }
    }

    /// Read a unit from disk.
    pub fn from_path(path: &Path) -> DipperResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| DipperError::io(path, e))?;
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(file_name, text))
    }
}

/// A `@name:type` parameter reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// The declared SQL type token, as written.
    pub sql_type: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
        }
    }
}

/// Everything the assembler needs to know about one query file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryMetadata {
    /// `-- name:` value, or the file base name.
    pub query_name: String,
    /// `-- result:` value; `None` means untyped rows.
    pub result_type: Option<String>,
    /// Parameters in first-seen order, one per name.
    pub parameters: Vec<Parameter>,
    /// The file text with every `@name:type` rewritten to `@name`.
    pub cleaned_sql: String,
    /// File the metadata came from.
    pub source_file: String,
}

/// Output of the assembler for one query file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedUnit {
    /// `{query_name}Query`.
    pub type_name: String,
    /// `{type_name}.g.rs`.
    pub file_name: String,
    /// File the unit was generated from.
    pub source_file: String,
    /// Generated Rust source.
    pub source: String,
}
