//! Build-script driver.
//!
//! Turns every `.sql` file under the queries directory into a `.g.rs`
//! unit in `OUT_DIR`, plus an index that includes them all.
//!
//! # Usage in build.rs
//!
//! ```ignore
//! fn main() {
//!     dipper::build::generate().expect("query generation failed");
//! }
//! ```
//!
//! ```ignore
//! // src/queries.rs
//! include!(concat!(env!("OUT_DIR"), "/dipper_queries.rs"));
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ast::{GeneratedUnit, SourceUnit};
use crate::config::{Config, CONFIG_FILE};
use crate::error::{DipperError, DipperResult};
use crate::parser;
use crate::transpiler;

/// Cooperative cancellation flag shared with the host.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask generation to stop before the next file.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What [`Generator::write`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    /// Units written because they were new or changed.
    pub written: usize,
    /// Units left alone because their content was already up to date.
    pub unchanged: usize,
    /// Path of the index file.
    pub index: PathBuf,
}

/// Generates query units for a set of files.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: Config,
}

impl Generator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// All `.sql` files under `dir`, sorted by path. A missing directory yields none.
    pub fn collect(&self, dir: &Path) -> DipperResult<Vec<SourceUnit>> {
        let mut paths = Vec::new();
        if dir.is_dir() {
            find_sql_files(dir, &mut paths)?;
        } else {
            tracing::warn!(dir = %dir.display(), "queries directory not found");
        }
        paths.sort();

        paths
            .iter()
            .map(|path| {
                tracing::debug!(path = %path.display(), "found query file");
                SourceUnit::from_path(path)
            })
            .collect()
    }

    /// Generate the unit for one file.
    pub fn generate(&self, unit: &SourceUnit) -> GeneratedUnit {
        let metadata = parser::extract(unit);
        tracing::debug!(
            file = %unit.file_name,
            query = %metadata.query_name,
            params = metadata.parameters.len(),
            typed = metadata.result_type.is_some(),
            "generating query"
        );
        transpiler::assemble(&metadata, &self.config.codegen)
    }

    /// Generate units for all files, checking `cancel` before each one.
    ///
    /// Each unit depends only on its own file. On cancellation nothing is
    /// returned for the remaining files.
    pub fn generate_all(
        &self,
        units: &[SourceUnit],
        cancel: &CancelToken,
    ) -> DipperResult<Vec<GeneratedUnit>> {
        let mut generated = Vec::with_capacity(units.len());
        for unit in units {
            if cancel.is_cancelled() {
                tracing::info!(done = generated.len(), total = units.len(), "generation cancelled");
                return Err(DipperError::Cancelled);
            }
            generated.push(self.generate(unit));
        }
        Ok(generated)
    }

    /// Write units and the index file into `out_dir`.
    ///
    /// Fails before writing anything if two units share a type name. Files
    /// whose content is unchanged are not rewritten.
    pub fn write(&self, units: &[GeneratedUnit], out_dir: &Path) -> DipperResult<WriteSummary> {
        let mut by_name: BTreeMap<&str, &GeneratedUnit> = BTreeMap::new();
        for unit in units {
            if let Some(first) = by_name.insert(&unit.type_name, unit) {
                return Err(DipperError::DuplicateQuery {
                    type_name: unit.type_name.clone(),
                    first: first.source_file.clone(),
                    second: unit.source_file.clone(),
                });
            }
        }

        fs::create_dir_all(out_dir).map_err(|e| DipperError::io(out_dir, e))?;

        let mut summary = WriteSummary {
            written: 0,
            unchanged: 0,
            index: out_dir.join(&self.config.build.index_file),
        };

        for unit in by_name.values() {
            if write_if_changed(&out_dir.join(&unit.file_name), &unit.source)? {
                summary.written += 1;
            } else {
                summary.unchanged += 1;
            }
        }

        let index = index_source(by_name.values().map(|u| u.file_name.as_str()));
        write_if_changed(&summary.index, &index)?;

        tracing::info!(
            written = summary.written,
            unchanged = summary.unchanged,
            out_dir = %out_dir.display(),
            "query units up to date"
        );
        Ok(summary)
    }
}

/// Render the index that includes every unit from `OUT_DIR`.
pub fn index_source<'a>(file_names: impl IntoIterator<Item = &'a str>) -> String {
    let mut index = String::from("// @generated by dipper. Do not edit.\n\n");
    for file_name in file_names {
        index.push_str(&format!(
            "include!(concat!(env!(\"OUT_DIR\"), \"/{file_name}\"));\n"
        ));
    }
    index
}

/// Build-script entry point.
///
/// Reads `dipper.toml` from the manifest directory (if present) and writes
/// into `OUT_DIR`. Prints the `cargo:rerun-if-changed` lines Cargo needs.
pub fn generate() -> DipperResult<WriteSummary> {
    let manifest_dir = env_path("CARGO_MANIFEST_DIR")?;
    let out_dir = env_path("OUT_DIR")?;

    let config_path = manifest_dir.join(CONFIG_FILE);
    println!("cargo:rerun-if-changed={}", config_path.display());
    println!("cargo:rerun-if-env-changed=DIPPER_DIALECT");
    println!("cargo:rerun-if-env-changed=DIPPER_QUERIES_DIR");

    let mut config = if config_path.is_file() {
        Config::from_file(&config_path)?
    } else {
        Config::default()
    };
    config.apply_overrides(|key| std::env::var(key).ok())?;

    generate_with(config, &manifest_dir, &out_dir, &CancelToken::new())
}

/// Collect, generate and write using an explicit config and directories.
pub fn generate_with(
    config: Config,
    manifest_dir: &Path,
    out_dir: &Path,
    cancel: &CancelToken,
) -> DipperResult<WriteSummary> {
    let queries_dir = manifest_dir.join(&config.build.queries_dir);
    // Cargo rescans a directory recursively.
    println!("cargo:rerun-if-changed={}", queries_dir.display());

    let generator = Generator::new(config);
    let units = generator.collect(&queries_dir)?;
    let generated = generator.generate_all(&units, cancel)?;
    generator.write(&generated, out_dir)
}

fn env_path(key: &'static str) -> DipperResult<PathBuf> {
    std::env::var_os(key)
        .map(PathBuf::from)
        .ok_or(DipperError::MissingEnv(key))
}

fn find_sql_files(dir: &Path, paths: &mut Vec<PathBuf>) -> DipperResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| DipperError::io(dir, e))?;

    for entry in entries {
        let path = entry.map_err(|e| DipperError::io(dir, e))?.path();
        if path.is_dir() {
            find_sql_files(&path, paths)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"))
        {
            paths.push(path);
        }
    }

    Ok(())
}

/// Returns whether the file was written.
fn write_if_changed(path: &Path, content: &str) -> DipperResult<bool> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == content) {
        return Ok(false);
    }
    fs::write(path, content).map_err(|e| DipperError::io(path, e))?;
    Ok(true)
}
