//! Configuration for code generation and the build driver.
//!
//! Loaded from `dipper.toml`:
//!
//! ```toml
//! [codegen]
//! dialect = "postgres"       # postgres | mysql | sqlite
//! runtime_crate = "dipper"   # path generated code uses for runtime helpers
//!
//! [build]
//! queries_dir = "queries"
//! index_file = "dipper_queries.rs"
//! ```
//!
//! Lookup order: an explicit path, `./dipper.toml`, then
//! `<config dir>/dipper/config.toml`, then built-in defaults.
//! `DIPPER_DIALECT` and `DIPPER_QUERIES_DIR` override file values.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DipperError, DipperResult};

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "dipper.toml";

/// Target database; decides placeholder style and sqlx types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgres,
    #[serde(rename = "mysql")]
    MySql,
    Sqlite,
}

impl Dialect {
    /// sqlx database type.
    pub fn database(self) -> &'static str {
        match self {
            Dialect::Postgres => "sqlx::Postgres",
            Dialect::MySql => "sqlx::MySql",
            Dialect::Sqlite => "sqlx::Sqlite",
        }
    }

    /// sqlx connection type.
    pub fn connection(self) -> &'static str {
        match self {
            Dialect::Postgres => "sqlx::PgConnection",
            Dialect::MySql => "sqlx::MySqlConnection",
            Dialect::Sqlite => "sqlx::SqliteConnection",
        }
    }

    /// sqlx row type, used for untyped queries.
    pub fn row(self) -> &'static str {
        match self {
            Dialect::Postgres => "sqlx::postgres::PgRow",
            Dialect::MySql => "sqlx::mysql::MySqlRow",
            Dialect::Sqlite => "sqlx::sqlite::SqliteRow",
        }
    }

    /// Placeholder for the parameter at `index` (0-based).
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", index + 1),
            Dialect::MySql => "?".to_string(),
            Dialect::Sqlite => format!("?{}", index + 1),
        }
    }

    /// Whether every occurrence needs its own bound value.
    pub fn binds_per_occurrence(self) -> bool {
        matches!(self, Dialect::MySql)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::MySql => write!(f, "mysql"),
            Dialect::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for Dialect {
    type Err = DipperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "sqlite" => Ok(Dialect::Sqlite),
            other => Err(DipperError::Config(format!(
                "unknown dialect '{other}'. Expected: postgres, mysql, or sqlite"
            ))),
        }
    }
}

/// Settings that shape the generated code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    pub dialect: Dialect,
    /// Crate path generated code uses to reach [`crate::runtime`].
    pub runtime_crate: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            runtime_crate: "dipper".to_string(),
        }
    }
}

/// Settings for the build-script driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory scanned for `.sql` files, relative to the manifest.
    pub queries_dir: PathBuf,
    /// File written next to the units that includes all of them.
    pub index_file: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            queries_dir: PathBuf::from("queries"),
            index_file: "dipper_queries.rs".to_string(),
        }
    }
}

/// Complete `dipper.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub codegen: CodegenConfig,
    pub build: BuildConfig,
}

impl Config {
    /// Parse config from TOML text.
    pub fn from_toml(input: &str) -> DipperResult<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Read config from a file.
    pub fn from_file(path: &Path) -> DipperResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DipperError::io(path, e))?;
        Self::from_toml(&content)
    }

    /// Resolve config using the standard lookup order and environment overrides.
    pub fn load(explicit: Option<&Path>) -> DipperResult<Self> {
        let mut config = match Self::locate(explicit) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// First config file that exists, if any. An explicit path is returned as-is.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        let local = PathBuf::from(CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join("dipper").join("config.toml"))
            .filter(|path| path.is_file())
    }

    /// Apply `DIPPER_*` overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> DipperResult<()> {
        if let Some(dialect) = lookup("DIPPER_DIALECT") {
            self.codegen.dialect = dialect.parse()?;
        }
        if let Some(dir) = lookup("DIPPER_QUERIES_DIR") {
            self.build.queries_dir = PathBuf::from(dir);
        }
        Ok(())
    }
}
