//! SQL type tokens to Rust types, and Rust identifier rules for emitted names.

/// How a parameter value is handed to `sqlx`'s `bind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindKind {
    /// `.bind(&input.field)`
    Ref,
    /// `.bind(input.field.to_string())`, for types sqlx cannot encode.
    Display,
}

/// A row of the type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RustType {
    /// Lower-case SQL token.
    pub sql: &'static str,
    /// Fully-qualified Rust type.
    pub rust: &'static str,
    pub bind: BindKind,
}

const fn row(sql: &'static str, rust: &'static str) -> RustType {
    RustType {
        sql,
        rust,
        bind: BindKind::Ref,
    }
}

/// Fallback for unknown tokens.
pub const TEXT_TYPE: RustType = row("text", "String");

/// The fixed SQL to Rust type table.
pub static SQL_TYPES: &[RustType] = &[
    TEXT_TYPE,
    row("uuid", "sqlx::types::Uuid"),
    row("int4", "i32"),
    row("int8", "i64"),
    row("numeric", "sqlx::types::Decimal"),
    row("bool", "bool"),
    row("timestamp", "sqlx::types::chrono::NaiveDateTime"),
    row("timestamptz", "sqlx::types::chrono::DateTime<sqlx::types::chrono::Utc>"),
    row("json", "String"),
    row("jsonb", "String"),
    row("date", "sqlx::types::chrono::NaiveDate"),
    row("time", "sqlx::types::chrono::NaiveTime"),
    row("float4", "f32"),
    row("float8", "f64"),
    row("bytea", "Vec<u8>"),
    RustType {
        sql: "char",
        rust: "char",
        bind: BindKind::Display,
    },
    row("varchar", "String"),
];

/// Resolve a declared SQL type token. Case-insensitive; unknown tokens map to `String`.
pub fn resolve_type(sql_type: &str) -> &'static RustType {
    SQL_TYPES
        .iter()
        .find(|t| t.sql.eq_ignore_ascii_case(sql_type))
        .unwrap_or(&TEXT_TYPE)
}

/// Strict and reserved keywords across editions, including `gen` (2024).
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "Self", "super", "_"];

/// Turn a parameter name into a usable field identifier.
///
/// Names are kept verbatim where possible: keywords become raw identifiers
/// (`r#type`), the few keywords that cannot be raw get a `_` suffix, and a
/// leading digit gets a `_` prefix.
pub fn field_ident(name: &str) -> String {
    if NON_RAW_KEYWORDS.contains(&name) {
        return format!("{name}_");
    }
    if KEYWORDS.contains(&name) {
        return format!("r#{name}");
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{name}");
    }
    name.to_string()
}

/// Turn a query name into a usable type-name stem.
pub fn type_ident(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Render a `-- result:` reference as a Rust path (`Demo.Product` -> `Demo::Product`).
pub fn result_path(reference: &str) -> String {
    if reference.contains("::") {
        reference.to_string()
    } else {
        reference.replace('.', "::")
    }
}
