//! # dipper: typed sqlx wrappers from annotated SQL files
//!
//! Write plain `.sql` files with a few comment directives and typed
//! parameters; dipper turns each one into a Rust unit with the SQL text,
//! an input struct, and `sqlx` helpers.
//!
//! ## Quick Example
//!
//! ```text
//! -- name: SelectProducts
//! -- result: crate::models::Product
//! select * from products
//! where id = @Id:uuid;
//! ```
//!
//! ```rust,ignore
//! // build.rs
//! fn main() {
//!     dipper::build::generate().expect("query generation failed");
//! }
//!
//! // src/queries.rs
//! include!(concat!(env!("OUT_DIR"), "/dipper_queries.rs"));
//!
//! // anywhere
//! let input = SelectProductsQueryInput { Id: product_id };
//! let products = SelectProductsQuery::query_async(&mut conn, &input, None, None).await?;
//! ```
//!
//! ## Directives
//!
//! | Syntax            | Meaning                                   |
//! |-------------------|-------------------------------------------|
//! | `-- name: X`      | Emit `XQuery` (default: file base name)   |
//! | `-- result: T`    | Map rows to `T` (default: untyped rows)   |
//! | `@Name:type`      | Parameter `Name` typed by the SQL token   |

pub mod ast;
pub mod build;
pub mod config;
pub mod error;
pub mod parser;
pub mod runtime;
pub mod transpiler;
pub mod types;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::build::{CancelToken, Generator, WriteSummary};
    pub use crate::config::{CodegenConfig, Config, Dialect};
    pub use crate::error::*;
    pub use crate::parser::extract;
    pub use crate::transpiler::{assemble, ToRust};
    pub use crate::types::resolve_type;
}

/// Extract query metadata from a file's base name and text.
///
/// # Example
///
/// ```
/// let meta = dipper::extract("orders", "select * from orders where id = @Id:int8;");
/// assert_eq!(meta.query_name, "orders");
/// assert_eq!(meta.parameters[0].sql_type, "int8");
/// ```
pub fn extract(base_name: &str, text: &str) -> ast::QueryMetadata {
    parser::extract_text(base_name, text)
}

/// Generate the unit for `metadata` with the default (Postgres) config.
///
/// # Example
///
/// ```
/// let meta = dipper::extract("orders", "select * from orders;");
/// let unit = dipper::assemble(&meta);
/// assert_eq!(unit.type_name, "ordersQuery");
/// ```
pub fn assemble(metadata: &ast::QueryMetadata) -> ast::GeneratedUnit {
    transpiler::assemble(metadata, &config::CodegenConfig::default())
}
