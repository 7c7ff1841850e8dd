//! Runtime support for generated query helpers.
//!
//! Generated code calls [`with_timeout`], [`block_on`] and [`exactly_one`]. The column-map
//! registry is separate: an application registers its mapped row types once
//! at startup, and hand-written `FromRow` impls read columns through it.

use std::any::TypeId;
use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::sync::{OnceLock, PoisonError, RwLock};
use std::time::Duration;

use sqlx::Row;
use tokio::runtime::{Handle, RuntimeFlavor};

use crate::error::TooManyRows;

/// Run a query future, failing with a `TimedOut` IO error if it takes longer than `timeout`.
pub async fn with_timeout<T, F>(timeout: Option<Duration>, future: F) -> Result<T, sqlx::Error>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    let Some(limit) = timeout else {
        return future.await;
    };

    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(?limit, "query exceeded command timeout");
            Err(sqlx::Error::Io(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("query exceeded command timeout of {limit:?}"),
            )))
        }
    }
}

/// Drive a query future to completion from synchronous code.
///
/// Needs an ambient multi-threaded Tokio runtime; the worker is handed off
/// with `block_in_place` while the future runs. Without one, an `Other` IO
/// error is returned instead of panicking.
pub fn block_on<T, F>(future: F) -> Result<T, sqlx::Error>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    let handle = Handle::try_current().map_err(|_| {
        runtime_error("synchronous query helpers need a running Tokio runtime")
    })?;

    if matches!(handle.runtime_flavor(), RuntimeFlavor::CurrentThread) {
        return Err(runtime_error(
            "synchronous query helpers need a multi-threaded Tokio runtime",
        ));
    }

    tokio::task::block_in_place(move || handle.block_on(future))
}

fn runtime_error(message: &'static str) -> sqlx::Error {
    sqlx::Error::Io(io::Error::new(io::ErrorKind::Other, message))
}

/// The only row of `rows`.
///
/// No rows is `RowNotFound`. More than one is a [`TooManyRows`] inside
/// `sqlx::Error::Decode`.
pub fn exactly_one<T>(rows: Vec<T>) -> Result<T, sqlx::Error> {
    let count = rows.len();
    let mut rows = rows.into_iter();
    match (rows.next(), count) {
        (None, _) => Err(sqlx::Error::RowNotFound),
        (Some(row), 1) => Ok(row),
        (Some(_), count) => Err(sqlx::Error::Decode(Box::new(TooManyRows { count }))),
    }
}

/// A row type whose fields are stored under different column names.
///
/// ```
/// use dipper::runtime::ColumnMapped;
///
/// struct Product {
///     id: i64,
///     display_name: String,
/// }
///
/// impl ColumnMapped for Product {
///     const COLUMNS: &'static [(&'static str, &'static str)] =
///         &[("id", "product_id"), ("display_name", "name")];
/// }
/// ```
pub trait ColumnMapped: 'static {
    /// `(field, column)` pairs.
    const COLUMNS: &'static [(&'static str, &'static str)];
}

/// Field-to-column mapping for one type.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
    type_id: TypeId,
    type_name: &'static str,
    columns: &'static [(&'static str, &'static str)],
}

impl ColumnMap {
    /// Map for `T`.
    pub fn of<T: ColumnMapped>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            columns: T::COLUMNS,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Column for a field.
    pub fn column(&self, field: &str) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, column)| *column)
    }

    /// Field for a column.
    pub fn field(&self, column: &str) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|(_, c)| *c == column)
            .map(|(field, _)| *field)
    }
}

type Registry = RwLock<HashMap<TypeId, ColumnMap>>;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::default)
}

/// Install column maps process-wide. Call once at startup.
///
/// Registering a type again replaces its map. Returns how many maps were installed.
pub fn register_column_maps(maps: &[ColumnMap]) -> usize {
    let mut registry = registry().write().unwrap_or_else(PoisonError::into_inner);
    for map in maps {
        tracing::debug!(type_name = map.type_name, columns = map.columns.len(), "registering column map");
        registry.insert(map.type_id, *map);
    }
    maps.len()
}

/// Registered map for `T`.
pub fn column_map<T: 'static>() -> Option<ColumnMap> {
    registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&TypeId::of::<T>())
        .copied()
}

/// Column that `field` of `T` is read from, if `T` is registered and maps it.
pub fn column_for<T: 'static>(field: &str) -> Option<&'static str> {
    column_map::<T>().and_then(|map| map.column(field))
}

/// Field of `T` that `column` feeds, if `T` is registered and maps it.
pub fn field_for<T: 'static>(column: &str) -> Option<&'static str> {
    column_map::<T>().and_then(|map| map.field(column))
}

/// Read `field` of `T` from a row, through `T`'s registered column map.
///
/// Falls back to a column named like the field.
pub fn get_mapped<'r, T, R, V>(row: &'r R, field: &str) -> Result<V, sqlx::Error>
where
    T: 'static,
    R: Row,
    V: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    for<'c> &'c str: sqlx::ColumnIndex<R>,
{
    let column = column_for::<T>(field).unwrap_or(field);
    row.try_get(column)
}
