// @generated by dipper from `crlf_count.sql`. Do not edit.

/// Query `CrLf` from `crlf_count.sql`.
#[allow(dead_code, non_camel_case_types)]
#[derive(Debug, Clone, Copy, Default)]
pub struct CrLfQuery;

/// Input parameters for [`CrLfQuery`].
#[allow(dead_code, non_camel_case_types, non_snake_case)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrLfQueryInput {
    /// The `Done` parameter (`bool`).
    pub Done: bool,
}

#[allow(dead_code)]
impl CrLfQuery {
    /// The SQL query text.
    pub const SQL: &'static str = "-- name: CrLf\r\nselect count(*) as total\r\nfrom todos\r\nwhere done = @Done;\r\n";

    /// [`Self::SQL`] with parameters rewritten to sqlite placeholders.
    pub const BOUND_SQL: &'static str = "-- name: CrLf\r\nselect count(*) as total\r\nfrom todos\r\nwhere done = ?1;\r\n";

    /// Executes the query and returns all rows.
    ///
    /// Blocks the calling thread; needs a multi-threaded Tokio runtime.
    pub fn query(
        conn: &mut sqlx::SqliteConnection,
        input: &CrLfQueryInput,
        transaction: Option<&mut sqlx::Transaction<'_, sqlx::Sqlite>>,
        timeout: Option<std::time::Duration>,
    ) -> Result<Vec<sqlx::sqlite::SqliteRow>, sqlx::Error> {
        dipper::runtime::block_on(Self::query_async(conn, input, transaction, timeout))
    }

    /// Executes the query and returns exactly one row.
    ///
    /// Blocks the calling thread; needs a multi-threaded Tokio runtime.
    pub fn query_single(
        conn: &mut sqlx::SqliteConnection,
        input: &CrLfQueryInput,
        transaction: Option<&mut sqlx::Transaction<'_, sqlx::Sqlite>>,
        timeout: Option<std::time::Duration>,
    ) -> Result<sqlx::sqlite::SqliteRow, sqlx::Error> {
        dipper::runtime::block_on(Self::query_single_async(conn, input, transaction, timeout))
    }

    /// Executes the query asynchronously and returns all rows.
    pub async fn query_async(
        conn: &mut sqlx::SqliteConnection,
        input: &CrLfQueryInput,
        transaction: Option<&mut sqlx::Transaction<'_, sqlx::Sqlite>>,
        timeout: Option<std::time::Duration>,
    ) -> Result<Vec<sqlx::sqlite::SqliteRow>, sqlx::Error> {
        let query = sqlx::query::<sqlx::Sqlite>(Self::BOUND_SQL)
            .bind(&input.Done);
        dipper::runtime::with_timeout(timeout, async move {
            match transaction {
                Some(tx) => query.fetch_all(&mut **tx).await,
                None => query.fetch_all(conn).await,
            }
        })
        .await
    }

    /// Executes the query asynchronously and returns exactly one row.
    ///
    /// Fails with `RowNotFound` for no rows and a `TooManyRows` decode error for more than one.
    pub async fn query_single_async(
        conn: &mut sqlx::SqliteConnection,
        input: &CrLfQueryInput,
        transaction: Option<&mut sqlx::Transaction<'_, sqlx::Sqlite>>,
        timeout: Option<std::time::Duration>,
    ) -> Result<sqlx::sqlite::SqliteRow, sqlx::Error> {
        let query = sqlx::query::<sqlx::Sqlite>(Self::BOUND_SQL)
            .bind(&input.Done);
        dipper::runtime::with_timeout(timeout, async move {
            let rows = match transaction {
                Some(tx) => query.fetch_all(&mut **tx).await?,
                None => query.fetch_all(conn).await?,
            };
            dipper::runtime::exactly_one(rows)
        })
        .await
    }
}
