// @generated by dipper from `todos_by_done.sql`. Do not edit.

/// Query `TodosByDone` from `todos_by_done.sql`.
#[allow(dead_code, non_camel_case_types)]
#[derive(Debug, Clone, Copy, Default)]
pub struct TodosByDoneQuery;

/// Input parameters for [`TodosByDoneQuery`].
#[allow(dead_code, non_camel_case_types, non_snake_case)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodosByDoneQueryInput {
    /// The `Done` parameter (`bool`).
    pub Done: bool,
}

#[allow(dead_code)]
impl TodosByDoneQuery {
    /// The SQL query text.
    pub const SQL: &'static str = r#"-- name: TodosByDone
-- result: crate::models::Todo
select id, title, done
from todos
where done = @Done
order by id;
"#;

    /// [`Self::SQL`] with parameters rewritten to sqlite placeholders.
    pub const BOUND_SQL: &'static str = r#"-- name: TodosByDone
-- result: crate::models::Todo
select id, title, done
from todos
where done = ?1
order by id;
"#;

    /// Executes the query and returns all rows.
    ///
    /// Blocks the calling thread; needs a multi-threaded Tokio runtime.
    pub fn query(
        conn: &mut sqlx::SqliteConnection,
        input: &TodosByDoneQueryInput,
        transaction: Option<&mut sqlx::Transaction<'_, sqlx::Sqlite>>,
        timeout: Option<std::time::Duration>,
    ) -> Result<Vec<crate::models::Todo>, sqlx::Error> {
        dipper::runtime::block_on(Self::query_async(conn, input, transaction, timeout))
    }

    /// Executes the query and returns exactly one row.
    ///
    /// Blocks the calling thread; needs a multi-threaded Tokio runtime.
    pub fn query_single(
        conn: &mut sqlx::SqliteConnection,
        input: &TodosByDoneQueryInput,
        transaction: Option<&mut sqlx::Transaction<'_, sqlx::Sqlite>>,
        timeout: Option<std::time::Duration>,
    ) -> Result<crate::models::Todo, sqlx::Error> {
        dipper::runtime::block_on(Self::query_single_async(conn, input, transaction, timeout))
    }

    /// Executes the query asynchronously and returns all rows.
    pub async fn query_async(
        conn: &mut sqlx::SqliteConnection,
        input: &TodosByDoneQueryInput,
        transaction: Option<&mut sqlx::Transaction<'_, sqlx::Sqlite>>,
        timeout: Option<std::time::Duration>,
    ) -> Result<Vec<crate::models::Todo>, sqlx::Error> {
        let query = sqlx::query_as::<sqlx::Sqlite, crate::models::Todo>(Self::BOUND_SQL)
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
        input: &TodosByDoneQueryInput,
        transaction: Option<&mut sqlx::Transaction<'_, sqlx::Sqlite>>,
        timeout: Option<std::time::Duration>,
    ) -> Result<crate::models::Todo, sqlx::Error> {
        let query = sqlx::query_as::<sqlx::Sqlite, crate::models::Todo>(Self::BOUND_SQL)
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
