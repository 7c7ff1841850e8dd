// @generated by dipper from `list_events.sql`. Do not edit.

/// Query `ListEvents` from `list_events.sql`.
#[allow(dead_code, non_camel_case_types)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ListEventsQuery;

/// Input parameters for [`ListEventsQuery`].
#[allow(dead_code, non_camel_case_types, non_snake_case)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListEventsQueryInput {
    /// The `Tenant` parameter (`uuid`).
    pub Tenant: sqlx::types::Uuid,
    /// The `From` parameter (`timestamptz`).
    pub From: sqlx::types::chrono::DateTime<sqlx::types::chrono::Utc>,
    /// The `Day` parameter (`date`).
    pub Day: sqlx::types::chrono::NaiveDate,
    /// The `MaxPrice` parameter (`numeric`).
    pub MaxPrice: sqlx::types::Decimal,
    /// The `Kind` parameter (`char`).
    pub Kind: char,
}

#[allow(dead_code)]
impl ListEventsQuery {
    /// The SQL query text.
    pub const SQL: &'static str = r#"-- name: ListEvents
-- result: crate::models::Event
-- Lists the events of @Tenant that start after @From.
select id, title
from events
where tenant_id = @Tenant
  and starts_at >= @From
  and day = @Day
  and price <= @MaxPrice
  and title <> '@Tenant'
  and (@Day is null or kind = @Kind);
"#;

    /// [`Self::SQL`] with parameters rewritten to mysql placeholders.
    pub const BOUND_SQL: &'static str = r#"-- name: ListEvents
-- result: crate::models::Event
-- Lists the events of @Tenant that start after @From.
select id, title
from events
where tenant_id = ?
  and starts_at >= ?
  and day = ?
  and price <= ?
  and title <> '@Tenant'
  and (? is null or kind = ?);
"#;

    /// Executes the query and returns all rows.
    ///
    /// Blocks the calling thread; needs a multi-threaded Tokio runtime.
    pub fn query(
        conn: &mut sqlx::MySqlConnection,
        input: &ListEventsQueryInput,
        transaction: Option<&mut sqlx::Transaction<'_, sqlx::MySql>>,
        timeout: Option<std::time::Duration>,
    ) -> Result<Vec<crate::models::Event>, sqlx::Error> {
        dipper::runtime::block_on(Self::query_async(conn, input, transaction, timeout))
    }

    /// Executes the query and returns exactly one row.
    ///
    /// Blocks the calling thread; needs a multi-threaded Tokio runtime.
    pub fn query_single(
        conn: &mut sqlx::MySqlConnection,
        input: &ListEventsQueryInput,
        transaction: Option<&mut sqlx::Transaction<'_, sqlx::MySql>>,
        timeout: Option<std::time::Duration>,
    ) -> Result<crate::models::Event, sqlx::Error> {
        dipper::runtime::block_on(Self::query_single_async(conn, input, transaction, timeout))
    }

    /// Executes the query asynchronously and returns all rows.
    pub async fn query_async(
        conn: &mut sqlx::MySqlConnection,
        input: &ListEventsQueryInput,
        transaction: Option<&mut sqlx::Transaction<'_, sqlx::MySql>>,
        timeout: Option<std::time::Duration>,
    ) -> Result<Vec<crate::models::Event>, sqlx::Error> {
        let query = sqlx::query_as::<sqlx::MySql, crate::models::Event>(Self::BOUND_SQL)
            .bind(&input.Tenant)
            .bind(&input.From)
            .bind(&input.Day)
            .bind(&input.MaxPrice)
            .bind(&input.Day)
            .bind(input.Kind.to_string());
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
        conn: &mut sqlx::MySqlConnection,
        input: &ListEventsQueryInput,
        transaction: Option<&mut sqlx::Transaction<'_, sqlx::MySql>>,
        timeout: Option<std::time::Duration>,
    ) -> Result<crate::models::Event, sqlx::Error> {
        let query = sqlx::query_as::<sqlx::MySql, crate::models::Event>(Self::BOUND_SQL)
            .bind(&input.Tenant)
            .bind(&input.From)
            .bind(&input.Day)
            .bind(&input.MaxPrice)
            .bind(&input.Day)
            .bind(input.Kind.to_string());
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
