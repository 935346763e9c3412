//! Query/command execution gateway.
//!
//! Every statement carries its values as bound [`Param`]s. Reads come back as
//! JSON row maps (`row_to_json`), writes run in a transaction that commits only
//! when the whole statement succeeds.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row as _};
use std::borrow::Cow;
use std::time::Instant;

use crate::config::DatabaseConfig;
use crate::database::error::GatewayError;

/// One result row, column name → value.
pub type Row = Map<String, Value>;

/// Wire type of a parameter, kept on NULLs so a statement binds the same
/// types on every execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Int,
    BigInt,
    Float,
    Text,
    Date,
    Time,
}

/// Rust types with a fixed parameter type.
pub trait SqlTyped {
    const SQL_TYPE: SqlType;
}

macro_rules! sql_typed {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(impl SqlTyped for $ty {
            const SQL_TYPE: SqlType = SqlType::$kind;
        })+
    };
}

sql_typed! {
    i32 => Int,
    i64 => BigInt,
    f64 => Float,
    &str => Text,
    String => Text,
    &String => Text,
    NaiveDate => Date,
    NaiveTime => Time,
}

/// A bound statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Null(SqlType),
    Int(i32),
    BigInt(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    TextArray(Vec<String>),
}

impl From<i32> for Param {
    fn from(v: i32) -> Self {
        Param::Int(v)
    }
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Param::BigInt(v)
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Float(v)
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Param::Text(v.to_string())
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Param::Text(v)
    }
}

impl From<&String> for Param {
    fn from(v: &String) -> Self {
        Param::Text(v.clone())
    }
}

impl From<Vec<String>> for Param {
    fn from(v: Vec<String>) -> Self {
        Param::TextArray(v)
    }
}

impl From<NaiveDate> for Param {
    fn from(v: NaiveDate) -> Self {
        Param::Date(v)
    }
}

impl From<NaiveTime> for Param {
    fn from(v: NaiveTime) -> Self {
        Param::Time(v)
    }
}

impl<T: Into<Param> + SqlTyped> From<Option<T>> for Param {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Param::Null(T::SQL_TYPE))
    }
}

/// SQL text plus its positional parameters (`$1`, `$2`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: Cow<'static, str>,
    params: Vec<Param>,
    projected: bool,
}

impl Statement {
    pub fn new(sql: impl Into<Cow<'static, str>>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            projected: false,
        }
    }

    /// The SQL already yields a single json column named `row`, so it is run
    /// as written. Needed for statements with their own data-modifying CTEs,
    /// which cannot be nested inside another `WITH`.
    pub fn projected(mut self) -> Self {
        self.projected = true;
        self
    }

    pub fn is_projected(&self) -> bool {
        self.projected
    }

    pub fn bind(mut self, param: impl Into<Param>) -> Self {
        self.params.push(param.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }
}

/// Result of a mutating statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    pub rows_affected: u64,
}

impl CommandOutcome {
    pub fn changed(&self) -> bool {
        self.rows_affected > 0
    }
}

#[async_trait]
pub trait Gateway: Send + Sync {
    /// Read-only; no match yields an empty vector.
    async fn query(&self, statement: &Statement) -> Result<Vec<Row>, GatewayError>;

    /// Mutating; committed on success, rolled back on any failure.
    async fn execute(&self, statement: &Statement) -> Result<CommandOutcome, GatewayError>;

    /// Mutating statement with a `RETURNING` clause; yields the returned row.
    async fn execute_returning(&self, statement: &Statement) -> Result<Row, GatewayError>;

    async fn query_optional(&self, statement: &Statement) -> Result<Option<Row>, GatewayError> {
        Ok(self.query(statement).await?.into_iter().next())
    }

    async fn query_as<T>(&self, statement: &Statement) -> Result<Vec<T>, GatewayError>
    where
        T: DeserializeOwned + Send,
    {
        self.query(statement).await?.into_iter().map(decode_row).collect()
    }

    async fn query_one_as<T>(&self, statement: &Statement, what: &str) -> Result<T, GatewayError>
    where
        T: DeserializeOwned + Send,
    {
        match self.query_optional(statement).await? {
            Some(row) => decode_row(row),
            None => Err(GatewayError::not_found(format!("{} not found", what))),
        }
    }
}

/// Typed view of a row.
pub fn decode_row<T: DeserializeOwned>(row: Row) -> Result<T, GatewayError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| {
        tracing::error!("row does not match its model: {}", e);
        GatewayError::Internal("failed to read database row".to_string())
    })
}

/// Gateway over one session's connection pool.
#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
    identity: String,
    settings: DatabaseConfig,
}

impl PgGateway {
    pub fn new(pool: PgPool, identity: impl Into<String>, settings: DatabaseConfig) -> Self {
        Self {
            pool,
            identity: identity.into(),
            settings,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round trip to the server on this session's pool.
    pub async fn ping(&self) -> Result<(), GatewayError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn observe(&self, statement: &Statement, started: Instant) {
        let elapsed = started.elapsed();
        if self.settings.enable_query_logging {
            tracing::debug!(
                identity = %self.identity,
                params = statement.params.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "{}",
                statement.sql()
            );
        }
        if self.settings.enable_slow_query_warning
            && elapsed.as_millis() as u64 > self.settings.slow_query_threshold_ms
        {
            tracing::warn!(
                identity = %self.identity,
                elapsed_ms = elapsed.as_millis() as u64,
                "slow statement: {}",
                statement.sql()
            );
        }
    }
}

#[async_trait]
impl Gateway for PgGateway {
    async fn query(&self, statement: &Statement) -> Result<Vec<Row>, GatewayError> {
        let sql = wrap_select(statement.sql());
        let started = Instant::now();

        let rows = bind_all(sqlx::query(&sql), statement.params())
            .fetch_all(&self.pool)
            .await?;
        self.observe(statement, started);

        rows.iter().map(json_row).collect()
    }

    async fn execute(&self, statement: &Statement) -> Result<CommandOutcome, GatewayError> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;

        // Dropping the transaction on error rolls it back
        let result = bind_all(sqlx::query(statement.sql()), statement.params())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        self.observe(statement, started);

        Ok(CommandOutcome {
            rows_affected: result.rows_affected(),
        })
    }

    async fn execute_returning(&self, statement: &Statement) -> Result<Row, GatewayError> {
        let sql = if statement.is_projected() {
            statement.sql().to_string()
        } else {
            wrap_returning(statement.sql())
        };
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;

        let row = bind_all(sqlx::query(&sql), statement.params())
            .fetch_optional(&mut *tx)
            .await?;
        let row = match row {
            Some(row) => json_row(&row)?,
            None => return Err(GatewayError::not_found("no row matched the statement")),
        };
        tx.commit().await?;
        self.observe(statement, started);

        Ok(row)
    }
}

fn wrap_select(sql: &str) -> String {
    format!("SELECT row_to_json(t) AS row FROM ({}) t", sql)
}

fn wrap_returning(sql: &str) -> String {
    format!("WITH t AS ({}) SELECT row_to_json(t) AS row FROM t", sql)
}

fn json_row(row: &sqlx::postgres::PgRow) -> Result<Row, GatewayError> {
    let value: Value = row.try_get("row")?;
    match value {
        Value::Object(map) => Ok(map),
        other => {
            tracing::error!("unexpected row shape: {}", other);
            Err(GatewayError::Internal("unexpected row format".to_string()))
        }
    }
}

fn bind_all<'q>(
    mut q: Query<'q, Postgres, PgArguments>,
    params: &'q [Param],
) -> Query<'q, Postgres, PgArguments> {
    for p in params {
        q = bind_param(q, p);
    }
    q
}

fn bind_param<'q>(
    q: Query<'q, Postgres, PgArguments>,
    p: &'q Param,
) -> Query<'q, Postgres, PgArguments> {
    match p {
        Param::Null(SqlType::Int) => q.bind(None::<i32>),
        Param::Null(SqlType::BigInt) => q.bind(None::<i64>),
        Param::Null(SqlType::Float) => q.bind(None::<f64>),
        Param::Null(SqlType::Text) => q.bind(None::<String>),
        Param::Null(SqlType::Date) => q.bind(None::<NaiveDate>),
        Param::Null(SqlType::Time) => q.bind(None::<NaiveTime>),
        Param::Int(v) => q.bind(*v),
        Param::BigInt(v) => q.bind(*v),
        Param::Float(v) => q.bind(*v),
        Param::Text(v) => q.bind(v.as_str()),
        Param::Date(v) => q.bind(*v),
        Param::Time(v) => q.bind(*v),
        Param::TextArray(v) => q.bind(v.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn statement_collects_params_in_order() {
        let dob = NaiveDate::from_ymd_opt(2019, 4, 1).unwrap();
        let stmt = Statement::new("SELECT $1, $2, $3, $4")
            .bind(7)
            .bind("Asian Elephant")
            .bind(dob)
            .bind(None::<i32>);

        assert_eq!(
            stmt.params(),
            &[
                Param::Int(7),
                Param::Text("Asian Elephant".into()),
                Param::Date(dob),
                Param::Null(SqlType::Int),
            ]
        );
    }

    #[test]
    fn nulls_keep_the_type_of_the_missing_value() {
        let stmt = Statement::new("SELECT $1, $2, $3")
            .bind(None::<NaiveDate>)
            .bind(None::<i64>)
            .bind(None::<&str>);

        assert_eq!(
            stmt.params(),
            &[
                Param::Null(SqlType::Date),
                Param::Null(SqlType::BigInt),
                Param::Null(SqlType::Text),
            ]
        );
    }

    #[test]
    fn projected_statements_are_not_rewrapped() {
        let stmt = Statement::new("WITH s AS (INSERT INTO species DEFAULT VALUES RETURNING *) SELECT row_to_json(s) AS row FROM s")
            .projected();
        assert!(stmt.is_projected());
        assert!(!Statement::new("SELECT 1").is_projected());
    }

    #[test]
    fn user_values_never_reach_sql_text() {
        let hostile = "x'); DROP TABLE species; --";
        let stmt = Statement::new("SELECT * FROM species WHERE common_name = $1").bind(hostile);
        assert!(!stmt.sql().contains("DROP"));
        assert_eq!(wrap_select(stmt.sql()), "SELECT row_to_json(t) AS row FROM (SELECT * FROM species WHERE common_name = $1) t");
    }

    #[test]
    fn returning_statements_are_wrapped_in_a_cte() {
        let sql = wrap_returning("INSERT INTO organization (name) VALUES ($1) RETURNING *");
        assert!(sql.starts_with("WITH t AS (INSERT INTO organization"));
        assert!(sql.ends_with("SELECT row_to_json(t) AS row FROM t"));
    }

    #[test]
    fn decode_row_maps_json_to_model() {
        #[derive(Deserialize)]
        struct Counted {
            c: i64,
        }

        let row = json!({ "c": 12 }).as_object().cloned().unwrap();
        let decoded: Counted = decode_row(row).unwrap();
        assert_eq!(decoded.c, 12);
    }

    #[test]
    fn decode_row_shape_mismatch_is_internal() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Counted {
            c: i64,
        }

        let row = json!({ "c": "twelve" }).as_object().cloned().unwrap();
        let err = decode_row::<Counted>(row).unwrap_err();
        assert!(matches!(err, GatewayError::Internal(_)));
    }

    #[test]
    fn command_outcome_reports_change() {
        assert!(CommandOutcome { rows_affected: 1 }.changed());
        assert!(!CommandOutcome { rows_affected: 0 }.changed());
    }
}
