//! PostgreSQL session
//!
//! Concrete [`Database`] implementation using tokio-postgres. A session owns
//! exactly one connection; the background connection task is torn down when
//! the session is closed or dropped.

use crate::config::{ConnectionConfig, SslMode};
use crate::db::Database;
use crate::db::schema::TableName;
use crate::db::types::{CellValue, ColumnDef, DataType, QueryOutcome, QueryResults, Row};
use crate::error::{DbError, DbResult};
use futures::{TryStreamExt, pin_mut};
use rust_decimal::Decimal;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{WebPkiSupportedAlgorithms, verify_tls12_signature, verify_tls13_signature};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, SignatureScheme};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_postgres::types::{FromSql, ToSql, Type};
use tokio_postgres::{Client, SimpleQueryMessage};

/// Server message for a prepared statement holding more than one command
const MULTIPLE_COMMANDS: &str = "cannot insert multiple commands into a prepared statement";

/// A single open connection to a PostgreSQL server
pub struct PostgresSession {
    /// The tokio-postgres client
    client: Client,
    /// Token for cancelling in-flight queries
    cancel_token: tokio_postgres::CancelToken,
    /// SSL mode (needed to cancel over the right transport)
    ssl_mode: SslMode,
    /// Task driving the socket
    connection: ConnectionTask,
}

/// Handle to the spawned connection driver; aborts the task when dropped.
struct ConnectionTask(Option<JoinHandle<()>>);

impl ConnectionTask {
    /// Wait for the driver to finish (it does once every client is gone)
    async fn finish(mut self) {
        if let Some(handle) = self.0.take() {
            if let Err(e) = handle.await {
                tracing::debug!("connection task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for ConnectionTask {
    fn drop(&mut self) {
        if let Some(handle) = self.0.take() {
            handle.abort();
        }
    }
}

impl PostgresSession {
    /// Connect to a PostgreSQL database.
    ///
    /// # Errors
    /// Returns `DbError::ConnectionFailed` if the server is unreachable,
    /// TLS negotiation fails, or the credentials are rejected.
    pub async fn connect(config: &ConnectionConfig) -> DbResult<Self> {
        let pg_config = config.pg_config();
        tracing::info!(
            server = %config.display_target(),
            ssl_mode = %config.ssl_mode,
            "connecting"
        );

        let (client, handle) = match config.ssl_mode {
            SslMode::Disable => {
                let (client, connection) = pg_config
                    .connect(tokio_postgres::NoTls)
                    .await
                    .map_err(|e| DbError::connection(&e))?;
                let handle = tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        tracing::warn!("connection lost: {}", e);
                    }
                });
                (client, handle)
            }
            SslMode::Prefer | SslMode::Require | SslMode::VerifyFull => {
                let tls = tokio_postgres_rustls::MakeRustlsConnect::new(make_tls_config(
                    config.ssl_mode,
                ));
                let (client, connection) = pg_config
                    .connect(tls)
                    .await
                    .map_err(|e| DbError::connection(&e))?;
                let handle = tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        tracing::warn!("connection lost: {}", e);
                    }
                });
                (client, handle)
            }
        };

        let cancel_token = client.cancel_token();
        let session = Self {
            client,
            cancel_token,
            ssl_mode: config.ssl_mode,
            connection: ConnectionTask(Some(handle)),
        };

        if let Some(timeout) = config.statement_timeout {
            let set = format!("SET statement_timeout = {}", timeout.as_millis());
            session
                .client
                .batch_execute(&set)
                .await
                .map_err(|e| DbError::connection(&e))?;
        }

        tracing::debug!("connected");
        Ok(session)
    }

    /// Send a cancel request for the currently running query.
    pub async fn cancel_query(&self) -> DbResult<()> {
        match self.ssl_mode {
            SslMode::Disable => self.cancel_token.cancel_query(tokio_postgres::NoTls).await,
            SslMode::Prefer | SslMode::Require | SslMode::VerifyFull => {
                let tls =
                    tokio_postgres_rustls::MakeRustlsConnect::new(make_tls_config(self.ssl_mode));
                self.cancel_token.cancel_query(tls).await
            }
        }
        .map_err(|e| DbError::QueryFailed(format!("Cancel failed: {}", e)))
    }

    /// Cancel whatever is running and close, giving each step `grace` to finish.
    ///
    /// If the cancel request stalls or fails, the close may wait on the
    /// in-flight query; once `grace` runs out the session is dropped, which
    /// aborts the connection task.
    pub async fn cancel_and_close(self, grace: Duration) {
        match tokio::time::timeout(grace, self.cancel_query()).await {
            Ok(Ok(())) => tracing::debug!("cancel request sent"),
            Ok(Err(e)) => tracing::warn!("{}", e),
            Err(_) => tracing::warn!("cancel request timed out"),
        }
        if tokio::time::timeout(grace, self.close()).await.is_err() {
            tracing::warn!("connection did not close in time, dropping it");
        }
    }

    /// Close the connection and wait for the driver task to wind down.
    pub async fn close(self) {
        let Self {
            client, connection, ..
        } = self;
        // Dropping the last client makes the driver send Terminate and exit
        drop(client);
        connection.finish().await;
        tracing::debug!("connection closed");
    }

    /// Prepare and run one statement, keeping at most `limit` rows.
    ///
    /// Statements without result columns go through `execute` and report the
    /// affected row count. For row-returning statements the stream is read
    /// one row past `limit` to detect truncation, then dropped.
    async fn fetch(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
        limit: usize,
    ) -> DbResult<QueryOutcome> {
        let start = Instant::now();
        tracing::debug!(sql, limit, "executing");

        let stmt = match self.client.prepare(sql).await {
            Ok(stmt) => stmt,
            Err(e) if params.is_empty() && is_multiple_commands(&e) => {
                tracing::debug!("several statements, using the simple query protocol");
                return self.fetch_simple(sql, limit).await;
            }
            Err(e) => return Err(DbError::query(&e)),
        };

        if stmt.columns().is_empty() {
            let affected = self
                .client
                .execute(&stmt, params)
                .await
                .map_err(|e| DbError::query(&e))?;
            return Ok(QueryOutcome::Affected(affected));
        }

        let columns: Vec<ColumnDef> = stmt
            .columns()
            .iter()
            .map(|col| ColumnDef {
                name: col.name().to_string(),
                data_type: pg_type_to_datatype(col.type_()),
            })
            .collect();

        let stream = self
            .client
            .query_raw(&stmt, params.iter().map(|p| *p as &dyn ToSql))
            .await
            .map_err(|e| DbError::query(&e))?;
        pin_mut!(stream);

        let mut rows = Vec::new();
        let mut truncated = false;
        while let Some(pg_row) = stream.try_next().await.map_err(|e| DbError::query(&e))? {
            if rows.len() == limit {
                truncated = true;
                break;
            }
            let values = columns
                .iter()
                .enumerate()
                .map(|(i, col_def)| extract_cell_value(&pg_row, i, &col_def.data_type))
                .collect();
            rows.push(Row { values });
        }

        tracing::debug!(
            rows = rows.len(),
            truncated,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fetched"
        );
        Ok(QueryOutcome::Rows(QueryResults::new(columns, rows, truncated)))
    }

    /// Run `sql` as one simple-protocol batch.
    ///
    /// Every statement runs. The outcome is that of the last statement: its
    /// rows (capped at `limit`, as text) or its affected count.
    async fn fetch_simple(&self, sql: &str, limit: usize) -> DbResult<QueryOutcome> {
        let stream = self
            .client
            .simple_query_raw(sql)
            .await
            .map_err(|e| DbError::query(&e))?;
        pin_mut!(stream);

        let mut last = QueryOutcome::Affected(0);
        let mut current: Option<(Vec<ColumnDef>, Vec<Row>, bool)> = None;
        while let Some(message) = stream.try_next().await.map_err(|e| DbError::query(&e))? {
            match message {
                SimpleQueryMessage::RowDescription(columns) => {
                    let columns = columns
                        .iter()
                        .map(|col| ColumnDef {
                            name: col.name().to_string(),
                            data_type: DataType::Text,
                        })
                        .collect();
                    current = Some((columns, Vec::new(), false));
                }
                SimpleQueryMessage::Row(row) => {
                    if let Some((_, rows, truncated)) = current.as_mut() {
                        if rows.len() == limit {
                            *truncated = true;
                            continue;
                        }
                        let values = (0..row.len())
                            .map(|i| match row.get(i) {
                                Some(v) => CellValue::Text(v.to_string()),
                                None => CellValue::Null,
                            })
                            .collect();
                        rows.push(Row { values });
                    }
                }
                SimpleQueryMessage::CommandComplete(affected) => {
                    last = match current.take() {
                        Some((columns, rows, truncated)) => {
                            QueryOutcome::Rows(QueryResults::new(columns, rows, truncated))
                        }
                        None => QueryOutcome::Affected(affected),
                    };
                }
                _ => {}
            }
        }
        Ok(last)
    }
}

/// Whether the server refused to prepare `sql` because it holds several statements
fn is_multiple_commands(err: &tokio_postgres::Error) -> bool {
    err.as_db_error()
        .is_some_and(|db| is_multiple_commands_message(db.message()))
}

fn is_multiple_commands_message(message: &str) -> bool {
    message.starts_with(MULTIPLE_COMMANDS)
}

impl Database for PostgresSession {
    async fn ping(&self) -> DbResult<()> {
        let row = self
            .client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| DbError::query(&e))?;
        let value: i32 = row
            .try_get(0)
            .map_err(|e| DbError::TypeConversion(e.to_string()))?;
        if value != 1 {
            return Err(DbError::QueryFailed(format!(
                "Connection established, but SELECT 1 returned {}",
                value
            )));
        }
        Ok(())
    }

    async fn list_tables(
        &self,
        schema: Option<&str>,
        include_system: bool,
    ) -> DbResult<Vec<TableName>> {
        // information_schema columns are sql_identifier; cast so they decode as text
        const BASE: &str = "SELECT table_schema::text, table_name::text \
                            FROM information_schema.tables \
                            WHERE table_type = 'BASE TABLE'";
        const ORDER: &str = "ORDER BY table_schema, table_name";

        let rows = match schema {
            Some(schema) => {
                let sql = format!("{} AND table_schema::text = $1 {}", BASE, ORDER);
                self.client.query(sql.as_str(), &[&schema]).await
            }
            None if include_system => {
                let sql = format!("{} {}", BASE, ORDER);
                self.client.query(sql.as_str(), &[]).await
            }
            None => {
                let sql = format!(
                    "{} AND table_schema NOT IN ('pg_catalog', 'information_schema') {}",
                    BASE, ORDER
                );
                self.client.query(sql.as_str(), &[]).await
            }
        }
        .map_err(|e| DbError::query(&e))?;

        let mut tables = Vec::with_capacity(rows.len());
        for row in &rows {
            let schema: String = row
                .try_get(0)
                .map_err(|e| DbError::TypeConversion(e.to_string()))?;
            let name: String = row
                .try_get(1)
                .map_err(|e| DbError::TypeConversion(e.to_string()))?;
            tables.push(TableName { schema, name });
        }
        Ok(tables)
    }

    async fn fetch_head(&self, table: &TableName, limit: usize) -> DbResult<QueryResults> {
        let sql = format!("SELECT * FROM {} LIMIT $1", table.quoted());
        let limit_param = i64::try_from(limit)
            .map_err(|_| DbError::QueryFailed(format!("limit {} is out of range", limit)))?;

        match self.fetch(&sql, &[&limit_param], limit).await? {
            QueryOutcome::Rows(results) => Ok(results),
            // A table with zero columns still yields a (column-less) result
            QueryOutcome::Affected(_) => Ok(QueryResults::new(Vec::new(), Vec::new(), false)),
        }
    }

    async fn run_query(&self, sql: &str, limit: usize) -> DbResult<QueryOutcome> {
        self.fetch(sql, &[], limit).await
    }
}

/// Map tokio_postgres Type to our DataType enum
fn pg_type_to_datatype(pg_type: &Type) -> DataType {
    match *pg_type {
        Type::INT2 => DataType::SmallInt,
        Type::INT4 => DataType::Integer,
        Type::INT8 => DataType::BigInt,
        Type::FLOAT4 => DataType::Real,
        Type::FLOAT8 => DataType::Double,
        Type::NUMERIC => DataType::Numeric,
        Type::TEXT | Type::NAME => DataType::Text,
        Type::VARCHAR => DataType::Varchar,
        Type::BPCHAR => DataType::Char,
        Type::BOOL => DataType::Boolean,
        Type::DATE => DataType::Date,
        Type::TIME => DataType::Time,
        Type::TIMESTAMP => DataType::Timestamp,
        Type::TIMESTAMPTZ => DataType::TimestampTz,
        Type::INTERVAL => DataType::Interval,
        Type::JSON => DataType::Json,
        Type::JSONB => DataType::Jsonb,
        Type::BYTEA => DataType::Bytea,
        Type::UUID => DataType::Uuid,
        // Array types
        Type::BOOL_ARRAY => DataType::Array(Box::new(DataType::Boolean)),
        Type::INT2_ARRAY => DataType::Array(Box::new(DataType::SmallInt)),
        Type::INT4_ARRAY => DataType::Array(Box::new(DataType::Integer)),
        Type::INT8_ARRAY => DataType::Array(Box::new(DataType::BigInt)),
        Type::FLOAT4_ARRAY => DataType::Array(Box::new(DataType::Real)),
        Type::FLOAT8_ARRAY => DataType::Array(Box::new(DataType::Double)),
        Type::TEXT_ARRAY | Type::VARCHAR_ARRAY | Type::NAME_ARRAY => {
            DataType::Array(Box::new(DataType::Text))
        }
        Type::UUID_ARRAY => DataType::Array(Box::new(DataType::Uuid)),
        Type::JSONB_ARRAY => DataType::Array(Box::new(DataType::Jsonb)),
        Type::JSON_ARRAY => DataType::Array(Box::new(DataType::Json)),
        Type::NUMERIC_ARRAY => DataType::Array(Box::new(DataType::Numeric)),
        _ => DataType::Unknown(pg_type.name().to_string()),
    }
}

/// Build the rustls ClientConfig for an SSL mode.
///
/// `verify-full` trusts OS certificates (with Mozilla roots as fallback).
/// The other modes encrypt but accept any server certificate.
fn make_tls_config(ssl_mode: SslMode) -> rustls::ClientConfig {
    if ssl_mode != SslMode::VerifyFull {
        let algorithms = rustls::crypto::ring::default_provider().signature_verification_algorithms;
        return rustls::ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert(algorithms)))
            .with_no_client_auth();
    }

    let mut root_store = rustls::RootCertStore::empty();

    let native_certs = rustls_native_certs::load_native_certs();
    let mut loaded = 0;
    for cert in native_certs.certs {
        if root_store.add(cert).is_ok() {
            loaded += 1;
        }
    }
    if loaded == 0 {
        tracing::debug!("no native root certificates found, using bundled roots");
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth()
}

/// Skips certificate and host name checks but still verifies handshake
/// signatures, so the session is encrypted to whoever holds the key.
#[derive(Debug)]
struct AcceptAnyServerCert(WebPkiSupportedAlgorithms);

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.0)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.0)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.supported_schemes()
    }
}

/// `f32` to `f64` through its shortest decimal form, so `0.1` stays `0.1`.
fn widen_f32(v: f32) -> f64 {
    v.to_string().parse().unwrap_or(f64::from(v))
}

/// Decode `row[idx]` as `Option<T>`, mapping through `f`, falling back to text.
fn decode<'a, T, F>(row: &'a tokio_postgres::Row, idx: usize, f: F) -> CellValue
where
    T: FromSql<'a>,
    F: FnOnce(T) -> CellValue,
{
    match row.try_get::<_, Option<T>>(idx) {
        Ok(Some(v)) => f(v),
        Ok(None) => CellValue::Null,
        Err(_) => try_as_string(row, idx),
    }
}

/// Decode an array column as `Option<Vec<T>>`, mapping each element through `f`.
fn decode_array<'a, T, F>(row: &'a tokio_postgres::Row, idx: usize, f: F) -> CellValue
where
    T: FromSql<'a>,
    F: Fn(T) -> CellValue,
{
    decode::<Vec<T>, _>(row, idx, |v| CellValue::Array(v.into_iter().map(f).collect()))
}

/// Extract a cell value from a tokio_postgres Row based on the column's DataType.
///
/// Returns CellValue::Null only for actual NULL values; decoding failures fall
/// back to the string representation.
fn extract_cell_value(row: &tokio_postgres::Row, idx: usize, data_type: &DataType) -> CellValue {
    match data_type {
        DataType::SmallInt => decode::<i16, _>(row, idx, |v| CellValue::Integer(v as i64)),
        DataType::Integer => decode::<i32, _>(row, idx, |v| CellValue::Integer(v as i64)),
        DataType::BigInt => decode::<i64, _>(row, idx, CellValue::Integer),
        DataType::Real => decode::<f32, _>(row, idx, |v| CellValue::Float(widen_f32(v))),
        DataType::Double => decode::<f64, _>(row, idx, CellValue::Float),
        DataType::Numeric => {
            decode::<Decimal, _>(row, idx, |v| CellValue::Numeric(v.to_string()))
        }
        DataType::Boolean => decode::<bool, _>(row, idx, CellValue::Boolean),
        DataType::Json | DataType::Jsonb => {
            decode::<serde_json::Value, _>(row, idx, CellValue::Json)
        }
        DataType::Bytea => decode::<Vec<u8>, _>(row, idx, CellValue::Binary),
        DataType::Uuid => {
            decode::<uuid::Uuid, _>(row, idx, |v| CellValue::Uuid(v.to_string()))
        }
        DataType::Timestamp => decode::<chrono::NaiveDateTime, _>(row, idx, |v| {
            CellValue::DateTime(v.to_string())
        }),
        DataType::TimestampTz => decode::<chrono::DateTime<chrono::Utc>, _>(row, idx, |v| {
            CellValue::DateTime(v.to_string())
        }),
        DataType::Date => {
            decode::<chrono::NaiveDate, _>(row, idx, |v| CellValue::DateTime(v.to_string()))
        }
        DataType::Time => {
            decode::<chrono::NaiveTime, _>(row, idx, |v| CellValue::DateTime(v.to_string()))
        }
        DataType::Interval => {
            decode::<PgInterval, _>(row, idx, |v| CellValue::DateTime(v.to_string()))
        }
        DataType::Array(inner) => extract_array_value(row, idx, inner),
        // Text types and fallback for unknown types
        _ => try_as_string(row, idx),
    }
}

/// Extract an array value from a tokio_postgres Row.
fn extract_array_value(row: &tokio_postgres::Row, idx: usize, inner: &DataType) -> CellValue {
    match inner {
        DataType::Text | DataType::Varchar | DataType::Char => {
            decode_array::<String, _>(row, idx, CellValue::Text)
        }
        DataType::SmallInt => {
            decode_array::<i16, _>(row, idx, |n| CellValue::Integer(n as i64))
        }
        DataType::Integer => {
            decode_array::<i32, _>(row, idx, |n| CellValue::Integer(n as i64))
        }
        DataType::BigInt => decode_array::<i64, _>(row, idx, CellValue::Integer),
        DataType::Real => decode_array::<f32, _>(row, idx, |n| CellValue::Float(widen_f32(n))),
        DataType::Double => decode_array::<f64, _>(row, idx, CellValue::Float),
        DataType::Boolean => decode_array::<bool, _>(row, idx, CellValue::Boolean),
        DataType::Uuid => {
            decode_array::<uuid::Uuid, _>(row, idx, |u| CellValue::Uuid(u.to_string()))
        }
        DataType::Json | DataType::Jsonb => {
            decode_array::<serde_json::Value, _>(row, idx, CellValue::Json)
        }
        DataType::Numeric => {
            decode_array::<Decimal, _>(row, idx, |d| CellValue::Numeric(d.to_string()))
        }
        _ => try_as_string(row, idx),
    }
}

/// Try to extract a value as a string (fallback for type mismatches).
///
/// `oid` and the single-byte `"char"` type have no string mapping in the
/// driver, so they get their own attempt. When everything fails, the
/// postgres type name is included so the user knows what couldn't be shown.
fn try_as_string(row: &tokio_postgres::Row, idx: usize) -> CellValue {
    match row.try_get::<_, Option<String>>(idx) {
        Ok(Some(v)) => return CellValue::Text(v),
        Ok(None) => return CellValue::Null,
        Err(_) => {}
    }
    if let Ok(v) = row.try_get::<_, Option<u32>>(idx) {
        return v.map_or(CellValue::Null, |n| CellValue::Integer(n as i64));
    }
    if let Ok(v) = row.try_get::<_, Option<i8>>(idx) {
        return v.map_or(CellValue::Null, |c| {
            CellValue::Text(char::from(c as u8).to_string())
        });
    }
    let type_name = row
        .columns()
        .get(idx)
        .map_or("unknown", |c| c.type_().name());
    CellValue::Text(format!("<unable to display: {}>", type_name))
}

/// Binary `interval` value, rendered the way psql shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PgInterval {
    months: i32,
    days: i32,
    micros: i64,
}

impl<'a> FromSql<'a> for PgInterval {
    fn from_sql(
        _ty: &Type,
        raw: &'a [u8],
    ) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        if raw.len() != 16 {
            return Err(format!("invalid interval length {}", raw.len()).into());
        }
        let micros = i64::from_be_bytes(raw[0..8].try_into()?);
        let days = i32::from_be_bytes(raw[8..12].try_into()?);
        let months = i32::from_be_bytes(raw[12..16].try_into()?);
        Ok(Self {
            months,
            days,
            micros,
        })
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::INTERVAL
    }
}

impl fmt::Display for PgInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn unit(n: i64, singular: &str, plural: &str) -> String {
            if n.abs() == 1 {
                format!("{} {}", n, singular)
            } else {
                format!("{} {}", n, plural)
            }
        }

        let mut parts = Vec::new();
        let years = self.months / 12;
        let months = self.months % 12;
        if years != 0 {
            parts.push(unit(years as i64, "year", "years"));
        }
        if months != 0 {
            parts.push(unit(months as i64, "mon", "mons"));
        }
        if self.days != 0 {
            parts.push(unit(self.days as i64, "day", "days"));
        }

        if self.micros != 0 || parts.is_empty() {
            let sign = if self.micros < 0 { "-" } else { "" };
            let total = self.micros.unsigned_abs();
            let secs = total / 1_000_000;
            let frac = total % 1_000_000;
            let mut time = format!(
                "{}{:02}:{:02}:{:02}",
                sign,
                secs / 3600,
                (secs / 60) % 60,
                secs % 60
            );
            if frac != 0 {
                let digits = format!("{:06}", frac);
                time.push('.');
                time.push_str(digits.trim_end_matches('0'));
            }
            parts.push(time);
        }

        f.write_str(&parts.join(" "))
    }
}
