//! Integration tests for PostgresSession
//!
//! These tests require the test PostgreSQL database to be running.

use crate::common::{test_config, try_connect, unique_table};
use pgpeek::commands::{Command, Response, dispatch};
use pgpeek::config::SslMode;
use pgpeek::db::types::CellValue;
use pgpeek::db::{Database, PostgresSession, QueryOutcome, QueryResults, TableName};
use pgpeek::error::DbError;
use pgpeek::output::{NO_ROWS, OutputFormat, render};
use std::time::{Duration, Instant};

fn expect_rows(outcome: QueryOutcome) -> QueryResults {
    match outcome {
        QueryOutcome::Rows(results) => results,
        QueryOutcome::Affected(n) => panic!("expected rows, got {} affected", n),
    }
}

/// Create `public.<prefix>_...` holding `n` rows and return its name.
async fn create_table(session: &PostgresSession, prefix: &str, n: i32) -> String {
    let name = unique_table(prefix);
    let create = format!(
        "CREATE TABLE public.\"{name}\" AS SELECT g AS id, 'row ' || g AS label \
         FROM generate_series(1, {n}) g"
    );
    expect_affected(session.run_query(&create, 10).await.unwrap());
    name
}

async fn drop_table(session: &PostgresSession, name: &str) {
    let sql = format!("DROP TABLE IF EXISTS public.\"{}\"", name);
    let _ = session.run_query(&sql, 1).await;
}

fn expect_affected(outcome: QueryOutcome) -> u64 {
    match outcome {
        QueryOutcome::Affected(n) => n,
        QueryOutcome::Rows(r) => panic!("expected affected count, got {} rows", r.row_count()),
    }
}

#[tokio::test]
async fn test_ping() {
    let Some(session) = try_connect().await else {
        return;
    };
    session.ping().await.expect("SELECT 1 should succeed");
    session.close().await;
}

#[tokio::test]
async fn test_unreachable_host_is_connection_error() {
    let mut config = test_config();
    config.host = "127.0.0.1".to_string();
    config.port = 1;
    config.ssl_mode = SslMode::Disable;

    let err = PostgresSession::connect(&config)
        .await
        .err()
        .expect("connecting to port 1 should fail");
    assert!(matches!(err, DbError::ConnectionFailed(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_select_one_as_x() {
    let Some(session) = try_connect().await else {
        return;
    };

    let results = expect_rows(session.run_query("select 1 as x", 100).await.unwrap());
    assert_eq!(results.columns.len(), 1);
    assert_eq!(results.columns[0].name, "x");
    assert_eq!(results.row_count(), 1);
    assert_eq!(results.rows[0].values[0], CellValue::Integer(1));
    assert!(!results.truncated);

    session.close().await;
}

#[tokio::test]
async fn test_malformed_sql_surfaces_server_error() {
    let Some(session) = try_connect().await else {
        return;
    };

    let err = session.run_query("select * from", 100).await.unwrap_err();
    match err {
        DbError::QueryFailed(msg) => assert!(msg.contains("syntax error"), "got: {}", msg),
        other => panic!("Expected QueryFailed, got {:?}", other),
    }

    session.close().await;
}

#[tokio::test]
async fn test_query_limit_caps_displayed_rows() {
    let Some(session) = try_connect().await else {
        return;
    };

    let results = expect_rows(
        session
            .run_query("select g from generate_series(1, 50) g", 10)
            .await
            .unwrap(),
    );
    assert_eq!(results.row_count(), 10);
    assert!(results.truncated);

    let exact = expect_rows(
        session
            .run_query("select g from generate_series(1, 10) g", 10)
            .await
            .unwrap(),
    );
    assert_eq!(exact.row_count(), 10);
    assert!(!exact.truncated);

    session.close().await;
}

#[tokio::test]
async fn test_value_types() {
    let Some(session) = try_connect().await else {
        return;
    };

    let results = expect_rows(
        session
            .run_query(
                "select null::int as n, 1.50::numeric as num, true as b, \
                 'a'::text as t, array[1,2]::int4[] as arr, \
                 '{\"k\": 1}'::jsonb as j, '1 day 02:00:00'::interval as iv, \
                 date '2024-01-31' as d, 0.1::float4 as r, \
                 array[0.1::float4, 2.5::float4] as ra",
                10,
            )
            .await
            .unwrap(),
    );
    let row = &results.rows[0];
    assert!(row.values[0].is_null());
    assert_eq!(row.values[1], CellValue::Numeric("1.50".to_string()));
    assert_eq!(row.values[2], CellValue::Boolean(true));
    assert_eq!(row.values[3], CellValue::Text("a".to_string()));
    assert_eq!(row.values[4].display_string(), "{1,2}");
    assert_eq!(row.values[5], CellValue::Json(serde_json::json!({"k": 1})));
    assert_eq!(row.values[6].display_string(), "1 day 02:00:00");
    assert_eq!(row.values[7].display_string(), "2024-01-31");
    assert_eq!(row.values[8].display_string(), "0.1");
    assert_eq!(row.values[9].display_string(), "{0.1,2.5}");
    assert!(render(&QueryOutcome::Rows(results.clone()), OutputFormat::Csv).contains(",0.1,"));

    session.close().await;
}

#[tokio::test]
async fn test_head_limits_and_listing() {
    let Some(session) = try_connect().await else {
        return;
    };

    let name = create_table(&session, "pgpeek_head", 7).await;
    let table = TableName::new("public", name.as_str()).unwrap();

    let five = session.fetch_head(&table, 5).await.unwrap();
    assert_eq!(five.row_count(), 5);
    assert_eq!(five.columns[0].name, "id");

    let all = session.fetch_head(&table, 50).await.unwrap();
    assert_eq!(all.row_count(), 7);

    let public = session.list_tables(Some("public"), false).await.unwrap();
    assert!(public.iter().all(|t| t.schema == "public"));
    assert!(public.contains(&table));

    let everything = session.list_tables(None, false).await.unwrap();
    assert!(public.iter().all(|t| everything.contains(t)));
    assert!(everything.iter().all(|t| t.schema != "pg_catalog"));

    let with_system = session.list_tables(None, true).await.unwrap();
    assert!(with_system.iter().any(|t| t.schema == "pg_catalog"));

    drop_table(&session, &name).await;
    session.close().await;
}

#[tokio::test]
async fn test_head_missing_table_is_query_error() {
    let Some(session) = try_connect().await else {
        return;
    };

    let table = TableName::new("public", "definitely_not_a_table_here").unwrap();
    let err = session.fetch_head(&table, 5).await.unwrap_err();
    assert!(matches!(err, DbError::QueryFailed(ref m) if m.contains("does not exist")));

    session.close().await;
}

#[tokio::test]
async fn test_write_statement_reports_affected_rows() {
    let Some(session) = try_connect().await else {
        return;
    };

    let name = create_table(&session, "pgpeek_write", 3).await;
    let update = format!("UPDATE public.\"{}\" SET label = 'x'", name);
    // The display limit never restricts a write
    assert_eq!(
        expect_affected(session.run_query(&update, 1).await.unwrap()),
        3
    );

    drop_table(&session, &name).await;
    session.close().await;
}

#[tokio::test]
async fn test_dispatch_empty_result_renders_no_rows() {
    let Some(session) = try_connect().await else {
        return;
    };

    let command = Command::Query {
        sql: "select 1 as x where false".to_string(),
        limit: 10,
        server_side_limit: false,
    };
    let response = dispatch(&session, &test_config(), &command).await.unwrap();
    let Response::Outcome(outcome) = response else {
        panic!("expected an outcome");
    };
    assert_eq!(
        render(&outcome, OutputFormat::Table),
        format!("{}\n", NO_ROWS)
    );

    session.close().await;
}

#[tokio::test]
async fn test_multiple_statements_return_last_result() {
    let Some(session) = try_connect().await else {
        return;
    };

    let results = expect_rows(session.run_query("select 1; select 2 as y", 10).await.unwrap());
    assert_eq!(results.columns.len(), 1);
    assert_eq!(results.columns[0].name, "y");
    assert_eq!(results.rows[0].values[0], CellValue::Text("2".to_string()));

    let capped = expect_rows(
        session
            .run_query("select 1; select g, null as z from generate_series(1, 5) g", 3)
            .await
            .unwrap(),
    );
    assert_eq!(capped.row_count(), 3);
    assert!(capped.truncated);
    assert!(capped.rows[0].values[1].is_null());

    let name = unique_table("pgpeek_multi");
    let batch = format!(
        "CREATE TABLE public.\"{name}\" (id int); \
         INSERT INTO public.\"{name}\" VALUES (1), (2)"
    );
    assert_eq!(expect_affected(session.run_query(&batch, 10).await.unwrap()), 2);

    drop_table(&session, &name).await;
    session.close().await;
}

#[tokio::test]
async fn test_multiple_statements_error_is_query_error() {
    let Some(session) = try_connect().await else {
        return;
    };

    let err = session
        .run_query("select 1; select * from definitely_not_a_table_here", 10)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::QueryFailed(ref m) if m.contains("does not exist")));

    session.close().await;
}

#[tokio::test]
async fn test_cancel_query_interrupts_running_statement() {
    let Some(session) = try_connect().await else {
        return;
    };

    let start = Instant::now();
    let (result, cancelled) = tokio::join!(session.run_query("select pg_sleep(30)", 1), async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        session.cancel_query().await
    });
    cancelled.expect("cancel request should be delivered");
    let err = result.unwrap_err();
    assert!(
        matches!(err, DbError::QueryFailed(ref m) if m.contains("canceling statement")),
        "got {:?}",
        err
    );
    assert!(start.elapsed() < Duration::from_secs(10));

    // The session stays usable after a cancelled statement
    session.ping().await.unwrap();
    session.close().await;
}

#[tokio::test]
async fn test_cancel_and_close_releases_busy_connection() {
    let Some(session) = try_connect().await else {
        return;
    };

    let start = Instant::now();
    // Abandon a long statement mid-flight, as an interrupt does
    tokio::select! {
        _ = session.run_query("select pg_sleep(30)", 1) => panic!("pg_sleep returned early"),
        _ = tokio::time::sleep(Duration::from_millis(300)) => {}
    }
    session.cancel_and_close(Duration::from_secs(5)).await;
    assert!(start.elapsed() < Duration::from_secs(12));
}
