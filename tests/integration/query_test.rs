//! Query execution integration tests.
//!
//! Runs reports against a live server and checks the printed lines.

use db_report::config::ConnectionConfig;
use db_report::db::{DatabaseClient, MySqlClient, Row, Value};
use db_report::query::{QueryRunner, Report};
use futures::TryStreamExt;
use pretty_assertions::assert_eq;

/// Helper to get test database URL from environment.
fn get_test_database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

/// Helper to create a test client.
async fn get_test_client() -> Option<MySqlClient> {
    let url = get_test_database_url()?;
    let config = ConnectionConfig::from_connection_string(&url).ok()?;
    MySqlClient::connect(&config).await.ok()
}

async fn execute(client: &mut MySqlClient, sql: &str) -> Vec<Row> {
    client.query(sql).try_collect().await.unwrap()
}

#[tokio::test]
async fn test_top_pages_against_temporary_table() {
    let Some(mut client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    execute(
        &mut client,
        "CREATE TEMPORARY TABLE wikipedia (page VARCHAR(255) NOT NULL)",
    )
    .await;
    execute(
        &mut client,
        "INSERT INTO wikipedia (page) VALUES ('Main_Page'), ('Barack_Obama'), ('Barack_Obama')",
    )
    .await;

    let mut out: Vec<u8> = Vec::new();
    let written = QueryRunner::new(Report::TopPages)
        .run(&mut client, &mut out)
        .await
        .unwrap();

    assert_eq!(written, 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "page[Barack_Obama] count[2]\npage[Main_Page] count[1]\n"
    );

    Box::new(client).close().await.unwrap();
}

#[tokio::test]
async fn test_channel_activity_types_from_server() {
    let Some(mut client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let rows = execute(
        &mut client,
        "SELECT CAST('2023-01-01 00:00:00' AS DATETIME) AS Time, 'en' AS Channel, \
         1 AS IsNew, SUM(50) AS Count, SUM(120000)/100 AS Added",
    )
    .await;

    assert_eq!(rows.len(), 1);
    assert!(matches!(rows[0].get("Count").unwrap(), Value::Decimal(_)));
    assert_eq!(
        Report::ChannelActivity.render(&rows[0]).unwrap(),
        "Time[2023-01-01 00:00:00.0] Channel[en] Count[50] Added[1200.000000]"
    );

    Box::new(client).close().await.unwrap();
}

#[tokio::test]
async fn test_select_with_null() {
    let Some(mut client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let rows = execute(&mut client, "SELECT NULL AS page, 3 AS cnt").await;

    assert_eq!(rows[0].get("page").unwrap(), &Value::Null);
    assert_eq!(
        Report::TopPages.render(&rows[0]).unwrap(),
        "page[null] count[3]"
    );

    Box::new(client).close().await.unwrap();
}

#[tokio::test]
async fn test_empty_result_set() {
    let Some(mut client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let rows = execute(&mut client, "SELECT 'x' AS page, 1 AS cnt FROM DUAL WHERE 1 = 0").await;
    assert!(rows.is_empty());

    Box::new(client).close().await.unwrap();
}

#[tokio::test]
async fn test_invalid_sql_is_query_error() {
    let Some(mut client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let result: Result<Vec<Row>, _> = client.query("SELEC page FROM nowhere").try_collect().await;
    let error = result.unwrap_err();
    assert_eq!(error.category(), "Query Error");

    Box::new(client).close().await.unwrap();
}
