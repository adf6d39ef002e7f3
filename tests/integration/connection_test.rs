//! Connection integration tests.
//!
//! Tests database connectivity and error handling.

use db_report::config::ConnectionConfig;
use db_report::db::{DatabaseClient, MySqlClient};
use db_report::error::ReportError;

/// Helper to get test database URL from environment.
fn get_test_database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

#[tokio::test]
async fn test_connect_with_valid_descriptor() {
    let Some(url) = get_test_database_url() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let config = ConnectionConfig::from_connection_string(&url).unwrap();
    let client = MySqlClient::connect(&config).await.unwrap();

    Box::new(client).close().await.unwrap();
}

#[tokio::test(flavor = "current_thread")]
async fn test_connect_with_closed_port() {
    // Port 1 on loopback is never a MySQL server; the connect is refused.
    let config = ConnectionConfig::from_connection_string("mysql://127.0.0.1:1/plyql1").unwrap();

    let error = MySqlClient::connect(&config).await.unwrap_err();

    assert!(matches!(error, ReportError::Connection { .. }));
    assert!(error.to_string().contains("127.0.0.1:1"));
    assert!(std::error::Error::source(&error).is_some());
}

#[tokio::test(flavor = "current_thread")]
async fn test_connect_with_invalid_host() {
    let config = ConnectionConfig {
        host: Some("invalid.host.that.does.not.exist.local".to_string()),
        database: Some("plyql1".to_string()),
        ..Default::default()
    };

    let error = MySqlClient::connect(&config).await.unwrap_err();

    // The underlying resolver message varies by system
    assert_eq!(error.category(), "Connection Error");
}

#[tokio::test(flavor = "current_thread")]
async fn test_connect_without_database_is_config_error() {
    let config = ConnectionConfig {
        host: Some("127.0.0.1".to_string()),
        ..Default::default()
    };

    let error = MySqlClient::connect(&config).await.unwrap_err();

    assert_eq!(error.category(), "Configuration Error");
}
