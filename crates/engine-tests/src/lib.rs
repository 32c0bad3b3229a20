#![allow(dead_code)]

use model::execution::connection::{ConnectionConfig, SslMode};
use std::env;
use tokio_postgres::{Client, NoTls};

pub mod utils;

// Test database, overridable through the environment
const TEST_PG_HOST: &str = "localhost";
const TEST_PG_PORT: u16 = 5432;
const TEST_PG_DB: &str = "testdb";
const TEST_PG_USER: &str = "user";
const TEST_PG_PASSWORD: &str = "password";

fn var(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

pub fn pg_config() -> ConnectionConfig {
    let port = env::var("TABLECOPY_TEST_PG_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(TEST_PG_PORT);

    ConnectionConfig::new(
        &var("TABLECOPY_TEST_PG_HOST", TEST_PG_HOST),
        &var("TABLECOPY_TEST_PG_DB", TEST_PG_DB),
        &var("TABLECOPY_TEST_PG_USER", TEST_PG_USER),
        &var("TABLECOPY_TEST_PG_PASSWORD", TEST_PG_PASSWORD),
    )
    .with_port(port)
    .with_sslmode(SslMode::Disable)
}

async fn pg_client() -> Client {
    let url = format!(
        "host={} port={} dbname={} user={} password={}",
        var("TABLECOPY_TEST_PG_HOST", TEST_PG_HOST),
        var("TABLECOPY_TEST_PG_PORT", &TEST_PG_PORT.to_string()),
        var("TABLECOPY_TEST_PG_DB", TEST_PG_DB),
        var("TABLECOPY_TEST_PG_USER", TEST_PG_USER),
        var("TABLECOPY_TEST_PG_PASSWORD", TEST_PG_PASSWORD),
    );
    let (client, connection) = tokio_postgres::connect(&url, NoTls)
        .await
        .expect("connect postgres");
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            eprintln!("postgres connection error: {err}");
        }
    });
    client
}

/// Drop & recreate `schemas` so each test starts empty.
async fn reset_schemas(schemas: &[&str]) -> Client {
    let client = pg_client().await;
    for schema in schemas {
        client
            .batch_execute(&format!(
                r#"DROP SCHEMA IF EXISTS "{schema}" CASCADE; CREATE SCHEMA "{schema}";"#
            ))
            .await
            .expect("reset postgres schema");
    }
    client
}
