//! ClickHouse health checks and schema bootstrap.

use crate::client::ClickHouseClient;
use crate::schema::{all_tables, create_database};
use engine_core::{DbErrorCode, Error, Result};
use tracing::{debug, error, info};

/// Check ClickHouse connection health.
pub async fn check_connection(client: &ClickHouseClient) -> bool {
    match client.inner().query("SELECT 1").fetch_one::<u8>().await {
        Ok(_) => {
            debug!("ClickHouse connection healthy");
            true
        }
        Err(e) => {
            error!("ClickHouse health check failed: {}", e);
            false
        }
    }
}

/// Creates the database and the enrolment table if they are missing.
pub async fn init_schema(client: &ClickHouseClient) -> Result<()> {
    client
        .server()
        .query(&create_database(&client.config().database))
        .execute()
        .await
        .map_err(|e| Error::database(DbErrorCode::WriteFailed, format!("create database: {}", e)))?;

    for ddl in all_tables() {
        client
            .inner()
            .query(ddl)
            .execute()
            .await
            .map_err(|e| Error::database(DbErrorCode::WriteFailed, format!("DDL failed: {}", e)))?;
    }

    info!(database = %client.config().database, "ClickHouse schema initialized");
    Ok(())
}
