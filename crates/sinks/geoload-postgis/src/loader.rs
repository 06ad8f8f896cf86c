//! Table replace over a live PostgreSQL connection.

use async_trait::async_trait;
use geoload_core_common::schema::infer_columns;
use geoload_core_common::{ColumnSchema, Crs, Feature, RelationalSink, SinkError, SinkResult};
use log::{debug, error, info};
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls};

use crate::config::PostgisConfig;
use crate::ddl;
use crate::value::SqlValue;

/// Writes feature collections to PostGIS tables.
pub struct PostgisSink {
    client: Client,
}

impl PostgisSink {
    /// Opens a connection and spawns its driver task on the current runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Connection`] if the server cannot be reached or
    /// rejects the login.
    pub async fn connect(config: &PostgisConfig) -> SinkResult<Self> {
        let endpoint = config.endpoint();
        info!("Connecting to PostGIS at {endpoint}");
        let (client, connection) = config
            .to_pg_config()
            .connect(NoTls)
            .await
            .map_err(|e| SinkError::Connection {
                endpoint: endpoint.clone(),
                message: format_pg_error(&e),
            })?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("PostgreSQL connection error: {e}");
            }
        });

        Ok(Self { client })
    }

    /// Wraps an already connected client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn replace_table(&mut self, table: &str, features: &[Feature], crs: Crs) -> SinkResult<()> {
        let schema = infer_columns(features);
        ddl::check_identifiers(table, &schema)?;
        debug!(
            "Table {table}: {} column(s) [{}]",
            schema.len(),
            schema.names().collect::<Vec<_>>().join(", ")
        );

        let tx = self
            .client
            .transaction()
            .await
            .map_err(|e| query_error("begin transaction", &e))?;

        tx.batch_execute(&ddl::drop_table(table))
            .await
            .map_err(|e| query_error("drop table", &e))?;
        tx.batch_execute(&ddl::create_table(table, &schema, crs))
            .await
            .map_err(|e| query_error("create table", &e))?;

        let insert = tx
            .prepare(&ddl::insert_row(table, &schema, crs))
            .await
            .map_err(|e| query_error("prepare insert", &e))?;

        for feature in features {
            let (values, geometry) = row_values(&schema, feature)?;
            let mut params: Vec<&(dyn ToSql + Sync)> =
                values.iter().map(|v| v as &(dyn ToSql + Sync)).collect();
            params.push(&geometry);

            tx.execute(&insert, &params)
                .await
                .map_err(|e| query_error("insert row", &e))?;
        }

        tx.batch_execute(&ddl::create_spatial_index(table))
            .await
            .map_err(|e| query_error("create spatial index", &e))?;
        tx.commit().await.map_err(|e| query_error("commit", &e))?;
        Ok(())
    }

    async fn count(&self, table: &str) -> SinkResult<u64> {
        let row = self
            .client
            .query_one(&ddl::count_rows(table), &[])
            .await
            .map_err(|e| query_error("count rows", &e))?;
        let count: i64 = row.try_get(0).map_err(|e| query_error("count rows", &e))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[async_trait]
impl RelationalSink for PostgisSink {
    async fn load(&mut self, table: &str, features: &[Feature], crs: Crs) -> SinkResult<u64> {
        info!("Loading {} feature(s) into {table} ({crs})", features.len());
        self.replace_table(table, features, crs).await?;
        let count = self.count(table).await?;
        info!("Table {table} now holds {count} row(s)");
        Ok(count)
    }
}

/// Statement parameters for one feature: a value per schema column, in
/// schema order, and the geometry as GeoJSON text (`None` binds `NULL`).
pub(crate) fn row_values(
    schema: &ColumnSchema,
    feature: &Feature,
) -> SinkResult<(Vec<SqlValue>, Option<String>)> {
    let values = schema
        .columns()
        .iter()
        .map(|column| SqlValue::for_column(feature.properties.get(&column.name), column))
        .collect::<SinkResult<Vec<_>>>()?;
    let geometry = feature
        .geometry
        .as_ref()
        .map(|g| g.to_json().to_string());
    Ok((values, geometry))
}

fn query_error(operation: &str, error: &tokio_postgres::Error) -> SinkError {
    SinkError::Query {
        operation: operation.to_string(),
        message: format_pg_error(error),
    }
}

fn format_pg_error(error: &tokio_postgres::Error) -> String {
    match error.as_db_error() {
        Some(db_error) => {
            let mut message = format!("{} (sqlstate {})", db_error.message(), db_error.code().code());
            if let Some(detail) = db_error.detail() {
                message.push_str(": ");
                message.push_str(detail);
            }
            message
        },
        None => error.to_string(),
    }
}
