//! Live SQL Server catalog over tiberius.
//!
//! tiberius is async; the scripter is not. [`MssqlCatalog`] owns a
//! current-thread tokio runtime and blocks on every round trip, so exactly
//! one statement is in flight at a time.

use std::time::{Duration, Instant};

use tiberius::{AuthMethod, Client, ColumnData, Config};
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::debug;

use super::{Catalog, CatalogError, Row, SqlValue};

type SqlClient = Client<Compat<TcpStream>>;

/// Session options matching what Management Studio sets on connect.
const SESSION_OPTIONS: &[(&str, &str)] = &[
    ("ROWCOUNT", "0"),
    ("TEXTSIZE", "2147483647"),
    ("NOCOUNT", "OFF"),
    ("CONCAT_NULL_YIELDS_NULL", "ON"),
    ("ARITHABORT", "ON"),
    ("ANSI_NULLS", "ON"),
    ("ANSI_PADDING", "ON"),
    ("ANSI_WARNINGS", "ON"),
    ("CURSOR_CLOSE_ON_COMMIT", "OFF"),
    ("IMPLICIT_TRANSACTIONS", "OFF"),
    ("QUOTED_IDENTIFIER", "ON"),
    ("TRANSACTION ISOLATION LEVEL", "READ COMMITTED"),
];

/// Where and how to connect.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Initial database; the server default when `None`.
    pub database: Option<String>,
    pub trust_cert: bool,
    pub application_name: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1433,
            user: "sa".to_string(),
            password: String::new(),
            database: None,
            trust_cert: true,
            application_name: "rust-sqlscripter".to_string(),
        }
    }
}

impl ConnectionConfig {
    /// Defaults overridden by `SQL_SERVER_HOST`, `SQL_SERVER_PORT`,
    /// `SQL_SERVER_USER`, `SQL_SERVER_PASSWORD` and `SQL_SERVER_DATABASE`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("SQL_SERVER_HOST").unwrap_or(defaults.host),
            port: std::env::var("SQL_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            user: std::env::var("SQL_SERVER_USER").unwrap_or(defaults.user),
            password: std::env::var("SQL_SERVER_PASSWORD").unwrap_or(defaults.password),
            database: std::env::var("SQL_SERVER_DATABASE").ok(),
            ..defaults
        }
    }

    fn to_tiberius(&self) -> Config {
        let mut config = Config::new();
        config.host(&self.host);
        config.port(self.port);
        config.authentication(AuthMethod::sql_server(&self.user, &self.password));
        config.application_name(&self.application_name);
        if self.trust_cert {
            config.trust_cert();
        }
        if let Some(db) = &self.database {
            config.database(db);
        }
        config
    }
}

/// Blocking SQL Server connection implementing [`Catalog`].
pub struct MssqlCatalog {
    runtime: Runtime,
    client: SqlClient,
    label: String,
    query_count: usize,
    query_time: Duration,
}

impl MssqlCatalog {
    pub fn connect(config: &ConnectionConfig) -> Result<Self, CatalogError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let tiberius_config = config.to_tiberius();
        let client = runtime.block_on(async {
            let tcp = TcpStream::connect(tiberius_config.get_addr()).await?;
            tcp.set_nodelay(true)?;
            let client = Client::connect(tiberius_config, tcp.compat_write()).await?;
            Ok::<_, CatalogError>(client)
        })?;

        let mut catalog = Self {
            runtime,
            client,
            label: format!("{}@{}:{}", config.user, config.host, config.port),
            query_count: 0,
            query_time: Duration::ZERO,
        };

        let set_options = SESSION_OPTIONS
            .iter()
            .map(|(name, value)| format!("SET {} {};", name, value))
            .collect::<Vec<_>>()
            .join(" ");
        catalog.execute(&set_options)?;

        Ok(catalog)
    }

    /// Statements issued since connecting.
    pub fn query_count(&self) -> usize {
        self.query_count
    }

    /// Total time spent waiting on the server.
    pub fn query_time(&self) -> Duration {
        self.query_time
    }

    fn timed<T>(
        &mut self,
        sql: &str,
        run: impl FnOnce(&Runtime, &mut SqlClient) -> Result<T, CatalogError>,
    ) -> Result<T, CatalogError> {
        debug!(target: "rust_sqlscripter::sql", connection = %self.label, "{}", sql);
        let started = Instant::now();
        self.query_count += 1;
        let result = run(&self.runtime, &mut self.client);
        let elapsed = started.elapsed();
        self.query_time += elapsed;
        debug!(elapsed_ms = elapsed.as_millis() as u64, "query finished");
        result
    }
}

impl Catalog for MssqlCatalog {
    fn query_rows(&mut self, sql: &str) -> Result<Vec<Row>, CatalogError> {
        self.timed(sql, |runtime, client| {
            let rows = runtime.block_on(async {
                client.simple_query(sql).await?.into_first_result().await
            })?;
            Ok(rows.into_iter().map(convert_row).collect())
        })
    }

    fn execute(&mut self, sql: &str) -> Result<(), CatalogError> {
        self.timed(sql, |runtime, client| {
            runtime.block_on(async { client.simple_query(sql).await?.into_results().await })?;
            Ok(())
        })
    }
}

fn convert_row(row: tiberius::Row) -> Row {
    let names: Vec<String> = row
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    names
        .into_iter()
        .zip(row.into_iter().map(convert_value))
        .collect()
}

fn convert_value(data: ColumnData<'static>) -> SqlValue {
    match data {
        ColumnData::Bit(v) => v.into(),
        ColumnData::U8(v) => v.map(i64::from).into(),
        ColumnData::I16(v) => v.map(i64::from).into(),
        ColumnData::I32(v) => v.map(i64::from).into(),
        ColumnData::I64(v) => v.into(),
        ColumnData::F32(v) => v.map(f64::from).into(),
        ColumnData::F64(v) => v.into(),
        ColumnData::String(v) => v.map(|s| s.into_owned()).into(),
        ColumnData::Binary(v) => v.map(|b| b.into_owned()).into(),
        // The scripter's queries convert everything else to one of the types
        // above; keep a readable rendering for anything that slips through.
        other => SqlValue::Text(format!("{:?}", other)),
    }
}
