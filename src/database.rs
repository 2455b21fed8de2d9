use serde::Deserialize;
use snafu::{Location, ResultExt as _, Snafu};
use surrealdb::engine::any::Any;
use surrealdb::opt::auth;
use surrealdb::Surreal;
use tracing::instrument;
use url::Url;

pub mod macros;
mod record;

pub use record::Record;
pub use surrealdb::sql::Thing;

pub type Result<T, E = DatabaseError> = std::result::Result<T, E>;

const SCHEMA: &str = include_str!("../schema.surrealql");

const DEFAULT_NAMESPACE: &str = "chaintalk";
const DEFAULT_DATABASE: &str = "site";
const IN_MEMORY: &str = "mem://";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DatabaseError {
    #[snafu(display("cannot connect to the database `{endpoint}` at {location}: {source}"))]
    DatabaseConnection {
        endpoint: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("cannot sign in to the database as `{username}` at {location}: {source}"))]
    SignIn {
        username: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("cannot select namespace `{namespace}` and database `{database}` at {location}: {source}"))]
    SelectDatabase {
        namespace: String,
        database: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to apply the database schema at {location}: {source}"))]
    ApplySchema {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to query the database at {location}: {source}"))]
    DatabaseQuery {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to parse the database response at {location}: response is empty"))]
    EmptyQuery {
        #[snafu(implicit)]
        location: Location,
    },
}

/// A model stored in its own table.
pub trait Table {
    fn table() -> &'static str;
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(rename = "surreal_url")]
    pub url: Url,
    #[serde(rename = "surreal_ns", default = "default_namespace")]
    pub namespace: String,
    #[serde(rename = "surreal_db", default = "default_database")]
    pub database: String,
    #[serde(flatten)]
    pub credentials: Option<DatabaseCredentials>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseCredentials {
    #[serde(rename = "surreal_name")]
    pub username: String,
    #[serde(rename = "surreal_pass")]
    pub password: String,
}

impl DatabaseConfig {
    fn auth(&self) -> Option<auth::Database<'_>> {
        let credentials = self.credentials.as_ref()?;

        Some(auth::Database {
            namespace: &self.namespace,
            database: &self.database,
            username: &credentials.username,
            password: &credentials.password,
        })
    }
}

/// Represents a database wrapper.
///
/// The wrapper owns the connection and guarantees that the namespace is selected
/// and the schema in `schema.surrealql` is applied before anyone can query it.
#[derive(Debug, Clone)]
pub struct Database {
    database: Surreal<Any>,
}

impl Database {
    #[instrument(skip(config), fields(url = %config.url))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let database = surrealdb::engine::any::connect(config.url.as_str())
            .await
            .context(DatabaseConnectionSnafu {
                endpoint: config.url.to_string(),
            })?;

        if let Some(credentials) = config.auth() {
            let username = credentials.username.to_string();
            database
                .signin(credentials)
                .await
                .context(SignInSnafu { username })?;
        }

        Self::prepare(database, &config.namespace, &config.database).await
    }

    /// An embedded database that lives as long as the process does.
    pub async fn in_memory() -> Result<Self> {
        let database = surrealdb::engine::any::connect(IN_MEMORY)
            .await
            .context(DatabaseConnectionSnafu {
                endpoint: IN_MEMORY,
            })?;

        Self::prepare(database, DEFAULT_NAMESPACE, DEFAULT_DATABASE).await
    }

    async fn prepare(database: Surreal<Any>, namespace: &str, name: &str) -> Result<Self> {
        database
            .use_ns(namespace)
            .use_db(name)
            .await
            .context(SelectDatabaseSnafu {
                namespace,
                database: name,
            })?;

        database
            .query(SCHEMA)
            .await
            .context(ApplySchemaSnafu)?
            .check()
            .context(ApplySchemaSnafu)?;

        tracing::info!(namespace, database = name, "database schema applied");

        Ok(Self { database })
    }
}

impl std::ops::Deref for Database {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.database
    }
}

/// Whether the error is the database refusing a row because of a `UNIQUE` index.
///
/// Embedded engines report a typed error, remote engines only send the message text.
pub fn is_unique_violation(error: &surrealdb::Error) -> bool {
    match error {
        surrealdb::Error::Db(surrealdb::error::Db::IndexExists { .. }) => true,
        surrealdb::Error::Api(surrealdb::error::Api::Query(message)) => {
            message.contains("already contains")
        }
        _ => false,
    }
}
