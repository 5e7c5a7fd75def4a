pub mod options;
pub mod result;
pub mod runner;
pub mod splitter;
pub mod str_utils;

#[cfg(feature = "sqlite")]
pub mod connection;
#[cfg(feature = "postgresql")]
pub mod runner_postgresql;
#[cfg(feature = "sqlite")]
pub mod runner_sqlite;

// Re-export types for convenience
pub use options::ScriptOptions;
pub use result::{Result, ScriptError, ScriptResult};
pub use runner::{ScriptRunner, prepare_statement};
pub use splitter::{BlockNesting, SplitOptions, split_sql_script, split_sql_script_with};

#[cfg(feature = "sqlite")]
pub use connection::DatabaseConnection;
#[cfg(feature = "postgresql")]
pub use runner_postgresql::{
    execute_sql_script_postgresql, execute_sql_string_postgresql,
    run_statements_postgresql_with_transaction,
};
#[cfg(feature = "sqlite")]
pub use runner_sqlite::{execute_sql_script_sqlite, execute_sql_string_sqlite};

// Re-export third-party types used in the public API to provide fallback for dependency conflicts
#[cfg(feature = "sqlite")]
pub use rusqlite::Connection as SqliteConnection;
#[cfg(feature = "postgresql")]
pub use tokio_postgres::Client as PostgresClient;
