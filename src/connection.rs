use crate::{
    options::ScriptOptions,
    result::ScriptResult,
    runner::ScriptRunner,
    runner_sqlite::{execute_sql_script_sqlite, execute_sql_string_sqlite},
};
use rusqlite::Connection;

/// Database connection enum that holds different synchronous database backends
pub enum DatabaseConnection {
    /// SQLite connection
    SQLite(Connection),
}

impl ScriptRunner for DatabaseConnection {
    fn execute_sql_script(
        &mut self,
        path: &str,
        options: &ScriptOptions,
    ) -> anyhow::Result<ScriptResult> {
        match self {
            DatabaseConnection::SQLite(conn) => execute_sql_script_sqlite(conn, path, options),
        }
    }

    fn execute_sql_string(
        &mut self,
        sql: &str,
        options: &ScriptOptions,
    ) -> anyhow::Result<ScriptResult> {
        match self {
            DatabaseConnection::SQLite(conn) => execute_sql_string_sqlite(conn, sql, options),
        }
    }
}
