use crate::{
    options::ScriptOptions,
    result::{ScriptError, ScriptResult},
    runner::{prepare_script_statements, prepare_statement},
};
use rusqlite::Connection;

/// Execute each statement in order, stopping at the first failure
/// SQLite-specific due to rusqlite::Connection (a Transaction derefs to it)
fn execute_statements(conn: &Connection, statements: &[String]) -> anyhow::Result<()> {
    for (index, statement) in statements.iter().enumerate() {
        log::debug!("Executing statement {index}: {statement}");
        // execute_batch accepts statements that return rows, unlike execute()
        conn.execute_batch(statement).map_err(|e| {
            log::error!("Statement {index} failed: {e}");
            ScriptError::new_statement_failed(index, statement.as_str(), e)
        })?;
    }
    Ok(())
}

/// Run prepared statements either inside one transaction or in autocommit mode
fn run_statements(
    conn: &mut Connection,
    statements: Vec<String>,
    options: &ScriptOptions,
) -> anyhow::Result<ScriptResult> {
    if options.sans_tran {
        execute_statements(conn, &statements)?;
    } else {
        let tx = conn
            .transaction()
            .map_err(|e| ScriptError::Database(e.to_string()))?;

        // Dropping the transaction on error rolls back every statement of the script
        execute_statements(&tx, &statements)?;

        tx.commit()
            .map_err(|e| ScriptError::Database(e.to_string()))?;
    }

    Ok(ScriptResult {
        sql_statements: statements,
    })
}

/// Execute a SQL script file with SQLite backend
/// This is the main entry point for SQLite script operations
pub fn execute_sql_script_sqlite(
    conn: &mut Connection,
    path: &str,
    options: &ScriptOptions,
) -> anyhow::Result<ScriptResult> {
    log::info!("Executing : Execute SQL Script  |  {path}");
    let statements = prepare_script_statements(path, options)?;
    run_statements(conn, statements, options)
}

/// Execute a SQL string as one submission with SQLite backend
pub fn execute_sql_string_sqlite(
    conn: &mut Connection,
    sql: &str,
    options: &ScriptOptions,
) -> anyhow::Result<ScriptResult> {
    log::info!("Executing : Execute SQL String  |  {sql}");
    let statement = prepare_statement(sql, options.omit_trailing_semicolon);
    if statement.is_empty() {
        return Err(ScriptError::new_invalid_input("SQL string is empty").into());
    }
    run_statements(conn, vec![statement], options)
}
