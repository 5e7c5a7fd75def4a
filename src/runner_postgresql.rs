use crate::{
    options::ScriptOptions,
    result::{ScriptError, ScriptResult},
    runner::{prepare_script_statements, prepare_statement},
};
use tokio_postgres::{Client, GenericClient};

// Execute each statement in order, stopping at the first failure.
// batch_execute uses the simple query protocol, so statements returning rows are accepted.
async fn execute_statements<C: GenericClient>(
    client: &C,
    statements: &[String],
) -> anyhow::Result<()> {
    for (index, statement) in statements.iter().enumerate() {
        log::debug!("Executing statement {index}: {statement}");
        client.batch_execute(statement).await.map_err(|e| {
            log::error!("Statement {index} failed: {e}");
            ScriptError::new_statement_failed(index, statement.as_str(), e)
        })?;
    }
    Ok(())
}

/// Execute prepared statements within a user-provided PostgreSQL transaction.
/// The caller manages the transaction lifecycle (begin/commit/rollback).
pub async fn run_statements_postgresql_with_transaction(
    transaction: &mut tokio_postgres::Transaction<'_>,
    statements: Vec<String>,
) -> anyhow::Result<ScriptResult> {
    execute_statements(&*transaction, &statements).await?;
    Ok(ScriptResult {
        sql_statements: statements,
    })
}

async fn run_statements(
    client: &mut Client,
    statements: Vec<String>,
    options: &ScriptOptions,
) -> anyhow::Result<ScriptResult> {
    if options.sans_tran {
        execute_statements(&*client, &statements).await?;
        return Ok(ScriptResult {
            sql_statements: statements,
        });
    }

    let mut transaction = client
        .transaction()
        .await
        .map_err(|e| ScriptError::Database(e.to_string()))?;

    // Dropping the transaction on error rolls back every statement of the script
    let result = run_statements_postgresql_with_transaction(&mut transaction, statements).await?;

    transaction
        .commit()
        .await
        .map_err(|e| ScriptError::Database(e.to_string()))?;
    Ok(result)
}

/// Execute a SQL script file with PostgreSQL backend.
/// This is the main entry point for PostgreSQL script operations.
pub async fn execute_sql_script_postgresql(
    client: &mut Client,
    path: &str,
    options: &ScriptOptions,
) -> anyhow::Result<ScriptResult> {
    log::info!("Executing : Execute SQL Script  |  {path}");
    let statements = prepare_script_statements(path, options)?;
    run_statements(client, statements, options).await
}

/// Execute a SQL string as one submission with PostgreSQL backend
pub async fn execute_sql_string_postgresql(
    client: &mut Client,
    sql: &str,
    options: &ScriptOptions,
) -> anyhow::Result<ScriptResult> {
    log::info!("Executing : Execute SQL String  |  {sql}");
    let statement = prepare_statement(sql, options.omit_trailing_semicolon);
    if statement.is_empty() {
        return Err(ScriptError::new_invalid_input("SQL string is empty").into());
    }
    run_statements(client, vec![statement], options).await
}
