use crate::{
    options::ScriptOptions,
    result::{Result, ScriptResult},
    splitter::split_sql_bytes,
    str_utils::ends_with_block_terminator,
};
use std::fs;

/// Trait for executing SQL scripts and strings against different database backends
pub trait ScriptRunner {
    /// Split the script file at `path` into statements and execute them in order
    fn execute_sql_script(
        &mut self,
        path: &str,
        options: &ScriptOptions,
    ) -> anyhow::Result<ScriptResult>;

    /// Execute `sql` as a single submission
    fn execute_sql_string(
        &mut self,
        sql: &str,
        options: &ScriptOptions,
    ) -> anyhow::Result<ScriptResult>;
}

/// Apply the trailing-semicolon policy to one statement before it is submitted.
///
/// Some drivers reject a trailing `;`, so it is stripped when `omit_trailing_semicolon`
/// is set, except after a block terminator (`END;`) which the statement needs.
pub fn prepare_statement(statement: &str, omit_trailing_semicolon: bool) -> String {
    let statement = statement.trim();
    if omit_trailing_semicolon && !ends_with_block_terminator(statement) {
        statement.trim_end_matches(';').trim_end().to_string()
    } else {
        statement.to_string()
    }
}

/// Read and split a script file, then apply the trailing-semicolon policy to each statement
pub fn prepare_script_statements(path: &str, options: &ScriptOptions) -> Result<Vec<String>> {
    let bytes = fs::read(path)?;
    let statements = split_sql_bytes(&bytes, &options.split_options())?;
    Ok(statements
        .iter()
        .map(|statement| prepare_statement(statement, options.omit_trailing_semicolon))
        .filter(|statement| !statement.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ScriptError;

    #[test]
    fn test_prepare_statement_strips_semicolon() {
        assert_eq!(prepare_statement("DELETE FROM a;", true), "DELETE FROM a");
        assert_eq!(prepare_statement("  DELETE FROM a ;  ", true), "DELETE FROM a");
        assert_eq!(prepare_statement("DELETE FROM a", true), "DELETE FROM a");
    }

    #[test]
    fn test_prepare_statement_keeps_semicolon_when_not_omitting() {
        assert_eq!(prepare_statement("DELETE FROM a;", false), "DELETE FROM a;");
        assert_eq!(prepare_statement(" DELETE FROM a ", false), "DELETE FROM a");
    }

    #[test]
    fn test_prepare_statement_keeps_block_terminator() {
        let block = "BEGIN DELETE FROM a; DELETE FROM b; END;";
        assert_eq!(prepare_statement(block, true), block);
        assert_eq!(prepare_statement("BEGIN NULL; END p;", true), "BEGIN NULL; END p;");
    }

    #[test]
    fn test_prepare_statement_strips_after_control_flow_end() {
        assert_eq!(
            prepare_statement("IF x THEN DELETE FROM a; END IF;", true),
            "IF x THEN DELETE FROM a; END IF"
        );
    }

    #[test]
    fn test_prepare_script_statements_missing_file() {
        let result =
            prepare_script_statements("test_sql/does_not_exist.sql", &ScriptOptions::default());
        assert!(matches!(result, Err(ScriptError::Io(_))));
    }
}
