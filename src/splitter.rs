use crate::{
    result::{Result, ScriptError},
    str_utils::{
        LiteralScanner, closes_block, count_block_openings, is_bare_begin, is_comment_line,
        is_routine_header,
    },
};
use serde::{Deserialize, Serialize};

/// How `BEGIN ... END` blocks inside a compound statement are tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockNesting {
    /// Count nested blocks; the statement ends when the outermost block closes.
    /// Every `BEGIN` word outside a literal counts, so `BEGIN BEGIN NULL; END; END;`
    /// is one statement.
    #[default]
    Nested,
    /// Single in-block flag: the first qualifying `END;` closes the statement,
    /// even when it belongs to an inner block
    Flat,
}

/// Options controlling how a script is divided into statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplitOptions {
    pub block_nesting: BlockNesting,
}

/// Compound block membership of the statement being accumulated
#[derive(Debug, Default)]
struct BlockState {
    nesting: BlockNesting,
    depth: usize,
    // A `CREATE PROCEDURE|FUNCTION` header has been seen; its body is still to come
    routine_header: bool,
}

impl BlockState {
    fn new(nesting: BlockNesting) -> Self {
        Self {
            nesting,
            ..Self::default()
        }
    }

    fn is_inside(&self) -> bool {
        self.depth > 0 || self.routine_header
    }

    fn enter_routine(&mut self) {
        self.routine_header = true;
    }

    fn enter_blocks(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        match self.nesting {
            BlockNesting::Nested => self.depth += count,
            BlockNesting::Flat => self.depth = 1,
        }
    }

    // The routine body is a dollar-quoted literal, so no `END;` will close it
    fn body_in_literal(&mut self) {
        if self.depth == 0 {
            self.routine_header = false;
        }
    }

    fn leave_block(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.routine_header = false;
        }
    }
}

/// Single-pass line/fragment state machine behind [`split_sql_script_with`]
struct ScriptSplitter {
    block: BlockState,
    literal: LiteralScanner,
    buffer: String,
    statements: Vec<String>,
}

impl ScriptSplitter {
    fn new(options: &SplitOptions) -> Self {
        Self {
            block: BlockState::new(options.block_nesting),
            literal: LiteralScanner::new(),
            buffer: String::new(),
            statements: Vec::new(),
        }
    }

    fn push_line(&mut self, line: &str) {
        // A line inside an open literal is content: kept verbatim and never a comment
        let in_literal = self.literal.is_open();
        let line = if in_literal { line } else { line.trim() };
        if !in_literal && (line.is_empty() || is_comment_line(line)) {
            return;
        }

        let mut fragments = line.split(';').peekable();
        while let Some(fragment) = fragments.next() {
            // A comment outside a literal runs to the end of the line, semicolons included
            if let Some(start) = self.literal.comment_start(fragment) {
                self.push_fragment(&fragment[..start], false);
                break;
            }
            let terminated = fragments.peek().is_some();
            self.push_fragment(fragment, terminated);
        }

        if self.literal.is_open() {
            self.buffer.push('\n');
        } else if !self.buffer.is_empty() && !self.buffer.ends_with(' ') {
            self.buffer.push(' ');
        }
    }

    /// Accumulate one fragment; `terminated` means a `;` followed it on the line
    fn push_fragment(&mut self, fragment: &str, terminated: bool) {
        if fragment.trim().is_empty() {
            if self.literal.is_open() {
                self.buffer.push_str(fragment);
                if terminated {
                    self.buffer.push(';');
                }
            } else if terminated {
                self.finish_if_complete();
            }
            return;
        }

        // Keywords only count outside literals
        let masked = self.literal.mask_literals(fragment);
        let code = masked.trim();
        if is_routine_header(code) {
            self.block.enter_routine();
        }
        if !(terminated && is_bare_begin(code)) {
            self.block.enter_blocks(count_block_openings(code));
        }

        let in_block = self.block.is_inside();
        let closing = terminated && in_block && closes_block(code);

        self.literal.scan(fragment);
        if self.literal.is_dollar_quoted() {
            self.block.body_in_literal();
        }
        self.buffer.push_str(fragment);
        if terminated && (in_block || self.literal.is_open()) {
            self.buffer.push(';');
        }

        if closing {
            self.block.leave_block();
        }
        if terminated {
            self.finish_if_complete();
        }
    }

    fn finish_if_complete(&mut self) {
        if self.block.is_inside() || self.literal.is_open() {
            return;
        }
        self.flush();
    }

    fn flush(&mut self) {
        let statement = self.buffer.trim();
        if !statement.is_empty() {
            self.statements.push(statement.to_string());
        }
        self.buffer.clear();
        self.literal.reset();
    }

    fn finish(mut self) -> Vec<String> {
        if self.literal.is_open() {
            log::warn!("SQL script ended inside an unterminated string literal");
        } else if self.block.is_inside() {
            log::warn!("SQL script ended inside an unterminated BEGIN ... END block");
        }
        self.flush();
        self.statements
    }
}

/// Split a multi-statement SQL script into individually executable statements.
///
/// Statements are separated by `;`. Whole-line `#`/`--` comments and lone `/` lines
/// are skipped, as is the rest of a line after a `--` or `#` comment. Semicolons
/// inside single-quoted and dollar-quoted (`$$ ... $$`) literals are kept, and compound
/// statements (`CREATE PROCEDURE|FUNCTION ... END;`, anonymous `BEGIN ... END;`,
/// trigger bodies) are returned whole with their internal semicolons and the final
/// `END;` intact. Other statements are returned without their terminating `;`.
/// The last statement may omit its `;`.
///
/// ```rust
/// use sqlscripthub::splitter::split_sql_script;
///
/// let statements = split_sql_script("DELETE FROM a;\nINSERT INTO b VALUES ('x;y')");
/// assert_eq!(statements, vec!["DELETE FROM a", "INSERT INTO b VALUES ('x;y')"]);
/// ```
pub fn split_sql_script(script: &str) -> Vec<String> {
    split_sql_script_with(script, &SplitOptions::default())
}

/// Split a SQL script with explicit [`SplitOptions`]
pub fn split_sql_script_with(script: &str, options: &SplitOptions) -> Vec<String> {
    let mut splitter = ScriptSplitter::new(options);
    for line in script.lines() {
        splitter.push_line(line);
    }
    splitter.finish()
}

/// Split raw script bytes, failing fast when they are not valid UTF-8 text
pub fn split_sql_bytes(script: &[u8], options: &SplitOptions) -> Result<Vec<String>> {
    let text = std::str::from_utf8(script).map_err(|e| {
        ScriptError::new_invalid_input(format!("SQL script is not valid UTF-8 text: {e}"))
    })?;
    Ok(split_sql_script_with(text, options))
}
