/// Lexical predicates used while splitting SQL scripts: comment lines, compound block
/// boundaries and string literal tracking
use regex::Regex;

// Regexes compiled once as lazy statics for performance
static ROUTINE_HEADER_REGEX: once_cell::sync::Lazy<Regex> = once_cell::sync::Lazy::new(|| {
    Regex::new(r"(?i)^(?:create\s+(?:or\s+replace\s+)?)?(?:procedure|function)\b").unwrap()
});
// A `BEGIN` word, with the transaction-control qualifier captured when present
static BEGIN_WORD_REGEX: once_cell::sync::Lazy<Regex> = once_cell::sync::Lazy::new(|| {
    Regex::new(r"(?i)\bbegin\b(\s+(?:transaction|tran|work|deferred|immediate|exclusive)\b)?")
        .unwrap()
});
static BLOCK_END_REGEX: once_cell::sync::Lazy<Regex> =
    once_cell::sync::Lazy::new(|| Regex::new(r"(?i)^end\b").unwrap());
static CONTROL_FLOW_END_REGEX: once_cell::sync::Lazy<Regex> = once_cell::sync::Lazy::new(|| {
    Regex::new(r"(?i)^end\s+(?:if|loop|case|while|repeat)\b").unwrap()
});

/// Check if a script line is skipped entirely: `#` or `--` comments, or a lone `/`
pub fn is_comment_line(line: &str) -> bool {
    let line = line.trim();
    line.starts_with('#') || line.starts_with("--") || line == "/"
}

/// Check if text starts a stored routine: `[CREATE [OR REPLACE]] PROCEDURE|FUNCTION`
pub fn is_routine_header(text: &str) -> bool {
    ROUTINE_HEADER_REGEX.is_match(text.trim())
}

/// Count the `BEGIN ... END` blocks opened by text.
///
/// Every whole-word `BEGIN` counts: a leading one (anonymous blocks, procedure
/// bodies), a trailing one (`CREATE PROCEDURE p() BEGIN`) or one in the middle of a
/// one-line trigger. Transaction control such as `BEGIN TRANSACTION` is not a block.
/// Literal content should be masked first with [`LiteralScanner::mask_literals`].
pub fn count_block_openings(text: &str) -> usize {
    BEGIN_WORD_REGEX
        .captures_iter(text)
        .filter(|caps| caps.get(1).is_none())
        .count()
}

/// Check if text is exactly `BEGIN`: when `;`-terminated it starts a transaction
pub fn is_bare_begin(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("begin")
}

/// Check if text is `END IF`, `END LOOP`, `END CASE`, `END WHILE` or `END REPEAT`
pub fn is_control_flow_end(text: &str) -> bool {
    CONTROL_FLOW_END_REGEX.is_match(text.trim())
}

/// Check if a `;`-terminated fragment closes a block: `END` or `END name`, but not a
/// control-flow terminator
pub fn closes_block(text: &str) -> bool {
    let text = text.trim();
    BLOCK_END_REGEX.is_match(text) && !is_control_flow_end(text)
}

/// Check if a finished statement ends with a block terminator such as `... END;`
pub fn ends_with_block_terminator(statement: &str) -> bool {
    let Some(body) = statement.trim_end().strip_suffix(';') else {
        return false;
    };
    let last_fragment = body.rsplit(';').next().unwrap_or(body);
    closes_block(last_fragment)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
enum LiteralState {
    #[default]
    Code,
    Quoted,
    // `$tag$ ... $tag$`, the tag is empty for `$$`
    DollarQuoted(String),
}

/// Tracks whether scanning is inside a string literal: single-quoted, or a
/// PostgreSQL dollar-quoted body (`$$ ... $$`, `$tag$ ... $tag$`).
///
/// Inside a single-quoted literal, a doubled quote (`''`) and a backslash escape (`\'`)
/// are literal content and do not end it. A dollar-quoted literal ends only at the same
/// tag. The state carries over between successive calls to [`LiteralScanner::scan`],
/// so a literal may span fragments and lines.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LiteralScanner {
    state: LiteralState,
}

impl LiteralScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last scanned character left a literal open
    pub fn is_open(&self) -> bool {
        self.state != LiteralState::Code
    }

    /// Whether the open literal is a dollar-quoted body
    pub fn is_dollar_quoted(&self) -> bool {
        matches!(self.state, LiteralState::DollarQuoted(_))
    }

    pub fn reset(&mut self) {
        self.state = LiteralState::Code;
    }

    /// Advance the literal state over `text`
    pub fn scan(&mut self, text: &str) {
        self.walk(text, |_, _| true);
    }

    /// Byte offset of the first `--` or `#` comment in `text` that lies outside a
    /// literal, scanning from the current state without advancing it.
    ///
    /// `#` only starts a comment as a separate word (`# note`), so `#temp` table
    /// names and `a#b` are kept.
    pub fn comment_start(&self, text: &str) -> Option<usize> {
        let bytes = text.as_bytes();
        let mut found = None;
        let mut lookahead = self.clone();
        lookahead.walk(text, |idx, in_code| {
            if in_code && is_comment_marker(bytes, idx) {
                found = Some(idx);
                return false;
            }
            true
        });
        found
    }

    /// Copy of `text` with literal content and quote delimiters blanked out, scanning
    /// from the current state without advancing it. Keyword checks run on this copy.
    pub fn mask_literals(&self, text: &str) -> String {
        let mut masked = text.as_bytes().to_vec();
        let mut lookahead = self.clone();
        lookahead.walk(text, |idx, in_code| {
            if !in_code {
                masked[idx] = b' ';
            }
            true
        });
        String::from_utf8_lossy(&masked).into_owned()
    }

    /// Visit every byte of `text` with whether it is code (outside any literal and
    /// its delimiters). Stops early when `visit` returns `false`.
    fn walk(&mut self, text: &str, mut visit: impl FnMut(usize, bool) -> bool) {
        let bytes = text.as_bytes();
        let mut idx = 0;
        while idx < bytes.len() {
            let (len, in_code) = match &self.state {
                LiteralState::Code => match bytes[idx] {
                    b'\'' => {
                        self.state = LiteralState::Quoted;
                        (1, false)
                    }
                    b'$' if !follows_identifier(bytes, idx) => match dollar_tag(&text[idx..]) {
                        Some(tag) => {
                            self.state = LiteralState::DollarQuoted(tag.to_string());
                            (tag.len() + 2, false)
                        }
                        None => (1, true),
                    },
                    _ => (1, true),
                },
                LiteralState::Quoted => match bytes[idx] {
                    b'\\' => (2, false),
                    b'\'' if bytes.get(idx + 1) == Some(&b'\'') => (2, false),
                    b'\'' => {
                        self.state = LiteralState::Code;
                        (1, false)
                    }
                    _ => (1, false),
                },
                LiteralState::DollarQuoted(tag) => {
                    let closes = bytes[idx] == b'$' && dollar_tag(&text[idx..]) == Some(tag.as_str());
                    let len = tag.len() + 2;
                    if closes {
                        self.state = LiteralState::Code;
                        (len, false)
                    } else {
                        (1, false)
                    }
                }
            };

            let end = (idx + len).min(bytes.len());
            for byte_idx in idx..end {
                if !visit(byte_idx, in_code) {
                    return;
                }
            }
            idx = end;
        }
    }
}

/// The tag of a `$tag$` delimiter at the start of `text`: empty or an identifier
fn dollar_tag(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('$')?;
    let tag = &rest[..rest.find('$')?];
    let mut chars = tag.chars();
    match chars.next() {
        None => Some(tag),
        Some(first) if first.is_alphabetic() || first == '_' => chars
            .all(|ch| ch.is_alphanumeric() || ch == '_')
            .then_some(tag),
        Some(_) => None,
    }
}

// `v$session` or `a$b$` is part of a name, not a quote
fn follows_identifier(bytes: &[u8], idx: usize) -> bool {
    idx > 0 && {
        let prev = bytes[idx - 1];
        prev.is_ascii_alphanumeric() || prev == b'_' || prev == b'$' || prev >= 0x80
    }
}

fn is_comment_marker(bytes: &[u8], idx: usize) -> bool {
    match bytes[idx] {
        b'-' => bytes.get(idx + 1) == Some(&b'-'),
        b'#' => {
            (idx == 0 || bytes[idx - 1].is_ascii_whitespace())
                && bytes.get(idx + 1).is_none_or(u8::is_ascii_whitespace)
        }
        _ => false,
    }
}
