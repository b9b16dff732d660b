//! Statement splitting.
//!
//! Schema sources usually hold many statements separated by `;`. A `;` only
//! ends a statement when it is outside every quoted span and comment, which
//! is tracked by a single left-to-right scan.

use std::sync::LazyLock;

use regex_lite::Regex;

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*(?s:.*?)\*/").expect("block comment pattern"));
static DASH_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-- .*\n").expect("dash comment pattern"));
static SHARP_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#.*\n").expect("sharp comment pattern"));

/// The span the scanner is currently inside of. At most one can be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Open {
    Nothing,
    LineComment,
    Backtick,
    SingleQuote,
    DoubleQuote,
}

impl Open {
    fn quote(byte: u8) -> Option<Self> {
        match byte {
            b'`' => Some(Self::Backtick),
            b'\'' => Some(Self::SingleQuote),
            b'"' => Some(Self::DoubleQuote),
            _ => None,
        }
    }

    fn is_string(self) -> bool {
        matches!(self, Self::SingleQuote | Self::DoubleQuote)
    }
}

/// Remove block comments and line comments that end with a newline.
///
/// Carriage returns are normalized to `\n` first. A `#` comment on the last
/// line without a trailing newline is left for the scanner.
pub fn strip_comments(input: &str) -> String {
    let text = input.replace("\r\n", "\n").replace('\r', "\n");
    let text = BLOCK_COMMENT.replace_all(&text, "");
    let text = DASH_COMMENT.replace_all(&text, "\n");
    SHARP_COMMENT.replace_all(&text, "\n").into_owned()
}

/// Split schema source into statements.
///
/// Each statement keeps its terminating `;`. Whatever follows the last
/// terminator is returned as a final statement, even when a quote is left
/// unterminated. Statements holding nothing but whitespace and `;` are
/// dropped. Never fails.
pub fn split_statements(input: &str) -> Vec<String> {
    let text = strip_comments(input);
    let bytes = text.as_bytes();

    let mut statements = Vec::new();
    let mut open = Open::Nothing;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        match (open, byte) {
            (Open::Nothing, b'#') => open = Open::LineComment,
            (Open::LineComment, b'\n') => open = Open::Nothing,
            (Open::Nothing, b';') => {
                push_statement(&mut statements, &text[start..=i]);
                start = i + 1;
            }
            (current, b'\\') if current.is_string() => i += 1,
            (Open::Nothing, _) => {
                if let Some(quote) = Open::quote(byte) {
                    open = quote;
                }
            }
            (current, _) if Open::quote(byte) == Some(current) => open = Open::Nothing,
            _ => {}
        }
        i += 1;
    }

    if start < text.len() {
        push_statement(&mut statements, &text[start..]);
    }

    tracing::debug!(count = statements.len(), "split schema source");
    statements
}

fn push_statement(statements: &mut Vec<String>, statement: &str) {
    if !statement.trim().trim_end_matches(';').trim().is_empty() {
        statements.push(statement.to_string());
    }
}
