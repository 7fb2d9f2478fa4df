//! Lexical analyzer of the chart text.
//!
//! The text is line oriented. The first line is the header signature written by the editor, and the
//! following lines starting with `#` are commands. Every other line is a comment.

use super::command::mixin::{SourceRangeMixin, SourceRangeMixinExt};

/// A command line, `#KEY: value` or `#KEY value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token<'a> {
    /// The key after `#`, as written in the source.
    pub key: &'a str,
    /// The trimmed value. Empty if the line has only the key.
    pub value: &'a str,
}

/// A token with the range of its line.
pub type TokenWithRange<'a> = SourceRangeMixin<Token<'a>>;

/// Lex result of the chart text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexOutput<'a> {
    /// The first line without the byte order mark, or `None` if the text is blank.
    pub header: Option<SourceRangeMixin<&'a str>>,
    /// The commands after the first line.
    pub tokens: Vec<TokenWithRange<'a>>,
}

/// Splits `source` into the header line and the command tokens.
///
/// The key is separated from the value by the first colon, or by the first whitespace if the line has no colon.
#[must_use]
pub fn tokenize(source: &str) -> LexOutput<'_> {
    let mut lines = lines_with_offsets(source);
    let header = if source.trim().is_empty() {
        None
    } else {
        lines.next().map(|(offset, line)| {
            let without_bom = line.trim_start_matches('\u{feff}');
            let skipped = offset + (line.len() - without_bom.len());
            let (start, header) = trim_with_offset(skipped, without_bom);
            header.into_wrapper(start..start + header.len())
        })
    };
    let tokens = lines
        .filter_map(|(offset, line)| {
            let (start, line) = trim_with_offset(offset, line);
            let command = line.strip_prefix('#')?;
            let (key, value) = match command.split_once(':') {
                Some(pair) => pair,
                None => command
                    .split_once(char::is_whitespace)
                    .unwrap_or((command, "")),
            };
            Some(
                Token {
                    key: key.trim(),
                    value: value.trim(),
                }
                .into_wrapper(start..start + line.len()),
            )
        })
        .collect();
    LexOutput { header, tokens }
}

fn lines_with_offsets(source: &str) -> impl Iterator<Item = (usize, &str)> {
    source.split('\n').scan(0, |offset, line| {
        let start = *offset;
        *offset += line.len() + 1;
        Some((start, line))
    })
}

fn trim_with_offset(offset: usize, line: &str) -> (usize, &str) {
    let trimmed_start = line.trim_start();
    (
        offset + (line.len() - trimmed_start.len()),
        trimmed_start.trim_end(),
    )
}
