//! Fancy diagnostics support using `ariadne`.
//!
//! This module converts [`DecodeWarningWithRange`] into `ariadne::Report`. The warnings carry the byte range
//! of the line that caused them, and ariadne calculates the rows and columns from it.
//!
//! # Usage Example
//!
//! ```rust
//! use dtx_chart::{
//!     diagnostics::emit_dtx_warnings,
//!     dtx::{DecodeConfig, parse_dtx},
//! };
//!
//! let source = "; Created by DTXCreator 024\n#BPM: 120\n#UNKNOWN: command\n";
//! let output = parse_dtx(source, DecodeConfig::dtx()).unwrap();
//!
//! emit_dtx_warnings("test.dtx", source, &output.warnings);
//! ```

use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::dtx::{DecodeWarning, DecodeWarningWithRange};

/// Simple source container that holds the filename and source text.
///
/// # Usage Example
///
/// ```rust
/// use dtx_chart::diagnostics::SimpleSource;
///
/// let source_text = "#TITLE: test\n#ARTIST: composer\n";
/// let source = SimpleSource::new("test.dtx", source_text);
///
/// assert_eq!(source.text(), source_text);
/// assert_eq!(source.name(), "test.dtx");
/// ```
pub struct SimpleSource<'a> {
    name: &'a str,
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Create a new source container instance.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Get source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Get source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }
}

/// Trait for converting positioned warnings to `ariadne::Report`.
pub trait ToAriadne {
    /// Convert the warning to ariadne Report. `src` is used for its filename.
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)>;
}

/// Helper to build a styled ariadne `Report` consistently.
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> Report<'a, (String, Range<usize>)> {
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message.to_string())
                .with_color(color),
        )
        .finish()
}

impl ToAriadne for DecodeWarningWithRange {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)> {
        let (title, color) = match self.content() {
            DecodeWarning::UnsupportedHeader { .. } => ("decode: header", Color::Yellow),
            DecodeWarning::UnknownCommand(_) => ("decode: command", Color::Blue),
            DecodeWarning::InvalidNumber { .. } => ("decode: number", Color::Red),
            DecodeWarning::InvalidBpmLabel { .. } | DecodeWarning::UndefinedBpmLabel { .. } => {
                ("decode: tempo", Color::Red)
            }
            DecodeWarning::DuplicateMessage { .. } => ("decode: message", Color::Yellow),
        };
        build_report(
            src,
            ReportKind::Warning,
            self.range(),
            title,
            self.content(),
            color,
        )
    }
}

/// Prints the reports of `warnings` to the standard error.
pub fn emit_dtx_warnings<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a DecodeWarningWithRange>,
) {
    let simple = SimpleSource::new(name, source);
    let ariadne_source = Source::from(source);
    for warning in warnings {
        let report = warning.to_report(&simple);
        if let Err(e) = report.eprint((name.to_string(), ariadne_source.clone())) {
            log::warn!("failed to print a diagnostic: {e}");
        }
    }
}

/// Collect `ariadne::Report` instances for `warnings` without printing.
#[must_use]
pub fn collect_dtx_reports<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a DecodeWarningWithRange>,
) -> Vec<Report<'a, (String, Range<usize>)>> {
    let simple = SimpleSource::new(name, source);
    warnings
        .into_iter()
        .map(|warning| warning.to_report(&simple))
        .collect()
}
