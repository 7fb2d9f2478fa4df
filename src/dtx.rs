//! The decoder of DTX (.dtx) and GDA (.gda) chart files.
//!
//! This module consists of two phases: lexical analyzing and document building.
//!
//! `lex` module splits the text into the header line and `#KEY: value` tokens. `command` module provides
//! the values written in the commands, including the lane code tables of both dialects. `parse` module
//! builds a [`model::ChartDocument`] from the tokens, and `model` module defines the document.
//!
//! In detail, our policies are:
//!
//! - Support only UTF-8 (as required `&str` to input).
//! - Never abort on a malformed command. Such a command is skipped or read as zero, and reported as a warning if it is worth it.
//! - Do not support lane codes out of the tables, such as sound effects and videos. They are ignored silently.

pub mod command;
pub mod lex;
pub mod model;
pub mod parse;

use thiserror::Error;

use self::{
    command::{Dialect, Measure, mixin::SourceRangeMixin},
    model::ChartDocument,
};

/// The first lines written by the editors whose output is supported.
pub const SUPPORTED_HEADERS: [&str; 5] = [
    "; Created by DTXCreator 024",
    "; Created by DTXCreator 025(verK)",
    "; Created by DTXCreator 020",
    ";Created by GDA Creator Professional Ver.0.10",
    ";Created by GDA Creator Professional Ver.0.22",
];

/// A recoverable problem found while decoding.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodeWarning {
    /// The first line is not one of [`SUPPORTED_HEADERS`]. The decoding continues.
    #[error("unsupported header: {found:?}")]
    UnsupportedHeader {
        /// The first line.
        found: String,
    },
    /// The key is neither a known command nor a measure message.
    #[error("unknown command: #{0}")]
    UnknownCommand(String),
    /// A numeric value could not be read exactly. Its leading digits, or zero, were used instead.
    #[error("expected a number for #{key}, but found {value:?}")]
    InvalidNumber {
        /// The key of the command.
        key: String,
        /// The value of the command.
        value: String,
    },
    /// `#BPMxx` defines a tempo that is not a positive number. The label stays undefined.
    #[error("tempo label {label} must be positive, but found {value:?}")]
    InvalidBpmLabel {
        /// The two characters label.
        label: String,
        /// The value of the command.
        value: String,
    },
    /// A tempo change refers to a label without a definition. The change is dropped.
    #[error("measure {measure} refers to the undefined tempo label {label}")]
    UndefinedBpmLabel {
        /// The measure of the change.
        measure: Measure,
        /// The referred label.
        label: String,
    },
    /// The same lane of a measure is written twice. The later message wins.
    #[error("measure {measure} has lane {code} twice, the later one is used")]
    DuplicateMessage {
        /// The measure of the messages.
        measure: Measure,
        /// The lane code of the messages.
        code: String,
    },
}

/// A [`DecodeWarning`] with the range of the line that caused it.
pub type DecodeWarningWithRange = SourceRangeMixin<DecodeWarning>;

/// An unrecoverable error of decoding.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodeError {
    /// The text has no lines except blank ones.
    #[error("the chart text is empty")]
    Empty,
}

/// The configuration of decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeConfig {
    /// Which lane code tables are used.
    pub dialect: Dialect,
}

impl DecodeConfig {
    /// The configuration for `.dtx` files.
    #[must_use]
    pub const fn dtx() -> Self {
        Self {
            dialect: Dialect::Dtx,
        }
    }

    /// The configuration for `.gda` files.
    #[must_use]
    pub const fn gda() -> Self {
        Self {
            dialect: Dialect::Gda,
        }
    }
}

/// Output of decoding a chart file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DtxOutput {
    /// The decoded document.
    pub document: ChartDocument,
    /// Warnings that occurred during decoding.
    pub warnings: Vec<DecodeWarningWithRange>,
}

/// Decodes a chart file from the source text.
///
/// # Example
///
/// ```
/// use dtx_chart::dtx::{DecodeConfig, DtxOutput, parse_dtx};
///
/// let source = "; Created by DTXCreator 024\n#TITLE: Test Song\n#BPM: 120\n#DLEVEL: 45\n#00112: 01010101";
/// let DtxOutput { document, warnings } = parse_dtx(source, DecodeConfig::dtx()).unwrap();
/// assert_eq!(document.chart_info.title, "Test Song");
/// assert_eq!(document.metadata.drum.unwrap().total, 4);
/// assert!(warnings.is_empty());
/// ```
///
/// # Errors
///
/// Returns [`DecodeError::Empty`] if the text is blank.
pub fn parse_dtx(source: &str, config: DecodeConfig) -> Result<DtxOutput, DecodeError> {
    let lex_output = lex::tokenize(source);
    let header = lex_output.header.ok_or(DecodeError::Empty)?;

    let mut warnings = Vec::new();
    if !SUPPORTED_HEADERS.contains(header.content()) {
        log::warn!("unsupported header {:?}, decoding anyway", header.content());
        warnings.push(SourceRangeMixin::new(
            DecodeWarning::UnsupportedHeader {
                found: (*header.content()).to_owned(),
            },
            header.range(),
        ));
    }

    let parse::ParseOutput {
        document,
        warnings: parse_warnings,
    } = parse::build_document(&lex_output.tokens, config);
    warnings.extend(parse_warnings);
    Ok(DtxOutput { document, warnings })
}
