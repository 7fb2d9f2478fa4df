//! The DTX/GDA chart decoder and score sheet layout engine.
//!
//! The crate is a pipeline of four stages. Each stage only depends on the ones before it:
//!
//! 1. [`dtx`] decodes the line oriented chart text into a [`dtx::model::ChartDocument`].
//! 2. [`timing`] normalizes the mixed tempo note timing of the document into one absolute timeline.
//! 3. [`layout`] paginates that timeline onto canvases and emits drawing instructions.
//! 4. [`surface`] executes the drawing instructions. [`surface::svg::SvgSurface`] writes SVG documents, and [`surface::recording::RecordingSurface`] keeps the instructions for inspection.
//!
//! [`graph`] additionally draws a note count bar graph of one instrument.
//!
//! # Example
//!
//! ```
//! use dtx_chart::prelude::*;
//!
//! let source = "; Created by DTXCreator 024\n#TITLE: Sample\n#BPM: 180\n#DLEVEL: 50\n#00012: 0012\n";
//! let DtxOutput { document, warnings } = parse_dtx(source, DecodeConfig::dtx()).unwrap();
//! assert!(warnings.is_empty());
//!
//! let timing = TimingMapper::build(&document).unwrap();
//! assert_eq!(timing.chart_length().as_f64(), 192.0);
//!
//! let engine = LayoutEngine::new(
//!     &document,
//!     &timing,
//!     LayoutConfig::default(),
//!     DrumDrawer::new(ChartType::Full),
//! );
//! let canvases = engine.render(&RecordingSurfaceFactory).unwrap();
//! assert_eq!(canvases.len(), 1);
//! ```
//!
//! In detail, our policies are:
//!
//! - Support only UTF-8 (as required `&str` to input). Decode Shift_JIS files before passing them.
//! - The dialect (DTX or GDA) is always given by the caller, never guessed from the content.
//! - Recoverable problems in the source are reported as warnings beside the output.
//! - Out of range positions are hard errors, while a canvas without a surface is skipped with a log.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "diagnostics")]
pub mod diagnostics;
pub mod dtx;
pub mod graph;
pub mod layout;
pub mod prelude;
pub mod surface;
pub mod timing;
