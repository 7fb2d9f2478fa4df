//! Tempo normalization of the chart timeline.
//!
//! The lines of a measure last differently by the tempo. [`TimingMapper`] maps every `(measure, line)` onto
//! one absolute timeline, whose unit is a 1/192 beat at 180 BPM. So a quarter beat at 180 BPM is 48 units, and
//! a line at 90 BPM is 2 units.

use std::fmt;

use strict_num_extended::PositiveF64;
use thiserror::Error;

use crate::dtx::model::{BpmMarker, ChartDocument};

/// The tempo where a line is exactly one absolute unit.
pub const REFERENCE_BPM: f64 = 180.0;

/// The number of lines in a quarter beat.
pub const QUARTER_BEAT_LINES: f64 = 48.0;

/// A position on the normalized timeline.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbsolutePosition(pub f64);

impl AbsolutePosition {
    /// The start of the chart.
    pub const ZERO: Self = Self(0.0);

    /// Returns the raw value.
    #[must_use]
    pub const fn as_f64(self) -> f64 {
        self.0
    }

    /// Returns the time from the start of the chart in seconds.
    #[must_use]
    pub fn as_seconds(self) -> f64 {
        self.0 * 60.0 / (REFERENCE_BPM * QUARTER_BEAT_LINES)
    }
}

impl fmt::Display for AbsolutePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// An error occurred when building or querying a [`TimingMapper`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimingError {
    /// The tempo at the start of the chart is not a positive number.
    #[error("the starting tempo must be positive, but it is {0}")]
    InvalidTempo(f64),
    /// The measure or the line is out of the chart.
    #[error("line {line} of measure {bar} is out of the chart")]
    OutOfRange {
        /// The queried measure.
        bar: usize,
        /// The queried line.
        line: f64,
    },
}

/// A tempo change with its position on the normalized timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedBpmMarker {
    /// The line in the measure.
    pub line: f64,
    /// The tempo from the line.
    pub bpm: PositiveF64,
    /// The position of the line.
    pub abs_pos: AbsolutePosition,
}

/// The timing of a measure.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarPositionInfo {
    /// The number of lines in the measure.
    pub line_count: u32,
    /// The position of the first line.
    pub abs_start_pos: AbsolutePosition,
    /// The tempo at the first line.
    pub bar_start_bpm: PositiveF64,
    /// The tempo changes in the measure.
    pub bpm_markers: Vec<ResolvedBpmMarker>,
}

impl BarPositionInfo {
    /// Maps `line` of this measure, which must be already validated, onto the timeline.
    fn position_of(&self, line: f64) -> AbsolutePosition {
        let mut segment_start = 0.0;
        let mut position = self.abs_start_pos.0;
        let mut bpm = self.bar_start_bpm;
        for marker in &self.bpm_markers {
            if line < marker.line {
                break;
            }
            segment_start = marker.line;
            position = marker.abs_pos.0;
            bpm = marker.bpm;
        }
        AbsolutePosition(position + scaled_distance(line - segment_start, bpm))
    }
}

/// Returns the absolute length of `lines` lines at `bpm`.
fn scaled_distance(lines: f64, bpm: PositiveF64) -> f64 {
    lines * REFERENCE_BPM / bpm.as_f64()
}

/// Maps measure lines of a document onto the normalized timeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingMapper {
    bars: Vec<BarPositionInfo>,
    chart_length: AbsolutePosition,
    bgm_start: AbsolutePosition,
}

impl TimingMapper {
    /// Walks the measures of `document` and resolves the start of each measure and tempo change.
    ///
    /// The first chip of the background audio lane in the whole chart becomes the playback start. The
    /// playback starts at zero if there is no such chip.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError::InvalidTempo`] if the starting tempo of `document` is not positive.
    pub fn build(document: &ChartDocument) -> Result<Self, TimingError> {
        let start_bpm = document.chart_info.bpm;
        let mut bpm =
            PositiveF64::try_from(start_bpm).map_err(|_| TimingError::InvalidTempo(start_bpm))?;
        let mut position = 0.0;
        let mut bars = Vec::with_capacity(document.bar_groups.len());
        for bar in &document.bar_groups {
            let abs_start_pos = AbsolutePosition(position);
            let bar_start_bpm = bpm;
            let mut segment_start = 0.0;
            let bpm_markers = bar
                .bpm_markers
                .iter()
                .map(|&BpmMarker { line, bpm: next }| {
                    position += scaled_distance(line - segment_start, bpm);
                    segment_start = line;
                    bpm = next;
                    ResolvedBpmMarker {
                        line,
                        bpm: next,
                        abs_pos: AbsolutePosition(position),
                    }
                })
                .collect();
            position += scaled_distance(f64::from(bar.line_count) - segment_start, bpm);
            bars.push(BarPositionInfo {
                line_count: bar.line_count,
                abs_start_pos,
                bar_start_bpm,
                bpm_markers,
            });
        }

        let mut mapper = Self {
            bars,
            chart_length: AbsolutePosition(position),
            bgm_start: AbsolutePosition::ZERO,
        };
        let first_bgm = document
            .bar_groups
            .iter()
            .enumerate()
            .find_map(|(index, bar)| bar.bgm_markers.first().map(|&line| (index, line)));
        if let Some((bar, line)) = first_bgm {
            mapper.bgm_start = mapper.position_of(bar, line)?;
        }
        Ok(mapper)
    }

    /// Maps `line` of measure `bar` onto the timeline.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError::OutOfRange`] if `bar` is not in the chart or `line` is not in `[0, line_count)` of the measure.
    pub fn position_of(&self, bar: usize, line: f64) -> Result<AbsolutePosition, TimingError> {
        let info = self
            .bars
            .get(bar)
            .filter(|info| (0.0..f64::from(info.line_count)).contains(&line))
            .ok_or(TimingError::OutOfRange { bar, line })?;
        Ok(info.position_of(line))
    }

    /// Returns the end of the last measure.
    #[must_use]
    pub const fn chart_length(&self) -> AbsolutePosition {
        self.chart_length
    }

    /// Returns the position of the first background audio chip.
    #[must_use]
    pub const fn bgm_start(&self) -> AbsolutePosition {
        self.bgm_start
    }

    /// Returns the song duration in seconds, from the playback start to the end of the chart.
    #[must_use]
    pub fn estimate_duration(&self) -> f64 {
        AbsolutePosition(self.chart_length.0 - self.bgm_start.0).as_seconds()
    }

    /// Returns the timing of measure `bar`.
    #[must_use]
    pub fn bar_info(&self, bar: usize) -> Option<&BarPositionInfo> {
        self.bars.get(bar)
    }

    /// Returns the timing of all measures.
    #[must_use]
    pub fn bar_infos(&self) -> &[BarPositionInfo] {
        &self.bars
    }

    /// Returns the position where measure `bar` ends, that is the start of the next one.
    #[must_use]
    pub fn bar_end(&self, bar: usize) -> Option<AbsolutePosition> {
        self.bars.get(bar)?;
        Some(
            self.bars
                .get(bar + 1)
                .map_or(self.chart_length, |next| next.abs_start_pos),
        )
    }
}

/// Formats seconds as `m:ss`, rounding to the nearest second.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
