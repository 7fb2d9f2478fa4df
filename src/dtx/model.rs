//! The decoded chart document.
//!
//! A [`ChartDocument`] keeps the note messages as the raw slot strings of each measure. Use [`decode_slots`]
//! to get the chips and their positions in the measure.

use std::collections::BTreeMap;

use itertools::Itertools;
use strict_num_extended::PositiveF64;

use super::command::{
    Instrument, Level,
    lane::{Button, ButtonChord, DrumLane, LaneLabel},
};

/// The number of lines in a measure of the default length, that is four quarter beats.
pub const LINES_PER_MEASURE: u32 = 192;

/// A whole decoded chart.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartDocument {
    /// The header information.
    pub chart_info: ChartInfo,
    /// The note counts of the instruments that have a chart.
    pub metadata: ChartMetadata,
    /// The measures from `000` to the last referenced one, without gaps.
    pub bar_groups: Vec<BarGroup>,
    /// The resource definitions.
    pub resources: Resources,
}

impl ChartDocument {
    /// Returns the instruments whose level is nonzero, in the order of drum, guitar and bass.
    #[must_use]
    pub fn available_charts(&self) -> Vec<Instrument> {
        Instrument::ALL
            .into_iter()
            .filter(|&instrument| !self.chart_info.level(instrument).is_zero())
            .collect()
    }

    /// Serializes the document into a pretty printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the error of `serde_json` if the serialization failed.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// The header information of the chart.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartInfo {
    /// `#TITLE`.
    pub title: String,
    /// `#ARTIST`.
    pub artist: String,
    /// `#GENRE`.
    pub genre: Option<String>,
    /// `#COMMENT`.
    pub comment: Option<String>,
    /// `#PREVIEW`, the preview sound file.
    pub preview: Option<String>,
    /// `#PREIMAGE`, the preview image file.
    pub preimage: Option<String>,
    /// `#BPM`, the tempo at the start. Zero if missing or malformed.
    pub bpm: f64,
    /// `#DLEVEL`.
    pub drum_level: Level,
    /// `#GLEVEL`.
    pub guitar_level: Level,
    /// `#BLEVEL`.
    pub bass_level: Level,
}

impl ChartInfo {
    /// Returns the level of `instrument`.
    #[must_use]
    pub const fn level(&self, instrument: Instrument) -> Level {
        match instrument {
            Instrument::Drum => self.drum_level,
            Instrument::Guitar => self.guitar_level,
            Instrument::Bass => self.bass_level,
        }
    }
}

/// The note counts. Each aggregate is present only if the level of its instrument is nonzero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartMetadata {
    /// Counts of the drum chart.
    pub drum: Option<DrumCounts>,
    /// Counts of the guitar chart.
    pub guitar: Option<ButtonCounts>,
    /// Counts of the bass chart.
    pub bass: Option<ButtonCounts>,
}

impl ChartMetadata {
    /// Returns the total note count of `instrument`, or `None` if it has no chart.
    #[must_use]
    pub fn total_notes(&self, instrument: Instrument) -> Option<u32> {
        match instrument {
            Instrument::Drum => self.drum.as_ref().map(|counts| counts.total),
            Instrument::Guitar => self.guitar.as_ref().map(|counts| counts.total),
            Instrument::Bass => self.bass.as_ref().map(|counts| counts.total),
        }
    }
}

/// Note counts of the drums.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrumCounts {
    /// The number of all notes.
    pub total: u32,
    /// The number of notes per lane. A lane without notes may be absent.
    pub lanes: BTreeMap<DrumLane, u32>,
}

impl DrumCounts {
    /// Returns the number of notes on `lane`.
    #[must_use]
    pub fn lane(&self, lane: DrumLane) -> u32 {
        self.lanes.get(&lane).copied().unwrap_or(0)
    }

    pub(crate) fn add(&mut self, lane: DrumLane, notes: u32) {
        self.total += notes;
        *self.lanes.entry(lane).or_default() += notes;
    }
}

/// Note counts of the guitar or the bass.
///
/// A chord is counted once in `total` but once per pressed button in `buttons`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonCounts {
    /// The number of all notes, excluding wails.
    pub total: u32,
    /// The number of notes with each button pressed, indexed by [`Button::index`].
    pub buttons: [u32; 5],
    /// The number of open notes.
    pub open: u32,
    /// The number of wails.
    pub wail: u32,
}

impl ButtonCounts {
    /// Returns the number of notes with `button` pressed.
    #[must_use]
    pub fn button(&self, button: Button) -> u32 {
        self.buttons.get(button.index()).copied().unwrap_or(0)
    }

    pub(crate) fn add(&mut self, chord: ButtonChord, notes: u32) {
        let flags = match chord {
            ButtonChord::Wail => {
                self.wail += notes;
                return;
            }
            ButtonChord::Press(flags) => flags,
        };
        self.total += notes;
        if flags.is_open() {
            self.open += notes;
        }
        for button in flags.pressed() {
            if let Some(count) = self.buttons.get_mut(button.index()) {
                *count += notes;
            }
        }
    }
}

/// A measure of the chart.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarGroup {
    /// The number of lines in the measure, `floor(192 * length)`.
    pub line_count: u32,
    /// The length relative to four quarter beats, carried over from the last `02` message.
    pub length: f64,
    /// The raw slot strings of the recognized lanes.
    pub notes: BTreeMap<LaneLabel, String>,
    /// Tempo changes in the line order.
    pub bpm_markers: Vec<BpmMarker>,
    /// Measure line visibility changes.
    pub show_hide_markers: Vec<ShowHideMarker>,
    /// Lines of the background audio chips.
    pub bgm_markers: Vec<f64>,
}

impl BarGroup {
    /// Creates a measure without any messages.
    #[must_use]
    pub fn empty(length: f64) -> Self {
        Self {
            line_count: line_count_of(length),
            length,
            ..Default::default()
        }
    }

    /// Iterates the chips of `label` in this measure.
    pub fn chips(&self, label: LaneLabel) -> impl Iterator<Item = Slot<'_>> {
        self.notes
            .get(&label)
            .map(|message| decode_slots(message, self.line_count))
            .unwrap_or_default()
            .into_iter()
    }
}

/// A tempo change in a measure.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BpmMarker {
    /// The line in the measure, may be fractional.
    pub line: f64,
    /// The tempo from the line.
    pub bpm: PositiveF64,
}

/// A change of the measure line visibility.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShowHideMarker {
    /// The line in the measure, may be fractional.
    pub line: f64,
    /// Whether the measure lines are shown from the line.
    pub show: bool,
}

/// `#WAVxx` and `#BMPxx` definitions, keyed by their two characters id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resources {
    /// Sound files.
    pub wav: BTreeMap<String, String>,
    /// Image files.
    pub bmp: BTreeMap<String, String>,
}

/// A non-empty slot of a message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot<'a> {
    /// The line of the slot in the measure. Slot `i` of `k` is at `i * line_count / k`.
    pub line: f64,
    /// The chip code of the slot.
    pub code: &'a str,
}

/// Splits `message` into two characters slots and returns the non-empty ones with their lines.
///
/// A trailing single character is a slot too. A slot is empty if it consists of only `0`.
#[must_use]
pub fn decode_slots(message: &str, line_count: u32) -> Vec<Slot<'_>> {
    let bounds = message
        .char_indices()
        .map(|(index, _)| index)
        .step_by(2)
        .chain(std::iter::once(message.len()))
        .tuple_windows()
        .collect_vec();
    let slots = bounds.len() as f64;
    bounds
        .into_iter()
        .enumerate()
        .filter_map(|(i, (start, end))| {
            let code = message.get(start..end)?;
            if code.bytes().all(|b| b == b'0') {
                return None;
            }
            Some(Slot {
                line: i as f64 * f64::from(line_count) / slots,
                code,
            })
        })
        .collect()
}

/// Returns the number of lines of a measure with `length`.
#[must_use]
pub fn line_count_of(length: f64) -> u32 {
    (f64::from(LINES_PER_MEASURE) * length + 1e-9).floor() as u32
}
