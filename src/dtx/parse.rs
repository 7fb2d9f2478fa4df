//! Builds a [`ChartDocument`] from the command tokens.
//!
//! The header commands are applied as they come, but measure messages are buffered per measure. The
//! measures are built after all lines are read, because a tempo change may refer to a `#BPMxx` label
//! defined below it.

use std::collections::{BTreeMap, HashMap};

use strict_num_extended::PositiveF64;

use super::{
    DecodeConfig, DecodeWarning, DecodeWarningWithRange,
    command::{
        Dialect, Level, Measure,
        lane::{Channel, Half, LaneLabel, read_channel},
        mixin::{SourceRangeMixin, SourceRangeMixinExt},
    },
    lex::TokenWithRange,
    model::{
        BarGroup, BpmMarker, ButtonCounts, ChartDocument, ChartMetadata, DrumCounts, ShowHideMarker,
        decode_slots, line_count_of,
    },
};

/// The valid range of a measure length, the lower bound inclusive and the upper exclusive.
const MEASURE_LENGTH_RANGE: (f64, f64) = (1.0 / 192.0, 10.0);

/// Keys that are recognized but carry nothing for the document.
const IGNORED_KEY_PREFIXES: [&str; 9] = [
    "VOLUME",
    "PAN",
    "DTXC",
    "DTXVPLAYSPEED",
    "BGMWAV",
    "AVI",
    "STAGEFILE",
    "BACKGROUND",
    "RESULTIMAGE",
];

/// Output of building a document from tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    /// The built document.
    pub document: ChartDocument,
    /// Warnings that occurred during building.
    pub warnings: Vec<DecodeWarningWithRange>,
}

/// Builds the document from the tokens of [`super::lex::tokenize`].
#[must_use]
pub fn build_document(tokens: &[TokenWithRange<'_>], config: DecodeConfig) -> ParseOutput {
    let mut builder = DocumentBuilder::new(config.dialect);
    for token in tokens {
        builder.apply(token);
    }
    builder.finish()
}

/// The raw lanes of a measure, keyed by the upper case lane code.
type RawMeasure<'a> = BTreeMap<String, SourceRangeMixin<&'a str>>;

struct DocumentBuilder<'a> {
    dialect: Dialect,
    document: ChartDocument,
    bpm_labels: HashMap<String, PositiveF64>,
    measures: BTreeMap<usize, RawMeasure<'a>>,
    warnings: Vec<DecodeWarningWithRange>,
}

impl<'a> DocumentBuilder<'a> {
    fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            document: ChartDocument::default(),
            bpm_labels: HashMap::new(),
            measures: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, warning: DecodeWarning, range: std::ops::Range<usize>) {
        self.warnings.push(warning.into_wrapper(range));
    }

    fn apply(&mut self, token: &TokenWithRange<'a>) {
        let key = token.content().key.to_ascii_uppercase();
        let value = token.content().value;
        let range = token.range();
        let info = &mut self.document.chart_info;
        match key.as_str() {
            "TITLE" => info.title = value.to_owned(),
            "ARTIST" => info.artist = value.to_owned(),
            "GENRE" => info.genre = Some(value.to_owned()),
            "COMMENT" => info.comment = Some(value.to_owned()),
            "PREVIEW" => info.preview = Some(value.to_owned()),
            "PREIMAGE" => info.preimage = Some(value.to_owned()),
            "BPM" => {
                if let Ok(bpm) = value.parse() {
                    info.bpm = bpm;
                } else {
                    info.bpm = 0.0;
                    self.warn(
                        DecodeWarning::InvalidNumber {
                            key,
                            value: value.to_owned(),
                        },
                        range,
                    );
                }
            }
            "DLEVEL" => {
                let level = self.read_level(key, value, range);
                self.document.chart_info.drum_level = level;
            }
            "GLEVEL" => {
                let level = self.read_level(key, value, range);
                self.document.chart_info.guitar_level = level;
            }
            "BLEVEL" => {
                let level = self.read_level(key, value, range);
                self.document.chart_info.bass_level = level;
            }
            _ => self.apply_indexed(&key, value, range),
        }
    }

    fn read_level(&mut self, key: String, value: &str, range: std::ops::Range<usize>) -> Level {
        Level::parse(value).unwrap_or_else(|| {
            self.warn(
                DecodeWarning::InvalidNumber {
                    key,
                    value: value.to_owned(),
                },
                range,
            );
            Level::parse_leading(value)
        })
    }

    fn apply_indexed(&mut self, key: &str, value: &'a str, range: std::ops::Range<usize>) {
        if key.len() == 5 {
            if let Some(label) = key.strip_prefix("BPM") {
                self.define_bpm_label(label, value, range);
                return;
            }
            if let Some(id) = key.strip_prefix("WAV") {
                let resources = &mut self.document.resources;
                resources.wav.insert(id.to_owned(), value.to_owned());
                return;
            }
            if let Some(id) = key.strip_prefix("BMP") {
                let resources = &mut self.document.resources;
                resources.bmp.insert(id.to_owned(), value.to_owned());
                return;
            }
            if let Some(measure) = key.get(..3).and_then(Measure::from_digits) {
                let code = key.get(3..).unwrap_or_default().to_owned();
                self.buffer_message(measure, code, value.into_wrapper(range));
                return;
            }
        }
        if IGNORED_KEY_PREFIXES
            .iter()
            .any(|prefix| key.starts_with(prefix))
        {
            return;
        }
        self.warn(DecodeWarning::UnknownCommand(key.to_owned()), range);
    }

    fn define_bpm_label(&mut self, label: &str, value: &str, range: std::ops::Range<usize>) {
        let bpm = value
            .parse::<f64>()
            .ok()
            .and_then(|bpm| PositiveF64::try_from(bpm).ok());
        if let Some(bpm) = bpm {
            self.bpm_labels.insert(label.to_owned(), bpm);
        } else {
            self.warn(
                DecodeWarning::InvalidBpmLabel {
                    label: label.to_owned(),
                    value: value.to_owned(),
                },
                range,
            );
        }
    }

    fn buffer_message(&mut self, measure: Measure, code: String, message: SourceRangeMixin<&'a str>) {
        let range = message.range();
        let lanes = self.measures.entry(measure.0).or_default();
        if lanes.insert(code.clone(), message).is_some() {
            self.warn(DecodeWarning::DuplicateMessage { measure, code }, range);
        }
    }

    fn finish(mut self) -> ParseOutput {
        let info = &self.document.chart_info;
        self.document.metadata = ChartMetadata {
            drum: (!info.drum_level.is_zero()).then(DrumCounts::default),
            guitar: (!info.guitar_level.is_zero()).then(ButtonCounts::default),
            bass: (!info.bass_level.is_zero()).then(ButtonCounts::default),
        };

        let measure_count = self
            .measures
            .last_key_value()
            .map_or(0, |(&last, _)| last + 1);
        let measures = std::mem::take(&mut self.measures);
        let mut length = 1.0;
        for index in 0..measure_count {
            let bar = match measures.get(&index) {
                Some(lanes) => self.build_bar(Measure(index), lanes, &mut length),
                None => BarGroup::empty(length),
            };
            self.document.bar_groups.push(bar);
        }

        ParseOutput {
            document: self.document,
            warnings: self.warnings,
        }
    }

    fn build_bar(&mut self, measure: Measure, lanes: &RawMeasure<'a>, length: &mut f64) -> BarGroup {
        if let Some(message) = lanes.get("02") {
            *length = measure_length(message.content());
        }
        let line_count = line_count_of(*length);
        let mut bar = BarGroup {
            line_count,
            length: *length,
            ..Default::default()
        };

        for (code, message) in lanes {
            match read_channel(code, self.dialect) {
                Channel::SectionLength | Channel::Unrecognized => {}
                Channel::BpmChange => {
                    for slot in decode_slots(message.content(), line_count) {
                        let label = slot.code.to_ascii_uppercase();
                        if let Some(&bpm) = self.bpm_labels.get(&label) {
                            bar.bpm_markers.push(BpmMarker {
                                line: slot.line,
                                bpm,
                            });
                        } else {
                            self.warn(
                                DecodeWarning::UndefinedBpmLabel { measure, label },
                                message.range(),
                            );
                        }
                    }
                }
                Channel::ShowHideLine => {
                    bar.show_hide_markers.extend(
                        decode_slots(message.content(), line_count)
                            .into_iter()
                            .map(|slot| ShowHideMarker {
                                line: slot.line,
                                show: slot.code == "01",
                            }),
                    );
                }
                Channel::Bgm => {
                    bar.bgm_markers.extend(
                        decode_slots(message.content(), line_count)
                            .into_iter()
                            .map(|slot| slot.line),
                    );
                }
                Channel::Lane(label) => self.add_lane(&mut bar, label, message.content()),
            }
        }
        bar
    }

    /// Stores the lane if its instrument has a chart, and counts its chips.
    fn add_lane(&mut self, bar: &mut BarGroup, label: LaneLabel, message: &str) {
        let notes = decode_slots(message, bar.line_count).len() as u32;
        let metadata = &mut self.document.metadata;
        match label {
            LaneLabel::Drum(lane) => {
                let Some(counts) = metadata.drum.as_mut() else {
                    return;
                };
                counts.add(lane, notes);
            }
            LaneLabel::Button { half, chord } => {
                let counts = match half {
                    Half::Guitar => metadata.guitar.as_mut(),
                    Half::Bass => metadata.bass.as_mut(),
                };
                let Some(counts) = counts else {
                    return;
                };
                counts.add(chord, notes);
            }
        }
        bar.notes.insert(label, message.to_owned());
    }
}

/// Reads the value of a `02` message. Out of range or malformed values are the default length.
fn measure_length(value: &str) -> f64 {
    let (min, max) = MEASURE_LENGTH_RANGE;
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|length| (min..max).contains(length))
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dtx::{
        command::lane::{Button, DrumLane},
        lex::tokenize,
    };

    fn build(source: &str, config: DecodeConfig) -> ParseOutput {
        let lexed = tokenize(source);
        build_document(&lexed.tokens, config)
    }

    #[test]
    fn malformed_level_keeps_the_chart() {
        let output = build(
            "; Created by DTXCreator 024\n#BPM: 180\n#DLEVEL: 5.2\n#GLEVEL: 50a\n#00012: 01\n",
            DecodeConfig::dtx(),
        );
        let warnings = output
            .warnings
            .into_iter()
            .map(SourceRangeMixin::into_content)
            .collect::<Vec<_>>();
        assert_eq!(
            warnings,
            vec![
                DecodeWarning::InvalidNumber {
                    key: "DLEVEL".to_owned(),
                    value: "5.2".to_owned(),
                },
                DecodeWarning::InvalidNumber {
                    key: "GLEVEL".to_owned(),
                    value: "50a".to_owned(),
                },
            ]
        );
        let document = output.document;
        assert_eq!(document.chart_info.drum_level, Level(5));
        assert_eq!(document.chart_info.guitar_level, Level(50));
        assert_eq!(document.metadata.drum.map(|drum| drum.total), Some(1));
    }

    #[test]
    fn single_measure_scenario() {
        let output = build(
            "; Created by DTXCreator 024\n#BPM: 180\n#DLEVEL: 10\n#00012: 0012",
            DecodeConfig::dtx(),
        );
        assert_eq!(output.warnings, vec![]);
        let document = output.document;
        assert_eq!(document.bar_groups.len(), 1);
        let bar = &document.bar_groups[0];
        assert_eq!(bar.line_count, 192);
        let chips = bar
            .chips(LaneLabel::Drum(DrumLane::Snare))
            .map(|slot| slot.line)
            .collect::<Vec<_>>();
        assert_eq!(chips, vec![96.0]);
        let drum = document.metadata.drum.unwrap();
        assert_eq!(drum.lane(DrumLane::Snare), 1);
        assert_eq!(drum.total, 1);
    }

    #[test]
    fn measure_length_persists_and_resets() {
        let output = build(
            "header\n#DLEVEL: 10\n#00102: 0.75\n#00312: 01\n#00402: 12\n#00512: 01",
            DecodeConfig::dtx(),
        );
        let lines = output
            .document
            .bar_groups
            .iter()
            .map(|bar| bar.line_count)
            .collect::<Vec<_>>();
        assert_eq!(lines, vec![192, 144, 144, 144, 192, 192]);
    }

    #[test]
    fn lanes_of_disabled_instruments_are_dropped() {
        let output = build(
            "header\n#GLEVEL: 50\n#00112: 11\n#00123: 11\n#001A1: 11",
            DecodeConfig::dtx(),
        );
        let document = output.document;
        assert!(document.metadata.drum.is_none());
        assert!(document.metadata.bass.is_none());
        let guitar = document.metadata.guitar.unwrap();
        assert_eq!(guitar.total, 1);
        assert_eq!(guitar.button(Button::Green), 1);
        assert_eq!(guitar.button(Button::Blue), 1);
        assert_eq!(document.bar_groups[1].notes.len(), 1);
        assert!(document.bar_groups[0].notes.is_empty());
    }

    #[test]
    fn tempo_changes_resolve_labels() {
        let output = build(
            "header\n#BPM: 120\n#00008: 01000200\n#BPM01: 150\n#BPM03: -1",
            DecodeConfig::dtx(),
        );
        let bar = &output.document.bar_groups[0];
        assert_eq!(bar.bpm_markers.len(), 1);
        assert_eq!(bar.bpm_markers[0].line, 0.0);
        assert_eq!(bar.bpm_markers[0].bpm.as_f64(), 150.0);
        let warnings = output
            .warnings
            .into_iter()
            .map(SourceRangeMixin::into_content)
            .collect::<Vec<_>>();
        assert_eq!(
            warnings,
            vec![
                DecodeWarning::InvalidBpmLabel {
                    label: "03".to_owned(),
                    value: "-1".to_owned(),
                },
                DecodeWarning::UndefinedBpmLabel {
                    measure: Measure(0),
                    label: "02".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn reserved_lanes() {
        let output = build(
            "header\n#000C2: 0102\n#00101: 00000001\n",
            DecodeConfig::gda(),
        );
        let bars = &output.document.bar_groups;
        assert_eq!(
            bars[0].show_hide_markers,
            vec![
                ShowHideMarker {
                    line: 0.0,
                    show: true
                },
                ShowHideMarker {
                    line: 96.0,
                    show: false
                },
            ]
        );
        assert_eq!(bars[1].bgm_markers, vec![144.0]);
    }

    #[test]
    fn duplicates_and_unknown_commands_warn() {
        let output = build(
            "header\n#DLEVEL: 10\n#00012: 01\n#00012: 0001\n#WHATEVER 1\n#VOLUME01: 100\n#DTXC_CHIPPALETTE: 1",
            DecodeConfig::dtx(),
        );
        let warnings = output
            .warnings
            .into_iter()
            .map(SourceRangeMixin::into_content)
            .collect::<Vec<_>>();
        assert_eq!(
            warnings,
            vec![
                DecodeWarning::DuplicateMessage {
                    measure: Measure(0),
                    code: "12".to_owned(),
                },
                DecodeWarning::UnknownCommand("WHATEVER".to_owned()),
            ]
        );
        assert_eq!(
            output.document.bar_groups[0]
                .chips(LaneLabel::Drum(DrumLane::Snare))
                .map(|slot| slot.line)
                .collect::<Vec<_>>(),
            vec![96.0]
        );
    }

    #[test]
    fn resources_are_collected() {
        let output = build(
            "header\n#WAV0A: snare.ogg\n#BMP01: bg.png\n#PREVIEW: pre.ogg",
            DecodeConfig::dtx(),
        );
        let document = output.document;
        assert_eq!(
            document.resources.wav.get("0A").map(String::as_str),
            Some("snare.ogg")
        );
        assert_eq!(
            document.resources.bmp.get("01").map(String::as_str),
            Some("bg.png")
        );
        assert_eq!(document.chart_info.preview.as_deref(), Some("pre.ogg"));
    }
}
