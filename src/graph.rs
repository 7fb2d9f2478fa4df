//! The note count bar graph of an instrument.
//!
//! A bar per lane shows how many notes the lane has. The bars share one scale, which is a third of the total
//! note count limited to `[150, 250]`, and a bar over the scale is drawn full.

use std::str::FromStr;

use thiserror::Error;

use crate::{
    dtx::{
        command::{
            Instrument,
            lane::{Button, DrumLane},
        },
        model::{ButtonCounts, ChartDocument, DrumCounts},
    },
    surface::{
        CanvasConfig, HorizontalOrigin, LineOptions, Rect, RectOptions, Rgb, Surface,
        SurfaceError, SurfaceFactory, TextOptions, TextPosition, VerticalOrigin,
    },
};

const ASPECT_RATIO: f64 = 190.0 / 505.0;
const CANVAS_HEIGHT: f64 = 750.0;
const CANVAS_WIDTH: f64 = CANVAS_HEIGHT * ASPECT_RATIO;
const REFERENCE_HEIGHT: f64 = 505.0;
const REFERENCE_WIDTH: f64 = REFERENCE_HEIGHT * ASPECT_RATIO;
const MARGIN_SCALE: f64 = CANVAS_HEIGHT / REFERENCE_HEIGHT;
const BAR_WIDTH: f64 = 6.0 * CANVAS_WIDTH / REFERENCE_WIDTH;
const BAR_GAP: f64 = BAR_WIDTH * 2.0;
const MARGIN_BOTTOM: f64 = 86.0 * MARGIN_SCALE;
const MARGIN_BASELINE: f64 = 12.0 * MARGIN_SCALE;
const MARGIN_TOP: f64 = 3.0 * MARGIN_SCALE;
const MARGIN_TOTAL: f64 = 16.0 * MARGIN_SCALE;
const MARGIN_TOTAL_LABEL: f64 = 40.0 * MARGIN_SCALE;
const DIAGRAM_HEIGHT: f64 = CANVAS_HEIGHT - MARGIN_BOTTOM - MARGIN_BASELINE - MARGIN_TOP;

const PROPORTION_RATIO: f64 = 0.33;
const PROPORTION_MIN: f64 = 150.0;
const PROPORTION_MAX: f64 = 250.0;

const BACKGROUND: Rgb = Rgb::from_hex(0x111111);
const EMPTY_BAR: Rgb = Rgb::from_hex(0x2f2f2f);
const TEXT: Rgb = Rgb::from_hex(0xffffff);
const BASELINE: Rgb = Rgb::from_hex(0xb7b7b7);

/// How the drum lanes are merged into bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrumGraphOption {
    /// A bar per lane.
    Full,
    /// The left bass drum is added to the left pedal.
    LpLb,
    /// The ride cymbal is added to the right cymbal.
    RcRd,
    /// Both merges of [`DrumGraphOption::LpLb`] and [`DrumGraphOption::RcRd`].
    #[default]
    Gitadora,
}

/// An error occurred when parsing a [`DrumGraphOption`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("unknown graph option: {0:?}")]
pub struct UnknownGraphOption(pub String);

impl FromStr for DrumGraphOption {
    type Err = UnknownGraphOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "lp+lb" => Ok(Self::LpLb),
            "rc+rd" => Ok(Self::RcRd),
            "gitadora" => Ok(Self::Gitadora),
            _ => Err(UnknownGraphOption(s.to_owned())),
        }
    }
}

/// What a bar of the graph counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GraphLane {
    /// A drum lane, possibly with another lane merged.
    Drum(DrumLane),
    /// Notes with a button pressed.
    Button(Button),
    /// Open notes.
    Open,
}

impl GraphLane {
    /// Returns the color of the bar.
    #[must_use]
    pub const fn color(self) -> Rgb {
        Rgb::from_hex(match self {
            Self::Drum(lane) => match lane {
                DrumLane::LeftCymbal => 0xff1f7b,
                DrumLane::HiHat => 0x6ac0ff,
                DrumLane::LeftPedal | DrumLane::LeftBass => 0xff4bed,
                DrumLane::Snare => 0xfcfe16,
                DrumLane::HighTom => 0x02ff00,
                DrumLane::BassDrum => 0x9b81ff,
                DrumLane::LowTom => 0xff0000,
                DrumLane::FloorTom => 0xffa919,
                DrumLane::RightCymbal => 0x00ccff,
                DrumLane::Ride => 0x5eb5ff,
            },
            Self::Button(button) => match button {
                Button::Red => 0xff0000,
                Button::Green => 0x00ff00,
                Button::Blue => 0x0000ff,
                Button::Yellow => 0xffff00,
                Button::Magenta => 0xff00ff,
            },
            Self::Open => 0xffffff,
        })
    }
}

/// A bar of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphBar {
    /// What the bar counts.
    pub lane: GraphLane,
    /// The number of notes.
    pub count: u32,
}

/// The note count bar graph of an instrument.
///
/// # Example
///
/// ```
/// use dtx_chart::{
///     dtx::{DecodeConfig, parse_dtx},
///     graph::{DrumGraphOption, NoteGraph},
///     surface::recording::RecordingSurfaceFactory,
/// };
///
/// let source = "; Created by DTXCreator 024\n#BPM: 120\n#DLEVEL: 30\n#00113: 01010101\n#00119: 0101\n";
/// let document = parse_dtx(source, DecodeConfig::dtx()).unwrap().document;
/// let graph = NoteGraph::drums(document.metadata.drum.as_ref().unwrap(), DrumGraphOption::Gitadora);
/// assert_eq!(graph.total(), 6);
/// assert_eq!(graph.bars().len(), 9);
/// let surface = graph.render(&RecordingSurfaceFactory, "dtxgraph").unwrap();
/// assert!(surface.texts().any(|text| text == "Total Notes"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteGraph {
    bars: Vec<GraphBar>,
    total: u32,
}

impl NoteGraph {
    /// Creates the graph of the drum counts.
    #[must_use]
    pub fn drums(counts: &DrumCounts, option: DrumGraphOption) -> Self {
        use DrumLane::*;
        let merge_pedals = matches!(option, DrumGraphOption::LpLb | DrumGraphOption::Gitadora);
        let merge_cymbals = matches!(option, DrumGraphOption::RcRd | DrumGraphOption::Gitadora);
        let bars = [
            LeftCymbal,
            HiHat,
            LeftPedal,
            LeftBass,
            Snare,
            HighTom,
            BassDrum,
            LowTom,
            FloorTom,
            RightCymbal,
            Ride,
        ]
        .into_iter()
        .filter_map(|lane| {
            let count = match lane {
                LeftBass if merge_pedals => return None,
                Ride if merge_cymbals => return None,
                LeftPedal if merge_pedals => counts.lane(LeftPedal) + counts.lane(LeftBass),
                RightCymbal if merge_cymbals => counts.lane(RightCymbal) + counts.lane(Ride),
                _ => counts.lane(lane),
            };
            Some(GraphBar {
                lane: GraphLane::Drum(lane),
                count,
            })
        })
        .collect();
        Self {
            bars,
            total: counts.total,
        }
    }

    /// Creates the graph of the guitar or bass counts.
    #[must_use]
    pub fn buttons(counts: &ButtonCounts) -> Self {
        let bars = Button::ALL
            .into_iter()
            .map(|button| GraphBar {
                lane: GraphLane::Button(button),
                count: counts.button(button),
            })
            .chain(std::iter::once(GraphBar {
                lane: GraphLane::Open,
                count: counts.open,
            }))
            .collect();
        Self {
            bars,
            total: counts.total,
        }
    }

    /// Creates the graph of `instrument` in `document`, or `None` if the instrument has no chart.
    ///
    /// `option` is used only for the drums.
    #[must_use]
    pub fn from_document(
        document: &ChartDocument,
        instrument: Instrument,
        option: DrumGraphOption,
    ) -> Option<Self> {
        let metadata = &document.metadata;
        match instrument {
            Instrument::Drum => metadata
                .drum
                .as_ref()
                .map(|counts| Self::drums(counts, option)),
            Instrument::Guitar => metadata.guitar.as_ref().map(Self::buttons),
            Instrument::Bass => metadata.bass.as_ref().map(Self::buttons),
        }
    }

    /// Returns the bars from the left.
    #[must_use]
    pub fn bars(&self) -> &[GraphBar] {
        &self.bars
    }

    /// Returns the total note count.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    /// Returns the count that a full bar stands for.
    #[must_use]
    pub fn full_scale(&self) -> f64 {
        num::clamp(
            f64::from(self.total) * PROPORTION_RATIO,
            PROPORTION_MIN,
            PROPORTION_MAX,
        )
    }

    /// Returns the height of `bar` relative to a full bar, in `[0, 1]`.
    #[must_use]
    pub fn proportion(&self, bar: &GraphBar) -> f64 {
        (f64::from(bar.count) / self.full_scale()).min(1.0)
    }

    /// Returns the canvas that the graph is drawn on.
    #[must_use]
    pub fn canvas_config(id: &str) -> CanvasConfig {
        CanvasConfig {
            id: id.to_owned(),
            pages: 1,
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            background: BACKGROUND,
        }
    }

    /// Draws the graph on `surface`, which should be made from [`NoteGraph::canvas_config`].
    pub fn draw(&self, surface: &mut dyn Surface) {
        let count = self.bars.len() as f64;
        let diagram_width = count * (BAR_WIDTH + BAR_GAP) - BAR_GAP;
        let margin = ((CANVAS_WIDTH - diagram_width) / 2.0).max(0.0);
        let baseline = CANVAS_HEIGHT - MARGIN_BOTTOM - MARGIN_BASELINE;

        for (index, bar) in self.bars.iter().enumerate() {
            let x = index as f64 * (BAR_WIDTH + BAR_GAP) + margin;
            for (height, fill) in [
                (DIAGRAM_HEIGHT, EMPTY_BAR),
                (self.proportion(bar) * DIAGRAM_HEIGHT, bar.lane.color()),
            ] {
                surface.add_rectangle(
                    Rect::new(x, baseline, BAR_WIDTH, height),
                    &RectOptions {
                        fill,
                        origin_y: VerticalOrigin::Bottom,
                    },
                );
            }
            surface.add_text(
                TextPosition::new(x + BAR_WIDTH * 0.5, CANVAS_HEIGHT - MARGIN_BOTTOM),
                &bar.count.to_string(),
                &TextOptions {
                    fill: TEXT,
                    font_size: 12.0,
                    font_family: "Arial",
                    origin_x: HorizontalOrigin::Center,
                    origin_y: VerticalOrigin::Bottom,
                },
            );
        }

        surface.add_line(
            Rect::new(margin, baseline, diagram_width, 0.0),
            &LineOptions {
                stroke: BASELINE,
                stroke_width: 2.0,
            },
        );
        let total_options = |font_size| TextOptions {
            fill: TEXT,
            font_size,
            font_family: "Verdana",
            origin_x: HorizontalOrigin::Right,
            origin_y: VerticalOrigin::Bottom,
        };
        surface.add_text(
            TextPosition::new(
                CANVAS_WIDTH - margin,
                CANVAS_HEIGHT - MARGIN_TOTAL - MARGIN_TOTAL_LABEL,
            ),
            "Total Notes",
            &total_options(24.0),
        );
        surface.add_text(
            TextPosition::new(CANVAS_WIDTH - margin, CANVAS_HEIGHT - MARGIN_TOTAL),
            &self.total.to_string(),
            &total_options(48.0),
        );
    }

    /// Creates a canvas named `id` with `factory` and draws the graph on it.
    ///
    /// # Errors
    ///
    /// Returns the error of `factory` if the canvas could not be created.
    pub fn render<F: SurfaceFactory>(&self, factory: &F, id: &str) -> Result<F::Surface, SurfaceError> {
        let mut surface = factory.create(&Self::canvas_config(id))?;
        self.draw(&mut surface);
        Ok(surface)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dtx::command::lane::{ButtonChord, ButtonFlags};

    fn drum_counts() -> DrumCounts {
        let mut counts = DrumCounts::default();
        counts.add(DrumLane::LeftPedal, 3);
        counts.add(DrumLane::LeftBass, 2);
        counts.add(DrumLane::RightCymbal, 10);
        counts.add(DrumLane::Ride, 5);
        counts.add(DrumLane::Snare, 400);
        counts
    }

    #[test]
    fn gitadora_merges_lanes() {
        let graph = NoteGraph::drums(&drum_counts(), DrumGraphOption::Gitadora);
        let lanes: Vec<_> = graph.bars().iter().map(|bar| bar.lane).collect();
        assert_eq!(lanes.len(), 9);
        assert!(!lanes.contains(&GraphLane::Drum(DrumLane::LeftBass)));
        assert!(!lanes.contains(&GraphLane::Drum(DrumLane::Ride)));
        let count_of = |lane| {
            graph
                .bars()
                .iter()
                .find(|bar| bar.lane == GraphLane::Drum(lane))
                .map(|bar| bar.count)
        };
        assert_eq!(count_of(DrumLane::LeftPedal), Some(5));
        assert_eq!(count_of(DrumLane::RightCymbal), Some(15));
    }

    #[test]
    fn full_keeps_every_lane() {
        let graph = NoteGraph::drums(&drum_counts(), DrumGraphOption::Full);
        assert_eq!(graph.bars().len(), 11);
        let graph = NoteGraph::drums(&drum_counts(), DrumGraphOption::RcRd);
        assert_eq!(graph.bars().len(), 10);
    }

    #[test]
    fn scale_is_clamped() {
        let graph = NoteGraph::drums(&drum_counts(), DrumGraphOption::Full);
        assert_eq!(graph.total(), 420);
        assert_eq!(graph.full_scale(), 150.0);
        let snare = graph
            .bars()
            .iter()
            .find(|bar| bar.lane == GraphLane::Drum(DrumLane::Snare))
            .unwrap();
        assert_eq!(graph.proportion(snare), 1.0);
    }

    #[test]
    fn button_bars_end_with_open() {
        let mut counts = ButtonCounts::default();
        counts.add(
            ButtonChord::Press(ButtonFlags::from_digits("00000").unwrap()),
            4,
        );
        counts.add(
            ButtonChord::Press(ButtonFlags::from_digits("10001").unwrap()),
            1,
        );
        let graph = NoteGraph::buttons(&counts);
        let counts: Vec<_> = graph.bars().iter().map(|bar| bar.count).collect();
        assert_eq!(counts, vec![1, 0, 0, 0, 1, 4]);
        assert_eq!(graph.bars().last().map(|bar| bar.lane), Some(GraphLane::Open));
    }
}
