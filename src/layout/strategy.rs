//! Instrument specific drawing of the note chips.
//!
//! The layout engine draws everything common to the instruments, and asks a [`NoteDrawer`] for the lane
//! columns and the chips. [`DrumDrawer`] draws the drum lanes, and [`GuitarDrawer`] draws the buttons of the
//! guitar or the bass.

use std::collections::BTreeMap;

use super::config::ChartType;
use crate::{
    dtx::command::{
        Instrument,
        lane::{Button, ButtonChord, DrumLane, Half, LaneLabel},
    },
    surface::{ChipImage, ChipOptions, Rect, Rgb, Surface},
};

const BAR_NUMBER_X: f64 = 5.0;
const LEFT_BORDER_X: f64 = 47.0;
const FIRST_LANE_X: f64 = 50.0;
const BPM_MARKER_OFFSET: f64 = 8.0;
const BPM_TEXT_WIDTH: f64 = 48.0;
const OPEN_CHIP_INDENT: f64 = 3.0;

/// Horizontal positions in a page, relative to the left edge of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameMetrics {
    /// Where the measure numbers are written.
    pub bar_number: f64,
    /// The left edge of the lanes.
    pub left_border: f64,
    /// The right edge of the lanes.
    pub right_border: f64,
    /// Where the tempo change values are written.
    pub bpm: f64,
    /// The width of a page.
    pub width: f64,
}

impl FrameMetrics {
    fn with_right_border(right_border: f64) -> Self {
        Self {
            bar_number: BAR_NUMBER_X,
            left_border: LEFT_BORDER_X,
            right_border,
            bpm: right_border + BPM_MARKER_OFFSET,
            width: right_border + BPM_MARKER_OFFSET + BPM_TEXT_WIDTH,
        }
    }

    /// Returns the width of the lanes.
    #[must_use]
    pub fn lane_width(&self) -> f64 {
        self.right_border - self.left_border
    }
}

/// The size of a chip in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChipSize {
    /// The width.
    pub width: f64,
    /// The height.
    pub height: f64,
}

impl ChipSize {
    const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl From<&ChipImage> for ChipSize {
    fn from(image: &ChipImage) -> Self {
        Self::new(image.width, image.height)
    }
}

/// Draws the chips of one instrument.
pub trait NoteDrawer {
    /// The instrument drawn.
    fn instrument(&self) -> Instrument;

    /// The lane arrangement.
    fn chart_type(&self) -> ChartType;

    /// The prefix of the canvas identifiers, such as `dtxdrums`.
    fn canvas_prefix(&self) -> &'static str;

    /// The horizontal positions in a page.
    fn metrics(&self) -> FrameMetrics;

    /// Whether the chips of `label` are passed to [`NoteDrawer::draw_note`].
    fn accepts(&self, label: LaneLabel) -> bool;

    /// Draws a chip of `label` on the line at `y` of the page whose left edge is `x`.
    fn draw_note(&self, label: LaneLabel, surface: &mut dyn Surface, x: f64, y: f64);
}

const DRUM_CHIP_HEIGHT: f64 = 5.0;
const DRUM_LANE_BORDER: f64 = 1.0;

const fn drum_chip_width(lane: DrumLane) -> f64 {
    match lane {
        DrumLane::LeftCymbal | DrumLane::RightCymbal => 24.0,
        DrumLane::Snare => 21.0,
        DrumLane::BassDrum => 23.0,
        DrumLane::Ride => 19.0,
        DrumLane::HiHat
        | DrumLane::LeftPedal
        | DrumLane::LeftBass
        | DrumLane::HighTom
        | DrumLane::LowTom
        | DrumLane::FloorTom => 18.0,
    }
}

/// Returns the chip color of `lane`.
#[must_use]
pub const fn drum_chip_color(lane: DrumLane) -> Rgb {
    Rgb::from_hex(match lane {
        DrumLane::LeftCymbal => 0xff4ca1,
        DrumLane::HiHat => 0x00ffff,
        DrumLane::LeftBass | DrumLane::BassDrum => 0xe7baff,
        DrumLane::LeftPedal => 0xffd3f0,
        DrumLane::Snare => 0xfff040,
        DrumLane::HighTom => 0x00ff00,
        DrumLane::LowTom => 0xff0000,
        DrumLane::FloorTom => 0xfea101,
        DrumLane::RightCymbal => 0x00ccff,
        DrumLane::Ride => 0x5a9cf9,
    })
}

const fn drum_lane_order(chart_type: ChartType) -> &'static [DrumLane] {
    use DrumLane::*;
    match chart_type {
        ChartType::Full => &[
            LeftCymbal,
            HiHat,
            LeftPedal,
            Snare,
            HighTom,
            BassDrum,
            LowTom,
            FloorTom,
            RightCymbal,
            Ride,
        ],
        ChartType::Gitadora => &[
            LeftCymbal,
            HiHat,
            LeftPedal,
            Snare,
            HighTom,
            BassDrum,
            LowTom,
            FloorTom,
            RightCymbal,
        ],
        ChartType::Vmix => &[HiHat, Snare, BassDrum, HighTom, LowTom, RightCymbal],
    }
}

/// Lanes without their own column, paired with the column they share.
const fn drum_lane_aliases(chart_type: ChartType) -> &'static [(DrumLane, DrumLane)] {
    use DrumLane::*;
    match chart_type {
        ChartType::Full => &[(LeftBass, LeftPedal)],
        ChartType::Gitadora => &[(Ride, RightCymbal), (LeftBass, LeftPedal)],
        ChartType::Vmix => &[
            (LeftCymbal, HiHat),
            (LeftPedal, HiHat),
            (FloorTom, LowTom),
            (Ride, RightCymbal),
            (LeftBass, BassDrum),
        ],
    }
}

/// Draws the drum lanes.
///
/// # Example
///
/// ```
/// use dtx_chart::{dtx::command::lane::DrumLane, layout::{ChartType, DrumDrawer}};
///
/// let drawer = DrumDrawer::new(ChartType::Gitadora);
/// assert_eq!(drawer.lane_position(DrumLane::Ride), drawer.lane_position(DrumLane::RightCymbal));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DrumDrawer {
    chart_type: ChartType,
    positions: BTreeMap<DrumLane, f64>,
    sizes: BTreeMap<DrumLane, ChipSize>,
    images: BTreeMap<DrumLane, ChipImage>,
    metrics: FrameMetrics,
}

impl DrumDrawer {
    /// Creates a drawer of plain chips.
    #[must_use]
    pub fn new(chart_type: ChartType) -> Self {
        Self::with_images(chart_type, BTreeMap::new())
    }

    /// Creates a drawer that draws `images` in place of the chips. The columns fit the image widths.
    #[must_use]
    pub fn with_images(chart_type: ChartType, images: BTreeMap<DrumLane, ChipImage>) -> Self {
        let mut positions = BTreeMap::new();
        let mut x = FIRST_LANE_X;
        for &lane in drum_lane_order(chart_type) {
            let width = images
                .get(&lane)
                .map_or(drum_chip_width(lane), |image| image.width);
            positions.insert(lane, x);
            x += width + DRUM_LANE_BORDER;
        }
        let mut sizes: BTreeMap<_, _> = DrumLane::ALL
            .into_iter()
            .map(|lane| {
                let size = images.get(&lane).map_or(
                    ChipSize::new(drum_chip_width(lane), DRUM_CHIP_HEIGHT),
                    ChipSize::from,
                );
                (lane, size)
            })
            .collect();
        for &(alias, target) in drum_lane_aliases(chart_type) {
            if let Some(&position) = positions.get(&target) {
                positions.insert(alias, position);
            }
            if let Some(&size) = sizes.get(&target) {
                sizes.insert(alias, size);
            }
        }
        Self {
            chart_type,
            positions,
            sizes,
            images,
            metrics: FrameMetrics::with_right_border(x),
        }
    }

    /// Returns the left edge of the column of `lane` relative to the page.
    #[must_use]
    pub fn lane_position(&self, lane: DrumLane) -> Option<f64> {
        self.positions.get(&lane).copied()
    }

    /// Returns the chip size of `lane`.
    #[must_use]
    pub fn chip_size(&self, lane: DrumLane) -> Option<ChipSize> {
        self.sizes.get(&lane).copied()
    }
}

impl NoteDrawer for DrumDrawer {
    fn instrument(&self) -> Instrument {
        Instrument::Drum
    }

    fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    fn canvas_prefix(&self) -> &'static str {
        "dtxdrums"
    }

    fn metrics(&self) -> FrameMetrics {
        self.metrics
    }

    fn accepts(&self, label: LaneLabel) -> bool {
        matches!(label, LaneLabel::Drum(lane) if self.positions.contains_key(&lane))
    }

    fn draw_note(&self, label: LaneLabel, surface: &mut dyn Surface, x: f64, y: f64) {
        let LaneLabel::Drum(lane) = label else {
            return;
        };
        let (Some(position), Some(size)) = (self.lane_position(lane), self.chip_size(lane)) else {
            return;
        };
        surface.add_chip(
            Rect::new(x + position, y, size.width, size.height),
            &ChipOptions {
                fill: drum_chip_color(lane),
            },
            self.images.get(&lane),
        );
    }
}

/// A chip of the guitar or the bass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ButtonGlyph {
    /// A red button.
    Red,
    /// A green button.
    Green,
    /// A blue button.
    Blue,
    /// A yellow button.
    Yellow,
    /// A magenta button.
    Magenta,
    /// An open note across five buttons.
    Open,
    /// An open note across three buttons.
    OpenThree,
    /// A wail.
    Wail,
}

const BUTTON_CHIP_WIDTH: f64 = 19.0;
const BUTTON_CHIP_HEIGHT: f64 = 5.0;

impl ButtonGlyph {
    const fn of(button: Button) -> Self {
        match button {
            Button::Red => Self::Red,
            Button::Green => Self::Green,
            Button::Blue => Self::Blue,
            Button::Yellow => Self::Yellow,
            Button::Magenta => Self::Magenta,
        }
    }

    const fn default_size(self) -> ChipSize {
        match self {
            Self::Open => ChipSize::new(BUTTON_CHIP_WIDTH * 5.0, BUTTON_CHIP_HEIGHT),
            Self::OpenThree => ChipSize::new(BUTTON_CHIP_WIDTH * 3.0, BUTTON_CHIP_HEIGHT),
            Self::Wail => ChipSize::new(BUTTON_CHIP_WIDTH, BUTTON_CHIP_WIDTH),
            Self::Red | Self::Green | Self::Blue | Self::Yellow | Self::Magenta => {
                ChipSize::new(BUTTON_CHIP_WIDTH, BUTTON_CHIP_HEIGHT)
            }
        }
    }

    /// Returns the chip color.
    #[must_use]
    pub const fn color(self) -> Rgb {
        Rgb::from_hex(match self {
            Self::Red => 0xff0000,
            Self::Green => 0x00ff00,
            Self::Blue => 0x0000ff,
            Self::Yellow => 0xffff00,
            Self::Magenta => 0xff00ff,
            Self::Open | Self::OpenThree => 0xffffff,
            Self::Wail => 0x654321,
        })
    }
}

const fn button_lane_order(chart_type: ChartType) -> &'static [ButtonGlyph] {
    use ButtonGlyph::*;
    match chart_type {
        ChartType::Full | ChartType::Gitadora => &[Red, Green, Blue, Yellow, Magenta, Wail],
        ChartType::Vmix => &[Red, Green, Blue, Wail],
    }
}

/// Draws the buttons of the guitar or the bass.
///
/// A chord is drawn as one chip per pressed button. With [`ChartType::Vmix`] only the first three buttons are
/// read, so yellow and magenta only chords are drawn as open notes.
#[derive(Debug, Clone, PartialEq)]
pub struct GuitarDrawer {
    half: Half,
    chart_type: ChartType,
    flag_count: usize,
    positions: BTreeMap<ButtonGlyph, f64>,
    images: BTreeMap<ButtonGlyph, ChipImage>,
    metrics: FrameMetrics,
}

impl GuitarDrawer {
    /// Creates a drawer of plain chips for `half`.
    #[must_use]
    pub fn new(half: Half, chart_type: ChartType) -> Self {
        Self::with_images(half, chart_type, BTreeMap::new())
    }

    /// Creates a drawer that draws `images` in place of the chips. The columns fit the image widths.
    #[must_use]
    pub fn with_images(
        half: Half,
        chart_type: ChartType,
        images: BTreeMap<ButtonGlyph, ChipImage>,
    ) -> Self {
        let mut positions = BTreeMap::new();
        let mut x = FIRST_LANE_X;
        for &glyph in button_lane_order(chart_type) {
            let width = images
                .get(&glyph)
                .map_or(glyph.default_size().width, |image| image.width);
            positions.insert(glyph, x);
            x += width;
        }
        let open_x = LEFT_BORDER_X + OPEN_CHIP_INDENT;
        let flag_count = if chart_type == ChartType::Vmix {
            for (alias, target) in [
                (ButtonGlyph::Yellow, ButtonGlyph::Green),
                (ButtonGlyph::Magenta, ButtonGlyph::Blue),
            ] {
                if let Some(&position) = positions.get(&target) {
                    positions.insert(alias, position);
                }
            }
            positions.insert(ButtonGlyph::OpenThree, open_x);
            3
        } else {
            positions.insert(ButtonGlyph::Open, open_x);
            5
        };
        Self {
            half,
            chart_type,
            flag_count,
            positions,
            images,
            metrics: FrameMetrics::with_right_border(x),
        }
    }

    /// Returns the half drawn.
    #[must_use]
    pub const fn half(&self) -> Half {
        self.half
    }

    /// Returns the left edge of the column of `glyph` relative to the page.
    #[must_use]
    pub fn glyph_position(&self, glyph: ButtonGlyph) -> Option<f64> {
        self.positions.get(&glyph).copied()
    }

    /// Returns the glyphs that a chip of `chord` is drawn with.
    #[must_use]
    pub fn glyphs_of(&self, chord: ButtonChord) -> Vec<ButtonGlyph> {
        let flags = match chord {
            ButtonChord::Wail => return vec![ButtonGlyph::Wail],
            ButtonChord::Press(flags) => flags,
        };
        let pressed: Vec<_> = Button::ALL
            .into_iter()
            .take(self.flag_count)
            .filter(|&button| flags.is_pressed(button))
            .map(ButtonGlyph::of)
            .collect();
        if !pressed.is_empty() {
            return pressed;
        }
        if self.flag_count == 3 {
            vec![ButtonGlyph::OpenThree]
        } else {
            vec![ButtonGlyph::Open]
        }
    }

    fn chip_size(&self, glyph: ButtonGlyph) -> ChipSize {
        self.images
            .get(&glyph)
            .map_or(glyph.default_size(), ChipSize::from)
    }
}

impl NoteDrawer for GuitarDrawer {
    fn instrument(&self) -> Instrument {
        self.half.instrument()
    }

    fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    fn canvas_prefix(&self) -> &'static str {
        match self.half {
            Half::Guitar => "dtxGFG",
            Half::Bass => "dtxGFB",
        }
    }

    fn metrics(&self) -> FrameMetrics {
        self.metrics
    }

    fn accepts(&self, label: LaneLabel) -> bool {
        matches!(label, LaneLabel::Button { .. })
    }

    fn draw_note(&self, label: LaneLabel, surface: &mut dyn Surface, x: f64, y: f64) {
        let LaneLabel::Button { half, chord } = label else {
            return;
        };
        if half != self.half {
            return;
        }
        for glyph in self.glyphs_of(chord) {
            let Some(position) = self.glyph_position(glyph) else {
                continue;
            };
            let size = self.chip_size(glyph);
            surface.add_chip(
                Rect::new(x + position, y, size.width, size.height),
                &ChipOptions { fill: glyph.color() },
                self.images.get(&glyph),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        dtx::command::lane::ButtonFlags,
        surface::{
            CanvasConfig,
            recording::{DrawCommand, RecordingSurface},
        },
    };

    fn surface() -> RecordingSurface {
        RecordingSurface::new(&CanvasConfig {
            id: "test_0".to_owned(),
            pages: 6,
            width: 500.0,
            height: 500.0,
            background: Rgb::from_hex(0xffffff),
        })
    }

    #[test]
    fn full_drum_columns() {
        let drawer = DrumDrawer::new(ChartType::Full);
        let positions: Vec<_> = [
            DrumLane::LeftCymbal,
            DrumLane::HiHat,
            DrumLane::LeftPedal,
            DrumLane::Snare,
            DrumLane::HighTom,
            DrumLane::BassDrum,
            DrumLane::LowTom,
            DrumLane::FloorTom,
            DrumLane::RightCymbal,
            DrumLane::Ride,
        ]
        .into_iter()
        .map(|lane| drawer.lane_position(lane).unwrap())
        .collect();
        assert_eq!(
            positions,
            vec![50.0, 75.0, 94.0, 113.0, 135.0, 154.0, 178.0, 197.0, 216.0, 241.0]
        );
        assert_eq!(
            drawer.lane_position(DrumLane::LeftBass),
            drawer.lane_position(DrumLane::LeftPedal)
        );
        let metrics = drawer.metrics();
        assert_eq!(metrics.right_border, 261.0);
        assert_eq!(metrics.bpm, 269.0);
        assert_eq!(metrics.width, 317.0);
        assert_eq!(metrics.left_border, 47.0);
    }

    #[test]
    fn vmix_drums_share_columns() {
        let drawer = DrumDrawer::new(ChartType::Vmix);
        assert_eq!(drawer.lane_position(DrumLane::HiHat), Some(50.0));
        assert_eq!(drawer.lane_position(DrumLane::LeftCymbal), Some(50.0));
        assert_eq!(
            drawer.lane_position(DrumLane::FloorTom),
            drawer.lane_position(DrumLane::LowTom)
        );
        assert_eq!(
            drawer.chip_size(DrumLane::LeftBass),
            drawer.chip_size(DrumLane::BassDrum)
        );
        assert!(drawer.accepts(LaneLabel::Drum(DrumLane::Ride)));
        assert!(!drawer.accepts(LaneLabel::Button {
            half: Half::Guitar,
            chord: ButtonChord::Wail
        }));
    }

    #[test]
    fn drum_chip_uses_lane_color() {
        let drawer = DrumDrawer::new(ChartType::Gitadora);
        let mut surface = surface();
        drawer.draw_note(LaneLabel::Drum(DrumLane::Ride), &mut surface, 3.0, 100.0);
        assert_eq!(
            surface.commands(),
            &[DrawCommand::Chip {
                rect: Rect::new(3.0 + 216.0, 100.0, 24.0, 5.0),
                options: ChipOptions {
                    fill: drum_chip_color(DrumLane::Ride)
                },
                image: None,
            }]
        );
    }

    #[test]
    fn images_widen_columns() {
        let images = BTreeMap::from([(
            DrumLane::LeftCymbal,
            ChipImage {
                href: "lc.png".to_owned(),
                width: 30.0,
                height: 8.0,
            },
        )]);
        let drawer = DrumDrawer::with_images(ChartType::Full, images);
        assert_eq!(drawer.lane_position(DrumLane::HiHat), Some(81.0));
        assert_eq!(
            drawer.chip_size(DrumLane::LeftCymbal),
            Some(ChipSize::new(30.0, 8.0))
        );
    }

    #[test]
    fn guitar_columns() {
        let drawer = GuitarDrawer::new(Half::Guitar, ChartType::Full);
        assert_eq!(drawer.glyph_position(ButtonGlyph::Red), Some(50.0));
        assert_eq!(drawer.glyph_position(ButtonGlyph::Magenta), Some(126.0));
        assert_eq!(drawer.glyph_position(ButtonGlyph::Wail), Some(145.0));
        assert_eq!(drawer.glyph_position(ButtonGlyph::Open), Some(50.0));
        assert_eq!(drawer.metrics().right_border, 164.0);
        assert_eq!(drawer.canvas_prefix(), "dtxGFG");
    }

    #[test]
    fn chords_explode_into_buttons() {
        let drawer = GuitarDrawer::new(Half::Bass, ChartType::Full);
        let chord = ButtonChord::Press(ButtonFlags::from_digits("10100").unwrap());
        assert_eq!(
            drawer.glyphs_of(chord),
            vec![ButtonGlyph::Red, ButtonGlyph::Blue]
        );
        let open = ButtonChord::Press(ButtonFlags::from_digits("00000").unwrap());
        assert_eq!(drawer.glyphs_of(open), vec![ButtonGlyph::Open]);
        assert_eq!(drawer.glyphs_of(ButtonChord::Wail), vec![ButtonGlyph::Wail]);
    }

    #[test]
    fn vmix_reads_three_buttons() {
        let drawer = GuitarDrawer::new(Half::Guitar, ChartType::Vmix);
        let chord = ButtonChord::Press(ButtonFlags::from_digits("00011").unwrap());
        assert_eq!(drawer.glyphs_of(chord), vec![ButtonGlyph::OpenThree]);
        assert_eq!(
            drawer.glyph_position(ButtonGlyph::Yellow),
            drawer.glyph_position(ButtonGlyph::Green)
        );
        assert_eq!(drawer.glyph_position(ButtonGlyph::OpenThree), Some(50.0));
    }

    #[test]
    fn other_half_is_skipped() {
        let drawer = GuitarDrawer::new(Half::Guitar, ChartType::Full);
        let mut surface = surface();
        let chord = ButtonChord::Press(ButtonFlags::from_digits("01000").unwrap());
        drawer.draw_note(
            LaneLabel::Button {
                half: Half::Bass,
                chord,
            },
            &mut surface,
            0.0,
            0.0,
        );
        assert!(surface.commands().is_empty());
        drawer.draw_note(
            LaneLabel::Button {
                half: Half::Guitar,
                chord,
            },
            &mut surface,
            0.0,
            0.0,
        );
        assert_eq!(surface.chips().count(), 1);
    }
}
