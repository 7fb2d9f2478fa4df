//! Options and fixed parameters of the score sheet.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// The allowed range of [`LayoutConfig::scale`].
pub const SCALE_RANGE: (f64, f64) = (0.5, 3.0);
/// The allowed range of [`LayoutConfig::page_height`].
pub const PAGE_HEIGHT_RANGE: (f64, f64) = (480.0, 3840.0);
/// The allowed range of [`LayoutConfig::pages_per_canvas`].
pub const PAGES_PER_CANVAS_RANGE: (usize, usize) = (6, 25);
/// The least number of page slots a canvas is wide, even if it has fewer pages.
pub const MIN_PAGES_PER_CANVAS: usize = 6;
/// The distance in lines between the beat lines of a measure.
pub const BEAT_LINE_GAP: u32 = 48;

/// Margins of a canvas in pixels.
pub mod margins {
    /// The height of the chart information band at the top.
    pub const INFO_BAND: f64 = 58.0;
    /// The gap below the chart information band.
    pub const INFO_GAP: f64 = 2.0;
    /// The left margin.
    pub const LEFT: f64 = 3.0;
    /// The right margin.
    pub const RIGHT: f64 = 3.0;
    /// The bottom margin.
    pub const BOTTOM: f64 = 30.0;
    /// The gap between pages.
    pub const PAGE_GAP: f64 = 0.0;
    /// The padding above and below the content of a page.
    pub const PAGE_PADDING: f64 = 12.0;
    /// The distance of the part label from the bottom.
    pub const PART_LABEL: f64 = 2.0;
}

/// Colors of the score sheet.
pub mod palette {
    use crate::surface::Rgb;

    /// The canvas background.
    pub const BACKGROUND: Rgb = Rgb::from_hex(0xffffff);
    /// The chart information band.
    pub const CHART_INFO: Rgb = Rgb::from_hex(0x221e1a);
    /// The page body.
    pub const PAGE_FILL: Rgb = Rgb::from_hex(0x221e1a);

    /// The first line of a measure.
    pub const BAR_LINE: Rgb = Rgb::from_hex(0x707070);
    /// The beat lines inside a measure.
    pub const QUARTER_LINE: Rgb = Rgb::from_hex(0x4b4c4a);
    /// The end of the chart.
    pub const END_LINE: Rgb = Rgb::from_hex(0xff0000);
    /// The playback start.
    pub const START_LINE: Rgb = Rgb::from_hex(0x00ff00);
    /// The line under the chart information.
    pub const TITLE_LINE: Rgb = Rgb::from_hex(0x707070);
    /// The page borders.
    pub const BORDER_LINE: Rgb = Rgb::from_hex(0x707070);
    /// The tempo change marks.
    pub const BPM_MARKER_LINE: Rgb = Rgb::from_hex(0xeeffab);

    /// The measure numbers.
    pub const BAR_NUMBER_TEXT: Rgb = Rgb::from_hex(0x000000);
    /// The tempo change values.
    pub const BPM_MARKER_TEXT: Rgb = Rgb::from_hex(0xffffff);
    /// The chart information.
    pub const CHART_INFO_TEXT: Rgb = Rgb::from_hex(0xffffff);
    /// The part labels.
    pub const PAGE_NUMBER_TEXT: Rgb = Rgb::from_hex(0x000000);
}

/// Font sizes of the score sheet in pixels.
pub mod font_sizes {
    /// The measure numbers.
    pub const BAR_NUMBER: f64 = 24.0;
    /// The tempo change values.
    pub const BPM_MARKER: f64 = 14.0;
    /// The song title.
    pub const TITLE: f64 = 30.0;
    /// The artist.
    pub const ARTIST: f64 = 16.0;
    /// The mode, level and tempo line.
    pub const CHART_INFO: f64 = 24.0;
    /// The length and note count line.
    pub const CHART_INFO_SUB: f64 = 16.0;
    /// The part labels.
    pub const PAGE_NUMBER: f64 = 18.0;
}

/// The font of the song title and the artist.
pub const TITLE_FONT: &str = "Meiryo UI";
/// The font of every other text.
pub const TEXT_FONT: &str = "Arial";

/// How the timeline is cut into pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    /// Every page covers the same height of the timeline.
    #[default]
    Fixed,
    /// Pages break only between measures.
    MeasureAligned,
}

/// Which way the timeline flows on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// From the bottom to the top, as the notes scroll in the game.
    #[default]
    Up,
    /// From the top to the bottom.
    Down,
}

/// The lane arrangement to draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChartType {
    /// Every lane has its own column, ride cymbal included.
    #[default]
    Full,
    /// The ride cymbal shares the right cymbal column.
    Gitadora,
    /// The reduced arrangement of six drum lanes and three buttons.
    Vmix,
}

/// An error occurred when parsing a layout option from its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("unknown {kind}: {found:?}")]
pub struct UnknownOption {
    /// What option was parsed.
    pub kind: &'static str,
    /// The given name.
    pub found: String,
}

impl FromStr for Alignment {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "measure" | "bar" | "measure-aligned" => Ok(Self::MeasureAligned),
            _ => Err(UnknownOption {
                kind: "alignment",
                found: s.to_owned(),
            }),
        }
    }
}

impl FromStr for Direction {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(UnknownOption {
                kind: "direction",
                found: s.to_owned(),
            }),
        }
    }
}

impl FromStr for ChartType {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "gitadora" => Ok(Self::Gitadora),
            "vmix" => Ok(Self::Vmix),
            _ => Err(UnknownOption {
                kind: "chart type",
                found: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Full => "full",
            Self::Gitadora => "Gitadora",
            Self::Vmix => "Vmix",
        })
    }
}

/// Options of the layout. Every numeric option is clamped into its allowed range.
///
/// # Example
///
/// ```
/// use dtx_chart::layout::config::LayoutConfig;
///
/// let config = LayoutConfig::default().with_scale(10.0).with_pages_per_canvas(1);
/// assert_eq!(config.scale(), 3.0);
/// assert_eq!(config.pages_per_canvas(), 6);
/// assert_eq!(config.page_height(), 720.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "RawLayoutConfig")
)]
pub struct LayoutConfig {
    scale: f64,
    page_height: f64,
    pages_per_canvas: usize,
    /// How the timeline is cut into pages.
    pub alignment: Alignment,
    /// Which way the timeline flows.
    pub direction: Direction,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            page_height: 720.0,
            pages_per_canvas: 20,
            alignment: Alignment::default(),
            direction: Direction::default(),
        }
    }
}

/// The unchecked form of [`LayoutConfig`] read by serde, clamped on conversion.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawLayoutConfig {
    scale: f64,
    page_height: f64,
    pages_per_canvas: usize,
    alignment: Alignment,
    direction: Direction,
}

#[cfg(feature = "serde")]
impl From<RawLayoutConfig> for LayoutConfig {
    fn from(raw: RawLayoutConfig) -> Self {
        Self::default()
            .with_scale(raw.scale)
            .with_page_height(raw.page_height)
            .with_pages_per_canvas(raw.pages_per_canvas)
            .with_alignment(raw.alignment)
            .with_direction(raw.direction)
    }
}

impl LayoutConfig {
    /// Sets the pixels per absolute unit. A non-finite value keeps the current one.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        if scale.is_finite() {
            self.scale = num::clamp(scale, SCALE_RANGE.0, SCALE_RANGE.1);
        }
        self
    }

    /// Sets the height of the content of a page in pixels. A non-finite value keeps the current one.
    #[must_use]
    pub fn with_page_height(mut self, page_height: f64) -> Self {
        if page_height.is_finite() {
            self.page_height = num::clamp(page_height, PAGE_HEIGHT_RANGE.0, PAGE_HEIGHT_RANGE.1);
        }
        self
    }

    /// Sets the number of pages on a canvas.
    #[must_use]
    pub fn with_pages_per_canvas(mut self, pages_per_canvas: usize) -> Self {
        self.pages_per_canvas = num::clamp(
            pages_per_canvas,
            PAGES_PER_CANVAS_RANGE.0,
            PAGES_PER_CANVAS_RANGE.1,
        );
        self
    }

    /// Sets the alignment.
    #[must_use]
    pub const fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the direction.
    #[must_use]
    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Returns the pixels per absolute unit.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Returns the height of the content of a page in pixels.
    #[must_use]
    pub const fn page_height(&self) -> f64 {
        self.page_height
    }

    /// Returns the number of pages on a canvas.
    #[must_use]
    pub const fn pages_per_canvas(&self) -> usize {
        self.pages_per_canvas
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn options_are_clamped() {
        let config = LayoutConfig::default()
            .with_scale(0.1)
            .with_page_height(10_000.0)
            .with_pages_per_canvas(100);
        assert_eq!(config.scale(), 0.5);
        assert_eq!(config.page_height(), 3840.0);
        assert_eq!(config.pages_per_canvas(), 25);

        let config = config.with_scale(f64::NAN).with_page_height(1000.0);
        assert_eq!(config.scale(), 0.5);
        assert_eq!(config.page_height(), 1000.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialized_options_are_clamped() {
        let config: LayoutConfig = serde_json::from_str(
            r#"{"scale":100.0,"page_height":720.0,"pages_per_canvas":0,"alignment":"Fixed","direction":"Up"}"#,
        )
        .unwrap();
        assert_eq!(config.scale(), 3.0);
        assert_eq!(config.page_height(), 720.0);
        assert_eq!(config.pages_per_canvas(), 6);
        assert_eq!(config.alignment, Alignment::Fixed);
        assert_eq!(config.direction, Direction::Up);
    }

    #[test]
    fn parse_option_names() {
        assert_eq!("Vmix".parse(), Ok(ChartType::Vmix));
        assert_eq!("measure".parse(), Ok(Alignment::MeasureAligned));
        assert_eq!("DOWN".parse(), Ok(Direction::Down));
        assert!("sideways".parse::<Direction>().is_err());
    }
}
