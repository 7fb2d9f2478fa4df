//! The drawing target of the layout engine.
//!
//! [`Surface`] is one canvas that receives drawing instructions in the pixel space, and [`SurfaceFactory`]
//! creates a surface for each canvas described by a [`CanvasConfig`]. The layout engine never knows what a
//! surface produces.
//!
//! The coordinates grow right and down from the top-left corner of the canvas.

pub mod recording;
pub mod svg;

use std::fmt;

use thiserror::Error;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from `0xRRGGBB`.
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: (hex >> 16) as u8,
            g: (hex >> 8) as u8,
            b: hex as u8,
        }
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A rectangle, or a line segment from `(x, y)` to `(x + width, y + height)`.
///
/// The extents of a line may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// The x coordinate.
    pub x: f64,
    /// The y coordinate.
    pub y: f64,
    /// The horizontal extent.
    pub width: f64,
    /// The vertical extent.
    pub height: f64,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl From<(f64, f64, f64, f64)> for Rect {
    fn from((x, y, width, height): (f64, f64, f64, f64)) -> Self {
        Self::new(x, y, width, height)
    }
}

/// Where a text is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextPosition {
    /// The x coordinate of the anchor.
    pub x: f64,
    /// The y coordinate of the anchor.
    pub y: f64,
    /// The width that the text should fit in, if any.
    pub max_width: Option<f64>,
}

impl TextPosition {
    /// Creates a position without the width limit.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            max_width: None,
        }
    }

    /// Limits the width of the text.
    #[must_use]
    pub const fn with_max_width(mut self, max_width: f64) -> Self {
        self.max_width = Some(max_width);
        self
    }
}

/// Which edge of a shape the y coordinate refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VerticalOrigin {
    /// The top edge.
    #[default]
    Top,
    /// The middle.
    Center,
    /// The bottom edge.
    Bottom,
}

/// Which edge of a text the x coordinate refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HorizontalOrigin {
    /// The left edge.
    #[default]
    Left,
    /// The middle.
    Center,
    /// The right edge.
    Right,
}

/// Style of a filled rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RectOptions {
    /// The fill color.
    pub fill: Rgb,
    /// The edge that `y` of the rectangle refers to. The rectangle extends upward from the bottom edge.
    pub origin_y: VerticalOrigin,
}

/// Style of a line.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineOptions {
    /// The line color.
    pub stroke: Rgb,
    /// The line width in pixels.
    pub stroke_width: f64,
}

/// Style of a text.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TextOptions {
    /// The text color.
    pub fill: Rgb,
    /// The font size in pixels.
    pub font_size: f64,
    /// The font family name.
    pub font_family: &'static str,
    /// The edge that `x` of the position refers to.
    pub origin_x: HorizontalOrigin,
    /// The edge that `y` of the position refers to.
    pub origin_y: VerticalOrigin,
}

/// Style of a note chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChipOptions {
    /// The fill color, used when the chip has no image.
    pub fill: Rgb,
}

/// An image drawn in place of a plain chip.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChipImage {
    /// The location of the image, written as is into the output.
    pub href: String,
    /// The width of the image in pixels.
    pub width: f64,
    /// The height of the image in pixels.
    pub height: f64,
}

/// The description of a canvas to create.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CanvasConfig {
    /// The identifier of the canvas, such as `dtxdrums_0`.
    pub id: String,
    /// The number of pages on the canvas.
    pub pages: usize,
    /// The width in pixels.
    pub width: f64,
    /// The height in pixels.
    pub height: f64,
    /// The color of the whole canvas.
    pub background: Rgb,
}

/// An error occurred on a surface.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum SurfaceError {
    /// The surface for the canvas could not be created.
    #[error("canvas {id} is unavailable: {reason}")]
    Unavailable {
        /// The identifier of the canvas.
        id: String,
        /// What went wrong.
        reason: String,
    },
    /// The drawing could not be encoded.
    #[error("failed to encode canvas {id}: {reason}")]
    Encode {
        /// The identifier of the canvas.
        id: String,
        /// What went wrong.
        reason: String,
    },
}

/// A canvas receiving drawing instructions.
pub trait Surface {
    /// Fills a rectangle.
    fn add_rectangle(&mut self, rect: Rect, options: &RectOptions);

    /// Strokes a line segment.
    fn add_line(&mut self, segment: Rect, options: &LineOptions);

    /// Writes a single line text.
    fn add_text(&mut self, position: TextPosition, text: &str, options: &TextOptions);

    /// Draws a note chip. `y` of `rect` is the vertical center of the chip.
    ///
    /// If `image` is given, it is drawn in place of the filled rectangle.
    fn add_chip(&mut self, rect: Rect, options: &ChipOptions, image: Option<&ChipImage>);

    /// Finishes the drawing and returns the encoded canvas.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Encode`] if the canvas could not be encoded.
    fn finalize(self) -> Result<Vec<u8>, SurfaceError>
    where
        Self: Sized;
}

/// Creates a [`Surface`] for each canvas.
pub trait SurfaceFactory {
    /// The surface created.
    type Surface: Surface;

    /// Creates a surface for the canvas of `config`, already filled with its background.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Unavailable`] if no surface could be made for the canvas.
    fn create(&self, config: &CanvasConfig) -> Result<Self::Surface, SurfaceError>;
}

impl<F: SurfaceFactory + ?Sized> SurfaceFactory for &F {
    type Surface = F::Surface;

    fn create(&self, config: &CanvasConfig) -> Result<Self::Surface, SurfaceError> {
        (**self).create(config)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn hex_colors() {
        let color = Rgb::from_hex(0xff4ca1);
        assert_eq!(color, Rgb::new(0xff, 0x4c, 0xa1));
        assert_eq!(color.to_string(), "#ff4ca1");
        assert_eq!(Rgb::from((0, 0, 0)).to_string(), "#000000");
    }
}
