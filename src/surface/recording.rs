//! A surface that keeps the drawing instructions as values.
//!
//! Useful to inspect what the layout engine emits without rasterizing anything.

use std::fmt::Write as _;

use super::{
    CanvasConfig, ChipImage, ChipOptions, LineOptions, Rect, RectOptions, Surface, SurfaceError,
    SurfaceFactory, TextOptions, TextPosition,
};

/// A recorded drawing instruction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DrawCommand {
    /// [`Surface::add_rectangle`].
    Rectangle {
        /// The rectangle.
        rect: Rect,
        /// The style.
        options: RectOptions,
    },
    /// [`Surface::add_line`].
    Line {
        /// The segment.
        segment: Rect,
        /// The style.
        options: LineOptions,
    },
    /// [`Surface::add_text`].
    Text {
        /// The anchor.
        position: TextPosition,
        /// The text.
        text: String,
        /// The style.
        options: TextOptions,
    },
    /// [`Surface::add_chip`].
    Chip {
        /// The chip, centered vertically on `y`.
        rect: Rect,
        /// The style.
        options: ChipOptions,
        /// The image, if any.
        image: Option<ChipImage>,
    },
}

/// Records every instruction in the order received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSurface {
    config: CanvasConfig,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Creates an empty recording of the canvas of `config`.
    #[must_use]
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            config: config.clone(),
            commands: Vec::new(),
        }
    }

    /// Returns the configuration the canvas was created with.
    #[must_use]
    pub const fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Returns the recorded instructions.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Iterates the recorded texts.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Iterates the recorded chips.
    pub fn chips(&self) -> impl Iterator<Item = (&Rect, &ChipOptions)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Chip { rect, options, .. } => Some((rect, options)),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn add_rectangle(&mut self, rect: Rect, options: &RectOptions) {
        self.commands.push(DrawCommand::Rectangle {
            rect,
            options: *options,
        });
    }

    fn add_line(&mut self, segment: Rect, options: &LineOptions) {
        self.commands.push(DrawCommand::Line {
            segment,
            options: *options,
        });
    }

    fn add_text(&mut self, position: TextPosition, text: &str, options: &TextOptions) {
        self.commands.push(DrawCommand::Text {
            position,
            text: text.to_owned(),
            options: *options,
        });
    }

    fn add_chip(&mut self, rect: Rect, options: &ChipOptions, image: Option<&ChipImage>) {
        self.commands.push(DrawCommand::Chip {
            rect,
            options: *options,
            image: image.cloned(),
        });
    }

    /// Encodes the instructions one per line in the debug format.
    fn finalize(self) -> Result<Vec<u8>, SurfaceError> {
        let mut out = String::new();
        for command in &self.commands {
            writeln!(out, "{command:?}").map_err(|e| SurfaceError::Encode {
                id: self.config.id.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(out.into_bytes())
    }
}

/// Creates a [`RecordingSurface`] for every canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RecordingSurfaceFactory;

impl SurfaceFactory for RecordingSurfaceFactory {
    type Surface = RecordingSurface;

    fn create(&self, config: &CanvasConfig) -> Result<Self::Surface, SurfaceError> {
        Ok(RecordingSurface::new(config))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::surface::{HorizontalOrigin, Rgb, VerticalOrigin};

    #[test]
    fn records_in_order() {
        let config = CanvasConfig {
            id: "dtxGFG_0".to_owned(),
            pages: 6,
            width: 10.0,
            height: 10.0,
            background: Rgb::from_hex(0xffffff),
        };
        let mut surface = RecordingSurfaceFactory.create(&config).unwrap();
        surface.add_text(
            TextPosition::new(1.0, 2.0),
            "001",
            &TextOptions {
                fill: Rgb::from_hex(0),
                font_size: 24.0,
                font_family: "Arial",
                origin_x: HorizontalOrigin::Left,
                origin_y: VerticalOrigin::Top,
            },
        );
        surface.add_chip(
            Rect::new(0.0, 0.0, 19.0, 5.0),
            &ChipOptions {
                fill: Rgb::from_hex(0xff0000),
            },
            None,
        );
        assert_eq!(surface.texts().collect::<Vec<_>>(), vec!["001"]);
        assert_eq!(surface.chips().count(), 1);
        let encoded = String::from_utf8(surface.finalize().unwrap()).unwrap();
        assert_eq!(encoded.lines().count(), 2);
        assert!(encoded.starts_with("Text"));
    }
}
