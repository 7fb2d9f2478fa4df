//! A surface writing a standalone SVG document.

use super::{
    CanvasConfig, ChipImage, ChipOptions, HorizontalOrigin, LineOptions, Rect, RectOptions,
    Surface, SurfaceError, SurfaceFactory, TextOptions, TextPosition, VerticalOrigin,
};

/// The average glyph width relative to the font size, used to guess whether a text overflows.
const GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Accumulates SVG elements of one canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgSurface {
    config: CanvasConfig,
    elements: Vec<String>,
}

impl SvgSurface {
    /// Creates an SVG canvas filled with the background of `config`.
    #[must_use]
    pub fn new(config: &CanvasConfig) -> Self {
        let mut surface = Self {
            config: config.clone(),
            elements: Vec::new(),
        };
        surface.elements.push(format!(
            r#"<rect x="0" y="0" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            config.width, config.height, config.background
        ));
        surface
    }

    /// Returns the configuration the canvas was created with.
    #[must_use]
    pub const fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Builds the SVG document.
    #[must_use]
    pub fn to_svg_string(&self) -> String {
        let CanvasConfig {
            id, width, height, ..
        } = &self.config;
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" id="{}" viewBox="0 0 {width:.1} {height:.1}" width="{width:.1}" height="{height:.1}">"#,
            escape(id)
        );
        svg.push('\n');
        for element in &self.elements {
            svg.push_str("  ");
            svg.push_str(element);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }
}

impl Surface for SvgSurface {
    fn add_rectangle(&mut self, rect: Rect, options: &RectOptions) {
        let top = match options.origin_y {
            VerticalOrigin::Top => rect.y,
            VerticalOrigin::Center => rect.y - rect.height / 2.0,
            VerticalOrigin::Bottom => rect.y - rect.height,
        };
        self.elements.push(format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            rect.x, top, rect.width, rect.height, options.fill
        ));
    }

    fn add_line(&mut self, segment: Rect, options: &LineOptions) {
        self.elements.push(format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}"/>"#,
            segment.x,
            segment.y,
            segment.x + segment.width,
            segment.y + segment.height,
            options.stroke,
            options.stroke_width
        ));
    }

    fn add_text(&mut self, position: TextPosition, text: &str, options: &TextOptions) {
        let anchor = match options.origin_x {
            HorizontalOrigin::Left => "start",
            HorizontalOrigin::Center => "middle",
            HorizontalOrigin::Right => "end",
        };
        let baseline = match options.origin_y {
            VerticalOrigin::Top => "text-before-edge",
            VerticalOrigin::Center => "central",
            VerticalOrigin::Bottom => "text-after-edge",
        };
        let estimated_width = text.chars().count() as f64 * options.font_size * GLYPH_WIDTH_RATIO;
        let fit = position
            .max_width
            .filter(|&max_width| estimated_width > max_width)
            .map(|max_width| {
                format!(r#" textLength="{max_width:.1}" lengthAdjust="spacingAndGlyphs""#)
            })
            .unwrap_or_default();
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="{}" font-size="{:.0}" fill="{}" text-anchor="{anchor}" dominant-baseline="{baseline}"{fit}>{}</text>"#,
            position.x,
            position.y,
            escape(options.font_family),
            options.font_size,
            options.fill,
            escape(text)
        ));
    }

    fn add_chip(&mut self, rect: Rect, options: &ChipOptions, image: Option<&ChipImage>) {
        let top = rect.y - rect.height / 2.0;
        let element = match image {
            Some(image) => format!(
                r#"<image href="{}" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}"/>"#,
                escape(&image.href),
                rect.x,
                top,
                rect.width,
                rect.height
            ),
            None => format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
                rect.x, top, rect.width, rect.height, options.fill
            ),
        };
        self.elements.push(element);
    }

    fn finalize(self) -> Result<Vec<u8>, SurfaceError> {
        Ok(self.to_svg_string().into_bytes())
    }
}

/// Creates an [`SvgSurface`] for every canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SvgSurfaceFactory;

impl SurfaceFactory for SvgSurfaceFactory {
    type Surface = SvgSurface;

    fn create(&self, config: &CanvasConfig) -> Result<Self::Surface, SurfaceError> {
        if !(config.width.is_finite() && config.height.is_finite())
            || config.width <= 0.0
            || config.height <= 0.0
        {
            return Err(SurfaceError::Unavailable {
                id: config.id.clone(),
                reason: format!("invalid size {}x{}", config.width, config.height),
            });
        }
        Ok(SvgSurface::new(config))
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::surface::Rgb;

    fn config() -> CanvasConfig {
        CanvasConfig {
            id: "dtxdrums_0".to_owned(),
            pages: 6,
            width: 100.0,
            height: 50.0,
            background: Rgb::from_hex(0xffffff),
        }
    }

    #[test]
    fn wraps_elements_in_svg() {
        let mut surface = SvgSurfaceFactory.create(&config()).unwrap();
        surface.add_line(
            Rect::new(1.0, 2.0, 10.0, -2.0),
            &LineOptions {
                stroke: Rgb::from_hex(0x707070),
                stroke_width: 1.0,
            },
        );
        let svg = String::from_utf8(surface.finalize().unwrap()).unwrap();
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg""#));
        assert!(svg.contains(r##"<rect x="0" y="0" width="100.0" height="50.0" fill="#ffffff"/>"##));
        assert!(svg.contains(
            r##"<line x1="1.0" y1="2.0" x2="11.0" y2="0.0" stroke="#707070" stroke-width="1.0"/>"##
        ));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn bottom_origin_rectangles_extend_upward() {
        let mut surface = SvgSurface::new(&config());
        surface.add_rectangle(
            Rect::new(5.0, 40.0, 10.0, 30.0),
            &RectOptions {
                fill: Rgb::from_hex(0x221e1a),
                origin_y: VerticalOrigin::Bottom,
            },
        );
        assert_eq!(
            surface.elements.last().map(String::as_str),
            Some(r##"<rect x="5.0" y="10.0" width="10.0" height="30.0" fill="#221e1a"/>"##)
        );
    }

    #[test]
    fn texts_are_escaped() {
        let mut surface = SvgSurface::new(&config());
        surface.add_text(
            TextPosition::new(0.0, 0.0),
            "Rock & <Roll>",
            &TextOptions {
                fill: Rgb::from_hex(0),
                font_size: 18.0,
                font_family: "Arial",
                origin_x: HorizontalOrigin::Left,
                origin_y: VerticalOrigin::Bottom,
            },
        );
        let text = surface.elements.last().unwrap();
        assert!(text.ends_with(">Rock &amp; &lt;Roll&gt;</text>"));
        assert!(text.contains(r#"dominant-baseline="text-after-edge""#));
        assert!(!text.contains("textLength"));
    }

    #[test]
    fn chips_are_centered_on_their_line() {
        let mut surface = SvgSurface::new(&config());
        surface.add_chip(
            Rect::new(50.0, 20.0, 24.0, 5.0),
            &ChipOptions {
                fill: Rgb::from_hex(0xff4ca1),
            },
            None,
        );
        assert_eq!(
            surface.elements.last().map(String::as_str),
            Some(r##"<rect x="50.0" y="17.5" width="24.0" height="5.0" fill="#ff4ca1"/>"##)
        );
    }

    #[test]
    fn degenerate_canvas_is_unavailable() {
        let mut config = config();
        config.width = 0.0;
        assert!(matches!(
            SvgSurfaceFactory.create(&config),
            Err(SurfaceError::Unavailable { .. })
        ));
    }
}
