//! Pagination of the timeline and the sizes of the canvases.

use super::{
    config::{Alignment, Direction, LayoutConfig, MIN_PAGES_PER_CANVAS, margins, palette},
    strategy::FrameMetrics,
};
use crate::{surface::CanvasConfig, timing::TimingMapper};

/// A page of measure aligned layout.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageDescriptor {
    /// The first measure on the page.
    pub start_bar: usize,
    /// The last measure on the page, inclusive.
    pub end_bar: usize,
    /// The height of the content in pixels.
    pub height: f64,
}

/// A point on a canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelPosition {
    /// The index of the canvas.
    pub canvas: usize,
    /// The left edge of the page.
    pub x: f64,
    /// The y coordinate of the position.
    pub y: f64,
}

/// Where the content of the pages on a canvas starts, and which way it flows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PageFrame {
    /// The y coordinate where the offsets are measured from.
    pub start: f64,
    /// The distance from `start` to the edge of the page body.
    pub edge: f64,
    /// `1.0` for downward flow, `-1.0` for upward.
    pub sign: f64,
}

impl PageFrame {
    /// Returns the y coordinate `offset` pixels away from the edge of the page body.
    pub fn y(&self, offset: f64) -> f64 {
        self.start + self.sign * (self.edge + offset)
    }
}

/// Splits the measures into pages, so that the measures on a page fit in `page_height` pixels.
///
/// A measure taller than a page gets a page of its own. The last page takes the height of the one before
/// it, so that it looks like the other pages.
#[must_use]
pub fn paginate_measures(timing: &TimingMapper, scale: f64, page_height: f64) -> Vec<PageDescriptor> {
    let bars = timing.bar_infos();
    let mut pages = Vec::new();
    let mut start_bar = 0;
    let mut height = 0.0;
    for (index, bar) in bars.iter().enumerate() {
        let end = timing
            .bar_end(index)
            .unwrap_or_else(|| timing.chart_length());
        let bar_height = (end.as_f64() - bar.abs_start_pos.as_f64()) * scale;
        if index == start_bar || height + bar_height <= page_height {
            height += bar_height;
            continue;
        }
        pages.push(PageDescriptor {
            start_bar,
            end_bar: index - 1,
            height,
        });
        start_bar = index;
        height = bar_height;
    }
    if !bars.is_empty() {
        pages.push(PageDescriptor {
            start_bar,
            end_bar: bars.len() - 1,
            height,
        });
    }
    if let [.., previous, last] = pages.as_mut_slice() {
        last.height = previous.height;
    }
    pages
}

/// The canvases and pages that a chart is laid out on.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutGeometry {
    /// The canvases in order.
    pub canvases: Vec<CanvasConfig>,
    /// The measure aligned pages. Empty with [`Alignment::Fixed`].
    pub pages: Vec<PageDescriptor>,
    /// The number of pages.
    pub page_count: usize,
}

impl LayoutGeometry {
    /// Computes the geometry of the timeline of `timing`.
    #[must_use]
    pub fn compute(
        timing: &TimingMapper,
        config: &LayoutConfig,
        metrics: &FrameMetrics,
        canvas_prefix: &str,
    ) -> Self {
        let (pages, page_count) = match config.alignment {
            Alignment::Fixed => {
                let length = timing.chart_length().as_f64() * config.scale();
                (Vec::new(), (length / config.page_height()).ceil() as usize)
            }
            Alignment::MeasureAligned => {
                let pages = paginate_measures(timing, config.scale(), config.page_height());
                let count = pages.len();
                (pages, count)
            }
        };
        let per_canvas = config.pages_per_canvas();
        let vertical_margins = margins::INFO_BAND
            + margins::INFO_GAP
            + margins::BOTTOM
            + margins::PAGE_PADDING * 2.0;
        let canvases = (0..page_count.div_ceil(per_canvas))
            .map(|index| {
                let first = index * per_canvas;
                let count = per_canvas.min(page_count - first);
                let content_height = match config.alignment {
                    Alignment::Fixed => config.page_height(),
                    Alignment::MeasureAligned => pages[first..first + count]
                        .iter()
                        .map(|page| page.height)
                        .fold(0.0, f64::max),
                };
                let slots = count.max(MIN_PAGES_PER_CANVAS);
                CanvasConfig {
                    id: format!("{canvas_prefix}_{index}"),
                    pages: count,
                    width: margins::LEFT
                        + (metrics.width + margins::PAGE_GAP) * slots as f64
                        + margins::RIGHT,
                    height: content_height + vertical_margins,
                    background: palette::BACKGROUND,
                }
            })
            .collect();
        Self {
            canvases,
            pages,
            page_count,
        }
    }

    /// Returns the content height of page `page`, counted from the first page of the chart.
    #[must_use]
    pub fn page_height(&self, page: usize, config: &LayoutConfig) -> f64 {
        match config.alignment {
            Alignment::Fixed => config.page_height(),
            Alignment::MeasureAligned => self
                .pages
                .get(page)
                .map_or(config.page_height(), |page| page.height),
        }
    }

    pub(crate) fn frame(&self, canvas: usize, direction: Direction) -> PageFrame {
        match direction {
            Direction::Up => PageFrame {
                start: self
                    .canvases
                    .get(canvas)
                    .map_or(0.0, |canvas| canvas.height),
                edge: margins::BOTTOM,
                sign: -1.0,
            },
            Direction::Down => PageFrame {
                start: 0.0,
                edge: margins::INFO_BAND + margins::INFO_GAP,
                sign: 1.0,
            },
        }
    }
}
