//! The score sheet layout engine.
//!
//! [`LayoutEngine`] cuts the normalized timeline into pages of a fixed pixel height, or at measure
//! boundaries, and arranges the pages side by side on one or more canvases. Then it draws the sheet in this
//! order on each canvas:
//!
//! 1. The chart information band on top.
//! 2. The page frames.
//! 3. For each measure, its beat lines, its number, its tempo changes and its chips.
//! 4. The playback start and the end of the chart.
//! 5. The part labels, if there are two or more canvases.
//!
//! The chips are drawn by a [`NoteDrawer`] of the instrument.

pub mod config;
mod draw;
pub mod geometry;
pub mod strategy;

use thiserror::Error;

pub use self::{
    config::{Alignment, ChartType, Direction, LayoutConfig},
    geometry::{LayoutGeometry, PageDescriptor, PixelPosition},
    strategy::{DrumDrawer, FrameMetrics, GuitarDrawer, NoteDrawer},
};
use self::config::margins;
use crate::{
    dtx::model::ChartDocument,
    surface::{CanvasConfig, Surface, SurfaceFactory},
    timing::{AbsolutePosition, TimingError, TimingMapper},
};

/// An error occurred when laying out a chart.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// The position is out of `[0, chart_length]`.
    #[error("position {position} is out of the chart of length {chart_length}")]
    OutOfRange {
        /// The queried position.
        position: AbsolutePosition,
        /// The length of the chart.
        chart_length: AbsolutePosition,
    },
    /// A chip could not be placed on the timeline.
    #[error(transparent)]
    Timing(#[from] TimingError),
}

/// Lays out a chart of one instrument onto canvases.
#[derive(Debug, Clone)]
pub struct LayoutEngine<'a, D> {
    document: &'a ChartDocument,
    timing: &'a TimingMapper,
    config: LayoutConfig,
    drawer: D,
    geometry: LayoutGeometry,
}

impl<'a, D: NoteDrawer> LayoutEngine<'a, D> {
    /// Creates an engine and computes the canvases needed.
    #[must_use]
    pub fn new(
        document: &'a ChartDocument,
        timing: &'a TimingMapper,
        config: LayoutConfig,
        drawer: D,
    ) -> Self {
        let geometry =
            LayoutGeometry::compute(timing, &config, &drawer.metrics(), drawer.canvas_prefix());
        log::debug!(
            "{} pages on {} canvases for the {} chart of length {}",
            geometry.page_count,
            geometry.canvases.len(),
            drawer.instrument(),
            timing.chart_length()
        );
        Self {
            document,
            timing,
            config,
            drawer,
            geometry,
        }
    }

    /// Returns the canvases and pages.
    #[must_use]
    pub const fn geometry(&self) -> &LayoutGeometry {
        &self.geometry
    }

    /// Returns the canvases to create.
    #[must_use]
    pub fn canvases(&self) -> &[CanvasConfig] {
        &self.geometry.canvases
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Returns the note drawer.
    #[must_use]
    pub const fn drawer(&self) -> &D {
        &self.drawer
    }

    /// Maps a position of the timeline onto a canvas.
    ///
    /// The `x` of the result is the left edge of the page containing the position. The end of the chart is
    /// on the last page even if it is exactly at a page boundary.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::OutOfRange`] if `position` is out of `[0, chart_length]`.
    pub fn pixel_of(&self, position: AbsolutePosition) -> Result<PixelPosition, LayoutError> {
        let chart_length = self.timing.chart_length();
        let out_of_range = LayoutError::OutOfRange {
            position,
            chart_length,
        };
        let abs = position.as_f64();
        if !(0.0..=chart_length.as_f64()).contains(&abs) || self.geometry.page_count == 0 {
            return Err(out_of_range);
        }
        let scale = self.config.scale();
        let (page, offset) = match self.config.alignment {
            Alignment::Fixed => {
                let page_height = self.config.page_height();
                let scaled = abs * scale;
                let page = (scaled / page_height).floor() as usize;
                if page < self.geometry.page_count {
                    (page, scaled % page_height)
                } else if abs == chart_length.as_f64() {
                    let last = self.geometry.page_count - 1;
                    (last, scaled - last as f64 * page_height)
                } else {
                    return Err(out_of_range);
                }
            }
            Alignment::MeasureAligned => self
                .geometry
                .pages
                .iter()
                .enumerate()
                .rev()
                .find_map(|(index, page)| {
                    let start = self.timing.bar_info(page.start_bar)?.abs_start_pos.as_f64();
                    (abs - start >= 0.0).then_some((index, (abs - start) * scale))
                })
                .ok_or(out_of_range)?,
        };
        let per_canvas = self.config.pages_per_canvas();
        let canvas = page / per_canvas;
        let frame = self.geometry.frame(canvas, self.config.direction);
        Ok(PixelPosition {
            canvas,
            x: page_left(&self.drawer.metrics(), page % per_canvas),
            y: frame.y(margins::PAGE_PADDING + offset),
        })
    }

    /// Creates a surface for each canvas with `factory` and draws the sheet.
    ///
    /// A canvas whose surface could not be created is `None` in the result, and the drawings on it are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if a measure line or a chip is out of the chart.
    pub fn render<F: SurfaceFactory>(
        &self,
        factory: &F,
    ) -> Result<Vec<Option<F::Surface>>, LayoutError> {
        let mut sheets: Vec<_> = self
            .canvases()
            .iter()
            .map(|config| {
                factory
                    .create(config)
                    .inspect_err(|e| log::warn!("skipping the drawings on canvas {}: {e}", config.id))
                    .ok()
            })
            .collect();
        if sheets.is_empty() {
            log::debug!("the chart has no measures, nothing to draw");
            return Ok(sheets);
        }
        self.draw_chart_info(&mut sheets);
        self.draw_page_frames(&mut sheets);
        for (index, bar) in self.document.bar_groups.iter().enumerate() {
            self.draw_bar(index, bar, &mut sheets)?;
        }
        self.draw_chart_lines(&mut sheets)?;
        self.draw_part_labels(&mut sheets);
        Ok(sheets)
    }
}

/// Returns the left edge of page slot `slot` on a canvas.
fn page_left(metrics: &FrameMetrics, slot: usize) -> f64 {
    margins::LEFT + (metrics.width + margins::PAGE_GAP) * slot as f64
}

/// Returns the surface of canvas `canvas`, or logs that it is unavailable.
fn sheet<S: Surface>(sheets: &mut [Option<S>], canvas: usize) -> Option<&mut S> {
    let sheet = sheets.get_mut(canvas).and_then(Option::as_mut);
    if sheet.is_none() {
        log::warn!("canvas {canvas} is unavailable, skipping a drawing");
    }
    sheet
}
