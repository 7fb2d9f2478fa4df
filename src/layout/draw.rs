//! The drawing steps of [`LayoutEngine::render`].

use super::{
    Alignment, LayoutEngine, LayoutError, NoteDrawer, page_left, sheet,
    config::{
        BEAT_LINE_GAP, ChartType, Direction, MIN_PAGES_PER_CANVAS, TEXT_FONT, TITLE_FONT,
        font_sizes, margins, palette,
    },
};
use crate::{
    dtx::{
        command::Measure,
        model::{BarGroup, decode_slots},
    },
    surface::{
        HorizontalOrigin, LineOptions, Rect, RectOptions, Rgb, Surface, TextOptions, TextPosition,
        VerticalOrigin,
    },
    timing::{AbsolutePosition, format_duration},
};

const BAR_NUMBER_OFFSET_UP: f64 = 5.0;
const PART_LABEL_WIDTH: f64 = 85.0;
const TITLE_RAISE: f64 = 19.0;

const fn line(stroke: Rgb, stroke_width: f64) -> LineOptions {
    LineOptions {
        stroke,
        stroke_width,
    }
}

const fn text(
    fill: Rgb,
    font_size: f64,
    font_family: &'static str,
    origin_x: HorizontalOrigin,
    origin_y: VerticalOrigin,
) -> TextOptions {
    TextOptions {
        fill,
        font_size,
        font_family,
        origin_x,
        origin_y,
    }
}

impl<D: NoteDrawer> LayoutEngine<'_, D> {
    fn chart_info_lines(&self) -> (String, String) {
        let instrument = self.drawer.instrument();
        let info = &self.document.chart_info;
        let level = info.level(instrument);
        let level = if self.drawer.chart_type() == ChartType::Vmix {
            (level.0 / 10).to_string()
        } else {
            level.to_string()
        };
        let upper = format!(
            "{} Level: {level}  BPM: {}",
            instrument.name().to_ascii_uppercase(),
            info.bpm
        );
        let total = self
            .document
            .metadata
            .total_notes(instrument)
            .unwrap_or(0);
        let lower = format!(
            "Length: {}  Total Notes: {total}",
            format_duration(self.timing.estimate_duration())
        );
        (upper, lower)
    }

    pub(super) fn draw_chart_info<S: Surface>(&self, sheets: &mut [Option<S>]) {
        let metrics = self.drawer.metrics();
        let page_width = metrics.width + margins::PAGE_GAP;
        let title_width = page_width * 3.8 + margins::LEFT;
        let info_x = margins::LEFT + page_width * MIN_PAGES_PER_CANVAS as f64;
        let info_width = page_width * 2.0 + margins::RIGHT;
        let (upper, lower) = self.chart_info_lines();
        let info = &self.document.chart_info;
        let title_options = |font_size| {
            text(
                palette::CHART_INFO_TEXT,
                font_size,
                TITLE_FONT,
                HorizontalOrigin::Left,
                VerticalOrigin::Bottom,
            )
        };
        let info_options = |font_size| {
            text(
                palette::CHART_INFO_TEXT,
                font_size,
                TEXT_FONT,
                HorizontalOrigin::Right,
                VerticalOrigin::Bottom,
            )
        };

        for (index, canvas) in self.canvases().iter().enumerate() {
            let Some(sheet) = sheet(sheets, index) else {
                continue;
            };
            sheet.add_rectangle(
                Rect::new(-1.0, -1.0, canvas.width + 2.0, margins::INFO_BAND + 3.0),
                &RectOptions {
                    fill: palette::CHART_INFO,
                    origin_y: VerticalOrigin::Top,
                },
            );
            sheet.add_text(
                TextPosition::new(margins::LEFT + 2.0, margins::INFO_BAND - TITLE_RAISE)
                    .with_max_width(title_width),
                &info.title,
                &title_options(font_sizes::TITLE),
            );
            if !info.artist.is_empty() {
                sheet.add_text(
                    TextPosition::new(margins::LEFT + 2.0, margins::INFO_BAND)
                        .with_max_width(title_width),
                    &info.artist,
                    &title_options(font_sizes::ARTIST),
                );
            }
            sheet.add_text(
                TextPosition::new(info_x, margins::INFO_BAND - TITLE_RAISE)
                    .with_max_width(info_width),
                &upper,
                &info_options(font_sizes::CHART_INFO),
            );
            sheet.add_text(
                TextPosition::new(info_x, margins::INFO_BAND).with_max_width(info_width),
                &lower,
                &info_options(font_sizes::CHART_INFO_SUB),
            );
            sheet.add_line(
                Rect::new(
                    margins::LEFT,
                    margins::INFO_BAND,
                    canvas.width - margins::LEFT - margins::RIGHT,
                    0.0,
                ),
                &line(palette::TITLE_LINE, 2.0),
            );
        }
    }

    pub(super) fn draw_page_frames<S: Surface>(&self, sheets: &mut [Option<S>]) {
        let metrics = self.drawer.metrics();
        let per_canvas = self.config.pages_per_canvas();
        let measure_aligned = self.config.alignment == Alignment::MeasureAligned;
        let origin_y = match self.config.direction {
            Direction::Up => VerticalOrigin::Bottom,
            Direction::Down => VerticalOrigin::Top,
        };
        let border = line(palette::BORDER_LINE, 3.0);

        for (index, canvas) in self.canvases().iter().enumerate() {
            let Some(sheet) = sheet(sheets, index) else {
                continue;
            };
            let frame = self.geometry.frame(index, self.config.direction);
            for slot in 0..canvas.pages {
                let left = page_left(&metrics, slot);
                let content = self.geometry.page_height(index * per_canvas + slot, &self.config);
                let body = content + margins::PAGE_PADDING * 2.0;
                let lanes_x = left + metrics.left_border;
                let lanes_width = metrics.width - metrics.left_border;

                sheet.add_rectangle(
                    Rect::new(lanes_x, frame.y(0.0), lanes_width, body),
                    &RectOptions {
                        fill: palette::PAGE_FILL,
                        origin_y,
                    },
                );
                if measure_aligned {
                    sheet.add_line(
                        Rect::new(lanes_x, frame.y(margins::PAGE_PADDING + content), lanes_width, 0.0),
                        &line(palette::BAR_LINE, 2.0),
                    );
                }
                for y in [frame.y(body), frame.y(0.0)] {
                    sheet.add_line(Rect::new(lanes_x, y, lanes_width, 0.0), &border);
                }
                for x in [metrics.left_border, metrics.right_border, metrics.width] {
                    sheet.add_line(
                        Rect::new(left + x, frame.y(0.0), 0.0, frame.sign * body),
                        &border,
                    );
                }
            }
        }
    }

    pub(super) fn draw_bar<S: Surface>(
        &self,
        index: usize,
        bar: &BarGroup,
        sheets: &mut [Option<S>],
    ) -> Result<(), LayoutError> {
        let metrics = self.drawer.metrics();
        let lane_width = metrics.lane_width();

        for line_index in (0..bar.line_count).step_by(BEAT_LINE_GAP as usize) {
            let position = self.timing.position_of(index, f64::from(line_index))?;
            let pixel = self.pixel_of(position)?;
            let Some(sheet) = sheet(sheets, pixel.canvas) else {
                continue;
            };
            if line_index == 0 {
                sheet.add_line(
                    Rect::new(pixel.x, pixel.y, lane_width + metrics.left_border, 0.0),
                    &line(palette::BAR_LINE, 1.0),
                );
            } else {
                sheet.add_line(
                    Rect::new(pixel.x + metrics.left_border, pixel.y, lane_width, 0.0),
                    &line(palette::QUARTER_LINE, 1.0),
                );
            }
        }

        self.draw_bar_number(index, sheets)?;

        if let Some(info) = self.timing.bar_info(index) {
            for marker in &info.bpm_markers {
                self.draw_bpm_marker(marker.abs_pos, marker.bpm.as_f64(), sheets)?;
            }
        }

        for (&label, message) in &bar.notes {
            if !self.drawer.accepts(label) {
                continue;
            }
            for slot in decode_slots(message, bar.line_count) {
                let position = self.timing.position_of(index, slot.line)?;
                let pixel = self.pixel_of(position)?;
                let Some(sheet) = sheet(sheets, pixel.canvas) else {
                    continue;
                };
                self.drawer.draw_note(label, sheet, pixel.x, pixel.y);
            }
        }
        Ok(())
    }

    fn draw_bar_number<S: Surface>(
        &self,
        index: usize,
        sheets: &mut [Option<S>],
    ) -> Result<(), LayoutError> {
        if index > 999 {
            log::warn!("measure {index} is out of [000, 999], drawing anyway");
        }
        let pixel = self.pixel_of(self.timing.position_of(index, 0.0)?)?;
        let Some(sheet) = sheet(sheets, pixel.canvas) else {
            return Ok(());
        };
        let (offset, origin_y) = match self.config.direction {
            Direction::Up => (BAR_NUMBER_OFFSET_UP, VerticalOrigin::Bottom),
            Direction::Down => (0.0, VerticalOrigin::Top),
        };
        sheet.add_text(
            TextPosition::new(pixel.x + self.drawer.metrics().bar_number, pixel.y + offset),
            &Measure(index).to_string(),
            &text(
                palette::BAR_NUMBER_TEXT,
                font_sizes::BAR_NUMBER,
                TEXT_FONT,
                HorizontalOrigin::Left,
                origin_y,
            ),
        );
        Ok(())
    }

    fn draw_bpm_marker<S: Surface>(
        &self,
        position: AbsolutePosition,
        bpm: f64,
        sheets: &mut [Option<S>],
    ) -> Result<(), LayoutError> {
        let metrics = self.drawer.metrics();
        let pixel = self.pixel_of(position)?;
        let Some(sheet) = sheet(sheets, pixel.canvas) else {
            return Ok(());
        };
        sheet.add_line(
            Rect::new(
                pixel.x + metrics.right_border,
                pixel.y,
                metrics.bpm - metrics.right_border,
                0.0,
            ),
            &line(palette::BPM_MARKER_LINE, 1.0),
        );
        sheet.add_text(
            TextPosition::new(pixel.x + metrics.bpm, pixel.y),
            &format!("{bpm:.2}"),
            &text(
                palette::BPM_MARKER_TEXT,
                font_sizes::BPM_MARKER,
                TEXT_FONT,
                HorizontalOrigin::Left,
                VerticalOrigin::Top,
            ),
        );
        Ok(())
    }

    pub(super) fn draw_chart_lines<S: Surface>(
        &self,
        sheets: &mut [Option<S>],
    ) -> Result<(), LayoutError> {
        let metrics = self.drawer.metrics();
        for (position, color) in [
            (self.timing.bgm_start(), palette::START_LINE),
            (self.timing.chart_length(), palette::END_LINE),
        ] {
            let pixel = self.pixel_of(position)?;
            let Some(sheet) = sheet(sheets, pixel.canvas) else {
                continue;
            };
            sheet.add_line(
                Rect::new(
                    pixel.x + metrics.left_border,
                    pixel.y,
                    metrics.lane_width(),
                    0.0,
                ),
                &line(color, 3.0),
            );
        }
        Ok(())
    }

    pub(super) fn draw_part_labels<S: Surface>(&self, sheets: &mut [Option<S>]) {
        let count = self.canvases().len();
        if count < 2 {
            return;
        }
        for (index, canvas) in self.canvases().iter().enumerate() {
            let Some(sheet) = sheet(sheets, index) else {
                continue;
            };
            sheet.add_text(
                TextPosition::new(
                    canvas.width - margins::RIGHT - PART_LABEL_WIDTH,
                    canvas.height - margins::PART_LABEL,
                ),
                &format!("Part {} of {count}", index + 1),
                &text(
                    palette::PAGE_NUMBER_TEXT,
                    font_sizes::PAGE_NUMBER,
                    TEXT_FONT,
                    HorizontalOrigin::Left,
                    VerticalOrigin::Bottom,
                ),
            );
        }
    }
}
