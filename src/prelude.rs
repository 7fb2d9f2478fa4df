//! Prelude module for the crate.
//!
//! You can use `use dtx_chart::prelude::*;` to import the types of the whole pipeline at once.

#[cfg(feature = "diagnostics")]
pub use crate::diagnostics::{SimpleSource, ToAriadne, emit_dtx_warnings};

pub use crate::{
    dtx::{
        DecodeConfig, DecodeError, DecodeWarning, DecodeWarningWithRange, DtxOutput,
        command::{
            Dialect, Instrument, Level, Measure,
            lane::{Button, ButtonChord, ButtonFlags, DrumLane, Half, LaneLabel},
            mixin::{SourceRangeMixin, SourceRangeMixinExt},
        },
        model::{BarGroup, ButtonCounts, ChartDocument, ChartInfo, ChartMetadata, DrumCounts},
        parse_dtx,
    },
    graph::{DrumGraphOption, GraphBar, GraphLane, NoteGraph},
    layout::{
        Alignment, ChartType, Direction, DrumDrawer, FrameMetrics, GuitarDrawer, LayoutConfig,
        LayoutEngine, LayoutError, LayoutGeometry, NoteDrawer, PageDescriptor, PixelPosition,
    },
    surface::{
        CanvasConfig, Rgb, Surface, SurfaceError, SurfaceFactory,
        recording::{DrawCommand, RecordingSurface, RecordingSurfaceFactory},
        svg::{SvgSurface, SvgSurfaceFactory},
    },
    timing::{AbsolutePosition, TimingError, TimingMapper, format_duration},
};
