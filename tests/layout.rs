use pretty_assertions::assert_eq;

use dtx_chart::{
    prelude::*,
    surface::{ChipOptions, Rect},
};

fn sample() -> ChartDocument {
    let source = include_str!("files/sample.dtx");
    parse_dtx(source, DecodeConfig::dtx()).unwrap().document
}

#[test]
fn test_sample_timing() {
    let document = sample();
    let timing = TimingMapper::build(&document).unwrap();
    assert_eq!(
        timing
            .bar_infos()
            .iter()
            .map(|info| info.abs_start_pos.as_f64())
            .collect::<Vec<_>>(),
        vec![0.0, 288.0, 450.0]
    );
    assert_eq!(timing.chart_length().as_f64(), 558.0);
    assert_eq!(timing.bgm_start().as_f64(), 0.0);
    assert_eq!(timing.position_of(1, 72.0).unwrap().as_f64(), 396.0);
    assert_eq!(timing.position_of(1, 96.0).unwrap().as_f64(), 414.0);
    assert_eq!(format_duration(timing.estimate_duration()), "0:04");
    assert!(timing.position_of(2, 144.0).is_err());
    assert!(timing.position_of(3, 0.0).is_err());
}

#[test]
fn test_drum_sheet() {
    let document = sample();
    let timing = TimingMapper::build(&document).unwrap();
    let engine = LayoutEngine::new(
        &document,
        &timing,
        LayoutConfig::default(),
        DrumDrawer::new(ChartType::Full),
    );
    let sheets = engine.render(&RecordingSurfaceFactory).unwrap();
    assert_eq!(sheets.len(), 1);
    let sheet = sheets[0].as_ref().unwrap();
    assert_eq!(sheet.config().id, "dtxdrums_0");
    assert_eq!(sheet.config().height, 720.0 + 58.0 + 2.0 + 30.0 + 24.0);

    assert_eq!(
        sheet.texts().collect::<Vec<_>>(),
        vec![
            "Sample Song",
            "Sample Artist",
            "DRUM Level: 5.20  BPM: 120",
            "Length: 0:04  Total Notes: 13",
            "000",
            "001",
            "240.00",
            "002",
        ]
    );
    assert_eq!(sheet.chips().count(), 13);

    // The left cymbal chip is on the first line of measure 001, drawn upward from the bottom.
    let left_cymbal = sheet
        .chips()
        .find(|(_, options)| options.fill == Rgb::from_hex(0xff4ca1))
        .map(|(rect, _)| *rect);
    assert_eq!(
        left_cymbal,
        Some(Rect::new(3.0 + 50.0, 834.0 - 30.0 - 12.0 - 288.0, 24.0, 5.0))
    );
}

#[test]
fn test_guitar_sheet() {
    let document = sample();
    let timing = TimingMapper::build(&document).unwrap();
    let engine = LayoutEngine::new(
        &document,
        &timing,
        LayoutConfig::default().with_direction(Direction::Down),
        GuitarDrawer::new(Half::Guitar, ChartType::Full),
    );
    let sheets = engine.render(&RecordingSurfaceFactory).unwrap();
    let sheet = sheets[0].as_ref().unwrap();
    assert_eq!(sheet.config().id, "dtxGFG_0");
    assert!(
        sheet
            .texts()
            .any(|text| text == "GUITAR Level: 4.00  BPM: 120")
    );
    assert!(
        sheet
            .texts()
            .any(|text| text == "Length: 0:04  Total Notes: 2")
    );
    assert_eq!(
        sheet
            .chips()
            .map(|(_, options)| *options)
            .collect::<Vec<_>>(),
        vec![
            ChipOptions {
                fill: Rgb::from_hex(0xffffff)
            },
            ChipOptions {
                fill: Rgb::from_hex(0x0000ff)
            },
            ChipOptions {
                fill: Rgb::from_hex(0x654321)
            },
        ]
    );
}

#[test]
fn test_bass_sheet_of_guitar_only_chart() {
    let document = sample();
    let timing = TimingMapper::build(&document).unwrap();
    let engine = LayoutEngine::new(
        &document,
        &timing,
        LayoutConfig::default(),
        GuitarDrawer::new(Half::Bass, ChartType::Full),
    );
    let sheets = engine.render(&RecordingSurfaceFactory).unwrap();
    let sheet = sheets[0].as_ref().unwrap();
    assert_eq!(sheet.config().id, "dtxGFB_0");
    assert_eq!(sheet.chips().count(), 0);
    assert!(
        sheet
            .texts()
            .any(|text| text == "Length: 0:04  Total Notes: 0")
    );
}

fn long_chart() -> ChartDocument {
    let source = "; Created by DTXCreator 024\n#TITLE: Long\n#BPM: 180\n#DLEVEL: 10\n#00012: 01\n#05012: 01\n";
    parse_dtx(source, DecodeConfig::dtx()).unwrap().document
}

#[test]
fn long_chart_spans_canvases() {
    let document = long_chart();
    let timing = TimingMapper::build(&document).unwrap();
    assert_eq!(timing.chart_length().as_f64(), 51.0 * 192.0);

    let config = LayoutConfig::default().with_pages_per_canvas(6);
    let engine = LayoutEngine::new(&document, &timing, config, DrumDrawer::new(ChartType::Gitadora));
    assert_eq!(engine.geometry().page_count, 14);
    assert_eq!(
        engine
            .canvases()
            .iter()
            .map(|canvas| (canvas.id.as_str(), canvas.pages))
            .collect::<Vec<_>>(),
        vec![("dtxdrums_0", 6), ("dtxdrums_1", 6), ("dtxdrums_2", 2)]
    );

    let sheets = engine.render(&RecordingSurfaceFactory).unwrap();
    for (index, sheet) in sheets.iter().enumerate() {
        let sheet = sheet.as_ref().unwrap();
        assert_eq!(
            sheet.texts().last(),
            Some(format!("Part {} of 3", index + 1).as_str())
        );
    }
    let chips: usize = sheets
        .iter()
        .flatten()
        .map(|sheet| sheet.chips().count())
        .sum();
    assert_eq!(chips, 2);

    let last = engine.pixel_of(timing.chart_length()).unwrap();
    assert_eq!(last.canvas, 2);
    assert_eq!(last.x, 3.0 + engine.drawer().metrics().width);
}

#[test]
fn measure_aligned_chart_keeps_measures_whole() {
    let document = long_chart();
    let timing = TimingMapper::build(&document).unwrap();
    let config = LayoutConfig::default()
        .with_alignment(Alignment::MeasureAligned)
        .with_pages_per_canvas(25);
    let engine = LayoutEngine::new(&document, &timing, config, DrumDrawer::new(ChartType::Full));
    let pages = &engine.geometry().pages;
    assert_eq!(pages.len(), 17);
    assert!(pages.iter().all(|page| page.end_bar - page.start_bar == 2));
    assert!(pages.iter().all(|page| page.height == 576.0));
    assert_eq!(engine.canvases().len(), 1);
    assert_eq!(
        engine.canvases()[0].height,
        576.0 + 58.0 + 2.0 + 30.0 + 24.0
    );
    assert!(engine.render(&RecordingSurfaceFactory).is_ok());
}

struct FlakyFactory;

impl SurfaceFactory for FlakyFactory {
    type Surface = RecordingSurface;

    fn create(&self, config: &CanvasConfig) -> Result<Self::Surface, SurfaceError> {
        if config.id.ends_with("_1") {
            return Err(SurfaceError::Unavailable {
                id: config.id.clone(),
                reason: "no room".to_owned(),
            });
        }
        RecordingSurfaceFactory.create(config)
    }
}

#[test]
fn unavailable_canvas_is_skipped() {
    let document = long_chart();
    let timing = TimingMapper::build(&document).unwrap();
    let config = LayoutConfig::default().with_pages_per_canvas(6);
    let engine = LayoutEngine::new(&document, &timing, config, DrumDrawer::new(ChartType::Full));
    let sheets = engine.render(&FlakyFactory).unwrap();
    assert_eq!(sheets.len(), 3);
    assert!(sheets[0].is_some());
    assert!(sheets[1].is_none());
    assert!(sheets[2].is_some());
}

#[test]
fn test_svg_sheet() {
    let document = sample();
    let timing = TimingMapper::build(&document).unwrap();
    let engine = LayoutEngine::new(
        &document,
        &timing,
        LayoutConfig::default().with_scale(2.0),
        DrumDrawer::new(ChartType::Vmix),
    );
    let sheets = engine.render(&SvgSurfaceFactory).unwrap();
    assert_eq!(sheets.len(), 1);
    let bytes = sheets
        .into_iter()
        .flatten()
        .next()
        .unwrap()
        .finalize()
        .unwrap();
    let svg = String::from_utf8(bytes).unwrap();
    assert!(svg.starts_with("<svg "));
    assert!(svg.contains(r#"id="dtxdrums_0""#));
    assert!(svg.contains(">Sample Song</text>"));
    assert!(svg.contains(">240.00</text>"));
    assert!(svg.contains("DRUM Level: 52  BPM: 120"));
    assert!(svg.ends_with("</svg>\n"));
}

#[test]
fn test_note_graph() {
    let document = sample();
    let graph =
        NoteGraph::from_document(&document, Instrument::Drum, DrumGraphOption::Gitadora).unwrap();
    let surface = graph.render(&RecordingSurfaceFactory, "dtxgraph").unwrap();
    assert_eq!(surface.config().id, "dtxgraph");
    assert_eq!(
        surface.texts().collect::<Vec<_>>(),
        vec!["1", "4", "0", "2", "0", "5", "0", "0", "1", "Total Notes", "13"]
    );

    let guitar =
        NoteGraph::from_document(&document, Instrument::Guitar, DrumGraphOption::Full).unwrap();
    assert_eq!(
        guitar
            .bars()
            .iter()
            .map(|bar| bar.count)
            .collect::<Vec<_>>(),
        vec![0, 0, 1, 0, 0, 1]
    );
    assert_eq!(
        NoteGraph::from_document(&document, Instrument::Bass, DrumGraphOption::Full),
        None
    );
}
