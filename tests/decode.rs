use pretty_assertions::assert_eq;

use dtx_chart::prelude::*;

#[test]
fn test_sample_dtx() {
    let source = include_str!("files/sample.dtx");
    let DtxOutput { document, warnings } = parse_dtx(source, DecodeConfig::dtx()).unwrap();
    assert_eq!(warnings, vec![]);

    let info = &document.chart_info;
    assert_eq!(info.title, "Sample Song");
    assert_eq!(info.artist, "Sample Artist");
    assert_eq!(info.genre.as_deref(), Some("Rock"));
    assert_eq!(info.bpm, 120.0);
    assert_eq!(info.drum_level, Level(520));
    assert_eq!(info.guitar_level, Level(400));
    assert_eq!(info.bass_level, Level(0));
    assert_eq!(
        document.available_charts(),
        vec![Instrument::Drum, Instrument::Guitar]
    );
    assert_eq!(
        document.resources.wav.get("01").map(String::as_str),
        Some("bgm.ogg")
    );

    let drum = document.metadata.drum.as_ref().unwrap();
    assert_eq!(drum.total, 13);
    assert_eq!(drum.lane(DrumLane::HiHat), 4);
    assert_eq!(drum.lane(DrumLane::Snare), 2);
    assert_eq!(drum.lane(DrumLane::BassDrum), 5);
    assert_eq!(drum.lane(DrumLane::RightCymbal), 1);
    assert_eq!(drum.lane(DrumLane::LeftCymbal), 1);
    assert_eq!(drum.lane(DrumLane::Ride), 0);

    let guitar = document.metadata.guitar.as_ref().unwrap();
    assert_eq!(guitar.total, 2);
    assert_eq!(guitar.open, 1);
    assert_eq!(guitar.button(Button::Blue), 1);
    assert_eq!(guitar.wail, 1);
    assert_eq!(document.metadata.bass, None);

    assert_eq!(
        document
            .bar_groups
            .iter()
            .map(|bar| bar.line_count)
            .collect::<Vec<_>>(),
        vec![192, 144, 144]
    );
    let second = &document.bar_groups[1];
    assert_eq!(second.length, 0.75);
    assert_eq!(
        second
            .bpm_markers
            .iter()
            .map(|marker| (marker.line, marker.bpm.as_f64()))
            .collect::<Vec<_>>(),
        vec![(72.0, 240.0)]
    );
    assert_eq!(
        second
            .chips(LaneLabel::Drum(DrumLane::BassDrum))
            .map(|slot| slot.line)
            .collect::<Vec<_>>(),
        vec![0.0, 48.0, 96.0]
    );
    assert_eq!(document.bar_groups[0].bgm_markers, vec![0.0]);
}

#[test]
fn test_sample_gda() {
    let source = include_str!("files/sample.gda");
    let DtxOutput { document, warnings } = parse_dtx(source, DecodeConfig::gda()).unwrap();
    assert_eq!(warnings, vec![]);
    assert_eq!(document.chart_info.title, "Gda Sample");
    assert_eq!(
        document.available_charts(),
        vec![Instrument::Drum, Instrument::Bass]
    );

    let drum = document.metadata.drum.as_ref().unwrap();
    assert_eq!(drum.total, 7);
    assert_eq!(drum.lane(DrumLane::HiHat), 4);
    assert_eq!(drum.lane(DrumLane::RightCymbal), 1);

    let bass = document.metadata.bass.as_ref().unwrap();
    assert_eq!(bass.total, 3);
    assert_eq!(bass.open, 1);
    assert_eq!(bass.button(Button::Red), 2);
    assert_eq!(bass.button(Button::Green), 0);
    assert_eq!(bass.button(Button::Blue), 2);
    assert_eq!(bass.wail, 1);

    let chord = ButtonChord::Press(ButtonFlags::from_digits("101").unwrap());
    let label = LaneLabel::Button {
        half: Half::Bass,
        chord,
    };
    assert_eq!(label.to_string(), "B101");
    assert_eq!(document.bar_groups[1].chips(label).count(), 2);
}

#[test]
fn same_text_in_other_dialect_loses_lanes() {
    let source = include_str!("files/sample.gda");
    let DtxOutput { document, .. } = parse_dtx(source, DecodeConfig::dtx()).unwrap();
    assert_eq!(document.metadata.drum.map(|drum| drum.total), Some(0));
    assert!(
        document
            .bar_groups
            .iter()
            .all(|bar| bar.notes.is_empty())
    );
}

#[test]
fn recoverable_problems_are_warnings() {
    let source = "; Created by DTXCreator 024\n#BPM: 150\n#DLEVEL: 20\n#BPM02: -5\n#HELLO: world\n#00008: 0102\n#00012: 01\n#00012: 0101\n";
    let DtxOutput { document, warnings } = parse_dtx(source, DecodeConfig::dtx()).unwrap();
    let warnings = warnings
        .into_iter()
        .map(SourceRangeMixin::into_content)
        .collect::<Vec<_>>();
    assert_eq!(
        warnings,
        vec![
            DecodeWarning::InvalidBpmLabel {
                label: "02".to_owned(),
                value: "-5".to_owned(),
            },
            DecodeWarning::UnknownCommand("HELLO".to_owned()),
            DecodeWarning::DuplicateMessage {
                measure: Measure(0),
                code: "12".to_owned(),
            },
            DecodeWarning::UndefinedBpmLabel {
                measure: Measure(0),
                label: "01".to_owned(),
            },
            DecodeWarning::UndefinedBpmLabel {
                measure: Measure(0),
                label: "02".to_owned(),
            },
        ]
    );
    let bar = &document.bar_groups[0];
    assert!(bar.bpm_markers.is_empty());
    assert_eq!(bar.chips(LaneLabel::Drum(DrumLane::Snare)).count(), 2);
    assert_eq!(document.metadata.drum.map(|drum| drum.total), Some(2));
}

#[test]
fn missing_tempo_fails_timing() {
    let source = "; Created by DTXCreator 024\n#DLEVEL: 20\n#00012: 01\n";
    let DtxOutput { document, .. } = parse_dtx(source, DecodeConfig::dtx()).unwrap();
    assert_eq!(document.chart_info.bpm, 0.0);
    assert!(matches!(
        TimingMapper::build(&document),
        Err(TimingError::InvalidTempo(_))
    ));
}

#[cfg(feature = "json")]
#[test]
fn document_exports_json() {
    let source = include_str!("files/sample.dtx");
    let DtxOutput { document, .. } = parse_dtx(source, DecodeConfig::dtx()).unwrap();
    let json = document.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["chart_info"]["title"], "Sample Song");
    assert_eq!(value["metadata"]["drum"]["total"], 13);
    assert_eq!(value["bar_groups"][0]["notes"]["HH"], "01010101");
}
