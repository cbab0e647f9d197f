use spectral_markers::data::thresholds::*;
use spectral_markers::error::{ThresholdError, ThresholdField};

#[test]
fn builds_sorted_step_curves() {
    let rows = vec![
        ThresholdBreakpoint::new("50", "10", "20"),
        ThresholdBreakpoint::new("20", "5", "15"),
    ];
    let curves = build_step_curves(&rows).unwrap();
    assert_eq!(
        curves.warning.points(),
        &[[20.0, 5.0], [50.0, 5.0], [50.0, 10.0], [51.0, 10.0]]
    );
    assert_eq!(
        curves.alert.points(),
        &[[20.0, 15.0], [50.0, 15.0], [50.0, 20.0], [51.0, 20.0]]
    );
}

#[test]
fn equal_starts_keep_input_order() {
    let rows = vec![
        ThresholdBreakpoint::new("10", "1", "2"),
        ThresholdBreakpoint::new("10", "3", "4"),
    ];
    let curves = build_step_curves(&rows).unwrap();
    assert_eq!(
        curves.warning.points(),
        &[[10.0, 1.0], [10.0, 1.0], [10.0, 3.0], [11.0, 3.0]]
    );
}

#[test]
fn non_numeric_field_is_rejected_with_row() {
    let rows = vec![
        ThresholdBreakpoint::new("10", "1", "2"),
        ThresholdBreakpoint::new("20", "", "4"),
    ];
    assert_eq!(
        build_step_curves(&rows).unwrap_err(),
        ThresholdError::NotNumeric {
            row: 2,
            field: ThresholdField::WarningAmplitude,
            value: String::new(),
        }
    );

    let rows = vec![ThresholdBreakpoint::new("abc", "1", "2")];
    assert!(matches!(
        build_step_curves(&rows),
        Err(ThresholdError::NotNumeric {
            row: 1,
            field: ThresholdField::StartFrequency,
            ..
        })
    ));
}

#[test]
fn blank_rows_are_skipped() {
    let rows = vec![
        ThresholdBreakpoint::default(),
        ThresholdBreakpoint::new(" 5 ", "1", "2"),
        ThresholdBreakpoint::new("", " ", ""),
    ];
    let curves = build_step_curves(&rows).unwrap();
    assert_eq!(curves.warning.points(), &[[5.0, 1.0], [6.0, 1.0]]);
}

#[test]
fn empty_input_gives_empty_curves() {
    let curves = build_step_curves(&[]).unwrap();
    assert!(curves.warning.is_empty());
    assert!(curves.alert.is_empty());
}

#[test]
fn editor_table_starts_with_one_empty_row() {
    let mut inputs = ThresholdInputs::default();
    assert_eq!(inputs.rows().len(), 1);
    assert!(inputs.rows()[0].is_blank());

    assert!(inputs.set_field(0, ThresholdField::StartFrequency, "100"));
    assert!(inputs.set_field(0, ThresholdField::WarningAmplitude, "0.5"));
    assert!(inputs.set_field(0, ThresholdField::AlertAmplitude, "0.9"));
    assert!(!inputs.set_field(3, ThresholdField::AlertAmplitude, "1"));

    inputs.add_row();
    assert_eq!(inputs.rows().len(), 2);
    let curves = inputs.build().unwrap();
    assert_eq!(curves.alert.points(), &[[100.0, 0.9], [101.0, 0.9]]);

    assert!(inputs.remove_row(1).is_some());
    assert!(inputs.remove_row(1).is_none());
}
