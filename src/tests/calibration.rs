use std::ops::ControlFlow;

use crate::{
    calibrate_threshold, calibrate_window_and_threshold, calibrate_window_and_threshold_with,
    score, CalibrationError, Category, Document, LabeledDocument, TermWeightConfig,
    TermWeightIndex, ThresholdSweep, WindowSweep,
};

fn labeled(tokens: &[&str], polarity: &[Option<f64>], label: Category) -> LabeledDocument {
    LabeledDocument::new(
        Document::new(tokens.iter().map(|t| t.to_string()).collect(), polarity.to_vec()),
        label,
    )
}

/// Five paragraphs about one party; the two neutral ones carry faint polarity.
fn party_set() -> Vec<LabeledDocument> {
    vec![
        labeled(&["spd", "gut"], &[None, Some(0.8)], Category::Positive),
        labeled(&["spd", "toll"], &[None, Some(0.6)], Category::Positive),
        labeled(&["spd", "schlecht"], &[None, Some(-0.7)], Category::Negative),
        labeled(&["spd", "okay"], &[None, Some(0.05)], Category::Neutral),
        labeled(&["spd", "naja"], &[None, Some(-0.05)], Category::Neutral),
    ]
}

fn index_for(set: &[LabeledDocument]) -> TermWeightIndex {
    TermWeightIndex::build(set.iter().map(|l| &l.document), &TermWeightConfig::default())
}

#[test]
fn threshold_separates_faint_polarity() {
    let set = party_set();
    let index = index_for(&set);
    let sweep = ThresholdSweep::new(0.2, 0.001);
    let calibration = calibrate_threshold(&set, &index, &sweep).unwrap();

    let faint = score(&set[3].document.tokens, &set[3].document.polarity, &index);
    assert!(faint > 0.009 && faint < 0.01);

    // The smallest threshold that makes both faint paragraphs neutral.
    assert_eq!(calibration.threshold, 10.0 * 0.001);
    assert_eq!(calibration.objective, 3.0);
    assert_eq!(calibration.metrics.accuracy, 1.0);
    assert_eq!(calibration.curve.len(), 201);
    assert!(calibration.curve[0].objective < 3.0);
}

#[test]
fn curve_reports_all_three_classes() {
    let set = party_set();
    let index = index_for(&set);
    let calibration = calibrate_threshold(&set, &index, &ThresholdSweep::new(0.2, 0.001)).unwrap();

    for point in &calibration.curve {
        let sum = point.f1_positive + point.f1_negative + point.f1_neutral;
        assert!((point.objective - sum).abs() < 1e-12);
    }
    // Past every score all paragraphs are neutral.
    let last = calibration.curve.last().unwrap();
    assert_eq!(last.f1_positive, 0.0);
    assert_eq!(last.f1_negative, 0.0);
    assert!(last.f1_neutral > 0.0);
}

#[test]
fn calibration_is_idempotent() {
    let set = party_set();
    let index = index_for(&set);
    let sweep = ThresholdSweep::new(0.05, 0.0005);
    let first = calibrate_threshold(&set, &index, &sweep).unwrap();
    let second = calibrate_threshold(&set, &index, &sweep).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_labeled_set_is_insufficient() {
    let index = index_for(&[]);
    assert_eq!(
        calibrate_threshold(&[], &index, &ThresholdSweep::default()),
        Err(CalibrationError::InsufficientData)
    );
    assert_eq!(
        calibrate_window_and_threshold(&[], &index, &WindowSweep::default()),
        Err(CalibrationError::InsufficientData)
    );
}

#[test]
fn single_class_set_is_insufficient() {
    let set = vec![
        labeled(&["spd", "gut"], &[None, Some(0.8)], Category::Positive),
        labeled(&["spd", "toll"], &[None, Some(0.6)], Category::Positive),
    ];
    let index = index_for(&set);
    assert_eq!(
        calibrate_threshold(&set, &index, &ThresholdSweep::new(0.1, 0.01)),
        Err(CalibrationError::SingleClass {
            category: Category::Positive
        })
    );
}

#[test]
fn invalid_sweep_is_reported() {
    let set = party_set();
    let index = index_for(&set);
    let result = calibrate_threshold(&set, &index, &ThresholdSweep::new(0.1, -0.01));
    assert!(matches!(result, Err(CalibrationError::InvalidSweep { .. })));
}

/// Each paragraph opens with a party mention followed by nearby sentiment and
/// a far-away token of the opposite polarity.
fn contextual_set() -> Vec<LabeledDocument> {
    let mut set = vec![
        labeled(
            &["spd", "gut", "a", "b", "c", "mies"],
            &[None, Some(0.5), None, None, None, Some(-0.9)],
            Category::Positive,
        ),
        labeled(
            &["cdu", "schlecht", "a", "b", "c", "prima"],
            &[None, Some(-0.5), None, None, None, Some(0.9)],
            Category::Negative,
        ),
        labeled(
            &["fdp", "a", "b", "c", "d", "klasse"],
            &[None, None, None, None, None, Some(0.9)],
            Category::Neutral,
        ),
    ];
    for doc in &mut set {
        doc.document.anchors = vec![0];
    }
    set
}

#[test]
fn window_search_finds_smallest_sufficient_window() {
    let set = contextual_set();
    let index = index_for(&set);
    let sweep = WindowSweep::new(6, ThresholdSweep::new(0.01, 0.001));
    let calibration = calibrate_window_and_threshold(&set, &index, &sweep).unwrap();

    assert_eq!(calibration.window, 1);
    assert_eq!(calibration.threshold, 0.0);
    assert_eq!(calibration.objective, 3.0);
    assert!(calibration.completed);
    assert_eq!(calibration.per_window.len(), 7);

    // Only the anchors survive a zero window, so everything is neutral.
    assert!(calibration.per_window[0].objective < 3.0);
    // The far tokens flip the verdict once they are inside the window.
    assert!(calibration.per_window[5].objective < 3.0);
    assert_eq!(calibration.metrics.accuracy, 1.0);
}

#[test]
fn window_search_can_stop_early() {
    let set = contextual_set();
    let index = index_for(&set);
    let sweep = WindowSweep::new(30, ThresholdSweep::new(0.01, 0.001));

    let mut seen = Vec::new();
    let calibration = calibrate_window_and_threshold_with(&set, &index, &sweep, |optimum| {
        seen.push(optimum.window);
        if optimum.window == 2 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .unwrap();

    assert_eq!(seen, vec![0, 1, 2]);
    assert!(!calibration.completed);
    assert_eq!(calibration.per_window.len(), 3);
    assert_eq!(calibration.window, 1);
}
