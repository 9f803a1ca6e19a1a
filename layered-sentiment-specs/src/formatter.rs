//! Plain-text, markdown and CSV reports.

use std::fmt::Write;

use layered_sentiment::{
    BaselineComparison, Category, MetricsReport, SentimentStatistics, ThresholdCalibration,
};
use unicode_width::UnicodeWidthStr;

use crate::runner::PipelineResult;

/// Per-class precision, recall and F1 as a markdown table.
pub fn format_metrics_table(report: &MetricsReport) -> String {
    let mut output = String::new();
    writeln!(output, "| | Precision | Recall | F1 | Support |").unwrap();
    writeln!(output, "|---|---|---|---|---|").unwrap();
    for class in &report.classes {
        writeln!(
            output,
            "| {} | {:.3} | {:.3} | {:.3} | {} |",
            class.category, class.precision, class.recall, class.f1, class.support
        )
        .unwrap();
    }
    writeln!(
        output,
        "| Macro | {:.3} | {:.3} | {:.3} | {} |",
        report.macro_precision(),
        report.macro_recall(),
        report.macro_f1(),
        report.total
    )
    .unwrap();
    writeln!(output).unwrap();
    writeln!(output, "Accuracy: {:.3}", report.accuracy).unwrap();
    output
}

/// Lexicon scorer and baseline analyzer side by side, as a markdown table.
pub fn format_comparison(comparison: &BaselineComparison) -> String {
    let mut output = String::new();
    writeln!(output, "| | Lexicon | Baseline |").unwrap();
    writeln!(output, "|---|---|---|").unwrap();

    let rows: [(&str, fn(&MetricsReport, Category) -> f64); 3] = [
        ("Precision", |r: &MetricsReport, c: Category| r.class(c).precision),
        ("Recall", |r: &MetricsReport, c: Category| r.class(c).recall),
        ("F1", |r: &MetricsReport, c: Category| r.class(c).f1),
    ];
    for (name, value) in rows {
        for category in Category::ALL {
            writeln!(
                output,
                "| {} {} | {:.3} | {:.3} |",
                name,
                category,
                value(&comparison.lexicon, category),
                value(&comparison.baseline, category)
            )
            .unwrap();
        }
    }
    writeln!(
        output,
        "| Accuracy | {:.3} | {:.3} |",
        comparison.lexicon.accuracy, comparison.baseline.accuracy
    )
    .unwrap();
    output
}

/// The threshold sweep as CSV, one row per threshold. The chosen threshold is
/// marked in the `best` column.
pub fn format_sweep_csv(calibration: &ThresholdCalibration) -> String {
    let mut output = String::new();
    writeln!(output, "threshold,f1_positive,f1_negative,f1_neutral,objective,best").unwrap();
    let best = calibration
        .curve
        .iter()
        .position(|p| p.threshold == calibration.threshold);
    for (i, point) in calibration.curve.iter().enumerate() {
        writeln!(
            output,
            "{},{},{},{},{},{}",
            point.threshold,
            point.f1_positive,
            point.f1_negative,
            point.f1_neutral,
            point.objective,
            u8::from(best == Some(i))
        )
        .unwrap();
    }
    output
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{}{}", text, " ".repeat(fill))
}

/// Grouped counts as an aligned text table.
pub fn format_statistics(statistics: &SentimentStatistics) -> String {
    let outer_width = statistics
        .keys()
        .map(|k| UnicodeWidthStr::width(k.as_str()))
        .max()
        .unwrap_or(0);
    let inner_width = statistics
        .values()
        .flat_map(|inner| inner.keys())
        .map(|k| UnicodeWidthStr::width(k.as_str()))
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for (outer, inner) in statistics {
        for (key, counts) in inner {
            writeln!(
                output,
                "{}  {}  +{:<4} -{:<4} ={}",
                pad(outer, outer_width),
                pad(key, inner_width),
                counts.positive,
                counts.negative,
                counts.neutral
            )
            .unwrap();
        }
    }
    output
}

/// One-screen summary of a pipeline run.
pub fn format_summary(result: &PipelineResult) -> String {
    let mut output = String::new();
    writeln!(
        output,
        "vocabulary: {} terms over {} documents",
        result.index.len(),
        result.index.document_count()
    )
    .unwrap();
    writeln!(output, "threshold: {:.6}", result.threshold).unwrap();
    match result.window {
        Some(window) => writeln!(output, "window: {}", window).unwrap(),
        None => writeln!(output, "window: none").unwrap(),
    }
    if let Some(calibration) = &result.window_calibration {
        if !calibration.completed {
            writeln!(
                output,
                "window search stopped after {} windows",
                calibration.per_window.len()
            )
            .unwrap();
        }
    }

    let report = &result.report;
    writeln!(
        output,
        "matched {} out of {} labeled paragraphs",
        report.matched(),
        report.total
    )
    .unwrap();
    for agreement in report.agreement() {
        writeln!(
            output,
            "  {}: matched {} out of {} labeled, {} predicted",
            agreement.category, agreement.matched, agreement.labeled, agreement.predicted
        )
        .unwrap();
    }

    let subjectivity = &result.subjectivity;
    writeln!(
        output,
        "non-neutral labels: {} subjective, {} objective, {} unannotated",
        subjectivity.non_neutral_subjective,
        subjectivity.non_neutral_objective,
        subjectivity.unannotated
    )
    .unwrap();
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_sentiment::{evaluate, CategoryCounts};
    use std::collections::BTreeMap;
    use Category::*;

    #[test]
    fn test_metrics_table() {
        let report = evaluate(
            &[Positive, Positive, Negative, Neutral],
            &[Positive, Neutral, Negative, Neutral],
        );
        insta::assert_snapshot!(format_metrics_table(&report), @r###"
        | | Precision | Recall | F1 | Support |
        |---|---|---|---|---|
        | Positive | 1.000 | 0.500 | 0.667 | 2 |
        | Negative | 1.000 | 1.000 | 1.000 | 1 |
        | Neutral | 0.500 | 1.000 | 0.667 | 1 |
        | Macro | 0.833 | 0.833 | 0.778 | 4 |

        Accuracy: 0.750
        "###);
    }

    #[test]
    fn test_statistics_alignment_counts_display_width() {
        let mut inner = BTreeMap::new();
        inner.insert(
            "TAZ".to_string(),
            CategoryCounts {
                positive: 1,
                negative: 2,
                neutral: 0,
            },
        );
        let mut statistics = SentimentStatistics::new();
        statistics.insert("Grüne".to_string(), inner.clone());
        statistics.insert("SPD".to_string(), inner);

        insta::assert_snapshot!(format_statistics(&statistics), @r###"
        Grüne  TAZ  +1    -2    =0
        SPD    TAZ  +1    -2    =0
        "###);
    }
}
