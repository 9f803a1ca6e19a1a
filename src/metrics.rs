//! Multi-class precision, recall, F1 and accuracy.
//!
//! Degenerate denominators are defined as `0.0`, never NaN: a class without
//! ground-truth examples or without predictions scores zero.

use serde::{Deserialize, Serialize};

use crate::document::{Category, LabeledDocument};

/// Counts indexed `[truth][predicted]` in [`Category::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    counts: [[usize; 3]; 3],
}

impl ConfusionMatrix {
    /// # Panics
    /// Panics if `truth` and `predicted` differ in length.
    pub fn from_pairs(truth: &[Category], predicted: &[Category]) -> Self {
        assert_eq!(
            truth.len(),
            predicted.len(),
            "ground truth and predictions must be index-aligned"
        );
        let mut matrix = Self::default();
        for (t, p) in truth.iter().zip(predicted) {
            matrix.counts[t.index()][p.index()] += 1;
        }
        matrix
    }

    pub fn count(&self, truth: Category, predicted: Category) -> usize {
        self.counts[truth.index()][predicted.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn true_positives(&self, category: Category) -> usize {
        self.count(category, category)
    }

    /// Number of documents labeled `category`.
    pub fn support(&self, category: Category) -> usize {
        self.counts[category.index()].iter().sum()
    }

    /// Number of documents predicted as `category`.
    pub fn predicted(&self, category: Category) -> usize {
        self.counts.iter().map(|row| row[category.index()]).sum()
    }

    pub fn correct(&self) -> usize {
        Category::ALL.iter().map(|&c| self.true_positives(c)).sum()
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Per-class metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub category: Category,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Ground-truth examples of this class.
    pub support: usize,
    pub true_positives: usize,
    /// Documents predicted as this class.
    pub predicted: usize,
}

impl ClassMetrics {
    fn from_matrix(matrix: &ConfusionMatrix, category: Category) -> Self {
        let true_positives = matrix.true_positives(category);
        let support = matrix.support(category);
        let predicted = matrix.predicted(category);

        let precision = ratio(true_positives, predicted);
        let recall = ratio(true_positives, support);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        Self {
            category,
            precision,
            recall,
            f1,
            support,
            true_positives,
            predicted,
        }
    }
}

/// How often predictions matched the labels for one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    pub category: Category,
    pub matched: usize,
    pub labeled: usize,
    pub predicted: usize,
}

/// Metrics for all three classes plus overall accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Positive, Negative, Neutral.
    pub classes: [ClassMetrics; 3],
    pub accuracy: f64,
    pub total: usize,
    pub confusion: ConfusionMatrix,
}

impl MetricsReport {
    pub fn class(&self, category: Category) -> &ClassMetrics {
        &self.classes[category.index()]
    }

    pub fn macro_precision(&self) -> f64 {
        self.classes.iter().map(|c| c.precision).sum::<f64>() / 3.0
    }

    pub fn macro_recall(&self) -> f64 {
        self.classes.iter().map(|c| c.recall).sum::<f64>() / 3.0
    }

    pub fn macro_f1(&self) -> f64 {
        self.f1_sum() / 3.0
    }

    /// Unnormalized sum of the three per-class F1 scores.
    pub fn f1_sum(&self) -> f64 {
        self.classes.iter().map(|c| c.f1).sum()
    }

    pub fn agreement(&self) -> [Agreement; 3] {
        self.classes.map(|c| Agreement {
            category: c.category,
            matched: c.true_positives,
            labeled: c.support,
            predicted: c.predicted,
        })
    }

    /// Overall matches.
    pub fn matched(&self) -> usize {
        self.confusion.correct()
    }
}

/// Compare predictions against ground truth.
///
/// # Panics
/// Panics if `truth` and `predicted` differ in length.
pub fn evaluate(truth: &[Category], predicted: &[Category]) -> MetricsReport {
    let confusion = ConfusionMatrix::from_pairs(truth, predicted);
    let classes = Category::ALL.map(|c| ClassMetrics::from_matrix(&confusion, c));
    MetricsReport {
        classes,
        accuracy: ratio(confusion.correct(), confusion.total()),
        total: confusion.total(),
        confusion,
    }
}

/// [`evaluate`] against the labels of a labeled set.
pub fn metrics(labeled: &[LabeledDocument], predicted: &[Category]) -> MetricsReport {
    let truth: Vec<Category> = labeled.iter().map(|l| l.label).collect();
    evaluate(&truth, predicted)
}
