//! Threshold and context-window calibration against labeled paragraphs.
//!
//! Both searches are exhaustive linear sweeps. The objective is the sum of the
//! per-class F1 scores (positive + negative + neutral), not their mean. The
//! best cell is the first one reaching the maximum, so ties resolve towards
//! smaller windows and smaller thresholds.
//!
//! Scores do not depend on the threshold, so every document is scored once per
//! window and the threshold sweep only recategorizes.

use std::ops::ControlFlow;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregate::{categorize, score};
use crate::context_window::filter_context;
use crate::document::{Category, LabeledDocument};
use crate::error::CalibrationError;
use crate::metrics::{evaluate, MetricsReport};
use crate::term_weight::TermWeightIndex;

/// Largest number of thresholds a single sweep may visit.
pub const MAX_SWEEP_POINTS: usize = 10_000_000;

/// A linear threshold sweep `0, step, 2 * step, ..` up to `max_threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSweep {
    pub max_threshold: f64,
    pub step: f64,
}

impl ThresholdSweep {
    pub fn new(max_threshold: f64, step: f64) -> Self {
        Self {
            max_threshold,
            step,
        }
    }

    /// Every threshold visited by the sweep, in increasing order.
    pub fn thresholds(&self) -> Result<Vec<f64>, CalibrationError> {
        if !self.max_threshold.is_finite() || self.max_threshold < 0.0 {
            return Err(CalibrationError::InvalidSweep {
                message: format!(
                    "max threshold must be finite and non-negative, got {}",
                    self.max_threshold
                ),
            });
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(CalibrationError::InvalidSweep {
                message: format!("step must be finite and positive, got {}", self.step),
            });
        }

        let last = (self.max_threshold / self.step + 1e-6).floor();
        if !last.is_finite() || last >= MAX_SWEEP_POINTS as f64 {
            return Err(CalibrationError::InvalidSweep {
                message: format!(
                    "sweep of {} by {} exceeds {} thresholds",
                    self.max_threshold, self.step, MAX_SWEEP_POINTS
                ),
            });
        }

        // Multiplying the index avoids the drift of repeated `t += step`.
        let last = last as usize;
        Ok((0..=last).map(|k| k as f64 * self.step).collect())
    }
}

impl Default for ThresholdSweep {
    fn default() -> Self {
        Self {
            max_threshold: 0.005,
            step: 0.000_000_1,
        }
    }
}

/// A window sweep `0..=max_window` with an inner threshold sweep per window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSweep {
    pub max_window: usize,
    pub thresholds: ThresholdSweep,
}

impl WindowSweep {
    pub fn new(max_window: usize, thresholds: ThresholdSweep) -> Self {
        Self {
            max_window,
            thresholds,
        }
    }
}

impl Default for WindowSweep {
    fn default() -> Self {
        Self {
            max_window: 35,
            thresholds: ThresholdSweep::new(0.002, 0.000_01),
        }
    }
}

/// Per-class F1 at one threshold of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub threshold: f64,
    pub f1_positive: f64,
    pub f1_negative: f64,
    pub f1_neutral: f64,
    /// `f1_positive + f1_negative + f1_neutral`
    pub objective: f64,
}

impl SweepPoint {
    fn from_report(threshold: f64, report: &MetricsReport) -> Self {
        Self {
            threshold,
            f1_positive: report.class(Category::Positive).f1,
            f1_negative: report.class(Category::Negative).f1,
            f1_neutral: report.class(Category::Neutral).f1,
            objective: report.f1_sum(),
        }
    }
}

/// Outcome of [`calibrate_threshold`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdCalibration {
    pub threshold: f64,
    pub objective: f64,
    /// Metrics of the labeled set categorized with `threshold`.
    pub metrics: MetricsReport,
    /// Every sweep point, for plotting the three F1 curves.
    pub curve: Vec<SweepPoint>,
}

/// Best threshold found for one window size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowOptimum {
    pub window: usize,
    pub threshold: f64,
    pub objective: f64,
}

/// Outcome of [`calibrate_window_and_threshold`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowCalibration {
    pub window: usize,
    pub threshold: f64,
    pub objective: f64,
    pub metrics: MetricsReport,
    /// Best threshold per visited window, in window order.
    pub per_window: Vec<WindowOptimum>,
    /// `false` when the observer stopped the search early.
    pub completed: bool,
}

fn check_labeled(labeled: &[LabeledDocument]) -> Result<(), CalibrationError> {
    let first = match labeled.first() {
        Some(first) => first.label,
        None => return Err(CalibrationError::InsufficientData),
    };
    if labeled.iter().all(|l| l.label == first) {
        return Err(CalibrationError::SingleClass { category: first });
    }
    Ok(())
}

fn categorize_all(scores: &[f64], threshold: f64) -> Vec<Category> {
    scores.iter().map(|&s| categorize(s, threshold)).collect()
}

/// Evaluate every threshold and return the curve with the index of the
/// first point reaching the maximum objective.
fn sweep(scores: &[f64], truth: &[Category], thresholds: &[f64]) -> (Vec<SweepPoint>, usize) {
    let curve: Vec<SweepPoint> = thresholds
        .par_iter()
        .map(|&t| SweepPoint::from_report(t, &evaluate(truth, &categorize_all(scores, t))))
        .collect();

    let mut best = 0;
    for (i, point) in curve.iter().enumerate().skip(1) {
        if point.objective > curve[best].objective {
            best = i;
        }
    }
    (curve, best)
}

fn raw_scores(labeled: &[LabeledDocument], weights: &TermWeightIndex) -> Vec<f64> {
    labeled
        .par_iter()
        .map(|l| score(&l.document.tokens, &l.document.polarity, weights))
        .collect()
}

fn context_scores(labeled: &[LabeledDocument], weights: &TermWeightIndex, window: usize) -> Vec<f64> {
    labeled
        .par_iter()
        .map(|l| {
            let doc = &l.document;
            let filtered = filter_context(&doc.tokens, &doc.polarity, &doc.anchors, window);
            score(&doc.tokens, &filtered, weights)
        })
        .collect()
}

/// Find the threshold maximizing the summed per-class F1 over a linear sweep.
pub fn calibrate_threshold(
    labeled: &[LabeledDocument],
    weights: &TermWeightIndex,
    sweep_config: &ThresholdSweep,
) -> Result<ThresholdCalibration, CalibrationError> {
    check_labeled(labeled)?;
    let thresholds = sweep_config.thresholds()?;
    let truth: Vec<Category> = labeled.iter().map(|l| l.label).collect();

    let scores = raw_scores(labeled, weights);
    let (curve, best) = sweep(&scores, &truth, &thresholds);
    let threshold = curve[best].threshold;
    let objective = curve[best].objective;

    info!(
        threshold,
        objective,
        points = curve.len(),
        documents = labeled.len(),
        "calibrated threshold"
    );

    Ok(ThresholdCalibration {
        threshold,
        objective,
        metrics: evaluate(&truth, &categorize_all(&scores, threshold)),
        curve,
    })
}

/// Jointly search the context window and threshold.
pub fn calibrate_window_and_threshold(
    labeled: &[LabeledDocument],
    weights: &TermWeightIndex,
    sweep_config: &WindowSweep,
) -> Result<WindowCalibration, CalibrationError> {
    calibrate_window_and_threshold_with(labeled, weights, sweep_config, |_| {
        ControlFlow::Continue(())
    })
}

/// [`calibrate_window_and_threshold`] with an observer that sees the optimum
/// of every finished window and may stop the search early.
///
/// When the observer breaks, the best parameters found so far are returned
/// with `completed` set to `false`.
pub fn calibrate_window_and_threshold_with<F>(
    labeled: &[LabeledDocument],
    weights: &TermWeightIndex,
    sweep_config: &WindowSweep,
    mut observer: F,
) -> Result<WindowCalibration, CalibrationError>
where
    F: FnMut(&WindowOptimum) -> ControlFlow<()>,
{
    check_labeled(labeled)?;
    let thresholds = sweep_config.thresholds.thresholds()?;
    let truth: Vec<Category> = labeled.iter().map(|l| l.label).collect();

    let mut per_window = Vec::with_capacity(sweep_config.max_window.min(1024).saturating_add(1));
    let mut best: Option<(WindowOptimum, Vec<f64>)> = None;
    let mut completed = true;

    for window in 0..=sweep_config.max_window {
        // All documents are filtered before any threshold is tried.
        let scores = context_scores(labeled, weights, window);
        let (curve, idx) = sweep(&scores, &truth, &thresholds);
        let optimum = WindowOptimum {
            window,
            threshold: curve[idx].threshold,
            objective: curve[idx].objective,
        };
        debug!(
            window,
            threshold = optimum.threshold,
            objective = optimum.objective,
            "calibrated window"
        );

        let improves = best
            .as_ref()
            .map_or(true, |(current, _)| optimum.objective > current.objective);
        if improves {
            best = Some((optimum, scores));
        }
        per_window.push(optimum);

        if observer(&optimum).is_break() {
            completed = window == sweep_config.max_window;
            break;
        }
    }

    // The loop always visits window 0.
    let (optimum, scores) = match best {
        Some(best) => best,
        None => return Err(CalibrationError::InsufficientData),
    };

    info!(
        window = optimum.window,
        threshold = optimum.threshold,
        objective = optimum.objective,
        completed,
        "calibrated context window and threshold"
    );

    Ok(WindowCalibration {
        window: optimum.window,
        threshold: optimum.threshold,
        objective: optimum.objective,
        metrics: evaluate(&truth, &categorize_all(&scores, optimum.threshold)),
        per_window,
        completed,
    })
}
