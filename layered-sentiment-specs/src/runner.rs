//! Pipeline runner for calibrating and scoring a labeled dataset.

use layered_sentiment::{
    adjust_negation, calibrate_threshold, calibrate_window_and_threshold, compare_with_baseline,
    filter_context, filter_documents, metrics, sentiment_statistics, subjectivity_breakdown,
    BaselineComparison, Category, Document, LabeledDocument, MetricsReport, ScoredDocument,
    SentimentScorer, SentimentStatistics, SubjectivityBreakdown, TermWeightIndex,
    ThresholdCalibration, WindowCalibration,
};
use tracing::info;

use crate::config::PipelineConfig;
use crate::errors::SpecResult;

/// Result of running a dataset through the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Term weights built over the corpus and the labeled documents.
    pub index: TermWeightIndex,
    /// Threshold used for the final categorization.
    pub threshold: f64,
    /// Context window used for the final scoring, if any.
    pub window: Option<usize>,
    /// Present when the threshold was calibrated on its own.
    pub threshold_calibration: Option<ThresholdCalibration>,
    /// Present when the window was calibrated jointly with the threshold.
    pub window_calibration: Option<WindowCalibration>,
    /// Scores of the labeled documents, in input order.
    pub labeled_scores: Vec<ScoredDocument>,
    pub report: MetricsReport,
    /// `None` when some labeled document has no baseline polarity.
    pub comparison: Option<BaselineComparison>,
    pub subjectivity: SubjectivityBreakdown,
    /// Scores of the unlabeled corpus, in input order.
    pub corpus_scores: Vec<ScoredDocument>,
    /// Grouped counts over the corpus documents accepted by the filter.
    pub statistics: SentimentStatistics,
}

impl PipelineResult {
    pub fn predicted(&self) -> Vec<Category> {
        self.labeled_scores.iter().map(|s| s.category).collect()
    }
}

/// Apply the fixed polarity adjustments so calibration sees what the
/// final scorer sees.
fn prepare_labeled(
    config: &PipelineConfig,
    labeled: &[LabeledDocument],
    fixed_window: Option<usize>,
) -> Vec<LabeledDocument> {
    let cues = config.negation_cues();
    labeled
        .iter()
        .map(|l| {
            let doc = &l.document;
            let mut polarity = if config.negation.enabled {
                adjust_negation(&doc.tokens, &doc.polarity, &cues, config.negation.window)
            } else {
                doc.polarity.clone()
            };
            if let Some(window) = fixed_window {
                polarity = filter_context(&doc.tokens, &polarity, &doc.anchors, window);
            }
            LabeledDocument {
                document: doc.with_polarity(polarity),
                ..l.clone()
            }
        })
        .collect()
}

/// Run the full pipeline.
///
/// The index is built over `corpus` and the labeled documents together.
/// Depending on `config`, the context window and threshold are calibrated on
/// `labeled` or taken as given. The labeled set and the corpus are then
/// scored with the resulting parameters.
pub fn run_pipeline(
    config: &PipelineConfig,
    corpus: &[Document],
    labeled: &[LabeledDocument],
) -> SpecResult<PipelineResult> {
    config.validate()?;

    let index = TermWeightIndex::build(
        corpus.iter().chain(labeled.iter().map(|l| &l.document)),
        &config.term_weight_config(),
    );

    let mut threshold_calibration = None;
    let mut window_calibration = None;
    let (threshold, window) = if config.context.calibrate {
        let prepared = prepare_labeled(config, labeled, None);
        let calibration =
            calibrate_window_and_threshold(&prepared, &index, &config.window_sweep())?;
        let chosen = (calibration.threshold, Some(calibration.window));
        window_calibration = Some(calibration);
        chosen
    } else if config.threshold.calibrate {
        let prepared = prepare_labeled(config, labeled, config.context.window);
        let calibration = calibrate_threshold(&prepared, &index, &config.threshold_sweep())?;
        let chosen = (calibration.threshold, config.context.window);
        threshold_calibration = Some(calibration);
        chosen
    } else {
        (config.threshold.value, config.context.window)
    };

    let mut scorer = SentimentScorer::new(&index, threshold);
    if config.negation.enabled {
        scorer = scorer.with_negation(config.negation_cues(), config.negation.window);
    }
    if let Some(window) = window {
        scorer = scorer.with_context_window(window);
    }

    let labeled_documents: Vec<Document> = labeled.iter().map(|l| l.document.clone()).collect();
    let labeled_scores = scorer.score_batch(&labeled_documents);
    let predicted: Vec<Category> = labeled_scores.iter().map(|s| s.category).collect();
    let report = metrics(labeled, &predicted);
    let comparison = compare_with_baseline(labeled, &predicted, threshold);
    let subjectivity = subjectivity_breakdown(labeled);

    let corpus_scores = scorer.score_batch(corpus);
    let selected = filter_documents(corpus, config.statistics.filter);
    let documents: Vec<Document> = selected.iter().map(|&i| corpus[i].clone()).collect();
    let categories: Vec<Category> = selected.iter().map(|&i| corpus_scores[i].category).collect();
    let statistics = sentiment_statistics(
        &documents,
        &categories,
        config.statistics.group_by,
        &config.statistics.parties,
        &config.statistics.media,
    );

    info!(
        threshold,
        window = ?window,
        accuracy = report.accuracy,
        labeled = labeled.len(),
        corpus = corpus.len(),
        "pipeline finished"
    );

    Ok(PipelineResult {
        index,
        threshold,
        window,
        threshold_calibration,
        window_calibration,
        labeled_scores,
        report,
        comparison,
        subjectivity,
        corpus_scores,
        statistics,
    })
}
