//! Grouped sentiment counts and comparison summaries.
//!
//! These helpers consume categories produced by the scorer and roll them up
//! per party and outlet, or compare them with an alternative analyzer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::categorize;
use crate::document::{Category, Document, LabeledDocument, Subjectivity};
use crate::metrics::{metrics, MetricsReport};
use crate::normalize::normalize_token;

/// Parties tracked by default.
pub const DEFAULT_PARTIES: [&str; 6] = ["CDU", "CSU", "SPD", "AfD", "Grüne", "Linke"];

/// Outlets tracked by default.
pub const DEFAULT_MEDIA: [&str; 3] = ["Tagesschau", "TAZ", "Bild"];

/// Which paragraphs take part in an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFilter {
    /// Keep every paragraph.
    All,
    /// Keep paragraphs mentioning at least one party.
    WithParties,
    /// Keep paragraphs mentioning exactly one party.
    SingleParty,
}

impl DocumentFilter {
    pub fn accepts(self, document: &Document) -> bool {
        match self {
            DocumentFilter::All => true,
            DocumentFilter::WithParties => !document.parties.is_empty(),
            DocumentFilter::SingleParty => document.parties.len() == 1,
        }
    }
}

/// Indices of the documents accepted by `filter`.
pub fn filter_documents(documents: &[Document], filter: DocumentFilter) -> Vec<usize> {
    documents
        .iter()
        .enumerate()
        .filter(|(_, doc)| filter.accepts(doc))
        .map(|(i, _)| i)
        .collect()
}

/// Positive / negative / neutral tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl CategoryCounts {
    pub fn add(&mut self, category: Category) {
        match category {
            Category::Positive => self.positive += 1,
            Category::Negative => self.negative += 1,
            Category::Neutral => self.neutral += 1,
        }
    }

    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Positive => self.positive,
            Category::Negative => self.negative,
            Category::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

/// Outer grouping of [`sentiment_statistics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupBy {
    Party,
    Media,
}

/// `outer key -> inner key -> counts`, keyed by party then outlet or the
/// other way round.
pub type SentimentStatistics = BTreeMap<String, BTreeMap<String, CategoryCounts>>;

fn mentions(document: &Document, party: &str) -> bool {
    let wanted = normalize_token(party);
    document.parties.iter().any(|p| normalize_token(p) == wanted)
}

fn published_by(document: &Document, media: &str) -> bool {
    document.media.as_deref() == Some(media)
}

/// Count categories per party and outlet.
///
/// Every requested party/outlet pair gets an entry, with zero counts when no
/// paragraph matches.
///
/// # Panics
/// Panics if `documents` and `categories` differ in length.
pub fn sentiment_statistics<P, M>(
    documents: &[Document],
    categories: &[Category],
    group_by: GroupBy,
    parties: &[P],
    media: &[M],
) -> SentimentStatistics
where
    P: AsRef<str>,
    M: AsRef<str>,
{
    assert_eq!(
        documents.len(),
        categories.len(),
        "documents and categories must be index-aligned"
    );

    let count = |party: &str, outlet: &str| {
        let mut counts = CategoryCounts::default();
        for (doc, &category) in documents.iter().zip(categories) {
            if published_by(doc, outlet) && mentions(doc, party) {
                counts.add(category);
            }
        }
        counts
    };

    let mut statistics = SentimentStatistics::new();
    match group_by {
        GroupBy::Party => {
            for party in parties {
                let inner = media
                    .iter()
                    .map(|m| (m.as_ref().to_string(), count(party.as_ref(), m.as_ref())))
                    .collect();
                statistics.insert(party.as_ref().to_string(), inner);
            }
        }
        GroupBy::Media => {
            for outlet in media {
                let inner = parties
                    .iter()
                    .map(|p| (p.as_ref().to_string(), count(p.as_ref(), outlet.as_ref())))
                    .collect();
                statistics.insert(outlet.as_ref().to_string(), inner);
            }
        }
    }
    statistics
}

/// Metrics of the lexicon scorer next to those of a baseline analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineComparison {
    pub lexicon: MetricsReport,
    pub baseline: MetricsReport,
}

/// Compare predictions with the labeled set's baseline polarity,
/// categorized with the same threshold.
///
/// Returns `None` when any document lacks a baseline polarity.
pub fn compare_with_baseline(
    labeled: &[LabeledDocument],
    predicted: &[Category],
    threshold: f64,
) -> Option<BaselineComparison> {
    let baseline: Vec<Category> = labeled
        .iter()
        .map(|l| l.baseline_polarity.map(|p| categorize(p, threshold)))
        .collect::<Option<_>>()?;

    Some(BaselineComparison {
        lexicon: metrics(labeled, predicted),
        baseline: metrics(labeled, &baseline),
    })
}

/// How non-neutral labels split across annotated subjectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubjectivityBreakdown {
    pub non_neutral_subjective: usize,
    pub non_neutral_objective: usize,
    /// Non-neutral documents without a subjectivity annotation.
    pub unannotated: usize,
}

pub fn subjectivity_breakdown(labeled: &[LabeledDocument]) -> SubjectivityBreakdown {
    let mut breakdown = SubjectivityBreakdown::default();
    for doc in labeled.iter().filter(|l| l.label != Category::Neutral) {
        match doc.subjectivity {
            Some(Subjectivity::Subjective) => breakdown.non_neutral_subjective += 1,
            Some(Subjectivity::Objective) => breakdown.non_neutral_objective += 1,
            None => breakdown.unannotated += 1,
        }
    }
    breakdown
}
