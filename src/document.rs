//! Paragraph records consumed by the scoring pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sentiment category assigned to a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Positive,
    Negative,
    Neutral,
}

impl Category {
    /// All categories in reporting order.
    pub const ALL: [Category; 3] = [Category::Positive, Category::Negative, Category::Neutral];

    /// Position of this category in [`Category::ALL`].
    pub fn index(self) -> usize {
        match self {
            Category::Positive => 0,
            Category::Negative => 1,
            Category::Neutral => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Positive => "Positive",
            Category::Negative => "Negative",
            Category::Neutral => "Neutral",
        }
    }

    /// Parse the numeric codes used during manual annotation
    /// (`1`, `-1`, `0`).
    pub fn from_label_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Category::Positive),
            "-1" => Some(Category::Negative),
            "0" => Some(Category::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A label string that is neither a category name nor an annotation code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sentiment label `{0}`")]
pub struct UnknownLabel(pub String);

impl FromStr for Category {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(category) = Category::from_label_code(trimmed) {
            return Ok(category);
        }
        match trimmed.to_lowercase().as_str() {
            "positive" => Ok(Category::Positive),
            "negative" => Ok(Category::Negative),
            "neutral" => Ok(Category::Neutral),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

/// Annotator judgement of whether a paragraph is opinionated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subjectivity {
    Subjective,
    Objective,
}

/// A tokenized paragraph with per-token lexicon polarity.
///
/// `tokens` and `polarity` are index-aligned. A `None` polarity means the
/// lexicon had no entry for the token; it is kept distinct from `Some(0.0)`
/// until the final dot product.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub tokens: Vec<String>,
    pub polarity: Vec<Option<f64>>,
    /// Token indices of party mentions.
    #[serde(default)]
    pub anchors: Vec<usize>,
    /// News outlet the paragraph was taken from.
    #[serde(default)]
    pub media: Option<String>,
    /// Parties mentioned in the paragraph.
    #[serde(default)]
    pub parties: Vec<String>,
}

impl Document {
    /// Create a document from aligned tokens and polarity values.
    ///
    /// # Panics
    /// Panics if the two sequences differ in length.
    pub fn new(tokens: Vec<String>, polarity: Vec<Option<f64>>) -> Self {
        assert_eq!(
            tokens.len(),
            polarity.len(),
            "token and polarity sequences must be index-aligned"
        );
        Self {
            tokens,
            polarity,
            ..Default::default()
        }
    }

    /// Attach party-mention positions.
    ///
    /// # Panics
    /// Panics if an anchor points past the end of the token sequence.
    pub fn with_anchors(mut self, anchors: Vec<usize>) -> Self {
        for &anchor in &anchors {
            assert!(
                anchor < self.tokens.len(),
                "anchor {} out of range for document of {} tokens",
                anchor,
                self.tokens.len()
            );
        }
        self.anchors = anchors;
        self
    }

    pub fn with_media(mut self, media: impl Into<String>) -> Self {
        self.media = Some(media.into());
        self
    }

    pub fn with_parties(mut self, parties: Vec<String>) -> Self {
        self.parties = parties;
        self
    }

    /// Copy of this document with a derived polarity vector.
    pub fn with_polarity(&self, polarity: Vec<Option<f64>>) -> Self {
        assert_eq!(
            self.tokens.len(),
            polarity.len(),
            "token and polarity sequences must be index-aligned"
        );
        Self {
            polarity,
            ..self.clone()
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether any token carries a lexicon polarity.
    pub fn has_polarity(&self) -> bool {
        self.polarity.iter().any(Option::is_some)
    }
}

/// A document with a ground-truth category from a human annotator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledDocument {
    pub document: Document,
    pub label: Category,
    /// Document-level polarity from an alternative analyzer, for comparison.
    #[serde(default)]
    pub baseline_polarity: Option<f64>,
    #[serde(default)]
    pub subjectivity: Option<Subjectivity>,
}

impl LabeledDocument {
    pub fn new(document: Document, label: Category) -> Self {
        Self {
            document,
            label,
            baseline_polarity: None,
            subjectivity: None,
        }
    }

    pub fn with_baseline_polarity(mut self, polarity: f64) -> Self {
        self.baseline_polarity = Some(polarity);
        self
    }

    pub fn with_subjectivity(mut self, subjectivity: Subjectivity) -> Self {
        self.subjectivity = Some(subjectivity);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_names_and_codes() {
        assert_eq!("Positive".parse::<Category>(), Ok(Category::Positive));
        assert_eq!("neutral".parse::<Category>(), Ok(Category::Neutral));
        assert_eq!("-1".parse::<Category>(), Ok(Category::Negative));
        assert_eq!("0".parse::<Category>(), Ok(Category::Neutral));
        assert_eq!(
            "meh".parse::<Category>(),
            Err(UnknownLabel("meh".to_string()))
        );
    }

    #[test]
    fn test_category_index_matches_all() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    #[should_panic(expected = "index-aligned")]
    fn test_document_rejects_length_mismatch() {
        Document::new(vec!["a".into(), "b".into()], vec![Some(0.1)]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_document_rejects_anchor_out_of_range() {
        Document::new(vec!["a".into()], vec![None]).with_anchors(vec![1]);
    }

    #[test]
    fn test_with_polarity_keeps_metadata() {
        let doc = Document::new(vec!["spd".into(), "gut".into()], vec![None, Some(0.3)])
            .with_anchors(vec![0])
            .with_media("TAZ");
        let derived = doc.with_polarity(vec![None, Some(-0.3)]);
        assert_eq!(derived.anchors, vec![0]);
        assert_eq!(derived.media.as_deref(), Some("TAZ"));
        assert_eq!(doc.polarity[1], Some(0.3));
        assert_eq!(derived.polarity[1], Some(-0.3));
    }
}
