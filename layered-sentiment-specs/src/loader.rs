//! Dataset loading.
//!
//! Datasets are JSON arrays of paragraph records:
//!
//! ```json
//! [
//!   {
//!     "tokens": ["die", "spd", "ist", "gut"],
//!     "polarity": [null, null, null, 0.7],
//!     "anchors": [1],
//!     "label": "1",
//!     "media": "TAZ",
//!     "parties": ["SPD"],
//!     "baseline_polarity": 0.35,
//!     "subjectivity": "Subjective"
//!   }
//! ]
//! ```
//!
//! `label` accepts category names or the annotation codes `1`, `-1` and `0`.
//! Unlabeled corpus files use the same record shape without `label`.

use std::fs;
use std::path::Path;

use layered_sentiment::{Category, Document, LabeledDocument, Subjectivity};
use serde::Deserialize;
use tracing::debug;

use crate::errors::{SpecError, SpecResult};

#[derive(Debug, Deserialize)]
struct DatasetRecord {
    #[serde(alias = "text")]
    tokens: Vec<String>,
    polarity: Vec<Option<f64>>,
    #[serde(default)]
    anchors: Vec<usize>,
    #[serde(default, alias = "labeled_sentiment")]
    label: Option<LabelValue>,
    #[serde(default)]
    media: Option<String>,
    #[serde(default)]
    parties: Vec<String>,
    #[serde(default, alias = "polarity_textblob")]
    baseline_polarity: Option<f64>,
    #[serde(default, alias = "labeled_subjectivity")]
    subjectivity: Option<Subjectivity>,
}

/// Labels appear both as strings and as bare integers in annotated exports.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LabelValue {
    Code(i64),
    Text(String),
}

impl LabelValue {
    fn category(&self) -> Result<Category, String> {
        let text = match self {
            LabelValue::Code(code) => code.to_string(),
            LabelValue::Text(text) => text.clone(),
        };
        text.parse::<Category>().map_err(|e| e.to_string())
    }
}

impl DatasetRecord {
    fn document(&self, origin: &str, position: usize) -> SpecResult<Document> {
        let malformed = |message: String| SpecError::Parse {
            path: origin.to_string(),
            message: format!("record {}: {}", position, message),
        };

        if self.tokens.len() != self.polarity.len() {
            return Err(malformed(format!(
                "{} tokens but {} polarity values",
                self.tokens.len(),
                self.polarity.len()
            )));
        }
        if let Some(&anchor) = self.anchors.iter().find(|&&a| a >= self.tokens.len()) {
            return Err(malformed(format!(
                "anchor {} out of range for {} tokens",
                anchor,
                self.tokens.len()
            )));
        }

        let mut document = Document::new(self.tokens.clone(), self.polarity.clone())
            .with_anchors(self.anchors.clone())
            .with_parties(self.parties.clone());
        if let Some(media) = &self.media {
            document = document.with_media(media.clone());
        }
        Ok(document)
    }

    fn labeled(&self, origin: &str, position: usize) -> SpecResult<LabeledDocument> {
        let document = self.document(origin, position)?;
        let label = match &self.label {
            Some(value) => value.category(),
            None => Err("missing label".to_string()),
        }
        .map_err(|message| SpecError::Parse {
            path: origin.to_string(),
            message: format!("record {}: {}", position, message),
        })?;

        let mut labeled = LabeledDocument::new(document, label);
        if let Some(polarity) = self.baseline_polarity {
            labeled = labeled.with_baseline_polarity(polarity);
        }
        if let Some(subjectivity) = self.subjectivity {
            labeled = labeled.with_subjectivity(subjectivity);
        }
        Ok(labeled)
    }
}

fn parse_records(content: &str, origin: &str) -> SpecResult<Vec<DatasetRecord>> {
    serde_json::from_str(content).map_err(|e| SpecError::Parse {
        path: origin.to_string(),
        message: e.to_string(),
    })
}

fn read(path: &Path) -> SpecResult<String> {
    fs::read_to_string(path).map_err(|e| SpecError::Load {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Parse a labeled dataset from JSON text.
pub fn parse_dataset(content: &str, origin: &str) -> SpecResult<Vec<LabeledDocument>> {
    parse_records(content, origin)?
        .into_iter()
        .enumerate()
        .map(|(i, record)| record.labeled(origin, i))
        .collect()
}

/// Parse an unlabeled corpus from JSON text. Labels, if present, are ignored.
pub fn parse_corpus(content: &str, origin: &str) -> SpecResult<Vec<Document>> {
    parse_records(content, origin)?
        .into_iter()
        .enumerate()
        .map(|(i, record)| record.document(origin, i))
        .collect()
}

/// Load a single labeled dataset file.
pub fn load_dataset(path: &Path) -> SpecResult<Vec<LabeledDocument>> {
    let content = read(path)?;
    let dataset = parse_dataset(&content, &path.display().to_string())?;
    debug!(path = %path.display(), records = dataset.len(), "loaded dataset");
    Ok(dataset)
}

/// Load a single unlabeled corpus file.
pub fn load_corpus(path: &Path) -> SpecResult<Vec<Document>> {
    let content = read(path)?;
    let corpus = parse_corpus(&content, &path.display().to_string())?;
    debug!(path = %path.display(), records = corpus.len(), "loaded corpus");
    Ok(corpus)
}

/// Load all labeled datasets from a directory (glob: **/*.json), sorted by
/// relative path.
pub fn load_all_datasets(dir: &Path) -> SpecResult<Vec<(String, Vec<LabeledDocument>)>> {
    let mut datasets = Vec::new();
    load_datasets_recursive(dir, dir, &mut datasets)?;
    datasets.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(datasets)
}

fn load_datasets_recursive(
    base: &Path,
    dir: &Path,
    datasets: &mut Vec<(String, Vec<LabeledDocument>)>,
) -> SpecResult<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(dir).map_err(|e| SpecError::Load {
        path: dir.display().to_string(),
        message: e.to_string(),
    })? {
        let entry = entry.map_err(|e| SpecError::Load {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        let path = entry.path();

        if path.is_dir() {
            load_datasets_recursive(base, &path, datasets)?;
        } else if path.extension().map_or(false, |e| e == "json") {
            let relative = path.strip_prefix(base).unwrap_or(&path);
            let dataset = load_dataset(&path)?;
            datasets.push((relative.display().to_string(), dataset));
        }
    }

    Ok(())
}
