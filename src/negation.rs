//! Negation-window polarity adjustment.
//!
//! A polarity-bearing token whose surrounding window contains a negation cue
//! has its sign inverted: "nicht gut" scores like "schlecht".
//!
//! The window around index `i` is the half-open token range
//! `[max(0, i - window), min(len, i + window))`. It is clamped at the document
//! edges and never re-centered, so it reaches one token further to the left
//! than to the right.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::normalize::normalize_token;

/// Default negation window in tokens.
pub const DEFAULT_NEGATION_WINDOW: usize = 4;

static GERMAN_CUES: Lazy<NegationCues> = Lazy::new(|| {
    NegationCues::new([
        "nicht", "nie", "niemals", "kein", "keine", "keinen", "keinem", "keiner", "keines",
        "weder", "ohne", "nichts", "niemand",
    ])
});

/// A fixed vocabulary of negation cues.
///
/// Cues are normalized like tokens and may span several words
/// (`"auf keinen fall"`); a multi-word cue only matches as a contiguous
/// token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NegationCues {
    cues: Vec<String>,
}

impl NegationCues {
    pub fn new<I, S>(cues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = cues
            .into_iter()
            .map(|cue| {
                cue.as_ref()
                    .unicode_words()
                    .map(normalize_token)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|cue| !cue.is_empty())
            .collect();
        normalized.sort();
        normalized.dedup();
        Self { cues: normalized }
    }

    /// The German cue vocabulary used for news paragraphs.
    pub fn german() -> Self {
        GERMAN_CUES.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.cues.iter().map(String::as_str)
    }

    /// Whether the space-joined, normalized window text contains a cue as a
    /// whole word sequence.
    fn found_in(&self, window_text: &str) -> bool {
        let padded = format!(" {} ", window_text);
        self.cues
            .iter()
            .any(|cue| padded.contains(&format!(" {} ", cue)))
    }
}

/// Invert the sign of a polarity value; zero stays zero.
pub fn invert_polarity(value: f64) -> f64 {
    if value < 0.0 {
        value.abs()
    } else if value > 0.0 {
        -value
    } else {
        value
    }
}

/// Invert every present polarity value that has a negation cue within
/// `window` tokens. Absent values stay absent.
///
/// # Panics
/// Panics if `tokens` and `polarity` differ in length.
pub fn adjust_negation<S: AsRef<str>>(
    tokens: &[S],
    polarity: &[Option<f64>],
    cues: &NegationCues,
    window: usize,
) -> Vec<Option<f64>> {
    assert_eq!(
        tokens.len(),
        polarity.len(),
        "token and polarity sequences must be index-aligned"
    );

    if cues.is_empty() || polarity.iter().all(Option::is_none) {
        return polarity.to_vec();
    }

    let normalized: Vec<String> = tokens.iter().map(|t| normalize_token(t.as_ref())).collect();
    let len = normalized.len();

    polarity
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let value = (*value)?;
            let lo = i.saturating_sub(window);
            let hi = i.saturating_add(window).min(len);
            let window_text = normalized[lo..hi].join(" ");
            if cues.found_in(&window_text) {
                Some(invert_polarity(value))
            } else {
                Some(value)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_cue_inside_window_inverts() {
        let toks = tokens(&["das", "ist", "nicht", "gut", "so"]);
        let polarity = vec![Some(0.0), Some(0.0), Some(0.0), Some(0.5), Some(0.0)];
        let adjusted = adjust_negation(&toks, &polarity, &NegationCues::german(), 4);
        assert_eq!(adjusted, vec![Some(0.0), Some(0.0), Some(0.0), Some(-0.5), Some(0.0)]);
    }

    #[test]
    fn test_without_cue_is_unchanged() {
        let toks = tokens(&["das", "ist", "ein", "gut", "so"]);
        let polarity = vec![Some(0.0), Some(0.0), Some(0.0), Some(0.5), Some(0.0)];
        let adjusted = adjust_negation(&toks, &polarity, &NegationCues::german(), 4);
        assert_eq!(adjusted, polarity);
    }

    #[test]
    fn test_negative_value_becomes_positive() {
        let toks = tokens(&["kein", "schlechter", "plan"]);
        let polarity = vec![None, Some(-0.3), None];
        let adjusted = adjust_negation(&toks, &polarity, &NegationCues::german(), 4);
        assert_eq!(adjusted, vec![None, Some(0.3), None]);
    }

    #[test]
    fn test_cue_outside_window_does_not_flip() {
        let toks = tokens(&["nicht", "a", "b", "c", "d", "e", "gut"]);
        let mut polarity = vec![None; 7];
        polarity[6] = Some(0.5);
        let adjusted = adjust_negation(&toks, &polarity, &NegationCues::german(), 4);
        assert_eq!(adjusted[6], Some(0.5));

        // Distance 4 to the left is still inside [i - 4, i + 4).
        let toks = tokens(&["a", "b", "nicht", "c", "d", "e", "gut"]);
        let adjusted = adjust_negation(&toks, &polarity, &NegationCues::german(), 4);
        assert_eq!(adjusted[6], Some(-0.5));
    }

    #[test]
    fn test_window_excludes_right_edge() {
        let mut polarity = vec![None; 5];
        polarity[0] = Some(0.5);

        let toks = tokens(&["gut", "a", "b", "c", "nicht"]);
        let adjusted = adjust_negation(&toks, &polarity, &NegationCues::german(), 4);
        assert_eq!(adjusted[0], Some(0.5));

        let toks = tokens(&["gut", "a", "b", "nicht", "c"]);
        let adjusted = adjust_negation(&toks, &polarity, &NegationCues::german(), 4);
        assert_eq!(adjusted[0], Some(-0.5));
    }

    #[test]
    fn test_unbounded_window_covers_whole_document() {
        let toks = tokens(&["nicht", "gut"]);
        let polarity = vec![None, Some(0.5)];
        let adjusted = adjust_negation(&toks, &polarity, &NegationCues::german(), usize::MAX);
        assert_eq!(adjusted, vec![None, Some(-0.5)]);

        let toks = tokens(&["gut", "a", "b", "nicht"]);
        let polarity = vec![Some(0.5), None, None, None];
        let adjusted = adjust_negation(&toks, &polarity, &NegationCues::german(), usize::MAX);
        assert_eq!(adjusted[0], Some(-0.5));
    }

    #[test]
    fn test_absent_values_stay_absent() {
        let toks = tokens(&["nicht", "bundestag"]);
        let polarity = vec![None, None];
        let adjusted = adjust_negation(&toks, &polarity, &NegationCues::german(), 4);
        assert_eq!(adjusted, vec![None, None]);
    }

    #[test]
    fn test_zero_stays_zero() {
        assert_eq!(invert_polarity(0.0), 0.0);
        assert!(invert_polarity(0.0).is_sign_positive());
        assert_eq!(invert_polarity(0.25), -0.25);
        assert_eq!(invert_polarity(-0.25), 0.25);
    }

    #[test]
    fn test_cue_must_match_whole_word() {
        let toks = tokens(&["nichtig", "gut"]);
        let polarity = vec![None, Some(0.4)];
        let adjusted = adjust_negation(&toks, &polarity, &NegationCues::german(), 4);
        assert_eq!(adjusted[1], Some(0.4));
    }

    #[test]
    fn test_synthetic_multi_word_cue() {
        let cues = NegationCues::new(["auf keinen Fall"]);
        assert_eq!(cues.iter().collect::<Vec<_>>(), vec!["auf keinen fall"]);

        let toks = tokens(&["auf", "keinen", "fall", "gut"]);
        let polarity = vec![None, None, None, Some(0.2)];
        assert_eq!(adjust_negation(&toks, &polarity, &cues, 4)[3], Some(-0.2));

        let toks = tokens(&["keinen", "fall", "gut"]);
        let polarity = vec![None, None, Some(0.2)];
        assert_eq!(adjust_negation(&toks, &polarity, &cues, 4)[2], Some(0.2));
    }

    #[test]
    fn test_cues_are_normalized() {
        let cues = NegationCues::new(["Überhaupt nicht", "NIE", ""]);
        assert_eq!(
            cues.iter().collect::<Vec<_>>(),
            vec!["nie", "ueberhaupt nicht"]
        );
    }
}
