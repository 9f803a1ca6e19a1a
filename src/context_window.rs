//! Party-contextual polarity.
//!
//! Restricts a paragraph's polarity to the tokens near a party mention. Values
//! outside every anchor's window become a concrete `Some(0.0)` so they still
//! take part in the dot product, unlike absent values.

/// Polarity at `index` after context filtering.
///
/// Returns `value` unchanged (absent included) when some anchor lies within
/// `window` tokens of `index`, and `Some(0.0)` otherwise.
pub fn context_polarity(
    index: usize,
    value: Option<f64>,
    anchors: &[usize],
    window: usize,
) -> Option<f64> {
    if anchors.iter().any(|&anchor| anchor.abs_diff(index) <= window) {
        value
    } else {
        Some(0.0)
    }
}

/// Zero out every polarity value farther than `window` tokens from all anchors.
///
/// # Panics
/// Panics if `tokens` and `polarity` differ in length or an anchor is out of
/// range.
pub fn filter_context<S: AsRef<str>>(
    tokens: &[S],
    polarity: &[Option<f64>],
    anchors: &[usize],
    window: usize,
) -> Vec<Option<f64>> {
    assert_eq!(
        tokens.len(),
        polarity.len(),
        "token and polarity sequences must be index-aligned"
    );
    for &anchor in anchors {
        assert!(
            anchor < tokens.len(),
            "anchor {} out of range for document of {} tokens",
            anchor,
            tokens.len()
        );
    }

    polarity
        .iter()
        .enumerate()
        .map(|(i, &value)| context_polarity(i, value, anchors, window))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_values() -> Vec<Option<f64>> {
        (1..=10).map(|v| Some(v as f64)).collect()
    }

    #[test]
    fn test_context_polarity_by_distance() {
        let polarity = ten_values();
        let anchors = [2];

        assert_eq!(context_polarity(1, polarity[1], &anchors, 3), Some(2.0));
        assert_eq!(context_polarity(9, polarity[9], &anchors, 3), Some(0.0));

        assert_eq!(context_polarity(1, polarity[1], &anchors, 5), Some(2.0));
        assert_eq!(context_polarity(9, polarity[9], &anchors, 5), Some(0.0));

        assert_eq!(context_polarity(9, polarity[9], &anchors, 7), Some(10.0));
    }

    #[test]
    fn test_window_zero_keeps_only_anchor_positions() {
        let tokens = vec!["t"; 10];
        let filtered = filter_context(&tokens, &ten_values(), &[2, 6], 0);
        let kept: Vec<usize> = filtered
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != Some(0.0))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(kept, vec![2, 6]);
        assert_eq!(filtered[2], Some(3.0));
        assert_eq!(filtered[6], Some(7.0));
    }

    #[test]
    fn test_no_anchors_zeroes_everything() {
        let tokens = vec!["t"; 3];
        let filtered = filter_context(&tokens, &[Some(0.5), None, Some(-0.2)], &[], 10);
        assert_eq!(filtered, vec![Some(0.0), Some(0.0), Some(0.0)]);
    }

    #[test]
    fn test_absent_inside_window_stays_absent() {
        let tokens = vec!["spd", "bundestag", "gut", "x"];
        let filtered = filter_context(&tokens, &[None, None, Some(0.4), None], &[0], 2);
        assert_eq!(filtered, vec![None, None, Some(0.4), Some(0.0)]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_anchor_out_of_range_panics() {
        let tokens = vec!["t"; 3];
        filter_context(&tokens, &[None, None, None], &[3], 1);
    }
}
