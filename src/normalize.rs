//! Token normalization shared by the weight index and the negation matcher.

/// Normalize a token for weight lookup: lowercase, then spell out umlauts and
/// sharp s with their ASCII digraphs (`ä` -> `ae`, `ß` -> `ss`).
///
/// Upper-case umlauts are folded by the lowercasing step, so `"Über"` and
/// `"ueber"` normalize to the same key.
pub fn normalize_token(token: &str) -> String {
    let lowered = token.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len() + 4);
    for c in lowered.chars() {
        match c {
            'ä' => out.push_str("ae"),
            'ö' => out.push_str("oe"),
            'ü' => out.push_str("ue"),
            'ß' => out.push_str("ss"),
            _ => out.push(c),
        }
    }
    out
}

/// Replace umlauts with the letter+e convention while keeping case.
///
/// Used for display text; weighting always goes through [`normalize_token`].
pub fn remove_umlauts(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            'ü' => out.push_str("ue"),
            'Ü' => out.push_str("Ue"),
            'ä' => out.push_str("ae"),
            'Ä' => out.push_str("Ae"),
            'ö' => out.push_str("oe"),
            'Ö' => out.push_str("Oe"),
            'ß' => out.push_str("ss"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_token_folds_case_and_umlauts() {
        assert_eq!(normalize_token("Grüne"), "gruene");
        assert_eq!(normalize_token("ÜBER"), "ueber");
        assert_eq!(normalize_token("Straße"), "strasse");
        assert_eq!(normalize_token("tag"), "tag");
    }

    #[test]
    fn test_normalize_token_is_idempotent() {
        let once = normalize_token("Öffentlichkeit");
        assert_eq!(normalize_token(&once), once);
    }

    #[test]
    fn test_remove_umlauts_keeps_case() {
        let text = "Heiße Suppe schmeckt mir überaus gut und könnte ich ruhig öfter genießen. \
                    Hätte ich mir doch mehr gemacht.";
        assert_eq!(
            remove_umlauts(text),
            "Heisse Suppe schmeckt mir ueberaus gut und koennte ich ruhig oefter \
             geniessen. Haette ich mir doch mehr gemacht."
        );
    }
}
