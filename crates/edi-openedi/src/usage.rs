//! Usage token normalization

use edi_spec::Usage;

/// Map an OpenEDI `Req` token onto a canonical usage.
///
/// Matching is case-insensitive. `X` (not used) is treated as conditional,
/// and anything unrecognized or absent becomes optional.
#[must_use]
pub fn normalize_usage(token: Option<&str>) -> Usage {
    match token.map(str::to_ascii_uppercase).as_deref() {
        Some("M") => Usage::Mandatory,
        Some("C" | "X") => Usage::Conditional,
        _ => Usage::Optional,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_usage_table() {
        let cases = [
            (Some("m"), Usage::Mandatory),
            (Some("M"), Usage::Mandatory),
            (Some("o"), Usage::Optional),
            (Some("O"), Usage::Optional),
            (Some("c"), Usage::Conditional),
            (Some("C"), Usage::Conditional),
            (Some("x"), Usage::Conditional),
            (Some("X"), Usage::Conditional),
            (None, Usage::Optional),
            (Some(""), Usage::Optional),
            (Some("z"), Usage::Optional),
        ];
        for (token, expected) in cases {
            assert_eq!(normalize_usage(token), expected, "token {token:?}");
        }
    }

    #[test]
    fn test_multi_character_tokens_default() {
        assert_eq!(normalize_usage(Some("Mandatory")), Usage::Optional);
        assert_eq!(normalize_usage(Some(" M")), Usage::Optional);
    }
}
