//! Annotation value parsing
//!
//! Parsers return `None` on anything they do not understand; callers pick
//! the fallback and record a note.

const KI: u64 = 1024;
const MI: u64 = KI * 1024;
const GI: u64 = MI * 1024;

/// Whole seconds, with or without a trailing `s`
#[must_use]
pub fn parse_seconds(value: &str) -> Option<u64> {
    let value = value.trim();
    value.strip_suffix('s').unwrap_or(value).parse().ok()
}

/// Non-negative integer count
#[must_use]
pub fn parse_count(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

/// Canary weight, clamped to 100
///
/// Returns the weight and whether clamping happened.
#[must_use]
pub fn parse_weight(value: &str) -> Option<(u32, bool)> {
    let raw = parse_count(value)?;
    Some((raw.min(100), raw > 100))
}

/// NGINX size syntax: bytes with an optional `k`, `m` or `g` suffix
#[must_use]
pub fn parse_size(value: &str) -> Option<u64> {
    let value = value.trim();
    let (digits, unit) = match value.char_indices().last()? {
        (i, c) if c.is_ascii_alphabetic() => (&value[..i], c.to_ascii_lowercase()),
        _ => (value, 'b'),
    };
    let base: u64 = digits.parse().ok()?;
    let scale = match unit {
        'b' => 1,
        'k' => KI,
        'm' => MI,
        'g' => GI,
        _ => return None,
    };
    base.checked_mul(scale)
}

/// Render a byte count as a Kubernetes quantity
#[must_use]
pub fn quantity(bytes: u64) -> String {
    match bytes {
        0 => "0".to_string(),
        b if b % GI == 0 => format!("{}Gi", b / GI),
        b if b % MI == 0 => format!("{}Mi", b / MI),
        b if b % KI == 0 => format!("{}Ki", b / KI),
        b => b.to_string(),
    }
}

/// Comma separated list, trimmed, empties dropped
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether a path uses characters only valid in a regular expression match
#[must_use]
pub fn has_regex_chars(path: &str) -> bool {
    path.contains(['(', ')', '|', '[', ']', '{', '}'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn seconds() {
        assert_eq!(parse_seconds("60"), Some(60));
        assert_eq!(parse_seconds(" 5s "), Some(5));
        assert_eq!(parse_seconds("1m"), None);
        assert_eq!(parse_seconds(""), None);
    }

    #[test]
    fn weights_clamp() {
        assert_eq!(parse_weight("20"), Some((20, false)));
        assert_eq!(parse_weight("250"), Some((100, true)));
        assert_eq!(parse_weight("-1"), None);
        assert_eq!(parse_weight("ten"), None);
    }

    #[test]
    fn sizes() {
        assert_eq!(parse_size("512"), Some(512));
        assert_eq!(parse_size("8k"), Some(8 * 1024));
        assert_eq!(parse_size("10M"), Some(10 * 1024 * 1024));
        assert_eq!(parse_size("1g"), Some(1024 * 1024 * 1024));
        assert_eq!(parse_size("0"), Some(0));
        assert_eq!(parse_size("10x"), None);
        assert_eq!(parse_size("m"), None);
        assert_eq!(parse_size(""), None);
    }

    #[test]
    fn quantities() {
        assert_eq!(quantity(0), "0");
        assert_eq!(quantity(512), "512");
        assert_eq!(quantity(8 * 1024), "8Ki");
        assert_eq!(quantity(10 * 1024 * 1024), "10Mi");
        assert_eq!(quantity(2 * 1024 * 1024 * 1024), "2Gi");
    }

    #[test]
    fn lists() {
        assert_eq!(split_list("10.0.0.0/8, 192.168.0.0/16,,"), ["10.0.0.0/8", "192.168.0.0/16"]);
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn regex_chars() {
        assert!(has_regex_chars("/api/(v1|v2)"));
        assert!(has_regex_chars("/files/[0-9]+"));
        assert!(!has_regex_chars("/api/v1"));
        assert!(!has_regex_chars("/api/.*"));
    }

    proptest! {
        #[test]
        fn prop_size_units_scale(n in 0u64..4096, unit in prop_oneof![Just('k'), Just('m'), Just('g')]) {
            let bytes = parse_size(&format!("{n}{unit}")).unwrap();
            let upper = parse_size(&format!("{n}{}", unit.to_ascii_uppercase())).unwrap();
            prop_assert_eq!(bytes, upper);
            prop_assert_eq!(parse_size(&quantity(bytes).replace("Gi", "g").replace("Mi", "m").replace("Ki", "k")), Some(bytes));
        }
    }
}
