//! Utility functions for fusis

use std::time::Duration;

/// Longest accepted resource name
pub const MAX_NAME_LEN: usize = 64;

/// Parse duration string (e.g., "500ms", "30s", "5m", "1h")
pub fn parse_duration(s: &str) -> crate::Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(crate::Error::Validation("empty duration".into()));
    }

    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| crate::Error::Validation(format!("missing duration unit: {}", s)))?;
    let (num_str, unit) = s.split_at(split);

    let num: u64 = num_str
        .parse()
        .map_err(|_| crate::Error::Validation(format!("invalid duration: {}", s)))?;

    let secs = |scale: u64| {
        num.checked_mul(scale)
            .map(Duration::from_secs)
            .ok_or_else(|| crate::Error::Validation(format!("duration out of range: {}", s)))
    };

    match unit {
        "ms" => Ok(Duration::from_millis(num)),
        "s" => Ok(Duration::from_secs(num)),
        "m" => secs(60),
        "h" => secs(3600),
        _ => Err(crate::Error::Validation(format!(
            "unknown duration unit: {}",
            unit
        ))),
    }
}

/// Format a duration in the largest unit that represents it exactly
pub fn format_duration(d: Duration) -> String {
    let millis = d.as_millis();
    if millis % 1000 != 0 || millis == 0 {
        return format!("{}ms", millis);
    }
    let secs = d.as_secs();
    if secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

/// Validate a resource name introduced through a create request
pub fn validate_name(field: &str, name: &str) -> crate::Result<()> {
    if name.is_empty() {
        return Err(crate::Error::Validation(format!("{} is required", field)));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(crate::Error::Validation(format!(
            "{} too long (max {} characters)",
            field, MAX_NAME_LEN
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(crate::Error::Validation(format!(
            "{} may only contain letters, digits, '.', '_' and '-'",
            field
        )));
    }

    Ok(())
}

/// Serde adapter storing a `Duration` as a string like `"10s"`
pub mod duration_str {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_duration(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_duration(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("10x").is_err());
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("1é").is_err());
    }

    #[test]
    fn test_parse_duration_out_of_range() {
        let err = parse_duration("6000000000000000000h").unwrap_err();
        assert!(matches!(err, crate::Error::Validation(_)));
        assert!(err.to_string().contains("out of range"));
        assert!(parse_duration("307445734561825861m").is_err());
        // Too many digits for u64 at all
        assert!(parse_duration("99999999999999999999s").is_err());
        assert_eq!(
            parse_duration("18446744073709551615s").unwrap(),
            Duration::from_secs(u64::MAX)
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1500ms");
        assert_eq!(format_duration(Duration::from_secs(10)), "10s");
        assert_eq!(format_duration(Duration::from_secs(120)), "2m");
        assert_eq!(format_duration(Duration::from_secs(7200)), "2h");
        assert_eq!(format_duration(Duration::ZERO), "0ms");
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "web").is_ok());
        assert!(validate_name("name", "app-1.prod_a").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "has space").is_err());
        assert!(validate_name("name", "a/b").is_err());
        assert!(validate_name("name", &"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }
}
