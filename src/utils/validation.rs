/// Slot input validation helpers
use crate::utils::error::{Result, SkillError};

/// Parse and validate a day slot value
pub fn parse_day(raw: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|d| (1..=31).contains(d))
        .ok_or_else(|| {
            SkillError::invalid_input(format!("day must be a number between 1 and 31, got '{}'", raw))
        })
}

/// Parse and validate a resolved month id (slot resolution normalizes months
/// to 1-12 before they reach the skill)
pub fn parse_month(raw: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| {
            SkillError::invalid_input(format!(
                "month must be a number between 1 and 12, got '{}'",
                raw
            ))
        })
}

/// Parse and validate a four-digit year slot value
pub fn parse_year(raw: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|y| (1000..=9999).contains(y))
        .ok_or_else(|| {
            SkillError::invalid_input(format!("year must be a four-digit number, got '{}'", raw))
        })
}

/// Check if a string is empty after trimming
pub fn is_empty_or_whitespace(text: &str) -> bool {
    text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("15").unwrap(), 15);
        assert_eq!(parse_day(" 1 ").unwrap(), 1);
        assert!(parse_day("0").is_err());
        assert!(parse_day("32").is_err());
        assert!(parse_day("fifteen").is_err());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("3").unwrap(), 3);
        assert_eq!(parse_month("12").unwrap(), 12);
        assert!(parse_month("0").is_err());
        assert!(parse_month("13").is_err());
        assert!(parse_month("March").is_err());
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("1990").unwrap(), 1990);
        assert!(parse_year("90").is_err());
        assert!(parse_year("10000").is_err());
        assert!(parse_year("").is_err());
    }

    #[test]
    fn test_is_empty_or_whitespace() {
        assert!(is_empty_or_whitespace(""));
        assert!(is_empty_or_whitespace("   "));
        assert!(!is_empty_or_whitespace("hi"));
    }
}
