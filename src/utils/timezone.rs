use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use crate::utils::error::{Result, SkillError};

/// Parse an IANA timezone identifier
pub fn parse_timezone(tz_str: &str) -> Result<Tz> {
    tz_str.parse().map_err(|_| {
        SkillError::invalid_input(format!("invalid timezone identifier '{}'", tz_str))
    })
}

/// Resolve a local wall-clock datetime in a timezone.
///
/// Handles DST ambiguity: during a fall-back transition the earliest instant
/// is used; a time that falls in a spring-forward gap does not exist and is
/// an error.
pub fn resolve_local(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(dt, _) => Ok(dt),
        LocalResult::None => Err(SkillError::invalid_input(format!(
            "local time {} does not exist in {} (DST transition)",
            naive, tz
        ))),
    }
}
