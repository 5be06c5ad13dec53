/// Building the yearly birthday reminder payload
use chrono::{DateTime, Days, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::REMINDER_LOCAL_HOUR;
use crate::utils::error::{Result, SkillError};
use crate::utils::timezone::resolve_local;
use crate::utils::validation::is_empty_or_whitespace;

/// A structured reminder, handed to the reminder service and not retained
/// beyond producing an alert token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSpec {
    pub request_time: String,
    pub trigger: Trigger,
    pub alert_info: AlertInfo,
    pub push_notification: PushNotification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    #[serde(rename = "type")]
    pub trigger_type: String,
    /// ISO-8601 local wall-clock time, no offset; `time_zone_id` carries the zone
    pub scheduled_time: String,
    pub time_zone_id: String,
    pub recurrence: Recurrence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recurrence {
    pub freq: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertInfo {
    pub spoken_info: SpokenInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpokenInfo {
    pub content: Vec<SpokenContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpokenContent {
    pub locale: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushNotification {
    pub status: String,
}

/// Build a reminder that fires at 09:00 local on the next birthday and
/// repeats yearly.
///
/// The locale only tags the spoken message; it takes no part in the trigger
/// computation.
pub fn build_reminder(
    days_until: i64,
    tz: Tz,
    locale: &str,
    message: &str,
    now: DateTime<Utc>,
) -> Result<ReminderSpec> {
    if days_until < 0 {
        return Err(SkillError::invalid_input(format!(
            "days until birthday must not be negative, got {}",
            days_until
        )));
    }
    if is_empty_or_whitespace(message) {
        return Err(SkillError::invalid_input("reminder message is empty"));
    }
    let message = message.trim();

    let local_now = now.with_timezone(&tz);
    let trigger_day = local_now
        .date_naive()
        .checked_add_days(Days::new(days_until as u64))
        .ok_or_else(|| {
            SkillError::invalid_input(format!("trigger date overflows ({} days)", days_until))
        })?;
    let wall_clock = trigger_day
        .and_hms_opt(REMINDER_LOCAL_HOUR, 0, 0)
        .ok_or_else(|| SkillError::invalid_input("invalid trigger hour"))?;
    let trigger = resolve_local(wall_clock, tz)?;

    Ok(ReminderSpec {
        request_time: local_now.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
        trigger: Trigger {
            trigger_type: "SCHEDULED_ABSOLUTE".to_string(),
            scheduled_time: trigger.format("%Y-%m-%dT%H:%M:%S").to_string(),
            time_zone_id: tz.name().to_string(),
            recurrence: Recurrence {
                freq: "YEARLY".to_string(),
            },
        },
        alert_info: AlertInfo {
            spoken_info: SpokenInfo {
                content: vec![SpokenContent {
                    locale: locale.to_string(),
                    text: message.to_string(),
                }],
            },
        },
        push_notification: PushNotification {
            status: "ENABLED".to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Tz;

    fn madrid() -> Tz {
        "Europe/Madrid".parse().unwrap()
    }

    #[test]
    fn test_rejects_negative_day_count() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let result = build_reminder(-1, madrid(), "en-US", "hi", now);
        assert!(matches!(result, Err(SkillError::InvalidInput { .. })));
    }

    #[test]
    fn test_rejects_empty_message() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let result = build_reminder(0, madrid(), "en-US", "", now);
        assert!(matches!(result, Err(SkillError::InvalidInput { .. })));

        let result = build_reminder(0, madrid(), "en-US", "   ", now);
        assert!(matches!(result, Err(SkillError::InvalidInput { .. })));
    }

    #[test]
    fn test_trigger_is_local_morning_with_yearly_recurrence() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let spec = build_reminder(14, madrid(), "es-ES", "feliz cumpleaños", now).unwrap();

        assert_eq!(spec.trigger.scheduled_time, "2024-03-15T09:00:00");
        assert_eq!(spec.trigger.time_zone_id, "Europe/Madrid");
        assert_eq!(spec.trigger.trigger_type, "SCHEDULED_ABSOLUTE");
        assert_eq!(spec.trigger.recurrence.freq, "YEARLY");
        assert_eq!(spec.alert_info.spoken_info.content[0].locale, "es-ES");
        assert_eq!(
            spec.alert_info.spoken_info.content[0].text,
            "feliz cumpleaños"
        );
    }

    #[test]
    fn test_zero_days_triggers_today() {
        // 23:30 UTC on Mar 14 is already Mar 15 in Madrid
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 23, 30, 0).unwrap();
        let spec = build_reminder(0, madrid(), "en-US", "happy birthday", now).unwrap();
        assert_eq!(spec.trigger.scheduled_time, "2024-03-15T09:00:00");
    }

    #[test]
    fn test_serializes_with_camel_case_wire_names() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let spec = build_reminder(1, madrid(), "en-US", "hi", now).unwrap();
        let json = serde_json::to_value(&spec).unwrap();

        assert!(json.get("requestTime").is_some());
        assert_eq!(json["trigger"]["type"], "SCHEDULED_ABSOLUTE");
        assert!(json["trigger"].get("scheduledTime").is_some());
        assert!(json["trigger"].get("timeZoneId").is_some());
        assert_eq!(json["pushNotification"]["status"], "ENABLED");
    }
}
