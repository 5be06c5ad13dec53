/// End-to-end dispatch tests: envelopes in, speech and session attributes
/// out, with in-memory fakes standing in for the external collaborators.
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use birthday_skill::services::{
    BirthdayDatasetService, ProfileService, ReminderService, ServiceError, ServiceResult,
    Services, TimezoneService,
};
use birthday_skill::utils::reminder::ReminderSpec;
use birthday_skill::{RequestEnvelope, Skill};

fn status_error(status: u16) -> ServiceError {
    match status {
        401 => ServiceError::Unauthorized,
        403 => ServiceError::Forbidden,
        404 => ServiceError::NotFound,
        other => ServiceError::Status(other),
    }
}

struct FakeProfile {
    name: Option<&'static str>,
    fail_status: Option<u16>,
}

#[async_trait]
impl ProfileService for FakeProfile {
    async fn given_name(&self) -> ServiceResult<Option<String>> {
        match self.fail_status {
            Some(status) => Err(status_error(status)),
            None => Ok(self.name.map(str::to_owned)),
        }
    }
}

struct FakeTimezone {
    tz: Option<&'static str>,
}

#[async_trait]
impl TimezoneService for FakeTimezone {
    async fn device_timezone(&self, _device_id: &str) -> ServiceResult<String> {
        self.tz
            .map(str::to_owned)
            .ok_or(ServiceError::Status(503))
    }
}

#[derive(Default)]
struct FakeReminders {
    created: Mutex<Vec<ReminderSpec>>,
    deleted: Mutex<Vec<String>>,
    fail_status: Option<u16>,
}

#[async_trait]
impl ReminderService for FakeReminders {
    async fn create_reminder(&self, spec: &ReminderSpec) -> ServiceResult<String> {
        if let Some(status) = self.fail_status {
            return Err(status_error(status));
        }
        self.created.lock().unwrap().push(spec.clone());
        Ok("token-1".to_string())
    }

    async fn delete_reminder(&self, alert_token: &str) -> ServiceResult<()> {
        self.deleted.lock().unwrap().push(alert_token.to_string());
        Ok(())
    }

    async fn list_reminders(&self) -> ServiceResult<Vec<String>> {
        Ok(Vec::new())
    }
}

struct FakeDataset {
    names: Vec<&'static str>,
    fail: bool,
}

#[async_trait]
impl BirthdayDatasetService for FakeDataset {
    async fn notable_people(
        &self,
        _day: u32,
        _month: u32,
        limit: u32,
    ) -> ServiceResult<Vec<String>> {
        if self.fail {
            return Err(ServiceError::Status(500));
        }
        Ok(self
            .names
            .iter()
            .take(limit as usize)
            .map(|n| n.to_string())
            .collect())
    }
}

struct Harness {
    skill: Skill,
    reminders: Arc<FakeReminders>,
}

struct HarnessConfig {
    profile_name: Option<&'static str>,
    profile_fail: Option<u16>,
    timezone: Option<&'static str>,
    dataset_names: Vec<&'static str>,
    dataset_fail: bool,
    reminder_fail: Option<u16>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            profile_name: Some("Jose"),
            profile_fail: None,
            timezone: Some("UTC"),
            dataset_names: vec!["Ada Lovelace", "Grace Hopper"],
            dataset_fail: false,
            reminder_fail: None,
        }
    }
}

fn harness(config: HarnessConfig) -> Harness {
    let reminders = Arc::new(FakeReminders {
        fail_status: config.reminder_fail,
        ..Default::default()
    });
    let services = Arc::new(Services {
        profile: Arc::new(FakeProfile {
            name: config.profile_name,
            fail_status: config.profile_fail,
        }),
        timezone: Arc::new(FakeTimezone {
            tz: config.timezone,
        }),
        reminders: reminders.clone(),
        dataset: Arc::new(FakeDataset {
            names: config.dataset_names,
            fail: config.dataset_fail,
        }),
    });
    Harness {
        skill: Skill::new(services),
        reminders,
    }
}

fn envelope(request: Value, attributes: Value, with_permissions: bool) -> RequestEnvelope {
    let mut user = json!({"userId": "user-1"});
    if with_permissions {
        user["permissions"] = json!({"consentToken": "consent-token"});
    }
    serde_json::from_value(json!({
        "version": "1.0",
        "session": {
            "new": true,
            "sessionId": "session-1",
            "attributes": attributes
        },
        "context": {
            "System": {
                "user": user,
                "device": {"deviceId": "device-1"}
            }
        },
        "request": request
    }))
    .unwrap()
}

fn launch(locale: &str) -> Value {
    json!({"type": "LaunchRequest", "locale": locale})
}

fn intent(name: &str, slots: Value) -> Value {
    json!({
        "type": "IntentRequest",
        "locale": "en-US",
        "intent": {"name": name, "confirmationStatus": "NONE", "slots": slots}
    })
}

fn birthday_attributes() -> Value {
    json!({"day": 15, "month": 3, "monthName": "March", "year": 1990, "name": "Jose"})
}

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

#[tokio::test]
async fn launch_without_birth_date_greets_and_asks() {
    let h = harness(HarnessConfig::default());
    let response = h
        .skill
        .handle_at(
            envelope(launch("en-US"), json!({}), true),
            at(2024, 3, 1, 12),
        )
        .await;

    let speech = response.speech().unwrap();
    assert!(speech.contains("Hello, Jose"), "speech: {speech}");
    assert!(speech.contains("When were you born"), "speech: {speech}");
    assert_eq!(response.session_attributes["name"], "Jose");
}

#[tokio::test]
async fn launch_without_permissions_sends_consent_card() {
    let h = harness(HarnessConfig::default());
    let response = h
        .skill
        .handle_at(
            envelope(launch("en-US"), json!({}), false),
            at(2024, 3, 1, 12),
        )
        .await;

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(
        json["response"]["card"]["type"],
        "AskForPermissionsConsent"
    );
    // Greeting stays anonymous
    assert!(response.speech().unwrap().starts_with("Hello, welcome"));
}

#[tokio::test]
async fn launch_on_birthday_celebrates_with_notable_people() {
    let h = harness(HarnessConfig::default());
    let response = h
        .skill
        .handle_at(
            envelope(launch("en-US"), birthday_attributes(), true),
            at(2024, 3, 15, 12),
        )
        .await;

    let speech = response.speech().unwrap();
    assert!(speech.contains("Happy birthday, Jose"), "speech: {speech}");
    assert!(speech.contains("34"), "speech: {speech}");
    assert!(speech.contains("Also born today"), "speech: {speech}");
    assert!(speech.contains("Ada Lovelace and Grace Hopper"), "speech: {speech}");
}

#[tokio::test]
async fn launch_on_birthday_swallows_dataset_failure() {
    let h = harness(HarnessConfig {
        dataset_fail: true,
        ..Default::default()
    });
    let response = h
        .skill
        .handle_at(
            envelope(launch("en-US"), birthday_attributes(), true),
            at(2024, 3, 15, 12),
        )
        .await;

    let speech = response.speech().unwrap();
    assert!(speech.contains("Happy birthday"), "speech: {speech}");
    assert!(!speech.contains("Also born today"), "speech: {speech}");
}

#[tokio::test]
async fn launch_without_timezone_apologizes() {
    let h = harness(HarnessConfig {
        timezone: None,
        ..Default::default()
    });
    let response = h
        .skill
        .handle_at(
            envelope(launch("en-US"), birthday_attributes(), true),
            at(2024, 3, 15, 12),
        )
        .await;

    let speech = response.speech().unwrap();
    assert!(speech.contains("timezone"), "speech: {speech}");
}

#[tokio::test]
async fn launch_with_unparseable_timezone_id_apologizes() {
    let h = harness(HarnessConfig {
        timezone: Some("Not/AZone"),
        ..Default::default()
    });
    let response = h
        .skill
        .handle_at(
            envelope(launch("en-US"), birthday_attributes(), true),
            at(2024, 3, 15, 12),
        )
        .await;

    let speech = response.speech().unwrap();
    assert!(
        speech.contains("couldn't determine your timezone"),
        "speech: {speech}"
    );
}

#[tokio::test]
async fn celebrity_birthdays_with_unparseable_timezone_id_apologizes() {
    let h = harness(HarnessConfig {
        timezone: Some("Not/AZone"),
        ..Default::default()
    });
    let response = h
        .skill
        .handle_at(
            envelope(
                intent("CelebrityBirthdaysIntent", json!({})),
                json!({}),
                true,
            ),
            at(2024, 3, 15, 12),
        )
        .await;

    let speech = response.speech().unwrap();
    assert!(
        speech.contains("couldn't determine your timezone"),
        "speech: {speech}"
    );
}

#[tokio::test]
async fn launch_speaks_spanish_for_spanish_locale() {
    let h = harness(HarnessConfig::default());
    let response = h
        .skill
        .handle_at(
            envelope(launch("es-ES"), json!({}), true),
            at(2024, 3, 1, 12),
        )
        .await;

    let speech = response.speech().unwrap();
    assert!(speech.starts_with("Hola, Jose"), "speech: {speech}");
}

#[tokio::test]
async fn register_birthday_saves_attributes() {
    let h = harness(HarnessConfig::default());
    let slots = json!({
        "day": {"value": "15"},
        "month": {
            "value": "march",
            "resolutions": {
                "resolutionsPerAuthority": [
                    {"values": [{"value": {"id": "3", "name": "March"}}]}
                ]
            }
        },
        "year": {"value": "1990"}
    });
    let response = h
        .skill
        .handle_at(
            envelope(intent("RegisterBirthdayIntent", slots), json!({}), true),
            at(2024, 3, 1, 12),
        )
        .await;

    let speech = response.speech().unwrap();
    assert!(speech.contains("March 15, 1990"), "speech: {speech}");
    assert_eq!(response.session_attributes["day"], 15);
    assert_eq!(response.session_attributes["month"], 3);
    assert_eq!(response.session_attributes["monthName"], "March");
    assert_eq!(response.session_attributes["year"], 1990);
}

#[tokio::test]
async fn register_rejects_impossible_date_with_generic_error() {
    let h = harness(HarnessConfig::default());
    let slots = json!({
        "day": {"value": "30"},
        "month": {
            "value": "february",
            "resolutions": {
                "resolutionsPerAuthority": [
                    {"values": [{"value": {"id": "2", "name": "February"}}]}
                ]
            }
        },
        "year": {"value": "1990"}
    });
    let response = h
        .skill
        .handle_at(
            envelope(intent("RegisterBirthdayIntent", slots), json!({}), true),
            at(2024, 3, 1, 12),
        )
        .await;

    let speech = response.speech().unwrap();
    assert!(speech.contains("something went wrong"), "speech: {speech}");
}

#[tokio::test]
async fn say_birthday_counts_days_and_next_age() {
    let h = harness(HarnessConfig::default());
    let response = h
        .skill
        .handle_at(
            envelope(
                intent("SayBirthdayIntent", json!({})),
                birthday_attributes(),
                true,
            ),
            at(2024, 3, 1, 12),
        )
        .await;

    let speech = response.speech().unwrap();
    assert!(
        speech.contains("There are 14 days left until your birthday, Jose"),
        "speech: {speech}"
    );
    assert!(speech.contains("You will turn 34"), "speech: {speech}");
}

#[tokio::test]
async fn say_birthday_without_date_prompts_for_it() {
    let h = harness(HarnessConfig::default());
    let response = h
        .skill
        .handle_at(
            envelope(intent("SayBirthdayIntent", json!({})), json!({}), true),
            at(2024, 3, 1, 12),
        )
        .await;

    let speech = response.speech().unwrap();
    assert!(
        speech.contains("don't seem to know your birthday"),
        "speech: {speech}"
    );
}

#[tokio::test]
async fn remind_unconfirmed_message_cancels() {
    let h = harness(HarnessConfig::default());
    let slots = json!({"message": {"value": "happy birthday to me", "confirmationStatus": "NONE"}});
    let response = h
        .skill
        .handle_at(
            envelope(
                intent("RemindBirthdayIntent", slots),
                birthday_attributes(),
                true,
            ),
            at(2024, 3, 1, 12),
        )
        .await;

    let speech = response.speech().unwrap();
    assert!(speech.contains("won't create"), "speech: {speech}");
    assert!(h.reminders.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn remind_confirmed_creates_reminder_and_stores_token() {
    let h = harness(HarnessConfig::default());
    let slots =
        json!({"message": {"value": "happy birthday to me", "confirmationStatus": "CONFIRMED"}});
    let response = h
        .skill
        .handle_at(
            envelope(
                intent("RemindBirthdayIntent", slots),
                birthday_attributes(),
                true,
            ),
            at(2024, 3, 1, 12),
        )
        .await;

    let speech = response.speech().unwrap();
    assert!(speech.contains("reminder has been created"), "speech: {speech}");
    assert_eq!(response.session_attributes["reminderId"], "token-1");

    let created = h.reminders.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].trigger.scheduled_time, "2024-03-15T09:00:00");
    assert_eq!(created[0].trigger.recurrence.freq, "YEARLY");
    assert_eq!(
        created[0].alert_info.spoken_info.content[0].text,
        "happy birthday to me"
    );
}

#[tokio::test]
async fn remind_replaces_previous_reminder() {
    let h = harness(HarnessConfig::default());
    let slots = json!({"message": {"value": "cake time", "confirmationStatus": "CONFIRMED"}});
    let mut attributes = birthday_attributes();
    attributes["reminderId"] = json!("token-0");

    let response = h
        .skill
        .handle_at(
            envelope(intent("RemindBirthdayIntent", slots), attributes, true),
            at(2024, 3, 1, 12),
        )
        .await;

    assert_eq!(response.session_attributes["reminderId"], "token-1");
    assert_eq!(*h.reminders.deleted.lock().unwrap(), vec!["token-0"]);
}

#[tokio::test]
async fn remind_without_permissions_sends_consent_card() {
    let h = harness(HarnessConfig::default());
    let slots = json!({"message": {"value": "cake time", "confirmationStatus": "CONFIRMED"}});
    let response = h
        .skill
        .handle_at(
            envelope(
                intent("RemindBirthdayIntent", slots),
                birthday_attributes(),
                false,
            ),
            at(2024, 3, 1, 12),
        )
        .await;

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["response"]["card"]["type"], "AskForPermissionsConsent");
    assert!(
        response.speech().unwrap().contains("permission"),
        "speech: {:?}",
        response.speech()
    );
    assert!(h.reminders.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn remind_on_unsupported_device_apologizes() {
    let h = harness(HarnessConfig {
        reminder_fail: Some(403),
        ..Default::default()
    });
    let slots = json!({"message": {"value": "cake time", "confirmationStatus": "CONFIRMED"}});
    let response = h
        .skill
        .handle_at(
            envelope(
                intent("RemindBirthdayIntent", slots),
                birthday_attributes(),
                true,
            ),
            at(2024, 3, 1, 12),
        )
        .await;

    let speech = response.speech().unwrap();
    assert!(speech.contains("not supported"), "speech: {speech}");
}

#[tokio::test]
async fn celebrity_birthdays_lists_names() {
    let h = harness(HarnessConfig::default());
    let response = h
        .skill
        .handle_at(
            envelope(
                intent("CelebrityBirthdaysIntent", json!({})),
                json!({}),
                true,
            ),
            at(2024, 3, 15, 12),
        )
        .await;

    let speech = response.speech().unwrap();
    assert!(speech.contains("On this day were born"), "speech: {speech}");
    assert!(speech.contains("Ada Lovelace and Grace Hopper"), "speech: {speech}");
}

#[tokio::test]
async fn celebrity_birthdays_surfaces_dataset_failure() {
    let h = harness(HarnessConfig {
        dataset_fail: true,
        ..Default::default()
    });
    let response = h
        .skill
        .handle_at(
            envelope(
                intent("CelebrityBirthdaysIntent", json!({})),
                json!({}),
                true,
            ),
            at(2024, 3, 15, 12),
        )
        .await;

    let speech = response.speech().unwrap();
    assert!(speech.contains("dataset"), "speech: {speech}");
}

#[tokio::test]
async fn builtin_intents_route_to_their_handlers() {
    let h = harness(HarnessConfig::default());
    let now = at(2024, 3, 1, 12);

    let help = h
        .skill
        .handle_at(
            envelope(intent("AMAZON.HelpIntent", json!({})), json!({}), true),
            now,
        )
        .await;
    assert!(help.speech().unwrap().contains("date of birth"));

    let stop = h
        .skill
        .handle_at(
            envelope(
                intent("AMAZON.StopIntent", json!({})),
                birthday_attributes(),
                true,
            ),
            now,
        )
        .await;
    assert!(stop.speech().unwrap().contains("Goodbye, Jose"));
    assert!(stop.response.should_end_session);

    let fallback = h
        .skill
        .handle_at(
            envelope(intent("AMAZON.FallbackIntent", json!({})), json!({}), true),
            now,
        )
        .await;
    assert!(fallback.speech().unwrap().contains("don't know about that"));
}

#[tokio::test]
async fn unknown_intent_falls_through_to_reflector() {
    let h = harness(HarnessConfig::default());
    let response = h
        .skill
        .handle_at(
            envelope(intent("SomeNewIntent", json!({})), json!({}), true),
            at(2024, 3, 1, 12),
        )
        .await;

    let speech = response.speech().unwrap();
    assert!(speech.contains("SomeNewIntent"), "speech: {speech}");
}

#[tokio::test]
async fn session_ended_returns_empty_response() {
    let h = harness(HarnessConfig::default());
    let response = h
        .skill
        .handle_at(
            envelope(
                json!({"type": "SessionEndedRequest", "locale": "en-US", "reason": "USER_INITIATED"}),
                json!({}),
                true,
            ),
            at(2024, 3, 1, 12),
        )
        .await;

    assert!(response.speech().is_none());
    assert!(response.response.should_end_session);
}
