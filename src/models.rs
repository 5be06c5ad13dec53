use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::datetime::BirthDate;
use crate::utils::error::Result;

/// An incoming request envelope, as delivered by the dispatch runtime
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub context: Option<Context>,
    pub request: Request,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    #[serde(rename = "System", default)]
    pub system: Option<System>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct System {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub device: Option<Device>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub user_id: String,
    /// Present only when the user has consented to at least one permission
    #[serde(default)]
    pub permissions: Option<Permissions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    #[serde(default)]
    pub consent_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub device_id: String,
}

/// The request payload, tagged by type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    LaunchRequest {
        #[serde(default)]
        locale: String,
    },
    IntentRequest {
        #[serde(default)]
        locale: String,
        intent: Intent,
    },
    SessionEndedRequest {
        #[serde(default)]
        locale: String,
        #[serde(default)]
        reason: Option<String>,
    },
}

impl Request {
    pub fn locale(&self) -> &str {
        match self {
            Request::LaunchRequest { locale }
            | Request::IntentRequest { locale, .. }
            | Request::SessionEndedRequest { locale, .. } => locale,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Request::LaunchRequest { .. } => "LaunchRequest",
            Request::IntentRequest { .. } => "IntentRequest",
            Request::SessionEndedRequest { .. } => "SessionEndedRequest",
        }
    }

    pub fn intent(&self) -> Option<&Intent> {
        match self {
            Request::IntentRequest { intent, .. } => Some(intent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub confirmation_status: ConfirmationStatus,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

impl Intent {
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    /// The raw spoken value of a slot, if filled
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slot(name).and_then(|s| s.value.as_deref())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfirmationStatus {
    #[default]
    None,
    Confirmed,
    Denied,
}

/// A named, typed value extracted from the utterance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub confirmation_status: ConfirmationStatus,
    #[serde(default)]
    pub resolutions: Option<Resolutions>,
}

impl Slot {
    /// First resolved value from the resolution authorities, when slot
    /// resolution matched (months arrive here normalized to 1-12)
    pub fn resolved(&self) -> Option<&ResolvedValue> {
        self.resolutions
            .as_ref()?
            .resolutions_per_authority
            .first()?
            .values
            .first()
            .map(|v| &v.value)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolutions {
    #[serde(default)]
    pub resolutions_per_authority: Vec<Resolution>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resolution {
    #[serde(default)]
    pub values: Vec<ResolvedValueWrapper>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolvedValueWrapper {
    pub value: ResolvedValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolvedValue {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Typed view over the envelope's session attribute map.
///
/// Attributes ride in on the envelope and out on the response; the skill
/// itself holds no state between requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_id: Option<String>,
}

impl SessionAttributes {
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(map.clone()))?)
    }

    pub fn to_map(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    /// The registered birth date, when all three parts are present and valid
    pub fn birth_date(&self) -> Option<BirthDate> {
        match (self.day, self.month, self.year) {
            (Some(day), Some(month), Some(year)) => BirthDate::new(day, month, year).ok(),
            _ => None,
        }
    }
}

/// The rendered response payload handed back to the dispatch runtime
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillResponse {
    pub version: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub session_attributes: Map<String, Value>,
    pub response: ResponseBody,
}

impl SkillResponse {
    /// The plain speech text, if any (what the user will hear)
    pub fn speech(&self) -> Option<&str> {
        self.response.output_speech.as_ref().map(|s| s.text.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    pub should_end_session: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: String,
    pub text: String,
}

impl OutputSpeech {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            speech_type: "PlainText".to_string(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Card {
    /// Silent card asking the user to grant the listed permission scopes
    AskForPermissionsConsent { permissions: Vec<String> },
}

/// Builder for skill responses, consumed by the handlers
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    speech: Option<String>,
    reprompt: Option<String>,
    card: Option<Card>,
    should_end_session: bool,
    session_attributes: Map<String, Value>,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speak(mut self, text: impl Into<String>) -> Self {
        self.speech = Some(text.into());
        self
    }

    pub fn reprompt(mut self, text: impl Into<String>) -> Self {
        self.reprompt = Some(text.into());
        self
    }

    pub fn with_permissions_card(mut self, scopes: &[&str]) -> Self {
        self.card = Some(Card::AskForPermissionsConsent {
            permissions: scopes.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    pub fn end_session(mut self) -> Self {
        self.should_end_session = true;
        self
    }

    pub fn attributes(mut self, attributes: &SessionAttributes) -> Result<Self> {
        self.session_attributes = attributes.to_map()?;
        Ok(self)
    }

    pub fn build(self) -> SkillResponse {
        SkillResponse {
            version: "1.0".to_string(),
            session_attributes: self.session_attributes,
            response: ResponseBody {
                output_speech: self.speech.map(OutputSpeech::plain),
                reprompt: self.reprompt.map(|text| Reprompt {
                    output_speech: OutputSpeech::plain(text),
                }),
                card: self.card,
                should_end_session: self.should_end_session,
            },
        }
    }
}
