/// Request dispatch: an ordered chain of handlers, first match wins
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::handlers::{
    CancelStopHandler, CelebrityBirthdaysHandler, FallbackHandler, HelpHandler,
    IntentReflectorHandler, LaunchHandler, RegisterBirthdayHandler, RemindBirthdayHandler,
    SayBirthdayHandler, SessionEndedHandler,
};
use crate::models::{Intent, RequestEnvelope, ResponseBuilder, SessionAttributes, SkillResponse};
use crate::services::Services;
use crate::utils::error::Result;
use crate::utils::messages::{self, Messages};

/// Everything a handler needs for one request: the envelope, the parsed
/// session attributes, the collaborator clients and the instant the request
/// was received
pub struct RequestContext {
    pub envelope: RequestEnvelope,
    pub attributes: SessionAttributes,
    pub services: Arc<Services>,
    pub now: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(envelope: RequestEnvelope, services: Arc<Services>) -> Result<Self> {
        Self::at_instant(envelope, services, Utc::now())
    }

    /// Build a context with an explicit current instant; all date math
    /// downstream is relative to this
    pub fn at_instant(
        envelope: RequestEnvelope,
        services: Arc<Services>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let attributes = match &envelope.session {
            Some(session) => SessionAttributes::from_map(&session.attributes)?,
            None => SessionAttributes::default(),
        };
        Ok(Self {
            envelope,
            attributes,
            services,
            now,
        })
    }

    pub fn messages(&self) -> &'static Messages {
        messages::for_locale(self.envelope.request.locale())
    }

    pub fn intent(&self) -> Option<&Intent> {
        self.envelope.request.intent()
    }

    pub fn intent_name(&self) -> Option<&str> {
        self.intent().map(|i| i.name.as_str())
    }

    pub fn device_id(&self) -> Option<&str> {
        self.envelope
            .context
            .as_ref()?
            .system
            .as_ref()?
            .device
            .as_ref()
            .map(|d| d.device_id.as_str())
    }

    /// Whether the user has consented to any permissions at all; without
    /// this there is no point calling the consent-gated services
    pub fn has_permissions(&self) -> bool {
        self.envelope
            .context
            .as_ref()
            .and_then(|c| c.system.as_ref())
            .and_then(|s| s.user.as_ref())
            .is_some_and(|u| u.permissions.is_some())
    }

    /// ", Jose" when the name is known, empty otherwise; the message
    /// templates place `{name}` so both forms read naturally
    pub fn spoken_name(&self) -> String {
        self.attributes
            .name
            .as_ref()
            .map(|name| format!(", {}", name))
            .unwrap_or_default()
    }
}

/// A single entry in the dispatch chain
#[async_trait]
pub trait RequestHandler: Send + Sync {
    fn can_handle(&self, ctx: &RequestContext) -> bool;
    async fn handle(&self, ctx: &mut RequestContext) -> Result<SkillResponse>;
}

/// The skill: an ordered handler chain over a set of collaborator clients
pub struct Skill {
    handlers: Vec<Box<dyn RequestHandler>>,
    services: Arc<Services>,
}

impl Skill {
    /// Build the skill with the default handler chain. Order matters: the
    /// intent reflector is a catch-all and must stay last.
    pub fn new(services: Arc<Services>) -> Self {
        Self {
            handlers: vec![
                Box::new(LaunchHandler),
                Box::new(RegisterBirthdayHandler),
                Box::new(SayBirthdayHandler),
                Box::new(RemindBirthdayHandler),
                Box::new(CelebrityBirthdaysHandler),
                Box::new(HelpHandler),
                Box::new(CancelStopHandler),
                Box::new(FallbackHandler),
                Box::new(SessionEndedHandler),
                Box::new(IntentReflectorHandler),
            ],
            services,
        }
    }

    pub async fn handle(&self, envelope: RequestEnvelope) -> SkillResponse {
        self.handle_at(envelope, Utc::now()).await
    }

    /// Dispatch one envelope with an explicit current instant
    pub async fn handle_at(&self, envelope: RequestEnvelope, now: DateTime<Utc>) -> SkillResponse {
        let locale = envelope.request.locale().to_string();
        info!(
            request_type = envelope.request.type_name(),
            intent = envelope.request.intent().map(|i| i.name.as_str()),
            "Incoming request"
        );

        let mut ctx = match RequestContext::at_instant(envelope, Arc::clone(&self.services), now) {
            Ok(ctx) => ctx,
            Err(e) => {
                error!("Failed to read session attributes: {}", e);
                return error_response(&locale);
            }
        };

        for handler in &self.handlers {
            if !handler.can_handle(&ctx) {
                continue;
            }
            return match handler.handle(&mut ctx).await {
                Ok(response) => {
                    info!(speech = response.speech(), "Outgoing response");
                    response
                }
                Err(e) => {
                    error!("Handler error: {}", e);
                    error_response(&locale)
                }
            };
        }

        // The reflector catches every intent, so only a request type outside
        // the model can fall through
        error!("No handler matched request");
        error_response(&locale)
    }
}

/// The generic spoken fallback when a handler fails
fn error_response(locale: &str) -> SkillResponse {
    let msgs = messages::for_locale(locale);
    ResponseBuilder::new()
        .speak(msgs.error)
        .reprompt(msgs.help_long)
        .build()
}
