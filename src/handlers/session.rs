/// Handlers for the built-in intents and session lifecycle events
use async_trait::async_trait;
use tracing::info;

use crate::models::{Request, ResponseBuilder, SkillResponse};
use crate::skill::{RequestContext, RequestHandler};
use crate::utils::error::Result;
use crate::utils::messages::render;

pub struct HelpHandler;

#[async_trait]
impl RequestHandler for HelpHandler {
    fn can_handle(&self, ctx: &RequestContext) -> bool {
        ctx.intent_name() == Some("AMAZON.HelpIntent")
    }

    async fn handle(&self, ctx: &mut RequestContext) -> Result<SkillResponse> {
        let msgs = ctx.messages();
        Ok(ResponseBuilder::new()
            .speak(msgs.help_long)
            .reprompt(msgs.help_long)
            .attributes(&ctx.attributes)?
            .build())
    }
}

pub struct CancelStopHandler;

#[async_trait]
impl RequestHandler for CancelStopHandler {
    fn can_handle(&self, ctx: &RequestContext) -> bool {
        matches!(
            ctx.intent_name(),
            Some("AMAZON.CancelIntent") | Some("AMAZON.StopIntent")
        )
    }

    async fn handle(&self, ctx: &mut RequestContext) -> Result<SkillResponse> {
        let msgs = ctx.messages();
        Ok(ResponseBuilder::new()
            .speak(render(msgs.goodbye, &[("name", &ctx.spoken_name())]))
            .end_session()
            .attributes(&ctx.attributes)?
            .build())
    }
}

pub struct FallbackHandler;

#[async_trait]
impl RequestHandler for FallbackHandler {
    fn can_handle(&self, ctx: &RequestContext) -> bool {
        ctx.intent_name() == Some("AMAZON.FallbackIntent")
    }

    async fn handle(&self, ctx: &mut RequestContext) -> Result<SkillResponse> {
        let msgs = ctx.messages();
        Ok(ResponseBuilder::new()
            .speak(msgs.fallback)
            .reprompt(msgs.help_long)
            .attributes(&ctx.attributes)?
            .build())
    }
}

pub struct SessionEndedHandler;

#[async_trait]
impl RequestHandler for SessionEndedHandler {
    fn can_handle(&self, ctx: &RequestContext) -> bool {
        matches!(ctx.envelope.request, Request::SessionEndedRequest { .. })
    }

    async fn handle(&self, ctx: &mut RequestContext) -> Result<SkillResponse> {
        if let Request::SessionEndedRequest { reason, .. } = &ctx.envelope.request {
            info!(reason = reason.as_deref(), "Session ended");
        }
        // Nothing to clean up; the response stays empty
        Ok(ResponseBuilder::new().end_session().build())
    }
}

/// Repeats the triggered intent name back; used for interaction-model
/// testing and debugging, and must sit last in the chain
pub struct IntentReflectorHandler;

#[async_trait]
impl RequestHandler for IntentReflectorHandler {
    fn can_handle(&self, ctx: &RequestContext) -> bool {
        matches!(ctx.envelope.request, Request::IntentRequest { .. })
    }

    async fn handle(&self, ctx: &mut RequestContext) -> Result<SkillResponse> {
        let msgs = ctx.messages();
        let intent_name = ctx.intent_name().unwrap_or_default().to_string();
        Ok(ResponseBuilder::new()
            .speak(render(msgs.reflector, &[("intent", &intent_name)]))
            .attributes(&ctx.attributes)?
            .build())
    }
}
