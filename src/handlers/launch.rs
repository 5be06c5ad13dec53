use async_trait::async_trait;
use tracing::warn;

use crate::constants::GIVEN_NAME_PERMISSION;
use crate::models::{Request, ResponseBuilder, SkillResponse};
use crate::services::ServiceError;
use crate::skill::{RequestContext, RequestHandler};
use crate::utils::datetime::birthday_stats;
use crate::utils::error::Result;
use crate::utils::messages::render;

use super::{birthday_day_speech, device_timezone};

/// Greets the user on skill launch; on their birthday it celebrates instead
pub struct LaunchHandler;

#[async_trait]
impl RequestHandler for LaunchHandler {
    fn can_handle(&self, ctx: &RequestContext) -> bool {
        matches!(ctx.envelope.request, Request::LaunchRequest { .. })
    }

    async fn handle(&self, ctx: &mut RequestContext) -> Result<SkillResponse> {
        let msgs = ctx.messages();
        let mut builder = ResponseBuilder::new();

        if ctx.attributes.name.is_none() {
            if ctx.has_permissions() {
                match ctx.services.profile.given_name().await {
                    Ok(Some(name)) => ctx.attributes.name = Some(name),
                    Ok(None) => {}
                    Err(ServiceError::Unauthorized | ServiceError::Forbidden) => {
                        // The user needs to enable the given-name permission;
                        // send a silent consent card and greet anonymously
                        builder = builder.with_permissions_card(&[GIVEN_NAME_PERMISSION]);
                    }
                    Err(e) => warn!("Profile lookup failed: {}", e),
                }
            } else {
                builder = builder.with_permissions_card(&[GIVEN_NAME_PERMISSION]);
            }
        }

        let mut speech = render(msgs.welcome, &[("name", &ctx.spoken_name())]);

        if let Some(birth) = ctx.attributes.birth_date() {
            let Some(tz) = device_timezone(ctx).await else {
                return Ok(builder
                    .speak(msgs.no_timezone)
                    .attributes(&ctx.attributes)?
                    .build());
            };

            let stats = birthday_stats(&birth, tz, ctx.now)?;
            if stats.days_until_birthday == 0 {
                speech = birthday_day_speech(ctx, stats.age, tz).await;
            }
        }

        speech += msgs.help;
        Ok(builder
            .speak(speech)
            .reprompt(msgs.help)
            .attributes(&ctx.attributes)?
            .build())
    }
}
