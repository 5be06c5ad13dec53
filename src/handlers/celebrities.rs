use async_trait::async_trait;
use tracing::info;

use crate::constants::DATASET_FETCH_LIMIT;
use crate::models::{ResponseBuilder, SkillResponse};
use crate::skill::{RequestContext, RequestHandler};
use crate::utils::datetime::local_month_day;
use crate::utils::error::Result;
use crate::utils::messages::join_names;

use super::device_timezone;

/// Speaks the notable people born on today's local date
pub struct CelebrityBirthdaysHandler;

#[async_trait]
impl RequestHandler for CelebrityBirthdaysHandler {
    fn can_handle(&self, ctx: &RequestContext) -> bool {
        ctx.intent_name() == Some("CelebrityBirthdaysIntent")
    }

    async fn handle(&self, ctx: &mut RequestContext) -> Result<SkillResponse> {
        let msgs = ctx.messages();

        let Some(tz) = device_timezone(ctx).await else {
            return Ok(ResponseBuilder::new()
                .speak(msgs.no_timezone)
                .attributes(&ctx.attributes)?
                .build());
        };

        let (day, month) = local_month_day(tz, ctx.now);
        let mut speech = match ctx
            .services
            .dataset
            .notable_people(day, month, DATASET_FETCH_LIMIT)
            .await
        {
            Ok(people) => {
                format!(
                    "{}{}",
                    msgs.celebrity_birthdays,
                    join_names(&people, msgs.conjunction)
                )
            }
            Err(e) => {
                info!("Dataset lookup failed: {}", e);
                msgs.api_error.to_string()
            }
        };
        speech += msgs.help;

        Ok(ResponseBuilder::new()
            .speak(speech)
            .reprompt(msgs.help)
            .attributes(&ctx.attributes)?
            .build())
    }
}
