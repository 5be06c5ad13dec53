/// Handler modules for the skill's request types and intents
mod birthday;
mod celebrities;
mod launch;
mod session;

pub use birthday::{RegisterBirthdayHandler, RemindBirthdayHandler, SayBirthdayHandler};
pub use celebrities::CelebrityBirthdaysHandler;
pub use launch::LaunchHandler;
pub use session::{
    CancelStopHandler, FallbackHandler, HelpHandler, IntentReflectorHandler, SessionEndedHandler,
};

use chrono_tz::Tz;
use tracing::info;

use crate::constants::DATASET_FETCH_LIMIT;
use crate::skill::RequestContext;
use crate::utils::datetime::local_month_day;
use crate::utils::messages::{join_names, render};
use crate::utils::timezone::parse_timezone;

/// Resolve the device timezone, or `None` when the device is unknown, the
/// lookup fails, or the returned id does not parse (the caller speaks the
/// no-timezone message)
pub(crate) async fn device_timezone(ctx: &RequestContext) -> Option<Tz> {
    let device_id = ctx.device_id()?.to_owned();
    match ctx.services.timezone.device_timezone(&device_id).await {
        Ok(tz_id) => {
            info!("Got timezone {}", tz_id);
            parse_timezone(&tz_id).ok()
        }
        Err(e) => {
            info!("Timezone lookup failed: {}", e);
            None
        }
    }
}

/// Speech for the birthday itself: greet, speak the new age, and append the
/// notable people born today. A dataset failure only drops the list.
pub(crate) async fn birthday_day_speech(ctx: &RequestContext, age: i32, tz: Tz) -> String {
    let msgs = ctx.messages();
    let mut speech = render(msgs.greet, &[("name", &ctx.spoken_name())]);
    speech += &render(msgs.now_turn, &[("count", &age.to_string())]);

    let (day, month) = local_month_day(tz, ctx.now);
    match ctx
        .services
        .dataset
        .notable_people(day, month, DATASET_FETCH_LIMIT)
        .await
    {
        Ok(people) if !people.is_empty() => {
            speech += msgs.also_today;
            speech += &join_names(&people, msgs.conjunction);
        }
        Ok(_) => {}
        Err(e) => {
            info!("Dataset lookup failed, omitting notable people: {}", e);
        }
    }
    speech
}
