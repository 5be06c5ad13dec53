use async_trait::async_trait;
use tracing::{debug, info};

use crate::constants::REMINDERS_PERMISSION;
use crate::models::{ConfirmationStatus, Intent, ResponseBuilder, SkillResponse};
use crate::services::ServiceError;
use crate::skill::{RequestContext, RequestHandler};
use crate::utils::datetime::{birthday_stats, BirthDate};
use crate::utils::error::{Result, SkillError};
use crate::utils::messages::render;
use crate::utils::reminder::{build_reminder, ReminderSpec};
use crate::utils::validation::{parse_day, parse_month, parse_year};

use super::{birthday_day_speech, device_timezone};

fn intent<'a>(ctx: &'a RequestContext) -> Result<&'a Intent> {
    ctx.intent()
        .ok_or_else(|| SkillError::invalid_input("expected an intent request"))
}

/// Stores the birth date spoken by the user into the session attributes
pub struct RegisterBirthdayHandler;

#[async_trait]
impl RequestHandler for RegisterBirthdayHandler {
    fn can_handle(&self, ctx: &RequestContext) -> bool {
        ctx.intent_name() == Some("RegisterBirthdayIntent")
    }

    async fn handle(&self, ctx: &mut RequestContext) -> Result<SkillResponse> {
        let msgs = ctx.messages();
        let intent = intent(ctx)?;

        let day = parse_day(
            intent
                .slot_value("day")
                .ok_or_else(|| SkillError::invalid_input("day slot is missing"))?,
        )?;
        // Slot resolution hands the month over as an id (1-12) plus the
        // spoken month name
        let resolved_month = intent
            .slot("month")
            .and_then(|s| s.resolved())
            .ok_or_else(|| SkillError::invalid_input("month slot did not resolve"))?;
        let month = parse_month(&resolved_month.id)?;
        let month_name = resolved_month.name.clone();
        let year = parse_year(
            intent
                .slot_value("year")
                .ok_or_else(|| SkillError::invalid_input("year slot is missing"))?,
        )?;

        // Reject impossible dates before they ever reach the attributes
        BirthDate::new(day, month, year)?;

        ctx.attributes.day = Some(day);
        ctx.attributes.month = Some(month);
        ctx.attributes.month_name = Some(month_name.clone());
        ctx.attributes.year = Some(year);

        let speech = render(msgs.register, &[
            ("name", &ctx.spoken_name()),
            ("day", &day.to_string()),
            ("month", &month_name),
            ("year", &year.to_string()),
        ]) + msgs.help;

        Ok(ResponseBuilder::new()
            .speak(speech)
            .reprompt(msgs.help)
            .attributes(&ctx.attributes)?
            .build())
    }
}

/// Speaks the days left until the birthday and the age the user will turn
pub struct SayBirthdayHandler;

#[async_trait]
impl RequestHandler for SayBirthdayHandler {
    fn can_handle(&self, ctx: &RequestContext) -> bool {
        ctx.intent_name() == Some("SayBirthdayIntent")
    }

    async fn handle(&self, ctx: &mut RequestContext) -> Result<SkillResponse> {
        let msgs = ctx.messages();

        let Some(birth) = ctx.attributes.birth_date() else {
            return Ok(ResponseBuilder::new()
                .speak(format!("{}{}", msgs.missing, msgs.help))
                .reprompt(msgs.help)
                .attributes(&ctx.attributes)?
                .build());
        };
        let Some(tz) = device_timezone(ctx).await else {
            return Ok(ResponseBuilder::new()
                .speak(msgs.no_timezone)
                .attributes(&ctx.attributes)?
                .build());
        };

        let stats = birthday_stats(&birth, tz, ctx.now)?;
        let mut speech = if stats.days_until_birthday == 0 {
            birthday_day_speech(ctx, stats.age, tz).await
        } else {
            render(msgs.days_left, &[
                ("name", &ctx.spoken_name()),
                ("count", &stats.days_until_birthday.to_string()),
            ]) + &render(msgs.will_turn, &[("count", &(stats.age + 1).to_string())])
        };
        speech += msgs.overwrite;
        speech += msgs.help;

        Ok(ResponseBuilder::new()
            .speak(speech)
            .reprompt(msgs.help)
            .attributes(&ctx.attributes)?
            .build())
    }
}

/// Schedules a yearly reminder for the birthday, replacing any previous one
pub struct RemindBirthdayHandler;

impl RemindBirthdayHandler {
    /// The calls against the reminder service, so one error mapping covers
    /// the whole sequence
    async fn schedule(
        ctx: &mut RequestContext,
        spec: &ReminderSpec,
    ) -> std::result::Result<(), ServiceError> {
        let reminders = &ctx.services.reminders;

        let existing = reminders.list_reminders().await?;
        debug!("Skill currently has {} reminders", existing.len());

        // Replace a reminder we created earlier in this session
        if let Some(previous) = ctx.attributes.reminder_id.take() {
            reminders.delete_reminder(&previous).await?;
            info!("Deleted previous reminder with token {}", previous);
        }

        let token = reminders.create_reminder(spec).await?;
        info!("Created reminder with token {}", token);
        ctx.attributes.reminder_id = Some(token);
        Ok(())
    }
}

#[async_trait]
impl RequestHandler for RemindBirthdayHandler {
    fn can_handle(&self, ctx: &RequestContext) -> bool {
        ctx.intent_name() == Some("RemindBirthdayIntent")
    }

    async fn handle(&self, ctx: &mut RequestContext) -> Result<SkillResponse> {
        let msgs = ctx.messages();
        let intent = intent(ctx)?;

        let message_slot = intent
            .slot("message")
            .ok_or_else(|| SkillError::invalid_input("message slot is missing"))?;
        if message_slot.confirmation_status != ConfirmationStatus::Confirmed {
            return Ok(ResponseBuilder::new()
                .speak(format!("{}{}", msgs.cancel, msgs.help))
                .reprompt(msgs.help)
                .attributes(&ctx.attributes)?
                .build());
        }
        let message = message_slot.value.clone().unwrap_or_default();

        let Some(birth) = ctx.attributes.birth_date() else {
            return Ok(ResponseBuilder::new()
                .speak(format!("{}{}", msgs.missing, msgs.help))
                .reprompt(msgs.help)
                .attributes(&ctx.attributes)?
                .build());
        };
        let Some(tz) = device_timezone(ctx).await else {
            return Ok(ResponseBuilder::new()
                .speak(msgs.no_timezone)
                .attributes(&ctx.attributes)?
                .build());
        };

        let stats = birthday_stats(&birth, tz, ctx.now)?;
        // The builder rejects a negative count or an empty message; those
        // fail fast here rather than turning into spoken service errors
        let spec = build_reminder(
            stats.days_until_birthday,
            tz,
            ctx.envelope.request.locale(),
            &message,
            ctx.now,
        )?;

        if !ctx.has_permissions() {
            return Ok(ResponseBuilder::new()
                .with_permissions_card(&[REMINDERS_PERMISSION])
                .speak(format!("{}{}", msgs.missing_permission, msgs.help))
                .reprompt(msgs.help)
                .attributes(&ctx.attributes)?
                .build());
        }

        let mut builder = ResponseBuilder::new();
        let speech = match Self::schedule(ctx, &spec).await {
            Ok(()) => format!("{}{}", msgs.reminder_created, msgs.help),
            Err(ServiceError::Unauthorized) => {
                builder = builder.with_permissions_card(&[REMINDERS_PERMISSION]);
                format!("{}{}", msgs.missing_permission, msgs.help)
            }
            // Devices such as the simulator do not support reminders
            Err(ServiceError::Forbidden) => {
                format!("{}{}", msgs.unsupported_device, msgs.help)
            }
            Err(e) => {
                info!("Reminder scheduling failed: {}", e);
                format!("{}{}", msgs.reminder_error, msgs.help)
            }
        };

        Ok(builder
            .speak(speech)
            .reprompt(msgs.help)
            .attributes(&ctx.attributes)?
            .build())
    }
}
