//! Job alert subscriptions: the menu, the listing and the four step wizard.
//!
//! The wizard creates a draft on the sector step and fills one field per
//! step. A step refuses to touch a draft whose field is already set, so a
//! replayed inline button cannot rewrite a finished subscription.

use crate::core::error::{AppError, AppResult};
use crate::core::subscription::{
    render_removed, render_summary, subscription_experiences, sweep_invalid_subscriptions, validate_subscription,
    Catalogs,
};
use crate::core::types::{Preference, Subscription};
use crate::core::validation::{to_sentence_case, FieldErrors};
use crate::storage::{new_id, subscriptions};
use crate::telegram::handlers::types::{ChatContext, HandlerDeps};
use crate::telegram::keyboards::{self, two_per_row, InlineButton, Markup};
use crate::telegram::state::{CallbackAction, StepOutcome};

const WENT_WRONG: &str = "Oops 😳 something terribly went wrong!";

/// Which field a wizard step fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    JobType,
    EducationLevel,
    Experience,
}

impl Step {
    fn error_key(&self) -> &'static str {
        match self {
            Step::JobType => "type",
            Step::EducationLevel => "education_level",
            Step::Experience => "experience",
        }
    }

    fn value<'a>(&self, subscription: &'a Subscription) -> &'a Preference {
        match self {
            Step::JobType => &subscription.job_type,
            Step::EducationLevel => &subscription.education_level,
            Step::Experience => &subscription.experience,
        }
    }

    fn field<'a>(&self, subscription: &'a mut Subscription) -> &'a mut Preference {
        match self {
            Step::JobType => &mut subscription.job_type,
            Step::EducationLevel => &mut subscription.education_level,
            Step::Experience => &mut subscription.experience,
        }
    }

    fn persist_error(&self) -> &'static str {
        match self {
            Step::JobType => "❌ Error unable to add job subscription type!",
            Step::EducationLevel => "❌ Error unable to add education level for the job subscription!",
            Step::Experience => "❌ Error unable to add work experience for job subscription!",
        }
    }
}

fn load_catalogs(deps: &HandlerDeps) -> Catalogs {
    match deps.connection().and_then(|conn| Catalogs::load(&conn)) {
        Ok(catalogs) => catalogs,
        Err(e) => {
            log::error!("Failed to load attribute catalogs: {}", e);
            Catalogs::default()
        }
    }
}

/// "Job Subscriptions": drops subscriptions that no longer validate, then shows the menu.
pub async fn show_subscription_menu(deps: &HandlerDeps, ctx: &ChatContext) {
    let catalogs = load_catalogs(deps);
    let swept = deps
        .connection()
        .and_then(|conn| sweep_invalid_subscriptions(&conn, &ctx.user.id, &catalogs));
    if let Err(e) = swept {
        log::error!("Failed to sweep subscriptions of {}: {}", ctx.user.id, e);
    }
    send_subscription_menu(deps, ctx.chat_id).await;
}

async fn send_subscription_menu(deps: &HandlerDeps, chat_id: i64) {
    deps.reply_with(chat_id, "Choose option", &keyboards::subscription_menu())
        .await;
}

/// "Edit Subscriptions": one message per valid subscription with a remove button.
pub async fn edit_subscriptions(deps: &HandlerDeps, ctx: &ChatContext) {
    let catalogs = load_catalogs(deps);
    let all = match deps
        .connection()
        .and_then(|conn| subscriptions::find_subscriptions_by_user(&conn, &ctx.user.id))
    {
        Ok(all) => all,
        Err(e) => {
            log::error!("Failed to list subscriptions of {}: {}", ctx.user.id, e);
            Vec::new()
        }
    };

    if all.is_empty() {
        deps.reply(
            ctx.chat_id,
            "You haven't subscribed for a job! please subscribe using the add subscription button.",
        )
        .await;
        return;
    }

    for subscription in &all {
        let mut candidate = subscription.clone();
        if !validate_subscription(&mut candidate, &catalogs, &all).is_empty() {
            continue;
        }
        let remove = Markup::inline_button(InlineButton::callback(
            "🗑️ Remove",
            CallbackAction::RemoveSubscription(subscription.id.clone()).data(),
        ));
        deps.reply_with(ctx.chat_id, &render_summary(&candidate), &remove).await;
    }
}

/// Removes one of the user's subscriptions. Returns the banner to send, or the toast text.
pub fn remove_subscription(deps: &HandlerDeps, ctx: &ChatContext, subscription_id: &str) -> Result<String, String> {
    const UNABLE: &str = "🙁 Oops! unable to remove the subscription";

    let removed = deps.connection().and_then(|conn| {
        match subscriptions::find_subscription(&conn, subscription_id)? {
            Some(subscription) if subscription.user_id == ctx.user.id => {
                subscriptions::delete_subscription(&conn, subscription_id)
            }
            _ => Err(AppError::NotFound(format!("no subscription {} for user", subscription_id))),
        }
    });

    match removed {
        Ok(Some(subscription)) => Ok(render_removed(&subscription)),
        Ok(None) => Err(UNABLE.to_string()),
        Err(e) => {
            log::warn!("Unable to remove subscription {}: {}", subscription_id, e);
            Err(UNABLE.to_string())
        }
    }
}

pub async fn send_sector_keyboard(deps: &HandlerDeps, chat_id: i64) {
    let catalogs = load_catalogs(deps);
    let buttons = catalogs
        .subscription_sectors()
        .into_iter()
        .map(|sector| InlineButton::callback(sector.name, CallbackAction::AddSector(sector.id).data()))
        .collect();

    deps.reply_with(chat_id, "Select job sector", &keyboards::back_menu()).await;
    deps.reply_with(
        chat_id,
        "<b>The following are the valid job sectors avaliable</b>",
        &Markup::inline(two_per_row(buttons)),
    )
    .await;
}

async fn send_type_keyboard(deps: &HandlerDeps, chat_id: i64, subscription_id: &str) {
    let catalogs = load_catalogs(deps);
    let rows = catalogs
        .subscription_job_types()
        .into_iter()
        .map(|job_type| {
            vec![InlineButton::callback(
                job_type.name,
                CallbackAction::AddType {
                    subscription_id: subscription_id.to_string(),
                    value: job_type.id,
                }
                .data(),
            )]
        })
        .collect();

    deps.reply_with(chat_id, "Select job type", &keyboards::back_menu()).await;
    deps.reply_with(
        chat_id,
        "<b>The following are the valid job types avaliable</b>",
        &Markup::inline(rows),
    )
    .await;
}

async fn send_education_keyboard(deps: &HandlerDeps, chat_id: i64, subscription_id: &str) {
    let catalogs = load_catalogs(deps);
    let buttons = catalogs
        .subscription_education_levels()
        .into_iter()
        .map(|level| {
            InlineButton::callback(
                level.name,
                CallbackAction::AddEducationLevel {
                    subscription_id: subscription_id.to_string(),
                    value: level.id,
                }
                .data(),
            )
        })
        .collect();

    deps.reply_with(chat_id, "Select education level", &keyboards::back_menu()).await;
    deps.reply_with(
        chat_id,
        "<b>The following are the valid education levels avaliable</b>",
        &Markup::inline(two_per_row(buttons)),
    )
    .await;
}

async fn send_experience_keyboard(deps: &HandlerDeps, chat_id: i64, subscription_id: &str) {
    let buttons = subscription_experiences()
        .into_iter()
        .map(|band| {
            InlineButton::callback(
                band,
                CallbackAction::AddExperience {
                    subscription_id: subscription_id.to_string(),
                    value: band.to_string(),
                }
                .data(),
            )
        })
        .collect();

    deps.reply_with(chat_id, "Select work experience", &keyboards::back_menu()).await;
    deps.reply_with(
        chat_id,
        "<b>The following are the valid work experiences avaliable</b>",
        &Markup::inline(two_per_row(buttons)),
    )
    .await;
}

async fn send_step_keyboard(deps: &HandlerDeps, chat_id: i64, step: Step, subscription_id: &str) {
    match step {
        Step::JobType => send_type_keyboard(deps, chat_id, subscription_id).await,
        Step::EducationLevel => send_education_keyboard(deps, chat_id, subscription_id).await,
        Step::Experience => send_experience_keyboard(deps, chat_id, subscription_id).await,
    }
}

/// Wizard step 1: creates a draft for the chosen sector.
pub async fn add_sector(deps: &HandlerDeps, ctx: &ChatContext, sector: &str) -> StepOutcome {
    let catalogs = load_catalogs(deps);
    let mut draft = Subscription::draft(new_id("SB"), ctx.user.id.clone(), sector);

    let errors = validate_subscription(&mut draft, &catalogs, &[]);
    if let Some(message) = errors.get("sector") {
        deps.reply(ctx.chat_id, &format!("❌ {}", to_sentence_case(message))).await;
        send_sector_keyboard(deps, ctx.chat_id).await;
        return StepOutcome::Error;
    }

    if let Err(e) = deps
        .connection()
        .and_then(|conn| subscriptions::add_subscription(&conn, &draft))
    {
        log::error!("Failed to add subscription draft for {}: {}", ctx.user.id, e);
        deps.reply(ctx.chat_id, "❌ Error unable to add job subscription sector!").await;
        send_sector_keyboard(deps, ctx.chat_id).await;
        return StepOutcome::Error;
    }

    send_type_keyboard(deps, ctx.chat_id, &draft.id).await;
    StepOutcome::Modified
}

pub async fn add_job_type(deps: &HandlerDeps, ctx: &ChatContext, subscription_id: &str, value: &str) -> StepOutcome {
    fill_step(deps, ctx, Step::JobType, subscription_id, value).await
}

pub async fn add_education_level(
    deps: &HandlerDeps,
    ctx: &ChatContext,
    subscription_id: &str,
    value: &str,
) -> StepOutcome {
    fill_step(deps, ctx, Step::EducationLevel, subscription_id, value).await
}

pub async fn add_experience(deps: &HandlerDeps, ctx: &ChatContext, subscription_id: &str, value: &str) -> StepOutcome {
    fill_step(deps, ctx, Step::Experience, subscription_id, value).await
}

/// Loads the user's draft when the step's field is still empty.
fn find_open_draft(deps: &HandlerDeps, ctx: &ChatContext, step: Step, subscription_id: &str) -> Option<Subscription> {
    let found = deps
        .connection()
        .and_then(|conn| subscriptions::find_subscription(&conn, subscription_id));
    match found {
        Ok(Some(subscription)) if subscription.user_id == ctx.user.id && !step.value(&subscription).is_set() => {
            Some(subscription)
        }
        Ok(_) => None,
        Err(e) => {
            log::error!("Failed to load subscription {}: {}", subscription_id, e);
            None
        }
    }
}

fn step_error(errors: &FieldErrors, step: Step) -> Option<&str> {
    errors.get(step.error_key()).or_else(|| errors.get("error"))
}

fn persist(deps: &HandlerDeps, subscription: &Subscription) -> AppResult<()> {
    let conn = deps.connection()?;
    subscriptions::update_subscription(&conn, subscription)
}

async fn fill_step(deps: &HandlerDeps, ctx: &ChatContext, step: Step, subscription_id: &str, value: &str) -> StepOutcome {
    let Some(mut subscription) = find_open_draft(deps, ctx, step, subscription_id) else {
        deps.reply(ctx.chat_id, WENT_WRONG).await;
        send_subscription_menu(deps, ctx.chat_id).await;
        return StepOutcome::NotFound;
    };

    *step.field(&mut subscription) = Preference::from_stored(value);

    let catalogs = load_catalogs(deps);
    let existing = deps
        .connection()
        .and_then(|conn| subscriptions::find_subscriptions_by_user(&conn, &ctx.user.id))
        .unwrap_or_else(|e| {
            log::error!("Failed to list subscriptions of {}: {}", ctx.user.id, e);
            Vec::new()
        });

    let errors = validate_subscription(&mut subscription, &catalogs, &existing);
    if let Some(message) = step_error(&errors, step) {
        deps.reply(ctx.chat_id, &format!("❌ {}", to_sentence_case(message))).await;
        send_step_keyboard(deps, ctx.chat_id, step, subscription_id).await;
        return StepOutcome::Error;
    }

    if let Err(e) = persist(deps, &subscription) {
        log::error!("Failed to update subscription {}: {}", subscription_id, e);
        deps.reply(ctx.chat_id, step.persist_error()).await;
        send_step_keyboard(deps, ctx.chat_id, step, subscription_id).await;
        return StepOutcome::Error;
    }

    match step {
        Step::JobType => send_education_keyboard(deps, ctx.chat_id, subscription_id).await,
        Step::EducationLevel => send_experience_keyboard(deps, ctx.chat_id, subscription_id).await,
        Step::Experience => {
            deps.reply(
                ctx.chat_id,
                "Congratulations 🎉 you have successfully added new job subscription!",
            )
            .await;
            deps.reply(ctx.chat_id, &render_summary(&subscription)).await;
            send_subscription_menu(deps, ctx.chat_id).await;
        }
    }
    StepOutcome::Modified
}
