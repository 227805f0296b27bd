//! Webhook update dispatcher
//!
//! Resolves who sent the update, then runs the callback phase followed by
//! the command phase against the chat's stored cursor. The routing decisions
//! themselves live in [`crate::telegram::state`]; this module executes them.

use crate::core::error::AppResult;
use crate::core::types::TempUser;
use crate::storage::{clients, users};
use crate::telegram::handlers::types::{register_cursor, show_main_menu, ChatContext, HandlerDeps};
use crate::telegram::handlers::{jobs, profile, registration, subscriptions};
use crate::telegram::state::{
    callback_allowed, callback_next_cursor, global_route, scoped_route, Action, CallbackAction, Command, Cursor, Route,
};
use crate::telegram::types::Update;

/// Who an update comes from
enum Sender {
    Registered(Box<ChatContext>),
    Registering(TempUser),
    Unknown,
}

fn resolve_sender(deps: &HandlerDeps, update: &Update) -> AppResult<Sender> {
    let conn = deps.connection()?;
    let telegram_id = update.sender_id();

    if let Some(client) = clients::find_client_by_telegram_id(&conn, telegram_id)? {
        return match users::find_user(&conn, &client.user_id)? {
            Some(user) => Ok(Sender::Registered(Box::new(ChatContext {
                chat_id: update.reply_chat_id(),
                user,
                client,
            }))),
            None => {
                log::warn!("Client {} points at missing user {}", telegram_id, client.user_id);
                Ok(Sender::Unknown)
            }
        };
    }

    match users::find_temp_user(&conn, telegram_id)? {
        Some(temp_user) => Ok(Sender::Registering(temp_user)),
        None => Ok(Sender::Unknown),
    }
}

/// Entry point for every webhook update.
pub async fn handle_update(deps: &HandlerDeps, update: &Update) {
    let sender = match resolve_sender(deps, update) {
        Ok(sender) => sender,
        Err(e) => {
            log::error!("Failed to resolve sender {}: {}", update.sender_id(), e);
            return;
        }
    };

    match sender {
        Sender::Registered(ctx) => handle_client(deps, update, *ctx).await,
        Sender::Registering(temp_user) => registration::handle_registration(deps, update, temp_user).await,
        Sender::Unknown => {
            // A stray callback from a stale keyboard does not open a registration.
            if update.is_callback() {
                log::debug!("Ignoring callback from unknown sender {}", update.sender_id());
                return;
            }
            registration::init_registration(deps, update).await;
        }
    }
}

async fn handle_client(deps: &HandlerDeps, update: &Update, mut ctx: ChatContext) {
    if update.is_callback() {
        if !handle_callback(deps, update, &mut ctx).await {
            log::debug!(
                "Callback '{}' not accepted with cursor '{}'",
                update.callback_query.data,
                ctx.client.prev_command
            );
            deps.messenger.answer_callback(&update.callback_query.id, "").await;
        }
        return;
    }

    let command = Command::parse(&update.message.text);
    handle_command(deps, update, &mut ctx, command).await;
}

/// Runs a callback action. Returns false when the payload means nothing here.
async fn handle_callback(deps: &HandlerDeps, update: &Update, ctx: &mut ChatContext) -> bool {
    let query_id = update.callback_query.id.as_str();
    let Some(action) = CallbackAction::parse(&update.callback_query.data) else {
        return false;
    };
    if !callback_allowed(&ctx.cursor(), &action) {
        return false;
    }

    let outcome = match &action {
        CallbackAction::CloseJob(job_id) => {
            match jobs::close_job(deps, ctx, job_id) {
                Ok(reply) => {
                    deps.messenger.answer_callback(query_id, "").await;
                    deps.reply(ctx.chat_id, &reply).await;
                    deps.messenger.post_to_channel(&reply, None).await;
                }
                Err(toast) => {
                    deps.messenger.answer_callback(query_id, &toast).await;
                }
            }
            None
        }
        CallbackAction::RemoveSubscription(subscription_id) => {
            match subscriptions::remove_subscription(deps, ctx, subscription_id) {
                Ok(reply) => {
                    deps.messenger.answer_callback(query_id, "").await;
                    deps.reply(ctx.chat_id, &reply).await;
                }
                Err(toast) => {
                    deps.messenger.answer_callback(query_id, &toast).await;
                }
            }
            None
        }
        CallbackAction::ViewJob(job_id) => {
            let toast = jobs::view_job(deps, job_id, ctx.chat_id).await;
            deps.messenger.answer_callback(query_id, &toast).await;
            None
        }
        CallbackAction::AddSector(sector) => Some(subscriptions::add_sector(deps, ctx, sector).await),
        CallbackAction::AddType { subscription_id, value } => {
            Some(subscriptions::add_job_type(deps, ctx, subscription_id, value).await)
        }
        CallbackAction::AddEducationLevel { subscription_id, value } => {
            Some(subscriptions::add_education_level(deps, ctx, subscription_id, value).await)
        }
        CallbackAction::AddExperience { subscription_id, value } => {
            Some(subscriptions::add_experience(deps, ctx, subscription_id, value).await)
        }
    };

    if let Some(outcome) = outcome {
        deps.messenger.answer_callback(query_id, "").await;
        if let Some(cursor) = callback_next_cursor(&action, outcome) {
            register_cursor(deps, ctx, &cursor);
        }
    }
    true
}

async fn handle_command(deps: &HandlerDeps, update: &Update, ctx: &mut ChatContext, command: Command) {
    let cursor = ctx.cursor();

    if let Some(route) = scoped_route(&cursor, &command) {
        run_route(deps, update, ctx, route).await;
        return;
    }

    if let Cursor::Applying(job_id) = &cursor {
        if command == Command::CancelApplication {
            show_main_menu(deps, ctx).await;
            register_cursor(deps, ctx, &Cursor::CancelApplication);
            return;
        }

        match jobs::apply(deps, ctx, update, job_id).await {
            Ok(()) | Err(jobs::ApplyError::Unable) => {
                show_main_menu(deps, ctx).await;
                register_cursor(deps, ctx, &Cursor::MainMenu);
                return;
            }
            Err(e) => log::debug!("Application of {} for {} not sent: {}", ctx.user.id, job_id, e),
        }
    }

    match global_route(&command) {
        Some(route) => run_route(deps, update, ctx, route).await,
        None => log::debug!("No route for '{}' with cursor '{}'", command.label(), cursor),
    }
}

async fn run_route(deps: &HandlerDeps, update: &Update, ctx: &mut ChatContext, route: Route) {
    let succeeded = run_action(deps, update, ctx, &route.action).await;
    if let Some(cursor) = route.next_cursor(succeeded) {
        register_cursor(deps, ctx, cursor);
    }
}

/// Executes an action. Returns whether it succeeded; prompts and menus always do.
async fn run_action(deps: &HandlerDeps, update: &Update, ctx: &mut ChatContext, action: &Action) -> bool {
    let text = update.message.text.as_str();
    match action {
        Action::MainMenu => show_main_menu(deps, ctx).await,
        Action::PostJob => jobs::post_job(deps, ctx).await,
        Action::ManageJobs => jobs::show_status_menu(deps, ctx).await,
        Action::ListJobs(status) => jobs::list_jobs(deps, ctx, *status).await,
        Action::JobSubscriptions => subscriptions::show_subscription_menu(deps, ctx).await,
        Action::ShowSectors => subscriptions::send_sector_keyboard(deps, ctx.chat_id).await,
        Action::EditSubscriptions => subscriptions::edit_subscriptions(deps, ctx).await,
        Action::Settings => profile::show_settings(deps, ctx).await,
        Action::ShowProfile => profile::show_profile(deps, ctx).await,
        Action::PromptFeedback => profile::prompt_feedback(deps, ctx).await,
        Action::ReceiveFeedback => {
            let received = profile::receive_feedback(deps, ctx, text).await;
            if received {
                show_main_menu(deps, ctx).await;
            }
            return received;
        }
        Action::PromptName => profile::prompt_name(deps, ctx).await,
        Action::UpdateName => return profile::update_name(deps, ctx, text).await,
        Action::PromptPhone => profile::prompt_phone(deps, ctx).await,
        Action::UpdatePhone => return profile::update_phone(deps, ctx, text).await,
        Action::PromptCategory => profile::prompt_category(deps, ctx).await,
        Action::UpdateCategory => {
            let updated = profile::update_category(deps, ctx, text).await;
            if updated {
                profile::show_profile(deps, ctx).await;
            }
            return updated;
        }
        Action::FinishProfileUpdate => profile::finish_profile_update(deps, ctx).await,
        Action::InitApply(job_id) => {
            let started = jobs::init_apply(deps, ctx, job_id).await;
            if !started {
                show_main_menu(deps, ctx).await;
            }
            return started;
        }
    }
    true
}
