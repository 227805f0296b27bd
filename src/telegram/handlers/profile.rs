//! Settings menu: profile view and update, feedback.

use crate::core::types::{User, UserCategory};
use crate::core::validation::{normalize_phone, to_sentence_case, validate_feedback, validate_user_name};
use crate::storage::users::{self, PhoneOwner};
use crate::storage::feedback;
use crate::telegram::handlers::types::{ChatContext, HandlerDeps};
use crate::telegram::keyboards;

const FEEDBACK_PROMPT: &str = "Please write your feedback in concise and short way";

pub async fn show_settings(deps: &HandlerDeps, ctx: &ChatContext) {
    deps.reply_with(ctx.chat_id, "Choose preference", &keyboards::settings_menu())
        .await;
}

/// "ABEBE kebede" -> "Abebe Kebede"
fn title_case(name: &str) -> String {
    let mut at_word_start = true;
    name.to_lowercase()
        .chars()
        .map(|c| {
            let mapped: String = if at_word_start {
                c.to_uppercase().collect()
            } else {
                c.to_string()
            };
            at_word_start = c.is_whitespace();
            mapped
        })
        .collect()
}

pub fn render_profile(user: &User) -> String {
    format!(
        "<b>Name</b>:   {}\n<b>Category</b>:   {}\n<b>Phonenumber</b>:   {}\n\n",
        title_case(&user.user_name),
        user.category.display_name(),
        user.phone_number
    )
}

pub async fn show_profile(deps: &HandlerDeps, ctx: &ChatContext) {
    deps.reply_with(ctx.chat_id, &render_profile(&ctx.user), &keyboards::profile_menu())
        .await;
}

pub async fn prompt_name(deps: &HandlerDeps, ctx: &ChatContext) {
    deps.reply_with(ctx.chat_id, "Enter new name", &keyboards::skip_menu()).await;
}

pub async fn prompt_phone(deps: &HandlerDeps, ctx: &ChatContext) {
    deps.reply_with(ctx.chat_id, "Enter new phonenumber", &keyboards::skip_menu())
        .await;
}

pub async fn prompt_category(deps: &HandlerDeps, ctx: &ChatContext) {
    deps.reply_with(ctx.chat_id, "Wish to change category?", &keyboards::update_category_menu())
        .await;
}

/// Writes the changed user and keeps the context in sync.
fn save_user(deps: &HandlerDeps, ctx: &mut ChatContext, updated: User) -> bool {
    match deps.connection().and_then(|conn| users::update_user(&conn, &updated)) {
        Ok(()) => {
            ctx.user = updated;
            true
        }
        Err(e) => {
            log::error!("Failed to update user {}: {}", updated.id, e);
            false
        }
    }
}

pub async fn update_name(deps: &HandlerDeps, ctx: &mut ChatContext, text: &str) -> bool {
    let name = text.trim();
    if let Err(message) = validate_user_name(name) {
        deps.reply(ctx.chat_id, &to_sentence_case(&message)).await;
        deps.reply(ctx.chat_id, "Enter new name").await;
        return false;
    }

    let updated = User {
        user_name: name.to_string(),
        ..ctx.user.clone()
    };
    if !save_user(deps, ctx, updated) {
        deps.reply(ctx.chat_id, "❌ Error unable to update name!").await;
        deps.reply(ctx.chat_id, "Re-enter new name").await;
        return false;
    }

    prompt_phone(deps, ctx).await;
    true
}

/// Normalizes a typed phone number and checks nobody else uses it.
fn check_phone(deps: &HandlerDeps, user_id: &str, raw: &str) -> Result<String, String> {
    let phone = normalize_phone(raw, &deps.config.country_code).ok_or_else(|| "invalid phonenumber used".to_string())?;
    let taken = deps
        .connection()
        .and_then(|conn| users::phone_in_use(&conn, &phone, PhoneOwner::User(user_id)))
        .map_err(|e| {
            log::error!("Failed to check phone uniqueness: {}", e);
            "invalid phonenumber used".to_string()
        })?;
    if taken {
        return Err("phone number already exists".to_string());
    }
    Ok(phone)
}

pub async fn update_phone(deps: &HandlerDeps, ctx: &mut ChatContext, text: &str) -> bool {
    let phone = match check_phone(deps, &ctx.user.id, text.trim()) {
        Ok(phone) => phone,
        Err(message) => {
            deps.reply(ctx.chat_id, &to_sentence_case(&message)).await;
            deps.reply(ctx.chat_id, "Enter new phonenumber").await;
            return false;
        }
    };

    let updated = User {
        phone_number: phone,
        ..ctx.user.clone()
    };
    if !save_user(deps, ctx, updated) {
        deps.reply(ctx.chat_id, "❌ Error unable to update phonenumber!").await;
        deps.reply(ctx.chat_id, "Re-enter new phonenumber").await;
        return false;
    }

    prompt_category(deps, ctx).await;
    true
}

pub async fn update_category(deps: &HandlerDeps, ctx: &mut ChatContext, text: &str) -> bool {
    let Some(category) = UserCategory::from_user_input(text) else {
        deps.reply(ctx.chat_id, &to_sentence_case("invalid category selected")).await;
        deps.reply(ctx.chat_id, "Wish to change category?").await;
        return false;
    };

    let updated = User {
        category,
        ..ctx.user.clone()
    };
    if !save_user(deps, ctx, updated) {
        deps.reply(ctx.chat_id, "❌ Error unable to update category!").await;
        deps.reply(ctx.chat_id, "Re-select category").await;
        return false;
    }

    deps.reply(ctx.chat_id, "Congratulations 🎉 you have successfully update your profile!")
        .await;
    true
}

/// "Skip" on the last profile step.
pub async fn finish_profile_update(deps: &HandlerDeps, ctx: &ChatContext) {
    deps.reply(ctx.chat_id, "Congratulations 🎉 you have successfully update your profile!")
        .await;
    show_profile(deps, ctx).await;
}

pub async fn prompt_feedback(deps: &HandlerDeps, ctx: &ChatContext) {
    deps.reply_with(ctx.chat_id, FEEDBACK_PROMPT, &keyboards::back_menu()).await;
}

pub async fn receive_feedback(deps: &HandlerDeps, ctx: &ChatContext, text: &str) -> bool {
    let comment = text.trim();
    if let Err(message) = validate_feedback(comment) {
        deps.reply(ctx.chat_id, &to_sentence_case(&message)).await;
        deps.reply(ctx.chat_id, FEEDBACK_PROMPT).await;
        return false;
    }

    if let Err(e) = deps
        .connection()
        .and_then(|conn| feedback::add_feedback(&conn, &ctx.user.id, comment))
    {
        log::error!("Failed to store feedback of {}: {}", ctx.user.id, e);
        deps.reply(ctx.chat_id, "❌ Error unable to add your feedback!").await;
        deps.reply(ctx.chat_id, "Re-enter your feedback").await;
        return false;
    }

    log::info!("Feedback received from {}", ctx.user.id);
    deps.reply(
        ctx.chat_id,
        "Thank you 😁 for your feedback! We will do our best to satisfy your requests.",
    )
    .await;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ABEBE kebede"), "Abebe Kebede");
        assert_eq!(title_case("acme  plc"), "Acme  Plc");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_render_profile() {
        let user = User {
            id: "UR-1".into(),
            user_name: "acme plc".into(),
            phone_number: "+251911223344".into(),
            category: UserCategory::Employer,
        };
        assert_eq!(
            render_profile(&user),
            "<b>Name</b>:   Acme Plc\n<b>Category</b>:   አሰሪ\n<b>Phonenumber</b>:   +251911223344\n\n"
        );
    }
}
