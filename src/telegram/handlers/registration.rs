//! Registration of unknown telegram identities.
//!
//! A [`TempUser`] row carries the answers given so far and the last accepted
//! stage. The final step converts it into a [`User`] plus a [`Client`] and
//! removes the temp row; a failed client write deletes the user again.

use crate::core::error::AppResult;
use crate::core::types::{Client, RegistrationStage, TempUser, User, UserCategory};
use crate::core::validation::{normalize_phone, to_sentence_case, validate_user_name};
use crate::storage::{clients, new_id, users};
use crate::storage::users::PhoneOwner;
use crate::telegram::handlers::types::HandlerDeps;
use crate::telegram::keyboards;
use crate::telegram::types::Update;

const NAME_PROMPT: &str = "Enter company/individual name";
const PHONE_PROMPT: &str = "Add your phonenumber, use 'Add 📱' button to add your phone number";
const CATEGORY_PROMPT: &str = "You wish to be categorized as ?";

/// First contact: opens a registration for the sender.
pub async fn init_registration(deps: &HandlerDeps, update: &Update) {
    let chat_id = update.reply_chat_id();
    let telegram_id = update.sender_id();

    if let Err(e) = deps
        .connection()
        .and_then(|conn| users::add_temp_user(&conn, telegram_id))
    {
        log::error!("Failed to start registration for {}: {}", telegram_id, e);
        deps.reply_with(chat_id, "❌ Error unable to initiate registration!", &keyboards::start_menu())
            .await;
        return;
    }

    log::info!("Registration started for {}", telegram_id);
    deps.reply(chat_id, "Welcome 👋 to አሰሪ, please register first!").await;
    deps.reply(chat_id, NAME_PROMPT).await;
}

/// Feeds the update into the registrant's current stage.
pub async fn handle_registration(deps: &HandlerDeps, update: &Update, temp_user: TempUser) {
    match temp_user.stage {
        RegistrationStage::Init => register_name(deps, update, temp_user).await,
        RegistrationStage::UserName => register_phone(deps, update, temp_user).await,
        RegistrationStage::PhoneNumber => register_category(deps, update, temp_user).await,
        RegistrationStage::Category => {
            log::warn!("Registrant {} is already past the last stage", temp_user.telegram_id);
        }
    }
}

fn save_progress(deps: &HandlerDeps, temp_user: &TempUser) -> bool {
    match deps
        .connection()
        .and_then(|conn| users::update_temp_user(&conn, temp_user))
    {
        Ok(()) => true,
        Err(e) => {
            log::error!("Failed to store registration of {}: {}", temp_user.telegram_id, e);
            false
        }
    }
}

async fn register_name(deps: &HandlerDeps, update: &Update, temp_user: TempUser) {
    let chat_id = update.reply_chat_id();
    let name = update.message.text.trim();

    if let Err(message) = validate_user_name(name) {
        deps.reply(chat_id, &to_sentence_case(&message)).await;
        deps.reply(chat_id, NAME_PROMPT).await;
        return;
    }

    let progressed = TempUser {
        user_name: name.to_string(),
        stage: RegistrationStage::UserName,
        ..temp_user
    };
    if !save_progress(deps, &progressed) {
        deps.reply(chat_id, "❌ Error unable to register username!").await;
        deps.reply(chat_id, "Re-enter your name").await;
        return;
    }

    deps.reply_with(chat_id, PHONE_PROMPT, &keyboards::contact_request_menu())
        .await;
}

/// Normalized shared phone number, unless it is invalid or taken.
fn check_registrant_phone(deps: &HandlerDeps, telegram_id: i64, raw: &str) -> Result<String, String> {
    let phone = normalize_phone(raw, &deps.config.country_code).ok_or_else(|| "invalid phonenumber used".to_string())?;
    let taken = deps
        .connection()
        .and_then(|conn| users::phone_in_use(&conn, &phone, PhoneOwner::Registrant(telegram_id)))
        .map_err(|e| {
            log::error!("Failed to check phone uniqueness: {}", e);
            "invalid phonenumber used".to_string()
        })?;
    if taken {
        return Err("phone number already exists".to_string());
    }
    Ok(phone)
}

async fn register_phone(deps: &HandlerDeps, update: &Update, temp_user: TempUser) {
    let chat_id = update.reply_chat_id();

    // Typed numbers are ignored, only a shared contact counts.
    let phone = match check_registrant_phone(deps, temp_user.telegram_id, update.contact_phone()) {
        Ok(phone) => phone,
        Err(message) => {
            deps.reply(chat_id, &to_sentence_case(&message)).await;
            deps.reply_with(chat_id, PHONE_PROMPT, &keyboards::contact_request_menu())
                .await;
            return;
        }
    };

    let progressed = TempUser {
        phone_number: phone,
        stage: RegistrationStage::PhoneNumber,
        ..temp_user
    };
    if !save_progress(deps, &progressed) {
        deps.reply(chat_id, "❌ Error unable to register phonenumber!").await;
        deps.reply_with(chat_id, "Re-enter your phonenumber", &keyboards::contact_request_menu())
            .await;
        return;
    }

    deps.reply_with(chat_id, CATEGORY_PROMPT, &keyboards::registration_category_menu())
        .await;
}

/// Writes the user and its chat binding; the user is removed again when the binding fails.
fn convert_registrant(deps: &HandlerDeps, temp_user: &TempUser, category: UserCategory) -> AppResult<User> {
    let conn = deps.connection()?;
    let user = User {
        id: new_id("UR"),
        user_name: temp_user.user_name.clone(),
        phone_number: temp_user.phone_number.clone(),
        category,
    };
    users::add_user(&conn, &user)?;

    let client = Client {
        user_id: user.id.clone(),
        telegram_id: temp_user.telegram_id,
        prev_command: String::new(),
    };
    if let Err(e) = clients::add_client(&conn, &client) {
        if let Err(cleanup) = users::delete_user(&conn, &user.id) {
            log::error!("Failed to remove orphaned user {}: {}", user.id, cleanup);
        }
        return Err(e);
    }

    if let Err(e) = users::delete_temp_user(&conn, temp_user.telegram_id) {
        log::warn!("Failed to remove registration of {}: {}", temp_user.telegram_id, e);
    }
    Ok(user)
}

async fn register_category(deps: &HandlerDeps, update: &Update, temp_user: TempUser) {
    let chat_id = update.reply_chat_id();

    let Some(category) = UserCategory::from_user_input(&update.message.text) else {
        deps.reply(chat_id, &to_sentence_case("invalid category selected")).await;
        deps.reply(chat_id, CATEGORY_PROMPT).await;
        return;
    };

    match convert_registrant(deps, &temp_user, category) {
        Ok(user) => {
            log::info!("Registered user {} ({}) for {}", user.id, user.category, temp_user.telegram_id);
            deps.reply_with(
                chat_id,
                "Congratulations 🎉 you have been successfully registered!",
                &keyboards::main_menu(user.category),
            )
            .await;
        }
        Err(e) => {
            log::error!("Failed to register {}: {}", temp_user.telegram_id, e);
            deps.reply(chat_id, "❌ Error unable to add new user!").await;
            deps.reply_with(chat_id, "Re-select category", &keyboards::registration_category_menu())
                .await;
        }
    }
}
