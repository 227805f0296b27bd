//! Registration of unknown telegram identities through the webhook dispatcher.
//!
//! Run with: cargo test --test registration_test

mod common;

use common::{contact_update, text_update, TestEnvironment};
use jobboard::core::types::{RegistrationStage, UserCategory};
use jobboard::storage::{clients, users};
use pretty_assertions::assert_eq;

const CHAT: i64 = 5001;

#[tokio::test]
async fn test_full_registration_creates_user_and_client() {
    let env = TestEnvironment::new();

    env.send(text_update(CHAT, "/start")).await;
    assert_eq!(
        env.messenger.texts_to(CHAT),
        vec!["Welcome 👋 to አሰሪ, please register first!", "Enter company/individual name"]
    );

    env.send(text_update(CHAT, "  Acme Plc ")).await;
    env.send(contact_update(CHAT, "0911 223344")).await;
    env.send(text_update(CHAT, "አሰሪ")).await;

    let conn = env.conn();
    assert!(users::find_temp_user(&conn, CHAT).unwrap().is_none());

    let client = clients::find_client_by_telegram_id(&conn, CHAT).unwrap().unwrap();
    assert_eq!(client.prev_command, "");
    let user = users::find_user(&conn, &client.user_id).unwrap().unwrap();
    assert_eq!(user.user_name, "Acme Plc");
    assert_eq!(user.phone_number, "+251911223344");
    assert_eq!(user.category, UserCategory::Employer);
    assert!(user.id.starts_with("UR-"));

    let texts = env.messenger.texts_to(CHAT);
    assert_eq!(
        texts.last().map(String::as_str),
        Some("Congratulations 🎉 you have been successfully registered!")
    );
    let menu = env.messenger.last_markup_to(CHAT).unwrap();
    assert_eq!(menu.labels()[0], vec!["📋 Post Job", "💼 Manage Jobs"]);
}

#[tokio::test]
async fn test_job_seeker_gets_menu_without_post_job() {
    let env = TestEnvironment::new();

    env.send(text_update(CHAT, "hi")).await;
    env.send(text_update(CHAT, "Abebe Kebede")).await;
    env.send(contact_update(CHAT, "+251911000111")).await;
    env.send(text_update(CHAT, "job seeker")).await;

    let menu = env.messenger.last_markup_to(CHAT).unwrap();
    assert!(!menu.labels().concat().contains(&"📋 Post Job".to_string()));
}

#[tokio::test]
async fn test_invalid_name_does_not_advance() {
    let env = TestEnvironment::new();
    env.send(text_update(CHAT, "/start")).await;
    env.messenger.clear();

    env.send(text_update(CHAT, "!!!")).await;

    let temp_user = users::find_temp_user(&env.conn(), CHAT).unwrap().unwrap();
    assert_eq!(temp_user.stage, RegistrationStage::Init);
    assert_eq!(temp_user.user_name, "");
    assert_eq!(
        env.messenger.texts_to(CHAT),
        vec![
            "User name should have at least one character and contain only alpha numeric value",
            "Enter company/individual name"
        ]
    );
}

#[tokio::test]
async fn test_phone_must_come_from_contact() {
    let env = TestEnvironment::new();
    env.send(text_update(CHAT, "/start")).await;
    env.send(text_update(CHAT, "Acme")).await;
    env.messenger.clear();

    // Typing the number is not enough
    env.send(text_update(CHAT, "0911223344")).await;

    let temp_user = users::find_temp_user(&env.conn(), CHAT).unwrap().unwrap();
    assert_eq!(temp_user.stage, RegistrationStage::UserName);
    assert_eq!(temp_user.user_name, "Acme");
    assert_eq!(temp_user.phone_number, "");

    let texts = env.messenger.texts_to(CHAT);
    assert_eq!(texts[0], "Invalid phonenumber used");
    let keyboard = env.messenger.last_markup_to(CHAT).unwrap();
    assert_eq!(keyboard.labels(), vec![vec!["Add 📱".to_string()]]);
}

#[tokio::test]
async fn test_taken_phone_is_rejected() {
    let env = TestEnvironment::new();
    env.register(9000, "Existing", "+251911223344", UserCategory::Agent);

    env.send(text_update(CHAT, "/start")).await;
    env.send(text_update(CHAT, "Acme")).await;
    env.messenger.clear();
    env.send(contact_update(CHAT, "0911223344")).await;

    assert_eq!(env.messenger.texts_to(CHAT)[0], "Phone number already exists");
    let temp_user = users::find_temp_user(&env.conn(), CHAT).unwrap().unwrap();
    assert_eq!(temp_user.stage, RegistrationStage::UserName);
}

#[tokio::test]
async fn test_phone_held_by_other_registrant_is_rejected() {
    let env = TestEnvironment::new();
    let other = CHAT + 1;
    for chat in [CHAT, other] {
        env.send(text_update(chat, "/start")).await;
        env.send(text_update(chat, "Acme")).await;
    }
    env.send(contact_update(other, "0911223344")).await;
    env.messenger.clear();

    env.send(contact_update(CHAT, "0911223344")).await;

    assert_eq!(env.messenger.texts_to(CHAT)[0], "Phone number already exists");
}

#[tokio::test]
async fn test_invalid_category_keeps_previous_fields() {
    let env = TestEnvironment::new();
    env.send(text_update(CHAT, "/start")).await;
    env.send(text_update(CHAT, "Acme")).await;
    env.send(contact_update(CHAT, "0911223344")).await;
    env.messenger.clear();

    env.send(text_update(CHAT, "Recruiter")).await;

    let temp_user = users::find_temp_user(&env.conn(), CHAT).unwrap().unwrap();
    assert_eq!(temp_user.stage, RegistrationStage::PhoneNumber);
    assert_eq!(temp_user.user_name, "Acme");
    assert_eq!(temp_user.phone_number, "+251911223344");
    assert_eq!(
        env.messenger.texts_to(CHAT),
        vec!["Invalid category selected", "You wish to be categorized as ?"]
    );
    assert!(clients::find_client_by_telegram_id(&env.conn(), CHAT).unwrap().is_none());
}

#[tokio::test]
async fn test_failed_client_binding_removes_new_user() {
    let env = TestEnvironment::new();
    env.send(text_update(CHAT, "/start")).await;
    env.send(text_update(CHAT, "Acme")).await;
    env.send(contact_update(CHAT, "0911223344")).await;
    env.conn()
        .execute_batch(
            "CREATE TRIGGER reject_clients BEFORE INSERT ON clients
             BEGIN SELECT RAISE(ABORT, 'clients unavailable'); END;",
        )
        .unwrap();
    env.messenger.clear();

    env.send(text_update(CHAT, "አሰሪ")).await;

    let conn = env.conn();
    let users_left: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0)).unwrap();
    assert_eq!(users_left, 0);
    assert!(clients::find_client_by_telegram_id(&conn, CHAT).unwrap().is_none());

    let temp_user = users::find_temp_user(&conn, CHAT).unwrap().unwrap();
    assert_eq!(temp_user.stage, RegistrationStage::PhoneNumber);
    assert_eq!(temp_user.phone_number, "+251911223344");
    assert_eq!(
        env.messenger.texts_to(CHAT),
        vec!["❌ Error unable to add new user!", "Re-select category"]
    );
}

#[tokio::test]
async fn test_stray_callback_from_unknown_sender_is_ignored() {
    let env = TestEnvironment::new();

    env.send(common::callback_update(CHAT, "job/view/JB-1")).await;

    assert!(env.messenger.calls().is_empty());
    assert!(users::find_temp_user(&env.conn(), CHAT).unwrap().is_none());
}
