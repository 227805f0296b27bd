//! Test fixtures for end-to-end handler tests
//!
//! Provides TestEnvironment that sets up everything a webhook update needs:
//! - A fresh SQLite database in a temp directory, migrated and seeded with catalogs
//! - A recording messenger instead of the Bot API
//! - A push queue without a running worker

#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;
use tokio::sync::mpsc;

use jobboard::core::config::{BotConfig, PushSettings};
use jobboard::core::types::{AttributeKind, CatalogEntry, Client, Job, User, UserCategory};
use jobboard::push::{PushQueue, PushWorker};
use jobboard::storage::{catalog, clients, create_pool, get_connection, jobs, users, DbConnection, DbPool};
use jobboard::telegram::api::Messenger;
use jobboard::telegram::types::Update;
use jobboard::telegram::{handle_update, HandlerDeps};

use super::recorder::RecordingMessenger;

/// Complete test environment
///
/// # Example
/// ```ignore
/// let env = TestEnvironment::new();
/// let seeker = env.register(100, "Abebe", "+251911000100", UserCategory::JobSeeker);
///
/// env.send(text_update(100, "⚙️ Settings")).await;
///
/// assert_eq!(env.cursor(&seeker.id), "Settings");
/// ```
pub struct TestEnvironment {
    pub deps: HandlerDeps,
    pub messenger: Arc<RecordingMessenger>,
    pub db_pool: Arc<DbPool>,
    pub push_queue: Arc<PushQueue>,

    pub tech: CatalogEntry,
    pub health: CatalogEntry,
    pub full_time: CatalogEntry,
    pub ba: CatalogEntry,
    pub msc: CatalogEntry,

    /// Kept so signals do not hit a closed channel
    _wake: mpsc::Receiver<()>,
    _dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self::with_push_settings(PushSettings {
            batch_size: 16,
            pause_secs: 0,
        })
    }

    pub fn with_push_settings(push: PushSettings) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobboard-test.sqlite");
        let db_pool = Arc::new(create_pool(path.to_str().unwrap()).unwrap());

        let (tech, health, full_time, ba, msc) = {
            let conn = get_connection(&db_pool).unwrap();
            (
                catalog::add_attribute(&conn, AttributeKind::Sector, "Tech").unwrap(),
                catalog::add_attribute(&conn, AttributeKind::Sector, "Health").unwrap(),
                catalog::add_attribute(&conn, AttributeKind::JobType, "FullTime").unwrap(),
                catalog::add_attribute(&conn, AttributeKind::EducationLevel, "BA").unwrap(),
                catalog::add_attribute(&conn, AttributeKind::EducationLevel, "MSc").unwrap(),
            )
        };

        let messenger = Arc::new(RecordingMessenger::new());
        let (queue, wake) = PushQueue::new(Some(Arc::clone(&db_pool)));
        let push_queue = Arc::new(queue);
        let config = BotConfig {
            push,
            ..BotConfig::default()
        };

        let deps = HandlerDeps::new(
            Arc::clone(&db_pool),
            Arc::clone(&messenger) as Arc<dyn Messenger>,
            Arc::clone(&push_queue),
            Arc::new(config),
        );

        Self {
            deps,
            messenger,
            db_pool,
            push_queue,
            tech,
            health,
            full_time,
            ba,
            msc,
            _wake: wake,
            _dir: dir,
        }
    }

    pub fn conn(&self) -> DbConnection {
        get_connection(&self.db_pool).unwrap()
    }

    /// Feeds one update through the dispatcher.
    pub async fn send(&self, update: Update) {
        handle_update(&self.deps, &update).await;
    }

    /// Registers a user directly in storage, bypassing the chat flow.
    pub fn register(&self, telegram_id: i64, name: &str, phone: &str, category: UserCategory) -> User {
        let user = User {
            id: format!("UR-{}", telegram_id),
            user_name: name.to_string(),
            phone_number: phone.to_string(),
            category,
        };
        let conn = self.conn();
        users::add_user(&conn, &user).unwrap();
        clients::add_client(
            &conn,
            &Client {
                user_id: user.id.clone(),
                telegram_id,
                prev_command: String::new(),
            },
        )
        .unwrap();
        user
    }

    pub fn add_job(&self, job: &Job) {
        jobs::add_job(&self.conn(), job).unwrap();
    }

    /// Stored cursor label of a user's chat.
    pub fn cursor(&self, user_id: &str) -> String {
        clients::find_client_by_user_id(&self.conn(), user_id)
            .unwrap()
            .unwrap()
            .prev_command
    }

    pub fn set_cursor(&self, user_id: &str, label: &str) {
        clients::set_prev_command(&self.conn(), user_id, label).unwrap();
    }

    pub fn worker(&self) -> PushWorker {
        PushWorker::new(
            Arc::clone(&self.push_queue),
            Arc::clone(&self.messenger) as Arc<dyn Messenger>,
            self.deps.config.push.clone(),
        )
    }
}
