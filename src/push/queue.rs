//! Pending subscriber notifications.
//!
//! Producers (the subscriber fan-out) append with [`PushQueue::enqueue`] and
//! then call [`PushQueue::signal`]; the single drain worker owns the wake
//! receiver. When a database pool is attached every request is mirrored
//! into `push_requests` so a restart resumes delivery.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::core::config::push::WAKE_CHANNEL_CAPACITY;
use crate::core::error::AppResult;
use crate::storage::{get_connection, push as push_store, DbPool};
use crate::telegram::keyboards::Markup;

/// One message waiting to be delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRequest {
    /// Row id in `push_requests`, set once persisted
    pub stored_id: Option<i64>,
    pub chat_id: i64,
    /// Rendered HTML body
    pub body: String,
    pub markup: Option<Markup>,
}

impl PushRequest {
    pub fn new(chat_id: i64, body: impl Into<String>, markup: Option<Markup>) -> Self {
        Self {
            stored_id: None,
            chat_id,
            body: body.into(),
            markup,
        }
    }
}

/// Shared FIFO of push requests
pub struct PushQueue {
    items: Mutex<VecDeque<PushRequest>>,
    wake: mpsc::Sender<()>,
    db_pool: Option<Arc<DbPool>>,
}

impl PushQueue {
    /// Creates the queue and the receiver the drain worker listens on.
    pub fn new(db_pool: Option<Arc<DbPool>>) -> (Self, mpsc::Receiver<()>) {
        let (wake, receiver) = mpsc::channel(WAKE_CHANNEL_CAPACITY);
        let queue = Self {
            items: Mutex::new(VecDeque::new()),
            wake,
            db_pool,
        };
        (queue, receiver)
    }

    /// Appends requests in order. Persistence failures are logged and the
    /// request is still queued in memory.
    pub async fn enqueue(&self, requests: Vec<PushRequest>) {
        if requests.is_empty() {
            return;
        }

        let mut stored = Vec::with_capacity(requests.len());
        for mut request in requests {
            if request.stored_id.is_none() {
                request.stored_id = self.persist(&request);
            }
            stored.push(request);
        }

        let mut items = self.items.lock().await;
        let count = stored.len();
        items.extend(stored);
        log::debug!("Queued {} push request(s), {} pending", count, items.len());
    }

    /// Wakes the drain worker. A full wake channel already guarantees a drain.
    pub fn signal(&self) {
        if let Err(mpsc::error::TrySendError::Closed(_)) = self.wake.try_send(()) {
            log::warn!("Push worker is not running; requests stay queued");
        }
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    /// Copy of the request at `index`, if any.
    pub(crate) async fn get(&self, index: usize) -> Option<PushRequest> {
        self.items.lock().await.get(index).cloned()
    }

    /// Removes the request at `index` from memory and from the store.
    pub(crate) async fn remove(&self, index: usize) -> Option<PushRequest> {
        let removed = self.items.lock().await.remove(index);
        if let Some(id) = removed.as_ref().and_then(|request| request.stored_id) {
            self.forget(id);
        }
        removed
    }

    /// Reloads requests left over from a previous run. Returns how many were queued.
    pub async fn restore(&self) -> AppResult<usize> {
        let Some(pool) = &self.db_pool else {
            return Ok(0);
        };
        let conn = get_connection(pool)?;
        let restored: Vec<PushRequest> = push_store::load_push_requests(&conn)?
            .into_iter()
            .map(|stored| PushRequest {
                stored_id: Some(stored.id),
                chat_id: stored.chat_id,
                markup: stored.markup.as_deref().and_then(|json| match Markup::from_json(json) {
                    Ok(markup) => Some(markup),
                    Err(e) => {
                        log::warn!("Dropping unreadable markup of push request {}: {}", stored.id, e);
                        None
                    }
                }),
                body: stored.body,
            })
            .collect();

        let count = restored.len();
        self.items.lock().await.extend(restored);
        if count > 0 {
            log::info!("Restored {} pending push request(s)", count);
        }
        Ok(count)
    }

    fn persist(&self, request: &PushRequest) -> Option<i64> {
        let pool = self.db_pool.as_ref()?;
        let markup = match request.markup.as_ref().map(Markup::to_json).transpose() {
            Ok(markup) => markup,
            Err(e) => {
                log::error!("Failed to serialize push markup for chat {}: {}", request.chat_id, e);
                None
            }
        };
        let result = get_connection(pool)
            .map_err(Into::into)
            .and_then(|conn| push_store::insert_push_request(&conn, request.chat_id, &request.body, markup.as_deref()));
        match result {
            Ok(id) => Some(id),
            Err(e) => {
                log::error!("Failed to persist push request for chat {}: {}", request.chat_id, e);
                None
            }
        }
    }

    fn forget(&self, id: i64) {
        let Some(pool) = &self.db_pool else {
            return;
        };
        let result = get_connection(pool)
            .map_err(Into::into)
            .and_then(|conn| push_store::delete_push_request(&conn, id));
        if let Err(e) = result {
            log::error!("Failed to delete push request {}: {}", id, e);
        }
    }
}
