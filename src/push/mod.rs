//! Rate-limited delivery of subscriber notifications.

pub mod drain;
pub mod queue;

pub use drain::{PassStats, PushWorker};
pub use queue::{PushQueue, PushRequest};
