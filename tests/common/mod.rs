//! Common test utilities
//!
//! This module is shared across all integration tests

pub mod fixtures;
pub mod helpers;
pub mod recorder;

#[allow(unused_imports)]
pub use fixtures::TestEnvironment;
#[allow(unused_imports)]
pub use helpers::{callback_update, contact_update, document_update, text_update};
#[allow(unused_imports)]
pub use recorder::{ApiCall, RecordingMessenger};
