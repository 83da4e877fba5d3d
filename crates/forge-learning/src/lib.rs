//! # forge-learning
//!
//! Applies user corrections out of band: the correction is appended to the
//! correction history, and the graph-pattern entry it references (if any)
//! moves its confidence toward the reported outcome.

pub mod queue;
pub mod updater;

pub use queue::{Ack, FeedbackQueue, FeedbackStats};
pub use updater::{FeedbackReport, FeedbackUpdater};
