//! Overflow policies for the asynchronous sink queue
//!
//! When an `AsyncSink` queue is full, the policy decides what happens to the
//! event being handed over.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Policy for handling a full async sink queue
///
/// # Example
///
/// ```
/// use rust_structured_logger::OverflowPolicy;
/// use std::time::Duration;
///
/// // Default behavior: wait for room
/// let policy = OverflowPolicy::default();
///
/// // Block with timeout
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Block until space is available
    ///
    /// Every event is kept; a slow inner sink slows the emitter down.
    #[default]
    Block,

    /// Block with timeout, then drop
    BlockWithTimeout(Duration),

    /// Drop the new event when the queue is full
    ///
    /// Dropped events are counted and reported through the overflow callback.
    DropNewest,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
        }
    }
}

/// Callback type for overflow notifications
///
/// The parameter is the total count of dropped events so far.
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;
