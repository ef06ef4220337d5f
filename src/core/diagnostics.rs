//! Fallback channel for the logger's own failures
//!
//! Sink errors never reach the caller of a log statement; they are reported
//! here instead. The default channel writes to stderr.

use std::any::Any;
use std::sync::Arc;

/// Receives one diagnostic line per reported failure
pub type FallbackChannel = Arc<dyn Fn(&str) + Send + Sync>;

/// Fallback channel writing to standard error
pub fn stderr_channel() -> FallbackChannel {
    Arc::new(|line: &str| eprintln!("{}", line))
}

/// Extract a printable message from a caught panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_variants() {
        let caught = std::panic::catch_unwind(|| panic!("static message")).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "static message");

        let caught = std::panic::catch_unwind(|| panic!("formatted {}", 7)).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "formatted 7");

        let caught = std::panic::catch_unwind(|| std::panic::panic_any(42u8)).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "Unknown panic");
    }
}
