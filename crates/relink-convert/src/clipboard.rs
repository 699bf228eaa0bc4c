use std::time::{Duration, Instant};

use relink_core::{RelinkError, RelinkResult};

/// How long a write keeps serving the clipboard on Linux, where the contents
/// vanish once the owning process exits. The wait ends early as soon as
/// another owner (a clipboard manager or a new copy) takes over.
pub const LINUX_CLIPBOARD_HOLD: Duration = Duration::from_secs(15);

/// Text clipboard used by the paste and copy actions.
pub trait Clipboard {
    fn read_text(&mut self) -> RelinkResult<String>;
    fn write_text(&mut self, text: &str) -> RelinkResult<()>;
}

/// The desktop clipboard.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
    hold: Duration,
}

impl SystemClipboard {
    pub fn new() -> RelinkResult<Self> {
        let inner = arboard::Clipboard::new()
            .map_err(|err| RelinkError::Clipboard(format!("failed to open clipboard: {err}")))?;
        Ok(Self {
            inner,
            hold: LINUX_CLIPBOARD_HOLD,
        })
    }

    /// Overrides how long Linux writes keep ownership of the selection.
    pub fn with_hold(mut self, hold: Duration) -> Self {
        self.hold = hold;
        self
    }

    pub fn hold(&self) -> Duration {
        self.hold
    }
}

impl Clipboard for SystemClipboard {
    fn read_text(&mut self) -> RelinkResult<String> {
        self.inner
            .get_text()
            .map_err(|err| RelinkError::Clipboard(format!("failed to read from clipboard: {err}")))
    }

    #[cfg(target_os = "linux")]
    fn write_text(&mut self, text: &str) -> RelinkResult<()> {
        use arboard::SetExtLinux;

        self.inner
            .set()
            .wait_until(hold_deadline(Instant::now(), self.hold))
            .text(text)
            .map_err(|err| RelinkError::Clipboard(format!("failed to copy to clipboard: {err}")))
    }

    #[cfg(not(target_os = "linux"))]
    fn write_text(&mut self, text: &str) -> RelinkResult<()> {
        self.inner
            .set_text(text)
            .map_err(|err| RelinkError::Clipboard(format!("failed to copy to clipboard: {err}")))
    }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn hold_deadline(now: Instant, hold: Duration) -> Instant {
    now.checked_add(hold).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{LINUX_CLIPBOARD_HOLD, hold_deadline};

    #[test]
    fn holds_ownership_past_process_exit_window() {
        let now = Instant::now();
        assert_eq!(
            hold_deadline(now, LINUX_CLIPBOARD_HOLD),
            now + LINUX_CLIPBOARD_HOLD
        );
        assert!(LINUX_CLIPBOARD_HOLD > Duration::ZERO);
    }

    #[test]
    fn zero_hold_returns_immediately() {
        let now = Instant::now();
        assert_eq!(hold_deadline(now, Duration::ZERO), now);
    }
}
