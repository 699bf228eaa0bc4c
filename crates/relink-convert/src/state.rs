use std::time::Duration;

use relink_core::{RelinkError, RelinkResult};
use tracing::debug;

/// How long the copied indicator stays on after a successful copy.
pub const COPY_RESET: Duration = Duration::from_millis(2000);

/// Why a submission ended without a converted link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The link could not be addressed on the configured route.
    Unsupported,
    /// The backend could not be reached.
    Network,
    /// The backend answered with a non-success status.
    Status,
    /// The body was not the expected JSON.
    Parse,
    /// The body held no links.
    Empty,
    Other,
}

impl FailureKind {
    pub fn from_error(err: &RelinkError) -> Self {
        match err {
            RelinkError::UnsupportedInput(_)
            | RelinkError::MissingSegment { .. }
            | RelinkError::InvalidInput(_) => FailureKind::Unsupported,
            RelinkError::Network(_) => FailureKind::Network,
            RelinkError::Api { .. } => FailureKind::Status,
            RelinkError::Parse(_) => FailureKind::Parse,
            RelinkError::EmptyResponse => FailureKind::Empty,
            _ => FailureKind::Other,
        }
    }

    /// Short inline message for the presenter.
    pub fn describe(self) -> &'static str {
        match self {
            FailureKind::Unsupported => "this link can't be converted",
            FailureKind::Network => "couldn't reach the conversion service",
            FailureKind::Status => "the conversion service returned an error",
            FailureKind::Parse => "the conversion service sent an unreadable answer",
            FailureKind::Empty => "no matching link was found",
            FailureKind::Other => "conversion failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Succeeded {
        links: Vec<String>,
    },
    Failed {
        kind: FailureKind,
        message: String,
    },
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }
}

#[derive(Debug)]
pub enum Event {
    InputChanged(String),
    Submitted,
    Succeeded(Vec<String>),
    Failed { kind: FailureKind, message: String },
    Copied,
    CopyExpired { generation: u64 },
}

/// Follow-up work the caller must perform after a transition.
#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Issue the remote call for this link.
    Convert { link: String },
    /// Deliver `CopyExpired { generation }` after [`COPY_RESET`].
    ScheduleCopyReset { generation: u64 },
}

/// Presenter-facing state of one converter: the input text, the request
/// lifecycle and the copied indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConverterState {
    pub input: String,
    pub request: RequestState,
    pub copied: bool,
    copy_generation: u64,
}

impl ConverterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit is offered only for non-blank input while nothing is in flight.
    pub fn can_submit(&self) -> bool {
        !self.input.trim().is_empty() && !self.request.is_pending()
    }

    /// The link the presenter shows and copies.
    pub fn converted_link(&self) -> Option<&str> {
        match &self.request {
            RequestState::Succeeded { links } => links.first().map(String::as_str),
            _ => None,
        }
    }

    /// Applies one event. A rejected event leaves the state untouched.
    pub fn apply(&mut self, event: Event) -> RelinkResult<Effect> {
        match event {
            Event::InputChanged(text) => {
                self.input = text;
                Ok(Effect::None)
            }
            Event::Submitted => {
                if self.input.trim().is_empty() {
                    return Err(RelinkError::InvalidInput(
                        "please enter a streaming link".to_string(),
                    ));
                }
                if self.request.is_pending() {
                    return Err(RelinkError::Busy);
                }
                self.request = RequestState::Pending;
                debug!("request pending");
                Ok(Effect::Convert {
                    link: self.input.clone(),
                })
            }
            Event::Succeeded(links) => {
                if self.request.is_pending() {
                    debug!(count = links.len(), "request succeeded");
                    self.request = RequestState::Succeeded { links };
                }
                Ok(Effect::None)
            }
            Event::Failed { kind, message } => {
                if self.request.is_pending() {
                    debug!(?kind, "request failed");
                    self.request = RequestState::Failed { kind, message };
                }
                Ok(Effect::None)
            }
            Event::Copied => {
                self.copied = true;
                self.copy_generation += 1;
                Ok(Effect::ScheduleCopyReset {
                    generation: self.copy_generation,
                })
            }
            Event::CopyExpired { generation } => {
                // A later copy owns the indicator now.
                if generation == self.copy_generation {
                    self.copied = false;
                }
                Ok(Effect::None)
            }
        }
    }
}
