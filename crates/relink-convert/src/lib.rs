pub mod api;
pub mod clipboard;
pub mod controller;
pub mod request;
pub mod state;

pub use api::{BackendClient, ConversionBackend};
pub use clipboard::{Clipboard, LINUX_CLIPBOARD_HOLD, SystemClipboard};
pub use controller::Controller;
pub use request::ConversionRequest;
pub use state::{COPY_RESET, ConverterState, Effect, Event, FailureKind, RequestState};
