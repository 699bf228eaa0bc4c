use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use relink_config::Route;
use relink_core::{ConvertedLink, RelinkError, RelinkResult};
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::api::ConversionBackend;
use crate::clipboard::Clipboard;
use crate::request::ConversionRequest;
use crate::state::{COPY_RESET, ConverterState, Effect, Event, FailureKind};

/// Drives one converter: submissions go through the backend, paste and copy
/// go through a [`Clipboard`], and every change lands in a shared
/// [`ConverterState`] the presenter can snapshot at any time.
pub struct Controller<B> {
    backend: B,
    route: Route,
    state: Arc<Mutex<ConverterState>>,
}

impl<B: ConversionBackend> Controller<B> {
    pub fn new(backend: B, route: Route) -> Self {
        Self {
            backend,
            route,
            state: Arc::new(Mutex::new(ConverterState::new())),
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn state(&self) -> ConverterState {
        lock_state(&self.state).clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.dispatch(Event::InputChanged(text.into()));
    }

    /// Converts `raw_link`, holding the state in `Pending` for the duration
    /// of the remote call.
    ///
    /// Blank input and submissions while another request is pending are
    /// rejected without touching the state. Otherwise the state always leaves
    /// `Pending`, as `Succeeded` or `Failed`, and the same outcome is returned.
    /// There is no retry and no timeout.
    pub async fn submit(&self, raw_link: &str) -> RelinkResult<ConvertedLink> {
        let effect = {
            let mut state = lock_state(&self.state);
            let mut next = state.clone();
            next.input = raw_link.to_string();
            match next.apply(Event::Submitted) {
                Ok(effect) => {
                    *state = next;
                    effect
                }
                Err(err) => {
                    warn!(%err, "submission rejected");
                    return Err(err);
                }
            }
        };
        let Effect::Convert { link } = effect else {
            return Err(RelinkError::Busy);
        };

        let outcome = self.convert(&link).await;
        match &outcome {
            Ok(converted) => {
                self.dispatch(Event::Succeeded(converted.links.clone()));
            }
            Err(err) => {
                warn!(url = %link, %err, "conversion failed");
                self.dispatch(Event::Failed {
                    kind: FailureKind::from_error(err),
                    message: err.to_string(),
                });
            }
        }
        outcome
    }

    async fn convert(&self, link: &str) -> RelinkResult<ConvertedLink> {
        let request = ConversionRequest::build(link, self.route)?;
        let links = self.backend.convert(&request).await?;
        if links.is_empty() {
            return Err(RelinkError::EmptyResponse);
        }
        debug!(count = links.len(), "received converted links");
        Ok(ConvertedLink {
            source_url: request.source_url().to_string(),
            category: request.category(),
            source_platform: request.platform(),
            identifier: request.identifier().map(str::to_string),
            links,
        })
    }

    /// Replaces the input with the clipboard text.
    pub fn paste(&self, clipboard: &mut dyn Clipboard) -> RelinkResult<String> {
        let text = clipboard.read_text().inspect_err(|err| {
            warn!(%err, "failed to read from clipboard");
        })?;
        self.set_input(text.clone());
        Ok(text)
    }

    /// Writes the converted link to the clipboard and raises the copied flag
    /// for [`COPY_RESET`]. A copy before the flag drops restarts the delay.
    ///
    /// The reset runs on the current tokio runtime; without one nothing is
    /// written and `RelinkError::Runtime` is returned.
    pub fn copy(&self, clipboard: &mut dyn Clipboard) -> RelinkResult<String> {
        let runtime = Handle::try_current()
            .map_err(|err| RelinkError::Runtime(format!("copy needs a tokio runtime: {err}")))?;

        let link = self
            .state()
            .converted_link()
            .map(str::to_string)
            .ok_or_else(|| RelinkError::InvalidInput("no converted link to copy".to_string()))?;

        clipboard.write_text(&link).inspect_err(|err| {
            warn!(%err, "failed to copy to clipboard");
        })?;

        if let Effect::ScheduleCopyReset { generation } = self.dispatch(Event::Copied) {
            let state = Arc::clone(&self.state);
            runtime.spawn(async move {
                tokio::time::sleep(COPY_RESET).await;
                let _ = lock_state(&state).apply(Event::CopyExpired { generation });
            });
        }
        Ok(link)
    }

    fn dispatch(&self, event: Event) -> Effect {
        lock_state(&self.state)
            .apply(event)
            .unwrap_or(Effect::None)
    }
}

fn lock_state(state: &Mutex<ConverterState>) -> MutexGuard<'_, ConverterState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
