//! Async driver for a viewing session
//!
//! `Session` pairs a crawl service with a shared `ViewState`. Submitting
//! returns a future for the fetch; the state lock is never held across an
//! await, and completion goes through `ViewState::complete`, so a response that
//! arrives after a newer submit or a reset is dropped.

use crate::client::CrawlService;
use crate::config::{DefaultsConfig, RequestConfig, RequestForm};
use crate::controller::state::{Completion, PendingRequest, ViewState};
use crate::ValidationError;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One viewing session over a crawl service
pub struct Session<S> {
    service: Arc<S>,
    state: Arc<Mutex<ViewState>>,
}

impl<S> Clone for Session<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: CrawlService + 'static> Session<S> {
    /// Creates an idle session
    pub fn new(service: S, defaults: DefaultsConfig) -> Self {
        Self {
            service: Arc::new(service),
            state: Arc::new(Mutex::new(ViewState::new(defaults))),
        }
    }

    /// Runs `f` against the current state
    pub fn with_state<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        f(&lock_state(&self.state))
    }

    /// Returns a copy of the current state
    pub fn snapshot(&self) -> ViewState {
        lock_state(&self.state).clone()
    }

    /// Edits the request form
    pub fn update_form(&self, f: impl FnOnce(&mut RequestForm)) {
        f(lock_state(&self.state).form_mut());
    }

    /// Submits the current form and returns the fetch to drive
    ///
    /// The state is already `Loading` when this returns, before the future is
    /// first polled. The returned future performs the request and applies its
    /// outcome; it can be awaited directly or spawned.
    ///
    /// Dropping the future without driving it to completion leaves the state
    /// `Loading` with the request still outstanding. A later submit supersedes
    /// it and `reset` discards it.
    pub fn submit(
        &self,
    ) -> Result<impl Future<Output = Completion> + Send + 'static, ValidationError> {
        let pending = lock_state(&self.state).submit()?;
        Ok(self.drive(pending))
    }

    /// Submits a prepared config and returns the fetch to drive
    ///
    /// Same state contract as [`Session::submit`].
    pub fn submit_config(
        &self,
        config: RequestConfig,
    ) -> impl Future<Output = Completion> + Send + 'static {
        let pending = lock_state(&self.state).submit_config(config);
        self.drive(pending)
    }

    /// Submits the current form and waits for the outcome
    pub async fn run(&self) -> Result<Completion, ValidationError> {
        Ok(self.submit()?.await)
    }

    /// Returns the session to `Idle`
    pub fn reset(&self) {
        lock_state(&self.state).reset();
    }

    /// Flips the expanded state of one row
    pub fn toggle(&self, index: usize) -> bool {
        lock_state(&self.state).toggle(index)
    }

    fn drive(&self, pending: PendingRequest) -> impl Future<Output = Completion> + Send + 'static {
        let service = Arc::clone(&self.service);
        let state = Arc::clone(&self.state);

        async move {
            let outcome = service.fetch_report(&pending.config).await;
            let completion = lock_state(&state).complete(pending.id, outcome);
            completion
        }
    }
}

/// Locks the state, recovering it if a previous holder panicked
fn lock_state(state: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
