//! View state and its transitions
//!
//! All request-related state lives in one struct so that no transition can
//! leave, say, a fresh report paired with a stale expansion set. Transitions
//! are plain synchronous methods; the async side lives in `Session`.

use crate::codec::{decode, Report, ReportRow};
use crate::config::{DefaultsConfig, RequestConfig, RequestForm};
use crate::controller::expansion::ExpansionSet;
use crate::controller::lifecycle::{RequestId, RequestLifecycle};
use crate::{ReportError, ValidationError};
use chrono::Utc;

/// A request that has been issued and not yet completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: RequestId,
    pub config: RequestConfig,
}

/// What happened to a completed response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The response belonged to the outstanding request and was applied
    Applied,
    /// The response belonged to a superseded or reset request and was dropped
    Discarded,
}

/// The full state of one viewing session
#[derive(Debug, Clone)]
pub struct ViewState {
    defaults: DefaultsConfig,
    form: RequestForm,
    lifecycle: RequestLifecycle,
    expansion: ExpansionSet,
    pending: Option<RequestId>,
    last_issued: u64,
}

impl ViewState {
    /// Creates an idle state whose form starts at `defaults`
    pub fn new(defaults: DefaultsConfig) -> Self {
        Self {
            form: RequestForm::new(&defaults),
            defaults,
            lifecycle: RequestLifecycle::Idle,
            expansion: ExpansionSet::default(),
            pending: None,
            last_issued: 0,
        }
    }

    pub fn form(&self) -> &RequestForm {
        &self.form
    }

    /// Mutable access to the editable fields
    ///
    /// Edits never affect a request that has already been issued.
    pub fn form_mut(&mut self) -> &mut RequestForm {
        &mut self.form
    }

    pub fn lifecycle(&self) -> &RequestLifecycle {
        &self.lifecycle
    }

    pub fn expansion(&self) -> &ExpansionSet {
        &self.expansion
    }

    /// The held report, if any
    pub fn report(&self) -> Option<&Report> {
        self.lifecycle.report()
    }

    /// Rows of the held report; empty unless the last request succeeded
    pub fn rows(&self) -> &[ReportRow] {
        self.report().map(Report::rows).unwrap_or(&[])
    }

    /// Error text of the last failed request
    pub fn error(&self) -> Option<&str> {
        self.lifecycle.error()
    }

    pub fn is_loading(&self) -> bool {
        self.lifecycle.is_loading()
    }

    /// Whether the submit control is enabled
    pub fn can_submit(&self) -> bool {
        !self.is_loading()
    }

    /// The outstanding request id, if one is in flight
    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    /// Submits the current form
    ///
    /// Clears any held report, error and expansion, enters `Loading` and issues
    /// a new request id. A form that fails validation moves the state to
    /// `Failed` instead and nothing is issued.
    pub fn submit(&mut self) -> Result<PendingRequest, ValidationError> {
        match self.form.snapshot() {
            Ok(config) => Ok(self.submit_config(config)),
            Err(e) => {
                tracing::warn!("Rejected crawl request: {}", e);
                self.pending = None;
                self.expansion.reset(0);
                self.lifecycle = RequestLifecycle::Failed {
                    message: ReportError::Validation(e.clone()).to_string(),
                };
                Err(e)
            }
        }
    }

    /// Submits an already validated config
    ///
    /// The form is updated to show the submitted values. If a request is
    /// already outstanding it is superseded: its response will be discarded.
    /// The state stays `Loading` until `complete` is called with the returned
    /// id, or until a reset or another submit.
    pub fn submit_config(&mut self, config: RequestConfig) -> PendingRequest {
        if let Some(stale) = self.pending {
            tracing::debug!("Request {} superseded by a new submit", stale);
        }

        self.form.set_url(config.target_url());
        self.form.set_max_concurrency(config.max_concurrency());
        self.form.set_max_pages(config.max_pages());

        self.last_issued += 1;
        let id = RequestId::new(self.last_issued);
        self.pending = Some(id);
        self.expansion.reset(0);
        self.lifecycle = RequestLifecycle::Loading;

        tracing::debug!("Issued request {} for {}", id, config.target_url());
        PendingRequest { id, config }
    }

    /// Applies the outcome of request `id`
    ///
    /// Outcomes for anything but the outstanding request are dropped without
    /// touching the state. A payload is decoded in full; any decode error fails
    /// the request and no rows are kept.
    pub fn complete(&mut self, id: RequestId, outcome: Result<String, ReportError>) -> Completion {
        if self.pending != Some(id) {
            tracing::debug!("Discarding response for stale request {}", id);
            return Completion::Discarded;
        }
        self.pending = None;

        let decoded = outcome.and_then(|payload| decode(&payload).map_err(ReportError::from));
        match decoded {
            Ok(report) => {
                tracing::info!("Request {} succeeded with {} rows", id, report.len());
                self.expansion.reset(report.len());
                self.lifecycle = RequestLifecycle::Succeeded {
                    report,
                    fetched_at: Utc::now(),
                };
            }
            Err(e) => {
                if e.is_decode() {
                    tracing::warn!("Request {} returned an unreadable payload: {}", id, e);
                } else {
                    tracing::warn!("Request {} failed: {}", id, e);
                }
                self.expansion.reset(0);
                self.lifecycle = RequestLifecycle::Failed {
                    message: e.to_string(),
                };
            }
        }

        Completion::Applied
    }

    /// Returns to `Idle` with default form values and no report
    ///
    /// Any outstanding request keeps running, but its response will be
    /// discarded.
    pub fn reset(&mut self) {
        if let Some(stale) = self.pending.take() {
            tracing::debug!("Reset while request {} was outstanding", stale);
        }
        self.form = RequestForm::new(&self.defaults);
        self.expansion.reset(0);
        self.lifecycle = RequestLifecycle::Idle;
        tracing::debug!("View state reset");
    }

    /// Flips the expanded state of one row
    pub fn toggle(&mut self, index: usize) -> bool {
        self.expansion.toggle(index)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DefaultsConfig::default())
    }
}
