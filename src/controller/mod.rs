//! Request controller
//!
//! This module owns everything that changes while the user works with a report.
//!
//! # Components
//!
//! - `RequestLifecycle`: `Idle`, `Loading`, `Succeeded` or `Failed`
//! - `ExpansionSet`: which rows of the held report are expanded
//! - `ViewState`: form, lifecycle and expansion together, with the transitions
//!   `submit`, `complete`, `reset` and `toggle`
//! - `Session`: runs fetches against a `CrawlService` and applies their outcome
//!
//! # Transitions
//!
//! ```text
//! Idle ──submit──▶ Loading ──ok──▶ Succeeded ──reset──▶ Idle
//!                     │                 │
//!                     └──err──▶ Failed ─┴──submit──▶ Loading
//! ```

mod expansion;
mod lifecycle;
mod session;
mod state;

// Re-export main types
pub use expansion::ExpansionSet;
pub use lifecycle::{RequestId, RequestLifecycle};
pub use session::Session;
pub use state::{Completion, PendingRequest, ViewState};
