//! claimdesk-core library.
//!
//! Core of the claim tracker: entity model, append-only audit log, the
//! lifecycle engine that validates transitions and dual-writes snapshot
//! plus events, the client feedback workflow, and the timeline reader.
//!
//! # Conventions
//!
//! - **Errors**: operations return [`Result`] with the crate-level
//!   [`Error`] taxonomy; callers at the binary edge may wrap in `anyhow`.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).
//! - **Time**: all timestamps are `i64` microseconds since the Unix epoch,
//!   in fields suffixed `_at_us`.

pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod event;
pub mod feedback;
pub mod model;
pub mod store;
pub mod timeline;

pub use error::{Error, Result};
pub use event::{Action, ClaimEvent, EventDetails, Visibility};
pub use model::area::{Area, SubArea};
pub use model::claim::{Attachment, Claim, Priority, Severity, Status};
pub use model::feedback::{FeedbackKind, FeedbackMessage};
pub use model::project::Project;
pub use model::user::{Role, User};
pub use store::Store;
