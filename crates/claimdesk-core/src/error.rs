//! Typed failure taxonomy for the claimdesk core.
//!
//! Every rule violation in the lifecycle engine, feedback workflow, and
//! directory is detected before any write and surfaced as one of these
//! variants. Callers translate them into rejection responses; none is fatal
//! to the process.

use crate::model::claim::Status;

/// Result alias used throughout the core.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All claimdesk core failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Any lifecycle mutation attempted on a resolved claim.
    #[error("claim is resolved and no longer accepts lifecycle changes")]
    ClaimClosed,

    /// Status change not on the allowed edge set.
    #[error("status transition {from} -> {to} is not allowed")]
    InvalidTransition {
        /// Status the claim currently holds.
        from: Status,
        /// Requested target status.
        to: Status,
    },

    /// Transition to resolved without a resolution description.
    #[error("resolving a claim requires a resolution description")]
    MissingResolution,

    /// Target area missing or inactive.
    #[error("area {area_id} not found or inactive")]
    AreaUnavailable { area_id: i64 },

    /// Re-routing an already-assigned claim without a reason.
    #[error("reassigning a claim to a different area requires a reason")]
    ReasonRequired,

    /// Action log entry with a blank description.
    #[error("action log entries require a non-blank description")]
    MissingDescription,

    /// Claim creation attempted by a non-client account.
    #[error("claims are opened by clients")]
    ClientRequired,

    #[error("claim {claim_id} not found")]
    ClaimNotFound { claim_id: i64 },

    /// Feedback submitted by a client that does not own the claim.
    #[error("claim belongs to a different client")]
    NotOwner,

    /// Feedback submitted while the claim is still in intake.
    #[error("feedback is not accepted until work on the claim has started")]
    FeedbackNotAllowed,

    /// Rating submitted before the claim is resolved.
    #[error("ratings are only accepted once the claim is resolved")]
    RatingNotAllowedYet,

    /// Progress feedback with a blank message.
    #[error("progress feedback requires a comment")]
    CommentRequired,

    /// A final rating already exists for the claim.
    #[error("claim has already received its final rating")]
    AlreadyRated,

    /// Final rating missing or outside 1..=5.
    #[error("rating must be an integer between 1 and 5")]
    InvalidRating,

    /// Area deactivation blocked by active employees.
    #[error("area {area_id} still has {employees} active employee(s)")]
    AreaHasEmployees { area_id: i64, employees: i64 },

    /// Unique-constraint violation on user email, area name, or sub-area name.
    #[error("name '{name}' is already taken")]
    DuplicateName { name: String },

    #[error("area {area_id} not found")]
    AreaNotFound { area_id: i64 },

    #[error("sub-area {sub_area_id} not found")]
    SubAreaNotFound { sub_area_id: i64 },

    #[error("user {user_id} not found")]
    UserNotFound { user_id: i64 },

    #[error("project {project_id} not found")]
    ProjectNotFound { project_id: i64 },

    /// Backfill target event missing from the audit log.
    #[error("event {event_id} not found")]
    EventNotFound { event_id: i64 },

    /// Underlying SQLite failure.
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Event details payload failed to (de)serialize.
    #[error("event details payload error: {0}")]
    Payload(#[from] serde_json::Error),

    /// Config file could not be parsed.
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
