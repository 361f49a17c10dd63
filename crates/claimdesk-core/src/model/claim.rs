//! Claim entity: the current-state document for one customer-reported issue.
//!
//! The historical record lives in the audit log (`claim_events`); this struct
//! is only the snapshot. All lifecycle mutations go through the engine.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::ParseEnumError;

/// The three lifecycle states of a claim.
///
/// Initial state is `Intake`; `Resolved` is terminal. Once resolved, a claim
/// is immutable to further lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Intake,
    InProgress,
    Resolved,
}

impl Status {
    /// All states in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Intake, Self::InProgress, Self::Resolved];

    /// Canonical snake_case string form, as stored in SQLite.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }

    /// Whether moving from `self` to `target` is on the allowed edge set.
    ///
    /// Valid transitions:
    /// - `intake -> in_progress` (start work)
    /// - `in_progress -> resolved` (resolve)
    ///
    /// A same-state "transition" is handled by the engine as a permitted
    /// no-op and never reaches this check.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Intake, Self::InProgress) | (Self::InProgress, Self::Resolved)
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intake" => Ok(Self::Intake),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            _ => Err(ParseEnumError {
                raw: s.to_string(),
                expected: "intake, in_progress, resolved",
            }),
        }
    }
}

/// Claim priority, set by staff. Any value is reachable from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseEnumError {
                raw: s.to_string(),
                expected: "low, medium, high",
            }),
        }
    }
}

/// Impact severity reported at intake. Optional on a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    S1Critical,
    S2High,
    S3Medium,
    S4Low,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S1Critical => "s1_critical",
            Self::S2High => "s2_high",
            Self::S3Medium => "s3_medium",
            Self::S4Low => "s4_low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s1_critical" => Ok(Self::S1Critical),
            "s2_high" => Ok(Self::S2High),
            "s3_medium" => Ok(Self::S3Medium),
            "s4_low" => Ok(Self::S4Low),
            _ => Err(ParseEnumError {
                raw: s.to_string(),
                expected: "s1_critical, s2_high, s3_medium, s4_low",
            }),
        }
    }
}

/// Optional file attachment captured at claim creation.
///
/// Only the reference is stored here; upload handling lives outside the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Storage path of the uploaded file.
    pub path: String,
    /// Original file name shown to users.
    pub name: String,
}

/// The current-state snapshot for one claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Store-generated id.
    pub id: i64,
    pub project_id: i64,
    /// Free-text claim category supplied by the client.
    pub claim_type: String,
    pub priority: Priority,
    pub severity: Option<Severity>,
    pub description: String,
    pub status: Status,
    /// Area the claim is currently routed to, if any. When set, the area
    /// must be active.
    pub area_id: Option<i64>,
    /// Free text; not cross-validated against the area's sub-area list.
    pub sub_area: Option<String>,
    /// Required once the claim reaches `resolved`.
    pub resolution_description: Option<String>,
    /// Final client rating in 1..=5, set once via the feedback workflow.
    pub client_rating: Option<i64>,
    /// Final client feedback text, set once via the feedback workflow.
    pub client_feedback: Option<String>,
    pub attachment: Option<Attachment>,
    /// The client that opened the claim.
    pub created_by: i64,
    pub created_at_us: i64,
    pub updated_at_us: i64,
    pub resolved_at_us: Option<i64>,
}
