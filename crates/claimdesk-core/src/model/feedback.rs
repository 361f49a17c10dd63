//! Client feedback messages: the running conversation about a claim's
//! resolution. Kept out of the audit timeline by design.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::ParseEnumError;

/// The two kinds of feedback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    /// Mid-flight comment while the claim is in progress. Never carries a
    /// rating.
    Progress,
    /// One-time closing message once the claim is resolved. Always carries a
    /// rating; at most one per claim.
    Final,
}

impl FeedbackKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Progress => "progress",
            Self::Final => "final",
        }
    }
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "progress" => Ok(Self::Progress),
            "final" => Ok(Self::Final),
            _ => Err(ParseEnumError {
                raw: s.to_string(),
                expected: "progress, final",
            }),
        }
    }
}

/// One entry in the client/system conversation about a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMessage {
    pub id: i64,
    pub claim_id: i64,
    pub client_id: i64,
    pub message: Option<String>,
    /// 1..=5; present on `final` messages, absent on `progress`.
    pub rating: Option<i64>,
    pub kind: FeedbackKind,
    pub created_at_us: i64,
}
