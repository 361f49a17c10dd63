//! Client feedback workflow.
//!
//! A small status-gated state machine layered on top of claims: while a
//! claim is in progress the owning client may leave progress comments; once
//! it is resolved they may rate it exactly once. Feedback lives in its own
//! collection and never produces audit events, so it stays out of the
//! timeline.

use tracing::info;

use crate::error::{Error, Result};
use crate::model::claim::{Claim, Status};
use crate::model::feedback::{FeedbackKind, FeedbackMessage};
use crate::store::Store;
use crate::store::entities::ClaimUpdates;

const RATING_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

/// Submit client feedback on a claim.
///
/// In-progress claims accept a comment (no rating); resolved claims accept
/// a one-time final rating with an optional comment, which is also copied
/// onto the claim snapshot. Returns the (possibly updated) snapshot and the
/// inserted message.
///
/// # Errors
///
/// [`Error::ClaimNotFound`], [`Error::NotOwner`],
/// [`Error::FeedbackNotAllowed`] (intake), [`Error::RatingNotAllowedYet`],
/// [`Error::CommentRequired`], [`Error::AlreadyRated`], or
/// [`Error::InvalidRating`].
pub fn submit_feedback(
    store: &Store,
    claim_id: i64,
    client_id: i64,
    rating: Option<i64>,
    feedback_text: Option<&str>,
) -> Result<(Claim, FeedbackMessage)> {
    let claim = store
        .get_claim(claim_id)?
        .ok_or(Error::ClaimNotFound { claim_id })?;
    if claim.created_by != client_id {
        return Err(Error::NotOwner);
    }

    let text = feedback_text.map(str::trim).filter(|t| !t.is_empty());

    match claim.status {
        Status::Intake => Err(Error::FeedbackNotAllowed),
        Status::InProgress => {
            if rating.is_some() {
                return Err(Error::RatingNotAllowedYet);
            }
            let text = text.ok_or(Error::CommentRequired)?;
            let message = store.insert_feedback_message(
                claim_id,
                client_id,
                Some(text),
                None,
                FeedbackKind::Progress,
            )?;
            info!(claim_id, client_id, "recorded progress feedback");
            Ok((claim, message))
        }
        Status::Resolved => {
            if store.find_final_feedback(claim_id)?.is_some() {
                return Err(Error::AlreadyRated);
            }
            let rating = rating
                .filter(|r| RATING_RANGE.contains(r))
                .ok_or(Error::InvalidRating)?;

            let message = store.in_write_txn(|| {
                let message = store.insert_feedback_message(
                    claim_id,
                    client_id,
                    text,
                    Some(rating),
                    FeedbackKind::Final,
                )?;
                store.persist_claim(
                    claim_id,
                    &ClaimUpdates {
                        client_rating: Some(rating),
                        client_feedback: text.map(String::from),
                        ..ClaimUpdates::default()
                    },
                )?;
                Ok(message)
            })?;

            info!(claim_id, client_id, rating, "recorded final rating");
            let claim = store
                .get_claim(claim_id)?
                .ok_or(Error::ClaimNotFound { claim_id })?;
            Ok((claim, message))
        }
    }
}

/// The full feedback conversation for a claim, oldest first.
///
/// # Errors
///
/// Returns [`Error::ClaimNotFound`] if the claim is absent.
pub fn list_feedback(store: &Store, claim_id: i64) -> Result<Vec<FeedbackMessage>> {
    if store.get_claim(claim_id)?.is_none() {
        return Err(Error::ClaimNotFound { claim_id });
    }
    store.list_feedback_messages(claim_id)
}
