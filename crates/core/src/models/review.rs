//! Product reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, ReviewId, UserId};

/// A shopper review with an optional admin reply.
///
/// The review body is never edited after submission; only `admin_reply`
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    /// Username at the time of writing.
    pub user_name: String,
    /// Weak reference.
    pub product_id: ProductId,
    pub text: String,
    /// Expected 1-5, stored as sent.
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub admin_reply: Option<String>,
}

/// Review submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub user_id: UserId,
    pub user_name: String,
    pub product_id: ProductId,
    pub text: String,
    pub rating: i32,
}

impl NewReview {
    /// Build the stored review. No field is validated.
    #[must_use]
    pub fn into_review(self, id: ReviewId, created_at: DateTime<Utc>) -> Review {
        Review {
            id,
            user_id: self.user_id,
            user_name: self.user_name,
            product_id: self.product_id,
            text: self.text,
            rating: self.rating,
            created_at,
            admin_reply: None,
        }
    }
}

/// Admin reply body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminReply {
    pub admin_reply: String,
}

/// Reviews written by one user, newest first (profile page order).
#[must_use]
pub fn reviews_by_user(reviews: &[Review], user_id: UserId) -> Vec<&Review> {
    reviews
        .iter()
        .rev()
        .filter(|review| review.user_id == user_id)
        .collect()
}
