//! Reviews and admin replies.
//!
//! Reviews are append-only from the shopper's side. An administrator may
//! attach (or overwrite) a reply; nothing else about a review ever changes.

use chrono::Utc;
use thiserror::Error;

use flatstore_core::ReviewId;
use flatstore_core::models::{NewReview, Review};

use crate::db::{Collection, Database, RepositoryError};

/// Errors from review operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("review {0} not found")]
    NotFound(ReviewId),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Review submission and moderation.
pub struct ReviewService<'a> {
    db: &'a Database,
}

impl<'a> ReviewService<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Every review, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Repository` if the collection cannot be read.
    pub async fn list(&self) -> Result<Vec<Review>, ReviewError> {
        Ok(self.db.read_all(Collection::Reviews).await?)
    }

    /// Append a review. Product id, rating and duplicates are not checked.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Repository` if the collection cannot be written.
    pub async fn submit(&self, new: NewReview) -> Result<Review, ReviewError> {
        let guard = self.db.begin(&[Collection::Reviews]).await;
        let mut reviews = guard.load::<Review>(Collection::Reviews).await?;

        let review = new.into_review(ReviewId::new(reviews.allocate_id()?), Utc::now());
        reviews.records_mut().push(review.clone());
        guard.save(&reviews).await?;

        tracing::info!(review_id = %review.id, product_id = %review.product_id, "Review submitted");
        Ok(review)
    }

    /// Set the admin reply on a review.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::NotFound` if no review has `id`; the collection
    /// is not written in that case.
    pub async fn attach_reply(&self, id: ReviewId, reply: String) -> Result<Review, ReviewError> {
        let guard = self.db.begin(&[Collection::Reviews]).await;
        let mut reviews = guard.load::<Review>(Collection::Reviews).await?;

        let review = reviews
            .records_mut()
            .iter_mut()
            .find(|review| review.id == id)
            .ok_or(ReviewError::NotFound(id))?;
        review.admin_reply = Some(reply);
        let updated = review.clone();

        guard.save(&reviews).await?;
        tracing::info!(review_id = %id, "Admin reply attached");
        Ok(updated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use flatstore_core::{ProductId, UserId};

    use super::*;

    fn new_review(text: &str, rating: i32) -> NewReview {
        NewReview {
            user_id: UserId::new(2),
            user_name: "aigerim".to_owned(),
            product_id: ProductId::new(1),
            text: text.to_owned(),
            rating,
        }
    }

    #[tokio::test]
    async fn test_submit_appends_without_validation() {
        let db = Database::in_memory();
        let reviews = ReviewService::new(&db);

        let first = reviews.submit(new_review("Отлично", 5)).await.unwrap();
        let second = reviews.submit(new_review("Отлично", 11)).await.unwrap();

        assert_eq!(first.id, ReviewId::new(1));
        assert_eq!(second.id, ReviewId::new(2));
        assert_eq!(second.rating, 11);
        assert_eq!(first.admin_reply, None);
        assert_eq!(reviews.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_attach_reply() {
        let db = Database::in_memory();
        let reviews = ReviewService::new(&db);
        let review = reviews.submit(new_review("Хорошо", 4)).await.unwrap();

        let replied = reviews
            .attach_reply(review.id, "Спасибо!".to_owned())
            .await
            .unwrap();
        assert_eq!(replied.admin_reply.as_deref(), Some("Спасибо!"));
        assert_eq!(reviews.list().await.unwrap()[0], replied);
    }

    #[tokio::test]
    async fn test_reply_to_missing_review_leaves_collection_unchanged() {
        let db = Database::in_memory();
        let reviews = ReviewService::new(&db);
        reviews.submit(new_review("Хорошо", 4)).await.unwrap();
        let before = reviews.list().await.unwrap();

        let result = reviews.attach_reply(ReviewId::new(5), "?".to_owned()).await;
        assert!(matches!(result, Err(ReviewError::NotFound(id)) if id == ReviewId::new(5)));
        assert_eq!(reviews.list().await.unwrap(), before);
    }
}
