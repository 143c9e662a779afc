// src/services/reviews.rs
use anyhow::Result;
use sqlx::SqlitePool;

use crate::app_log;
use crate::database::ReviewRepository;
use crate::types::{AnonymousReview, NewReview, ReviewStats};
use crate::utils::mean_of;

pub struct ReviewService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReviewService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Validate and append; nothing is written when validation fails
    pub async fn submit(&self, review: &NewReview) -> Result<i64> {
        review.validate()?;
        let id = ReviewRepository::new(self.pool).insert(review).await?;
        app_log!(info, "Anonymous review {} submitted for company {}", id, review.company_id);
        Ok(id)
    }

    pub async fn page(&self, company_id: i64, limit: i64, offset: i64) -> Result<Vec<AnonymousReview>> {
        ReviewRepository::new(self.pool)
            .page_for_company(company_id, limit, offset)
            .await
    }

    pub async fn stats(&self, company_id: i64) -> Result<Option<ReviewStats>> {
        let reviews = ReviewRepository::new(self.pool)
            .all_for_company(company_id)
            .await?;
        Ok(review_stats(&reviews))
    }

    pub async fn flag(&self, review_id: i64) -> Result<bool> {
        let flagged = ReviewRepository::new(self.pool).flag(review_id).await?;
        if flagged {
            app_log!(warn, "Review {} flagged for moderation", review_id);
        }
        Ok(flagged)
    }
}

fn two_decimals(value: f64) -> String {
    format!("{:.2}", value)
}

/// Averages over present values only, formatted to two decimals
pub fn review_stats(reviews: &[AnonymousReview]) -> Option<ReviewStats> {
    if reviews.is_empty() {
        return None;
    }

    let avg = |field: fn(&AnonymousReview) -> Option<f64>| {
        mean_of(reviews.iter().map(field)).map(two_decimals)
    };

    Some(ReviewStats {
        total_reviews: reviews.len(),
        avg_rating: avg(|r| Some(r.rating)).unwrap_or_else(|| two_decimals(0.0)),
        avg_work_life_balance: avg(|r| r.work_life_balance),
        avg_compensation_benefits: avg(|r| r.compensation_benefits),
        avg_career_opportunities: avg(|r| r.career_opportunities),
        avg_culture_values: avg(|r| r.culture_values),
        avg_senior_management: avg(|r| r.senior_management),
    })
}
