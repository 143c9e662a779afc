// src/scoring/aggregate.rs
use std::collections::HashMap;

use crate::types::{AggregateScore, Company, CultureScore};
use crate::utils::{finite, mean_of};

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

/// Upper bound of each turnover bracket (percent, inclusive) and its adjustment
const TURNOVER_BRACKETS: [(f64, f64); 4] = [(10.0, 0.3), (20.0, 0.0), (30.0, -0.1), (40.0, -0.3)];
const HIGH_TURNOVER_ADJUSTMENT: f64 = -0.5;

/// Culture rows grouped by company id
pub type ScoreIndex = HashMap<i64, Vec<CultureScore>>;

/// Adjustment applied to the overall rating for a given turnover rate
pub fn turnover_adjustment(turnover_rate: f64) -> f64 {
    TURNOVER_BRACKETS
        .iter()
        .find(|(upper, _)| turnover_rate <= *upper)
        .map(|(_, adjustment)| *adjustment)
        .unwrap_or(HIGH_TURNOVER_ADJUSTMENT)
}

/// Overall rating after the turnover adjustment, always within [1, 5]
pub fn adjusted_overall(mean: f64, turnover_rate: Option<f64>) -> f64 {
    let adjustment = finite(turnover_rate).map(turnover_adjustment).unwrap_or(0.0);
    (mean + adjustment).clamp(MIN_RATING, MAX_RATING)
}

/// Average every metric across the company's source rows.
///
/// Returns `None` when there are no rows. A metric with no usable value in
/// any row stays `None` rather than collapsing to zero.
pub fn aggregate(rows: &[CultureScore], turnover_rate: Option<f64>) -> Option<AggregateScore> {
    if rows.is_empty() {
        return None;
    }

    Some(AggregateScore {
        overall_rating: metric(rows, |r| r.overall_rating)
            .map(|mean| adjusted_overall(mean, turnover_rate)),
        work_life_balance: metric(rows, |r| r.work_life_balance),
        compensation_benefits: metric(rows, |r| r.compensation_benefits),
        career_opportunities: metric(rows, |r| r.career_opportunities),
        culture_values: metric(rows, |r| r.culture_values),
        senior_management: metric(rows, |r| r.senior_management),
        ceo_approval: metric(rows, |r| r.ceo_approval),
        recommend_to_friend: metric(rows, |r| r.recommend_to_friend),
    })
}

fn metric(rows: &[CultureScore], field: fn(&CultureScore) -> Option<f64>) -> Option<f64> {
    mean_of(rows.iter().map(field))
}

/// Aggregate for a company looked up in a prebuilt index
pub fn aggregate_for(company: &Company, index: &ScoreIndex) -> Option<AggregateScore> {
    index
        .get(&company.id)
        .and_then(|rows| aggregate(rows, company.turnover_rate))
}

pub fn group_by_company(rows: Vec<CultureScore>) -> ScoreIndex {
    let mut index = ScoreIndex::new();
    for row in rows {
        index.entry(row.company_id).or_default().push(row);
    }
    index
}
