// src/scoring/similarity.rs
use crate::types::{Company, ScoredCompany, SimilarCompany};

pub const INDUSTRY_POINTS: u32 = 40;
pub const SIZE_POINTS: u32 = 30;
pub const LOCATION_POINTS: u32 = 15;
pub const MAX_SIMILARITY: u32 = INDUSTRY_POINTS + SIZE_POINTS + LOCATION_POINTS + 15;

/// Bonus for how close two overall ratings are
pub fn proximity_points(difference: f64) -> u32 {
    let difference = difference.abs();
    if difference <= 1.0 {
        15
    } else if difference <= 2.0 {
        10
    } else if difference <= 3.0 {
        5
    } else {
        0
    }
}

fn same<T: PartialEq>(a: &Option<T>, b: &Option<T>) -> bool {
    matches!((a, b), (Some(x), Some(y)) if x == y)
}

/// Weighted similarity in `0..=MAX_SIMILARITY`
pub fn similarity_score(
    reference: &Company,
    reference_overall: Option<f64>,
    candidate: &Company,
    candidate_overall: Option<f64>,
) -> u32 {
    let mut score = 0;

    if same(&reference.industry, &candidate.industry) {
        score += INDUSTRY_POINTS;
    }
    if same(&reference.size_range, &candidate.size_range) {
        score += SIZE_POINTS;
    }
    if same(&reference.headquarters_city, &candidate.headquarters_city)
        && same(&reference.headquarters_state, &candidate.headquarters_state)
    {
        score += LOCATION_POINTS;
    }
    if let (Some(a), Some(b)) = (reference_overall, candidate_overall) {
        if a.is_finite() && b.is_finite() {
            score += proximity_points(a - b);
        }
    }

    score
}

/// Rank candidates against the reference, highest score first, ties by id.
/// The reference itself is never part of the result.
pub fn rank_similar(
    reference: &ScoredCompany,
    candidates: Vec<ScoredCompany>,
    limit: usize,
) -> Vec<SimilarCompany> {
    let reference_overall = reference.overall();

    let mut ranked: Vec<SimilarCompany> = candidates
        .into_iter()
        .filter(|candidate| candidate.company.id != reference.company.id)
        .map(|candidate| {
            let similarity_score = similarity_score(
                &reference.company,
                reference_overall,
                &candidate.company,
                candidate.overall(),
            );
            SimilarCompany {
                company: candidate,
                similarity_score,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.similarity_score
            .cmp(&a.similarity_score)
            .then_with(|| a.company.company.id.cmp(&b.company.company.id))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::fixtures::{company, located};
    use crate::types::AggregateScore;

    fn scored(company: Company, overall: Option<f64>) -> ScoredCompany {
        ScoredCompany {
            company,
            aggregate_score: overall.map(|o| AggregateScore {
                overall_rating: Some(o),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_identical_profile_scores_maximum() {
        let a = located(1, "A", "Technology", "201-500", "Austin", "TX");
        let b = located(2, "B", "Technology", "201-500", "Austin", "TX");
        assert_eq!(similarity_score(&a, Some(4.0), &b, Some(4.5)), MAX_SIMILARITY);
        assert_eq!(MAX_SIMILARITY, 100);
    }

    #[test]
    fn test_location_needs_city_and_state() {
        let a = located(1, "A", "Tech", "S", "Portland", "OR");
        let b = located(2, "B", "Retail", "M", "Portland", "ME");
        assert_eq!(similarity_score(&a, None, &b, None), 0);
    }

    #[test]
    fn test_unknown_attributes_never_match() {
        let a = company(1, "A");
        let b = company(2, "B");
        assert_eq!(similarity_score(&a, None, &b, None), 0);
    }

    #[test]
    fn test_proximity_tiers() {
        assert_eq!(proximity_points(0.0), 15);
        assert_eq!(proximity_points(-1.0), 15);
        assert_eq!(proximity_points(1.5), 10);
        assert_eq!(proximity_points(2.5), 5);
        assert_eq!(proximity_points(3.5), 0);
    }

    #[test]
    fn test_score_is_bounded() {
        let profiles = [
            located(1, "A", "Tech", "S", "Austin", "TX"),
            located(2, "B", "Tech", "M", "Austin", "TX"),
            located(3, "C", "Retail", "S", "Dallas", "TX"),
            company(4, "D"),
        ];
        let overalls = [None, Some(1.0), Some(3.3), Some(5.0)];
        for a in &profiles {
            for b in &profiles {
                for oa in overalls {
                    for ob in overalls {
                        assert!(similarity_score(a, oa, b, ob) <= MAX_SIMILARITY);
                    }
                }
            }
        }
    }

    #[test]
    fn test_rank_orders_by_score_then_id() {
        let reference = scored(located(1, "Ref", "Tech", "S", "Austin", "TX"), Some(4.0));
        let candidates = vec![
            reference.clone(),
            scored(located(5, "Same industry", "Tech", "L", "Boston", "MA"), None),
            scored(located(3, "Twin", "Tech", "S", "Austin", "TX"), Some(4.2)),
            scored(located(2, "Also industry", "Tech", "L", "Reno", "NV"), None),
            scored(located(4, "Other", "Retail", "L", "Reno", "NV"), Some(1.5)),
        ];

        let ranked = rank_similar(&reference, candidates, 3);
        let ids: Vec<i64> = ranked.iter().map(|r| r.company.company.id).collect();
        assert_eq!(ids, vec![3, 2, 5]);
        assert_eq!(ranked[0].similarity_score, 100);
        assert_eq!(ranked[1].similarity_score, 40);
    }
}
