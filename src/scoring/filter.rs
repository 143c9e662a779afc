// src/scoring/filter.rs
use serde::Deserialize;

use crate::types::{AggregateScore, Company, ScoredCompany};
use crate::utils::contains_ignore_case;

pub const DEFAULT_FILTER_LIMIT: usize = 100;
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Company filter criteria. Empty strings and empty lists are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub location: Option<String>,
    pub industry: Option<String>,
    pub industries: Option<Vec<String>>,
    pub size_range: Option<String>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl FilterCriteria {
    /// Case-insensitive substring match on "City, State"
    pub fn matches_location(&self, company: &Company) -> bool {
        match present(&self.location) {
            Some(location) => contains_ignore_case(&company.location(), location),
            None => true,
        }
    }

    /// The industry list wins over the single industry when both are given
    pub fn matches_industry(&self, company: &Company) -> bool {
        if let Some(industries) = self.industries.as_ref().filter(|list| !list.is_empty()) {
            return company
                .industry
                .as_ref()
                .is_some_and(|industry| industries.contains(industry));
        }

        match present(&self.industry) {
            Some(industry) => company.industry.as_deref() == Some(industry),
            None => true,
        }
    }

    pub fn matches_size(&self, company: &Company) -> bool {
        match present(&self.size_range) {
            Some(size) => company.size_range.as_deref() == Some(size),
            None => true,
        }
    }

    /// Score bounds are inclusive; an unknown overall rating fails any bound
    pub fn score_in_range(&self, overall: Option<f64>) -> bool {
        let above_min = match self.min_score {
            Some(min) => overall.is_some_and(|score| score >= min),
            None => true,
        };
        let below_max = match self.max_score {
            Some(max) => overall.is_some_and(|score| score <= max),
            None => true,
        };
        above_min && below_max
    }

    /// Apply the predicates in order (location, industry, size, score) and
    /// then paginate. Companies without an aggregate are always dropped.
    pub fn apply<F>(&self, companies: Vec<Company>, mut aggregate_of: F) -> Vec<ScoredCompany>
    where
        F: FnMut(&Company) -> Option<AggregateScore>,
    {
        let offset = self.offset.unwrap_or(0);
        let limit = self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_FILTER_LIMIT);

        companies
            .into_iter()
            .filter(|company| self.matches_location(company))
            .filter(|company| self.matches_industry(company))
            .filter(|company| self.matches_size(company))
            .filter_map(|company| {
                let aggregate = aggregate_of(&company)?;
                if self.score_in_range(aggregate.overall_rating) {
                    Some(ScoredCompany {
                        company,
                        aggregate_score: Some(aggregate),
                    })
                } else {
                    None
                }
            })
            .skip(offset)
            .take(limit)
            .collect()
    }
}

/// Case-insensitive substring search on company name
pub fn search<I>(companies: I, query: &str, limit: usize) -> Vec<Company>
where
    I: IntoIterator<Item = Company>,
{
    companies
        .into_iter()
        .filter(|company| contains_ignore_case(&company.name, query))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::fixtures::located;
    use std::collections::HashMap;

    fn catalog() -> (Vec<Company>, HashMap<i64, f64>) {
        let companies = vec![
            located(1, "Acme Cloud", "Technology", "1001-5000", "Austin", "TX"),
            located(2, "Bolt Robotics", "Technology", "201-500", "San Francisco", "CA"),
            located(3, "Cedar Health", "Healthcare", "1001-5000", "Austin", "TX"),
            located(4, "Delta Finance", "Finance", "5001-10000", "New York", "NY"),
            located(5, "Echo Apps", "Technology", "1001-5000", "Seattle", "WA"),
        ];
        // company 5 has no score rows
        let scores = HashMap::from([(1, 4.3), (2, 4.6), (3, 3.9), (4, 4.1)]);
        (companies, scores)
    }

    fn run(criteria: &FilterCriteria) -> Vec<ScoredCompany> {
        let (companies, scores) = catalog();
        criteria.apply(companies, |c| {
            scores.get(&c.id).map(|overall| AggregateScore {
                overall_rating: Some(*overall),
                ..Default::default()
            })
        })
    }

    fn ids(results: &[ScoredCompany]) -> Vec<i64> {
        results.iter().map(|r| r.company.id).collect()
    }

    #[test]
    fn test_min_score_excludes_lower_rated_company() {
        let criteria = FilterCriteria {
            industry: Some("Technology".into()),
            min_score: Some(4.5),
            ..Default::default()
        };
        assert_eq!(ids(&run(&criteria)), vec![2]);
    }

    #[test]
    fn test_unscored_companies_are_dropped() {
        let results = run(&FilterCriteria::default());
        assert_eq!(ids(&results), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_location_is_case_insensitive_substring() {
        let criteria = FilterCriteria {
            location: Some("austin, tx".into()),
            ..Default::default()
        };
        assert_eq!(ids(&run(&criteria)), vec![1, 3]);

        let by_state = FilterCriteria {
            location: Some("ny".into()),
            ..Default::default()
        };
        assert_eq!(ids(&run(&by_state)), vec![4]);
    }

    #[test]
    fn test_industry_list_takes_priority() {
        let criteria = FilterCriteria {
            industry: Some("Technology".into()),
            industries: Some(vec!["Healthcare".into(), "Finance".into()]),
            ..Default::default()
        };
        assert_eq!(ids(&run(&criteria)), vec![3, 4]);

        let empty_list = FilterCriteria {
            industry: Some("Finance".into()),
            industries: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(ids(&run(&empty_list)), vec![4]);
    }

    #[test]
    fn test_size_and_max_score() {
        let criteria = FilterCriteria {
            size_range: Some("1001-5000".into()),
            max_score: Some(4.0),
            ..Default::default()
        };
        assert_eq!(ids(&run(&criteria)), vec![3]);
    }

    #[test]
    fn test_pagination() {
        let criteria = FilterCriteria {
            offset: Some(1),
            limit: Some(2),
            ..Default::default()
        };
        assert_eq!(ids(&run(&criteria)), vec![2, 3]);
    }

    #[test]
    fn test_zero_limit_uses_default() {
        let criteria = FilterCriteria {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(ids(&run(&criteria)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_filtering_twice_is_idempotent() {
        let (_, scores) = catalog();
        let criteria = FilterCriteria {
            location: Some("tx".into()),
            min_score: Some(3.5),
            ..Default::default()
        };
        let first = run(&criteria);
        let again = criteria.apply(
            first.iter().map(|r| r.company.clone()).collect(),
            |c| {
                scores.get(&c.id).map(|overall| AggregateScore {
                    overall_rating: Some(*overall),
                    ..Default::default()
                })
            },
        );
        assert_eq!(first, again);
    }

    #[test]
    fn test_unknown_overall_fails_bounds() {
        let criteria = FilterCriteria {
            min_score: Some(1.0),
            ..Default::default()
        };
        assert!(!criteria.score_in_range(None));
        assert!(FilterCriteria::default().score_in_range(None));
    }

    #[test]
    fn test_search_ignores_case() {
        let (companies, _) = catalog();
        let lower = search(companies.clone(), "echo", DEFAULT_SEARCH_LIMIT);
        let upper = search(companies.clone(), "ECHO", DEFAULT_SEARCH_LIMIT);
        assert_eq!(lower, upper);
        assert_eq!(lower.len(), 1);

        let capped = search(companies, "", 2);
        assert_eq!(capped.len(), 2);
    }
}
