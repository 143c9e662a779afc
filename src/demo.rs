// src/demo.rs
//! Fixed in-process dataset for the public demo heat map. Nothing here
//! touches the database.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::scoring::FilterCriteria;
use crate::types::{AggregateScore, Company, ScoredCompany};

struct DemoEntry {
    name: &'static str,
    domain: &'static str,
    industry: &'static str,
    size_range: &'static str,
    city: &'static str,
    state: &'static str,
    // overall, work-life, compensation, career, culture, management, ceo %, recommend %
    ratings: [f64; 8],
}

const DEMO_COMPANIES: &[DemoEntry] = &[
    DemoEntry {
        name: "Northwind Analytics",
        domain: "northwind.example",
        industry: "Technology",
        size_range: "1001-5000",
        city: "Seattle",
        state: "WA",
        ratings: [4.4, 4.1, 4.3, 4.0, 4.5, 3.9, 91.0, 88.0],
    },
    DemoEntry {
        name: "Bluepeak Software",
        domain: "bluepeak.example",
        industry: "Technology",
        size_range: "201-500",
        city: "Austin",
        state: "TX",
        ratings: [4.1, 4.4, 3.8, 3.9, 4.2, 3.7, 86.0, 82.0],
    },
    DemoEntry {
        name: "Harbor Health Partners",
        domain: "harborhealth.example",
        industry: "Healthcare",
        size_range: "5001-10000",
        city: "Boston",
        state: "MA",
        ratings: [3.8, 3.5, 3.6, 3.7, 3.9, 3.3, 74.0, 71.0],
    },
    DemoEntry {
        name: "Granite Capital",
        domain: "granitecap.example",
        industry: "Finance",
        size_range: "10001+",
        city: "New York",
        state: "NY",
        ratings: [3.6, 2.9, 4.4, 3.8, 3.4, 3.2, 68.0, 64.0],
    },
    DemoEntry {
        name: "Sunline Retail Group",
        domain: "sunline.example",
        industry: "Retail",
        size_range: "10001+",
        city: "Columbus",
        state: "OH",
        ratings: [3.2, 3.1, 2.9, 3.0, 3.3, 2.8, 58.0, 55.0],
    },
    DemoEntry {
        name: "Ironleaf Manufacturing",
        domain: "ironleaf.example",
        industry: "Manufacturing",
        size_range: "1001-5000",
        city: "Detroit",
        state: "MI",
        ratings: [3.5, 3.4, 3.5, 3.2, 3.6, 3.1, 70.0, 66.0],
    },
    DemoEntry {
        name: "Cobalt Mobility",
        domain: "cobaltmobility.example",
        industry: "Automotive",
        size_range: "5001-10000",
        city: "San Jose",
        state: "CA",
        ratings: [4.0, 3.6, 4.2, 4.1, 3.9, 3.6, 84.0, 79.0],
    },
    DemoEntry {
        name: "Meridian Energy",
        domain: "meridianenergy.example",
        industry: "Energy",
        size_range: "1001-5000",
        city: "Houston",
        state: "TX",
        ratings: [3.7, 3.8, 3.9, 3.4, 3.6, 3.3, 77.0, 72.0],
    },
    DemoEntry {
        name: "Lumen Learning Labs",
        domain: "lumenlabs.example",
        industry: "Education",
        size_range: "51-200",
        city: "Denver",
        state: "CO",
        ratings: [4.3, 4.5, 3.4, 3.8, 4.6, 4.0, 93.0, 90.0],
    },
    DemoEntry {
        name: "Vantage Media",
        domain: "vantagemedia.example",
        industry: "Media",
        size_range: "501-1000",
        city: "Los Angeles",
        state: "CA",
        ratings: [3.4, 3.0, 3.3, 3.5, 3.7, 3.0, 62.0, 60.0],
    },
];

/// Demo filter; same semantics as the live company filter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoFilter {
    pub location: Option<String>,
    pub industry: Option<String>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
}

impl From<&DemoFilter> for FilterCriteria {
    fn from(filter: &DemoFilter) -> Self {
        FilterCriteria {
            location: filter.location.clone(),
            industry: filter.industry.clone(),
            min_score: filter.min_score,
            max_score: filter.max_score,
            ..Default::default()
        }
    }
}

fn demo_company(id: i64, entry: &DemoEntry) -> ScoredCompany {
    let [overall, wlb, comp, career, culture, management, ceo, recommend] = entry.ratings;
    let stamp = DateTime::<Utc>::default();

    ScoredCompany {
        company: Company {
            id,
            name: entry.name.to_string(),
            domain: Some(entry.domain.to_string()),
            industry: Some(entry.industry.to_string()),
            size_range: Some(entry.size_range.to_string()),
            headquarters_city: Some(entry.city.to_string()),
            headquarters_state: Some(entry.state.to_string()),
            headquarters_country: Some("USA".to_string()),
            logo_url: None,
            website: Some(format!("https://{}", entry.domain)),
            turnover_rate: None,
            avg_tenure: None,
            created_at: stamp,
            updated_at: stamp,
        },
        aggregate_score: Some(AggregateScore {
            overall_rating: Some(overall),
            work_life_balance: Some(wlb),
            compensation_benefits: Some(comp),
            career_opportunities: Some(career),
            culture_values: Some(culture),
            senior_management: Some(management),
            ceo_approval: Some(ceo),
            recommend_to_friend: Some(recommend),
        }),
    }
}

pub fn companies() -> Vec<ScoredCompany> {
    DEMO_COMPANIES
        .iter()
        .enumerate()
        .map(|(index, entry)| demo_company(index as i64 + 1, entry))
        .collect()
}

pub fn company_by_id(id: i64) -> Option<ScoredCompany> {
    companies().into_iter().find(|scored| scored.company.id == id)
}

pub fn filter_companies(filter: &DemoFilter) -> Vec<ScoredCompany> {
    let criteria = FilterCriteria::from(filter);
    let (companies, aggregates): (Vec<Company>, Vec<Option<AggregateScore>>) = companies()
        .into_iter()
        .map(|scored| (scored.company, scored.aggregate_score))
        .unzip();

    criteria.apply(companies, |company| {
        aggregates
            .get((company.id - 1) as usize)
            .cloned()
            .flatten()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_stable_and_lookup_works() {
        let all = companies();
        assert_eq!(all.len(), DEMO_COMPANIES.len());
        assert_eq!(company_by_id(1).unwrap().company.name, "Northwind Analytics");
        assert!(company_by_id(0).is_none());
        assert!(company_by_id(all.len() as i64 + 1).is_none());
    }

    #[test]
    fn test_filter_reuses_company_predicates() {
        let texas = filter_companies(&DemoFilter {
            location: Some("tx".into()),
            ..Default::default()
        });
        let names: Vec<_> = texas.iter().map(|c| c.company.name.as_str()).collect();
        assert_eq!(names, vec!["Bluepeak Software", "Meridian Energy"]);

        let strong_tech = filter_companies(&DemoFilter {
            industry: Some("Technology".into()),
            min_score: Some(4.2),
            ..Default::default()
        });
        assert_eq!(strong_tech.len(), 1);
        assert_eq!(strong_tech[0].company.id, 1);

        assert_eq!(filter_companies(&DemoFilter::default()).len(), DEMO_COMPANIES.len());
    }
}
