// src/scoring/salary.rs
use std::collections::{BTreeSet, HashMap};

use crate::types::salary::{
    OverallSalaryStats, SalaryInsights, SalaryRange, SalaryRecord, SalaryStats, SalaryTrend,
    SalaryTrendFilter,
};
use crate::utils::contains_ignore_case;

const UNSPECIFIED_LEVEL: &str = "Unspecified";

fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.retain(|v| v.is_finite());
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

/// Floor-index percentile over an ascending, non-empty slice
fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    let index = ((sorted.len() as f64) * fraction).floor() as usize;
    sorted[index.min(sorted.len() - 1)]
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Distribution of total compensation; `None` for an empty set
pub fn compensation_stats(records: &[SalaryRecord]) -> Option<SalaryStats> {
    let totals = sorted(records.iter().map(|r| r.total_compensation).collect());
    let (first, last) = (totals.first()?, totals.last()?);

    Some(SalaryStats {
        count: totals.len(),
        min: *first,
        max: *last,
        median: percentile(&totals, 0.5),
        average: average(&totals),
        p25: percentile(&totals, 0.25),
        p75: percentile(&totals, 0.75),
    })
}

impl SalaryTrendFilter {
    fn matches(&self, record: &SalaryRecord) -> bool {
        if let Some(title) = self.job_title.as_deref().filter(|t| !t.is_empty()) {
            if !contains_ignore_case(&record.job_title, title) {
                return false;
            }
        }
        if let Some(level) = self.level.as_deref().filter(|l| !l.is_empty()) {
            if record.level.as_deref() != Some(level) {
                return false;
            }
        }
        if let Some(min) = self.min_salary {
            if record.base_salary < min {
                return false;
            }
        }
        if let Some(max) = self.max_salary {
            if record.base_salary > max {
                return false;
            }
        }
        record.base_salary.is_finite()
    }
}

#[derive(Default)]
struct TrendAccumulator {
    base: Vec<f64>,
    total: Vec<f64>,
}

/// Grouped salary trends plus overall figures for the filtered records
pub fn insights(records: &[SalaryRecord], filter: &SalaryTrendFilter) -> SalaryInsights {
    let filtered: Vec<&SalaryRecord> = records.iter().filter(|r| filter.matches(r)).collect();

    let mut groups: HashMap<(String, String), TrendAccumulator> = HashMap::new();
    for record in &filtered {
        let level = record
            .level
            .clone()
            .unwrap_or_else(|| UNSPECIFIED_LEVEL.to_string());
        let group = groups.entry((record.job_title.clone(), level)).or_default();
        group.base.push(record.base_salary);
        group.total.push(record.total_compensation);
    }

    let mut trends: Vec<SalaryTrend> = groups
        .into_iter()
        .map(|((job_title, level), group)| SalaryTrend {
            job_title,
            level,
            avg_base_salary: average(&group.base),
            min_base_salary: group.base.iter().copied().fold(f64::INFINITY, f64::min),
            max_base_salary: group.base.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            avg_total_compensation: average(&group.total),
            count: group.base.len(),
        })
        .collect();
    trends.sort_by(|a, b| {
        b.avg_total_compensation
            .total_cmp(&a.avg_total_compensation)
            .then_with(|| a.job_title.cmp(&b.job_title))
            .then_with(|| a.level.cmp(&b.level))
    });

    let job_titles: BTreeSet<String> = filtered.iter().map(|r| r.job_title.clone()).collect();
    let levels: BTreeSet<String> = filtered.iter().filter_map(|r| r.level.clone()).collect();

    let bases = sorted(filtered.iter().map(|r| r.base_salary).collect());
    let totals: Vec<f64> = filtered.iter().map(|r| r.total_compensation).collect();

    let overall_stats = OverallSalaryStats {
        avg_base_salary: average(&bases),
        avg_total_compensation: average(&totals),
        median_base_salary: if bases.is_empty() {
            0.0
        } else {
            percentile(&bases, 0.5)
        },
        highest_paying_role: trends
            .first()
            .map(|t| t.job_title.clone())
            .unwrap_or_else(|| "N/A".to_string()),
    };

    SalaryInsights {
        trends,
        job_titles: job_titles.into_iter().collect(),
        levels: levels.into_iter().collect(),
        overall_stats,
    }
}

/// Base salary range over roles whose title contains `job_title`
pub fn range_by_role(records: &[SalaryRecord], job_title: &str) -> SalaryRange {
    let bases: Vec<f64> = records
        .iter()
        .filter(|r| contains_ignore_case(&r.job_title, job_title))
        .map(|r| r.base_salary)
        .filter(|base| base.is_finite() && *base > 0.0)
        .collect();

    if bases.is_empty() {
        return SalaryRange {
            min: 0.0,
            max: 0.0,
            avg: 0.0,
            count: 0,
        };
    }

    SalaryRange {
        min: bases.iter().copied().fold(f64::INFINITY, f64::min),
        max: bases.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        avg: average(&bases),
        count: bases.len(),
    }
}
