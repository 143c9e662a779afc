// src/scoring/mod.rs
//! Pure in-memory scoring: aggregates, filtering, similarity and salary statistics.
//! Nothing in here touches the database or the network.

pub mod aggregate;
pub mod filter;
pub mod salary;
pub mod similarity;

pub use aggregate::{aggregate, aggregate_for, group_by_company, turnover_adjustment, ScoreIndex};
pub use filter::{search, FilterCriteria, DEFAULT_FILTER_LIMIT, DEFAULT_SEARCH_LIMIT};
pub use similarity::{rank_similar, similarity_score};
