// src/types/mod.rs
//! Typed records for every persisted table and every query result

pub mod company;
pub mod glassdoor;
pub mod listing;
pub mod ranking;
pub mod review;
pub mod salary;
pub mod user;

pub use company::{
    AggregateScore, Company, CompanyDetail, CultureScore, CultureTrend, LayoffEvent, NewCompany,
    NewCultureScore, ScoredCompany,
};
pub use glassdoor::{GlassdoorMetrics, InterviewRecord, NewGlassdoorMetrics, NewInterview};
pub use listing::{CompanyNews, JobOpening, NewCompanyNews, NewJobOpening};
pub use ranking::{AiSimilarCompany, RankingOutcome, Recommendation, SimilarCompany};
pub use review::{AnonymousReview, CompanyReview, EmploymentStatus, NewReview, ReviewStats};
pub use salary::{SalaryRecord, NewSalaryRecord};
pub use user::{SavedComparison, User};
