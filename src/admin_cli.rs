// src/admin_cli.rs
use crate::app_log;
use crate::auth::AuthConfig;
use crate::core::ConfigManager;
use crate::database::{
    CompanyRepository, CultureScoreRepository, DatabaseConfig, SalaryRepository, SessionIdentity,
};
use crate::integrations::Integrations;
use crate::services::NewsService;
use crate::types::{NewCompany, NewCultureScore, NewSalaryRecord};
use anyhow::{Context, Result};
use chrono::{Months, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const SCORE_SOURCES: &[&str] = &["glassdoor", "indeed", "comparably"];
const TREND_METRICS: &[&str] = &["overallRating", "workLifeBalance", "compensationBenefits"];
const TREND_MONTHS: u32 = 6;

struct LevelTemplate {
    level: &'static str,
    base: f64,
    bonus_pct: f64,
    equity: f64,
}

const fn level(level: &'static str, base: f64, bonus_pct: f64, equity: f64) -> LevelTemplate {
    LevelTemplate {
        level,
        base,
        bonus_pct,
        equity,
    }
}

/// Base salary, bonus percentage and equity value per role and level
const SALARY_TEMPLATES: &[(&str, [LevelTemplate; 4])] = &[
    (
        "Software Engineer",
        [
            level("Entry", 120_000.0, 10.0, 50_000.0),
            level("Mid", 180_000.0, 15.0, 100_000.0),
            level("Senior", 250_000.0, 20.0, 200_000.0),
            level("Lead", 320_000.0, 25.0, 300_000.0),
        ],
    ),
    (
        "Product Manager",
        [
            level("Entry", 110_000.0, 15.0, 40_000.0),
            level("Mid", 170_000.0, 20.0, 80_000.0),
            level("Senior", 240_000.0, 25.0, 150_000.0),
            level("Director", 320_000.0, 30.0, 250_000.0),
        ],
    ),
    (
        "Data Scientist",
        [
            level("Entry", 115_000.0, 12.0, 45_000.0),
            level("Mid", 175_000.0, 18.0, 90_000.0),
            level("Senior", 245_000.0, 22.0, 180_000.0),
            level("Lead", 310_000.0, 28.0, 280_000.0),
        ],
    ),
    (
        "UX/UI Designer",
        [
            level("Entry", 80_000.0, 8.0, 30_000.0),
            level("Mid", 130_000.0, 12.0, 60_000.0),
            level("Senior", 180_000.0, 15.0, 100_000.0),
            level("Lead", 240_000.0, 20.0, 150_000.0),
        ],
    ),
    (
        "DevOps Engineer",
        [
            level("Entry", 125_000.0, 11.0, 55_000.0),
            level("Mid", 190_000.0, 16.0, 110_000.0),
            level("Senior", 270_000.0, 21.0, 220_000.0),
            level("Lead", 340_000.0, 26.0, 320_000.0),
        ],
    ),
    (
        "Sales Executive",
        [
            level("Entry", 60_000.0, 50.0, 20_000.0),
            level("Mid", 100_000.0, 60.0, 50_000.0),
            level("Senior", 150_000.0, 75.0, 100_000.0),
            level("Manager", 200_000.0, 100.0, 150_000.0),
        ],
    ),
    (
        "Marketing Manager",
        [
            level("Entry", 70_000.0, 10.0, 25_000.0),
            level("Mid", 120_000.0, 15.0, 50_000.0),
            level("Senior", 170_000.0, 20.0, 100_000.0),
            level("Director", 240_000.0, 25.0, 150_000.0),
        ],
    ),
    (
        "Finance Analyst",
        [
            level("Entry", 75_000.0, 15.0, 20_000.0),
            level("Mid", 130_000.0, 25.0, 50_000.0),
            level("Senior", 190_000.0, 35.0, 100_000.0),
            level("Manager", 260_000.0, 50.0, 150_000.0),
        ],
    ),
];

#[derive(Parser)]
#[command(name = "culturemap-admin")]
#[command(about = "Maintenance commands for the culture map database")]
pub struct AdminCli {
    #[command(subcommand)]
    pub command: AdminCommand,

    /// Overrides the database path from config.yaml
    #[arg(long)]
    pub database_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Create the database and its tables
    Init,
    /// Insert companies from a TOML seed file, with scores and trends
    SeedCompanies { file: PathBuf },
    /// Generate salary rows for every company
    SeedSalary,
    /// Update turnover figures from a name,turnover_rate,avg_tenure CSV
    BackfillTurnover { csv_file: PathBuf },
    /// Report turnover coverage
    CheckTurnover,
    /// Generate one news item per company and per industry
    SeedNews,
    /// Print a signed session token for local testing
    IssueSession {
        open_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    companies: Vec<NewCompany>,
}

#[derive(Debug, Deserialize)]
struct TurnoverRow {
    name: String,
    turnover_rate: f64,
    avg_tenure: Option<f64>,
}

pub async fn handle_admin_command(cli: AdminCli) -> Result<()> {
    let config = ConfigManager::load()?;

    if let AdminCommand::IssueSession {
        open_id,
        name,
        email,
    } = &cli.command
    {
        let identity = SessionIdentity {
            open_id: open_id.clone(),
            name: name.clone(),
            email: email.clone(),
            login_method: Some("cli".to_string()),
        };
        let token = AuthConfig::new(config.service.session_secret.clone()).sign_session(&identity)?;
        app_log!(info, "Session token for {}:", open_id);
        app_log!(info, "{}", token);
        return Ok(());
    }

    let database_path = cli
        .database_path
        .clone()
        .unwrap_or_else(|| config.environment.database_path.clone());
    let mut db_config = DatabaseConfig::new(database_path.clone());
    db_config.init_pool().await?;
    db_config.migrate().await?;
    let pool = db_config.pool()?;

    match cli.command {
        AdminCommand::Init => {
            app_log!(info, "✅ Database initialized at: {}", database_path.display());
        }

        AdminCommand::SeedCompanies { file } => {
            let seed = read_seed_file(&file).await?;
            let companies = CompanyRepository::new(pool);
            let scores = CultureScoreRepository::new(pool);
            let today = Utc::now().date_naive();
            let mut rng = StdRng::from_entropy();
            let mut created_count = 0;

            for new_company in &seed.companies {
                let (company, created) = companies.insert_or_get(new_company).await?;
                if !created {
                    app_log!(info, "⚠️  Reusing existing company: {}", company.name);
                    continue;
                }

                for source in SCORE_SOURCES {
                    scores
                        .insert(&random_scores(&mut rng, company.id, source, today))
                        .await?;
                }
                for (month_year, metric, value) in random_trends(&mut rng, today) {
                    companies
                        .add_trend(company.id, metric, value, &month_year, Some("glassdoor"))
                        .await?;
                }
                if let Some((date, affected, percentage)) = random_layoff(&mut rng, today) {
                    companies
                        .add_layoff(company.id, date, Some(affected), Some(percentage), None, Some("Restructuring"))
                        .await?;
                }

                created_count += 1;
                app_log!(info, "✓ Seeded {}", company.name);
            }

            app_log!(info, "Company seed completed:");
            app_log!(info, "  ✅ Created: {}", created_count);
            app_log!(info, "  ⚠️  Reused:  {}", seed.companies.len() - created_count);
        }

        AdminCommand::SeedSalary => {
            let companies = CompanyRepository::new(pool).all().await?;
            let salaries = SalaryRepository::new(pool);
            let today = Utc::now().date_naive();
            let mut rng = StdRng::from_entropy();
            let mut total = 0;

            app_log!(info, "Found {} companies. Seeding salary data...", companies.len());
            for company in &companies {
                for record in salary_rows(&mut rng, company.id, today) {
                    salaries.insert(&record).await?;
                    total += 1;
                }
            }
            app_log!(info, "✅ Successfully seeded {} salary data entries", total);
        }

        AdminCommand::BackfillTurnover { csv_file } => {
            let rows = read_turnover_csv(&csv_file).await?;
            let companies = CompanyRepository::new(pool);
            let mut updated = 0;
            let mut skipped = 0;

            for row in rows {
                if companies
                    .update_turnover(&row.name, row.turnover_rate, row.avg_tenure)
                    .await?
                {
                    updated += 1;
                    app_log!(info, "✓ {}: {}% turnover", row.name, row.turnover_rate);
                } else {
                    skipped += 1;
                    app_log!(info, "⚠️  Skipped (no such company): {}", row.name);
                }
            }

            app_log!(info, "Turnover backfill completed:");
            app_log!(info, "  ✅ Updated: {}", updated);
            app_log!(info, "  ⚠️  Skipped: {}", skipped);
        }

        AdminCommand::CheckTurnover => {
            let summary = CompanyRepository::new(pool).turnover_summary().await?;
            app_log!(info, "Total companies with turnover: {}", summary.with_turnover);
            match (summary.min_rate, summary.max_rate) {
                (Some(min), Some(max)) => {
                    app_log!(info, "Turnover range: {:.2}% - {:.2}%", min, max);
                    app_log!(info, "Range span: {:.1}%", max - min);
                }
                _ => app_log!(info, "No turnover data recorded"),
            }
        }

        AdminCommand::SeedNews => {
            let integrations = Integrations::from_config(&config.service)?;
            if integrations.llm.is_none() {
                anyhow::bail!("OPENAI_API_KEY is required to generate news");
            }

            let repository = CompanyRepository::new(pool);
            let companies = repository.all().await?;
            let industries = repository.industries().await?;
            let stored = NewsService::new(pool, None, integrations.llm.as_ref())
                .seed(&companies, &industries)
                .await?;
            app_log!(info, "✅ Stored {} news items", stored);
        }

        AdminCommand::IssueSession { .. } => {}
    }

    Ok(())
}

async fn read_seed_file(path: &Path) -> Result<SeedFile> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid seed file {}", path.display()))
}

async fn read_turnover_csv(path: &Path) -> Result<Vec<TurnoverRow>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read CSV file {}", path.display()))?;
    parse_turnover_csv(&content)
}

fn parse_turnover_csv(content: &str) -> Result<Vec<TurnoverRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (line, record) in reader.deserialize::<TurnoverRow>().enumerate() {
        match record {
            Ok(row) if !row.name.is_empty() => rows.push(row),
            Ok(_) => app_log!(warn, "⚠️  Skipping row {} with empty name", line + 2),
            Err(e) => app_log!(warn, "❌ CSV parsing error on row {}: {}", line + 2, e),
        }
    }
    Ok(rows)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn between<R: Rng>(rng: &mut R, low: f64, span: f64) -> f64 {
    round2(low + rng.gen::<f64>() * span)
}

fn random_scores<R: Rng>(rng: &mut R, company_id: i64, source: &str, today: NaiveDate) -> NewCultureScore {
    NewCultureScore {
        company_id,
        source: source.to_string(),
        overall_rating: Some(between(rng, 3.8, 1.2)),
        work_life_balance: Some(between(rng, 3.5, 1.5)),
        compensation_benefits: Some(between(rng, 4.2, 0.8)),
        career_opportunities: Some(between(rng, 4.0, 1.0)),
        culture_values: Some(between(rng, 3.7, 1.3)),
        senior_management: Some(between(rng, 3.6, 1.4)),
        ceo_approval: Some(between(rng, 70.0, 30.0)),
        recommend_to_friend: Some(between(rng, 65.0, 35.0)),
        review_count: Some(rng.gen_range(100..1000)),
        date_collected: Some(today),
    }
}

/// Six months of trend points for the headline metrics, newest month first
fn random_trends<R: Rng>(rng: &mut R, today: NaiveDate) -> Vec<(String, &'static str, f64)> {
    let mut points = Vec::new();
    for months_back in 0..TREND_MONTHS {
        let month = today
            .checked_sub_months(Months::new(months_back))
            .unwrap_or(today)
            .format("%Y-%m")
            .to_string();
        for metric in TREND_METRICS {
            points.push((month.clone(), *metric, between(rng, 3.5, 1.5)));
        }
    }
    points
}

/// Roughly three companies in ten get a layoff in the past year
fn random_layoff<R: Rng>(rng: &mut R, today: NaiveDate) -> Option<(NaiveDate, i64, f64)> {
    if rng.gen::<f64>() <= 0.7 {
        return None;
    }
    let date = today
        .checked_sub_months(Months::new(rng.gen_range(0..12)))
        .unwrap_or(today);
    Some((date, rng.gen_range(50..550), between(rng, 0.0, 15.0)))
}

fn years_for_level(level: &str) -> i64 {
    match level {
        "Entry" => 0,
        "Mid" => 3,
        "Senior" => 7,
        _ => 10,
    }
}

/// Every level of three to five randomly picked roles
fn salary_rows<R: Rng>(rng: &mut R, company_id: i64, today: NaiveDate) -> Vec<NewSalaryRecord> {
    let role_count = rng.gen_range(3..=5);
    let roles: Vec<_> = SALARY_TEMPLATES.choose_multiple(rng, role_count).collect();

    let mut rows = Vec::new();
    for (role, levels) in roles {
        for template in levels {
            let base_salary = round2(template.base + (rng.gen::<f64>() * 20_000.0 - 10_000.0));
            let bonus = round2(base_salary * template.bonus_pct / 100.0);
            let equity = round2(template.equity + (rng.gen::<f64>() * 50_000.0 - 25_000.0));

            rows.push(NewSalaryRecord {
                company_id,
                job_title: role.to_string(),
                level: Some(template.level.to_string()),
                base_salary,
                bonus: Some(bonus),
                equity: Some(equity),
                total_compensation: round2(base_salary + bonus + equity),
                currency: "USD".to_string(),
                location: Some("United States".to_string()),
                years_experience: Some(years_for_level(template.level)),
                data_source: Some("Internal Survey".to_string()),
                last_updated: Some(today),
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    }

    #[test]
    fn test_random_scores_stay_in_seed_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let score = random_scores(&mut rng, 1, "indeed", today());
            let overall = score.overall_rating.unwrap();
            assert!((3.8..=5.0).contains(&overall));
            assert!((4.2..=5.0).contains(&score.compensation_benefits.unwrap()));
            assert!((70.0..=100.0).contains(&score.ceo_approval.unwrap()));
            assert!((100..1000).contains(&score.review_count.unwrap()));
        }
    }

    #[test]
    fn test_trends_cover_six_distinct_months() {
        let mut rng = StdRng::seed_from_u64(1);
        let points = random_trends(&mut rng, today());
        assert_eq!(points.len(), 18);

        let months: HashSet<_> = points.iter().map(|(month, _, _)| month.as_str()).collect();
        assert_eq!(months.len(), 6);
        assert!(months.contains("2024-03"));
        assert!(months.contains("2023-10"));
    }

    #[test]
    fn test_salary_rows_follow_templates() {
        let mut rng = StdRng::seed_from_u64(42);
        let rows = salary_rows(&mut rng, 9, today());

        let roles: HashSet<_> = rows.iter().map(|row| row.job_title.as_str()).collect();
        assert!((3..=5).contains(&roles.len()));
        assert_eq!(rows.len(), roles.len() * 4);

        for row in &rows {
            let bonus = row.bonus.unwrap();
            let equity = row.equity.unwrap();
            assert!((row.total_compensation - (row.base_salary + bonus + equity)).abs() < 0.02);
            assert_eq!(row.currency, "USD");
        }

        let entry_engineer = rows
            .iter()
            .find(|row| row.job_title == "Software Engineer" && row.level.as_deref() == Some("Entry"));
        if let Some(row) = entry_engineer {
            assert!((110_000.0..=130_000.0).contains(&row.base_salary));
            assert_eq!(row.years_experience, Some(0));
        }
    }

    #[test]
    fn test_turnover_csv_skips_bad_rows() {
        let rows = parse_turnover_csv(
            "name,turnover_rate,avg_tenure\nGoogle, 9.5, 4.0\n,12.0,3.0\nNetflix,abc,3.8\nStripe,12.3,\n",
        )
        .unwrap();

        let names: Vec<_> = rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["Google", "Stripe"]);
        assert_eq!(rows[0].turnover_rate, 9.5);
        assert_eq!(rows[1].avg_tenure, None);
    }
}
