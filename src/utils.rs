// src/utils.rs
use anyhow::Result;

/// Case-insensitive substring match
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// "City, State" label used by location filters and summaries
pub fn location_label(city: Option<&str>, state: Option<&str>) -> String {
    format!("{}, {}", city.unwrap_or(""), state.unwrap_or(""))
}

/// Keep only finite numbers; NaN and infinities count as absent
pub fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Arithmetic mean of the present, finite values
pub fn mean_of<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .filter_map(finite)
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Resolve an optional page size against a default and a hard maximum
pub fn page_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    match limit {
        Some(l) if l > 0 => l.min(max),
        _ => default,
    }
}

/// Reject text longer than `max` characters
pub fn validate_max_length(field: &str, value: Option<&str>, max: usize) -> Result<()> {
    if let Some(text) = value {
        let len = text.chars().count();
        if len > max {
            anyhow::bail!("{} must be at most {} characters (got {})", field, max, len);
        }
    }
    Ok(())
}

/// Reject ratings outside the closed 1-5 scale
pub fn validate_rating(field: &str, value: Option<f64>) -> Result<()> {
    if let Some(rating) = value {
        if !rating.is_finite() || !(1.0..=5.0).contains(&rating) {
            anyhow::bail!("{} must be between 1 and 5 (got {})", field, rating);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Google NYC", "google"));
        assert!(contains_ignore_case("google nyc", "NYC"));
        assert!(!contains_ignore_case("Apple", "pear"));
    }

    #[test]
    fn test_location_label() {
        assert_eq!(location_label(Some("Austin"), Some("TX")), "Austin, TX");
        assert_eq!(location_label(None, Some("TX")), ", TX");
    }

    #[test]
    fn test_mean_of_skips_absent_and_non_finite() {
        assert_eq!(mean_of(vec![Some(2.0), None, Some(4.0)]), Some(3.0));
        assert_eq!(mean_of(vec![Some(f64::NAN), Some(1.0)]), Some(1.0));
        assert_eq!(mean_of(vec![None, None]), None);
        assert_eq!(mean_of(Vec::<Option<f64>>::new()), None);
    }

    #[test]
    fn test_page_limit() {
        assert_eq!(page_limit(None, 20, 100), 20);
        assert_eq!(page_limit(Some(0), 20, 100), 20);
        assert_eq!(page_limit(Some(500), 20, 100), 100);
        assert_eq!(page_limit(Some(7), 20, 100), 7);
    }

    #[test]
    fn test_validate_rating() {
        assert!(validate_rating("rating", Some(1.0)).is_ok());
        assert!(validate_rating("rating", Some(5.0)).is_ok());
        assert!(validate_rating("rating", None).is_ok());
        assert!(validate_rating("rating", Some(0.5)).is_err());
        assert!(validate_rating("rating", Some(5.1)).is_err());
        assert!(validate_rating("rating", Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_validate_max_length() {
        assert!(validate_max_length("title", Some("short"), 255).is_ok());
        assert!(validate_max_length("title", Some(&"x".repeat(256)), 255).is_err());
        assert!(validate_max_length("title", None, 255).is_ok());
    }
}
