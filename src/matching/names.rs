use chrono::NaiveDate;

/// Normalize a team display name for cross-source matching.
///
/// Lowercases, strips everything but letters, digits and spaces, collapses
/// whitespace, and expands the common "LA"/"NY" city prefixes so that e.g.
/// "LA Clippers" and "Los Angeles Clippers" collide.
pub fn normalize_team_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    let cleaned = cleaned
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if let Some(rest) = cleaned.strip_prefix("la ") {
        return format!("los angeles {}", rest);
    }
    if let Some(rest) = cleaned.strip_prefix("ny ") {
        return format!("new york {}", rest);
    }
    cleaned
}

/// Key into the spread snapshot: `"{date}:{norm_away}@{norm_home}"`
pub fn spread_key(date: NaiveDate, away_name: &str, home_name: &str) -> String {
    format!(
        "{}:{}@{}",
        date,
        normalize_team_name(away_name),
        normalize_team_name(home_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_and_lowercases() {
        assert_eq!(normalize_team_name("Boston Celtics"), "boston celtics");
        assert_eq!(normalize_team_name("  Philadelphia  76ers "), "philadelphia 76ers");
        assert_eq!(normalize_team_name("St. Mary's"), "st marys");
    }

    #[test]
    fn test_city_prefix_expansion() {
        assert_eq!(normalize_team_name("LA Clippers"), "los angeles clippers");
        assert_eq!(normalize_team_name("NY Knicks"), "new york knicks");
        // already-expanded names pass through
        assert_eq!(
            normalize_team_name("Los Angeles Lakers"),
            "los angeles lakers"
        );
    }

    #[test]
    fn test_spread_key() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        assert_eq!(
            spread_key(date, "LA Clippers", "Boston Celtics"),
            "2026-01-10:los angeles clippers@boston celtics"
        );
    }
}
