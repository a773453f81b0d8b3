use once_cell::sync::Lazy;
use regex::Regex;

static TITLE_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+(?:-|–|\||@|bij|at)\s+").expect("title separator regex is valid")
});
static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)").expect("parenthetical regex is valid"));

/// Lowercases, drops periods and commas, turns hyphens into spaces and
/// collapses whitespace. Idempotent.
pub fn normalize_company_name(name: &str) -> String {
    let cleaned: String = name
        .to_lowercase()
        .chars()
        .filter(|c| *c != '.' && *c != ',')
        .map(|c| if c == '-' { ' ' } else { c })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Two names denote the same company when their normalized forms are equal or
/// one contains the other ("Kader" vs "Kader Group").
///
/// An empty normalized name only equals another empty one; it is never a
/// substring match. Known false positives: "Holland" matches "New Holland".
pub fn are_companies_same(a: &str, b: &str) -> bool {
    let a = normalize_company_name(a);
    let b = normalize_company_name(b);
    a == b || (!a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a)))
}

/// Pulls a company name out of a vacancy title such as
/// "Sales Manager - Kader Group" or "Planner bij Kader (32 uur)".
/// Returns the trailing segment after the last separator, if any.
pub fn extract_company_from_title(title: &str) -> Option<String> {
    let without_parens = PARENTHETICAL.replace_all(title, " ");
    let segments: Vec<&str> = TITLE_SEPARATOR.split(without_parens.trim()).collect();
    if segments.len() < 2 {
        return None;
    }

    let candidate = segments.last()?.trim();
    if candidate.is_empty() {
        None
    } else {
        Some(candidate.to_string())
    }
}
