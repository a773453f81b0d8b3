//! Maps untyped ATS JSON into strict records.
//!
//! Field-name fallbacks live here and nowhere else:
//! - list payloads: `{ "offers": [...] }`, `{ "candidates": [...] }`, `{ "data": [...] }` or a bare array
//! - ids: number or numeric string
//! - vacancy company: `company_id` / `company.id` / `department_id`, `company.name` / `company_name` / `department`
//!
//! Records without an id are skipped with a warning; every other missing field
//! gets a deterministic default.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::warn;

use crate::ats::models::{
    Candidate, Company, Placement, StageCategory, Vacancy, VacancyStatus,
};

type Object = Map<String, Value>;

pub const UNTITLED: &str = "Untitled vacancy";

pub fn parse_vacancies(payload: &Value) -> Vec<Vacancy> {
    list_items(payload, &["offers", "jobs", "data"])
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let parsed = parse_vacancy(obj);
            if parsed.is_none() {
                warn!("Skipping ATS vacancy without an id: {item}");
            }
            parsed
        })
        .collect()
}

pub fn parse_candidates(payload: &Value) -> Vec<Candidate> {
    list_items(payload, &["candidates", "data"])
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let parsed = parse_candidate(obj);
            if parsed.is_none() {
                warn!("Skipping ATS candidate without an id");
            }
            parsed
        })
        .collect()
}

fn parse_vacancy(obj: &Object) -> Option<Vacancy> {
    let job_id = first_i64(obj, &["id", "offer_id", "job_id"])?;
    let title = first_str(obj, &["title", "name", "position"])
        .unwrap_or(UNTITLED)
        .to_string();

    let company_obj = obj.get("company").and_then(Value::as_object);

    let company_id = first_i64(obj, &["company_id"])
        .or_else(|| company_obj.and_then(|c| first_i64(c, &["id"])))
        .or_else(|| first_i64(obj, &["department_id"]))
        .unwrap_or(0);

    let company_name = company_obj
        .and_then(|c| first_str(c, &["name"]))
        .or_else(|| first_str(obj, &["company_name", "department"]))
        .or_else(|| {
            obj.get("department")
                .and_then(Value::as_object)
                .and_then(|d| first_str(d, &["name"]))
        });

    let company = company_name.map(|name| Company {
        company_id,
        name: name.to_string(),
    });

    Some(Vacancy {
        job_id,
        company_id,
        title,
        company,
        status: first_str(obj, &["status", "state"])
            .map(parse_status)
            .unwrap_or_default(),
        created_at: first_datetime(obj, &["created_at", "published_at"]),
    })
}

fn parse_candidate(obj: &Object) -> Option<Candidate> {
    let id = first_i64(obj, &["id", "candidate_id"])?;

    let name = first_str(obj, &["name", "full_name"])
        .map(str::to_string)
        .or_else(|| {
            let first = first_str(obj, &["first_name"]).unwrap_or_default();
            let last = first_str(obj, &["last_name"]).unwrap_or_default();
            let joined = format!("{first} {last}").trim().to_string();
            (!joined.is_empty()).then_some(joined)
        })
        .unwrap_or_else(|| format!("Candidate {id}"));

    let email = first_str(obj, &["email"])
        .map(str::to_string)
        .or_else(|| {
            obj.get("emails")
                .and_then(Value::as_array)
                .and_then(|a| a.first())
                .and_then(Value::as_str)
                .map(str::to_string)
        });

    let placements = ["placements", "applications"]
        .iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .filter_map(parse_placement)
                .collect()
        })
        .unwrap_or_default();

    Some(Candidate {
        id,
        name,
        email,
        placements,
    })
}

fn parse_placement(obj: &Object) -> Option<Placement> {
    let job_id = first_i64(obj, &["offer_id", "job_id", "vacancy_id"])?;

    let stage_name = obj
        .get("stage")
        .and_then(|s| match s {
            Value::String(name) => Some(name.as_str()),
            Value::Object(o) => first_str(o, &["name"]),
            _ => None,
        })
        .or_else(|| first_str(obj, &["stage_name"]))
        .map(str::to_string);

    let hired_at = first_datetime(obj, &["hired_at"]);
    let disqualified = obj
        .get("disqualified")
        .and_then(Value::as_bool)
        .unwrap_or(false)
        || ["disqualified_at", "disqualify_reason"]
            .iter()
            .any(|k| obj.get(*k).is_some_and(|v| !v.is_null()))
        || stage_name.as_deref().is_some_and(is_rejection_stage);

    Some(Placement {
        job_id,
        stage: classify_stage(stage_name.as_deref(), hired_at.is_some()),
        stage_name,
        created_at: first_datetime(obj, &["created_at"]),
        hired_at,
        disqualified,
    })
}

const HIRED_KEYWORDS: &[&str] = &["hired", "aangenomen", "geplaatst", "placed"];
const REJECTION_KEYWORDS: &[&str] = &["niet ", "not ", "rejected", "afgewezen", "declined"];

fn contains_any(name: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| name.contains(n))
}

/// True for stage names that record a rejection ("Niet aangenomen", "Afgewezen").
pub fn is_rejection_stage(stage_name: &str) -> bool {
    contains_any(&stage_name.to_lowercase(), REJECTION_KEYWORDS)
}

/// Buckets a free-text stage name. A placement with a hire date is always `Hired`.
///
/// A negated hire ("Not hired") is never `Hired`: it falls back to the stage it
/// names, or `Interview` when only the hiring decision is mentioned.
pub fn classify_stage(stage_name: Option<&str>, hired: bool) -> StageCategory {
    if hired {
        return StageCategory::Hired;
    }
    let Some(name) = stage_name.map(str::to_lowercase) else {
        return StageCategory::Applied;
    };

    let has = |needles: &[&str]| contains_any(&name, needles);
    let rejected = has(REJECTION_KEYWORDS);

    if has(HIRED_KEYWORDS) && !rejected {
        StageCategory::Hired
    } else if has(&["offer", "aanbod", "contract"]) {
        StageCategory::Offer
    } else if has(&["interview", "gesprek", "assessment"]) {
        StageCategory::Interview
    } else if has(&["screen", "phone", "telefo", "selectie", "review"]) {
        StageCategory::Screening
    } else if has(HIRED_KEYWORDS) {
        StageCategory::Interview
    } else {
        StageCategory::Applied
    }
}

fn parse_status(raw: &str) -> VacancyStatus {
    match raw.trim().to_lowercase().as_str() {
        "published" | "open" | "active" => VacancyStatus::Published,
        "draft" => VacancyStatus::Draft,
        "closed" | "filled" => VacancyStatus::Closed,
        "archived" => VacancyStatus::Archived,
        _ => VacancyStatus::Unknown,
    }
}

fn list_items<'a>(payload: &'a Value, keys: &[&str]) -> &'a [Value] {
    if let Some(items) = payload.as_array() {
        return items;
    }
    keys.iter()
        .find_map(|k| payload.get(*k).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn first_i64(obj: &Object, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|k| match obj.get(*k)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn first_str<'a>(obj: &'a Object, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

fn first_datetime(obj: &Object, keys: &[&str]) -> Option<DateTime<Utc>> {
    first_str(obj, keys)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vacancies_from_wrapped_payload() {
        let payload = json!({
            "offers": [
                {
                    "id": 101,
                    "title": "Sales Manager",
                    "company": {"id": 7, "name": "Kader Group"},
                    "status": "published",
                    "created_at": "2026-01-05T09:00:00Z"
                }
            ]
        });
        let vacancies = parse_vacancies(&payload);
        assert_eq!(vacancies.len(), 1);
        let v = &vacancies[0];
        assert_eq!(v.job_id, 101);
        assert_eq!(v.company_id, 7);
        assert_eq!(v.company.as_ref().unwrap().name, "Kader Group");
        assert_eq!(v.status, VacancyStatus::Published);
        assert!(v.created_at.is_some());
    }

    #[test]
    fn test_vacancies_from_bare_array_with_fallback_fields() {
        let payload = json!([
            {"offer_id": "202", "name": "Planner", "department_id": 9, "department": "Globex"},
            {"title": "no id here"},
            {"id": 203, "position": "Driver", "company_name": "  "}
        ]);
        let vacancies = parse_vacancies(&payload);
        assert_eq!(vacancies.len(), 2);

        assert_eq!(vacancies[0].job_id, 202);
        assert_eq!(vacancies[0].title, "Planner");
        assert_eq!(vacancies[0].company_id, 9);
        assert_eq!(vacancies[0].company.as_ref().unwrap().name, "Globex");

        assert_eq!(vacancies[1].title, "Driver");
        assert_eq!(vacancies[1].company_id, 0);
        assert!(vacancies[1].company.is_none());
        assert_eq!(vacancies[1].status, VacancyStatus::Unknown);
    }

    #[test]
    fn test_unexpected_payload_yields_empty_list() {
        assert!(parse_vacancies(&json!({"message": "nope"})).is_empty());
        assert!(parse_candidates(&json!(null)).is_empty());
    }

    #[test]
    fn test_candidates_with_placements() {
        let payload = json!({
            "data": [
                {
                    "id": 1,
                    "first_name": "Sanne",
                    "last_name": "de Vries",
                    "emails": ["sanne@example.com"],
                    "placements": [
                        {"offer_id": 101, "stage": {"name": "Tweede gesprek"}, "created_at": "2026-01-01T00:00:00Z"},
                        {"offer_id": 102, "stage": "Offer", "disqualify_reason": "salary"},
                        {"stage": "Applied"}
                    ]
                }
            ]
        });
        let candidates = parse_candidates(&payload);
        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.name, "Sanne de Vries");
        assert_eq!(c.email.as_deref(), Some("sanne@example.com"));
        assert_eq!(c.placements.len(), 2);
        assert_eq!(c.placements[0].stage, StageCategory::Interview);
        assert!(!c.placements[0].disqualified);
        assert_eq!(c.placements[1].stage, StageCategory::Offer);
        assert!(c.placements[1].disqualified);
    }

    #[test]
    fn test_candidate_name_default() {
        let candidates = parse_candidates(&json!([{"id": 5}]));
        assert_eq!(candidates[0].name, "Candidate 5");
        assert!(candidates[0].placements.is_empty());
    }

    #[test]
    fn test_classify_stage() {
        assert_eq!(classify_stage(None, false), StageCategory::Applied);
        assert_eq!(classify_stage(Some("Interview"), true), StageCategory::Hired);
        assert_eq!(classify_stage(Some("Aangenomen"), false), StageCategory::Hired);
        assert_eq!(classify_stage(Some("Contractaanbod"), false), StageCategory::Offer);
        assert_eq!(classify_stage(Some("Eerste gesprek"), false), StageCategory::Interview);
        assert_eq!(classify_stage(Some("Telefonische screening"), false), StageCategory::Screening);
        assert_eq!(classify_stage(Some("Nieuw"), false), StageCategory::Applied);
    }

    #[test]
    fn test_negated_hire_is_not_hired() {
        assert_eq!(classify_stage(Some("Niet aangenomen"), false), StageCategory::Interview);
        assert_eq!(classify_stage(Some("Not hired"), false), StageCategory::Interview);
        assert_eq!(
            classify_stage(Some("Niet aangenomen na 2e gesprek"), false),
            StageCategory::Interview
        );
        assert_eq!(classify_stage(Some("Offer declined"), false), StageCategory::Offer);
        assert_eq!(classify_stage(Some("Afgewezen"), false), StageCategory::Applied);
        assert_eq!(classify_stage(Some("Niet aangenomen"), true), StageCategory::Hired);
    }

    #[test]
    fn test_rejected_placement_stays_in_silver_medalist_pool() {
        use crate::silver_medalists::detection::find_silver_medalists;

        let vacancies = parse_vacancies(&json!([
            {"id": 1, "title": "Planner"},
            {"id": 9, "title": "Senior Planner"}
        ]));
        let candidates = parse_candidates(&json!([
            {
                "id": 3,
                "name": "Joris",
                "placements": [{"offer_id": 1, "stage": "Niet aangenomen na 2e gesprek"}]
            }
        ]));

        let placement = &candidates[0].placements[0];
        assert_eq!(placement.stage, StageCategory::Interview);
        assert!(placement.disqualified);
        assert!(!candidates[0].was_hired());

        let medalists = find_silver_medalists(&candidates, &vacancies, 9);
        assert_eq!(medalists.len(), 1);
        assert_eq!(medalists[0].candidate_id, 3);
    }
}
