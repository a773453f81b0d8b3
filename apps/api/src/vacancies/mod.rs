// Vacancy dashboard: ATS vacancies joined with priority annotations and
// visibility/assignment rows, grouped per client company.

pub mod dashboard;
pub mod handlers;
pub mod store;
