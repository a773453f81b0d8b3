use serde::Serialize;

use crate::companies::normalize::are_companies_same;

/// Items sharing a fuzzily-equal company name. `name` is the first name seen.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyGroup<T> {
    pub name: String,
    pub items: Vec<T>,
}

/// Groups items by company name, preserving input order of both groups and items.
/// Each item is compared against the group's representative name only.
pub fn group_by_company<T, F>(items: impl IntoIterator<Item = T>, name_of: F) -> Vec<CompanyGroup<T>>
where
    F: Fn(&T) -> &str,
{
    let mut groups: Vec<CompanyGroup<T>> = Vec::new();

    for item in items {
        let name = name_of(&item).to_string();
        match groups.iter_mut().find(|g| are_companies_same(&g.name, &name)) {
            Some(group) => group.items.push(item),
            None => groups.push(CompanyGroup {
                name,
                items: vec![item],
            }),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_near_duplicates() {
        let items = vec![
            ("Kader Group", 1),
            ("Globex", 2),
            ("kader", 3),
            ("KADER GROUP", 4),
        ];
        let groups = group_by_company(items, |item| item.0);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Kader Group");
        let ids: Vec<i32> = groups[0].items.iter().map(|(_, id)| *id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert_eq!(groups[1].name, "Globex");
    }

    #[test]
    fn test_names_normalizing_to_empty_share_one_group() {
        let items = vec![("-", 1), ("Globex", 2), ("-", 3), (".", 4)];
        let groups = group_by_company(items, |item| item.0);

        assert_eq!(groups.len(), 2);
        let ids: Vec<i32> = groups[0].items.iter().map(|(_, id)| *id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert_eq!(groups[1].items.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let groups = group_by_company(Vec::<(&str, i32)>::new(), |item| item.0);
        assert!(groups.is_empty());
    }
}
