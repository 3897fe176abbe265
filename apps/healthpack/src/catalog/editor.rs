//! Catalog authoring: validate a drafted check, assign it the next ID, and
//! insert it into its group.
//!
//! IDs are `<type letter><3-digit sequence>`. The sequence is one past the
//! highest existing sequence with the same letter across all groups, so IDs
//! stay globally unique even though the file is grouped.

use super::{parse_id, CatalogError};
use crate::models::catalog::{Catalog, Check, CheckType, Group, Messages, Severity};

/// Fields collected for a new check before it gets an ID.
#[derive(Debug, Clone)]
pub struct NewCheck {
    pub group: Group,
    pub check_type: CheckType,
    pub severity: Severity,
    pub name: String,
    pub description: String,
    pub pass: String,
    pub fail: String,
    pub ignore: String,
    pub error: String,
}

impl NewCheck {
    pub fn validate(&self) -> Result<(), CatalogError> {
        let required = [
            ("name", &self.name),
            ("description", &self.description),
            ("pass message", &self.pass),
            ("fail message", &self.fail),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CatalogError::MissingField(field));
            }
        }
        Ok(())
    }
}

/// Next free ID for `prefix` given every existing ID.
pub fn next_id<'a>(
    prefix: char,
    ids: impl IntoIterator<Item = &'a str>,
) -> Result<String, CatalogError> {
    let highest = ids
        .into_iter()
        .filter_map(parse_id)
        .filter(|(p, _)| *p == prefix)
        .map(|(_, seq)| seq)
        .max()
        .unwrap_or(0);
    let next = highest
        .checked_add(1)
        .ok_or(CatalogError::IdSpaceExhausted(prefix))?;
    Ok(format!("{}{:03}", prefix, next))
}

pub fn next_check_id(check_type: CheckType, catalog: &Catalog) -> Result<String, CatalogError> {
    next_id(check_type.id_prefix(), catalog.ids())
}

/// Validate `draft`, assign its ID, and insert it. Returns the new ID.
pub fn add_check(catalog: &mut Catalog, draft: NewCheck) -> Result<String, CatalogError> {
    draft.validate()?;
    let id = next_check_id(draft.check_type, catalog)?;
    let check = Check {
        id: id.clone(),
        name: title_case(draft.name.trim()),
        description: draft.description.trim().to_string(),
        severity: draft.severity,
        check_type: draft.check_type,
        messages: Messages {
            pass: draft.pass,
            fail: draft.fail,
            ignore: draft.ignore,
            error: draft.error,
        },
    };
    catalog.insert(draft.group, check);
    Ok(id)
}

/// Uppercase the first letter of each whitespace-separated word.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(check_type: CheckType) -> NewCheck {
        NewCheck {
            group: Group::Packet,
            check_type,
            severity: Severity::Medium,
            name: "plugin health jobs".into(),
            description: "Plugin jobs succeed".into(),
            pass: "ok".into(),
            fail: "failed".into(),
            ignore: String::new(),
            error: String::new(),
        }
    }

    #[test]
    fn test_next_id_scans_all_groups_by_prefix() {
        assert_eq!(next_id('p', ["e001", "p001", "p002"]).unwrap(), "p003");
        assert_eq!(next_id('a', ["e001", "p001", "p002"]).unwrap(), "a001");
        assert_eq!(next_id('h', ["h009", "h011", "p020"]).unwrap(), "h012");
    }

    #[test]
    fn test_next_id_ignores_malformed_keys() {
        assert_eq!(next_id('h', ["hello", "h", "h002"]).unwrap(), "h003");
    }

    #[test]
    fn test_next_id_past_largest_sequence_is_an_error() {
        assert!(matches!(
            next_id('h', ["h4294967295"]),
            Err(CatalogError::IdSpaceExhausted('h'))
        ));
        // Other prefixes are unaffected.
        assert_eq!(next_id('p', ["h4294967295"]).unwrap(), "p001");
    }

    #[test]
    fn test_add_check_on_exhausted_prefix_leaves_catalog_unchanged() {
        let yaml = r#"
packet:
  h4294967295:
    name: Last
    description: D
    severity: low
    type: health
    messages:
      pass: ok
      fail: bad
"#;
        let mut catalog = crate::catalog::parse(yaml).unwrap();
        let before = catalog.clone();
        let err = add_check(&mut catalog, draft(CheckType::Health)).unwrap_err();
        assert!(matches!(err, CatalogError::IdSpaceExhausted('h')));
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_add_check_assigns_id_across_groups() {
        let mut catalog = crate::catalog::builtin().unwrap();
        // Highest health id lives in the packet group.
        let mut d = draft(CheckType::Health);
        d.group = Group::Environment;
        let id = add_check(&mut catalog, d).unwrap();
        assert_eq!(id, "h018");
        let added = catalog.get(Group::Environment, "h018").unwrap();
        assert_eq!(added.name, "Plugin Health Jobs");
        assert_eq!(added.id, "h018");
        crate::catalog::validate(&catalog).unwrap();
    }

    #[test]
    fn test_add_check_first_of_type() {
        let mut catalog = crate::catalog::builtin().unwrap();
        let id = add_check(&mut catalog, draft(CheckType::Adoption)).unwrap();
        assert_eq!(id, "a001");
        let id = add_check(&mut catalog, draft(CheckType::Adoption)).unwrap();
        assert_eq!(id, "a002");
    }

    #[test]
    fn test_add_check_requires_fields() {
        let mut catalog = Catalog::default();
        let mut d = draft(CheckType::Health);
        d.fail = "  ".into();
        let err = add_check(&mut catalog, d).unwrap_err();
        assert!(matches!(err, CatalogError::MissingField("fail message")));
        assert!(catalog.groups.is_empty());
    }

    #[test]
    fn test_persisted_group_is_sorted() {
        let mut catalog = crate::catalog::builtin().unwrap();
        add_check(&mut catalog, draft(CheckType::Adoption)).unwrap();
        let ids: Vec<_> = catalog.group(Group::Packet).unwrap().keys().cloned().collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.first().map(String::as_str), Some("a001"));
    }
}
