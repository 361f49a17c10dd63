//! Area entity: an organizational unit that claims can be routed to.

use serde::{Deserialize, Serialize};

/// One entry in an area's ordered sub-area list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubArea {
    /// Store-generated id.
    pub id: i64,
    /// Unique within the area, compared case-insensitively.
    pub name: String,
}

/// An organizational unit claims are routed to.
///
/// Areas are never physically deleted; deactivation is refused while the
/// area still has active employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: i64,
    /// Unique across areas.
    pub name: String,
    pub description: String,
    /// Ordered list, position preserved across renames.
    pub sub_areas: Vec<SubArea>,
    pub is_active: bool,
    pub created_at_us: i64,
    pub updated_at_us: i64,
}

impl Area {
    /// Whether `name` collides with an existing sub-area, ignoring case.
    #[must_use]
    pub fn has_sub_area_named(&self, name: &str) -> bool {
        self.sub_areas
            .iter()
            .any(|sub| sub.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area_with(names: &[&str]) -> Area {
        Area {
            id: 1,
            name: "IT".into(),
            description: String::new(),
            sub_areas: names
                .iter()
                .enumerate()
                .map(|(i, name)| SubArea {
                    id: i64::try_from(i).expect("small index") + 1,
                    name: (*name).to_string(),
                })
                .collect(),
            is_active: true,
            created_at_us: 0,
            updated_at_us: 0,
        }
    }

    #[test]
    fn sub_area_lookup_ignores_case() {
        let area = area_with(&["Backend", "Frontend"]);
        assert!(area.has_sub_area_named("backend"));
        assert!(area.has_sub_area_named("FRONTEND"));
        assert!(!area.has_sub_area_named("Networks"));
    }
}
