use std::collections::HashSet;

use crate::domain::entities::Tag;

/// Drops repeated names, keeping the first occurrence of each.
pub fn dedupe_tag_names(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

/// Changes needed to move an article from its current tag set to a requested one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiff {
    /// Names to connect, creating the tag row when missing
    pub add_names: Vec<String>,
    /// Currently linked tag ids to unlink
    pub remove_ids: Vec<i64>,
}

impl TagDiff {
    /// `requested == None` means the caller did not send a tag list at all,
    /// which leaves the current set untouched.
    pub fn compute(current: &[Tag], requested: Option<&[String]>) -> Self {
        let Some(requested) = requested else {
            return Self::default();
        };

        let requested = dedupe_tag_names(requested);
        let current_names: HashSet<&str> = current.iter().map(|t| t.name.as_str()).collect();
        let requested_names: HashSet<&str> = requested.iter().map(String::as_str).collect();

        let add_names = requested
            .iter()
            .filter(|name| !current_names.contains(name.as_str()))
            .cloned()
            .collect();

        let remove_ids = current
            .iter()
            .filter(|tag| !requested_names.contains(tag.name.as_str()))
            .map(|tag| tag.id)
            .collect();

        Self {
            add_names,
            remove_ids,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.add_names.is_empty() && self.remove_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(id: i64, name: &str) -> Tag {
        Tag {
            id,
            name: name.to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_missing_tag_list_changes_nothing() {
        let current = vec![tag(1, "one"), tag(2, "two")];
        let diff = TagDiff::compute(&current, None);
        assert!(diff.is_empty());
    }

    #[test]
    fn test_empty_tag_list_removes_everything() {
        let current = vec![tag(1, "one"), tag(2, "two")];
        let requested = names(&[]);
        let diff = TagDiff::compute(&current, Some(&requested));
        assert!(diff.add_names.is_empty());
        assert_eq!(diff.remove_ids, vec![1, 2]);
    }

    #[test]
    fn test_replaces_changed_tags_only() {
        let current = vec![tag(1, "one"), tag(2, "two")];
        let requested = names(&["two", "new tag"]);
        let diff = TagDiff::compute(&current, Some(&requested));
        assert_eq!(diff.add_names, names(&["new tag"]));
        assert_eq!(diff.remove_ids, vec![1]);
    }

    #[test]
    fn test_duplicate_requested_names_added_once() {
        let requested = names(&["rust", "rust", "web"]);
        let diff = TagDiff::compute(&[], Some(&requested));
        assert_eq!(diff.add_names, names(&["rust", "web"]));
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence_order() {
        assert_eq!(
            dedupe_tag_names(&names(&["b", "a", "b", "c", "a"])),
            names(&["b", "a", "c"])
        );
    }
}
