//! Recipient resolver — turns a household record into the set of users to
//! notify.
//!
//! Membership arrives in one of three legacy shapes (`memberIds` array with
//! possible null holes, `members` array, `members` map keyed by id). The
//! resolver normalizes all of them into one deduplicated, ordered id set
//! and subtracts the excluded actors (typically the event's originator).

use std::collections::HashSet;

use herald_common::types::{HouseholdDoc, MemberField};

/// Stateless recipient resolver.
pub struct RecipientResolver;

impl RecipientResolver {
    pub fn new() -> Self {
        Self
    }

    /// Compute the recipients for a household, excluding `exclude`.
    ///
    /// Returns an empty vec — never an error — when the household has no
    /// members or every member is excluded. Order is first occurrence in
    /// the source record.
    pub fn resolve(&self, household: &HouseholdDoc, exclude: &[&str]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut recipients = Vec::new();

        for id in Self::member_ids(household) {
            if id.is_empty() || exclude.contains(&id.as_str()) {
                continue;
            }
            if seen.insert(id.clone()) {
                recipients.push(id);
            }
        }

        recipients
    }

    /// Flatten the membership field into raw ids, dropping holes.
    ///
    /// Shape precedence matches the source data's history: `memberIds`
    /// array first, then `members` as an array, then `members` as a map.
    fn member_ids(household: &HouseholdDoc) -> Vec<String> {
        if let Some(ids) = &household.member_ids {
            return ids.iter().flatten().cloned().collect();
        }

        match &household.members {
            Some(MemberField::List(ids)) => ids.iter().flatten().cloned().collect(),
            Some(MemberField::Map(map)) => map.keys().cloned().collect(),
            None => Vec::new(),
        }
    }
}

impl Default for RecipientResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn household_from(value: serde_json::Value) -> HouseholdDoc {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_member_ids_array_with_holes_deduplicated() {
        let hh = household_from(serde_json::json!({
            "memberIds": ["a", null, "b", "a", ""]
        }));
        let resolver = RecipientResolver::new();
        assert_eq!(resolver.resolve(&hh, &[]), vec!["a", "b"]);
    }

    #[test]
    fn test_members_array_shape() {
        let hh = household_from(serde_json::json!({
            "members": ["x", null, "y"]
        }));
        let resolver = RecipientResolver::new();
        assert_eq!(resolver.resolve(&hh, &[]), vec!["x", "y"]);
    }

    #[test]
    fn test_members_map_shape_uses_keys() {
        let hh = household_from(serde_json::json!({
            "members": {"a": true, "c": {"role": "admin"}, "b": 1}
        }));
        let resolver = RecipientResolver::new();
        let mut got = resolver.resolve(&hh, &[]);
        got.sort();
        assert_eq!(got, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_member_ids_takes_precedence_over_members() {
        let hh = household_from(serde_json::json!({
            "memberIds": ["a"],
            "members": ["b", "c"]
        }));
        let resolver = RecipientResolver::new();
        assert_eq!(resolver.resolve(&hh, &[]), vec!["a"]);
    }

    #[test]
    fn test_exclusion() {
        let hh = household_from(serde_json::json!({
            "memberIds": ["a", "b", "c"]
        }));
        let resolver = RecipientResolver::new();
        let got: HashSet<String> = resolver.resolve(&hh, &["b"]).into_iter().collect();
        assert_eq!(got, HashSet::from(["a".to_string(), "c".to_string()]));
    }

    #[test]
    fn test_all_members_excluded_yields_empty() {
        let hh = household_from(serde_json::json!({"memberIds": ["solo"]}));
        let resolver = RecipientResolver::new();
        assert!(resolver.resolve(&hh, &["solo"]).is_empty());
    }

    #[test]
    fn test_no_membership_field_yields_empty() {
        let hh = household_from(serde_json::json!({}));
        let resolver = RecipientResolver::new();
        assert!(resolver.resolve(&hh, &[]).is_empty());
    }
}
