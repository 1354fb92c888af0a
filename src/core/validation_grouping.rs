//! Grouping of GBFS validation errors.
//!
//! A single feed can produce thousands of errors that differ only in an array
//! index. Errors are folded into groups keyed by their index-free path,
//! message and schema path so the report stays readable.

use crate::domain::model::FileValidationError;
use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

pub const MAX_EXAMPLE_PATHS: usize = 5;

static INNER_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+/").expect("inner index pattern is valid"));
static TRAILING_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+$").expect("trailing index pattern is valid"));
static EMBEDDED_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#?/[^\s:]+/\d+/[^\s:]*").expect("embedded path pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedValidationError {
    pub message: String,
    pub schema_path: String,
    pub normalized_path: String,
    pub count: usize,
    pub example_paths: Vec<String>,
}

impl GroupedValidationError {
    /// Occurrences not covered by `example_paths`.
    pub fn hidden_examples(&self) -> usize {
        self.count.saturating_sub(self.example_paths.len())
    }
}

/// `#/data/bikes/0/last_reported` -> `#/data/bikes/[*]/last_reported`.
///
/// Matches do not overlap, so consecutive indices such as `/0/1/` only have
/// the first one replaced.
pub fn normalize_violation_path(path: &str) -> String {
    let inner = INNER_INDEX.replace_all(path, "/[*]/");
    TRAILING_INDEX.replace(&inner, "/[*]").into_owned()
}

pub fn normalize_message(message: &str) -> String {
    EMBEDDED_PATH
        .replace_all(message, |caps: &Captures| normalize_violation_path(&caps[0]))
        .into_owned()
}

/// Groups errors and orders the groups by occurrence count, most frequent
/// first. Groups with equal counts keep the order they first appeared in.
pub fn group_validation_errors(errors: &[FileValidationError]) -> Vec<GroupedValidationError> {
    let mut groups: Vec<GroupedValidationError> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for error in errors {
        let normalized_path = normalize_violation_path(&error.violation_path);
        let normalized_message = normalize_message(&error.message);
        let key = format!(
            "{}||{}||{}",
            normalized_path, normalized_message, error.schema_path
        );

        match index.get(&key) {
            Some(&i) => {
                let group = &mut groups[i];
                group.count += 1;
                if group.example_paths.len() < MAX_EXAMPLE_PATHS {
                    group.example_paths.push(error.violation_path.clone());
                }
            }
            None => {
                index.insert(key, groups.len());
                groups.push(GroupedValidationError {
                    message: normalized_message,
                    schema_path: error.schema_path.clone(),
                    normalized_path,
                    count: 1,
                    example_paths: vec![error.violation_path.clone()],
                });
            }
        }
    }

    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(message: &str, schema: &str, path: &str) -> FileValidationError {
        FileValidationError {
            message: message.to_string(),
            schema_path: schema.to_string(),
            violation_path: path.to_string(),
        }
    }

    #[test]
    fn normalizes_inner_and_trailing_indices() {
        assert_eq!(
            normalize_violation_path("#/data/bikes/0/last_reported"),
            "#/data/bikes/[*]/last_reported"
        );
        assert_eq!(normalize_violation_path("#/data/bikes/12"), "#/data/bikes/[*]");
        assert_eq!(normalize_violation_path("#/data/ttl"), "#/data/ttl");
    }

    #[test]
    fn adjacent_indices_are_not_overlapped() {
        assert_eq!(
            normalize_violation_path("#/data/zones/0/1/coords"),
            "#/data/zones/[*]/1/coords"
        );
    }

    #[test]
    fn normalizes_paths_embedded_in_messages() {
        assert_eq!(
            normalize_message("#/data/bikes/7/last_reported: expected type: Integer"),
            "#/data/bikes/[*]/last_reported: expected type: Integer"
        );
        assert_eq!(
            normalize_message("required key [ttl] not found"),
            "required key [ttl] not found"
        );
    }

    #[test]
    fn groups_by_normalized_path_message_and_schema() {
        let errors = vec![
            error(
                "#/data/bikes/0/lat: expected Number",
                "#/properties/data/bikes/items/lat",
                "#/data/bikes/0/lat",
            ),
            error(
                "#/data/bikes/1/lat: expected Number",
                "#/properties/data/bikes/items/lat",
                "#/data/bikes/1/lat",
            ),
            error(
                "required key [ttl] not found",
                "#/required",
                "#",
            ),
        ];

        let groups = group_validation_errors(&errors);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].normalized_path, "#/data/bikes/[*]/lat");
        assert_eq!(groups[0].message, "#/data/bikes/[*]/lat: expected Number");
        assert_eq!(
            groups[0].example_paths,
            vec!["#/data/bikes/0/lat", "#/data/bikes/1/lat"]
        );
        assert_eq!(groups[1].count, 1);
    }

    #[test]
    fn keeps_at_most_five_examples() {
        let errors: Vec<_> = (0..8)
            .map(|i| {
                error(
                    "expected Integer",
                    "#/items/capacity",
                    &format!("#/data/stations/{}/capacity", i),
                )
            })
            .collect();

        let groups = group_validation_errors(&errors);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].count, 8);
        assert_eq!(groups[0].example_paths.len(), MAX_EXAMPLE_PATHS);
        assert_eq!(groups[0].hidden_examples(), 3);
        assert_eq!(groups[0].example_paths[0], "#/data/stations/0/capacity");
    }

    #[test]
    fn equal_counts_keep_first_appearance_order() {
        let errors = vec![
            error("b", "#/b", "#/b"),
            error("a", "#/a", "#/a"),
            error("c", "#/c", "#/data/c/0"),
            error("c", "#/c", "#/data/c/1"),
        ];

        let groups = group_validation_errors(&errors);
        let messages: Vec<_> = groups.iter().map(|g| g.message.as_str()).collect();
        assert_eq!(messages, vec!["c", "b", "a"]);
    }

    #[test]
    fn different_schema_paths_stay_separate() {
        let errors = vec![
            error("invalid", "#/one", "#/data/x/0"),
            error("invalid", "#/two", "#/data/x/1"),
        ];
        assert_eq!(group_validation_errors(&errors).len(), 2);
    }
}
