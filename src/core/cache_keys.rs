use serde::Serialize;
use std::collections::HashMap;

pub const OTHER_GROUP: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheKeyGroup {
    pub name: String,
    pub keys: Vec<String>,
}

/// Cache keys are named `<type>_<rest>`; keys without `_` land in `Other`.
pub fn key_type(key: &str) -> &str {
    match key.split_once('_') {
        Some((prefix, _)) => prefix,
        None => OTHER_GROUP,
    }
}

/// Groups keys by type, groups ordered by first appearance.
pub fn group_cache_keys(keys: &[String]) -> Vec<CacheKeyGroup> {
    let mut groups: Vec<CacheKeyGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for key in keys {
        let name = key_type(key);
        match index.get(name) {
            Some(&i) => groups[i].keys.push(key.clone()),
            None => {
                index.insert(name, groups.len());
                groups.push(CacheKeyGroup {
                    name: name.to_string(),
                    keys: vec![key.clone()],
                });
            }
        }
    }
    groups
}
