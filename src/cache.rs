//! Content-addressed cache keys.
//!
//! A node's key fingerprints everything that can change its output: its own
//! id, its parameter mapping, and the revisions of the frames it consumes, in
//! the stable order `upstream_of` returns. If the key matches the one stored
//! from the last successful run, the node's output is still valid and the
//! executor is skipped.

use crate::pipeline::Params;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Computes the cache key for one node.
///
/// The parameter mapping is canonicalized by sorting keys, so insertion order
/// never shows through. `DefaultHasher::new()` uses fixed keys, so equal
/// inputs produce equal keys across process restarts. The node id is always
/// part of the feed: two nodes with identical type, params, and upstream
/// revisions still get distinct keys.
pub fn cache_key(node_id: &str, params: &Params, upstream_revisions: &[u64]) -> String {
    let mut hasher = DefaultHasher::new();
    node_id.hash(&mut hasher);

    let mut keys: Vec<&String> = params.keys().collect();
    keys.sort_unstable();
    for key in keys {
        key.hash(&mut hasher);
        params[key].hash_canonical(&mut hasher);
    }

    upstream_revisions.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ParamValue;

    fn params(entries: &[(&str, ParamValue)]) -> Params {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn identical_inputs_give_identical_keys() {
        let p = params(&[("threshold", 0.5.into()), ("device", "auto".into())]);
        assert_eq!(cache_key("n1", &p, &[3, 7]), cache_key("n1", &p, &[3, 7]));
    }

    #[test]
    fn key_is_independent_of_param_insertion_order() {
        let forward = params(&[("threshold", 0.5.into()), ("device", "auto".into())]);
        let reversed = params(&[("device", "auto".into()), ("threshold", 0.5.into())]);
        assert_eq!(cache_key("n1", &forward, &[]), cache_key("n1", &reversed, &[]));
    }

    #[test]
    fn node_id_always_distinguishes() {
        let p = params(&[("threshold", 0.5.into())]);
        assert_ne!(cache_key("n1", &p, &[1]), cache_key("n2", &p, &[1]));
    }

    #[test]
    fn any_param_change_changes_the_key() {
        let before = params(&[("threshold", 0.5.into())]);
        let after = params(&[("threshold", 0.6.into())]);
        assert_ne!(cache_key("n1", &before, &[1]), cache_key("n1", &after, &[1]));
    }

    #[test]
    fn upstream_revisions_are_order_sensitive() {
        let p = Params::default();
        assert_ne!(cache_key("n1", &p, &[1, 2]), cache_key("n1", &p, &[2, 1]));
        assert_ne!(cache_key("n1", &p, &[1]), cache_key("n1", &p, &[]));
    }
}
