use crate::state::AppState;
use serde_json::Value;

/// Cache key for the activity feed payload.
pub const ACTIVITY_CACHE_KEY: &str = "github:activity";

/// Cache key for the analytics summary payload.
pub const ANALYTICS_CACHE_KEY: &str = "github:analytics";

/// Flip the `cached` flag on a stored payload before serving it
pub(crate) fn mark_cached(value: &mut Value) {
    if let Some(obj) = value.as_object_mut() {
        obj.insert("cached".to_string(), Value::Bool(true));
    }
}

/// Invalidate both endpoint payloads
pub fn clear_caches(state: &AppState) {
    state.cache.remove(ACTIVITY_CACHE_KEY);
    state.cache.remove(ANALYTICS_CACHE_KEY);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_cached_flips_the_flag() {
        let mut value = serde_json::json!({"cached": false, "events": []});
        mark_cached(&mut value);
        assert_eq!(value["cached"], true);
    }
}
