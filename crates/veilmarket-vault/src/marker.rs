//! The encryption marker
//!
//! The cluster stores a field as secret-shares instead of plaintext when
//! its value arrives as a one-key `{"%share": value}` object. Marking is
//! the last step before submission: the record builder names the
//! confidential paths, this module rewrites them.
//!
//! Marking is not idempotent. Applying it twice to the same path wraps the
//! wrapper, and the cluster would then share the wrapper object itself.
//! Callers mark each path at most once.

use serde_json::{json, Value};

/// Key of the secret-share wrapper object
pub const MARKER_KEY: &str = "%share";

/// Wrap a single value for secret-sharing
pub fn wrap_secret(value: Value) -> Value {
    json!({ MARKER_KEY: value })
}

/// Rewrite the named fields of `record` into secret-share wrappers.
///
/// Paths may be dotted (`parent.child`) for one level of nesting. Paths
/// absent from the record are skipped; everything else is carried over
/// unchanged. The input is never mutated.
pub fn mark_secret_fields(record: &Value, paths: &[&str]) -> Value {
    let Some(map) = record.as_object() else {
        return record.clone();
    };
    let mut out = map.clone();

    for path in paths {
        match path.split_once('.') {
            None => {
                if let Some(v) = out.get_mut(*path) {
                    *v = wrap_secret(v.take());
                }
            }
            Some((parent, child)) => {
                if let Some(Value::Object(inner)) = out.get_mut(parent) {
                    if let Some(v) = inner.get_mut(child) {
                        *v = wrap_secret(v.take());
                    }
                }
            }
        }
    }

    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_marks_exactly_the_named_fields() {
        let record = json!({
            "name": "Ada",
            "email": "ada@example.com",
            "category": "consulting"
        });

        let marked = mark_secret_fields(&record, &["name", "email"]);

        assert_eq!(marked["name"], json!({ "%share": "Ada" }));
        assert_eq!(marked["email"], json!({ "%share": "ada@example.com" }));
        assert_eq!(marked["category"], json!("consulting"));
    }

    #[test]
    fn test_input_is_untouched() {
        let record = json!({ "name": "Ada" });
        let _ = mark_secret_fields(&record, &["name"]);
        assert_eq!(record["name"], json!("Ada"));
    }

    #[test]
    fn test_dotted_path_marks_only_the_child() {
        let record = json!({
            "provider": { "name": "Ada", "id": "provider-1" }
        });

        let marked = mark_secret_fields(&record, &["provider.name"]);

        assert_eq!(marked["provider"]["name"], json!({ "%share": "Ada" }));
        assert_eq!(marked["provider"]["id"], json!("provider-1"));
    }

    #[test]
    fn test_absent_paths_are_skipped() {
        let record = json!({ "name": "Ada" });

        let marked = mark_secret_fields(&record, &["meeting_link", "provider.contact"]);

        assert_eq!(marked, record);
        assert!(marked.get("meeting_link").is_none());
    }

    #[test]
    fn test_double_application_wraps_the_wrapper() {
        // Not guarded; the contract is "mark each path at most once".
        let record = json!({ "name": "Ada" });

        let once = mark_secret_fields(&record, &["name"]);
        let twice = mark_secret_fields(&once, &["name"]);

        assert_eq!(twice["name"], json!({ "%share": { "%share": "Ada" } }));
    }

    #[test]
    fn test_non_object_values_can_be_marked() {
        let record = json!({ "rating": 5, "flags": ["a", "b"] });

        let marked = mark_secret_fields(&record, &["rating", "flags"]);

        assert_eq!(marked["rating"], json!({ "%share": 5 }));
        assert_eq!(marked["flags"], json!({ "%share": ["a", "b"] }));
    }
}
