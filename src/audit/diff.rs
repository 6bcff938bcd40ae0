//! Diff generation for audit logging
//!
//! Summarizes top-level field changes between two record snapshots. String
//! lists (group members, expense participants) are reported as additions
//! and removals rather than whole-list replacements.

use serde_json::Value;

/// Generate a human-readable diff between two JSON values
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes = Vec::new();

            for (key, before_val) in before_obj {
                match after_obj.get(key) {
                    Some(after_val) if before_val != after_val => {
                        let change = describe_change(before_val, after_val);
                        changes.push(format!("{}: {}", key, change));
                    }
                    Some(_) => {}
                    None => changes.push(format!(
                        "{}: {} -> (removed)",
                        key,
                        format_value(before_val)
                    )),
                }
            }

            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) {
                    changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
                }
            }

            if changes.is_empty() {
                None
            } else {
                Some(changes.join(", "))
            }
        }
        _ if before != after => Some(describe_change(before, after)),
        _ => None,
    }
}

fn describe_change(before: &Value, after: &Value) -> String {
    if let (Some(old), Some(new)) = (string_list(before), string_list(after)) {
        let added = new.iter().filter(|s| !old.contains(*s)).map(|s| format!("+{s}"));
        let removed = old.iter().filter(|s| !new.contains(*s)).map(|s| format!("-{s}"));
        let parts: Vec<String> = added.chain(removed).collect();
        if !parts.is_empty() {
            return parts.join(" ");
        }
    }
    format!("{} -> {}", format_value(before), format_value(after))
}

fn string_list(value: &Value) -> Option<Vec<&str>> {
    value.as_array()?.iter().map(Value::as_str).collect()
}

/// Format a JSON value for human-readable display
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.chars().count() > 50 {
                let head: String = s.chars().take(47).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_member_added_and_removed() {
        let before = json!({"name": "Lisbon", "members": ["Ana", "Luis"]});
        let after = json!({"name": "Lisbon", "members": ["Ana", "Marta"]});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "members: +Marta -Luis");
    }

    #[test]
    fn test_scalar_change() {
        let before = json!({"name": "Old"});
        let after = json!({"name": "New"});
        assert_eq!(
            generate_diff(&before, &after).unwrap(),
            "name: \"Old\" -> \"New\""
        );
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"description": "x"});
        let after = json!({"participants": ["Ana"]});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("description: \"x\" -> (removed)"));
        assert!(diff.contains("participants: (added) -> [1 items]"));
    }

    #[test]
    fn test_no_changes() {
        let value = json!({"members": ["Ana"]});
        assert!(generate_diff(&value, &value).is_none());
    }

    #[test]
    fn test_reordered_list_falls_back_to_counts() {
        let before = json!({"members": ["Ana", "Luis"]});
        let after = json!({"members": ["Luis", "Ana"]});
        assert_eq!(
            generate_diff(&before, &after).unwrap(),
            "members: [2 items] -> [2 items]"
        );
    }

    #[test]
    fn test_long_string_truncation() {
        let before = json!({"description": "a".repeat(100)});
        let after = json!({"description": "short"});
        assert!(generate_diff(&before, &after).unwrap().contains("...\""));
    }
}
