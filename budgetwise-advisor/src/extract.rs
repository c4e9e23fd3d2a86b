use serde_json::Value;

/// Pull the JSON object out of free-form model text.
///
/// Takes everything from the first `{` to the last `}`, so code fences and
/// chatter around the object are ignored.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_fenced_block() {
        let text = "Here is your budget:\n```json\n{\"summary\": \"ok\", \"allocations\": {}}\n```\nGood luck!";
        let v = extract_json_object(text).unwrap();
        assert_eq!(v["summary"], "ok");
    }

    #[test]
    fn test_nested_braces() {
        let v = extract_json_object("x {\"a\": {\"b\": 1}} y").unwrap();
        assert_eq!(v["a"]["b"], 1);
    }

    #[test]
    fn test_no_object() {
        assert!(extract_json_object("no json here").is_none());
        assert!(extract_json_object("} backwards {").is_none());
        assert!(extract_json_object("{not: valid}").is_none());
    }
}
