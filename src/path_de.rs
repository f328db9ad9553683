use serde_json::Value;

use crate::error::{Error, Result};

/// Parse a JSON document, keeping the JSON path of the failure in the error.
///
/// Object key order is preserved (`serde_json/preserve_order`), which is what
/// gives inferred properties their first-seen order.
pub fn parse_document(src: &str) -> Result<Value> {
    let mut de = serde_json::Deserializer::from_str(src);
    let value = match serde_path_to_error::deserialize::<_, Value>(&mut de) {
        Ok(v) => v,
        Err(err) => {
            let path = err.path().to_string();
            return Err(Error::Parse { path, source: err.into_inner() });
        }
    };
    // reject trailing garbage after the document
    de.end().map_err(|source| Error::Parse { path: ".".to_string(), source })?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_source_key_order() {
        let v = parse_document(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let keys = v.as_object().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn reports_path_of_syntax_error() {
        let err = parse_document(r#"{"outer": {"inner": [1, 2, }}"#).unwrap_err();
        let Error::Parse { path, .. } = &err;
        assert!(path.contains("outer"), "path was {path}");
    }

    #[test]
    fn trailing_characters_are_rejected() {
        assert!(parse_document(r#"{"a": 1} x"#).is_err());
    }
}
