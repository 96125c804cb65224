//! Raw map literal decoding.

use classgeo_core::{Error, RawObjectSet};

/// Deserialize the map literal into typed objects.
///
/// Any syntax error, type mismatch or missing key fails the whole decode.
/// An empty object list is also rejected: only the first object carries the
/// class locations, so there would be nothing to transform.
pub fn decode_objects(literal: &str) -> Result<RawObjectSet, Error> {
    let set: RawObjectSet =
        serde_json::from_str(literal).map_err(|e| Error::Decode(format!("failed to unmarshal script data: {e}")))?;

    if set.objects.is_empty() {
        return Err(Error::Decode("script data contains no map objects".into()));
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LITERAL: &str = r#"{"KOObject":[{"id":3,"locations":[
        {"locationUrl":"https://example.com/leeds","title":"<b>Leeds</b>","address":"Roundhay Park",
         "latitude":"53.83","longitude":"-1.49","pinColor":"red"}
    ]}],"ajaxurl":"/wp-admin/admin-ajax.php"}"#;

    #[test]
    fn test_decode_objects() {
        let set = decode_objects(LITERAL).unwrap();
        assert_eq!(set.objects.len(), 1);
        assert_eq!(set.objects[0].id, 3);
        assert_eq!(set.objects[0].locations[0].title, "<b>Leeds</b>");
    }

    #[test]
    fn test_decode_syntax_error() {
        let result = decode_objects(r#"{"KOObject":[{"id":3,"#);
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_missing_key() {
        let literal = r#"{"KOObject":[{"id":3,"locations":[
            {"locationUrl":"u","title":"t","address":"a","latitude":"53.8"}]}]}"#;
        let result = decode_objects(literal);
        assert!(matches!(result, Err(Error::Decode(msg)) if msg.contains("longitude")));
    }

    #[test]
    fn test_decode_type_mismatch() {
        let literal = r#"{"KOObject":[{"id":3,"locations":[
            {"locationUrl":"u","title":"t","address":"a","latitude":53.8,"longitude":"-1.5"}]}]}"#;
        assert!(matches!(decode_objects(literal), Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_empty_objects() {
        let result = decode_objects(r#"{"KOObject":[]}"#);
        assert!(matches!(result, Err(Error::Decode(msg)) if msg.contains("no map objects")));
    }
}
