//! Merging derived path names into the master manifest

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::info;

use super::error::{ManifestError, ManifestResult};
use super::path_name::PathName;

/// Attribute written on each matched entry
pub const PATH_NAME_ATTRIBUTE: &str = "PathName";

/// Set `Entries[key].Attributes.PathName` for every entry with a path name
///
/// Entries without a matching path name are left untouched. When several path
/// names share a key the first one wins. Returns the number of updated entries.
pub fn merge_path_names(manifest: &mut Value, path_names: &[PathName]) -> ManifestResult<usize> {
    let mut by_key: HashMap<&str, &str> = HashMap::with_capacity(path_names.len());
    for path_name in path_names {
        by_key
            .entry(path_name.key.as_str())
            .or_insert(path_name.name.as_str());
    }

    let entries = manifest
        .get_mut("Entries")
        .ok_or(ManifestError::MissingField("Entries"))?
        .as_object_mut()
        .ok_or_else(|| ManifestError::NotAnObject("Entries".to_string()))?;

    let mut updated = 0;
    for (key, entry) in entries.iter_mut() {
        let Some(name) = by_key.get(key.as_str()) else {
            continue;
        };

        let entry = entry
            .as_object_mut()
            .ok_or_else(|| ManifestError::NotAnObject(format!("Entries.{key}")))?;
        let attributes = entry
            .entry("Attributes")
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| ManifestError::NotAnObject(format!("Entries.{key}.Attributes")))?;

        attributes.insert(PATH_NAME_ATTRIBUTE.to_string(), Value::String((*name).to_string()));
        updated += 1;
    }

    info!(updated, total = entries.len(), "merged path names into manifest");
    Ok(updated)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_merge_sets_path_name() {
        let mut manifest = json!({
            "Entries": {
                "k1": {"Attributes": {"SongName": "Test"}},
                "k2": {"Attributes": {"SongName": "Other"}},
            },
            "InsertRoot": "Static.Songs.Headers",
        });

        let updated =
            merge_path_names(&mut manifest, &[PathName::new("k1", "Bass", "SONG1")]).unwrap();

        assert_eq!(updated, 1);
        assert_eq!(
            manifest,
            json!({
                "Entries": {
                    "k1": {"Attributes": {"SongName": "Test", "PathName": "Bass"}},
                    "k2": {"Attributes": {"SongName": "Other"}},
                },
                "InsertRoot": "Static.Songs.Headers",
            })
        );
        assert!(manifest["Entries"]["k2"]["Attributes"].get("PathName").is_none());
    }

    #[test]
    fn test_merge_preserves_key_order() {
        let mut manifest: Value =
            serde_json::from_str(r#"{"Entries":{"z":{"Attributes":{}},"a":{"Attributes":{}}}}"#)
                .unwrap();
        merge_path_names(&mut manifest, &[PathName::new("a", "Lead", "S")]).unwrap();

        assert_eq!(
            serde_json::to_string(&manifest).unwrap(),
            r#"{"Entries":{"z":{"Attributes":{}},"a":{"Attributes":{"PathName":"Lead"}}}}"#
        );
    }

    #[test]
    fn test_merge_creates_attributes() {
        let mut manifest = json!({"Entries": {"k1": {}}});
        merge_path_names(&mut manifest, &[PathName::new("k1", "Lead", "S")]).unwrap();
        assert_eq!(manifest["Entries"]["k1"]["Attributes"]["PathName"], "Lead");
    }

    #[test]
    fn test_unmatched_path_names_ignored() {
        let mut manifest = json!({"Entries": {"k1": {"Attributes": {}}}});
        let updated =
            merge_path_names(&mut manifest, &[PathName::new("other", "Lead", "S")]).unwrap();
        assert_eq!(updated, 0);
        assert_eq!(manifest, json!({"Entries": {"k1": {"Attributes": {}}}}));
    }

    #[test]
    fn test_missing_entries() {
        let mut manifest = json!({"Other": {}});
        assert!(matches!(
            merge_path_names(&mut manifest, &[]),
            Err(ManifestError::MissingField("Entries"))
        ));

        let mut manifest = json!({"Entries": []});
        assert!(matches!(
            merge_path_names(&mut manifest, &[]),
            Err(ManifestError::NotAnObject(_))
        ));
    }
}
