//! Arrangement path names derived from song manifests
//!
//! Every playable arrangement of a song ships its own manifest JSON. The
//! arrangement flags in it decide a display label such as "Lead",
//! "Bonus Rhythm" or "Alternate Bass". Labels that repeat within one song are
//! numbered in encounter order ("Lead 1", "Lead 2").

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::error::{ManifestError, ManifestResult};

/// Arrangement name that never receives a path name
pub const VOCALS_ARRANGEMENT: &str = "Vocals";

/// Arrangement flags used to build a label
///
/// Missing flags read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArrangementProperties {
    /// 1 for the representative arrangement of its path
    pub represent: u8,
    /// 1 for bonus arrangements
    pub bonus_arr: u8,
    /// Lead guitar path
    pub path_lead: u8,
    /// Rhythm guitar path
    pub path_rhythm: u8,
    /// Bass path
    pub path_bass: u8,
}

impl ArrangementProperties {
    /// Instrument part of the label, if any path flag is set
    pub fn path(&self) -> Option<&'static str> {
        if self.path_lead == 1 {
            Some("Lead")
        } else if self.path_rhythm == 1 {
            Some("Rhythm")
        } else if self.path_bass == 1 {
            Some("Bass")
        } else {
            None
        }
    }

    /// Display label before deduplication
    ///
    /// With no path flag set the label is just the prefix, which may be empty.
    pub fn label(&self) -> String {
        let mut label = String::new();
        if self.represent == 0 {
            label.push_str(if self.bonus_arr == 1 {
                "Bonus "
            } else {
                "Alternate "
            });
        }
        if let Some(path) = self.path() {
            label.push_str(path);
        }
        label
    }
}

/// `Attributes` object of a song manifest entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SongAttributes {
    /// "Lead", "Rhythm", "Bass", "Combo" or "Vocals"
    #[serde(default)]
    pub arrangement_name: Option<String>,
    /// Song identifier shared by all arrangements of a song
    #[serde(default)]
    pub song_key: Option<String>,
    /// Arrangement flags
    #[serde(default)]
    pub arrangement_properties: Option<ArrangementProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SongManifest {
    #[serde(default)]
    entries: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SongEntry {
    attributes: Option<SongAttributes>,
}

/// Derived label for one manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathName {
    /// Manifest entry key
    pub key: String,
    /// Display label
    pub name: String,
    /// Song the arrangement belongs to
    pub song_key: String,
}

impl PathName {
    /// Create a path name record
    pub fn new(key: impl Into<String>, name: impl Into<String>, song_key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            song_key: song_key.into(),
        }
    }
}

/// Outcome of inspecting one song manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivation {
    /// A playable arrangement
    PathName(PathName),
    /// A vocals arrangement, which has no path name
    VocalsExcluded {
        /// Manifest entry key
        key: String,
    },
}

/// Derive the path name of a single song manifest
pub fn derive_path_name(json: &[u8]) -> ManifestResult<Derivation> {
    let manifest: SongManifest = serde_json::from_slice(json)?;
    let (key, entry) = manifest
        .entries
        .into_iter()
        .next()
        .ok_or(ManifestError::MissingField("Entries"))?;

    let entry: SongEntry = serde_json::from_value(entry)?;
    let attributes = entry
        .attributes
        .ok_or(ManifestError::MissingField("Attributes"))?;

    if attributes.arrangement_name.as_deref() == Some(VOCALS_ARRANGEMENT) {
        return Ok(Derivation::VocalsExcluded { key });
    }

    let properties = attributes
        .arrangement_properties
        .ok_or(ManifestError::MissingField("ArrangementProperties"))?;
    let song_key = attributes
        .song_key
        .ok_or(ManifestError::MissingField("SongKey"))?;

    let name = properties.label();
    if properties.path().is_none() {
        warn!(%key, %song_key, label = %name, "arrangement has no lead, rhythm or bass flag");
    }

    Ok(Derivation::PathName(PathName {
        key,
        name,
        song_key,
    }))
}

/// Number repeated labels within each song, in encounter order
pub fn deduplicate(path_names: &mut [PathName]) {
    let mut totals: HashMap<(&str, &str), usize> = HashMap::new();
    for path_name in path_names.iter() {
        *totals
            .entry((path_name.song_key.as_str(), path_name.name.as_str()))
            .or_default() += 1;
    }
    let repeated: Vec<bool> = path_names
        .iter()
        .map(|path_name| totals[&(path_name.song_key.as_str(), path_name.name.as_str())] > 1)
        .collect();

    let mut counters: HashMap<(String, String), usize> = HashMap::new();
    for (path_name, repeated) in path_names.iter_mut().zip(repeated) {
        if !repeated {
            continue;
        }
        let counter = counters
            .entry((path_name.song_key.clone(), path_name.name.clone()))
            .or_default();
        *counter += 1;
        path_name.name = format!("{} {}", path_name.name, counter);
    }
}

/// Derive and deduplicate path names for a set of song manifests
///
/// Vocals manifests are skipped.
pub fn derive_path_names<'a, I>(manifests: I) -> ManifestResult<Vec<PathName>>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut path_names = Vec::new();
    for json in manifests {
        if let Derivation::PathName(path_name) = derive_path_name(json)? {
            path_names.push(path_name);
        }
    }
    deduplicate(&mut path_names);
    Ok(path_names)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn song_manifest(key: &str, arrangement: &str, song_key: &str, properties: &Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "Entries": {
                key: {
                    "Attributes": {
                        "ArrangementName": arrangement,
                        "SongKey": song_key,
                        "ArrangementProperties": properties,
                    }
                }
            },
            "ModelName": "RSEnumerable_Song",
        }))
        .unwrap()
    }

    fn derive(properties: &Value) -> Derivation {
        derive_path_name(&song_manifest("K1", "Lead", "SONG1", properties)).unwrap()
    }

    #[test]
    fn test_bonus_lead() {
        let derivation = derive(&json!({"represent": 0, "bonusArr": 1, "pathLead": 1}));
        assert_eq!(
            derivation,
            Derivation::PathName(PathName::new("K1", "Bonus Lead", "SONG1"))
        );
    }

    #[test]
    fn test_represent_has_no_prefix() {
        let derivation = derive(&json!({"represent": 1, "pathRhythm": 1}));
        assert_eq!(
            derivation,
            Derivation::PathName(PathName::new("K1", "Rhythm", "SONG1"))
        );
    }

    #[test]
    fn test_alternate_bass() {
        let derivation = derive(&json!({"represent": 0, "bonusArr": 0, "pathBass": 1}));
        assert_eq!(
            derivation,
            Derivation::PathName(PathName::new("K1", "Alternate Bass", "SONG1"))
        );
    }

    #[test]
    fn test_lead_takes_precedence() {
        let properties = ArrangementProperties {
            represent: 1,
            path_lead: 1,
            path_rhythm: 1,
            ..ArrangementProperties::default()
        };
        assert_eq!(properties.label(), "Lead");
    }

    #[test]
    fn test_no_path_flag_keeps_prefix_only() {
        let derivation = derive(&json!({"represent": 0, "bonusArr": 1}));
        assert_eq!(
            derivation,
            Derivation::PathName(PathName::new("K1", "Bonus ", "SONG1"))
        );

        let derivation = derive(&json!({"represent": 1}));
        assert_eq!(derivation, Derivation::PathName(PathName::new("K1", "", "SONG1")));
    }

    #[test]
    fn test_vocals_excluded() {
        let json = song_manifest("V1", "Vocals", "SONG1", &json!({"represent": 1}));
        assert_eq!(
            derive_path_name(&json).unwrap(),
            Derivation::VocalsExcluded {
                key: "V1".to_string()
            }
        );
    }

    #[test]
    fn test_missing_fields() {
        let json = br#"{"Entries": {}}"#;
        assert!(matches!(
            derive_path_name(json),
            Err(ManifestError::MissingField("Entries"))
        ));

        let json = br#"{"Entries": {"K": {"Other": 1}}}"#;
        assert!(matches!(
            derive_path_name(json),
            Err(ManifestError::MissingField("Attributes"))
        ));

        let json = br#"{"Entries": {"K": {"Attributes": {"ArrangementName": "Bass", "SongKey": "S"}}}}"#;
        assert!(matches!(
            derive_path_name(json),
            Err(ManifestError::MissingField("ArrangementProperties"))
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            derive_path_name(b"{not json"),
            Err(ManifestError::Json(_))
        ));
    }

    #[test]
    fn test_deduplicate_within_song() {
        let mut path_names = vec![
            PathName::new("a", "Lead", "SONG1"),
            PathName::new("b", "Lead", "SONG1"),
            PathName::new("c", "Rhythm", "SONG1"),
            PathName::new("d", "Lead", "SONG1"),
        ];
        deduplicate(&mut path_names);

        let names: Vec<&str> = path_names.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Lead 1", "Lead 2", "Rhythm", "Lead 3"]);
    }

    #[test]
    fn test_deduplicate_scoped_per_song() {
        let mut path_names = vec![
            PathName::new("a", "Lead", "SONG1"),
            PathName::new("b", "Lead", "SONG2"),
            PathName::new("c", "Bass", "SONG2"),
            PathName::new("d", "Bass", "SONG2"),
        ];
        deduplicate(&mut path_names);

        let names: Vec<&str> = path_names.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Lead", "Lead", "Bass 1", "Bass 2"]);
    }

    #[test]
    fn test_derive_path_names_skips_vocals() {
        let manifests = [
            song_manifest("a", "Lead", "S", &json!({"represent": 1, "pathLead": 1})),
            song_manifest("v", "Vocals", "S", &json!({})),
            song_manifest("b", "Lead", "S", &json!({"represent": 1, "pathLead": 1})),
        ];
        let path_names = derive_path_names(manifests.iter().map(Vec::as_slice)).unwrap();
        assert_eq!(
            path_names,
            vec![
                PathName::new("a", "Lead 1", "S"),
                PathName::new("b", "Lead 2", "S"),
            ]
        );
    }
}
