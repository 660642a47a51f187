use crate::color::HexColor;
use chrono::NaiveDate;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct RingId(String);

crate::impl_id_newtype!(RingId);

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct ActivityGroupId(String);

crate::impl_id_newtype!(ActivityGroupId);

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct LabelId(String);

crate::impl_id_newtype!(LabelId);

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct ItemId(String);

crate::impl_id_newtype!(ItemId);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, StrumDisplay,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RingType {
    Inner,
    Outer,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    StrumDisplay,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

fn visible_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ring {
    pub id: RingId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RingType,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    #[serde(default)]
    pub orientation: Option<Orientation>,
    #[serde(default)]
    pub color: Option<HexColor>,
    /// Month-bucketed free text, index 0 is January.
    #[serde(default)]
    pub data: Vec<String>,
}

impl Ring {
    pub fn month_text(&self, month: usize) -> &str {
        self.data.get(month).map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityGroup {
    pub id: ActivityGroupId,
    pub name: String,
    pub color: HexColor,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub name: String,
    pub color: HexColor,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub ring_id: RingId,
    pub activity_id: ActivityGroupId,
    #[serde(default)]
    pub label_id: Option<LabelId>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

/// The snapshot a wheel is rendered from. Never mutated by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WheelStructure {
    pub rings: Vec<Ring>,
    pub activity_groups: Vec<ActivityGroup>,
    pub labels: Vec<Label>,
    pub items: Vec<Item>,
}

#[derive(Error, Debug)]
pub enum StructureError {
    #[error("Malformed wheel structure: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read wheel structure: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawStructure {
    rings: Vec<Value>,
    activity_groups: Vec<Value>,
    labels: Vec<Value>,
    items: Vec<Value>,
}

fn keep_valid<T: DeserializeOwned>(kind: &str, values: Vec<Value>) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(entity) => Some(entity),
            Err(e) => {
                log::warn!("Dropping {} #{}: {}", kind, index, e);
                None
            }
        })
        .collect()
}

impl WheelStructure {
    /// Parses a snapshot, dropping individual entities that fail to deserialise.
    pub fn from_json(json: &str) -> Result<Self, StructureError> {
        let raw: RawStructure = serde_json::from_str(json)?;

        Ok(Self {
            rings: keep_valid("ring", raw.rings),
            activity_groups: keep_valid("activity group", raw.activity_groups),
            labels: keep_valid("label", raw.labels),
            items: keep_valid("item", raw.items),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, StructureError> {
        let json = fs_err::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn ring(&self, id: &RingId) -> Option<&Ring> {
        self.rings.iter().find(|r| &r.id == id)
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| &i.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r##"{
        "rings": [
            {"id": "r1", "name": "Campaigns", "type": "inner", "visible": true, "data": ["Kickoff"]},
            {"id": "r2", "name": "Broken"},
            {"id": "r3", "name": "Seasons", "type": "OUTER", "visible": false}
        ],
        "activityGroups": [
            {"id": "g1", "name": "Marketing", "color": "#3B82F6", "visible": true},
            {"id": "g2", "name": "Bad colour", "color": "blue", "visible": true}
        ],
        "labels": [],
        "items": [
            {"id": "i1", "name": "Spring", "startDate": "2025-03-01", "endDate": "2025-03-31",
             "ringId": "r1", "activityId": "g1"},
            {"id": "i2", "name": "No dates", "ringId": "r1", "activityId": "g1"},
            {"id": "i3", "name": "Bad date", "startDate": "2025-13-01", "endDate": "2025-03-31",
             "ringId": "r1", "activityId": "g1", "labelId": null}
        ]
    }"##;

    #[test]
    fn test_malformed_entities_are_dropped() {
        let structure = WheelStructure::from_json(SNAPSHOT).unwrap();

        let rings: Vec<_> = structure.rings.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(rings, vec!["r1"]);
        assert_eq!(structure.activity_groups.len(), 1);
        assert_eq!(structure.items.len(), 1);
        assert_eq!(structure.items[0].id, ItemId::from("i1"));
    }

    #[test]
    fn test_ring_month_text_defaults_to_empty() {
        let structure = WheelStructure::from_json(SNAPSHOT).unwrap();
        let ring = structure.ring(&RingId::from("r1")).unwrap();
        assert_eq!(ring.month_text(0), "Kickoff");
        assert_eq!(ring.month_text(11), "");
    }

    #[test]
    fn test_non_object_snapshot_is_an_error() {
        assert!(WheelStructure::from_json("\"wheel\"").is_err());
        assert!(WheelStructure::from_json("{\"rings\": 5}").is_err());
    }

    #[test]
    fn test_ring_type_deserialization() {
        let cases = vec![("\"inner\"", RingType::Inner), ("\"outer\"", RingType::Outer)];

        for (json, expected) in cases {
            let deserialized: RingType = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }
}
