// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Serializable snapshot of a document.
//!
//! Snapshots are what gets persisted next to an exported image so the
//! composition can be re-opened for editing. Decoding is deliberately
//! forgiving: any structurally plausible JSON/YAML value becomes a snapshot,
//! with missing or malformed fields replaced by defaults. Range clamping and
//! id repair happen when the snapshot is applied to a document.

use super::caption::CaptionId;
use crate::error::{EditorError, EditorResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Snapshot of a whole document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct Snapshot {
    pub background_ref: Option<String>,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub captions: Vec<CaptionSnapshot>,
}

/// Snapshot of one caption.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionSnapshot {
    /// Missing only when decoded from a malformed snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CaptionId>,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub color: String,
}

impl Default for CaptionSnapshot {
    fn default() -> Self {
        Self {
            id: None,
            text: String::new(),
            x: 0.0,
            y: 0.0,
            font_size: super::caption::DEFAULT_FONT_SIZE,
            color: super::caption::DEFAULT_COLOR.to_string(),
        }
    }
}

impl Snapshot {
    /// Parse a snapshot from JSON text. Only syntax errors are reported;
    /// structural problems are defaulted.
    pub fn from_json_str(json: &str) -> EditorResult<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| EditorError::Snapshot(e.to_string()))?;
        Ok(Self::from(value))
    }

    pub fn to_json_string(&self) -> EditorResult<String> {
        serde_json::to_string(self).map_err(|e| EditorError::Snapshot(e.to_string()))
    }
}

impl From<Value> for Snapshot {
    fn from(value: Value) -> Self {
        match value {
            // Stores sometimes hold the snapshot as a JSON-encoded string.
            Value::String(encoded) => serde_json::from_str::<Value>(&encoded)
                .map(Snapshot::from)
                .unwrap_or_default(),
            Value::Object(map) => {
                let captions = map
                    .get("captions")
                    .and_then(Value::as_array)
                    .map(|items| items.iter().filter_map(caption_from_value).collect())
                    .unwrap_or_default();

                Snapshot {
                    background_ref: map
                        .get("backgroundRef")
                        .and_then(Value::as_str)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string),
                    canvas_width: map.get("canvasWidth").and_then(number_u32).unwrap_or(0),
                    canvas_height: map.get("canvasHeight").and_then(number_u32).unwrap_or(0),
                    captions,
                }
            }
            _ => Snapshot::default(),
        }
    }
}

fn caption_from_value(value: &Value) -> Option<CaptionSnapshot> {
    let map = value.as_object()?;
    let defaults = CaptionSnapshot::default();

    Some(CaptionSnapshot {
        id: map.get("id").and_then(number_id),
        text: match map.get("text") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => defaults.text,
        },
        x: map.get("x").and_then(number_f64).unwrap_or(defaults.x),
        y: map.get("y").and_then(number_f64).unwrap_or(defaults.y),
        font_size: map
            .get("fontSize")
            .and_then(number_f64)
            .unwrap_or(defaults.font_size),
        color: map
            .get("color")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(defaults.color),
    })
}

/// Finite number, or a string holding one.
fn number_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn number_u32(value: &Value) -> Option<u32> {
    let n = number_f64(value)?;
    (n >= 0.0).then(|| n.round().min(u32::MAX as f64) as u32)
}

fn number_id(value: &Value) -> Option<CaptionId> {
    if let Some(id) = value.as_u64() {
        return Some(id);
    }
    let n = number_f64(value)?;
    (n >= 0.0 && n.fract() == 0.0).then_some(n as CaptionId)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_are_defaulted() {
        let snapshot: Snapshot =
            serde_json::from_value(json!({ "captions": [{ "id": 5, "text": "x" }] })).unwrap();

        assert_eq!(snapshot.background_ref, None);
        assert_eq!(snapshot.canvas_width, 0);
        assert_eq!(snapshot.captions.len(), 1);
        let caption = &snapshot.captions[0];
        assert_eq!(caption.id, Some(5));
        assert_eq!(caption.text, "x");
        assert_eq!((caption.x, caption.y), (0.0, 0.0));
        assert_eq!(caption.font_size, 40.0);
        assert_eq!(caption.color, "#FFFFFF");
    }

    #[test]
    fn test_malformed_fields_do_not_fail() {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "backgroundRef": 12,
            "canvasWidth": "640",
            "canvasHeight": -3,
            "captions": [
                { "id": "7", "x": "12.5", "y": null, "fontSize": "huge", "color": false },
                "not a caption",
                { "id": 2.5, "text": 99 }
            ]
        }))
        .unwrap();

        assert_eq!(snapshot.background_ref, None);
        assert_eq!(snapshot.canvas_width, 640);
        assert_eq!(snapshot.canvas_height, 0);
        assert_eq!(snapshot.captions.len(), 2);
        assert_eq!(snapshot.captions[0].id, Some(7));
        assert_eq!(snapshot.captions[0].x, 12.5);
        assert_eq!(snapshot.captions[0].font_size, 40.0);
        assert_eq!(snapshot.captions[1].id, None);
        assert_eq!(snapshot.captions[1].text, "99");
    }

    #[test]
    fn test_schema_field_names() {
        let snapshot = Snapshot {
            background_ref: Some("assets/plakat1.jpg".to_string()),
            canvas_width: 800,
            canvas_height: 400,
            captions: vec![CaptionSnapshot {
                id: Some(1),
                text: "hello".to_string(),
                x: 10.0,
                y: 20.0,
                font_size: 48.0,
                color: "#FF0000".to_string(),
            }],
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["backgroundRef"], "assets/plakat1.jpg");
        assert_eq!(value["canvasWidth"], 800);
        assert_eq!(value["captions"][0]["fontSize"], 48.0);

        let back: Snapshot = serde_json::from_value(value).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_double_encoded_snapshot() {
        let inner = r#"{"canvasWidth":320,"canvasHeight":200,"captions":[]}"#;
        let snapshot = Snapshot::from_json_str(&serde_json::to_string(inner).unwrap()).unwrap();
        assert_eq!((snapshot.canvas_width, snapshot.canvas_height), (320, 200));
    }

    #[test]
    fn test_syntax_error_is_reported() {
        assert!(matches!(
            Snapshot::from_json_str("{ not json"),
            Err(EditorError::Snapshot(_))
        ));
    }
}
