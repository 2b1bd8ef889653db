//! Payloads returned by AI image analysis.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Which extraction the image analysis should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Read serial, model and every text fragment from a hardware label.
    Label,
    /// Best-guess classification of the pictured component.
    #[default]
    General,
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Label => f.write_str("label"),
            AnalysisMode::General => f.write_str("general"),
        }
    }
}

/// Fields read from a label photo. Every field is optional on the wire, and
/// `null` decodes to the empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LabelExtraction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sn: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub manufacturer: String,
    /// Every distinct text fragment visible on the label.
    #[serde(default, deserialize_with = "null_as_default")]
    pub all_text: Vec<String>,
}

/// Classification of a pictured component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GeneralIdentification {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Free-form category label as returned by the service.
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default)]
    pub quantity_estimate: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub specs: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reasoning: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Result of an image analysis, tagged by the mode that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    Label(LabelExtraction),
    General(GeneralIdentification),
}

impl Analysis {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            Analysis::Label(_) => AnalysisMode::Label,
            Analysis::General(_) => AnalysisMode::General,
        }
    }

    /// Decode a JSON payload for the given mode.
    pub fn from_json(mode: AnalysisMode, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match mode {
            AnalysisMode::Label => Analysis::Label(serde_json::from_value(value)?),
            AnalysisMode::General => Analysis::General(serde_json::from_value(value)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Analysis, AnalysisMode, LabelExtraction};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn label_payload_tolerates_missing_fields() {
        let analysis =
            Analysis::from_json(AnalysisMode::Label, json!({ "sn": "X1" })).expect("decode");
        assert_eq!(
            analysis,
            Analysis::Label(LabelExtraction {
                sn: "X1".to_string(),
                ..LabelExtraction::default()
            })
        );
    }

    #[test]
    fn null_fields_decode_as_empty() {
        let analysis = Analysis::from_json(
            AnalysisMode::Label,
            json!({ "sn": "SN-7", "model": null, "manufacturer": null, "all_text": null }),
        )
        .expect("decode");
        assert_eq!(
            analysis,
            Analysis::Label(LabelExtraction {
                sn: "SN-7".to_string(),
                ..LabelExtraction::default()
            })
        );

        let analysis = Analysis::from_json(
            AnalysisMode::General,
            json!({ "name": "Switch", "specs": null, "reasoning": null, "quantity_estimate": null }),
        )
        .expect("decode");
        let Analysis::General(identification) = analysis else {
            panic!("expected general identification");
        };
        assert_eq!(identification.name, "Switch");
        assert_eq!(identification.specs, "");
        assert_eq!(identification.quantity_estimate, None);
    }

    #[test]
    fn general_payload_rejects_wrong_types() {
        let err = Analysis::from_json(AnalysisMode::General, json!({ "quantity_estimate": "many" }));
        assert!(err.is_err());
    }
}
