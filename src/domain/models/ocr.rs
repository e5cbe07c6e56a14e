use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Recognized text as returned by the OCR service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrDocument {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub text_angle: Option<f64>,
    #[serde(default)]
    pub orientation: Option<String>,
    #[serde(default)]
    pub regions: Vec<OcrRegion>,
}

impl OcrDocument {
    /// Regions, lines and words that came with a usable bounding box.
    pub fn located_boxes(&self) -> usize {
        self.regions
            .iter()
            .map(|region| {
                usize::from(region.bounding_box.is_some())
                    + region
                        .lines
                        .iter()
                        .map(|line| {
                            usize::from(line.bounding_box.is_some())
                                + line
                                    .words
                                    .iter()
                                    .filter(|word| word.bounding_box.is_some())
                                    .count()
                        })
                        .sum::<usize>()
            })
            .sum()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrRegion {
    #[serde(default, deserialize_with = "bounding_box")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default)]
    pub lines: Vec<OcrLine>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrLine {
    #[serde(default, deserialize_with = "bounding_box")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default)]
    pub words: Vec<OcrWord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrWord {
    #[serde(default, deserialize_with = "bounding_box")]
    pub bounding_box: Option<BoundingBox>,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

impl FromStr for BoundingBox {
    type Err = String;

    /// Parses the service's `"x,y,width,height"` form.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts = value
            .split(',')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| format!("invalid bounding box '{value}': {err}"))?;

        match parts.as_slice() {
            [x, y, width, height] => Ok(BoundingBox {
                x: *x,
                y: *y,
                width: *width,
                height: *height,
            }),
            _ => Err(format!("invalid bounding box '{value}': expected 4 values")),
        }
    }
}

/// A box that does not parse is dropped; the text next to it is kept.
fn bounding_box<'de, D>(deserializer: D) -> Result<Option<BoundingBox>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|value| value.parse().ok()))
}
