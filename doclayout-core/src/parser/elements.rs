use std::{fs, path::Path};

use serde::Deserialize;
use snafu::ResultExt;
use tracing::*;

use crate::{analysis::bbox::Bbox, error::*, layout::element::DetectedElement};

const PIXEL_SPACE: &str = "PixelSpace";

/// One record of the layout engine's JSON element export.
#[derive(Debug, Deserialize)]
struct EngineRecord {
    #[serde(rename = "type")]
    element_type: String,
    element_id: Option<String>,
    text: Option<String>,
    metadata: Option<EngineMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct EngineMetadata {
    coordinates: Option<EngineCoordinates>,
    detection_class_prob: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct EngineCoordinates {
    #[serde(default)]
    points: Vec<[f32; 2]>,
    system: Option<String>,
}

/// Reads the engine's element export from a file.
pub fn load_elements<P: AsRef<Path>>(path: P) -> Result<Vec<DetectedElement>, DoclayoutError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).context(IoReadSnafu {
        path: path.to_string_lossy(),
    })?;

    decode_elements(&content, &path.to_string_lossy())
}

/// Decodes the engine's element export, a JSON array of element records.
///
/// Coordinates are taken as received. A record without usable coordinates
/// is kept with `bbox: None` so it can still be reported and placed.
#[instrument(skip_all, fields(origin = %origin))]
pub fn decode_elements(content: &str, origin: &str) -> Result<Vec<DetectedElement>, DoclayoutError> {
    let records = serde_json::from_str::<Vec<EngineRecord>>(content).context(JsonSnafu {
        stage: "decode-elements",
        path: origin,
    })?;

    let elements = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let metadata = record.metadata.unwrap_or_default();
            let points = match metadata.coordinates {
                Some(coordinates) => {
                    match coordinates.system.as_deref() {
                        Some(system) if system != PIXEL_SPACE => {
                            warn!("element {index} uses coordinate system `{system}`, drawing as pixels");
                        }
                        _ => {}
                    }
                    coordinates.points
                }
                None => Vec::new(),
            };

            let bbox = Bbox::from_points(&points);
            if bbox.is_none() && !points.is_empty() {
                warn!("element {index} has unusable points {:?}", points);
            }

            DetectedElement {
                index,
                element_id: record.element_id,
                element_type: record.element_type,
                points,
                bbox,
                proba: metadata.detection_class_prob,
                text: record.text,
            }
        })
        .collect::<Vec<_>>();

    info!("decoded {} elements", elements.len());
    Ok(elements)
}
