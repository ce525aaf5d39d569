use serde::Serialize;

use crate::analysis::{bbox::Bbox, labels::Label, resolver::ResolvedLabel};

/// One region reported by the external layout engine.
///
/// Read-only after decoding; the pipeline never mutates it.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct DetectedElement {
    /// Position in the engine output.
    pub index: usize,
    pub element_id: Option<String>,
    /// Raw type string exactly as the engine emitted it.
    pub element_type: String,
    /// Corner points as received, in pixel space.
    pub points: Vec<[f32; 2]>,
    /// Envelope of `points`, absent when the engine gave no coordinates.
    pub bbox: Option<Bbox>,
    pub proba: Option<f32>,
    pub text: Option<String>,
}

/// A detected element whose type resolved to a canonical label.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct Layout {
    pub bbox_id: usize,
    pub element_id: Option<String>,
    pub raw_type: String,
    pub label: Label,
    pub canonical_id: usize,
    pub display_label: &'static str,
    pub color: [u8; 3],
    pub points: Vec<[f32; 2]>,
    pub bbox: Option<Bbox>,
    pub proba: Option<f32>,
    pub text: Option<String>,
}

impl Layout {
    pub fn new(element: &DetectedElement, resolved: ResolvedLabel) -> Self {
        Self {
            bbox_id: element.index,
            element_id: element.element_id.clone(),
            raw_type: element.element_type.clone(),
            label: resolved.label,
            canonical_id: resolved.canonical_id,
            display_label: resolved.display_label,
            color: resolved.color,
            points: element.points.clone(),
            bbox: element.bbox,
            proba: element.proba,
            text: element.text.clone(),
        }
    }
}

/// An element the resolver rejected, kept so the caller can report it.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct UnrecognizedElement {
    pub bbox_id: usize,
    pub element_id: Option<String>,
    pub raw_type: String,
    pub points: Vec<[f32; 2]>,
    pub bbox: Option<Bbox>,
}

impl From<&DetectedElement> for UnrecognizedElement {
    fn from(element: &DetectedElement) -> Self {
        Self {
            bbox_id: element.index,
            element_id: element.element_id.clone(),
            raw_type: element.element_type.clone(),
            points: element.points.clone(),
            bbox: element.bbox,
        }
    }
}
