use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    analysis::labels::Label,
    layout::element::{Layout, UnrecognizedElement},
};

/// Structured result of one annotation run.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub run_id: Uuid,
    pub width: u32,
    pub height: u32,
    pub blocks: Vec<Layout>,
    pub unrecognized: Vec<UnrecognizedElement>,
    /// Resolved element counts in label id order.
    pub counts: BTreeMap<Label, usize>,
}

impl Page {
    pub fn new(
        run_id: Uuid,
        (width, height): (u32, u32),
        blocks: Vec<Layout>,
        unrecognized: Vec<UnrecognizedElement>,
    ) -> Self {
        let mut counts = BTreeMap::new();
        for layout in &blocks {
            *counts.entry(layout.label).or_insert(0) += 1;
        }

        Self {
            run_id,
            width,
            height,
            blocks,
            unrecognized,
            counts,
        }
    }

    pub fn total(&self) -> usize {
        self.blocks.len() + self.unrecognized.len()
    }
}
