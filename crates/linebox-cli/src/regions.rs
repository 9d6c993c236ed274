//! JSON report of the regions registered during a render.

use std::fs;
use std::path::Path;

use serde::Serialize;

use linebox::{CellRegion, RenderOutcome};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionRecord {
    pub action: String,
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
}

impl From<&CellRegion> for RegionRecord {
    fn from(region: &CellRegion) -> Self {
        Self {
            action: region.action.clone(),
            start_x: region.start.x,
            start_y: region.start.y,
            end_x: region.end.x,
            end_y: region.end.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionReport {
    pub all_rendered: bool,
    pub final_y: i32,
    pub bytes_written: usize,
    pub regions: Vec<RegionRecord>,
}

impl RegionReport {
    #[must_use]
    pub fn new(outcome: &RenderOutcome, regions: &[CellRegion]) -> Self {
        Self {
            all_rendered: outcome.all_rendered,
            final_y: outcome.final_y,
            bytes_written: outcome.bytes_written,
            regions: regions.iter().map(RegionRecord::from).collect(),
        }
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(path, json)?;
        Ok(())
    }
}
