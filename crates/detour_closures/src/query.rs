use std::collections::BTreeMap;

use detour_core::{
    bounding_box::BoundingBox, closure::Closure, closure_category::ClosureCategory,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Filters of the closures listing endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosureQuery {
    pub bbox: Option<BoundingBox>,
    /// Server side default is `true`.
    pub active_only: Option<bool>,
    pub closure_type: Option<ClosureCategory>,
    pub submitter_id: Option<i64>,
    pub page: u32,
    pub size: u32,
}

impl Default for ClosureQuery {
    fn default() -> Self {
        Self {
            bbox: None,
            active_only: None,
            closure_type: None,
            submitter_id: None,
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ClosureQuery {
    pub fn in_bbox(bbox: BoundingBox) -> Self {
        Self {
            bbox: Some(bbox),
            ..Default::default()
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(6);

        if let Some(bbox) = &self.bbox {
            pairs.push(("bbox", bbox.to_query_param()));
        }
        if let Some(active_only) = self.active_only {
            pairs.push(("active_only", active_only.to_string()));
        }
        if let Some(closure_type) = &self.closure_type {
            pairs.push(("closure_type", closure_type.to_string()));
        }
        if let Some(submitter_id) = self.submitter_id {
            pairs.push(("submitter_id", submitter_id.to_string()));
        }

        pairs.push(("page", self.page.max(1).to_string()));
        pairs.push(("size", self.size.clamp(1, MAX_PAGE_SIZE).to_string()));

        pairs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosurePage {
    pub items: Vec<Closure>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub pages: u32,
}

impl ClosurePage {
    pub fn is_last(&self) -> bool {
        self.items.is_empty() || self.page >= self.pages
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosureStatistics {
    pub total_closures: u64,
    pub valid_closures: u64,
    pub by_type: BTreeMap<String, u64>,
    pub by_status: BTreeMap<String, u64>,
    pub avg_duration_hours: Option<f64>,
}
