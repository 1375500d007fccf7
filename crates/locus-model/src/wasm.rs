//! WASM bindings for Locus
//!
//! This module exposes the solver to the browser editor that places
//! facility and demand nodes.

use wasm_bindgen::prelude::*;

use crate::builder::{build_cost_matrix, build_coverage_matrix};
use crate::distance::DistanceMetric;
use crate::node::{CostedDemand, CostedFacility, NodeId, SitedDemand, SitedFacility};
use crate::problem::{solve_location_problem, LocationProblem};
use crate::sync::sync_facility_demands;

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Solve a location problem; resolves to `null` when there is nothing to solve
#[wasm_bindgen]
pub fn solve(problem: JsValue) -> Result<JsValue, JsValue> {
    let problem: LocationProblem = serde_wasm_bindgen::from_value(problem).map_err(to_js_error)?;
    match solve_location_problem(&problem).map_err(to_js_error)? {
        Some(solution) => serde_wasm_bindgen::to_value(&solution).map_err(to_js_error),
        None => Ok(JsValue::NULL),
    }
}

/// Add missing and drop stale facility demand entries; `null` when already in sync
#[wasm_bindgen]
pub fn sync_demands(facilities: JsValue, demands: JsValue) -> Result<JsValue, JsValue> {
    let facilities: Vec<CostedFacility> = serde_wasm_bindgen::from_value(facilities).map_err(to_js_error)?;
    let demands: Vec<CostedDemand> = serde_wasm_bindgen::from_value(demands).map_err(to_js_error)?;
    match sync_facility_demands(&facilities, &demands) {
        Some(synced) => serde_wasm_bindgen::to_value(&synced).map_err(to_js_error),
        None => Ok(JsValue::NULL),
    }
}

/// Cost matrix (demands x facilities) with the ids behind rows and columns
#[wasm_bindgen]
pub fn cost_matrix(facilities: JsValue) -> Result<JsValue, JsValue> {
    let facilities: Vec<CostedFacility> = serde_wasm_bindgen::from_value(facilities).map_err(to_js_error)?;
    let table = build_cost_matrix(&facilities).map_err(to_js_error)?;

    let result = MatrixResult {
        rows: table.matrix.to_rows(),
        facility_ids: table.facility_ids,
        demand_ids: table.demand_ids,
        excluded: table.excluded,
    };
    serde_wasm_bindgen::to_value(&result).map_err(to_js_error)
}

/// 0/1 coverage matrix for a Euclidean service radius
#[wasm_bindgen]
pub fn coverage_matrix(facilities: JsValue, demands: JsValue, radius: f64) -> Result<JsValue, JsValue> {
    let facilities: Vec<SitedFacility> = serde_wasm_bindgen::from_value(facilities).map_err(to_js_error)?;
    let demands: Vec<SitedDemand> = serde_wasm_bindgen::from_value(demands).map_err(to_js_error)?;
    let table = build_coverage_matrix(&facilities, &demands, radius, DistanceMetric::Euclidean)
        .map_err(to_js_error)?;

    let result = MatrixResult {
        rows: table
            .matrix
            .iter_rows()
            .map(|row| row.iter().map(|&c| f64::from(u8::from(c))).collect())
            .collect(),
        facility_ids: table.facility_ids,
        demand_ids: table.demand_ids,
        excluded: Vec::new(),
    };
    serde_wasm_bindgen::to_value(&result).map_err(to_js_error)
}

#[derive(serde::Serialize)]
struct MatrixResult {
    rows: Vec<Vec<f64>>,
    facility_ids: Vec<NodeId>,
    demand_ids: Vec<NodeId>,
    excluded: Vec<NodeId>,
}
