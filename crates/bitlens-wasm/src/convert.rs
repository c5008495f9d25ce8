use std::fmt::Display;

use bitlens::{InterpretationReport, Width};
use serde::Serialize;
use wasm_bindgen::JsValue;

/// Reports for every pattern a literal normalizes into.
#[derive(Serialize)]
pub struct Interpretation<'a> {
    pub literal: &'a str,
    pub reports: Vec<InterpretationReport>,
}

pub fn error_to_js(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

pub fn width_from_js(bits: Option<u32>) -> Result<Option<Width>, JsValue> {
    bits.map(|bits| Width::from_bits(bits as usize))
        .transpose()
        .map_err(error_to_js)
}

/// 64-bit integers become `BigInt`s so no precision is lost in JS.
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_large_number_types_as_bigints(true);
    value.serialize(&serializer).map_err(error_to_js)
}
