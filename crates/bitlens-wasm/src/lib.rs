//! WASM bindings for the `bitlens` bit pattern interpreter.
//!
//! The entry point from JS is [`WasmInterpreter`]. It is configured once
//! with a JSON document (see `bitlens::serde::ReportConfigDef`) and then
//! interprets literals such as `0x3F800000`, `0f-1.5` or `0s#cp1252#€`:
//!
//! ```text
//! // const interpreter = new WasmInterpreter("{}");
//! // const out = interpreter.interpret("0x3F800000", 32);
//! // out.reports[0].float.value   // { Finite: 1 }
//! // const diff = interpreter.flip("0f1.0", 0);
//! // diff[0].after.float.value    // { Finite: -1 }
//! ```
//!
//! Errors are returned as strings built from the error's `Display`.

mod convert;

use bitlens::{
    Interpreter, ReportConfig, chars::TableRegistry, literal::Literal, serde::ReportConfigDef,
};
use wasm_bindgen::prelude::*;

/// Report builder with a fixed set of character views.
#[wasm_bindgen]
pub struct WasmInterpreter {
    interpreter: Interpreter,
}

#[wasm_bindgen]
impl WasmInterpreter {
    /// Creates an interpreter from a JSON configuration. `"{}"` selects
    /// every built-in table.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmInterpreter, JsValue> {
        let def: ReportConfigDef = serde_json::from_str(config_json).map_err(convert::error_to_js)?;
        let config = ReportConfig::try_from(def).map_err(convert::error_to_js)?;

        Ok(WasmInterpreter {
            interpreter: Interpreter::new(config),
        })
    }

    /// Names of every registered table.
    pub fn encodings(&self) -> Vec<String> {
        self.registry().names().into_iter().map(String::from).collect()
    }

    /// Reports for every pattern `literal` normalizes into. `width` is in
    /// bits; when omitted it is inferred from the literal.
    pub fn interpret(&self, literal: &str, width: Option<u32>) -> Result<JsValue, JsValue> {
        let width = convert::width_from_js(width)?;
        let patterns = Literal::parse(literal)
            .and_then(|l| l.patterns(width, self.registry()))
            .map_err(convert::error_to_js)?;

        convert::to_js(&convert::Interpretation {
            literal,
            reports: self.interpreter.build_many(&patterns),
        })
    }

    /// Before/after reports for flipping bit `index` of every pattern
    /// `literal` normalizes into.
    pub fn flip(&self, literal: &str, index: usize, width: Option<u32>) -> Result<JsValue, JsValue> {
        let width = convert::width_from_js(width)?;
        let patterns = Literal::parse(literal)
            .and_then(|l| l.patterns(width, self.registry()))
            .map_err(convert::error_to_js)?;

        let reports = patterns
            .iter()
            .map(|pattern| self.interpreter.flip(pattern, index))
            .collect::<bitlens::Result<Vec<_>>>()
            .map_err(convert::error_to_js)?;

        convert::to_js(&reports)
    }
}

impl WasmInterpreter {
    fn registry(&self) -> &TableRegistry {
        self.interpreter.config().registry()
    }
}
