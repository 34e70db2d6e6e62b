#[macro_use]
mod trace;

pub mod catalog;
pub mod compile;
pub mod config;
pub mod emit;
pub mod graph;
pub mod issue;
pub mod measure;
pub mod model;
pub mod sql;
pub mod validate;

use wasm_bindgen::prelude::*;

pub use compile::{CompileOptions, Compiled, compile};
pub use issue::{CompileError, EntityRef, IssueKind, ValidationIssue, Warning, WarningKind};
pub use model::{Column, ReferentialAction, Relationship, RelationshipKind, Schema, Table};
pub use sql::Dialect;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Compile a schema snapshot (JSON) to DDL.
///
/// Returns the `{ sql, dialect, warnings }` artifact as JSON, or a message
/// listing every validation issue.
#[wasm_bindgen(js_name = "schemaToSql")]
pub fn schema_to_sql(schema_json: &str, options_json: Option<String>) -> Result<String, String> {
    let schema: Schema =
        serde_json::from_str(schema_json).map_err(|e| format!("invalid schema: {}", e))?;
    let options: CompileOptions = match options_json.as_deref() {
        Some(json) => serde_json::from_str(json).map_err(|e| format!("invalid options: {}", e))?,
        None => CompileOptions::default(),
    };

    let compiled = compile(&schema, &options).map_err(|e| describe_error(&e))?;
    serde_json::to_string(&compiled).map_err(|e| e.to_string())
}

/// Error headline followed by one indented line per validation issue.
pub fn describe_error(err: &CompileError) -> String {
    let mut message = err.to_string();
    for issue in err.issues() {
        message.push_str("\n  ");
        message.push_str(&issue.to_string());
    }
    message
}
