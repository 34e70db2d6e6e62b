//! Per-dialect syntax: type names, quoting, literals, constraint actions.

mod dialect;
mod types;

pub use dialect::{AutoIncrement, Dialect, DialectProfile, DropForeignKey, ForeignKeyPlacement};
pub use types::{RenderedType, TypeTable, render_type};
