//! validate → analyze → emit.

use crate::emit::DdlEmitter;
use crate::graph::DependencyGraph;
use crate::issue::{CompileError, EntityRef, Warning, WarningKind};
use crate::model::Schema;
use crate::sql::Dialect;
use crate::validate::{lint, validate};
use serde::{Deserialize, Serialize};

/// Caller-selected output options. Every field has a default, so a partial
/// JSON object (or query string) deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    pub dialect: String,
    pub include_drop_statements: bool,
    pub include_comments: bool,
    pub include_indexes: bool,
    pub include_constraints: bool,
    /// Quote every identifier instead of only those that need it.
    pub quote_identifiers: bool,
    /// Align column types within each `CREATE TABLE`.
    pub align_columns: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::PostgreSQL.name().to_string(),
            include_drop_statements: false,
            include_comments: true,
            include_indexes: true,
            include_constraints: true,
            quote_identifiers: false,
            align_columns: false,
        }
    }
}

impl CompileOptions {
    pub fn for_dialect(dialect: impl Into<String>) -> Self {
        Self {
            dialect: dialect.into(),
            ..Self::default()
        }
    }
}

/// A successful compilation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Compiled {
    pub sql: String,
    pub dialect: Dialect,
    pub warnings: Vec<Warning>,
}

/// Compile a schema snapshot to DDL text.
///
/// Pure and deterministic: identical inputs give byte-identical output. An
/// unknown dialect fails before validation runs, and a schema with any
/// validation issue produces no SQL at all.
pub fn compile(schema: &Schema, options: &CompileOptions) -> Result<Compiled, CompileError> {
    let dialect = Dialect::parse(&options.dialect)
        .ok_or_else(|| CompileError::UnsupportedDialect(options.dialect.clone()))?;

    let issues = validate(schema);
    if !issues.is_empty() {
        erdsql_trace_rejected!(issues.len());
        return Err(CompileError::Invalid(issues));
    }

    let graph = DependencyGraph::build(schema)?;

    let mut warnings = lint(schema);
    for cycle in graph.cycles() {
        let names: Vec<String> = cycle.iter().map(|t| format!("`{}`", t.name)).collect();
        warnings.push(Warning::new(
            WarningKind::CircularDependency,
            EntityRef::table(&cycle[0].name),
            format!(
                "circular foreign keys between {}; rows must be inserted with constraint checks deferred or disabled",
                names.join(", ")
            ),
        ));
    }

    let emitted = DdlEmitter::new(dialect.profile(), options).emit(schema, &graph)?;
    let sql = emitted.to_sql();
    warnings.extend(emitted.warnings);

    erdsql_trace_compile!(
        dialect,
        schema.tables.len(),
        schema.relationships.len(),
        emitted.statements.len()
    );
    for warning in &warnings {
        erdsql_trace_warning!(warning);
    }

    Ok(Compiled {
        sql,
        dialect,
        warnings,
    })
}
