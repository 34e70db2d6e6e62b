//! Tracing hooks for compilation.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]`
//! boilerplate at every call site.

/// Debug event summarising one successful compilation.
macro_rules! erdsql_trace_compile {
    ($dialect:expr, $tables:expr, $relationships:expr, $statements:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            dialect = %$dialect,
            tables = $tables,
            relationships = $relationships,
            statements = $statements,
            "erdsql.compile"
        );
    };
}

/// Debug event for a schema rejected by validation.
macro_rules! erdsql_trace_rejected {
    ($issues:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(issues = $issues, "erdsql.rejected");
    };
}

/// Warn-level event for an advisory travelling with the output.
macro_rules! erdsql_trace_warning {
    ($warning:expr) => {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            kind = ?$warning.kind,
            entity = %$warning.entity,
            "{}",
            $warning.message
        );
        #[cfg(not(feature = "tracing"))]
        let _ = &$warning;
    };
}
