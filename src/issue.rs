//! Validation issues, advisory warnings and compilation errors.

use serde::Serialize;
use std::fmt;

/// The schema element an issue or warning points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EntityRef {
    Schema,
    Table { table: String },
    Column { table: String, column: String },
    Relationship { id: String },
}

impl EntityRef {
    pub fn table(table: &str) -> Self {
        Self::Table {
            table: table.to_string(),
        }
    }

    pub fn column(table: &str, column: &str) -> Self {
        Self::Column {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    pub fn relationship(id: &str) -> Self {
        Self::Relationship { id: id.to_string() }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema => write!(f, "schema"),
            Self::Table { table } => write!(f, "table `{}`", table),
            Self::Column { table, column } => write!(f, "column `{}.{}`", table, column),
            Self::Relationship { id } => write!(f, "relationship `{}`", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IssueKind {
    /// Two tables, or two columns of one table, share an id.
    DuplicateId,
    DuplicateTableName,
    DuplicateColumnName,
    DanglingTableReference,
    DanglingColumnReference,
    IncompatibleTypePair,
    UnknownDataType,
    InvalidAutoIncrement,
    InvalidIdentifier,
}

/// A defect that blocks emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub message: String,
    #[serde(rename = "offendingEntity")]
    pub entity: EntityRef,
}

impl ValidationIssue {
    pub fn new(kind: IssueKind, entity: EntityRef, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            entity,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} at {}: {}", self.kind, self.entity, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WarningKind {
    MissingPrimaryKey,
    CircularDependency,
    ActionDowngraded,
    AutoIncrementIgnored,
    OneToOneNotUnique,
    SetNullOnRequiredColumn,
    LengthWidened,
}

/// Non-fatal advisory returned alongside the SQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
    #[serde(rename = "offendingEntity")]
    pub entity: EntityRef,
}

impl Warning {
    pub fn new(kind: WarningKind, entity: EntityRef, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            entity,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} at {}: {}", self.kind, self.entity, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("unsupported dialect `{0}` (expected mysql, postgresql, sqlite or mssql)")]
    UnsupportedDialect(String),
    #[error("schema has {} validation issue(s)", .0.len())]
    Invalid(Vec<ValidationIssue>),
    /// Dependency analysis hit something validation should have rejected.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}

impl CompileError {
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::Invalid(issues) => issues,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = ValidationIssue::new(
            IssueKind::DuplicateColumnName,
            EntityRef::column("users", "email"),
            "column name `email` is already used",
        );
        assert_eq!(
            issue.to_string(),
            "DuplicateColumnName at column `users.email`: column name `email` is already used"
        );
    }

    #[test]
    fn test_issue_serializes_offending_entity() {
        let issue = ValidationIssue::new(
            IssueKind::DuplicateTableName,
            EntityRef::table("Customer"),
            "dup",
        );
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["kind"], "DuplicateTableName");
        assert_eq!(json["offendingEntity"]["type"], "table");
        assert_eq!(json["offendingEntity"]["table"], "Customer");
    }

    #[test]
    fn test_compile_error_counts_issues() {
        let err = CompileError::Invalid(vec![
            ValidationIssue::new(IssueKind::UnknownDataType, EntityRef::Schema, "a"),
            ValidationIssue::new(IssueKind::InvalidIdentifier, EntityRef::Schema, "b"),
        ]);
        assert_eq!(err.to_string(), "schema has 2 validation issue(s)");
        assert_eq!(err.issues().len(), 2);
        assert!(CompileError::UnsupportedDialect("oracle".into()).issues().is_empty());
    }
}
