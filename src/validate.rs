//! Structural checks run before any SQL is emitted.
//!
//! [`validate`] never stops at the first defect: every issue in the schema is
//! reported in a single pass. [`lint`] reports conditions that are legal but
//! worth a second look; those travel with the output instead of blocking it.

use crate::catalog::{self, ColumnType};
use crate::issue::{EntityRef, IssueKind, ValidationIssue, Warning, WarningKind};
use crate::model::{Column, ReferentialAction, Relationship, RelationshipKind, Schema, Table};
use std::collections::{HashMap, HashSet};

/// Collect every blocking issue in the schema.
pub fn validate(schema: &Schema) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut table_names: HashMap<String, &str> = HashMap::new();
    let mut table_ids: HashSet<&str> = HashSet::new();

    for table in &schema.tables {
        if !table_ids.insert(&table.id) {
            issues.push(ValidationIssue::new(
                IssueKind::DuplicateId,
                EntityRef::table(&table.name),
                format!("table id `{}` is used more than once", table.id),
            ));
        }

        if let Some(reason) = identifier_problem(&table.name) {
            issues.push(ValidationIssue::new(
                IssueKind::InvalidIdentifier,
                EntityRef::table(&table.name),
                format!("table name {}", reason),
            ));
        }

        let key = table.name.to_lowercase();
        match table_names.get(&key) {
            Some(first) => issues.push(ValidationIssue::new(
                IssueKind::DuplicateTableName,
                EntityRef::table(&table.name),
                format!("table name `{}` collides with `{}`", table.name, first),
            )),
            None => {
                table_names.insert(key, &table.name);
            }
        }

        validate_columns(table, &mut issues);
    }

    let tables = schema.tables_by_id();
    for rel in &schema.relationships {
        validate_relationship(&tables, rel, &mut issues);
    }

    issues
}

fn validate_columns(table: &Table, issues: &mut Vec<ValidationIssue>) {
    let mut column_names: HashMap<String, &str> = HashMap::new();
    let mut column_ids: HashSet<&str> = HashSet::new();

    for column in table.ordered_columns() {
        let entity = || EntityRef::column(&table.name, &column.name);

        if !column_ids.insert(&column.id) {
            issues.push(ValidationIssue::new(
                IssueKind::DuplicateId,
                entity(),
                format!(
                    "column id `{}` is used more than once in table `{}`",
                    column.id, table.name
                ),
            ));
        }

        if let Some(reason) = identifier_problem(&column.name) {
            issues.push(ValidationIssue::new(
                IssueKind::InvalidIdentifier,
                entity(),
                format!("column name {}", reason),
            ));
        }

        let key = column.name.to_lowercase();
        match column_names.get(&key) {
            Some(first) => issues.push(ValidationIssue::new(
                IssueKind::DuplicateColumnName,
                entity(),
                format!(
                    "column name `{}` collides with `{}` in table `{}`",
                    column.name, first, table.name
                ),
            )),
            None => {
                column_names.insert(key, &column.name);
            }
        }

        match catalog::resolve(column) {
            Ok(ty) if column.auto_increment && !ty.kind.is_integer() => {
                issues.push(ValidationIssue::new(
                    IssueKind::InvalidAutoIncrement,
                    entity(),
                    format!("auto-increment requires an integer kind, found {}", ty.kind),
                ));
            }
            Ok(_) => {}
            Err(err) => issues.push(ValidationIssue::new(
                IssueKind::UnknownDataType,
                entity(),
                err.to_string(),
            )),
        }
    }
}

fn validate_relationship(
    tables: &HashMap<&str, &Table>,
    rel: &Relationship,
    issues: &mut Vec<ValidationIssue>,
) {
    let source = resolve_endpoint(
        tables,
        rel,
        &rel.source_table_id,
        &rel.source_column_id,
        "source",
        issues,
    );
    let target = resolve_endpoint(
        tables,
        rel,
        &rel.target_table_id,
        &rel.target_column_id,
        "target",
        issues,
    );

    let (Some((source_table, source_col)), Some((target_table, target_col))) = (source, target)
    else {
        return;
    };

    // Unknown kinds were already reported on the column itself.
    let (Ok(source_ty), Ok(target_ty)) =
        (catalog::resolve(source_col), catalog::resolve(target_col))
    else {
        return;
    };

    if !compatible(&source_ty, &target_ty) {
        issues.push(ValidationIssue::new(
            IssueKind::IncompatibleTypePair,
            EntityRef::relationship(&rel.id),
            format!(
                "`{}.{}` ({}) cannot reference `{}.{}` ({})",
                target_table.name,
                target_col.name,
                target_ty.kind,
                source_table.name,
                source_col.name,
                source_ty.kind
            ),
        ));
    }
}

fn resolve_endpoint<'a>(
    tables: &HashMap<&str, &'a Table>,
    rel: &Relationship,
    table_id: &str,
    column_id: &str,
    side: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<(&'a Table, &'a Column)> {
    let Some(table) = tables.get(table_id).copied() else {
        issues.push(ValidationIssue::new(
            IssueKind::DanglingTableReference,
            EntityRef::relationship(&rel.id),
            format!("{} table `{}` does not exist", side, table_id),
        ));
        return None;
    };

    let Some(column) = table.column(column_id) else {
        issues.push(ValidationIssue::new(
            IssueKind::DanglingColumnReference,
            EntityRef::relationship(&rel.id),
            format!(
                "{} column `{}` does not exist in table `{}`",
                side, column_id, table.name
            ),
        ));
        return None;
    };

    Some((table, column))
}

/// Same catalog kind; length and precision are ignored.
fn compatible(a: &ColumnType, b: &ColumnType) -> bool {
    a.kind == b.kind
}

fn identifier_problem(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        Some("is empty")
    } else if name.chars().any(char::is_control) {
        Some("contains control characters")
    } else {
        None
    }
}

/// Advisory warnings for a schema that already passed [`validate`].
pub fn lint(schema: &Schema) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for table in &schema.tables {
        if table.primary_key_columns().is_empty() {
            warnings.push(Warning::new(
                WarningKind::MissingPrimaryKey,
                EntityRef::table(&table.name),
                format!("table `{}` has no primary key", table.name),
            ));
        }
    }

    let tables = schema.tables_by_id();
    for rel in &schema.relationships {
        let Some(target_table) = tables.get(rel.target_table_id.as_str()).copied() else {
            continue;
        };
        let Some(target) = target_table.column(&rel.target_column_id) else {
            continue;
        };

        if rel.kind == RelationshipKind::OneToOne && !is_unique(target_table, target) {
            warnings.push(Warning::new(
                WarningKind::OneToOneNotUnique,
                EntityRef::relationship(&rel.id),
                format!(
                    "one-to-one relationship but `{}.{}` is not unique",
                    target_table.name, target.name
                ),
            ));
        }

        let sets_null = rel.on_delete == ReferentialAction::SetNull
            || rel.on_update == ReferentialAction::SetNull;
        if sets_null && (target.required || target.primary_key) {
            warnings.push(Warning::new(
                WarningKind::SetNullOnRequiredColumn,
                EntityRef::relationship(&rel.id),
                format!(
                    "SET NULL action on non-nullable column `{}.{}`",
                    target_table.name, target.name
                ),
            ));
        }
    }

    warnings
}

fn is_unique(table: &Table, column: &Column) -> bool {
    if column.unique {
        return true;
    }
    let keys = table.primary_key_columns();
    keys.len() == 1 && keys[0].id == column.id
}
