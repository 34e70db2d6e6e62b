//! DDL text generation.
//!
//! Statements come out in a fixed phase order: drops, tables, foreign key
//! constraints, indexes. Foreign keys are never part of `CREATE TABLE` for
//! dialects that support `ALTER TABLE ... ADD CONSTRAINT`, so tables can be
//! created in any order even when their references form a cycle.

use crate::catalog::{self, DataKind};
use crate::compile::CompileOptions;
use crate::graph::DependencyGraph;
use crate::issue::{CompileError, EntityRef, Warning, WarningKind};
use crate::measure::{display_width, pad_to};
use crate::model::{Column, ReferentialAction, Relationship, Schema, Table};
use crate::sql::{AutoIncrement, DialectProfile, ForeignKeyPlacement, render_type};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};

/// Rendered statements plus the warnings raised while rendering them.
#[derive(Debug, Clone, PartialEq)]
pub struct Emitted {
    pub statements: Vec<String>,
    pub warnings: Vec<Warning>,
}

impl Emitted {
    /// Statements separated by a blank line, ending with a newline.
    pub fn to_sql(&self) -> String {
        let mut sql = self.statements.join("\n\n");
        if !sql.is_empty() {
            sql.push('\n');
        }
        sql
    }
}

struct ForeignKey<'a> {
    name: String,
    rel: &'a Relationship,
    table: &'a Table,
    column: &'a Column,
    ref_table: &'a Table,
    ref_column: &'a Column,
}

struct Index<'a> {
    name: String,
    table: &'a Table,
    column: &'a Column,
}

/// Constraint and index names share one case-insensitive namespace.
struct NameAllocator {
    taken: HashSet<String>,
    max_length: Option<usize>,
}

impl NameAllocator {
    fn new(max_length: Option<usize>) -> Self {
        Self {
            taken: HashSet::new(),
            max_length,
        }
    }

    fn allocate(&mut self, base: &str) -> String {
        let mut name = self.fit(base);
        let mut suffix = 2;
        while !self.taken.insert(name.to_lowercase()) {
            name = self.fit(&format!("{}_{}", base, suffix));
            suffix += 1;
        }
        name
    }

    /// Names over the dialect limit keep a prefix and end in a hash of the
    /// full name, so distinct long names stay distinct after shortening.
    fn fit(&self, name: &str) -> String {
        let Some(max) = self.max_length else {
            return name.to_string();
        };
        if name.len() <= max {
            return name.to_string();
        }

        let digest = Sha256::digest(name.as_bytes());
        let hash: String = digest[..4].iter().map(|b| format!("{:02x}", b)).collect();

        let mut cut = max.saturating_sub(hash.len() + 1);
        while !name.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}_{}", &name[..cut], hash)
    }
}

pub struct DdlEmitter<'o> {
    profile: &'static DialectProfile,
    options: &'o CompileOptions,
}

impl<'o> DdlEmitter<'o> {
    pub fn new(profile: &'static DialectProfile, options: &'o CompileOptions) -> Self {
        Self { profile, options }
    }

    pub fn emit(&self, schema: &Schema, graph: &DependencyGraph) -> Result<Emitted, CompileError> {
        let mut warnings = Vec::new();
        let mut names = NameAllocator::new(self.profile.max_identifier_length);

        let foreign_keys = plan_foreign_keys(schema, graph, &mut names)?;
        let indexes = plan_indexes(&foreign_keys, &mut names);

        let render_fks = self.options.include_constraints;
        let alter_fks = render_fks && self.profile.foreign_keys == ForeignKeyPlacement::AlterTable;
        let inline_fks = render_fks && self.profile.foreign_keys == ForeignKeyPlacement::Inline;

        if render_fks {
            for fk in &foreign_keys {
                self.check_actions(fk, &mut warnings);
            }
        }

        let mut statements = Vec::new();

        if self.options.include_drop_statements {
            if alter_fks {
                for fk in &foreign_keys {
                    statements.push(self.profile.drop_foreign_key(
                        &fk.table.name,
                        &fk.name,
                        self.options.quote_identifiers,
                    ));
                }
            }
            for table in graph.drop_order() {
                statements.push(format!("DROP TABLE IF EXISTS {};", self.ident(&table.name)));
            }
        }

        for table in graph.tables() {
            let inline: Vec<&ForeignKey> = if inline_fks {
                foreign_keys.iter().filter(|fk| fk.table.id == table.id).collect()
            } else {
                Vec::new()
            };
            statements.push(self.create_table(table, &inline, &mut warnings)?);
        }

        if alter_fks {
            for fk in &foreign_keys {
                statements.push(format!(
                    "ALTER TABLE {} ADD {};",
                    self.ident(&fk.table.name),
                    self.foreign_key_clause(fk)
                ));
            }
        }

        if self.options.include_indexes {
            for index in &indexes {
                statements.push(format!(
                    "CREATE INDEX {} ON {} ({});",
                    self.ident(&index.name),
                    self.ident(&index.table.name),
                    self.ident(&index.column.name)
                ));
            }
        }

        Ok(Emitted {
            statements,
            warnings,
        })
    }

    fn ident(&self, name: &str) -> String {
        self.profile.quote_ident(name, self.options.quote_identifiers)
    }

    fn create_table(
        &self,
        table: &Table,
        inline_fks: &[&ForeignKey],
        warnings: &mut Vec<Warning>,
    ) -> Result<String, CompileError> {
        let mut sql = String::new();

        if self.options.include_comments {
            if let Some(description) = table.description.as_deref().filter(|d| !d.trim().is_empty()) {
                for line in comment_lines(description) {
                    if line.is_empty() {
                        sql.push_str("--\n");
                    } else {
                        sql.push_str(&format!("-- {}\n", line));
                    }
                }
            }
        }

        let columns = table.ordered_columns();
        let keys = table.primary_key_columns();
        let sole_key = if keys.len() == 1 { Some(keys[0].id.as_str()) } else { None };

        let names: Vec<String> = columns.iter().map(|c| self.ident(&c.name)).collect();
        let name_width = if self.options.align_columns {
            names.iter().map(|n| display_width(n)).max().unwrap_or(0)
        } else {
            0
        };

        let mut lines = Vec::with_capacity(columns.len() + 1 + inline_fks.len());
        for (column, name) in columns.iter().zip(&names) {
            let is_sole_key = sole_key == Some(column.id.as_str());
            let definition = self.column_definition(table, column, is_sole_key, warnings)?;
            lines.push(format!("{} {}", pad_to(name, name_width), definition));
        }

        if keys.len() > 1 {
            let cols: Vec<String> = keys.iter().map(|c| self.ident(&c.name)).collect();
            lines.push(format!("PRIMARY KEY ({})", cols.join(", ")));
        }

        for fk in inline_fks {
            lines.push(self.foreign_key_clause(fk));
        }

        sql.push_str(&format!("CREATE TABLE {} (\n", self.ident(&table.name)));
        sql.push_str(
            &lines
                .iter()
                .map(|l| format!("  {}", l))
                .collect::<Vec<_>>()
                .join(",\n"),
        );
        sql.push_str("\n);");
        Ok(sql)
    }

    /// `type [PRIMARY KEY] [NOT NULL] [UNIQUE] [DEFAULT literal] [auto-increment]`
    fn column_definition(
        &self,
        table: &Table,
        column: &Column,
        is_sole_key: bool,
        warnings: &mut Vec<Warning>,
    ) -> Result<String, CompileError> {
        let ty = catalog::resolve(column).map_err(|e| {
            CompileError::Internal(format!("column `{}.{}`: {}", table.name, column.name, e))
        })?;
        let rendered = render_type(self.profile, &ty);

        if let Some(length) = rendered.widened_from {
            warnings.push(Warning::new(
                WarningKind::LengthWidened,
                EntityRef::column(&table.name, &column.name),
                format!(
                    "length {} exceeds the {} limit, rendered as {}",
                    length, self.profile.dialect, rendered.sql
                ),
            ));
        }

        let mut parts = vec![rendered.sql];

        if is_sole_key {
            parts.push("PRIMARY KEY".to_string());
        }

        let mut auto_increment = None;
        if column.auto_increment {
            match self.profile.auto_increment {
                AutoIncrement::Suffix(keyword) => auto_increment = Some(keyword),
                AutoIncrement::AfterPrimaryKey(keyword) if is_sole_key => parts.push(keyword.to_string()),
                AutoIncrement::AfterPrimaryKey(_) => warnings.push(Warning::new(
                    WarningKind::AutoIncrementIgnored,
                    EntityRef::column(&table.name, &column.name),
                    format!(
                        "{} only auto-increments a sole primary key column",
                        self.profile.dialect
                    ),
                )),
            }
        }

        if column.required && !column.primary_key {
            parts.push("NOT NULL".to_string());
        }
        if column.unique && !is_sole_key {
            parts.push("UNIQUE".to_string());
        }
        if let Some(default) = column.default_value.as_deref().and_then(|d| self.default_literal(ty.kind, d)) {
            parts.push(format!("DEFAULT {}", default));
        }
        if let Some(keyword) = auto_increment {
            parts.push(keyword.to_string());
        }

        Ok(parts.join(" "))
    }

    /// Render a default value. Blank defaults render nothing.
    fn default_literal(&self, kind: DataKind, raw: &str) -> Option<String> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }

        let upper = value.to_uppercase();
        let is_keyword = matches!(
            upper.as_str(),
            "NULL" | "CURRENT_TIMESTAMP" | "CURRENT_DATE" | "CURRENT_TIME"
        );
        if is_keyword || is_string_literal(value) || is_function_call(value) {
            return Some(value.to_string());
        }

        if kind == DataKind::Boolean {
            match upper.as_str() {
                "TRUE" | "1" | "YES" | "ON" => return Some(self.profile.bool_literal(true).to_string()),
                "FALSE" | "0" | "NO" | "OFF" => {
                    return Some(self.profile.bool_literal(false).to_string());
                }
                _ => {}
            }
        }

        if kind.is_numeric() && is_number(value) {
            return Some(value.to_string());
        }

        Some(format!("'{}'", value.replace('\'', "''")))
    }

    fn foreign_key_clause(&self, fk: &ForeignKey) -> String {
        let (on_delete, _) = self.profile.resolve_action(fk.rel.on_delete);
        let (on_update, _) = self.profile.resolve_action(fk.rel.on_update);
        format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {} ON UPDATE {}",
            self.ident(&fk.name),
            self.ident(&fk.column.name),
            self.ident(&fk.ref_table.name),
            self.ident(&fk.ref_column.name),
            on_delete.as_sql(),
            on_update.as_sql()
        )
    }

    fn check_actions(&self, fk: &ForeignKey, warnings: &mut Vec<Warning>) {
        for (clause, requested) in [("ON DELETE", fk.rel.on_delete), ("ON UPDATE", fk.rel.on_update)] {
            let (resolved, downgraded) = self.profile.resolve_action(requested);
            if downgraded {
                warnings.push(Warning::new(
                    WarningKind::ActionDowngraded,
                    EntityRef::relationship(&fk.rel.id),
                    action_message(clause, requested, resolved, self.profile, &fk.name),
                ));
            }
        }
    }
}

fn action_message(
    clause: &str,
    requested: ReferentialAction,
    resolved: ReferentialAction,
    profile: &DialectProfile,
    constraint: &str,
) -> String {
    format!(
        "{} {} is not supported by {}; {} uses {} instead",
        clause,
        requested.as_sql(),
        profile.dialect,
        constraint,
        resolved.as_sql()
    )
}

/// One foreign key per relationship, in a stable order, each named
/// `fk_<referencing table>_<referenced table>`.
fn plan_foreign_keys<'a>(
    schema: &'a Schema,
    graph: &DependencyGraph<'a>,
    names: &mut NameAllocator,
) -> Result<Vec<ForeignKey<'a>>, CompileError> {
    let position: HashMap<&str, usize> = graph
        .tables()
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id.as_str(), i))
        .collect();

    let tables = schema.tables_by_id();
    let mut resolved = Vec::with_capacity(schema.relationships.len());
    for rel in &schema.relationships {
        let (table, column) = endpoint(&tables, rel, &rel.target_table_id, &rel.target_column_id)?;
        let (ref_table, ref_column) =
            endpoint(&tables, rel, &rel.source_table_id, &rel.source_column_id)?;
        let key = (
            position.get(table.id.as_str()).copied(),
            position.get(ref_table.id.as_str()).copied(),
            column.order_index,
            column.name.clone(),
            ref_column.name.clone(),
            rel.id.clone(),
        );
        resolved.push((key, rel, table, column, ref_table, ref_column));
    }
    resolved.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(resolved
        .into_iter()
        .map(|(_, rel, table, column, ref_table, ref_column)| ForeignKey {
            name: names.allocate(&format!("fk_{}_{}", table.name, ref_table.name)),
            rel,
            table,
            column,
            ref_table,
            ref_column,
        })
        .collect())
}

fn endpoint<'a>(
    tables: &HashMap<&str, &'a Table>,
    rel: &Relationship,
    table_id: &str,
    column_id: &str,
) -> Result<(&'a Table, &'a Column), CompileError> {
    let table = tables.get(table_id).copied().ok_or_else(|| {
        CompileError::Internal(format!(
            "relationship `{}` references unknown table `{}`",
            rel.id, table_id
        ))
    })?;
    let column = table.column(column_id).ok_or_else(|| {
        CompileError::Internal(format!(
            "relationship `{}` references unknown column `{}` in `{}`",
            rel.id, column_id, table.name
        ))
    })?;
    Ok((table, column))
}

/// One index per referencing column that no key already covers.
fn plan_indexes<'a>(foreign_keys: &[ForeignKey<'a>], names: &mut NameAllocator) -> Vec<Index<'a>> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut indexes = Vec::new();

    for fk in foreign_keys {
        if is_covered(fk.table, fk.column) {
            continue;
        }
        if !seen.insert((fk.table.id.as_str(), fk.column.id.as_str())) {
            continue;
        }
        indexes.push(Index {
            name: names.allocate(&format!("idx_{}_{}", fk.table.name, fk.column.name)),
            table: fk.table,
            column: fk.column,
        });
    }

    indexes
}

/// Unique columns and the leading primary key column already have an index.
fn is_covered(table: &Table, column: &Column) -> bool {
    column.unique
        || table
            .primary_key_columns()
            .first()
            .is_some_and(|leading| leading.id == column.id)
}

/// One comment line per source line. `\r` ends a comment in some dialects, so
/// it splits lines too, and other control characters become spaces.
fn comment_lines(description: &str) -> Vec<String> {
    description
        .trim_end()
        .split("\r\n")
        .flat_map(|chunk| chunk.split(['\r', '\n']))
        .map(|line| {
            line.chars()
                .map(|c| if c.is_control() { ' ' } else { c })
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

/// `'...'` with every interior quote doubled.
fn is_string_literal(value: &str) -> bool {
    let Some(inner) = value
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    else {
        return false;
    };
    inner.replace("''", "").find('\'').is_none()
}

/// `name(args)` where the parentheses balance, string arguments are well
/// formed, and nothing outside a string could start a new statement or a
/// comment.
fn is_function_call(value: &str) -> bool {
    let Some(open) = value.find('(') else {
        return false;
    };
    let name = &value[..open];
    let mut name_chars = name.chars();
    let valid_name = match name_chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            name_chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        }
        _ => false,
    };
    if !valid_name {
        return false;
    }

    let args = &value[open..];
    let mut depth = 0usize;
    let mut in_string = false;
    let mut prev = '\0';
    let mut chars = args.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if in_string {
            if c == '\'' {
                if chars.peek().is_some_and(|&(_, next)| next == '\'') {
                    chars.next();
                } else {
                    in_string = false;
                }
            }
            continue;
        }
        match c {
            '\'' => in_string = true,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 && i + 1 != args.len() {
                    return false;
                }
            }
            ';' => return false,
            '-' if prev == '-' => return false,
            '*' if prev == '/' => return false,
            _ => {}
        }
        prev = c;
    }
    depth == 0 && !in_string
}

fn is_number(value: &str) -> bool {
    let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
    !digits.is_empty()
        && digits != "."
        && digits.matches('.').count() <= 1
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RelationshipKind;
    use crate::sql::Dialect;

    fn options() -> CompileOptions {
        CompileOptions::default()
    }

    fn emit(schema: &Schema, dialect: Dialect, options: &CompileOptions) -> Emitted {
        let graph = DependencyGraph::build(schema).unwrap();
        DdlEmitter::new(dialect.profile(), options).emit(schema, &graph).unwrap()
    }

    fn shop() -> Schema {
        Schema::new("shop")
            .with_table(
                Table::new("t_users", "users")
                    .with_column(Column::new("u_id", "id", "INTEGER").pk())
                    .with_column(Column::new("u_email", "email", "TEXT_VARIABLE").length(255).required().unique()),
            )
            .with_table(
                Table::new("t_orders", "orders")
                    .with_column(Column::new("o_id", "id", "INTEGER").pk())
                    .with_column(Column::new("o_user", "user_id", "INTEGER").fk().required()),
            )
            .with_relationship(
                Relationship::new("r1", ("t_users", "u_id"), ("t_orders", "o_user"))
                    .on_delete(ReferentialAction::Cascade)
                    .on_update(ReferentialAction::Cascade),
            )
    }

    #[test]
    fn test_create_table_layout() {
        let schema = Schema::new("s").with_table(shop().tables[0].clone());
        let out = emit(&schema, Dialect::MySQL, &options());
        assert_eq!(
            out.statements,
            vec!["CREATE TABLE users (\n  id INTEGER PRIMARY KEY,\n  email VARCHAR(255) NOT NULL UNIQUE\n);"]
        );
    }

    #[test]
    fn test_phase_order() {
        let out = emit(&shop(), Dialect::PostgreSQL, &options());
        assert_eq!(out.statements.len(), 4);
        assert!(out.statements[0].starts_with("CREATE TABLE orders"));
        assert!(out.statements[1].starts_with("CREATE TABLE users"));
        assert_eq!(
            out.statements[2],
            "ALTER TABLE orders ADD CONSTRAINT fk_orders_users FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE ON UPDATE CASCADE;"
        );
        assert_eq!(out.statements[3], "CREATE INDEX idx_orders_user_id ON orders (user_id);");
    }

    #[test]
    fn test_drop_phase_mysql() {
        let mut opts = options();
        opts.include_drop_statements = true;
        let out = emit(&shop(), Dialect::MySQL, &opts);
        assert_eq!(out.statements[0], "ALTER TABLE orders DROP FOREIGN KEY fk_orders_users;");
        assert_eq!(out.statements[1], "DROP TABLE IF EXISTS orders;");
        assert_eq!(out.statements[2], "DROP TABLE IF EXISTS users;");
    }

    #[test]
    fn test_drop_phase_guarded() {
        let mut opts = options();
        opts.include_drop_statements = true;
        let out = emit(&shop(), Dialect::PostgreSQL, &opts);
        assert_eq!(
            out.statements[0],
            "ALTER TABLE IF EXISTS orders DROP CONSTRAINT IF EXISTS fk_orders_users;"
        );
        let out = emit(&shop(), Dialect::MsSql, &opts);
        assert_eq!(
            out.statements[0],
            "IF OBJECT_ID(N'[fk_orders_users]', N'F') IS NOT NULL ALTER TABLE orders DROP CONSTRAINT fk_orders_users;"
        );
    }

    #[test]
    fn test_indexes_toggle_leaves_other_phases() {
        let mut opts = options();
        opts.include_indexes = false;
        let with = emit(&shop(), Dialect::PostgreSQL, &options());
        let without = emit(&shop(), Dialect::PostgreSQL, &opts);
        assert!(without.statements.iter().all(|s| !s.starts_with("CREATE INDEX")));
        assert_eq!(without.statements[..], with.statements[..3]);
    }

    #[test]
    fn test_long_names_fit_dialect_limit() {
        let long = "a".repeat(70);
        let schema = Schema::new("s")
            .with_table(Table::new("p", &long).with_column(Column::new("p1", "id", "INTEGER").pk()))
            .with_table(
                Table::new("c", "child")
                    .with_column(Column::new("c1", "id", "INTEGER").pk())
                    .with_column(Column::new("c2", "first_ref", "INTEGER"))
                    .with_column(Column::new("c3", "second_ref", "INTEGER")),
            )
            .with_relationship(Relationship::new("r1", ("p", "p1"), ("c", "c2")))
            .with_relationship(Relationship::new("r2", ("p", "p1"), ("c", "c3")));

        let out = emit(&schema, Dialect::PostgreSQL, &options());
        let names: Vec<&str> = out
            .statements
            .iter()
            .filter_map(|s| s.split_once(" ADD CONSTRAINT "))
            .map(|(_, rest)| rest.split(' ').next().unwrap())
            .collect();
        assert_eq!(names.len(), 2);
        assert_ne!(names[0], names[1]);
        for name in &names {
            assert!(name.len() <= 63, "{}", name);
            assert!(name.starts_with("fk_child_aaa"));
        }

        let sqlite = emit(&schema, Dialect::SQLite, &options());
        let inline = format!("CONSTRAINT fk_child_{} ", long);
        assert!(sqlite.statements.iter().any(|s| s.contains(&inline)));
    }

    #[test]
    fn test_constraint_names_disambiguated() {
        let schema = shop().with_relationship(Relationship::new("r2", ("t_users", "u_id"), ("t_orders", "o_id")));
        let out = emit(&schema, Dialect::PostgreSQL, &options());
        let alters: Vec<&String> = out.statements.iter().filter(|s| s.starts_with("ALTER")).collect();
        assert_eq!(alters.len(), 2);
        assert!(alters[0].contains("fk_orders_users FOREIGN KEY (id)"));
        assert!(alters[1].contains("fk_orders_users_2 FOREIGN KEY (user_id)"));
    }

    #[test]
    fn test_no_constraints_no_alter() {
        let mut opts = options();
        opts.include_constraints = false;
        opts.include_drop_statements = true;
        let out = emit(&shop(), Dialect::PostgreSQL, &opts);
        assert!(out.statements.iter().all(|s| !s.starts_with("ALTER TABLE")));
    }

    #[test]
    fn test_index_skipped_for_unique_column() {
        let mut schema = shop();
        schema.tables[1].columns[1].unique = true;
        let out = emit(&schema, Dialect::PostgreSQL, &options());
        assert!(out.statements.iter().all(|s| !s.starts_with("CREATE INDEX")));
    }

    #[test]
    fn test_mssql_restrict_downgraded() {
        let mut schema = shop();
        schema.relationships[0].on_delete = ReferentialAction::Restrict;
        let out = emit(&schema, Dialect::MsSql, &options());
        assert!(out.statements.iter().any(|s| s.contains("ON DELETE NO ACTION ON UPDATE CASCADE")));
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].kind, WarningKind::ActionDowngraded);
        assert_eq!(out.warnings[0].entity, EntityRef::relationship("r1"));
    }

    #[test]
    fn test_sqlite_inline_foreign_keys() {
        let out = emit(&shop(), Dialect::SQLite, &options());
        assert!(out.statements.iter().all(|s| !s.starts_with("ALTER TABLE")));
        assert_eq!(
            out.statements[0],
            "CREATE TABLE orders (\n  id INTEGER PRIMARY KEY,\n  user_id INTEGER NOT NULL,\n  \
             CONSTRAINT fk_orders_users FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE ON UPDATE CASCADE\n);"
        );
    }

    #[test]
    fn test_auto_increment_per_dialect() {
        let schema = Schema::new("s").with_table(
            Table::new("t", "t").with_column(Column::new("c", "id", "INTEGER").pk().auto_increment()),
        );
        let line = |dialect| emit(&schema, dialect, &options()).statements[0].lines().nth(1).unwrap().to_string();
        assert_eq!(line(Dialect::MySQL), "  id INTEGER PRIMARY KEY AUTO_INCREMENT");
        assert_eq!(line(Dialect::PostgreSQL), "  id INTEGER PRIMARY KEY GENERATED BY DEFAULT AS IDENTITY");
        assert_eq!(line(Dialect::SQLite), "  id INTEGER PRIMARY KEY AUTOINCREMENT");
        assert_eq!(line(Dialect::MsSql), "  id INT PRIMARY KEY IDENTITY(1,1)");
    }

    #[test]
    fn test_sqlite_ignores_auto_increment_off_key() {
        let schema = Schema::new("s").with_table(
            Table::new("t", "t")
                .with_column(Column::new("a", "id", "INTEGER").pk())
                .with_column(Column::new("b", "seq", "INTEGER").auto_increment()),
        );
        let out = emit(&schema, Dialect::SQLite, &options());
        assert!(out.statements[0].contains("  seq INTEGER\n"));
        assert_eq!(out.warnings[0].kind, WarningKind::AutoIncrementIgnored);
    }

    #[test]
    fn test_composite_primary_key() {
        let schema = Schema::new("s").with_table(
            Table::new("t", "memberships")
                .with_column(Column::new("a", "user_id", "INTEGER").pk())
                .with_column(Column::new("b", "group_id", "INTEGER").pk().unique()),
        );
        let out = emit(&schema, Dialect::PostgreSQL, &options());
        assert_eq!(
            out.statements[0],
            "CREATE TABLE memberships (\n  user_id INTEGER,\n  group_id INTEGER UNIQUE,\n  PRIMARY KEY (user_id, group_id)\n);"
        );
    }

    #[test]
    fn test_default_literals() {
        let schema = Schema::new("s").with_table(
            Table::new("t", "t")
                .with_column(Column::new("a", "active", "BOOLEAN").default_value("true"))
                .with_column(Column::new("b", "name", "TEXT_LARGE").default_value("O'Brien"))
                .with_column(Column::new("c", "created", "TIMESTAMP").default_value("CURRENT_TIMESTAMP"))
                .with_column(Column::new("d", "score", "DECIMAL").default_value("-1.5"))
                .with_column(Column::new("e", "code", "UUID").default_value("gen_random_uuid()"))
                .with_column(Column::new("f", "note", "TEXT_LARGE").default_value("  ")),
        );
        let out = emit(&schema, Dialect::MsSql, &options());
        let sql = &out.statements[0];
        assert!(sql.contains("active BIT DEFAULT 1"));
        assert!(sql.contains("name NVARCHAR(MAX) DEFAULT 'O''Brien'"));
        assert!(sql.contains("created DATETIMEOFFSET DEFAULT CURRENT_TIMESTAMP"));
        assert!(sql.contains("score DECIMAL(18, 2) DEFAULT -1.5"));
        assert!(sql.contains("code UNIQUEIDENTIFIER DEFAULT gen_random_uuid()"));
        assert!(sql.contains("note NVARCHAR(MAX)\n"));
    }

    #[test]
    fn test_default_literals_never_break_out() {
        let schema = Schema::new("s").with_table(
            Table::new("t", "t")
                .with_column(Column::new("a", "quoted", "TEXT_LARGE").default_value("'x'); DROP TABLE payroll; --'"))
                .with_column(Column::new("b", "call", "TEXT_LARGE").default_value("lower('a'); DROP TABLE payroll; --)"))
                .with_column(Column::new("c", "tail", "TEXT_LARGE").default_value("now() ); DROP TABLE payroll; (x)"))
                .with_column(Column::new("d", "escaped", "TEXT_LARGE").default_value("'it''s'"))
                .with_column(Column::new("e", "seq", "INTEGER").default_value("nextval('order_seq')")),
        );
        let out = emit(&schema, Dialect::PostgreSQL, &options());
        let sql = &out.statements[0];
        assert!(sql.contains("quoted TEXT DEFAULT '''x''); DROP TABLE payroll; --'''"));
        assert!(sql.contains("call TEXT DEFAULT 'lower(''a''); DROP TABLE payroll; --)'"));
        assert!(sql.contains("tail TEXT DEFAULT 'now() ); DROP TABLE payroll; (x)'"));
        assert!(sql.contains("escaped TEXT DEFAULT 'it''s'"));
        assert!(sql.contains("seq INTEGER DEFAULT nextval('order_seq')"));
    }

    #[test]
    fn test_carriage_return_starts_new_comment_line() {
        let schema = Schema::new("s").with_table(
            Table::new("t", "users")
                .with_description("Accounts\rDROP TABLE payroll;\r\nLast\tline")
                .with_column(Column::new("c", "id", "INTEGER").pk()),
        );
        let out = emit(&schema, Dialect::PostgreSQL, &options());
        assert!(out.statements[0].starts_with(
            "-- Accounts\n-- DROP TABLE payroll;\n-- Last line\nCREATE TABLE users (\n"
        ));
        assert!(!out.statements[0].contains('\r'));
    }

    #[test]
    fn test_length_widened_warning() {
        let schema = Schema::new("s").with_table(
            Table::new("t", "notes")
                .with_column(Column::new("a", "id", "INTEGER").pk())
                .with_column(Column::new("b", "body", "TEXT_VARIABLE").length(8000)),
        );
        let out = emit(&schema, Dialect::MsSql, &options());
        assert!(out.statements[0].contains("body NVARCHAR(MAX)"));
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].kind, WarningKind::LengthWidened);
        assert_eq!(out.warnings[0].entity, EntityRef::column("notes", "body"));

        let out = emit(&schema, Dialect::PostgreSQL, &options());
        assert!(out.statements[0].contains("body VARCHAR(8000)"));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_comments_and_quoting() {
        let schema = Schema::new("s").with_table(
            Table::new("t", "order")
                .with_description("Customer orders\nOne row per checkout")
                .with_column(Column::new("c", "user", "INTEGER").pk()),
        );
        let out = emit(&schema, Dialect::MySQL, &options());
        assert_eq!(
            out.statements[0],
            "-- Customer orders\n-- One row per checkout\nCREATE TABLE `order` (\n  `user` INTEGER PRIMARY KEY\n);"
        );

        let mut opts = options();
        opts.include_comments = false;
        let out = emit(&schema, Dialect::MsSql, &opts);
        assert!(out.statements[0].starts_with("CREATE TABLE [order]"));
    }

    #[test]
    fn test_align_columns() {
        let schema = Schema::new("s").with_table(
            Table::new("t", "users")
                .with_column(Column::new("a", "id", "INTEGER").pk())
                .with_column(Column::new("b", "名前", "TEXT_LARGE")),
        );
        let mut opts = options();
        opts.align_columns = true;
        let out = emit(&schema, Dialect::PostgreSQL, &opts);
        assert_eq!(
            out.statements[0],
            "CREATE TABLE users (\n  id     INTEGER PRIMARY KEY,\n  \"名前\" TEXT\n);"
        );
    }

    #[test]
    fn test_one_to_one_kind_does_not_change_output() {
        let mut schema = shop();
        schema.relationships[0].kind = RelationshipKind::OneToOne;
        assert_eq!(
            emit(&schema, Dialect::PostgreSQL, &options()),
            emit(&shop(), Dialect::PostgreSQL, &options())
        );
    }

    #[test]
    fn test_to_sql_joins_with_blank_line() {
        let emitted = Emitted {
            statements: vec!["A;".into(), "B;".into()],
            warnings: vec![],
        };
        assert_eq!(emitted.to_sql(), "A;\n\nB;\n");
        assert_eq!(Emitted { statements: vec![], warnings: vec![] }.to_sql(), "");
    }

    #[test]
    fn test_name_allocator_shortens_with_hash() {
        let mut names = NameAllocator::new(Some(20));
        let base = "fk_".to_string() + &"x".repeat(30);
        let first = names.allocate(&base);
        let second = names.allocate(&base);
        assert_eq!(first.len(), 20);
        assert_eq!(second.len(), 20);
        assert_ne!(first, second);
        assert!(first.starts_with("fk_xxxxxxxx_"));
        assert_eq!(names.allocate("fk_short"), "fk_short");
        assert_eq!(names.allocate("FK_SHORT"), "FK_SHORT_2");
    }

    #[test]
    fn test_string_literal_shapes() {
        assert!(is_string_literal("''"));
        assert!(is_string_literal("'O''Brien'"));
        assert!(!is_string_literal("'a'b'"));
        assert!(!is_string_literal("'"));
    }

    #[test]
    fn test_function_call_shapes() {
        assert!(is_function_call("now()"));
        assert!(is_function_call("pg_catalog.gen_random_uuid()"));
        assert!(is_function_call("coalesce(a, lower('x)'))"));
        assert!(!is_function_call("now() + now()"));
        assert!(!is_function_call("f(1); DROP TABLE t; g()"));
        assert!(!is_function_call("f(1 -- )"));
        assert!(!is_function_call("f('unterminated)"));
        assert!(!is_function_call("(select 1)"));
    }

    #[test]
    fn test_is_number() {
        assert!(is_number("42"));
        assert!(is_number("-0.5"));
        assert!(!is_number("."));
        assert!(!is_number("1.2.3"));
        assert!(!is_number("abc"));
    }
}
