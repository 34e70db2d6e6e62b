//! Target dialects and their immutable syntax profiles.

use super::types::{self, TypeTable};
use crate::model::ReferentialAction;
use serde::Serialize;
use std::fmt;

/// SQL dialect variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    MySQL,
    PostgreSQL,
    SQLite,
    #[serde(rename = "mssql")]
    MsSql,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [Self::MySQL, Self::PostgreSQL, Self::SQLite, Self::MsSql];

    /// Parse dialect from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mysql" | "mariadb" => Some(Self::MySQL),
            "postgres" | "postgresql" | "pg" => Some(Self::PostgreSQL),
            "sqlite" | "sqlite3" => Some(Self::SQLite),
            "mssql" | "sqlserver" | "tsql" => Some(Self::MsSql),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MySQL => "mysql",
            Self::PostgreSQL => "postgresql",
            Self::SQLite => "sqlite",
            Self::MsSql => "mssql",
        }
    }

    pub fn profile(self) -> &'static DialectProfile {
        match self {
            Self::MySQL => &MYSQL,
            Self::PostgreSQL => &POSTGRESQL,
            Self::SQLite => &SQLITE,
            Self::MsSql => &MSSQL,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where an auto-increment keyword goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoIncrement {
    /// Appended after every other column clause.
    Suffix(&'static str),
    /// Must directly follow `PRIMARY KEY`, and only on a sole key column.
    AfterPrimaryKey(&'static str),
}

/// Where foreign key clauses are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyPlacement {
    /// `ALTER TABLE ... ADD CONSTRAINT` after every table exists.
    AlterTable,
    /// Named table constraint inside `CREATE TABLE`. Only for engines that
    /// do not resolve references at create time.
    Inline,
}

/// How a foreign key is removed in the drop phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropForeignKey {
    /// `ALTER TABLE t DROP FOREIGN KEY n`; MySQL has no `IF EXISTS` form.
    ForeignKey,
    /// `ALTER TABLE IF EXISTS t DROP CONSTRAINT IF EXISTS n`
    IfExists,
    /// `ALTER TABLE t DROP CONSTRAINT n`, guarded by an `OBJECT_ID` lookup.
    ObjectIdGuard,
}

/// Everything the emitter needs to know about one dialect.
#[derive(Debug)]
pub struct DialectProfile {
    pub dialect: Dialect,
    pub quote: (char, char),
    pub true_literal: &'static str,
    pub false_literal: &'static str,
    pub auto_increment: AutoIncrement,
    pub actions: &'static [ReferentialAction],
    pub foreign_keys: ForeignKeyPlacement,
    pub drop_foreign_key: DropForeignKey,
    /// Longest constraint or index name, in bytes.
    pub max_identifier_length: Option<usize>,
    pub types: &'static TypeTable,
    pub default_varchar_length: u32,
    pub default_char_length: u32,
    pub default_decimal: (u32, u32),
    /// Longest variable text the dialect stores inline.
    pub max_varchar_length: Option<u32>,
}

use ReferentialAction::{Cascade, NoAction, Restrict, SetNull};

static MYSQL: DialectProfile = DialectProfile {
    dialect: Dialect::MySQL,
    quote: ('`', '`'),
    true_literal: "TRUE",
    false_literal: "FALSE",
    auto_increment: AutoIncrement::Suffix("AUTO_INCREMENT"),
    actions: &[Cascade, SetNull, Restrict, NoAction],
    foreign_keys: ForeignKeyPlacement::AlterTable,
    drop_foreign_key: DropForeignKey::ForeignKey,
    max_identifier_length: Some(64),
    types: &types::MYSQL,
    default_varchar_length: 255,
    default_char_length: 1,
    default_decimal: (10, 2),
    max_varchar_length: None,
};

static POSTGRESQL: DialectProfile = DialectProfile {
    dialect: Dialect::PostgreSQL,
    quote: ('"', '"'),
    true_literal: "TRUE",
    false_literal: "FALSE",
    auto_increment: AutoIncrement::Suffix("GENERATED BY DEFAULT AS IDENTITY"),
    actions: &[Cascade, SetNull, Restrict, NoAction],
    foreign_keys: ForeignKeyPlacement::AlterTable,
    drop_foreign_key: DropForeignKey::IfExists,
    max_identifier_length: Some(63),
    types: &types::POSTGRESQL,
    default_varchar_length: 255,
    default_char_length: 1,
    default_decimal: (10, 2),
    max_varchar_length: None,
};

static SQLITE: DialectProfile = DialectProfile {
    dialect: Dialect::SQLite,
    quote: ('"', '"'),
    true_literal: "1",
    false_literal: "0",
    auto_increment: AutoIncrement::AfterPrimaryKey("AUTOINCREMENT"),
    actions: &[Cascade, SetNull, Restrict, NoAction],
    foreign_keys: ForeignKeyPlacement::Inline,
    drop_foreign_key: DropForeignKey::IfExists,
    max_identifier_length: None,
    types: &types::SQLITE,
    default_varchar_length: 255,
    default_char_length: 1,
    default_decimal: (10, 2),
    max_varchar_length: None,
};

static MSSQL: DialectProfile = DialectProfile {
    dialect: Dialect::MsSql,
    quote: ('[', ']'),
    true_literal: "1",
    false_literal: "0",
    auto_increment: AutoIncrement::Suffix("IDENTITY(1,1)"),
    actions: &[Cascade, SetNull, NoAction],
    foreign_keys: ForeignKeyPlacement::AlterTable,
    drop_foreign_key: DropForeignKey::ObjectIdGuard,
    max_identifier_length: Some(128),
    types: &types::MSSQL,
    default_varchar_length: 255,
    default_char_length: 1,
    default_decimal: (18, 2),
    max_varchar_length: Some(4000),
};

/// Keywords reserved in at least one supported dialect. Sorted for lookup.
static RESERVED: &[&str] = &[
    "ADD", "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN",
    "CONSTRAINT", "CREATE", "CROSS", "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP",
    "CURRENT_USER", "DATABASE", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "END",
    "EXCEPT", "EXISTS", "FOREIGN", "FROM", "FULL", "GRANT", "GROUP", "HAVING", "IN", "INDEX",
    "INNER", "INSERT", "INTERSECT", "INTO", "IS", "JOIN", "KEY", "LEFT", "LIKE", "LIMIT", "NOT",
    "NULL", "OFFSET", "ON", "OR", "ORDER", "OUTER", "PRIMARY", "REFERENCES", "RIGHT", "ROW",
    "SELECT", "SET", "TABLE", "THEN", "TO", "UNION", "UNIQUE", "UPDATE", "USER", "USING",
    "VALUES", "WHEN", "WHERE", "WITH",
];

impl DialectProfile {
    /// Quote an identifier when it is not a plain word or is reserved, or
    /// unconditionally when `always` is set.
    pub fn quote_ident(&self, ident: &str, always: bool) -> String {
        if !always && !needs_quoting(ident) {
            return ident.to_string();
        }
        let (open, close) = self.quote;
        let mut quoted = String::with_capacity(ident.len() + 2);
        quoted.push(open);
        for c in ident.chars() {
            if c == close {
                quoted.push(close);
            }
            quoted.push(c);
        }
        quoted.push(close);
        quoted
    }

    /// Statement removing foreign key `name` from `table`.
    pub fn drop_foreign_key(&self, table: &str, name: &str, quote_all: bool) -> String {
        let table = self.quote_ident(table, quote_all);
        let constraint = self.quote_ident(name, quote_all);
        match self.drop_foreign_key {
            DropForeignKey::ForeignKey => {
                format!("ALTER TABLE {} DROP FOREIGN KEY {};", table, constraint)
            }
            DropForeignKey::IfExists => format!(
                "ALTER TABLE IF EXISTS {} DROP CONSTRAINT IF EXISTS {};",
                table, constraint
            ),
            DropForeignKey::ObjectIdGuard => format!(
                "IF OBJECT_ID(N'{}', N'F') IS NOT NULL ALTER TABLE {} DROP CONSTRAINT {};",
                self.quote_ident(name, true).replace('\'', "''"),
                table,
                constraint
            ),
        }
    }

    pub fn bool_literal(&self, value: bool) -> &'static str {
        if value {
            self.true_literal
        } else {
            self.false_literal
        }
    }

    pub fn supports_action(&self, action: ReferentialAction) -> bool {
        self.actions.contains(&action)
    }

    /// Map a requested action onto one this dialect supports. Returns the
    /// action to render and whether it differs from the request.
    pub fn resolve_action(&self, requested: ReferentialAction) -> (ReferentialAction, bool) {
        if self.supports_action(requested) {
            return (requested, false);
        }
        let fallbacks: &[ReferentialAction] = match requested {
            Restrict => &[NoAction],
            NoAction => &[Restrict],
            SetNull | Cascade => &[NoAction, Restrict],
        };
        fallbacks
            .iter()
            .copied()
            .find(|a| self.supports_action(*a))
            .map_or((requested, false), |a| (a, true))
    }
}

fn needs_quoting(ident: &str) -> bool {
    let mut chars = ident.chars();
    let plain = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    !plain || RESERVED.binary_search(&ident.to_uppercase().as_str()).is_ok()
}
