//! Abstract kind to concrete type syntax.

use super::dialect::DialectProfile;
use crate::catalog::{ColumnType, DataKind, Params};

/// Base type names for every catalog kind in one dialect.
#[derive(Debug)]
pub struct TypeTable {
    pub integer_small: &'static str,
    pub integer: &'static str,
    pub integer_big: &'static str,
    pub text_variable: &'static str,
    pub text_fixed: &'static str,
    pub text_large: &'static str,
    pub decimal: &'static str,
    pub floating: &'static str,
    pub boolean: &'static str,
    pub date: &'static str,
    pub time: &'static str,
    pub datetime: &'static str,
    pub timestamp: &'static str,
    pub binary_large: &'static str,
    pub structured_json: &'static str,
    pub uuid: &'static str,
}

impl TypeTable {
    pub fn name(&self, kind: DataKind) -> &'static str {
        match kind {
            DataKind::IntegerSmall => self.integer_small,
            DataKind::Integer => self.integer,
            DataKind::IntegerBig => self.integer_big,
            DataKind::TextVariable => self.text_variable,
            DataKind::TextFixed => self.text_fixed,
            DataKind::TextLarge => self.text_large,
            DataKind::Decimal => self.decimal,
            DataKind::Floating => self.floating,
            DataKind::Boolean => self.boolean,
            DataKind::Date => self.date,
            DataKind::Time => self.time,
            DataKind::DateTime => self.datetime,
            DataKind::Timestamp => self.timestamp,
            DataKind::BinaryLarge => self.binary_large,
            DataKind::StructuredJson => self.structured_json,
            DataKind::Uuid => self.uuid,
        }
    }
}

pub static MYSQL: TypeTable = TypeTable {
    integer_small: "SMALLINT",
    integer: "INTEGER",
    integer_big: "BIGINT",
    text_variable: "VARCHAR",
    text_fixed: "CHAR",
    text_large: "TEXT",
    decimal: "DECIMAL",
    floating: "DOUBLE",
    boolean: "BOOLEAN",
    date: "DATE",
    time: "TIME",
    datetime: "DATETIME",
    timestamp: "TIMESTAMP",
    binary_large: "LONGBLOB",
    structured_json: "JSON",
    uuid: "CHAR(36)",
};

pub static POSTGRESQL: TypeTable = TypeTable {
    integer_small: "SMALLINT",
    integer: "INTEGER",
    integer_big: "BIGINT",
    text_variable: "VARCHAR",
    text_fixed: "CHAR",
    text_large: "TEXT",
    decimal: "NUMERIC",
    floating: "DOUBLE PRECISION",
    boolean: "BOOLEAN",
    date: "DATE",
    time: "TIME",
    datetime: "TIMESTAMP",
    timestamp: "TIMESTAMPTZ",
    binary_large: "BYTEA",
    structured_json: "JSONB",
    uuid: "UUID",
};

// SQLite only honours AUTOINCREMENT on a column typed exactly INTEGER.
pub static SQLITE: TypeTable = TypeTable {
    integer_small: "INTEGER",
    integer: "INTEGER",
    integer_big: "INTEGER",
    text_variable: "VARCHAR",
    text_fixed: "CHAR",
    text_large: "TEXT",
    decimal: "NUMERIC",
    floating: "REAL",
    boolean: "INTEGER",
    date: "DATE",
    time: "TIME",
    datetime: "DATETIME",
    timestamp: "TIMESTAMP",
    binary_large: "BLOB",
    structured_json: "TEXT",
    uuid: "TEXT",
};

pub static MSSQL: TypeTable = TypeTable {
    integer_small: "SMALLINT",
    integer: "INT",
    integer_big: "BIGINT",
    text_variable: "NVARCHAR",
    text_fixed: "NCHAR",
    text_large: "NVARCHAR(MAX)",
    decimal: "DECIMAL",
    floating: "FLOAT",
    boolean: "BIT",
    date: "DATE",
    time: "TIME",
    datetime: "DATETIME2",
    timestamp: "DATETIMEOFFSET",
    binary_large: "VARBINARY(MAX)",
    structured_json: "NVARCHAR(MAX)",
    uuid: "UNIQUEIDENTIFIER",
};

/// Concrete type text for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedType {
    pub sql: String,
    /// Set when the declared length exceeded the dialect ceiling and the
    /// large text type was used instead.
    pub widened_from: Option<u32>,
}

/// Render a column type, filling omitted parameters with dialect defaults.
pub fn render_type(profile: &DialectProfile, ty: &ColumnType) -> RenderedType {
    let name = profile.types.name(ty.kind);

    match ty.kind.params() {
        Params::None => RenderedType {
            sql: name.to_string(),
            widened_from: None,
        },
        Params::Length => {
            let default = if ty.kind == DataKind::TextFixed {
                profile.default_char_length
            } else {
                profile.default_varchar_length
            };
            let length = ty.length.unwrap_or(default);

            match profile.max_varchar_length {
                Some(max) if length > max => RenderedType {
                    sql: profile.types.name(DataKind::TextLarge).to_string(),
                    widened_from: Some(length),
                },
                _ => RenderedType {
                    sql: format!("{}({})", name, length),
                    widened_from: None,
                },
            }
        }
        Params::PrecisionScale => {
            let (default_precision, default_scale) = profile.default_decimal;
            let precision = ty.precision.unwrap_or(default_precision);
            let scale = match ty.precision {
                Some(_) => ty.scale.unwrap_or(0),
                None => default_scale,
            };
            RenderedType {
                sql: format!("{}({}, {})", name, precision, scale),
                widened_from: None,
            }
        }
    }
}
