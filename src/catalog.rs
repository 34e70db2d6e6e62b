//! Dialect-independent column kinds and the parameters each one accepts.

use crate::model::Column;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataKind {
    IntegerSmall,
    Integer,
    IntegerBig,
    TextVariable,
    TextFixed,
    TextLarge,
    Decimal,
    Floating,
    Boolean,
    Date,
    Time,
    DateTime,
    Timestamp,
    BinaryLarge,
    StructuredJson,
    Uuid,
}

/// Numeric parameters a kind accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Params {
    None,
    Length,
    PrecisionScale,
}

impl DataKind {
    pub const ALL: [DataKind; 16] = [
        Self::IntegerSmall,
        Self::Integer,
        Self::IntegerBig,
        Self::TextVariable,
        Self::TextFixed,
        Self::TextLarge,
        Self::Decimal,
        Self::Floating,
        Self::Boolean,
        Self::Date,
        Self::Time,
        Self::DateTime,
        Self::Timestamp,
        Self::BinaryLarge,
        Self::StructuredJson,
        Self::Uuid,
    ];

    /// Parse a kind name. Accepts the catalog names and the usual SQL
    /// spellings, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        let kind = match normalized.as_str() {
            "INTEGER_SMALL" | "SMALLINT" | "INT2" | "TINYINT" => Self::IntegerSmall,
            "INTEGER" | "INT" | "INT4" => Self::Integer,
            "INTEGER_BIG" | "BIGINT" | "INT8" => Self::IntegerBig,
            "TEXT_VARIABLE" | "VARCHAR" | "STRING" | "CHARACTER_VARYING" | "NVARCHAR" => {
                Self::TextVariable
            }
            "TEXT_FIXED" | "CHAR" | "CHARACTER" | "NCHAR" => Self::TextFixed,
            "TEXT_LARGE" | "TEXT" | "LONGTEXT" | "CLOB" => Self::TextLarge,
            "DECIMAL" | "NUMERIC" => Self::Decimal,
            "FLOATING" | "FLOAT" | "DOUBLE" | "REAL" | "DOUBLE_PRECISION" => Self::Floating,
            "BOOLEAN" | "BOOL" | "BIT" => Self::Boolean,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "DATETIME" => Self::DateTime,
            "TIMESTAMP" | "TIMESTAMPTZ" => Self::Timestamp,
            "BINARY_LARGE" | "BLOB" | "BYTEA" | "BINARY" | "VARBINARY" => Self::BinaryLarge,
            "STRUCTURED_JSON" | "JSON" | "JSONB" => Self::StructuredJson,
            "UUID" | "UNIQUEIDENTIFIER" => Self::Uuid,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::IntegerSmall => "INTEGER_SMALL",
            Self::Integer => "INTEGER",
            Self::IntegerBig => "INTEGER_BIG",
            Self::TextVariable => "TEXT_VARIABLE",
            Self::TextFixed => "TEXT_FIXED",
            Self::TextLarge => "TEXT_LARGE",
            Self::Decimal => "DECIMAL",
            Self::Floating => "FLOATING",
            Self::Boolean => "BOOLEAN",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::DateTime => "DATETIME",
            Self::Timestamp => "TIMESTAMP",
            Self::BinaryLarge => "BINARY_LARGE",
            Self::StructuredJson => "STRUCTURED_JSON",
            Self::Uuid => "UUID",
        }
    }

    pub fn params(self) -> Params {
        match self {
            Self::TextVariable | Self::TextFixed => Params::Length,
            Self::Decimal => Params::PrecisionScale,
            _ => Params::None,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(self, Self::IntegerSmall | Self::Integer | Self::IntegerBig)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || matches!(self, Self::Decimal | Self::Floating)
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A column's kind together with the parameters it was declared with.
/// Parameters left out are filled in by the dialect at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnType {
    pub kind: DataKind,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("unknown data type `{0}`")]
    UnknownKind(String),
    #[error("{kind} does not accept a {param}")]
    UnexpectedParameter { kind: DataKind, param: &'static str },
    #[error("{kind} {param} must be greater than zero")]
    ZeroParameter { kind: DataKind, param: &'static str },
    #[error("{kind} scale requires a precision")]
    ScaleWithoutPrecision { kind: DataKind },
    #[error("{kind} scale {scale} exceeds precision {precision}")]
    ScaleExceedsPrecision {
        kind: DataKind,
        precision: u32,
        scale: u32,
    },
}

/// Resolve a column's declared type against the catalog.
pub fn resolve(column: &Column) -> Result<ColumnType, TypeError> {
    let kind = DataKind::parse(&column.data_type)
        .ok_or_else(|| TypeError::UnknownKind(column.data_type.clone()))?;

    let accepts = kind.params();
    let unexpected = |param: &'static str| TypeError::UnexpectedParameter { kind, param };

    if column.length.is_some() && accepts != Params::Length {
        return Err(unexpected("length"));
    }
    if accepts != Params::PrecisionScale {
        if column.precision.is_some() {
            return Err(unexpected("precision"));
        }
        if column.scale.is_some() {
            return Err(unexpected("scale"));
        }
    }

    if column.length == Some(0) {
        return Err(TypeError::ZeroParameter {
            kind,
            param: "length",
        });
    }
    if column.precision == Some(0) {
        return Err(TypeError::ZeroParameter {
            kind,
            param: "precision",
        });
    }

    match (column.precision, column.scale) {
        (None, Some(_)) => return Err(TypeError::ScaleWithoutPrecision { kind }),
        (Some(precision), Some(scale)) if scale > precision => {
            return Err(TypeError::ScaleExceedsPrecision {
                kind,
                precision,
                scale,
            });
        }
        _ => {}
    }

    Ok(ColumnType {
        kind,
        length: column.length,
        precision: column.precision,
        scale: column.scale,
    })
}
