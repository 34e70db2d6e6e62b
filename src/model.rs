//! Schema graph snapshot handed to the compiler by the persistence layer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub name: String,
    /// Abstract kind name, resolved through the type catalog.
    pub data_type: String,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub scale: Option<u32>,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub foreign_key: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default, alias = "notNull")]
    pub required: bool,
    #[serde(default)]
    pub auto_increment: bool,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order_index: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    /// Referenced side.
    pub source_table_id: String,
    pub source_column_id: String,
    /// Side holding the foreign key.
    pub target_table_id: String,
    pub target_column_id: String,
    #[serde(default)]
    pub kind: RelationshipKind,
    #[serde(default)]
    pub on_delete: ReferentialAction,
    #[serde(default)]
    pub on_update: ReferentialAction,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RelationshipKind {
    #[serde(rename = "one-to-one", alias = "one_to_one", alias = "1:1")]
    OneToOne,
    #[default]
    #[serde(rename = "one-to-many", alias = "one_to_many", alias = "1:n")]
    OneToMany,
    #[serde(rename = "many-to-many", alias = "many_to_many", alias = "n:m")]
    ManyToMany,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum ReferentialAction {
    #[serde(rename = "CASCADE", alias = "cascade")]
    Cascade,
    #[serde(rename = "SET NULL", alias = "SET_NULL", alias = "set null")]
    SetNull,
    #[serde(rename = "RESTRICT", alias = "restrict")]
    Restrict,
    #[default]
    #[serde(rename = "NO ACTION", alias = "NO_ACTION", alias = "no action")]
    NoAction,
}

impl ReferentialAction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::Restrict => "RESTRICT",
            Self::NoAction => "NO ACTION",
        }
    }
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            tables: vec![],
            relationships: vec![],
        }
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn table(&self, id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    /// Id lookup for repeated resolution. A repeated id keeps its first
    /// table, matching [`Schema::table`].
    pub fn tables_by_id(&self) -> HashMap<&str, &Table> {
        let mut tables = HashMap::with_capacity(self.tables.len());
        for table in &self.tables {
            tables.entry(table.id.as_str()).or_insert(table);
        }
        tables
    }
}

impl Table {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            columns: vec![],
            description: None,
        }
    }

    pub fn with_column(mut self, mut column: Column) -> Self {
        if column.order_index == 0 {
            column.order_index = self.columns.len() as i64;
        }
        self.columns.push(column);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Columns in rendering order. The sort is stable, so equal order
    /// indexes keep their stored sequence.
    pub fn ordered_columns(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.order_index);
        columns
    }

    pub fn primary_key_columns(&self) -> Vec<&Column> {
        self.ordered_columns()
            .into_iter()
            .filter(|c| c.primary_key)
            .collect()
    }
}

impl Column {
    pub fn new(id: impl Into<String>, name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data_type: data_type.into(),
            length: None,
            precision: None,
            scale: None,
            primary_key: false,
            foreign_key: false,
            unique: false,
            required: false,
            auto_increment: false,
            default_value: None,
            description: None,
            order_index: 0,
        }
    }

    pub fn pk(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn fk(mut self) -> Self {
        self.foreign_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

impl Relationship {
    /// `source` is the referenced (table, column); `target` holds the key.
    pub fn new(id: impl Into<String>, source: (&str, &str), target: (&str, &str)) -> Self {
        Self {
            id: id.into(),
            source_table_id: source.0.to_string(),
            source_column_id: source.1.to_string(),
            target_table_id: target.0.to_string(),
            target_column_id: target.1.to_string(),
            kind: RelationshipKind::OneToMany,
            on_delete: ReferentialAction::NoAction,
            on_update: ReferentialAction::NoAction,
            name: None,
            description: None,
        }
    }

    pub fn kind(mut self, kind: RelationshipKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = action;
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = action;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_snapshot() {
        let json = r#"{
            "id": "s1",
            "name": "shop",
            "tables": [{
                "id": "t1",
                "name": "users",
                "columns": [
                    {"id": "c2", "name": "email", "dataType": "TEXT_VARIABLE", "length": 255,
                     "required": true, "unique": true, "orderIndex": 1},
                    {"id": "c1", "name": "id", "dataType": "INTEGER", "primaryKey": true,
                     "autoIncrement": true, "orderIndex": 0}
                ]
            }],
            "relationships": [{
                "id": "r1",
                "sourceTableId": "t1", "sourceColumnId": "c1",
                "targetTableId": "t1", "targetColumnId": "c1",
                "kind": "one-to-one", "onDelete": "SET NULL"
            }]
        }"#;

        let schema: Schema = serde_json::from_str(json).unwrap();
        let users = schema.table("t1").unwrap();
        let ordered: Vec<&str> = users.ordered_columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(ordered, vec!["id", "email"]);
        assert_eq!(users.columns[0].length, Some(255));

        let rel = &schema.relationships[0];
        assert_eq!(rel.kind, RelationshipKind::OneToOne);
        assert_eq!(rel.on_delete, ReferentialAction::SetNull);
        assert_eq!(rel.on_update, ReferentialAction::NoAction);
    }

    #[test]
    fn test_ordered_columns_stable_on_ties() {
        let mut a = Column::new("a", "a", "INTEGER");
        let mut b = Column::new("b", "b", "INTEGER");
        a.order_index = 3;
        b.order_index = 3;
        let table = Table {
            id: "t".into(),
            name: "t".into(),
            columns: vec![a, b],
            description: None,
        };
        let names: Vec<&str> = table.ordered_columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_builder_assigns_order() {
        let table = Table::new("t", "t")
            .with_column(Column::new("a", "a", "INTEGER").pk())
            .with_column(Column::new("b", "b", "INTEGER"));
        assert_eq!(table.columns[1].order_index, 1);
        assert_eq!(table.primary_key_columns().len(), 1);
    }

    #[test]
    fn test_tables_by_id_keeps_first() {
        let schema = Schema::new("s")
            .with_table(Table::new("t", "first"))
            .with_table(Table::new("u", "other"))
            .with_table(Table::new("t", "second"));
        let tables = schema.tables_by_id();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables["t"].name, "first");
        assert_eq!(schema.table("t").map(|t| t.name.as_str()), Some("first"));
    }
}
