//! Construcción de sentencias
//!
//! Las sentencias se arman a partir de los campos presentes de un registro y
//! se traducen a `sqlx::QueryBuilder` con todos los valores enlazados como
//! parámetros. Ningún valor del usuario se concatena al texto SQL.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{Postgres, QueryBuilder};
use std::fmt;

/// Valor tipado, producido sólo por la validación
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Date(NaiveDate),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Text(value) => f.write_str(value),
            SqlValue::Integer(value) => write!(f, "{}", value),
            SqlValue::Decimal(value) => write!(f, "{}", value),
            SqlValue::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Insert {
        table: &'static str,
        values: Vec<(&'static str, SqlValue)>,
    },
    Update {
        table: &'static str,
        key_column: &'static str,
        id: i64,
        assignments: Vec<(&'static str, SqlValue)>,
    },
    Delete {
        table: &'static str,
        key_column: &'static str,
        id: i64,
    },
    Exists {
        table: &'static str,
        key_column: &'static str,
        id: i64,
    },
    Select {
        table: &'static str,
        key_column: &'static str,
        columns: Vec<&'static str>,
    },
}

impl Statement {
    pub fn delete(table: &'static str, key_column: &'static str, id: i64) -> Self {
        Statement::Delete { table, key_column, id }
    }

    pub fn exists(table: &'static str, key_column: &'static str, id: i64) -> Self {
        Statement::Exists { table, key_column, id }
    }

    /// SELECT de todas las columnas, sin filtro ni paginación
    pub fn select(table: &'static str, key_column: &'static str, columns: Vec<&'static str>) -> Self {
        Statement::Select { table, key_column, columns }
    }

    pub fn table(&self) -> &'static str {
        match self {
            Statement::Insert { table, .. }
            | Statement::Update { table, .. }
            | Statement::Delete { table, .. }
            | Statement::Exists { table, .. }
            | Statement::Select { table, .. } => table,
        }
    }

    /// Traducir a un `QueryBuilder` de PostgreSQL con parámetros enlazados
    pub fn to_query_builder(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("");

        match self {
            Statement::Insert { table, values } => {
                qb.push("INSERT INTO ").push(quote_ident(table)).push(" (");
                for (i, (column, _)) in values.iter().enumerate() {
                    if i > 0 {
                        qb.push(", ");
                    }
                    qb.push(quote_ident(column));
                }
                qb.push(") VALUES (");
                for (i, (_, value)) in values.iter().enumerate() {
                    if i > 0 {
                        qb.push(", ");
                    }
                    push_value(&mut qb, value);
                }
                qb.push(")");
            }
            Statement::Update { table, key_column, id, assignments } => {
                qb.push("UPDATE ").push(quote_ident(table)).push(" SET ");
                for (i, (column, value)) in assignments.iter().enumerate() {
                    if i > 0 {
                        qb.push(", ");
                    }
                    qb.push(quote_ident(column)).push(" = ");
                    push_value(&mut qb, value);
                }
                qb.push(" WHERE ").push(quote_ident(key_column)).push(" = ");
                qb.push_bind(*id);
            }
            Statement::Delete { table, key_column, id } => {
                qb.push("DELETE FROM ").push(quote_ident(table));
                qb.push(" WHERE ").push(quote_ident(key_column)).push(" = ");
                qb.push_bind(*id);
            }
            Statement::Exists { table, key_column, id } => {
                qb.push("SELECT 1 FROM ").push(quote_ident(table));
                qb.push(" WHERE ").push(quote_ident(key_column)).push(" = ");
                qb.push_bind(*id);
                qb.push(" LIMIT 1");
            }
            Statement::Select { table, key_column, columns } => {
                qb.push("SELECT ");
                for (i, column) in columns.iter().enumerate() {
                    if i > 0 {
                        qb.push(", ");
                    }
                    let ident = quote_ident(column);
                    qb.push(format!("{}::TEXT AS {}", ident, ident));
                }
                qb.push(" FROM ").push(quote_ident(table));
                qb.push(" ORDER BY ").push(quote_ident(key_column));
            }
        }

        qb
    }

    /// Texto SQL con marcadores `$n`, para logs y pruebas
    pub fn sql(&self) -> String {
        self.to_query_builder().sql().to_string()
    }
}

fn push_value(qb: &mut QueryBuilder<'static, Postgres>, value: &SqlValue) {
    match value {
        SqlValue::Text(text) => qb.push_bind(text.clone()),
        SqlValue::Integer(number) => qb.push_bind(*number),
        SqlValue::Decimal(number) => qb.push_bind(*number),
        SqlValue::Date(date) => qb.push_bind(*date),
    };
}

// Los identificadores vienen de los descriptores estáticos, nunca del usuario
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// INSERT con las columnas en el orden declarado
#[derive(Debug)]
pub struct InsertBuilder {
    table: &'static str,
    values: Vec<(&'static str, SqlValue)>,
}

impl InsertBuilder {
    pub fn new(table: &'static str) -> Self {
        Self { table, values: Vec::new() }
    }

    pub fn value(mut self, column: &'static str, value: SqlValue) -> Self {
        self.values.push((column, value));
        self
    }

    pub fn build(self) -> Statement {
        Statement::Insert {
            table: self.table,
            values: self.values,
        }
    }
}

/// UPDATE parcial: sólo entran en el SET los campos presentes
#[derive(Debug)]
pub struct UpdateBuilder {
    table: &'static str,
    key_column: &'static str,
    id: i64,
    assignments: Vec<(&'static str, SqlValue)>,
}

impl UpdateBuilder {
    pub fn new(table: &'static str, key_column: &'static str, id: i64) -> Self {
        Self {
            table,
            key_column,
            id,
            assignments: Vec::new(),
        }
    }

    pub fn set_if_present(mut self, column: &'static str, value: Option<SqlValue>) -> Self {
        if let Some(value) = value {
            self.assignments.push((column, value));
        }
        self
    }

    /// `None` significa "nada que actualizar": no se genera sentencia
    pub fn build(self) -> Option<Statement> {
        if self.assignments.is_empty() {
            return None;
        }
        Some(Statement::Update {
            table: self.table,
            key_column: self.key_column,
            id: self.id,
            assignments: self.assignments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_insert_binds_every_value() {
        let statement = InsertBuilder::new("driver")
            .value("name", SqlValue::Text("O'Brien".to_string()))
            .value("license_number", SqlValue::Text("12345678901".to_string()))
            .value("salary", SqlValue::Decimal(Decimal::from_str("3500.50").unwrap()))
            .build();

        assert_eq!(
            statement.sql(),
            r#"INSERT INTO "driver" ("name", "license_number", "salary") VALUES ($1, $2, $3)"#
        );
        assert!(!statement.sql().contains("O'Brien"));
    }

    #[test]
    fn test_update_only_present_fields() {
        let statement = UpdateBuilder::new("vehicle", "id", 7)
            .set_if_present("plate", None)
            .set_if_present("model", Some(SqlValue::Text("Actros".to_string())))
            .set_if_present("year", Some(SqlValue::Integer(2020)))
            .build()
            .expect("two fields present");

        assert_eq!(
            statement.sql(),
            r#"UPDATE "vehicle" SET "model" = $1, "year" = $2 WHERE "id" = $3"#
        );
    }

    #[test]
    fn test_update_without_fields_is_nothing_to_update() {
        let builder = UpdateBuilder::new("client", "id", 1)
            .set_if_present("name", None)
            .set_if_present("address", None);

        assert!(builder.build().is_none());
    }

    #[test]
    fn test_delete_exists_and_select_sql() {
        assert_eq!(
            Statement::delete("cargo", "id", 3).sql(),
            r#"DELETE FROM "cargo" WHERE "id" = $1"#
        );
        assert_eq!(
            Statement::exists("route", "id", 3).sql(),
            r#"SELECT 1 FROM "route" WHERE "id" = $1 LIMIT 1"#
        );
        assert_eq!(
            Statement::select("maintenance", "id", vec!["id", "date"]).sql(),
            r#"SELECT "id"::TEXT AS "id", "date"::TEXT AS "date" FROM "maintenance" ORDER BY "id""#
        );
    }

    #[test]
    fn test_sql_value_display() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(SqlValue::Date(date).to_string(), "2024-02-29");
        assert_eq!(SqlValue::Integer(42).to_string(), "42");
        assert_eq!(SqlValue::Decimal(Decimal::from_str("10.50").unwrap()).to_string(), "10.50");
    }
}
