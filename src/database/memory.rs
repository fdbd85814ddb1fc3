//! Almacén en memoria
//!
//! Implementa `Store` con tablas dentro del proceso. Se usa con
//! `STORE_BACKEND=memory` para demos sin PostgreSQL y en las pruebas.
//! Los ids se asignan con un contador por tabla, igual que un BIGSERIAL.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

use crate::database::query_builder::{SqlValue, Statement};
use crate::database::store::{Store, StoreError, TableView};

#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, HashMap<&'static str, SqlValue>>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<&'static str, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn execute(&self, statement: &Statement) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().await;

        match statement {
            Statement::Insert { table, values } => {
                let table = tables.entry(*table).or_default();
                table.next_id += 1;
                let row = values.iter().cloned().collect();
                table.rows.insert(table.next_id, row);
                Ok(1)
            }
            Statement::Update { table, id, assignments, .. } => {
                let Some(row) = tables.get_mut(table).and_then(|t| t.rows.get_mut(id)) else {
                    return Ok(0);
                };
                for (column, value) in assignments {
                    row.insert(*column, value.clone());
                }
                Ok(1)
            }
            Statement::Delete { table, id, .. } => {
                let removed = tables
                    .get_mut(table)
                    .and_then(|t| t.rows.remove(id))
                    .is_some();
                Ok(u64::from(removed))
            }
            Statement::Exists { .. } | Statement::Select { .. } => Err(StoreError::new(format!(
                "statement on \"{}\" returns rows; use exists/select",
                statement.table()
            ))),
        }
    }

    async fn exists(&self, statement: &Statement) -> Result<bool, StoreError> {
        let Statement::Exists { table, id, .. } = statement else {
            return Err(StoreError::new("existence probe expects an EXISTS statement"));
        };

        let tables = self.tables.lock().await;
        Ok(tables
            .get(table)
            .map(|t| t.rows.contains_key(id))
            .unwrap_or(false))
    }

    async fn select(&self, statement: &Statement) -> Result<TableView, StoreError> {
        let Statement::Select { table, key_column, columns } = statement else {
            return Err(StoreError::new("listing expects a SELECT statement"));
        };

        let tables = self.tables.lock().await;
        let mut view = TableView {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        };

        if let Some(table) = tables.get(table) {
            for (id, row) in &table.rows {
                let cells = columns
                    .iter()
                    .map(|column| {
                        if column == key_column {
                            id.to_string()
                        } else {
                            row.get(column).map(|v| v.to_string()).unwrap_or_default()
                        }
                    })
                    .collect();
                view.rows.push(cells);
            }
        }

        Ok(view)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
