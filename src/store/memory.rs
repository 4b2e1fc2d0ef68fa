//! In-process entity store

use super::{EntityStore, Fields, Filter, Record, RecordId, StoreError, StoreResult};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

type Table = BTreeMap<RecordId, Fields>;

/// Tables held in memory; record ids mimic Airtable's `rec` prefix
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in a table
    pub fn len(&self, table: &str) -> usize {
        self.tables
            .read()
            .map(|t| t.get(table).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }

    fn new_id() -> RecordId {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        RecordId(format!("rec{}", &uuid[..14]))
    }

    fn not_found(table: &str, id: &RecordId) -> StoreError {
        StoreError::NotFound {
            table: table.to_string(),
            id: id.0.clone(),
        }
    }

    fn poisoned() -> StoreError {
        StoreError::Transport("memory store lock poisoned".to_string())
    }
}

impl EntityStore for MemoryStore {
    fn get(&self, table: &str, id: &RecordId) -> StoreResult<Record> {
        let tables = self.tables.read().map_err(|_| Self::poisoned())?;
        tables
            .get(table)
            .and_then(|t| t.get(id))
            .map(|fields| Record {
                id: id.clone(),
                fields: fields.clone(),
            })
            .ok_or_else(|| Self::not_found(table, id))
    }

    fn list(&self, table: &str, filter: &Filter) -> StoreResult<Vec<Record>> {
        let tables = self.tables.read().map_err(|_| Self::poisoned())?;
        let Some(rows) = tables.get(table) else {
            return Ok(Vec::new());
        };
        Ok(rows
            .iter()
            .filter(|(_, fields)| filter.matches(fields))
            .map(|(id, fields)| Record {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect())
    }

    fn create(&self, table: &str, fields: Fields) -> StoreResult<RecordId> {
        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        let id = Self::new_id();
        tables
            .entry(table.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    fn update(&self, table: &str, id: &RecordId, fields: Fields) -> StoreResult<()> {
        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        let existing = tables
            .get_mut(table)
            .and_then(|t| t.get_mut(id))
            .ok_or_else(|| Self::not_found(table, id))?;
        existing.extend(fields);
        Ok(())
    }

    fn delete(&self, table: &str, id: &RecordId) -> StoreResult<()> {
        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        tables
            .get_mut(table)
            .and_then(|t| t.remove(id))
            .map(|_| ())
            .ok_or_else(|| Self::not_found(table, id))
    }
}
