//! Schema model assembled before it touches a database.
//!
//! Entities are registered first, then seed rows for them. [`ModelBuilder::build`]
//! consumes the builder, so a finished [`Model`] can no longer gain seed data.
//! Applying a model creates missing tables and upserts every seed row by its key.

use std::collections::BTreeSet;

use sea_orm::{DbBackend, EntityTrait, Schema};
use sea_orm_migration::prelude::{
    DbErr, IndexCreateStatement, InsertStatement, SchemaManager, TableCreateStatement,
};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Seed data registered for unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Duplicate seed key '{key}' for entity {table}")]
    DuplicateSeedKey { table: String, key: String },
}

/// A row that can be registered as seed data.
pub trait SeedRecord {
    /// Table the row belongs to.
    fn table(&self) -> String;

    /// Identity key of the row. Unique per table within a model.
    fn key(&self) -> String;

    /// Insert statement that updates the existing row on key conflict.
    fn upsert(&self) -> InsertStatement;
}

#[derive(Debug, Clone)]
pub struct SeedRow {
    pub table: String,
    pub key: String,
    pub statement: InsertStatement,
}

pub struct ModelBuilder {
    backend: DbBackend,
    entities: BTreeSet<String>,
    tables: Vec<TableCreateStatement>,
    indexes: Vec<IndexCreateStatement>,
    seeds: Vec<SeedRow>,
}

impl ModelBuilder {
    #[must_use]
    pub fn new(backend: DbBackend) -> Self {
        Self {
            backend,
            entities: BTreeSet::new(),
            tables: Vec::new(),
            indexes: Vec::new(),
            seeds: Vec::new(),
        }
    }

    /// Register an entity's table and indexes. Registering the same entity twice is a no-op.
    #[must_use]
    pub fn entity<E>(mut self, entity: E) -> Self
    where
        E: EntityTrait + Copy,
    {
        let table = entity.table_name().to_owned();
        if !self.entities.insert(table.clone()) {
            debug!(table = %table, "Entity already registered");
            return self;
        }

        let schema = Schema::new(self.backend);
        self.tables
            .push(schema.create_table_from_entity(entity).if_not_exists().to_owned());

        for mut index in schema.create_index_from_entity(entity) {
            self.indexes.push(index.if_not_exists().to_owned());
        }

        debug!(table = %table, "Registered entity");
        self
    }

    /// Register `record` as seed data for its entity.
    pub fn has_data<R>(mut self, record: &R) -> Result<Self, ModelError>
    where
        R: SeedRecord + ?Sized,
    {
        let table = record.table();
        if !self.entities.contains(&table) {
            return Err(ModelError::UnknownEntity(table));
        }

        let key = record.key();
        if self
            .seeds
            .iter()
            .any(|row| row.table == table && row.key == key)
        {
            return Err(ModelError::DuplicateSeedKey { table, key });
        }

        debug!(table = %table, key = %key, "Registered seed row");
        self.seeds.push(SeedRow {
            table,
            key,
            statement: record.upsert(),
        });

        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> Model {
        Model {
            backend: self.backend,
            tables: self.tables,
            indexes: self.indexes,
            seeds: self.seeds,
        }
    }
}

/// Frozen schema plus seed data.
#[derive(Debug, Clone)]
pub struct Model {
    backend: DbBackend,
    tables: Vec<TableCreateStatement>,
    indexes: Vec<IndexCreateStatement>,
    seeds: Vec<SeedRow>,
}

impl Model {
    #[must_use]
    pub const fn backend(&self) -> DbBackend {
        self.backend
    }

    #[must_use]
    pub fn tables(&self) -> &[TableCreateStatement] {
        &self.tables
    }

    #[must_use]
    pub fn seed_rows(&self) -> &[SeedRow] {
        &self.seeds
    }

    #[must_use]
    pub fn seed_count(&self, table: &str) -> usize {
        self.seeds.iter().filter(|row| row.table == table).count()
    }

    /// Create missing tables and indexes, then upsert the seed rows in registration order.
    pub async fn apply(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        for table in &self.tables {
            manager.create_table(table.clone()).await?;
        }

        for index in &self.indexes {
            manager.create_index(index.clone()).await?;
        }

        for row in &self.seeds {
            manager.exec_stmt(row.statement.clone()).await?;
        }

        info!(
            "Model applied ({} tables, {} seed rows)",
            self.tables.len(),
            self.seeds.len()
        );

        Ok(())
    }
}
