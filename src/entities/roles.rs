use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{InsertStatement, OnConflict, Query};
use serde::Serialize;

use crate::model::SeedRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    #[sea_orm(unique)]
    pub normalized_name: String,

    pub concurrency_stamp: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl SeedRecord for Model {
    fn table(&self) -> String {
        Entity.table_name().to_owned()
    }

    fn key(&self) -> String {
        self.id.clone()
    }

    fn upsert(&self) -> InsertStatement {
        Query::insert()
            .into_table(Entity)
            .columns([
                Column::Id,
                Column::Name,
                Column::NormalizedName,
                Column::ConcurrencyStamp,
            ])
            .values_panic([
                self.id.clone().into(),
                self.name.clone().into(),
                self.normalized_name.clone().into(),
                self.concurrency_stamp.clone().into(),
            ])
            .on_conflict(
                OnConflict::column(Column::Id)
                    .update_columns([Column::Name, Column::NormalizedName, Column::ConcurrencyStamp])
                    .to_owned(),
            )
            .to_owned()
    }
}
