use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{InsertStatement, OnConflict, Query};
use serde::Serialize;

use crate::model::SeedRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// UUID in text form. Seeded rows use a name-based UUID so re-seeding hits the same key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub user_name: String,

    /// Uppercase form of `user_name`, used for case-insensitive lookups.
    #[sea_orm(unique)]
    pub normalized_user_name: String,

    pub email: String,

    /// Uppercase form of `email`.
    #[sea_orm(indexed)]
    pub normalized_email: String,

    pub email_confirmed: bool,

    /// Argon2id hash in PHC string format
    #[serde(skip_serializing)]
    pub password_hash: String,

    #[serde(skip_serializing)]
    pub security_stamp: String,

    pub concurrency_stamp: String,

    pub phone_number: Option<String>,

    pub phone_number_confirmed: bool,

    pub two_factor_enabled: bool,

    pub lockout_enabled: bool,

    pub access_failed_count: i32,
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
                Column::UserName,
                Column::NormalizedUserName,
                Column::Email,
                Column::NormalizedEmail,
                Column::EmailConfirmed,
                Column::PasswordHash,
                Column::SecurityStamp,
                Column::ConcurrencyStamp,
                Column::PhoneNumber,
                Column::PhoneNumberConfirmed,
                Column::TwoFactorEnabled,
                Column::LockoutEnabled,
                Column::AccessFailedCount,
            ])
            .values_panic([
                self.id.clone().into(),
                self.user_name.clone().into(),
                self.normalized_user_name.clone().into(),
                self.email.clone().into(),
                self.normalized_email.clone().into(),
                self.email_confirmed.into(),
                self.password_hash.clone().into(),
                self.security_stamp.clone().into(),
                self.concurrency_stamp.clone().into(),
                self.phone_number.clone().into(),
                self.phone_number_confirmed.into(),
                self.two_factor_enabled.into(),
                self.lockout_enabled.into(),
                self.access_failed_count.into(),
            ])
            .on_conflict(
                // Credentials, stamps and lockout state belong to the account once it exists.
                OnConflict::column(Column::Id)
                    .update_columns([
                        Column::UserName,
                        Column::NormalizedUserName,
                        Column::Email,
                        Column::NormalizedEmail,
                        Column::EmailConfirmed,
                        Column::PhoneNumber,
                        Column::PhoneNumberConfirmed,
                        Column::TwoFactorEnabled,
                    ])
                    .to_owned(),
            )
            .to_owned()
    }
}
