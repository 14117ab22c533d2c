use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::roles;
use crate::identity::normalize;

pub struct RoleRepository {
    conn: DatabaseConnection,
}

impl RoleRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<roles::Model>> {
        roles::Entity::find()
            .filter(roles::Column::NormalizedName.eq(normalize(name)))
            .one(&self.conn)
            .await
            .context("Failed to query role by name")
    }

    pub async fn list(&self) -> Result<Vec<roles::Model>> {
        roles::Entity::find()
            .order_by_asc(roles::Column::NormalizedName)
            .all(&self.conn)
            .await
            .context("Failed to list roles")
    }
}
