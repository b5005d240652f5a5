use async_trait::async_trait;
use flip_features_sdk::FeatureFlag;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder,
};

use crate::domain::repo::FeatureRepository;

use super::entity::{self, Entity as FeatureEntity};

pub struct SeaOrmFeatureRepository {
    db: DatabaseConnection,
}

impl SeaOrmFeatureRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FeatureRepository for SeaOrmFeatureRepository {
    async fn find(&self, key: &str) -> anyhow::Result<Option<FeatureFlag>> {
        let model = FeatureEntity::find()
            .filter(entity::Column::Key.eq(key))
            .one(&self.db)
            .await?;

        Ok(model.map(Into::into))
    }

    async fn list(&self) -> anyhow::Result<Vec<FeatureFlag>> {
        let models = FeatureEntity::find()
            .order_by_asc(entity::Column::Key)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, key: &str, enabled: Option<bool>) -> anyhow::Result<FeatureFlag> {
        // Timestamps are filled in by the entity's save hook.
        let active_model = entity::ActiveModel {
            key: ActiveValue::Set(key.to_owned()),
            enabled: enabled.map_or(ActiveValue::NotSet, ActiveValue::Set),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Ok(model.into())
    }

    async fn update_enabled(
        &self,
        key: &str,
        enabled: bool,
    ) -> anyhow::Result<Option<FeatureFlag>> {
        let Some(existing) = FeatureEntity::find()
            .filter(entity::Column::Key.eq(key))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model = existing.into_active_model();
        active_model.enabled = ActiveValue::Set(enabled);
        let model = active_model.update(&self.db).await?;

        Ok(Some(model.into()))
    }
}
