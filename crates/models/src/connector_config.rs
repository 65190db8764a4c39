use chrono::Utc;
use sea_orm::{entity::prelude::*, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors;

/// One submitted connector config, kept as history.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "connectors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub config: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn record<C: ConnectionTrait>(db: &C, name: &str, config: &str) -> Result<Model, errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("connector name required".into()));
    }
    let am = ActiveModel {
        name: Set(name.to_owned()),
        config: Set(config.to_owned()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// History for one connector, newest first.
pub async fn history<C: ConnectionTrait>(db: &C, name: &str) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Name.eq(name))
        .order_by_desc(Column::Id)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
