use sea_orm::{entity::prelude::*, sea_query::{OnConflict, Query}, Set};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors;

/// A named JSON document. `content` is kept exactly as submitted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    Ok(())
}

/// Syntax-only check: any JSON value is accepted, nothing is retained.
pub fn validate_content(content: &str) -> Result<(), errors::ModelError> {
    serde_json::from_str::<serde::de::IgnoredAny>(content)
        .map(|_| ())
        .map_err(|e| errors::ModelError::Validation(format!("content must be valid JSON: {e}")))
}

fn db_err(e: DbErr) -> errors::ModelError {
    errors::ModelError::Db(e.to_string())
}

/// All document names in storage order. Rows whose name cannot be decoded
/// are logged and left out.
pub async fn list_names<C: ConnectionTrait>(db: &C) -> Result<Vec<String>, errors::ModelError> {
    let stmt = Query::select().column(Column::Name).from(Entity).to_owned();
    let rows = db
        .query_all(db.get_database_backend().build(&stmt))
        .await
        .map_err(db_err)?;

    let mut names = Vec::with_capacity(rows.len());
    for row in rows {
        match row.try_get::<String>("", "name") {
            Ok(name) => names.push(name),
            Err(e) => warn!(error = %e, "skipping file row with undecodable name"),
        }
    }
    Ok(names)
}

pub async fn find<C: ConnectionTrait>(db: &C, name: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(name.to_owned()).one(db).await.map_err(db_err)
}

/// Insert or replace in one statement; the database makes it atomic against
/// concurrent writers of the same name. Returns rows affected.
pub async fn upsert<C: ConnectionTrait>(db: &C, name: &str, content: &str) -> Result<u64, errors::ModelError> {
    let am = ActiveModel {
        name: Set(name.to_owned()),
        content: Set(content.to_owned()),
    };
    Entity::insert(am)
        .on_conflict(
            OnConflict::column(Column::Name)
                .update_column(Column::Content)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await
        .map_err(db_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_and_migrate;
    use configs::DatabaseConfig;

    #[test]
    fn accepts_every_json_value_kind() {
        for ok in ["{}", "[]", r#"{"a":[1,2,{"b":null}]}"#, "\"text\"", "42", "-1.5e3", "true", "false", "null", "  {\"k\": 1}\n"] {
            assert!(validate_content(ok).is_ok(), "should accept {ok:?}");
        }
    }

    #[test]
    fn rejects_malformed_json() {
        for bad in ["", "{not json", "{\"a\":}", "[1,2", "nul", "{} {}", "'single'"] {
            match validate_content(bad) {
                Err(errors::ModelError::Validation(msg)) => assert!(msg.starts_with("content must be valid JSON")),
                other => panic!("expected validation error for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_blank_names() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("config.json").is_ok());
    }

    #[tokio::test]
    async fn upsert_inserts_then_replaces() -> anyhow::Result<()> {
        let db = connect_and_migrate(&DatabaseConfig::in_memory()).await?;

        upsert(&db, "doc", r#"{"v":1}"#).await?;
        upsert(&db, "doc", r#"{"v":2}"#).await?;

        let found = find(&db, "doc").await?.expect("row exists");
        assert_eq!(found.content, r#"{"v":2}"#);
        assert_eq!(list_names(&db).await?, vec!["doc".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn content_is_stored_verbatim() -> anyhow::Result<()> {
        let db = connect_and_migrate(&DatabaseConfig::in_memory()).await?;
        let content = "{\n  \"b\" : 2,\n  \"a\":1 }";
        upsert(&db, "spaced", content).await?;
        assert_eq!(find(&db, "spaced").await?.unwrap().content, content);
        Ok(())
    }

    #[tokio::test]
    async fn find_missing_is_none() -> anyhow::Result<()> {
        let db = connect_and_migrate(&DatabaseConfig::in_memory()).await?;
        assert!(find(&db, "missing").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn list_skips_undecodable_rows() -> anyhow::Result<()> {
        let db = connect_and_migrate(&DatabaseConfig::in_memory()).await?;
        upsert(&db, "a", "1").await?;
        upsert(&db, "b", "2").await?;
        // invalid UTF-8 stored as TEXT
        db.execute_unprepared("INSERT INTO files (name, content) VALUES (CAST(X'C328' AS TEXT), '3')")
            .await?;

        let mut names = list_names(&db).await?;
        names.sort();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
        Ok(())
    }
}
