//! Create `connectors` table.
//! Append-only history of connector configs submitted through the editor.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Connectors::Table)
                    .if_not_exists()
                    .col(pk_auto(Connectors::Id))
                    .col(text(Connectors::Name))
                    .col(text(Connectors::Config))
                    .col(timestamp_with_time_zone(Connectors::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // History is read per connector, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_connectors_name")
                    .table(Connectors::Table)
                    .col(Connectors::Name)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Connectors::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Connectors {
    Table,
    Id,
    Name,
    Config,
    CreatedAt,
}
