use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// No `IF NOT EXISTS`: an existing table must fail the migration.
/// `key` is deliberately left without a unique index.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FlipFeatures::Table)
                    .col(ColumnDef::new(FlipFeatures::Key).string().not_null())
                    .col(
                        ColumnDef::new(FlipFeatures::Enabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(FlipFeatures::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(FlipFeatures::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FlipFeatures::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FlipFeatures {
    Table,
    Key,
    Enabled,
    CreatedAt,
    UpdatedAt,
}
