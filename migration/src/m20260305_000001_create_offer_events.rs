use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 推广方案事件表 ====================
        // 仅追加写入，启动时按 (experiment, variant, kind) 聚合
        manager
            .create_table(
                Table::create()
                    .table(OfferEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OfferEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OfferEvents::Experiment).string().not_null())
                    .col(ColumnDef::new(OfferEvents::Variant).string().not_null())
                    .col(ColumnDef::new(OfferEvents::Kind).string().not_null())
                    .col(ColumnDef::new(OfferEvents::UserId).big_integer().null())
                    .col(
                        ColumnDef::new(OfferEvents::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_offer_events_experiment")
                    .table(OfferEvents::Table)
                    .col(OfferEvents::Experiment)
                    .col(OfferEvents::Variant)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OfferEvents::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum OfferEvents {
    #[sea_orm(iden = "offer_events")]
    Table,
    Id,
    Experiment,
    Variant,
    Kind,
    UserId,
    CreatedAt,
}
