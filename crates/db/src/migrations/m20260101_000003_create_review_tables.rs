//! Create review and review_bullets tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let axis = |column: Review| {
            ColumnDef::new(column.clone())
                .small_integer()
                .not_null()
                .check(Expr::col(column).between(0, 5))
                .to_owned()
        };

        // Create review table
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Review::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Review::UserId).integer().not_null())
                    .col(ColumnDef::new(Review::WineId).integer().not_null())
                    .col(
                        ColumnDef::new(Review::Score)
                            .integer()
                            .check(Expr::col(Review::Score).between(0, 100)),
                    )
                    .col(axis(Review::IntensityAroma))
                    .col(axis(Review::Sweetness))
                    .col(axis(Review::Acidity))
                    .col(
                        ColumnDef::new(Review::Tannin)
                            .small_integer()
                            .check(Expr::col(Review::Tannin).between(0, 5)),
                    )
                    .col(axis(Review::Body))
                    .col(axis(Review::Persistence))
                    .col(
                        ColumnDef::new(Review::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_user")
                            .from(Review::Table, Review::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_wine")
                            .from(Review::Table, Review::WineId)
                            .to(Wine::Table, Wine::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one review per (user_id, wine_id)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_user_wine_unique")
                    .table(Review::Table)
                    .col(Review::UserId)
                    .col(Review::WineId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: wine_id (score aggregate and detail view)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_wine_id")
                    .table(Review::Table)
                    .col(Review::WineId)
                    .to_owned(),
            )
            .await?;

        // Create review_bullets table
        manager
            .create_table(
                Table::create()
                    .table(ReviewBullets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ReviewBullets::ReviewId).integer().not_null())
                    .col(
                        ColumnDef::new(ReviewBullets::Bullet)
                            .string_len(32)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ReviewBullets::ReviewId)
                            .col(ReviewBullets::Bullet),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_bullets_review")
                            .from(ReviewBullets::Table, ReviewBullets::ReviewId)
                            .to(Review::Table, Review::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReviewBullets::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Review::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Wine {
    Table,
    Id,
}

#[derive(Iden, Clone)]
enum Review {
    Table,
    Id,
    UserId,
    WineId,
    Score,
    IntensityAroma,
    Sweetness,
    Acidity,
    Tannin,
    Body,
    Persistence,
    CreatedAt,
}

#[derive(Iden)]
enum ReviewBullets {
    Table,
    ReviewId,
    Bullet,
}
