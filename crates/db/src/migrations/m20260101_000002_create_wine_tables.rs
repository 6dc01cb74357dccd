//! Create wine aggregate tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create wine table
        manager
            .create_table(
                Table::create()
                    .table(Wine::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Wine::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Wine::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Wine::Winery).string_len(256))
                    .col(ColumnDef::new(Wine::WineType).string_len(32))
                    .col(ColumnDef::new(Wine::DoId).integer())
                    .col(ColumnDef::new(Wine::Country).string_len(32))
                    .col(ColumnDef::new(Wine::AgingType).string_len(64))
                    .col(
                        ColumnDef::new(Wine::VintageYear)
                            .integer()
                            .check(Expr::col(Wine::VintageYear).between(1800, 2200)),
                    )
                    .col(
                        ColumnDef::new(Wine::AlcoholPercentage)
                            .double()
                            .check(Expr::col(Wine::AlcoholPercentage).between(0.0, 100.0)),
                    )
                    .col(
                        ColumnDef::new(Wine::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Wine::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wine_do")
                            .from(Wine::Table, Wine::DoId)
                            .to(Do::Table, Do::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Indexes for the listing filters
        for (name, column) in [
            ("idx_wine_do_id", Wine::DoId),
            ("idx_wine_country", Wine::Country),
            ("idx_wine_wine_type", Wine::WineType),
            ("idx_wine_created_at", Wine::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Wine::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        // Create wine_grape table
        manager
            .create_table(
                Table::create()
                    .table(WineGrape::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WineGrape::WineId).integer().not_null())
                    .col(ColumnDef::new(WineGrape::GrapeId).integer().not_null())
                    .col(
                        ColumnDef::new(WineGrape::Percentage)
                            .double()
                            .check(Expr::col(WineGrape::Percentage).between(0.0, 100.0)),
                    )
                    .primary_key(
                        Index::create()
                            .col(WineGrape::WineId)
                            .col(WineGrape::GrapeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wine_grape_wine")
                            .from(WineGrape::Table, WineGrape::WineId)
                            .to(Wine::Table, Wine::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wine_grape_grape")
                            .from(WineGrape::Table, WineGrape::GrapeId)
                            .to(Grape::Table, Grape::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: grape_id (EXISTS filter in listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_wine_grape_grape_id")
                    .table(WineGrape::Table)
                    .col(WineGrape::GrapeId)
                    .to_owned(),
            )
            .await?;

        // Create place table
        manager
            .create_table(
                Table::create()
                    .table(Place::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Place::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Place::PlaceType).string_len(16).not_null())
                    .col(ColumnDef::new(Place::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Place::Address).string_len(512))
                    .col(ColumnDef::new(Place::City).string_len(128))
                    .col(ColumnDef::new(Place::Country).string_len(32).not_null())
                    .to_owned(),
            )
            .await?;

        // Create wine_purchase table
        manager
            .create_table(
                Table::create()
                    .table(WinePurchase::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WinePurchase::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WinePurchase::WineId).integer().not_null())
                    .col(ColumnDef::new(WinePurchase::PlaceId).integer().not_null())
                    .col(
                        ColumnDef::new(WinePurchase::PricePaid)
                            .double()
                            .not_null()
                            .check(Expr::col(WinePurchase::PricePaid).gte(0.0)),
                    )
                    .col(
                        ColumnDef::new(WinePurchase::PurchasedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WinePurchase::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wine_purchase_wine")
                            .from(WinePurchase::Table, WinePurchase::WineId)
                            .to(Wine::Table, Wine::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wine_purchase_place")
                            .from(WinePurchase::Table, WinePurchase::PlaceId)
                            .to(Place::Table, Place::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_wine_purchase_wine_id")
                    .table(WinePurchase::Table)
                    .col(WinePurchase::WineId)
                    .to_owned(),
            )
            .await?;

        // Create wine_award table
        manager
            .create_table(
                Table::create()
                    .table(WineAward::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WineAward::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WineAward::WineId).integer().not_null())
                    .col(ColumnDef::new(WineAward::Name).string_len(32).not_null())
                    .col(
                        ColumnDef::new(WineAward::Score)
                            .integer()
                            .check(Expr::col(WineAward::Score).between(0, 100)),
                    )
                    .col(
                        ColumnDef::new(WineAward::Year)
                            .integer()
                            .check(Expr::col(WineAward::Year).between(1800, 2200)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wine_award_wine")
                            .from(WineAward::Table, WineAward::WineId)
                            .to(Wine::Table, Wine::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_wine_award_wine_id")
                    .table(WineAward::Table)
                    .col(WineAward::WineId)
                    .to_owned(),
            )
            .await?;

        // Create wine_photo table
        manager
            .create_table(
                Table::create()
                    .table(WinePhoto::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WinePhoto::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WinePhoto::WineId).integer().not_null())
                    .col(ColumnDef::new(WinePhoto::Url).string_len(512).not_null())
                    .col(ColumnDef::new(WinePhoto::Type).string_len(16))
                    .col(ColumnDef::new(WinePhoto::Hash).char_len(16).not_null())
                    .col(ColumnDef::new(WinePhoto::Size).big_integer().not_null())
                    .col(ColumnDef::new(WinePhoto::Extension).string_len(8).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wine_photo_wine")
                            .from(WinePhoto::Table, WinePhoto::WineId)
                            .to(Wine::Table, Wine::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Partial unique index: one photo per (wine_id, type) for typed photos
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE UNIQUE INDEX IF NOT EXISTS idx_wine_photo_wine_type
                ON wine_photo (wine_id, "type")
                WHERE "type" IS NOT NULL;
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WinePhoto::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(WineAward::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(WinePurchase::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Place::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(WineGrape::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Wine::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Do {
    Table,
    Id,
}

#[derive(Iden)]
enum Grape {
    Table,
    Id,
}

#[derive(Iden)]
enum Wine {
    Table,
    Id,
    Name,
    Winery,
    WineType,
    DoId,
    Country,
    AgingType,
    VintageYear,
    AlcoholPercentage,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum WineGrape {
    Table,
    WineId,
    GrapeId,
    Percentage,
}

#[derive(Iden)]
enum Place {
    Table,
    Id,
    PlaceType,
    Name,
    Address,
    City,
    Country,
}

#[derive(Iden)]
enum WinePurchase {
    Table,
    Id,
    WineId,
    PlaceId,
    PricePaid,
    PurchasedAt,
    CreatedAt,
}

#[derive(Iden)]
enum WineAward {
    Table,
    Id,
    WineId,
    Name,
    Score,
    Year,
}

#[derive(Iden)]
enum WinePhoto {
    Table,
    Id,
    WineId,
    Url,
    Type,
    Hash,
    Size,
    Extension,
}
