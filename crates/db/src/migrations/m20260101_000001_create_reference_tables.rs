//! Create do, grape and user tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create do table
        manager
            .create_table(
                Table::create()
                    .table(Do::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Do::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Do::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Do::Region).string_len(128).not_null())
                    .col(ColumnDef::new(Do::Country).string_len(32).not_null())
                    .col(ColumnDef::new(Do::CountryCode).char_len(2).not_null())
                    .to_owned(),
            )
            .await?;

        // Unique index: (country, name)
        manager
            .create_index(
                Index::create()
                    .name("idx_do_country_name")
                    .table(Do::Table)
                    .col(Do::Country)
                    .col(Do::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create grape table
        manager
            .create_table(
                Table::create()
                    .table(Grape::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Grape::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Grape::Name)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Grape::Color).string_len(16).not_null())
                    .to_owned(),
            )
            .await?;

        // Create user table
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(User::Username)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(User::DisplayName).string_len(128))
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Grape::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Do::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Do {
    Table,
    Id,
    Name,
    Region,
    Country,
    CountryCode,
}

#[derive(Iden)]
enum Grape {
    Table,
    Id,
    Name,
    Color,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
    Username,
    DisplayName,
    CreatedAt,
}
