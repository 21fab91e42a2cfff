//! Initial migration to create the schools table.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Schools::Table)
                    .if_not_exists()
                    .col(pk_auto(Schools::Id))
                    // Free-form fields have no upper length bound in validation.
                    .col(text(Schools::Name).not_null())
                    .col(text(Schools::Email).not_null())
                    .col(text(Schools::Phone).not_null())
                    .col(text(Schools::Address).not_null())
                    .col(text(Schools::City).not_null())
                    .col(text(Schools::State).not_null())
                    .col(string_len(Schools::Pincode, 6).not_null())
                    .col(text_null(Schools::ImagePath))
                    .col(
                        timestamp_with_time_zone(Schools::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing orders by creation time, newest first.
        manager
            .create_index(
                Index::create()
                    .name("idx_schools_created_at")
                    .table(Schools::Table)
                    .col(Schools::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Schools::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Schools {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Address,
    City,
    State,
    Pincode,
    ImagePath,
    CreatedAt,
}
