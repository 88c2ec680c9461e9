//! Initial schema: users, profiles, categories, transactions and budgets.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub(super) enum Users {
    Table,
    Id,
    Email,
    FullName,
    PasswordHash,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
    UserId,
    Currency,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    UserId,
    Name,
    Color,
    Type,
    CreatedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    UserId,
    CategoryId,
    Category,
    Description,
    AmountMinor,
    Date,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Budgets {
    Table,
    Id,
    CategoryId,
    AmountMinor,
    Month,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string_len(254).not_null())
                    .col(
                        ColumnDef::new(Users::FullName)
                            .string_len(150)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-email-unique")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(Profiles::Currency)
                            .string_len(3)
                            .not_null()
                            .default("USD"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-profiles-user_id")
                            .from(Profiles::Table, Profiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-profiles-user_id-unique")
                    .table(Profiles::Table)
                    .col(Profiles::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::UserId).integer().not_null())
                    .col(ColumnDef::new(Categories::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Categories::Color)
                            .string_len(7)
                            .not_null()
                            .default("#000000"),
                    )
                    .col(
                        ColumnDef::new(Categories::Type)
                            .string_len(10)
                            .not_null()
                            .default("expense"),
                    )
                    .col(
                        ColumnDef::new(Categories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categories-user_id")
                            .from(Categories::Table, Categories::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-user_id-name-unique")
                    .table(Categories::Table)
                    .col(Categories::UserId)
                    .col(Categories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::UserId).integer().not_null())
                    .col(ColumnDef::new(Transactions::CategoryId).integer().null())
                    .col(
                        ColumnDef::new(Transactions::Category)
                            .string_len(100)
                            .not_null()
                            .default("N/A"),
                    )
                    .col(ColumnDef::new(Transactions::Description).string_len(255).null())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Date).date().not_null())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-user_id")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-category_id")
                            .from(Transactions::Table, Transactions::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-user_id-date")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Budgets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Budgets::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Budgets::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Budgets::Month).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budgets-category_id")
                            .from(Budgets::Table, Budgets::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budgets-category_id-month-unique")
                    .table(Budgets::Table)
                    .col(Budgets::CategoryId)
                    .col(Budgets::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
