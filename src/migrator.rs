use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_clients_table::Migration),
            Box::new(m20240101_000002_create_categories_table::Migration),
            Box::new(m20240101_000003_create_products_table::Migration),
            Box::new(m20240101_000004_create_equipment_table::Migration),
            Box::new(m20240101_000005_create_quotes_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_clients_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_clients_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Clients::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Clients::Name).string_len(200).not_null())
                        .col(ColumnDef::new(Clients::Contact).string_len(100).not_null())
                        .col(ColumnDef::new(Clients::Email).string_len(100).not_null())
                        .col(ColumnDef::new(Clients::Phone).string_len(20).not_null())
                        .col(ColumnDef::new(Clients::Street).string_len(255))
                        .col(ColumnDef::new(Clients::City).string_len(100))
                        .col(ColumnDef::new(Clients::State).string_len(100))
                        .col(ColumnDef::new(Clients::PostalCode).string_len(10))
                        .col(ColumnDef::new(Clients::Country).string_len(100).not_null())
                        .col(ColumnDef::new(Clients::FullAddress).text())
                        .col(ColumnDef::new(Clients::Rfc).string_len(13))
                        .col(ColumnDef::new(Clients::ClientType).string_len(32).not_null())
                        .col(ColumnDef::new(Clients::Status).string_len(20).not_null())
                        .col(ColumnDef::new(Clients::Notes).text())
                        .col(ColumnDef::new(Clients::LastQuoteDate).timestamp_with_time_zone())
                        .col(
                            ColumnDef::new(Clients::TotalQuotes)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Clients::TotalAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Clients::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Clients::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_clients_email")
                        .table(Clients::Table)
                        .col(Clients::Email)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_clients_status")
                        .table(Clients::Table)
                        .col(Clients::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_clients_client_type")
                        .table(Clients::Table)
                        .col(Clients::ClientType)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await
        }
    }

    /// Client schema identifiers
    #[derive(Iden)]
    pub(super) enum Clients {
        Table,
        Id,
        Name,
        Contact,
        Email,
        Phone,
        Street,
        City,
        State,
        PostalCode,
        Country,
        FullAddress,
        Rfc,
        ClientType,
        Status,
        Notes,
        LastQuoteDate,
        TotalQuotes,
        TotalAmount,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_categories_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_categories_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Categories::Name).string_len(100).not_null())
                        .col(
                            ColumnDef::new(Categories::Description)
                                .string_len(300)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Categories::Slug).string_len(120).not_null())
                        .col(ColumnDef::new(Categories::ParentCategoryId).uuid())
                        .col(
                            ColumnDef::new(Categories::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Categories::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Categories::ProductCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Categories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Categories::UpdatedAt).timestamp_with_time_zone())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_categories_parent")
                                .from(Categories::Table, Categories::ParentCategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_categories_name")
                        .table(Categories::Table)
                        .col(Categories::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_categories_slug")
                        .table(Categories::Table)
                        .col(Categories::Slug)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }

    /// Category schema identifiers
    #[derive(Iden)]
    enum Categories {
        Table,
        Id,
        Name,
        Description,
        Slug,
        ParentCategoryId,
        IsActive,
        SortOrder,
        ProductCount,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_products_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Products::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Products::Code).string_len(50).not_null())
                        .col(ColumnDef::new(Products::Item).string_len(200))
                        .col(ColumnDef::new(Products::ServiceLine).string_len(100))
                        .col(ColumnDef::new(Products::Specialty).string_len(100))
                        .col(ColumnDef::new(Products::Classification).string_len(100))
                        .col(ColumnDef::new(Products::Description).text())
                        .col(ColumnDef::new(Products::UsageNotes).string_len(200))
                        .col(ColumnDef::new(Products::Includes).text())
                        .col(
                            ColumnDef::new(Products::PackageQuantity)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(Products::Currency).string_len(3).not_null())
                        .col(ColumnDef::new(Products::Cost).decimal_len(10, 2))
                        .col(ColumnDef::new(Products::UnitCost).decimal_len(10, 2))
                        .col(ColumnDef::new(Products::ExpiryDate).date())
                        .col(ColumnDef::new(Products::WarehouseLocation).string_len(100))
                        .col(ColumnDef::new(Products::StorageConditions).string_len(100))
                        .col(ColumnDef::new(Products::Supplier).string_len(200))
                        .col(
                            ColumnDef::new(Products::TaxPercent)
                                .decimal_len(5, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::FactoryPrice).decimal_len(10, 2))
                        .col(
                            ColumnDef::new(Products::LandedFactor)
                                .decimal_len(10, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::MarginFactor)
                                .decimal_len(10, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::CurrencyFactor)
                                .decimal_len(10, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::SalesCommissionPercent)
                                .decimal_len(5, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::PackagePrice).decimal_len(10, 2))
                        .col(ColumnDef::new(Products::UnitPrice).decimal_len(10, 2))
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::UpdatedAt).timestamp_with_time_zone())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_products_code")
                        .table(Products::Table)
                        .col(Products::Code)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_service_line")
                        .table(Products::Table)
                        .col(Products::ServiceLine)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    /// Product schema identifiers
    #[derive(Iden)]
    enum Products {
        Table,
        Id,
        Code,
        Item,
        ServiceLine,
        Specialty,
        Classification,
        Description,
        UsageNotes,
        Includes,
        PackageQuantity,
        Currency,
        Cost,
        UnitCost,
        ExpiryDate,
        WarehouseLocation,
        StorageConditions,
        Supplier,
        TaxPercent,
        FactoryPrice,
        LandedFactor,
        MarginFactor,
        CurrencyFactor,
        SalesCommissionPercent,
        PackagePrice,
        UnitPrice,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_equipment_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_clients_table::Clients;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_equipment_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Equipment::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Equipment::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Equipment::ClientId).uuid().not_null())
                        .col(ColumnDef::new(Equipment::Name).string_len(200).not_null())
                        .col(ColumnDef::new(Equipment::Model).string_len(100).not_null())
                        .col(
                            ColumnDef::new(Equipment::SerialNumber)
                                .string_len(100)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Equipment::Category).string_len(32).not_null())
                        .col(ColumnDef::new(Equipment::Brand).string_len(100).not_null())
                        .col(
                            ColumnDef::new(Equipment::Location)
                                .string_len(200)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Equipment::InstallDate).date())
                        .col(ColumnDef::new(Equipment::PurchaseDate).date())
                        .col(ColumnDef::new(Equipment::WarrantyExpiry).date())
                        .col(ColumnDef::new(Equipment::LastMaintenance).date())
                        .col(
                            ColumnDef::new(Equipment::MaintenanceIntervalMonths)
                                .integer()
                                .not_null()
                                .default(12),
                        )
                        .col(ColumnDef::new(Equipment::Status).string_len(20).not_null())
                        .col(ColumnDef::new(Equipment::Specifications).json())
                        .col(ColumnDef::new(Equipment::Notes).text())
                        .col(ColumnDef::new(Equipment::Supplier).string_len(200))
                        .col(ColumnDef::new(Equipment::Cost).decimal_len(12, 2))
                        .col(ColumnDef::new(Equipment::Currency).string_len(3).not_null())
                        .col(
                            ColumnDef::new(Equipment::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Equipment::UpdatedAt).timestamp_with_time_zone())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_equipment_client")
                                .from(Equipment::Table, Equipment::ClientId)
                                .to(Clients::Table, Clients::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_equipment_serial_number")
                        .table(Equipment::Table)
                        .col(Equipment::SerialNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_equipment_client_id")
                        .table(Equipment::Table)
                        .col(Equipment::ClientId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Equipment::Table).to_owned())
                .await
        }
    }

    /// Equipment schema identifiers
    #[derive(Iden)]
    enum Equipment {
        Table,
        Id,
        ClientId,
        Name,
        Model,
        SerialNumber,
        Category,
        Brand,
        Location,
        InstallDate,
        PurchaseDate,
        WarrantyExpiry,
        LastMaintenance,
        MaintenanceIntervalMonths,
        Status,
        Specifications,
        Notes,
        Supplier,
        Cost,
        Currency,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000005_create_quotes_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_clients_table::Clients;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_quotes_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Quotes::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Quotes::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Quotes::Folio).string_len(20).not_null())
                        .col(ColumnDef::new(Quotes::ClientId).uuid())
                        .col(ColumnDef::new(Quotes::ClientName).string_len(200).not_null())
                        .col(
                            ColumnDef::new(Quotes::ClientContact)
                                .string_len(100)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Quotes::ClientEmail)
                                .string_len(100)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Quotes::ClientPhone)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Quotes::ClientAddress).text().not_null())
                        .col(ColumnDef::new(Quotes::ClientPosition).string_len(100))
                        .col(ColumnDef::new(Quotes::LineItems).json().not_null())
                        .col(
                            ColumnDef::new(Quotes::Subtotal)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Quotes::TaxRate).decimal_len(5, 4).not_null())
                        .col(
                            ColumnDef::new(Quotes::TaxAmount)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Quotes::Total).decimal_len(12, 2).not_null())
                        .col(ColumnDef::new(Quotes::Currency).string_len(3).not_null())
                        .col(ColumnDef::new(Quotes::Status).string_len(20).not_null())
                        .col(
                            ColumnDef::new(Quotes::TermsPaymentConditions)
                                .text()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Quotes::TermsDeliveryTime)
                                .string_len(100)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Quotes::TermsWarranty).text().not_null())
                        .col(ColumnDef::new(Quotes::TermsObservations).text().not_null())
                        .col(ColumnDef::new(Quotes::TermsValidUntil).timestamp_with_time_zone())
                        .col(ColumnDef::new(Quotes::Notes).json())
                        .col(ColumnDef::new(Quotes::SentDate).timestamp_with_time_zone())
                        .col(ColumnDef::new(Quotes::ConfirmedDate).timestamp_with_time_zone())
                        .col(ColumnDef::new(Quotes::RejectedDate).timestamp_with_time_zone())
                        .col(
                            ColumnDef::new(Quotes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Quotes::UpdatedAt).timestamp_with_time_zone())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_quotes_client")
                                .from(Quotes::Table, Quotes::ClientId)
                                .to(Clients::Table, Clients::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            // Folio uniqueness is what makes concurrent allocation safe:
            // two creations that computed the same next sequence cannot
            // both commit; the loser recomputes and retries.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_quotes_folio")
                        .table(Quotes::Table)
                        .col(Quotes::Folio)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_quotes_status")
                        .table(Quotes::Table)
                        .col(Quotes::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_quotes_client_id")
                        .table(Quotes::Table)
                        .col(Quotes::ClientId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_quotes_created_at")
                        .table(Quotes::Table)
                        .col(Quotes::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Quotes::Table).to_owned())
                .await
        }
    }

    /// Quote schema identifiers
    #[derive(Iden)]
    enum Quotes {
        Table,
        Id,
        Folio,
        ClientId,
        ClientName,
        ClientContact,
        ClientEmail,
        ClientPhone,
        ClientAddress,
        ClientPosition,
        LineItems,
        Subtotal,
        TaxRate,
        TaxAmount,
        Total,
        Currency,
        Status,
        TermsPaymentConditions,
        TermsDeliveryTime,
        TermsWarranty,
        TermsObservations,
        TermsValidUntil,
        Notes,
        SentDate,
        ConfirmedDate,
        RejectedDate,
        CreatedAt,
        UpdatedAt,
    }
}
