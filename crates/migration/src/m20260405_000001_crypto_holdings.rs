use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum CryptoHoldings {
    Table,
    Id,
    Owner,
    Symbol,
    Quantity,
    PurchasePriceMinor,
    CurrentPriceMinor,
    PurchaseTransactionId,
    SaleTransactionId,
    Status,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CryptoHoldings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CryptoHoldings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CryptoHoldings::Owner).string().not_null())
                    .col(ColumnDef::new(CryptoHoldings::Symbol).string().not_null())
                    .col(ColumnDef::new(CryptoHoldings::Quantity).double().not_null())
                    .col(
                        ColumnDef::new(CryptoHoldings::PurchasePriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CryptoHoldings::CurrentPriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CryptoHoldings::PurchaseTransactionId).uuid())
                    .col(ColumnDef::new(CryptoHoldings::SaleTransactionId).uuid())
                    .col(ColumnDef::new(CryptoHoldings::Status).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-crypto_holdings-purchase_transaction_id")
                            .from(CryptoHoldings::Table, CryptoHoldings::PurchaseTransactionId)
                            .to(Transactions::Table, Transactions::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-crypto_holdings-sale_transaction_id")
                            .from(CryptoHoldings::Table, CryptoHoldings::SaleTransactionId)
                            .to(Transactions::Table, Transactions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-crypto_holdings-owner-symbol")
                    .table(CryptoHoldings::Table)
                    .col(CryptoHoldings::Owner)
                    .col(CryptoHoldings::Symbol)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CryptoHoldings::Table).to_owned())
            .await
    }
}
