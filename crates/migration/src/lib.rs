pub use sea_orm_migration::prelude::*;

mod m20260301_000001_init;
mod m20260315_000001_debts;
mod m20260322_000001_subscriptions;
mod m20260405_000001_crypto_holdings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_init::Migration),
            Box::new(m20260315_000001_debts::Migration),
            Box::new(m20260322_000001_subscriptions::Migration),
            Box::new(m20260405_000001_crypto_holdings::Migration),
        ]
    }
}
