pub use sea_orm_migration::prelude::*;

mod m20250801_090000_accounts;
mod m20250801_091000_transfers;
mod m20250801_092000_transactions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_090000_accounts::Migration),
            Box::new(m20250801_091000_transfers::Migration),
            Box::new(m20250801_092000_transactions::Migration),
        ]
    }
}
