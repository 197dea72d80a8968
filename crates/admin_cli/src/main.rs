use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{AccountType, Engine, InternalTransferCmd};
use migration::MigratorTrait;
use sea_orm::Database;

#[derive(Parser, Debug)]
#[command(name = "corebank_admin")]
#[command(about = "Admin utilities for corebank (migrations, accounts, demo data)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./corebank.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending migrations and exit.
    Migrate,
    Account(Account),
    /// Create the demo accounts with opening balances and a first transfer.
    Seed,
}

#[derive(Args, Debug)]
struct Account {
    #[command(subcommand)]
    command: AccountCommand,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    Create(AccountCreateArgs),
}

#[derive(Args, Debug)]
struct AccountCreateArgs {
    #[arg(long)]
    number: String,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "checking")]
    account_type: String,
    #[arg(long, default_value_t = 0)]
    opening_balance_minor: i64,
}

fn parse_account_type(raw: &str) -> Result<AccountType, String> {
    match raw {
        "checking" => Ok(AccountType::Checking),
        "savings" => Ok(AccountType::Savings),
        other => Err(format!("unsupported account type: {other}")),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = Database::connect(&cli.database_url).await?;
    migration::Migrator::up(&db, None).await?;

    let engine = Engine::builder().database(db).build();

    match cli.command {
        Command::Migrate => {
            println!("migrations applied");
        }
        Command::Account(account) => match account.command {
            AccountCommand::Create(args) => {
                let account_type = parse_account_type(&args.account_type)?;
                let account = engine
                    .new_account(
                        &args.number,
                        &args.name,
                        account_type,
                        args.opening_balance_minor,
                    )
                    .await?;
                println!(
                    "created account {} ({}) id={}",
                    account.account_number, account.account_name, account.id
                );
            }
        },
        Command::Seed => {
            let checking = engine
                .new_account(
                    "1001-2345-6789",
                    "Demo Checking",
                    AccountType::Checking,
                    150_000_000,
                )
                .await?;
            let savings = engine
                .new_account(
                    "1001-9876-5432",
                    "Demo Savings",
                    AccountType::Savings,
                    50_000_000,
                )
                .await?;
            // A first transfer so the ledger endpoints have data to show.
            let transfer = engine
                .create_internal_transfer(
                    InternalTransferCmd::new(
                        checking.id,
                        savings.account_number.clone(),
                        2_500_000,
                    )
                    .description("Initial demo transfer"),
                )
                .await?;
            println!(
                "seeded accounts {} and {}; transfer {}",
                checking.account_number, savings.account_number, transfer.reference_number
            );
        }
    }

    Ok(())
}
