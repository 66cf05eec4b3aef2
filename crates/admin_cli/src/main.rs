use std::error::Error;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use migration::MigratorTrait;
use sea_orm::{ActiveValue, Database, DatabaseConnection, EntityTrait};

use engine::users;

#[derive(Parser, Debug)]
#[command(name = "coffer_admin")]
#[command(about = "Admin utilities for Coffer (bootstrap users, run billing)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./coffer.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    /// Process every subscription due by the given date.
    ProcessDue(ProcessDueArgs),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
}

#[derive(Args, Debug)]
struct ProcessDueArgs {
    /// Defaults to today.
    #[arg(long)]
    as_of: Option<NaiveDate>,
}

async fn connect(database_url: &str) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let db = connect(&cli.database_url).await?;

    match cli.command {
        Command::User(user) => match user.command {
            UserCommand::Create(args) => {
                let user = users::ActiveModel {
                    username: ActiveValue::Set(args.username.clone()),
                    password: ActiveValue::Set(args.password),
                };
                users::Entity::insert(user).exec(&db).await?;
                println!("created user '{}'", args.username);
            }
        },
        Command::ProcessDue(args) => {
            let engine = engine::Engine::builder().database(db).build().await?;
            let now = Utc::now();
            let as_of = args.as_of.unwrap_or_else(|| now.date_naive());
            let report = engine.process_due_subscriptions(None, as_of, now).await?;
            println!(
                "processed {} subscriptions, {} failed",
                report.processed, report.failed
            );
        }
    }

    Ok(())
}
