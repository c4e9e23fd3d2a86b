use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod budget_cmd;
mod config;
mod expense_cmd;
mod goal_cmd;
mod onboard;
mod recommend_cmd;
mod render;
mod setup;
mod state;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUDGETWISE_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "budgetwise",
    version,
    long_version = LONG_VERSION,
    about = "Personal budget planner: allocations, savings goals, expense tracking"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive onboarding: profile, categories and a first budget
    Setup,

    /// Show the heuristic allocation for your profile
    Allocate,

    /// Get a full recommendation (generative model first, heuristic fallback)
    Recommend(recommend_cmd::RecommendArgs),

    /// View or adjust the saved budget
    Budget {
        #[command(subcommand)]
        command: budget_cmd::BudgetCommand,
    },

    /// Savings goal tracking
    Goal {
        #[command(subcommand)]
        command: goal_cmd::GoalCommand,
    },

    /// Log expenses and compare spending against the budget
    Expense {
        #[command(subcommand)]
        command: expense_cmd::ExpenseCommand,
    },

    /// Manage ~/.budgetwise/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Command::Setup => setup::run_setup()?,
        Command::Allocate => recommend_cmd::run_allocate()?,
        Command::Recommend(args) => recommend_cmd::run(args)?,
        Command::Budget { command } => budget_cmd::run(command)?,
        Command::Goal { command } => goal_cmd::run(command)?,
        Command::Expense { command } => expense_cmd::run(command)?,
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}
