pub mod commands;
pub mod logging;
pub mod recipes_file;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mealwise_core::config::{AppConfig, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "mealwise",
    about = "Mealwise meal-planning CLI",
    long_about = "Suggest what to cook next from a recipe export, build a consolidated grocery list, and inspect configuration.",
    after_help = "Examples:\n  mealwise suggest --recipes recipes.json --count 3\n  mealwise suggest --recipes recipes.json --strategy fresh --exclude r1 --exclude r2\n  mealwise grocery --recipes recipes.json --id r1 --id r4\n  mealwise config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a mealwise.toml config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Suggest recipes to cook next and print a JSON report")]
    Suggest(commands::suggest::SuggestArgs),
    #[command(about = "Consolidate the ingredients of selected recipes into a grocery list")]
    Grocery(commands::grocery::GroceryArgs),
    #[command(
        about = "Inspect effective configuration values with source attribution"
    )]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let load_options = LoadOptions {
        require_file: cli.config.is_some(),
        config_path: cli.config,
        ..LoadOptions::default()
    };

    if let Ok(config) = AppConfig::load(load_options.clone()) {
        logging::init(&config.logging);
    }

    let result = match cli.command {
        Command::Suggest(args) => commands::suggest::run(&load_options, args),
        Command::Grocery(args) => commands::grocery::run(&load_options, args),
        Command::Config => commands::CommandResult {
            exit_code: 0,
            output: commands::config::run(&load_options),
        },
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
