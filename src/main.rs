//! ModPlan - command line front end
//!
//! Reads an archive listing, asks the installers about it and prints the
//! result as JSON on stdout. Log output goes to stderr and the log file.

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;

mod cli;
mod listing;

use cli::{Cli, Commands};
use listing::read_listing;
use modplan::config::AppConfig;
use modplan::game_finder::{find_by_id, KNOWN_GAMES};
use modplan::installers::{InstallError, InstallerRegistry, SupportResult};
use modplan::logging::{init_logger, log_error, log_info, set_console_output};

fn main() -> ExitCode {
    let cli = Cli::parse();
    set_console_output(!cli.quiet);

    let config = match &cli.config {
        Some(path) => match AppConfig::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::load(),
    };

    if config.log_to_file {
        if let Err(e) = init_logger(&AppConfig::log_dir()) {
            eprintln!("Failed to open log file: {}", e);
        }
    }
    log_info("ModPlan starting up...");

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error(&e.to_string());
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let registry = InstallerRegistry::new(config.plan_options());

    let output = match command {
        Commands::Games => {
            let games: Vec<_> = KNOWN_GAMES
                .iter()
                .map(|game| {
                    let installers: Vec<&str> = registry
                        .installers()
                        .iter()
                        .filter(|i| i.game_id() == game.id)
                        .map(|i| i.id())
                        .collect();
                    json!({
                        "id": game.id,
                        "name": game.name.replace('\t', " "),
                        "executable": game.executable,
                        "requiredFiles": game.required_files,
                        "steamAppId": game.steam_app_id,
                        "epicAppId": game.epic_app_id,
                        "msAppId": game.ms_app_id,
                        "mergeMods": game.merge_mods,
                        "installers": installers,
                    })
                })
                .collect();
            json!(games)
        }
        Commands::Test { game, source } => {
            find_by_id(&game).ok_or_else(|| InstallError::UnknownGame(game.clone()))?;
            let files = read_listing(&source)?;
            match registry.test(&files, &game) {
                Some(installer) => json!({
                    "installer": installer.id(),
                    "result": SupportResult::supported(),
                }),
                None => json!({
                    "installer": null,
                    "result": SupportResult::unsupported(),
                }),
            }
        }
        Commands::Install {
            game,
            destination,
            source,
        } => {
            let files = read_listing(&source)?;
            let plan = registry.plan(&files, &game, &destination, None)?;
            serde_json::to_value(plan)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
