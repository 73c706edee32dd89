mod cli;
mod config;
mod error;
mod journal;
mod play;
mod report;
mod scoring;
mod script;
mod store;
mod types;

use crate::config::LoadedMatch;
use crate::error::CreaseError;
use crate::journal::MatchJournal;
use crate::scoring::innings::TeamSheet;
use crate::scoring::{Innings, NextAction};
use crate::store::{JsonFileStore, MatchStore};
use crate::types::config::{BattingFirst, TeamConfig};
use chrono::Utc;
use clap::Parser;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const REJECTED: i32 = 1;
    pub const INCOMPLETE: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn ensure_dir(path: &Path) -> Result<(), CreaseError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CreaseError::PathNotFound(path.display().to_string()))
    }
}

fn output_format(format: cli::ReportFormat) -> report::OutputFormat {
    match format {
        cli::ReportFormat::Json => report::OutputFormat::Json,
        cli::ReportFormat::Md => report::OutputFormat::Md,
    }
}

fn sheet(team: &TeamConfig) -> TeamSheet {
    TeamSheet {
        name: team.name.clone(),
        players: team.players.clone(),
    }
}

fn build_innings(loaded: &LoadedMatch) -> Innings {
    let teams = &loaded.config.teams;
    let (batting, fielding) = match loaded.config.rules.batting_first {
        BattingFirst::Home => (&teams.home, &teams.away),
        BattingFirst::Away => (&teams.away, &teams.home),
    };
    Innings::new(
        loaded.rules.clone(),
        sheet(batting),
        sheet(fielding),
        loaded.config.joker.name.clone(),
    )
}

fn run() -> Result<i32, CreaseError> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.command {
        cli::Commands::Init(cmd) => match config::write_starter_config(&cmd.path, cmd.force)? {
            Some(path) => {
                println!("init: wrote {}", path.display());
                Ok(exit_code::SUCCESS)
            }
            None => {
                eprintln!(
                    "init: {} already exists (use --force to overwrite)",
                    cmd.path.join(config::DEFAULT_CONFIG_FILE).display()
                );
                Ok(exit_code::REJECTED)
            }
        },
        cli::Commands::Check(cmd) => {
            ensure_dir(&cmd.path)?;
            let loaded = config::load_match(&cmd.path)?;
            let (_, problem) = loaded.config.effective_match_config();
            let teams = &loaded.config.teams;
            println!(
                "check: {} v {}, {} over(s), format {}",
                teams.home.name, teams.away.name, loaded.rules.total_overs, loaded.rules.format
            );
            match problem {
                Some(problem) => {
                    eprintln!("warning: {problem}; default rules will be used");
                    Ok(exit_code::REJECTED)
                }
                None => {
                    println!("check: ok");
                    Ok(exit_code::SUCCESS)
                }
            }
        }
        cli::Commands::Play(cmd) => {
            ensure_dir(&cmd.path)?;
            let loaded = config::load_match(&cmd.path)?;
            let lines = play::read_script(&cmd.script)?;
            let mut innings = build_innings(&loaded);
            let mut journal = MatchJournal::new(&cmd.path, Some(&loaded.config));
            journal.record_milestone(
                1,
                &play::score_line(&innings),
                "start",
                &format!("{} v {}", innings.batting_team(), innings.bowling_team()),
            )?;

            let replay = play::replay(
                &mut innings,
                &lines,
                &mut journal,
                &play::ReplayOptions { strict: cmd.strict },
            )?;
            for rejection in &replay.rejections {
                eprintln!("line {}: rejected: {}", rejection.line, rejection.error);
            }
            for (line, note) in &replay.advisories {
                eprintln!("line {line}: note: {note}");
            }
            if let Some(line) = replay.stopped_at {
                eprintln!("stopped at line {line} (--strict)");
            }

            let format = output_format(cmd.format);
            let complete = innings.next_action() == NextAction::MatchComplete;
            let rendered = if complete {
                let record = innings.finalize(Utc::now())?.clone();
                journal.record_milestone(
                    2,
                    &play::score_line(&innings),
                    "result",
                    &record.headline(),
                )?;
                if cmd.dry_run {
                    info!(id = %record.id, "dry run; match not saved");
                } else {
                    let mut store = JsonFileStore::for_match_dir(&cmd.path, Some(&loaded.config));
                    store.save_match(&record)?;
                }
                report::render_record(&record, format)?
            } else {
                report::render_scoreboard(&innings, format)?
            };
            if !cli.quiet {
                println!("{rendered}");
            }

            if !complete {
                Ok(exit_code::INCOMPLETE)
            } else if !replay.rejections.is_empty() {
                Ok(exit_code::REJECTED)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::History(cmd) => {
            ensure_dir(&cmd.path)?;
            let loaded = config::load_config(&cmd.path)?;
            let store = JsonFileStore::for_match_dir(&cmd.path, loaded.as_ref());
            let records = store.load_prior_matches()?;
            println!(
                "{}",
                report::render_history(&records, output_format(cmd.format))?
            );
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
