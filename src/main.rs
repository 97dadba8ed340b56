//! JobTrackr command-line front end
//!
//! Opens the board from the configured SQLite store, applies one command,
//! and prints the result as markdown or JSON.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use jobtrackr::board::BoardStore;
use jobtrackr::board::moves::MoveCommand;
use jobtrackr::board::query::{self, Query, ViewMode};
use jobtrackr::cli::export::{ExportArgs, ImportArgs};
use jobtrackr::cli::task::resolve_column;
use jobtrackr::cli::{Cli, Command, FormatArg};
use jobtrackr::config::Config;
use jobtrackr::db::Database;
use jobtrackr::format::{self, OutputFormat};
use jobtrackr::logging::{self, LogTarget};
use jobtrackr::persistence::{LoadOutcome, decode_board, encode_board};
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info};

type Store = BoardStore<Database>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(db_path) = &cli.database {
        config.storage.db_path = db_path.clone();
    }
    if let Some(format) = cli.format {
        config.display.format = match format {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Markdown => OutputFormat::Markdown,
        };
    }

    let db = Database::open(&config.storage.db_path).with_context(|| {
        format!("opening database {}", config.storage.db_path.display())
    })?;
    let mut store = BoardStore::open_with_key(db, config.storage.storage_key.clone());
    if let LoadOutcome::Recovered { reason } = store.load_outcome() {
        eprintln!("Warning: stored board was unreadable and has been reset ({reason})");
    }
    debug!(db = %config.storage.db_path.display(), "Board opened");

    let out = config.display.format;
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Command::Add(args) => {
            let fields = args.to_fields();
            fields.require_identity()?;
            let column_id = stage(&store, &args.stage)?;
            let task = store.add_task(&column_id, fields)?;
            info!(task_id = %task.id, "Added application");
            print_location(&store, &task.id, out, today)?;
        }
        Command::Edit(args) => {
            let current = store
                .find_task(&args.id)
                .ok_or_else(|| anyhow!("Task not found: {}", args.id))?;
            let target = match &args.stage {
                Some(s) => stage(&store, s)?,
                None => current.column_id,
            };
            let task = store.update_task(&args.id, args.to_fields(), &target)?;
            print_location(&store, &task.id, out, today)?;
        }
        Command::Rm { id } => {
            let removed = store.delete_task(&id)?;
            match out {
                OutputFormat::Json => print_json(&serde_json::json!({ "id": id, "removed": removed }))?,
                OutputFormat::Markdown if removed => println!("Removed `{}`", id),
                OutputFormat::Markdown => println!("No application `{}`", id),
            }
        }
        Command::Mv(args) => {
            let from = stage(&store, &args.from)?;
            let to = stage(&store, &args.to)?;
            let command = MoveCommand::new(from, args.from_index, to.clone(), args.to_index);
            let board = store.move_task(&command)?;
            let query = Query::new()
                .with_status(title_filter(&board, &to))
                .with_mode(config.display.view);
            print_query(&query::run(&board, &query), out, today)?;
        }
        Command::Show { id } => {
            print_location(&store, &id, out, today)?;
        }
        Command::Board(filters) => {
            let query = filters.to_query(ViewMode::Board).map_err(|e| anyhow!(e))?;
            print_query(&store.query(&query), out, today)?;
        }
        Command::List(filters) => {
            let query = filters.to_query(ViewMode::List).map_err(|e| anyhow!(e))?;
            print_query(&store.query(&query), out, today)?;
        }
        Command::Stats => {
            let stats = query::stats(&store.snapshot());
            match out {
                OutputFormat::Json => print_json(&stats)?,
                OutputFormat::Markdown => print!("{}", format::format_stats_markdown(&stats)),
            }
        }
        Command::Columns => {
            let board = store.snapshot();
            match out {
                OutputFormat::Json => {
                    let columns: Vec<_> = board
                        .columns()
                        .iter()
                        .map(|c| serde_json::json!({ "id": c.id, "title": c.title }))
                        .collect();
                    print_json(&columns)?;
                }
                OutputFormat::Markdown => {
                    for c in board.columns() {
                        println!("- `{}` {}", c.id, c.title);
                    }
                }
            }
        }
        Command::Export(args) => run_export(&store, &args)?,
        Command::Import(args) => run_import(&mut store, &args)?,
    }

    Ok(())
}

fn stage(store: &Store, stage: &str) -> Result<String> {
    resolve_column(&store.snapshot(), stage).ok_or_else(|| anyhow!("Unknown stage: {}", stage))
}

fn title_filter(board: &jobtrackr::Board, column_id: &str) -> query::StatusFilter {
    board
        .column(column_id)
        .map(|c| query::StatusFilter::Title(c.title.clone()))
        .unwrap_or_default()
}

fn print_location(
    store: &Store,
    id: &str,
    out: OutputFormat,
    today: chrono::NaiveDate,
) -> Result<()> {
    let location = store
        .find_task(id)
        .ok_or_else(|| anyhow!("Task not found: {}", id))?;
    match out {
        OutputFormat::Json => print_json(&location),
        OutputFormat::Markdown => {
            print!("{}", format::format_task_markdown(&location, today));
            Ok(())
        }
    }
}

fn print_query(
    result: &query::QueryResult,
    out: OutputFormat,
    today: chrono::NaiveDate,
) -> Result<()> {
    match out {
        OutputFormat::Json => print_json(result),
        OutputFormat::Markdown => {
            print!("{}", format::format_query_markdown(result, today));
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_export(store: &Store, args: &ExportArgs) -> Result<()> {
    let board = store.snapshot();
    let bytes = if args.pretty {
        serde_json::to_vec_pretty(&*board)?
    } else {
        encode_board(&board)?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &bytes)
                .with_context(|| format!("writing export {}", path.display()))?;
            eprintln!(
                "Exported {} applications to {}",
                board.task_count(),
                path.display()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn run_import(store: &mut Store, args: &ImportArgs) -> Result<()> {
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("reading import {}", args.input.display()))?;
    let board = decode_board(&bytes)
        .with_context(|| format!("parsing import {}", args.input.display()))?;

    let existing = store.snapshot().task_count();
    if existing > 0 && !args.force {
        bail!(
            "Board already has {} applications; use --force to replace it",
            existing
        );
    }

    let board = store.replace_board(board)?;
    eprintln!(
        "Imported {} applications from {}",
        board.task_count(),
        args.input.display()
    );
    Ok(())
}
