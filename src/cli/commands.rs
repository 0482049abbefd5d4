use clap::{Parser, Subcommand};
use crate::board::Board;
use crate::cli::abbrev;
use crate::cli::error::{slot_not_found_message, user_error, validate_slot_id};
use crate::cli::output::{
    format_board, format_card, format_card_json, format_stage_table, format_status,
    format_status_json, get_terminal_width, is_tty, CardEcho,
};
use crate::db::DbConnection;
use crate::models::{Field, SlotId};
use crate::store::{SqliteKv, Store};
use anyhow::{Context, Result};

#[derive(Parser)]
#[command(name = "mmboard")]
#[command(about = "Launch Board - track client onboarding from Round 1 to the Championship")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the board, or a single card
    Show {
        /// Slot number (optional, defaults to the whole board)
        slot: Option<String>,
        /// Output the stored snapshot (or card) in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Move a client to the next stage
    Advance {
        /// Slot number
        slot: String,
    },
    /// Set a client's name
    Name {
        /// Slot number
        slot: String,
        /// New name (words are joined with spaces; omit to clear)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Set a client's project manager
    Manager {
        /// Slot number
        slot: String,
        /// New manager (words are joined with spaces; omit to clear)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// List the pipeline stages
    Stages,
    /// Show how many clients are at each stage
    Status {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Clear every slot and start a fresh 24-slot board
    Reset {
        /// Reset without confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

pub fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    run_with_args(args)
}

/// Parse and execute a command line (without the program name)
pub fn run_with_args(args: Vec<String>) -> Result<()> {
    let args = match abbrev::expand_command_abbreviations(args) {
        Ok(expanded) => expanded,
        Err(e) => user_error(&e),
    };

    let clap_args = std::iter::once("mmboard".to_string())
        .chain(args)
        .collect::<Vec<_>>();
    let cli = match Cli::try_parse_from(clap_args) {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version land here too; clap picks stdout vs stderr and the exit code
            e.exit();
        }
    };

    handle_command(cli)
}

fn handle_command(cli: Cli) -> Result<()> {
    match cli.command {
        None => handle_show(None, false),
        Some(Commands::Show { slot, json }) => handle_show(slot, json),
        Some(Commands::Advance { slot }) => handle_advance(slot),
        Some(Commands::Name { slot, value }) => handle_set_field(slot, Field::Name, value),
        Some(Commands::Manager { slot, value }) => handle_set_field(slot, Field::Manager, value),
        Some(Commands::Stages) => {
            print!("{}", format_stage_table(is_tty()));
            Ok(())
        }
        Some(Commands::Status { json }) => handle_status(json),
        Some(Commands::Reset { yes }) => handle_reset(yes),
    }
}

/// Open the configured database and mount the board on it
fn open_board() -> Result<Board<SqliteKv>> {
    let conn = DbConnection::connect()
        .context("Failed to connect to database")?;
    Ok(Board::mount(Store::new(SqliteKv::new(conn))))
}

/// Parse a slot argument and check it is on the board, exiting with a user error otherwise
fn resolve_slot(board: &Board<SqliteKv>, slot_str: &str) -> SlotId {
    let slot = validate_slot_id(slot_str).unwrap_or_else(|e| user_error(&e));
    if !board.contains(slot) {
        let slots: Vec<SlotId> = board.slots().collect();
        user_error(&slot_not_found_message(slot, &slots));
    }
    slot
}

fn handle_show(slot: Option<String>, json: bool) -> Result<()> {
    let board = open_board()?;
    let tty = is_tty();

    match slot {
        Some(slot_str) => {
            let slot = resolve_slot(&board, &slot_str);
            let card = board.card(slot).context("Slot disappeared from the board")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&format_card_json(&card))?);
            } else {
                for line in format_card(&card, tty) {
                    println!("{}", line);
                }
            }
        }
        None => {
            if json {
                println!("{}", serde_json::to_string_pretty(&board.snapshot())?);
            } else {
                print!("{}", format_board(&board.cards(), get_terminal_width(), tty));
            }
        }
    }
    Ok(())
}

fn handle_advance(slot_str: String) -> Result<()> {
    let board = open_board()?;
    let slot = resolve_slot(&board, &slot_str);
    let mut board = board.with_renderer(Box::new(CardEcho::new(is_tty())));

    if let Some(stage) = board.advance(slot) {
        if stage.is_final() {
            println!("Slot {} is at the Championship.", slot);
        }
    }
    Ok(())
}

fn handle_set_field(slot_str: String, field: Field, value: Vec<String>) -> Result<()> {
    let board = open_board()?;
    let slot = resolve_slot(&board, &slot_str);
    let mut board = board.with_renderer(Box::new(CardEcho::new(is_tty())));

    board.set_field(slot, field, value.join(" "));
    Ok(())
}

fn handle_status(json: bool) -> Result<()> {
    let board = open_board()?;
    let summary = board.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&format_status_json(&summary))?);
    } else {
        print!("{}", format_status(&summary, is_tty()));
    }
    Ok(())
}

fn handle_reset(yes: bool) -> Result<()> {
    let board = open_board()?;

    if !yes && !confirm_reset(board.len())? {
        println!("Cancelled.");
        return Ok(());
    }

    let mut board = board.with_renderer(Box::new(CardEcho::new(is_tty())));
    board.reset();
    Ok(())
}

/// Prompt before wiping the board. Empty input means no.
fn confirm_reset(slots: usize) -> Result<bool> {
    eprint!("Reset all {} slots to an empty board? [y/N]: ", slots);
    std::io::Write::flush(&mut std::io::stderr())
        .context("Failed to flush stderr")?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)
        .context("Failed to read input")?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
