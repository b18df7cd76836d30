//! # churnstore
//! An in-memory customer index for churn analysis, with a fixed-width
//! binary snapshot format.
//!
//! ## Features
//! - B-tree index keyed by customer id, generic over key and value
//! - Fixed-width record codec with versioned, configurable layouts
//! - CSV import of the Telco churn export
//! - Filter by churn status and contract, average monthly charge by status
//!
//! ## Usage
//! This crate is primarily consumed by the binary in `main.rs`,
//! which provides the REPL interface. All reusable logic and
//! unit tests live here so the project can be tested with `cargo test`.
// =====================================================================
// File: lib.rs
//
//   This module implements the command-line interface (CLI)
//   that accepts the following commands:
//
//     `FIND <id>`                    -> Print the customer with that id, or NOT FOUND
//     `FILTER <Yes|No> <contract>`   -> Count matches, print the first three
//     `AVG [<Yes|No>]`               -> Average monthly charge (both statuses if omitted)
//     `COUNT`                        -> Number of customers in the index
//     `SAVE`                         -> Write the index to the binary data file
//     `LOAD`                         -> Replace the index with the binary data file
//     `IMPORT [<csv path>]`          -> Load a CSV (configured path if omitted)
//     `EXIT` / `QUIT`                -> Terminate the program
// =====================================================================
pub mod analysis;
pub mod codec;
pub mod config;
pub mod error;
pub mod index;
pub mod ingest;
pub mod record;
pub mod session;
pub mod storage;

pub use codec::{RecordCodec, RecordSchema, SchemaVersion};
pub use config::Config;
pub use error::{CodecError, Error, IndexError, Result};
pub use index::{BTreeIndex, BTreeNode};
pub use record::CustomerRecord;
pub use session::Session;

use std::io::{self, BufRead};
use std::path::Path;

use tracing::warn;

/// The index every session works with: customer id -> record.
pub type CustomerIndex = BTreeIndex<String, CustomerRecord>;

/// How many matches `FILTER` prints before eliding the rest.
const FILTER_PREVIEW: usize = 3;

const PROPER_SYNTAX: &str =
    "Syntax Usage: FIND <id>, FILTER <Yes|No> <contract>, AVG [<Yes|No>], COUNT, SAVE, LOAD, IMPORT [<csv>], EXIT";

/// Result of handling a single user command.
///
/// - `Continue` means the REPL should keep running.
/// - `Exit` means the REPL should break out and terminate.
pub enum CommandResult {
    Continue,
    Exit,
}


/// Read–Evaluate–Print Loop (REPL) to handle interactive command input.
///
/// Continuously reads commands from standard input, executes them
/// against the current [`Session`], and prints responses back to
/// standard output.
///
/// # Example
/// ```no_run
/// use churnstore::{repl_loop, Config, Session};
///
/// let mut session = Session::new(Config::default()).unwrap();
/// repl_loop(&mut session); // <- waits for user input interactively
/// ```
pub fn repl_loop(session: &mut Session) {
    let stdin = io::stdin();

    for input_line in stdin.lock().lines() {
        let full_command = match input_line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "failed to read from stdin");
                break;
            }
        };
        match handle_command(&full_command, PROPER_SYNTAX, session) {
            CommandResult::Exit => break,
            CommandResult::Continue => (),
        }
    }
}


/// Parses a raw input line into a command and its arguments.
///
/// The first token is treated as the command (normalized to uppercase),
/// and the remaining tokens are collected as arguments. Leading and
/// trailing whitespace is ignored.
fn parse_command(line: &str) -> (String, Vec<String>) {
    let mut command_segments = line.trim().split_whitespace();
    let cmd = command_segments.next().unwrap_or("").to_uppercase();
    let args: Vec<String> = command_segments.map(|s| s.to_string()).collect();

    (cmd, args)
}


/// Everything after the command token, with only the outer whitespace
/// removed. Used where an argument may itself contain whitespace runs.
fn command_tail(line: &str) -> &str {
    let line = line.trim_start();
    match line.find(char::is_whitespace) {
        Some(end) => line[end..].trim(),
        None => "",
    }
}


/// Handles a single input line and returns whether the REPL should continue or exit.
///
/// The `proper_syntax` argument is displayed in error messages to guide the user.
fn handle_command(line: &str, proper_syntax: &str, session: &mut Session) -> CommandResult {
    let (cmd, args) = parse_command(line);

    match cmd.as_str() {
        // FIND <id>
        "FIND" => {
            if args.len() != 1 {
                println!("ERROR: FIND requires exactly one customer id");
            } else {
                match session.find(&args[0]) {
                    Some(record) => println!("{}", record),
                    None => println!("NOT FOUND"),
                }
            }
            CommandResult::Continue
        }

        // FILTER <status> <contract...> - contract types contain spaces ("One year")
        "FILTER" => {
            if args.len() < 2 {
                println!("ERROR: FILTER requires a churn status and a contract type");
            } else {
                let contract_type = args[1..].join(" ");
                let matches = session.filter(&args[0], &contract_type);

                if matches.is_empty() {
                    println!("0 customers found");
                } else {
                    println!("{} customers found", matches.len());
                    for record in matches.iter().take(FILTER_PREVIEW) {
                        println!("{}", record);
                    }
                    if matches.len() > FILTER_PREVIEW {
                        println!("...");
                    }
                }
            }
            CommandResult::Continue
        }

        // AVG [<status>]
        "AVG" => {
            match args.as_slice() {
                [] => {
                    println!("Churned: ${:.2}", session.average_charge("Yes"));
                    println!("Active : ${:.2}", session.average_charge("No"));
                }
                [status] => println!("{}: ${:.2}", status, session.average_charge(status)),
                _ => println!("ERROR: Too many arguments for AVG"),
            }
            CommandResult::Continue
        }

        "COUNT" => {
            if args.is_empty() {
                println!("{}", session.count());
            } else {
                println!("ERROR: COUNT does not take any arguments");
            }
            CommandResult::Continue
        }

        "SAVE" => {
            if !args.is_empty() {
                println!("ERROR: SAVE does not take any arguments");
            } else {
                match session.save() {
                    Ok(count) => println!("OK: {} records saved", count),
                    Err(e) => {
                        warn!(error = %e, "save failed");
                        println!("ERROR: {}", e);
                    }
                }
            }
            CommandResult::Continue
        }

        "LOAD" => {
            if !args.is_empty() {
                println!("ERROR: LOAD does not take any arguments");
            } else {
                match session.load() {
                    Ok(count) => println!("OK: {} records loaded", count),
                    Err(e) => {
                        warn!(error = %e, "load failed");
                        println!("ERROR: {}", e);
                    }
                }
            }
            CommandResult::Continue
        }

        // IMPORT [<path>] - the path is taken verbatim, inner whitespace included
        "IMPORT" => {
            let path = command_tail(line);
            let result = if path.is_empty() {
                session.import_csv()
            } else {
                session.import_csv_from(Path::new(path))
            };
            match result {
                Ok(count) => println!("OK: {} records imported", count),
                Err(e) => {
                    warn!(error = %e, "import failed");
                    println!("ERROR: {}", e);
                }
            }
            CommandResult::Continue
        }

        "EXIT" | "QUIT" => {
            println!("Exiting...");
            CommandResult::Exit
        }

        // Empty input
        "" => {
            println!("Enter a command.");
            CommandResult::Continue
        }

        _ => {
            println!("ERROR: command '{}' not handled", cmd);
            println!("{}", proper_syntax);
            CommandResult::Continue
        }
    }
}



// =================================================================
// lib.rs Unit tests
// =================================================================

#[cfg(test)]
mod main_lib_tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    /// Session whose files live in a throwaway directory, preloaded with a
    /// few customers.
    fn session_with_data() -> (TempDir, Session) {
        let dir = tempdir().unwrap();
        let config = Config {
            csv_path: dir.path().join("input.csv"),
            data_file: dir.path().join("customers.db"),
            ..Config::default()
        };
        let mut session = Session::new(config).unwrap();
        for (id, churned, contract, charge) in [
            ("0001", "Yes", "One year", 10.0),
            ("0002", "Yes", "One year", 20.0),
            ("0003", "No", "Two year", 30.0),
            ("0004", "Yes", "One year", 40.0),
            ("0005", "Yes", "One year", 50.0),
        ] {
            session
                .index
                .insert(id.into(), CustomerRecord::new(id, "Male", churned, contract, charge, 6));
        }
        (dir, session)
    }

    #[test]
    fn test_parse_exit_command() {
        let (cmd, args) = parse_command("EXIT");
        assert_eq!(cmd, "EXIT");
        assert!(args.is_empty());
    }

    #[test]
    fn test_exit_and_quit_commands() {
        let (_dir, mut session) = session_with_data();
        for line in ["EXIT", "quit"] {
            let result = handle_command(line, "Usage", &mut session);
            assert!(matches!(result, CommandResult::Exit));
        }
    }

    #[test]
    fn test_parse_keeps_argument_case() {
        let (cmd, args) = parse_command("  filter   Yes  Month-to-month  ");
        assert_eq!(cmd, "FILTER");
        assert_eq!(args, vec!["Yes", "Month-to-month"]);
    }

    #[test]
    fn test_command_tail_keeps_inner_whitespace() {
        assert_eq!(command_tail("  IMPORT  /tmp/my  data\there.csv  "), "/tmp/my  data\there.csv");
        assert_eq!(command_tail("IMPORT"), "");
        assert_eq!(command_tail("   "), "");
    }

    #[test]
    fn test_unknown_command_continues() {
        let (_dir, mut session) = session_with_data();
        let result = handle_command("FLY away", "Usage", &mut session);
        assert!(matches!(result, CommandResult::Continue));
    }

    #[test]
    fn test_find_argument_checks() {
        let (_dir, mut session) = session_with_data();
        for line in ["FIND", "FIND 0001 0002", "FIND 0001", "FIND 9999"] {
            let result = handle_command(line, "Usage", &mut session);
            assert!(matches!(result, CommandResult::Continue));
        }
    }

    #[test]
    fn test_filter_and_avg_continue() {
        let (_dir, mut session) = session_with_data();
        for line in ["FILTER Yes One year", "FILTER Yes", "AVG", "AVG No", "AVG Yes No", "COUNT"] {
            let result = handle_command(line, "Usage", &mut session);
            assert!(matches!(result, CommandResult::Continue));
        }
        // Multi-word contract joined back together
        assert_eq!(session.filter("Yes", "One year").len(), 4);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (_dir, mut session) = session_with_data();

        handle_command("SAVE", "Usage", &mut session);
        assert!(session.config.data_file.exists());

        // A row added after SAVE disappears, everything saved comes back
        session
            .index
            .insert("0099".into(), CustomerRecord::new("0099", "Male", "No", "Two year", 1.0, 1));
        handle_command("LOAD", "Usage", &mut session);
        assert_eq!(session.count(), 5);
        assert!(session.find("0099").is_none());
        assert_eq!(session.find("0004").unwrap().monthly_charge, 40.0);
    }

    #[test]
    fn test_save_rejects_arguments() {
        let (_dir, mut session) = session_with_data();
        handle_command("SAVE now", "Usage", &mut session);
        assert!(!session.config.data_file.exists());
    }

    #[test]
    fn test_load_missing_file_leaves_index_alone() {
        let (_dir, mut session) = session_with_data();
        let result = handle_command("LOAD", "Usage", &mut session);
        assert!(matches!(result, CommandResult::Continue));
        assert_eq!(session.count(), 5);
    }

    #[test]
    fn test_import_from_explicit_path() {
        let (dir, mut session) = session_with_data();
        let csv = dir.path().join("extra  rows.csv");
        std::fs::write(
            &csv,
            "customerID,gender,tenure,Contract,MonthlyCharges,Churn\n0100,Female,2,Two year,70.5,No\n",
        )
        .unwrap();

        let line = format!("IMPORT {}", csv.display());
        handle_command(&line, "Usage", &mut session);
        assert_eq!(session.find("0100").unwrap().monthly_charge, 70.5);
    }
}
