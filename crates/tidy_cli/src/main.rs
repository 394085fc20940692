//! Command-line driver for the Tidy core.
//!
//! # Responsibility
//! - Run one list command against the SQLite store from `TIDY_*` config.
//! - Keep `ping`/`version` probes to verify core wiring without a database.

use log::info;
use std::process::ExitCode;
use tidy_core::{EditOutcome, Filter, SqliteTodoStore, TidyConfig, TodoId};

const USAGE: &str = "usage: tidy <command>

commands:
  add <text>                 append a todo
  list [all|active|completed]
  toggle <id>                flip completion
  delete <id>
  edit <id> <text>           replace text (blank text keeps the old one)
  clear-completed
  move <from> <to> [filter]  reorder by position in the filtered list
  ping
  version";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let Some((command, rest)) = args.split_first() else {
        return Err(USAGE.to_string());
    };

    match command.as_str() {
        "ping" => {
            println!("tidy_core ping={}", tidy_core::ping());
            return Ok(());
        }
        "version" => {
            println!("tidy_core version={}", tidy_core::core_version());
            return Ok(());
        }
        "help" | "--help" | "-h" => {
            println!("{USAGE}");
            return Ok(());
        }
        _ => {}
    }

    let config = TidyConfig::from_env();
    config
        .init_logging()
        .map_err(|err| format!("logging setup failed: {err}"))?;
    info!("event=cli_command module=cli status=start command={command}");
    let mut store = config
        .open_store()
        .map_err(|err| format!("cannot open {}: {err}", config.db_path.display()))?;

    match (command.as_str(), rest) {
        ("add", [_, ..]) => {
            let id = store.add(&rest.join(" ")).map_err(|err| err.to_string())?;
            println!("added {id}");
        }
        ("list", []) => print_list(&store),
        ("list", [filter]) => {
            store.set_filter(parse_filter(filter)?);
            print_list(&store);
        }
        ("toggle", [id]) => report(store.toggle(parse_id(id)?), "toggled", id),
        ("delete", [id]) => report(store.delete(parse_id(id)?), "deleted", id),
        ("edit", [id, text @ ..]) => {
            let id = parse_id(id)?;
            if !store.start_edit(id) {
                println!("no todo {id}");
                return Ok(());
            }
            store.change_draft(&text.join(" "));
            match store.save_edit() {
                EditOutcome::Saved => println!("edited {id}"),
                EditOutcome::Reverted => println!("blank text, kept {id} unchanged"),
                EditOutcome::NoActiveEdit => println!("no todo {id}"),
            }
        }
        ("clear-completed", []) => {
            println!("removed {}", store.clear_completed());
        }
        ("move", [from, to, filter @ ..]) => {
            if let [filter] = filter {
                store.set_filter(parse_filter(filter)?);
            } else if !filter.is_empty() {
                return Err(USAGE.to_string());
            }
            let from = parse_index(from)?;
            let to = parse_index(to)?;
            if store.reorder(from, to) {
                print_list(&store);
            } else {
                println!("nothing moved");
            }
        }
        _ => return Err(USAGE.to_string()),
    }

    Ok(())
}

fn print_list(store: &SqliteTodoStore) {
    let visible = store.visible_list();
    if visible.is_empty() {
        println!("No todos");
    }
    for (position, todo) in visible.iter().enumerate() {
        let mark = if todo.completed { 'x' } else { ' ' };
        println!("{position:>3} [{mark}] {} {}", todo.id, todo.text);
    }
    println!("{} ({})", store.items_left_label(), store.filter());
}

fn report(changed: bool, verb: &str, id: &str) {
    if changed {
        println!("{verb} {id}");
    } else {
        println!("no todo {id}");
    }
}

fn parse_id(raw: &str) -> Result<TodoId, String> {
    raw.parse::<TodoId>()
        .map_err(|err| format!("invalid id `{raw}`: {err}"))
}

fn parse_index(raw: &str) -> Result<usize, String> {
    raw.parse::<usize>()
        .map_err(|err| format!("invalid position `{raw}`: {err}"))
}

fn parse_filter(raw: &str) -> Result<Filter, String> {
    raw.parse::<Filter>().map_err(|err| err.to_string())
}
