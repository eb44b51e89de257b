//! registry-cli — demo command line for the user registry.
//!
//! Every invocation starts from an empty in-memory database; nothing is
//! persisted across runs.
//!
//! Run:
//! ```bash
//! # the add/remove walkthrough
//! cargo run -p registry-cli -- demo
//!
//! # a script of commands against one store
//! OUTPUT_FORMAT=json cargo run -p registry-cli -- add 0 Harry add 1 John remove 0 list
//! ```
//!
//! Configuration: See `config.rs` for the environment variables.

mod config;

use std::io::{self, Write};
use std::process;

use serde_json::Value;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use user_registry::adapters::memory_db::InMemoryDatabase;
use user_registry::store::UserStore;
use user_registry::{User, UserDatabase, UserId};

use config::{Config, LogFormat, OutputFormat};

/// One step of a command script.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Add(User),
    AddJson(Value),
    Remove(UserId),
    RemoveJson(Value),
    List,
}

fn print_usage() {
    eprintln!(
        "{}\n\nUsage:\n  registry-cli demo\n  registry-cli [add <id> <name> | add-json <json> | remove <id> | remove-json <json> | list]...\n\nNotes:\n  - Commands run in order against one in-memory store; data is not persisted across runs.",
        user_registry::about()
    );
}

fn parse_id(raw: &str) -> Result<UserId, String> {
    raw.parse()
        .map_err(|_| format!("invalid id '{}': expected an integer", raw))
}

fn parse_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid json '{}': {}", raw, e))
}

fn parse_commands<I: IntoIterator<Item = String>>(args: I) -> Result<Vec<Command>, String> {
    let mut args = args.into_iter();
    let mut commands = Vec::new();
    while let Some(cmd) = args.next() {
        let mut operand = |what: &str| {
            args.next()
                .ok_or_else(|| format!("missing <{}> for {}", what, cmd))
        };
        let command = match cmd.as_str() {
            "add" => {
                let id = parse_id(&operand("id")?)?;
                let name = operand("name")?;
                Command::Add(User::new(id, name))
            }
            "add-json" => Command::AddJson(parse_json(&operand("json")?)?),
            "remove" => Command::Remove(parse_id(&operand("id")?)?),
            "remove-json" => Command::RemoveJson(parse_json(&operand("json")?)?),
            "list" => Command::List,
            unk => return Err(format!("unknown command: {}", unk)),
        };
        commands.push(command);
    }
    Ok(commands)
}

fn render(users: &[User], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string(users).map_err(|e| e.to_string()),
        OutputFormat::Text => {
            let items: Vec<String> = users.iter().map(User::to_string).collect();
            Ok(format!("[{}]", items.join(", ")))
        }
    }
}

/// Run `commands` against `store`, printing each resulting collection.
fn run_script<D: UserDatabase, W: Write>(
    store: &UserStore<D>,
    commands: Vec<Command>,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), String> {
    for command in commands {
        let mut rendered = Ok(String::new());
        let label = match command {
            Command::Add(user) => {
                store
                    .add_user_with(user, |users| rendered = render(users, format))
                    .map_err(|e| e.to_string())?;
                "After adding"
            }
            Command::AddJson(value) => {
                store
                    .add_user_value(&value, |users| rendered = render(users, format))
                    .map_err(|e| e.to_string())?;
                "After adding"
            }
            Command::Remove(id) => {
                store
                    .remove_user_with(id, |users| rendered = render(users, format))
                    .map_err(|e| e.to_string())?;
                "After removing"
            }
            Command::RemoveJson(value) => {
                store
                    .remove_user_value(&value, |users| rendered = render(users, format))
                    .map_err(|e| e.to_string())?;
                "After removing"
            }
            Command::List => {
                rendered = render(&store.users().map_err(|e| e.to_string())?, format);
                "Users store"
            }
        };
        writeln!(out, "{} {}", label, rendered?).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// The walkthrough: add Harry, remove him, remove John (absent), show the store.
fn run_demo<W: Write>(format: OutputFormat, out: &mut W) -> Result<(), String> {
    let store = UserStore::new(InMemoryDatabase::new());
    let harry = User::new(0, "Harry");
    let john = User::new(1, "John");
    let script = vec![
        Command::Add(harry.clone()),
        Command::Remove(harry.id),
        Command::Remove(john.id),
        Command::List,
    ];
    run_script(&store, script, format, out)?;
    writeln!(out, "Finished running program").map_err(|e| e.to_string())
}

fn init_tracing(cfg: &Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match cfg.log_format {
        LogFormat::Json => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(fmt::time::SystemTime)
                        .with_writer(io::stderr),
                )
                .init();
        }
        LogFormat::Pretty => {
            registry
                .with(fmt::layer().pretty().with_target(true).with_writer(io::stderr))
                .init();
        }
    }
}

fn run() -> Result<(), String> {
    let cfg = Config::from_env().map_err(|e| e.to_string())?;
    init_tracing(&cfg);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let first = args.first().cloned();

    match first.as_deref() {
        None => {
            print_usage();
            Ok(())
        }
        Some("demo") if args.len() == 1 => {
            tracing::info!("running demo");
            run_demo(cfg.output_format, &mut out)
        }
        Some(_) => {
            let commands = parse_commands(args)?;
            tracing::info!(commands = commands.len(), "running script");
            let store = UserStore::new(InMemoryDatabase::new());
            run_script(&store, commands, cfg.output_format, &mut out)
        }
    }
}

fn main() {
    if let Err(msg) = run() {
        eprintln!("error: {}", msg);
        process::exit(1);
    }
}
