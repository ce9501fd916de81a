use clap::{Parser, Subcommand};
use moodify::Provider;
use moodify::core::config::{self, CliOverrides};
use moodify::core::persona::Persona;
use moodify::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::process::exit;

#[derive(Parser)]
#[command(name = "moodify", about = "Chat with a language model from your terminal")]
struct Args {
    /// Enable debug logging in moodify.log
    #[arg(short, long, global = true)]
    debug: bool,

    /// LLM provider to use (overrides config and MOODIFY_PROVIDER)
    #[arg(short, long, value_enum, global = true)]
    provider: Option<Provider>,

    /// Model name to request (overrides config and MOODIFY_MODEL)
    #[arg(short, long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start a roasting session
    Roast,
    /// Start a praising session
    Praise,
    /// Start a plain chat session (the default)
    Chat {
        /// System prompt for this session
        #[arg(short, long)]
        system: Option<String>,
    },
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to moodify.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Ok(log_file) = File::create("moodify.log") {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    let (persona, system_prompt) = match args.command {
        Some(Command::Roast) => (Persona::Roast, None),
        Some(Command::Praise) => (Persona::Praise, None),
        Some(Command::Chat { system }) => (Persona::Chat, system),
        None => (Persona::Chat, None),
    };

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("moodify: {e}");
            exit(1);
        }
    };

    let overrides = CliOverrides {
        provider: args.provider,
        model: args.model,
        persona,
        system_prompt,
    };
    let resolved = config::resolve(&file_config, &overrides);

    log::info!(
        "Moodify starting up: provider={:?}, model={}, persona={:?}",
        resolved.provider,
        resolved.model_name,
        resolved.persona
    );

    let client = match tui::build_client(&resolved) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Startup failed: {}", e);
            eprintln!("moodify: {e}");
            exit(1);
        }
    };

    tui::run(&resolved, client)
}
