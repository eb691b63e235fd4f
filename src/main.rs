use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use bubble::Mode;
use bubble::core::config::{self, Overrides};

#[derive(Parser)]
#[command(name = "bubble", about = "Chat bubble for a /api/chat backend")]
struct Args {
    /// Backend origin; requests go to <BASE_URL>/api/chat
    #[arg(long)]
    base_url: Option<String>,

    /// How the reply body is read
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Show replies as plain text, skipping the Markdown renderer
    #[arg(long)]
    plain: bool,

    /// Start with the chat panel open
    #[arg(long)]
    open: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to bubble.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("bubble.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            std::process::exit(1);
        }
    };

    let overrides = Overrides {
        base_url: args.base_url,
        mode: args.mode,
        plain: args.plain,
        open: args.open,
    };
    let resolved = config::resolve(&file_config, &overrides);

    log::info!(
        "Bubble starting up: {} ({}), markdown={}",
        resolved.base_url,
        resolved.mode.label(),
        resolved.markdown
    );

    bubble::tui::run(resolved)
}
