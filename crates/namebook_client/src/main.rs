#![forbid(unsafe_code)]

use std::io::Write as _;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::{info, warn};
use namebook_client::repl::HELP;
use namebook_client::{
    parse_command, render_table, render_view, DraftField, HttpNamesApi, MetaTagTokenProvider,
    NameApp, ReplCommand,
};
use namebook_core::{default_log_level, init_logging, LogConfig};
use tokio::io::{AsyncBufReadExt, BufReader};

const DEFAULT_LOG_DIR_NAME: &str = "namebook-client-logs";

type App = NameApp<HttpNamesApi, MetaTagTokenProvider>;

#[derive(Debug, Parser)]
#[command(name = "namebook", version, about = "Terminal client for a Namebook server")]
struct Cli {
    /// Base URL of the server.
    #[arg(long, env = "NAMEBOOK_SERVER_URL", default_value = "http://127.0.0.1:8080")]
    server: String,

    /// trace|debug|info|warn|error
    #[arg(long, env = "NAMEBOOK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rolling log files.
    #[arg(long, env = "NAMEBOOK_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every registered name.
    List,
    /// Register one name, then print the view.
    Add { first: String, last: String },
    /// Line-based session; type `help` for commands.
    Interactive,
}

impl Cli {
    fn log_config(&self) -> LogConfig {
        let level = self
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        let dir = self
            .log_dir
            .clone()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME));
        LogConfig::new(level, dir)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // Logs only go to files here; stdout belongs to the rendered view.
    if let Err(err) = init_logging(&cli.log_config()) {
        eprintln!("logging disabled: {err}");
    }

    let api = HttpNamesApi::new(&cli.server).context("failed to build http client")?;
    let tokens = match api.fetch_token().await {
        Ok(tokens) => tokens,
        Err(err) => {
            warn!("event=token_fetch module=client status=error error={err}");
            MetaTagTokenProvider::default()
        }
    };
    info!("event=client_start module=client status=ok server={}", cli.server);

    let mut app = NameApp::new(api, tokens);
    app.load().await;

    match cli.command {
        Command::List => print!("{}", render_table(app.state().names())),
        Command::Add { first, last } => {
            app.change_field(DraftField::FirstName, first).await;
            app.change_field(DraftField::LastName, last).await;
            app.submit().await;
            print!("{}", render_view(app.state()));
            if let Some(banner) = app.state().error() {
                bail!("{}", banner.message);
            }
        }
        Command::Interactive => interactive(&mut app).await?,
    }
    Ok(())
}

async fn interactive(app: &mut App) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");

    loop {
        app.expire_errors(Instant::now()).await;
        print!("\n{}> ", render_view(app.state()));
        std::io::stdout().flush().context("stdout closed")?;

        let line = match app.next_dismiss_at() {
            Some(due) => tokio::select! {
                line = lines.next_line() => line,
                _ = tokio::time::sleep_until(tokio::time::Instant::from_std(due)) => {
                    println!();
                    continue;
                }
            },
            None => lines.next_line().await,
        };
        let Some(line) = line.context("failed to read stdin")? else {
            return Ok(());
        };

        match parse_command(&line) {
            Some(ReplCommand::Set(field, value)) => app.change_field(field, value).await,
            Some(ReplCommand::Submit) => app.submit().await,
            Some(ReplCommand::Dismiss) => app.dismiss_error().await,
            Some(ReplCommand::Reload) => app.load().await,
            Some(ReplCommand::Quit) => return Ok(()),
            None if line.trim().is_empty() => {}
            None => println!("{HELP}"),
        }
    }
}
