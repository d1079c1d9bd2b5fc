use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use skinpredict_application::{AnalysisCompletion, ScanSessionController, SessionServices};
use skinpredict_core::SkinError;
use skinpredict_core::config::SkinPredictConfig;
use skinpredict_core::knowledge::KnowledgeBase;
use skinpredict_core::session::ScanHistoryRepository;
use skinpredict_core::user::AuthService;
use skinpredict_infrastructure::{
    ConfigService, JsonHistoryRepository, LocalAuthService, MemoryHistoryRepository, SkinPaths,
    upload,
};
use skinpredict_interaction::{HttpSkinGateway, locator_from_config};

mod commands;
mod helper;
mod render;

use commands::Command;
use helper::CliHelper;

#[derive(Parser)]
#[command(name = "skinpredict")]
#[command(about = "SkinPredict - skin analysis and skincare chat in your terminal", long_about = None)]
struct Cli {
    /// Keep config, login and history under this directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep scan history in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Analysis backend base URL (overrides config and environment)
    #[arg(long)]
    api_url: Option<String>,
}

/// Logs go to a daily file so they never interleave with the chat.
fn init_logging(logs_dir: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(logs_dir, "skinpredict.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env("SKINPREDICT_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}

struct App {
    controller: ScanSessionController,
    auth: LocalAuthService,
    config: SkinPredictConfig,
}

impl App {
    async fn sync_user(&mut self) -> Result<()> {
        let user = self.auth.current_user().await?;
        self.controller.set_user(user.map(|user| user.uid));
        Ok(())
    }

    fn show_session(&self) {
        let analysis = self.controller.session().analysis();
        for message in self.controller.messages() {
            render::message(message, analysis);
        }
        render::suggestions(self.controller.suggestions());
    }

    fn signed_in(&self) -> bool {
        if self.controller.user_id().is_some() {
            return true;
        }
        render::info("Please sign in first: /login <email> [name]");
        false
    }

    async fn say(&mut self, text: &str) -> Result<()> {
        if !self.signed_in() {
            return Ok(());
        }
        let reply = self.controller.send_message(text).await?;
        render::message(&reply, self.controller.session().analysis());
        render::suggestions(&reply.suggestions);
        Ok(())
    }

    async fn scan(&mut self, path: &Path) -> Result<()> {
        if !self.signed_in() {
            return Ok(());
        }
        let image = upload::load_image(path, self.config.max_upload_bytes).await?;
        render::info("Analyzing your photo...");
        match self.controller.analyze(image).await? {
            AnalysisCompletion::Ready { session_id } => {
                tracing::info!("[Readline] Scan {} finished", session_id);
                self.show_session();
            }
            AnalysisCompletion::Failed(error) => {
                tracing::warn!("[Readline] Analysis failed: {}", error);
                if let Some(message) = self.controller.messages().last() {
                    render::message(message, None);
                }
            }
            AnalysisCompletion::Stale => {}
        }
        Ok(())
    }

    /// Runs one command. Returns `false` when the REPL should stop.
    async fn handle(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Quit => return Ok(false),
            Command::Help => render::help(),
            Command::Login {
                email,
                display_name,
            } => {
                let user = self.auth.sign_in(&email, display_name.as_deref()).await?;
                self.sync_user().await?;
                println!("{}", format!("Welcome, {}!", user.greeting_name()).bright_green());
                self.show_session();
            }
            Command::Logout => {
                self.controller.flush().await;
                self.auth.sign_out().await?;
                self.sync_user().await?;
                render::info("Signed out.");
            }
            Command::WhoAmI => match self.auth.current_user().await? {
                Some(user) => println!("{} <{}>", user.greeting_name(), user.email),
                None => render::info("Not signed in."),
            },
            Command::Scan(path) => self.scan(&path).await?,
            Command::New => {
                self.controller.new_scan();
                self.show_session();
            }
            Command::History => {
                if self.signed_in() {
                    render::history(&self.controller.history_overview().await?);
                }
            }
            Command::Stats => {
                if self.signed_in() {
                    render::stats(&self.controller.history_overview().await?);
                }
            }
            Command::Open(session_id) => {
                if self.signed_in() {
                    self.controller.load_history(&session_id).await?;
                    self.show_session();
                }
            }
            Command::Chip(index) => {
                let chip = index
                    .checked_sub(1)
                    .and_then(|i| self.controller.suggestions().get(i))
                    .cloned();
                match chip {
                    Some(chip) => {
                        println!("{}", format!("> {chip}").green());
                        self.say(&chip).await?;
                    }
                    None => self.say(&index.to_string()).await?,
                }
            }
            Command::Say(text) => self.say(&text).await?,
            Command::Usage(usage) => render::info(&format!("Usage: {usage}")),
            Command::Unknown(name) => {
                render::info(&format!("Unknown command {name}. Type /help for the list."))
            }
        }
        Ok(true)
    }
}

fn describe(error: &anyhow::Error) -> String {
    match error.downcast_ref::<SkinError>() {
        Some(SkinError::Unauthenticated) => "Please sign in first: /login <email> [name]".into(),
        Some(SkinError::InvalidInput(message)) | Some(SkinError::InvalidState(message)) => {
            message.clone()
        }
        Some(SkinError::NotFound { id, .. }) => format!("No scan with id {id}."),
        _ => format!("Error: {error:#}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match &cli.data_dir {
        Some(dir) => SkinPaths::with_base(dir),
        None => SkinPaths::resolve().context("cannot locate the home directory")?,
    };
    std::fs::create_dir_all(paths.logs_dir())
        .with_context(|| format!("cannot create {}", paths.logs_dir().display()))?;
    let _log_guard = init_logging(&paths.logs_dir());

    let mut config = ConfigService::new(paths.config_file()).get_config();
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }
    tracing::info!("[Readline] Using analysis backend at {}", config.api_base_url);

    let repository: Arc<dyn ScanHistoryRepository> = if cli.ephemeral {
        Arc::new(MemoryHistoryRepository::new())
    } else {
        Arc::new(JsonHistoryRepository::new(paths.history_dir()))
    };
    let services = SessionServices {
        gateway: Arc::new(HttpSkinGateway::from_config(&config)),
        locator: locator_from_config(&config),
        repository,
        knowledge: Arc::new(KnowledgeBase::new()),
    };

    let mut app = App {
        controller: ScanSessionController::new(services, &config),
        auth: LocalAuthService::new(paths.auth_file()),
        config,
    };
    app.sync_user().await?;

    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== SkinPredict ===".bright_magenta().bold());
    render::info("Type /help for commands, a number to pick a suggestion, or /quit to exit.");
    println!();
    if app.controller.user_id().is_some() {
        app.show_session();
    } else {
        render::info("Sign in to start: /login <email> [name]");
    }

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match app.handle(Command::parse(trimmed)).await {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(error) => {
                        tracing::warn!("[Readline] Command failed: {:#}", error);
                        render::error(&describe(&error));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                render::error(&format!("Error: {err:?}"));
                break;
            }
        }
    }

    app.controller.shutdown().await;
    println!("{}", "Goodbye!".bright_green());
    Ok(())
}
