use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use opsh_application::{
    AuthOutcome, AuthSetup, Console, CtrlC, SessionLoop, SessionServices, Tone, UrlOpener,
};
use opsh_core::PlatformProfile;
use opsh_core::config::ConfigService;
use opsh_core::secret::SecretService;
use opsh_execution::ShellExecutor;
use opsh_execution::logging::init_logging;
use opsh_infrastructure::{ConfigServiceImpl, Installation, OpshPaths, SecretServiceImpl};
use opsh_interaction::{CommandResolver, GeminiApiAgent, RetryPolicy};

mod console;

use console::ReadlineConsole;

#[derive(Parser)]
#[command(name = "opsh", version)]
#[command(about = "OpenSH - talk to your terminal in plain English", long_about = None)]
struct Cli {
    /// Translate and run a single request, then exit
    #[arg(short = 'c', long = "command", value_name = "WORDS", num_args = 1..)]
    command: Option<Vec<String>>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Held until exit so buffered log lines are flushed
    let _log_guard = OpshPaths::logs_dir().ok().and_then(|dir| init_logging(&dir));

    let profile = PlatformProfile::detect();
    tracing::info!(platform = %profile.name, shell = profile.shell_name(), "Starting opsh");

    let secrets: Arc<dyn SecretService> =
        Arc::new(SecretServiceImpl::new().context("Failed to locate secret file")?);
    let config_service: Arc<dyn ConfigService> =
        Arc::new(ConfigServiceImpl::new().context("Failed to locate config file")?);
    let config = config_service.load_config().unwrap_or_else(|e| {
        tracing::warn!("Using default config: {}", e);
        Default::default()
    });

    let opener: UrlOpener = {
        let profile = profile.clone();
        Arc::new(move |url: &str| opsh_execution::open_url(&profile, url))
    };
    let auth = AuthSetup::new(secrets.clone(), config_service.clone(), opener);
    let mut console = ReadlineConsole::new().context("Failed to initialize line editor")?;

    if !config.is_configured() {
        console.blank_line();
        console.print(Tone::Heading, "🚀 Welcome to OpenSH!");
        console.print(Tone::Plain, "Talk to your terminal in plain English.");
        if auth.run(&mut console)? != AuthOutcome::Configured {
            console.print(Tone::Error, "Authentication required to use OpenSH.");
            return Ok(ExitCode::FAILURE);
        }
    }

    if !auth.has_api_key() {
        console.print(Tone::Warning, "No valid authentication. Let's set it up:");
        auth.run(&mut console)?;
        if !auth.has_api_key() {
            console.print(Tone::Error, "Couldn't authenticate. Please try again.");
            return Ok(ExitCode::FAILURE);
        }
    }

    // A model pinned in secret.json wins over config.toml
    let model = secrets
        .load_secrets()
        .ok()
        .and_then(|s| s.gemini)
        .and_then(|g| g.model_name)
        .unwrap_or_else(|| config.model.clone());
    let translator = Arc::new(GeminiApiAgent::new(secrets.clone()).with_model(model));

    let services = SessionServices {
        runner: Arc::new(ShellExecutor::new(profile.clone()).with_timeout(config.command_timeout())),
        resolver: CommandResolver::new(translator, RetryPolicy::from_config(&config)),
        auth,
        installation: Installation::for_profile(&profile),
        interrupt: Arc::new(CtrlC),
    };
    let mut session = SessionLoop::new(console, profile, services);

    if let Some(words) = cli.command {
        let request = words.join(" ");
        session.run_once(&request).await;
        return Ok(ExitCode::SUCCESS);
    }

    let summary = session.run().await;
    tracing::info!("{}", summary);
    Ok(ExitCode::SUCCESS)
}
