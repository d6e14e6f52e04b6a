#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use social_session::bootstrap::SessionBootstrap;
use social_session::config::{AuthDelays, SessionConfig};
use social_session::state::AppState;
use social_session::state::auth::AuthError;
use social_session::types::{ResolvedTheme, SignupForm, ThemePreference, User};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("not logged in")]
    NotLoggedIn,
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "social-session", about = "Session and theme state for the demo social network")]
struct Cli {
    /// Durable storage file.
    #[arg(long, env = "SESSION_STORAGE_PATH")]
    storage: Option<PathBuf>,

    /// Color scheme reported by the operating system.
    #[arg(long, env = "SYSTEM_COLOR_SCHEME")]
    system_scheme: Option<ResolvedTheme>,

    /// Skip the simulated network latency.
    #[arg(long)]
    no_delay: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Signup(SignupArgs),
    Logout,
    Whoami,
    Theme(ThemeCommand),
}

#[derive(Args, Debug)]
struct SignupArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    username: String,
    #[arg(long)]
    display_name: String,
    #[arg(long)]
    password: String,
    /// Defaults to `--password`.
    #[arg(long)]
    confirm_password: Option<String>,
}

#[derive(Args, Debug)]
struct ThemeCommand {
    #[command(subcommand)]
    command: Option<ThemeSubcommand>,
}

#[derive(Subcommand, Debug)]
enum ThemeSubcommand {
    Set { preference: ThemePreference },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!(error = %e, "failed to load .env");
        }
    }

    let cli = Cli::parse();
    let config = apply_overrides(&cli, SessionConfig::from_env());
    match execute(config, cli.command, &mut io::stdout().lock()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Command-line flags win over the environment.
fn apply_overrides(cli: &Cli, mut config: SessionConfig) -> SessionConfig {
    if let Some(path) = &cli.storage {
        config.storage_path.clone_from(path);
    }
    if let Some(scheme) = cli.system_scheme {
        config.system_scheme = scheme;
    }
    if cli.no_delay {
        config.delays = AuthDelays::none();
    }
    config
}

/// One application load: bootstrap, run `command`, tear down.
async fn execute(config: SessionConfig, command: Command, out: &mut impl Write) -> Result<(), CliError> {
    let bootstrap = SessionBootstrap::new(AppState::from_config(&config));
    let handle = bootstrap.initialize();
    let result = run(bootstrap.state(), command, out).await;
    handle.unsubscribe();
    result
}

async fn run(state: &AppState, command: Command, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        Command::Login { email, password } => {
            let user = state.auth.login(&email, &password).await?;
            writeln!(out, "logged in as {}", describe(&user))?;
        }
        Command::Signup(args) => {
            let form = SignupForm {
                confirm_password: args.confirm_password.unwrap_or_else(|| args.password.clone()),
                email: args.email,
                username: args.username,
                display_name: args.display_name,
                password: args.password,
            };
            let request = form.validate().map_err(AuthError::from)?;
            let user = state.auth.signup(request).await?;
            writeln!(out, "signed up as {}", describe(&user))?;
        }
        Command::Logout => {
            state.auth.logout();
            writeln!(out, "logged out")?;
        }
        Command::Whoami => {
            let user = state.auth.current_user().ok_or(CliError::NotLoggedIn)?;
            writeln!(out, "{}", describe(&user))?;
            if let Some(bio) = user.bio.as_deref().filter(|b| !b.is_empty()) {
                writeln!(out, "  {bio}")?;
            }
            writeln!(out, "  {} followers, {} following", user.followers.len(), user.following.len())?;
        }
        Command::Theme(theme) => {
            if let Some(ThemeSubcommand::Set { preference }) = theme.command {
                state.theme.set_theme(preference);
                // Resolve directly; the watcher may not run before exit.
                state.theme.set_resolved_theme(preference.resolve(state.system_scheme.current()));
            }
            let current = state.theme.state();
            writeln!(out, "theme: {} (resolved: {})", current.preference, current.resolved)?;
        }
    }
    Ok(())
}

fn describe(user: &User) -> String {
    format!("{} (@{}) <{}>", user.display_name, user.username, user.email)
}
