//! `hubigr` command-line client: one action per invocation against the
//! profile API, with the token persisted between runs.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use hubigr_api::{ApiGateway, DEFAULT_API_BASE, ReqwestTransport};
use hubigr_app::{AppError, ControllerConfig, ProfileController, redact_sensitive};
use hubigr_core::{AvatarFile, SignupForm, SystemClock};
use hubigr_session::FileTokenStore;
use hubigr_ui::render::render_text;

#[derive(Debug, Parser)]
#[command(name = "hubigr", version = hubigr_app::APP_VERSION, about = "Account and profile client")]
struct Cli {
    /// API root, e.g. http://localhost:8080/api/v1
    #[arg(long, env = "HUBIGR_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,
    /// File holding the bearer token between runs
    #[arg(long, env = "HUBIGR_TOKEN_FILE", default_value = ".hubigr_token")]
    token_file: PathBuf,
    /// Check forms locally before sending them
    #[arg(long, env = "HUBIGR_STRICT_VALIDATION")]
    strict_validation: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and remember the token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "HUBIGR_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        nick: String,
        #[arg(long, env = "HUBIGR_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to --password
        #[arg(long)]
        confirm_password: Option<String>,
        #[arg(long)]
        agree_terms: bool,
        /// Token issued by the captcha widget
        #[arg(long)]
        captcha_token: Option<String>,
    },
    /// Confirm an email address with the emailed token
    Verify { token: String },
    /// Show the current profile
    Profile,
    /// Change nick and bio
    Edit {
        #[arg(long)]
        nick: String,
        #[arg(long, default_value = "")]
        bio: String,
    },
    /// Upload a JPEG or PNG avatar
    Avatar { path: Option<PathBuf> },
    /// Show submissions, loaded with the profile at startup
    Submissions,
    /// Forget the stored token
    Logout,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("command failed: {}", redact_sensitive(&error.to_string()));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    log::info!(
        "startup version={} api_base={}",
        hubigr_app::app_version(),
        cli.api_base
    );

    let gateway = ApiGateway::new(cli.api_base, ReqwestTransport::new())?;
    let config = ControllerConfig {
        strict_validation: cli.strict_validation,
        ..ControllerConfig::default()
    };
    let mut controller = ProfileController::new(
        gateway,
        FileTokenStore::new(cli.token_file),
        SystemClock,
        config,
    );

    controller.start().await;

    let outcome = match cli.command {
        Command::Login { email, password } => controller.login(&email, &password).await,
        Command::Signup {
            email,
            nick,
            password,
            confirm_password,
            agree_terms,
            captcha_token,
        } => {
            if let Some(token) = captcha_token {
                controller.on_challenge_complete(token);
            }
            controller.show_signup();
            let confirm_password = confirm_password.unwrap_or_else(|| password.clone());
            controller
                .signup(SignupForm {
                    email,
                    nick,
                    password,
                    confirm_password,
                    agree_terms,
                })
                .await
        }
        Command::Verify { token } => {
            controller.show_verify();
            controller.verify_email(&token).await
        }
        Command::Profile | Command::Submissions => Ok(()),
        Command::Edit { nick, bio } => match controller.edit_profile() {
            Ok(()) => controller.update_profile(&nick, &bio).await,
            Err(error) => Err(error),
        },
        Command::Avatar { path } => match read_avatar(path).await {
            Ok(file) => controller.upload_avatar(file).await.map(|_| ()),
            Err(error) => Err(error),
        },
        Command::Logout => {
            controller.logout();
            Ok(())
        }
    };

    println!("{}", render_text(&controller.view_model()));
    outcome
}

async fn read_avatar(path: Option<PathBuf>) -> Result<Option<AvatarFile>, AppError> {
    let Some(path) = path else {
        return Ok(None);
    };

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| AppError::AvatarRead {
            path: path.clone(),
            source,
        })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "avatar".to_string());

    Ok(Some(AvatarFile::new(file_name, bytes)))
}
