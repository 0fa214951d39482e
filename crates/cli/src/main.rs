use anyhow::Context;
use clap::{Parser, Subcommand};

use folio_app::App;
use folio_authz::AuthGuard;
use folio_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "folio", version, about = "Publisher catalogue and admin content service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Issue an admin token offline, exactly as the login endpoint would
    Token {
        #[arg(long)]
        secret: String,
    },
    /// Load and validate configuration, then print a redacted summary
    CheckConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().with_context(|| "failed to load Folio settings")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(settings),
        Command::Token { secret } => {
            let token = AuthGuard::from_settings(&settings.auth)
                .login(&secret)
                .context("token not issued")?;
            println!("{}", token);
            Ok(())
        }
        Command::CheckConfig => {
            print_summary(&settings);
            Ok(())
        }
    }
}

fn serve(settings: Settings) -> anyhow::Result<()> {
    folio_telemetry::init(&settings.telemetry)?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(App::new(settings).serve())
}

fn print_summary(settings: &Settings) {
    let set = |value: &Option<String>| {
        if value.as_deref().is_some_and(|v| !v.is_empty()) {
            "set"
        } else {
            "unset"
        }
    };

    println!("environment: {:?}", settings.environment);
    println!(
        "server: {}:{} base_path='{}' timeout={}ms body_limit={}B",
        settings.server.host,
        settings.server.port,
        settings.server.base_path,
        settings.server.request_timeout_ms,
        settings.server.body_limit_bytes
    );
    println!(
        "database: {} (name {})",
        if settings.database.configured_uri().is_some() {
            "configured"
        } else {
            "unconfigured, sample data"
        },
        settings.database.name
    );
    println!(
        "auth: mode={:?} admin_secret={} token_secret={}",
        settings.auth.mode,
        set(&settings.auth.admin_secret),
        set(&settings.auth.token_secret)
    );
    println!(
        "media: cloud_name={} api_key={} api_secret={} upload_preset={} folder={}",
        set(&settings.media.cloud_name),
        set(&settings.media.api_key),
        set(&settings.media.api_secret),
        set(&settings.media.upload_preset),
        settings.media.folder
    );
    println!(
        "telemetry: format={:?} filter={}",
        settings.telemetry.log_format, settings.telemetry.log_filter
    );
}
