use anyhow::Context;
use folio_app::App;
use folio_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Folio settings")?;
    folio_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        database = settings.database.configured_uri().is_some(),
        "folio-app starting"
    );

    App::new(settings).serve().await
}
