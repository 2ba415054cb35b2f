use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::info;

use ecotip_core::EcotipConfig;
use ecotip_scheduler::{recover_all, ScheduleEngine};
use ecotip_store::ReminderStore;
use ecotip_telegram::{Bot, BotContext, BotSender, TelegramAdapter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ecotip_bot=info,ecotip_store=info,ecotip_scheduler=info,ecotip_telegram=info"
                    .into()
            }),
        )
        .init();

    // load config: explicit path via ECOTIP_CONFIG > ~/.ecotip/ecotip.toml
    let config_path = std::env::var("ECOTIP_CONFIG").ok();
    let config = EcotipConfig::load(config_path.as_deref())?;

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL;")?;
    ecotip_store::db::init_db(&db)?;
    info!("database schema ready");

    let store = Arc::new(ReminderStore::new(Arc::new(Mutex::new(db))));
    let catalog = Arc::new(config.tips.to_catalog()?);
    info!(tips = catalog.len(), "tip catalog loaded");

    let bot = Bot::new(&config.telegram.bot_token);
    let sender = Arc::new(BotSender::new(bot.clone()));
    let engine = ScheduleEngine::new(
        Arc::clone(&store),
        catalog,
        sender,
        Duration::from_secs(config.delivery.timeout_secs),
    );

    // Rebuild every pending timer from the database before the dialog
    // starts accepting new preference writes.
    let report = recover_all(&store, &engine)?;
    info!(armed = report.armed, skipped = report.skipped, "schedules recovered");

    let ctx = Arc::new(BotContext { store, engine });
    TelegramAdapter::new(bot, ctx).run().await;

    Ok(())
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
