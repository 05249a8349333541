use std::sync::Arc;

use anyhow::Context;

use bookshelf_app::{build_registry, scheduler, seed};
use bookshelf_db::Store;
use bookshelf_kernel::{settings::Settings, InitCtx};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "bookshelf bootstrap starting"
    );

    let store = Arc::new(
        Store::connect(&settings.database.url)
            .await
            .with_context(|| "failed to open store")?,
    );

    if settings.database.seed {
        seed::run(&store).await?;
    }

    let registry = build_registry(&store);
    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;

    scheduler::spawn(store.clone(), &settings.scheduler);

    tracing::info!("bookshelf bootstrap complete");
    bookshelf_http::start_server(&registry, &settings).await
}
