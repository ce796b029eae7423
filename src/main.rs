use anyhow::Context;
use serde_json::json;
use std::sync::Arc;
use voicenote_sync::{
    application::{
        batch::BatchRequestScheduler,
        feed::{FeedHydrator, FeedItem},
        toggle::ToggleInteractionController,
    },
    config::SyncConfig,
    domain::interaction::{InteractionKind, InteractionStatus, InteractionSubject, RemoteInteractionService},
    infrastructure::{http::HttpInteractionService, monitoring::SyncMetrics},
    presentation::notifications::TracingNotifier,
};

const USAGE: &str = "usage: voicenote-sync <status|like|share> <note-id>...";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info,voicenote_sync=debug"))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, ids) = args.split_first().context(USAGE)?;
    if ids.is_empty() {
        anyhow::bail!(USAGE);
    }

    let config = SyncConfig::from_env()?;
    let service: Arc<dyn RemoteInteractionService> = Arc::new(HttpInteractionService::new(
        &config.api_url,
        config.api_token.clone(),
        config.request_timeout(),
    )?);
    let metrics = Arc::new(SyncMetrics::new());
    let scheduler =
        BatchRequestScheduler::with_metrics(service.clone(), config.scheduler(), metrics.clone());
    let notifier = Arc::new(TracingNotifier);

    match command.as_str() {
        "status" => {
            let hydrator = FeedHydrator::new(service, scheduler, config.session())
                .with_notifier(notifier)
                .with_metrics(metrics.clone());
            let items: Vec<FeedItem> = ids.iter().map(FeedItem::new).collect();
            for card in hydrator.load(&items).await {
                println!(
                    "{}",
                    json!({
                        "id": card.subject_id,
                        "like": card.like.state(),
                        "share": card.share.state(),
                    })
                );
            }
        }
        "like" | "share" => {
            let kind = if command == "like" {
                InteractionKind::Like
            } else {
                InteractionKind::Share
            };
            for id in ids {
                let controller = ToggleInteractionController::new(
                    InteractionSubject::new(id.as_str(), kind),
                    service.clone(),
                    config.session(),
                    InteractionStatus::default(),
                )
                .with_notifier(notifier.clone())
                .with_metrics(metrics.clone());
                controller.initialize_with(&scheduler).await;
                let outcome = controller.toggle().await;
                println!(
                    "{}",
                    json!({
                        "id": id,
                        "kind": kind,
                        "ok": outcome.is_ok(),
                        "state": controller.state(),
                    })
                );
            }
        }
        _ => anyhow::bail!(USAGE),
    }

    tracing::info!(metrics = ?metrics.snapshot(), "interaction sync finished");
    Ok(())
}
