use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;

use handout::cli::{Cli, Commands};
use handout::core::supervisor::{self, RuntimeStatus};
use handout::core::{config, init_logger, stats, stats_reporter, web_server};
use handout::delivery::Asset;
use handout::storage::{self, Store};
use handout::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the distribution bot.
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (missing token, logging, bot
/// creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present, before any config
    // static is touched.
    let _ = dotenv();

    let cli = Cli::parse_args();

    match cli.command {
        Some(Commands::Stats) => print_stats(),
        Some(Commands::Run) | None => {
            init_logger(&config::LOG_FILE_PATH)?;
            run_bot().await
        }
    }
}

/// Print store statistics to stdout without starting the bot.
fn print_stats() -> Result<()> {
    let store = Store::load(config::STORE_PATH.as_str());
    let snapshot = stats::snapshot(&store);

    println!("Users registered: {}", snapshot.total_users);
    println!("Active today:     {}", snapshot.active_today);
    println!("Total downloads:  {}", snapshot.total_downloads);
    println!("Top downloaders:");
    println!("{}", stats::render_top(&snapshot.top_downloaders));

    Ok(())
}

/// Run the bot: store, asset probe, web surface, reporter, supervisor.
async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");

    // Missing token is the one fatal configuration error.
    let token = config::require_bot_token()?;

    let store_path = std::path::Path::new(config::STORE_PATH.as_str());
    storage::ensure_parent_dir(store_path)?;
    let store = Store::load(store_path).into_shared();

    // Availability is decided once here; /download trusts this flag for
    // the lifetime of the process.
    let asset = Arc::new(Asset::probe(config::ASSET_PATH.as_str()));
    let runtime = Arc::new(RuntimeStatus::new());

    let bot = create_bot(&token)?;
    let me = bot.get_me().await?;
    log::info!("authorized as @{}", me.username());

    setup_bot_commands(&bot).await?;

    {
        let store = store.lock().await;
        log::info!("{} user(s) in the store", store.total_users());
    }

    let deps = HandlerDeps::new(Arc::clone(&store), Arc::clone(&asset), Arc::clone(&runtime));
    let handler = schema(deps);

    // Webhook ingestion shares the handler tree with the polling path.
    let updates_tx = web_server::spawn_webhook_forwarder(handler.clone(), bot.clone(), me.clone());

    if *config::web::ENABLED {
        let state = web_server::WebState::new(
            Arc::clone(&store),
            Arc::clone(&runtime),
            Arc::clone(&asset),
            updates_tx,
        );
        let port = *config::web::PORT;
        tokio::spawn(async move {
            if let Err(e) = web_server::start_web_server(port, state).await {
                log::error!("status web server error: {}", e);
            }
        });
    } else {
        log::info!("status web server disabled (WEB_ENABLED=false)");
    }

    let _reporter = stats_reporter::start_stats_reporter(
        bot.clone(),
        Arc::clone(&store),
        *config::report::INTERVAL_HOURS,
    );

    log::info!("entering the messaging loop");

    // Connected/Disconnected supervisor: reconnect after every failure
    // with a fixed delay, forever.
    supervisor::run_forever(
        &runtime,
        || {
            let bot = bot.clone();
            let handler = handler.clone();
            async move {
                // Run the dispatcher on its own task so a panic inside it
                // surfaces as a join error instead of taking the process
                // down.
                let handle = tokio::spawn(async move {
                    let listener = Polling::builder(bot.clone())
                        .timeout(config::polling::timeout())
                        .drop_pending_updates()
                        .build();

                    Dispatcher::builder(bot, handler)
                        .dependencies(DependencyMap::new())
                        .enable_ctrlc_handler()
                        .build()
                        .dispatch_with_listener(
                            listener,
                            LoggingErrorHandler::with_custom_text("An error from the update listener"),
                        )
                        .await
                });

                handle
                    .await
                    .map_err(|e| anyhow::anyhow!("dispatcher task ended abnormally: {}", e))
            }
        },
        |delay| tokio::time::sleep(delay),
    )
    .await;

    Ok(())
}
