use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser as _;

use bookshelf::app::book_store::{BookStore, InMemoryBookStore};
use bookshelf::app::http::{AppState, router};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    let cli = bookshelf::cli::Cli::parse();
    bookshelf::logging::init(&cli.log_filter).context("init logging")?;
    tracing::debug!(?cli, "parsed cli");

    let book_store: Arc<dyn BookStore> = Arc::new(InMemoryBookStore::new());
    if let Some(path) = &cli.seed {
        let books = bookshelf::app::seed::load(path)?;
        let count = bookshelf::app::seed::apply(book_store.as_ref(), books)
            .await
            .context("seed books")?;
        tracing::info!(count, path = %path.display(), "seeded books");
    }

    let app = router(AppState::new(book_store));

    let listener = tokio::net::TcpListener::bind(cli.addr)
        .await
        .with_context(|| format!("bind {}", cli.addr))?;
    tracing::info!(addr = %cli.addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve http")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
