use std::process::ExitCode;

use chatterbox::ChatSession;
use chatterbox::storage::FileStore;
use chatterbox_term::app;
use chatterbox_term::settings::{AppSettings, default_settings_path};
use chatterbox_term::view::TerminalView;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// 1. Logging to stderr, filtered by `RUST_LOG` (warnings by default)
/// 2. Settings from the user config dir (non-fatal if missing)
/// 3. Session over a file-backed log, greeting or stored history
/// 4. Line loop over stdin until `/quit` or end of input
#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = AppSettings::load(&default_settings_path());
    let storage_dir = settings.storage_dir();
    tracing::info!("storing messages under {:?}", storage_dir);

    let mut session = ChatSession::new(
        FileStore::new(storage_dir),
        TerminalView::new(std::io::stdout()),
        StdRng::from_entropy(),
        &settings.chat,
    );
    session.bootstrap();
    session.view_mut().notice("Type /help for commands.");

    match app::run(&mut session, BufReader::new(tokio::io::stdin())).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}
