use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use self_defi::adapters::{select_gateway, LocalFileExporter};
use self_defi::application::{ChatLauncher, ChatWidget};
use self_defi::config::{AppConfig, LogFormat, RuntimeConfig};
use self_defi::domain::foundation::TopicContext;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.app);

    let gateway = select_gateway(&config.ai);
    tracing::info!(mode = %gateway.mode(), "Starting Self-Defi Security Guide");

    let (launcher, requests) = ChatLauncher::channel();
    let chat = Arc::new(ChatWidget::new(Arc::clone(&gateway), TopicContext::Home));
    let listener = {
        let chat = Arc::clone(&chat);
        tokio::spawn(async move { chat.listen(requests).await })
    };

    let app = cli::App {
        gateway,
        chat,
        launcher,
        exporter: LocalFileExporter::new(&config.export.output_dir),
    };
    let result = app.run().await;

    listener.abort();
    result?;
    Ok(())
}

/// Logs go to stderr so plan text on stdout stays clean.
fn init_tracing(runtime: &RuntimeConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&runtime.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match runtime.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
