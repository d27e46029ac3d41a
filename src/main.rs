use clap::Parser;
use tracing_subscriber::EnvFilter;

use docchat::app::Application;
use docchat::cli::Args;
use docchat::commands::create_command_registry;
use docchat::config::{Config, Provider};
use docchat::core::error::DocChatError;
use docchat::display;
use docchat::providers::factory::ProviderFactory;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        display::display_error(&e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), DocChatError> {
    let config = Config::load()?;

    let provider_kind = match &args.provider {
        Some(name) => Provider::from_str(name)
            .ok_or_else(|| DocChatError::Config(format!("Unknown provider: {}", name)))?,
        None => config.active_provider.unwrap_or_default(),
    };

    let mut provider_config = config.provider_config(provider_kind)?;
    if let Some(model) = &args.model {
        provider_config.model = Some(model.clone());
    }
    let model = provider_config
        .model
        .clone()
        .unwrap_or_else(|| provider_kind.default_model().to_string());

    let provider = ProviderFactory::new().create(&provider_kind, &provider_config)?;
    let command_dispatcher = create_command_registry();

    let mut app = Application::new(args, provider, command_dispatcher, model);
    app.run().await
}
