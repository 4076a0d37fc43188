//! An HTTP gateway translating device uplink messages from the Aliyun IoT schema to the fogcloud schema.

mod cli;
pub mod config;
pub mod http;
pub mod log;

pub use cli::GatewayCommand;
pub use cli::GatewayOpt;
pub use cli::LogConfigArgs;
pub use cli::TranslateArgs;

use crate::config::GatewayConfig;
use aliyun_mapper_ext::DeviceIdentity;
use aliyun_mapper_ext::UplinkConverter;
use aliyun_mapper_ext::UplinkRequest;
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

pub const SERVICE_NAME: &str = "fog-gateway";

pub async fn run(gateway_opt: GatewayOpt) -> anyhow::Result<()> {
    let config = GatewayConfig::try_new(&gateway_opt.config_dir)?;
    log::log_init(SERVICE_NAME, &gateway_opt.log_args, &config)?;

    match gateway_opt.command.unwrap_or_default() {
        GatewayCommand::Run => serve(config).await,
        GatewayCommand::Translate(args) => translate(args),
    }
}

async fn serve(config: GatewayConfig) -> anyhow::Result<()> {
    // Built once, before any request is served
    let converter = Arc::new(UplinkConverter::default());
    info!(
        "Registered {} topic patterns and {} translation rules",
        converter.matcher().len(),
        converter.rules().len()
    );

    http::serve(&config.http, converter, shutdown_signal())
        .await
        .context("Failed to run the HTTP server")
}

fn translate(args: TranslateArgs) -> anyhow::Result<()> {
    let identity =
        DeviceIdentity::resolve(&args.product_key, &args.device_name, args.username.as_deref())?;
    let request = UplinkRequest {
        product_key: identity.product_key,
        device_name: identity.device_name,
        device_id: args.device_id,
        raw_topic: args.topic,
        raw_payload: args.payload,
    };

    let response = UplinkConverter::default().convert(&request)?;
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for the shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
