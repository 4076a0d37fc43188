use crate::config::HttpConfig;
use crate::http::error::HttpServerError;
use crate::http::router::gateway_router;
use aliyun_mapper_ext::UplinkConverter;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Serve the uplink translation endpoint until the shutdown future completes
pub async fn serve(
    config: &HttpConfig,
    converter: Arc<UplinkConverter>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), HttpServerError> {
    let listener = TcpListener::bind(config.socket_addr()).await?;
    info!(
        "Listening for uplink messages on http://{}{}",
        listener.local_addr()?,
        config.path
    );

    let app = gateway_router(converter, &config.path);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
