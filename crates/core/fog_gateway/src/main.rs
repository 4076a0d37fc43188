use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let gateway_opt = fog_gateway::GatewayOpt::parse();
    fog_gateway::run(gateway_opt).await
}
