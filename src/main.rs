use alloy_provider::{Provider, ProviderBuilder};
use serde::Serialize;
use std::sync::Arc;
use ticklens::{
    TickInfo,
    config::LensConfig,
    lens::get_ticks_with_concurrency,
    pool::uniswap_v3::UniswapV3TickSource,
};
use tracing_subscriber::EnvFilter;

type DynProvider = dyn Provider + Send + Sync;

#[derive(Serialize)]
struct TickReport {
    #[serde(flatten)]
    info: TickInfo,
    packed: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = LensConfig::from_env()?;
    tracing::info!(
        pool = ?config.pool,
        rpc = %config.rpc_url,
        range = config.range_multiplier,
        "Starting ticklens..."
    );

    let provider = ProviderBuilder::new().connect_http(config.rpc_url.clone());
    let provider_arc: Arc<DynProvider> = Arc::new(provider);

    let block = match config.block {
        Some(block) => block,
        None => provider_arc.get_block_number().await?,
    };
    let source = UniswapV3TickSource::new(config.pool, provider_arc).at_block(block);

    tracing::info!(block, "Querying initialized ticks");

    let packed = get_ticks_with_concurrency(
        &source,
        config.range_multiplier,
        config.max_concurrent_reads,
    )
    .await?;
    tracing::info!("Found {} initialized ticks.", packed.len());

    let report: Vec<TickReport> = packed
        .iter()
        .map(|p| TickReport {
            info: p.unpack(),
            packed: p.to_string(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
