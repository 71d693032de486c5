pub mod args;
mod setup;

pub use args::AppArgs;

use anyhow::Result;
use tracing::info;

pub async fn launch() -> Result<()> {
    launch_with_args(AppArgs::from_cli()).await
}

pub async fn launch_with_args(args: AppArgs) -> Result<()> {
    let setup::PreparedApp {
        port,
        relay,
        registry,
    } = setup::prepare(args)?;

    info!("log relay ready, history capacity {}", crate::relay::HISTORY_CAPACITY);

    crate::web::start_server(relay, registry, port).await
}
