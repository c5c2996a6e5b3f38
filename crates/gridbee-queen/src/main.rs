//! Queen Node binary
//!
//! The Gridbee hive coordinator.

use gridbee_queen::{QueenConfig, QueenNode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "queen_node=info,gridbee=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Queen Node");

    let config = QueenConfig::from_env();

    let node = QueenNode::new(config);
    node.run().await?;

    Ok(())
}
