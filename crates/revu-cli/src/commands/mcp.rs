use anyhow::Result;
use revu_config::Config;

pub async fn handle(config: &Config) -> Result<()> {
    let engine = super::build_engine(config)?;
    tracing::info!("starting MCP server on stdio");
    revu_mcp::run_stdio(engine).await
}
