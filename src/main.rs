use anyhow::Result;
use powerprotect::{config::Config, telemetry::init_tracing, views::DashboardView, AppContext};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load()?;
    let ctx = AppContext::from_config(&cfg)?;

    info!(
        base_url = %ctx.api.base_url(),
        selected = ?ctx.selection.get(),
        "loading dashboard"
    );

    let stats = DashboardView::new(&ctx).load().await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
