// Painel de Comércios - Web Server
// JSON API + server-rendered dashboard with Axum

use anyhow::{Context, Result};
use painel::server::{router, AppState};
use painel::{AnalyticsService, Config, MerchantStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("painel=info,tower_http=info")),
        )
        .init();

    println!("🌐 Painel de Comércios - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = Config::from_env().context("invalid configuration")?;

    let service = AnalyticsService::new(
        MerchantStore::new(config.data_file.clone()),
        config.cache_ttl,
        config.batch_size,
    );

    // Seed the data file on first start
    let seeded = service
        .ensure_seeded()
        .with_context(|| format!("failed to seed {}", config.data_file.display()))?;
    if seeded {
        println!("✓ Generated {} records into {:?}", config.batch_size, config.data_file);
    } else {
        println!("✓ Data file: {:?}", config.data_file);
    }
    println!("✓ Cache TTL: {:?}", config.cache_ttl);

    let app = router(AppState::new(service), &config.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    println!("\n🚀 Server running on http://{}", config.bind_addr);
    println!("   API: http://{}/top10-faturamento", config.bind_addr);
    println!("   UI:  http://{}", config.bind_addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
