// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use painel::{AnalyticsService, Config, MerchantStore};
use std::env;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = Config::from_env().context("invalid configuration")?;

    match args.get(1).map(String::as_str) {
        Some("seed") => run_seed(&config)?,
        Some("generate") => run_generate(&config)?,
        // Terminal dashboard (default)
        _ => run_ui_mode(&config)?,
    }

    Ok(())
}

fn service(config: &Config) -> AnalyticsService {
    AnalyticsService::new(
        MerchantStore::new(config.data_file.clone()),
        config.cache_ttl,
        config.batch_size,
    )
}

fn run_seed(config: &Config) -> Result<()> {
    println!("🗄️  Seed: merchant data file");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let service = service(config);
    println!("\n📂 Checking {:?}...", config.data_file);
    if service.ensure_seeded()? {
        println!("✓ Generated {} records", config.batch_size);
    } else {
        println!("✓ Data file already exists, nothing to do");
    }

    Ok(())
}

fn run_generate(config: &Config) -> Result<()> {
    println!("🎲 Generate: append {} merchants", config.batch_size);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let service = service(config);
    let result = service
        .generate()
        .with_context(|| format!("failed to append to {}", config.data_file.display()))?;

    println!("\n✓ {}", result.mensagem);
    println!("✓ Total records: {}", result.registros_gerados);
    println!("✓ Processing time: {}", result.tempo_processamento);

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    println!("🖥️  Loading Painel de Comércios...\n");
    println!("📡 API: {}", config.api_url);
    println!("Starting UI... (Press 'q' to quit)\n");

    ui::run_ui(&config.api_url)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the web UI: cargo run --bin painel-server --features server");
    std::process::exit(1);
}
