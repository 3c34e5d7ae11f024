#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use garment_schedule::{LoadOptions, PlannerConfig, http_api, logging};

    let config = PlannerConfig::load(LoadOptions::default())?;
    logging::init(&config.logging);
    let addr = config.bind_address()?;
    let store = config.open_store()?;

    println!("garment-schedule HTTP API listening on http://{addr}");
    let state = http_api::AppState::new(store, config.lead_times.clone());
    http_api::serve(addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
