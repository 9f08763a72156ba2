use chrono::Duration as RetentionWindow;
use eco_swap::catalog::JsonCatalogLoader;
use eco_swap::config::{load_config, AppConfig};
use eco_swap::extractor::extract_from_url;
use eco_swap::fetcher::{HttpFetcher, PageFetcher};
use eco_swap::matcher::MatcherImpl;
use eco_swap::model::ExtractError;
use eco_swap::service::{BackgroundService, Request, Response, ServiceHandle};
use eco_swap::storage::SqliteStorage;
use eco_swap::utils::debug_dump_name;
use eco_swap::view::{AlternativeRow, ViewState};
use futures::future::join_all;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    let config_path = std::env::var("ECOSWAP_CONFIG").unwrap_or_else(|_| "config.json".to_string());
    let config = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let urls = if args.is_empty() {
        config.product_urls.clone()
    } else {
        args
    };
    if urls.is_empty() {
        warn!("No product URLs given on the command line or in {}", config_path);
        return;
    }

    let storage = match SqliteStorage::new(
        &config.database_path,
        RetentionWindow::days(i64::from(config.retention_days)),
    ) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            return;
        }
    };

    if let Err(e) = storage.clear_old_product_data() {
        warn!("Failed to purge old product data: {}", e);
    }

    let fetcher = match HttpFetcher::new(
        &config.user_agent,
        Duration::from_secs(config.request_timeout_seconds),
    ) {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };

    let matcher = MatcherImpl::new(JsonCatalogLoader::new(&config.catalog_path));
    let service = BackgroundService::new(matcher, storage).spawn(32);

    info!("Scanning {} product pages...", urls.len());
    let tasks: Vec<_> = urls
        .iter()
        .map(|url| process_url(url, &fetcher, &service, &config))
        .collect();
    join_all(tasks).await;

    show_saved(&service).await;
}

/// Fetches one product page, extracts the product, ranks alternatives and prints the view.
async fn process_url(url: &str, fetcher: &HttpFetcher, service: &ServiceHandle, config: &AppConfig) {
    info!("Fetching {}", url);
    let html = match fetcher.fetch(url).await {
        Ok(html) => html,
        Err(e) => {
            warn!("Fetch error for {}: {}", url, e);
            return;
        }
    };

    let product = match extract_from_url(url, &html) {
        Ok(p) => p,
        Err(e @ ExtractError::MissingProductId(_)) | Err(e @ ExtractError::Selector(_)) => {
            log_and_save_html(&html, url);
            warn!("Extraction error: {}", e);
            return;
        }
        Err(e) => {
            warn!("Skipping {}: {}", url, e);
            return;
        }
    };

    let ranked = match service.send(Request::ScanProduct(product.clone())).await {
        Ok(Response::Alternatives(ranked)) => ranked,
        Ok(Response::Error(msg)) => {
            warn!("{}", msg);
            return;
        }
        Ok(other) => {
            warn!("Unexpected response: {:?}", other);
            return;
        }
        Err(e) => {
            error!("Service error: {}", e);
            return;
        }
    };
    info!("Found {} eco-friendly alternatives!", ranked.len());

    let saved_ids: HashSet<String> = match service.send(Request::GetSavedAlternatives).await {
        Ok(Response::Saved(saved)) => saved.into_iter().map(|s| s.candidate.id).collect(),
        _ => HashSet::new(),
    };

    let view = ViewState::build(
        Some(&product),
        &ranked,
        config.category_filter.clone(),
        config.sort_by,
        &saved_ids,
    );
    println!("{}", view.render_text());
}

async fn show_saved(service: &ServiceHandle) {
    match service.send(Request::GetSavedAlternatives).await {
        Ok(Response::Saved(saved)) if !saved.is_empty() => {
            println!("Saved alternatives:");
            for row in AlternativeRow::saved_rows(&saved) {
                println!(
                    "  {} ({}) - {} saved {}",
                    row.name,
                    row.brand,
                    row.price,
                    row.saved_at.unwrap_or_default()
                );
            }
        }
        Ok(_) => {}
        Err(e) => warn!("Could not load saved alternatives: {}", e),
    }
}

/// Logs and saves the provided HTML for debugging purposes.
fn log_and_save_html(html: &str, url: &str) {
    let folder = Path::new("logs/html");
    if let Err(e) = fs::create_dir_all(folder) {
        warn!("Failed to create debug folder: {}", e);
        return;
    }
    let filename = folder.join(debug_dump_name(url));
    if let Err(e) = fs::write(&filename, html) {
        warn!("Failed to write debug HTML: {}", e);
    } else {
        info!("Saved debug HTML: {}", filename.display());
    }
}
