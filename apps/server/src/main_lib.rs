use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use worthline_core::{
    net_worth::{NetWorthService, NetWorthServiceTrait},
    positions::{PositionService, PositionServiceTrait},
    quotes::{QuoteService, QuoteServiceTrait},
    transactions::{TransactionService, TransactionServiceTrait},
    valuations::{ValuationService, ValuationServiceTrait},
};
use worthline_market_data::{FinnhubProvider, MarketDataProvider};
use worthline_storage_sqlite::{
    db, CategoryRepository, PositionRepository, SnapshotRepository, TransactionRepository,
    ValuationRepository,
};

use crate::config::Config;

pub struct AppState {
    pub valuation_service: Arc<dyn ValuationServiceTrait>,
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub position_service: Arc<dyn PositionServiceTrait>,
    pub quote_service: Arc<dyn QuoteServiceTrait>,
    pub net_worth_service: Arc<dyn NetWorthServiceTrait>,
}

pub fn init_tracing() {
    let log_format = std::env::var("WL_LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("text") {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    } else {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let valuation_repository = Arc::new(ValuationRepository::new(pool.clone(), writer.clone()));
    let transaction_repository =
        Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let category_repository = Arc::new(CategoryRepository::new(pool.clone(), writer.clone()));
    let position_repository = Arc::new(PositionRepository::new(pool.clone(), writer.clone()));
    let snapshot_repository = Arc::new(SnapshotRepository::new(pool.clone(), writer.clone()));

    let provider: Option<Arc<dyn MarketDataProvider>> = match &config.finnhub_api_key {
        Some(api_key) => {
            Some(Arc::new(FinnhubProvider::new(api_key.clone())) as Arc<dyn MarketDataProvider>)
        }
        None => {
            tracing::warn!("FINNHUB_API_KEY not set; positions are valued at average cost");
            None
        }
    };
    let quote_service: Arc<dyn QuoteServiceTrait> = Arc::new(QuoteService::new(provider));

    let valuation_service: Arc<dyn ValuationServiceTrait> =
        Arc::new(ValuationService::new(valuation_repository.clone()));
    let transaction_service: Arc<dyn TransactionServiceTrait> = Arc::new(TransactionService::new(
        transaction_repository.clone(),
        category_repository,
    ));
    let position_service: Arc<dyn PositionServiceTrait> = Arc::new(PositionService::new(
        position_repository.clone(),
        quote_service.clone(),
    ));
    let net_worth_service: Arc<dyn NetWorthServiceTrait> = Arc::new(NetWorthService::new(
        valuation_repository,
        transaction_repository,
        position_repository,
        snapshot_repository,
        quote_service.clone(),
    ));

    if config.seed_demo {
        let seeded = valuation_service.seed_demo_valuations().await?;
        tracing::info!("Demo seed inserted {} valuations", seeded);
    }

    let snapshots = net_worth_service.recompute_snapshots().await?;
    tracing::info!("Snapshot cache warmed with {} months", snapshots.len());

    Ok(Arc::new(AppState {
        valuation_service,
        transaction_service,
        position_service,
        quote_service,
        net_worth_service,
    }))
}
