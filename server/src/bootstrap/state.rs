use std::sync::Arc;
use std::time::Duration as StdDuration;

use sqlx::{PgPool, postgres::PgPoolOptions};
use time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::warn;

use careerdesk_adapters::outgoing::{
    http_reqwest::match_runner_reqwest::HttpMatchRunnerAdapter,
    postgres_sqlx::{
        credit_store_postgres::PostgresCreditStoreAdapter,
        match_cache_store_postgres::PostgresMatchCacheStoreAdapter,
    },
    tokio_spawn::TokioDelayAdapter,
};
use careerdesk_adapters::shared::app_state::AppState as AdaptersAppState;
use careerdesk_application::{
    billing::{service::BillingService, sweeper::ReservationSweeper},
    config::{CacheSettings, RetrySettings, SweepSettings},
    error::AppError,
    infrastructure_config::Config,
    matching::{cache::MatchCache, retry::Retrier, service::MatchService},
    ports::incoming::{
        billing::{CreditQueryUseCase, ReservationUseCase},
        matching::JobMatchUseCase,
    },
    ports::outgoing::{
        credit_store::DynCreditStorePort, delay::DynDelayPort,
        match_cache_store::DynMatchCacheStorePort, match_runner::DynMatchRunnerPort,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    db_pool: PgPool,
    pub billing_service: Arc<BillingService>,
    pub match_service: Arc<MatchService>,
    sweeper: Arc<ReservationSweeper>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let config = Arc::new(config);

        let db_pool = Self::create_database_pool(&config).await?;

        let credit_store: DynCreditStorePort = Arc::new(PostgresCreditStoreAdapter::new(
            db_pool.clone(),
            config.db.query_timeout_secs,
            config.credits.signup_grant,
        ));
        let billing_service = Arc::new(BillingService::new(Arc::clone(&credit_store)));

        let match_service = Self::create_match_service(&config, &db_pool, &billing_service)?;

        let sweeper = Arc::new(ReservationSweeper::new(
            Arc::clone(&credit_store),
            SweepSettings {
                hold_ttl: Duration::seconds(config.credits.hold_ttl_seconds as i64),
            },
        ));

        Ok(Self {
            config,
            db_pool,
            billing_service,
            match_service,
            sweeper,
        })
    }

    async fn create_database_pool(config: &Config) -> Result<PgPool, AppError> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db.pool_size)
            .connect(config.db.database_url())
            .await
            .map_err(|e| AppError::DatabaseError {
                message: format!("Failed to connect to database: {}", e),
            })?;

        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .map_err(|e| AppError::DatabaseError {
                message: format!("Failed to run migrations: {}", e),
            })?;

        Ok(db_pool)
    }

    fn create_match_service(
        config: &Config,
        db_pool: &PgPool,
        billing_service: &Arc<BillingService>,
    ) -> Result<Arc<MatchService>, AppError> {
        let cache_store: DynMatchCacheStorePort = Arc::new(PostgresMatchCacheStoreAdapter::new(
            db_pool.clone(),
            config.db.query_timeout_secs,
        ));
        let match_cache = MatchCache::new(
            cache_store,
            CacheSettings {
                ttl: Duration::seconds(config.match_cache.ttl_seconds as i64),
                max_entries_per_user: config.match_cache.max_entries_per_user,
            },
        );

        let runner: DynMatchRunnerPort = Arc::new(HttpMatchRunnerAdapter::new(&config.matching)?);
        let delay: DynDelayPort = Arc::new(TokioDelayAdapter::new());
        let retrier = Retrier::new(
            RetrySettings {
                max_attempts: config.retry.max_attempts,
                backoff: StdDuration::from_millis(config.retry.backoff_ms),
                jitter_min_percent: config.retry.jitter_min_percent,
                jitter_max_percent: config.retry.jitter_max_percent,
            },
            delay,
        );

        Ok(Arc::new(MatchService::new(
            Arc::clone(billing_service),
            match_cache,
            runner,
            retrier,
        )))
    }

    pub fn db_pool(&self) -> &PgPool {
        &self.db_pool
    }

    /// Revert abandoned holds on a fixed interval for the life of the
    /// server.
    pub fn spawn_reservation_sweeper(&self) -> JoinHandle<()> {
        let sweeper = Arc::clone(&self.sweeper);
        let interval_secs = self.config.credits.sweep_interval_seconds;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(StdDuration::from_secs(interval_secs));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if let Err(err) = sweeper.sweep_once().await {
                    warn!(error = %err, "Reservation sweep failed");
                }
            }
        })
    }

    pub fn to_adapters_state(&self) -> AdaptersAppState {
        AdaptersAppState::new(
            Arc::clone(&self.config),
            Arc::clone(&self.billing_service) as Arc<dyn CreditQueryUseCase + Send + Sync>,
            Arc::clone(&self.billing_service) as Arc<dyn ReservationUseCase + Send + Sync>,
            Arc::clone(&self.match_service) as Arc<dyn JobMatchUseCase + Send + Sync>,
        )
    }
}
