use std::sync::Arc;

use careerdesk_application::infrastructure_config::Config;
use careerdesk_application::ports::incoming::{
    billing::{CreditQueryUseCase, ReservationUseCase},
    matching::JobMatchUseCase,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub credit_query_service: Arc<dyn CreditQueryUseCase + Send + Sync>,
    pub reservation_service: Arc<dyn ReservationUseCase + Send + Sync>,
    pub job_match_service: Arc<dyn JobMatchUseCase + Send + Sync>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        credit_query_service: Arc<dyn CreditQueryUseCase + Send + Sync>,
        reservation_service: Arc<dyn ReservationUseCase + Send + Sync>,
        job_match_service: Arc<dyn JobMatchUseCase + Send + Sync>,
    ) -> Self {
        Self {
            config,
            credit_query_service,
            reservation_service,
            job_match_service,
        }
    }
}
