pub mod credit_store_postgres;
pub mod match_cache_store_postgres;
pub mod utils;
