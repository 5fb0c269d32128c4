#[cfg(any(
    feature = "adapters",
    feature = "axum",
    feature = "sqlx",
    feature = "reqwest"
))]
compile_error!("application must not depend on adapters/framework crates");

pub mod billing;
pub mod config;
pub mod error;
pub mod infrastructure_config;
pub mod matching;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;
