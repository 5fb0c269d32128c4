pub mod http_reqwest;
pub mod postgres_sqlx;
pub mod tokio_spawn;
