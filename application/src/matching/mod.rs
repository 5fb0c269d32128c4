pub mod cache;
pub mod fallback;
pub mod retry;
pub mod service;
