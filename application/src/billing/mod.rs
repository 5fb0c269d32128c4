pub mod service;
pub mod sweeper;
