pub mod allocator;
pub mod config;
pub mod constants;
pub mod detector;
pub mod error;
pub mod insight;
pub mod models;
pub mod service;
pub mod storage;

pub use error::FinSageError;
pub use insight::mock::MockInsightBackend;
pub use service::FinSageService;
pub use storage::in_memory::InMemoryStorage;

#[cfg(test)]
mod tests; // Include integration tests
