pub mod api;
pub mod chart;
pub mod core;
pub mod export;
pub mod normalize;
pub mod parse;
pub mod prompt;
pub mod provider;
pub mod query;
pub mod render;
pub mod repl;
pub mod session;
pub mod utils;

// Re-exports
pub use core::init;
pub use core::service::ResearchService;
pub use core::types::SearchResult;
pub use session::Session;
pub use utils::progress::Spinner;
