pub mod match_cache;
pub mod types;

// Re-export cache types
pub use match_cache::MatchCache;
pub use types::CacheStats;
