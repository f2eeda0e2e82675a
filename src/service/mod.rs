pub mod analyzer;
pub mod evaluator;
pub mod fetcher;
pub mod http;
pub mod link_checker;
pub mod pagespeed;
pub mod scoring;

pub use analyzer::SeoAnalyzer;
pub use evaluator::evaluate;
pub use fetcher::{ContentFetcher, HttpFetcher, StaticFetcher};
pub use link_checker::{HttpLinkChecker, LinkChecker};
pub use pagespeed::{DisabledPerformance, PageSpeedClient, PerformanceProvider};
pub use scoring::{pipeline_score, score, ScoringModel};
