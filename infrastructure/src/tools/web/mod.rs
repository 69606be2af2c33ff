//! **Web Tools**: `web_search`
//!
//! Gated behind the `web-tools` Cargo feature flag:
//!
//! ```toml
//! # infrastructure/Cargo.toml
//! [features]
//! web-tools = ["dep:reqwest"]
//!
//! # cli/Cargo.toml (enabled by default for end users)
//! [features]
//! default = ["web-tools"]
//! web-tools = ["rag-infrastructure/web-tools"]
//! ```

mod search;

pub use search::{WEB_SEARCH, WebSearchTool};
