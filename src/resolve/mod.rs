//! Relocating build-output paths back into the real source tree
//!
//! - [`score`]: right-to-left segment similarity between two paths
//! - [`cache`]: per-run memo of resolution outcomes
//! - [`resolver`]: two-strategy search that ties the pieces together

pub mod cache;
pub mod resolver;
pub mod score;

pub use cache::ResolutionCache;
pub use resolver::PathResolver;
