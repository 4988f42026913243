//! Resource resolution core
//!
//! Maps a `(category, id)` pair to candidate origin paths and fetches them
//! with a tiered fallback, so a validated request always ends in image bytes.

mod expander;
mod origin;
mod resolver;

pub use origin::HttpOrigin;
pub use resolver::{Resolution, ResolveError, Resolver, Tier};
