//! File-system route compiler
//!
//! Turns a folder tree that encodes page routes into the TypeScript modules a
//! hash-routed React application imports: a typed route union, a route table
//! with the runtime matcher and navigation store, and a root dispatcher.
//!
//! # Conventions
//!
//! - every folder is a route, named after its path from the root
//! - `page.tsx` / `page.mdx` make a route reachable; `layout.tsx`,
//!   `loading.tsx` and `template.tsx` wrap it and its descendants
//! - `access.ts` guards a route and its descendants
//! - `(name)` folders group routes without adding to their path
//! - `[name]` folders capture a path parameter
//! - `layout.fr.tsx` and friends are language variants
//!
//! # Basic Usage
//!
//! ```no_run
//! use fsroutes::{generate_routes, Result};
//!
//! fn main() -> Result<()> {
//!     let stats = generate_routes("src/app")?;
//!     println!("{} routes", stats.route_count);
//!     Ok(())
//! }
//! ```
//!
//! # Generation Pipeline
//!
//! 1. **Builder**: walk the folder, probing each one for convention files
//! 2. **Flattener**: keep the routes leading to a page, sorted by name
//! 3. **Code Generator**: emit the IR of each module, then print it
//! 4. **Pipeline**: skip unchanged structures, write the modules

pub mod builder;
pub mod cli;
pub mod codegen;
pub mod error;
pub mod flatten;
pub mod intl;
pub mod matcher;
pub mod navigation;
pub mod pipeline;
pub mod prober;
pub mod segments;
pub mod types;
pub mod watch;

// Re-export commonly used types and functions
pub use builder::build_route_tree;
pub use cli::RoutesCli;
pub use codegen::{generate, GeneratedFile};
pub use error::{Result, RouteError};
pub use flatten::flatten_routes;
pub use matcher::{match_route, RouteMatch, RouteTable};
pub use navigation::{AccessGuard, Location, MemoryLocation, Navigator, Resolution};
pub use pipeline::{FsSink, GenerationOutcome, GenerationStats, OutputSink, RouteGenerator};
pub use prober::{probe, Probe};
pub use types::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Generates the route modules of `root` once.
pub fn generate_routes(root: impl AsRef<std::path::Path>) -> Result<GenerationStats> {
    let mut generator = RouteGenerator::new(root.as_ref());
    match generator.regenerate()? {
        GenerationOutcome::Generated(stats) => Ok(stats),
        GenerationOutcome::Unchanged => Ok(GenerationStats::default()),
    }
}
