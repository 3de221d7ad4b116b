//! Release quality analytics over deployment history.
//!
//! This crate turns a raw list of deployment ("release") records for one
//! environment into a filtered, sorted, paginated table plus summary
//! statistics and chart datasets, and draws those charts onto a raster
//! surface without any charting library.
//!
//! ## Architecture
//!
//! 1. **Records** (`record`, `source`) - Lenient parsing of deployment
//!    payloads, the retrieval port and the stale-load guard.
//!
//! 2. **Pipeline** (`filter`, `sort`, `paginate`, `aggregate`) - Pure
//!    functions over an immutable record slice. `view::build_view` chains
//!    them for one `state::DashboardState`.
//!
//! 3. **Charts** (`chart`) - Pie and grouped-bar layout on the `Surface`
//!    trait, with an RGBA raster and a recording implementation.
//!
//! 4. **Controller** (`dashboard`, `debounce`) - Owns records and state,
//!    applies interactions, coalesces search keystrokes.
//!
//! ## Usage
//!
//! ```bash
//! release-dash deployments.json --from 2024-05-01 --status FAILED --status FAULT
//! release-dash deployments.json --json > view.json
//! release-dash deployments.json --charts-dir out/
//! ```

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod format;
pub mod paginate;
pub mod palette;
pub mod record;
pub mod sort;
pub mod source;
pub mod state;
pub mod table;
pub mod view;

pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::{DashError, Result};
pub use record::DeploymentRecord;
pub use state::{DashboardState, Interaction};
pub use view::{build_view, DashboardView};
