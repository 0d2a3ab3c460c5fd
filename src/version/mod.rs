//! Version update resolution
//!
//! This module decides, for each component, which newer versions exist and
//! which single version should be recommended.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Provider   │────▶│  Evaluator  │────▶│ Classifier  │
//! │  (fetch)    │     │  (batch)    │     │ (per tier)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │                   │
//!                            ▼                   ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │   Reactor   │     │   Bounds    │
//!                     │   (merge)   │     │(range query)│
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`]: `Version`, `Coordinate` and the ordered `VersionPool`
//! - [`comparator`]: Pluggable ordering trait and its selector
//! - [`comparators`]: Maven and semver orderings
//! - [`bounds`]: Ranges and the bounded version query
//! - [`ranges`]: Incremental, minor and major ranges for a current version
//! - [`restriction`]: Bracket-notation range specifications
//! - [`classifier`]: Per-tier summaries and update details
//! - [`reactor`]: Merging reactor versions with the repository winner
//! - [`provider`]: Metadata and reactor source traits
//! - [`providers`]: Catalog-backed implementations
//! - [`evaluator`]: Batch evaluation of configured components
//! - [`error`]: Error types for parsing and metadata retrieval

pub mod bounds;
pub mod classifier;
pub mod comparator;
pub mod comparators;
pub mod error;
pub mod evaluator;
pub mod provider;
pub mod providers;
pub mod ranges;
pub mod reactor;
pub mod restriction;
pub mod types;
