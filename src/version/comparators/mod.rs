//! Comparator implementations

pub mod maven;
pub mod semver;

pub use maven::MavenComparator;
pub use semver::SemverComparator;
