//! Table state: loose cards and builds.

pub mod build;
#[allow(clippy::module_inception)]
pub mod table;

pub use build::Build;
pub use table::Table;
