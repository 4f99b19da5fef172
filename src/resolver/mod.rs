//! Toolchain collaborators: dependency enumeration and revision lookup.
//!
//! - [`go`]: [`DependencyResolver`] backed by `go list`.
//! - [`git`]: [`RevisionLookup`] backed by module versions and `git rev-parse`.

use crate::error::Result;
use crate::models::PackageInfo;

pub mod git;
pub mod go;

pub trait DependencyResolver {
    /// Expand `selectors` and return their transitive dependencies plus the
    /// selected packages themselves, deduplicated and sorted.
    fn list_dependencies(&self, selectors: &[String]) -> Result<Vec<String>>;

    /// Standard and built-in packages, excluded from scanning.
    fn list_standard(&self) -> Result<Vec<String>>;

    /// Per-package information, in the order of `packages`.
    fn package_info(&self, packages: &[String]) -> Result<Vec<PackageInfo>>;
}

pub trait RevisionLookup {
    /// Revision identifier of the package, or `"?"`. Never fails.
    fn revision(&self, info: &PackageInfo) -> String;
}
