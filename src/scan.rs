//! Drives resolver, locator, matcher and revision lookup over a dependency set.

use std::collections::HashSet;

use indicatif::ProgressBar;
use tracing::{debug, info};

use crate::error::{Result, ScanError};
use crate::license::cache::MatchCache;
use crate::license::locator::{locate, FsLister};
use crate::license::templates::Template;
use crate::models::PackageLicense;
use crate::resolver::{DependencyResolver, RevisionLookup};

/// List the license of every non-standard dependency of `selectors`.
///
/// Packages the toolchain could not resolve are reported with their error
/// text instead of aborting the scan.
pub fn list_licenses<'a>(
    resolver: &dyn DependencyResolver,
    revisions: &dyn RevisionLookup,
    templates: &'a [Template],
    selectors: &[String],
    progress: Option<&ProgressBar>,
) -> Result<Vec<PackageLicense<'a>>> {
    let deps = resolver.list_dependencies(selectors).map_err(|e| match e {
        ScanError::ResolutionMissing(_) => e,
        other => ScanError::failure(
            format!("could not list {} dependencies", selectors.join(" ")),
            other.to_string(),
        ),
    })?;
    let standard: HashSet<String> = resolver
        .list_standard()
        .map_err(|e| ScanError::failure("could not list standard packages", e.to_string()))?
        .into_iter()
        .collect();
    let infos = resolver.package_info(&deps)?;
    debug!(dependencies = deps.len(), "resolved dependency set");

    if let Some(pb) = progress {
        pb.set_length(infos.len() as u64);
    }

    let mut cache = MatchCache::new(templates);
    let mut licenses = Vec::new();
    for info in &infos {
        if let Some(pb) = progress {
            pb.inc(1);
        }
        if let Some(err) = &info.error {
            debug!(package = %info.import_path, error = %err, "package could not be resolved");
            licenses.push(PackageLicense::failed(&info.import_path, err));
            continue;
        }
        if standard.contains(&info.import_path) {
            continue;
        }

        let (base, prefix) = info.source_root();
        let lister = FsLister::new(base, prefix);
        let license_path = locate(&info.import_path, &lister)?;

        let mut license = PackageLicense::new(&info.import_path);
        if !license_path.is_empty() {
            if let Some(file) = lister.physical_path(&license_path) {
                license.classification = Some(cache.classify(&file)?.clone());
            }
        }
        license.license_path = license_path;
        license.version = revisions.revision(info);
        licenses.push(license);
    }

    info!(
        packages = licenses.len(),
        license_files = cache.files_classified(),
        "scan complete"
    );
    Ok(licenses)
}
