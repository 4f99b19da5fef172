//! Collapse packages sharing one license file into a single report row.

use std::collections::HashMap;

use crate::error::{Result, ScanError};
use crate::models::PackageLicense;

/// Longest common prefix of `packages` over `/`-separated path segments.
pub fn longest_common_prefix<'p>(packages: impl IntoIterator<Item = &'p str>) -> String {
    let mut iter = packages.into_iter();
    let Some(first) = iter.next() else {
        return String::new();
    };
    let mut prefix: Vec<&str> = first.split('/').collect();
    for package in iter {
        let common = prefix
            .iter()
            .zip(package.split('/'))
            .take_while(|(a, b)| *a == b)
            .count();
        prefix.truncate(common);
    }
    prefix.join("/")
}

/// Group entries by license file path and relabel each group with the longest
/// common import path prefix of its members.
///
/// The surviving entry is the group's first member, kept at its position.
/// Entries without a license file are passed through unchanged.
pub fn group_licenses(licenses: Vec<PackageLicense<'_>>) -> Result<Vec<PackageLicense<'_>>> {
    let mut labels: HashMap<String, String> = HashMap::new();
    {
        // Groups in order of first appearance.
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut members: Vec<(&str, Vec<&str>)> = Vec::new();
        for l in licenses.iter().filter(|l| !l.license_path.is_empty()) {
            let path = l.license_path.as_str();
            let slot = *index.entry(path).or_insert_with(|| {
                members.push((path, Vec::new()));
                members.len() - 1
            });
            members[slot].1.push(l.package.as_str());
        }

        for (path, packages) in members {
            let prefix = longest_common_prefix(packages.iter().copied());
            if prefix.is_empty() && packages.len() > 1 {
                return Err(ScanError::GroupingConflict {
                    license_path: path.to_string(),
                    packages: packages.iter().map(|p| p.to_string()).collect(),
                });
            }
            labels.insert(path.to_string(), prefix);
        }
    }

    let mut kept = Vec::with_capacity(licenses.len());
    for mut l in licenses {
        if l.license_path.is_empty() {
            kept.push(l);
            continue;
        }
        if let Some(label) = labels.remove(&l.license_path) {
            l.package = label;
            kept.push(l);
        }
    }
    Ok(kept)
}
