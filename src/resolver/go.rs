use std::collections::HashSet;
use std::path::PathBuf;
use std::process::Command;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, ScanError};
use crate::models::{ModuleInfo, PackageInfo};

/// Keeps `go list` argument lists well below platform limits.
const INFO_CHUNK_SIZE: usize = 250;

/// Fragments of `go list` output meaning a package does not exist or cannot
/// be built, as opposed to a toolchain failure.
const MISSING_MARKERS: &[&str] = &[
    "cannot find package",
    "no buildable Go source files",
    "can't load package",
    "no required module provides package",
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoPackage {
    import_path: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    dir: PathBuf,
    #[serde(default)]
    root: PathBuf,
    module: Option<GoModule>,
    error: Option<GoPackageError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoModule {
    path: String,
    dir: Option<PathBuf>,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoPackageError {
    err: String,
}

impl From<GoPackage> for PackageInfo {
    fn from(p: GoPackage) -> Self {
        let error = p.error.map(|e| e.err);
        let name = if error.is_some() && p.name.is_empty() {
            p.import_path.clone()
        } else {
            p.name
        };
        PackageInfo {
            import_path: p.import_path,
            name,
            dir: p.dir,
            root: p.root,
            module: p.module.map(|m| ModuleInfo {
                path: m.path,
                dir: m.dir,
                version: m.version,
            }),
            error,
        }
    }
}

/// Resolves Go packages by shelling out to `go list`.
pub struct GoResolver {
    go: String,
    gopath: Option<String>,
}

impl GoResolver {
    pub fn new(go: impl Into<String>, gopath: Option<String>) -> Self {
        Self {
            go: go.into(),
            gopath,
        }
    }

    fn run(&self, args: &[String]) -> Result<String> {
        debug!(go = %self.go, args = ?args, "running go list");
        let mut cmd = Command::new(&self.go);
        cmd.args(args);
        if let Some(gopath) = &self.gopath {
            cmd.env("GOPATH", gopath);
        }

        let context = format!("'{} {}' failed with", self.go, args.join(" "));
        let output = cmd
            .output()
            .map_err(|e| ScanError::failure(context.clone(), e.to_string()))?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            if is_missing_output(&combined) {
                return Err(ScanError::ResolutionMissing(combined));
            }
            return Err(ScanError::failure(context, combined));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Expand package expressions such as `./...` into import paths.
    fn expand(&self, selectors: &[String]) -> Result<Vec<String>> {
        let mut args = vec!["list".to_string()];
        args.extend(selectors.iter().cloned());
        Ok(parse_lines(&self.run(&args)?))
    }
}

impl super::DependencyResolver for GoResolver {
    fn list_dependencies(&self, selectors: &[String]) -> Result<Vec<String>> {
        let packages = self.expand(selectors)?;
        let mut args = vec![
            "list".to_string(),
            "-f".to_string(),
            "{{range .Deps}}{{.}}|{{end}}".to_string(),
        ];
        args.extend(packages.iter().cloned());
        let output = self.run(&args)?;
        Ok(merge_dependencies(&output, &packages))
    }

    fn list_standard(&self) -> Result<Vec<String>> {
        self.expand(&["std".to_string(), "cmd".to_string()])
    }

    fn package_info(&self, packages: &[String]) -> Result<Vec<PackageInfo>> {
        let mut infos = Vec::with_capacity(packages.len());
        for chunk in packages.chunks(INFO_CHUNK_SIZE) {
            let mut args = vec!["list".to_string(), "-e".to_string(), "-json".to_string()];
            args.extend(chunk.iter().cloned());
            let output = self.run(&args)?;
            infos.extend(decode_package_infos(&output, chunk)?);
        }
        Ok(infos)
    }
}

fn is_missing_output(output: &str) -> bool {
    MISSING_MARKERS.iter().any(|m| output.contains(m))
}

fn parse_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Merge `|`-separated dependency lists with the selected packages, then sort.
fn merge_dependencies(output: &str, packages: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut deps: Vec<String> = output
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .chain(packages.iter().map(String::as_str))
        .filter(|s| seen.insert(s.to_string()))
        .map(str::to_string)
        .collect();
    deps.sort();
    deps
}

/// Decode the concatenated JSON objects printed by `go list -json`, checking
/// they line up with the requested packages.
fn decode_package_infos(output: &str, packages: &[String]) -> Result<Vec<PackageInfo>> {
    let mut stream = serde_json::Deserializer::from_str(output).into_iter::<GoPackage>();
    let mut infos = Vec::with_capacity(packages.len());
    for pkg in packages {
        let decoded = match stream.next() {
            Some(Ok(decoded)) => decoded,
            Some(Err(e)) => {
                return Err(ScanError::failure(
                    format!("could not retrieve package information for {pkg}"),
                    e.to_string(),
                ))
            }
            None => {
                return Err(ScanError::failure(
                    format!("could not retrieve package information for {pkg}"),
                    "unexpected end of go list output",
                ))
            }
        };
        if decoded.import_path != *pkg {
            return Err(ScanError::failure(
                "package information mismatch",
                format!("asked for {pkg}, got {}", decoded.import_path),
            ));
        }
        infos.push(decoded.into());
    }
    Ok(infos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_output_detection() {
        assert!(is_missing_output(
            "can't load package: package example.com/nope: cannot find package"
        ));
        assert!(is_missing_output(
            "no required module provides package example.com/nope; to add it"
        ));
        assert!(!is_missing_output("go: cannot use path@version syntax in GOPATH mode"));
    }

    #[test]
    fn test_parse_lines() {
        assert_eq!(
            parse_lines("example.com/a\n  example.com/b \n\n"),
            strings(&["example.com/a", "example.com/b"])
        );
    }

    #[test]
    fn test_merge_dependencies() {
        let output = "fmt|example.com/dep|\nexample.com/dep|os|\n";
        let deps = merge_dependencies(output, &strings(&["example.com/app"]));
        assert_eq!(
            deps,
            strings(&["example.com/app", "example.com/dep", "fmt", "os"])
        );
    }

    #[test]
    fn test_decode_package_infos() {
        let output = r#"{
    "Dir": "/go/src/example.com/a",
    "ImportPath": "example.com/a",
    "Name": "a",
    "Root": "/go"
}
{
    "Dir": "/mod/example.com/b@v1.0.0",
    "ImportPath": "example.com/b",
    "Name": "b",
    "Module": {
        "Path": "example.com/b",
        "Version": "v1.0.0",
        "Dir": "/mod/example.com/b@v1.0.0"
    }
}
{
    "ImportPath": "example.com/missing",
    "Error": {
        "ImportStack": [],
        "Pos": "",
        "Err": "cannot find package \"example.com/missing\""
    }
}
"#;
        let infos = decode_package_infos(
            output,
            &strings(&["example.com/a", "example.com/b", "example.com/missing"]),
        )
        .unwrap();
        assert_eq!(infos.len(), 3);
        assert_eq!(infos[0].root, PathBuf::from("/go"));
        assert!(infos[0].module.is_none());
        let module = infos[1].module.as_ref().unwrap();
        assert_eq!(module.version.as_deref(), Some("v1.0.0"));
        assert_eq!(infos[2].name, "example.com/missing");
        assert!(infos[2].error.as_deref().unwrap().contains("cannot find package"));
    }

    #[test]
    fn test_decode_mismatch() {
        let output = r#"{"ImportPath": "example.com/other", "Name": "other"}"#;
        let err = decode_package_infos(output, &strings(&["example.com/a"])).unwrap_err();
        assert!(err.to_string().contains("asked for example.com/a"));
    }

    #[test]
    fn test_decode_truncated() {
        let err = decode_package_infos("", &strings(&["example.com/a"])).unwrap_err();
        assert!(matches!(err, ScanError::ResolutionFailure { .. }));
    }

    #[test]
    fn test_missing_toolchain_is_failure() {
        use crate::resolver::DependencyResolver;

        let resolver = GoResolver::new("definitely-not-a-go-binary", None);
        let err = resolver.list_standard().unwrap_err();
        assert!(matches!(err, ScanError::ResolutionFailure { .. }));
    }
}
