//! Checks for external tools a host application relies on.
//!
//! Nothing in the container pipeline needs an external tool. Front ends that
//! launch a solver or its runtime can describe what they need as
//! [`Requirement`]s and ask a [`CapabilityProbe`] whether each is present.
//! The probe is a trait so tests and embedders can substitute their own.
//!
//! ```rust,no_run
//! use mphkit::capability::{Capability, PathProbe, Requirement, check_all};
//!
//! let report = check_all(
//!     &PathProbe::new(),
//!     &[
//!         Requirement::required(Capability::executable("java"))
//!             .with_hint("Java is typically installed with the solver"),
//!         Requirement::optional(Capability::executable("comsol")),
//!     ],
//! );
//! for line in report.errors.iter().chain(&report.warnings) {
//!     eprintln!("{line}");
//! }
//! assert_eq!(report.is_ok(), report.errors.is_empty());
//! ```

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Something a host may need from its environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Capability {
    /// An executable reachable through the search path.
    Executable(String),
}

impl Capability {
    /// Shorthand for [`Capability::Executable`].
    pub fn executable(name: impl Into<String>) -> Self {
        Self::Executable(name.into())
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Executable(name) => write!(f, "executable '{}'", name),
        }
    }
}

/// Answers whether a capability is available.
pub trait CapabilityProbe {
    /// Returns true if `capability` is present.
    fn is_available(&self, capability: &Capability) -> bool;
}

/// Probe that looks executables up in `PATH` plus optional extra
/// directories.
#[derive(Debug, Clone, Default)]
pub struct PathProbe {
    extra_dirs: Vec<PathBuf>,
    skip_env_path: bool,
}

impl PathProbe {
    /// Creates a probe that searches `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a probe that searches only `dirs`, ignoring `PATH`.
    pub fn with_search_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            extra_dirs: dirs.into_iter().map(Into::into).collect(),
            skip_env_path: true,
        }
    }

    /// Adds a directory searched after `PATH`.
    pub fn extra_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extra_dirs.push(dir.into());
        self
    }

    /// Returns the full path of executable `name`, if found.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        let search_path = self.search_path()?;
        which::which_in(name, Some(search_path), Path::new(".")).ok()
    }

    fn search_path(&self) -> Option<OsString> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        if !self.skip_env_path {
            if let Some(path) = std::env::var_os("PATH") {
                dirs.extend(std::env::split_paths(&path));
            }
        }
        dirs.extend(self.extra_dirs.iter().cloned());
        if dirs.is_empty() {
            return None;
        }
        match std::env::join_paths(dirs) {
            Ok(joined) => Some(joined),
            Err(e) => {
                log::warn!("invalid search directory: {}", e);
                None
            }
        }
    }
}

impl CapabilityProbe for PathProbe {
    fn is_available(&self, capability: &Capability) -> bool {
        match capability {
            Capability::Executable(name) => self.locate(name).is_some(),
        }
    }
}

/// A capability together with how much its absence matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// What is needed.
    pub capability: Capability,
    /// Whether a missing capability is an error rather than a warning.
    pub required: bool,
    /// Advice appended to the report line when missing.
    pub hint: Option<String>,
}

impl Requirement {
    /// A capability whose absence is an error.
    pub fn required(capability: Capability) -> Self {
        Self {
            capability,
            required: true,
            hint: None,
        }
    }

    /// A capability whose absence is only a warning.
    pub fn optional(capability: Capability) -> Self {
        Self {
            capability,
            required: false,
            hint: None,
        }
    }

    /// Attaches advice shown when the capability is missing.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    fn missing_message(&self) -> String {
        match &self.hint {
            Some(hint) => format!("{} not found: {}", self.capability, hint),
            None => format!("{} not found", self.capability),
        }
    }
}

/// Outcome of [`check_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityReport {
    /// Capabilities that were found.
    pub available: Vec<Capability>,
    /// One line per missing required capability.
    pub errors: Vec<String>,
    /// One line per missing optional capability.
    pub warnings: Vec<String>,
}

impl CapabilityReport {
    /// Returns true if every required capability is present.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Probes every requirement in order.
pub fn check_all<P: CapabilityProbe + ?Sized>(
    probe: &P,
    requirements: &[Requirement],
) -> CapabilityReport {
    let mut report = CapabilityReport::default();
    for requirement in requirements {
        if probe.is_available(&requirement.capability) {
            report.available.push(requirement.capability.clone());
        } else if requirement.required {
            report.errors.push(requirement.missing_message());
        } else {
            report.warnings.push(requirement.missing_message());
        }
    }
    log::debug!(
        "capability check: {} available, {} errors, {} warnings",
        report.available.len(),
        report.errors.len(),
        report.warnings.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct FixedProbe(HashSet<&'static str>);

    impl CapabilityProbe for FixedProbe {
        fn is_available(&self, capability: &Capability) -> bool {
            match capability {
                Capability::Executable(name) => self.0.contains(name.as_str()),
            }
        }
    }

    #[test]
    fn test_check_all_splits_errors_and_warnings() {
        let probe = FixedProbe(["java"].into_iter().collect());
        let report = check_all(
            &probe,
            &[
                Requirement::required(Capability::executable("java")),
                Requirement::required(Capability::executable("solver"))
                    .with_hint("install the solver"),
                Requirement::optional(Capability::executable("viewer")),
            ],
        );

        assert!(!report.is_ok());
        assert_eq!(report.available, [Capability::executable("java")]);
        assert_eq!(
            report.errors,
            ["executable 'solver' not found: install the solver"]
        );
        assert_eq!(report.warnings, ["executable 'viewer' not found"]);
    }

    #[test]
    fn test_empty_requirements_ok() {
        let report = check_all(&FixedProbe(HashSet::new()), &[]);
        assert!(report.is_ok());
        assert!(report.available.is_empty());
    }

    #[test]
    fn test_path_probe_misses_in_empty_dir() {
        let temp = tempfile::tempdir().unwrap();
        let probe = PathProbe::with_search_dirs([temp.path()]);
        assert!(!probe.is_available(&Capability::executable("definitely-not-here")));
    }

    #[cfg(unix)]
    #[test]
    fn test_path_probe_finds_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let tool = temp.path().join("fake-solver");
        std::fs::write(&tool, b"#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        let probe = PathProbe::with_search_dirs([temp.path()]);
        assert!(probe.is_available(&Capability::executable("fake-solver")));
        assert_eq!(probe.locate("fake-solver"), Some(tool));
    }

    #[cfg(unix)]
    #[test]
    fn test_path_probe_ignores_non_executable() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("plain"), b"data").unwrap();

        let probe = PathProbe::with_search_dirs([temp.path()]);
        assert!(!probe.is_available(&Capability::executable("plain")));
    }
}
