//! Command implementations for the CLI tool.

use std::path::Path;

use mphkit::capability::{Capability, PathProbe, Requirement, check_all};
use mphkit::edit::Compression;
use mphkit::stats::SizeBreakdown;
use mphkit::{Container, EditSet, PatchOptions, apply_patch_with_options, checksum, scan};

use crate::OutputFormat;
use crate::exit_codes::{ExitCode, archive_error_to_exit_code, patch_error_to_exit_code};
use crate::file_selector::FileSelector;
use crate::output::create_formatter;
use crate::progress::Spinner;

/// Configuration for the set command.
pub struct SetConfig<'a> {
    pub container_path: &'a Path,
    pub assignments: &'a [String],
    pub output_dir: Option<&'a Path>,
    pub store: bool,
    pub format: OutputFormat,
    pub quiet: bool,
}

fn open_container(path: &Path) -> Result<Container, ExitCode> {
    Container::open(path).map_err(|e| {
        eprintln!("Error: {}", e);
        archive_error_to_exit_code(&e)
    })
}

/// List command implementation
pub fn list(path: &Path, include: &[String], exclude: &[String], format: OutputFormat) -> ExitCode {
    let selector = match FileSelector::new(include, exclude) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::BadArgs;
        }
    };

    let members = match mphkit::list(path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {}", e);
            return archive_error_to_exit_code(&e);
        }
    };

    print!("{}", create_formatter(format).format_list(&selector.filter(members)));
    ExitCode::Success
}

/// Info command implementation
pub fn info(path: &Path, format: OutputFormat) -> ExitCode {
    let mut container = match open_container(path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let members = match container.members() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {}", e);
            return archive_error_to_exit_code(&e);
        }
    };
    let breakdown = SizeBreakdown::from_members(&members);
    let info = container.info();

    print!(
        "{}",
        create_formatter(format).format_info(info.as_ref(), &breakdown)
    );

    if info.is_some() {
        ExitCode::Success
    } else {
        ExitCode::Warning
    }
}

/// Params command implementation
pub fn params(path: &Path, format: OutputFormat) -> ExitCode {
    let mut container = match open_container(path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let params = container.parameters();

    print!("{}", create_formatter(format).format_params(&params));

    if params.is_empty() {
        ExitCode::Warning
    } else {
        ExitCode::Success
    }
}

/// Parses `NAME=VALUE` arguments into an edit set.
fn parse_assignments(assignments: &[String]) -> Result<EditSet, String> {
    let mut edits = EditSet::new();
    for assignment in assignments {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", assignment))?;
        edits.stage(name.trim(), value).map_err(|e| e.to_string())?;
    }
    Ok(edits)
}

/// Set command implementation
pub fn set(config: &SetConfig<'_>) -> ExitCode {
    let edits = match parse_assignments(config.assignments) {
        Ok(e) => e,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return ExitCode::BadArgs;
        }
    };

    let current = match open_container(config.container_path) {
        Ok(mut c) => c.parameters(),
        Err(code) => return code,
    };
    let effective = edits.effective_count(&current);

    let mut options = PatchOptions::new();
    if let Some(dir) = config.output_dir {
        options = options.output_dir(dir);
    }
    if config.store {
        options = options.compression(Compression::Stored);
    }

    let spinner = Spinner::new("Repackaging...", config.quiet);
    let outcome = match apply_patch_with_options(config.container_path, &edits, &options) {
        Ok(o) => o,
        Err(e) => {
            spinner.fail("Failed");
            eprintln!("Error ({}): {}", e.stage(), e);
            return patch_error_to_exit_code(&e);
        }
    };
    spinner.finish();

    print!(
        "{}",
        create_formatter(config.format).format_patch(&outcome, edits.modified_count(), effective)
    );

    if outcome.unmatched.is_empty() {
        ExitCode::Success
    } else {
        ExitCode::Warning
    }
}

/// Extract command implementation
pub fn extract(path: &Path, output: &Path, format: OutputFormat, quiet: bool) -> ExitCode {
    if let Err(e) = std::fs::create_dir_all(output) {
        eprintln!("Error creating output directory: {}", e);
        return ExitCode::IoError;
    }

    let spinner = Spinner::new("Extracting...", quiet);
    let outcome = match mphkit::extract_all(path, output) {
        Ok(o) => o,
        Err(e) => {
            spinner.fail("Failed");
            eprintln!("Error: {}", e);
            return archive_error_to_exit_code(&e);
        }
    };
    spinner.finish();

    print!("{}", create_formatter(format).format_extract(&outcome));
    ExitCode::Success
}

/// Diff command implementation
pub fn diff(left: &Path, right: &Path, format: OutputFormat) -> ExitCode {
    let diff = match checksum::compare(left, right) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            return archive_error_to_exit_code(&e);
        }
    };

    print!("{}", create_formatter(format).format_diff(&diff));

    if diff.is_identical() {
        ExitCode::Success
    } else {
        ExitCode::Warning
    }
}

/// Scan command implementation
pub fn scan(dir: &Path, format: OutputFormat) -> ExitCode {
    if !dir.is_dir() {
        eprintln!("Warning: '{}' is not a directory", dir.display());
    }
    let projects = scan::scan_projects(dir);

    print!("{}", create_formatter(format).format_scan(&projects));

    if projects.is_empty() {
        ExitCode::Warning
    } else {
        ExitCode::Success
    }
}

/// Doctor command implementation
pub fn doctor(tools: &[String], format: OutputFormat) -> ExitCode {
    let mut requirements = vec![
        Requirement::optional(Capability::executable("java"))
            .with_hint("Java is typically installed with the solver"),
        Requirement::optional(Capability::executable("comsol"))
            .with_hint("needed only to run models, not to inspect or patch them"),
    ];
    requirements.extend(
        tools
            .iter()
            .map(|tool| Requirement::required(Capability::executable(tool.as_str()))),
    );

    let report = check_all(&PathProbe::new(), &requirements);

    print!("{}", create_formatter(format).format_doctor(&report));

    if !report.is_ok() {
        ExitCode::FatalError
    } else if !report.warnings.is_empty() {
        ExitCode::Warning
    } else {
        ExitCode::Success
    }
}
