//! Output formatting for CLI operations.

use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};

use mphkit::capability::CapabilityReport;
use mphkit::checksum::ContainerDiff;
use mphkit::container::format_size;
use mphkit::scan::ProjectEntry;
use mphkit::{ExtractOutcome, Member, ModelInfo, Parameter, PatchOutcome, SizeBreakdown};

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats a member listing
    fn format_list(&self, members: &[Member]) -> String;

    /// Formats the model summary and per-category breakdown
    fn format_info(&self, info: Option<&ModelInfo>, breakdown: &SizeBreakdown) -> String;

    /// Formats a parameter table
    fn format_params(&self, params: &[Parameter]) -> String;

    /// Formats the result of a patch
    fn format_patch(&self, outcome: &PatchOutcome, staged: usize, effective: usize) -> String;

    /// Formats the result of a bulk extraction
    fn format_extract(&self, outcome: &ExtractOutcome) -> String;

    /// Formats a container comparison
    fn format_diff(&self, diff: &ContainerDiff) -> String;

    /// Formats a project scan
    fn format_scan(&self, projects: &[ProjectEntry]) -> String;

    /// Formats a capability report
    fn format_doctor(&self, report: &CapabilityReport) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_list(&self, members: &[Member]) -> String {
        let mut output = String::new();

        output.push_str(&format!("{:>12} {:<16} {}\n", "Size", "Category", "Name"));
        output.push_str(&"-".repeat(70));
        output.push('\n');

        let mut total_size: u64 = 0;
        for member in members {
            total_size += member.size_bytes;
            output.push_str(&format!(
                "{:>12} {:<16} {}\n",
                member.size_label(),
                member.category.label(),
                member.name
            ));
        }

        output.push_str(&"-".repeat(70));
        output.push('\n');
        output.push_str(&format!(
            "{} members, {} total\n",
            members.len(),
            format_size(total_size)
        ));

        output
    }

    fn format_info(&self, info: Option<&ModelInfo>, breakdown: &SizeBreakdown) -> String {
        let mut output = String::new();

        output.push_str("Model Information:\n");
        output.push_str(&"-".repeat(40));
        output.push('\n');
        match info {
            Some(info) => {
                output.push_str(&format!("  Version:        {}\n", info.version));
                output.push_str(&format!("  Title:          {}\n", info.title));
                output.push_str(&format!("  Description:    {}\n", info.description));
                output.push_str(&format!("  Members:        {}\n", info.member_count));
                output.push_str(&format!("  Total size:     {:.2} MB\n", info.total_mib()));
                output.push_str(&format!(
                    "  Text data:      {:.2} MB ({:.1}%)\n",
                    info.text_mib(),
                    info.text_percent()
                ));
                output.push_str(&format!(
                    "  Binary data:    {:.2} MB ({:.1}%)\n",
                    info.binary_mib(),
                    info.binary_percent()
                ));
            }
            None => output.push_str("  No model metadata found\n"),
        }

        output.push_str("\nBy category:\n");
        for (category, totals) in breakdown.iter() {
            output.push_str(&format!(
                "  {:<16} {:>6} {:>12}\n",
                category.label(),
                totals.members,
                format_size(totals.bytes)
            ));
        }

        output
    }

    fn format_params(&self, params: &[Parameter]) -> String {
        if params.is_empty() {
            return "No parameters found\n".to_string();
        }

        let name_width = params.iter().map(|p| p.name.len()).max().unwrap_or(0).max(4);
        let value_width = params.iter().map(|p| p.value.len()).max().unwrap_or(0).max(5);

        let mut output = String::new();
        output.push_str(&format!(
            "{:<nw$}  {:<vw$}  {}\n",
            "Name",
            "Value",
            "Description",
            nw = name_width,
            vw = value_width
        ));
        output.push_str(&"-".repeat(name_width + value_width + 17));
        output.push('\n');
        for param in params {
            output.push_str(&format!(
                "{:<nw$}  {:<vw$}  {}\n",
                param.name,
                param.value,
                param.description,
                nw = name_width,
                vw = value_width
            ));
        }
        output.push_str(&format!("{} parameters\n", params.len()));

        output
    }

    fn format_patch(&self, outcome: &PatchOutcome, staged: usize, effective: usize) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Patched {} of {} parameters ({} changed a value)\n",
            outcome.parameters_patched, staged, effective
        ));
        output.push_str(&format!(
            "  Modified: {}\n",
            outcome.new_container_path.display()
        ));
        output.push_str(&format!("  Backup:   {}\n", outcome.backup_path.display()));
        if !outcome.unmatched.is_empty() {
            output.push_str(&format!(
                "Not declared in container: {}\n",
                outcome.unmatched.join(", ")
            ));
        }

        output
    }

    fn format_extract(&self, outcome: &ExtractOutcome) -> String {
        format!(
            "Extracted {} entries to {}\n",
            outcome.file_count,
            outcome.extracted_path.display()
        )
    }

    fn format_diff(&self, diff: &ContainerDiff) -> String {
        if diff.is_identical() {
            return format!("Identical ({} members)\n", diff.unchanged);
        }

        let mut output = String::new();
        for name in &diff.changed {
            output.push_str(&format!("M {}\n", name));
        }
        for name in &diff.only_in_left {
            output.push_str(&format!("- {}\n", name));
        }
        for name in &diff.only_in_right {
            output.push_str(&format!("+ {}\n", name));
        }
        output.push_str(&format!(
            "{} changed, {} removed, {} added, {} unchanged\n",
            diff.changed.len(),
            diff.only_in_left.len(),
            diff.only_in_right.len(),
            diff.unchanged
        ));

        output
    }

    fn format_scan(&self, projects: &[ProjectEntry]) -> String {
        if projects.is_empty() {
            return "No containers found\n".to_string();
        }

        let mut output = String::new();
        output.push_str(&format!("{:>10} {:>10}  {}\n", "Size", "Modified", "Project"));
        output.push_str(&"-".repeat(70));
        output.push('\n');
        for project in projects {
            let modified = project
                .modified
                .map(format_date)
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "{:>10} {:>10}  {}\n",
                project.size_label, modified, project.relative_name
            ));
        }
        output.push_str(&format!("{} containers\n", projects.len()));

        output
    }

    fn format_doctor(&self, report: &CapabilityReport) -> String {
        let mut output = String::new();

        for capability in &report.available {
            output.push_str(&format!("ok      {}\n", capability));
        }
        for line in &report.warnings {
            output.push_str(&format!("warning {}\n", line));
        }
        for line in &report.errors {
            output.push_str(&format!("error   {}\n", line));
        }
        if report.available.is_empty() && report.warnings.is_empty() && report.errors.is_empty() {
            output.push_str("Nothing to check\n");
        }

        output
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_list(&self, members: &[Member]) -> String {
        let items: Vec<_> = members
            .iter()
            .map(|m| {
                json!({
                    "name": m.name,
                    "size": m.size_bytes,
                    "size_label": m.size_label(),
                    "category": m.category.label(),
                    "tag": m.category.tag(),
                })
            })
            .collect();

        serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_info(&self, info: Option<&ModelInfo>, breakdown: &SizeBreakdown) -> String {
        let categories: Vec<_> = breakdown
            .iter()
            .map(|(category, totals)| {
                json!({
                    "category": category.label(),
                    "members": totals.members,
                    "bytes": totals.bytes,
                })
            })
            .collect();

        let obj = json!({
            "info": info.map(|i| json!({
                "version": i.version,
                "title": i.title,
                "description": i.description,
                "member_count": i.member_count,
                "total_bytes": i.total_bytes,
                "text_bytes": i.text_bytes,
                "binary_bytes": i.binary_bytes,
                "text_percent": i.text_percent(),
                "binary_percent": i.binary_percent(),
            })),
            "categories": categories,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_params(&self, params: &[Parameter]) -> String {
        let items: Vec<_> = params
            .iter()
            .map(|p| {
                json!({
                    "name": p.name,
                    "value": p.value,
                    "description": p.description,
                    "unit": p.unit(),
                })
            })
            .collect();

        serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_patch(&self, outcome: &PatchOutcome, staged: usize, effective: usize) -> String {
        let obj = json!({
            "new_container_path": outcome.new_container_path.display().to_string(),
            "backup_path": outcome.backup_path.display().to_string(),
            "parameters_patched": outcome.parameters_patched,
            "staged": staged,
            "effective": effective,
            "unmatched": outcome.unmatched,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_extract(&self, outcome: &ExtractOutcome) -> String {
        let obj = json!({
            "extracted_path": outcome.extracted_path.display().to_string(),
            "file_count": outcome.file_count,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_diff(&self, diff: &ContainerDiff) -> String {
        let obj = json!({
            "identical": diff.is_identical(),
            "changed": diff.changed,
            "only_in_left": diff.only_in_left,
            "only_in_right": diff.only_in_right,
            "unchanged": diff.unchanged,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_scan(&self, projects: &[ProjectEntry]) -> String {
        let items: Vec<_> = projects
            .iter()
            .map(|p| {
                json!({
                    "path": p.path.display().to_string(),
                    "display_name": p.display_name,
                    "relative_name": p.relative_name,
                    "size": p.size_bytes,
                    "size_label": p.size_label,
                    "modified": p.modified.and_then(|t| t.duration_since(UNIX_EPOCH).ok()).map(|d| d.as_secs()),
                    "folder": p.folder.display().to_string(),
                })
            })
            .collect();

        serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_doctor(&self, report: &CapabilityReport) -> String {
        let obj = json!({
            "ok": report.is_ok(),
            "available": report.available.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "errors": report.errors,
            "warnings": report.warnings,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Formats a SystemTime as a `YYYY-MM-DD` date (UTC)
pub fn format_date(time: SystemTime) -> String {
    let Ok(duration) = time.duration_since(UNIX_EPOCH) else {
        return "-".to_string();
    };

    let mut year = 1970;
    let mut remaining_days = (duration.as_secs() / 86400) as i64;
    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining_days < days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let (month, day) = days_to_month_day(remaining_days as u32, is_leap_year(year));
    format!("{:04}-{:02}-{:02}", year, month, day)
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn days_to_month_day(day_of_year: u32, leap: bool) -> (u32, u32) {
    let february = if leap { 29 } else { 28 };
    let days_in_months: [u32; 12] = [31, february, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    let mut remaining = day_of_year;
    for (i, &days) in days_in_months.iter().enumerate() {
        if remaining < days {
            return (i as u32 + 1, remaining + 1);
        }
        remaining -= days;
    }

    (12, 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(UNIX_EPOCH), "1970-01-01");
        // 2024-02-29 12:00:00 UTC
        let leap_day = UNIX_EPOCH + Duration::from_secs(1_709_208_000);
        assert_eq!(format_date(leap_day), "2024-02-29");
    }

    #[test]
    fn test_human_params_empty() {
        assert_eq!(HumanFormatter.format_params(&[]), "No parameters found\n");
    }

    #[test]
    fn test_json_list_fields() {
        let out = JsonFormatter.format_list(&[Member::new("mesh.mphbin", 2048)]);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["category"], "Simulation Data");
        assert_eq!(value[0]["tag"], "binary");
        assert_eq!(value[0]["size_label"], "2.0 KB");
    }
}
