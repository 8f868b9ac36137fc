//! Text, Markdown, and JSON report generation.
//!
//! Large collections are truncated with a "+N more" marker; truncation is
//! purely presentational and never alters the canonical data, so the JSON
//! format always carries everything.

use crate::models::{Detection, Report};
use anyhow::Result;

/// Notice shown instead of an overview when the analyzer detected nothing.
const EMPTY_NOTICE: &str =
    "No project details detected. The archive was analyzed but nothing identifying was found.";

/// Rendering options.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Maximum rows per section before truncating.
    pub max_items: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { max_items: 25 }
    }
}

/// Split a collection into the visible slice and the hidden remainder count.
fn visible<T>(items: &[T], options: &RenderOptions) -> (usize, usize) {
    let shown = items.len().min(options.max_items);
    (shown, items.len() - shown)
}

fn more_marker(hidden: usize) -> String {
    if hidden > 0 {
        format!("  +{} more\n", hidden)
    } else {
        String::new()
    }
}

/// One rendered detection row, shared by both human-readable formats.
fn detection_line(detection: &Detection) -> String {
    let mut line = format!("{}: {}", detection.label(), detection.details());
    if let Some(confidence) = detection.confidence {
        line.push_str(&format!(" (confidence {})", confidence));
    }
    if let Some(ref source) = detection.source_file {
        line.push_str(&format!(" [{}]", source));
    }
    line
}

/// Generate a plain-text report for the terminal.
pub fn generate_text_report(report: &Report, options: &RenderOptions) -> String {
    let analysis = &report.analysis;
    let mut output = String::new();

    output.push_str(&format!("Analysis of {}\n", report.metadata.archive_name));
    output.push_str(&format!(
        "Analyzed at {} in {:.1}s\n\n",
        report.metadata.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.metadata.duration_seconds
    ));

    if analysis.is_empty {
        output.push_str(EMPTY_NOTICE);
        output.push('\n');
    } else {
        output.push_str("== Project Overview ==\n");
        output.push_str(&format!("  Project Type: {}\n", analysis.project_type));
        output.push_str(&format!("  Languages:    {}\n", join_or_none(&analysis.languages)));
        output.push_str(&format!("  Frameworks:   {}\n", join_or_none(&analysis.frameworks)));
        output.push_str(&format!("  Summary:      {}\n", analysis.summary));
    }

    if let Some(ref root) = analysis.project_root_name {
        output.push_str(&format!("  Root:         {}\n", root));
    }

    if let Some(ref build) = analysis.build_info {
        output.push_str("\n== Build Information ==\n");
        push_optional(&mut output, "Build Tool", build.build_tool.as_deref());
        push_optional(&mut output, "Java", build.java_version.as_deref());
        push_optional(&mut output, "Spring Boot", build.spring_boot_version.as_deref());
        push_optional(&mut output, "Node", build.node_version.as_deref());
        push_optional(&mut output, "Python", build.python_version.as_deref());
        if !build.dependencies.is_empty() {
            let (shown, hidden) = visible(&build.dependencies, options);
            output.push_str(&format!(
                "  Dependencies: {}\n",
                build.dependencies[..shown].join(", ")
            ));
            output.push_str(&more_marker(hidden));
        }
    }

    if !analysis.entry_points.is_empty() {
        output.push_str("\n== Entry Points ==\n");
        let (shown, hidden) = visible(&analysis.entry_points, options);
        for ep in &analysis.entry_points[..shown] {
            output.push_str(&format!(
                "  {} - {}.{}()\n",
                ep.file_path, ep.class_name, ep.method_name
            ));
        }
        output.push_str(&more_marker(hidden));
    }

    if !analysis.api_routes.is_empty() {
        output.push_str("\n== API Routes ==\n");
        let (shown, hidden) = visible(&analysis.api_routes, options);
        for route in &analysis.api_routes[..shown] {
            match route.controller {
                Some(ref controller) => output.push_str(&format!(
                    "  {:7} {}  ({})\n",
                    route.method, route.path, controller
                )),
                None => output.push_str(&format!("  {:7} {}\n", route.method, route.path)),
            }
        }
        output.push_str(&more_marker(hidden));
    }

    if !analysis.config_files.is_empty() {
        output.push_str("\n== Config Files ==\n");
        let (shown, hidden) = visible(&analysis.config_files, options);
        for file in &analysis.config_files[..shown] {
            match file.purpose {
                Some(ref purpose) => output.push_str(&format!(
                    "  {} [{}] - {}\n",
                    file.file_path, file.file_type, purpose
                )),
                None => output.push_str(&format!("  {} [{}]\n", file.file_path, file.file_type)),
            }
        }
        output.push_str(&more_marker(hidden));
    }

    if analysis.has_security_findings() {
        output.push_str("\n== Security ==\n");
        push_hints(&mut output, &analysis.security_hints, options);
        push_detections(&mut output, &analysis.security_detections, options);
    }

    if analysis.has_data_layer_findings() {
        output.push_str("\n== Data Layer ==\n");
        push_hints(&mut output, &analysis.data_layer_hints, options);
        push_detections(&mut output, &analysis.data_layer_detections, options);
    }

    if let Some(ref size) = analysis.project_size {
        output.push_str("\n== Project Size ==\n");
        if let Some(files) = size.file_count {
            output.push_str(&format!("  Files:       {}\n", files));
        }
        if let Some(lines) = size.total_lines {
            output.push_str(&format!("  Total Lines: {}\n", lines));
        }
        if let Some(kb) = size.total_size_kb {
            output.push_str(&format!("  Total Size:  {:.2} MB\n", kb / 1024.0));
        }
    }

    if let Some(ref structure) = analysis.project_structure {
        output.push_str("\n== Project Structure ==\n");
        push_optional(&mut output, "Root Path", structure.root_path.as_deref());
        if let Some(count) = structure.file_count {
            output.push_str(&format!("  Files:        {}\n", count));
        }
        if let Some(bytes) = structure.total_size {
            output.push_str(&format!(
                "  Total Size:   {:.2} MB\n",
                bytes as f64 / 1024.0 / 1024.0
            ));
        }
        if !structure.directories.is_empty() {
            let (shown, hidden) = visible(&structure.directories, options);
            output.push_str(&format!(
                "  Directories:  {}\n",
                structure.directories[..shown].join(", ")
            ));
            output.push_str(&more_marker(hidden));
        }
    }

    output
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None detected".to_string()
    } else {
        items.join(", ")
    }
}

fn push_optional(output: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        output.push_str(&format!("  {}: {}\n", label, value));
    }
}

fn push_hints(output: &mut String, hints: &[String], options: &RenderOptions) {
    let (shown, hidden) = visible(hints, options);
    for hint in &hints[..shown] {
        output.push_str(&format!("  - {}\n", hint));
    }
    output.push_str(&more_marker(hidden));
}

fn push_detections(output: &mut String, detections: &[Detection], options: &RenderOptions) {
    let (shown, hidden) = visible(detections, options);
    for detection in &detections[..shown] {
        output.push_str(&format!("  - {}\n", detection_line(detection)));
    }
    output.push_str(&more_marker(hidden));
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, options: &RenderOptions) -> String {
    let analysis = &report.analysis;
    let mut output = String::new();

    output.push_str("# Project Analysis\n\n");

    // Metadata section
    output.push_str(&format!("- **Archive:** {}\n", report.metadata.archive_name));
    output.push_str(&format!("- **Analyzer:** {}\n", report.metadata.analyzer_url));
    output.push_str(&format!(
        "- **Analyzed:** {}\n",
        report.metadata.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!(
        "- **Duration:** {:.1}s\n\n",
        report.metadata.duration_seconds
    ));

    if analysis.is_empty {
        output.push_str(&format!("> {}\n\n", EMPTY_NOTICE));
    } else {
        output.push_str("## Project Overview\n\n");
        output.push_str(&format!("- **Project Type:** {}\n", analysis.project_type));
        output.push_str(&format!(
            "- **Languages:** {}\n",
            join_or_none(&analysis.languages)
        ));
        output.push_str(&format!(
            "- **Frameworks:** {}\n\n",
            join_or_none(&analysis.frameworks)
        ));
        output.push_str(&format!("{}\n\n", analysis.summary));
    }

    if let Some(ref build) = analysis.build_info {
        output.push_str("## Build Information\n\n");
        push_md_optional(&mut output, "Build Tool", build.build_tool.as_deref());
        push_md_optional(&mut output, "Java Version", build.java_version.as_deref());
        push_md_optional(
            &mut output,
            "Spring Boot Version",
            build.spring_boot_version.as_deref(),
        );
        push_md_optional(&mut output, "Node Version", build.node_version.as_deref());
        push_md_optional(&mut output, "Python Version", build.python_version.as_deref());
        if !build.dependencies.is_empty() {
            let (shown, hidden) = visible(&build.dependencies, options);
            output.push_str(&format!(
                "- **Dependencies:** {}",
                build.dependencies[..shown].join(", ")
            ));
            if hidden > 0 {
                output.push_str(&format!(" *+{} more*", hidden));
            }
            output.push('\n');
        }
        output.push('\n');
    }

    if !analysis.entry_points.is_empty() {
        output.push_str("## Entry Points\n\n");
        let (shown, hidden) = visible(&analysis.entry_points, options);
        for ep in &analysis.entry_points[..shown] {
            output.push_str(&format!(
                "- `{}` - `{}.{}()`\n",
                ep.file_path, ep.class_name, ep.method_name
            ));
        }
        if hidden > 0 {
            output.push_str(&format!("- *+{} more*\n", hidden));
        }
        output.push('\n');
    }

    if !analysis.api_routes.is_empty() {
        output.push_str("## API Routes\n\n");
        output.push_str("| Method | Path | Controller |\n");
        output.push_str("|:---|:---|:---|\n");
        let (shown, hidden) = visible(&analysis.api_routes, options);
        for route in &analysis.api_routes[..shown] {
            output.push_str(&format!(
                "| {} | `{}` | {} |\n",
                route.method,
                route.path,
                route.controller.as_deref().unwrap_or("-")
            ));
        }
        if hidden > 0 {
            output.push_str(&format!("\n*+{} more routes*\n", hidden));
        }
        output.push('\n');
    }

    if !analysis.config_files.is_empty() {
        output.push_str("## Config Files\n\n");
        let (shown, hidden) = visible(&analysis.config_files, options);
        for file in &analysis.config_files[..shown] {
            match file.purpose {
                Some(ref purpose) => output.push_str(&format!(
                    "- `{}` ({}) - {}\n",
                    file.file_path, file.file_type, purpose
                )),
                None => {
                    output.push_str(&format!("- `{}` ({})\n", file.file_path, file.file_type))
                }
            }
        }
        if hidden > 0 {
            output.push_str(&format!("- *+{} more*\n", hidden));
        }
        output.push('\n');
    }

    if analysis.has_security_findings() {
        output.push_str("## Security Analysis\n\n");
        push_md_findings(
            &mut output,
            &analysis.security_hints,
            &analysis.security_detections,
            options,
        );
    }

    if analysis.has_data_layer_findings() {
        output.push_str("## Data Layer Analysis\n\n");
        push_md_findings(
            &mut output,
            &analysis.data_layer_hints,
            &analysis.data_layer_detections,
            options,
        );
    }

    if let Some(ref size) = analysis.project_size {
        output.push_str("## Project Size\n\n");
        if let Some(files) = size.file_count {
            output.push_str(&format!("- **Files:** {}\n", files));
        }
        if let Some(lines) = size.total_lines {
            output.push_str(&format!("- **Total Lines:** {}\n", lines));
        }
        if let Some(kb) = size.total_size_kb {
            output.push_str(&format!("- **Total Size:** {:.2} MB\n", kb / 1024.0));
        }
        output.push('\n');
    }

    if let Some(ref structure) = analysis.project_structure {
        output.push_str("## Project Structure\n\n");
        push_md_optional(&mut output, "Root Path", structure.root_path.as_deref());
        if let Some(count) = structure.file_count {
            output.push_str(&format!("- **Files:** {}\n", count));
        }
        if let Some(bytes) = structure.total_size {
            output.push_str(&format!(
                "- **Total Size:** {:.2} MB\n",
                bytes as f64 / 1024.0 / 1024.0
            ));
        }
        if !structure.directories.is_empty() {
            let (shown, hidden) = visible(&structure.directories, options);
            output.push_str(&format!(
                "- **Directories:** {}",
                structure.directories[..shown].join(", ")
            ));
            if hidden > 0 {
                output.push_str(&format!(" *+{} more*", hidden));
            }
            output.push('\n');
        }
        output.push('\n');
    }

    output
}

fn push_md_optional(output: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        output.push_str(&format!("- **{}:** {}\n", label, value));
    }
}

fn push_md_findings(
    output: &mut String,
    hints: &[String],
    detections: &[Detection],
    options: &RenderOptions,
) {
    let (shown, hidden) = visible(hints, options);
    for hint in &hints[..shown] {
        output.push_str(&format!("- {}\n", hint));
    }
    if hidden > 0 {
        output.push_str(&format!("- *+{} more*\n", hidden));
    }

    let (shown, hidden) = visible(detections, options);
    for detection in &detections[..shown] {
        output.push_str(&format!("- **{}**\n", detection_line(detection)));
    }
    if hidden > 0 {
        output.push_str(&format!("- *+{} more*\n", hidden));
    }
    output.push('\n');
}

/// Generate a JSON report. Never truncated.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Analysis, ApiRoute, BuildInfo, EntryPoint, ProjectSize, Report, ReportMetadata,
    };
    use chrono::Utc;

    fn make_report(analysis: Analysis) -> Report {
        Report {
            metadata: ReportMetadata {
                archive_name: "shop-backend.zip".to_string(),
                analyzer_url: "http://localhost:8080/api/explain".to_string(),
                analyzed_at: Utc::now(),
                duration_seconds: 4.2,
            },
            analysis,
        }
    }

    fn populated_analysis() -> Analysis {
        Analysis {
            project_type: "Spring Boot".to_string(),
            languages: vec!["Java".to_string()],
            frameworks: vec!["Spring".to_string()],
            summary: "A REST service".to_string(),
            entry_points: vec![EntryPoint {
                file_path: "src/Main.java".to_string(),
                class_name: "Main".to_string(),
                method_name: "main".to_string(),
            }],
            api_routes: vec![ApiRoute {
                method: "GET".to_string(),
                path: "/users".to_string(),
                controller: Some("UserController".to_string()),
            }],
            build_info: Some(BuildInfo {
                build_tool: Some("Maven".to_string()),
                java_version: Some("17".to_string()),
                ..BuildInfo::default()
            }),
            project_size: Some(ProjectSize {
                file_count: Some(120),
                total_lines: Some(15000),
                total_size_kb: Some(2048.0),
            }),
            security_detections: vec![Detection::default()],
            is_empty: false,
            ..Analysis::default()
        }
    }

    #[test]
    fn test_text_report_renders_sections() {
        let report = make_report(populated_analysis());
        let text = generate_text_report(&report, &RenderOptions::default());

        assert!(text.contains("shop-backend.zip"));
        assert!(text.contains("Project Type: Spring Boot"));
        assert!(text.contains("src/Main.java - Main.main()"));
        assert!(text.contains("GET     /users  (UserController)"));
        assert!(text.contains("Build Tool: Maven"));
        assert!(text.contains("Total Size:  2.00 MB"));
        assert!(!text.contains(EMPTY_NOTICE));
    }

    #[test]
    fn test_empty_detection_renders_presentation_placeholders() {
        let report = make_report(populated_analysis());
        let text = generate_text_report(&report, &RenderOptions::default());
        assert!(text.contains("Issue: No details"));
    }

    #[test]
    fn test_empty_analysis_renders_neutral_notice() {
        let report = make_report(Analysis::default());
        let text = generate_text_report(&report, &RenderOptions::default());
        assert!(text.contains("No project details detected"));
        assert!(!text.contains("Project Type:"));

        let markdown = generate_markdown_report(&report, &RenderOptions::default());
        assert!(markdown.contains("No project details detected"));
    }

    #[test]
    fn test_truncation_marker() {
        let mut analysis = populated_analysis();
        analysis.api_routes = (0..30)
            .map(|i| ApiRoute {
                method: "GET".to_string(),
                path: format!("/items/{}", i),
                controller: None,
            })
            .collect();

        let report = make_report(analysis);
        let options = RenderOptions { max_items: 10 };

        let text = generate_text_report(&report, &options);
        assert!(text.contains("/items/9"));
        assert!(!text.contains("/items/10"));
        assert!(text.contains("+20 more"));

        let markdown = generate_markdown_report(&report, &options);
        assert!(markdown.contains("*+20 more routes*"));
    }

    #[test]
    fn test_markdown_routes_table() {
        let report = make_report(populated_analysis());
        let markdown = generate_markdown_report(&report, &RenderOptions::default());
        assert!(markdown.contains("| Method | Path | Controller |"));
        assert!(markdown.contains("| GET | `/users` | UserController |"));
    }

    #[test]
    fn test_json_report_is_never_truncated() {
        let mut analysis = populated_analysis();
        analysis.languages = (0..100).map(|i| format!("lang{}", i)).collect();

        let report = make_report(analysis);
        let json = generate_json_report(&report).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["analysis"]["languages"].as_array().unwrap().len(), 100);
        assert_eq!(parsed["metadata"]["archive_name"], "shop-backend.zip");
    }
}
