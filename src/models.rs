//! Data models for analyzer results.
//!
//! This module contains the canonical [`Analysis`] record produced by the
//! normalizer, its sub-records, and the report envelope. After normalization
//! every field is present: strings that must always display carry a documented
//! placeholder instead of being optional, and genuinely optional data is an
//! explicit `Option`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project type shown when the analyzer reported none.
pub const UNKNOWN_PROJECT_TYPE: &str = "Unknown";

/// Summary shown when the analyzer reported none.
pub const DEFAULT_SUMMARY: &str = "Backend project analysis";

/// Placeholder for a missing entry-point or config-file path.
pub const UNKNOWN_FILE: &str = "Unknown file";

/// Placeholder for a missing entry-point class name.
pub const PLACEHOLDER_CLASS: &str = "Class";

/// Placeholder for a missing entry-point method name.
pub const PLACEHOLDER_METHOD: &str = "method";

/// Placeholder for a route with no HTTP method.
pub const UNKNOWN_HTTP_METHOD: &str = "UNKNOWN";

/// Placeholder for a route where neither `path` nor `handler` resolved.
pub const UNKNOWN_PATH: &str = "Unknown path";

/// Placeholder for a config file with no type.
pub const UNKNOWN_FILE_TYPE: &str = "Unknown";

/// The canonical, fully-defaulted view of one analyzer response.
///
/// Constructed once per successful upload by [`crate::normalize::normalize`]
/// and never mutated afterwards; a new submission replaces the whole value.
/// Serializes with the wire names of the newest backend schema, so a
/// serialized `Analysis` normalizes back to an equal `Analysis`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Analysis {
    /// Detected project type, e.g. "Spring Boot".
    pub project_type: String,
    /// Detected programming languages, in detection order.
    pub languages: Vec<String>,
    /// Detected frameworks, in detection order.
    pub frameworks: Vec<String>,
    /// One-paragraph description of the project.
    pub summary: String,
    /// Application entry points.
    pub entry_points: Vec<EntryPoint>,
    /// Build and configuration files found in the archive.
    pub config_files: Vec<ConfigFile>,
    /// Whether the analyzer believes the project exposes an API.
    pub api_detected: bool,
    /// Detected API routes. Routes are never dropped for missing fields.
    pub api_routes: Vec<ApiRoute>,
    /// Free-form security hints.
    pub security_hints: Vec<String>,
    /// Structured security findings.
    pub security_detections: Vec<Detection>,
    /// Free-form data-layer hints (databases, ORMs).
    pub data_layer_hints: Vec<String>,
    /// Structured data-layer findings.
    pub data_layer_detections: Vec<Detection>,
    /// Build tooling details. Absent when the analyzer reported none;
    /// never synthesized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_info: Option<BuildInfo>,
    /// Directory layout summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_structure: Option<ProjectStructure>,
    /// Primary-framework detection with evidence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework_detection: Option<FrameworkDetection>,
    /// Size statistics for the analyzed archive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_size: Option<ProjectSize>,
    /// Root directory name inside the uploaded archive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_root_name: Option<String>,
    /// Advisory flag: the response was structurally valid but carried no
    /// useful data. Not an error; lets renderers show a neutral empty state.
    pub is_empty: bool,
}

impl Default for Analysis {
    fn default() -> Self {
        Self {
            project_type: UNKNOWN_PROJECT_TYPE.to_string(),
            languages: Vec::new(),
            frameworks: Vec::new(),
            summary: DEFAULT_SUMMARY.to_string(),
            entry_points: Vec::new(),
            config_files: Vec::new(),
            api_detected: false,
            api_routes: Vec::new(),
            security_hints: Vec::new(),
            security_detections: Vec::new(),
            data_layer_hints: Vec::new(),
            data_layer_detections: Vec::new(),
            build_info: None,
            project_structure: None,
            framework_detection: None,
            project_size: None,
            project_root_name: None,
            is_empty: true,
        }
    }
}

impl Analysis {
    /// Returns true if any security information was reported.
    pub fn has_security_findings(&self) -> bool {
        !self.security_hints.is_empty() || !self.security_detections.is_empty()
    }

    /// Returns true if any data-layer information was reported.
    pub fn has_data_layer_findings(&self) -> bool {
        !self.data_layer_hints.is_empty() || !self.data_layer_detections.is_empty()
    }
}

/// An application entry point. Fields always display, so each one falls back
/// to a placeholder rather than being optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryPoint {
    pub file_path: String,
    pub class_name: String,
    pub method_name: String,
}

impl Default for EntryPoint {
    fn default() -> Self {
        Self {
            file_path: UNKNOWN_FILE.to_string(),
            class_name: PLACEHOLDER_CLASS.to_string(),
            method_name: PLACEHOLDER_METHOD.to_string(),
        }
    }
}

/// A build or configuration file found in the archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigFile {
    pub file_path: String,
    pub file_type: String,
    /// What the file configures, when the analyzer could tell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            file_path: UNKNOWN_FILE.to_string(),
            file_type: UNKNOWN_FILE_TYPE.to_string(),
            purpose: None,
        }
    }
}

/// A detected API route. The normalizer retains every route it sees; a route
/// with no usable fields still gets its placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiRoute {
    /// HTTP method, passed through verbatim.
    pub method: String,
    /// Route path, or the handler name when only that was reported.
    pub path: String,
    /// Controller class, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
}

impl Default for ApiRoute {
    fn default() -> Self {
        Self {
            method: UNKNOWN_HTTP_METHOD.to_string(),
            path: UNKNOWN_PATH.to_string(),
            controller: None,
        }
    }
}

/// A structured security or data-layer finding.
///
/// All fields are genuinely optional: the normalizer preserves raw
/// optionality here, and placeholder substitution happens at the rendering
/// boundary via [`Detection::label`] and [`Detection::details`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Detection {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Confidence as reported, unclamped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl Detection {
    /// Label used by renderers when the detection carries no type.
    pub fn label(&self) -> &str {
        self.kind.as_deref().unwrap_or("Issue")
    }

    /// Description used by renderers when the detection carries none.
    pub fn details(&self) -> &str {
        self.description.as_deref().unwrap_or("No details")
    }
}

/// Build tooling details. Ecosystem-specific version fields are simply absent
/// for other ecosystems, never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_tool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub java_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spring_boot_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_version: Option<String>,
    pub dependencies: Vec<String>,
}

/// Directory layout summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectStructure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_path: Option<String>,
    pub directories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_count: Option<u64>,
    /// Total size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_size: Option<u64>,
}

/// Primary-framework detection with supporting evidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameworkDetection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub evidence: Vec<String>,
}

/// Size statistics for the analyzed archive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSize {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_lines: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_size_kb: Option<f64>,
}

/// Metadata about one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Name of the uploaded archive.
    pub archive_name: String,
    /// Base URL of the analyzer service.
    pub analyzer_url: String,
    /// Date and time of the analysis.
    pub analyzed_at: DateTime<Utc>,
    /// Duration of the round trip in seconds.
    pub duration_seconds: f64,
}

/// The complete report handed to renderers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub analysis: Analysis,
}
