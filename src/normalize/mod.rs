//! Schema-tolerant normalization of analyzer responses.
//!
//! The analyzer backend has shipped at least three incompatible response
//! shapes: everything nested under a `projectMetadata` object, everything
//! flat on the root, and hybrids mixing both with inconsistent optionality.
//! Several fields were renamed along the way (`detectedLanguages` vs
//! `languages`, per-element `file` vs `filePath`, and so on). Rather than
//! teaching every consumer about every vintage, [`normalize`] reconciles any
//! of them into one canonical [`Analysis`] with every field defaulted.
//!
//! Normalization is pure and total: it never fails, for any JSON value
//! including `null`, and it is idempotent, so an already-canonical result
//! passes through unchanged. Anything malformed degrades to its documented
//! default instead of erroring; the schema is known to keep drifting between
//! analyzer deployments.

mod resolve;

use serde_json::Value;
use tracing::debug;

use crate::models::{
    Analysis, ApiRoute, BuildInfo, ConfigFile, Detection, EntryPoint, FrameworkDetection,
    ProjectSize, ProjectStructure, DEFAULT_SUMMARY, PLACEHOLDER_CLASS, PLACEHOLDER_METHOD,
    UNKNOWN_FILE, UNKNOWN_FILE_TYPE, UNKNOWN_HTTP_METHOD, UNKNOWN_PATH, UNKNOWN_PROJECT_TYPE,
};

/// Ordered key candidates per canonical field, tried within the nested
/// container first and then the root. The first spelling is what the backend
/// currently emits; later spellings appeared in older responses.
mod keys {
    pub const PROJECT_TYPE: &[&str] = &["projectType"];
    pub const LANGUAGES: &[&str] = &["detectedLanguages", "languages"];
    pub const FRAMEWORKS: &[&str] = &["detectedFrameworks", "frameworks"];
    pub const SUMMARY: &[&str] = &["summary"];
    pub const ENTRY_POINTS: &[&str] = &["entryPoints"];
    pub const CONFIG_FILES: &[&str] = &["configFiles"];
    pub const API_DETECTED: &[&str] = &["apiDetected"];
    pub const API_ROUTES: &[&str] = &["apiRoutes"];
    pub const SECURITY_HINTS: &[&str] = &["securityHints"];
    pub const SECURITY_DETECTIONS: &[&str] = &["securityDetections"];
    pub const DATA_LAYER_HINTS: &[&str] = &["dataLayerHints", "databaseHints"];
    pub const DATA_LAYER_DETECTIONS: &[&str] = &["dataLayerDetections"];
    pub const BUILD_INFO: &[&str] = &["buildInfo"];
    pub const PROJECT_STRUCTURE: &[&str] = &["projectStructure"];
    pub const FRAMEWORK_DETECTION: &[&str] = &["frameworkDetection"];
    pub const PROJECT_SIZE: &[&str] = &["projectSize"];
    pub const PROJECT_ROOT_NAME: &[&str] = &["projectRootName"];
}

/// Normalize one decoded analyzer response into the canonical [`Analysis`].
///
/// Each field resolves independently: nested `projectMetadata` entries win
/// over root entries, the current wire spelling wins over legacy spellings,
/// `null` never wins, and an empty list is a real (winning) value. Whole
/// objects such as `buildInfo` are taken from a single source and are never
/// field-merged across candidates.
pub fn normalize(raw: &Value) -> Analysis {
    let project_type = resolve::string_or(raw, keys::PROJECT_TYPE, UNKNOWN_PROJECT_TYPE);
    let languages = resolve::string_list(raw, keys::LANGUAGES);
    let frameworks = resolve::string_list(raw, keys::FRAMEWORKS);

    // "No useful data": nothing identifying the project resolved, so let
    // renderers show a neutral empty state instead of a populated-looking
    // overview. Advisory only, not an error.
    let is_empty =
        project_type == UNKNOWN_PROJECT_TYPE && languages.is_empty() && frameworks.is_empty();
    if is_empty {
        debug!("analyzer response carried no identifying project data");
    }

    Analysis {
        project_type,
        languages,
        frameworks,
        summary: resolve::string_or(raw, keys::SUMMARY, DEFAULT_SUMMARY),
        entry_points: collect(raw, keys::ENTRY_POINTS, entry_point),
        config_files: collect(raw, keys::CONFIG_FILES, config_file),
        api_detected: resolve::bool_or(raw, keys::API_DETECTED, false),
        api_routes: collect(raw, keys::API_ROUTES, api_route),
        security_hints: resolve::string_list(raw, keys::SECURITY_HINTS),
        security_detections: collect(raw, keys::SECURITY_DETECTIONS, detection),
        data_layer_hints: resolve::string_list(raw, keys::DATA_LAYER_HINTS),
        data_layer_detections: collect(raw, keys::DATA_LAYER_DETECTIONS, detection),
        build_info: resolve::object(raw, keys::BUILD_INFO).map(build_info),
        project_structure: resolve::object(raw, keys::PROJECT_STRUCTURE).map(project_structure),
        framework_detection: resolve::object(raw, keys::FRAMEWORK_DETECTION)
            .map(framework_detection),
        project_size: resolve::object(raw, keys::PROJECT_SIZE).map(project_size),
        project_root_name: resolve::opt_string(raw, keys::PROJECT_ROOT_NAME),
        is_empty,
    }
}

/// Resolve a collection field and normalize each element. Elements are never
/// dropped; a useless element still yields a fully-placeholder record.
fn collect<T>(raw: &Value, keys: &[&str], element: fn(&Value) -> T) -> Vec<T> {
    resolve::list(raw, keys)
        .map(|items| items.iter().map(element).collect())
        .unwrap_or_default()
}

fn entry_point(value: &Value) -> EntryPoint {
    EntryPoint {
        file_path: resolve::elem_string_or(value, &["filePath", "file"], UNKNOWN_FILE),
        class_name: resolve::elem_string_or(value, &["className", "class"], PLACEHOLDER_CLASS),
        method_name: resolve::elem_string_or(value, &["methodName", "method"], PLACEHOLDER_METHOD),
    }
}

fn config_file(value: &Value) -> ConfigFile {
    ConfigFile {
        file_path: resolve::elem_string_or(value, &["filePath", "file"], UNKNOWN_FILE),
        file_type: resolve::elem_string_or(value, &["fileType", "type"], UNKNOWN_FILE_TYPE),
        purpose: resolve::elem_opt_string(value, &["purpose"]),
    }
}

fn api_route(value: &Value) -> ApiRoute {
    // The oldest responses listed routes as bare strings.
    if let Some(path) = value.as_str() {
        return ApiRoute {
            method: UNKNOWN_HTTP_METHOD.to_string(),
            path: path.to_string(),
            controller: None,
        };
    }
    ApiRoute {
        method: resolve::elem_string_or(value, &["method"], UNKNOWN_HTTP_METHOD),
        path: resolve::elem_string_or(value, &["path", "handler"], UNKNOWN_PATH),
        controller: resolve::elem_opt_string(value, &["controller"]),
    }
}

fn detection(value: &Value) -> Detection {
    Detection {
        kind: resolve::elem_opt_string(value, &["type", "name"]),
        confidence: resolve::elem_opt_f64(value, &["confidence"]),
        description: resolve::elem_opt_string(value, &["description", "reason"]),
        source_file: resolve::elem_opt_string(value, &["sourceFile"]),
    }
}

fn build_info(value: &Value) -> BuildInfo {
    BuildInfo {
        build_tool: resolve::elem_opt_string(value, &["buildTool"]),
        java_version: resolve::elem_opt_string(value, &["javaVersion"]),
        spring_boot_version: resolve::elem_opt_string(value, &["springBootVersion"]),
        node_version: resolve::elem_opt_string(value, &["nodeVersion"]),
        python_version: resolve::elem_opt_string(value, &["pythonVersion"]),
        dependencies: resolve::elem_string_list(value, &["dependencies"]),
    }
}

fn project_structure(value: &Value) -> ProjectStructure {
    ProjectStructure {
        root_path: resolve::elem_opt_string(value, &["rootPath", "sourceDirectory"]),
        directories: resolve::elem_string_list(value, &["directories"]),
        file_count: resolve::elem_opt_u64(value, &["fileCount"]),
        total_size: resolve::elem_opt_u64(value, &["totalSize"]),
    }
}

fn framework_detection(value: &Value) -> FrameworkDetection {
    FrameworkDetection {
        framework: resolve::elem_opt_string(value, &["framework"]),
        confidence: resolve::elem_opt_f64(value, &["confidence"]),
        evidence: resolve::elem_string_list(value, &["evidence"]),
    }
}

fn project_size(value: &Value) -> ProjectSize {
    ProjectSize {
        file_count: resolve::elem_opt_u64(value, &["fileCount", "totalFileCount"]),
        total_lines: resolve::elem_opt_u64(value, &["totalLines"]),
        total_size_kb: resolve::elem_opt_f64(value, &["totalSizeKb"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renormalize(analysis: &Analysis) -> Analysis {
        normalize(&serde_json::to_value(analysis).expect("canonical form serializes"))
    }

    #[test]
    fn test_empty_object_yields_full_defaults() {
        let analysis = normalize(&json!({}));
        assert_eq!(analysis, Analysis::default());
        assert!(analysis.is_empty);
    }

    #[test]
    fn test_null_and_scalars_yield_full_defaults() {
        for raw in [json!(null), json!(17), json!("zip"), json!([true])] {
            assert_eq!(normalize(&raw), Analysis::default());
        }
    }

    #[test]
    fn test_nested_shape_resolves() {
        let raw = json!({
            "projectMetadata": {
                "projectType": "Spring Boot",
                "detectedLanguages": ["Java"],
                "detectedFrameworks": ["Spring"],
                "summary": "A REST service",
                "apiDetected": true,
                "apiRoutes": [{ "method": "GET", "path": "/users", "controller": "UserController" }]
            }
        });

        let analysis = normalize(&raw);
        assert_eq!(analysis.project_type, "Spring Boot");
        assert_eq!(analysis.languages, vec!["Java"]);
        assert_eq!(analysis.frameworks, vec!["Spring"]);
        assert_eq!(analysis.summary, "A REST service");
        assert!(analysis.api_detected);
        assert_eq!(analysis.api_routes[0].path, "/users");
        assert!(!analysis.is_empty);
    }

    #[test]
    fn test_flat_legacy_shape_resolves() {
        let raw = json!({
            "projectType": "Express",
            "languages": ["JavaScript"],
            "frameworks": ["Express"]
        });

        let analysis = normalize(&raw);
        assert_eq!(analysis.project_type, "Express");
        assert_eq!(analysis.languages, vec!["JavaScript"]);
        assert!(!analysis.is_empty);
    }

    #[test]
    fn test_hybrid_shape_prefers_nested_per_field() {
        // Each field resolves independently; missing nested fields fall
        // through to the root.
        let raw = json!({
            "projectMetadata": { "projectType": "Spring Boot" },
            "languages": ["Java"],
            "summary": "Hybrid response"
        });

        let analysis = normalize(&raw);
        assert_eq!(analysis.project_type, "Spring Boot");
        assert_eq!(analysis.languages, vec!["Java"]);
        assert_eq!(analysis.summary, "Hybrid response");
    }

    #[test]
    fn test_alias_precedence_within_one_tier() {
        let raw = json!({ "detectedLanguages": ["Java"], "languages": ["Go"] });
        assert_eq!(normalize(&raw).languages, vec!["Java"]);
    }

    #[test]
    fn test_empty_list_is_present_and_wins() {
        let raw = json!({
            "projectMetadata": { "detectedLanguages": [] },
            "languages": ["Go"]
        });
        assert!(normalize(&raw).languages.is_empty());
    }

    #[test]
    fn test_null_falls_through_to_next_source() {
        let raw = json!({
            "projectMetadata": { "detectedLanguages": null, "languages": null },
            "languages": ["Go"]
        });
        assert_eq!(normalize(&raw).languages, vec!["Go"]);
    }

    #[test]
    fn test_build_info_never_merges_across_sources() {
        let raw = json!({
            "projectMetadata": { "buildInfo": { "buildTool": "Maven" } },
            "buildInfo": { "javaVersion": "17" }
        });

        let build = normalize(&raw).build_info.expect("nested buildInfo wins");
        assert_eq!(build.build_tool.as_deref(), Some("Maven"));
        // javaVersion must NOT be pulled from the root candidate.
        assert_eq!(build.java_version, None);
    }

    #[test]
    fn test_build_info_absent_is_not_synthesized() {
        assert_eq!(normalize(&json!({})).build_info, None);
    }

    #[test]
    fn test_emptiness_flag() {
        assert!(normalize(&json!({})).is_empty);
        assert!(!normalize(&json!({ "projectType": "Spring Boot" })).is_empty);
        assert!(!normalize(&json!({ "languages": ["Go"] })).is_empty);
        // An explicit "Unknown" is still no useful data.
        assert!(normalize(&json!({ "projectType": "Unknown" })).is_empty);
    }

    #[test]
    fn test_entry_point_placeholders() {
        let analysis = normalize(&json!({ "entryPoints": [{}] }));
        assert_eq!(analysis.entry_points.len(), 1);
        let ep = &analysis.entry_points[0];
        assert_eq!(ep.file_path, "Unknown file");
        assert_eq!(ep.class_name, "Class");
        assert_eq!(ep.method_name, "method");
    }

    #[test]
    fn test_entry_point_short_key_drift() {
        let raw = json!({
            "entryPoints": [{ "file": "src/Main.java", "class": "Main", "method": "main" }]
        });
        let ep = &normalize(&raw).entry_points[0];
        assert_eq!(ep.file_path, "src/Main.java");
        assert_eq!(ep.class_name, "Main");
        assert_eq!(ep.method_name, "main");
    }

    #[test]
    fn test_routes_are_never_dropped() {
        let analysis = normalize(&json!({ "apiRoutes": [{}] }));
        assert_eq!(analysis.api_routes.len(), 1);
        assert_eq!(analysis.api_routes[0].method, "UNKNOWN");
        assert_eq!(analysis.api_routes[0].path, "Unknown path");
    }

    #[test]
    fn test_route_handler_fallback() {
        let raw = json!({ "apiRoutes": [{ "method": "POST", "handler": "createUser" }] });
        let route = &normalize(&raw).api_routes[0];
        assert_eq!(route.method, "POST");
        assert_eq!(route.path, "createUser");
    }

    #[test]
    fn test_bare_string_routes() {
        let raw = json!({ "apiRoutes": ["GET /users", "POST /users"] });
        let analysis = normalize(&raw);
        assert_eq!(analysis.api_routes.len(), 2);
        assert_eq!(analysis.api_routes[0].method, "UNKNOWN");
        assert_eq!(analysis.api_routes[0].path, "GET /users");
    }

    #[test]
    fn test_detection_aliases_and_confidence_passthrough() {
        let raw = json!({
            "securityDetections": [
                { "name": "Spring Security", "reason": "starter on the classpath", "confidence": 250 },
                {}
            ]
        });

        let detections = normalize(&raw).security_detections;
        assert_eq!(detections[0].kind.as_deref(), Some("Spring Security"));
        assert_eq!(
            detections[0].description.as_deref(),
            Some("starter on the classpath")
        );
        // Unclamped pass-through, even out of any sane range.
        assert_eq!(detections[0].confidence, Some(250.0));
        // Optionality is preserved; placeholders are a rendering concern.
        assert_eq!(detections[1].kind, None);
        assert_eq!(detections[1].description, None);
    }

    #[test]
    fn test_database_hints_legacy_alias() {
        let raw = json!({ "databaseHints": ["jdbc:postgresql"] });
        assert_eq!(normalize(&raw).data_layer_hints, vec!["jdbc:postgresql"]);
    }

    #[test]
    fn test_project_size_legacy_count_alias() {
        let raw = json!({ "projectSize": { "totalFileCount": 42, "totalLines": 9000 } });
        let size = normalize(&raw).project_size.expect("object resolves");
        assert_eq!(size.file_count, Some(42));
        assert_eq!(size.total_lines, Some(9000));
        assert_eq!(size.total_size_kb, None);
    }

    #[test]
    fn test_idempotence_on_representative_shapes() {
        let shapes = [
            json!({}),
            json!(null),
            json!({ "projectType": "Spring Boot", "detectedLanguages": ["Java"] }),
            json!({
                "projectMetadata": {
                    "projectType": "Django",
                    "detectedFrameworks": ["Django"],
                    "entryPoints": [{}, { "file": "manage.py" }],
                    "apiRoutes": ["GET /api/items", {}],
                    "buildInfo": { "buildTool": "pip", "pythonVersion": "3.12" },
                    "securityDetections": [{ "confidence": 1 }]
                }
            }),
        ];

        for raw in shapes {
            let once = normalize(&raw);
            assert_eq!(renormalize(&once), once, "not idempotent for {raw}");
        }
    }

    #[test]
    fn test_collections_not_merged_across_sources() {
        let raw = json!({
            "projectMetadata": { "apiRoutes": [{ "path": "/nested" }] },
            "apiRoutes": [{ "path": "/root" }, { "path": "/extra" }]
        });
        let routes = normalize(&raw).api_routes;
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/nested");
    }
}
