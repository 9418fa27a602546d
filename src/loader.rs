// Locating, parsing and validating a client's `reports.json`.
//
// Validation runs before typed deserialization so a missing field is
// reported by its full path (`one_time_reports[1].file`) rather than by
// serde's bare field name.
use crate::error::{PortalError, Result};
use crate::types::ClientConfig;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "reports.json";
pub const OUTPUT_FILE_NAME: &str = "index.html";

const CLIENT_FIELDS: &[&str] = &["name", "slug", "campaign_status", "goal", "start_date"];
const METRIC_FIELDS: &[&str] = &[
    "keywords_at_1",
    "total_keywords",
    "goal_progress",
    "organic_clicks",
    "gbp_calls",
    "reviews",
    "review_rating",
    "citations",
];
const CONTACT_FIELDS: &[&str] = &["email", "phone", "calendar"];
const MONTH_FIELDS: &[&str] = &["month_name", "reports"];
const MONTHLY_ITEM_FIELDS: &[&str] = &["title", "description"];
const ONE_TIME_FIELDS: &[&str] = &["title", "description", "date", "file"];
const CHECKLIST_FIELDS: &[&str] = &["title", "description", "date"];

pub fn config_path(folder: &Path) -> PathBuf {
    folder.join(CONFIG_FILE_NAME)
}

pub fn output_path(folder: &Path) -> PathBuf {
    folder.join(OUTPUT_FILE_NAME)
}

/// Read `reports.json` from `folder` as an untyped JSON document.
pub fn read_document(folder: &Path) -> Result<Value> {
    let path = config_path(folder);
    if !path.is_file() {
        return Err(PortalError::ConfigNotFound(path));
    }
    debug!(path = %path.display(), "reading client config");
    let text = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Validate every required section and field, then deserialize.
///
/// Fields are checked in a fixed order and the first absent one is
/// reported, so the same document always yields the same error.
pub fn parse_config(doc: &Value) -> Result<ClientConfig> {
    require_fields(doc, "client", CLIENT_FIELDS)?;
    require_fields(doc, "metrics", METRIC_FIELDS)?;
    require_fields(doc, "contact", CONTACT_FIELDS)?;
    require(doc, "key_findings", "key_findings")?;

    for (i, month) in optional_list(doc, "monthly_reports").iter().enumerate() {
        let prefix = format!("monthly_reports[{}]", i);
        check_item(month, &prefix, MONTH_FIELDS)?;
        for (j, report) in optional_list(month, "reports").iter().enumerate() {
            check_item(report, &format!("{}.reports[{}]", prefix, j), MONTHLY_ITEM_FIELDS)?;
        }
    }
    for (i, report) in optional_list(doc, "one_time_reports").iter().enumerate() {
        check_item(report, &format!("one_time_reports[{}]", i), ONE_TIME_FIELDS)?;
    }
    for (i, checklist) in optional_list(doc, "checklists").iter().enumerate() {
        check_item(checklist, &format!("checklists[{}]", i), CHECKLIST_FIELDS)?;
    }

    Ok(ClientConfig::deserialize(doc)?)
}

fn require_fields(doc: &Value, section: &str, fields: &[&str]) -> Result<()> {
    let section_value = require(doc, section, section)?;
    check_item(section_value, section, fields)
}

fn check_item(item: &Value, prefix: &str, fields: &[&str]) -> Result<()> {
    if !item.is_object() {
        let err = <serde_json::Error as serde::de::Error>::custom(format!(
            "{} is not an object",
            prefix
        ));
        return Err(PortalError::MalformedConfig(err));
    }
    for field in fields {
        require(item, field, &format!("{}.{}", prefix, field))?;
    }
    Ok(())
}

// `null` is treated the same as an absent key.
fn require<'a>(value: &'a Value, key: &str, path: &str) -> Result<&'a Value> {
    value
        .get(key)
        .filter(|v| !v.is_null())
        .ok_or_else(|| PortalError::MissingRequiredField(path.to_string()))
}

// Non-array values are left for deserialization to reject.
fn optional_list<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn minimal() -> Value {
        json!({
            "client": {
                "name": "Acme Plumbing",
                "slug": "acme-plumbing",
                "campaign_status": "Active",
                "goal": "Reach #1 for 20 keywords",
                "start_date": "Jan 2025"
            },
            "metrics": {
                "keywords_at_1": 5, "total_keywords": 20, "goal_progress": 25,
                "organic_clicks": 120, "gbp_calls": 10, "reviews": 30,
                "review_rating": 4.8, "citations": 15
            },
            "contact": { "email": "a@b.com", "phone": "555-1234", "calendar": "https://cal.example/acme" },
            "key_findings": {}
        })
    }

    fn missing_field(doc: &Value) -> String {
        match parse_config(doc) {
            Err(PortalError::MissingRequiredField(path)) => path,
            other => panic!("expected MissingRequiredField, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_minimal_config_parses_with_defaults() {
        let cfg = parse_config(&minimal()).unwrap();
        assert_eq!(cfg.client.name, "Acme Plumbing");
        assert!(cfg.monthly_reports.is_empty());
        assert!(cfg.one_time_reports.is_empty());
        assert!(cfg.checklists.is_empty());
        assert!(cfg.key_findings.resolved.is_empty());
        assert_eq!(cfg.metrics.gbp_calls_note, None);
    }

    #[test]
    fn test_missing_sections_are_named() {
        for section in ["client", "metrics", "contact", "key_findings"] {
            let mut doc = minimal();
            doc.as_object_mut().unwrap().remove(section);
            assert_eq!(missing_field(&doc), section);
        }
    }

    #[test]
    fn test_missing_leaf_field_is_named() {
        let mut doc = minimal();
        doc["client"].as_object_mut().unwrap().remove("name");
        assert_eq!(missing_field(&doc), "client.name");

        let mut doc = minimal();
        doc["metrics"]["keywords_at_1"] = Value::Null;
        assert_eq!(missing_field(&doc), "metrics.keywords_at_1");
    }

    #[test]
    fn test_first_missing_field_wins() {
        let mut doc = minimal();
        doc["contact"].as_object_mut().unwrap().remove("phone");
        doc["client"].as_object_mut().unwrap().remove("goal");
        assert_eq!(missing_field(&doc), "client.goal");
    }

    #[test]
    fn test_nested_item_paths() {
        let mut doc = minimal();
        doc["one_time_reports"] = json!([
            { "title": "Audit", "description": "d", "date": "Jan", "file": "audit.html" },
            { "title": "Strategy", "description": "d", "date": "Feb" }
        ]);
        assert_eq!(missing_field(&doc), "one_time_reports[1].file");

        let mut doc = minimal();
        doc["monthly_reports"] = json!([
            { "month_name": "May", "reports": [ { "title": "SEO" } ] }
        ]);
        assert_eq!(missing_field(&doc), "monthly_reports[0].reports[0].description");
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let mut doc = minimal();
        doc["key_findings"]["resolved"] = json!("not a list");
        assert!(matches!(parse_config(&doc), Err(PortalError::MalformedConfig(_))));
    }

    #[test]
    fn test_non_object_section_is_malformed() {
        let mut doc = minimal();
        doc["client"] = json!("Acme Plumbing");
        match parse_config(&doc) {
            Err(PortalError::MalformedConfig(err)) => assert!(err.to_string().contains("client is not an object")),
            other => panic!("expected MalformedConfig, got {:?}", other.map(|_| ())),
        }

        let mut doc = minimal();
        doc["monthly_reports"] = json!(["March"]);
        match parse_config(&doc) {
            Err(PortalError::MalformedConfig(err)) => {
                assert!(err.to_string().contains("monthly_reports[0] is not an object"))
            }
            other => panic!("expected MalformedConfig, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_null_is_current_parses() {
        let mut doc = minimal();
        doc["monthly_reports"] = json!([
            { "month_name": "May", "is_current": null, "reports": [] }
        ]);
        let cfg = parse_config(&doc).unwrap();
        assert!(!cfg.monthly_reports[0].is_current());
    }

    #[test]
    fn test_read_document_not_found() {
        let dir = tempdir().unwrap();
        match read_document(dir.path()) {
            Err(PortalError::ConfigNotFound(path)) => assert_eq!(path, config_path(dir.path())),
            other => panic!("expected ConfigNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_read_document_malformed_json() {
        let dir = tempdir().unwrap();
        fs::write(config_path(dir.path()), "{ not json").unwrap();
        assert!(matches!(read_document(dir.path()), Err(PortalError::MalformedConfig(_))));
    }

    #[test]
    fn test_read_and_parse_from_disk() {
        let dir = tempdir().unwrap();
        fs::write(config_path(dir.path()), minimal().to_string()).unwrap();
        let cfg = parse_config(&read_document(dir.path()).unwrap()).unwrap();
        assert_eq!(cfg.contact.email, "a@b.com");
    }
}
