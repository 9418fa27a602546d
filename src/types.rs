use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::Deserialize;

/// One client's `reports.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub client: ClientProfile,
    pub metrics: MetricsSnapshot,
    pub contact: ContactInfo,
    pub key_findings: KeyFindings,
    #[serde(default)]
    pub monthly_reports: Vec<MonthlyReportGroup>,
    #[serde(default)]
    pub one_time_reports: Vec<OneTimeReport>,
    #[serde(default)]
    pub checklists: Vec<Checklist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientProfile {
    pub name: String,
    pub slug: String,
    pub campaign_status: String,
    pub goal: String,
    pub start_date: String,
}

impl ClientProfile {
    /// File name offered by the in-page "Download PDF" button.
    pub fn pdf_file_name(&self) -> String {
        format!("Client_Portal_{}.pdf", self.slug.replace('-', "_"))
    }
}

/// A metric as written in the config. Numbers keep their JSON spelling so
/// `4.8` renders as `4.8` and `20` as `20`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSnapshot {
    pub keywords_at_1: MetricValue,
    pub total_keywords: MetricValue,
    /// Percentage, 0..=100.
    pub goal_progress: MetricValue,
    pub organic_clicks: MetricValue,
    pub gbp_calls: MetricValue,
    pub reviews: MetricValue,
    pub review_rating: MetricValue,
    pub citations: MetricValue,
    #[serde(default)]
    pub gbp_calls_note: Option<String>,
    #[serde(default)]
    pub citations_note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub calendar: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyFindings {
    #[serde(default)]
    pub resolved: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub next_focus: Vec<String>,
    #[serde(default)]
    pub resolved_note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyReportGroup {
    pub month_name: String,
    /// Absent or `null` means archived.
    #[serde(default)]
    pub is_current: Option<bool>,
    pub reports: Vec<ReportItem>,
}

impl MonthlyReportGroup {
    pub fn is_current(&self) -> bool {
        self.is_current.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportItem {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub badge_color: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub available_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OneTimeReport {
    pub title: String,
    pub description: String,
    pub date: String,
    pub file: String,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub badge_color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Checklist {
    pub title: String,
    pub description: String,
    pub date: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub badge_color: Option<String>,
}

/// The three kinds of card the portal renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Monthly,
    OneTime,
    Checklist,
}

/// Per-kind fallbacks, kept in one place instead of at each call site.
#[derive(Debug, Clone, Copy)]
pub struct ItemDefaults {
    pub badge_color: &'static str,
    pub badge: &'static str,
    pub link_label: &'static str,
    /// Green badges also turn the card header green.
    pub green_header: bool,
}

impl ItemKind {
    pub fn defaults(self) -> ItemDefaults {
        match self {
            ItemKind::Monthly => ItemDefaults {
                badge_color: "blue",
                badge: "",
                link_label: "View Report &rarr;",
                green_header: false,
            },
            ItemKind::OneTime => ItemDefaults {
                badge_color: "purple",
                badge: "One-Time",
                link_label: "View Report &rarr;",
                green_header: true,
            },
            ItemKind::Checklist => ItemDefaults {
                badge_color: "teal",
                badge: "In Progress",
                link_label: "View Checklist &rarr;",
                green_header: true,
            },
        }
    }

    /// Text of the disabled link shown when an item has no file yet.
    pub fn pending_label(self, available_date: Option<&str>) -> String {
        match self {
            ItemKind::Checklist => "Starting Soon".to_string(),
            ItemKind::Monthly | ItemKind::OneTime => {
                format!("Available {}", available_date.unwrap_or("Soon"))
            }
        }
    }
}

/// Card-level view shared by monthly reports, one-time reports and checklists.
#[derive(Debug, Clone)]
pub struct Card<'a> {
    pub kind: ItemKind,
    pub title: &'a str,
    pub description: &'a str,
    /// Month name for monthly reports, the item's own date otherwise.
    pub date: &'a str,
    pub badge: Option<&'a str>,
    pub badge_color: Option<&'a str>,
    pub file: Option<&'a str>,
    pub available_date: Option<&'a str>,
}

impl<'a> Card<'a> {
    pub fn monthly(report: &'a ReportItem, month_name: &'a str) -> Self {
        Card {
            kind: ItemKind::Monthly,
            title: &report.title,
            description: &report.description,
            date: month_name,
            badge: report.badge.as_deref(),
            badge_color: report.badge_color.as_deref(),
            file: non_empty(report.file.as_deref()),
            available_date: report.available_date.as_deref(),
        }
    }

    pub fn one_time(report: &'a OneTimeReport) -> Self {
        Card {
            kind: ItemKind::OneTime,
            title: &report.title,
            description: &report.description,
            date: &report.date,
            badge: report.badge.as_deref(),
            badge_color: report.badge_color.as_deref(),
            // One-time deliverables always link, even to an empty href.
            file: Some(report.file.as_str()),
            available_date: None,
        }
    }

    pub fn checklist(checklist: &'a Checklist) -> Self {
        Card {
            kind: ItemKind::Checklist,
            title: &checklist.title,
            description: &checklist.description,
            date: &checklist.date,
            badge: checklist.badge.as_deref(),
            badge_color: checklist.badge_color.as_deref(),
            file: non_empty(checklist.file.as_deref()),
            available_date: None,
        }
    }

    pub fn badge_label(&self) -> &'a str {
        self.badge.unwrap_or(self.kind.defaults().badge)
    }

    pub fn badge_style(&self) -> &'static str {
        badge_style(self.badge_color.unwrap_or(self.kind.defaults().badge_color))
    }

    pub fn highlight_header(&self) -> bool {
        self.kind.defaults().green_header && self.badge_color == Some("green")
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

static BADGE_PALETTE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("red", "background-color: #e74c3c; color: white;"),
        ("green", "background-color: #27ae60; color: white;"),
        ("blue", "background-color: #3498db; color: white;"),
        ("purple", "background-color: #9b59b6; color: white;"),
        ("orange", "background-color: #f39c12; color: white;"),
        ("gray", "background-color: #95a5a6; color: white;"),
        ("teal", "background-color: #1abc9c; color: white;"),
    ])
});

/// Inline CSS for a badge color name. Unknown names fall back to blue.
pub fn badge_style(color: &str) -> &'static str {
    BADGE_PALETTE
        .get(color)
        .or_else(|| BADGE_PALETTE.get("blue"))
        .copied()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_style_known_and_unknown() {
        assert_eq!(badge_style("red"), "background-color: #e74c3c; color: white;");
        assert_eq!(badge_style("teal"), "background-color: #1abc9c; color: white;");
        assert_eq!(badge_style("magenta"), badge_style("blue"));
        assert_eq!(badge_style(""), badge_style("blue"));
    }

    #[test]
    fn test_defaults_per_kind() {
        assert_eq!(ItemKind::Monthly.defaults().badge_color, "blue");
        assert_eq!(ItemKind::OneTime.defaults().badge_color, "purple");
        assert_eq!(ItemKind::Checklist.defaults().badge_color, "teal");
        assert_eq!(ItemKind::OneTime.defaults().badge, "One-Time");
        assert_eq!(ItemKind::Checklist.defaults().badge, "In Progress");
    }

    #[test]
    fn test_pending_labels() {
        assert_eq!(ItemKind::Monthly.pending_label(Some("Mar 5")), "Available Mar 5");
        assert_eq!(ItemKind::Monthly.pending_label(None), "Available Soon");
        assert_eq!(ItemKind::Checklist.pending_label(Some("ignored")), "Starting Soon");
    }

    #[test]
    fn test_empty_file_counts_as_missing() {
        let report = ReportItem {
            title: "SEO".into(),
            description: "d".into(),
            badge: None,
            badge_color: None,
            file: Some(String::new()),
            available_date: None,
        };
        assert_eq!(Card::monthly(&report, "May").file, None);
    }

    #[test]
    fn test_green_header_only_for_one_time_and_checklists() {
        let report = ReportItem {
            title: "t".into(),
            description: "d".into(),
            badge: None,
            badge_color: Some("green".into()),
            file: None,
            available_date: None,
        };
        assert!(!Card::monthly(&report, "May").highlight_header());

        let checklist = Checklist {
            title: "t".into(),
            description: "d".into(),
            date: "May".into(),
            file: None,
            badge: None,
            badge_color: Some("green".into()),
        };
        assert!(Card::checklist(&checklist).highlight_header());
    }

    #[test]
    fn test_metric_value_keeps_json_spelling() {
        let v: Vec<MetricValue> = serde_json::from_str(r#"[5, 4.8, "n/a"]"#).unwrap();
        let shown: Vec<String> = v.iter().map(|m| m.to_string()).collect();
        assert_eq!(shown, vec!["5", "4.8", "n/a"]);
    }

    #[test]
    fn test_pdf_file_name_replaces_every_dash() {
        let profile = ClientProfile {
            name: "Fox Valley Plumbing".into(),
            slug: "fox-valley-plumbing".into(),
            campaign_status: "Active".into(),
            goal: "g".into(),
            start_date: "Jan 2025".into(),
        };
        assert_eq!(profile.pdf_file_name(), "Client_Portal_fox_valley_plumbing.pdf");
    }
}
