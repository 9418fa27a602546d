// Client portal renderer: a validated `ClientConfig` in, one self-contained
// HTML page out.
//
// Every section is built on its own from the config and the pieces are
// concatenated in a fixed order at the end. Nothing here touches the
// filesystem; the clock is passed in so output is reproducible.
use crate::error::Result;
use crate::loader::parse_config;
use crate::types::{Card, ClientConfig, KeyFindings, MetricValue, MonthlyReportGroup};
use crate::util::{escape_html, escape_js_string, long_date, year, Clock};
use serde_json::Value;
use std::borrow::Cow;

const BRAND: &str = "Nichefinder AI";
const HTML2PDF_SCRIPT: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/html2pdf.js/0.10.1/html2pdf.bundle.min.js";
const DISABLED_LINK_STYLE: &str = "color: #95a5a6; pointer-events: none;";
const GREEN_HEADER_STYLE: &str = "background-color: #27ae60;";
const CHECKMARK: &str = "✅";

/// How config strings are substituted into the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextPolicy {
    /// Verbatim; descriptions may carry their own markup.
    #[default]
    Raw,
    /// HTML-escape every config string.
    Escaped,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub escape: TextPolicy,
}

/// Validate `doc` and render it.
pub fn render(doc: &Value, clock: &dyn Clock, opts: &RenderOptions) -> Result<String> {
    let config = parse_config(doc)?;
    Ok(render_portal(&config, clock, opts))
}

pub fn render_portal(config: &ClientConfig, clock: &dyn Clock, opts: &RenderOptions) -> String {
    Renderer { opts: *opts }.assemble(config, clock)
}

/// Cards for current months, and the per-month archive blocks.
#[derive(Debug, Default)]
struct MonthlySections {
    current: String,
    archive: String,
}

struct Renderer {
    opts: RenderOptions,
}

impl Renderer {
    fn text<'s>(&self, s: &'s str) -> Cow<'s, str> {
        match self.opts.escape {
            TextPolicy::Raw => Cow::Borrowed(s),
            TextPolicy::Escaped => escape_html(s),
        }
    }

    fn opt_text<'s>(&self, s: Option<&'s str>) -> Cow<'s, str> {
        self.text(s.unwrap_or(""))
    }

    fn card(&self, card: &Card<'_>) -> String {
        let header_attr = if card.highlight_header() {
            format!(" style=\"{}\"", GREEN_HEADER_STYLE)
        } else {
            String::new()
        };
        let link = match card.file {
            Some(file) => format!(
                "<a href=\"{}\" class=\"card-link\">{}</a>",
                self.text(file),
                card.kind.defaults().link_label
            ),
            None => {
                let available = card.available_date.map(|d| self.text(d));
                format!(
                    "<a href=\"#\" class=\"card-link\" style=\"{}\">{}</a>",
                    DISABLED_LINK_STYLE,
                    card.kind.pending_label(available.as_deref())
                )
            }
        };
        format!(
            "\n<div class=\"card\">\n<div class=\"card-header\"{}>\n<h3>{} <span class=\"badge\" style=\"{}\">{}</span></h3>\n<span class=\"date\">{}</span>\n</div>\n<div class=\"card-body\">\n<p>{}</p>\n</div>\n{}\n</div>\n",
            header_attr,
            self.text(card.title),
            card.badge_style(),
            self.text(card.badge_label()),
            self.text(card.date),
            self.text(card.description),
            link
        )
    }

    fn monthly_sections(&self, months: &[MonthlyReportGroup]) -> MonthlySections {
        let mut out = MonthlySections::default();
        for month in months {
            let cards: String = month
                .reports
                .iter()
                .map(|r| self.card(&Card::monthly(r, &month.month_name)))
                .collect();
            if month.is_current() {
                out.current.push_str(&cards);
            } else {
                out.archive.push_str(&format!(
                    "\n<div class=\"archive-month\">\n<h4>{}</h4>\n<div class=\"card-grid\">\n{}\n</div>\n</div>\n",
                    self.text(&month.month_name),
                    cards
                ));
            }
        }
        out
    }

    fn one_time_section(&self, config: &ClientConfig) -> String {
        config
            .one_time_reports
            .iter()
            .map(|r| self.card(&Card::one_time(r)))
            .collect()
    }

    fn checklist_section(&self, config: &ClientConfig) -> String {
        config
            .checklists
            .iter()
            .map(|c| self.card(&Card::checklist(c)))
            .collect()
    }

    fn list_items(&self, items: &[String], prefix: &str) -> String {
        items
            .iter()
            .map(|item| format!("<li>{}{}</li>", prefix, self.text(item)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn key_findings_section(&self, findings: &KeyFindings) -> String {
        let resolved = self.list_items(&findings.resolved, &format!("{} ", CHECKMARK));
        let strengths = self.list_items(&findings.strengths, "");
        let focus = self.list_items(&findings.next_focus, "");
        let list_open = "<ul style=\"margin: 0; padding-left: 20px; font-size: 10pt;\">";

        let mut html = String::new();
        html.push_str("<!-- Key Findings Summary -->\n");
        html.push_str(&section_header(
            "Key Findings Summary",
            "Critical insights from audits and analysis",
        ));
        html.push_str("\n<div class=\"card-grid\">\n");
        html.push_str(&format!(
            "<div class=\"card\" style=\"border-left: 5px solid #27ae60;\">\n<div class=\"card-header\" style=\"background-color: #27ae60;\">\n<h3>GBP Issues RESOLVED</h3>\n</div>\n<div class=\"card-body\">\n{}\n{}\n</ul>\n<p style=\"margin-top: 10px; font-size: 9pt; color: #27ae60; font-weight: bold;\">{}</p>\n</div>\n</div>\n\n",
            list_open,
            resolved,
            self.opt_text(findings.resolved_note.as_deref())
        ));
        html.push_str(&format!(
            "<div class=\"card\" style=\"border-left: 5px solid #27ae60;\">\n<div class=\"card-header\" style=\"background-color: #27ae60;\">\n<h3>Strengths to Leverage</h3>\n</div>\n<div class=\"card-body\">\n{}\n{}\n</ul>\n</div>\n</div>\n\n",
            list_open, strengths
        ));
        html.push_str(&format!(
            "<div class=\"card\" style=\"border-left: 5px solid #3498db;\">\n<div class=\"card-header\" style=\"background-color: #3498db;\">\n<h3>Next Focus Areas</h3>\n</div>\n<div class=\"card-body\">\n{}\n{}\n</ul>\n</div>\n</div>\n",
            list_open, focus
        ));
        html.push_str("</div>\n");
        html
    }

    fn status_banner(&self, config: &ClientConfig, updated: &str) -> String {
        let m = &config.metrics;
        let mut html = String::from("<!-- Status Banner -->\n<div class=\"status-banner\">\n");
        html.push_str(&format!(
            "<div>\n<h3>Campaign Status: {}</h3>\n<p>Last Updated: {}</p>\n</div>\n",
            self.text(&config.client.campaign_status),
            updated
        ));
        self.status_metric(&mut html, &m.keywords_at_1.to_string(), "", "Keywords at #1");
        self.status_metric(&mut html, &m.total_keywords.to_string(), "", "Total Tracked");
        self.status_metric(&mut html, &m.goal_progress.to_string(), "%", "Goal Progress");
        html.push_str("</div>\n");
        html
    }

    fn status_metric(&self, html: &mut String, value: &str, suffix: &str, label: &str) {
        html.push_str(&format!(
            "<div class=\"status-metric\">\n<span class=\"number\">{}{}</span>\n<span class=\"label\">{}</span>\n</div>\n",
            self.text(value),
            suffix,
            label
        ));
    }

    fn goal_tracker(&self, config: &ClientConfig) -> String {
        let m = &config.metrics;
        let metric = |v: &MetricValue| self.text(&v.to_string()).into_owned();
        let progress = metric(&m.goal_progress);
        let at_one = metric(&m.keywords_at_1);
        let total = metric(&m.total_keywords);
        format!(
            "<!-- Goal Tracker -->\n<div class=\"goal-tracker\">\n<h3>{goal}</h3>\n<div class=\"progress-container\">\n<div class=\"progress-bar\" style=\"width: {p}%;\">{p}% Complete ({k} of {t})</div>\n</div>\n<div class=\"goal-details\">\n<span>Start: {k} keywords ({start})</span>\n<span>Target: {t} keywords (Dec 2026)</span>\n</div>\n</div>\n",
            goal = self.text(&config.client.goal),
            p = progress,
            k = at_one,
            t = total,
            start = self.text(&config.client.start_date),
        )
    }

    fn quick_stats(&self, config: &ClientConfig) -> String {
        let m = &config.metrics;
        let mut html = String::from("<!-- Quick Stats -->\n<div class=\"quick-stats\">\n");
        let boxes = [
            (m.organic_clicks.to_string(), "Monthly Organic Clicks", "neutral", "Baseline".to_string()),
            (
                m.gbp_calls.to_string(),
                "GBP Phone Calls",
                "neutral",
                self.opt_text(m.gbp_calls_note.as_deref()).into_owned(),
            ),
            (
                m.reviews.to_string(),
                "Google Reviews",
                "positive",
                format!("{} stars", self.text(&m.review_rating.to_string())),
            ),
            (
                m.citations.to_string(),
                "Active Citations",
                "neutral",
                self.opt_text(m.citations_note.as_deref()).into_owned(),
            ),
        ];
        for (value, label, trend, change) in &boxes {
            html.push_str(&format!(
                "<div class=\"stat-box\">\n<span class=\"number\">{}</span>\n<span class=\"label\">{}</span>\n<span class=\"change {}\">{}</span>\n</div>\n",
                self.text(value),
                label,
                trend,
                change
            ));
        }
        html.push_str("</div>\n");
        html
    }

    fn contact_section(&self, config: &ClientConfig) -> String {
        let c = &config.contact;
        let email = self.text(&c.email);
        format!(
            "<!-- Contact Section -->\n<div class=\"contact-section\">\n<h3>Contact Your Account Team</h3>\n<div class=\"contact-grid\">\n\
<div class=\"contact-item\">\n<div class=\"icon\">&#128231;</div>\n<div class=\"value\"><a href=\"mailto:{email}\">{email}</a></div>\n<div class=\"label\">Email</div>\n</div>\n\
<div class=\"contact-item\">\n<div class=\"icon\">&#128222;</div>\n<div class=\"value\">{phone}</div>\n<div class=\"label\">Phone</div>\n</div>\n\
<div class=\"contact-item\">\n<div class=\"icon\">&#128197;</div>\n<div class=\"value\"><a href=\"{calendar}\">Schedule a Call</a></div>\n<div class=\"label\">Calendar</div>\n</div>\n\
</div>\n</div>\n",
            email = email,
            phone = self.text(&c.phone),
            calendar = self.text(&c.calendar),
        )
    }

    fn assemble(&self, config: &ClientConfig, clock: &dyn Clock) -> String {
        let now = clock.now();
        let name = self.text(&config.client.name);
        let monthly = self.monthly_sections(&config.monthly_reports);

        let mut html = String::with_capacity(24 * 1024);
        html.push_str("<html>\n<head>\n<meta charset=\"UTF-8\">\n");
        html.push_str(&format!("<title>{} - Client Portal | {}</title>\n", name, BRAND));
        html.push_str(&format!("<script src=\"{}\"></script>\n", HTML2PDF_SCRIPT));
        html.push_str("<style>\n");
        html.push_str(PORTAL_CSS);
        html.push_str("</style>\n</head>\n<body>\n\n");
        // Lands in a JS string literal, so JS escaping applies, not HTML.
        html.push_str(&download_bar(&escape_js_string(&config.client.pdf_file_name())));

        html.push_str(&format!(
            "\n<div class=\"header\">\n<h1>{}</h1>\n<p>Client Portal | Local SEO & Digital Marketing</p>\n</div>\n\n<div class=\"container\">\n\n",
            name
        ));
        html.push_str(&self.status_banner(config, &long_date(&now)));
        html.push('\n');
        html.push_str(&self.goal_tracker(config));
        html.push('\n');
        html.push_str(&self.quick_stats(config));
        html.push('\n');

        html.push_str("<!-- Monthly Reports Section -->\n");
        html.push_str(&section_header(
            "Monthly Reports",
            "Recurring reports delivered each month showing progress and work completed",
        ));
        html.push_str(&card_grid(&monthly.current));

        html.push_str("<!-- Strategy & Audits Section -->\n");
        html.push_str(&section_header(
            "Strategy & Audits",
            "One-time assessments and long-term strategy documents",
        ));
        html.push_str(&card_grid(&self.one_time_section(config)));

        html.push_str("<!-- Implementation Checklists Section -->\n");
        html.push_str(&section_header(
            "Implementation Checklists",
            "Step-by-step guides tracking implementation progress",
        ));
        html.push_str(&card_grid(&self.checklist_section(config)));

        // No archived months, no archive heading.
        if !monthly.archive.is_empty() {
            html.push_str("<!-- Report Archive -->\n");
            html.push_str(&section_header(
                "Report Archive",
                "Access reports from previous months",
            ));
            html.push_str(&monthly.archive);
            html.push('\n');
        }

        html.push_str(&self.key_findings_section(&config.key_findings));
        html.push('\n');
        html.push_str(&self.contact_section(config));
        html.push_str("\n</div>\n\n");

        html.push_str(&format!(
            "<div class=\"footer\">\n<p>&copy; {} {} Agency | Client Portal</p>\n<p>Reports are updated monthly. Questions? Contact us anytime.</p>\n</div>\n\n</body>\n</html>",
            year(&now),
            BRAND
        ));
        html
    }
}

fn section_header(title: &str, subtitle: &str) -> String {
    format!(
        "<div class=\"section-header\">\n<h2>{}</h2>\n<p>{}</p>\n</div>\n",
        title, subtitle
    )
}

fn card_grid(cards: &str) -> String {
    format!("\n<div class=\"card-grid\">\n{}\n</div>\n\n", cards)
}

fn download_bar(pdf_file_name: &str) -> String {
    format!(
        r#"<div class="download-bar">
<button class="download-btn btn-pdf" onclick="downloadPDF()">&#128196; Download PDF</button>
<button class="download-btn btn-print" onclick="window.print()">&#128424; Print</button>
</div>

<script>
function downloadPDF() {{
    const element = document.body;
    const opt = {{
        margin: 0.3,
        filename: '{}',
        image: {{ type: 'jpeg', quality: 0.98 }},
        html2canvas: {{ scale: 2 }},
        jsPDF: {{ unit: 'in', format: 'letter', orientation: 'portrait' }}
    }};
    document.querySelector('.download-bar').style.display = 'none';
    html2pdf().set(opt).from(element).save().then(() => {{
        document.querySelector('.download-bar').style.display = 'flex';
    }});
}}
</script>
"#,
        pdf_file_name
    )
}

const PORTAL_CSS: &str = r#"/* Download buttons */
.download-bar { position: fixed; top: 20px; right: 20px; z-index: 1000; display: flex; gap: 10px; }
.download-btn { padding: 10px 20px; border: none; border-radius: 5px; cursor: pointer; font-size: 10pt; font-weight: bold; display: flex; align-items: center; gap: 8px; transition: all 0.2s; box-shadow: 0 2px 8px rgba(0,0,0,0.2); }
.download-btn:hover { transform: translateY(-2px); box-shadow: 0 4px 12px rgba(0,0,0,0.25); }
.btn-pdf { background-color: #c0392b; color: white; }
.btn-pdf:hover { background-color: #a93226; }
.btn-print { background-color: #1a5276; color: white; }
.btn-print:hover { background-color: #154360; }
@media print { .download-bar { display: none !important; } }
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: Calibri, Arial, sans-serif; font-size: 11pt; line-height: 1.6; color: #333; background-color: #f5f6fa; }

/* Header */
.header { background: linear-gradient(135deg, #1a5276, #2874a6); color: white; padding: 40px; text-align: center; }
.header h1 { margin: 0; font-size: 28pt; }
.header p { margin: 10px 0 0 0; opacity: 0.9; font-size: 12pt; }

/* Container */
.container { max-width: 1200px; margin: 0 auto; padding: 30px; }

/* Status banner */
.status-banner { background-color: #d5f5e3; border: 2px solid #27ae60; padding: 20px; border-radius: 10px; margin-bottom: 30px; display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; }
.status-banner h3 { margin: 0; color: #1e8449; }
.status-metric { text-align: center; padding: 0 20px; }
.status-metric .number { font-size: 24pt; font-weight: bold; color: #1a5276; display: block; }
.status-metric .label { font-size: 9pt; color: #7f8c8d; }

/* Quick stats */
.quick-stats { display: flex; justify-content: space-between; flex-wrap: wrap; margin-bottom: 30px; }
.stat-box { background: white; border-radius: 10px; padding: 20px; text-align: center; flex: 1; margin: 5px; min-width: 150px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
.stat-box .number { font-size: 32pt; font-weight: bold; color: #1a5276; display: block; }
.stat-box .label { font-size: 10pt; color: #7f8c8d; }
.stat-box .change { font-size: 11pt; margin-top: 5px; }
.stat-box .change.positive { color: #27ae60; }
.stat-box .change.negative { color: #c0392b; }
.stat-box .change.neutral { color: #f39c12; }

/* Card grid */
.card-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); gap: 20px; margin-bottom: 30px; }
.card { background: white; border-radius: 10px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); overflow: hidden; transition: transform 0.2s, box-shadow 0.2s; }
.card:hover { transform: translateY(-3px); box-shadow: 0 4px 20px rgba(0,0,0,0.15); }
.card-header { background-color: #1a5276; color: white; padding: 15px 20px; }
.card-header h3 { margin: 0; font-size: 14pt; }
.card-header .date { font-size: 9pt; opacity: 0.8; }
.card-body { padding: 20px; }
.card-body p { margin: 0 0 15px 0; color: #7f8c8d; font-size: 10pt; }
.card-link { display: block; background-color: #f8f9f9; padding: 12px 20px; text-align: center; color: #1a5276; text-decoration: none; font-weight: bold; border-top: 1px solid #ecf0f1; }
.card-link:hover { background-color: #1a5276; color: white; }

/* Section headers */
.section-header { margin: 30px 0 20px 0; padding-bottom: 10px; border-bottom: 2px solid #1a5276; }
.section-header h2 { margin: 0; color: #1a5276; font-size: 18pt; }
.section-header p { margin: 5px 0 0 0; color: #7f8c8d; font-size: 10pt; }

/* Badges */
.badge { display: inline-block; padding: 3px 10px; border-radius: 15px; font-size: 9pt; font-weight: bold; margin-left: 10px; }

/* Contact section */
.contact-section { background: white; border-radius: 10px; padding: 30px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); margin-top: 30px; }
.contact-section h3 { margin-top: 0; color: #1a5276; }
.contact-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; }
.contact-item { text-align: center; padding: 15px; }
.contact-item .icon { font-size: 24pt; margin-bottom: 10px; }
.contact-item .value { font-weight: bold; color: #1a5276; }
.contact-item .value a { color: #1a5276; text-decoration: none; }
.contact-item .value a:hover { text-decoration: underline; }
.contact-item .label { font-size: 10pt; color: #7f8c8d; }

/* Goal tracker */
.goal-tracker { background: white; border-radius: 10px; padding: 25px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); margin-bottom: 30px; }
.goal-tracker h3 { margin: 0 0 15px 0; color: #1a5276; }
.progress-container { background-color: #ecf0f1; border-radius: 10px; height: 30px; margin: 10px 0; overflow: hidden; }
.progress-bar { background: linear-gradient(90deg, #27ae60, #2ecc71); height: 100%; border-radius: 10px; display: flex; align-items: center; justify-content: center; color: white; font-weight: bold; }
.goal-details { display: flex; justify-content: space-between; margin-top: 10px; font-size: 10pt; color: #7f8c8d; }

/* Archive section */
.archive-month { margin-bottom: 30px; }
.archive-month h4 { color: #1a5276; margin-bottom: 15px; padding-bottom: 5px; border-bottom: 1px solid #d5d8dc; }

/* Footer */
.footer { text-align: center; padding: 20px; color: #95a5a6; font-size: 9pt; }

/* Print styles */
@media print {
    body { background: white; }
    .container { padding: 0; }
    .card:hover { transform: none; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
}
"#;
