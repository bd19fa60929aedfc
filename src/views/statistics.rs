//! The statistics page.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{json, Value};

use crate::charts::{
    correlation_heatmap, final_vs_clean_scatter, histogram_bar_chart, hr_bar_chart,
    hr_range_scatter, hr_range_sd_scatter, hr_rr_line_chart, hr_rr_scatter, hr_sqi_scatter,
    run_overview, sqi_pie_chart, RunOverview,
};
use crate::client::EdaClient;
use crate::config::ReportConfig;
use crate::error::{Error, Result};
use crate::model::{
    AnomalyCounts, CorrelationMatrix, Overview, RunFeature, RunRecord, SampleFeature, StressMatrix,
};
use crate::notify::Notice;
use crate::output::{fixed, Card, HtmlReport, Section, TerminalEncoder};
use crate::plots::{BarPlot, BoxPlot, HeatmapPlot, LinePlot, PiePlot, Plot, ScatterPlot};
use crate::session::Session;
use crate::stats::{histogram, BoxStats, HistogramBins};

/// Run-level features histogrammed locally.
const RUN_HISTOGRAMS: [RunFeature; 2] = [RunFeature::RangeSd, RunFeature::Sqi];

const SECTION_RUNS: &str = "Per-run Charts";
const SECTION_HISTOGRAMS: &str = "Distributions (Histograms)";
const SECTION_SCATTERS: &str = "Relationship Analysis (Scatter plots)";
const SECTION_BOXPLOTS: &str = "Boxplots & Outliers";
const SECTION_CORRELATION: &str = "Merged Correlation (Cleaned Samples + Final Statistics)";

/// Loads the statistics page from the EDA backend.
#[derive(Debug)]
pub struct StatisticsView<'a> {
    client: &'a EdaClient,
    settings: ReportConfig,
    loading: AtomicBool,
}

impl<'a> StatisticsView<'a> {
    /// Open the view for a logged-in session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoggedIn`] without a logged-in session.
    pub fn new(client: &'a EdaClient, session: &Session) -> Result<Self> {
        session.require_login()?;
        Ok(Self {
            client,
            settings: ReportConfig::default(),
            loading: AtomicBool::new(false),
        })
    }

    /// Override bucket counts and the number of summarized runs.
    #[must_use]
    pub fn settings(mut self, settings: ReportConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Fetch every dataset concurrently and build the page.
    ///
    /// Each request fails independently: a failed dataset is logged and
    /// rendered as "No data" while the rest of the page still fills in.
    pub async fn load(&self) -> StatisticsPage {
        self.loading.store(true, Ordering::SeqCst);
        let c = self.client;
        let bins = self.settings.sample_bins;
        let [heart, resp, range] = SampleFeature::CHARTED;

        let (
            runs,
            overview,
            correlation,
            anomalies,
            h_heart,
            h_resp,
            h_range,
            b_heart,
            b_resp,
            b_range,
            stress,
        ) = tokio::join!(
            c.runs(),
            c.overview(),
            c.correlation_merged(),
            c.anomalies(),
            c.histogram(heart.column(), bins),
            c.histogram(resp.column(), bins),
            c.histogram(range.column(), bins),
            c.boxplot(heart.column()),
            c.boxplot(resp.column()),
            c.boxplot(range.column()),
            c.stress_matrix(),
        );

        let mut notices = Vec::new();
        if [runs.as_ref().err(), overview.as_ref().err()]
            .into_iter()
            .flatten()
            .any(Error::is_connection)
        {
            notices.push(Notice::cannot_connect());
        }

        let runs = degrade("/eda/runs", runs).unwrap_or_default();
        let page = StatisticsPage {
            overview: degrade("/eda/overview", overview),
            correlation: degrade("/eda/correlation_merged", correlation),
            anomalies: degrade("/eda/anomalies", anomalies).unwrap_or_default(),
            sample_histograms: vec![
                (heart, degrade("/eda/histogram", h_heart).flatten()),
                (resp, degrade("/eda/histogram", h_resp).flatten()),
                (range, degrade("/eda/histogram", h_range).flatten()),
            ],
            sample_boxplots: vec![
                (heart, degrade("/eda/boxplot", b_heart).flatten()),
                (resp, degrade("/eda/boxplot", b_resp).flatten()),
                (range, degrade("/eda/boxplot", b_range).flatten()),
            ],
            stress_matrix: degrade("/eda/hypothesis/hr_stress_matrix", stress),
            notices,
            ..StatisticsPage::from_runs(runs, &self.settings)
        };
        self.loading.store(false, Ordering::SeqCst);
        tracing::info!(runs = page.runs.len(), "statistics loaded");
        page
    }
}

fn degrade<T>(endpoint: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(endpoint, error = %e, "dataset unavailable");
            None
        }
    }
}

/// A chart on the page, ready to render.
pub struct PageChart {
    /// File-name friendly identifier.
    pub slug: String,
    /// Section heading the chart belongs to.
    pub section: &'static str,
    /// Caption.
    pub title: String,
    /// The plot, or `None` for "No data".
    pub plot: Option<Box<dyn Plot>>,
}

impl std::fmt::Debug for PageChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageChart")
            .field("slug", &self.slug)
            .field("section", &self.section)
            .field("title", &self.title)
            .field("has_plot", &self.plot.is_some())
            .finish()
    }
}

fn chart(slug: &str, section: &'static str, title: &str, plot: Option<Box<dyn Plot>>) -> PageChart {
    PageChart {
        slug: slug.to_string(),
        section,
        title: title.to_string(),
        plot,
    }
}

/// Everything the statistics page shows, recomputed on every load.
#[derive(Debug, Clone, Default)]
pub struct StatisticsPage {
    /// Run records in arrival order.
    pub runs: Vec<RunRecord>,
    /// Backend overview scalars.
    pub overview: Option<Overview>,
    /// Overview computed locally from `runs`.
    pub run_overview: RunOverview,
    /// Merged correlation matrix.
    pub correlation: Option<CorrelationMatrix>,
    /// Anomaly counts; zero when unavailable.
    pub anomalies: AnomalyCounts,
    /// Sample-level histograms from the backend.
    pub sample_histograms: Vec<(SampleFeature, Option<HistogramBins>)>,
    /// Sample-level boxplots from the backend.
    pub sample_boxplots: Vec<(SampleFeature, Option<BoxStats>)>,
    /// Run-level histograms computed from `runs`.
    pub run_histograms: Vec<(RunFeature, Option<HistogramBins>)>,
    /// Range_SD boxplot computed from `runs`.
    pub range_sd_boxplot: Option<BoxStats>,
    /// HR class × stress class counts.
    pub stress_matrix: Option<StressMatrix>,
    /// Problems worth showing above the page.
    pub notices: Vec<Notice>,
    recent_runs: usize,
}

impl StatisticsPage {
    /// Derive every run-level dataset from `runs`; backend datasets stay empty.
    #[must_use]
    pub fn from_runs(runs: Vec<RunRecord>, settings: &ReportConfig) -> Self {
        let run_histograms = RUN_HISTOGRAMS
            .into_iter()
            .map(|f| {
                let hist = histogram(f.column_of(&runs), settings.run_bins);
                (f, hist.is_renderable().then_some(hist))
            })
            .collect();
        Self {
            run_overview: run_overview(&runs),
            run_histograms,
            range_sd_boxplot: BoxStats::from_data(RunFeature::RangeSd.column_of(&runs)),
            recent_runs: settings.recent_runs,
            runs,
            ..Self::default()
        }
    }

    /// The three overview cards.
    #[must_use]
    pub fn overview_cards(&self) -> Vec<Card> {
        let o = self.overview.clone().unwrap_or_default();
        let runs = o
            .runs
            .map_or_else(|| "-".to_string(), |r| r.to_string());
        vec![
            Card::new("Overview")
                .row("Runs", runs)
                .row("Avg HR", fixed(o.avg_hr, 2))
                .row("Avg RR", fixed(o.avg_rr, 2))
                .row("Avg Range", format!("{} m", fixed(o.avg_range, 3))),
            Card::new("Signal Quality")
                .row("SQI Mean", fixed(o.sqi_mean, 2))
                .row("SQI Standard Deviation", fixed(o.sqi_std, 2))
                .row("Good SQI (>200)", o.good_sqi.unwrap_or(0).to_string()),
            Card::new("Final HR (calibrated)")
                .row("Mean", fixed(o.final_hr_mean, 2))
                .row("Standard Deviation", fixed(o.final_hr_std, 2))
                .row(
                    "Min / Max",
                    format!("{} / {}", fixed(o.final_hr_min, 2), fixed(o.final_hr_max, 2)),
                ),
        ]
    }

    /// Summary cards for the most recent runs.
    #[must_use]
    pub fn recent_run_cards(&self) -> Vec<Card> {
        let skip = self.runs.len().saturating_sub(self.recent_runs);
        self.runs[skip..]
            .iter()
            .map(|r| {
                let id = r.run.map_or_else(|| "-".to_string(), |v| fixed(Some(v), 0));
                let title = match &r.timestamp {
                    Some(ts) => format!("Run {id} ({ts})"),
                    None => format!("Run {id}"),
                };
                Card::new(title)
                    .row("Avg HR", format!("{} bpm", fixed(r.avg_hr_clean, 2)))
                    .row("Final HR", format!("{} bpm", fixed(r.final_accurate_hr, 2)))
                    .row("Avg RR", format!("{} bpm", fixed(r.avg_rr_clean, 2)))
                    .row("Avg Range", format!("{} m", fixed(r.avg_range, 3)))
                    .row("Range SD", fixed(r.range_sd, 4))
                    .row("SQI", fixed(r.sqi, 2))
            })
            .collect()
    }

    /// The anomaly card.
    #[must_use]
    pub fn anomaly_card(&self) -> Card {
        Card::new("Detected Anomalies")
            .row("Number of runs that are OK", self.anomalies.ok.to_string())
            .row("Number of runs that are Not OK", self.anomalies.not_ok.to_string())
    }

    /// One card per HR class with its stress-class counts.
    #[must_use]
    pub fn stress_cards(&self) -> Vec<Card> {
        let Some(m) = &self.stress_matrix else {
            return Vec::new();
        };
        m.index
            .iter()
            .zip(&m.matrix)
            .map(|(hr_class, counts)| {
                m.labels
                    .iter()
                    .zip(counts)
                    .fold(Card::new(format!("HR {hr_class}")), |card, (stress, n)| {
                        card.row(format!("Stress {stress}"), n.to_string())
                    })
            })
            .collect()
    }

    /// Every chart of the page in display order.
    #[must_use]
    pub fn charts(&self) -> Vec<PageChart> {
        let runs = &self.runs;
        let mut out = vec![
            chart(
                "hr_bar",
                SECTION_RUNS,
                "Avg HR & Final HR per Run",
                BarPlot::new(hr_bar_chart(runs)).build().ok().map(|p| Box::new(p) as Box<dyn Plot>),
            ),
            chart(
                "hr_rr_line",
                SECTION_RUNS,
                "HR & RR Trends",
                LinePlot::new(hr_rr_line_chart(runs))
                    .dual_axis(true)
                    .build()
                    .ok()
                    .map(|p| Box::new(p) as Box<dyn Plot>),
            ),
            chart(
                "sqi_pie",
                SECTION_RUNS,
                "Signal Quality Buckets",
                PiePlot::new(sqi_pie_chart(runs))
                    .build()
                    .ok()
                    .map(|p| Box::new(p) as Box<dyn Plot>),
            ),
            chart("hr_sqi", SECTION_RUNS, "HR vs SQI", scatter_plot(hr_sqi_scatter(runs))),
            chart(
                "hr_range_sd",
                SECTION_RUNS,
                "HR vs Movement (Range SD)",
                scatter_plot(hr_range_sd_scatter(runs)),
            ),
        ];

        for (feature, hist) in &self.sample_histograms {
            out.push(chart(
                &format!("hist_{}", feature.column().to_lowercase()),
                SECTION_HISTOGRAMS,
                &format!("{} (samples)", feature.label()),
                histogram_plot(hist.as_ref(), feature.label()),
            ));
        }
        for (feature, hist) in &self.run_histograms {
            out.push(chart(
                &format!("hist_{}", feature.column().to_lowercase()),
                SECTION_HISTOGRAMS,
                &format!("{} (per run)", feature.label()),
                histogram_plot(hist.as_ref(), feature.label()),
            ));
        }

        out.extend([
            chart(
                "hr_rr",
                SECTION_SCATTERS,
                "Avg HR vs Avg RR (per run)",
                scatter_plot(hr_rr_scatter(runs)),
            ),
            chart(
                "hr_range",
                SECTION_SCATTERS,
                "Avg HR vs Avg Range (per run)",
                scatter_plot(hr_range_scatter(runs)),
            ),
            chart(
                "final_vs_clean",
                SECTION_SCATTERS,
                "Final Accurate HR vs Avg Clean HR (calibration)",
                scatter_plot(final_vs_clean_scatter(runs)),
            ),
            chart(
                "hr_sqi_runs",
                SECTION_SCATTERS,
                "Avg HR vs SQI (per run)",
                scatter_plot(hr_sqi_scatter(runs)),
            ),
        ]);

        for (feature, stats) in &self.sample_boxplots {
            let title = format!("{} (samples) boxplot", feature.label());
            out.push(chart(
                &format!("box_{}", feature.column().to_lowercase()),
                SECTION_BOXPLOTS,
                &title,
                stats
                    .clone()
                    .map(|s| Box::new(BoxPlot::new(Some(s)).title(&title)) as Box<dyn Plot>),
            ));
        }
        let title = "Range SD (runs) boxplot";
        out.push(chart(
            "box_range_sd",
            SECTION_BOXPLOTS,
            title,
            self.range_sd_boxplot
                .clone()
                .map(|s| Box::new(BoxPlot::new(Some(s)).title(title)) as Box<dyn Plot>),
        ));

        out.push(chart(
            "correlation",
            SECTION_CORRELATION,
            "Correlation",
            self.correlation
                .as_ref()
                .and_then(|m| HeatmapPlot::new(correlation_heatmap(m)).build().ok())
                .map(|p| Box::new(p) as Box<dyn Plot>),
        ));
        out
    }

    /// Render the page as a self-contained HTML document.
    #[must_use]
    pub fn render_html(&self) -> String {
        self.html_report().render()
    }

    /// Assemble the HTML report.
    #[must_use]
    pub fn html_report(&self) -> HtmlReport {
        let mut report = HtmlReport::new("Statistics")
            .subtitle(&format!("{} runs", self.runs.len()))
            .footer("Radarix, 2025");
        for notice in &self.notices {
            report = report.notice(notice.clone());
        }

        let overview = self
            .overview_cards()
            .into_iter()
            .fold(Section::new("Overview"), Section::card);
        report = report.section(overview);

        let charts = self.charts();
        let mut current: Option<Section> = None;
        for c in &charts {
            if current.as_ref().map_or(true, |s| s.title != c.section) {
                if let Some(done) = current.take() {
                    report = report.section(done);
                }
                current = Some(Section::new(c.section));
            }
            if let Some(section) = current.take() {
                current = Some(match &c.plot {
                    Some(plot) => section.plot(&c.title, &PlotRef(plot.as_ref())),
                    None => section.empty(&c.title),
                });
            }
        }
        if let Some(done) = current {
            report = report.section(done);
        }

        let stress = self.stress_cards();
        if !stress.is_empty() {
            let section = Section::new("HR Class vs Stress Class");
            report = report.section(stress.into_iter().fold(section, Section::card));
        }
        let recent = self.recent_run_cards().into_iter().fold(
            Section::new(format!("Run Summaries (last {} runs)", self.recent_runs)),
            Section::card,
        );
        let anomalies =
            Section::new("Detected Anomalies (From Final Statistics)").card(self.anomaly_card());
        report.section(recent).section(anomalies)
    }

    /// Render the page for a terminal.
    #[must_use]
    pub fn render_terminal(&self, enc: &TerminalEncoder) -> String {
        let mut out = String::new();
        for notice in &self.notices {
            let _ = writeln!(out, "! {notice}\n");
        }
        for card in self.overview_cards() {
            out.push_str(&enc.card(&card));
            out.push('\n');
        }

        let rows: Vec<(&str, _)> = self
            .run_overview
            .features
            .iter()
            .map(|f| (f.column, f.stats))
            .collect();
        let _ = writeln!(out, "Runs fetched: {}", self.run_overview.runs);
        out.push_str(&enc.stats_table(&rows));
        out.push('\n');

        for (feature, hist) in &self.sample_histograms {
            out.push_str(&enc.histogram(&format!("{} (samples)", feature.label()), hist.as_ref()));
            out.push('\n');
        }
        for (feature, hist) in &self.run_histograms {
            out.push_str(&enc.histogram(&format!("{} (per run)", feature.label()), hist.as_ref()));
            out.push('\n');
        }
        for (feature, stats) in &self.sample_boxplots {
            out.push_str(&enc.boxplot(&format!("{} (samples)", feature.label()), stats.as_ref()));
            out.push('\n');
        }
        out.push_str(&enc.boxplot("Range SD (runs)", self.range_sd_boxplot.as_ref()));
        out.push('\n');

        let heatmap = self.correlation.as_ref().map(correlation_heatmap).unwrap_or_default();
        let grid_rows: Vec<(String, Vec<String>)> = heatmap
            .columns
            .iter()
            .zip(&heatmap.cells)
            .map(|(name, row)| (name.clone(), row.iter().map(|c| c.text.clone()).collect()))
            .collect();
        out.push_str(&enc.grid("Correlation", &heatmap.columns, &grid_rows));
        out.push('\n');

        for card in self.recent_run_cards() {
            out.push_str(&enc.card(&card));
            out.push('\n');
        }
        out.push_str(&enc.card(&self.anomaly_card()));
        out
    }

    /// Every chart payload as JSON, keyed by chart.
    #[must_use]
    pub fn chart_json(&self) -> Value {
        let runs = &self.runs;
        let histograms: serde_json::Map<String, Value> = self
            .sample_histograms
            .iter()
            .map(|(f, h)| (f.column(), h))
            .chain(self.run_histograms.iter().map(|(f, h)| (f.column(), h)))
            .map(|(column, h)| {
                let payload = h.as_ref().and_then(|h| histogram_bar_chart(h, column));
                (column.to_string(), json!(payload))
            })
            .collect();
        let mut boxplots: serde_json::Map<String, Value> = self
            .sample_boxplots
            .iter()
            .map(|(f, s)| (f.column().to_string(), json!(s)))
            .collect();
        boxplots.insert("Range_SD (runs)".to_string(), json!(self.range_sd_boxplot));

        json!({
            "overview": self.overview,
            "runOverview": self.run_overview,
            "hrBar": hr_bar_chart(runs),
            "hrRrLine": hr_rr_line_chart(runs),
            "sqiPie": sqi_pie_chart(runs),
            "scatters": [
                hr_sqi_scatter(runs),
                hr_range_sd_scatter(runs),
                hr_rr_scatter(runs),
                hr_range_scatter(runs),
                final_vs_clean_scatter(runs),
            ],
            "histograms": histograms,
            "boxplots": boxplots,
            "heatmap": self.correlation.as_ref().map(correlation_heatmap),
            "anomalies": self.anomalies,
            "stressMatrix": self.stress_matrix,
        })
    }

    /// Write one SVG file per available chart into `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or a file cannot be written.
    pub fn write_svgs(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::new();
        for c in self.charts() {
            if let Some(plot) = &c.plot {
                let path = dir.join(format!("{}.svg", c.slug));
                plot.to_svg().write_to_file(&path)?;
                written.push(path);
            }
        }
        Ok(written)
    }
}

fn scatter_plot(chart: crate::charts::ScatterChart) -> Option<Box<dyn Plot>> {
    ScatterPlot::new(chart)
        .build()
        .ok()
        .map(|p| Box::new(p) as Box<dyn Plot>)
}

fn histogram_plot(hist: Option<&HistogramBins>, label: &str) -> Option<Box<dyn Plot>> {
    hist.and_then(|h| histogram_bar_chart(h, label))
        .and_then(|c| BarPlot::new(c).legend(false).build().ok())
        .map(|p| Box::new(p) as Box<dyn Plot>)
}

/// Borrowed trait object usable where `impl Plot` is expected.
struct PlotRef<'a>(&'a dyn Plot);

impl Plot for PlotRef<'_> {
    fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    fn to_svg(&self) -> crate::output::SvgEncoder {
        self.0.to_svg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::TerminalMode;

    fn run(id: f64, hr: Option<f64>, sqi: Option<f64>, range_sd: Option<f64>) -> RunRecord {
        RunRecord {
            run: Some(id),
            avg_hr_clean: hr,
            final_accurate_hr: hr.map(|h| h + 1.0),
            avg_rr_clean: Some(15.0),
            sqi,
            range_sd,
            ..RunRecord::default()
        }
    }

    fn page() -> StatisticsPage {
        let runs = vec![
            run(1.0, Some(70.0), Some(250.0), Some(0.01)),
            run(2.0, None, Some(120.0), Some(0.02)),
            run(3.0, Some(75.0), Some(20.0), Some(0.03)),
            run(4.0, Some(80.0), None, Some(0.2)),
        ];
        StatisticsPage::from_runs(runs, &ReportConfig::default())
    }

    #[test]
    fn test_from_runs_computes_local_datasets() {
        let page = page();
        assert_eq!(page.run_overview.runs, 4);
        let hr = page.run_overview.get(RunFeature::AvgHrClean).unwrap();
        assert_eq!(hr.count, 3);
        assert!((hr.mean - 75.0).abs() < 1e-9);
        assert_eq!(page.run_histograms.len(), 2);
        let (feature, sqi_hist) = &page.run_histograms[1];
        assert_eq!(*feature, RunFeature::Sqi);
        assert_eq!(sqi_hist.as_ref().unwrap().total(), 3);
        let sd = page.range_sd_boxplot.as_ref().unwrap();
        assert_eq!(sd.max, 0.2);
    }

    #[test]
    fn test_overview_cards_dash_for_missing() {
        let mut page = page();
        let cards = page.overview_cards();
        assert_eq!(cards[0].value("Runs"), Some("-"));
        assert_eq!(cards[0].value("Avg Range"), Some("- m"));
        assert_eq!(cards[1].value("Good SQI (>200)"), Some("0"));

        page.overview = Some(Overview {
            runs: Some(12),
            avg_hr: Some(71.234),
            final_hr_min: Some(60.0),
            ..Overview::default()
        });
        let cards = page.overview_cards();
        assert_eq!(cards[0].value("Runs"), Some("12"));
        assert_eq!(cards[0].value("Avg HR"), Some("71.23"));
        assert_eq!(cards[2].value("Min / Max"), Some("60.00 / -"));
    }

    #[test]
    fn test_recent_runs_are_last_three() {
        let cards = page().recent_run_cards();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].title, "Run 2");
        assert_eq!(cards[0].value("Avg HR"), Some("- bpm"));
        assert_eq!(cards[2].value("Range SD"), Some("0.2000"));
    }

    #[test]
    fn test_missing_backend_datasets_render_no_data() {
        let mut page = page();
        page.sample_histograms = SampleFeature::CHARTED.iter().map(|f| (*f, None)).collect();
        page.sample_boxplots = SampleFeature::CHARTED.iter().map(|f| (*f, None)).collect();
        let charts = page.charts();
        let missing: Vec<&str> = charts
            .iter()
            .filter(|c| c.plot.is_none())
            .map(|c| c.slug.as_str())
            .collect();
        assert!(missing.contains(&"hist_heart_clean"));
        assert!(missing.contains(&"box_range_clean"));
        assert!(missing.contains(&"correlation"));
        assert!(!missing.contains(&"hr_bar"));

        let html = page.render_html();
        assert!(html.contains("No data"));
        assert!(html.contains("Boxplots &amp; Outliers"));
        assert!(html.contains("Detected Anomalies"));
    }

    #[test]
    fn test_empty_page_renders() {
        let page = StatisticsPage::default();
        let html = page.render_html();
        assert!(html.contains("0 runs"));
        assert!(page.charts().iter().all(|c| c.plot.is_none()));
        let text = page.render_terminal(&TerminalEncoder::new().mode(TerminalMode::Ascii));
        assert!(text.contains("Number of runs that are OK"));
    }

    #[test]
    fn test_chart_json_keys() {
        let json = page().chart_json();
        assert_eq!(json["hrBar"]["labels"][0], "Run 1");
        assert_eq!(json["scatters"].as_array().unwrap().len(), 5);
        assert!(json["histograms"]["SQI"].is_object());
        assert!(json["boxplots"]["Range_SD (runs)"].is_object());
        assert!(json["heatmap"].is_null());
    }

    #[test]
    fn test_write_svgs() {
        let dir = tempfile::tempdir().unwrap();
        let written = page().write_svgs(dir.path()).unwrap();
        assert!(written.iter().any(|p| p.ends_with("hr_bar.svg")));
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn test_view_requires_login() {
        let client =
            EdaClient::new("http://127.0.0.1:9", std::time::Duration::from_secs(1)).unwrap();
        assert!(matches!(
            StatisticsView::new(&client, &Session::default()),
            Err(Error::NotLoggedIn)
        ));
        let view = StatisticsView::new(&client, &Session::logged_in("a@b.c")).unwrap();
        assert!(!view.is_loading());
    }
}
