//! Pure mapping from [`ViewState`] to what the dashboard shows.
//!
//! Nothing here touches the DOM; display rules are tested natively.

use crate::domain::market_data::{HistoricalSeries, IndexName, IndexSnapshot, Quote, TimeLabel};
use crate::view_state::ViewState;
use std::ops::Range;
use strum::IntoEnumIterator;

pub const DASHBOARD_TITLE: &str = "Stock Market Dashboard";
pub const ALERT_TITLE: &str = "Market Volatility Warning";
pub const ALERT_MESSAGE: &str =
    "High market volatility detected. Monitor closely and prepare for potential interventions.";
pub const CHANGE_SUFFIX: &str = "from previous close";

/// Colour token for a change value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
}

impl Tone {
    /// `change >= 0` is positive, zero included. NaN and marker text such
    /// as `"N/A"` are negative.
    pub fn for_snapshot(snapshot: &IndexSnapshot) -> Self {
        if snapshot.is_non_negative() { Tone::Positive } else { Tone::Negative }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Tone::Positive => "positive",
            Tone::Negative => "negative",
        }
    }
}

/// Card icon. Fixed per index; only its colour follows the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexIcon {
    TrendingUp,
    TrendingDown,
    Activity,
}

impl IndexIcon {
    pub fn for_index(name: IndexName) -> Self {
        match name {
            IndexName::Sp500 => IndexIcon::TrendingUp,
            IndexName::Nasdaq => IndexIcon::TrendingDown,
            IndexName::Dow => IndexIcon::Activity,
        }
    }

    /// SVG `points` of the icon's polylines on a 24x24 grid
    pub fn polylines(&self) -> &'static [&'static str] {
        match self {
            IndexIcon::TrendingUp => &["22 7 13.5 15.5 8.5 10.5 2 17", "16 7 22 7 22 13"],
            IndexIcon::TrendingDown => &["22 17 13.5 8.5 8.5 13.5 2 7", "16 17 22 17 22 11"],
            IndexIcon::Activity => &["22 12 18 12 15 21 9 3 6 12 2 12"],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertBannerModel {
    pub title: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexCardModel {
    pub index: IndexName,
    pub title: &'static str,
    pub value_text: String,
    pub change_text: String,
    pub tone: Tone,
    pub icon: IndexIcon,
}

impl IndexCardModel {
    pub fn new(index: IndexName, snapshot: &IndexSnapshot) -> Self {
        Self {
            index,
            title: index.title(),
            value_text: match &snapshot.value {
                Quote::Number(value) => format_index_value(*value),
                Quote::Text(text) => text.clone(),
            },
            change_text: match &snapshot.change {
                Quote::Number(change) => format_change_percent(*change),
                Quote::Text(text) => format!("{}%", text),
            },
            tone: Tone::for_snapshot(snapshot),
            icon: IndexIcon::for_index(index),
        }
    }

    /// e.g. `-0.5% from previous close`
    pub fn change_caption(&self) -> String {
        format!("{} {}", self.change_text, CHANGE_SUFFIX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Zoom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisLayout {
    pub title: &'static str,
    pub grid_color: &'static str,
    pub range_slider: bool,
}

/// Static chart styling; data never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout {
    pub title: &'static str,
    pub drag_mode: DragMode,
    pub show_legend: bool,
    pub x_axis: AxisLayout,
    pub y_axis: AxisLayout,
    pub paper_background: &'static str,
    pub plot_background: &'static str,
    pub font_color: &'static str,
    pub increasing_color: &'static str,
    pub decreasing_color: &'static str,
}

pub const CHART_LAYOUT: ChartLayout = ChartLayout {
    title: "S&P 500 (5-Minute Intervals)",
    drag_mode: DragMode::Zoom,
    show_legend: false,
    x_axis: AxisLayout { title: "Time", grid_color: "#444", range_slider: false },
    y_axis: AxisLayout { title: "Price", grid_color: "#444", range_slider: false },
    paper_background: "rgba(0,0,0,0)",
    plot_background: "rgba(0,0,0,0)",
    font_color: "#888",
    increasing_color: "#3d9970",
    decreasing_color: "#ff4136",
};

/// The single candlestick series: `x` plus OHLC, aligned by index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CandlestickTrace {
    pub x: Vec<TimeLabel>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

impl From<&HistoricalSeries> for CandlestickTrace {
    fn from(series: &HistoricalSeries) -> Self {
        Self {
            x: series.datetime.clone(),
            open: series.open.clone(),
            high: series.high.clone(),
            low: series.low.clone(),
            close: series.close.clone(),
        }
    }
}

impl CandlestickTrace {
    /// Buckets drawable with all five values present
    pub fn len(&self) -> usize {
        [self.x.len(), self.open.len(), self.high.len(), self.low.len(), self.close.len()]
            .into_iter()
            .min()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub trace: CandlestickTrace,
    pub layout: &'static ChartLayout,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardModel {
    pub title: &'static str,
    pub alert: Option<AlertBannerModel>,
    pub cards: Vec<IndexCardModel>,
    pub chart: ChartModel,
}

/// Render rule: one pass over the state, no side effects.
pub fn render(state: &ViewState) -> DashboardModel {
    DashboardModel {
        title: DASHBOARD_TITLE,
        alert: alert_banner(state),
        cards: index_cards(state),
        chart: chart_model(state),
    }
}

/// Shown whenever the flag is set; not derived from market data.
pub fn alert_banner(state: &ViewState) -> Option<AlertBannerModel> {
    state
        .alert_visible
        .then_some(AlertBannerModel { title: ALERT_TITLE, message: ALERT_MESSAGE })
}

pub fn index_cards(state: &ViewState) -> Vec<IndexCardModel> {
    IndexName::iter().map(|name| IndexCardModel::new(name, &state.snapshot(name))).collect()
}

pub fn chart_model(state: &ViewState) -> ChartModel {
    ChartModel { trace: CandlestickTrace::from(&state.historical), layout: &CHART_LAYOUT }
}

/// en-US grouping with up to three fraction digits: `4500` -> `4,500`,
/// `1234.5678` -> `1,234.568`.
pub fn format_index_value(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞".to_string() } else { "-∞".to_string() };
    }

    let fixed = format!("{:.3}", value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + integer.len() / 3 + 1);
    if value < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(integer));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// `+` for `change >= 0`, the natural minus otherwise: `+1.25%`, `-0.5%`.
pub fn format_change_percent(change: f64) -> String {
    let sign = if change >= 0.0 { "+" } else { "" };
    format!("{}{}%", sign, format_plain_number(change))
}

/// Shortest round-trip form, switching to exponent notation outside
/// `[1e-6, 1e21)` the way a JS number prints: `1e-7`, `1e+21`. Negative
/// zero prints as `0`.
pub fn format_plain_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() };
    }
    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exponent = format!("{:e}", value);
        return match exponent.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
            _ => exponent,
        };
    }
    value.to_string()
}

/// Horizontal zoom of the chart, in bucket indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartViewport {
    #[default]
    Full,
    /// `start..end`, end exclusive
    Zoomed { start: usize, end: usize },
}

impl ChartViewport {
    /// Buckets to draw for a series of `len`. A zoom that no longer fits
    /// the data falls back to the full range.
    pub fn visible_range(&self, len: usize) -> Range<usize> {
        match *self {
            ChartViewport::Full => 0..len,
            ChartViewport::Zoomed { start, end } => {
                let end = end.min(len);
                if start < end { start..end } else { 0..len }
            }
        }
    }

    /// Zoom to the buckets between `a` and `b`, both inclusive, in either order.
    pub fn zoom_to(a: usize, b: usize, len: usize) -> Self {
        if len == 0 {
            return ChartViewport::Full;
        }
        let hi = a.max(b).min(len - 1);
        let lo = a.min(b).min(hi);
        if lo == 0 && hi + 1 == len {
            ChartViewport::Full
        } else {
            ChartViewport::Zoomed { start: lo, end: hi + 1 }
        }
    }

}
