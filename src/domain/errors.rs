use derive_more::Display;

/// The single error kind the refresh cycle deals with. Every variant is
/// logged and swallowed at the fetch call site.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum FetchFailure {
    #[display(fmt = "Network error: {}", _0)]
    Network(String),
    #[display(fmt = "HTTP error: {} {}", status, status_text)]
    HttpStatus { status: u16, status_text: String },
    #[display(fmt = "Failed to decode payload: {}", _0)]
    Decode(String),
    #[display(
        fmt = "Historical series misaligned (datetime={}, open={}, high={}, low={}, close={})",
        datetime,
        open,
        high,
        low,
        close
    )]
    MisalignedSeries { datetime: usize, open: usize, high: usize, low: usize, close: usize },
}

impl std::error::Error for FetchFailure {}

/// Errors raised at the presentation boundary (config, canvas).
#[derive(Debug, Clone, PartialEq, Display)]
pub enum DashboardError {
    #[display(fmt = "Invalid config: {}", _0)]
    InvalidConfig(String),
    #[display(fmt = "Rendering error: {}", _0)]
    Rendering(String),
}

impl std::error::Error for DashboardError {}

pub type FetchResult<T> = Result<T, FetchFailure>;
pub type RenderingResult<T> = Result<T, DashboardError>;
