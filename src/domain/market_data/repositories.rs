use crate::domain::errors::FetchResult;
use crate::domain::market_data::StockPayload;

/// Where dashboard data comes from.
///
/// The refresh cycle only ever asks for the whole payload; the HTTP client
/// in `infrastructure::http` is the production implementation.
#[allow(async_fn_in_trait)]
pub trait StockDataSource {
    async fn fetch_stock_data(&self) -> FetchResult<StockPayload>;
}
