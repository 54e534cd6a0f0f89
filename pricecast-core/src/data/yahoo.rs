//! Yahoo Finance data provider.
//!
//! History comes from the v8 chart API, descriptive info from the v10
//! quoteSummary API. Yahoo has no official API and changes formats without
//! notice, so every field is optional on the wire and shape problems surface
//! as `DataError::Parse`. Requests are made once; the caller decides what to
//! do with a failure.

use super::normalize::{exchange_date, normalize_bars};
use super::provider::{DataError, DataProvider, Lookback};
use crate::domain::{Bar, PriceSeries, TickerInfo};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance v10 quoteSummary API response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    quote_summary: SummaryResult,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    result: Option<Vec<SummaryData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryData {
    price: Option<PriceModule>,
    asset_profile: Option<AssetProfile>,
    fund_profile: Option<FundProfile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    short_name: Option<String>,
    quote_type: Option<String>,
    currency: Option<String>,
    exchange_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetProfile {
    sector: Option<String>,
    industry: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FundProfile {
    legal_type: Option<String>,
    family: Option<String>,
}

/// Yahoo Finance data provider (blocking).
pub struct YahooProvider {
    client: reqwest::blocking::Client,
}

impl YahooProvider {
    pub fn new() -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Build the chart API URL for a symbol and date range.
    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let day_start = |d: NaiveDate| d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp());
        let start_ts = day_start(start).unwrap_or(0);
        let end_ts = day_start(end).map_or(start_ts, |ts| ts + 86_399);
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true&events=div%2Csplit"
        )
    }

    fn summary_url(symbol: &str) -> String {
        format!(
            "https://query2.finance.yahoo.com/v10/finance/quoteSummary/{symbol}\
             ?modules=price%2CassetProfile%2CfundProfile"
        )
    }

    /// Issue one GET and decode the JSON body.
    fn get_json<T: DeserializeOwned>(&self, symbol: &str, url: &str) -> Result<T, DataError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::Http {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        resp.json().map_err(|e| {
            DataError::Parse(format!("failed to parse response for {symbol}: {e}"))
        })
    }

    /// Parse the chart API response into a normalized series.
    fn parse_chart(symbol: &str, resp: ChartResponse) -> Result<PriceSeries, DataError> {
        let result = resp
            .chart
            .result
            .ok_or_else(|| api_error(symbol, resp.chart.error))?;

        let Some(data) = result.into_iter().next() else {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        };

        // Yahoo omits `timestamp` entirely when the range holds no trading days.
        let Some(timestamps) = data.timestamp else {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        };

        let gmt_offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::Parse("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = exchange_date(ts, gmt_offset)
                .ok_or_else(|| DataError::Parse(format!("invalid timestamp: {ts}")))?;

            // Holidays and halted days come back as all-null rows.
            let Some(close) = quote.close.get(i).copied().flatten() else {
                continue;
            };

            bars.push(Bar {
                date,
                open: quote.open.get(i).copied().flatten().unwrap_or(close),
                high: quote.high.get(i).copied().flatten().unwrap_or(close),
                low: quote.low.get(i).copied().flatten().unwrap_or(close),
                close,
                adj_close: adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten()),
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
            });
        }

        let bars = normalize_bars(bars);
        if bars.is_empty() {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(PriceSeries::new(symbol, bars))
    }

    fn parse_summary(symbol: &str, resp: SummaryResponse) -> Result<TickerInfo, DataError> {
        let result = resp
            .quote_summary
            .result
            .ok_or_else(|| api_error(symbol, resp.quote_summary.error))?;

        let Some(data) = result.into_iter().next() else {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        };

        let price = data.price.unwrap_or_default();
        let profile = data.asset_profile.unwrap_or_default();
        let fund = data.fund_profile.unwrap_or_default();

        Ok(TickerInfo {
            symbol: symbol.to_string(),
            long_name: price.long_name.or(price.short_name),
            quote_type: price.quote_type,
            sector: profile.sector,
            industry: profile.industry,
            legal_type: fund.legal_type,
            fund_family: fund.family,
            currency: price.currency,
            exchange: price.exchange_name,
        })
    }
}

fn api_error(symbol: &str, error: Option<ApiError>) -> DataError {
    match error {
        Some(err) if err.code == "Not Found" => DataError::NoData {
            symbol: symbol.to_string(),
        },
        Some(err) => DataError::Parse(format!("{}: {}", err.code, err.description)),
        None => DataError::NoData {
            symbol: symbol.to_string(),
        },
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, symbol: &str, lookback: Lookback) -> Result<PriceSeries, DataError> {
        let end = chrono::Local::now().date_naive();
        let start = lookback.start_from(end);
        let url = Self::chart_url(symbol, start, end);
        tracing::debug!(%symbol, %start, %end, "requesting chart history");
        let chart: ChartResponse = self.get_json(symbol, &url)?;
        Self::parse_chart(symbol, chart)
    }

    fn info(&self, symbol: &str) -> Result<TickerInfo, DataError> {
        let summary: SummaryResponse = self.get_json(symbol, &Self::summary_url(symbol))?;
        Self::parse_summary(symbol, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(json: &str) -> ChartResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_chart_with_adjusted_close() {
        let resp = chart(
            r#"{"chart":{"result":[{
                "meta":{"gmtoffset":-14400},
                "timestamp":[1710423000,1710509400],
                "indicators":{
                    "quote":[{"open":[1.0,2.0],"high":[1.5,2.5],"low":[0.5,1.5],"close":[1.2,2.2],"volume":[10,20]}],
                    "adjclose":[{"adjclose":[1.1,2.1]}]
                }}],"error":null}}"#,
        );
        let series = YahooProvider::parse_chart("AAPL", resp).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[0].date, NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
        assert_eq!(series.bars[1].date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(series.bars[1].adj_close, Some(2.1));
        assert!(series.has_adj_close());
    }

    #[test]
    fn chart_without_adjclose_falls_back_to_close() {
        let resp = chart(
            r#"{"chart":{"result":[{
                "timestamp":[1710423000],
                "indicators":{"quote":[{"open":[1.0],"high":[1.5],"low":[0.5],"close":[1.2],"volume":[10]}]}
                }],"error":null}}"#,
        );
        let series = YahooProvider::parse_chart("SMH", resp).unwrap();
        assert!(!series.has_adj_close());
        assert_eq!(series.prices(), vec![1.2]);
    }

    #[test]
    fn null_rows_are_skipped() {
        let resp = chart(
            r#"{"chart":{"result":[{
                "timestamp":[1710423000,1710509400],
                "indicators":{"quote":[{"open":[null,2.0],"high":[null,2.5],"low":[null,1.5],"close":[null,2.2],"volume":[null,20]}]}
                }],"error":null}}"#,
        );
        let series = YahooProvider::parse_chart("AAPL", resp).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn not_found_is_no_data() {
        let resp = chart(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        );
        let err = YahooProvider::parse_chart("ZZZZ", resp).unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn empty_range_is_no_data() {
        let resp = chart(
            r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#,
        );
        let err = YahooProvider::parse_chart("AAPL", resp).unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn other_api_errors_are_hard_failures() {
        let resp = chart(
            r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"bad"}}}"#,
        );
        let err = YahooProvider::parse_chart("AAPL", resp).unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }

    #[test]
    fn parses_fund_summary() {
        let resp: SummaryResponse = serde_json::from_str(
            r#"{"quoteSummary":{"result":[{
                "price":{"longName":"VanEck Semiconductor ETF","quoteType":"ETF","currency":"USD","exchangeName":"NasdaqGM"},
                "fundProfile":{"legalType":"Exchange Traded Fund","family":"VanEck"}
            }],"error":null}}"#,
        )
        .unwrap();
        let info = YahooProvider::parse_summary("SMH", resp).unwrap();
        assert_eq!(info.long_name.as_deref(), Some("VanEck Semiconductor ETF"));
        assert_eq!(info.fund_family.as_deref(), Some("VanEck"));
        assert_eq!(info.sector, None);
    }

    #[test]
    fn chart_url_covers_whole_end_day() {
        let url = YahooProvider::chart_url(
            "AAPL",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert!(url.contains("period1=1704067200"));
        assert!(url.contains("period2=1704153599"));
    }
}
