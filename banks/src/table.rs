//! Configuration-driven HTML table scraper.
//!
//! Every supported bank publishes its quotation board as an HTML table with one
//! row per currency. Banks differ only in how the row is recognized and which
//! cells hold the buy and sell rates, so that is all a `TableLayout` describes.

use std::time::Duration;

use async_trait::async_trait;
use fxboard_common::Currency;
use reqwest::header::{REFERER, USER_AGENT};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use crate::error::{ScrapeError, ScrapeResult};
use crate::scrape::{BankScraper, ScrapedRate};

/// Desktop browser agent; several bank sites reject unknown clients.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// How a table row is recognized as the requested currency's row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMatch {
    /// First cell contains the display name.
    FirstCell,
    /// Any text in the row contains the display name.
    RowText,
    /// Any text in the row contains the display name or the currency code.
    RowTextOrCode,
}

impl RowMatch {
    fn matches(&self, row: ElementRef<'_>, cells: &[String], name: &str, code: &str) -> bool {
        match self {
            RowMatch::FirstCell => cells.first().is_some_and(|cell| cell.contains(name)),
            RowMatch::RowText => row_text(row).contains(name),
            RowMatch::RowTextOrCode => {
                let text = row_text(row);
                text.contains(name) || text.contains(code)
            }
        }
    }
}

/// What a matched row's rate cells must look like to be taken.
///
/// Anything that passes is handed on as text; a sell cell that is not a number
/// fails later, when the quote is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellCheck {
    /// Buy and sell cells are non-empty.
    NonEmpty,
    /// Buy and sell cells are non-empty and the buy cell looks numeric.
    BuyNumeric,
}

impl CellCheck {
    pub fn accepts(&self, buy: &str, sell: &str) -> bool {
        if buy.is_empty() || sell.is_empty() {
            return false;
        }

        match self {
            CellCheck::NonEmpty => true,
            CellCheck::BuyNumeric => looks_numeric(buy),
        }
    }
}

/// Where a bank keeps its rates inside the quotation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub row_match: RowMatch,
    /// Rows with fewer `<td>` cells are ignored.
    pub min_cells: usize,
    pub buy_cell: usize,
    pub sell_cell: usize,
    pub check: CellCheck,
}

/// Scraper for one bank page laid out as a quotation table.
pub struct TableScraper {
    bank: String,
    url: String,
    referer: Option<String>,
    layout: TableLayout,
    client: reqwest::Client,
    timeout: Duration,
}

impl TableScraper {
    /// Create a new table scraper.
    pub fn new(
        bank: impl Into<String>,
        url: impl Into<String>,
        layout: TableLayout,
        client: reqwest::Client,
        timeout: Duration,
    ) -> Self {
        Self {
            bank: bank.into(),
            url: url.into(),
            referer: None,
            layout,
            client,
            timeout,
        }
    }

    /// Send a `Referer` header with the page request.
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Download the page, decoding the body as UTF-8 regardless of headers.
    async fn fetch_page(&self) -> ScrapeResult<String> {
        let mut request = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .header(USER_AGENT, BROWSER_USER_AGENT);

        if let Some(referer) = &self.referer {
            request = request.header(REFERER, referer.as_str());
        }

        let body = request
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| ScrapeError::from_reqwest(&self.bank, e))?
            .bytes()
            .await
            .map_err(|e| ScrapeError::from_reqwest(&self.bank, e))?;

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait]
impl BankScraper for TableScraper {
    fn bank(&self) -> &str {
        &self.bank
    }

    #[instrument(skip(self, currency), fields(bank = %self.bank, currency = %currency))]
    async fn fetch_rate(&self, currency: &Currency) -> ScrapeResult<ScrapedRate> {
        if !currency.is_recognized() {
            return Err(ScrapeError::UnsupportedCurrency(currency.clone()));
        }

        let page = self.fetch_page().await?;
        debug!(bytes = page.len(), "Fetched bank page");

        let (buy_rate, sell_rate) = find_rate(&self.bank, &page, currency, &self.layout)?;

        Ok(ScrapedRate {
            bank: self.bank.clone(),
            buy_rate,
            sell_rate,
        })
    }
}

/// Search every table row of `html` for the currency and return its buy and
/// sell cell text.
///
/// A matching row whose cells fail the layout's `CellCheck` is skipped and the
/// search continues.
pub fn find_rate(
    bank: &str,
    html: &str,
    currency: &Currency,
    layout: &TableLayout,
) -> ScrapeResult<(String, String)> {
    let name = currency
        .display_name()
        .ok_or_else(|| ScrapeError::UnsupportedCurrency(currency.clone()))?;

    let table_selector = selector("table")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    let document = Html::parse_document(html);

    for table in document.select(&table_selector) {
        for row in table.select(&row_selector) {
            let cells: Vec<String> = row
                .select(&cell_selector)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect();

            if cells.len() < layout.min_cells {
                continue;
            }

            if !layout.row_match.matches(row, &cells, name, currency.code()) {
                continue;
            }

            let (Some(buy), Some(sell)) = (cells.get(layout.buy_cell), cells.get(layout.sell_cell))
            else {
                continue;
            };

            if layout.check.accepts(buy, sell) {
                return Ok((buy.clone(), sell.clone()));
            }
        }
    }

    Err(ScrapeError::NoMatchingRow {
        bank: bank.to_string(),
        currency: currency.clone(),
    })
}

/// Non-empty and made of ASCII digits once the dots are removed.
pub fn looks_numeric(text: &str) -> bool {
    let mut digits = text.chars().filter(|c| *c != '.').peekable();
    digits.peek().is_some() && digits.all(|c| c.is_ascii_digit())
}

fn row_text(row: ElementRef<'_>) -> String {
    row.text().collect()
}

fn selector(css: &str) -> ScrapeResult<Selector> {
    Selector::parse(css).map_err(|_| ScrapeError::InvalidSelector(css.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};

    const BOARD: &str = r#"
        <html><body>
        <table><tr><td>导航</td></tr></table>
        <table>
          <tr><th>货币名称</th><th>现汇买入价</th><th>现钞买入价</th><th>现汇卖出价</th><th>现钞卖出价</th><th>中行折算价</th></tr>
          <tr><td>欧元</td><td>771.20</td><td>747.24</td><td>776.88</td><td>779.38</td><td>773.59</td></tr>
          <tr><td>美元</td><td> 710.50 </td><td>704.72</td><td>713.41</td><td>713.41</td><td>711.64</td></tr>
          <tr><td>日元</td><td>4.7631</td><td>4.6151</td><td>4.7981</td><td>4.8170</td><td>4.7790</td></tr>
        </table>
        </body></html>"#;

    fn layout(
        row_match: RowMatch,
        min_cells: usize,
        buy_cell: usize,
        sell_cell: usize,
        check: CellCheck,
    ) -> TableLayout {
        TableLayout {
            row_match,
            min_cells,
            buy_cell,
            sell_cell,
            check,
        }
    }

    #[test]
    fn test_first_cell_match() {
        let (buy, sell) = find_rate(
            "中国银行",
            BOARD,
            &Currency::usd(),
            &layout(RowMatch::FirstCell, 6, 1, 3, CellCheck::NonEmpty),
        )
        .unwrap();

        assert_eq!(buy, "710.50");
        assert_eq!(sell, "713.41");
    }

    #[test]
    fn test_row_text_match_uses_layout_cells() {
        let (buy, sell) = find_rate(
            "中国工商银行",
            BOARD,
            &Currency::new("JPY"),
            &layout(RowMatch::RowText, 4, 1, 2, CellCheck::BuyNumeric),
        )
        .unwrap();

        assert_eq!(buy, "4.7631");
        assert_eq!(sell, "4.6151");
    }

    #[test]
    fn test_row_text_or_code_match() {
        let html = r#"<table>
            <tr><td>HKD/CNY</td><td>90.91</td><td>91.27</td><td>-</td></tr>
        </table>"#;

        let result = find_rate(
            "交通银行",
            html,
            &Currency::new("HKD"),
            &layout(RowMatch::RowTextOrCode, 4, 1, 2, CellCheck::BuyNumeric),
        );
        assert_eq!(result.unwrap(), ("90.91".to_string(), "91.27".to_string()));

        let by_name_only = find_rate(
            "中国农业银行",
            html,
            &Currency::new("HKD"),
            &layout(RowMatch::RowText, 4, 1, 2, CellCheck::BuyNumeric),
        );
        assert!(matches!(by_name_only, Err(ScrapeError::NoMatchingRow { .. })));
    }

    #[test]
    fn test_malformed_row_is_skipped() {
        let html = r#"<table>
            <tr><td>美元 (停牌)</td><td>--</td><td>--</td><td>--</td></tr>
            <tr><td>美元</td><td>710.10</td><td>713.00</td><td>713.00</td></tr>
        </table>"#;

        let (buy, sell) = find_rate(
            "中国建设银行",
            html,
            &Currency::usd(),
            &layout(RowMatch::RowText, 4, 1, 3, CellCheck::BuyNumeric),
        )
        .unwrap();

        assert_eq!((buy.as_str(), sell.as_str()), ("710.10", "713.00"));
    }

    #[test]
    fn test_short_rows_ignored() {
        let result = find_rate(
            "中国银行",
            "<table><tr><td>美元</td><td>710.50</td></tr></table>",
            &Currency::usd(),
            &layout(RowMatch::FirstCell, 6, 1, 3, CellCheck::NonEmpty),
        );

        assert!(matches!(result, Err(ScrapeError::NoMatchingRow { .. })));
    }

    #[test]
    fn test_unrecognized_currency() {
        let result = find_rate(
            "中国银行",
            BOARD,
            &Currency::new("GBP"),
            &layout(RowMatch::FirstCell, 6, 1, 3, CellCheck::NonEmpty),
        );

        assert!(matches!(result, Err(ScrapeError::UnsupportedCurrency(_))));
    }

    #[test]
    fn test_buy_numeric_passes_dash_sell_through() {
        let html = r#"<table>
            <tr><td>美元</td><td>710.50</td><td>--</td><td>x</td></tr>
        </table>"#;

        let (buy, sell) = find_rate(
            "中国工商银行",
            html,
            &Currency::usd(),
            &layout(RowMatch::RowText, 4, 1, 2, CellCheck::BuyNumeric),
        )
        .unwrap();

        assert_eq!((buy.as_str(), sell.as_str()), ("710.50", "--"));
    }

    #[test]
    fn test_buy_numeric_rejects_dash_buy() {
        let html = r#"<table>
            <tr><td>美元</td><td>--</td><td>713.00</td><td>x</td></tr>
        </table>"#;

        let result = find_rate(
            "中国农业银行",
            html,
            &Currency::usd(),
            &layout(RowMatch::RowText, 4, 1, 2, CellCheck::BuyNumeric),
        );

        assert!(matches!(result, Err(ScrapeError::NoMatchingRow { .. })));
    }

    #[test]
    fn test_non_empty_takes_any_text() {
        let html = r#"<table>
            <tr><td>美元</td><td>--</td><td>x</td><td>--</td><td>x</td><td>x</td></tr>
        </table>"#;

        let (buy, sell) = find_rate(
            "中国银行",
            html,
            &Currency::usd(),
            &layout(RowMatch::FirstCell, 6, 1, 3, CellCheck::NonEmpty),
        )
        .unwrap();

        assert_eq!((buy.as_str(), sell.as_str()), ("--", "--"));
    }

    #[test]
    fn test_non_empty_skips_blank_cells() {
        let html = r#"<table>
            <tr><td>美元</td><td> </td><td>x</td><td>713.41</td><td>x</td><td>x</td></tr>
        </table>"#;

        let result = find_rate(
            "中国银行",
            html,
            &Currency::usd(),
            &layout(RowMatch::FirstCell, 6, 1, 3, CellCheck::NonEmpty),
        );

        assert!(matches!(result, Err(ScrapeError::NoMatchingRow { .. })));
    }

    #[test]
    fn test_looks_numeric() {
        assert!(looks_numeric("710.50"));
        assert!(looks_numeric("4"));
        assert!(looks_numeric("1.2.3"));
        assert!(!looks_numeric(""));
        assert!(!looks_numeric("."));
        assert!(!looks_numeric("-"));
        assert!(!looks_numeric("7,105.00"));
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_rate_from_page() {
        let base = serve(Router::new().route("/whpj/", get(|| async { BOARD }))).await;
        let scraper = TableScraper::new(
            "中国银行",
            format!("{}/whpj/", base),
            layout(RowMatch::FirstCell, 6, 1, 3, CellCheck::NonEmpty),
            reqwest::Client::new(),
            Duration::from_secs(5),
        )
        .with_referer("https://www.boc.cn");

        let rate = scraper.fetch_rate(&Currency::new("eur")).await.unwrap();

        assert_eq!(rate.bank, "中国银行");
        assert_eq!(rate.buy_rate, "771.20");
        assert_eq!(rate.sell_rate, "776.88");
    }

    #[tokio::test]
    async fn test_fetch_rate_http_error() {
        let base = serve(Router::new().route(
            "/whpj/",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        ))
        .await;
        let scraper = TableScraper::new(
            "中国银行",
            format!("{}/whpj/", base),
            layout(RowMatch::FirstCell, 6, 1, 3, CellCheck::NonEmpty),
            reqwest::Client::new(),
            Duration::from_secs(5),
        );

        let result = scraper.fetch_rate(&Currency::usd()).await;

        assert!(matches!(result, Err(ScrapeError::HttpStatus { status: 503, .. })));
        assert!(!scraper.scrape(&Currency::usd()).await.is_success());
    }

    #[tokio::test]
    async fn test_fetch_rate_timeout() {
        let base = serve(Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                BOARD
            }),
        ))
        .await;
        let scraper = TableScraper::new(
            "兴业银行",
            format!("{}/slow", base),
            layout(RowMatch::RowTextOrCode, 4, 1, 2, CellCheck::BuyNumeric),
            reqwest::Client::new(),
            Duration::from_millis(200),
        );

        let result = scraper.fetch_rate(&Currency::usd()).await;

        assert!(matches!(result, Err(ScrapeError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_unsupported_currency_skips_network() {
        let scraper = TableScraper::new(
            "中国银行",
            "http://127.0.0.1:9/unreachable",
            layout(RowMatch::FirstCell, 6, 1, 3, CellCheck::NonEmpty),
            reqwest::Client::new(),
            Duration::from_secs(5),
        );

        let result = scraper.fetch_rate(&Currency::new("GBP")).await;

        assert!(matches!(result, Err(ScrapeError::UnsupportedCurrency(_))));
    }
}
