//! Static bank table.
//!
//! Order in `BANK_PROFILES` is the order banks appear in every rate report.
//! Offsets are fixed constants that tell estimated banks apart; they are not
//! derived from any market signal.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::scrape::BankScraper;
use crate::table::{CellCheck, RowMatch, TableLayout, TableScraper};

/// Static description of one bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankProfile {
    /// Short bank code.
    pub code: &'static str,
    /// Display name used in reports.
    pub name: &'static str,
    /// Single-character icon used by front ends.
    pub icon: &'static str,
    /// Estimation offset in basis points (`20` is `+0.002`).
    pub offset_bps: i64,
    /// Quotation page.
    pub url: &'static str,
    pub referer: Option<&'static str>,
    pub layout: TableLayout,
}

impl BankProfile {
    /// Signed estimation offset applied to the fallback mid rate.
    pub fn offset(&self) -> Decimal {
        Decimal::new(self.offset_bps, 4)
    }
}

/// The six quoted banks.
pub static BANK_PROFILES: [BankProfile; 6] = [
    BankProfile {
        code: "BOC",
        name: "中国银行",
        icon: "中",
        offset_bps: 20,
        url: "https://www.boc.cn/sourcedb/whpj/",
        referer: None,
        layout: TableLayout {
            row_match: RowMatch::FirstCell,
            min_cells: 6,
            buy_cell: 1,
            sell_cell: 3,
            check: CellCheck::NonEmpty,
        },
    },
    BankProfile {
        code: "ICBC",
        name: "中国工商银行",
        icon: "工",
        offset_bps: -10,
        url: "https://www.icbc.com.cn/icbc/perFinance/forex/quotation/",
        referer: Some("https://www.icbc.com.cn"),
        layout: TableLayout {
            row_match: RowMatch::RowText,
            min_cells: 4,
            buy_cell: 1,
            sell_cell: 2,
            check: CellCheck::BuyNumeric,
        },
    },
    BankProfile {
        code: "CCB",
        name: "中国建设银行",
        icon: "建",
        offset_bps: 30,
        url: "https://forex.ccb.com/cn/forex/foreign_exchange_rate.html",
        referer: Some("https://forex.ccb.com"),
        layout: TableLayout {
            row_match: RowMatch::RowText,
            min_cells: 4,
            buy_cell: 1,
            sell_cell: 3,
            check: CellCheck::BuyNumeric,
        },
    },
    BankProfile {
        code: "ABC",
        name: "中国农业银行",
        icon: "农",
        offset_bps: -20,
        url: "http://www.abchina.com/cn/PersonalServices/Quotation/boc/default.htm",
        referer: Some("http://www.abchina.com"),
        layout: TableLayout {
            row_match: RowMatch::RowText,
            min_cells: 4,
            buy_cell: 1,
            sell_cell: 2,
            check: CellCheck::BuyNumeric,
        },
    },
    BankProfile {
        code: "COMM",
        name: "交通银行",
        icon: "交",
        offset_bps: 10,
        url: "http://www.bankcomm.com/BankCommSite/shtml/jyjr/cn/7158/7161/7167/list.shtml",
        referer: Some("http://www.bankcomm.com"),
        layout: TableLayout {
            row_match: RowMatch::RowTextOrCode,
            min_cells: 4,
            buy_cell: 1,
            sell_cell: 2,
            check: CellCheck::BuyNumeric,
        },
    },
    BankProfile {
        code: "CIB",
        name: "兴业银行",
        icon: "兴",
        offset_bps: -30,
        url: "https://www.cib.com.cn/cn/personalServices/foreignExchange/index.html",
        referer: Some("https://www.cib.com.cn"),
        layout: TableLayout {
            row_match: RowMatch::RowTextOrCode,
            min_cells: 4,
            buy_cell: 1,
            sell_cell: 2,
            check: CellCheck::BuyNumeric,
        },
    },
];

/// A bank as the aggregator sees it: display data, offset and scraper.
#[derive(Clone)]
pub struct BankConfig {
    pub name: String,
    pub icon: String,
    pub offset: Decimal,
    pub scraper: Arc<dyn BankScraper>,
}

impl BankConfig {
    /// Create a new bank configuration.
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        offset: Decimal,
        scraper: Arc<dyn BankScraper>,
    ) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            offset,
            scraper,
        }
    }

    /// Pair a static profile with a scraper implementation.
    pub fn from_profile(profile: &BankProfile, scraper: Arc<dyn BankScraper>) -> Self {
        Self::new(profile.name, profile.icon, profile.offset(), scraper)
    }

    /// Production table: one `TableScraper` per profile, sharing `client`.
    pub fn defaults(client: reqwest::Client, timeout: Duration) -> Vec<BankConfig> {
        BANK_PROFILES
            .iter()
            .map(|profile| {
                let mut scraper = TableScraper::new(
                    profile.name,
                    profile.url,
                    profile.layout,
                    client.clone(),
                    timeout,
                );
                if let Some(referer) = profile.referer {
                    scraper = scraper.with_referer(referer);
                }
                Self::from_profile(profile, Arc::new(scraper))
            })
            .collect()
    }
}

impl fmt::Debug for BankConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BankConfig")
            .field("name", &self.name)
            .field("icon", &self.icon)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}
