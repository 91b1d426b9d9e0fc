use serde::Serialize;
use serde_json::{Map, Value};

/// quoteSummary modules requested for a company.
pub const FUNDAMENTAL_MODULES: [&str; 6] = [
    "assetProfile",
    "summaryDetail",
    "incomeStatementHistory",
    "balanceSheetHistory",
    "cashflowStatementHistory",
    "earnings",
];

/// Semi-structured company statements, passed through untouched.
///
/// Each module may be missing depending on the ticker and on the upstream API.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Fundamentals {
    pub ticker: String,
    pub profile: Option<Value>,
    pub summary: Option<Value>,
    pub income_statement: Option<Value>,
    pub balance_sheet: Option<Value>,
    pub cash_flow: Option<Value>,
    pub earnings: Option<Value>,
}

impl Fundamentals {
    pub(crate) fn from_modules(ticker: &str, mut modules: Map<String, Value>) -> Self {
        let mut take = |name: &str| modules.remove(name).filter(|v| !v.is_null());
        Self {
            ticker: ticker.to_string(),
            profile: take("assetProfile"),
            summary: take("summaryDetail"),
            income_statement: take("incomeStatementHistory"),
            balance_sheet: take("balanceSheetHistory"),
            cash_flow: take("cashflowStatementHistory"),
            earnings: take("earnings"),
        }
    }

    /// Looks up a top-level key of the profile or summary module, in that order.
    pub fn field(&self, key: &str) -> Option<&Value> {
        [&self.profile, &self.summary]
            .into_iter()
            .flatten()
            .find_map(|module| module.get(key))
    }
}
