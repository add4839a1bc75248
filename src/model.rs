//! Payload shapes returned by the backend.
//!
//! The backend's response shapes vary by deployment: monetary values arrive
//! as raw numbers or as `{ amount, currency }` objects, lists arrive bare or
//! wrapped in a named field, and most fields are simply absent sometimes.
//! Every type here is deliberately lenient (all fields optional, unknown
//! fields ignored), and the shape variation is modeled once as untagged
//! unions instead of ad hoc unwrapping at each consumer.

use serde::Deserialize;
use serde_json::Value;

/// A monetary value: a raw number, or an object carrying the amount and an
/// optional currency code, nested at most one level
/// (`{ "amount": { "amount": 42, "currency": "EUR" } }`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Money {
    Value(f64),
    Detailed {
        #[serde(default)]
        amount: Option<Box<Money>>,
        #[serde(default)]
        currency: Option<String>,
    },
}

impl Money {
    /// The numeric amount, descending into nested objects; missing reads as 0.
    pub fn amount(&self) -> f64 {
        match self {
            Money::Value(n) => *n,
            Money::Detailed { amount, .. } => {
                amount.as_deref().map(Money::amount).unwrap_or(0.0)
            }
        }
    }

    /// The currency code at the top level or nested under the amount;
    /// defaults to `"USD"`.
    pub fn currency(&self) -> &str {
        match self {
            Money::Value(_) => "USD",
            Money::Detailed {
                currency: Some(code),
                ..
            } => code,
            Money::Detailed {
                amount: Some(inner),
                currency: None,
            } => match inner.as_ref() {
                Money::Detailed {
                    currency: Some(code),
                    ..
                } => code,
                _ => "USD",
            },
            Money::Detailed {
                amount: None,
                currency: None,
            } => "USD",
        }
    }
}

/// Identity record for the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub id: Option<Value>,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Aggregate balances shown on the summary cards.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialSummary {
    pub total_balance: Option<Money>,
    pub total_expense: Option<Money>,
    pub total_savings: Option<Money>,
}

/// One income/expense point of the working-capital series.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorkingCapitalPoint {
    pub date: Option<Value>,
    pub income: Option<f64>,
    pub expenses: Option<f64>,
}

impl WorkingCapitalPoint {
    pub fn income_value(&self) -> f64 {
        self.income.unwrap_or(0.0)
    }

    /// Expenses are charted as magnitudes even when reported negative.
    pub fn expense_magnitude(&self) -> f64 {
        self.expenses.unwrap_or(0.0).abs()
    }
}

/// Number of trailing points shown on the capital chart.
pub const CHART_WINDOW: usize = 7;

/// The working-capital series, delivered bare or wrapped one more level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WorkingCapital {
    Points(Vec<WorkingCapitalPoint>),
    Wrapped {
        #[serde(default)]
        data: Vec<WorkingCapitalPoint>,
    },
}

impl WorkingCapital {
    pub fn points(&self) -> &[WorkingCapitalPoint] {
        match self {
            WorkingCapital::Points(points) => points,
            WorkingCapital::Wrapped { data } => data,
        }
    }

    /// The trailing window the chart renders.
    pub fn chart_points(&self) -> &[WorkingCapitalPoint] {
        let points = self.points();
        &points[points.len().saturating_sub(CHART_WINDOW)..]
    }
}

/// Card and wallet records.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Wallet {
    pub cards: Vec<WalletCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletCard {
    pub id: Option<Value>,
    pub bank: Option<String>,
    pub network: Option<String>,
    pub card_number: Option<String>,
    pub name: Option<String>,
    pub expiry_month: Option<u32>,
    pub expiry_year: Option<u32>,
    pub color: Option<String>,
}

impl WalletCard {
    /// `MM/YY` expiry, when both parts are present.
    pub fn expiry_label(&self) -> Option<String> {
        match (self.expiry_month, self.expiry_year) {
            (Some(month), Some(year)) => Some(format!("{:02}/{:02}", month, year % 100)),
            _ => None,
        }
    }
}

/// A single ledger entry. Deployments disagree on several field names, so
/// accessors fold the observed aliases.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transaction {
    pub name: Option<String>,
    pub company: Option<String>,
    pub business: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<Value>,
    pub created_at: Option<Value>,
}

impl Transaction {
    pub fn company_name(&self) -> Option<&str> {
        self.company.as_deref().or(self.business.as_deref())
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_deref().or(self.kind.as_deref())
    }

    pub fn date_value(&self) -> Option<&Value> {
        self.date.as_ref().or(self.created_at.as_ref())
    }
}

/// The recent-transactions payload, bare or wrapped in `transactions`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TransactionList {
    Items(Vec<Transaction>),
    Wrapped {
        #[serde(default)]
        transactions: Vec<Transaction>,
    },
}

impl TransactionList {
    pub fn items(&self) -> &[Transaction] {
        match self {
            TransactionList::Items(items) => items,
            TransactionList::Wrapped { transactions } => transactions,
        }
    }
}

/// Scheduled transfer records.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScheduledTransfers {
    pub transfers: Vec<ScheduledTransfer>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScheduledTransfer {
    pub name: Option<String>,
    pub date: Option<Value>,
    pub amount: Option<f64>,
    pub image: Option<String>,
}
