//! Financial data slice: five independent resources kept fresh by fetches.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;

use crate::client::{unwrap_data, ApiClient, ApiError, Operation};
use crate::model::{FinancialSummary, ScheduledTransfers, TransactionList, Wallet, WorkingCapital};
use crate::store::resource::ResourceState;

/// Snapshot of the financial slice. Resources are mutually independent: a
/// failure or pending state in one never blocks or clears another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancialState {
    pub summary: ResourceState<FinancialSummary>,
    pub working_capital: ResourceState<WorkingCapital>,
    pub wallet: ResourceState<Wallet>,
    pub recent_transactions: ResourceState<TransactionList>,
    pub scheduled_transfers: ResourceState<ScheduledTransfers>,
}

/// Store driving the financial resources.
///
/// Duplicate in-flight fetches for the same resource race last-settled-wins;
/// there is no fencing by request identity and no cancellation.
#[derive(Clone)]
pub struct FinancialStore {
    state: Arc<RwLock<FinancialState>>,
    client: ApiClient,
}

impl FinancialStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            state: Arc::new(RwLock::new(FinancialState::default())),
            client,
        }
    }

    /// Clone of the current slice state.
    pub fn snapshot(&self) -> FinancialState {
        self.state.read().clone()
    }

    /// Clear all stored failure messages, leaving data and loading flags.
    pub fn clear_errors(&self) {
        let mut state = self.state.write();
        state.summary.clear_error();
        state.working_capital.clear_error();
        state.wallet.clear_error();
        state.recent_transactions.clear_error();
        state.scheduled_transfers.clear_error();
    }

    pub async fn fetch_summary(&self) {
        self.run_fetch("/financial/summary", Operation::FetchSummary, |state| {
            &mut state.summary
        })
        .await;
    }

    pub async fn fetch_working_capital(&self) {
        self.run_fetch(
            "/financial/working-capital",
            Operation::FetchWorkingCapital,
            |state| &mut state.working_capital,
        )
        .await;
    }

    pub async fn fetch_wallet(&self) {
        self.run_fetch("/financial/wallet", Operation::FetchWallet, |state| {
            &mut state.wallet
        })
        .await;
    }

    pub async fn fetch_recent_transactions(&self) {
        self.run_fetch(
            "/financial/transactions/recent",
            Operation::FetchRecentTransactions,
            |state| &mut state.recent_transactions,
        )
        .await;
    }

    pub async fn fetch_scheduled_transfers(&self) {
        self.run_fetch(
            "/financial/transfers/scheduled",
            Operation::FetchScheduledTransfers,
            |state| &mut state.scheduled_transfers,
        )
        .await;
    }

    /// Issue all five resource fetches concurrently; each settles on its own.
    pub async fn fetch_all(&self) {
        tokio::join!(
            self.fetch_summary(),
            self.fetch_working_capital(),
            self.fetch_wallet(),
            self.fetch_recent_transactions(),
            self.fetch_scheduled_transfers(),
        );
    }

    /// One full lifecycle turn for a single resource: pending, then the
    /// settled payload or the derived failure message. The lock is never
    /// held across the network await.
    async fn run_fetch<T: DeserializeOwned>(
        &self,
        path: &'static str,
        op: Operation,
        select: impl Fn(&mut FinancialState) -> &mut ResourceState<T>,
    ) {
        select(&mut self.state.write()).begin();

        let result = self.client.get(path).await.and_then(|body| {
            serde_json::from_value::<T>(unwrap_data(body)).map_err(ApiError::Decode)
        });

        let mut state = self.state.write();
        match result {
            Ok(data) => {
                tracing::debug!(path, "resource fetch fulfilled");
                select(&mut state).succeed(data);
            }
            Err(err) => {
                let message = err.user_message(op);
                tracing::debug!(path, error = %message, "resource fetch rejected");
                select(&mut state).fail(message);
            }
        }
    }
}
