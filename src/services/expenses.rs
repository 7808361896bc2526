//! Expense recording.
//!
//! The delicate part is the "sai do caixa" flag: an expense paid in cash may
//! be drawn from the open register, which posts a withdrawal against the
//! session. That option only exists while a session is open, only for cash
//! payments, and only when the drawer actually covers the amount. The draft
//! reconciles the flag whenever the form changes, and the submit path
//! re-checks against a fresh balance right before posting.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::client::ExpensesApi;
use crate::errors::ServiceError;
use crate::models::{Expense, NewExpense, PaymentMethod};
use crate::services::cash_sessions::CashSessionService;

const MIN_DESCRIPTION_LEN: usize = 3;

/// Mutable form state for a new expense.
#[derive(Debug, Clone)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount_cents: i64,
    pub payment_method: PaymentMethod,
    pub draws_from_cash: bool,
    pub date: NaiveDate,
}

impl ExpenseDraft {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            description: String::new(),
            amount_cents: 0,
            payment_method: PaymentMethod::Cash,
            draws_from_cash: false,
            date,
        }
    }

    /// Whether the cash-draw option may be offered at all.
    pub fn cash_draw_available(&self, session_open: bool) -> bool {
        session_open && self.payment_method == PaymentMethod::Cash
    }

    /// Force-clears `draws_from_cash` when its preconditions no longer hold.
    /// Called after every field change so the flag can never survive a switch
    /// away from cash or a session closing under the form.
    pub fn reconcile(&mut self, session_open: bool) {
        if !self.cash_draw_available(session_open) {
            self.draws_from_cash = false;
        }
    }
}

pub struct ExpenseService {
    api: Arc<dyn ExpensesApi>,
    sessions: Arc<CashSessionService>,
    submit_gate: Mutex<()>,
}

impl ExpenseService {
    pub fn new(api: Arc<dyn ExpensesApi>, sessions: Arc<CashSessionService>) -> Self {
        Self {
            api,
            sessions,
            submit_gate: Mutex::new(()),
        }
    }

    /// Validates and submits a draft.
    ///
    /// Validation order: description, then amount, then the cash-draw guard.
    /// The guard re-fetches the session so the comparison runs against the
    /// backend's current balance, not a stale cache; when the drawer cannot
    /// cover the amount the flag is cleared on the draft (so the form shows
    /// the corrected state) and the submit fails.
    #[instrument(skip(self, draft))]
    pub async fn submit(&self, draft: &mut ExpenseDraft) -> Result<Expense, ServiceError> {
        let description = draft.description.trim().to_string();
        if description.chars().count() < MIN_DESCRIPTION_LEN {
            return Err(ServiceError::validation(
                "A descrição deve ter pelo menos 3 caracteres.",
            ));
        }
        if draft.amount_cents <= 0 {
            return Err(ServiceError::validation(
                "Insira um valor válido maior que zero.",
            ));
        }

        let _gate = self
            .submit_gate
            .try_lock()
            .map_err(|_| ServiceError::OperationInFlight)?;

        if draft.draws_from_cash {
            let session = self.sessions.refresh().await;
            let covered = session
                .as_ref()
                .is_some_and(|s| s.current_balance_cents >= draft.amount_cents);
            draft.reconcile(session.is_some());
            if !covered {
                draft.draws_from_cash = false;
                return Err(ServiceError::validation(
                    "O caixa não tem saldo suficiente para esta retirada.",
                ));
            }
        }

        let expense = NewExpense {
            description,
            amount_cents: draft.amount_cents,
            payment_method: draft.payment_method,
            draws_from_cash: draft.draws_from_cash,
            date: draft.date,
        };
        let recorded = self.api.create_expense(&expense).await?;
        info!(expense_id = %recorded.id, amount_cents = recorded.amount_cents, "expense recorded");

        if recorded.draws_from_cash {
            // The backend posted a withdrawal; the displayed balance must follow.
            self.sessions.refresh().await;
        }
        Ok(recorded)
    }

    /// Lists expenses, newest first as the backend returns them. Canceled
    /// ones are hidden unless explicitly requested.
    pub async fn list(&self, include_canceled: bool) -> Result<Vec<Expense>, ServiceError> {
        let expenses = self.api.list_expenses().await?;
        if include_canceled {
            return Ok(expenses);
        }
        Ok(expenses.into_iter().filter(Expense::counts_in_totals).collect())
    }

    /// Cancels an expense. A status transition on the backend, never a
    /// delete; the record stays listable with `include_canceled`.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: Uuid) -> Result<Expense, ServiceError> {
        let canceled = self.api.cancel_expense(id).await?;
        info!(expense_id = %id, "expense canceled");
        if canceled.draws_from_cash {
            self.sessions.refresh().await;
        }
        Ok(canceled)
    }
}
