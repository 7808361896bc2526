use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::PaymentMethod;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExpenseStatus {
    #[serde(rename = "QUITADA")]
    Settled,
    #[serde(rename = "PENDENTE")]
    Pending,
    #[serde(rename = "CANCELADA")]
    Canceled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "valorCentavos")]
    pub amount_cents: i64,
    #[serde(rename = "formaPagamento")]
    pub payment_method: PaymentMethod,
    #[serde(rename = "saiDoCaixa")]
    pub draws_from_cash: bool,
    pub status: ExpenseStatus,
    #[serde(rename = "dataDespesa")]
    pub date: NaiveDate,
}

impl Expense {
    /// Canceled expenses stay on record but drop out of every aggregate.
    pub fn counts_in_totals(&self) -> bool {
        self.status != ExpenseStatus::Canceled
    }
}

/// Payload for `POST /despesas`. `draws_from_cash` may only be set for cash
/// expenses that fit inside the open session's balance — the draft logic in
/// `services::expenses` enforces that before this struct is ever built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "valorCentavos")]
    pub amount_cents: i64,
    #[serde(rename = "formaPagamento")]
    pub payment_method: PaymentMethod,
    #[serde(rename = "saiDoCaixa")]
    pub draws_from_cash: bool,
    #[serde(rename = "dataDespesa")]
    pub date: NaiveDate,
}
