use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::PaymentMethod;

/// One open-to-close operating period of a physical cash drawer ("caixa").
///
/// The backend assigns the id on open and computes `current_balance_cents`
/// from its own ledger (opening + cash sales + reinforcements − withdrawals).
/// The client only ever displays that value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CashSession {
    pub id: Uuid,
    pub status: CashSessionStatus,
    #[serde(rename = "valorInicialCentavos")]
    pub opening_balance_cents: i64,
    #[serde(rename = "valorAtualCentavos")]
    pub current_balance_cents: i64,
    #[serde(rename = "abertoEm")]
    pub opened_at: DateTime<Utc>,
}

impl CashSession {
    pub fn is_open(&self) -> bool {
        self.status == CashSessionStatus::Open
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CashSessionStatus {
    #[serde(rename = "ABERTO")]
    Open,
    #[serde(rename = "FECHADO")]
    Closed,
}

/// Cash adjustment outside of sales: reinforcement (reforço, +) or
/// withdrawal (sangria, wire name `SAIDA`, −).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MovementKind {
    #[serde(rename = "REFORCO")]
    Reinforcement,
    #[serde(rename = "SAIDA")]
    Withdrawal,
}

/// Payload for `POST /caixas/movimentacao`. Only valid against an open
/// session; amount strictly positive, description at least 3 chars trimmed
/// (client pre-validation — the backend re-checks and stays authoritative).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCashMovement {
    #[serde(rename = "caixaId")]
    pub session_id: Uuid,
    #[serde(rename = "tipo")]
    pub kind: MovementKind,
    #[serde(rename = "valorCentavos")]
    pub amount_cents: i64,
    #[serde(rename = "descricao")]
    pub description: String,
}

/// Result of `POST /caixas/fechar`: the per-payment-method settlement the
/// operator conferes the drawer against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingSummary {
    #[serde(rename = "caixa")]
    pub balances: ClosedBalances,
    #[serde(rename = "resumo")]
    pub settlement: Settlement,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedBalances {
    #[serde(rename = "valorInicialCentavos")]
    pub opening_balance_cents: i64,
    #[serde(rename = "valorFinalCentavos")]
    pub final_balance_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    #[serde(rename = "DINHEIRO")]
    pub cash_cents: i64,
    #[serde(rename = "PIX")]
    pub pix_cents: i64,
    #[serde(rename = "DEBITO")]
    pub debit_cents: i64,
    #[serde(rename = "CREDITO")]
    pub credit_cents: i64,
    #[serde(rename = "SANGRIAS")]
    pub withdrawals_cents: i64,
    #[serde(rename = "REFORCOS")]
    pub reinforcements_cents: i64,
    #[serde(rename = "totalVendas")]
    pub total_sales_cents: i64,
}

impl Settlement {
    pub fn for_method(&self, method: PaymentMethod) -> i64 {
        match method {
            PaymentMethod::Cash => self.cash_cents,
            PaymentMethod::Pix => self.pix_cents,
            PaymentMethod::Debit => self.debit_cents,
            PaymentMethod::Credit => self.credit_cents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_wire_format() {
        let json = serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "status": "ABERTO",
            "valorInicialCentavos": 2000,
            "valorAtualCentavos": 3500,
            "abertoEm": "2025-11-03T12:00:00Z"
        });
        let session: CashSession = serde_json::from_value(json).unwrap();
        assert!(session.is_open());
        assert_eq!(session.opening_balance_cents, 2000);
        assert_eq!(session.current_balance_cents, 3500);
    }

    #[test]
    fn test_movement_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&MovementKind::Withdrawal).unwrap(),
            "\"SAIDA\""
        );
        assert_eq!(
            serde_json::to_string(&MovementKind::Reinforcement).unwrap(),
            "\"REFORCO\""
        );
    }

    #[test]
    fn test_settlement_by_method() {
        let settlement = Settlement {
            cash_cents: 100,
            pix_cents: 200,
            debit_cents: 300,
            credit_cents: 400,
            withdrawals_cents: 50,
            reinforcements_cents: 60,
            total_sales_cents: 1000,
        };
        assert_eq!(settlement.for_method(PaymentMethod::Pix), 200);
        assert_eq!(settlement.for_method(PaymentMethod::Credit), 400);
    }
}
