use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    #[serde(rename = "DINHEIRO")]
    Cash,
    #[serde(rename = "PIX")]
    Pix,
    #[serde(rename = "DEBITO")]
    Debit,
    #[serde(rename = "CREDITO")]
    Credit,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Pix,
        PaymentMethod::Debit,
        PaymentMethod::Credit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Dinheiro",
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Debit => "Débito",
            PaymentMethod::Credit => "Crédito",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SaleStatus {
    #[serde(rename = "FINALIZADA")]
    Finalized,
    #[serde(rename = "CANCELADA")]
    Canceled,
}

/// Payload for `POST /vendas`. `received`/`change` only travel for cash
/// payments; the backend recomputes the authoritative total from its own
/// catalog prices and decrements stock atomically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSale {
    #[serde(rename = "caixaId")]
    pub session_id: Uuid,
    #[serde(rename = "metodoPagamento")]
    pub payment_method: PaymentMethod,
    #[serde(rename = "itens")]
    pub items: Vec<NewSaleItem>,
    #[serde(rename = "valorRecebidoCentavos", skip_serializing_if = "Option::is_none")]
    pub received_cents: Option<i64>,
    #[serde(rename = "trocoCentavos", skip_serializing_if = "Option::is_none")]
    pub change_cents: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSaleItem {
    #[serde(rename = "produtoId")]
    pub product_id: Uuid,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
}

/// A recorded sale as the backend reports it. `total_cents` is the server's
/// recomputed value — whatever the cart showed locally is display-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    #[serde(rename = "criadoEm")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "valorTotalCentavos")]
    pub total_cents: i64,
    #[serde(rename = "metodoPagamento")]
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    #[serde(rename = "itens", default)]
    pub items: Vec<SaleItem>,
}

impl Sale {
    /// Only finalized sales count as revenue in any client-side aggregate.
    pub fn counts_as_revenue(&self) -> bool {
        self.status == SaleStatus::Finalized
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: Uuid,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "precoUnitarioCentavos")]
    pub unit_price_cents: i64,
    #[serde(rename = "precoTotalCentavos")]
    pub line_total_cents: i64,
    #[serde(rename = "produtoNome")]
    pub product_name: String,
}
