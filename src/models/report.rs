use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Profit breakdown for a period. Monetary fields are cents; only the margin
/// ratio is a float.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitReport {
    #[serde(rename = "faturamentoCentavos")]
    pub revenue_cents: i64,
    #[serde(rename = "custoTotalCentavos")]
    pub total_cost_cents: i64,
    #[serde(rename = "lucroCentavos")]
    pub profit_cents: i64,
    #[serde(rename = "margemPercentual")]
    pub margin_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowDay {
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "totalCentavos")]
    pub total_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowReport {
    #[serde(rename = "totalPeriodoCentavos")]
    pub period_total_cents: i64,
    #[serde(rename = "mediaDiariaCentavos")]
    pub daily_average_cents: i64,
    #[serde(rename = "dias")]
    pub days: Vec<CashFlowDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopProduct {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "quantidade")]
    pub quantity: i64,
    #[serde(rename = "totalFaturadoCentavos")]
    pub revenue_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSummary {
    #[serde(rename = "totalItens")]
    pub total_items: i64,
    #[serde(rename = "alertaEstoqueBaixo")]
    pub low_stock_alerts: i64,
    #[serde(rename = "valorTotalEstoqueCentavos")]
    pub stock_value_cents: i64,
    #[serde(rename = "itensCriticos")]
    pub critical_items: Vec<CriticalItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalItem {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "qtd")]
    pub quantity: i64,
}

/// `GET /relatorios/dashboard` — the aggregated view the reports screen
/// renders: financial summary, top sellers and stock alerts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    #[serde(rename = "financeiro")]
    pub financial: FinancialSummary,
    #[serde(rename = "topProdutos")]
    pub top_products: Vec<TopProduct>,
    #[serde(rename = "estoque")]
    pub stock: StockSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialSummary {
    #[serde(rename = "faturamentoTotalCentavos")]
    pub total_revenue_cents: i64,
    #[serde(rename = "totalVendas")]
    pub sale_count: i64,
    #[serde(rename = "ticketMedioCentavos")]
    pub average_ticket_cents: i64,
    #[serde(rename = "porMetodo")]
    pub by_method: Vec<MethodTotal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodTotal {
    #[serde(rename = "metodo")]
    pub method: String,
    #[serde(rename = "valorCentavos")]
    pub amount_cents: i64,
}

/// `GET /dashboard/admin/overview` — the admin landing card: register state
/// plus today's numbers and product alerts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminOverview {
    #[serde(rename = "caixa")]
    pub register: RegisterOverview,
    #[serde(rename = "hoje")]
    pub today: TodayOverview,
    #[serde(rename = "produtos")]
    pub products: ProductAlerts,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterOverview {
    pub status: crate::models::CashSessionStatus,
    #[serde(rename = "valorInicialCentavos")]
    pub opening_balance_cents: Option<i64>,
    #[serde(rename = "valorAtualCentavos")]
    pub current_balance_cents: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodayOverview {
    #[serde(rename = "entradasCentavos")]
    pub inflow_cents: i64,
    #[serde(rename = "despesasCentavos")]
    pub expenses_cents: i64,
    #[serde(rename = "lucroCentavos")]
    pub profit_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductAlerts {
    #[serde(rename = "emFalta")]
    pub out_of_stock: i64,
    #[serde(rename = "estoqueBaixo")]
    pub low_stock: i64,
    #[serde(rename = "parados")]
    pub stale: i64,
}
