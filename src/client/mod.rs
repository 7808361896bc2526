//! Backend ports.
//!
//! The services code against these traits instead of a concrete HTTP client,
//! which keeps every flow testable with an in-memory fake. [`http::HttpBackend`]
//! is the production implementation of all of them.

pub mod http;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::{
    AdminOverview, CashFlowReport, CashSession, ClosingSummary, DashboardReport, Expense,
    GtinProduct, Identity, NewCashMovement, NewExpense, NewProduct, NewSale, Product,
    ProductQuery, ProfitReport, Sale, StockAdjustment,
};

pub use http::HttpBackend;

/// Cash-register lifecycle endpoints. The backend owns the ledger and the
/// single-open-session invariant; this contract only moves requests across.
#[async_trait]
pub trait CashRegisterApi: Send + Sync {
    /// `GET /caixas/aberto`. `Ok(None)` when no session is open.
    async fn fetch_open_session(&self) -> Result<Option<CashSession>, ServiceError>;

    /// `POST /caixas/abrir`.
    async fn open_session(&self, opening_balance_cents: i64) -> Result<CashSession, ServiceError>;

    /// `POST /caixas/movimentacao`.
    async fn post_movement(&self, movement: &NewCashMovement) -> Result<(), ServiceError>;

    /// `POST /caixas/fechar`. Terminal for the session.
    async fn close_session(&self, session_id: Uuid) -> Result<ClosingSummary, ServiceError>;
}

#[async_trait]
pub trait SalesApi: Send + Sync {
    /// `POST /vendas`.
    async fn submit_sale(&self, sale: &NewSale) -> Result<Sale, ServiceError>;

    /// `GET /vendas?pagina=&limite=`.
    async fn list_sales(&self, page: u32, limit: u32) -> Result<Vec<Sale>, ServiceError>;

    /// `GET /vendas/:id`.
    async fn sale_detail(&self, id: Uuid) -> Result<Sale, ServiceError>;
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET /produtos`.
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ServiceError>;

    /// `GET /produtos/gtin/:code`.
    async fn product_by_gtin(&self, gtin: &str) -> Result<GtinProduct, ServiceError>;

    /// `POST /produtos`.
    async fn create_product(&self, product: &NewProduct) -> Result<Product, ServiceError>;

    /// `PUT /produtos/:id`.
    async fn update_product(&self, id: Uuid, product: &NewProduct)
        -> Result<Product, ServiceError>;

    /// `PATCH /produtos/:id/estoque`.
    async fn adjust_stock(
        &self,
        id: Uuid,
        adjustment: &StockAdjustment,
    ) -> Result<Product, ServiceError>;

    /// `DELETE /produtos/:id`.
    async fn delete_product(&self, id: Uuid) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait ExpensesApi: Send + Sync {
    /// `POST /despesas`.
    async fn create_expense(&self, expense: &NewExpense) -> Result<Expense, ServiceError>;

    /// `GET /despesas`.
    async fn list_expenses(&self) -> Result<Vec<Expense>, ServiceError>;

    /// `PATCH /despesas/:id/cancelar` — status transition, never a delete.
    async fn cancel_expense(&self, id: Uuid) -> Result<Expense, ServiceError>;
}

#[async_trait]
pub trait ReportsApi: Send + Sync {
    /// `GET /relatorios/dashboard`.
    async fn dashboard_report(&self) -> Result<DashboardReport, ServiceError>;

    /// `GET /relatorios/financeiro/lucro`.
    async fn profit_report(&self) -> Result<ProfitReport, ServiceError>;

    /// `GET /relatorios/financeiro/fluxo`.
    async fn cash_flow_report(&self) -> Result<CashFlowReport, ServiceError>;

    /// `GET /dashboard/admin/overview`.
    async fn admin_overview(&self) -> Result<AdminOverview, ServiceError>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/login`. Re-arms the silent-refresh latch on success.
    async fn login(&self, email: &str, password: &str) -> Result<(), ServiceError>;

    /// `POST /auth/logout`.
    async fn logout(&self) -> Result<(), ServiceError>;

    /// `GET /auth/me`.
    async fn me(&self) -> Result<Identity, ServiceError>;
}
