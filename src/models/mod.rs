//! Wire data model.
//!
//! Every struct here mirrors the backend's JSON contract (Portuguese
//! camelCase field names, money as integer centavos). The client never owns
//! any of these entities: it holds ephemeral copies for rendering and
//! re-fetches after every mutation instead of patching them locally.

pub mod cash_session;
pub mod expense;
pub mod product;
pub mod report;
pub mod sale;
pub mod user;

pub use cash_session::{
    CashSession, CashSessionStatus, ClosedBalances, ClosingSummary, MovementKind, NewCashMovement,
    Settlement,
};
pub use expense::{Expense, ExpenseStatus, NewExpense};
pub use product::{GtinProduct, NewProduct, Product, ProductQuery, StockAdjustment};
pub use report::{
    AdminOverview, CashFlowDay, CashFlowReport, DashboardReport, ProfitReport, StockSummary,
    TopProduct,
};
pub use sale::{NewSale, NewSaleItem, PaymentMethod, Sale, SaleItem, SaleStatus};
pub use user::{Company, Identity, UserProfile};
