//! Application services.
//!
//! Each service owns one flow of the point of sale: they validate locally,
//! call the backend through the port traits in [`crate::client`], and keep
//! whatever client-side state the flow needs (session cache, cart, auth
//! state). None of them holds authoritative data; the backend does.

pub mod auth;
pub mod barcode;
pub mod cash_sessions;
pub mod checkout;
pub mod expenses;
pub mod products;
pub mod reports;

pub use auth::{AuthService, AuthState};
pub use cash_sessions::CashSessionService;
pub use checkout::{Cart, CartItem, CheckoutService, Receipt, ScanOutcome};
pub use expenses::{ExpenseDraft, ExpenseService};
pub use products::ProductService;
pub use reports::ReportService;
