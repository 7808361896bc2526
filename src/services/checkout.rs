//! Sale checkout flow (PDV).
//!
//! Assembles a cart against a catalog snapshot, validates payment
//! sufficiency, submits the sale and renders a receipt. Adding items is
//! gated on an open cash session; the confirm action is single-flight so a
//! double-click can never submit the same sale twice.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::client::{CatalogApi, SalesApi};
use crate::errors::ServiceError;
use crate::models::{NewSale, NewSaleItem, PaymentMethod, Product, ProductQuery, Sale};
use crate::pix::PixCharge;
use crate::services::barcode::{normalize_barcode, ScanDebouncer};
use crate::services::cash_sessions::CashSessionService;

/// One cart line: a catalog snapshot of the product plus a quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.quantity)
    }
}

/// In-memory cart. Pure data structure; every mutation recomputes nothing —
/// the total is derived on read.
#[derive(Debug, Default, Clone)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Adds one unit: increments the quantity when the product is already in
    /// the cart, otherwise appends a new line with quantity 1.
    pub fn add(&mut self, product: &Product) -> u32 {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            item.quantity += 1;
            return item.quantity;
        }
        self.items.push(CartItem {
            product_id: product.id,
            name: product.name.clone(),
            unit_price_cents: product.sale_price_cents,
            quantity: 1,
        });
        1
    }

    /// Removes one unit; the line disappears when the quantity reaches zero.
    pub fn decrement(&mut self, product_id: Uuid) {
        if let Some(pos) = self.items.iter().position(|i| i.product_id == product_id) {
            if self.items[pos].quantity > 1 {
                self.items[pos].quantity -= 1;
            } else {
                self.items.remove(pos);
            }
        }
    }

    pub fn total_cents(&self) -> i64 {
        self.items.iter().map(CartItem::line_total_cents).sum()
    }

    pub fn quantity_of(&self, product_id: Uuid) -> u32 {
        self.items
            .iter()
            .find(|i| i.product_id == product_id)
            .map(|i| i.quantity)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Change owed for a cash payment. Never negative: an insufficient tender
/// shows zero change and keeps the confirm action disabled instead.
pub fn change_cents(total_cents: i64, received_cents: i64) -> i64 {
    (received_cents - total_cents).max(0)
}

/// Whether the confirm action is enabled for the chosen method. Cash needs
/// the tendered amount to cover the total; the other methods only need to be
/// selected.
pub fn can_confirm(method: PaymentMethod, total_cents: i64, received_cents: Option<i64>) -> bool {
    if total_cents <= 0 {
        return false;
    }
    match method {
        PaymentMethod::Cash => received_cents.unwrap_or(0) >= total_cents,
        PaymentMethod::Pix | PaymentMethod::Debit | PaymentMethod::Credit => true,
    }
}

/// What the operator hands the customer after a finalized sale.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub sale: Sale,
    pub items: Vec<CartItem>,
    pub payment_method: PaymentMethod,
    pub received_cents: Option<i64>,
    pub change_cents: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Product found and added; carries the new cart quantity.
    Added { product_id: Uuid, quantity: u32 },
    /// Same code re-read inside the cool-down window.
    Ignored,
    /// No catalog product carries this barcode.
    NotFound,
}

pub struct CheckoutService {
    sales: Arc<dyn SalesApi>,
    catalog_api: Arc<dyn CatalogApi>,
    sessions: Arc<CashSessionService>,
    catalog: RwLock<Vec<Product>>,
    cart: RwLock<Cart>,
    debouncer: ScanDebouncer,
    pix: PixCharge,
    /// Held while a sale submission is in flight.
    confirm_gate: Mutex<()>,
}

impl CheckoutService {
    pub fn new(
        sales: Arc<dyn SalesApi>,
        catalog_api: Arc<dyn CatalogApi>,
        sessions: Arc<CashSessionService>,
        pix: PixCharge,
        scan_cooldown: Duration,
    ) -> Self {
        Self {
            sales,
            catalog_api,
            sessions,
            catalog: RwLock::new(Vec::new()),
            cart: RwLock::new(Cart::default()),
            debouncer: ScanDebouncer::new(scan_cooldown),
            pix,
            confirm_gate: Mutex::new(()),
        }
    }

    /// Loads the catalog snapshot and the session status, like the PDV screen
    /// does on mount.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<(), ServiceError> {
        let products = self.catalog_api.list_products(&ProductQuery::default()).await?;
        self.sessions.refresh().await;
        let mut catalog = self.catalog.write().await;
        *catalog = products;
        Ok(())
    }

    /// Case- and accent-insensitive catalog search.
    pub async fn search_catalog(&self, term: &str) -> Vec<Product> {
        let needle = fold_text(term);
        self.catalog
            .read()
            .await
            .iter()
            .filter(|p| fold_text(&p.name).contains(&needle))
            .cloned()
            .collect()
    }

    /// Adds one unit of a catalog product to the cart. Rejected while no
    /// cash session is open.
    pub async fn add_product(&self, product_id: Uuid) -> Result<u32, ServiceError> {
        if !self.sessions.is_open().await {
            return Err(ServiceError::NoOpenSession);
        }
        let product = {
            let catalog = self.catalog.read().await;
            catalog
                .iter()
                .find(|p| p.id == product_id)
                .cloned()
                .ok_or_else(|| ServiceError::NotFound(format!("produto {}", product_id)))?
        };
        let mut cart = self.cart.write().await;
        Ok(cart.add(&product))
    }

    pub async fn decrement_product(&self, product_id: Uuid) {
        let mut cart = self.cart.write().await;
        cart.decrement(product_id);
    }

    pub async fn cart_snapshot(&self) -> Cart {
        self.cart.read().await.clone()
    }

    pub async fn total_cents(&self) -> i64 {
        self.cart.read().await.total_cents()
    }

    /// Handles a raw scanner read: normalize, debounce, look up, add.
    #[instrument(skip(self))]
    pub async fn scan(&self, raw_code: &str) -> Result<ScanOutcome, ServiceError> {
        let code = normalize_barcode(raw_code);
        if code.is_empty() {
            return Ok(ScanOutcome::NotFound);
        }
        if !self.debouncer.accept(&code).await {
            return Ok(ScanOutcome::Ignored);
        }
        let product = {
            let catalog = self.catalog.read().await;
            catalog
                .iter()
                .find(|p| {
                    p.barcode
                        .as_deref()
                        .is_some_and(|b| normalize_barcode(b) == code)
                })
                .cloned()
        };
        match product {
            Some(product) => {
                let quantity = self.add_product(product.id).await?;
                Ok(ScanOutcome::Added {
                    product_id: product.id,
                    quantity,
                })
            }
            None => Ok(ScanOutcome::NotFound),
        }
    }

    /// PIX "copia e cola" payload for the current total.
    pub async fn pix_payload(&self) -> Result<String, ServiceError> {
        let total = self.total_cents().await;
        if total <= 0 {
            return Err(ServiceError::validation("A sacola está vazia."));
        }
        Ok(self.pix.payload(total))
    }

    /// Submits the sale.
    ///
    /// Single-flight: a second invocation while the first is still talking to
    /// the backend gets `OperationInFlight` — exactly one sale is submitted.
    /// On success the cart is cleared and a receipt returned; on failure the
    /// cart is kept untouched so the operator can retry.
    #[instrument(skip(self))]
    pub async fn confirm(
        &self,
        method: PaymentMethod,
        received_cents: Option<i64>,
    ) -> Result<Receipt, ServiceError> {
        let _gate = self
            .confirm_gate
            .try_lock()
            .map_err(|_| ServiceError::OperationInFlight)?;

        let session_id = self
            .sessions
            .open_session_id()
            .await
            .ok_or(ServiceError::NoOpenSession)?;

        let (items, total) = {
            let cart = self.cart.read().await;
            if cart.is_empty() {
                return Err(ServiceError::validation(
                    "A sacola está vazia. Adicione itens antes de finalizar.",
                ));
            }
            (cart.items().to_vec(), cart.total_cents())
        };

        let (received, change) = match method {
            PaymentMethod::Cash => {
                let received = received_cents.unwrap_or(0);
                if received < total {
                    return Err(ServiceError::validation("Valor recebido insuficiente."));
                }
                (Some(received), Some(change_cents(total, received)))
            }
            _ => (None, None),
        };

        let sale = NewSale {
            session_id,
            payment_method: method,
            items: items
                .iter()
                .map(|i| NewSaleItem {
                    product_id: i.product_id,
                    quantity: i.quantity,
                })
                .collect(),
            received_cents: received,
            change_cents: change,
        };

        let recorded = self.sales.submit_sale(&sale).await?;
        info!(sale_id = %recorded.id, total_cents = recorded.total_cents, "sale finalized");

        let mut cart = self.cart.write().await;
        cart.clear();

        Ok(Receipt {
            sale: recorded,
            items,
            payment_method: method,
            received_cents: received,
            change_cents: change,
        })
    }
}

/// Lowercases and strips the accents that appear in Portuguese product names,
/// so "Pão" matches "pao".
fn fold_text(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_lowercase().next().unwrap_or(c) {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, price_cents: i64) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: "Mercearia".to_string(),
            barcode: None,
            image_url: None,
            sale_price_cents: price_cents,
            cost_price_cents: None,
            stock_quantity: 10,
        }
    }

    // ==================== Cart math ====================

    #[test]
    fn test_add_new_product_starts_at_quantity_one() {
        let mut cart = Cart::default();
        let p = product("Café", 1550);
        assert_eq!(cart.add(&p), 1);
        assert_eq!(cart.total_cents(), 1550);
    }

    #[test]
    fn test_add_existing_product_increments_quantity() {
        let mut cart = Cart::default();
        let p = product("Café", 1550);
        cart.add(&p);
        assert_eq!(cart.add(&p), 2);
        assert_eq!(cart.total_cents(), 3100);
    }

    #[test]
    fn test_decrement_removes_line_at_zero() {
        let mut cart = Cart::default();
        let p = product("Café", 1550);
        cart.add(&p);
        cart.add(&p);
        cart.decrement(p.id);
        assert_eq!(cart.quantity_of(p.id), 1);
        cart.decrement(p.id);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_sums_line_totals() {
        let mut cart = Cart::default();
        let a = product("Café", 1550);
        let b = product("Açúcar", 499);
        cart.add(&a);
        cart.add(&a);
        cart.add(&b);
        assert_eq!(cart.total_cents(), 1550 * 2 + 499);
    }

    // ==================== Payment rules ====================

    #[test]
    fn test_change_computation() {
        assert_eq!(change_cents(1000, 1500), 500);
        assert_eq!(change_cents(1000, 1000), 0);
        assert_eq!(change_cents(1000, 999), 0);
    }

    #[test]
    fn test_cash_confirm_requires_sufficient_tender() {
        assert!(can_confirm(PaymentMethod::Cash, 1000, Some(1500)));
        assert!(can_confirm(PaymentMethod::Cash, 1000, Some(1000)));
        assert!(!can_confirm(PaymentMethod::Cash, 1000, Some(999)));
        assert!(!can_confirm(PaymentMethod::Cash, 1000, None));
    }

    #[test]
    fn test_non_cash_methods_confirm_on_selection() {
        for method in [PaymentMethod::Pix, PaymentMethod::Debit, PaymentMethod::Credit] {
            assert!(can_confirm(method, 1000, None));
        }
    }

    #[test]
    fn test_empty_cart_never_confirms() {
        assert!(!can_confirm(PaymentMethod::Pix, 0, None));
        assert!(!can_confirm(PaymentMethod::Cash, 0, Some(100)));
    }

    // ==================== Search folding ====================

    #[test]
    fn test_fold_text_matches_accented_names() {
        assert_eq!(fold_text("Pão de Açúcar"), "pao de acucar");
        assert!(fold_text("CAFÉ").contains(&fold_text("café")));
    }
}
