//! In-memory backend fake shared by the integration tests.
//!
//! Implements the port traits over plain mutex-held state so the flows can
//! be exercised without a network. Behavior knobs (fetch failure, a slow
//! sale submission) let tests reproduce the failure modes the services are
//! built around.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use pdv_caixa::client::{CashRegisterApi, CatalogApi, ExpensesApi, SalesApi};
use pdv_caixa::errors::ServiceError;
use pdv_caixa::models::{
    CashSession, CashSessionStatus, ClosedBalances, ClosingSummary, Expense, ExpenseStatus,
    GtinProduct, MovementKind, NewCashMovement, NewExpense, NewProduct, NewSale, Product,
    ProductQuery, Sale, SaleStatus, Settlement, StockAdjustment,
};

pub struct FakeBackend {
    pub session: Mutex<Option<CashSession>>,
    /// When set, `fetch_open_session` fails with a transport error.
    pub fail_session_fetch: AtomicBool,
    pub movements: Mutex<Vec<NewCashMovement>>,
    pub products: Mutex<Vec<Product>>,
    pub sales: Mutex<Vec<NewSale>>,
    /// Artificial latency for `submit_sale`, so tests can race a second
    /// confirm against an in-flight one.
    pub sale_delay: Duration,
    pub expenses: Mutex<Vec<Expense>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            session: Mutex::new(None),
            fail_session_fetch: AtomicBool::new(false),
            movements: Mutex::new(Vec::new()),
            products: Mutex::new(Vec::new()),
            sales: Mutex::new(Vec::new()),
            sale_delay: Duration::ZERO,
            expenses: Mutex::new(Vec::new()),
        }
    }

    pub fn with_sale_delay(mut self, delay: Duration) -> Self {
        self.sale_delay = delay;
        self
    }

    pub async fn seed_open_session(&self, balance_cents: i64) -> CashSession {
        let session = CashSession {
            id: Uuid::new_v4(),
            status: CashSessionStatus::Open,
            opening_balance_cents: balance_cents,
            current_balance_cents: balance_cents,
            opened_at: Utc::now(),
        };
        *self.session.lock().await = Some(session.clone());
        session
    }

    pub async fn seed_product(&self, name: &str, price_cents: i64, barcode: Option<&str>) -> Product {
        let product = Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: "Mercearia".to_string(),
            barcode: barcode.map(str::to_string),
            image_url: None,
            sale_price_cents: price_cents,
            cost_price_cents: None,
            stock_quantity: 100,
        };
        self.products.lock().await.push(product.clone());
        product
    }

    pub async fn sale_count(&self) -> usize {
        self.sales.lock().await.len()
    }
}

#[async_trait]
impl CashRegisterApi for FakeBackend {
    async fn fetch_open_session(&self) -> Result<Option<CashSession>, ServiceError> {
        if self.fail_session_fetch.load(Ordering::SeqCst) {
            return Err(ServiceError::Transport("connection refused".to_string()));
        }
        Ok(self.session.lock().await.clone())
    }

    async fn open_session(&self, opening_balance_cents: i64) -> Result<CashSession, ServiceError> {
        let mut session = self.session.lock().await;
        if session.as_ref().is_some_and(CashSession::is_open) {
            return Err(ServiceError::Rejected("Já existe um caixa aberto.".to_string()));
        }
        let created = CashSession {
            id: Uuid::new_v4(),
            status: CashSessionStatus::Open,
            opening_balance_cents,
            current_balance_cents: opening_balance_cents,
            opened_at: Utc::now(),
        };
        *session = Some(created.clone());
        Ok(created)
    }

    async fn post_movement(&self, movement: &NewCashMovement) -> Result<(), ServiceError> {
        let mut session = self.session.lock().await;
        let current = session
            .as_mut()
            .filter(|s| s.is_open() && s.id == movement.session_id)
            .ok_or_else(|| ServiceError::Rejected("Nenhum caixa aberto.".to_string()))?;
        match movement.kind {
            MovementKind::Reinforcement => current.current_balance_cents += movement.amount_cents,
            MovementKind::Withdrawal => current.current_balance_cents -= movement.amount_cents,
        }
        self.movements.lock().await.push(movement.clone());
        Ok(())
    }

    async fn close_session(&self, session_id: Uuid) -> Result<ClosingSummary, ServiceError> {
        let mut session = self.session.lock().await;
        let open = session
            .as_ref()
            .filter(|s| s.is_open() && s.id == session_id)
            .cloned()
            .ok_or_else(|| ServiceError::Rejected("Este caixa já foi fechado.".to_string()))?;
        *session = None;
        Ok(ClosingSummary {
            balances: ClosedBalances {
                opening_balance_cents: open.opening_balance_cents,
                final_balance_cents: open.current_balance_cents,
            },
            settlement: Settlement {
                cash_cents: 0,
                pix_cents: 0,
                debit_cents: 0,
                credit_cents: 0,
                withdrawals_cents: 0,
                reinforcements_cents: 0,
                total_sales_cents: 0,
            },
        })
    }
}

#[async_trait]
impl SalesApi for FakeBackend {
    async fn submit_sale(&self, sale: &NewSale) -> Result<Sale, ServiceError> {
        if !self.sale_delay.is_zero() {
            tokio::time::sleep(self.sale_delay).await;
        }
        let products = self.products.lock().await;
        let mut total = 0i64;
        for item in &sale.items {
            let product = products
                .iter()
                .find(|p| p.id == item.product_id)
                .ok_or_else(|| ServiceError::NotFound("produto".to_string()))?;
            total += product.sale_price_cents * i64::from(item.quantity);
        }
        drop(products);
        self.sales.lock().await.push(sale.clone());
        Ok(Sale {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            total_cents: total,
            payment_method: sale.payment_method,
            status: SaleStatus::Finalized,
            items: Vec::new(),
        })
    }

    async fn list_sales(&self, _page: u32, _limit: u32) -> Result<Vec<Sale>, ServiceError> {
        Ok(Vec::new())
    }

    async fn sale_detail(&self, _id: Uuid) -> Result<Sale, ServiceError> {
        Err(ServiceError::NotFound("venda".to_string()))
    }
}

#[async_trait]
impl CatalogApi for FakeBackend {
    async fn list_products(&self, _query: &ProductQuery) -> Result<Vec<Product>, ServiceError> {
        Ok(self.products.lock().await.clone())
    }

    async fn product_by_gtin(&self, gtin: &str) -> Result<GtinProduct, ServiceError> {
        Err(ServiceError::NotFound(format!("gtin {}", gtin)))
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product, ServiceError> {
        let created = Product {
            id: Uuid::new_v4(),
            name: product.name.clone(),
            category: product.category.clone(),
            barcode: product.barcode.clone(),
            image_url: None,
            sale_price_cents: product.sale_price_cents,
            cost_price_cents: product.cost_price_cents,
            stock_quantity: product.stock_quantity,
        };
        self.products.lock().await.push(created.clone());
        Ok(created)
    }

    async fn update_product(
        &self,
        id: Uuid,
        _product: &NewProduct,
    ) -> Result<Product, ServiceError> {
        Err(ServiceError::NotFound(format!("produto {}", id)))
    }

    async fn adjust_stock(
        &self,
        id: Uuid,
        adjustment: &StockAdjustment,
    ) -> Result<Product, ServiceError> {
        let mut products = self.products.lock().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("produto {}", id)))?;
        product.stock_quantity += adjustment.quantity_added;
        if let Some(price) = adjustment.new_sale_price_cents {
            product.sale_price_cents = price;
        }
        Ok(product.clone())
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), ServiceError> {
        self.products.lock().await.retain(|p| p.id != id);
        Ok(())
    }
}

#[async_trait]
impl ExpensesApi for FakeBackend {
    async fn create_expense(&self, expense: &NewExpense) -> Result<Expense, ServiceError> {
        if expense.draws_from_cash {
            let mut session = self.session.lock().await;
            let current = session
                .as_mut()
                .filter(|s| s.is_open())
                .ok_or_else(|| ServiceError::Rejected("Nenhum caixa aberto.".to_string()))?;
            current.current_balance_cents -= expense.amount_cents;
        }
        let recorded = Expense {
            id: Uuid::new_v4(),
            description: expense.description.clone(),
            amount_cents: expense.amount_cents,
            payment_method: expense.payment_method,
            draws_from_cash: expense.draws_from_cash,
            status: ExpenseStatus::Settled,
            date: expense.date,
        };
        self.expenses.lock().await.push(recorded.clone());
        Ok(recorded)
    }

    async fn list_expenses(&self) -> Result<Vec<Expense>, ServiceError> {
        Ok(self.expenses.lock().await.clone())
    }

    async fn cancel_expense(&self, id: Uuid) -> Result<Expense, ServiceError> {
        let mut expenses = self.expenses.lock().await;
        let expense = expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("despesa {}", id)))?;
        expense.status = ExpenseStatus::Canceled;
        Ok(expense.clone())
    }
}
