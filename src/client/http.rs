//! HTTP adapter for the backend ports.
//!
//! Session identity travels in cookies (the reqwest cookie store plays the
//! role the browser played for the original front-end). Every response is
//! wrapped in the backend's `{ status, data, message }` envelope except
//! `/auth/me`, which answers with the identity object directly.
//!
//! A 401 on a non-auth endpoint triggers exactly one silent session refresh
//! and one retry. Concurrent 401s share the same refresh attempt, and a
//! failed refresh latches further attempts off until the next explicit login
//! so an expired session cannot thrash the backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::client::{AuthApi, CashRegisterApi, CatalogApi, ExpensesApi, ReportsApi, SalesApi};
use crate::config::AppConfig;
use crate::errors::{BackendErrorBody, ServiceError};
use crate::models::{
    AdminOverview, CashFlowReport, CashSession, ClosingSummary, DashboardReport, Expense,
    GtinProduct, Identity, NewCashMovement, NewExpense, NewProduct, NewSale, Product,
    ProductQuery, ProfitReport, Sale, StockAdjustment,
};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default)]
struct RefreshState {
    /// Bumped on every successful refresh; callers that observed an older
    /// epoch know someone else already refreshed for them.
    epoch: u64,
    /// Set when a refresh fails; cleared by an explicit login.
    disabled: bool,
}

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    refresh: Mutex<RefreshState>,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        // Parse up front so a bad URL fails at startup, not mid-sale.
        let parsed = Url::parse(base_url)?;
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            refresh: Mutex::new(RefreshState::default()),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn is_auth_path(path: &str) -> bool {
        path.starts_with("/auth/")
    }

    async fn current_epoch(&self) -> u64 {
        self.refresh.lock().await.epoch
    }

    /// Single-flight session refresh. `observed` is the epoch the caller saw
    /// before its request went out: if the epoch moved past it while the
    /// caller was waiting for the lock, the refresh already happened.
    async fn refresh_session(&self, observed: u64) -> Result<(), ServiceError> {
        let mut state = self.refresh.lock().await;
        if state.epoch > observed {
            return Ok(());
        }
        if state.disabled {
            return Err(ServiceError::Unauthorized);
        }
        debug!("session expired; attempting silent refresh");
        let result = self
            .http
            .post(self.endpoint("/auth/refresh"))
            .send()
            .await;
        match result {
            Ok(resp) if resp.status().is_success() => {
                state.epoch += 1;
                Ok(())
            }
            Ok(resp) => {
                warn!(status = %resp.status(), "session refresh rejected; disabling until next login");
                state.disabled = true;
                Err(ServiceError::Unauthorized)
            }
            Err(err) => {
                warn!(error = %err, "session refresh failed");
                state.disabled = true;
                Err(ServiceError::Transport(err.to_string()))
            }
        }
    }

    /// Re-arms the refresh latch. Called on explicit login.
    async fn reset_refresh_latch(&self) {
        let mut state = self.refresh.lock().await;
        state.disabled = false;
    }

    /// Sends the request, refreshing the session and retrying once on 401.
    async fn send(
        &self,
        path: &str,
        make: impl Fn() -> RequestBuilder,
    ) -> Result<Envelope, ServiceError> {
        let observed = self.current_epoch().await;
        let response = make().send().await?;

        if response.status() == StatusCode::UNAUTHORIZED && !Self::is_auth_path(path) {
            self.refresh_session(observed).await?;
            let retried = make().send().await?;
            return Self::unwrap_envelope(retried).await;
        }
        Self::unwrap_envelope(response).await
    }

    async fn unwrap_envelope(response: reqwest::Response) -> Result<Envelope, ServiceError> {
        let status = response.status();
        if status.is_success() {
            if status == StatusCode::NO_CONTENT {
                return Ok(Envelope {
                    data: None,
                    message: None,
                });
            }
            return Ok(response.json::<Envelope>().await?);
        }
        let body = response
            .json::<BackendErrorBody>()
            .await
            .unwrap_or_default();
        Err(ServiceError::from_status(status, &body))
    }

    fn require<T: DeserializeOwned>(envelope: Envelope, context: &str) -> Result<T, ServiceError> {
        let value = envelope
            .data
            .ok_or_else(|| ServiceError::UnexpectedResponse(format!("{}: sem dados", context)))?;
        serde_json::from_value(value)
            .map_err(|e| ServiceError::UnexpectedResponse(format!("{}: {}", context, e)))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let envelope = self.send(path, || self.http.get(self.endpoint(path))).await?;
        Self::require(envelope, path)
    }

    async fn get_with_query<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ServiceError> {
        let envelope = self
            .send(path, || self.http.get(self.endpoint(path)).query(query))
            .await?;
        Self::require(envelope, path)
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let envelope = self
            .send(path, || self.http.post(self.endpoint(path)).json(body))
            .await?;
        Self::require(envelope, path)
    }

    async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ServiceError> {
        self.send(path, || self.http.post(self.endpoint(path)).json(body))
            .await?;
        Ok(())
    }

    async fn request_unit(&self, method: Method, path: &str) -> Result<(), ServiceError> {
        self.send(path, || {
            self.http.request(method.clone(), self.endpoint(path))
        })
        .await?;
        Ok(())
    }
}

#[async_trait]
impl CashRegisterApi for HttpBackend {
    async fn fetch_open_session(&self) -> Result<Option<CashSession>, ServiceError> {
        let envelope = self
            .send("/caixas/aberto", || {
                self.http.get(self.endpoint("/caixas/aberto"))
            })
            .await?;
        match envelope.data {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| ServiceError::UnexpectedResponse(format!("/caixas/aberto: {}", e))),
        }
    }

    async fn open_session(&self, opening_balance_cents: i64) -> Result<CashSession, ServiceError> {
        self.post(
            "/caixas/abrir",
            &json!({ "valorInicialCentavos": opening_balance_cents }),
        )
        .await
    }

    async fn post_movement(&self, movement: &NewCashMovement) -> Result<(), ServiceError> {
        self.post_unit("/caixas/movimentacao", movement).await
    }

    async fn close_session(&self, session_id: Uuid) -> Result<ClosingSummary, ServiceError> {
        self.post("/caixas/fechar", &json!({ "caixaId": session_id }))
            .await
    }
}

#[async_trait]
impl SalesApi for HttpBackend {
    async fn submit_sale(&self, sale: &NewSale) -> Result<Sale, ServiceError> {
        self.post("/vendas", sale).await
    }

    async fn list_sales(&self, page: u32, limit: u32) -> Result<Vec<Sale>, ServiceError> {
        self.get_with_query("/vendas", &[("pagina", page), ("limite", limit)])
            .await
    }

    async fn sale_detail(&self, id: Uuid) -> Result<Sale, ServiceError> {
        self.get(&format!("/vendas/{}", id)).await
    }
}

#[async_trait]
impl CatalogApi for HttpBackend {
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ServiceError> {
        self.get_with_query("/produtos", query).await
    }

    async fn product_by_gtin(&self, gtin: &str) -> Result<GtinProduct, ServiceError> {
        self.get(&format!("/produtos/gtin/{}", gtin)).await
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product, ServiceError> {
        self.post("/produtos", product).await
    }

    async fn update_product(
        &self,
        id: Uuid,
        product: &NewProduct,
    ) -> Result<Product, ServiceError> {
        let path = format!("/produtos/{}", id);
        let envelope = self
            .send(&path, || self.http.put(self.endpoint(&path)).json(product))
            .await?;
        Self::require(envelope, &path)
    }

    async fn adjust_stock(
        &self,
        id: Uuid,
        adjustment: &StockAdjustment,
    ) -> Result<Product, ServiceError> {
        let path = format!("/produtos/{}/estoque", id);
        let envelope = self
            .send(&path, || {
                self.http.patch(self.endpoint(&path)).json(adjustment)
            })
            .await?;
        Self::require(envelope, &path)
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), ServiceError> {
        self.request_unit(Method::DELETE, &format!("/produtos/{}", id))
            .await
    }
}

#[async_trait]
impl ExpensesApi for HttpBackend {
    async fn create_expense(&self, expense: &NewExpense) -> Result<Expense, ServiceError> {
        self.post("/despesas", expense).await
    }

    async fn list_expenses(&self) -> Result<Vec<Expense>, ServiceError> {
        self.get("/despesas").await
    }

    async fn cancel_expense(&self, id: Uuid) -> Result<Expense, ServiceError> {
        let path = format!("/despesas/{}/cancelar", id);
        let envelope = self
            .send(&path, || self.http.patch(self.endpoint(&path)))
            .await?;
        Self::require(envelope, &path)
    }
}

#[async_trait]
impl ReportsApi for HttpBackend {
    async fn dashboard_report(&self) -> Result<DashboardReport, ServiceError> {
        self.get("/relatorios/dashboard").await
    }

    async fn profit_report(&self) -> Result<ProfitReport, ServiceError> {
        self.get("/relatorios/financeiro/lucro").await
    }

    async fn cash_flow_report(&self) -> Result<CashFlowReport, ServiceError> {
        self.get("/relatorios/financeiro/fluxo").await
    }

    async fn admin_overview(&self) -> Result<AdminOverview, ServiceError> {
        self.get("/dashboard/admin/overview").await
    }
}

#[async_trait]
impl AuthApi for HttpBackend {
    async fn login(&self, email: &str, password: &str) -> Result<(), ServiceError> {
        self.post_unit("/auth/login", &json!({ "email": email, "password": password }))
            .await?;
        self.reset_refresh_latch().await;
        Ok(())
    }

    async fn logout(&self) -> Result<(), ServiceError> {
        self.post_unit("/auth/logout", &json!({})).await
    }

    async fn me(&self) -> Result<Identity, ServiceError> {
        // `/auth/me` answers without the envelope, and as an auth endpoint it
        // never triggers a silent refresh: a 401 here means anonymous.
        let response = self.http.get(self.endpoint("/auth/me")).send().await?;
        Self::identity_from(response).await
    }
}

impl HttpBackend {
    async fn identity_from(response: reqwest::Response) -> Result<Identity, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<Identity>().await?);
        }
        let body = response
            .json::<BackendErrorBody>()
            .await
            .unwrap_or_default();
        Err(ServiceError::from_status(status, &body))
    }
}
