//! Product catalog management.
//!
//! Thin orchestration over [`CatalogApi`]: local validation of the
//! registration form, GTIN lookup to pre-fill it, and the restock adjustment.
//! The backend owns the catalog; nothing is cached here because the admin
//! screens always want fresh data.

use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::client::CatalogApi;
use crate::errors::ServiceError;
use crate::models::{GtinProduct, NewProduct, Product, ProductQuery, StockAdjustment};
use crate::services::barcode::normalize_barcode;

pub struct ProductService {
    api: Arc<dyn CatalogApi>,
}

impl ProductService {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, ServiceError> {
        self.api.list_products(query).await
    }

    /// Looks a GTIN up in the external product database. The code is
    /// normalized to digits first; an empty result is a validation error, not
    /// a request.
    #[instrument(skip(self))]
    pub async fn lookup_gtin(&self, raw_code: &str) -> Result<GtinProduct, ServiceError> {
        let code = normalize_barcode(raw_code);
        if code.is_empty() {
            return Err(ServiceError::validation("Informe um código de barras."));
        }
        self.api.product_by_gtin(&code).await
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create(&self, product: &NewProduct) -> Result<Product, ServiceError> {
        validate_product(product)?;
        let created = self.api.create_product(product).await?;
        info!(product_id = %created.id, "product created");
        Ok(created)
    }

    #[instrument(skip(self, product))]
    pub async fn update(&self, id: Uuid, product: &NewProduct) -> Result<Product, ServiceError> {
        validate_product(product)?;
        self.api.update_product(id, product).await
    }

    /// Restock: adds units and optionally reprices in the same call.
    #[instrument(skip(self))]
    pub async fn restock(
        &self,
        id: Uuid,
        quantity_added: i64,
        new_sale_price_cents: Option<i64>,
    ) -> Result<Product, ServiceError> {
        if quantity_added <= 0 {
            return Err(ServiceError::validation(
                "Insira uma quantidade válida maior que zero.",
            ));
        }
        if matches!(new_sale_price_cents, Some(p) if p <= 0) {
            return Err(ServiceError::validation("Insira um preço de venda válido."));
        }
        let adjustment = StockAdjustment {
            quantity_added,
            new_sale_price_cents,
        };
        self.api.adjust_stock(id, &adjustment).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.api.delete_product(id).await?;
        info!(product_id = %id, "product deleted");
        Ok(())
    }
}

fn validate_product(product: &NewProduct) -> Result<(), ServiceError> {
    if product.name.trim().is_empty() {
        return Err(ServiceError::validation("Informe o nome do produto."));
    }
    if product.sale_price_cents <= 0 {
        return Err(ServiceError::validation("Insira um preço de venda válido."));
    }
    if product.stock_quantity < 0 {
        return Err(ServiceError::validation(
            "A quantidade em estoque não pode ser negativa.",
        ));
    }
    Ok(())
}
