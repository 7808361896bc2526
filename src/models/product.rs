use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "codigoBarras", default)]
    pub barcode: Option<String>,
    #[serde(rename = "imagemUrl", default)]
    pub image_url: Option<String>,
    #[serde(rename = "precoVendaCentavos")]
    pub sale_price_cents: i64,
    #[serde(rename = "precoCustoCentavos", default)]
    pub cost_price_cents: Option<i64>,
    #[serde(rename = "quantidadeEstoque")]
    pub stock_quantity: i64,
}

/// Catalog metadata returned by the GTIN lookup service (external product
/// database proxied by the backend). Used to pre-fill the registration form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GtinProduct {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "codigoBarras")]
    pub barcode: String,
    #[serde(rename = "marca", default)]
    pub brand: Option<String>,
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
    #[serde(rename = "imagemUrl", default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "codigoBarras", skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(rename = "precoVendaCentavos")]
    pub sale_price_cents: i64,
    #[serde(rename = "precoCustoCentavos", skip_serializing_if = "Option::is_none")]
    pub cost_price_cents: Option<i64>,
    #[serde(rename = "quantidadeEstoque")]
    pub stock_quantity: i64,
}

/// `PATCH /produtos/:id/estoque` — stock is adjusted by a delta, optionally
/// repricing at the same time (restocks often come with a new sale price).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAdjustment {
    #[serde(rename = "quantidadeAdicionada")]
    pub quantity_added: i64,
    #[serde(rename = "novoPrecoVendaCentavos", skip_serializing_if = "Option::is_none")]
    pub new_sale_price_cents: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductQuery {
    #[serde(rename = "busca", skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}
