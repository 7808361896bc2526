//! PDV Caixa Library
//!
//! Client library for a retail point of sale: cash-register lifecycle,
//! checkout, expenses, catalog and reports, all against a REST backend.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod money;
pub mod pix;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use crate::client::HttpBackend;
use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::pix::PixCharge;
use crate::services::{
    AuthService, CashSessionService, CheckoutService, ExpenseService, ProductService,
    ReportService,
};

/// The assembled application: one backend client shared by every service.
pub struct Pdv {
    pub auth: Arc<AuthService>,
    pub sessions: Arc<CashSessionService>,
    pub checkout: Arc<CheckoutService>,
    pub expenses: Arc<ExpenseService>,
    pub products: Arc<ProductService>,
    pub reports: Arc<ReportService>,
}

impl Pdv {
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let backend = Arc::new(HttpBackend::from_config(config)?);
        let sessions = Arc::new(CashSessionService::new(backend.clone()));
        let pix = PixCharge::new(
            config.pix_key.clone(),
            config.merchant_name.clone(),
            config.merchant_city.clone(),
        );
        let checkout = Arc::new(CheckoutService::new(
            backend.clone(),
            backend.clone(),
            sessions.clone(),
            pix,
            Duration::from_millis(config.scan_cooldown_ms),
        ));
        let expenses = Arc::new(ExpenseService::new(backend.clone(), sessions.clone()));
        let products = Arc::new(ProductService::new(backend.clone()));
        let reports = Arc::new(ReportService::new(backend.clone()));
        let auth = Arc::new(AuthService::new(backend));

        Ok(Self {
            auth,
            sessions,
            checkout,
            expenses,
            products,
            reports,
        })
    }
}
