//! Dashboard and report views.
//!
//! The backend does all aggregation; this service fetches the pre-computed
//! views and adds the small amount of client-side derivation the screens
//! need (net balance, best cash-flow day).

use std::sync::Arc;

use tracing::instrument;

use crate::client::ReportsApi;
use crate::errors::ServiceError;
use crate::models::{AdminOverview, CashFlowDay, CashFlowReport, DashboardReport, ProfitReport};

pub struct ReportService {
    api: Arc<dyn ReportsApi>,
}

impl ReportService {
    pub fn new(api: Arc<dyn ReportsApi>) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardReport, ServiceError> {
        self.api.dashboard_report().await
    }

    #[instrument(skip(self))]
    pub async fn profit(&self) -> Result<ProfitReport, ServiceError> {
        self.api.profit_report().await
    }

    #[instrument(skip(self))]
    pub async fn cash_flow(&self) -> Result<CashFlowReport, ServiceError> {
        self.api.cash_flow_report().await
    }

    #[instrument(skip(self))]
    pub async fn admin_overview(&self) -> Result<AdminOverview, ServiceError> {
        self.api.admin_overview().await
    }
}

/// Today's net: inflows minus expenses. Kept out of the wire model because
/// the backend does not send it.
pub fn net_today_cents(overview: &AdminOverview) -> i64 {
    overview.today.inflow_cents - overview.today.expenses_cents
}

/// The strongest day in the period, for the cash-flow highlight card.
pub fn best_day(report: &CashFlowReport) -> Option<&CashFlowDay> {
    report.days.iter().max_by_key(|d| d.total_cents)
}
