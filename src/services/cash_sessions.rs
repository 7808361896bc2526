//! Cash session manager.
//!
//! Client-side source of truth for "is a register open, and what is its
//! id/balance". The backend owns the ledger; this service owns a cache of the
//! last fetched session plus the discipline around it:
//!
//! - every mutation re-fetches instead of patching the cache locally,
//! - fetch failures are treated as "no open session" (fail closed: a network
//!   blip blocks selling instead of allowing unguarded sales),
//! - at most one mutating call is in flight at a time.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::client::CashRegisterApi;
use crate::errors::ServiceError;
use crate::models::{CashSession, ClosingSummary, MovementKind, NewCashMovement};

const MIN_DESCRIPTION_LEN: usize = 3;

pub struct CashSessionService {
    api: Arc<dyn CashRegisterApi>,
    current: RwLock<Option<CashSession>>,
    /// Held for the duration of open/movement/close. `try_lock` failure is
    /// the programmatic equivalent of a disabled button.
    mutation_gate: Mutex<()>,
}

impl CashSessionService {
    pub fn new(api: Arc<dyn CashRegisterApi>) -> Self {
        Self {
            api,
            current: RwLock::new(None),
            mutation_gate: Mutex::new(()),
        }
    }

    /// Queries the backend for the open session and replaces the cache.
    ///
    /// Any error, a closed session or an absent one all land on `None`;
    /// selling stays blocked until a fetch confirms an open register.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Option<CashSession> {
        let fetched = match self.api.fetch_open_session().await {
            Ok(session) => session.filter(CashSession::is_open),
            Err(err) => {
                warn!(error = %err, "open-session check failed; treating as no open session");
                None
            }
        };
        let mut current = self.current.write().await;
        *current = fetched.clone();
        fetched
    }

    /// Cached view. Callers gating UI actions use this; anything that needs
    /// a live balance calls [`refresh`](Self::refresh) first.
    pub async fn current(&self) -> Option<CashSession> {
        self.current.read().await.clone()
    }

    pub async fn open_session_id(&self) -> Option<Uuid> {
        self.current.read().await.as_ref().map(|s| s.id)
    }

    pub async fn is_open(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Opens a session with the given drawer fund.
    ///
    /// The returned session comes from the post-mutation re-fetch, never from
    /// a locally constructed object: the backend is authoritative for the id
    /// and the running balance.
    #[instrument(skip(self))]
    pub async fn open(&self, opening_balance_cents: i64) -> Result<CashSession, ServiceError> {
        if opening_balance_cents < 0 {
            return Err(ServiceError::validation(
                "Informe um valor inicial válido.",
            ));
        }

        let _gate = self
            .mutation_gate
            .try_lock()
            .map_err(|_| ServiceError::OperationInFlight)?;

        self.api.open_session(opening_balance_cents).await?;
        info!(opening_balance_cents, "cash session opened");

        match self.refresh().await {
            Some(session) => Ok(session),
            None => Err(ServiceError::UnexpectedResponse(
                "caixa aberto, mas não visível na releitura".to_string(),
            )),
        }
    }

    /// Posts a reinforcement or withdrawal against the open session.
    ///
    /// All pre-checks fail before any network call: non-positive amounts,
    /// descriptions shorter than 3 characters after trimming, and the absence
    /// of an open session id in the cache.
    #[instrument(skip(self, description))]
    pub async fn post_movement(
        &self,
        kind: MovementKind,
        amount_cents: i64,
        description: &str,
    ) -> Result<(), ServiceError> {
        if amount_cents <= 0 {
            return Err(ServiceError::validation(
                "Insira um valor válido maior que zero.",
            ));
        }
        let description = description.trim();
        if description.chars().count() < MIN_DESCRIPTION_LEN {
            return Err(ServiceError::validation(
                "A descrição deve ter pelo menos 3 caracteres.",
            ));
        }
        let session_id = self
            .open_session_id()
            .await
            .ok_or(ServiceError::NoOpenSession)?;

        let _gate = self
            .mutation_gate
            .try_lock()
            .map_err(|_| ServiceError::OperationInFlight)?;

        let movement = NewCashMovement {
            session_id,
            kind,
            amount_cents,
            description: description.to_string(),
        };
        self.api.post_movement(&movement).await?;
        info!(?kind, amount_cents, "cash movement posted");

        // Displayed balance must reflect the movement.
        self.refresh().await;
        Ok(())
    }

    /// Closes the open session and returns the settlement summary.
    ///
    /// Terminal: the cache is cleared and re-fetched, so the selling flow is
    /// blocked again immediately. A double invocation either hits the gate
    /// (`OperationInFlight`) or finds no session left; a race that reaches
    /// the backend twice is resolved there and surfaced verbatim.
    #[instrument(skip(self))]
    pub async fn close(&self) -> Result<ClosingSummary, ServiceError> {
        let session_id = self
            .open_session_id()
            .await
            .ok_or(ServiceError::NoOpenSession)?;

        let _gate = self
            .mutation_gate
            .try_lock()
            .map_err(|_| ServiceError::OperationInFlight)?;

        let summary = self.api.close_session(session_id).await?;
        info!(%session_id, "cash session closed");

        {
            let mut current = self.current.write().await;
            *current = None;
        }
        // Confirm with the backend; on failure the cache already fails closed.
        self.refresh().await;
        Ok(summary)
    }
}
