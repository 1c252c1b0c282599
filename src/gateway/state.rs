use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::{SessionStore, UserDirectory};
use crate::contact::{InquiryLedger, RelayClient};
use crate::oracle::Oracle;
use crate::pipeline::Orchestrator;
use crate::store::TrialStore;

/// Shared state injected into every handler.
pub struct HandlerState<O: Oracle + 'static> {
    pub orchestrator: Orchestrator<O>,

    pub store: Arc<TrialStore>,

    pub users: Arc<UserDirectory>,

    pub session: Arc<SessionStore>,

    pub ledger: Arc<InquiryLedger>,

    /// `None` disables the relay; inquiries then only hit the local ledger.
    pub relay: Option<RelayClient>,

    pub storage_path: PathBuf,
}

impl<O: Oracle> Clone for HandlerState<O> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: self.orchestrator.clone(),
            store: Arc::clone(&self.store),
            users: Arc::clone(&self.users),
            session: Arc::clone(&self.session),
            ledger: Arc::clone(&self.ledger),
            relay: self.relay.clone(),
            storage_path: self.storage_path.clone(),
        }
    }
}

impl<O: Oracle> HandlerState<O> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        oracle: Arc<O>,
        store: Arc<TrialStore>,
        users: Arc<UserDirectory>,
        session: Arc<SessionStore>,
        ledger: Arc<InquiryLedger>,
        relay: Option<RelayClient>,
        storage_path: PathBuf,
    ) -> Self {
        Self {
            orchestrator: Orchestrator::new(oracle, Arc::clone(&store)),
            store,
            users,
            session,
            ledger,
            relay,
            storage_path,
        }
    }
}
