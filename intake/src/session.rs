//! Authentication gate: credential verification and session token lifecycle.
//!
//! The gate has two states, unauthenticated and authenticated. Only a
//! successful verification moves it to authenticated; any failure moves it
//! back. Verifications may overlap: each one takes a ticket when it starts and
//! only the most recently started one is allowed to settle the session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::io::token_store::TokenStore;
use crate::io::verifier::Verifier;

/// Snapshot of the authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Token of the last successful verification. Never serialized.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub authenticated: bool,
    /// Partner names known to the backend for this identity.
    pub known_names: Vec<String>,
}

/// What a settled verification does to the persisted token.
enum Persist {
    Save,
    Clear,
    Keep,
}

/// Owns the session and gates access to the wizard.
pub struct SessionGate {
    verifier: Box<dyn Verifier>,
    store: Box<dyn TokenStore>,
    session: Mutex<Session>,
    latest_ticket: AtomicU64,
}

impl SessionGate {
    pub fn new(verifier: impl Verifier + 'static, store: impl TokenStore + 'static) -> Self {
        Self {
            verifier: Box::new(verifier),
            store: Box::new(store),
            session: Mutex::new(Session::default()),
            latest_ticket: AtomicU64::new(0),
        }
    }

    /// Verify the persisted token, if there is one.
    ///
    /// Without a persisted token this makes no verifier call and leaves the
    /// session unauthenticated. An unreadable store counts as "no token".
    pub async fn restore_session(&self) -> Session {
        let stored = match self.store.load() {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "cannot read persisted token");
                None
            }
        };
        match stored.filter(|token| !token.is_empty()) {
            Some(token) => {
                debug!("restoring persisted session");
                self.verify(&token).await
            }
            None => {
                debug!("no persisted token to restore");
                self.snapshot()
            }
        }
    }

    /// Entry point for the identity provider's login callback.
    ///
    /// Absent or empty credentials are ignored.
    pub async fn login_with_credential(&self, credential: Option<&str>) -> Session {
        match credential.filter(|credential| !credential.is_empty()) {
            Some(credential) => self.verify(credential).await,
            None => {
                debug!("login callback without credential ignored");
                self.snapshot()
            }
        }
    }

    /// Verify `token` against the backend and settle the session.
    ///
    /// Success authenticates, records the name list and persists the token.
    /// Failure is logged and leaves the session unauthenticated; a rejection
    /// by the backend also clears the persisted token, a transport or parse
    /// failure keeps it for the next start. A result from a verification that
    /// was overtaken by a newer one is discarded.
    #[instrument(skip_all)]
    pub async fn verify(&self, token: &str) -> Session {
        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(ticket, "verification started");
        let outcome = self.verifier.verify(token).await;

        let (settled, persist) = {
            let mut session = self.lock();
            if self.latest_ticket.load(Ordering::SeqCst) != ticket {
                debug!(ticket, "verification overtaken, result discarded");
                return session.clone();
            }
            let persist = match outcome {
                Ok(names) => {
                    info!(names = names.len(), "session authenticated");
                    *session = Session {
                        token: Some(token.to_string()),
                        authenticated: true,
                        known_names: names,
                    };
                    Persist::Save
                }
                Err(err) => {
                    warn!(error = %err, "verification failed");
                    *session = Session::default();
                    if err.is_rejection() {
                        Persist::Clear
                    } else {
                        Persist::Keep
                    }
                }
            };
            (session.clone(), persist)
        };

        // Token store I/O happens outside the session lock.
        match persist {
            Persist::Save => {
                if let Err(err) = self.store.save(token) {
                    warn!(error = %format!("{err:#}"), "cannot persist session token");
                }
            }
            Persist::Clear => {
                if let Err(err) = self.store.clear() {
                    warn!(error = %format!("{err:#}"), "cannot clear rejected token");
                }
            }
            Persist::Keep => {}
        }
        settled
    }

    /// Forget the session and the persisted token.
    ///
    /// Verifications still in flight are overtaken and will not settle.
    pub fn logout(&self) -> Result<Session> {
        self.latest_ticket.fetch_add(1, Ordering::SeqCst);
        *self.lock() = Session::default();
        self.store.clear()?;
        info!("session logged out");
        Ok(Session::default())
    }

    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().authenticated
    }

    pub fn known_names(&self) -> Vec<String> {
        self.lock().known_names.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
