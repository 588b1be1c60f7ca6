use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::pricing::PriceBreakdown;
use super::wizard::{BookingWizard, WizardError, WizardExit};
use crate::store::BookingStore;

/// How long an untouched wizard survives before it is dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Debug)]
struct Session {
    wizard: BookingWizard,
    touched_at: Instant,
}

impl Session {
    /// A wizard with a submission in flight never expires.
    fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        !self.wizard.is_submitting() && now.saturating_duration_since(self.touched_at) >= timeout
    }
}

/// Open wizards keyed by session id. The lock is only ever held for a
/// synchronous transition, never across a store call. Sessions left idle
/// past the timeout are evicted and behave as closed.
#[derive(Debug)]
pub struct WizardSessions {
    sessions: Mutex<HashMap<Uuid, Session>>,
    idle_timeout: Duration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub id: Uuid,
    #[serde(flatten)]
    pub wizard: BookingWizard,
    pub price: Option<PriceBreakdown>,
}

impl WizardView {
    fn new(id: Uuid, wizard: &BookingWizard) -> Self {
        Self {
            id,
            price: wizard.quote().ok(),
            wizard: wizard.clone(),
        }
    }
}

impl Default for WizardSessions {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl WizardSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub async fn insert(&self, wizard: BookingWizard) -> WizardView {
        let id = Uuid::new_v4();
        let view = WizardView::new(id, &wizard);
        let now = Instant::now();

        let mut sessions = self.sessions.lock().await;
        evict(&mut sessions, now, self.idle_timeout);
        sessions.insert(
            id,
            Session {
                wizard,
                touched_at: now,
            },
        );
        view
    }

    pub async fn view(&self, id: Uuid) -> Result<WizardView, WizardError> {
        self.update(id, |_| Ok(())).await
    }

    /// Runs one transition against the session and returns its new view.
    pub async fn update<F>(&self, id: Uuid, transition: F) -> Result<WizardView, WizardError>
    where
        F: FnOnce(&mut BookingWizard) -> Result<(), WizardError>,
    {
        let mut sessions = self.sessions.lock().await;
        let wizard = self.live(&mut sessions, id)?;
        transition(wizard)?;
        Ok(WizardView::new(id, wizard))
    }

    pub async fn submit(&self, id: Uuid, store: &dyn BookingStore) -> Result<WizardView, WizardError> {
        let draft = {
            let mut sessions = self.sessions.lock().await;
            self.live(&mut sessions, id)?.begin_submit()?
        };

        let hotel_id = draft.hotel.id;
        let outcome = store.create(draft).await;
        match &outcome {
            Ok(confirmation) => log::info!(
                "Booking {} confirmed for hotel {hotel_id}",
                confirmation.confirmation_number
            ),
            Err(e) => log::error!("Booking error for hotel {hotel_id}: {e}"),
        }

        let mut sessions = self.sessions.lock().await;
        let Ok(wizard) = self.live(&mut sessions, id) else {
            if let Ok(confirmation) = &outcome {
                log::warn!(
                    "Wizard {id} closed before booking {} was confirmed, discarding result",
                    confirmation.confirmation_number
                );
            }
            return Err(WizardError::Closed);
        };
        wizard.finish_submit(outcome)?;
        Ok(WizardView::new(id, wizard))
    }

    pub async fn close(&self, id: Uuid) -> Result<WizardExit, WizardError> {
        let session = self
            .sessions
            .lock()
            .await
            .remove(&id)
            .ok_or(WizardError::Closed)?;
        if session.is_idle(Instant::now(), self.idle_timeout) {
            return Err(WizardError::Closed);
        }
        Ok(session.wizard.close())
    }

    /// Drops every session untouched for longer than the idle timeout as of
    /// `now`. Returns how many were dropped.
    pub async fn evict_idle_at(&self, now: Instant) -> usize {
        evict(&mut *self.sessions.lock().await, now, self.idle_timeout)
    }

    pub async fn evict_idle(&self) -> usize {
        self.evict_idle_at(Instant::now()).await
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    fn live<'a>(
        &self,
        sessions: &'a mut HashMap<Uuid, Session>,
        id: Uuid,
    ) -> Result<&'a mut BookingWizard, WizardError> {
        let now = Instant::now();
        let expired = sessions
            .get(&id)
            .ok_or(WizardError::Closed)?
            .is_idle(now, self.idle_timeout);
        if expired {
            sessions.remove(&id);
            log::info!("Wizard {id} expired after {:?} idle", self.idle_timeout);
            return Err(WizardError::Closed);
        }

        let session = sessions.get_mut(&id).ok_or(WizardError::Closed)?;
        session.touched_at = now;
        Ok(&mut session.wizard)
    }
}

fn evict(sessions: &mut HashMap<Uuid, Session>, now: Instant, timeout: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, session| !session.is_idle(now, timeout));
    let evicted = before - sessions.len();
    if evicted > 0 {
        log::info!("Evicted {evicted} idle wizard sessions");
    }
    evicted
}
