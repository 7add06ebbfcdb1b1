use crate::DemoError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// State of one demo action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionState<T> {
    Idle,
    InFlight,
    Success(T),
    Error(String),
}

impl<T> ActionState<T> {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, ActionState::InFlight)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ActionState::Success(_) | ActionState::Error(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            ActionState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ActionState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Shared, clonable holder of one action's state
///
/// Clones observe the same state, so a view can read what a running task
/// writes.
#[derive(Debug, Clone)]
pub struct ActionSlot<T> {
    name: &'static str,
    state: Arc<RwLock<ActionState<T>>>,
}

impl<T: Clone + Send + Sync> ActionSlot<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Arc::new(RwLock::new(ActionState::Idle)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current state (cloned)
    pub async fn snapshot(&self) -> ActionState<T> {
        self.state.read().await.clone()
    }

    /// Run `action` through this slot
    ///
    /// While a previous run is still in flight the new trigger is ignored:
    /// `action` is dropped without being polled and the in-flight state is
    /// returned. Otherwise the slot goes in-flight, awaits `action` and
    /// stores its terminal state, which is also returned. Failures end here
    /// as `ActionState::Error` and are never propagated further.
    pub async fn run<F>(&self, action: F) -> ActionState<T>
    where
        F: Future<Output = Result<T, DemoError>>,
    {
        {
            let mut state = self.state.write().await;
            if state.is_in_flight() {
                debug!("{} already in flight, ignoring trigger", self.name);
                return ActionState::InFlight;
            }
            *state = ActionState::InFlight;
        }
        debug!("{} in flight", self.name);

        let next = match action.await {
            Ok(value) => ActionState::Success(value),
            Err(err) => {
                warn!("{} failed: {}", self.name, err);
                ActionState::Error(err.user_message())
            }
        };

        *self.state.write().await = next.clone();
        next
    }
}
