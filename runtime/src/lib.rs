//! # Bookflow Runtime
//!
//! The Store runtime coordinates reducer execution and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: manages state and executes effects
//! - **Effect execution**: runs effect descriptions and feeds produced
//!   actions back into the reducer
//! - **Action broadcast**: lets call sites observe effect-produced actions
//!   (the request/response pattern used by [`Store::send_and_wait_for`])
//!
//! ## Example
//!
//! ```ignore
//! use bookflow_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! let handle = store.send(Action::DoSomething).await?;
//! handle.wait().await;
//!
//! let value = store.state(|s| s.some_field).await;
//! ```

use bookflow_core::effect::Effect;
use bookflow_core::reducer::Reducer;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

/// Error types for the Store runtime.
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations.
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for a matching action.
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// an action matching the predicate is observed.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed, typically during shutdown.
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Handle to the effects started by a single [`Store::send`].
///
/// `send` returns after *starting* effect execution, not after completion.
/// Await the handle when the caller needs the effects (and any feedback
/// actions they produce) to have fully settled.
#[derive(Debug)]
pub struct EffectHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl EffectHandle {
    /// Handle with nothing to wait for.
    #[must_use]
    pub const fn completed() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Wait for all effects (including feedback chains) to complete.
    pub async fn wait(self) {
        for task in self.tasks {
            // A panicked effect task is already logged by tokio; the store
            // itself keeps running.
            let _ = task.await;
        }
    }

    /// Wait for all effects with a timeout.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the effects are still running when
    /// the timeout expires.
    pub async fn wait_with_timeout(self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

/// The Store - runtime for a reducer-driven feature.
///
/// The Store manages:
/// 1. State (behind an `RwLock` for concurrent access)
/// 2. The reducer (business logic)
/// 3. The environment (injected dependencies)
/// 4. Effect execution, with feedback actions re-entering the reducer
///
/// # Type Parameters
///
/// - `S`: state type
/// - `A`: action type
/// - `E`: environment type
/// - `R`: reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: Arc<R>,
    environment: Arc<E>,
    shutdown: Arc<AtomicBool>,
    pending_effects: Arc<AtomicUsize>,
    /// Broadcast of actions produced by effects.
    ///
    /// Only effect feedback is broadcast, not the initially sent action;
    /// observers use it to learn the outcome of asynchronous work.
    action_broadcast: broadcast::Sender<A>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: Arc::clone(&self.reducer),
            environment: Arc::clone(&self.environment),
            shutdown: Arc::clone(&self.shutdown),
            pending_effects: Arc::clone(&self.pending_effects),
            action_broadcast: self.action_broadcast.clone(),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment.
    ///
    /// Action broadcast capacity defaults to 16; use
    /// [`Store::with_broadcast_capacity`] when many observers are expected.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
    }

    /// Create a new store with a custom action broadcast capacity.
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (action_broadcast, _) = broadcast::channel(capacity);

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer: Arc::new(reducer),
            environment: Arc::new(environment),
            shutdown: Arc::new(AtomicBool::new(false)),
            pending_effects: Arc::new(AtomicUsize::new(0)),
            action_broadcast,
        }
    }

    /// Send an action to the store.
    ///
    /// 1. Acquires the state write lock
    /// 2. Runs the reducer with (state, action, environment)
    /// 3. Spawns returned effects; feedback actions re-enter the reducer
    ///
    /// Multiple concurrent `send` calls serialize at the reducer; effects
    /// complete in nondeterministic order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting
    /// down.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        if self.shutdown.load(Ordering::Acquire) {
            return Err(StoreError::ShutdownInProgress);
        }

        let effects = {
            let mut state = self.state.write().await;
            self.reducer.reduce(&mut state, action, &self.environment)
        };

        let mut tasks = Vec::new();
        for effect in effects {
            if effect.is_none() {
                continue;
            }

            let store = self.clone();
            self.pending_effects.fetch_add(1, Ordering::AcqRel);
            tasks.push(tokio::spawn(async move {
                store.execute_effect(effect).await;
                store.pending_effects.fetch_sub(1, Ordering::AcqRel);
            }));
        }

        Ok(EffectHandle { tasks })
    }

    /// Send an action and wait for a matching result action.
    ///
    /// Designed for request/response call sites: subscribes to the action
    /// broadcast *before* sending (no race), sends the initial action, then
    /// returns the first effect-produced action matching the predicate.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: no matching action within the timeout
    /// - [`StoreError::ChannelClosed`]: broadcast closed during the wait
    /// - [`StoreError::ShutdownInProgress`]: store is shutting down
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        let mut receiver = self.action_broadcast.subscribe();
        let _handle = self.send(action).await?;

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return Err(StoreError::Timeout);
            }

            match tokio::time::timeout(remaining, receiver.recv()).await {
                Ok(Ok(observed)) => {
                    if predicate(&observed) {
                        return Ok(observed);
                    }
                },
                // Dropped actions under lag: keep waiting, the timeout is
                // the backstop.
                Ok(Err(broadcast::error::RecvError::Lagged(skipped))) => {
                    tracing::warn!(skipped, "action broadcast lagged");
                },
                Ok(Err(broadcast::error::RecvError::Closed)) => {
                    return Err(StoreError::ChannelClosed);
                },
                Err(_) => return Err(StoreError::Timeout),
            }
        }
    }

    /// Subscribe to actions produced by effects.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Read a projection of the current state.
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Number of effect tasks currently in flight.
    #[must_use]
    pub fn pending_effects(&self) -> usize {
        self.pending_effects.load(Ordering::Acquire)
    }

    /// Initiate graceful shutdown.
    ///
    /// Sets the shutdown flag (new `send`s are rejected) and waits for
    /// pending effects to complete.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// when the timeout expires.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("initiating graceful shutdown");
        self.shutdown.store(true, Ordering::Release);

        let start = tokio::time::Instant::now();
        let poll_interval = Duration::from_millis(50);

        loop {
            let pending = self.pending_effects.load(Ordering::Acquire);
            if pending == 0 {
                tracing::info!("all effects completed, shutdown successful");
                return Ok(());
            }

            if start.elapsed() >= timeout {
                tracing::error!(pending, "shutdown timeout with effects still running");
                return Err(StoreError::ShutdownTimeout(pending));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Execute one effect tree, awaiting feedback chains inline.
    fn execute_effect(&self, effect: Effect<A>) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let store = self.clone();
        Box::pin(async move {
            match effect {
                Effect::None => {},
                Effect::Parallel(effects) => {
                    let branches: Vec<_> = effects
                        .into_iter()
                        .map(|e| store.execute_effect(e))
                        .collect();
                    futures::future::join_all(branches).await;
                },
                Effect::Sequential(effects) => {
                    for e in effects {
                        store.execute_effect(e).await;
                    }
                },
                Effect::Delay { duration, action } => {
                    tokio::time::sleep(duration).await;
                    store.feed(*action).await;
                },
                Effect::Future(fut) => {
                    if let Some(action) = fut.await {
                        store.feed(action).await;
                    }
                },
            }
        })
    }

    /// Feed an effect-produced action back into the reducer.
    ///
    /// The action is broadcast to observers, reduced, and any resulting
    /// effects are executed within the current task so a feedback chain
    /// settles before its root [`EffectHandle`] resolves.
    async fn feed(&self, action: A) {
        // No receivers is fine; broadcast errors only mean nobody listens.
        let _ = self.action_broadcast.send(action.clone());

        let effects = {
            let mut state = self.state.write().await;
            self.reducer.reduce(&mut state, action, &self.environment)
        };

        for effect in effects {
            if !effect.is_none() {
                self.execute_effect(effect).await;
            }
        }
    }
}
