//! # Bookflow Core
//!
//! Core traits and types for the bookflow architecture.
//!
//! This crate provides the fundamental abstractions used by every feature
//! crate in the workspace:
//!
//! - **State**: owned, `Clone`-able domain state for a feature
//! - **Action**: all possible inputs to a reducer (user commands and the
//!   feedback produced by completed effects)
//! - **Reducer**: pure function `(State, Action, Environment) → Effects`
//! - **Effect**: side effect *descriptions* (not execution)
//! - **Environment**: injected dependencies behind traits
//!
//! Reducers never perform I/O. They validate an action, update state in
//! place, and return effect descriptions; the runtime executes those effects
//! and feeds any resulting actions back into the reducer.

// Re-export commonly used types so feature crates pull them from one place.
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - the core trait for business logic.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The number of effects a reducer can return without heap allocation.
    ///
    /// Most reducer arms return zero or one effect; four covers every arm in
    /// the workspace today.
    pub const EFFECTS_INLINE: usize = 4;

    /// Effect vector returned by reducers.
    pub type Effects<A> = SmallVec<[Effect<A>; EFFECTS_INLINE]>;

    /// The Reducer trait - core abstraction for business logic.
    ///
    /// A reducer is a pure function over its state: given an action and the
    /// injected environment, it updates state in place and returns the side
    /// effects to run. Determinism is the point - every state transition is
    /// reproducible in tests with a mock environment.
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for WizardReducer {
    ///     type State = WizardState;
    ///     type Action = WizardAction;
    ///     type Environment = WizardEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut WizardState,
    ///         action: WizardAction,
    ///         env: &WizardEnvironment,
    ///     ) -> Effects<WizardAction> {
    ///         match action {
    ///             WizardAction::SelectService { id } => {
    ///                 // validate, mutate state, describe effects
    ///                 smallvec![Effect::None]
    ///             }
    ///             _ => smallvec![Effect::None],
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on.
        type State;

        /// The action type this reducer processes.
        type Action;

        /// The environment type with injected dependencies.
        type Environment;

        /// Reduce an action into state changes and effect descriptions.
        ///
        /// The runtime calls this while holding the state write lock, so the
        /// body must not block or await; anything asynchronous belongs in a
        /// returned [`Effect`].
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Effects<Self::Action>;
    }
}

/// Effect module - side effect descriptions.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Boxed future producing an optional feedback action.
    pub type EffectFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

    /// Describes a side effect to be executed by the runtime.
    ///
    /// Effects are values, not executions. A reducer returns them; the Store
    /// spawns them. If an effect's future resolves to `Some(action)`, that
    /// action is fed back into the reducer (the feedback loop).
    pub enum Effect<Action> {
        /// No-op effect.
        None,

        /// Run the contained effects concurrently.
        Parallel(Vec<Effect<Action>>),

        /// Run the contained effects one after another.
        Sequential(Vec<Effect<Action>>),

        /// Dispatch an action after a delay.
        Delay {
            /// How long to wait.
            duration: Duration,
            /// Action to dispatch after the delay.
            action: Box<Action>,
        },

        /// Arbitrary async computation, optionally feeding an action back.
        Future(EffectFuture<Action>),
    }

    impl<Action> Effect<Action> {
        /// Wrap an async block as an effect.
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Self::Future(Box::pin(fut))
        }

        /// Combine effects to run concurrently.
        #[must_use]
        pub fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially.
        #[must_use]
        pub fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns `true` for [`Effect::None`] (including empty groups).
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(inner) | Effect::Sequential(inner) => {
                    inner.iter().all(Effect::is_none)
                },
                Effect::Delay { .. } | Effect::Future(_) => false,
            }
        }
    }

    // Manual Debug since Future does not implement Debug.
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }
}

/// Environment module - dependency injection traits.
///
/// All external dependencies sit behind traits and are injected via the
/// Environment parameter, so every reducer is testable with mocks.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Abstracts time for testability.
    ///
    /// Production uses [`SystemClock`]; tests pin a fixed instant so
    /// date-boundary behavior is deterministic.
    pub trait Clock: Send + Sync {
        /// Current instant in UTC.
        fn now(&self) -> DateTime<Utc>;
    }

    /// Clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
        fn now(&self) -> DateTime<Utc> {
            (**self).now()
        }
    }
}
