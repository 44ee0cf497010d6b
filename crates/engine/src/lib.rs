//! Notification fan-out engine.
//!
//! Given a task document change, the engine:
//! 1. Resolves the recipient set (via `RecipientResolver`)
//! 2. Pools the recipients' delivery endpoints
//! 3. Composes a push notification (via `composer`)
//! 4. Dispatches one multicast (via `MulticastDispatcher`)
//! 5. Prunes permanently dead endpoints (via `FailureReconciler`)
//!
//! External services — group directory, profile store, endpoint store, push
//! transport — are reached through the traits in [`collaborators`], so the
//! whole pipeline runs against in-memory substitutes in tests.

pub mod collaborators;
pub mod composer;
pub mod dispatcher;
pub mod handlers;
pub mod memory;
pub mod reconciler;
pub mod resolver;
