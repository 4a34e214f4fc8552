//! Check trait and type erasure.
//!
//! # How async checks are stored
//!
//! The responder holds one check routine behind a stable type, but user checks
//! are all *different* concrete types (each `async fn` has its own future
//! type). We use a **trait object** (`dyn ErasedCheck`) to hide the concrete
//! type behind a common interface:
//!
//! ```text
//! async fn db_ping() -> Outcome { … }        ← user writes this
//!        ↓ responder.with_check(db_ping)
//! db_ping.into_boxed_check()                 ← Check blanket impl
//!        ↓
//! Arc::new(FnCheck(db_ping))                 ← heap-allocated wrapper
//!        ↓  stored as BoxedCheck = Arc<dyn ErasedCheck>
//! check.run()  at request time               ← one vtable dispatch
//! ```
//!
//! The only runtime cost per request is one Arc clone plus one virtual call.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::outcome::Outcome;

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future resolving to an [`Outcome`].
///
/// `Send + 'static` let tokio move the future across threads safely.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Outcome> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Check` trait's `into_boxed_check` method.
/// External crates cannot usefully interact with this trait.
#[doc(hidden)]
pub trait ErasedCheck {
    fn run(&self) -> BoxFuture;
}

/// A heap-allocated, type-erased check shared across concurrent requests.
#[doc(hidden)]
pub type BoxedCheck = Arc<dyn ErasedCheck + Send + Sync + 'static>;

// ── Public Check trait ────────────────────────────────────────────────────────

/// Implemented for every valid check routine.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` or closure with the signature:
///
/// ```text
/// async fn name() -> Outcome
/// ```
///
/// The trait is **sealed** (via the private `Sealed` supertrait): only the
/// blanket impl below can satisfy it, which keeps the API surface stable
/// across versions.
pub trait Check: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_check(self) -> BoxedCheck;
}

/// The sealing module. Because `Sealed` is private, external crates cannot
/// name it and therefore cannot implement `Check` on their own types.
mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut> private::Sealed for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Outcome> + Send + 'static,
{
}

impl<F, Fut> Check for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    fn into_boxed_check(self) -> BoxedCheck {
        Arc::new(FnCheck(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype wrapper that holds a concrete check `F` and implements
/// [`ErasedCheck`], bridging the typed world to the trait-object world.
struct FnCheck<F>(F);

impl<F, Fut> ErasedCheck for FnCheck<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    fn run(&self) -> BoxFuture {
        Box::pin((self.0)())
    }
}

// ── Default check ─────────────────────────────────────────────────────────────

/// The check used when none is configured: an immediate unconditional pass.
/// If the process can run this future at all, it is alive.
pub(crate) fn always_pass() -> BoxedCheck {
    (|| async { Outcome::pass() }).into_boxed_check()
}
