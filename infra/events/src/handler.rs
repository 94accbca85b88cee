use crate::name::EventName;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

type Callback<P> = dyn Fn(&EventName, Option<&P>) + Send + Sync;

/// Distinguishes plain handlers from wildcard observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// Receives only the event parameter.
    Handler,
    /// Receives the emitted event name and the parameter.
    Wildcard,
}

struct HandlerInner<P> {
    kind: HandlerKind,
    call: Box<Callback<P>>,
}

/// A cloneable handle to an event callback.
///
/// Handles compare by identity: clones of one handle are equal, while two
/// handles built from identical closures are not. Keep a clone of the handle
/// passed to [`EventBus::on`](crate::EventBus::on) to remove it later with
/// [`EventBus::off`](crate::EventBus::off).
///
/// # Examples
/// ```rust
/// use tinybus_event_bus::{EventBus, Handler};
///
/// let bus = EventBus::<u32>::new();
/// let handler = Handler::new(|value: Option<&u32>| assert_eq!(value, Some(&7)));
///
/// bus.on("tick", handler.clone());
/// bus.emit("tick", Some(&7));
/// bus.off("tick", &handler);
/// assert!(bus.handlers("tick").is_empty());
/// ```
pub struct Handler<P> {
    inner: Arc<HandlerInner<P>>,
}

impl<P: 'static> Handler<P> {
    /// Wraps a callback that receives the event parameter.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&P>) + Send + Sync + 'static,
    {
        Self::from_parts(
            HandlerKind::Handler,
            Box::new(move |_: &EventName, params: Option<&P>| f(params)),
        )
    }

    /// Wraps a callback that receives the event name as well as the parameter.
    ///
    /// Register it under [`EventName::WILDCARD`] to observe every emission.
    pub fn wildcard<F>(f: F) -> Self
    where
        F: Fn(&EventName, Option<&P>) + Send + Sync + 'static,
    {
        Self::from_parts(HandlerKind::Wildcard, Box::new(f))
    }

    fn from_parts(kind: HandlerKind, call: Box<Callback<P>>) -> Self {
        Self { inner: Arc::new(HandlerInner { kind, call }) }
    }

    /// Builds a handler of the same kind that, on its first invocation, hands
    /// itself to `remove` and then runs `self`. Later invocations do nothing.
    pub(crate) fn self_removing<R>(&self, remove: R) -> Self
    where
        R: Fn(&Self) + Send + Sync + 'static,
    {
        let original = self.clone();
        let kind = original.kind();
        let fired = AtomicBool::new(false);

        let inner = Arc::new_cyclic(|me: &Weak<HandlerInner<P>>| {
            let me = me.clone();
            let call: Box<Callback<P>> = Box::new(move |name: &EventName, params: Option<&P>| {
                if fired.swap(true, Ordering::AcqRel) {
                    return;
                }
                if let Some(inner) = me.upgrade() {
                    remove(&Self { inner });
                }
                original.call(name, params);
            });
            HandlerInner { kind, call }
        });

        Self { inner }
    }
}

impl<P> Handler<P> {
    #[must_use]
    pub fn kind(&self) -> HandlerKind {
        self.inner.kind
    }

    /// Invokes the callback. Plain handlers ignore `name`.
    pub fn call(&self, name: &EventName, params: Option<&P>) {
        (self.inner.call)(name, params);
    }
}

impl<P> Clone for Handler<P> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<P> PartialEq for Handler<P> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<P> Eq for Handler<P> {}

impl<P> fmt::Debug for Handler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("kind", &self.inner.kind)
            .field("ptr", &Arc::as_ptr(&self.inner))
            .finish()
    }
}
