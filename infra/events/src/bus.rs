use crate::error::EventBusError;
use crate::handler::{Handler, HandlerKind};
use crate::name::EventName;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Ordered handler lists keyed by event name.
pub type HandlerMap<P> = FxHashMap<EventName, Vec<Handler<P>>>;

/// A [`HandlerMap`] that can be shared between buses and callers.
pub type SharedHandlerMap<P> = Arc<RwLock<HandlerMap<P>>>;

/// A synchronous, re-entrant publish/subscribe bus.
///
/// Handlers run inline on the emitting thread, in registration order. The
/// registry lock is only held to mutate or snapshot a handler list, never
/// while a handler runs, so handlers may freely call back into the bus.
///
/// Cloning the bus is cheap and shares the registry.
pub struct EventBus<P> {
    all: SharedHandlerMap<P>,
}

impl<P: 'static> EventBus<P> {
    /// Creates a bus with an empty registry of its own.
    #[must_use]
    pub fn new() -> Self {
        Self::with_map(Arc::default())
    }

    /// Creates a bus over an existing registry.
    ///
    /// Buses built over the same map observe each other's registrations.
    ///
    /// # Examples
    /// ```rust
    /// use tinybus_event_bus::{EventBus, Handler, SharedHandlerMap};
    ///
    /// let map = SharedHandlerMap::<()>::default();
    /// let producer = EventBus::with_map(map.clone());
    /// let consumer = EventBus::with_map(map);
    ///
    /// consumer.on("ready", Handler::new(|_| {}));
    /// assert_eq!(producer.emit("ready", None), 1);
    /// ```
    #[must_use]
    pub const fn with_map(all: SharedHandlerMap<P>) -> Self {
        Self { all }
    }

    /// The underlying registry. Callers may read or mutate it directly.
    #[must_use]
    pub const fn all(&self) -> &SharedHandlerMap<P> {
        &self.all
    }

    /// Appends `handler` to the list registered for `name`.
    ///
    /// Handlers under [`EventName::WILDCARD`] should be built with
    /// [`Handler::wildcard`]. A plain [`Handler::new`] is still accepted there,
    /// but it never sees the emitted event name, so a warning is logged.
    pub fn on(&self, name: impl Into<EventName>, handler: Handler<P>) {
        let name = name.into();
        if name.is_wildcard() && handler.kind() == HandlerKind::Handler {
            warn!(
                event = %name,
                "Plain handler registered on the wildcard channel; event names will not be passed"
            );
        }
        debug!(event = %name, kind = ?handler.kind(), "Registering handler");
        self.all.write().entry(name).or_default().push(handler);
    }

    /// Registers `handler` so that it runs for at most one emission of `name`.
    ///
    /// A wrapper is registered in its place; it removes itself from `name`
    /// before delegating, so the original handle cannot be used with
    /// [`EventBus::off`].
    ///
    /// # Examples
    /// ```rust
    /// use tinybus_event_bus::{EventBus, Handler};
    ///
    /// let bus = EventBus::<&str>::new();
    /// bus.once("ready", Handler::new(|_| {}));
    ///
    /// assert_eq!(bus.emit("ready", Some(&"first")), 1);
    /// assert_eq!(bus.emit("ready", Some(&"second")), 0);
    /// ```
    pub fn once(&self, name: impl Into<EventName>, handler: Handler<P>) {
        let name = name.into();
        let registry = Arc::downgrade(&self.all);
        let key = name.clone();

        let wrapper = handler.self_removing(move |me| {
            if let Some(all) = registry.upgrade() {
                remove_handler(&all, &key, me);
            }
        });

        self.on(name, wrapper);
    }

    /// Removes the first occurrence of `handler` from the list for `name`.
    ///
    /// Unknown names and handlers are ignored. The list itself is kept even
    /// when it becomes empty.
    pub fn off(&self, name: impl Into<EventName>, handler: &Handler<P>) {
        remove_handler(&self.all, &name.into(), handler);
    }

    /// Invokes the handlers registered for `name` with `params`, then the
    /// wildcard handlers with `name` and `params`.
    ///
    /// Each list is snapshotted right before its pass, so registrations made
    /// by a running handler only take effect from the next pass. Emitting
    /// [`EventName::WILDCARD`] itself runs the wildcard list twice: once as
    /// the named pass and once as the wildcard pass. Both passes hand
    /// wildcard handlers `"*"` as the event name.
    ///
    /// A panicking handler unwinds through this call and the remaining
    /// handlers are skipped; see [`EventBus::try_emit`].
    ///
    /// Returns the number of handler invocations.
    pub fn emit(&self, name: impl Into<EventName>, params: Option<&P>) -> usize {
        let name = name.into();

        let handlers = self.handlers(&name);
        trace!(event = %name, handlers = handlers.len(), "Dispatching event");
        for handler in &handlers {
            handler.call(&name, params);
        }

        let wildcards = self.handlers(EventName::WILDCARD);
        if !wildcards.is_empty() {
            trace!(event = %name, wildcards = wildcards.len(), "Dispatching to wildcard handlers");
        }
        for handler in &wildcards {
            handler.call(&name, params);
        }

        handlers.len() + wildcards.len()
    }

    /// Like [`EventBus::emit`], but reports a panicking handler as an error.
    ///
    /// # Errors
    /// Returns [`EventBusError::HandlerPanicked`] with the panic message and the
    /// event name as context. Handlers after the failing one were not invoked.
    ///
    /// # Examples
    /// ```rust
    /// use tinybus_event_bus::{EventBus, EventBusError, Handler};
    ///
    /// let bus = EventBus::<()>::new();
    /// bus.on("job", Handler::new(|_| panic!("disk full")));
    ///
    /// let err = bus.try_emit("job", None).unwrap_err();
    /// assert!(matches!(err, EventBusError::HandlerPanicked { .. }));
    /// ```
    pub fn try_emit(
        &self,
        name: impl Into<EventName>,
        params: Option<&P>,
    ) -> Result<usize, EventBusError> {
        let name = name.into();
        panic::catch_unwind(AssertUnwindSafe(|| self.emit(&name, params))).map_err(|payload| {
            let message = panic_message(payload.as_ref());
            warn!(event = %name, %message, "Event handler panicked");
            EventBusError::HandlerPanicked { message, context: Some(name.to_string().into()) }
        })
    }

    /// A snapshot of the handlers currently registered for `name`.
    #[must_use]
    pub fn handlers(&self, name: impl Into<EventName>) -> Vec<Handler<P>> {
        self.all.read().get(&name.into()).cloned().unwrap_or_default()
    }
}

fn remove_handler<P>(all: &RwLock<HandlerMap<P>>, name: &EventName, handler: &Handler<P>) {
    let mut all = all.write();
    let Some(handlers) = all.get_mut(name) else {
        trace!(event = %name, "No handlers registered; nothing to remove");
        return;
    };

    if let Some(index) = handlers.iter().position(|h| h == handler) {
        handlers.remove(index);
        debug!(event = %name, remaining = handlers.len(), "Handler removed");
    } else {
        trace!(event = %name, "Handler not registered; nothing to remove");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> Cow<'static, str> {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        Cow::Borrowed(*message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        Cow::Owned(message.clone())
    } else {
        Cow::Borrowed("non-string panic payload")
    }
}

impl<P: 'static> Default for EventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for EventBus<P> {
    fn clone(&self) -> Self {
        Self { all: Arc::clone(&self.all) }
    }
}

impl<P> fmt::Debug for EventBus<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus").field("all", &self.all).finish()
    }
}
