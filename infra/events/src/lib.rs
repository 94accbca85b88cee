//! # Event Bus
//!
//! A tiny, synchronous publish/subscribe bus.
//!
//! ## Overview
//!
//! An [`EventBus`] maps event names to ordered lists of [`Handler`]s. Handlers
//! are registered with [`EventBus::on`] or [`EventBus::once`], removed with
//! [`EventBus::off`] and invoked inline by [`EventBus::emit`].
//!
//! ## Features
//!
//! * **Text or symbol keys**: events are named by strings or by unique
//!   [`Symbol`] tokens.
//! * **Wildcard channel**: handlers registered under `"*"` observe every
//!   emission together with the event name.
//! * **Re-entrant**: each pass runs over a snapshot, so handlers may register,
//!   remove or emit without affecting the pass in progress.
//! * **Shareable registry**: several buses can be built over one
//!   [`SharedHandlerMap`].
//!
//! # Example
//!
//! ```rust
//! use tinybus_event_bus::{EventBus, EventName, Handler};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! #[derive(Debug, PartialEq)]
//! struct UserCreated { id: u64 }
//!
//! let bus = EventBus::<UserCreated>::new();
//! let seen = Arc::new(AtomicUsize::new(0));
//!
//! let counter = Arc::clone(&seen);
//! bus.on("user.created", Handler::new(move |event: Option<&UserCreated>| {
//!     assert_eq!(event, Some(&UserCreated { id: 42 }));
//!     counter.fetch_add(1, Ordering::SeqCst);
//! }));
//! bus.on(EventName::WILDCARD, Handler::wildcard(|name, _| {
//!     assert_eq!(name.to_string(), "user.created");
//! }));
//!
//! assert_eq!(bus.emit("user.created", Some(&UserCreated { id: 42 })), 2);
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! ```

mod bus;
mod error;
mod handler;
mod name;

pub use bus::{EventBus, HandlerMap, SharedHandlerMap};
pub use error::{EventBusError, EventBusErrorExt};
pub use handler::{Handler, HandlerKind};
pub use name::{EventName, Symbol};
