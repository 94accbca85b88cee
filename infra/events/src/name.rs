use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

/// An opaque, unique token usable as an event name.
///
/// Every call to [`Symbol::new`] or [`Symbol::anonymous`] yields a fresh token,
/// so two symbols with the same description never collide. Clones share the
/// token and compare equal.
#[derive(Debug, Clone)]
pub struct Symbol {
    id: u64,
    description: Option<Cow<'static, str>>,
}

impl Symbol {
    /// Creates a new unique symbol with a human-readable description.
    #[must_use]
    pub fn new(description: impl Into<Cow<'static, str>>) -> Self {
        Self { id: next_id(), description: Some(description.into()) }
    }

    /// Creates a new unique symbol without a description.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { id: next_id(), description: None }
    }

    /// The description given at creation, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

fn next_id() -> u64 {
    NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed)
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or_default())
    }
}

/// Key identifying an event channel: either a text name or a [`Symbol`].
///
/// The text name `"*"` is reserved for the wildcard channel, see
/// [`EventName::WILDCARD`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventName {
    Name(Cow<'static, str>),
    Symbol(Symbol),
}

impl EventName {
    /// The channel that observes every emission.
    pub const WILDCARD: Self = Self::Name(Cow::Borrowed("*"));

    /// Whether this is the text name `"*"`. Symbols are never the wildcard.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Name(name) if name == "*")
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Symbol(symbol) => fmt::Display::fmt(symbol, f),
        }
    }
}

impl From<&'static str> for EventName {
    fn from(name: &'static str) -> Self {
        Self::Name(Cow::Borrowed(name))
    }
}

impl From<String> for EventName {
    fn from(name: String) -> Self {
        Self::Name(Cow::Owned(name))
    }
}

impl From<Cow<'static, str>> for EventName {
    fn from(name: Cow<'static, str>) -> Self {
        Self::Name(name)
    }
}

impl From<Symbol> for EventName {
    fn from(symbol: Symbol) -> Self {
        Self::Symbol(symbol)
    }
}

impl From<&Symbol> for EventName {
    fn from(symbol: &Symbol) -> Self {
        Self::Symbol(symbol.clone())
    }
}

impl From<&EventName> for EventName {
    fn from(name: &EventName) -> Self {
        name.clone()
    }
}
