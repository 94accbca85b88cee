use std::borrow::Cow;

/// Errors that can occur during event bus operations.
#[derive(Debug, thiserror::Error)]
pub enum EventBusError {
    /// A handler panicked while an event was being dispatched.
    /// Handlers after it in the same pass were not invoked.
    #[error("Handler panicked{}: {message}", format_context(.context))]
    HandlerPanicked { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Attaches context to an [`EventBusError`] carried by a `Result`.
pub trait EventBusErrorExt<T> {
    /// Replaces the context of the error, if any.
    ///
    /// # Errors
    /// Returns the original error with the new context attached.
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, EventBusError>;
}

impl<T> EventBusErrorExt<T> for Result<T, EventBusError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                EventBusError::HandlerPanicked { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
