use tracing::Span;

/// Logging context handed to collaborators when they are built.
///
/// Records go out parented on the component span, so whatever subscriber the
/// binary installed at startup sees which component produced them. Create it
/// after the subscriber is installed; a span created earlier stays disabled.
#[derive(Debug, Clone)]
pub struct LogContext {
    span: Span,
}

impl LogContext {
    #[must_use]
    pub fn new(component: &'static str) -> Self {
        Self {
            span: tracing::info_span!("quiz", component = component),
        }
    }

    /// A context that records nothing; for tests and embedding.
    #[must_use]
    pub fn disabled() -> Self {
        Self { span: Span::none() }
    }

    #[must_use]
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Default for LogContext {
    fn default() -> Self {
        Self::disabled()
    }
}
