//! Message decoration for log output
//!
//! The engine builds plain messages (using back-ticks around branch names)
//! and hands them to a [`LogFormatter`] before logging. Decoration never
//! affects control flow.

/// Formatting policy, one method per kind of message
pub trait LogFormatter: Send + Sync {
    /// Diagnostic detail
    fn debug(&self, message: &str) -> String;
    /// Progress information
    fn info(&self, message: &str) -> String;
    /// Something the user should look at
    fn warn(&self, message: &str) -> String;
    /// A failed step
    fn error(&self, message: &str) -> String;
    /// A completed step
    fn success(&self, message: &str) -> String;
}

/// Default formatter: strips back-ticks, adds nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

fn strip_ticks(message: &str) -> String {
    message.replace('`', "")
}

impl LogFormatter for PlainFormatter {
    fn debug(&self, message: &str) -> String {
        strip_ticks(message)
    }

    fn info(&self, message: &str) -> String {
        strip_ticks(message)
    }

    fn warn(&self, message: &str) -> String {
        strip_ticks(message)
    }

    fn error(&self, message: &str) -> String {
        strip_ticks(message)
    }

    fn success(&self, message: &str) -> String {
        strip_ticks(message)
    }
}

/// Emoji-prefixed formatter that keeps back-ticks (for chat forwarding)
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettyFormatter;

impl LogFormatter for PrettyFormatter {
    fn debug(&self, message: &str) -> String {
        format!("🔍 {message}")
    }

    fn info(&self, message: &str) -> String {
        format!("ℹ️ {message}")
    }

    fn warn(&self, message: &str) -> String {
        format!("⚠️ {message}")
    }

    fn error(&self, message: &str) -> String {
        format!("❌ {message}")
    }

    fn success(&self, message: &str) -> String {
        format!("✅ {message}")
    }
}

/// Wraps another formatter and prefixes every message
#[derive(Debug, Clone)]
pub struct Prefixed<F> {
    prefix: String,
    inner: F,
}

impl<F: LogFormatter> Prefixed<F> {
    /// Prefix every message produced by `inner` with `prefix`
    pub fn new(prefix: impl Into<String>, inner: F) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
        }
    }

    fn apply(&self, decorated: String) -> String {
        if self.prefix.is_empty() {
            decorated
        } else {
            format!("{} {decorated}", self.prefix)
        }
    }
}

impl<F: LogFormatter> LogFormatter for Prefixed<F> {
    fn debug(&self, message: &str) -> String {
        self.apply(self.inner.debug(message))
    }

    fn info(&self, message: &str) -> String {
        self.apply(self.inner.info(message))
    }

    fn warn(&self, message: &str) -> String {
        self.apply(self.inner.warn(message))
    }

    fn error(&self, message: &str) -> String {
        self.apply(self.inner.error(message))
    }

    fn success(&self, message: &str) -> String {
        self.apply(self.inner.success(message))
    }
}
