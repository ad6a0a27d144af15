//! The per-run audit log.
//!
//! An append-only sequence of human-readable entries, owned by exactly one
//! pipeline run and returned to the caller. This replaces ambient logging
//! for everything a reviewer needs to see; the `log` facade carries only
//! developer diagnostics.

/// Append-only audit trail for one document-processing run.
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: Vec<String>,
}

impl AuditLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an informational entry.
    pub fn info(&mut self, message: impl Into<String>) {
        self.entries.push(message.into());
    }

    /// Appends a recovered-failure entry.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.entries.push(format!("warning: {}", message));
    }

    /// Appends a non-recovered failure entry (the call may still continue
    /// with the remaining pages).
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.entries.push(format!("error: {}", message));
    }

    /// Appends the section marker for one page.
    pub fn page_marker(&mut self, page_number: usize) {
        self.entries.push(format!("--- page {} ---", page_number));
    }

    /// All entries appended so far, in order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Consumes the log, returning the entries.
    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_append_order() {
        let mut audit = AuditLog::new();
        audit.info("opened");
        audit.page_marker(1);
        audit.warn("detector failed");
        audit.error("apply failed");

        assert_eq!(
            audit.entries(),
            [
                "opened",
                "--- page 1 ---",
                "warning: detector failed",
                "error: apply failed"
            ]
        );
        assert_eq!(audit.len(), 4);
    }
}
