use std::fmt;

/// Append-only diagnostic record of one planning pass.
///
/// Planning code notes what it decided and why; the orchestrator (and the
/// tests) read the lines afterwards. Nothing in here is ever load-bearing:
/// dropping the log changes no decision.
#[derive(Debug, Default)]
pub struct TurnLog {
    lines: Vec<String>,
}

impl TurnLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Test convenience: did any line mention this?
    pub fn mentions(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl fmt::Display for TurnLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_accumulate_in_order() {
        let mut log = TurnLog::new();
        assert!(log.is_empty());
        log.note("agent 3: assigned scout");
        log.note(format!("agent {}: moved", 3));
        assert_eq!(log.lines().len(), 2);
        assert!(log.mentions("assigned scout"));
        assert!(!log.mentions("disposed"));
        assert_eq!(log.to_string(), "agent 3: assigned scout\nagent 3: moved\n");
    }
}
