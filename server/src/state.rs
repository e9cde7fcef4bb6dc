//! Server lifecycle state.

/// Server operational state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Server is binding its listener.
    Starting,
    /// Server is running and serving rate queries.
    Running,
    /// Shutdown signal received, draining in-flight requests.
    ShuttingDown,
    /// Server is stopped.
    Stopped,
}

impl ServerState {
    /// Check if the server is serving requests.
    pub fn is_operational(&self) -> bool {
        matches!(self, ServerState::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServerState::Starting => "starting",
            ServerState::Running => "running",
            ServerState::ShuttingDown => "shutting_down",
            ServerState::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_running_is_operational() {
        assert!(ServerState::Running.is_operational());
        assert!(!ServerState::Starting.is_operational());
        assert!(!ServerState::ShuttingDown.is_operational());
        assert!(!ServerState::Stopped.is_operational());
        assert_eq!(ServerState::ShuttingDown.to_string(), "shutting_down");
    }
}
