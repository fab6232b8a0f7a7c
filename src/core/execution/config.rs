/// Configuration for replication execution
///
/// This module provides configuration types for controlling how independent
/// replications are scheduled, including concurrency settings and thread
/// pool management. A single replication always runs on one thread.

/// Enumeration of supported concurrency modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyMode {
    /// Sequential execution mode - replications run one after another on the calling thread
    #[default]
    Sequential,
    /// Parallel execution mode using Rayon - replications run concurrently
    Rayon,
}

/// Configuration for replication execution
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    /// The concurrency mode to use for execution
    pub concurrency_mode: ConcurrencyMode,
    /// The size of a dedicated thread pool for parallel execution.
    /// Only relevant when concurrency_mode is Rayon; `None` uses the global pool
    pub thread_pool_size: Option<usize>,
}

impl RunnerConfig {
    /// Create a new runner configuration with default values
    ///
    /// Default configuration uses Sequential mode with no thread pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency mode for the runner
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel execution
    ///
    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();
        assert_eq!(config.concurrency_mode, ConcurrencyMode::Sequential);
        assert_eq!(config.thread_pool_size, None);
    }

    #[test]
    fn test_config_builder() {
        let config = RunnerConfig::new()
            .with_concurrency(ConcurrencyMode::Rayon)
            .with_thread_pool_size(4);

        assert_eq!(config.concurrency_mode, ConcurrencyMode::Rayon);
        assert_eq!(config.thread_pool_size, Some(4));
    }
}
