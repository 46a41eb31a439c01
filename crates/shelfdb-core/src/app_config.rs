#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide configuration, loaded from the environment once at startup
/// and passed down by reference.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Blocking timeout for plain HTTP fetches (search page, book page).
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Bounded wait for the first review card to render. Exceeding this is
    /// fatal for the book being harvested.
    pub harvest_initial_wait_secs: u64,
    /// Bounded wait for the "load more" control. Exceeding this means the
    /// review list is exhausted, not an error.
    pub harvest_load_more_wait_secs: u64,
    /// Base settle delay around interactive browser actions; jittered.
    pub harvest_politeness_delay_ms: u64,
    /// Review target used when the caller does not supply one.
    pub harvest_default_max_reviews: usize,
    pub browser_headless: bool,
    /// Explicit Chrome/Chromium binary. When unset, well-known install
    /// locations and `PATH` are probed.
    pub browser_executable: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("harvest_initial_wait_secs", &self.harvest_initial_wait_secs)
            .field(
                "harvest_load_more_wait_secs",
                &self.harvest_load_more_wait_secs,
            )
            .field(
                "harvest_politeness_delay_ms",
                &self.harvest_politeness_delay_ms,
            )
            .field(
                "harvest_default_max_reviews",
                &self.harvest_default_max_reviews,
            )
            .field("browser_headless", &self.browser_headless)
            .field("browser_executable", &self.browser_executable)
            .finish()
    }
}
