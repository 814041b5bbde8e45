use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "cardbank-server")]
#[command(about = "Demo backend for credit, debit and virtual card management")]
#[command(version)]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Lifetime stamped on freshly issued session tokens, in hours
    #[arg(long, env = "SESSION_TTL_HOURS", default_value = "24")]
    pub session_ttl_hours: i64,

    /// Load the demo users, cards and settings at startup
    #[arg(long, env = "SEED_DEMO_DATA", default_value_t = true, action = ArgAction::Set)]
    pub seed_demo_data: bool,
}

impl Config {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}
