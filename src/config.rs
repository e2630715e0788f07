use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::source::DEFAULT_API_BASE;

#[derive(Parser, Debug, Clone)]
#[command(name = "meal-finder", about = "Find meals for your ingredients", version)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "MEAL_FINDER_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,

    /// Base URL of the meal service.
    #[arg(long, env = "MEAL_FINDER_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Directory holding the stylesheet.
    #[arg(long, default_value = "assets/static")]
    pub assets: PathBuf,

    /// Timeout for each call to the meal service, in seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
