use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    /// Odds (scaled by 100) paid on a winning coin flip.
    pub coinflip_odds: i32,

    /// Seed demo accounts and a demo market at startup.
    pub seed_demo_data: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            coinflip_odds: env::var("COINFLIP_ODDS")
                .unwrap_or_else(|_| "195".into())
                .parse()
                .unwrap_or(195),
            seed_demo_data: env::var("SEED_DEMO_DATA")
                .unwrap_or_else(|_| "false".into())
                .parse()
                .unwrap_or(false),
        })
    }
}
