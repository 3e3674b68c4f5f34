use std::{net::SocketAddr, str::FromStr};

use anyhow::Context;
use detour_closures::client::{ClosuresApiClient, ClosuresApiClientParams};
use detour_valhalla::client::{ValhallaClient, ValhallaClientParams};

pub const DEFAULT_CLOSURES_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_VALHALLA_URL: &str = "https://valhalla1.openstreetmap.de";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MAX_PAGES: u32 = 10;
pub const DEFAULT_API_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub closures_api_url: String,
    pub closures_api_token: Option<String>,
    pub valhalla_url: String,
    pub page_size: u32,
    pub max_pages: u32,
    pub api_addr: SocketAddr,
}

impl PlannerConfig {
    /// Reads the `DETOUR_*` variables. Call `dotenvy` beforehand to pick up
    /// `.env.local`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(PlannerConfig {
            closures_api_url: string("DETOUR_CLOSURES_API_URL", DEFAULT_CLOSURES_API_URL),
            closures_api_token: lookup("DETOUR_CLOSURES_API_TOKEN")
                .filter(|token| !token.is_empty()),
            valhalla_url: string("DETOUR_VALHALLA_URL", DEFAULT_VALHALLA_URL),
            page_size: parse(&lookup, "DETOUR_CLOSURES_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            max_pages: parse(&lookup, "DETOUR_CLOSURES_MAX_PAGES", DEFAULT_MAX_PAGES)?,
            api_addr: parse(
                &lookup,
                "DETOUR_API_ADDR",
                SocketAddr::from(([127, 0, 0, 1], 8080)),
            )?,
        })
    }

    pub fn closures_client(&self) -> ClosuresApiClient {
        ClosuresApiClient::new(ClosuresApiClientParams {
            api_url: self.closures_api_url.clone(),
            token: self.closures_api_token.clone(),
            page_size: self.page_size,
            max_pages: self.max_pages,
        })
    }

    pub fn valhalla_client(&self) -> ValhallaClient {
        ValhallaClient::new(ValhallaClientParams {
            valhalla_url: self.valhalla_url.clone(),
        })
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {value:?}")),
        None => Ok(default),
    }
}
