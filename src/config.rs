use std::{env, str::FromStr, time::Duration};

use anyhow::{Context, bail};

use crate::{events::DEFAULT_TOPIC, worker::DEFAULT_TICK};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Postgres => "postgres",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            other => bail!("unknown STORAGE_BACKEND `{other}`"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSinkKind {
    Log,
    Broadcast,
}

impl FromStr for EventSinkKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" | "noop" => Ok(EventSinkKind::Log),
            "broadcast" => Ok(EventSinkKind::Broadcast),
            other => bail!("unknown EVENT_SINK `{other}`"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub status_tick: Duration,
    pub event_sink: EventSinkKind,
    pub event_topic: String,
    pub event_channel_capacity: usize,
    pub debug_routes: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match lookup("APP_PORT") {
            Some(port) => port
                .parse::<u16>()
                .with_context(|| format!("invalid APP_PORT `{port}`"))?,
            None => 8080,
        };

        let storage = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::Memory,
        };
        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());
        if storage == StorageBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL is required when STORAGE_BACKEND=postgres");
        }

        let status_tick = match lookup("STATUS_TICK_MS") {
            Some(ms) => {
                let ms = ms
                    .parse::<u64>()
                    .with_context(|| format!("invalid STATUS_TICK_MS `{ms}`"))?;
                if ms == 0 {
                    bail!("STATUS_TICK_MS must be greater than zero");
                }
                Duration::from_millis(ms)
            }
            None => DEFAULT_TICK,
        };

        let event_sink = match lookup("EVENT_SINK") {
            Some(value) => value.parse()?,
            None => EventSinkKind::Log,
        };
        let event_topic = lookup("EVENT_TOPIC")
            .filter(|topic| !topic.is_empty())
            .unwrap_or_else(|| DEFAULT_TOPIC.to_string());
        let event_channel_capacity = match lookup("EVENT_CHANNEL_CAPACITY") {
            Some(capacity) => {
                let capacity = capacity
                    .parse::<usize>()
                    .with_context(|| format!("invalid EVENT_CHANNEL_CAPACITY `{capacity}`"))?;
                if capacity == 0 {
                    bail!("EVENT_CHANNEL_CAPACITY must be greater than zero");
                }
                capacity
            }
            None => 256,
        };

        let debug_routes = match lookup("ENABLE_DEBUG_ROUTES") {
            Some(value) => parse_flag("ENABLE_DEBUG_ROUTES", &value)?,
            None => true,
        };

        Ok(Self {
            host,
            port,
            storage,
            database_url,
            status_tick,
            event_sink,
            event_topic,
            event_channel_capacity,
            debug_routes,
        })
    }
}

fn parse_flag(key: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("invalid {key} `{other}`"),
    }
}
