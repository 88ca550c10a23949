use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersQuery {
    /// RFC 3339 lower bound on `created_at`; defaults to the epoch.
    pub from: Option<String>,
}

impl ListOrdersQuery {
    pub fn cutoff(&self) -> AppResult<Option<DateTime<Utc>>> {
        match self.from.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|_| AppError::InvalidInput(format!("`from` is not RFC 3339: {raw}"))),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SeedQuery {
    /// Number of orders to create, default 10.
    pub n: Option<usize>,
}

pub fn parse_order_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::InvalidId)
}
