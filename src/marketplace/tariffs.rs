use serde_json::Value;

use super::MarketplaceClient;
use super::types::TariffResponse;
use crate::utils::error::{AppError, Result};

const BOX_TARIFFS_PATH: &str = "/api/v1/tariffs/box";

/// Box delivery rates of one warehouse.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxTariff {
    pub base: f64,
    pub per_liter: f64,
}

impl MarketplaceClient {
    /// Fetches box tariffs for `date` (`YYYY-MM-DD`) and picks the named warehouse.
    pub async fn box_tariff(&self, date: &str, warehouse: &str) -> Result<BoxTariff> {
        let url = Self::endpoint(&self.config.common_api_url, BOX_TARIFFS_PATH);
        let response: TariffResponse = self
            .get_json(&url, &[("date", date.to_string())], "box tariffs")
            .await?;

        let entry = response
            .response
            .data
            .warehouse_list
            .iter()
            .find(|w| w.warehouse_name == warehouse)
            .ok_or_else(|| AppError::NotFound {
                resource: format!("warehouse '{}' in box tariffs", warehouse),
            })?;

        Ok(BoxTariff {
            base: parse_flexible_float(&entry.box_delivery_base)?,
            per_liter: parse_flexible_float(&entry.box_delivery_liter)?,
        })
    }
}

/// Reads a JSON number, or a string using either `.` or `,` as the decimal mark.
pub fn parse_flexible_float(raw: &Value) -> Result<f64> {
    match raw {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| AppError::parse(format!("number out of range: {}", n))),
        Value::String(s) => {
            let normalized = s.trim().replace(',', ".");
            normalized
                .parse::<f64>()
                .map_err(|e| AppError::parse(format!("invalid decimal '{}': {}", s, e)))
        }
        other => Err(AppError::parse(format!(
            "expected number or string, got {}",
            other
        ))),
    }
}
