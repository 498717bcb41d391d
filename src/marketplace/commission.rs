use super::MarketplaceClient;
use super::types::{Commission, CommissionResponse};
use crate::utils::error::Result;

const COMMISSION_PATH: &str = "/api/v1/tariffs/commission";

impl MarketplaceClient {
    pub async fn commission_report(&self) -> Result<Vec<Commission>> {
        let url = Self::endpoint(&self.config.common_api_url, COMMISSION_PATH);
        let response: CommissionResponse =
            self.get_json(&url, &[], "commission report").await?;
        Ok(response.report)
    }
}

/// Marketplace commission percent for a subject, truncated to a whole number.
/// When the report lists the subject more than once the last entry wins.
pub fn commission_percent(report: &[Commission], subject_id: i64) -> Option<i64> {
    report
        .iter()
        .rev()
        .find(|c| c.subject_id == subject_id)
        .map(|c| c.kgvp_marketplace.trunc() as i64)
}
