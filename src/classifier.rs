//! Vendor-code classification.
//!
//! Vendor codes look like `category_product[_pieces]`, e.g. `box_501_3`.
//! A configured, ordered list of patterns decides which codes a pipeline
//! handles; matching codes are then split into their segments.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::marketplace::types::Card;
use crate::utils::error::{AppError, Result};

const DELIMITER: char = '_';

/// Segments extracted from a matching vendor code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedCode {
    pub vendor_code: String,
    pub category: String,
    pub product_id: String,
    /// Piece multiplier, 1 when the segment is missing or not a number.
    pub pieces: u32,
    /// Index of the rule that matched.
    pub rule: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Matched(ClassifiedCode),
    NotMatched,
    Malformed,
}

#[derive(Debug, Clone)]
pub struct VendorCodeClassifier {
    rules: Vec<Regex>,
}

impl VendorCodeClassifier {
    /// Compiles the rules up front; an invalid pattern is a configuration error.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let rules = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn matching_rule(&self, vendor_code: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.is_match(vendor_code))
    }

    pub fn classify(&self, vendor_code: &str) -> Classification {
        let Some(rule) = self.matching_rule(vendor_code) else {
            return Classification::NotMatched;
        };

        match split_vendor_code(vendor_code) {
            Ok((category, product_id, pieces)) => Classification::Matched(ClassifiedCode {
                vendor_code: vendor_code.to_string(),
                category,
                product_id,
                pieces,
                rule,
            }),
            Err(_) => Classification::Malformed,
        }
    }
}

/// Splits a vendor code into `(category, product_id, pieces)`.
pub fn split_vendor_code(vendor_code: &str) -> Result<(String, String, u32)> {
    let parts: Vec<&str> = vendor_code.split(DELIMITER).collect();
    if parts.len() < 2 {
        return Err(AppError::MalformedVendorCode {
            vendor_code: vendor_code.to_string(),
        });
    }

    let pieces = parts
        .get(2)
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(1);

    Ok((parts[0].to_string(), parts[1].to_string(), pieces))
}

/// The card's only SKU; zero or several is an error.
pub fn single_sku(card: &Card) -> Result<&str> {
    match card.skus().as_slice() {
        [sku] => Ok(*sku),
        other => Err(AppError::AmbiguousSku {
            vendor_code: card.vendor_code.clone(),
            count: other.len(),
        }),
    }
}
