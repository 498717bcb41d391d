//! Identifier → page URL table loaded from a two-column text file.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::utils::error::Result;

/// Immutable lookup of supplier page URLs, e.g.
/// `bubblebags_19323,https://packio.ru/product/paket-...`.
#[derive(Debug, Clone, Default)]
pub struct UrlLookup {
    urls: HashMap<String, String>,
}

impl UrlLookup {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Lines that do not have exactly two fields are ignored. A later line
    /// for the same key replaces an earlier one.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut urls = HashMap::new();
        for record in rdr.records() {
            let record = record?;
            if record.len() != 2 {
                continue;
            }
            urls.insert(record[0].to_string(), record[1].to_string());
        }

        Ok(Self { urls })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.urls.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl FromIterator<(String, String)> for UrlLookup {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            urls: iter.into_iter().collect(),
        }
    }
}
