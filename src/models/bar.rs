//! The fixed set of bar locations.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    /// Label of the weekly sales chart series this bar's sales feed into
    #[serde(default)]
    pub chart_series: Option<String>,
}

/// Lookup table over the configured bars, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarDirectory {
    bars: Vec<Bar>,
}

impl BarDirectory {
    #[must_use]
    pub const fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Bar> {
        self.bars.iter().find(|bar| bar.id == id)
    }

    /// Like [`Self::get`] but rejects ids outside the configured set.
    pub fn require(&self, id: &str) -> Result<&Bar> {
        self.get(id).ok_or_else(|| Error::UnknownBar { id: id.to_string() })
    }

    /// Display name for a bar id, falling back to the raw id.
    #[must_use]
    pub fn name_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map_or(id, |bar| bar.name.as_str())
    }

    /// Chart series for a (denormalized) bar name. Unmapped names yield `None`.
    #[must_use]
    pub fn series_for_name(&self, bar_name: &str) -> Option<&str> {
        self.bars
            .iter()
            .find(|bar| bar.name == bar_name)
            .and_then(|bar| bar.chart_series.as_deref())
    }

    /// Distinct chart series labels in configuration order.
    #[must_use]
    pub fn series(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for label in self.bars.iter().filter_map(|bar| bar.chart_series.as_deref()) {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }
}

impl Default for BarDirectory {
    fn default() -> Self {
        let bar = |id: &str, name: &str, location: &str, series: &str| Bar {
            id: id.to_string(),
            name: name.to_string(),
            location: location.to_string(),
            chart_series: Some(series.to_string()),
        };
        Self::new(vec![
            bar("1", "Main Bar", "Lobby Floor", "Main"),
            bar("2", "Economa", "Pool Deck", "Economa"),
            bar("3", "Restaurant", "Ground Floor", "Restaurant"),
        ])
    }
}
