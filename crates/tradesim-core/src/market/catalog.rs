//! Built-in instrument catalog used by the demo platform.

use crate::{InstrumentConfig, Symbol, ValidationError};

struct CatalogEntry {
    symbol: &'static str,
    name: &'static str,
    sector: &'static str,
    description: &'static str,
    base_price: f64,
    volatility: f64,
    trend: f64,
    history_start: f64,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        symbol: "DDOG",
        name: "Datadog, Inc.",
        sector: "Technology - Observability",
        description: "The leading observability and security platform",
        base_price: 135.00,
        volatility: 0.012,
        trend: 0.004,
        history_start: 98.50,
    },
    CatalogEntry {
        symbol: "SPLK",
        name: "Splunk Inc.",
        sector: "Technology - Observability",
        description: "Legacy log management platform",
        base_price: 85.00,
        volatility: 0.035,
        trend: -0.003,
        history_start: 112.00,
    },
    CatalogEntry {
        symbol: "DT",
        name: "Dynatrace, Inc.",
        sector: "Technology - Observability",
        description: "Application performance monitoring",
        base_price: 45.00,
        volatility: 0.030,
        trend: -0.002,
        history_start: 58.00,
    },
    CatalogEntry {
        symbol: "NEWR",
        name: "New Relic, Inc.",
        sector: "Technology - Observability",
        description: "Observability platform",
        base_price: 68.00,
        volatility: 0.040,
        trend: -0.004,
        history_start: 95.00,
    },
    CatalogEntry {
        symbol: "ESTC",
        name: "Elastic N.V.",
        sector: "Technology - Search/Observability",
        description: "Search and observability platform",
        base_price: 72.00,
        volatility: 0.032,
        trend: -0.002,
        history_start: 88.00,
    },
    CatalogEntry {
        symbol: "AAPL",
        name: "Apple Inc.",
        sector: "Technology - Consumer Electronics",
        description: "Consumer electronics and software",
        base_price: 189.00,
        volatility: 0.015,
        trend: 0.0012,
        history_start: 175.00,
    },
    CatalogEntry {
        symbol: "MSFT",
        name: "Microsoft Corporation",
        sector: "Technology - Software",
        description: "Software and cloud computing",
        base_price: 378.00,
        volatility: 0.014,
        trend: 0.0015,
        history_start: 340.00,
    },
    CatalogEntry {
        symbol: "GOOGL",
        name: "Alphabet Inc.",
        sector: "Technology - Internet",
        description: "Internet services and products",
        base_price: 142.00,
        volatility: 0.018,
        trend: 0.001,
        history_start: 132.00,
    },
    CatalogEntry {
        symbol: "AMZN",
        name: "Amazon.com, Inc.",
        sector: "Technology - E-commerce/Cloud",
        description: "E-commerce and cloud computing",
        base_price: 178.00,
        volatility: 0.020,
        trend: 0.0008,
        history_start: 168.00,
    },
    CatalogEntry {
        symbol: "TSLA",
        name: "Tesla, Inc.",
        sector: "Automotive - Electric Vehicles",
        description: "Electric vehicles and clean energy",
        base_price: 245.00,
        volatility: 0.045,
        trend: 0.0,
        history_start: 248.00,
    },
    CatalogEntry {
        symbol: "NVDA",
        name: "NVIDIA Corporation",
        sector: "Technology - Semiconductors",
        description: "Graphics processing and AI chips",
        base_price: 495.00,
        volatility: 0.028,
        trend: 0.003,
        history_start: 380.00,
    },
    CatalogEntry {
        symbol: "META",
        name: "Meta Platforms, Inc.",
        sector: "Technology - Social Media",
        description: "Social media and virtual reality",
        base_price: 335.00,
        volatility: 0.022,
        trend: 0.001,
        history_start: 310.00,
    },
];

/// The twelve instruments traded on the demo platform.
pub fn default_instruments() -> Result<Vec<InstrumentConfig>, ValidationError> {
    CATALOG
        .iter()
        .map(|entry| -> Result<InstrumentConfig, ValidationError> {
            let config = InstrumentConfig::new(
                Symbol::parse(entry.symbol)?,
                entry.base_price,
                entry.volatility,
                entry.trend,
                entry.history_start,
            )?;
            Ok(config.with_metadata(entry.name, entry.sector, entry.description))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_valid_and_unique() {
        let instruments = default_instruments().expect("catalog must validate");
        assert_eq!(instruments.len(), 12);

        let mut symbols: Vec<&str> = instruments.iter().map(|i| i.symbol.as_str()).collect();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), 12);
    }
}
