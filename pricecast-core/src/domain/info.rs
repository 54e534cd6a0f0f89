//! Descriptive ticker metadata.

use serde::{Deserialize, Serialize};

/// Descriptive information about a ticker. Every field is optional: stocks
/// carry a sector and industry, funds carry a legal type and fund family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerInfo {
    pub symbol: String,
    pub long_name: Option<String>,
    pub quote_type: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub legal_type: Option<String>,
    pub fund_family: Option<String>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
}

impl TickerInfo {
    /// Label/value pairs for every populated field, in display order.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Name", &self.long_name),
            ("Type", &self.quote_type),
            ("Sector", &self.sector),
            ("Industry", &self.industry),
            ("Legal type", &self.legal_type),
            ("Fund family", &self.fund_family),
            ("Currency", &self.currency),
            ("Exchange", &self.exchange),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_skip_missing_values() {
        let info = TickerInfo {
            symbol: "SMH".into(),
            long_name: Some("VanEck Semiconductor ETF".into()),
            legal_type: Some("Exchange Traded Fund".into()),
            ..Default::default()
        };
        let fields = info.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0], ("Name", "VanEck Semiconductor ETF"));
        assert_eq!(fields[1], ("Legal type", "Exchange Traded Fund"));
    }
}
