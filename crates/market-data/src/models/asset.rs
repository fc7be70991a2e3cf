use serde::{Deserialize, Serialize};

/// Asset classification used to select providers and the fundamentals variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetKind {
    Stock,
    Crypto,
    Etf,
    Index,
}

impl AssetKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Crypto => "crypto",
            Self::Etf => "etf",
            Self::Index => "index",
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_kind_serializes_camel_case() {
        assert_eq!(serde_json::to_string(&AssetKind::Stock).unwrap(), "\"stock\"");
        assert_eq!(serde_json::to_string(&AssetKind::Crypto).unwrap(), "\"crypto\"");
    }

    #[test]
    fn test_asset_kind_display() {
        assert_eq!(AssetKind::Etf.to_string(), "etf");
        assert_eq!(AssetKind::Index.to_string(), "index");
    }
}
