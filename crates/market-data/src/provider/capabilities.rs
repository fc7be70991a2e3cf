//! Provider capability declarations.

use crate::models::AssetKind;

/// What a provider adapter can do.
///
/// Used by the aggregation engine to decide which adapters participate in a
/// request for a given asset kind.
#[derive(Clone, Debug)]
pub struct ProviderCapabilities {
    /// Asset kinds this provider covers.
    pub asset_kinds: &'static [AssetKind],

    /// Whether chart history is available.
    pub supports_history: bool,

    /// Whether company profiles are available.
    pub supports_profile: bool,
}

impl ProviderCapabilities {
    /// Whether the provider covers the given asset kind.
    pub fn supports_kind(&self, kind: AssetKind) -> bool {
        self.asset_kinds.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_kind() {
        let caps = ProviderCapabilities {
            asset_kinds: &[AssetKind::Stock, AssetKind::Etf],
            supports_history: true,
            supports_profile: false,
        };
        assert!(caps.supports_kind(AssetKind::Stock));
        assert!(!caps.supports_kind(AssetKind::Crypto));
    }
}
