use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FromPayload;
use super::fields::{array, flag, number, string_list, text};
use crate::enums::SchemaType;

/// One pricing tier (`Free`, `Pro`, `Enterprise`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PricingTier {
    pub name: Option<String>,
    /// Price in dollars; `None` for "contact sales".
    pub price: Option<f64>,
    pub billing_cycle: Option<String>,
    pub price_per_unit: Option<String>,
    pub features: Vec<String>,
}

impl PricingTier {
    /// A tier is paid when it has a known price above zero.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.price.is_some_and(|price| price > 0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PricingData {
    pub tiers: Vec<PricingTier>,
    pub currency: Option<String>,
    pub has_free_tier: bool,
    pub has_enterprise: bool,
    pub last_updated: Option<String>,
}

impl PricingData {
    /// Lowest price among paid tiers.
    #[must_use]
    pub fn lowest_paid_price(&self) -> Option<f64> {
        self.paid_prices().reduce(f64::min)
    }

    /// Highest price among paid tiers.
    #[must_use]
    pub fn highest_price(&self) -> Option<f64> {
        self.paid_prices().reduce(f64::max)
    }

    fn paid_prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.tiers
            .iter()
            .filter(|tier| tier.is_paid())
            .filter_map(|tier| tier.price)
    }
}

impl FromPayload for PricingData {
    const SCHEMA: SchemaType = SchemaType::Pricing;

    fn from_payload(data: &Value) -> Self {
        let tiers = array(data, "tiers")
            .iter()
            .map(|tier| PricingTier {
                name: text(tier, "name"),
                price: number(tier, "price"),
                billing_cycle: text(tier, "billingCycle"),
                price_per_unit: text(tier, "pricePerUnit"),
                features: string_list(tier, "features"),
            })
            .collect();

        Self {
            tiers,
            currency: text(data, "currency"),
            has_free_tier: flag(data, "hasFreeTier"),
            has_enterprise: flag(data, "hasEnterprise"),
            last_updated: text(data, "lastUpdated"),
        }
    }
}
