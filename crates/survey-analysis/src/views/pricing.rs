use std::cmp::Ordering;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use survey_core::entities::ExtractionRecord;
use survey_core::payload::{PricingData, PricingTier};

use super::{ViewSource, compare_names, typed_latest};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PricingSort {
    #[default]
    Name,
    PriceAsc,
    PriceDesc,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PricingQuery {
    pub project_id: String,
    pub has_free_tier: Option<bool>,
    pub has_enterprise: Option<bool>,
    /// Upper bound on the lowest paid price.
    pub max_price: Option<f64>,
    /// Lower bound on the lowest paid price.
    pub min_price: Option<f64>,
    #[serde(default)]
    pub sort_by: PricingSort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TierSummary {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub billing_cycle: Option<String>,
    pub price_per_unit: Option<String>,
}

impl From<&PricingTier> for TierSummary {
    fn from(tier: &PricingTier) -> Self {
        Self {
            name: tier.name.clone(),
            price: tier.price,
            billing_cycle: tier.billing_cycle.clone(),
            price_per_unit: tier.price_per_unit.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PricingResult {
    #[serde(flatten)]
    pub source: ViewSource,
    pub has_free_tier: bool,
    pub has_enterprise: bool,
    pub lowest_paid_price: Option<f64>,
    pub highest_price: Option<f64>,
    pub tier_count: usize,
    pub tiers: Vec<TierSummary>,
}

impl PricingResult {
    fn new(source: ViewSource, data: &PricingData) -> Self {
        Self {
            source,
            has_free_tier: data.has_free_tier,
            has_enterprise: data.has_enterprise,
            lowest_paid_price: data.lowest_paid_price(),
            highest_price: data.highest_price(),
            tier_count: data.tiers.len(),
            tiers: data.tiers.iter().map(TierSummary::from).collect(),
        }
    }

    fn admitted_by(&self, query: &PricingQuery) -> bool {
        let price_ok = |bound: Option<f64>, within: fn(f64, f64) -> bool| {
            match (bound, self.lowest_paid_price) {
                (Some(bound), Some(price)) => within(price, bound),
                _ => true,
            }
        };
        query.has_free_tier.is_none_or(|want| self.has_free_tier == want)
            && query.has_enterprise.is_none_or(|want| self.has_enterprise == want)
            && price_ok(query.max_price, |price, max| price <= max)
            && price_ok(query.min_price, |price, min| price >= min)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PricingSummary {
    pub total_with_pricing: usize,
    pub with_free_tier: usize,
    pub with_enterprise: usize,
    /// Spread of lowest paid prices among the results.
    pub price_range: PriceRange,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PricingView {
    pub results: Vec<PricingResult>,
    pub summary: PricingSummary,
}

/// Unknown prices order after every known price, whichever direction.
fn by_price(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.total_cmp(&a),
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[must_use]
pub fn pricing_view(records: &[ExtractionRecord], query: &PricingQuery) -> PricingView {
    let mut results: Vec<PricingResult> = typed_latest::<PricingData>(records)
        .into_iter()
        .map(|(source, data)| PricingResult::new(source, &data))
        .filter(|result| result.admitted_by(query))
        .collect();

    match query.sort_by {
        PricingSort::Name => {
            results.sort_by(|a, b| compare_names(&a.source.entity_name, &b.source.entity_name));
        }
        PricingSort::PriceAsc => {
            results.sort_by(|a, b| by_price(a.lowest_paid_price, b.lowest_paid_price, false));
        }
        PricingSort::PriceDesc => {
            results.sort_by(|a, b| by_price(a.lowest_paid_price, b.lowest_paid_price, true));
        }
    }

    let prices = || results.iter().filter_map(|result| result.lowest_paid_price);
    let summary = PricingSummary {
        total_with_pricing: results.len(),
        with_free_tier: results.iter().filter(|r| r.has_free_tier).count(),
        with_enterprise: results.iter().filter(|r| r.has_enterprise).count(),
        price_range: PriceRange {
            min: prices().reduce(f64::min),
            max: prices().reduce(f64::max),
        },
    };

    PricingView { results, summary }
}
