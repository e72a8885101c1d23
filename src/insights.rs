//! Natural-language summaries built on top of the aggregations in
//! [`crate::reports`].

use crate::reports::{compute_brand_growth, detect_new_vehicles, rank_brands, rank_vehicle_types};
use crate::types::ImportRecord;
use crate::util::format_int;
use std::fmt;
use tracing::debug;

/// One notable pattern found in the data, with the values it reports.
#[derive(Debug, Clone, PartialEq)]
pub enum Insight {
    MarketLeader { brand: String, units: u64 },
    GrowthLeader { brand: String, growth: f64 },
    DominantVehicleType { vehicle_type: String, units: u64 },
    NewModels { count: usize },
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::MarketLeader { brand, units } => write!(
                f,
                "{} leads the market with {} units imported.",
                brand,
                format_int(*units)
            ),
            Insight::GrowthLeader { brand, growth } => write!(
                f,
                "{} leads growth with a {:.1}% increase in the latest month.",
                brand, growth
            ),
            Insight::DominantVehicleType {
                vehicle_type,
                units,
            } => write!(
                f,
                "Vehicles of type {} dominate imports with {} units.",
                vehicle_type,
                format_int(*units)
            ),
            Insight::NewModels { count } => write!(
                f,
                "{} new models were detected in the market this month.",
                count
            ),
        }
    }
}

/// Insights in fixed order: market leader, growth leader, dominant vehicle
/// type, new models. Each is present only when its source data is.
pub fn detect_insights(
    records: &[ImportRecord],
    reference_year: i32,
    reference_month: u32,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let Some(leader) = rank_brands(records, 3).into_iter().next() {
        insights.push(Insight::MarketLeader {
            brand: leader.name,
            units: leader.value,
        });
    }

    let growth_leader = compute_brand_growth(records, reference_year, reference_month)
        .into_iter()
        .find_map(|b| match b.growth {
            Some(g) if g > 0.0 => Some((b.name, g)),
            _ => None,
        });
    if let Some((brand, growth)) = growth_leader {
        insights.push(Insight::GrowthLeader { brand, growth });
    }

    if let Some(top_type) = rank_vehicle_types(records).into_iter().next() {
        insights.push(Insight::DominantVehicleType {
            vehicle_type: top_type.name,
            units: top_type.value,
        });
    }

    let new_models = detect_new_vehicles(records, reference_year, reference_month).len();
    if new_models > 0 {
        insights.push(Insight::NewModels { count: new_models });
    }

    debug!(count = insights.len(), reference_year, reference_month, "insights generated");
    insights
}

pub fn generate_insights(
    records: &[ImportRecord],
    reference_year: i32,
    reference_month: u32,
) -> Vec<String> {
    detect_insights(records, reference_year, reference_month)
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(brand: &str, model: &str, vtype: &str, units: u64, year: i32, month: u32) -> ImportRecord {
        ImportRecord {
            id: String::new(),
            date: String::new(),
            brand: brand.to_string(),
            model: model.to_string(),
            vehicle_type: vtype.to_string(),
            units,
            year,
            month,
        }
    }

    #[test]
    fn empty_input_has_no_insights() {
        assert!(generate_insights(&[], 2024, 10).is_empty());
    }

    #[test]
    fn all_four_insights_in_order() {
        let records = vec![
            rec("Toyota", "Hilux", "Pickup", 1200, 2024, 10),
            rec("Toyota", "Hilux", "Pickup", 1000, 2024, 9),
            rec("Toyota", "Hilux", "Pickup", 900, 2023, 10),
            rec("BYD", "Seal", "EV", 30, 2024, 10),
        ];
        let insights = detect_insights(&records, 2024, 10);
        assert_eq!(
            insights,
            vec![
                Insight::MarketLeader { brand: "Toyota".into(), units: 3100 },
                Insight::GrowthLeader { brand: "Toyota".into(), growth: 20.0 },
                Insight::DominantVehicleType { vehicle_type: "Pickup".into(), units: 3100 },
                Insight::NewModels { count: 1 },
            ]
        );

        let text = generate_insights(&records, 2024, 10);
        assert_eq!(text[0], "Toyota leads the market with 3,100 units imported.");
        assert_eq!(text[1], "Toyota leads growth with a 20.0% increase in the latest month.");
        assert_eq!(text[2], "Vehicles of type Pickup dominate imports with 3,100 units.");
        assert_eq!(text[3], "1 new models were detected in the market this month.");
    }

    #[test]
    fn growth_leader_is_first_positive_brand() {
        let records = vec![
            rec("Kia", "Rio", "Sedan", 50, 2024, 10),
            rec("Kia", "Rio", "Sedan", 100, 2024, 9),
            rec("Ford", "Ranger", "Pickup", 110, 2024, 10),
            rec("Ford", "Ranger", "Pickup", 100, 2024, 9),
        ];
        let insights = detect_insights(&records, 2024, 10);
        assert!(insights.contains(&Insight::GrowthLeader { brand: "Ford".into(), growth: 10.0 }));
    }

    #[test]
    fn no_growth_insight_when_nothing_grew() {
        let records = vec![
            rec("Kia", "Rio", "Sedan", 50, 2024, 10),
            rec("Kia", "Rio", "Sedan", 100, 2024, 9),
            rec("Kia", "Rio", "Sedan", 10, 2023, 1),
        ];
        let insights = detect_insights(&records, 2024, 10);
        assert_eq!(insights.len(), 2);
        assert!(!insights
            .iter()
            .any(|i| matches!(i, Insight::GrowthLeader { .. } | Insight::NewModels { .. })));
    }

    #[test]
    fn only_history_outside_reference_month() {
        // Data exists, but nothing for the reference month: leader and type only.
        let records = vec![rec("Mazda", "CX-5", "SUV", 40, 2023, 5)];
        let text = generate_insights(&records, 2024, 10);
        assert_eq!(text.len(), 2);
        assert!(text[0].starts_with("Mazda leads the market"));
        assert!(text[1].contains("SUV"));
    }
}
