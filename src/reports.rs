//! Aggregations over import records.
//!
//! Every function here is pure: it borrows the record slice, builds a local
//! accumulator, and returns a freshly allocated result. Groups are kept in
//! order of first appearance and sorted with a stable sort, so equal
//! aggregates come out in the order they were first seen in the input.

use crate::types::{ImportRecord, KpiSet, MarketShareItem, NewVehicle, RankingItem};
use crate::util::{percent_change, percent_of, previous_month};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

pub const DEFAULT_RANKING_LIMIT: usize = 10;

/// Running sums keyed by name, remembering first-seen order.
#[derive(Default)]
struct GroupSum {
    index: HashMap<String, usize>,
    totals: Vec<(String, u64)>,
}

impl GroupSum {
    fn add(&mut self, key: &str, units: u64) {
        match self.index.get(key) {
            Some(&i) => self.totals[i].1 += units,
            None => {
                self.index.insert(key.to_string(), self.totals.len());
                self.totals.push((key.to_string(), units));
            }
        }
    }

    fn get(&self, key: &str) -> u64 {
        self.index.get(key).map(|&i| self.totals[i].1).unwrap_or(0)
    }

    fn grand_total(&self) -> u64 {
        self.totals.iter().map(|(_, v)| *v).sum()
    }

    /// Consume into `(name, total)` pairs, largest first.
    fn into_sorted(self) -> Vec<(String, u64)> {
        let mut totals = self.totals;
        totals.sort_by(|a, b| b.1.cmp(&a.1));
        totals
    }
}

fn sum_by<'a, I, F>(records: I, key: F) -> GroupSum
where
    I: IntoIterator<Item = &'a ImportRecord>,
    F: Fn(&ImportRecord) -> String,
{
    let mut acc = GroupSum::default();
    for r in records {
        acc.add(&key(r), r.units);
    }
    acc
}

fn total_units<'a, I>(records: I) -> u64
where
    I: IntoIterator<Item = &'a ImportRecord>,
{
    records.into_iter().map(|r| r.units).sum()
}

fn in_month(r: &ImportRecord, year: i32, month: u32) -> bool {
    r.year == year && r.month == month
}

fn to_ranking(totals: Vec<(String, u64)>) -> Vec<RankingItem> {
    totals
        .into_iter()
        .map(|(name, value)| RankingItem::new(name, value))
        .collect()
}

pub fn compute_kpis(records: &[ImportRecord], reference_year: i32, reference_month: u32) -> KpiSet {
    let (prev_year, prev_month) = previous_month(reference_year, reference_month);

    let current_year: Vec<&ImportRecord> = records
        .iter()
        .filter(|r| r.year == reference_year)
        .collect();
    let total_vehicles = total_units(current_year.iter().copied());
    let brands: HashSet<&str> = current_year.iter().map(|r| r.brand.as_str()).collect();
    let models: HashSet<(&str, &str)> = current_year
        .iter()
        .map(|r| (r.brand.as_str(), r.model.as_str()))
        .collect();

    let current_month_total = total_units(
        records
            .iter()
            .filter(|r| in_month(r, reference_year, reference_month)),
    );
    let previous_month_total =
        total_units(records.iter().filter(|r| in_month(r, prev_year, prev_month)));
    let previous_year_total =
        total_units(records.iter().filter(|r| r.year == reference_year - 1));

    KpiSet {
        total_vehicles,
        total_brands: brands.len(),
        total_models: models.len(),
        monthly_variation: percent_change(current_month_total, previous_month_total),
        yearly_variation: percent_change(total_vehicles, previous_year_total),
    }
}

pub fn rank_brands(records: &[ImportRecord], limit: usize) -> Vec<RankingItem> {
    let mut totals = sum_by(records, |r| r.brand.clone()).into_sorted();
    totals.truncate(limit);
    to_ranking(totals)
}

pub fn rank_models(records: &[ImportRecord], limit: usize) -> Vec<RankingItem> {
    let mut totals = sum_by(records, |r| format!("{} {}", r.brand, r.model)).into_sorted();
    totals.truncate(limit);
    to_ranking(totals)
}

pub fn rank_vehicle_types(records: &[ImportRecord]) -> Vec<RankingItem> {
    to_ranking(sum_by(records, |r| r.vehicle_type.clone()).into_sorted())
}

/// Distinct models per brand; the value is a model count, not units.
pub fn count_models_per_brand(records: &[ImportRecord]) -> Vec<RankingItem> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut brands: Vec<(&str, HashSet<&str>)> = Vec::new();
    for r in records {
        let i = *index.entry(r.brand.as_str()).or_insert_with(|| {
            brands.push((r.brand.as_str(), HashSet::new()));
            brands.len() - 1
        });
        brands[i].1.insert(r.model.as_str());
    }

    let mut counts: Vec<(String, u64)> = brands
        .into_iter()
        .map(|(brand, models)| (brand.to_string(), models.len() as u64))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    to_ranking(counts)
}

/// Share of all units per brand. With a zero grand total every share is 0.
pub fn compute_market_share(records: &[ImportRecord]) -> Vec<MarketShareItem> {
    let acc = sum_by(records, |r| r.brand.clone());
    let grand_total = acc.grand_total();
    acc.into_sorted()
        .into_iter()
        .map(|(name, value)| MarketShareItem {
            percentage: percent_of(value, grand_total),
            name,
            value,
        })
        .collect()
}

/// Reference-month records whose `(brand, model)` never appears in the
/// previous calendar year.
///
/// This is a heuristic: a long-running model that simply was not imported
/// last year is reported as new too.
pub fn detect_new_vehicles(
    records: &[ImportRecord],
    reference_year: i32,
    reference_month: u32,
) -> Vec<NewVehicle> {
    let last_year: HashSet<(&str, &str)> = records
        .iter()
        .filter(|r| r.year == reference_year - 1)
        .map(|r| (r.brand.as_str(), r.model.as_str()))
        .collect();

    records
        .iter()
        .filter(|r| in_month(r, reference_year, reference_month))
        .filter(|r| !last_year.contains(&(r.brand.as_str(), r.model.as_str())))
        .map(|r| NewVehicle {
            brand: r.brand.clone(),
            model: r.model.clone(),
            vehicle_type: r.vehicle_type.clone(),
            units: r.units,
        })
        .collect()
}

/// Month-over-month growth for every brand imported in the reference month.
/// Brands with no units this month are left out even if they sold last month.
pub fn compute_brand_growth(
    records: &[ImportRecord],
    reference_year: i32,
    reference_month: u32,
) -> Vec<RankingItem> {
    let (prev_year, prev_month) = previous_month(reference_year, reference_month);
    let current = sum_by(
        records
            .iter()
            .filter(|r| in_month(r, reference_year, reference_month)),
        |r| r.brand.clone(),
    );
    let previous = sum_by(
        records.iter().filter(|r| in_month(r, prev_year, prev_month)),
        |r| r.brand.clone(),
    );

    let mut items: Vec<RankingItem> = current
        .totals
        .iter()
        .map(|(brand, value)| RankingItem {
            name: brand.clone(),
            value: *value,
            percentage: None,
            growth: Some(percent_change(*value, previous.get(brand))),
        })
        .collect();

    items.sort_by(|a, b| {
        let (ga, gb) = (a.growth.unwrap_or(0.0), b.growth.unwrap_or(0.0));
        gb.partial_cmp(&ga).unwrap_or(Ordering::Equal)
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(brand: &str, model: &str, vtype: &str, units: u64, year: i32, month: u32) -> ImportRecord {
        ImportRecord {
            id: format!("{}-{}-{}-{}", brand, model, year, month),
            date: format!("{}-{:02}-01", year, month),
            brand: brand.to_string(),
            model: model.to_string(),
            vehicle_type: vtype.to_string(),
            units,
            year,
            month,
        }
    }

    fn sample() -> Vec<ImportRecord> {
        vec![
            rec("Toyota", "Hilux", "Pickup", 100, 2024, 10),
            rec("Toyota", "RAV4", "SUV", 50, 2024, 10),
            rec("Kia", "Rio", "Sedan", 70, 2024, 10),
            rec("Toyota", "Hilux", "Pickup", 80, 2024, 9),
            rec("Kia", "Rio", "Sedan", 100, 2024, 9),
            rec("Ford", "Ranger", "Pickup", 40, 2024, 9),
            rec("Toyota", "Hilux", "Pickup", 200, 2023, 6),
            rec("Kia", "Rio", "Sedan", 30, 2023, 11),
        ]
    }

    #[test]
    fn kpis_for_empty_input_are_zero() {
        assert_eq!(compute_kpis(&[], 2024, 10), KpiSet::default());
    }

    #[test]
    fn kpis_over_sample() {
        let k = compute_kpis(&sample(), 2024, 10);
        assert_eq!(k.total_vehicles, 440);
        assert_eq!(k.total_brands, 3);
        assert_eq!(k.total_models, 4);
        // 220 this month vs 220 last month.
        assert_eq!(k.monthly_variation, 0.0);
        // 440 this year vs 230 last year.
        assert!((k.yearly_variation - (210.0 / 230.0 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn kpi_variation_is_zero_without_baseline() {
        let records = vec![rec("BYD", "Tang", "EV", 25, 2024, 3)];
        let k = compute_kpis(&records, 2024, 3);
        assert_eq!(k.total_vehicles, 25);
        assert_eq!(k.monthly_variation, 0.0);
        assert_eq!(k.yearly_variation, 0.0);
    }

    #[test]
    fn kpi_previous_month_of_january_is_last_december() {
        let records = vec![
            rec("Kia", "Rio", "Sedan", 150, 2024, 1),
            rec("Kia", "Rio", "Sedan", 100, 2023, 12),
        ];
        let k = compute_kpis(&records, 2024, 1);
        assert_eq!(k.monthly_variation, 50.0);
    }

    #[test]
    fn brand_ranking_is_sorted_and_limited() {
        let ranking = rank_brands(&sample(), 2);
        let names: Vec<&str> = ranking.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Toyota", "Kia"]);
        assert_eq!(ranking[0].value, 430);
        assert!(ranking.iter().all(|r| r.percentage.is_none() && r.growth.is_none()));
    }

    #[test]
    fn brand_ranking_covers_all_units_when_limit_is_large() {
        let records = sample();
        let all: u64 = records.iter().map(|r| r.units).sum();
        let full: u64 = rank_brands(&records, DEFAULT_RANKING_LIMIT).iter().map(|r| r.value).sum();
        let top1: u64 = rank_brands(&records, 1).iter().map(|r| r.value).sum();
        assert_eq!(full, all);
        assert!(top1 <= all);
        assert!(rank_brands(&records, 0).is_empty());
    }

    #[test]
    fn model_ranking_uses_brand_and_model() {
        let ranking = rank_models(&sample(), DEFAULT_RANKING_LIMIT);
        assert_eq!(ranking[0], RankingItem::new("Toyota Hilux", 380));
        assert_eq!(ranking[1], RankingItem::new("Kia Rio", 200));
        assert_eq!(ranking.len(), 4);
    }

    #[test]
    fn vehicle_type_ties_keep_first_appearance() {
        let records = vec![
            rec("Kia", "Sportage", "SUV", 100, 2024, 1),
            rec("Kia", "Rio", "Sedan", 300, 2024, 1),
            rec("Kia", "Sorento", "SUV", 200, 2024, 2),
            rec("Kia", "Picanto", "Hatchback", 10, 2024, 2),
        ];
        let ranking = rank_vehicle_types(&records);
        let names: Vec<&str> = ranking.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["SUV", "Sedan", "Hatchback"]);
        assert_eq!(ranking[0].value, 300);
        assert_eq!(ranking[1].value, 300);
    }

    #[test]
    fn models_per_brand_counts_distinct_models() {
        let mut records = sample();
        records.push(rec("Ford", "Ranger", "Pickup", 999, 2024, 8));
        let counts = count_models_per_brand(&records);
        assert_eq!(
            counts,
            vec![
                RankingItem::new("Toyota", 2),
                RankingItem::new("Kia", 1),
                RankingItem::new("Ford", 1),
            ]
        );
    }

    #[test]
    fn market_share_two_brands() {
        let records = vec![
            rec("A", "One", "SUV", 60, 2024, 1),
            rec("B", "Two", "SUV", 40, 2024, 1),
        ];
        let share = compute_market_share(&records);
        assert_eq!(
            share,
            vec![
                MarketShareItem { name: "A".into(), value: 60, percentage: 60.0 },
                MarketShareItem { name: "B".into(), value: 40, percentage: 40.0 },
            ]
        );
    }

    #[test]
    fn market_share_sums_to_one_hundred() {
        let share = compute_market_share(&sample());
        let total: f64 = share.iter().map(|s| s.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert_eq!(share[0].name, "Toyota");
    }

    #[test]
    fn market_share_with_zero_total_is_zero() {
        let records = vec![
            rec("A", "One", "SUV", 0, 2024, 1),
            rec("B", "Two", "SUV", 0, 2024, 1),
        ];
        let share = compute_market_share(&records);
        assert_eq!(share.len(), 2);
        assert!(share.iter().all(|s| s.percentage == 0.0));
        assert!(compute_market_share(&[]).is_empty());
    }

    #[test]
    fn new_vehicles_exclude_last_year_pairs() {
        let mut records = sample();
        records.push(rec("BYD", "Atto 3", "EV", 15, 2024, 10));
        records.push(rec("Kia", "Rio", "Sedan", 5, 2024, 10));
        let found = detect_new_vehicles(&records, 2024, 10);

        // Rio and Hilux were imported in 2023; RAV4 and Atto 3 were not.
        assert_eq!(
            found,
            vec![
                NewVehicle {
                    brand: "Toyota".into(),
                    model: "RAV4".into(),
                    vehicle_type: "SUV".into(),
                    units: 50,
                },
                NewVehicle {
                    brand: "BYD".into(),
                    model: "Atto 3".into(),
                    vehicle_type: "EV".into(),
                    units: 15,
                },
            ]
        );
        let last_year: HashSet<(&str, &str)> = records
            .iter()
            .filter(|r| r.year == 2023)
            .map(|r| (r.brand.as_str(), r.model.as_str()))
            .collect();
        assert!(found
            .iter()
            .all(|v| !last_year.contains(&(v.brand.as_str(), v.model.as_str()))));
    }

    #[test]
    fn new_vehicles_keep_one_entry_per_record() {
        let records = vec![
            rec("Chery", "Tiggo 7", "SUV", 10, 2024, 10),
            rec("Chery", "Tiggo 7", "SUV", 12, 2024, 10),
        ];
        assert_eq!(detect_new_vehicles(&records, 2024, 10).len(), 2);
    }

    #[test]
    fn brand_growth_single_brand() {
        let records = vec![
            rec("Toyota", "Hilux", "Pickup", 100, 2024, 10),
            rec("Toyota", "Hilux", "Pickup", 80, 2024, 9),
        ];
        assert_eq!(
            compute_brand_growth(&records, 2024, 10),
            vec![RankingItem {
                name: "Toyota".into(),
                value: 100,
                percentage: None,
                growth: Some(25.0),
            }]
        );
    }

    #[test]
    fn brand_growth_skips_brands_absent_this_month() {
        let growth = compute_brand_growth(&sample(), 2024, 10);
        let names: Vec<&str> = growth.iter().map(|g| g.name.as_str()).collect();
        // Ford sold in September only.
        assert_eq!(names, ["Toyota", "Kia"]);
        assert_eq!(growth[0].growth, Some(87.5));
        assert_eq!(growth[1].growth, Some(-30.0));
    }

    #[test]
    fn brand_growth_without_previous_month_is_zero() {
        let records = vec![
            rec("Mazda", "CX-5", "SUV", 10, 2024, 1),
            rec("Nissan", "Kicks", "SUV", 20, 2024, 1),
            rec("Nissan", "Kicks", "SUV", 10, 2023, 12),
        ];
        let growth = compute_brand_growth(&records, 2024, 1);
        assert_eq!(growth[0].name, "Nissan");
        assert_eq!(growth[0].growth, Some(100.0));
        assert_eq!(growth[1].name, "Mazda");
        assert_eq!(growth[1].growth, Some(0.0));
    }
}
