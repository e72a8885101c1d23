use crate::error::OutputError;
use crate::types::{
    GrowthRow, KpiRow, KpiSet, MarketShareItem, MarketShareRow, NewVehicle, NewVehicleRow,
    RankingItem, RankingRow,
};
use crate::util::{format_int, format_number};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), OutputError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), OutputError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Markdown table of the first `max_rows` rows, or `(no rows)`.
pub fn render_table_rows<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", render_table_rows(rows, max_rows));
}

pub fn kpi_rows(kpis: &KpiSet) -> Vec<KpiRow> {
    let row = |metric: &str, value: String| KpiRow {
        metric: metric.to_string(),
        value,
    };
    vec![
        row("Total vehicles imported", format_int(kpis.total_vehicles)),
        row("Active brands", format_int(kpis.total_brands)),
        row("Active models", format_int(kpis.total_models)),
        row(
            "Monthly variation %",
            format_number(kpis.monthly_variation, 1),
        ),
        row("Yearly variation %", format_number(kpis.yearly_variation, 1)),
    ]
}

pub fn ranking_rows(items: &[RankingItem]) -> Vec<RankingRow> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| RankingRow {
            rank: idx + 1,
            name: item.name.clone(),
            value: format_int(item.value),
        })
        .collect()
}

pub fn market_share_rows(items: &[MarketShareItem]) -> Vec<MarketShareRow> {
    items
        .iter()
        .map(|item| MarketShareRow {
            brand: item.name.clone(),
            units: format_int(item.value),
            share_pct: format_number(item.percentage, 2),
        })
        .collect()
}

pub fn growth_rows(items: &[RankingItem]) -> Vec<GrowthRow> {
    items
        .iter()
        .map(|item| GrowthRow {
            brand: item.name.clone(),
            units: format_int(item.value),
            growth_pct: format_number(item.growth.unwrap_or(0.0), 1),
        })
        .collect()
}

pub fn new_vehicle_rows(items: &[NewVehicle]) -> Vec<NewVehicleRow> {
    items
        .iter()
        .map(|v| NewVehicleRow {
            brand: v.brand.clone(),
            model: v.model.clone(),
            vehicle_type: v.vehicle_type.clone(),
            units: format_int(v.units),
        })
        .collect()
}
