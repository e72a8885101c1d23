use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One spreadsheet/CSV row before cleaning. Headers may be Spanish or
/// English, so every column carries the aliases seen in real exports.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "fecha", alias = "Fecha", alias = "date", alias = "Date")]
    pub date: Option<String>,
    #[serde(rename = "marca", alias = "Marca", alias = "brand", alias = "Brand")]
    pub brand: Option<String>,
    #[serde(rename = "modelo", alias = "Modelo", alias = "model", alias = "Model")]
    pub model: Option<String>,
    #[serde(
        rename = "tipo_vehiculo",
        alias = "Tipo de Vehículo",
        alias = "tipo",
        alias = "type",
        alias = "vehicleType",
        alias = "vehicle_type"
    )]
    pub vehicle_type: Option<String>,
    #[serde(rename = "unidades", alias = "Unidades", alias = "units", alias = "Units")]
    pub units: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub id: String,
    pub date: String,
    pub brand: String,
    pub model: String,
    pub vehicle_type: String,
    pub units: u64,
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KpiSet {
    pub total_vehicles: u64,
    pub total_brands: usize,
    pub total_models: usize,
    pub monthly_variation: f64,
    pub yearly_variation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingItem {
    pub name: String,
    pub value: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth: Option<f64>,
}

impl RankingItem {
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
            percentage: None,
            growth: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketShareItem {
    pub name: String,
    pub value: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewVehicle {
    pub brand: String,
    pub model: String,
    pub vehicle_type: String,
    pub units: u64,
}

// Display rows. Numbers are pre-formatted strings so the CSV export and the
// console preview show exactly the same text.

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct KpiRow {
    #[serde(rename = "Metric")]
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RankingRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MarketShareRow {
    #[serde(rename = "Brand")]
    #[tabled(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Units")]
    #[tabled(rename = "Units")]
    pub units: String,
    #[serde(rename = "SharePct")]
    #[tabled(rename = "SharePct")]
    pub share_pct: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct GrowthRow {
    #[serde(rename = "Brand")]
    #[tabled(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Units")]
    #[tabled(rename = "Units")]
    pub units: String,
    #[serde(rename = "GrowthPct")]
    #[tabled(rename = "GrowthPct")]
    pub growth_pct: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct NewVehicleRow {
    #[serde(rename = "Brand")]
    #[tabled(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Model")]
    #[tabled(rename = "Model")]
    pub model: String,
    #[serde(rename = "VehicleType")]
    #[tabled(rename = "VehicleType")]
    pub vehicle_type: String,
    #[serde(rename = "Units")]
    #[tabled(rename = "Units")]
    pub units: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub reference_year: i32,
    pub reference_month: u32,
    pub total_records: usize,
    pub kpis: KpiSet,
    pub insights: Vec<String>,
}
