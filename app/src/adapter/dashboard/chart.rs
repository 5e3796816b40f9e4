use serde::Serialize;

use crate::core::aggregate::{AvgMonthlySeries, CumulativeSeries, MonthlySeries, YearlySeries};
use crate::core::energy::{EnergyType, Unit};

/// Chart definition in the shape chart frontends consume: labels on the x-axis plus one or more
/// datasets, with the unit as y-axis title.
#[derive(Debug, Clone, Serialize)]
pub struct ChartPayload {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub unit: Unit,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: &'static str,
    pub border_color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
}

pub fn yearly_chart(energy_type: EnergyType, series: &YearlySeries) -> ChartPayload {
    ChartPayload {
        kind: ChartKind::Bar,
        unit: energy_type.unit(),
        labels: series.labels.clone(),
        datasets: vec![ChartDataset {
            label: format!("Jährlicher {}", energy_type.display_name()),
            data: series.values.clone(),
            background_color: energy_type.fill_color(),
            border_color: energy_type.border_color(),
            fill: None,
        }],
    }
}

pub fn monthly_chart(energy_type: EnergyType, series: &MonthlySeries) -> ChartPayload {
    ChartPayload {
        kind: ChartKind::Line,
        unit: energy_type.unit(),
        labels: month_labels(&series.labels),
        datasets: series
            .datasets
            .iter()
            .map(|dataset| ChartDataset {
                label: dataset.year.clone(),
                data: dataset.values.to_vec(),
                background_color: dataset.color,
                border_color: dataset.color,
                fill: Some(false),
            })
            .collect(),
    }
}

pub fn avg_monthly_chart(energy_type: EnergyType, series: &AvgMonthlySeries) -> ChartPayload {
    ChartPayload {
        kind: ChartKind::Bar,
        unit: energy_type.unit(),
        labels: month_labels(&series.labels),
        datasets: vec![ChartDataset {
            label: format!("Durchschnittlicher {}", energy_type.display_name()),
            data: series.values.to_vec(),
            background_color: energy_type.fill_color(),
            border_color: energy_type.border_color(),
            fill: None,
        }],
    }
}

pub fn cumulative_chart(energy_type: EnergyType, series: &CumulativeSeries) -> ChartPayload {
    ChartPayload {
        kind: ChartKind::Line,
        unit: energy_type.unit(),
        labels: series.labels.clone(),
        datasets: vec![ChartDataset {
            label: format!("Kumulativer {}", energy_type.display_name()),
            data: series.values.clone(),
            background_color: energy_type.fill_color(),
            border_color: energy_type.border_color(),
            fill: Some(false),
        }],
    }
}

fn month_labels(labels: &[&'static str; 12]) -> Vec<String> {
    labels.iter().map(|l| l.to_string()).collect()
}
