use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Metered utility shown on the dashboard. The serialized form is the key used in the data source
/// path (`/api/data/{key}`) and as column header in the readings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnergyType {
    #[serde(rename = "strom")]
    Electricity,
    #[serde(rename = "gas")]
    Gas,
    #[serde(rename = "wasser")]
    Water,
    #[serde(rename = "einspeisung")]
    FeedIn,
    #[serde(rename = "dle")]
    DistrictHeat,
    #[serde(rename = "garten")]
    Garden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    #[serde(rename = "kWh")]
    KiloWattHours,
    #[serde(rename = "m³")]
    CubicMeters,
    #[serde(rename = "Einheit")]
    MeterUnits,
}

impl EnergyType {
    pub fn variants() -> &'static [Self] {
        &[
            EnergyType::Electricity,
            EnergyType::Gas,
            EnergyType::Water,
            EnergyType::FeedIn,
            EnergyType::DistrictHeat,
            EnergyType::Garden,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            EnergyType::Electricity => "strom",
            EnergyType::Gas => "gas",
            EnergyType::Water => "wasser",
            EnergyType::FeedIn => "einspeisung",
            EnergyType::DistrictHeat => "dle",
            EnergyType::Garden => "garten",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::variants().iter().find(|t| t.key() == key).copied()
    }

    pub fn unit(&self) -> Unit {
        match self {
            EnergyType::Electricity | EnergyType::FeedIn => Unit::KiloWattHours,
            EnergyType::Gas | EnergyType::Water | EnergyType::Garden => Unit::CubicMeters,
            EnergyType::DistrictHeat => Unit::MeterUnits,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EnergyType::Electricity => "Stromverbrauch",
            EnergyType::Gas => "Gasverbrauch",
            EnergyType::Water => "Wasserverbrauch",
            EnergyType::FeedIn => "Einspeisung",
            EnergyType::DistrictHeat => "DLE",
            EnergyType::Garden => "Garten",
        }
    }

    //column title of the readings list
    pub fn column_title(&self) -> &'static str {
        match self {
            EnergyType::Electricity => "Strom",
            EnergyType::Gas => "Gas",
            EnergyType::Water => "Wasser",
            EnergyType::FeedIn => "Einspeisung",
            EnergyType::DistrictHeat => "DLE",
            EnergyType::Garden => "Garten",
        }
    }

    pub fn fill_color(&self) -> &'static str {
        match self {
            EnergyType::Electricity | EnergyType::Garden => "rgba(75, 192, 192, 0.6)",
            EnergyType::Gas => "rgba(255, 159, 64, 0.6)",
            EnergyType::Water => "rgba(54, 162, 235, 0.6)",
            EnergyType::FeedIn => "rgba(153, 102, 255, 0.6)",
            EnergyType::DistrictHeat => "rgba(255, 99, 132, 0.6)",
        }
    }

    pub fn border_color(&self) -> &'static str {
        match self {
            EnergyType::Electricity | EnergyType::Garden => "rgba(75, 192, 192, 1)",
            EnergyType::Gas => "rgba(255, 159, 64, 1)",
            EnergyType::Water => "rgba(54, 162, 235, 1)",
            EnergyType::FeedIn => "rgba(153, 102, 255, 1)",
            EnergyType::DistrictHeat => "rgba(255, 99, 132, 1)",
        }
    }
}

impl Display for EnergyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Unit::KiloWattHours => "kWh",
            Unit::CubicMeters => "m³",
            Unit::MeterUnits => "Einheit",
        };
        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn key_matches_serialized_form() {
        for energy_type in EnergyType::variants() {
            assert_json_eq!(energy_type, json!(energy_type.key()));
        }
    }

    #[test]
    fn from_key_resolves_all_variants() {
        for energy_type in EnergyType::variants() {
            assert_eq!(EnergyType::from_key(energy_type.key()), Some(*energy_type));
        }
        assert_eq!(EnergyType::from_key("oil"), None);
    }

    #[test]
    fn deserialize_path_segment() {
        let energy_type: EnergyType = serde_json::from_value(json!("einspeisung")).unwrap();
        assert_eq!(energy_type, EnergyType::FeedIn);
    }

    #[test]
    fn units() {
        assert_eq!(EnergyType::Electricity.unit().to_string(), "kWh");
        assert_eq!(EnergyType::Water.unit().to_string(), "m³");
        assert_eq!(EnergyType::DistrictHeat.unit().to_string(), "Einheit");
        assert_json_eq!(EnergyType::Gas.unit(), json!("m³"));
    }
}
