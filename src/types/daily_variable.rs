//! The daily variables requested from the archive and the dataset columns they land in.

use std::fmt;

/// A daily aggregate requested from the Open-Meteo archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DailyVariable {
    /// Maximum air temperature at 2 m, °C.
    TemperatureMax,
    /// Minimum air temperature at 2 m, °C.
    TemperatureMin,
    /// Sum of daily precipitation, mm.
    PrecipitationSum,
    /// Maximum wind speed at 10 m, km/h.
    WindSpeedMax,
}

impl DailyVariable {
    pub const ALL: [DailyVariable; 4] = [
        DailyVariable::TemperatureMax,
        DailyVariable::TemperatureMin,
        DailyVariable::PrecipitationSum,
        DailyVariable::WindSpeedMax,
    ];

    /// Name used in the `daily` query parameter and in the response body.
    pub fn provider_name(&self) -> &'static str {
        match self {
            DailyVariable::TemperatureMax => "temperature_2m_max",
            DailyVariable::TemperatureMin => "temperature_2m_min",
            DailyVariable::PrecipitationSum => "precipitation_sum",
            DailyVariable::WindSpeedMax => "wind_speed_10m_max",
        }
    }

    /// Column the variable is stored under in the raw dataset.
    pub fn column_name(&self) -> &'static str {
        match self {
            DailyVariable::TemperatureMax => "temp_max",
            DailyVariable::TemperatureMin => "temp_min",
            DailyVariable::PrecipitationSum => "precipitation",
            DailyVariable::WindSpeedMax => "wind",
        }
    }

    /// Comma-separated list for the `daily` query parameter.
    pub(crate) fn query_value() -> String {
        Self::ALL
            .iter()
            .map(DailyVariable::provider_name)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Formats a variable using its provider name.
///
/// # Examples
///
/// ```
/// use paca_climate::DailyVariable;
///
/// assert_eq!(DailyVariable::PrecipitationSum.to_string(), "precipitation_sum");
/// ```
impl fmt::Display for DailyVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.provider_name())
    }
}
