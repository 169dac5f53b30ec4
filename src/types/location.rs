//! Named geographic points the pipeline fetches weather for.

use crate::error::InvalidInput;
use std::fmt;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use paca_climate::LatLon;
///
/// let marseille = LatLon(43.2965, 5.3698);
/// assert_eq!(marseille.0, 43.2965); // Latitude
/// assert_eq!(marseille.1, 5.3698); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }

    /// True when both components are finite and inside the WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.0.is_finite()
            && self.1.is_finite()
            && (-90.0..=90.0).contains(&self.0)
            && (-180.0..=180.0).contains(&self.1)
    }
}

/// A named point whose daily weather is fetched and analysed.
///
/// The name doubles as the grouping key (`location` column) in every dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub coordinate: LatLon,
}

impl Location {
    pub fn new(name: impl Into<String>, coordinate: LatLon) -> Self {
        Self {
            name: name.into(),
            coordinate,
        }
    }

    /// The six reference cities of the Provence-Alpes-Côte d'Azur region.
    ///
    /// # Examples
    ///
    /// ```
    /// use paca_climate::Location;
    ///
    /// let cities = Location::paca_region();
    /// assert_eq!(cities.len(), 6);
    /// assert_eq!(cities[0].name, "Marseille");
    /// ```
    pub fn paca_region() -> Vec<Location> {
        PACA_CITIES
            .iter()
            .map(|(name, lat, lon)| Location::new(*name, LatLon(*lat, *lon)))
            .collect()
    }

    /// Looks up one of the PACA reference cities by name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput::UnknownLocation`] if no reference city has that name.
    pub fn by_name(name: &str) -> Result<Location, InvalidInput> {
        let wanted = name.trim();
        PACA_CITIES
            .iter()
            .find(|(city, _, _)| city.eq_ignore_ascii_case(wanted))
            .map(|(city, lat, lon)| Location::new(*city, LatLon(*lat, *lon)))
            .ok_or_else(|| InvalidInput::UnknownLocation(wanted.to_string()))
    }

    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.name.trim().is_empty() || !self.coordinate.is_valid() {
            return Err(InvalidInput::InvalidCoordinates {
                name: self.name.clone(),
                lat: self.coordinate.0,
                lon: self.coordinate.1,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.4}, {:.4})",
            self.name, self.coordinate.0, self.coordinate.1
        )
    }
}

const PACA_CITIES: [(&str, f64, f64); 6] = [
    ("Marseille", 43.2965, 5.3698),
    ("Nice", 43.7102, 7.2620),
    ("Toulon", 43.1242, 5.9280),
    ("Avignon", 43.9493, 4.8055),
    ("Gap", 44.5580, 6.0827),
    ("Digne-les-Bains", 44.0922, 6.2376),
];
