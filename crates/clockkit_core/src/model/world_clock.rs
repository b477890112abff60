//! World clock entries and the built-in city catalog.
//!
//! # Invariants
//! - A world clock list holds at most one entry per `timezone`.
//! - `timezone` is an IANA identifier resolved through `chrono-tz`.

use serde::{Deserialize, Serialize};

/// One city shown in the world clock list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldClockEntry {
    pub city: String,
    pub country: String,
    pub timezone: String,
    pub flag: String,
}

/// Static catalog row; converted into an owned entry when added to a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCity {
    pub city: &'static str,
    pub country: &'static str,
    pub timezone: &'static str,
    pub flag: &'static str,
}

impl CatalogCity {
    pub fn to_entry(self) -> WorldClockEntry {
        WorldClockEntry {
            city: self.city.to_string(),
            country: self.country.to_string(),
            timezone: self.timezone.to_string(),
            flag: self.flag.to_string(),
        }
    }
}

const fn city(
    city: &'static str,
    country: &'static str,
    timezone: &'static str,
    flag: &'static str,
) -> CatalogCity {
    CatalogCity {
        city,
        country,
        timezone,
        flag,
    }
}

/// Cities offered by the "add clock" picker.
pub const CITY_CATALOG: &[CatalogCity] = &[
    city("New York", "United States", "America/New_York", "🇺🇸"),
    city("Los Angeles", "United States", "America/Los_Angeles", "🇺🇸"),
    city("Chicago", "United States", "America/Chicago", "🇺🇸"),
    city("Denver", "United States", "America/Denver", "🇺🇸"),
    city("Honolulu", "United States", "Pacific/Honolulu", "🇺🇸"),
    city("Anchorage", "United States", "America/Anchorage", "🇺🇸"),
    city("London", "United Kingdom", "Europe/London", "🇬🇧"),
    city("Paris", "France", "Europe/Paris", "🇫🇷"),
    city("Berlin", "Germany", "Europe/Berlin", "🇩🇪"),
    city("Rome", "Italy", "Europe/Rome", "🇮🇹"),
    city("Madrid", "Spain", "Europe/Madrid", "🇪🇸"),
    city("Amsterdam", "Netherlands", "Europe/Amsterdam", "🇳🇱"),
    city("Moscow", "Russia", "Europe/Moscow", "🇷🇺"),
    city("Istanbul", "Turkey", "Europe/Istanbul", "🇹🇷"),
    city("Dubai", "UAE", "Asia/Dubai", "🇦🇪"),
    city("Riyadh", "Saudi Arabia", "Asia/Riyadh", "🇸🇦"),
    city("Karachi", "Pakistan", "Asia/Karachi", "🇵🇰"),
    city("Mumbai", "India", "Asia/Kolkata", "🇮🇳"),
    city("Delhi", "India", "Asia/Kolkata", "🇮🇳"),
    city("Dhaka", "Bangladesh", "Asia/Dhaka", "🇧🇩"),
    city("Bangkok", "Thailand", "Asia/Bangkok", "🇹🇭"),
    city("Singapore", "Singapore", "Asia/Singapore", "🇸🇬"),
    city("Hong Kong", "China", "Asia/Hong_Kong", "🇭🇰"),
    city("Shanghai", "China", "Asia/Shanghai", "🇨🇳"),
    city("Beijing", "China", "Asia/Shanghai", "🇨🇳"),
    city("Tokyo", "Japan", "Asia/Tokyo", "🇯🇵"),
    city("Seoul", "South Korea", "Asia/Seoul", "🇰🇷"),
    city("Sydney", "Australia", "Australia/Sydney", "🇦🇺"),
    city("Melbourne", "Australia", "Australia/Melbourne", "🇦🇺"),
    city("Auckland", "New Zealand", "Pacific/Auckland", "🇳🇿"),
    city("Sao Paulo", "Brazil", "America/Sao_Paulo", "🇧🇷"),
    city(
        "Buenos Aires",
        "Argentina",
        "America/Argentina/Buenos_Aires",
        "🇦🇷",
    ),
    city("Mexico City", "Mexico", "America/Mexico_City", "🇲🇽"),
    city("Toronto", "Canada", "America/Toronto", "🇨🇦"),
    city("Vancouver", "Canada", "America/Vancouver", "🇨🇦"),
    city("Cairo", "Egypt", "Africa/Cairo", "🇪🇬"),
    city("Lagos", "Nigeria", "Africa/Lagos", "🇳🇬"),
    city("Nairobi", "Kenya", "Africa/Nairobi", "🇰🇪"),
    city("Johannesburg", "South Africa", "Africa/Johannesburg", "🇿🇦"),
    city("Kathmandu", "Nepal", "Asia/Kathmandu", "🇳🇵"),
    city("Jakarta", "Indonesia", "Asia/Jakarta", "🇮🇩"),
    city("Kuala Lumpur", "Malaysia", "Asia/Kuala_Lumpur", "🇲🇾"),
    city("Manila", "Philippines", "Asia/Manila", "🇵🇭"),
    city("Taipei", "Taiwan", "Asia/Taipei", "🇹🇼"),
    city("Colombo", "Sri Lanka", "Asia/Colombo", "🇱🇰"),
];

/// Case-insensitive substring search over city and country names.
///
/// An empty query returns the whole catalog.
pub fn search_catalog(query: &str) -> Vec<CatalogCity> {
    let needle = query.trim().to_lowercase();
    CITY_CATALOG
        .iter()
        .copied()
        .filter(|entry| {
            entry.city.to_lowercase().contains(needle.as_str())
                || entry.country.to_lowercase().contains(needle.as_str())
        })
        .collect()
}
