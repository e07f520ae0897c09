//! Presentation helpers: icon selection, UV and moon phase labels, unit
//! conversions and day segmentation.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Icon categories chosen from the provider's free-text condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionIcon {
    Sun,
    Moon,
    Cloud,
    Rain,
    Drizzle,
    Snow,
}

impl ConditionIcon {
    /// Keyword match on the condition text. Clear skies and unknown
    /// conditions follow the day/night flag.
    pub fn from_condition(text: &str, is_day: bool) -> Self {
        let text = text.to_lowercase();
        let clear = if is_day { Self::Sun } else { Self::Moon };

        if text.contains("sunny") || text.contains("clear") {
            clear
        } else if text.contains("rain") {
            Self::Rain
        } else if text.contains("drizzle") {
            Self::Drizzle
        } else if text.contains("snow") || text.contains("sleet") || text.contains("blizzard") {
            Self::Snow
        } else if text.contains("cloud") || text.contains("overcast") {
            Self::Cloud
        } else {
            clear
        }
    }

    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Moon => "moon",
            Self::Cloud => "cloud",
            Self::Rain => "cloud_rain",
            Self::Drizzle => "cloud_drizzle",
            Self::Snow => "cloud_snow",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Sun => "☀",
            Self::Moon => "☾",
            Self::Cloud => "☁",
            Self::Rain | Self::Drizzle => "☂",
            Self::Snow => "❄",
        }
    }
}

/// UV index bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UvLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvLevel {
    pub fn from_index(uv: f64) -> Self {
        if uv <= 2.0 {
            Self::Low
        } else if uv <= 5.0 {
            Self::Moderate
        } else if uv <= 7.0 {
            Self::High
        } else if uv <= 10.0 {
            Self::VeryHigh
        } else {
            Self::Extreme
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
            Self::Extreme => "Extreme",
        }
    }

    /// "3 (Moderate)"
    pub fn describe(uv: f64) -> String {
        format!("{} ({})", uv, Self::from_index(uv).label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
    Unknown,
}

impl MoonPhase {
    pub fn from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("new") {
            Self::New
        } else if name.contains("waxing crescent") {
            Self::WaxingCrescent
        } else if name.contains("first quarter") {
            Self::FirstQuarter
        } else if name.contains("waxing gibbous") {
            Self::WaxingGibbous
        } else if name.contains("full") {
            Self::Full
        } else if name.contains("waning gibbous") {
            Self::WaningGibbous
        } else if name.contains("last quarter") || name.contains("third quarter") {
            Self::LastQuarter
        } else if name.contains("waning crescent") {
            Self::WaningCrescent
        } else {
            Self::Unknown
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::New => "🌑",
            Self::WaxingCrescent => "🌒",
            Self::FirstQuarter => "🌓",
            Self::WaxingGibbous => "🌔",
            Self::Full => "🌕",
            Self::WaningGibbous => "🌖",
            Self::LastQuarter => "🌗",
            Self::WaningCrescent => "🌘",
            Self::Unknown => "🌙",
        }
    }
}

/// Segments of the day used to group hourly entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
    Overnight,
}

impl DayPart {
    pub const ALL: [DayPart; 4] = [
        DayPart::Morning,
        DayPart::Afternoon,
        DayPart::Evening,
        DayPart::Overnight,
    ];

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            18..=21 => Self::Evening,
            _ => Self::Overnight,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
            Self::Overnight => "Overnight",
        }
    }
}

/// Round half up, so 21.5 -> 22 and -2.5 -> -2.
pub fn round_temp(celsius: f64) -> i32 {
    (celsius + 0.5).floor() as i32
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Time between sunrise and sunset as "12 hrs 5 mins". Accepts the
/// provider's "06:12 AM" format.
pub fn daylight(sunrise: &str, sunset: &str) -> Option<String> {
    let rise = parse_clock(sunrise)?;
    let set = parse_clock(sunset)?;
    let minutes = (set - rise).num_minutes();
    if minutes < 0 {
        return None;
    }
    Some(format!("{} hrs {} mins", minutes / 60, minutes % 60))
}

fn parse_clock(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%I:%M %p")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_clear_follows_day_flag() {
        assert_eq!(ConditionIcon::from_condition("Sunny", true), ConditionIcon::Sun);
        assert_eq!(ConditionIcon::from_condition("Clear", false), ConditionIcon::Moon);
    }

    #[test]
    fn test_icon_keywords() {
        assert_eq!(
            ConditionIcon::from_condition("Patchy rain nearby", true),
            ConditionIcon::Rain
        );
        assert_eq!(
            ConditionIcon::from_condition("Light drizzle", true),
            ConditionIcon::Drizzle
        );
        assert_eq!(
            ConditionIcon::from_condition("Moderate snow", true),
            ConditionIcon::Snow
        );
        assert_eq!(ConditionIcon::from_condition("Overcast", true), ConditionIcon::Cloud);
        assert_eq!(
            ConditionIcon::from_condition("Partly cloudy", false),
            ConditionIcon::Cloud
        );
    }

    #[test]
    fn test_icon_unknown_defaults_to_sky() {
        assert_eq!(ConditionIcon::from_condition("Mist", true), ConditionIcon::Sun);
        assert_eq!(ConditionIcon::from_condition("Mist", false), ConditionIcon::Moon);
    }

    #[test]
    fn test_icon_name() {
        assert_eq!(ConditionIcon::Rain.icon_name(), "cloud_rain");
        assert_eq!(ConditionIcon::Moon.icon_name(), "moon");
    }

    #[test]
    fn test_uv_bands() {
        assert_eq!(UvLevel::from_index(2.0), UvLevel::Low);
        assert_eq!(UvLevel::from_index(5.0), UvLevel::Moderate);
        assert_eq!(UvLevel::from_index(7.0), UvLevel::High);
        assert_eq!(UvLevel::from_index(10.0), UvLevel::VeryHigh);
        assert_eq!(UvLevel::from_index(11.0), UvLevel::Extreme);
        assert_eq!(UvLevel::describe(3.0), "3 (Moderate)");
    }

    #[test]
    fn test_moon_phase() {
        assert_eq!(MoonPhase::from_name("Waxing Gibbous"), MoonPhase::WaxingGibbous);
        assert_eq!(MoonPhase::from_name("Third Quarter"), MoonPhase::LastQuarter);
        assert_eq!(MoonPhase::from_name("Full Moon").glyph(), "🌕");
        assert_eq!(MoonPhase::from_name("???"), MoonPhase::Unknown);
    }

    #[test]
    fn test_day_part_boundaries() {
        assert_eq!(DayPart::from_hour(5), DayPart::Overnight);
        assert_eq!(DayPart::from_hour(6), DayPart::Morning);
        assert_eq!(DayPart::from_hour(12), DayPart::Afternoon);
        assert_eq!(DayPart::from_hour(18), DayPart::Evening);
        assert_eq!(DayPart::from_hour(22), DayPart::Overnight);
    }

    #[test]
    fn test_round_temp_half_up() {
        assert_eq!(round_temp(21.5), 22);
        assert_eq!(round_temp(21.4), 21);
        assert_eq!(round_temp(-2.5), -2);
        assert_eq!(round_temp(-2.6), -3);
    }

    #[test]
    fn test_celsius_to_fahrenheit() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
    }

    #[test]
    fn test_daylight() {
        assert_eq!(
            daylight("06:12 AM", "06:17 PM").as_deref(),
            Some("12 hrs 5 mins")
        );
        assert_eq!(daylight("06:00", "18:30").as_deref(), Some("12 hrs 30 mins"));
        assert_eq!(daylight("No sunrise", "06:00 PM"), None);
    }
}
