//! Menu records shared by the extractor, aggregator and persistence layers.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named serving window. The set is closed: labels outside it are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealPeriod {
    Breakfast,
    Brunch,
    Lunch,
    Dinner,
}

impl MealPeriod {
    pub const ALL: [MealPeriod; 4] = [
        MealPeriod::Breakfast,
        MealPeriod::Brunch,
        MealPeriod::Lunch,
        MealPeriod::Dinner,
    ];

    /// Maps a page label such as `"Lunch"` or `" BRUNCH "` to a meal period.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "breakfast" => Some(MealPeriod::Breakfast),
            "brunch" => Some(MealPeriod::Brunch),
            "lunch" => Some(MealPeriod::Lunch),
            "dinner" => Some(MealPeriod::Dinner),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MealPeriod::Breakfast => "breakfast",
            MealPeriod::Brunch => "brunch",
            MealPeriod::Lunch => "lunch",
            MealPeriod::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown meal period '{0}'")]
pub struct UnknownMealPeriod(pub String);

impl FromStr for MealPeriod {
    type Err = UnknownMealPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealPeriod::from_label(s).ok_or_else(|| UnknownMealPeriod(s.to_string()))
    }
}

/// One meal-period section as found on a dining hall page.
///
/// Produced fresh on every extraction pass and never persisted directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMealBlock {
    pub meal_period: MealPeriod,
    /// Raw window text, e.g. `"7:00 am - 10:00 am"`.
    pub time_window: Option<String>,
    /// Item names in page order. May be empty.
    pub items: Vec<String>,
}

impl RawMealBlock {
    pub fn new(meal_period: MealPeriod) -> Self {
        Self {
            meal_period,
            time_window: None,
            items: Vec::new(),
        }
    }

    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}

/// A menu item scoped to one dining hall.
///
/// Identity is `(name, dining_hall_id)`; `meal_periods` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRecord {
    pub name: String,
    pub dining_hall_id: String,
    pub meal_periods: BTreeSet<MealPeriod>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MenuItemRecord {
    pub fn new(
        name: impl Into<String>,
        dining_hall_id: impl Into<String>,
        meal_period: MealPeriod,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            dining_hall_id: dining_hall_id.into(),
            meal_periods: BTreeSet::from([meal_period]),
            created_at: now,
            updated_at: now,
        }
    }
}

/// The serving window of one meal period at one dining hall.
///
/// Identity is `(dining_hall_id, meal_period)`. Start and end are zoned
/// timestamp strings such as `"2024-03-01 07:00:00-05"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealScheduleRecord {
    pub dining_hall_id: String,
    pub meal_period: MealPeriod,
    pub start_time: String,
    pub end_time: String,
    pub created_at: DateTime<Utc>,
}
