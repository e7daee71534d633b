use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Service categories offered by the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "AC Services")]
    AcServices,
    #[serde(rename = "Plumbing")]
    Plumbing,
    #[serde(rename = "Electrical")]
    Electrical,
    #[serde(rename = "Appliances")]
    Appliances,
    #[serde(rename = "Smart Home")]
    SmartHome,
}

impl Category {
    /// All categories in landing-page display order
    pub const ALL: [Category; 5] = [
        Category::AcServices,
        Category::Plumbing,
        Category::Electrical,
        Category::Appliances,
        Category::SmartHome,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::AcServices => write!(f, "AC Services"),
            Category::Plumbing => write!(f, "Plumbing"),
            Category::Electrical => write!(f, "Electrical"),
            Category::Appliances => write!(f, "Appliances"),
            Category::SmartHome => write!(f, "Smart Home"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ac services" => Ok(Category::AcServices),
            "plumbing" => Ok(Category::Plumbing),
            "electrical" => Ok(Category::Electrical),
            "appliances" => Ok(Category::Appliances),
            "smart home" => Ok(Category::SmartHome),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

/// Category selection for catalog filtering: a concrete category or the
/// `All` sentinel, which is not itself a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(selected) => *selected == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "All"),
            CategoryFilter::Category(category) => category.fmt(f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse::<Category>().map(CategoryFilter::Category)
    }
}

/// Fixed appointment windows offered by the booking form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "09:00 - 11:00")]
    Morning,
    #[serde(rename = "11:00 - 13:00")]
    Midday,
    #[serde(rename = "14:00 - 16:00")]
    Afternoon,
    #[serde(rename = "16:00 - 18:00")]
    Evening,
}

impl TimeSlot {
    /// Slots in the order the booking form offers them
    pub const ALL: [TimeSlot; 4] = [
        TimeSlot::Morning,
        TimeSlot::Midday,
        TimeSlot::Afternoon,
        TimeSlot::Evening,
    ];
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSlot::Morning => write!(f, "09:00 - 11:00"),
            TimeSlot::Midday => write!(f, "11:00 - 13:00"),
            TimeSlot::Afternoon => write!(f, "14:00 - 16:00"),
            TimeSlot::Evening => write!(f, "16:00 - 18:00"),
        }
    }
}

impl FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "09:00 - 11:00" => Ok(TimeSlot::Morning),
            "11:00 - 13:00" => Ok(TimeSlot::Midday),
            "14:00 - 16:00" => Ok(TimeSlot::Afternoon),
            "16:00 - 18:00" => Ok(TimeSlot::Evening),
            _ => Err(format!("Invalid time slot: {}", s)),
        }
    }
}
