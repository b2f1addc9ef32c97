use serde::{Deserialize, Serialize};

use crate::{error::LookupError, protocol::CountryRecord};

pub const NOT_AVAILABLE: &str = "N/A";

/// A trimmed, non-empty country name typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query(String);

impl Query {
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayField {
    CountryName,
    CapitalCity,
    Population,
    Region,
    ErrorMessage,
}

impl DisplayField {
    pub const COUNTRY: [DisplayField; 4] = [
        DisplayField::CountryName,
        DisplayField::CapitalCity,
        DisplayField::Population,
        DisplayField::Region,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            Self::CountryName => "CountryName",
            Self::CapitalCity => "CapitalCity",
            Self::Population => "Population",
            Self::Region => "Region",
            Self::ErrorMessage => "errorMessage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeRegion {
    Body,
    Navbar,
    CountryInfo,
    Footer,
}

impl ModeRegion {
    pub const ALL: [ModeRegion; 4] = [
        ModeRegion::Body,
        ModeRegion::Navbar,
        ModeRegion::CountryInfo,
        ModeRegion::Footer,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualMode {
    #[default]
    Dark,
    Light,
}

impl VisualMode {
    pub fn flipped(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Label for the toggle control: names the action available next.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Dark => "Switch to Light Mode",
            Self::Light => "Switch to Dark Mode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagRef {
    pub svg_url: String,
    pub png_url: Option<String>,
    pub alt: String,
}

/// Display texts for a successfully looked-up country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryView {
    pub name: String,
    pub capital: String,
    pub population: String,
    pub region: String,
    pub flag: FlagRef,
}

impl CountryView {
    /// Returns `None` when the record has no usable flag.
    pub fn from_record(record: &CountryRecord, grouping_separator: char) -> Option<Self> {
        let svg_url = record.flag_svg()?.to_string();
        let name = record.common_name().unwrap_or(NOT_AVAILABLE).to_string();
        let population = record
            .population()
            .map(|p| format_grouped(p, grouping_separator))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Some(Self {
            capital: format!("Capital: {}", record.first_capital().unwrap_or(NOT_AVAILABLE)),
            population: format!("Population: {population}"),
            region: format!("Region: {}", record.region().unwrap_or(NOT_AVAILABLE)),
            flag: FlagRef {
                svg_url,
                png_url: record.flag_png().map(str::to_string),
                alt: format!("Flag of {name}"),
            },
            name,
        })
    }

    pub fn field(&self, field: DisplayField) -> &str {
        match field {
            DisplayField::CountryName => &self.name,
            DisplayField::CapitalCity => &self.capital,
            DisplayField::Population => &self.population,
            DisplayField::Region => &self.region,
            DisplayField::ErrorMessage => "",
        }
    }
}

/// What the info panel shows after one lookup: either a full country or
/// nothing but (optionally) an error text. Never a mix of both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayState {
    Populated(CountryView),
    Cleared { error: Option<String> },
}

impl DisplayState {
    pub fn blank() -> Self {
        Self::Cleared { error: None }
    }

    pub fn failed(err: &LookupError) -> Self {
        Self::Cleared {
            error: Some(err.to_string()),
        }
    }

    pub fn from_outcome(
        outcome: &Result<CountryRecord, LookupError>,
        grouping_separator: char,
    ) -> Self {
        match outcome {
            Ok(record) => match CountryView::from_record(record, grouping_separator) {
                Some(view) => Self::Populated(view),
                None => Self::failed(&LookupError::DataUnavailable),
            },
            Err(err) => Self::failed(err),
        }
    }

    /// Text for `field`; empty when cleared.
    pub fn field(&self, field: DisplayField) -> &str {
        match (self, field) {
            (Self::Populated(view), f) => view.field(f),
            (Self::Cleared { error }, DisplayField::ErrorMessage) => {
                error.as_deref().unwrap_or("")
            }
            (Self::Cleared { .. }, _) => "",
        }
    }

    pub fn flag(&self) -> Option<&FlagRef> {
        match self {
            Self::Populated(view) => Some(&view.flag),
            Self::Cleared { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Populated(_) => None,
            Self::Cleared { error } => error.as_deref(),
        }
    }

    pub fn is_populated(&self) -> bool {
        matches!(self, Self::Populated(_))
    }
}

/// Digit grouping in threes, e.g. `67391582` -> `67,391,582`.
pub fn format_grouped(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}
