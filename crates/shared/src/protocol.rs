use serde::{Deserialize, Serialize};

/// One element of the JSON array returned by `GET /name/{country}`.
///
/// Every field is optional on the wire; absent fields fall back when the
/// record is projected into a [`crate::domain::CountryView`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRecord {
    #[serde(default)]
    pub name: Option<CountryNames>,
    #[serde(default)]
    pub capital: Option<Vec<String>>,
    #[serde(default)]
    pub population: Option<u64>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub flags: Option<CountryFlags>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryNames {
    #[serde(default)]
    pub common: Option<String>,
    #[serde(default)]
    pub official: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryFlags {
    #[serde(default)]
    pub svg: Option<String>,
    #[serde(default)]
    pub png: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}

impl CountryRecord {
    pub fn common_name(&self) -> Option<&str> {
        non_blank(self.name.as_ref().and_then(|n| n.common.as_ref()))
    }

    pub fn first_capital(&self) -> Option<&str> {
        non_blank(self.capital.as_ref().and_then(|c| c.first()))
    }

    /// Zero is treated the same as a missing population.
    pub fn population(&self) -> Option<u64> {
        self.population.filter(|p| *p > 0)
    }

    pub fn region(&self) -> Option<&str> {
        non_blank(self.region.as_ref())
    }

    pub fn flag_svg(&self) -> Option<&str> {
        non_blank(self.flags.as_ref().and_then(|f| f.svg.as_ref()))
    }

    pub fn flag_png(&self) -> Option<&str> {
        non_blank(self.flags.as_ref().and_then(|f| f.png.as_ref()))
    }

    /// A record is renderable only when it carries an SVG flag URL.
    pub fn has_usable_flag(&self) -> bool {
        self.flag_svg().is_some()
    }
}
