use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The closed set of genealogical entity kinds a record store holds.
///
/// The variant names double as the `_class` tag written into each record's
/// struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Person,
    Family,
    Source,
    Citation,
    Event,
    Media,
    Place,
    Repository,
    Note,
    Tag,
}

impl Category {
    /// Every category, in the order database comparisons walk them.
    pub const ALL: [Category; 10] = [
        Category::Person,
        Category::Family,
        Category::Source,
        Category::Citation,
        Category::Event,
        Category::Media,
        Category::Place,
        Category::Repository,
        Category::Note,
        Category::Tag,
    ];

    /// The class name used as the `_class` tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Person => "Person",
            Category::Family => "Family",
            Category::Source => "Source",
            Category::Citation => "Citation",
            Category::Event => "Event",
            Category::Media => "Media",
            Category::Place => "Place",
            Category::Repository => "Repository",
            Category::Note => "Note",
            Category::Tag => "Tag",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| TypeError::UnknownCategory(s.to_string()))
    }
}
