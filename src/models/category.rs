//! Client-side book categories.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A client-defined grouping used to narrow aggregated results.
///
/// Categories are not sourced from the catalog. Membership is decided by
/// keyword substrings in the title, see [`Category::keywords`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    All,
    Fiction,
    Science,
    History,
    Biography,
    Children,
}

impl Category {
    /// Every category in display order
    pub const ALL: [Category; 6] = [
        Category::All,
        Category::Fiction,
        Category::Science,
        Category::History,
        Category::Biography,
        Category::Children,
    ];

    /// Identifier used on the command line
    pub fn id(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Fiction => "fiction",
            Category::Science => "science",
            Category::History => "history",
            Category::Biography => "biography",
            Category::Children => "children",
        }
    }

    /// Tab label
    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "All Books",
            Category::Fiction => "Fiction",
            Category::Science => "Science",
            Category::History => "History",
            Category::Biography => "Biography",
            Category::Children => "Children's",
        }
    }

    /// Lowercase keyword substrings matched against titles.
    ///
    /// Empty for [`Category::All`], which matches everything.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Category::All => &[],
            Category::Fiction => &["novel", "story", "stories", "fiction", "tales"],
            Category::Science => &[
                "science",
                "scientific",
                "physics",
                "chemistry",
                "biology",
                "mathematics",
                "astronomy",
            ],
            Category::History => &[
                "history",
                "historical",
                "ancient",
                "empire",
                "century",
                "civilization",
            ],
            Category::Biography => &["biography", "memoir", "life of", "diary"],
            Category::Children => &["children", "child", "kids", "fairy", "nursery", "picture book"],
        }
    }

    /// Whether this is the catch-all category
    pub fn is_all(&self) -> bool {
        matches!(self, Category::All)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Error returned when a category identifier is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category '{0}' (expected one of: all, fiction, science, history, biography, children)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.id() == wanted)
            .ok_or(UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("Fiction".parse::<Category>(), Ok(Category::Fiction));
        assert_eq!(" ALL ".parse::<Category>(), Ok(Category::All));
        assert_eq!("children".parse::<Category>(), Ok(Category::Children));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "poetry".parse::<Category>().unwrap_err();
        assert_eq!(err, UnknownCategory("poetry".to_string()));
    }

    #[test]
    fn test_keywords_are_lowercase() {
        for category in Category::ALL {
            for keyword in category.keywords() {
                assert_eq!(*keyword, keyword.to_lowercase());
            }
        }
        assert!(Category::All.keywords().is_empty());
    }

    #[test]
    fn test_id_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.id().parse::<Category>(), Ok(category));
        }
    }
}
