//! Kinship classification and naming
//!
//! A relationship through one common ancestor is fully described by the two
//! generation distances `(gen_a, gen_b)` from person A and person B up to that
//! ancestor. [`Kinship::classify`] turns the pair into a variant and
//! `Display` renders it as the English name of what B is to A.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What person B is to person A
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Kinship {
    /// Same person
    #[serde(rename = "self")]
    SelfPerson,
    /// B is A's ancestor, `generations` hops up
    Ancestor { generations: u32 },
    /// B is A's descendant, `generations` hops down
    Descendant { generations: u32 },
    Sibling,
    /// B is a sibling of A's ancestor `generations` hops up
    UncleAunt { generations: u32 },
    /// B descends from A's sibling, `generations` hops down
    NephewNiece { generations: u32 },
    Cousin { degree: u32, removed: u32 },
}

impl Kinship {
    pub fn classify(gen_a: u32, gen_b: u32) -> Self {
        match (gen_a, gen_b) {
            (0, 0) => Self::SelfPerson,
            (0, n) => Self::Descendant { generations: n },
            (n, 0) => Self::Ancestor { generations: n },
            (1, 1) => Self::Sibling,
            (n, 1) => Self::UncleAunt { generations: n - 1 },
            (1, n) => Self::NephewNiece { generations: n - 1 },
            (a, b) => Self::Cousin {
                degree: a.min(b) - 1,
                removed: a.abs_diff(b),
            },
        }
    }
}

/// English ordinal: 1st, 2nd, 3rd, 4th, ..., 11th, 12th, 13th, 21st, ...
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// The "great-" part of a ladder: "", "great-", "great-great-", "3rd great-", ...
fn greats(count: u32) -> String {
    match count {
        0 => String::new(),
        1 => "great-".to_string(),
        2 => "great-great-".to_string(),
        n => format!("{} great-", ordinal(n)),
    }
}

fn removed_clause(removed: u32) -> String {
    match removed {
        1 => "once".to_string(),
        2 => "twice".to_string(),
        3 => "thrice".to_string(),
        n => format!("{} times", n),
    }
}

/// parent, grandparent, great-grandparent, ... for `base` = "parent"
fn lineal(generations: u32, base: &str) -> String {
    match generations {
        1 => base.to_string(),
        n => format!("{}grand{}", greats(n - 2), base),
    }
}

/// uncle/aunt, grand-uncle/aunt, great-grand-uncle/aunt, ...
fn collateral(generations: u32, base: &str) -> String {
    match generations {
        1 => base.to_string(),
        n => format!("{}grand-{}", greats(n - 2), base),
    }
}

impl fmt::Display for Kinship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::SelfPerson => write!(f, "self"),
            Self::Ancestor { generations } => write!(f, "{}", lineal(generations, "parent")),
            Self::Descendant { generations } => write!(f, "{}", lineal(generations, "child")),
            Self::Sibling => write!(f, "sibling"),
            Self::UncleAunt { generations } => {
                write!(f, "{}", collateral(generations, "uncle/aunt"))
            }
            Self::NephewNiece { generations } => {
                write!(f, "{}", collateral(generations, "nephew/niece"))
            }
            Self::Cousin { degree, removed: 0 } => write!(f, "{} cousin", ordinal(degree)),
            Self::Cousin { degree, removed } => write!(
                f,
                "{} cousin {} removed",
                ordinal(degree),
                removed_clause(removed)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(gen_a: u32, gen_b: u32) -> String {
        Kinship::classify(gen_a, gen_b).to_string()
    }

    #[test]
    fn test_ordinals() {
        let cases = [
            (1, "1st"),
            (2, "2nd"),
            (3, "3rd"),
            (4, "4th"),
            (11, "11th"),
            (12, "12th"),
            (13, "13th"),
            (21, "21st"),
            (22, "22nd"),
            (23, "23rd"),
            (101, "101st"),
            (111, "111th"),
            (112, "112th"),
        ];
        for (n, expected) in cases {
            assert_eq!(ordinal(n), expected);
        }
    }

    #[test]
    fn test_direct_line_names() {
        assert_eq!(name(0, 0), "self");
        assert_eq!(name(1, 0), "parent");
        assert_eq!(name(2, 0), "grandparent");
        assert_eq!(name(3, 0), "great-grandparent");
        assert_eq!(name(4, 0), "great-great-grandparent");
        assert_eq!(name(5, 0), "3rd great-grandparent");
        assert_eq!(name(6, 0), "4th great-grandparent");
        assert_eq!(name(0, 1), "child");
        assert_eq!(name(0, 2), "grandchild");
        assert_eq!(name(0, 3), "great-grandchild");
        assert_eq!(name(0, 4), "great-great-grandchild");
        assert_eq!(name(0, 5), "3rd great-grandchild");
    }

    #[test]
    fn test_collateral_names() {
        assert_eq!(name(1, 1), "sibling");
        assert_eq!(name(2, 1), "uncle/aunt");
        assert_eq!(name(3, 1), "grand-uncle/aunt");
        assert_eq!(name(4, 1), "great-grand-uncle/aunt");
        assert_eq!(name(5, 1), "great-great-grand-uncle/aunt");
        assert_eq!(name(6, 1), "3rd great-grand-uncle/aunt");
        assert_eq!(name(1, 2), "nephew/niece");
        assert_eq!(name(1, 3), "grand-nephew/niece");
        assert_eq!(name(1, 4), "great-grand-nephew/niece");
    }

    #[test]
    fn test_cousin_formula() {
        assert_eq!(name(2, 2), "1st cousin");
        assert_eq!(name(3, 2), "1st cousin once removed");
        assert_eq!(name(2, 3), "1st cousin once removed");
        assert_eq!(name(3, 3), "2nd cousin");
        assert_eq!(name(4, 4), "3rd cousin");
        assert_eq!(name(4, 2), "1st cousin twice removed");
        assert_eq!(name(5, 2), "1st cousin thrice removed");
        assert_eq!(name(6, 2), "1st cousin 4 times removed");
        assert_eq!(name(12, 12), "11th cousin");
        assert_eq!(
            Kinship::classify(7, 4),
            Kinship::Cousin {
                degree: 3,
                removed: 3
            }
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(Kinship::classify(3, 2)).unwrap();
        assert_eq!(json["kind"], "cousin");
        assert_eq!(json["degree"], 1);
        assert_eq!(json["removed"], 1);

        let json = serde_json::to_value(Kinship::SelfPerson).unwrap();
        assert_eq!(json["kind"], "self");
    }
}
