//! Maven-style version ordering
//!
//! Versions are split into items at `.` and `-` and at every switch between
//! digits and letters:
//! - numeric items compare numerically
//! - qualifiers rank `alpha < beta < milestone < rc < snapshot < release < sp`,
//!   unknown qualifiers sort after `sp` lexically
//! - `-` opens a nested list, so `1.0-alpha` is `[1, [alpha]]`
//! - trailing zero/release items are dropped, so `1 == 1.0 == 1.0.0 == 1-ga`

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::version::comparator::{ComparatorKind, VersionComparator};
use crate::version::types::Version;

const QUALIFIERS: [&str; 7] = ["alpha", "beta", "milestone", "rc", "snapshot", "", "sp"];

/// Rank of the empty (release) qualifier
const RELEASE_RANK: &str = "5";

/// `<base>-yyyyMMdd.HHmmss-<build>` as produced by timestamped snapshot deploys
static TIMESTAMPED_SNAPSHOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)-(\d{8}\.\d{6})-(\d+)$").unwrap());

pub struct MavenComparator;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    /// Digits with leading zeros stripped; zero is the empty string
    Int(String),
    Str(String),
    List(Vec<Item>),
}

impl Item {
    fn int(digits: &str) -> Self {
        Item::Int(digits.trim_start_matches('0').to_string())
    }

    fn string(value: &str, followed_by_digit: bool) -> Self {
        let value = match value {
            "a" if followed_by_digit => "alpha",
            "b" if followed_by_digit => "beta",
            "m" if followed_by_digit => "milestone",
            "ga" | "final" | "release" => "",
            "cr" => "rc",
            other => other,
        };
        Item::Str(value.to_string())
    }

    fn parse(is_digit: bool, token: &str) -> Self {
        if is_digit {
            Item::int(token)
        } else {
            Item::string(token, false)
        }
    }

    fn is_null(&self) -> bool {
        match self {
            Item::Int(digits) => digits.is_empty(),
            Item::Str(value) => qualifier_rank(value) == RELEASE_RANK,
            Item::List(items) => items.is_empty(),
        }
    }

    /// Compare against another item, `None` standing for a missing item
    fn compare(&self, other: Option<&Item>) -> Ordering {
        match (self, other) {
            (Item::Int(digits), None) => {
                if digits.is_empty() {
                    Ordering::Equal
                } else {
                    Ordering::Greater
                }
            }
            (Item::Int(a), Some(Item::Int(b))) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Item::Int(_), Some(_)) => Ordering::Greater,

            (Item::Str(value), None) => qualifier_rank(value).as_str().cmp(RELEASE_RANK),
            (Item::Str(_), Some(Item::Int(_))) => Ordering::Less,
            (Item::Str(a), Some(Item::Str(b))) => qualifier_rank(a).cmp(&qualifier_rank(b)),
            (Item::Str(_), Some(Item::List(_))) => Ordering::Less,

            (Item::List(items), None) => match items.first() {
                Some(first) => first.compare(None),
                None => Ordering::Equal,
            },
            (Item::List(_), Some(Item::Int(_))) => Ordering::Less,
            (Item::List(_), Some(Item::Str(_))) => Ordering::Greater,
            (Item::List(left), Some(Item::List(right))) => compare_lists(left, right),
        }
    }
}

fn compare_lists(left: &[Item], right: &[Item]) -> Ordering {
    let len = left.len().max(right.len());
    for i in 0..len {
        let result = match (left.get(i), right.get(i)) {
            (None, None) => Ordering::Equal,
            (None, Some(r)) => r.compare(None).reverse(),
            (Some(l), r) => l.compare(r),
        };
        if result != Ordering::Equal {
            return result;
        }
    }
    Ordering::Equal
}

fn qualifier_rank(value: &str) -> String {
    match QUALIFIERS.iter().position(|q| *q == value) {
        Some(index) => index.to_string(),
        None => format!("{}-{}", QUALIFIERS.len(), value),
    }
}

/// Drop trailing null items, stopping at the first non-null non-list item
fn normalize(items: &mut Vec<Item>) {
    let mut i = items.len();
    while i > 0 {
        i -= 1;
        if items[i].is_null() {
            items.remove(i);
        } else if !matches!(items[i], Item::List(_)) {
            break;
        }
    }
}

/// Split a version into its nested item structure
///
/// Each `-` (and each digit/letter switch) opens a new list that becomes
/// the last element of the current one, so the open lists always form a
/// single chain. `levels[k]` holds the items of the k-th list in that chain.
fn parse_items(version: &str) -> Vec<Item> {
    let version = version.to_lowercase();
    let chars: Vec<char> = version.chars().collect();
    let mut levels: Vec<Vec<Item>> = vec![Vec::new()];
    let mut is_digit = false;
    let mut start = 0;

    let token = |from: usize, to: usize| chars[from..to].iter().collect::<String>();

    for (i, &c) in chars.iter().enumerate() {
        if c == '.' || c == '-' {
            let item = if i == start {
                Item::int("0")
            } else {
                Item::parse(is_digit, &token(start, i))
            };
            push_item(&mut levels, item);
            start = i + 1;
            if c == '-' {
                levels.push(Vec::new());
            }
        } else if c.is_ascii_digit() {
            if !is_digit && i > start {
                push_item(&mut levels, Item::string(&token(start, i), true));
                start = i;
                levels.push(Vec::new());
            }
            is_digit = true;
        } else {
            if is_digit && i > start {
                push_item(&mut levels, Item::parse(true, &token(start, i)));
                start = i;
                levels.push(Vec::new());
            }
            is_digit = false;
        }
    }

    if chars.len() > start {
        push_item(&mut levels, Item::parse(is_digit, &token(start, chars.len())));
    }

    let mut child: Option<Vec<Item>> = None;
    while let Some(mut items) = levels.pop() {
        if let Some(nested) = child.take() {
            items.push(Item::List(nested));
        }
        normalize(&mut items);
        child = Some(items);
    }
    child.unwrap_or_default()
}

fn push_item(levels: &mut [Vec<Item>], item: Item) {
    if let Some(current) = levels.last_mut() {
        current.push(item);
    }
}

impl VersionComparator for MavenComparator {
    fn kind(&self) -> ComparatorKind {
        ComparatorKind::Maven
    }

    fn compare(&self, a: &Version, b: &Version) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        compare_lists(&parse_items(a.as_str()), &parse_items(b.as_str()))
    }

    fn is_snapshot(&self, version: &Version) -> bool {
        let value = version.as_str();
        value.to_ascii_uppercase().ends_with("SNAPSHOT")
            || TIMESTAMPED_SNAPSHOT.is_match(value)
    }
}
