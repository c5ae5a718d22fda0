use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::Identifier;

/// What to do with an identifier that appears more than once in one message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Keep the first occurrence, drop later repeats.
    #[default]
    FirstOccurrence,
    /// Look up and report every occurrence, repeats included.
    KeepAll,
}

/// Result of scanning one message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extraction {
    pub identifiers: Vec<Identifier>,
    /// Set when the list was cut down to `max_items`.
    pub truncated: bool,
    /// Count after dedup, before the cap.
    pub raw_count: usize,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

fn digit_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("valid regex"))
}

/// Collect every maximal run of digits in `text`, left to right.
///
/// Anything that isn't a digit is a separator, so `abc123def45` yields `123` and `45`.
pub fn extract_identifiers(text: &str, max_items: usize, policy: DedupPolicy) -> Extraction {
    let runs = digit_runs().find_iter(text).map(|m| m.as_str());

    let mut identifiers: Vec<Identifier> = match policy {
        DedupPolicy::KeepAll => runs.map(Identifier::new).collect(),
        DedupPolicy::FirstOccurrence => {
            let mut seen = HashSet::new();
            runs.filter(|s| seen.insert(*s))
                .map(Identifier::new)
                .collect()
        }
    };

    let raw_count = identifiers.len();
    let truncated = raw_count > max_items;
    identifiers.truncate(max_items);

    Extraction {
        identifiers,
        truncated,
        raw_count,
    }
}
