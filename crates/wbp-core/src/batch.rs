use std::time::Duration;

use crate::{
    catalog::CatalogLookupClient,
    domain::{Identifier, LookupResult, PhotoUrl},
};

/// Per-message lookup results, in identifier order.
///
/// `photos[i]` belongs to `found[i]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub found: Vec<Identifier>,
    pub not_found: Vec<Identifier>,
    pub photos: Vec<PhotoUrl>,
}

impl BatchOutcome {
    pub fn into_report(self, total: usize) -> (Vec<PhotoUrl>, BatchReport) {
        let report = BatchReport::new(total, self.found, self.not_found);
        (self.photos, report)
    }
}

/// Runs lookups one identifier at a time with a fixed pause after each.
#[derive(Clone)]
pub struct BatchProcessor {
    client: CatalogLookupClient,
    pacing: Duration,
}

impl BatchProcessor {
    pub fn new(client: CatalogLookupClient, pacing: Duration) -> Self {
        Self { client, pacing }
    }

    /// Never stops early: every identifier gets exactly one lookup.
    pub async fn process(&self, identifiers: &[Identifier]) -> BatchOutcome {
        let mut out = BatchOutcome::default();

        for identifier in identifiers {
            match self.client.lookup(identifier).await {
                LookupResult::Found(url) => {
                    out.found.push(identifier.clone());
                    out.photos.push(url);
                }
                LookupResult::NotFound => out.not_found.push(identifier.clone()),
            }

            if !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        out
    }
}

/// Aggregate over one message, rendered as the closing summary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub found: Vec<Identifier>,
    pub not_found: Vec<Identifier>,
}

impl BatchReport {
    pub fn new(total: usize, found: Vec<Identifier>, not_found: Vec<Identifier>) -> Self {
        Self {
            total,
            found,
            not_found,
        }
    }

    pub fn found_count(&self) -> usize {
        self.found.len()
    }

    pub fn not_found_count(&self) -> usize {
        self.not_found.len()
    }

    pub fn summary_text(&self) -> String {
        let mut lines = self.header_lines();
        for (label, ids) in self.list_sections() {
            lines.push(format!("{label}{}", join_ids(ids)));
        }
        lines.join("\n")
    }

    /// The summary cut into messages of at most `max_len` chars.
    ///
    /// Header lines stay in the first message. Identifier lists break at `", "` and a
    /// list that continues in a new message repeats its label. A summary that fits
    /// comes back as the single `summary_text()`.
    pub fn summary_messages(&self, max_len: usize) -> Vec<String> {
        let max_len = max_len.max(1);
        let mut msgs = vec![self.header_lines().join("\n")];

        for (label, ids) in self.list_sections() {
            let mut in_list = false;
            for id in ids {
                let piece = if in_list {
                    format!(", {id}")
                } else {
                    format!("\n{label}{id}")
                };
                let cur_len = msgs.last().map(|m| char_len(m)).unwrap_or(0);
                if cur_len + char_len(&piece) > max_len {
                    msgs.push(format!("{label}{id}"));
                } else if let Some(cur) = msgs.last_mut() {
                    cur.push_str(&piece);
                }
                in_list = true;
            }
        }

        // Only a single identifier longer than the limit can still overflow.
        msgs.into_iter()
            .flat_map(|m| split_text(&m, max_len))
            .collect()
    }

    fn header_lines(&self) -> Vec<String> {
        vec![
            "Готово ✅".to_string(),
            format!("Всего обработано: {}", self.total),
            format!("С фото: {}", self.found_count()),
            format!("Без фото: {}", self.not_found_count()),
        ]
    }

    fn list_sections(&self) -> Vec<(&'static str, &[Identifier])> {
        [
            ("Нашлись: ", self.found.as_slice()),
            ("Не найдено: ", self.not_found.as_slice()),
        ]
        .into_iter()
        .filter(|(_, ids)| !ids.is_empty())
        .collect()
    }
}

fn join_ids(ids: &[Identifier]) -> String {
    ids.iter()
        .map(|i| i.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn split_text(s: &str, max_len: usize) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    chars
        .chunks(max_len)
        .map(|c| c.iter().collect::<String>())
        .collect()
}
