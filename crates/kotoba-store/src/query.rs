use std::fs;

use kotoba_types::card::CardRecord;
use serde::{Deserialize, Serialize};

use crate::Store;

/// One page of cards plus its pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardPage {
    pub cards: Vec<CardRecord>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total: usize,
    pub with_casual: usize,
    pub without_casual: usize,
}

/// Fields covered by substring search.
fn search_haystacks(card: &CardRecord) -> [Option<&str>; 5] {
    [
        Some(card.polite_jp.as_str()),
        card.casual_jp.as_deref(),
        Some(card.translation_polite.as_str()),
        card.translation_casual.as_deref(),
        Some(card.source_input.as_str()),
    ]
}

impl Store {
    /// Load every card from the JSON store.
    ///
    /// A missing file is an empty store; an unreadable or unparseable file
    /// is logged and treated as empty rather than failing the caller.
    pub fn all_cards(&self) -> Vec<CardRecord> {
        if !self.data_json_path().exists() {
            return Vec::new();
        }

        match fs::read_to_string(self.data_json_path()) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(records) => records,
                Err(e) => {
                    tracing::error!("error parsing data.json: {e}");
                    Vec::new()
                }
            },
            Err(e) => {
                tracing::error!("error reading data.json: {e}");
                Vec::new()
            }
        }
    }

    /// Case-insensitive substring search over the Japanese text,
    /// translations, and source input.
    pub fn search(&self, query: &str) -> Vec<CardRecord> {
        let needle = query.to_lowercase();
        self.all_cards()
            .into_iter()
            .filter(|card| {
                search_haystacks(card)
                    .iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Page through the store, newest first.
    pub fn paginate(&self, page: usize, limit: usize, search: Option<&str>) -> CardPage {
        let page = page.max(1);
        let limit = limit.max(1);

        let mut cards = match search {
            Some(q) if !q.is_empty() => self.search(q),
            _ => self.all_cards(),
        };
        cards.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let total = cards.len();
        let total_pages = total.div_ceil(limit);
        let start = (page - 1) * limit;

        let cards: Vec<CardRecord> = cards
            .into_iter()
            .skip(start)
            .take(limit)
            .collect();

        CardPage {
            cards,
            pagination: Pagination {
                page,
                limit,
                total,
                total_pages,
                has_next: page < total_pages,
                has_prev: page > 1,
            },
        }
    }

    /// First record with the given id, if any. Ids can collide; the first
    /// match wins.
    pub fn card_by_id(&self, id: &str) -> Option<CardRecord> {
        self.all_cards().into_iter().find(|card| card.id == id)
    }

    pub fn stats(&self) -> StoreStats {
        let cards = self.all_cards();
        let with_casual = cards.iter().filter(|c| c.has_polite_and_casual).count();
        StoreStats {
            total: cards.len(),
            with_casual,
            without_casual: cards.len() - with_casual,
        }
    }
}
