use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Identifier, PhotoUrl};

/// Body of a cards-list search request.
///
/// Serializes to
/// `{"settings":{"filter":{"textSearch":..,"withPhoto":1},"sort":{"ascending":false},"cursor":{"limit":1}}}`.
#[derive(Clone, Debug, Serialize)]
pub struct CardsRequest {
    pub settings: SearchSettings,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchSettings {
    pub filter: SearchFilter,
    pub sort: SearchSort,
    pub cursor: SearchCursor,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    pub text_search: String,
    /// `1` = only cards that have photos.
    pub with_photo: i32,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct SearchSort {
    pub ascending: bool,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct SearchCursor {
    pub limit: u32,
}

impl CardsRequest {
    /// Newest single card with at least one photo matching `identifier`.
    pub fn for_identifier(identifier: &Identifier) -> Self {
        Self {
            settings: SearchSettings {
                filter: SearchFilter {
                    text_search: identifier.as_str().to_string(),
                    with_photo: 1,
                },
                sort: SearchSort { ascending: false },
                cursor: SearchCursor { limit: 1 },
            },
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CardsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cards: Vec<Card>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Card {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub photos: Vec<CardPhoto>,
}

/// Size variants of one product photo.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CardPhoto {
    pub big: Option<String>,
    pub c516x688: Option<String>,
    pub square: Option<String>,
    pub tm: Option<String>,
}

impl CardPhoto {
    /// Largest variant available: big, then c516x688, then square, then tm.
    pub fn best_url(&self) -> Option<PhotoUrl> {
        [&self.big, &self.c516x688, &self.square, &self.tm]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .map(|s| PhotoUrl::new(s.clone()))
    }
}

impl CardsResponse {
    /// Best variant of the first photo of the first card, if any.
    pub fn first_photo_url(&self) -> Option<PhotoUrl> {
        self.cards.first()?.photos.first()?.best_url()
    }
}

fn null_as_empty<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}
