//! Card model and input shapes

use serde::Deserialize;
use sqlx::query_builder::Separated;
use sqlx::{FromRow, Postgres};

use crate::db::Entity;

use super::validation::ValidationError;

/// Card row. `deck_id` is `None` only before creation-binding; persisted
/// rows always reference their owning deck.
#[derive(Debug, Clone, FromRow)]
pub struct Card {
    pub id: Option<i64>,
    pub front: String,
    pub back: Option<String>,
    pub hint: Option<String>,
    pub deck_id: Option<i64>,
}

/// Client-supplied card fields, no identifier. The owning deck comes from
/// the route path, never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct CardCreate {
    pub front: String,
    pub back: Option<String>,
    pub hint: Option<String>,
}

impl CardCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.front.is_empty() {
            return Err(ValidationError::Empty { field: "front" });
        }
        Ok(())
    }
}

/// Full card shape as submitted for bulk updates. A `deck_id` in the body is
/// accepted and ignored; the route path decides ownership.
#[derive(Debug, Clone, Deserialize)]
pub struct CardUpdate {
    pub id: i64,
    pub front: String,
    pub back: Option<String>,
    pub hint: Option<String>,
    pub deck_id: Option<i64>,
}

impl CardUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id < 1 {
            return Err(ValidationError::NotPositive { field: "id" });
        }
        if self.front.is_empty() {
            return Err(ValidationError::Empty { field: "front" });
        }
        Ok(())
    }
}

impl Card {
    /// Build an unsaved card from client input, bound to the deck named by
    /// the route.
    pub fn from_create(data: CardCreate, deck_id: i64) -> Self {
        Self {
            id: None,
            front: data.front,
            back: data.back,
            hint: data.hint,
            deck_id: Some(deck_id),
        }
    }

    /// Rebuild a persisted card from a full update shape. The route's
    /// `deck_id` wins over whatever the body carried.
    pub fn from_update(data: CardUpdate, deck_id: i64) -> Self {
        Self {
            id: Some(data.id),
            front: data.front,
            back: data.back,
            hint: data.hint,
            deck_id: Some(deck_id),
        }
    }
}

impl Entity for Card {
    const TABLE: &'static str = "cards";
    const COLUMNS: &'static [&'static str] = &["front", "back", "hint", "deck_id"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn push_column_values(&self, row: &mut Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(self.front.clone());
        row.push_bind(self.back.clone());
        row.push_bind(self.hint.clone());
        row.push_bind(self.deck_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_front() {
        let data = CardCreate {
            front: String::new(),
            back: None,
            hint: None,
        };
        let err = data.validate().unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "front" }));
    }

    #[test]
    fn rejects_non_positive_id() {
        let data = CardUpdate {
            id: 0,
            front: "hola".into(),
            back: None,
            hint: None,
            deck_id: None,
        };
        let err = data.validate().unwrap_err();
        assert!(matches!(err, ValidationError::NotPositive { field: "id" }));
    }

    #[test]
    fn create_binds_deck_from_route() {
        let card = Card::from_create(
            CardCreate {
                front: "hola".into(),
                back: Some("hello".into()),
                hint: None,
            },
            7,
        );
        assert_eq!(card.id, None);
        assert_eq!(card.deck_id, Some(7));
    }

    #[test]
    fn update_route_deck_wins_over_body() {
        let data: CardUpdate =
            serde_json::from_str(r#"{"id": 4, "front": "hola", "deck_id": 99}"#).unwrap();
        let card = Card::from_update(data, 7);
        assert_eq!(card.id, Some(4));
        assert_eq!(card.deck_id, Some(7));
    }
}
