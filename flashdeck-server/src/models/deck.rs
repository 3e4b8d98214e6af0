//! Deck model and input shape

use serde::Deserialize;
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{FromRow, Postgres};

use crate::db::{Entity, Relation};

use super::card::Card;
use super::validation::ValidationError;

/// Deck row. `id` is `None` only before the first save; `cards` is populated
/// only when prefetched.
#[derive(Debug, Clone, FromRow)]
pub struct Deck {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    #[sqlx(skip)]
    pub cards: Vec<Card>,
}

/// Client-supplied deck fields, no identifier.
#[derive(Debug, Clone, Deserialize)]
pub struct DeckCreate {
    pub name: String,
    pub description: Option<String>,
}

impl DeckCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        Ok(())
    }
}

impl Deck {
    /// Build an unsaved deck from client input.
    pub fn from_create(data: DeckCreate) -> Self {
        Self {
            id: None,
            name: data.name,
            description: data.description,
            cards: Vec::new(),
        }
    }

    /// Merge client input into a new value: every client-supplied field is
    /// replaced, the identifier is kept.
    pub fn apply(&self, data: DeckCreate) -> Self {
        Self {
            id: self.id,
            name: data.name,
            description: data.description,
            cards: Vec::new(),
        }
    }
}

impl Entity for Deck {
    const TABLE: &'static str = "decks";
    const COLUMNS: &'static [&'static str] = &["name", "description"];
    const RELATIONS: &'static [Relation] = &[Relation {
        name: "cards",
        table: "cards",
        foreign_key: "deck_id",
    }];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn push_column_values(&self, row: &mut Separated<'_, '_, Postgres, &'static str>) {
        row.push_bind(self.name.clone());
        row.push_bind(self.description.clone());
    }

    fn attach_related(&mut self, relation: &'static str, rows: Vec<PgRow>) -> sqlx::Result<()> {
        if relation == "cards" {
            self.cards = rows
                .iter()
                .map(Card::from_row)
                .collect::<sqlx::Result<Vec<_>>>()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_name() {
        let data = DeckCreate {
            name: String::new(),
            description: None,
        };
        let err = data.validate().unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "name" }));
    }

    #[test]
    fn accepts_missing_description() {
        let data: DeckCreate = serde_json::from_str(r#"{"name": "Spanish"}"#).unwrap();
        assert!(data.validate().is_ok());
        assert_eq!(data.description, None);
    }

    #[test]
    fn from_create_has_no_id() {
        let deck = Deck::from_create(DeckCreate {
            name: "Spanish".into(),
            description: None,
        });
        assert_eq!(deck.id, None);
    }

    #[test]
    fn apply_replaces_fields_and_keeps_id() {
        let deck = Deck {
            id: Some(3),
            name: "Spanish".into(),
            description: Some("old".into()),
            cards: Vec::new(),
        };
        let updated = deck.apply(DeckCreate {
            name: "Castilian".into(),
            description: None,
        });
        assert_eq!(updated.id, Some(3));
        assert_eq!(updated.name, "Castilian");
        assert_eq!(updated.description, None);
    }
}
