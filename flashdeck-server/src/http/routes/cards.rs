//! Card endpoints
//!
//! Cards are always addressed through their owning deck for writes; the
//! route path decides the `deck_id`, never the request body.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::FilterValue;
use crate::http::error::ApiError;
use crate::models::{Card, CardCreate, CardUpdate, Items};
use crate::state::AppState;

/// Card response
#[derive(Serialize)]
pub struct CardResponse {
    pub id: Option<i64>,
    pub front: String,
    pub back: Option<String>,
    pub hint: Option<String>,
    pub deck_id: Option<i64>,
}

impl From<Card> for CardResponse {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            front: card.front,
            back: card.back,
            hint: card.hint,
            deck_id: card.deck_id,
        }
    }
}

/// GET /decks/{deck_id}/cards/ - list a deck's cards
async fn list_cards(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
) -> Result<Json<Items<CardResponse>>, ApiError> {
    let mut session = state.session().await?;
    let cards = session
        .repo::<Card>()
        .filter(&[("deck_id", FilterValue::Int(deck_id))])
        .await?;

    Ok(Json(
        cards
            .into_iter()
            .map(CardResponse::from)
            .collect::<Vec<_>>()
            .into(),
    ))
}

/// GET /cards/{card_id}/ - get a single card
async fn get_card(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
) -> Result<Json<CardResponse>, ApiError> {
    let mut session = state.session().await?;
    let card = session
        .repo::<Card>()
        .get_by_id(card_id, &[])
        .await?
        .ok_or(ApiError::not_found("Card"))?;

    Ok(Json(card.into()))
}

/// POST /decks/{deck_id}/cards/ - create cards under a deck
async fn create_cards(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
    Json(payload): Json<Vec<CardCreate>>,
) -> Result<Json<Items<CardResponse>>, ApiError> {
    for card in &payload {
        card.validate()?;
    }

    let mut cards: Vec<Card> = payload
        .into_iter()
        .map(|data| Card::from_create(data, deck_id))
        .collect();

    let mut session = state.session().await?;
    session.repo::<Card>().bulk_create(&mut cards).await?;

    Ok(Json(
        cards
            .into_iter()
            .map(CardResponse::from)
            .collect::<Vec<_>>()
            .into(),
    ))
}

/// PUT /decks/{deck_id}/cards/ - bulk-update cards, rebinding them to the
/// deck named by the route
async fn update_cards(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
    Json(payload): Json<Vec<CardUpdate>>,
) -> Result<Json<Items<CardResponse>>, ApiError> {
    for card in &payload {
        card.validate()?;
    }

    let cards: Vec<Card> = payload
        .into_iter()
        .map(|data| Card::from_update(data, deck_id))
        .collect();

    let mut session = state.session().await?;
    session.repo::<Card>().bulk_update(&cards).await?;

    Ok(Json(
        cards
            .into_iter()
            .map(CardResponse::from)
            .collect::<Vec<_>>()
            .into(),
    ))
}

/// Card routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/decks/{deck_id}/cards/",
            get(list_cards).post(create_cards).put(update_cards),
        )
        .route("/cards/{card_id}/", get(get_card))
}
