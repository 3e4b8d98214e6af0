//! Deck endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::models::{Deck, DeckCreate, Items};
use crate::state::AppState;

use super::cards::CardResponse;

/// Deck response
#[derive(Serialize)]
pub struct DeckResponse {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
}

impl From<Deck> for DeckResponse {
    fn from(deck: Deck) -> Self {
        Self {
            id: deck.id,
            name: deck.name,
            description: deck.description,
        }
    }
}

/// Deck response with its cards, for single-deck reads
#[derive(Serialize)]
pub struct DeckDetailResponse {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub cards: Vec<CardResponse>,
}

impl From<Deck> for DeckDetailResponse {
    fn from(deck: Deck) -> Self {
        Self {
            id: deck.id,
            name: deck.name,
            description: deck.description,
            cards: deck.cards.into_iter().map(CardResponse::from).collect(),
        }
    }
}

/// GET /decks/ - list all decks
async fn list_decks(State(state): State<AppState>) -> Result<Json<Items<DeckResponse>>, ApiError> {
    let mut session = state.session().await?;
    let decks = session.repo::<Deck>().all().await?;

    Ok(Json(
        decks
            .into_iter()
            .map(DeckResponse::from)
            .collect::<Vec<_>>()
            .into(),
    ))
}

/// GET /decks/{deck_id}/ - get a single deck with its cards
async fn get_deck(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
) -> Result<Json<DeckDetailResponse>, ApiError> {
    let mut session = state.session().await?;
    let deck = session
        .repo::<Deck>()
        .get_by_id(deck_id, &["cards"])
        .await?
        .ok_or(ApiError::not_found("Deck"))?;

    Ok(Json(deck.into()))
}

/// PUT /decks/{deck_id}/ - replace a deck's client-supplied fields
async fn update_deck(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
    Json(payload): Json<DeckCreate>,
) -> Result<Json<DeckResponse>, ApiError> {
    payload.validate()?;

    let mut session = state.session().await?;
    let mut repo = session.repo::<Deck>();
    let deck = repo
        .get_by_id(deck_id, &[])
        .await?
        .ok_or(ApiError::not_found("Deck"))?;

    let mut updated = deck.apply(payload);
    repo.save(&mut updated).await?;

    Ok(Json(updated.into()))
}

/// POST /decks/ - create a deck
async fn create_deck(
    State(state): State<AppState>,
    Json(payload): Json<DeckCreate>,
) -> Result<Json<DeckResponse>, ApiError> {
    payload.validate()?;

    let mut deck = Deck::from_create(payload);
    let mut session = state.session().await?;
    session.repo::<Deck>().save(&mut deck).await?;

    Ok(Json(deck.into()))
}

/// Deck routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/decks/", get(list_decks).post(create_deck))
        .route("/decks/{deck_id}/", get(get_deck).put(update_deck))
}
