use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::carousel::{Item, ItemContent, ItemId};
use crate::config::{StaticReview, TestimonialsConfig};
use crate::error::SiteError;
use crate::site::reviews::{RatingSummary, ReviewCard, ReviewRecord, excerpt, star_string};

/// Place details as far as the reviews widget cares.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub reviews: Vec<ReviewRecord>,
}

#[async_trait]
pub trait ReviewsProvider: Send + Sync {
    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, SiteError>;
}

/// Google Places "place details" lookup.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    status: String,
    #[serde(default)]
    result: Option<PlaceDetails>,
}

impl PlacesClient {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// `None` when no API key is configured.
    pub fn from_config(cfg: &TestimonialsConfig) -> Result<Option<Self>, SiteError> {
        let Some(api_key) = cfg.api_key.as_deref().filter(|k| !k.is_empty()) else {
            return Ok(None);
        };
        let http = reqwest::Client::builder()
            .timeout(cfg.request_timeout)
            .build()?;
        Ok(Some(Self::new(http, &cfg.places_endpoint, api_key)))
    }
}

#[async_trait]
impl ReviewsProvider for PlacesClient {
    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, SiteError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("place_id", place_id),
                ("fields", "name,rating,reviews,user_ratings_total"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SiteError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }
        let body = response.bytes().await?;
        let parsed: PlacesResponse = serde_json::from_slice(&body)?;
        if parsed.status != "OK" {
            return Err(SiteError::Provider(parsed.status));
        }
        parsed
            .result
            .ok_or_else(|| SiteError::Provider("missing result".to_string()))
    }
}

/// What the testimonials section shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewsView {
    Live {
        cards: Vec<ReviewCard>,
        summary: RatingSummary,
    },
    /// The pre-rendered set; provider problems never reach the visitor.
    Fallback { cards: Vec<ReviewCard> },
}

impl ReviewsView {
    pub fn cards(&self) -> &[ReviewCard] {
        match self {
            ReviewsView::Live { cards, .. } | ReviewsView::Fallback { cards } => cards,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ReviewsView::Fallback { .. })
    }

    /// Carousel items, one per card.
    pub fn items(&self) -> Vec<Item> {
        self.cards()
            .iter()
            .enumerate()
            .map(|(pos, card)| Item {
                id: ItemId(pos),
                content: ItemContent::Review(card.clone()),
            })
            .collect()
    }
}

pub async fn load_reviews(
    provider: Option<&dyn ReviewsProvider>,
    cfg: &TestimonialsConfig,
    now: DateTime<Utc>,
) -> ReviewsView {
    let place_id = cfg.place_id.as_deref().filter(|id| !id.is_empty());
    let (Some(provider), Some(place_id)) = (provider, place_id) else {
        warn!("place id or api key missing; showing fallback reviews");
        return fallback(cfg);
    };

    let details = match provider.place_details(place_id).await {
        Ok(details) => details,
        Err(err) => {
            warn!(error = %err, "reviews lookup failed; showing fallback reviews");
            return fallback(cfg);
        }
    };
    if details.reviews.is_empty() {
        warn!("provider returned no reviews; showing fallback reviews");
        return fallback(cfg);
    }

    let cards: Vec<ReviewCard> = details
        .reviews
        .iter()
        .take(cfg.max_reviews)
        .map(|record| ReviewCard::from_record(record, now, cfg.excerpt_words))
        .collect();
    info!(
        shown = cards.len(),
        total = ?details.user_ratings_total,
        "live reviews loaded"
    );
    ReviewsView::Live {
        cards,
        summary: RatingSummary::new(details.rating, details.user_ratings_total),
    }
}

fn fallback(cfg: &TestimonialsConfig) -> ReviewsView {
    ReviewsView::Fallback {
        cards: cfg
            .fallback
            .iter()
            .map(|review| static_card(review, cfg.excerpt_words))
            .collect(),
    }
}

fn static_card(review: &StaticReview, max_words: usize) -> ReviewCard {
    ReviewCard {
        author: review.author.clone(),
        stars: star_string(review.rating),
        age: review.age.clone(),
        excerpt: excerpt(&review.text, max_words),
        expanded: false,
    }
}
