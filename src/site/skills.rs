//! Shadows on the stacked skill cards. The cards stick to the bottom of the
//! viewport until their slot scrolls up; only the first two stuck cards keep
//! a shadow so the pile does not darken.

use serde::Deserialize;

/// A card counts as stuck when its bottom is within this distance of the
/// viewport bottom.
pub const STICKY_TOLERANCE_PX: f32 = 5.0;
pub const SHADOWED_STICKY_CARDS: usize = 2;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SkillCard {
    pub title: String,
    /// Bottom edge of the card's slot in document coordinates.
    pub bottom: f32,
}

/// Shadow flag per card from each card's on-screen bottom edge, in page order.
pub fn shadow_flags(rect_bottoms: &[f32], viewport_height: f32) -> Vec<bool> {
    let mut stuck = 0;
    rect_bottoms
        .iter()
        .map(|&bottom| {
            if bottom < viewport_height - STICKY_TOLERANCE_PX {
                return true;
            }
            stuck += 1;
            stuck <= SHADOWED_STICKY_CARDS
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct SkillStack {
    cards: Vec<SkillCard>,
    shadows: Vec<bool>,
}

impl SkillStack {
    pub fn new(cards: Vec<SkillCard>) -> Self {
        let shadows = vec![false; cards.len()];
        Self { cards, shadows }
    }

    /// Recomputes the shadows; returns whether any changed.
    pub fn on_scroll(&mut self, scroll_top: f32, viewport_height: f32) -> bool {
        // a stuck card never sits below the viewport bottom
        let bottoms: Vec<f32> = self
            .cards
            .iter()
            .map(|card| (card.bottom - scroll_top).min(viewport_height))
            .collect();
        let shadows = shadow_flags(&bottoms, viewport_height);
        let changed = shadows != self.shadows;
        self.shadows = shadows;
        changed
    }

    pub fn shadows(&self) -> &[bool] {
        &self.shadows
    }

    pub fn cards(&self) -> &[SkillCard] {
        &self.cards
    }
}
