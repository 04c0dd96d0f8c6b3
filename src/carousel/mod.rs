//! Looping carousel: a cursor over a tripled item sequence that moves one slot
//! at a time and snaps back into the middle copy once a move settles.

pub mod controller;
pub mod sequence;
pub mod surface;
pub mod timer;

pub use controller::{
    AdvanceOutcome, CarouselController, ControllerOptions, InitOutcome, LayoutMode,
};
pub use sequence::ExtendedSequence;
pub use surface::{HeadlessSurface, Measurement, RenderSurface, SlotRole, Transition};
pub use timer::{Timeline, TimerEvent, TimerId, TimerSource};

use crate::site::reviews::ReviewCard;

/// Stable identity of a carousel item: its position in the source list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub enum ItemContent {
    Image { src: String, alt: String },
    Review(ReviewCard),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub content: ItemContent,
}

impl Item {
    pub fn label(&self) -> &str {
        match &self.content {
            ItemContent::Image { src, .. } => src,
            ItemContent::Review(card) => &card.author,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Which page carousel an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarouselKind {
    Students,
    Testimonials,
}

impl std::fmt::Display for CarouselKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CarouselKind::Students => f.write_str("students"),
            CarouselKind::Testimonials => f.write_str("testimonials"),
        }
    }
}
