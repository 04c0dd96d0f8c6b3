//! One-shot fade-in for cards, testimonials and stats as they scroll into view.

use serde::Deserialize;

/// Share of an element that must be inside the viewport before it fades in.
pub const THRESHOLD: f32 = 0.1;
/// The bottom edge of the viewport is pulled up by this much.
pub const BOTTOM_MARGIN_PX: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealKind {
    Card,
    Testimonial,
    Stat,
}

/// An element watched for the fade-in, positioned in document coordinates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RevealTarget {
    pub kind: RevealKind,
    pub top: f32,
    pub height: f32,
}

impl RevealTarget {
    /// Fraction of the element inside the margin-adjusted viewport.
    pub fn visible_ratio(&self, scroll_top: f32, viewport_height: f32) -> f32 {
        if self.height <= 0.0 {
            return 0.0;
        }
        let view_bottom = scroll_top + viewport_height - BOTTOM_MARGIN_PX;
        let overlap = (self.top + self.height).min(view_bottom) - self.top.max(scroll_top);
        (overlap / self.height).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Reveal {
    targets: Vec<RevealTarget>,
    shown: Vec<bool>,
}

impl Reveal {
    pub fn new(targets: Vec<RevealTarget>) -> Self {
        let shown = vec![false; targets.len()];
        Self { targets, shown }
    }

    /// Indices that fade in at this scroll position. A target is reported at
    /// most once and stays shown when it scrolls back out.
    pub fn on_scroll(&mut self, scroll_top: f32, viewport_height: f32) -> Vec<usize> {
        let mut revealed = Vec::new();
        for (index, (target, shown)) in self.targets.iter().zip(self.shown.iter_mut()).enumerate() {
            if !*shown && target.visible_ratio(scroll_top, viewport_height) >= THRESHOLD {
                *shown = true;
                revealed.push(index);
            }
        }
        revealed
    }

    pub fn target(&self, index: usize) -> Option<&RevealTarget> {
        self.targets.get(index)
    }

    pub fn is_shown(&self, index: usize) -> bool {
        self.shown.get(index).copied().unwrap_or(false)
    }

    /// Targets still waiting to be revealed.
    pub fn pending(&self) -> usize {
        self.shown.iter().filter(|shown| !**shown).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(top: f32) -> RevealTarget {
        RevealTarget {
            kind: RevealKind::Card,
            top,
            height: 200.0,
        }
    }

    #[test]
    fn ratio_respects_bottom_margin() {
        let t = card(700.0);
        // viewport 0..800 shrinks to 0..750, leaving 50 of 200 px visible
        assert!((t.visible_ratio(0.0, 800.0) - 0.25).abs() < f32::EPSILON);
        assert_eq!(card(760.0).visible_ratio(0.0, 800.0), 0.0);
        assert_eq!(t.visible_ratio(1000.0, 800.0), 0.0);
        assert_eq!(t.visible_ratio(600.0, 800.0), 1.0);
    }

    #[test]
    fn each_target_reveals_once() {
        let mut reveal = Reveal::new(vec![card(100.0), card(1200.0), card(735.0)]);
        // third card has 15 px of 200 inside, under the threshold
        assert_eq!(reveal.on_scroll(0.0, 800.0), vec![0]);
        assert_eq!(reveal.pending(), 2);

        assert_eq!(reveal.on_scroll(600.0, 800.0), vec![1, 2]);
        assert_eq!(reveal.on_scroll(0.0, 800.0), Vec::<usize>::new());
        assert!(reveal.is_shown(0));
        assert_eq!(reveal.pending(), 0);
    }
}
