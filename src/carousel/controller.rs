use std::time::Duration;

use tracing::{debug, trace};

use super::sequence::ExtendedSequence;
use super::surface::{RenderSurface, SlotRole, Transition};
use super::timer::{Timeline, TimerEvent, TimerId, TimerSource};
use super::{Direction, Item};

/// Gap used when the surface does not report a computed one.
pub const FALLBACK_GAP_PX: f32 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Slots keep their own width; the current slot is centred in the track.
    Centered,
    /// Every slot is as wide as the container; one slot fills the view.
    Paged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerOptions {
    pub layout: LayoutMode,
    /// Duration of the animated transform.
    pub transition: Duration,
    /// Wait after an animated move before checking wraparound and unlocking.
    ///
    /// This stands in for an animation-completion signal, which is not
    /// reliable under rapid re-triggering. It must not be shorter than
    /// `transition` or a snap can cut an animation short.
    pub settle_delay: Duration,
    /// Wait after a non-animated layout before transitions are re-enabled.
    pub reflow_delay: Duration,
    /// Period of the auto-advance timer; `None` for manual-only carousels.
    pub auto_advance: Option<Duration>,
}

impl ControllerOptions {
    /// Student photo strip: centred slots, auto-advancing every 3 s.
    pub fn students() -> Self {
        Self {
            layout: LayoutMode::Centered,
            transition: Duration::from_millis(600),
            settle_delay: Duration::from_millis(650),
            reflow_delay: Duration::from_millis(50),
            auto_advance: Some(Duration::from_millis(3000)),
        }
    }

    /// Testimonials: one review per page, prev/next only.
    pub fn testimonials() -> Self {
        Self {
            layout: LayoutMode::Paged,
            transition: Duration::from_millis(500),
            settle_delay: Duration::from_millis(500),
            reflow_delay: Duration::from_millis(20),
            auto_advance: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Active,
    /// The container is not on the page.
    NoSurface,
    /// Nothing to show; the caller renders its "none found" state.
    NoItems,
    AlreadyActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Moved { cursor: usize },
    /// A move was already in flight; the request is discarded.
    Dropped,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Geometry {
    item_size: f32,
    gap: f32,
    container_width: f32,
}

#[derive(Debug)]
struct Running {
    sequence: ExtendedSequence,
    cursor: usize,
    locked: bool,
    heading: Direction,
    resize_pending: bool,
    auto_timer: Option<TimerId>,
    geometry: Geometry,
}

/// Infinite carousel over an [`ExtendedSequence`].
///
/// All state changes happen inside the calls below; the host forwards timer
/// callbacks to [`CarouselController::on_timer`]. The transition lock is only
/// released by the settle timer.
#[derive(Debug)]
pub struct CarouselController<S, T> {
    options: ControllerOptions,
    surface: Option<S>,
    timers: T,
    running: Option<Running>,
}

impl<S: RenderSurface, T: TimerSource> CarouselController<S, T> {
    pub fn new(options: ControllerOptions, surface: Option<S>, timers: T) -> Self {
        Self {
            options,
            surface,
            timers,
            running: None,
        }
    }

    pub fn initialize(&mut self, items: Vec<Item>) -> InitOutcome {
        if self.running.is_some() {
            return InitOutcome::AlreadyActive;
        }
        let Some(surface) = self.surface.as_mut() else {
            debug!("carousel container missing; staying inert");
            return InitOutcome::NoSurface;
        };
        let Some(sequence) = ExtendedSequence::build(items) else {
            debug!("no carousel items; staying inert");
            return InitOutcome::NoItems;
        };

        for (slot, item) in sequence.slots() {
            surface.append(slot, item);
        }
        let geometry = measure(surface, self.options.layout);
        let cursor = sequence.middle_start();
        debug!(
            items = sequence.source_len(),
            slots = sequence.len(),
            cursor,
            "carousel initialized"
        );
        self.running = Some(Running {
            sequence,
            cursor,
            locked: false,
            heading: Direction::Forward,
            resize_pending: false,
            auto_timer: None,
            geometry,
        });
        self.layout(false);

        if let Some(period) = self.options.auto_advance {
            let id = self
                .timers
                .schedule_repeating(period, TimerEvent::AutoAdvance);
            if let Some(running) = self.running.as_mut() {
                running.auto_timer = Some(id);
            }
        }
        InitOutcome::Active
    }

    pub fn advance(&mut self, direction: Direction) -> AdvanceOutcome {
        let Some(running) = self.running.as_mut() else {
            return AdvanceOutcome::Inactive;
        };
        if running.locked {
            trace!(?direction, cursor = running.cursor, "move in flight; dropping advance");
            return AdvanceOutcome::Dropped;
        }
        running.locked = true;
        running.heading = direction;
        running.cursor = match direction {
            Direction::Forward => running.cursor + 1,
            Direction::Backward => running.cursor.saturating_sub(1),
        };
        let cursor = running.cursor;
        self.layout(true);
        self.timers
            .schedule_once(self.options.settle_delay, TimerEvent::Settle);
        trace!(?direction, cursor, "carousel advanced");
        AdvanceOutcome::Moved { cursor }
    }

    /// Re-reads geometry and re-applies the current position without animation.
    /// Deferred until the settle timer fires while a move is in flight.
    pub fn resize(&mut self) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        if running.locked {
            running.resize_pending = true;
            return;
        }
        self.layout(false);
    }

    pub fn on_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::AutoAdvance => {
                self.advance(Direction::Forward);
            }
            TimerEvent::Settle => self.settle(),
            TimerEvent::RestoreTransition => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.set_transition(Transition::Animated(self.options.transition));
                }
            }
        }
    }

    /// Cancels auto-advance. Pending one-shot timers still fire.
    pub fn stop(&mut self) {
        if let Some(id) = self.running.as_mut().and_then(|r| r.auto_timer.take()) {
            self.timers.cancel(id);
            debug!("carousel auto-advance stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.running.is_some()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.running.as_ref().map(|r| r.cursor)
    }

    pub fn is_locked(&self) -> bool {
        self.running.as_ref().is_some_and(|r| r.locked)
    }

    pub fn sequence(&self) -> Option<&ExtendedSequence> {
        self.running.as_ref().map(|r| &r.sequence)
    }

    pub fn current_item(&self) -> Option<&Item> {
        let running = self.running.as_ref()?;
        running.sequence.slot(running.cursor)
    }

    pub fn current_source_index(&self) -> Option<usize> {
        let running = self.running.as_ref()?;
        Some(running.sequence.source_index(running.cursor))
    }

    /// `cursor × (itemSize + gap)` for the geometry of the last layout.
    pub fn offset(&self) -> Option<f32> {
        let running = self.running.as_ref()?;
        Some(running.cursor as f32 * (running.geometry.item_size + running.geometry.gap))
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    fn settle(&mut self) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        let mut relayout = std::mem::take(&mut running.resize_pending);
        if let Some(target) = running.sequence.wrap_target(running.cursor, running.heading) {
            debug!(from = running.cursor, to = target, "carousel wrapped");
            running.cursor = target;
            relayout = true;
        }
        if relayout {
            self.layout(false);
        }
        if let Some(running) = self.running.as_mut() {
            running.locked = false;
        }
    }

    fn layout(&mut self, animated: bool) {
        let (Some(running), Some(surface)) = (self.running.as_mut(), self.surface.as_mut()) else {
            return;
        };
        let geometry = measure(surface, self.options.layout);
        running.geometry = geometry;

        let offset = running.cursor as f32 * (geometry.item_size + geometry.gap);
        let translate_x = match self.options.layout {
            LayoutMode::Centered => -(offset + geometry.item_size / 2.0),
            LayoutMode::Paged => -offset,
        };

        if !animated {
            surface.set_transition(Transition::None);
        }
        if self.options.layout == LayoutMode::Paged {
            for slot in 0..running.sequence.len() {
                surface.set_slot_width(slot, geometry.container_width);
            }
        }
        surface.set_roles(&roles_around(running.cursor, running.sequence.len()));
        surface.set_transform(translate_x);

        if !animated {
            self.timers
                .schedule_once(self.options.reflow_delay, TimerEvent::RestoreTransition);
        }
    }
}

impl<S: RenderSurface> CarouselController<S, Timeline> {
    /// Fires every timer due up to `at` in order, then moves the clock to `at`.
    /// Returns the number of events delivered.
    pub fn run_until(&mut self, at: Duration) -> usize {
        let mut fired = 0;
        while let Some(event) = self.timers.pop_due(at) {
            self.on_timer(event);
            fired += 1;
        }
        self.timers.advance_to(at);
        fired
    }

    /// Advances the virtual clock by `delta` from its current time.
    pub fn run_for(&mut self, delta: Duration) -> usize {
        let at = self.timers.now() + delta;
        self.run_until(at)
    }
}

fn measure<S: RenderSurface>(surface: &S, layout: LayoutMode) -> Geometry {
    let m = surface.measure();
    match layout {
        LayoutMode::Centered => Geometry {
            item_size: m.item_width,
            gap: m.gap.filter(|g| g.is_finite()).unwrap_or(FALLBACK_GAP_PX),
            container_width: m.container_width,
        },
        LayoutMode::Paged => Geometry {
            item_size: m.container_width,
            gap: 0.0,
            container_width: m.container_width,
        },
    }
}

fn roles_around(cursor: usize, len: usize) -> Vec<(usize, SlotRole)> {
    let mut roles = Vec::with_capacity(3);
    if let Some(left) = cursor.checked_sub(1) {
        roles.push((left, SlotRole::Side));
    }
    if cursor < len {
        roles.push((cursor, SlotRole::Center));
    }
    if cursor + 1 < len {
        roles.push((cursor + 1, SlotRole::Side));
    }
    roles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::surface::{HeadlessSurface, Measurement};
    use crate::carousel::{ItemContent, ItemId};

    fn items(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| Item {
                id: ItemId(i),
                content: ItemContent::Image {
                    src: format!("student {}.webp", i + 1),
                    alt: String::new(),
                },
            })
            .collect()
    }

    fn surface() -> HeadlessSurface {
        HeadlessSurface::new(
            "test",
            Measurement {
                item_width: 300.0,
                gap: Some(20.0),
                container_width: 1200.0,
            },
        )
    }

    fn manual() -> ControllerOptions {
        ControllerOptions {
            auto_advance: None,
            ..ControllerOptions::students()
        }
    }

    #[test]
    fn roles_cover_cursor_and_neighbours() {
        assert_eq!(
            roles_around(5, 15),
            vec![(4, SlotRole::Side), (5, SlotRole::Center), (6, SlotRole::Side)]
        );
        assert_eq!(roles_around(0, 3), vec![(0, SlotRole::Center), (1, SlotRole::Side)]);
        assert_eq!(roles_around(2, 3), vec![(1, SlotRole::Side), (2, SlotRole::Center)]);
    }

    #[test]
    fn centered_transform_centres_current_slot() {
        let mut c = CarouselController::new(manual(), Some(surface()), Timeline::new());
        assert_eq!(c.initialize(items(3)), InitOutcome::Active);
        // cursor 3 * (300 + 20) = 960, plus half a slot
        assert_eq!(c.offset(), Some(960.0));
        assert_eq!(c.surface().unwrap().transform(), Some(-1110.0));
    }

    #[test]
    fn missing_gap_falls_back() {
        let mut s = surface();
        s.set_measurement(Measurement {
            item_width: 300.0,
            gap: None,
            container_width: 1200.0,
        });
        let mut c = CarouselController::new(manual(), Some(s), Timeline::new());
        c.initialize(items(2));
        assert_eq!(c.offset(), Some(2.0 * (300.0 + FALLBACK_GAP_PX)));
    }

    #[test]
    fn paged_layout_sizes_slots_to_container() {
        let mut c = CarouselController::new(
            ControllerOptions::testimonials(),
            Some(surface()),
            Timeline::new(),
        );
        c.initialize(items(3));
        let s = c.surface().unwrap();
        assert_eq!(s.transform(), Some(-3600.0));
        assert!((0..9).all(|slot| s.slot_width(slot) == Some(1200.0)));
    }

    #[test]
    fn second_initialize_is_ignored() {
        let mut c = CarouselController::new(manual(), Some(surface()), Timeline::new());
        c.initialize(items(2));
        assert_eq!(c.initialize(items(4)), InitOutcome::AlreadyActive);
        assert_eq!(c.sequence().unwrap().source_len(), 2);
    }

    #[test]
    fn stop_cancels_auto_advance() {
        let mut c = CarouselController::new(
            ControllerOptions::students(),
            Some(surface()),
            Timeline::new(),
        );
        c.initialize(items(4));
        c.run_until(Duration::from_millis(100));
        c.stop();
        c.run_until(Duration::from_secs(30));
        assert_eq!(c.cursor(), Some(4));
    }
}
