use std::time::Duration;

use tracing::trace;

use super::Item;

/// Live geometry read from the rendering surface at layout time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Rendered width of the first slot, in px.
    pub item_width: f32,
    /// Computed `gap` of the track, if the surface reports one.
    pub gap: Option<f32>,
    /// Width of the element containing the track, in px.
    pub container_width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Animated(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRole {
    Center,
    Side,
}

/// Container element a carousel renders into.
pub trait RenderSurface {
    fn append(&mut self, slot: usize, item: &Item);
    fn measure(&self) -> Measurement;
    fn set_transition(&mut self, transition: Transition);
    /// Horizontal translation of the track, in px.
    fn set_transform(&mut self, translate_x: f32);
    fn set_slot_width(&mut self, slot: usize, width: f32);
    /// Replaces every slot role; slots not listed have none.
    fn set_roles(&mut self, roles: &[(usize, SlotRole)]);
}

/// In-memory surface: keeps what a real container would show and logs every
/// write at trace level. Geometry is whatever the host last set.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    name: &'static str,
    measurement: Measurement,
    slots: Vec<Item>,
    slot_widths: Vec<Option<f32>>,
    roles: Vec<(usize, SlotRole)>,
    transform: Option<f32>,
    transition: Transition,
    writes: usize,
}

impl HeadlessSurface {
    pub fn new(name: &'static str, measurement: Measurement) -> Self {
        Self {
            name,
            measurement,
            slots: Vec::new(),
            slot_widths: Vec::new(),
            roles: Vec::new(),
            transform: None,
            transition: Transition::None,
            writes: 0,
        }
    }

    pub fn set_measurement(&mut self, measurement: Measurement) {
        self.measurement = measurement;
    }

    pub fn slots(&self) -> &[Item] {
        &self.slots
    }

    pub fn slot_width(&self, slot: usize) -> Option<f32> {
        self.slot_widths.get(slot).copied().flatten()
    }

    pub fn transform(&self) -> Option<f32> {
        self.transform
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }

    pub fn role_of(&self, slot: usize) -> Option<SlotRole> {
        self.roles
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, role)| *role)
    }

    pub fn roles(&self) -> &[(usize, SlotRole)] {
        &self.roles
    }

    /// Total number of mutating calls received.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl RenderSurface for HeadlessSurface {
    fn append(&mut self, slot: usize, item: &Item) {
        trace!(surface = self.name, slot, item = item.label(), "append");
        debug_assert_eq!(slot, self.slots.len());
        self.slots.push(item.clone());
        self.slot_widths.push(None);
        self.writes += 1;
    }

    fn measure(&self) -> Measurement {
        self.measurement
    }

    fn set_transition(&mut self, transition: Transition) {
        trace!(surface = self.name, ?transition, "transition");
        self.transition = transition;
        self.writes += 1;
    }

    fn set_transform(&mut self, translate_x: f32) {
        trace!(surface = self.name, translate_x, "transform");
        self.transform = Some(translate_x);
        self.writes += 1;
    }

    fn set_slot_width(&mut self, slot: usize, width: f32) {
        if let Some(entry) = self.slot_widths.get_mut(slot) {
            *entry = Some(width);
        }
        self.writes += 1;
    }

    fn set_roles(&mut self, roles: &[(usize, SlotRole)]) {
        trace!(surface = self.name, ?roles, "roles");
        self.roles.clear();
        self.roles.extend_from_slice(roles);
        self.writes += 1;
    }
}
