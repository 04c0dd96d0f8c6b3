use crate::carousel::CarouselKind;

/// Requests a host forwards to a running carousel task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselCommand {
    Next,
    Prev,
    /// Window resized; the new container width in px.
    Resize { width: f32 },
}

/// Emitted by a carousel task whenever its cursor changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselMoved {
    pub carousel: CarouselKind,
    pub cursor: usize,
    pub source_index: usize,
}
