use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::carousel::{Item, ItemContent, ItemId};
use crate::config::StudentCarouselConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentImage {
    pub path: PathBuf,
    /// Number in the file name, starting at 1.
    pub index: u32,
}

impl StudentImage {
    pub fn alt_text(&self) -> String {
        format!(
            "Happy student {} after passing their driving test",
            self.index
        )
    }
}

/// Finds `student <n>.<ext>` photos by probing increasing indices.
///
/// Numbering may have holes; probing stops after `max_consecutive_misses`
/// missing indices in a row or past `max_index`.
#[instrument(skip(cfg), fields(dir = %cfg.image_dir.display()))]
pub fn discover_student_images(cfg: &StudentCarouselConfig) -> Vec<StudentImage> {
    let mut found = Vec::new();
    let mut misses = 0;
    let mut index = 1;

    while misses < cfg.max_consecutive_misses && index <= cfg.max_index {
        match probe(&cfg.image_dir, index, &cfg.formats) {
            Some(path) => {
                debug!(index, path = %path.display(), "student image found");
                found.push(StudentImage { path, index });
                misses = 0;
            }
            None => misses += 1,
        }
        index += 1;
    }

    if found.is_empty() {
        info!("no student images found");
    } else {
        info!(count = found.len(), "student images discovered");
    }
    found
}

/// Carousel items in discovery order; item ids follow list position.
pub fn student_items(images: &[StudentImage]) -> Vec<Item> {
    images
        .iter()
        .enumerate()
        .map(|(pos, image)| Item {
            id: ItemId(pos),
            content: ItemContent::Image {
                src: image.path.to_string_lossy().into_owned(),
                alt: image.alt_text(),
            },
        })
        .collect()
}

fn probe(dir: &Path, index: u32, formats: &[String]) -> Option<PathBuf> {
    formats
        .iter()
        .map(|ext| dir.join(format!("student {index}.{ext}")))
        .find(|candidate| candidate.is_file())
}
