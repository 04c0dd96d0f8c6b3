use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
    /// Rendered height of the answer panel, in px.
    #[serde(default = "FaqEntry::default_content_height")]
    pub content_height: f32,
}

impl FaqEntry {
    const fn default_content_height() -> f32 {
        120.0
    }
}

/// FAQ list with at most one entry expanded.
#[derive(Debug, Clone)]
pub struct Accordion {
    entries: Vec<FaqEntry>,
    open: Option<usize>,
}

impl Accordion {
    pub fn new(entries: Vec<FaqEntry>) -> Self {
        Self {
            entries,
            open: None,
        }
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open
    }

    /// Opens `index` and closes every other entry, or closes it if it was
    /// already open. Out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) {
        if index >= self.entries.len() {
            return;
        }
        self.open = if self.open == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    /// Max height of the panel at `index`: its content height when open, else 0.
    pub fn max_height(&self, index: usize) -> f32 {
        match (self.open, self.entries.get(index)) {
            (Some(open), Some(entry)) if open == index => entry.content_height,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faq() -> Accordion {
        Accordion::new(
            ["How many lessons?", "Do you do intensive courses?", "Pick-up?"]
                .into_iter()
                .enumerate()
                .map(|(i, q)| FaqEntry {
                    question: q.to_string(),
                    answer: String::new(),
                    content_height: 100.0 + i as f32,
                })
                .collect(),
        )
    }

    #[test]
    fn only_one_entry_open() {
        let mut a = faq();
        a.toggle(0);
        a.toggle(2);
        assert_eq!(a.open_index(), Some(2));
        assert_eq!(a.max_height(0), 0.0);
        assert_eq!(a.max_height(2), 102.0);
    }

    #[test]
    fn toggling_open_entry_closes_it() {
        let mut a = faq();
        a.toggle(1);
        a.toggle(1);
        assert_eq!(a.open_index(), None);
        a.toggle(9);
        assert_eq!(a.open_index(), None);
    }
}
