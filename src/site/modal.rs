use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ServiceSection {
    pub heading: String,
    /// Pre-rendered HTML fragment.
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ServiceContent {
    pub title: String,
    pub intro: String,
    #[serde(default)]
    pub sections: Vec<ServiceSection>,
}

impl ServiceContent {
    /// Modal body markup, ending with the booking call-to-action.
    pub fn render_html(&self) -> String {
        let mut html = String::new();
        let _ = writeln!(html, "<h2>{}</h2>", self.title);
        let _ = writeln!(html, "<p class=\"modal-intro\">{}</p>", self.intro);
        for section in &self.sections {
            let _ = writeln!(html, "<h3>{}</h3>", section.heading);
            let _ = writeln!(html, "{}", section.content);
        }
        html.push_str("<a href=\"#contact\" class=\"modal-cta\">Book This Service</a>\n");
        html
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalClick {
    CloseButton,
    /// The dimmed area around the dialog.
    Backdrop,
    /// Anywhere inside the dialog.
    Dialog,
    /// The call-to-action link, which also dismisses the dialog.
    BookingLink,
}

/// Service details dialog. Opening it locks page scrolling.
#[derive(Debug, Clone)]
pub struct ServiceModal {
    catalog: BTreeMap<String, ServiceContent>,
    open: Option<String>,
}

impl ServiceModal {
    pub fn new(catalog: BTreeMap<String, ServiceContent>) -> Self {
        Self {
            catalog,
            open: None,
        }
    }

    /// Opens the dialog for `service` and returns its body. Unknown services
    /// leave the modal untouched.
    pub fn open(&mut self, service: &str) -> Option<String> {
        let content = self.catalog.get(service)?;
        debug!(service, "service modal opened");
        self.open = Some(service.to_string());
        Some(content.render_html())
    }

    pub fn click(&mut self, target: ModalClick) {
        match target {
            ModalClick::CloseButton | ModalClick::Backdrop | ModalClick::BookingLink => {
                self.close()
            }
            ModalClick::Dialog => {}
        }
    }

    pub fn key(&mut self, key: &str) {
        if key == "Escape" && self.is_open() {
            self.close();
        }
    }

    pub fn close(&mut self) {
        if self.open.take().is_some() {
            debug!("service modal closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn open_service(&self) -> Option<&str> {
        self.open.as_deref()
    }

    pub fn body_scroll_locked(&self) -> bool {
        self.is_open()
    }

    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.catalog.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modal() -> ServiceModal {
        let mut catalog = BTreeMap::new();
        catalog.insert(
            "manual".to_string(),
            ServiceContent {
                title: "Manual Driving Lessons".into(),
                intro: "Master clutch control.".into(),
                sections: vec![ServiceSection {
                    heading: "What You'll Learn".into(),
                    content: "<ul><li>Roundabouts</li></ul>".into(),
                }],
            },
        );
        ServiceModal::new(catalog)
    }

    #[test]
    fn open_renders_content_and_locks_scroll() {
        let mut m = modal();
        let html = m.open("manual").unwrap();
        assert!(html.starts_with("<h2>Manual Driving Lessons</h2>"));
        assert!(html.contains("<h3>What You'll Learn</h3>"));
        assert!(html.trim_end().ends_with("Book This Service</a>"));
        assert!(m.body_scroll_locked());
    }

    #[test]
    fn unknown_service_is_ignored() {
        let mut m = modal();
        assert!(m.open("skydiving").is_none());
        assert!(!m.is_open());
    }

    #[test]
    fn dismissal_paths() {
        let mut m = modal();
        m.open("manual");
        m.click(ModalClick::Dialog);
        assert!(m.is_open());
        m.click(ModalClick::Backdrop);
        assert!(!m.is_open());

        m.open("manual");
        m.key("Enter");
        assert!(m.is_open());
        m.key("Escape");
        assert!(!m.body_scroll_locked());
    }
}
