use tracing::debug;

use crate::carousel::{CarouselController, ControllerOptions, HeadlessSurface, Timeline};
use crate::config::{Configuration, StatConfig};
use crate::site::accordion::Accordion;
use crate::site::clipboard::CopyItem;
use crate::site::counter::CounterAnimation;
use crate::site::modal::ServiceModal;
use crate::site::nav::MobileNav;
use crate::site::notify::Notifier;
use crate::site::reveal::Reveal;
use crate::site::scroll::ScrollChrome;
use crate::site::skills::SkillStack;
use crate::tasks::contact::ContactForm;
use crate::tasks::files::{discover_student_images, student_items};
use crate::tasks::reviews::ReviewsView;

/// Per-feature handles, resolved once from the page configuration. A feature
/// whose section is absent stays `None` and every interaction with it is a
/// no-op for the host.
#[derive(Debug)]
pub struct PageBindings {
    pub nav: Option<MobileNav>,
    pub faq: Option<Accordion>,
    pub modal: Option<ServiceModal>,
    pub contact: Option<ContactForm>,
    pub scroll: ScrollChrome,
    pub counters: Vec<(StatConfig, CounterAnimation)>,
    pub skills: Option<SkillStack>,
    pub reveal: Reveal,
    pub contact_details: Vec<CopyItem>,
    pub toasts: Notifier,
}

impl PageBindings {
    pub fn resolve(cfg: &Configuration) -> Self {
        let nav = cfg.navigation.then(MobileNav::default);
        let faq = (!cfg.faq.is_empty()).then(|| Accordion::new(cfg.faq.clone()));
        let modal = (!cfg.services.is_empty()).then(|| ServiceModal::new(cfg.services.clone()));
        let contact = cfg.contact_form.as_ref().map(ContactForm::new);
        let counters = cfg
            .stats
            .iter()
            .map(|stat| {
                let anim = CounterAnimation::new(stat.target, &stat.value, stat.is_star_rating());
                (stat.clone(), anim)
            })
            .collect();
        let skills = (!cfg.skill_cards.is_empty()).then(|| SkillStack::new(cfg.skill_cards.clone()));

        for (feature, present) in [
            ("navigation", nav.is_some()),
            ("faq", faq.is_some()),
            ("service-modal", modal.is_some()),
            ("contact-form", contact.is_some()),
            ("skill-cards", skills.is_some()),
        ] {
            if !present {
                debug!(feature, "feature not on page; skipping");
            }
        }

        Self {
            nav,
            faq,
            modal,
            contact,
            scroll: ScrollChrome::default(),
            counters,
            skills,
            reveal: Reveal::new(cfg.reveal.clone()),
            contact_details: cfg.contact_details.iter().map(CopyItem::new).collect(),
            toasts: Notifier::default(),
        }
    }
}

/// Student photo carousel for the page, initialized from the images on disk.
/// Inert when the section is missing or no photos are found.
pub fn student_carousel(cfg: &Configuration) -> CarouselController<HeadlessSurface, Timeline> {
    match &cfg.student_carousel {
        Some(section) => {
            let surface = HeadlessSurface::new("students", section.measurement(&cfg.viewport));
            let mut controller = CarouselController::new(
                section.controller_options(),
                Some(surface),
                Timeline::new(),
            );
            let images = discover_student_images(section);
            controller.initialize(student_items(&images));
            controller
        }
        None => {
            debug!(feature = "student-carousel", "feature not on page; skipping");
            CarouselController::new(ControllerOptions::students(), None, Timeline::new())
        }
    }
}

/// Testimonial carousel over whichever review set is on display.
pub fn testimonial_carousel(
    cfg: &Configuration,
    view: &ReviewsView,
) -> CarouselController<HeadlessSurface, Timeline> {
    match &cfg.testimonials {
        Some(section) => {
            let surface =
                HeadlessSurface::new("testimonials", section.measurement(&cfg.viewport));
            let mut controller = CarouselController::new(
                section.controller_options(),
                Some(surface),
                Timeline::new(),
            );
            controller.initialize(view.items());
            controller
        }
        None => {
            debug!(feature = "testimonials", "feature not on page; skipping");
            CarouselController::new(ControllerOptions::testimonials(), None, Timeline::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_page_parts_follow_config() {
        let cfg: Configuration = serde_yaml::from_str(
            "contact-details: [\"07123 456789\"]\nskill-cards:\n  - title: Roundabouts\n    bottom: 900.0\n",
        )
        .unwrap();
        let page = PageBindings::resolve(&cfg);
        assert_eq!(page.contact_details.len(), 1);
        assert_eq!(page.contact_details[0].label(), "07123 456789");
        assert_eq!(page.skills.as_ref().map(|s| s.cards().len()), Some(1));
        assert_eq!(page.reveal.pending(), 0);
        assert!(page.toasts.current().is_none());

        let bare = PageBindings::resolve(&Configuration::default());
        assert!(bare.skills.is_none());
        assert!(bare.contact_details.is_empty());
    }
}
