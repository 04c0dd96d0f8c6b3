use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::carousel::{ControllerOptions, LayoutMode, Measurement};
use crate::site::accordion::FaqEntry;
use crate::site::modal::ServiceContent;
use crate::site::reveal::RevealTarget;
use crate::site::reviews::{DEFAULT_EXCERPT_WORDS, DEFAULT_MAX_REVIEWS};
use crate::site::skills::SkillCard;

pub const DEFAULT_PLACES_ENDPOINT: &str =
    "https://maps.googleapis.com/maps/api/place/details/json";

/// Simulated browser window the headless runner lays the page out in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
    pub header_height: f32,
    pub hero_height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            header_height: 72.0,
            hero_height: 720.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct StudentCarouselConfig {
    /// Directory holding `student <n>.<ext>` photos.
    pub image_dir: PathBuf,
    /// Extensions probed for each index, in order.
    pub formats: Vec<String>,
    /// Discovery stops after this many missing indices in a row.
    pub max_consecutive_misses: u32,
    /// Highest index probed.
    pub max_index: u32,
    /// Rendered width of one photo, in px.
    pub item_width: f32,
    /// Track gap in px; unset means the track reports none.
    pub gap: Option<f32>,
    #[serde(with = "humantime_serde")]
    pub auto_advance: Duration,
    #[serde(with = "humantime_serde")]
    pub transition: Duration,
    #[serde(with = "humantime_serde")]
    pub settle_delay: Duration,
    #[serde(with = "humantime_serde")]
    pub reflow_delay: Duration,
}

impl Default for StudentCarouselConfig {
    fn default() -> Self {
        let timings = ControllerOptions::students();
        Self {
            image_dir: PathBuf::from("images/student-imgs"),
            formats: ["webp", "jpg", "jpeg", "png"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_consecutive_misses: 3,
            max_index: 100,
            item_width: 350.0,
            gap: Some(32.0),
            auto_advance: timings.auto_advance.unwrap_or(Duration::from_secs(3)),
            transition: timings.transition,
            settle_delay: timings.settle_delay,
            reflow_delay: timings.reflow_delay,
        }
    }
}

impl StudentCarouselConfig {
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            layout: LayoutMode::Centered,
            transition: self.transition,
            settle_delay: self.settle_delay,
            reflow_delay: self.reflow_delay,
            auto_advance: Some(self.auto_advance),
        }
    }

    pub fn measurement(&self, viewport: &ViewportConfig) -> Measurement {
        Measurement {
            item_width: self.item_width,
            gap: self.gap,
            container_width: viewport.width,
        }
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            !self.formats.is_empty(),
            "student-carousel.formats must list at least one extension"
        );
        ensure!(
            self.max_consecutive_misses > 0,
            "student-carousel.max-consecutive-misses must be greater than zero"
        );
        ensure!(
            self.item_width.is_finite() && self.item_width > 0.0,
            "student-carousel.item-width must be positive"
        );
        ensure!(
            !self.auto_advance.is_zero(),
            "student-carousel.auto-advance must be greater than zero"
        );
        ensure!(
            self.settle_delay >= self.transition,
            "student-carousel.settle-delay must not be shorter than transition"
        );
        ensure!(
            self.auto_advance > self.settle_delay,
            "student-carousel.auto-advance must be longer than settle-delay"
        );
        Ok(())
    }
}

/// Review shown when the live provider is unavailable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct StaticReview {
    pub author: String,
    pub rating: f32,
    pub text: String,
    /// Pre-rendered age, e.g. "2 weeks ago".
    #[serde(default)]
    pub age: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct TestimonialsConfig {
    pub place_id: Option<String>,
    pub api_key: Option<String>,
    pub places_endpoint: String,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    pub max_reviews: usize,
    pub excerpt_words: usize,
    /// Width of the review viewport; defaults to the window width.
    pub container_width: Option<f32>,
    #[serde(with = "humantime_serde")]
    pub transition: Duration,
    #[serde(with = "humantime_serde")]
    pub settle_delay: Duration,
    #[serde(with = "humantime_serde")]
    pub reflow_delay: Duration,
    pub fallback: Vec<StaticReview>,
}

impl Default for TestimonialsConfig {
    fn default() -> Self {
        let timings = ControllerOptions::testimonials();
        Self {
            place_id: None,
            api_key: None,
            places_endpoint: DEFAULT_PLACES_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(10),
            max_reviews: DEFAULT_MAX_REVIEWS,
            excerpt_words: DEFAULT_EXCERPT_WORDS,
            container_width: None,
            transition: timings.transition,
            settle_delay: timings.settle_delay,
            reflow_delay: timings.reflow_delay,
            fallback: Vec::new(),
        }
    }
}

impl TestimonialsConfig {
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            layout: LayoutMode::Paged,
            transition: self.transition,
            settle_delay: self.settle_delay,
            reflow_delay: self.reflow_delay,
            auto_advance: None,
        }
    }

    pub fn measurement(&self, viewport: &ViewportConfig) -> Measurement {
        let width = self.container_width.unwrap_or(viewport.width);
        Measurement {
            item_width: width,
            gap: None,
            container_width: width,
        }
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.max_reviews > 0,
            "testimonials.max-reviews must be greater than zero"
        );
        ensure!(
            self.excerpt_words > 0,
            "testimonials.excerpt-words must be greater than zero"
        );
        ensure!(
            self.settle_delay >= self.transition,
            "testimonials.settle-delay must not be shorter than transition"
        );
        if let Some(width) = self.container_width {
            ensure!(
                width.is_finite() && width > 0.0,
                "testimonials.container-width must be positive"
            );
        }
        for review in &self.fallback {
            ensure!(
                (0.0..=5.0).contains(&review.rating),
                "testimonials.fallback rating for {} must be between 0 and 5",
                review.author
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ContactFormConfig {
    /// URL receiving the URL-encoded form POST.
    pub endpoint: String,
    #[serde(default = "ContactFormConfig::default_subject")]
    pub subject: String,
    /// How long the result label stays on the submit button.
    #[serde(
        default = "ContactFormConfig::default_reset_after",
        with = "humantime_serde"
    )]
    pub reset_after: Duration,
    #[serde(
        default = "ContactFormConfig::default_request_timeout",
        with = "humantime_serde"
    )]
    pub request_timeout: Duration,
}

impl ContactFormConfig {
    fn default_subject() -> String {
        "Contact Request".to_string()
    }

    const fn default_reset_after() -> Duration {
        Duration::from_secs(3)
    }

    const fn default_request_timeout() -> Duration {
        Duration::from_secs(15)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://"),
            "contact-form.endpoint must be an http(s) URL"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ConsentConfig {
    /// JSON file holding the stored preference; in-memory when unset.
    pub store_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct StatConfig {
    pub label: String,
    /// Text as written in the page, e.g. "100%".
    pub value: String,
    pub target: u32,
}

impl StatConfig {
    pub fn is_star_rating(&self) -> bool {
        self.label.to_lowercase().contains("star")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Configuration {
    pub viewport: ViewportConfig,
    /// Mobile navigation drawer present on the page.
    pub navigation: bool,
    pub student_carousel: Option<StudentCarouselConfig>,
    pub testimonials: Option<TestimonialsConfig>,
    pub faq: Vec<FaqEntry>,
    pub services: BTreeMap<String, ServiceContent>,
    pub contact_form: Option<ContactFormConfig>,
    pub consent: ConsentConfig,
    pub stats: Vec<StatConfig>,
    /// Phone, email and address lines that copy to the clipboard on click.
    pub contact_details: Vec<String>,
    /// Stacked skill cards, top to bottom.
    pub skill_cards: Vec<SkillCard>,
    /// Cards, testimonials and stats that fade in on first view.
    pub reveal: Vec<RevealTarget>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            navigation: true,
            student_carousel: None,
            testimonials: None,
            faq: Vec::new(),
            services: BTreeMap::new(),
            contact_form: None,
            consent: ConsentConfig::default(),
            stats: Vec::new(),
            contact_details: Vec::new(),
            skill_cards: Vec::new(),
            reveal: Vec::new(),
        }
    }
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate invariants that serde defaults cannot express.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            self.viewport.width > 0.0 && self.viewport.height > 0.0,
            "viewport dimensions must be positive"
        );
        ensure!(
            self.viewport.header_height >= 0.0,
            "viewport.header-height must not be negative"
        );
        if let Some(students) = &self.student_carousel {
            students.validate().context("invalid student-carousel")?;
        }
        if let Some(testimonials) = &self.testimonials {
            testimonials.validate().context("invalid testimonials")?;
        }
        if let Some(form) = &self.contact_form {
            form.validate().context("invalid contact-form")?;
        }
        for (key, service) in &self.services {
            ensure!(
                !service.title.trim().is_empty(),
                "services.{key}.title must not be empty"
            );
        }
        for card in &self.skill_cards {
            ensure!(
                card.bottom.is_finite(),
                "skill-cards.bottom for {} must be a number",
                card.title
            );
        }
        for target in &self.reveal {
            ensure!(
                target.top.is_finite() && target.height.is_finite() && target.height > 0.0,
                "reveal targets need a finite top and a positive height"
            );
        }
        Ok(self)
    }
}
