//! Slide transition rules.
//!
//! Mirrors what the browser plugin (`plugin/pdf-slides.js`) does at runtime:
//! slides sharing a `data-label` change instantly, slides crossing a label
//! boundary slide. The rules are expressed against [`SlideNode`] so they can
//! be checked without a browser.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assemble::{DeckBody, PageRef};

/// Attribute read to decide transitions.
pub const LABEL_ATTRIBUTE: &str = "data-label";
/// Attribute naming the hosted page file.
pub const FILE_ATTRIBUTE: &str = "data-file";
/// Attribute receiving the transition style.
pub const TRANSITION_ATTRIBUTE: &str = "data-transition";
/// Attribute receiving the transition speed.
pub const TRANSITION_SPEED_ATTRIBUTE: &str = "data-transition-speed";
/// Class marking slides that host a page file.
pub const EMBED_CLASS: &str = "pdf";

/// Outcome of a slide change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionDecision {
    /// Same label: `data-transition="none"`
    None,
    /// Different labels: `data-transition="slide"`
    BoundaryTransition,
}

impl TransitionDecision {
    /// Value written to `data-transition`.
    pub fn attribute_value(self) -> &'static str {
        match self {
            TransitionDecision::None => "none",
            TransitionDecision::BoundaryTransition => "slide",
        }
    }
}

/// Embedding surface attached to a hosted slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedSurface {
    /// Page file shown inside the surface
    pub src: String,
    /// Inline style declarations
    pub style: Vec<(&'static str, &'static str)>,
}

impl EmbedSurface {
    /// A borderless surface filling its slide.
    pub fn filling(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            style: vec![
                ("width", "100%"),
                ("height", "100%"),
                ("max-width", "100%"),
                ("max-height", "100%"),
                ("border", "none"),
            ],
        }
    }
}

/// The slide operations the controller needs.
pub trait SlideNode {
    /// Read an attribute.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Set an attribute, replacing any previous value.
    fn set_attribute(&mut self, name: &str, value: &str);

    /// Whether the class list contains `class`.
    fn has_class(&self, class: &str) -> bool;

    /// Set one inline style property.
    fn set_style(&mut self, property: &str, value: &str);

    /// Whether an embedding surface is already attached.
    fn has_embed(&self) -> bool;

    /// Attach an embedding surface.
    fn attach_embed(&mut self, embed: EmbedSurface);
}

/// Applies the transition rules to slides.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionController;

impl TransitionController {
    /// Create a controller.
    pub fn new() -> Self {
        Self
    }

    /// Prepare slides: attach an embedding surface to every hosted slide and
    /// set a fast transition speed on every slide.
    ///
    /// Slides that already carry a surface are left alone, so repeated calls
    /// do not stack surfaces.
    pub fn init<N: SlideNode>(&self, slides: &mut [N]) {
        for slide in slides.iter_mut() {
            if slide.has_class(EMBED_CLASS) && !slide.has_embed() {
                let src = slide.attribute(FILE_ATTRIBUTE).unwrap_or_default().to_string();
                if src.is_empty() {
                    log::debug!("Hosted slide without {}", FILE_ATTRIBUTE);
                }
                slide.set_style("height", "100%");
                slide.set_style("top", "6px");
                slide.attach_embed(EmbedSurface::filling(src));
            }
            slide.set_attribute(TRANSITION_SPEED_ATTRIBUTE, "fast");
        }
    }

    /// Decide the transition between two slides without touching them.
    pub fn decide(&self, previous: &dyn SlideNode, current: &dyn SlideNode) -> TransitionDecision {
        if previous.attribute(LABEL_ATTRIBUTE) == current.attribute(LABEL_ATTRIBUTE) {
            TransitionDecision::None
        } else {
            TransitionDecision::BoundaryTransition
        }
    }

    /// Handle a slide change: compare labels and mark both slides.
    pub fn slide_changed(
        &self,
        previous: &mut dyn SlideNode,
        current: &mut dyn SlideNode,
    ) -> TransitionDecision {
        let decision = self.decide(previous, current);
        let value = decision.attribute_value();
        current.set_attribute(TRANSITION_ATTRIBUTE, value);
        previous.set_attribute(TRANSITION_ATTRIBUTE, value);
        decision
    }
}

/// In-memory slide element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slide {
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    embed: Option<EmbedSurface>,
}

impl Slide {
    /// Create a slide with no attributes, classes or embed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// The hosted slide for a page reference.
    pub fn for_page(page: &PageRef) -> Self {
        Self::new()
            .with_class(EMBED_CLASS)
            .with_attribute(FILE_ATTRIBUTE, page.file.as_str())
            .with_attribute(LABEL_ATTRIBUTE, page.label.as_str())
    }

    /// Hosted slides for every page of a deck body, in deck order.
    pub fn from_body(body: &DeckBody) -> Vec<Slide> {
        body.pages().map(Slide::for_page).collect()
    }

    /// Inline style value.
    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    /// Attached embedding surface.
    pub fn embed(&self) -> Option<&EmbedSurface> {
        self.embed.as_ref()
    }
}

impl SlideNode for Slide {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn set_style(&mut self, property: &str, value: &str) {
        self.style.insert(property.to_string(), value.to_string());
    }

    fn has_embed(&self) -> bool {
        self.embed.is_some()
    }

    fn attach_embed(&mut self, embed: EmbedSurface) {
        self.embed = Some(embed);
    }
}
