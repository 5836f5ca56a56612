//! Transition rules applied to slides built from a deck body.

use reveal_pdf::transition::{
    EMBED_CLASS, LABEL_ATTRIBUTE, TRANSITION_ATTRIBUTE, TRANSITION_SPEED_ATTRIBUTE,
};
use reveal_pdf::{
    DeckBuilder, DeckOptions, MemorySource, Slide, SlideNode, TransitionController,
    TransitionDecision,
};

/// Five pages where pages 2-3 are overlays of one frame (same label).
fn slides() -> Vec<Slide> {
    let source = MemorySource::new(5)
        .with_label(1, "1")
        .with_label(2, "2")
        .with_label(3, "2")
        .with_label(4, "3")
        .with_label(5, "4");
    let deck = DeckBuilder::new(DeckOptions::default())
        .build(&source)
        .unwrap();
    Slide::from_body(&deck.body)
}

fn change(
    controller: &TransitionController,
    slides: &mut [Slide],
    from: usize,
    to: usize,
) -> TransitionDecision {
    let (low, high) = slides.split_at_mut(from.max(to));
    let (a, b) = (&mut low[from.min(to)], &mut high[0]);
    if from < to {
        controller.slide_changed(a, b)
    } else {
        controller.slide_changed(b, a)
    }
}

#[test]
fn test_init_prepares_every_slide() {
    let controller = TransitionController::new();
    let mut slides = slides();
    controller.init(&mut slides);

    for (i, slide) in slides.iter().enumerate() {
        assert!(slide.has_class(EMBED_CLASS));
        assert_eq!(slide.attribute(TRANSITION_SPEED_ATTRIBUTE), Some("fast"));
        let embed = slide.embed().unwrap();
        assert_eq!(embed.src, format!("pages/p{}.html", i + 1));
    }
}

#[test]
fn test_overlay_pages_change_in_place() {
    let controller = TransitionController::new();
    let mut slides = slides();
    controller.init(&mut slides);

    assert_eq!(
        change(&controller, &mut slides, 0, 1),
        TransitionDecision::BoundaryTransition
    );
    assert_eq!(slides[0].attribute(TRANSITION_ATTRIBUTE), Some("slide"));

    assert_eq!(
        change(&controller, &mut slides, 1, 2),
        TransitionDecision::None
    );
    assert_eq!(slides[1].attribute(TRANSITION_ATTRIBUTE), Some("none"));
    assert_eq!(slides[2].attribute(TRANSITION_ATTRIBUTE), Some("none"));

    // navigating backwards re-evaluates and overwrites
    assert_eq!(
        change(&controller, &mut slides, 3, 2),
        TransitionDecision::BoundaryTransition
    );
    assert_eq!(slides[2].attribute(TRANSITION_ATTRIBUTE), Some("slide"));
    assert_eq!(slides[3].attribute(TRANSITION_ATTRIBUTE), Some("slide"));
}

#[test]
fn test_decisions_are_idempotent() {
    let controller = TransitionController::new();
    let mut slides = slides();

    let first = change(&controller, &mut slides, 1, 2);
    let snapshot = slides.clone();
    let second = change(&controller, &mut slides, 1, 2);

    assert_eq!(first, second);
    assert_eq!(slides, snapshot);
    assert_eq!(slides[1].attribute(LABEL_ATTRIBUTE), Some("2"));
}
