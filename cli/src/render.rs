//! Plain-text rendering of a scene for the terminal driver.

use std::fmt::Write as _;

use threshold_engine::threshold_providers::EpigramRecord;
use threshold_engine::threshold_types::RevealLayer;
use threshold_engine::{Effect, Scene};

pub fn scene(scene: &Scene, content: impl Fn(RevealLayer) -> Vec<EpigramRecord>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "phase: {}", scene.phase);
    if scene.activation_visible {
        out.push_str("activation control: visible\n");
    }

    if let Some(overlay) = &scene.overlay {
        let _ = writeln!(
            out,
            "knob: {:.0}° ({:.0}%){}",
            overlay.rotation,
            overlay.progress * 100.0,
            if overlay.unlocked { " unlocked" } else { "" }
        );
    }

    if let Some(challenge) = &scene.challenge {
        let _ = writeln!(out, "question: {}", challenge.question);
        if challenge.evaluating {
            out.push_str("  evaluating...\n");
        } else if challenge.input_enabled {
            out.push_str("  (answer <text>)\n");
        }
        if let Some(message) = &challenge.message {
            let _ = writeln!(out, "  {message}");
        }
    }

    if scene.depth_flash {
        out.push_str("* the corners align *\n");
    }

    for view in &scene.layers {
        let _ = writeln!(
            out,
            "[{}] opacity {:.2} offset {:+.2}{}",
            view.layer,
            view.opacity,
            view.offset_y,
            if view.interactive { " *" } else { "" }
        );
        if view.opacity <= 0.0 {
            continue;
        }
        let records = content(view.layer);
        if view.layer == RevealLayer::Public {
            let _ = writeln!(out, "    ({} epigrams)", records.len());
            continue;
        }
        for record in records {
            match &record.title {
                Some(title) => {
                    let _ = writeln!(out, "    {title}: {}", record.text);
                }
                None => {
                    let _ = writeln!(out, "    {}", record.text);
                }
            }
        }
    }
    out
}

pub fn effect(effect: &Effect) -> Option<String> {
    match effect {
        Effect::ShowActivation => Some("(activation control appears)".to_string()),
        Effect::HideActivation => Some("(activation control hidden)".to_string()),
        Effect::Vibrate(pattern) => {
            let pattern: Vec<String> = pattern.iter().map(u32::to_string).collect();
            Some(format!("(vibrate {})", pattern.join("/")))
        }
        Effect::RestoreScroll(offset) => Some(format!("(feed scrolled back to {offset:.0}px)")),
        Effect::Evaluate(_) | Effect::LoadContent(_) => None,
    }
}
