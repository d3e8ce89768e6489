//! Scene description for the current controller state.
//!
//! [`present`] is a pure read: it turns a [`Snapshot`] and the current time
//! into opacity, offsets and text. Animations never gate a transition; when
//! the controller moves on, the scene simply follows.

use std::time::Duration;

use threshold_types::ui::{LayerEffect, LayerEffectKind, Typewriter};
use threshold_types::{DepthState, RevealLayer, Timestamp, UnlockPhase, Verdict};

use crate::controller::Snapshot;

/// Secret layer drop-in (and public layer fall-away) on reveal.
pub const SECRET_ENTRY: Duration = Duration::from_millis(1800);
pub const DEPTH_ENTRY: Duration = Duration::from_millis(800);
/// The question fades in before the answer field accepts input.
pub const QUESTION_ENTRY: Duration = Duration::from_millis(1200);
const PULSE_PERIOD: Duration = Duration::from_millis(1000);
/// Opacity of the secret layer while the depth layer sits on top.
const DIMMED_OPACITY: f32 = 0.3;

pub const PASS_MESSAGE: &str = "Congratulations";
pub const FAIL_MESSAGE: &str = "Goodbye";

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub phase: UnlockPhase,
    pub activation_visible: bool,
    pub overlay: Option<OverlayView>,
    pub challenge: Option<ChallengeView>,
    /// Depth unlock flash between dial alignment and the depth layer.
    pub depth_flash: bool,
    /// Bottom to top.
    pub layers: Vec<LayerView>,
}

impl Scene {
    #[must_use]
    pub fn layer(&self, layer: RevealLayer) -> Option<&LayerView> {
        self.layers.iter().find(|view| view.layer == layer)
    }

    /// The layer receiving touch input, if any.
    #[must_use]
    pub fn interactive_layer(&self) -> Option<RevealLayer> {
        self.layers
            .iter()
            .rev()
            .find(|view| view.interactive)
            .map(|view| view.layer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayView {
    pub rotation: f64,
    pub progress: f64,
    /// Glow intensity in `[0, 1]`; full once unlocked.
    pub glow: f32,
    pub unlocked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeView {
    pub question: String,
    pub input_enabled: bool,
    pub evaluating: bool,
    /// Breathing indicator while grading, in `[0, 1]`.
    pub pulse: f32,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerView {
    pub layer: RevealLayer,
    pub opacity: f32,
    /// Fraction of the viewport height; positive is down.
    pub offset_y: f32,
    pub interactive: bool,
}

#[must_use]
pub fn present(snapshot: &Snapshot<'_>, now: Timestamp) -> Scene {
    let in_phase = now.since(snapshot.phase_since);
    Scene {
        phase: snapshot.phase,
        activation_visible: snapshot.activation_visible,
        overlay: overlay(snapshot),
        challenge: challenge(snapshot, in_phase),
        depth_flash: snapshot.phase == UnlockPhase::Revealed
            && snapshot.depth == DepthState::Opening,
        layers: layers(snapshot, now, in_phase),
    }
}

fn overlay(snapshot: &Snapshot<'_>) -> Option<OverlayView> {
    if snapshot.phase != UnlockPhase::OverlayRotating {
        return None;
    }
    let glow = if snapshot.knob_unlocked {
        1.0
    } else {
        (snapshot.knob_progress * snapshot.knob_progress) as f32
    };
    Some(OverlayView {
        rotation: snapshot.knob_rotation,
        progress: snapshot.knob_progress,
        glow,
        unlocked: snapshot.knob_unlocked,
    })
}

fn challenge(snapshot: &Snapshot<'_>, in_phase: Duration) -> Option<ChallengeView> {
    let question = snapshot.challenge?.question().to_string();
    let view = match snapshot.phase {
        UnlockPhase::ChallengeAsked => ChallengeView {
            question,
            input_enabled: in_phase >= QUESTION_ENTRY,
            evaluating: false,
            pulse: 0.0,
            message: None,
        },
        UnlockPhase::Evaluating => ChallengeView {
            question,
            input_enabled: false,
            evaluating: true,
            pulse: pulse(in_phase),
            message: None,
        },
        UnlockPhase::Passed | UnlockPhase::Failed => {
            let text = match snapshot.verdict {
                Some(Verdict::Pass) => PASS_MESSAGE,
                _ => FAIL_MESSAGE,
            };
            let typed = Typewriter::new(text, snapshot.settings.typewriter_interval())
                .visible(in_phase);
            ChallengeView {
                question,
                input_enabled: false,
                evaluating: false,
                pulse: 0.0,
                message: Some(typed.to_string()),
            }
        }
        _ => return None,
    };
    Some(view)
}

fn pulse(elapsed: Duration) -> f32 {
    let cycle = (elapsed.as_millis() % PULSE_PERIOD.as_millis()) as f32
        / PULSE_PERIOD.as_millis() as f32;
    0.5 - 0.5 * (cycle * std::f32::consts::TAU).cos()
}

fn layers(snapshot: &Snapshot<'_>, now: Timestamp, in_phase: Duration) -> Vec<LayerView> {
    let dismiss = snapshot.settings.dismiss_delay();
    let mut layers = Vec::with_capacity(3);

    let public = match snapshot.phase {
        UnlockPhase::Revealed => {
            let effect = LayerEffect::new(
                LayerEffectKind::FallAway { to_offset: 1.0 },
                in_phase,
                SECRET_ENTRY,
            );
            LayerView {
                layer: RevealLayer::Public,
                opacity: effect.opacity(),
                offset_y: effect.offset_y(),
                interactive: false,
            }
        }
        UnlockPhase::Dismissing => {
            let effect = LayerEffect::new(LayerEffectKind::FadeIn, in_phase, dismiss);
            LayerView {
                layer: RevealLayer::Public,
                opacity: effect.opacity(),
                offset_y: 0.0,
                interactive: false,
            }
        }
        phase => LayerView {
            layer: RevealLayer::Public,
            opacity: 1.0,
            offset_y: 0.0,
            interactive: matches!(phase, UnlockPhase::Idle | UnlockPhase::TapArming),
        },
    };
    layers.push(public);

    if !snapshot.phase.secret_mounted() {
        return layers;
    }

    let effect = if snapshot.phase == UnlockPhase::Dismissing {
        LayerEffect::new(LayerEffectKind::FallAway { to_offset: 1.0 }, in_phase, dismiss)
    } else {
        LayerEffect::new(
            LayerEffectKind::RiseIn { from_offset: -1.0 },
            in_phase,
            SECRET_ENTRY,
        )
    };
    let mut opacity = effect.opacity();
    if snapshot.depth.is_mounted() {
        opacity *= DIMMED_OPACITY;
    }
    layers.push(LayerView {
        layer: RevealLayer::Secret,
        opacity,
        offset_y: effect.offset_y() + swipe_offset(snapshot, RevealLayer::Secret),
        interactive: snapshot.phase == UnlockPhase::Revealed
            && snapshot.depth == DepthState::Closed,
    });

    if snapshot.depth.is_mounted() {
        let in_depth = now.since(snapshot.depth_since);
        let effect = match snapshot.depth {
            DepthState::Collapsing => LayerEffect::new(LayerEffectKind::FadeOut, in_depth, dismiss),
            _ => LayerEffect::new(LayerEffectKind::FadeIn, in_depth, DEPTH_ENTRY),
        };
        layers.push(LayerView {
            layer: RevealLayer::Depth,
            opacity: effect.opacity(),
            offset_y: swipe_offset(snapshot, RevealLayer::Depth),
            interactive: snapshot.depth == DepthState::Open,
        });
    }

    layers
}

fn swipe_offset(snapshot: &Snapshot<'_>, layer: RevealLayer) -> f32 {
    if snapshot.swipe_layer == Some(layer) {
        snapshot.swipe_progress as f32
    } else {
        0.0
    }
}
