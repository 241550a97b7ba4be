//! Accessibility classification rules.
//!
//! # Responsibility
//! - Derive the accessibility tier (count of true flags) for both record
//!   kinds.
//! - Render the fixed-order, human-readable feature summary for markers.
//! - Map tiers onto discrete marker color bands.
//!
//! # Invariants
//! - All functions are pure; identical input yields identical output.
//! - Summary line order follows flag declaration order, never input order.
//! - An all-false flag set yields the sentinel line, never an empty string.

use crate::model::feedback::FeedbackFlags;
use crate::model::place::WheelchairFlags;

/// Summary returned when a record declares no accessible feature.
pub const NO_FEATURES_SENTINEL: &str = "No declared accessibility features.";

const CHECKMARK: &str = "✔️ ";

/// Discrete marker color band selected from an accessibility tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerHue {
    /// Fallback band for tier 0 (valid only on feedback markers).
    Violet,
    Red,
    Orange,
    Yellow,
    Green,
}

/// Counts true wheelchair flags on a remote record (0–4).
///
/// Undeclared (`None`) flags do not count.
pub fn wheelchair_tier(flags: &WheelchairFlags) -> u8 {
    wheelchair_features(flags).len() as u8
}

/// Counts true flags on a feedback record (0–14).
pub fn feedback_tier(flags: &FeedbackFlags) -> u8 {
    feedback_features(flags).len() as u8
}

/// Renders the marker summary for a remote record.
///
/// One `✔️` line per true flag in declaration order
/// (entrance, parking, restroom, seating), or the sentinel when none is true.
pub fn wheelchair_summary(flags: &WheelchairFlags) -> String {
    render_summary(&wheelchair_features(flags))
}

/// Renders the marker summary for a feedback record.
///
/// Same shape as [`wheelchair_summary`], over the full 14-flag set.
pub fn feedback_summary(flags: &FeedbackFlags) -> String {
    render_summary(&feedback_features(flags))
}

/// Selects the marker color band for a tier.
///
/// Tier 0 maps to the violet fallback band; tiers above the four-flag range
/// clamp to the top band.
pub fn marker_hue(tier: u8) -> MarkerHue {
    match tier {
        0 => MarkerHue::Violet,
        1 => MarkerHue::Red,
        2 => MarkerHue::Orange,
        3 => MarkerHue::Yellow,
        _ => MarkerHue::Green,
    }
}

fn wheelchair_features(flags: &WheelchairFlags) -> Vec<&'static str> {
    let declared = [
        (flags.entrance, "Accessible entrance"),
        (flags.parking, "Accessible parking"),
        (flags.restroom, "Accessible restroom"),
        (flags.seating, "Accessible seating"),
    ];
    declared
        .into_iter()
        .filter(|(flag, _)| *flag == Some(true))
        .map(|(_, label)| label)
        .collect()
}

fn feedback_features(flags: &FeedbackFlags) -> Vec<&'static str> {
    let declared = [
        (flags.accessible_entrance, "Accessible entrance"),
        (flags.accessible_parking, "Accessible parking"),
        (flags.accessible_restroom, "Accessible restroom"),
        (flags.accessible_seating, "Accessible seating"),
        (flags.has_ramp, "Ramp available"),
        (flags.has_elevator, "Elevator available"),
        (flags.has_braille, "Braille signage"),
        (flags.has_sign_language, "Sign language support"),
        (
            flags.suits_visually_impaired,
            "Suitable for visually impaired visitors",
        ),
        (
            flags.suits_physically_impaired,
            "Suitable for physically impaired visitors",
        ),
        (
            flags.suits_hearing_impaired,
            "Suitable for hearing impaired visitors",
        ),
        (flags.staff_assistance, "Staff assistance available"),
        (flags.accessible_menu, "Accessible menu"),
        (flags.generally_accessible, "Generally accessible"),
    ];
    declared
        .into_iter()
        .filter(|(flag, _)| *flag)
        .map(|(_, label)| label)
        .collect()
}

fn render_summary(features: &[&'static str]) -> String {
    if features.is_empty() {
        return NO_FEATURES_SENTINEL.to_string();
    }
    features
        .iter()
        .map(|label| format!("{CHECKMARK}{label}"))
        .collect::<Vec<_>>()
        .join("\n")
}
