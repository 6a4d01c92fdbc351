//! Chat rendering for backend state, rolls and help.
//!
//! Output is plain chat text; the gateway decides how it is displayed.

use fatebot_domain::FateRoll;
use fatebot_shared::{AspectView, CommandPayload, EntityView, GameSnapshot, OrderView, StressTrackView};

use crate::commands::definition::{CommandSpec, Group};
use crate::stores::Claim;

pub const DONE: &str = "Done.";

pub struct ResponseFormatter;

impl ResponseFormatter {
    /// `Weft: FP) 5/3 | Stress) physical [x][ ] | Aspects) On Fire (2)`
    pub fn entity_summary(view: &EntityView) -> String {
        let mut sections = vec![format!("{}: FP) {}/{}", view.name, view.fate, view.refresh)];

        if !view.stress.is_empty() {
            let tracks: Vec<String> = view
                .stress
                .iter()
                .map(|(name, track)| format!("{} {}", name, Self::stress_boxes(track)))
                .collect();
            sections.push(format!("Stress) {}", tracks.join(", ")));
        }

        if !view.aspects.is_empty() {
            let aspects: Vec<String> = view.aspects.iter().map(Self::aspect).collect();
            sections.push(format!("Aspects) {}", aspects.join(", ")));
        }

        sections.join(" | ")
    }

    /// One box per stress slot, `[x]` when checked.
    pub fn stress_boxes(track: &StressTrackView) -> String {
        (0..track.max)
            .map(|index| {
                if track.checked.contains(&index) {
                    "[x]"
                } else {
                    "[ ]"
                }
            })
            .collect()
    }

    /// `On Fire`, `On Fire (2)`, `Broken Arm (mild)`, `Smoke (fragile, 1)`
    pub fn aspect(aspect: &AspectView) -> String {
        let mut notes = Vec::new();
        if let Some(kind) = aspect.kind.as_deref().filter(|kind| !kind.is_empty()) {
            notes.push(kind.to_string());
        }
        if let Some(tags) = aspect.tags.filter(|tags| *tags > 0) {
            notes.push(tags.to_string());
        }
        if notes.is_empty() {
            aspect.name.clone()
        } else {
            format!("{} ({})", aspect.name, notes.join(", "))
        }
    }

    /// Multi-line sheet for `info`.
    pub fn entity_card(view: &EntityView, claimant: Option<&(String, Claim)>) -> String {
        let mut lines = vec![match claimant {
            Some((user, _)) => format!("**{}** (played by {})", view.name, user),
            None => format!("**{}**", view.name),
        }];
        lines.push(format!(
            "Fate points: {} (refresh {})",
            view.fate, view.refresh
        ));

        if view.stress.is_empty() {
            lines.push("Stress: none".to_string());
        } else {
            lines.push("Stress:".to_string());
            for (name, track) in &view.stress {
                lines.push(format!("- {} {}", name, Self::stress_boxes(track)));
            }
        }

        if view.aspects.is_empty() {
            lines.push("Aspects: none".to_string());
        } else {
            lines.push("Aspects:".to_string());
            for aspect in &view.aspects {
                lines.push(format!("- {}", Self::aspect(aspect)));
            }
        }

        lines.join("\n")
    }

    /// Turn order with the acting entity marked and its player pinged.
    pub fn order(order: &OrderView, current_claim: Option<&Claim>) -> String {
        let mut lines = Vec::new();

        if order.is_started() {
            lines.push("Turn order:".to_string());
            for (index, name) in order.order.iter().enumerate() {
                if order.current == Some(index) {
                    let ping = current_claim
                        .map(|claim| format!(" {}, you're up", claim.mention))
                        .unwrap_or_default();
                    lines.push(format!("-> {}{}", name, ping));
                } else {
                    lines.push(format!("   {}", name));
                }
            }
        } else if order.entities.is_empty() {
            lines.push("The turn order is empty.".to_string());
        } else {
            lines.push(format!(
                "Turn order (not started): {}",
                order.entities.join(", ")
            ));
        }

        if !order.deferred.is_empty() {
            lines.push(format!("Deferred: {}", order.deferred.join(", ")));
        }

        lines.join("\n")
    }

    /// Every entity with its player, if claimed.
    pub fn roster(snapshot: &GameSnapshot, claims: &[(String, Claim)]) -> String {
        if snapshot.entities.is_empty() {
            return "No entities yet. Create one with `.create <name>`.".to_string();
        }

        let mut lines = vec!["Entities:".to_string()];
        for view in snapshot.entities.values() {
            let player = claims
                .iter()
                .find(|(_, claim)| claim.entity.eq_ignore_ascii_case(&view.name))
                .map(|(user, _)| format!(", played by {}", user))
                .unwrap_or_default();
            lines.push(format!(
                "- {} (FP {}/{}){}",
                view.name, view.fate, view.refresh, player
            ));
        }
        lines.join("\n")
    }

    /// Every claim with the claimant's mention.
    pub fn claims(claims: &[(String, Claim)]) -> String {
        if claims.is_empty() {
            return "Nobody has claimed a character.".to_string();
        }
        claims
            .iter()
            .map(|(_, claim)| format!("{} plays {}", claim.mention, claim.entity))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn roll(author: &str, roll: &FateRoll) -> String {
        format!("{} rolled {}", author, roll)
    }

    pub fn amended(author: &str, roll: &FateRoll) -> String {
        format!("{} amended their roll: {}", author, roll)
    }

    /// Render a successful backend command.
    pub fn command_result(payload: &CommandPayload, current_claim: Option<&Claim>) -> String {
        match payload {
            CommandPayload::Entity(view) => Self::entity_summary(view),
            CommandPayload::Order(order) => Self::order(order, current_claim),
            CommandPayload::Other(_) | CommandPayload::Empty => DONE.to_string(),
        }
    }

    pub fn help_overview(groups: &[(Group, Vec<&CommandSpec>)]) -> String {
        let mut lines = Vec::with_capacity(groups.len() + 1);
        for (group, specs) in groups {
            let names: Vec<&str> = specs.iter().map(|spec| spec.name).collect();
            lines.push(format!("**{}**: {}", group.title(), names.join(", ")));
        }
        lines.push("Use `.help <command>` for details.".to_string());
        lines.join("\n")
    }

    pub fn help_detail(spec: &CommandSpec) -> String {
        let mut lines = vec![format!("**{}**", spec.name)];
        if !spec.aliases.is_empty() {
            let aliases: Vec<String> = spec.aliases.iter().map(|alias| format!(".{}", alias)).collect();
            lines.push(format!("Aliases: {}", aliases.join(", ")));
        }
        lines.push(spec.summary.to_string());
        if !spec.usage.is_empty() {
            lines.push(format!("Usage: `{}`", spec.usage));
        }
        if !spec.examples.is_empty() {
            let examples: Vec<String> = spec
                .examples
                .iter()
                .map(|example| format!("`{}`", example))
                .collect();
            lines.push(format!("Examples: {}", examples.join(", ")));
        }
        lines.join("\n")
    }
}
