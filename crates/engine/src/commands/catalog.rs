//! The command catalog.
//!
//! Every command the bot answers to, with its aliases, argument variants and
//! help text. Registration order is help order and breaks ties between
//! equally long matches.

use std::sync::Arc;

use crate::commands::args;
use crate::commands::definition::{CommandSpec, Group, TargetMode};
use crate::commands::handler::CommandHandler;
use crate::commands::registry::{Handler, PatternTable, RegistryError};
use crate::use_cases::admin::{Dump, Stop, Version};
use crate::use_cases::aspects::{AddAspect, ClearAllAspects, ClearAspects, RemoveAspect, TagAspect};
use crate::use_cases::claims::{ClaimEntity, ListClaims, Unclaim};
use crate::use_cases::entities::{
    CreateEntity, EditEntity, ListEntities, RemoveEntity, ShowInfo, Summary,
};
use crate::use_cases::fate_points::{AdjustFatePoints, FatePointChange};
use crate::use_cases::help::Help;
use crate::use_cases::rolling::{Amend, Roll};
use crate::use_cases::stress::{ClearAllStress, ClearStress, StressBoxes, StressOp};
use crate::use_cases::targeting::{RetargetPending, TargetedHandler};
use crate::use_cases::turn_order::{
    OrderEntity, OrderEntityOp, OrderStep, OrderStepOp, ShowOrder,
};

// =============================================================================
// Argument variants
// =============================================================================

const AMOUNT: &str = r"(?:\s+(?P<amount>\S+))?";
const TEXT: &str = r"(?:\s+(?P<text>.*?))?\s*$";
const NAME: &str = r"\s+(?P<name>.+?)\s*$";
const TARGET: &str = r"(?:\s+(?P<target>.+?))?\s*$";
const NEW_ENTITY: &str =
    r"\s+(?P<name>.+?)(?:\s+(?P<fate>\d+))?(?:\s+(?P<refresh>\d+))?\s*$";
const EDIT: &str = r"\s+(?P<field>\S+)\s+(?P<value>.+?)\s*$";
const ASPECT: &str = r"\s+(?:(?P<kind>(?i:sticky|fragile|mild|moderate|severe|extreme))\s+)?(?P<name>.+?)\s*$";
const TAG: &str = r"\s+(?P<aspect>.+?)(?:\s+(?P<amount>\d+))?\s*$";
const KIND: &str = r"(?:\s+(?P<kind>\S+))?";
const STRESS: &str = r"\s+(?P<track>\S+)\s+(?P<amount>\S+)";
const TRACK: &str = r"(?:\s+(?P<track>\S+))?";

const ORDER_ALIASES: &[&str] = &["order", "o", "init"];

const fn spec(
    name: &'static str,
    aliases: &'static [&'static str],
    group: Group,
    target: TargetMode,
) -> CommandSpec {
    CommandSpec {
        name,
        aliases,
        variants: &[],
        group,
        target,
        summary: "",
        usage: "",
        examples: &[],
    }
}

// =============================================================================
// Session
// =============================================================================

const CLAIM: CommandSpec = CommandSpec {
    variants: &[NAME],
    summary: "Claim an entity as your character. Targeted commands default to it.",
    usage: ".claim <name>",
    examples: &[".claim Weft"],
    ..spec("claim", &["claim", "assume"], Group::Session, TargetMode::None)
};

const UNCLAIM: CommandSpec = CommandSpec {
    summary: "Stop playing your claimed character.",
    usage: ".unclaim",
    ..spec("unclaim", &["unclaim", "unassume"], Group::Session, TargetMode::None)
};

const CLAIMED: CommandSpec = CommandSpec {
    summary: "List who plays which character.",
    usage: ".claimed",
    ..spec("claimed", &["claimed", "claims"], Group::Session, TargetMode::None)
};

const TARGET_PENDING: CommandSpec = CommandSpec {
    variants: &[NAME],
    summary: "Run your last command that had no target against the named entity.",
    usage: ".target <name>",
    examples: &[".target Weft"],
    ..spec("target", &["target"], Group::Session, TargetMode::None)
};

// =============================================================================
// Dice
// =============================================================================

const ROLL: CommandSpec = CommandSpec {
    variants: &[TEXT],
    summary: "Roll four Fate dice. Every +N or -N in the text is added as a bonus.",
    usage: ".roll [text with +N/-N]",
    examples: &[".roll", ".roll +2 athletics", ".r +3 fight -1 wounded"],
    ..spec("roll", &["roll", "r"], Group::Dice, TargetMode::None)
};

const AMEND: CommandSpec = CommandSpec {
    variants: &[TEXT],
    summary: "Add more bonuses to your last roll.",
    usage: ".amend <+N/-N ...>",
    examples: &[".amend +2 invoked On Fire"],
    ..spec("amend", &["amend", "am"], Group::Dice, TargetMode::None)
};

// =============================================================================
// Entities
// =============================================================================

const INFO: CommandSpec = CommandSpec {
    variants: &[TARGET],
    summary: "Show an entity's full sheet.",
    usage: ".info [name]",
    examples: &[".info", ".info Weft", ".i @ Warp"],
    ..spec("info", &["info", "i", "sheet"], Group::Entities, TargetMode::Required)
};

const SUMMARY: CommandSpec = CommandSpec {
    summary: "One line per entity: fate points, stress and aspects.",
    usage: ".summary",
    ..spec("summary", &["summary", "sum", "status"], Group::Entities, TargetMode::None)
};

const ENTITIES: CommandSpec = CommandSpec {
    summary: "List every entity and who plays it.",
    usage: ".entities",
    ..spec("entities", &["entities", "list", "chars"], Group::Entities, TargetMode::None)
};

const CREATE_ENTITY: CommandSpec = CommandSpec {
    variants: &[NEW_ENTITY],
    summary: "Create an entity, optionally with fate points and refresh.",
    usage: ".create_entity <name> [fate] [refresh]",
    examples: &[".create Weft 3 3", ".new Mill"],
    ..spec(
        "create_entity",
        &["create_entity", "create", "new"],
        Group::Entities,
        TargetMode::None,
    )
};

const EDIT_ENTITY: CommandSpec = CommandSpec {
    variants: &[EDIT],
    summary: "Change one field of an entity.",
    usage: ".edit_entity <field> <value>",
    examples: &[".edit name Warp Drive @ Warp"],
    ..spec("edit_entity", &["edit_entity", "edit"], Group::Entities, TargetMode::Required)
};

const REMOVE_ENTITY: CommandSpec = CommandSpec {
    variants: &[TARGET],
    summary: "Remove an entity from the game.",
    usage: ".remove_entity [name]",
    examples: &[".remove @ Mill"],
    ..spec(
        "remove_entity",
        &["remove_entity", "remove", "delete"],
        Group::Entities,
        TargetMode::Required,
    )
};

// =============================================================================
// Fate points
// =============================================================================

const FP_PLUS: CommandSpec = CommandSpec {
    variants: &[AMOUNT],
    summary: "Give fate points.",
    usage: ".fp+ [n]",
    examples: &[".fp+", ".fp+ 2 @ Weft"],
    ..spec("fp+", &["fp+", "fate+"], Group::FatePoints, TargetMode::Required)
};

const FP_MINUS: CommandSpec = CommandSpec {
    variants: &[AMOUNT],
    summary: "Spend fate points.",
    usage: ".fp- [n]",
    examples: &[".fp-", ".fp- 2 @ Weft"],
    ..spec("fp-", &["fp-", "fate-"], Group::FatePoints, TargetMode::Required)
};

const REFRESH: CommandSpec = CommandSpec {
    variants: &[TARGET],
    summary: "Reset fate points to the entity's refresh.",
    usage: ".refresh [name]",
    examples: &[".refresh", ".refresh @ Weft @ Warp"],
    ..spec("refresh", &["refresh", "fp="], Group::FatePoints, TargetMode::Required)
};

// =============================================================================
// Aspects
// =============================================================================

const ADD_ASPECT: CommandSpec = CommandSpec {
    variants: &[ASPECT],
    summary: "Add an aspect. Kinds: sticky, fragile, mild, moderate, severe, extreme.",
    usage: ".add_aspect [kind] <name>",
    examples: &[".a+ On Fire @ Mill", ".a+ mild Broken Arm"],
    ..spec(
        "add_aspect",
        &["add_aspect", "aspect+", "a+"],
        Group::Aspects,
        TargetMode::Required,
    )
};

const REMOVE_ASPECT: CommandSpec = CommandSpec {
    variants: &[NAME],
    summary: "Remove an aspect.",
    usage: ".remove_aspect <name>",
    examples: &[".a- On Fire @ Mill"],
    ..spec(
        "remove_aspect",
        &["remove_aspect", "aspect-", "a-"],
        Group::Aspects,
        TargetMode::Required,
    )
};

const TAG_ASPECT: CommandSpec = CommandSpec {
    variants: &[TAG],
    summary: "Add free invocations to an aspect.",
    usage: ".tag <aspect> [n]",
    examples: &[".tag On Fire", ".t+ On Fire 2 @ Mill"],
    ..spec("tag", &["tag", "t+"], Group::Aspects, TargetMode::Required)
};

const UNTAG_ASPECT: CommandSpec = CommandSpec {
    variants: &[TAG],
    summary: "Use up free invocations on an aspect.",
    usage: ".untag <aspect> [n]",
    examples: &[".untag On Fire"],
    ..spec("untag", &["untag", "t-"], Group::Aspects, TargetMode::Required)
};

const CLEAR_ASPECTS: CommandSpec = CommandSpec {
    variants: &[KIND],
    summary: "Clear an entity's aspects, or only those of one kind.",
    usage: ".a! [kind]",
    examples: &[".a! @ Weft", ".a! fragile"],
    ..spec("clear_aspects", &["a!"], Group::Aspects, TargetMode::Required)
};

const CLEAR_ALL_ASPECTS: CommandSpec = CommandSpec {
    variants: &[KIND],
    summary: "Clear aspects on every entity, or only those of one kind.",
    usage: ".a!! [kind]",
    examples: &[".a!!", ".a!! fragile"],
    ..spec("clear_all_aspects", &["a!!"], Group::Aspects, TargetMode::None)
};

// =============================================================================
// Stress
// =============================================================================

const STRESS_CHECK: CommandSpec = CommandSpec {
    variants: &[STRESS],
    summary: "Check a stress box. Tracks may be abbreviated.",
    usage: ".stress+ <track> <box>",
    examples: &[".s+ phys 2 @ Weft"],
    ..spec("stress+", &["stress+", "s+"], Group::Stress, TargetMode::Required)
};

const STRESS_ABSORB: CommandSpec = CommandSpec {
    variants: &[STRESS],
    summary: "Absorb shifts with the first free box that can take them.",
    usage: ".stress! <track> <shifts>",
    examples: &[".s! mental 3"],
    ..spec("stress!", &["stress!", "s!"], Group::Stress, TargetMode::Required)
};

const STRESS_UNCHECK: CommandSpec = CommandSpec {
    variants: &[STRESS],
    summary: "Uncheck a stress box.",
    usage: ".stress- <track> <box>",
    examples: &[".s- physical 1"],
    ..spec("stress-", &["stress-", "s-"], Group::Stress, TargetMode::Required)
};

const CLEAR_STRESS: CommandSpec = CommandSpec {
    variants: &[TRACK],
    summary: "Clear an entity's stress, or one track.",
    usage: ".s0 [track]",
    examples: &[".s0", ".s0 physical @ Weft"],
    ..spec("clear_stress", &["s0"], Group::Stress, TargetMode::Required)
};

const CLEAR_ALL_STRESS: CommandSpec = CommandSpec {
    summary: "Clear stress on every entity.",
    usage: ".s00",
    ..spec("clear_all_stress", &["s00"], Group::Stress, TargetMode::None)
};

// =============================================================================
// Turn order
// =============================================================================

const ORDER_SHOW: CommandSpec = CommandSpec {
    variants: &[r"(?:\s+list)?\s*$"],
    summary: "Show the turn order.",
    usage: ".order [list]",
    examples: &[".order", ".init"],
    ..spec("order", ORDER_ALIASES, Group::TurnOrder, TargetMode::None)
};

const ORDER_ADD: CommandSpec = CommandSpec {
    variants: &[r"\s+add"],
    summary: "Add entities to the turn order.",
    usage: ".order add",
    examples: &[".order add @ Weft @ Warp"],
    ..spec("order_add", ORDER_ALIASES, Group::TurnOrder, TargetMode::Required)
};

const ORDER_DROP: CommandSpec = CommandSpec {
    variants: &[r"\s+drop"],
    summary: "Take entities out of the turn order.",
    usage: ".order drop",
    examples: &[".o drop @ Mill"],
    ..spec("order_drop", ORDER_ALIASES, Group::TurnOrder, TargetMode::Required)
};

const ORDER_DEFER: CommandSpec = CommandSpec {
    variants: &[r"\s+defer"],
    summary: "Hold an entity's action until later.",
    usage: ".order defer",
    ..spec("order_defer", ORDER_ALIASES, Group::TurnOrder, TargetMode::Required)
};

const ORDER_UNDEFER: CommandSpec = CommandSpec {
    variants: &[r"\s+undefer"],
    summary: "Let a deferred entity act now.",
    usage: ".order undefer",
    ..spec("order_undefer", ORDER_ALIASES, Group::TurnOrder, TargetMode::Required)
};

const ORDER_NEXT: CommandSpec = CommandSpec {
    variants: &[r"\s+next"],
    summary: "Advance to the next entity.",
    usage: ".order next",
    ..spec("order_next", ORDER_ALIASES, Group::TurnOrder, TargetMode::None)
};

const ORDER_BACK: CommandSpec = CommandSpec {
    variants: &[r"\s+back"],
    summary: "Step back to the previous entity.",
    usage: ".order back",
    ..spec("order_back", ORDER_ALIASES, Group::TurnOrder, TargetMode::None)
};

const ORDER_START: CommandSpec = CommandSpec {
    variants: &[r"\s+start"],
    summary: "Start the turn order with the entities added so far.",
    usage: ".order start",
    ..spec("order_start", ORDER_ALIASES, Group::TurnOrder, TargetMode::None)
};

const ORDER_CLEAR: CommandSpec = CommandSpec {
    variants: &[r"\s+clear"],
    summary: "Empty the turn order.",
    usage: ".order clear",
    ..spec("order_clear", ORDER_ALIASES, Group::TurnOrder, TargetMode::None)
};

// =============================================================================
// Help and admin
// =============================================================================

const HELP: CommandSpec = CommandSpec {
    variants: &[TEXT],
    summary: "List commands, or explain one.",
    usage: ".help [command]",
    examples: &[".help", ".help fp+"],
    ..spec("help", &["help", "h"], Group::Help, TargetMode::None)
};

const TARGETING: CommandSpec = CommandSpec {
    summary: "Targeted commands act on `@ Name` markers (several run once each), \
        else on your claimed character, else on a name in parentheses in your \
        display name. With none of those the bot asks, and `.target <name>` \
        finishes the command.",
    examples: &[".fp+ @ Weft @ Warp", ".claim Weft", ".target Weft"],
    ..spec("targeting", &["targeting"], Group::Help, TargetMode::DocumentationOnly)
};

const VERSION: CommandSpec = CommandSpec {
    summary: "Bot version, build and settings fingerprint.",
    usage: ".version",
    ..spec("version", &["version"], Group::Admin, TargetMode::None)
};

const DUMP: CommandSpec = CommandSpec {
    summary: "Attach the raw game state as JSON.",
    usage: ".dump",
    ..spec("dump", &["dump"], Group::Admin, TargetMode::None)
};

const STOP: CommandSpec = CommandSpec {
    summary: "Shut the bot down. Admins only.",
    usage: ".stop",
    ..spec("stop", &["stop"], Group::Admin, TargetMode::None)
};

fn plain(handler: impl CommandHandler + 'static) -> Handler {
    Handler::Plain(Arc::new(handler))
}

fn targeted(handler: impl TargetedHandler + 'static) -> Handler {
    Handler::Targeted(Arc::new(handler))
}

/// Register every command, in help order.
pub fn register_all(table: &mut PatternTable) -> Result<(), RegistryError> {
    table.register(CLAIM, args::name, plain(ClaimEntity))?;
    table.register(UNCLAIM, args::no_args, plain(Unclaim))?;
    table.register(CLAIMED, args::no_args, plain(ListClaims))?;
    table.register(TARGET_PENDING, args::name, plain(RetargetPending))?;
    table.register(ROLL, args::free_text, plain(Roll))?;
    table.register(AMEND, args::free_text, plain(Amend))?;
    table.register(INFO, args::target_name, targeted(ShowInfo))?;
    table.register(SUMMARY, args::no_args, plain(Summary))?;
    table.register(ENTITIES, args::no_args, plain(ListEntities))?;
    table.register(CREATE_ENTITY, args::new_entity, plain(CreateEntity))?;
    table.register(EDIT_ENTITY, args::edit, targeted(EditEntity))?;
    table.register(REMOVE_ENTITY, args::target_name, targeted(RemoveEntity))?;
    table.register(
        FP_PLUS,
        args::amount,
        targeted(AdjustFatePoints::new(FatePointChange::Increment)),
    )?;
    table.register(
        FP_MINUS,
        args::amount,
        targeted(AdjustFatePoints::new(FatePointChange::Decrement)),
    )?;
    table.register(
        REFRESH,
        args::target_name,
        targeted(AdjustFatePoints::new(FatePointChange::Refresh)),
    )?;
    table.register(ADD_ASPECT, args::aspect, targeted(AddAspect))?;
    table.register(REMOVE_ASPECT, args::name, targeted(RemoveAspect))?;
    table.register(TAG_ASPECT, args::tag, targeted(TagAspect::tag()))?;
    table.register(UNTAG_ASPECT, args::tag, targeted(TagAspect::untag()))?;
    table.register(CLEAR_ASPECTS, args::aspect_kind, targeted(ClearAspects))?;
    table.register(CLEAR_ALL_ASPECTS, args::aspect_kind, plain(ClearAllAspects))?;
    table.register(STRESS_CHECK, args::stress_box, targeted(StressBoxes::new(StressOp::Check)))?;
    table.register(
        STRESS_ABSORB,
        args::stress_shifts,
        targeted(StressBoxes::new(StressOp::Absorb)),
    )?;
    table.register(
        STRESS_UNCHECK,
        args::stress_box,
        targeted(StressBoxes::new(StressOp::Uncheck)),
    )?;
    table.register(CLEAR_STRESS, args::track, targeted(ClearStress))?;
    table.register(CLEAR_ALL_STRESS, args::no_args, plain(ClearAllStress))?;
    table.register(ORDER_SHOW, args::no_args, plain(ShowOrder))?;
    table.register(ORDER_ADD, args::no_args, targeted(OrderEntity::new(OrderEntityOp::Add)))?;
    table.register(ORDER_DROP, args::no_args, targeted(OrderEntity::new(OrderEntityOp::Drop)))?;
    table.register(ORDER_DEFER, args::no_args, targeted(OrderEntity::new(OrderEntityOp::Defer)))?;
    table.register(
        ORDER_UNDEFER,
        args::no_args,
        targeted(OrderEntity::new(OrderEntityOp::Undefer)),
    )?;
    table.register(ORDER_NEXT, args::no_args, plain(OrderStep::new(OrderStepOp::Next)))?;
    table.register(ORDER_BACK, args::no_args, plain(OrderStep::new(OrderStepOp::Back)))?;
    table.register(ORDER_START, args::no_args, plain(OrderStep::new(OrderStepOp::Start)))?;
    table.register(ORDER_CLEAR, args::no_args, plain(OrderStep::new(OrderStepOp::Clear)))?;
    table.register(HELP, args::free_text, plain(Help))?;
    table.register(TARGETING, args::no_args, Handler::DocumentationOnly)?;
    table.register(VERSION, args::no_args, plain(Version))?;
    table.register(DUMP, args::no_args, plain(Dump))?;
    table.register(STOP, args::no_args, plain(Stop))?;
    Ok(())
}
