use anyhow::Context;
use gridplace_author::{Outcome, PlacementSession};
use gridplace_common::GridCell;
use gridplace_input::PointerEvent;
use gridplace_scene::SceneAdapter;
use serde::Deserialize;
use std::path::Path;

/// Editor-level commands a script can issue besides raw pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptCommand {
    Undo,
    Redo,
}

/// One line of a play script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    /// Move the pointer over the center of a cell.
    Hover { hover: GridCell },
    Command { command: ScriptCommand },
    Event(PointerEvent),
}

pub fn load(path: &Path) -> anyhow::Result<Vec<ScriptStep>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    parse(&data)
}

pub fn parse(data: &str) -> anyhow::Result<Vec<ScriptStep>> {
    serde_yaml::from_str(data).context("parsing play script")
}

/// Result of running one step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    Event(Outcome),
    /// Undo or redo; `false` when there was nothing to apply.
    Command(ScriptCommand, bool),
}

pub fn run_step<S: SceneAdapter>(
    session: &mut PlacementSession,
    scene: &mut S,
    step: &ScriptStep,
) -> StepResult {
    match *step {
        ScriptStep::Hover { hover } => StepResult::Event(session.hover_cell(hover, scene)),
        ScriptStep::Event(event) => StepResult::Event(session.handle(event, scene)),
        ScriptStep::Command { command } => {
            let applied = match command {
                ScriptCommand::Undo => session.undo(scene),
                ScriptCommand::Redo => session.redo(scene),
            };
            StepResult::Command(command, applied)
        }
    }
}

/// One-line summary of a step result for terminal output.
pub fn describe(result: &StepResult) -> String {
    match result {
        StepResult::Event(Outcome::Highlighted(cell)) => format!("highlight {cell}"),
        StepResult::Event(Outcome::Placed(p)) => {
            format!("placed {} at {} ({})", p.id.short(), p.cell, p.handle)
        }
        StepResult::Event(Outcome::Removed(p)) => {
            format!("removed {} from {}", p.id.short(), p.cell)
        }
        StepResult::Event(Outcome::Rejected(r)) => format!("rejected: {r}"),
        StepResult::Event(Outcome::Resized(vp)) => format!("resized to {}x{}", vp.width, vp.height),
        StepResult::Event(Outcome::Orbited(eye)) => {
            format!("camera orbited to ({:.2}, {:.2}, {:.2})", eye.x, eye.y, eye.z)
        }
        StepResult::Event(Outcome::Ignored) => "ignored".to_string(),
        StepResult::Command(cmd, true) => format!("{cmd:?} applied"),
        StepResult::Command(cmd, false) => format!("{cmd:?}: nothing to apply"),
    }
}
