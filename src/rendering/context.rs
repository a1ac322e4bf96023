//! Frame output of the map.
//!
//! Rendering produces a flat list of draw commands in paint order. A host
//! backend (canvas, GPU, test harness) replays them; the engine itself never
//! touches pixels.

use crate::{
    core::{bounds::Bounds, geo::Point},
    layers::style::{IconStyle, TextStyle},
    Result,
};

/// One paint operation, positions in screen pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Static image stretched over a screen rectangle
    Image {
        url: String,
        attributions: String,
        rect: Bounds,
        opacity: f32,
    },
    Icon {
        position: Point,
        style: IconStyle,
    },
    Text {
        position: Point,
        style: TextStyle,
    },
    /// Document element positioned over the map, anchored at its bottom
    /// center
    Overlay { element_id: String, position: Point },
}

/// Collects the draw commands of one frame
#[derive(Debug, Default)]
pub struct RenderContext {
    commands: Vec<DrawCommand>,
    frame: u64,
    in_frame: bool,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new frame, discarding the previous one's commands
    pub fn begin_frame(&mut self) -> Result<()> {
        self.commands.clear();
        self.frame += 1;
        self.in_frame = true;
        Ok(())
    }

    pub fn end_frame(&mut self) {
        self.in_frame = false;
    }

    pub fn push(&mut self, command: DrawCommand) {
        if !self.in_frame {
            log::warn!("draw command issued outside a frame");
        }
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Hands the frame's commands to the caller
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of frames begun so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn icons(&self) -> impl Iterator<Item = (&Point, &IconStyle)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Icon { position, style } => Some((position, style)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = (&Point, &TextStyle)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { position, style } => Some((position, style)),
            _ => None,
        })
    }
}
