//! # Blockpage HTML Compiler
//!
//! Turns a layout document into static HTML. Components render in `order`
//! ascending; anything the renderer cannot draw is skipped with a warning
//! and reported back in [`RenderOutput::skipped`].

mod compiler;

#[cfg(test)]
mod tests;

pub use compiler::{
    render_document, render_page, RenderOptions, RenderOutput, SkipReason, SkippedBlock,
    MAX_GRID_IMAGES,
};
