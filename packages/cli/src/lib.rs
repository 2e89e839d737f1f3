// ABOUTME: Shared pieces of the simlok binary
// ABOUTME: Draft workspace on disk and terminal rendering

pub mod render;
pub mod workspace;

pub use render::ConsoleNotifier;
pub use workspace::{resolve_row, DraftWorkspace};
