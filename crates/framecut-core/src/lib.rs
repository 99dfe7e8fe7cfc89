// crates/framecut-core/src/lib.rs
//
// Pure editing model for the framecut timeline editor: data types, the
// validating mutators, the temporal grid, and the composition compiler.
// No I/O and no logging live in this crate.

pub mod commands;
pub mod composition;
pub mod diff;
pub mod error;
pub mod helpers;
pub mod properties;
pub mod state;

pub use commands::EditorCommand;
pub use composition::{compile, Composition, Layer, LayerSource};
pub use error::EditError;
pub use state::{Asset, AssetKind, Clip, ProjectState, Track, TrackKind};
