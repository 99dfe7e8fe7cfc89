// crates/framecut-editor/src/lib.rs
//
// Interactive layer over framecut-core: pointer controllers, undo history,
// the storage collaborator and the session that ties them together.

pub mod cli;
pub mod config;
pub mod history;
pub mod interaction;
pub mod project_io;
pub mod session;
pub mod store;
pub mod sync;

pub use config::EditorConfig;
pub use session::EditorSession;
pub use store::{MemoryStore, ProjectStore, StoreError};
