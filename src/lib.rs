//! gemgrid (workspace facade crate).
//!
//! Re-exports the workspace crates under one name, `gemgrid::{core,engine,types}`,
//! while the implementation lives in dedicated crates under `crates/`.

pub use gemgrid_core as core;
pub use gemgrid_engine as engine;
pub use gemgrid_types as types;
