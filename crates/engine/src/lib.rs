//! Engine helpers around the core controller
//!
//! - [`plan`]: turn a hint into a concrete swap, or search for one
//! - [`mover`]: simulated motion collaborator
//! - [`session`]: fixed-timestep frame loop with optional autoplay
//!
//! ```
//! use gemgrid_core::BoardConfig;
//! use gemgrid_engine::{Session, SessionOptions};
//!
//! let config = BoardConfig { hint_delay_ms: 200, ..BoardConfig::default() };
//! let mut session = Session::new(config, SessionOptions::default()).unwrap();
//! assert!(session.run_until_settled(100_000));
//! ```

pub mod mover;
pub mod plan;
pub mod session;

pub use mover::LinearMover;
pub use plan::{find_swap, plan_swap, swap_makes_match, PlanError};
pub use session::{Session, SessionOptions};
