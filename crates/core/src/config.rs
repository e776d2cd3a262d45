//! Construction-time configuration
//!
//! Everything here is fixed once a controller is built. [`BoardConfig::validate`]
//! is the only fallible step of setting up a board.

use thiserror::Error;

use crate::types::{DEFAULT_HEIGHT, DEFAULT_HINT_DELAY_MS, DEFAULT_TYPE_COUNT, DEFAULT_WIDTH};

/// Smallest side length; a run of three must fit along both axes
pub const MIN_SIDE: u8 = 3;

/// Largest side length
pub const MAX_SIDE: u8 = 64;

/// Fewest piece types; with one type every refill would match again
pub const MIN_TYPE_COUNT: u8 = 2;

/// Most piece types (one letter each when printed)
pub const MAX_TYPE_COUNT: u8 = 26;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board width {0} is outside {min}..={max}", min = MIN_SIDE, max = MAX_SIDE)]
    Width(u8),
    #[error("board height {0} is outside {min}..={max}", min = MIN_SIDE, max = MAX_SIDE)]
    Height(u8),
    #[error(
        "type count {0} is outside {min}..={max}",
        min = MIN_TYPE_COUNT,
        max = MAX_TYPE_COUNT
    )]
    TypeCount(u8),
    #[error(
        "board is {width}x{height} but the config asks for {expected_width}x{expected_height}"
    )]
    BoardSize {
        width: usize,
        height: usize,
        expected_width: u8,
        expected_height: u8,
    },
}

/// Board engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    pub width: u8,
    pub height: u8,
    /// Number of distinct piece types, drawn uniformly
    pub type_count: u8,
    /// Idle time the board must exceed before a hint is searched for
    ///
    /// Exclusive: the search runs on the first tick that takes the idle time
    /// past this value, never on a tick that lands exactly on it.
    pub hint_delay_ms: u32,
    /// Seed for the piece type generator
    pub seed: u64,
}

impl BoardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SIDE..=MAX_SIDE).contains(&self.width) {
            return Err(ConfigError::Width(self.width));
        }
        if !(MIN_SIDE..=MAX_SIDE).contains(&self.height) {
            return Err(ConfigError::Height(self.height));
        }
        if !(MIN_TYPE_COUNT..=MAX_TYPE_COUNT).contains(&self.type_count) {
            return Err(ConfigError::TypeCount(self.type_count));
        }
        Ok(())
    }

    /// Total number of slots
    pub fn slot_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            type_count: DEFAULT_TYPE_COUNT,
            hint_delay_ms: DEFAULT_HINT_DELAY_MS,
            seed: 1,
        }
    }
}
