use serde::Serialize;

use crate::types::{ControllerState, PieceType, SlotIndex};

/// Render-ready copy of the controller's visible state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub width: u8,
    pub height: u8,
    /// Cell types, row-major from the bottom row; `None` is a vacant slot
    pub cells: Vec<Option<PieceType>>,
    pub state: ControllerState,
    pub selection: Option<SlotIndex>,
    pub hint: Option<[SlotIndex; 3]>,
    /// Enabled pieces still travelling
    pub moving: u32,
}

impl BoardSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.cells.clear();
        self.state = ControllerState::Idle;
        self.selection = None;
        self.hint = None;
        self.moving = 0;
    }

    /// Text rows, top row first (`.` for vacant slots)
    pub fn rows(&self) -> Vec<String> {
        let w = self.width as usize;
        if w == 0 {
            return Vec::new();
        }
        self.cells
            .chunks(w)
            .rev()
            .map(|row| {
                row.iter()
                    .map(|c| c.map_or('.', |kind| kind.as_char()))
                    .collect()
            })
            .collect()
    }

    pub fn settled(&self) -> bool {
        self.moving == 0 && !self.state.is_busy()
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
            state: ControllerState::Idle,
            selection: None,
            hint: None,
            moving: 0,
        }
    }
}
