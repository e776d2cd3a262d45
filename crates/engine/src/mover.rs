//! Linear motion simulator
//!
//! Stands in for the animation layer of a real front end. It watches the
//! notification stream, moves every piece towards its last `MotionTarget` at
//! a fixed speed and reports arrivals, which the session forwards to
//! [`Controller::motion_complete`](gemgrid_core::Controller::motion_complete).

use std::collections::BTreeMap;

use gemgrid_core::types::{Notification, PieceId};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Travel {
    from: (f32, f32),
    to: (u16, u16),
    elapsed_ms: u32,
    duration_ms: u32,
}

impl Travel {
    fn position(&self) -> (f32, f32) {
        if self.duration_ms == 0 {
            return (self.to.0 as f32, self.to.1 as f32);
        }
        let t = self.elapsed_ms as f32 / self.duration_ms as f32;
        (
            self.from.0 + (self.to.0 as f32 - self.from.0) * t,
            self.from.1 + (self.to.1 as f32 - self.from.1) * t,
        )
    }
}

/// Moves pieces in straight lines at `ms_per_cell` per cell of distance
#[derive(Debug, Clone, Default)]
pub struct LinearMover {
    ms_per_cell: u32,
    at_rest: BTreeMap<PieceId, (u16, u16)>,
    /// Spawned pieces waiting for their first target, with their height above it
    spawning: BTreeMap<PieceId, u16>,
    travelling: BTreeMap<PieceId, Travel>,
}

impl LinearMover {
    pub fn new(ms_per_cell: u32) -> Self {
        Self {
            ms_per_cell,
            ..Self::default()
        }
    }

    pub fn ms_per_cell(&self) -> u32 {
        self.ms_per_cell
    }

    /// Feed one engine notification
    ///
    /// Targets are taken from the cell coordinates; the `slot` of a
    /// `MotionTarget` names the same cell and is not consulted.
    pub fn observe(&mut self, notification: &Notification) {
        match *notification {
            Notification::PieceSpawned {
                piece, rows_above, ..
            } => {
                self.at_rest.remove(&piece);
                self.travelling.remove(&piece);
                self.spawning.insert(piece, rows_above);
            }
            Notification::PieceDisabled { piece, .. } => {
                self.at_rest.remove(&piece);
                self.spawning.remove(&piece);
                self.travelling.remove(&piece);
            }
            Notification::MotionTarget { piece, x, y, .. } => self.start(piece, (x, y)),
            _ => {}
        }
    }

    fn start(&mut self, piece: PieceId, to: (u16, u16)) {
        let from = if let Some(rows) = self.spawning.remove(&piece) {
            (to.0 as f32, to.1 as f32 + rows as f32)
        } else if let Some(travel) = self.travelling.get(&piece) {
            travel.position()
        } else if let Some(&(x, y)) = self.at_rest.get(&piece) {
            (x as f32, y as f32)
        } else {
            (to.0 as f32, to.1 as f32)
        };
        let distance = (to.0 as f32 - from.0).abs() + (to.1 as f32 - from.1).abs();
        let duration_ms = (distance * self.ms_per_cell as f32).ceil() as u32;

        self.at_rest.remove(&piece);
        self.travelling.insert(
            piece,
            Travel {
                from,
                to,
                elapsed_ms: 0,
                duration_ms,
            },
        );
    }

    /// Advance every travelling piece by `dt_ms`; returns arrivals in id order
    pub fn advance(&mut self, dt_ms: u32) -> Vec<PieceId> {
        let mut arrived = Vec::new();
        for (id, travel) in self.travelling.iter_mut() {
            travel.elapsed_ms = travel
                .elapsed_ms
                .saturating_add(dt_ms)
                .min(travel.duration_ms);
            if travel.elapsed_ms >= travel.duration_ms {
                arrived.push(*id);
            }
        }
        for id in &arrived {
            if let Some(travel) = self.travelling.remove(id) {
                self.at_rest.insert(*id, travel.to);
            }
        }
        arrived
    }

    /// Current (interpolated) position of a piece in cell units
    pub fn position(&self, piece: PieceId) -> Option<(f32, f32)> {
        if let Some(travel) = self.travelling.get(&piece) {
            return Some(travel.position());
        }
        self.at_rest
            .get(&piece)
            .map(|&(x, y)| (x as f32, y as f32))
    }

    /// Number of pieces still travelling
    pub fn in_flight(&self) -> usize {
        self.travelling.len()
    }

    pub fn is_idle(&self) -> bool {
        self.travelling.is_empty()
    }
}
