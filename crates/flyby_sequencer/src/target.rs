// SPDX-License-Identifier: MIT OR Apache-2.0
//! Position targets written by the sequencer.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Something the sequencer can write a camera position into.
///
/// The sequencer never owns its target; the host passes it in on each tick.
pub trait PositionSink {
    /// Store a new world-space position
    fn set_position(&mut self, position: Vec3);
}

impl PositionSink for Vec3 {
    fn set_position(&mut self, position: Vec3) {
        *self = position;
    }
}

impl<T: PositionSink + ?Sized> PositionSink for &mut T {
    fn set_position(&mut self, position: Vec3) {
        (**self).set_position(position);
    }
}

/// World-space camera transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTransform {
    /// World-space position
    pub position: Vec3,
    /// World-space rotation
    pub rotation: Quat,
}

impl CameraTransform {
    /// Create a transform at `position` with no rotation
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Forward direction (+Z) of the current rotation
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self::from_position(Vec3::ZERO)
    }
}

impl PositionSink for CameraTransform {
    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
}
