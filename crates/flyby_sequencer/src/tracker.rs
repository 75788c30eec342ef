// SPDX-License-Identifier: MIT OR Apache-2.0
//! Look-at orientation for the fly-through camera.

use crate::target::CameraTransform;
use glam::{EulerRot, Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Orients an object along the line from a target to the object, followed by
/// a fixed Euler offset.
///
/// The base rotation points +Z from the target towards the eye, so a yaw
/// offset of 180 degrees makes a camera face the target.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LookAtTracker {
    /// Extra rotation in degrees, applied Z first, then X, then Y
    pub offset_degrees: Vec3,
}

impl LookAtTracker {
    /// Create a tracker with the given Euler offset in degrees
    pub fn new(offset_degrees: Vec3) -> Self {
        Self { offset_degrees }
    }

    /// Tracker whose result faces the target
    pub fn facing_target() -> Self {
        Self::new(Vec3::new(0.0, 180.0, 0.0))
    }

    /// Offset as a quaternion
    pub fn offset(&self) -> Quat {
        let o = self.offset_degrees;
        Quat::from_euler(
            EulerRot::YXZ,
            o.y.to_radians(),
            o.x.to_radians(),
            o.z.to_radians(),
        )
    }

    /// Rotation for an object at `eye` tracking `target`.
    ///
    /// Returns `None` when the two points coincide.
    pub fn rotation(&self, eye: Vec3, target: Vec3) -> Option<Quat> {
        look_rotation(eye - target, Vec3::Y).map(|look| (look * self.offset()).normalize())
    }

    /// Write the tracking rotation into `transform`; left unchanged when the
    /// camera sits on the target
    pub fn apply(&self, transform: &mut CameraTransform, target: Vec3) -> bool {
        match self.rotation(transform.position, target) {
            Some(rotation) => {
                transform.rotation = rotation;
                true
            }
            None => false,
        }
    }
}

/// Rotation mapping +Z onto `forward` with +Y as close to `up` as possible
fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let z = forward.try_normalize()?;
    // Looking straight along `up` leaves the roll undefined; pick another axis
    let x = up
        .cross(z)
        .try_normalize()
        .or_else(|| Vec3::Z.cross(z).try_normalize())?;
    let y = z.cross(x);
    Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize())
}
