//! Pose wire types shared by episode documents.
//!
//! **Why**: Episode JSON stores positions and rotations as named-field
//! objects (`{x,y,z}` / `{w,x,y,z}`), not arrays. These mirror the wire
//! shape exactly and convert to glam types for math.
//!
//! **Used by**: Episode/summary documents, selector feature derivation,
//! scene panel.

use glam::{DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

/// Position sample in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3f {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3f {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_glam(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

/// Orientation quaternion, scalar-first on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quatf {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Quatf {
    fn default() -> Self {
        Self {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

impl Quatf {
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    pub fn to_glam(self) -> DQuat {
        DQuat::from_xyzw(self.x, self.y, self.z, self.w)
    }

    /// Intrinsic XYZ Euler angles in radians: (roll, pitch, yaw).
    ///
    /// The quaternion is normalized first; recorded hardware data drifts
    /// slightly off unit length.
    pub fn roll_pitch_yaw(self) -> (f64, f64, f64) {
        let q = self.to_glam().normalize();
        q.to_euler(EulerRot::XYZ)
    }

    /// Planar heading (yaw about +Z), radians.
    pub fn yaw(self) -> f64 {
        self.roll_pitch_yaw().2
    }
}

/// Rigid pose of an object in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3f,
    pub rotation: Quatf,
}

impl Pose {
    /// Position delta `self - base`.
    pub fn delta_position(&self, base: &Pose) -> DVec3 {
        self.position.to_glam() - base.position.to_glam()
    }

    /// Per-axis Euler delta `self - base`, each wrapped to [-pi, pi].
    pub fn delta_rpy(&self, base: &Pose) -> (f64, f64, f64) {
        let (r0, p0, y0) = base.rotation.roll_pitch_yaw();
        let (r1, p1, y1) = self.rotation.roll_pitch_yaw();
        (
            wrap_angle(r1 - r0),
            wrap_angle(p1 - p0),
            wrap_angle(y1 - y0),
        )
    }

    /// Planar heading delta, wrapped to [-pi, pi].
    pub fn delta_yaw(&self, base: &Pose) -> f64 {
        wrap_angle(self.rotation.yaw() - base.rotation.yaw())
    }
}

/// Wrap an angle to [-pi, pi].
///
/// Recorded yaw trajectories cross the +/-pi seam; without wrapping a
/// 0.1 rad turn can show up as a 6.2 rad delta.
pub fn wrap_angle(a: f64) -> f64 {
    let two_pi = std::f64::consts::TAU;
    let mut a = a % two_pi;
    if a > std::f64::consts::PI {
        a -= two_pi;
    } else if a < -std::f64::consts::PI {
        a += two_pi;
    }
    a
}
