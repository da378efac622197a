//! Position / rotation / scale transforms.
//!
//! Shapes and the camera keep a [`Transform`] instead of a raw matrix so the
//! parts can be applied selectively (directions ignore position, normal maps
//! only need rotation).

use glam::{Mat4, Quat, Vec3};

/// Which parts of a [`Transform`] to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformParts {
    pub position: bool,
    pub rotation: bool,
    pub scale: bool,
}

impl TransformParts {
    /// Full affine transform for points.
    pub const ALL: TransformParts = TransformParts {
        position: true,
        rotation: true,
        scale: true,
    };

    /// Rotation and scale, for direction vectors.
    pub const DIRECTION: TransformParts = TransformParts {
        position: false,
        rotation: true,
        scale: true,
    };

    pub const ROTATION: TransformParts = TransformParts {
        position: false,
        rotation: true,
        scale: false,
    };
}

/// Position + rotation + non-uniform scale.
///
/// Applied to a point in the order scale, rotate, translate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// A transform at `position` whose local +Z axis points along `forward`.
    pub fn facing(position: Vec3, forward: Vec3, scale: Vec3) -> Self {
        Self::new(position, Self::rotation_between(Vec3::Z, forward), scale)
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Minimal rotation taking direction `from` onto direction `to`.
    ///
    /// Degenerate (zero-length) inputs give the identity rotation.
    pub fn rotation_between(from: Vec3, to: Vec3) -> Quat {
        match (from.try_normalize(), to.try_normalize()) {
            (Some(from), Some(to)) => Quat::from_rotation_arc(from, to),
            _ => Quat::IDENTITY,
        }
    }

    /// Apply the selected parts to `point`.
    pub fn apply(&self, point: Vec3, parts: TransformParts) -> Vec3 {
        let mut p = point;
        if parts.scale {
            p *= self.scale;
        }
        if parts.rotation {
            p = self.rotation * p;
        }
        if parts.position {
            p += self.position;
        }
        p
    }

    /// Undo the selected parts, in reverse order.
    pub fn inverse_apply(&self, point: Vec3, parts: TransformParts) -> Vec3 {
        let mut p = point;
        if parts.position {
            p -= self.position;
        }
        if parts.rotation {
            p = self.rotation.inverse() * p;
        }
        if parts.scale {
            p /= self.scale;
        }
        p
    }

    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.apply(point, TransformParts::ALL)
    }

    #[inline]
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        self.inverse_apply(point, TransformParts::ALL)
    }

    /// Rotate and scale a direction (no translation).
    #[inline]
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.apply(vector, TransformParts::DIRECTION)
    }

    /// Local +Z in world space, unit length.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Local +X in world space, unit length.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Local +Y in world space, unit length.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
