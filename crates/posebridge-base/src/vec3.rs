use crate::Vec2;

/// Keypoint position. 2D engines leave `z` at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> Vec3<T> {
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }
}

impl<T: Default> Vec3<T> {
    pub fn zero() -> Self {
        Self::default()
    }
}

impl<T: Copy> Vec3<T> {
    /// Image-plane part.
    pub fn xy(&self) -> Vec2<T> {
        Vec2::new(self.x, self.y)
    }
}

impl<T: Default> From<Vec2<T>> for Vec3<T> {
    fn from(v: Vec2<T>) -> Self {
        Self::new(v.x, v.y, T::default())
    }
}
