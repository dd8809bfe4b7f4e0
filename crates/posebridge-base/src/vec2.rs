use std::ops::Mul;

/// Two-component vector; frame sizes use `Vec2<usize>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

impl<T> Vec2<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Default> Vec2<T> {
    pub fn zero() -> Self {
        Self::default()
    }
}

impl<T: Copy + Mul<Output = T>> Vec2<T> {
    /// `x * y`, e.g. the pixel count of a frame size.
    pub fn area(&self) -> T {
        self.x * self.y
    }
}
