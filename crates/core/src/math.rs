use crate::Float24;
use std::ops::{Index, IndexMut};

/// A 4 component vector. Components are addressed as `x, y, z, w` or by index `0..4`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vec4<T> {
    pub x: T,
    pub y: T,
    pub z: T,
    pub w: T,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vec3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

/// Texture coordinate pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vec2<T> {
    pub u: T,
    pub v: T,
}

impl<T: Copy> Vec4<T> {
    pub const fn new(x: T, y: T, z: T, w: T) -> Self {
        Self { x, y, z, w }
    }

    pub const fn splat(value: T) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn to_array(self) -> [T; 4] {
        [self.x, self.y, self.z, self.w]
    }

    pub fn map<U: Copy>(self, mut f: impl FnMut(T) -> U) -> Vec4<U> {
        Vec4::new(f(self.x), f(self.y), f(self.z), f(self.w))
    }

    pub fn zip<U: Copy, R: Copy>(self, other: Vec4<U>, mut f: impl FnMut(T, U) -> R) -> Vec4<R> {
        Vec4::new(
            f(self.x, other.x),
            f(self.y, other.y),
            f(self.z, other.z),
            f(self.w, other.w),
        )
    }
}

impl<T: Copy> From<[T; 4]> for Vec4<T> {
    fn from(value: [T; 4]) -> Self {
        Self::new(value[0], value[1], value[2], value[3])
    }
}

impl Vec4<Float24> {
    pub const ZERO: Self = Self::splat(Float24::ZERO);

    pub fn from_f32(value: [f32; 4]) -> Self {
        Vec4::<f32>::from(value).map(Float24::from_f32)
    }

    pub fn to_f32(self) -> [f32; 4] {
        self.map(Float24::to_f32).to_array()
    }
}

impl<T> Index<usize> for Vec4<T> {
    type Output = T;
    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("vector component {index} out of range"),
        }
    }
}

impl<T> IndexMut<usize> for Vec4<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("vector component {index} out of range"),
        }
    }
}
