use crate::{Float24, Vec4};
use std::ops::{Index, IndexMut};

/// Number of attribute slots a vertex can carry.
pub const MAX_ATTRIBUTES: usize = 16;

/// Raw per-vertex attributes, as fetched by the command processor or produced by a shader unit.
///
/// The buffer has a fixed capacity of [`MAX_ATTRIBUTES`] slots, each holding one 4 component vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttributeBuffer {
    pub attr: [Vec4<Float24>; MAX_ATTRIBUTES],
}

impl AttributeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a buffer whose leading slots hold `values`, converted from host floats.
    pub fn from_f32(values: &[[f32; 4]]) -> Self {
        assert!(values.len() <= MAX_ATTRIBUTES, "too many attributes");

        let mut buffer = Self::default();
        for (slot, value) in buffer.attr.iter_mut().zip(values) {
            *slot = Vec4::from_f32(*value);
        }

        buffer
    }
}

impl Index<usize> for AttributeBuffer {
    type Output = Vec4<Float24>;
    fn index(&self, index: usize) -> &Self::Output {
        &self.attr[index]
    }
}

impl IndexMut<usize> for AttributeBuffer {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.attr[index]
    }
}
