use crate::{AttributeBuffer, Float24, OutputMapping, Semantic, Vec2, Vec3, Vec4};

/// A shaded vertex with its outputs assigned to named fields, ready for rasterization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutputVertex {
    pub pos: Vec4<Float24>,
    pub quat: Vec4<Float24>,
    pub color: Vec4<Float24>,
    pub tc0: Vec2<Float24>,
    pub tc1: Vec2<Float24>,
    pub tc0_w: Float24,
    pub view: Vec3<Float24>,
    pub tc2: Vec2<Float24>,
}

impl OutputVertex {
    /// Assemble a vertex from the packed outputs of a shader unit.
    ///
    /// Every component mapped to a semantic is copied into that field. Fields no component maps to
    /// stay zero, so no stale value or denormal leaks into later stages. Afterwards the color is
    /// replaced by `min(|color|, 1.0)`, once, before anything interpolates it.
    pub fn from_attribute_buffer(mapping: &OutputMapping, input: &AttributeBuffer) -> Self {
        let mut ret = Self::default();

        for (attr, map) in mapping.attributes().iter().enumerate() {
            for (component, semantic) in map.components.iter().enumerate() {
                // unmapped components have no field to write, the zeroed field stays as is
                if let Some(semantic) = *semantic {
                    *ret.semantic_mut(semantic) = input.attr[attr][component];
                }
            }
        }

        // the hardware takes the absolute value and saturates vertex colors before interpolation
        ret.color = ret.color.map(|c| Float24::from_f32(c.to_f32().abs().min(1.0)));

        tracing::trace!(
            pos = ?ret.pos.to_f32(),
            quat = ?ret.quat.to_f32(),
            color = ?ret.color.to_f32(),
            tc0 = ?[ret.tc0.u.to_f32(), ret.tc0.v.to_f32()],
            view = ?[ret.view.x.to_f32(), ret.view.y.to_f32(), ret.view.z.to_f32()],
            "output vertex"
        );

        ret
    }

    /// The field a semantic id addresses.
    pub fn semantic_mut(&mut self, semantic: Semantic) -> &mut Float24 {
        use Semantic::*;
        match semantic {
            PositionX => &mut self.pos.x,
            PositionY => &mut self.pos.y,
            PositionZ => &mut self.pos.z,
            PositionW => &mut self.pos.w,
            QuaternionX => &mut self.quat.x,
            QuaternionY => &mut self.quat.y,
            QuaternionZ => &mut self.quat.z,
            QuaternionW => &mut self.quat.w,
            ColorR => &mut self.color.x,
            ColorG => &mut self.color.y,
            ColorB => &mut self.color.z,
            ColorA => &mut self.color.w,
            Texcoord0U => &mut self.tc0.u,
            Texcoord0V => &mut self.tc0.v,
            Texcoord1U => &mut self.tc1.u,
            Texcoord1V => &mut self.tc1.v,
            Texcoord0W => &mut self.tc0_w,
            ViewX => &mut self.view.x,
            ViewY => &mut self.view.y,
            ViewZ => &mut self.view.z,
            Texcoord2U => &mut self.tc2.u,
            Texcoord2V => &mut self.tc2.v,
        }
    }

    pub fn semantic(&self, semantic: Semantic) -> Float24 {
        let mut copy = *self;
        *copy.semantic_mut(semantic)
    }
}
