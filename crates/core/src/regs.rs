//! Views over the command-processor registers that configure a shader unit.
//!
//! `from_raw` constructors decode hardware register words and mask away bits the hardware ignores.
//! `new` constructors take already decoded values and reject anything outside the register file.

use crate::{
    MAX_ATTRIBUTES,
    error::RegsError,
    unit_state::{NUM_INPUT_REGISTERS, NUM_OUTPUT_REGISTERS},
};

/// Number of output attribute mapping registers (`vs_output_attributes`).
pub const MAX_OUTPUT_ATTRIBUTES: usize = 7;

/// Attribute slot to input register mapping, 4 bits per attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InputRegisterMap([u8; MAX_ATTRIBUTES]);

impl InputRegisterMap {
    /// Maps attribute `n` to input register `n`.
    pub const IDENTITY: Self = Self([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]);

    pub fn new(registers: [u8; MAX_ATTRIBUTES]) -> Result<Self, RegsError> {
        for &index in registers.iter() {
            if index as usize >= NUM_INPUT_REGISTERS {
                return Err(RegsError::RegisterOutOfRange {
                    index,
                    count: NUM_INPUT_REGISTERS,
                });
            }
        }

        Ok(Self(registers))
    }

    /// Decode the two hardware words. `low` holds attributes 0-7, `high` holds attributes 8-15.
    pub fn from_raw(low: u32, high: u32) -> Self {
        let mut registers = [0; MAX_ATTRIBUTES];
        for (attr, register) in registers.iter_mut().enumerate() {
            let word = if attr < 8 { low } else { high };
            *register = ((word >> ((attr % 8) * 4)) & 0xf) as u8;
        }

        Self(registers)
    }

    pub fn register_for_attribute(&self, attr: usize) -> usize {
        self.0[attr] as usize
    }
}

/// Shader unit input and output configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ShaderConfig {
    max_input_attribute_index: u8,
    input_register_map: InputRegisterMap,
    output_mask: u16,
}

impl ShaderConfig {
    pub fn new(
        max_input_attribute_index: u8,
        input_register_map: InputRegisterMap,
        output_mask: u16,
    ) -> Result<Self, RegsError> {
        if max_input_attribute_index as usize >= MAX_ATTRIBUTES {
            return Err(RegsError::AttributeOutOfRange {
                index: max_input_attribute_index,
                count: MAX_ATTRIBUTES,
            });
        }

        Ok(Self {
            max_input_attribute_index,
            input_register_map,
            output_mask,
        })
    }

    /// Decode the raw `input_buffer_config`, `input_register_map` and `output_mask` registers.
    pub fn from_raw(input_buffer_config: u32, map_low: u32, map_high: u32, output_mask: u32) -> Self {
        Self {
            max_input_attribute_index: (input_buffer_config & 0xf) as u8,
            input_register_map: InputRegisterMap::from_raw(map_low, map_high),
            output_mask: (output_mask & 0xffff) as u16,
        }
    }

    pub fn max_input_attribute_index(&self) -> usize {
        self.max_input_attribute_index as usize
    }

    pub fn register_for_attribute(&self, attr: usize) -> usize {
        self.input_register_map.register_for_attribute(attr)
    }

    pub fn output_mask(&self) -> u16 {
        self.output_mask
    }

    /// Output registers enabled by the output mask, in ascending order.
    pub fn output_registers(&self) -> impl Iterator<Item = usize> + use<> {
        let mut mask = self.output_mask;
        std::iter::from_fn(move || {
            if mask == 0 {
                return None;
            }

            let register = mask.trailing_zeros() as usize;
            mask &= mask - 1;
            Some(register)
        })
    }
}

/// A named output vertex field. The discriminant is the hardware semantic id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Semantic {
    PositionX = 0,
    PositionY = 1,
    PositionZ = 2,
    PositionW = 3,
    QuaternionX = 4,
    QuaternionY = 5,
    QuaternionZ = 6,
    QuaternionW = 7,
    ColorR = 8,
    ColorG = 9,
    ColorB = 10,
    ColorA = 11,
    Texcoord0U = 12,
    Texcoord0V = 13,
    Texcoord1U = 14,
    Texcoord1V = 15,
    Texcoord0W = 16,
    ViewX = 18,
    ViewY = 19,
    ViewZ = 20,
    Texcoord2U = 22,
    Texcoord2V = 23,
}

impl Semantic {
    /// Hardware id of an unmapped component.
    pub const INVALID: u8 = 0x1f;

    /// Decode a semantic id. `Ok(None)` is an unmapped component.
    pub fn from_id(id: u8) -> Result<Option<Self>, RegsError> {
        use Semantic::*;
        Ok(Some(match id {
            0 => PositionX,
            1 => PositionY,
            2 => PositionZ,
            3 => PositionW,
            4 => QuaternionX,
            5 => QuaternionY,
            6 => QuaternionZ,
            7 => QuaternionW,
            8 => ColorR,
            9 => ColorG,
            10 => ColorB,
            11 => ColorA,
            12 => Texcoord0U,
            13 => Texcoord0V,
            14 => Texcoord1U,
            15 => Texcoord1V,
            16 => Texcoord0W,
            18 => ViewX,
            19 => ViewY,
            20 => ViewZ,
            22 => Texcoord2U,
            23 => Texcoord2V,
            Self::INVALID => return Ok(None),
            id => return Err(RegsError::InvalidSemantic(id)),
        }))
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}

/// Semantics the four components of one output attribute are written to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OutputRegisterMap {
    pub components: [Option<Semantic>; 4],
}

impl OutputRegisterMap {
    pub const INVALID: Self = Self { components: [None; 4] };

    pub fn new(components: [Option<Semantic>; 4]) -> Self {
        Self { components }
    }

    /// Decode a `vs_output_attributes` word (5 bit ids at bits 0, 8, 16 and 24).
    pub fn from_raw(raw: u32) -> Result<Self, RegsError> {
        let mut components = [None; 4];
        for (i, component) in components.iter_mut().enumerate() {
            *component = Semantic::from_id(((raw >> (i * 8)) & 0x1f) as u8)?;
        }

        Ok(Self { components })
    }
}

/// `vs_output_total` and the output attribute maps it enables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OutputMapping {
    total: u8,
    attributes: [OutputRegisterMap; MAX_OUTPUT_ATTRIBUTES],
}

impl OutputMapping {
    pub fn new(attributes: &[OutputRegisterMap]) -> Result<Self, RegsError> {
        if attributes.len() > MAX_OUTPUT_ATTRIBUTES {
            return Err(RegsError::TooManyOutputAttributes {
                total: attributes.len(),
                max: MAX_OUTPUT_ATTRIBUTES,
            });
        }

        let mut mapping = Self {
            total: attributes.len() as u8,
            attributes: [OutputRegisterMap::INVALID; MAX_OUTPUT_ATTRIBUTES],
        };
        mapping.attributes[..attributes.len()].copy_from_slice(attributes);

        Ok(mapping)
    }

    pub fn from_raw(total: u32, attributes: [u32; MAX_OUTPUT_ATTRIBUTES]) -> Result<Self, RegsError> {
        let total = total as usize;
        if total > MAX_OUTPUT_ATTRIBUTES {
            return Err(RegsError::TooManyOutputAttributes {
                total,
                max: MAX_OUTPUT_ATTRIBUTES,
            });
        }

        let mut maps = [OutputRegisterMap::INVALID; MAX_OUTPUT_ATTRIBUTES];
        for (map, raw) in maps.iter_mut().zip(attributes).take(total) {
            *map = OutputRegisterMap::from_raw(raw)?;
        }

        Self::new(&maps[..total])
    }

    pub fn total(&self) -> usize {
        self.total as usize
    }

    /// The enabled attribute maps, `vs_output_total` of them.
    pub fn attributes(&self) -> &[OutputRegisterMap] {
        &self.attributes[..self.total as usize]
    }
}

/// The register state of one draw call that the vertex front-end reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Regs {
    pub vs: ShaderConfig,
    pub vs_outputs: OutputMapping,
}

const _: () = assert!(MAX_OUTPUT_ATTRIBUTES <= NUM_OUTPUT_REGISTERS);
