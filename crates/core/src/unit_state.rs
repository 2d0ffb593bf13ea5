use crate::{AttributeBuffer, Float24, ShaderConfig, Vec4};

pub const NUM_INPUT_REGISTERS: usize = 16;
pub const NUM_OUTPUT_REGISTERS: usize = 16;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub input: [Vec4<Float24>; NUM_INPUT_REGISTERS],
    pub output: [Vec4<Float24>; NUM_OUTPUT_REGISTERS],
}

/// Register file of a shader unit for one invocation.
///
/// Temporaries are not part of it, they belong to the engine running the program.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnitState {
    pub registers: Registers,
}

impl UnitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy attributes `0..=max_input_attribute_index` into the input registers they are mapped to.
    ///
    /// Registers no attribute maps to keep their previous value. When several attributes map to the
    /// same register the highest attribute wins.
    pub fn load_input(&mut self, config: &ShaderConfig, input: &AttributeBuffer) {
        for attr in 0..=config.max_input_attribute_index() {
            let register = config.register_for_attribute(attr);
            self.registers.input[register] = input.attr[attr];
        }
    }

    /// Pack the output registers enabled by the output mask into consecutive slots of `output`,
    /// in ascending register order. Returns the number of slots written.
    pub fn write_output(&self, config: &ShaderConfig, output: &mut AttributeBuffer) -> usize {
        let mut written = 0;
        for (slot, register) in config.output_registers().enumerate() {
            output.attr[slot] = self.registers.output[register];
            written += 1;
        }

        written
    }
}
