use bumpalo::Bump;
use pica_shader_core::{
    Float24, NUM_FLOAT_UNIFORMS, NUM_INPUT_REGISTERS, NUM_OUTPUT_REGISTERS, NUM_TEMPORARY_REGISTERS,
    ShaderProgram, ShaderSetup, UnitState, Uniforms, Vec4,
};

mod ir;

pub use ir::{JitOp, Operand};

/// Upper bound of flat slots a program can use, one per addressable register.
pub const MAX_SLOTS: usize =
    NUM_INPUT_REGISTERS + NUM_TEMPORARY_REGISTERS + NUM_FLOAT_UNIFORMS + NUM_OUTPUT_REGISTERS;

/// A program specialized for one entry point.
///
/// Decoding, dead code and register lookup are resolved once at compile time; execution only moves
/// values between a flat slot file and the unit registers and evaluates the remaining ops.
#[derive(Debug)]
pub struct CompiledProgram {
    hash: u64,
    entry_point: u32,
    ops: Vec<JitOp>,
    inputs: Vec<(u8, u8)>,
    uniforms: Vec<(u8, u8)>,
    outputs: Vec<(u8, u8)>,
    slot_count: usize,
}

impl CompiledProgram {
    /// Compile `program` from `entry_point`. Temporary data lives in `arena`, which the caller may
    /// reset once this returns.
    pub fn compile(arena: &Bump, program: &ShaderProgram, entry_point: u32) -> Self {
        let program_ir = ir::IrProgram::build(arena, program, entry_point);
        let program_ir = program_ir.optimize_peephole(arena);
        let lowered = program_ir.lower_to_ops(arena);

        assert!(lowered.slot_count <= MAX_SLOTS, "too many slots used");

        Self {
            hash: program.hash(),
            entry_point,
            ops: lowered.ops.to_vec(),
            inputs: lowered.inputs.to_vec(),
            uniforms: lowered.uniforms.to_vec(),
            outputs: lowered.outputs.to_vec(),
            slot_count: lowered.slot_count,
        }
    }

    pub fn ops(&self) -> &[JitOp] {
        &self.ops
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn matches(&self, setup: &ShaderSetup) -> bool {
        self.hash == setup.program.hash() && self.entry_point == setup.engine_data.entry_point
    }

    #[inline(always)]
    pub fn execute(&self, uniforms: &Uniforms, state: &mut UnitState) {
        let mut file = [Vec4::<Float24>::ZERO; MAX_SLOTS];

        for &(register, slot) in self.inputs.iter() {
            file[slot as usize] = state.registers.input[register as usize];
        }
        for &(register, slot) in self.uniforms.iter() {
            file[slot as usize] = uniforms.f[register as usize];
        }
        for &(register, slot) in self.outputs.iter() {
            file[slot as usize] = state.registers.output[register as usize];
        }

        for op in self.ops.iter() {
            let [a, b, c] = op.sources.map(|operand| fetch(&file, operand));
            let result = op.op.evaluate(a, b, c);

            let target = &mut file[op.dest as usize];
            if op.mask.bits() == 0b1111 {
                *target = result;
            } else {
                for lane in 0..4 {
                    if op.mask.contains(lane) {
                        target[lane] = result[lane];
                    }
                }
            }
        }

        for &(register, slot) in self.outputs.iter() {
            state.registers.output[register as usize] = file[slot as usize];
        }
    }
}

#[inline(always)]
fn fetch(file: &[Vec4<Float24>; MAX_SLOTS], operand: Operand) -> Vec4<Float24> {
    let register = file[operand.slot as usize];
    let value = if operand.identity {
        register
    } else {
        let [x, y, z, w] = operand.lanes;
        Vec4::new(
            register[x as usize],
            register[y as usize],
            register[z as usize],
            register[w as usize],
        )
    };

    if operand.negate { value.map(|c| -c) } else { value }
}
