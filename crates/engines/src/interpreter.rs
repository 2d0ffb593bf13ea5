use crate::alu::{self, AluOp};
use pica_shader_core::{
    EngineKind, Float24, Instruction, NUM_TEMPORARY_REGISTERS, ShaderEngine, ShaderSetup, SourceRegister,
    DestRegister, UnitState, Vec4,
};

/// Runs programs by decoding every instruction on every invocation.
///
/// Holds no state between invocations, so a single instance can serve any number of setups.
#[derive(Debug, Default)]
pub struct InterpreterEngine;

impl InterpreterEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ShaderEngine for InterpreterEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Interpreter
    }

    fn setup_batch(&mut self, setup: &mut ShaderSetup, entry_point: u32) {
        assert!(
            entry_point as usize <= setup.program.len(),
            "entry point {entry_point} is outside of a {} instruction program",
            setup.program.len()
        );

        setup.engine_data.entry_point = entry_point;
        setup.engine_data.cached_program = None;
    }

    fn run(&self, setup: &ShaderSetup, state: &mut UnitState) {
        let mut temporaries = [Vec4::<Float24>::ZERO; NUM_TEMPORARY_REGISTERS];
        let entry_point = setup.engine_data.entry_point as usize;

        for instruction in &setup.program.code()[entry_point..] {
            if let Instruction::End = instruction {
                break;
            }

            let Some((op, dest, sources)) = alu::decode(instruction) else {
                continue;
            };

            let [a, b, c] = sources.map(|source| match source {
                Some(source) => {
                    let register = match source.register {
                        SourceRegister::Input(i) => state.registers.input[i as usize],
                        SourceRegister::Temporary(i) => temporaries[i as usize],
                        SourceRegister::Uniform(i) => setup.uniforms.f[i as usize],
                    };
                    alu::swizzle(&source, register)
                }
                None => Vec4::ZERO,
            });

            let result = AluOp::evaluate(op, a, b, c);
            let register = match dest.register {
                DestRegister::Output(i) => &mut state.registers.output[i as usize],
                DestRegister::Temporary(i) => &mut temporaries[i as usize],
            };
            alu::write_masked(&dest, register, result);
        }
    }
}
