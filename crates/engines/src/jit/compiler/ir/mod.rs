use crate::alu::{self, AluOp};
use bumpalo::{Bump, collections::Vec};
use pica_shader_core::{Dest, Instruction, ShaderProgram, Source};

mod lowering;
mod peephole;

pub use lowering::{JitOp, LoweredProgram, Operand};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IrOp {
    pub op: AluOp,
    pub dest: Dest,
    pub sources: [Option<Source>; 3],
}

#[derive(Debug)]
pub struct IrProgram<'a> {
    pub ops: Vec<'a, IrOp>,
}

impl<'a> IrProgram<'a> {
    /// Collect the straight-line ops from `entry_point` up to the first `end`.
    pub fn build(arena: &'a Bump, program: &ShaderProgram, entry_point: u32) -> Self {
        let mut ops = Vec::new_in(arena);

        for instruction in &program.code()[entry_point as usize..] {
            if let Instruction::End = instruction {
                break;
            }

            if let Some((op, dest, sources)) = alu::decode(instruction) {
                ops.push(IrOp { op, dest, sources });
            }
        }

        Self { ops }
    }

    pub fn optimize_peephole(&self, arena: &'a Bump) -> IrProgram<'a> {
        peephole::optimize_peephole(self, arena)
    }

    pub fn lower_to_ops(&self, arena: &'a Bump) -> LoweredProgram<'a> {
        lowering::lower_to_ops(self, arena)
    }
}
