use super::IrProgram;
use crate::alu::AluOp;
use bumpalo::{Bump, collections::Vec};
use pica_shader_core::{DestRegister, Source, SourceRegister, WriteMask};
use std::collections::HashMap;

/// A pre-decoded op working on a flat register file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JitOp {
    pub op: AluOp,
    pub dest: u8,
    pub mask: WriteMask,
    pub sources: [Operand; 3],
}

/// A source slot with its swizzle already resolved to lane indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Operand {
    pub slot: u8,
    pub lanes: [u8; 4],
    pub identity: bool,
    pub negate: bool,
}

impl Operand {
    /// Placeholder for operands an op does not read.
    pub const UNUSED: Self = Self {
        slot: 0,
        lanes: [0, 1, 2, 3],
        identity: true,
        negate: false,
    };
}

#[derive(Debug)]
pub struct LoweredProgram<'a> {
    pub ops: Vec<'a, JitOp>,
    /// `(register, slot)` pairs copied into the flat file before execution
    pub inputs: Vec<'a, (u8, u8)>,
    pub uniforms: Vec<'a, (u8, u8)>,
    /// `(register, slot)` pairs of every output the program writes.
    /// Loaded before execution so masked lanes keep their value, stored back afterwards.
    pub outputs: Vec<'a, (u8, u8)>,
    pub slot_count: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Register {
    Input(u8),
    Temporary(u8),
    Uniform(u8),
    Output(u8),
}

/// slot assignment and lowering to flat ops
pub fn lower_to_ops<'a>(program: &IrProgram<'a>, arena: &'a Bump) -> LoweredProgram<'a> {
    let mut lowered = LoweredProgram {
        ops: Vec::with_capacity_in(program.ops.len(), arena),
        inputs: Vec::new_in(arena),
        uniforms: Vec::new_in(arena),
        outputs: Vec::new_in(arena),
        slot_count: 0,
    };

    // registers are numbered in order of first use, temporaries start out zero in the flat file
    let mut slots = HashMap::new();
    let mut slot_for = |register: Register, lowered: &mut LoweredProgram<'a>| -> u8 {
        *slots.entry(register).or_insert_with(|| {
            let slot = lowered.slot_count as u8;
            lowered.slot_count += 1;

            match register {
                Register::Input(index) => lowered.inputs.push((index, slot)),
                Register::Uniform(index) => lowered.uniforms.push((index, slot)),
                Register::Output(index) => lowered.outputs.push((index, slot)),
                Register::Temporary(_) => {}
            }

            slot
        })
    };

    for op in program.ops.iter() {
        let mut sources = [Operand::UNUSED; 3];
        for (operand, source) in sources.iter_mut().zip(op.sources.iter()) {
            if let Some(source) = source {
                let slot = slot_for(source_register(source), &mut lowered);
                *operand = Operand {
                    slot,
                    lanes: source.swizzle.lanes().map(|lane| lane as u8),
                    identity: source.swizzle.is_identity(),
                    negate: source.negate,
                };
            }
        }

        let dest = match op.dest.register {
            DestRegister::Output(index) => Register::Output(index),
            DestRegister::Temporary(index) => Register::Temporary(index),
        };

        let dest = slot_for(dest, &mut lowered);
        lowered.ops.push(JitOp {
            op: op.op,
            dest,
            mask: op.dest.mask,
            sources,
        });
    }

    lowered
}

fn source_register(source: &Source) -> Register {
    match source.register {
        SourceRegister::Input(index) => Register::Input(index),
        SourceRegister::Temporary(index) => Register::Temporary(index),
        SourceRegister::Uniform(index) => Register::Uniform(index),
    }
}
