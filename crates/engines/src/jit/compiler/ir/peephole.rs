use super::{IrOp, IrProgram};
use crate::alu::AluOp;
use bumpalo::{Bump, collections::Vec};
use pica_shader_core::{DestRegister, NUM_TEMPORARY_REGISTERS, Source, SourceRegister};

/// drop ops whose result can never be observed:
/// - empty write masks
/// - moves of a temporary onto itself
/// - writes to temporary lanes that are overwritten or never read afterwards
pub fn optimize_peephole<'a>(program: &IrProgram<'a>, arena: &'a Bump) -> IrProgram<'a> {
    // live lanes of every temporary, walking the program backwards
    let mut live = [0u8; NUM_TEMPORARY_REGISTERS];
    let mut ops = Vec::with_capacity_in(program.ops.len(), arena);

    for op in program.ops.iter().rev() {
        if is_nop(op) {
            continue;
        }

        let written = op.dest.mask.bits();
        if let DestRegister::Temporary(index) = op.dest.register {
            let live = &mut live[index as usize];
            if *live & written == 0 {
                continue;
            }

            *live &= !written;
        }

        let read = op.op.lanes_read(written);
        for source in op.sources.iter().flatten() {
            if let SourceRegister::Temporary(index) = source.register {
                live[index as usize] |= swizzled_lanes(source, read);
            }
        }

        ops.push(*op);
    }

    ops.reverse();
    IrProgram { ops }
}

fn is_nop(op: &IrOp) -> bool {
    if op.dest.mask.is_empty() {
        return true;
    }

    match (op.op, op.dest.register, op.sources[0]) {
        (AluOp::Mov, DestRegister::Temporary(dest), Some(source)) => {
            source.register == SourceRegister::Temporary(dest) && source.swizzle.is_identity() && !source.negate
        }
        _ => false,
    }
}

/// register components read through the swizzle of `source` when `lanes` of it are used
fn swizzled_lanes(source: &Source, lanes: u8) -> u8 {
    source
        .swizzle
        .lanes()
        .iter()
        .enumerate()
        .filter(|(lane, _)| lanes & (1 << lane) != 0)
        .fold(0, |mask, (_, component)| mask | (1 << component))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pica_shader_core::{Component, Dest, Instruction, ShaderProgram, Swizzle, WriteMask};

    fn optimize(code: std::vec::Vec<Instruction>) -> std::vec::Vec<IrOp> {
        let arena = Bump::new();
        let program = ShaderProgram::new(code).unwrap();
        let ir = IrProgram::build(&arena, &program, 0);
        ir.optimize_peephole(&arena).ops.to_vec()
    }

    #[test]
    fn test_drops_empty_masks_and_self_moves() {
        let ops = optimize(vec![
            Instruction::Mov(Dest::output(0).mask(WriteMask::new(0)), Source::input(0)),
            Instruction::Mov(Dest::temp(2), Source::temp(2)),
            Instruction::Mov(Dest::output(1), Source::input(1)),
        ]);

        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].dest, Dest::output(1));
    }

    #[test]
    fn test_keeps_swizzled_self_moves() {
        let swizzled = Source::temp(2).swizzle(Swizzle::broadcast(Component::X));
        let ops = optimize(vec![
            Instruction::Mov(Dest::temp(2), Source::input(0)),
            Instruction::Mov(Dest::temp(2), swizzled),
            Instruction::Mov(Dest::output(0), Source::temp(2)),
        ]);

        assert_eq!(ops.len(), 3);
    }

    #[test]
    fn test_drops_dead_temporary_writes() {
        let ops = optimize(vec![
            // overwritten before being read
            Instruction::Mov(Dest::temp(0), Source::input(0)),
            Instruction::Mov(Dest::temp(0), Source::input(1)),
            // never read
            Instruction::Add(Dest::temp(1), Source::input(0), Source::input(1)),
            Instruction::Mov(Dest::output(0), Source::temp(0)),
        ]);

        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].sources[0], Some(Source::input(1)));
    }

    #[test]
    fn test_tracks_lanes_through_swizzles() {
        let ops = optimize(vec![
            Instruction::Mov(Dest::temp(0).mask(WriteMask::W), Source::input(0)),
            Instruction::Mov(Dest::temp(0).mask(WriteMask::X), Source::input(1)),
            Instruction::Mov(
                Dest::output(0).mask(WriteMask::X),
                Source::temp(0).swizzle(Swizzle::broadcast(Component::W)),
            ),
        ]);

        // only the `w` write is read back
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].dest.mask, WriteMask::W);
    }

    #[test]
    fn test_dot_product_reads_three_lanes() {
        let ops = optimize(vec![
            Instruction::Mov(Dest::temp(0).mask(WriteMask::Z), Source::input(0)),
            Instruction::Dp3(Dest::output(0).mask(WriteMask::X), Source::temp(0), Source::input(1)),
        ]);

        assert_eq!(ops.len(), 2);
    }
}
