use pica_shader_core::{Dest, Float24, Instruction, Source, Vec4};

/// Arithmetic shared by every engine, so results only depend on the program and never on the
/// engine that runs it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Mul,
    Min,
    Max,
    Dp3,
    Dp4,
    Mad,
    Rcp,
    Rsq,
    Flr,
    Mov,
}

/// Split an instruction into its operation and operands. `Nop` and `End` have none.
pub fn decode(instruction: &Instruction) -> Option<(AluOp, Dest, [Option<Source>; 3])> {
    use Instruction::*;
    Some(match *instruction {
        Add(d, a, b) => (AluOp::Add, d, [Some(a), Some(b), None]),
        Mul(d, a, b) => (AluOp::Mul, d, [Some(a), Some(b), None]),
        Min(d, a, b) => (AluOp::Min, d, [Some(a), Some(b), None]),
        Max(d, a, b) => (AluOp::Max, d, [Some(a), Some(b), None]),
        Dp3(d, a, b) => (AluOp::Dp3, d, [Some(a), Some(b), None]),
        Dp4(d, a, b) => (AluOp::Dp4, d, [Some(a), Some(b), None]),
        Mad(d, a, b, c) => (AluOp::Mad, d, [Some(a), Some(b), Some(c)]),
        Rcp(d, a) => (AluOp::Rcp, d, [Some(a), None, None]),
        Rsq(d, a) => (AluOp::Rsq, d, [Some(a), None, None]),
        Flr(d, a) => (AluOp::Flr, d, [Some(a), None, None]),
        Mov(d, a) => (AluOp::Mov, d, [Some(a), None, None]),
        Nop | End => return None,
    })
}

impl AluOp {
    /// Lanes of the first source a result lane depends on, given the lanes that are written.
    /// Dot products and scalar ops read fixed lanes regardless of the write mask.
    pub fn lanes_read(self, written: u8) -> u8 {
        match self {
            AluOp::Dp3 => 0b0111,
            AluOp::Dp4 => 0b1111,
            AluOp::Rcp | AluOp::Rsq => 0b0001,
            _ => written,
        }
    }

    #[inline(always)]
    pub fn evaluate(
        self,
        a: Vec4<Float24>,
        b: Vec4<Float24>,
        c: Vec4<Float24>,
    ) -> Vec4<Float24> {
        match self {
            AluOp::Add => a.zip(b, |x, y| x + y),
            AluOp::Mul => a.zip(b, |x, y| x * y),
            AluOp::Min => a.zip(b, Float24::min),
            AluOp::Max => a.zip(b, Float24::max),
            AluOp::Dp3 => Vec4::splat(dot3(a, b)),
            AluOp::Dp4 => Vec4::splat(dot3(a, b) + a.w * b.w),
            AluOp::Mad => a.zip(b, |x, y| x * y).zip(c, |x, y| x + y),
            AluOp::Rcp => Vec4::splat(a.x.recip()),
            AluOp::Rsq => Vec4::splat(a.x.rsqrt()),
            AluOp::Flr => a.map(Float24::floor),
            AluOp::Mov => a,
        }
    }
}

#[inline(always)]
fn dot3(a: Vec4<Float24>, b: Vec4<Float24>) -> Float24 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// Read `register` through the swizzle and negate modifier of `source`.
#[inline(always)]
pub fn swizzle(source: &Source, register: Vec4<Float24>) -> Vec4<Float24> {
    let [x, y, z, w] = source.swizzle.lanes();
    let value = Vec4::new(register[x], register[y], register[z], register[w]);
    if source.negate { value.map(|c| -c) } else { value }
}

/// Write the lanes of `value` enabled by the mask of `dest` into `register`.
#[inline(always)]
pub fn write_masked(dest: &Dest, register: &mut Vec4<Float24>, value: Vec4<Float24>) {
    for lane in 0..4 {
        if dest.mask.contains(lane) {
            register[lane] = value[lane];
        }
    }
}
