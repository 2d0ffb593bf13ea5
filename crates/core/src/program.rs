use crate::{
    Float24, NUM_INPUT_REGISTERS, NUM_OUTPUT_REGISTERS, Vec4,
    error::ProgramError,
};
use std::hash::{DefaultHasher, Hash, Hasher};

pub const MAX_PROGRAM_CODE_LENGTH: usize = 4096;
pub const NUM_TEMPORARY_REGISTERS: usize = 16;
pub const NUM_FLOAT_UNIFORMS: usize = 96;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceRegister {
    Input(u8),
    Temporary(u8),
    Uniform(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DestRegister {
    Output(u8),
    Temporary(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Component {
    X = 0,
    Y = 1,
    Z = 2,
    W = 3,
}

/// Source component selector. Lane `i` of the operand reads component `self.0[i]` of the register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Swizzle(pub [Component; 4]);

impl Swizzle {
    pub const IDENTITY: Self = Self([Component::X, Component::Y, Component::Z, Component::W]);

    pub const fn broadcast(component: Component) -> Self {
        Self([component; 4])
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn lanes(&self) -> [usize; 4] {
        self.0.map(|c| c as usize)
    }
}

/// Destination components an instruction writes. Only the low 4 bits are used, bit 0 is `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WriteMask(u8);

impl WriteMask {
    pub const X: Self = Self(0b0001);
    pub const Y: Self = Self(0b0010);
    pub const Z: Self = Self(0b0100);
    pub const W: Self = Self(0b1000);
    pub const XYZW: Self = Self(0b1111);

    pub const fn new(bits: u8) -> Self {
        Self(bits & 0xf)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, lane: usize) -> bool {
        self.0 & (1 << lane) != 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Source {
    pub register: SourceRegister,
    pub swizzle: Swizzle,
    pub negate: bool,
}

impl Source {
    pub const fn new(register: SourceRegister) -> Self {
        Self {
            register,
            swizzle: Swizzle::IDENTITY,
            negate: false,
        }
    }

    pub const fn input(index: u8) -> Self {
        Self::new(SourceRegister::Input(index))
    }

    pub const fn temp(index: u8) -> Self {
        Self::new(SourceRegister::Temporary(index))
    }

    pub const fn uniform(index: u8) -> Self {
        Self::new(SourceRegister::Uniform(index))
    }

    pub const fn swizzle(self, swizzle: Swizzle) -> Self {
        Self { swizzle, ..self }
    }

    pub const fn negate(self) -> Self {
        Self {
            negate: !self.negate,
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dest {
    pub register: DestRegister,
    pub mask: WriteMask,
}

impl Dest {
    pub const fn output(index: u8) -> Self {
        Self {
            register: DestRegister::Output(index),
            mask: WriteMask::XYZW,
        }
    }

    pub const fn temp(index: u8) -> Self {
        Self {
            register: DestRegister::Temporary(index),
            mask: WriteMask::XYZW,
        }
    }

    pub const fn mask(self, mask: WriteMask) -> Self {
        Self { mask, ..self }
    }
}

/// A shader instruction.
///
/// `Dp3` and `Dp4` write their scalar result to every masked lane, `Rcp` and `Rsq` read the
/// first lane of their (swizzled) source and do the same.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    Add(Dest, Source, Source),
    Mul(Dest, Source, Source),
    Min(Dest, Source, Source),
    Max(Dest, Source, Source),
    Dp3(Dest, Source, Source),
    Dp4(Dest, Source, Source),
    Mad(Dest, Source, Source, Source),
    Rcp(Dest, Source),
    Rsq(Dest, Source),
    Flr(Dest, Source),
    Mov(Dest, Source),
    Nop,
    End,
}

impl Instruction {
    pub fn dest(&self) -> Option<&Dest> {
        use Instruction::*;
        match self {
            Add(d, ..) | Mul(d, ..) | Min(d, ..) | Max(d, ..) | Dp3(d, ..) | Dp4(d, ..) | Mad(d, ..) => Some(d),
            Rcp(d, _) | Rsq(d, _) | Flr(d, _) | Mov(d, _) => Some(d),
            Nop | End => None,
        }
    }

    pub fn sources(&self) -> impl Iterator<Item = &Source> {
        use Instruction::*;
        let sources = match self {
            Add(_, a, b) | Mul(_, a, b) | Min(_, a, b) | Max(_, a, b) | Dp3(_, a, b) | Dp4(_, a, b) => {
                [Some(a), Some(b), None]
            }
            Mad(_, a, b, c) => [Some(a), Some(b), Some(c)],
            Rcp(_, a) | Rsq(_, a) | Flr(_, a) | Mov(_, a) => [Some(a), None, None],
            Nop | End => [None; 3],
        };

        sources.into_iter().flatten()
    }
}

/// A validated shader program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderProgram {
    code: Vec<Instruction>,
    hash: u64,
}

impl ShaderProgram {
    pub fn new(code: Vec<Instruction>) -> Result<Self, ProgramError> {
        if code.len() > MAX_PROGRAM_CODE_LENGTH {
            return Err(ProgramError::TooLong {
                len: code.len(),
                max: MAX_PROGRAM_CODE_LENGTH,
            });
        }

        for (offset, instruction) in code.iter().enumerate() {
            let sources = instruction.sources().map(|source| match source.register {
                SourceRegister::Input(i) => ("input", i, NUM_INPUT_REGISTERS),
                SourceRegister::Temporary(i) => ("temporary", i, NUM_TEMPORARY_REGISTERS),
                SourceRegister::Uniform(i) => ("uniform", i, NUM_FLOAT_UNIFORMS),
            });
            let dest = instruction.dest().map(|dest| match dest.register {
                DestRegister::Output(i) => ("output", i, NUM_OUTPUT_REGISTERS),
                DestRegister::Temporary(i) => ("temporary", i, NUM_TEMPORARY_REGISTERS),
            });

            for (kind, index, count) in sources.chain(dest) {
                if index as usize >= count {
                    return Err(ProgramError::RegisterOutOfRange {
                        offset,
                        kind,
                        index,
                        count,
                    });
                }
            }
        }

        let mut hasher = DefaultHasher::new();
        code.hash(&mut hasher);

        Ok(Self {
            hash: hasher.finish(),
            code,
        })
    }

    pub fn code(&self) -> &[Instruction] {
        &self.code
    }

    /// Hash of the instruction list. Uniform values are not part of it.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Uniforms {
    pub f: [Vec4<Float24>; NUM_FLOAT_UNIFORMS],
}

impl Default for Uniforms {
    fn default() -> Self {
        Self {
            f: [Vec4::ZERO; NUM_FLOAT_UNIFORMS],
        }
    }
}

/// Per-setup state owned by whichever engine last prepared the setup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineData {
    pub entry_point: u32,
    /// Engine specific handle of the prepared program.
    pub cached_program: Option<u64>,
}

/// Everything a shader unit needs to run a program: code, uniforms and engine state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderSetup {
    pub program: ShaderProgram,
    pub uniforms: Uniforms,
    pub engine_data: EngineData,
}

impl ShaderSetup {
    pub fn new(program: ShaderProgram) -> Self {
        Self {
            program,
            uniforms: Uniforms::default(),
            engine_data: EngineData::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range_registers() {
        let result = ShaderProgram::new(vec![
            Instruction::Mov(Dest::output(0), Source::input(0)),
            Instruction::Add(Dest::temp(1), Source::uniform(96), Source::temp(0)),
        ]);

        assert_eq!(
            result,
            Err(ProgramError::RegisterOutOfRange {
                offset: 1,
                kind: "uniform",
                index: 96,
                count: 96,
            })
        );

        assert!(ShaderProgram::new(vec![Instruction::Mov(Dest::output(16), Source::input(0))]).is_err());
    }

    #[test]
    fn test_rejects_long_programs() {
        let code = vec![Instruction::Nop; MAX_PROGRAM_CODE_LENGTH + 1];
        assert!(matches!(ShaderProgram::new(code), Err(ProgramError::TooLong { .. })));
    }

    #[test]
    fn test_hash_follows_code() {
        let a = ShaderProgram::new(vec![Instruction::Mov(Dest::output(0), Source::input(0))]).unwrap();
        let b = ShaderProgram::new(vec![Instruction::Mov(Dest::output(0), Source::input(0))]).unwrap();
        let c = ShaderProgram::new(vec![Instruction::Mov(Dest::output(0), Source::input(1))]).unwrap();

        assert_eq!(a.hash(), b.hash());
        assert_ne!(a.hash(), c.hash());
    }

    #[test]
    fn test_swizzle_and_mask() {
        let source = Source::input(0).swizzle(Swizzle::broadcast(Component::W)).negate();
        assert_eq!(source.swizzle.lanes(), [3, 3, 3, 3]);
        assert!(source.negate);
        assert!(!source.swizzle.is_identity());

        let mask = WriteMask::new(0xf5);
        assert_eq!(mask.bits(), 0b0101);
        assert!(mask.contains(0) && mask.contains(2) && !mask.contains(1));
    }
}
