//! Engine that compiles each `(program, entry point)` pair once and runs the compiled form.

use crate::simd;
use bumpalo::Bump;
use pica_shader_core::{EngineError, EngineKind, ShaderEngine, ShaderSetup, UnitState};
use slotmap::{DefaultKey, Key, KeyData, SlotMap};
use std::collections::HashMap;

mod compiler;

pub use compiler::{CompiledProgram, JitOp, MAX_SLOTS, Operand};
pub use crate::simd::is_supported;

/// Initial size of the compiler scratch arena.
pub const DEFAULT_ARENA_CAPACITY: usize = 256 * 1024;

pub struct JitEngine {
    programs: SlotMap<DefaultKey, CompiledProgram>,
    cache: HashMap<(u64, u32), DefaultKey>,
    arena: Bump,
}

impl JitEngine {
    pub fn new() -> Result<Self, EngineError> {
        Self::with_arena_capacity(DEFAULT_ARENA_CAPACITY)
    }

    pub fn with_arena_capacity(capacity: usize) -> Result<Self, EngineError> {
        if !simd::is_supported() {
            return Err(EngineError::Unsupported(
                "compiled programs need sse4.2 on x86_64 or neon on aarch64",
            ));
        }

        let arena =
            Bump::try_with_capacity(capacity).map_err(|_| EngineError::OutOfMemory { requested: capacity })?;

        Ok(Self {
            programs: SlotMap::new(),
            cache: HashMap::new(),
            arena,
        })
    }

    /// Number of distinct `(program, entry point)` pairs compiled so far.
    pub fn cached_programs(&self) -> usize {
        self.programs.len()
    }
}

impl ShaderEngine for JitEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Jit
    }

    fn setup_batch(&mut self, setup: &mut ShaderSetup, entry_point: u32) {
        assert!(
            entry_point as usize <= setup.program.len(),
            "entry point {entry_point} is outside of a {} instruction program",
            setup.program.len()
        );

        let hash = setup.program.hash();
        let key = match self.cache.get(&(hash, entry_point)) {
            Some(&key) => {
                tracing::debug!(hash, entry_point, "compiled program cache hit");
                key
            }
            None => {
                let compiled = CompiledProgram::compile(&self.arena, &setup.program, entry_point);
                self.arena.reset();

                tracing::debug!(
                    hash,
                    entry_point,
                    ops = compiled.ops().len(),
                    slots = compiled.slot_count(),
                    "compiled shader program"
                );

                let key = self.programs.insert(compiled);
                self.cache.insert((hash, entry_point), key);
                key
            }
        };

        setup.engine_data.entry_point = entry_point;
        setup.engine_data.cached_program = Some(key.data().as_ffi());
    }

    fn run(&self, setup: &ShaderSetup, state: &mut UnitState) {
        let program = setup
            .engine_data
            .cached_program
            .and_then(|id| self.programs.get(KeyData::from_ffi(id).into()))
            .filter(|program| program.matches(setup))
            .expect("shader setup was not prepared by this engine");

        simd::dispatch(|| program.execute(&setup.uniforms, state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pica_shader_core::{Dest, Instruction, ShaderProgram, Source, Vec4};

    fn engine() -> Option<JitEngine> {
        match JitEngine::new() {
            Ok(engine) => Some(engine),
            Err(EngineError::Unsupported(_)) => None,
            Err(err) => panic!("failed to create engine: {err}"),
        }
    }

    fn setup() -> ShaderSetup {
        ShaderSetup::new(
            ShaderProgram::new(vec![
                Instruction::Add(Dest::output(0), Source::input(0), Source::uniform(0)),
                Instruction::End,
                Instruction::Mov(Dest::output(0), Source::input(0)),
                Instruction::End,
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_reuses_compiled_programs() {
        let Some(mut engine) = engine() else { return };

        let mut a = setup();
        let mut b = setup();

        engine.setup_batch(&mut a, 0);
        engine.setup_batch(&mut b, 0);
        assert_eq!(engine.cached_programs(), 1);
        assert_eq!(a.engine_data.cached_program, b.engine_data.cached_program);

        engine.setup_batch(&mut b, 2);
        assert_eq!(engine.cached_programs(), 2);
        assert_ne!(a.engine_data.cached_program, b.engine_data.cached_program);
    }

    #[test]
    fn test_runs_from_entry_point() {
        let Some(mut engine) = engine() else { return };

        let mut setup = setup();
        setup.uniforms.f[0] = Vec4::from_f32([1.0; 4]);

        let mut state = UnitState::new();
        state.registers.input[0] = Vec4::from_f32([1.0, 2.0, 3.0, 4.0]);

        engine.setup_batch(&mut setup, 0);
        engine.run(&setup, &mut state);
        assert_eq!(state.registers.output[0].to_f32(), [2.0, 3.0, 4.0, 5.0]);

        engine.setup_batch(&mut setup, 2);
        engine.run(&setup, &mut state);
        assert_eq!(state.registers.output[0].to_f32(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    #[should_panic(expected = "not prepared")]
    fn test_rejects_unprepared_setups() {
        let Some(engine) = engine() else {
            panic!("not prepared (unsupported target)");
        };

        let setup = setup();
        engine.run(&setup, &mut UnitState::new());
    }

    #[test]
    fn test_arena_allocation_failure() {
        match JitEngine::with_arena_capacity(usize::MAX) {
            Err(EngineError::OutOfMemory { requested }) => assert_eq!(requested, usize::MAX),
            Err(EngineError::Unsupported(_)) => {}
            Ok(_) => panic!("allocating the whole address space succeeded"),
        }
    }
}
