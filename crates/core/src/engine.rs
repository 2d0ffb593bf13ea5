use crate::{ShaderSetup, UnitState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EngineKind {
    Interpreter,
    Jit,
}

/// A backend that runs shader programs against a register file.
///
/// `setup_batch` is called once before a batch of invocations sharing the same setup and entry
/// point, `run` once per invocation. Both engines must leave bit-identical outputs for the same
/// program and inputs. Temporaries are engine-local and start zeroed on every run.
pub trait ShaderEngine: Send {
    fn kind(&self) -> EngineKind;

    /// Prepare `setup` for running from `entry_point`.
    ///
    /// Panics if `entry_point` is past the end of the program.
    fn setup_batch(&mut self, setup: &mut ShaderSetup, entry_point: u32);

    /// Run the prepared program. The input registers of `state` must be loaded, the results are
    /// left in its output registers. Output registers the program doesn't write keep their values.
    fn run(&self, setup: &ShaderSetup, state: &mut UnitState);
}
