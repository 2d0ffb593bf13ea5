//! Vertex shader front-end: moves attribute data in and out of the shader unit register file,
//! assembles output vertices, and dispatches program execution to the interpreter or the
//! compiling engine depending on a runtime flag.

mod pipeline;
mod selector;

pub use pica_shader_core::*;
pub use pica_shader_engines::{InterpreterEngine, JitEngine, jit};
pub use pipeline::{process_vertex, process_vertices};
pub use selector::{EngineHandle, EngineSelector, InstanceId, JitFlag, NativeFactory, SelectorState};
