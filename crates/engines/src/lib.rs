//! Shader engines: a reference interpreter and a compiling engine that must produce
//! bit-identical results.

mod alu;
mod interpreter;
pub mod jit;
pub mod simd;

pub use interpreter::InterpreterEngine;
pub use jit::JitEngine;
