mod attribute;
mod engine;
pub mod error;
mod float24;
mod math;
mod output_vertex;
mod program;
pub mod regs;
mod unit_state;

pub use attribute::{AttributeBuffer, MAX_ATTRIBUTES};
pub use engine::{EngineKind, ShaderEngine};
pub use error::{EngineError, ProgramError, RegsError};
pub use float24::Float24;
pub use math::{Vec2, Vec3, Vec4};
pub use output_vertex::OutputVertex;
pub use program::*;
pub use regs::{InputRegisterMap, OutputMapping, OutputRegisterMap, Regs, Semantic, ShaderConfig};
pub use unit_state::{NUM_INPUT_REGISTERS, NUM_OUTPUT_REGISTERS, Registers, UnitState};
