use crate::EngineSelector;
use pica_shader_core::{AttributeBuffer, OutputVertex, Regs, ShaderEngine, ShaderSetup, UnitState};

/// Shade a batch of vertices.
///
/// The engine is selected and prepared once for the whole batch, so a [`crate::JitFlag`] change
/// made while this runs applies to the next batch.
pub fn process_vertices(
    selector: &mut EngineSelector,
    regs: &Regs,
    setup: &mut ShaderSetup,
    entry_point: u32,
    inputs: &[AttributeBuffer],
) -> Vec<OutputVertex> {
    let mut engine = selector.select();
    engine.setup_batch(setup, entry_point);

    tracing::trace!(
        engine = ?engine.kind(),
        instance = ?engine.id(),
        vertices = inputs.len(),
        "shading vertex batch"
    );

    inputs
        .iter()
        .map(|input| shade_vertex(&*engine, regs, setup, input))
        .collect()
}

pub fn process_vertex(
    selector: &mut EngineSelector,
    regs: &Regs,
    setup: &mut ShaderSetup,
    entry_point: u32,
    input: &AttributeBuffer,
) -> OutputVertex {
    let mut engine = selector.select();
    engine.setup_batch(setup, entry_point);
    shade_vertex(&*engine, regs, setup, input)
}

fn shade_vertex(engine: &dyn ShaderEngine, regs: &Regs, setup: &ShaderSetup, input: &AttributeBuffer) -> OutputVertex {
    let mut state = UnitState::new();
    state.load_input(&regs.vs, input);
    engine.run(setup, &mut state);

    let mut output = AttributeBuffer::new();
    state.write_output(&regs.vs, &mut output);
    OutputVertex::from_attribute_buffer(&regs.vs_outputs, &output)
}
