use pica_shader::{
    AttributeBuffer, Component, Dest, EngineError, EngineKind, EngineSelector, InputRegisterMap, Instruction,
    JitFlag, OutputMapping, OutputRegisterMap, OutputVertex, Regs, Semantic, SelectorState, ShaderConfig,
    ShaderEngine, ShaderProgram, ShaderSetup, Source, Swizzle, UnitState, Vec4, WriteMask, process_vertices,
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Copies input registers to the output registers with the same index.
struct PassThrough;

impl ShaderEngine for PassThrough {
    fn kind(&self) -> EngineKind {
        EngineKind::Jit
    }

    fn setup_batch(&mut self, setup: &mut ShaderSetup, entry_point: u32) {
        setup.engine_data.entry_point = entry_point;
    }

    fn run(&self, _: &ShaderSetup, state: &mut UnitState) {
        state.registers.output = state.registers.input;
    }
}

fn pass_through_selector(flag: &JitFlag, built: Arc<AtomicUsize>) -> EngineSelector {
    EngineSelector::with_native_factory(
        flag.clone(),
        Box::new(move || {
            built.fetch_add(1, Ordering::Relaxed);
            Ok(Box::new(PassThrough) as Box<dyn ShaderEngine>)
        }),
    )
}

fn position_color_regs(output_mask: u16) -> Regs {
    use Semantic::*;
    Regs {
        vs: ShaderConfig::new(1, InputRegisterMap::IDENTITY, output_mask).unwrap(),
        vs_outputs: OutputMapping::new(&[
            OutputRegisterMap::new([Some(PositionX), Some(PositionY), Some(PositionZ), Some(PositionW)]),
            OutputRegisterMap::new([Some(ColorR), Some(ColorG), Some(ColorB), Some(ColorA)]),
        ])
        .unwrap(),
    }
}

/// Shade `inputs` with the interpreter and, when the target supports it, with the compiling engine.
/// Both must agree bit for bit.
fn run_both(regs: &Regs, setup: &ShaderSetup, inputs: &[AttributeBuffer]) -> Vec<OutputVertex> {
    let flag = JitFlag::new(false);
    let mut selector = EngineSelector::new(flag.clone());

    let interpreted = process_vertices(&mut selector, regs, &mut setup.clone(), 0, inputs);
    assert_eq!(selector.state(), SelectorState::InterpreterActive);

    flag.set(true);
    let compiled = process_vertices(&mut selector, regs, &mut setup.clone(), 0, inputs);
    if pica_shader::jit::is_supported() {
        assert_eq!(selector.state(), SelectorState::NativeActive);
    }

    assert_eq!(interpreted, compiled);
    interpreted
}

/// the whole path with an engine that doesn't compute anything
/// - attribute buffer to input registers and back is lossless
/// - packed outputs land in the semantics they are mapped to
#[test]
fn pass_through_round_trip() {
    let flag = JitFlag::new(true);
    let mut selector = pass_through_selector(&flag, Arc::default());

    let mut setup = ShaderSetup::new(ShaderProgram::new(vec![Instruction::End]).unwrap());
    let input = AttributeBuffer::from_f32(&[[1.0, -2.0, 3.5, 1.0], [0.25, 0.5, 0.75, 1.0]]);
    let vertices = process_vertices(&mut selector, &position_color_regs(0b11), &mut setup, 0, &[input]);

    assert_eq!(vertices[0].pos, input[0]);
    assert_eq!(vertices[0].color, input[1]);
    assert_eq!(vertices[0].tc0.u.to_raw(), 0);
}

/// a model-view-projection style transform
/// - both engines agree
/// - color is saturated after the program ran
#[test]
fn transform_and_color() {
    let mut code = Vec::new();
    for row in 0..4 {
        code.push(Instruction::Dp4(
            Dest::output(0).mask(WriteMask::new(1 << row)),
            Source::uniform(row),
            Source::input(0),
        ));
    }
    code.push(Instruction::Mad(
        Dest::output(1),
        Source::input(1),
        Source::uniform(4).swizzle(Swizzle::broadcast(Component::X)),
        Source::uniform(5),
    ));
    code.push(Instruction::End);

    let mut setup = ShaderSetup::new(ShaderProgram::new(code).unwrap());
    let uniforms = [
        [2.0, 0.0, 0.0, 0.0],
        [0.0, 2.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, -1.0],
        [0.0, 0.0, 0.0, 1.0],
        [4.0, 0.0, 0.0, 0.0],
        [-0.5, -0.5, -0.5, 0.0],
    ];
    for (uniform, value) in setup.uniforms.f.iter_mut().zip(uniforms) {
        *uniform = Vec4::from_f32(value);
    }

    let inputs = [
        AttributeBuffer::from_f32(&[[1.0, 2.0, 3.0, 1.0], [0.25, 0.0, -1.0, 0.5]]),
        AttributeBuffer::from_f32(&[[-1.0, 0.5, 0.0, 1.0], [1.0, 1.0, 1.0, 1.0]]),
    ];

    let vertices = run_both(&position_color_regs(0b11), &setup, &inputs);

    assert_eq!(vertices[0].pos.to_f32(), [2.0, 4.0, 2.0, 1.0]);
    // 4 * c - 0.5, then |x| clamped to 1
    assert_eq!(vertices[0].color.to_f32(), [0.5, 0.5, 1.0, 1.0]);
    assert_eq!(vertices[1].pos.to_f32(), [-2.0, 1.0, -1.0, 1.0]);
    assert_eq!(vertices[1].color.to_f32(), [1.0, 1.0, 1.0, 1.0]);
}

/// temporaries start at zero for every vertex, in both engines
#[test]
fn temporaries_do_not_leak_between_vertices() {
    let setup = ShaderSetup::new(
        ShaderProgram::new(vec![
            Instruction::Add(Dest::temp(0), Source::temp(0), Source::input(0)),
            Instruction::Mov(Dest::output(0), Source::temp(0)),
            Instruction::Mov(Dest::output(1), Source::input(1)),
            Instruction::End,
        ])
        .unwrap(),
    );

    let input = AttributeBuffer::from_f32(&[[1.0, 1.0, 1.0, 1.0], [0.0; 4]]);
    let vertices = run_both(&position_color_regs(0b11), &setup, &[input, input, input]);

    for vertex in vertices {
        assert_eq!(vertex.pos.to_f32(), [1.0; 4]);
    }
}

/// the flag is read once per batch, a flip only affects the next one
#[test]
fn flag_flip_applies_to_next_batch() {
    let flag = JitFlag::new(false);
    let built = Arc::new(AtomicUsize::new(0));
    let mut selector = pass_through_selector(&flag, built.clone());

    let regs = position_color_regs(0b11);
    let mut setup = ShaderSetup::new(
        ShaderProgram::new(vec![Instruction::Mov(Dest::output(0), Source::uniform(0)), Instruction::End]).unwrap(),
    );
    let input = AttributeBuffer::from_f32(&[[1.0, 2.0, 3.0, 4.0], [0.5; 4]]);

    let interpreted = process_vertices(&mut selector, &regs, &mut setup, 0, &[input]);
    assert_eq!(interpreted[0].pos, Vec4::ZERO);
    assert_eq!(built.load(Ordering::Relaxed), 0);

    flag.set(true);
    let passed = process_vertices(&mut selector, &regs, &mut setup, 0, &[input]);
    assert_eq!(passed[0].pos, input[0]);
    assert_eq!(built.load(Ordering::Relaxed), 1);
}

/// lifecycle of the native engine across shutdowns and flag toggles
/// - identity is stable while the flag stays on
/// - toggling off and on again reuses the same instance
/// - shutdown forces a new instance
#[test]
fn native_engine_lifecycle() {
    let flag = JitFlag::new(true);
    let built = Arc::new(AtomicUsize::new(0));
    let mut selector = pass_through_selector(&flag, built.clone());

    let first = selector.select().id();
    assert_eq!(selector.select().id(), first);

    flag.set(false);
    let interpreter = selector.select().id();
    assert_ne!(interpreter, first);

    flag.set(true);
    assert_eq!(selector.select().id(), first);
    assert_eq!(built.load(Ordering::Relaxed), 1);

    selector.shutdown();
    let second = selector.select().id();
    assert_ne!(second, first);
    assert_ne!(second, interpreter);
    assert_eq!(built.load(Ordering::Relaxed), 2);
}

/// a native engine that can't be built never makes selection fail
#[test]
fn failed_native_construction_uses_interpreter() {
    let flag = JitFlag::new(true);
    let mut selector = EngineSelector::with_native_factory(
        flag,
        Box::new(|| Err(EngineError::Unsupported("test target"))),
    );

    let regs = position_color_regs(0b1);
    let mut setup = ShaderSetup::new(
        ShaderProgram::new(vec![Instruction::Mov(Dest::output(0), Source::input(0).negate())]).unwrap(),
    );
    let input = AttributeBuffer::from_f32(&[[1.0, 2.0, 3.0, 4.0]]);

    let vertices = process_vertices(&mut selector, &regs, &mut setup, 0, &[input]);
    assert_eq!(selector.state(), SelectorState::InterpreterActive);
    assert_eq!(vertices[0].pos.to_f32(), [-1.0, -2.0, -3.0, -4.0]);
}

/// vertex assembly emits trace events without disturbing results
#[test]
fn trace_logging() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let flag = JitFlag::new(true);
        let mut selector = pass_through_selector(&flag, Arc::default());
        let input = AttributeBuffer::from_f32(&[[1.0, 2.0, 3.0, 4.0], [2.0, -2.0, 0.5, 0.0]]);
        let vertices = process_vertices(
            &mut selector,
            &position_color_regs(0b11),
            &mut ShaderSetup::new(ShaderProgram::new(vec![]).unwrap()),
            0,
            &[input],
        );

        assert_eq!(vertices[0].color.to_f32(), [1.0, 1.0, 0.5, 0.0]);
        selector.shutdown();
    });
}
