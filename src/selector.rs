use pica_shader_core::{EngineError, ShaderEngine};
use pica_shader_engines::{InterpreterEngine, JitEngine, jit};
use std::{
    ops::{Deref, DerefMut},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

/// Shared switch that enables native code execution.
///
/// Clones observe the same value. The selector reads it once per `select` call, so a change takes
/// effect at the next batch.
#[derive(Clone, Debug, Default)]
pub struct JitFlag(Arc<AtomicBool>);

impl JitFlag {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Identity of an engine instance, unique within one selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectorState {
    /// Nothing was selected since construction or the last shutdown.
    Uninitialized,
    InterpreterActive,
    NativeActive,
}

pub type NativeFactory = Box<dyn Fn() -> Result<Box<dyn ShaderEngine>, EngineError> + Send>;

struct EngineSlot {
    id: InstanceId,
    engine: Box<dyn ShaderEngine>,
}

/// Lazily constructs shader engines and hands out the one the [`JitFlag`] asks for.
///
/// The native engine is built at most once and kept until [`EngineSelector::shutdown`], the
/// interpreter is built on first use and kept for the lifetime of the selector.
pub struct EngineSelector {
    flag: JitFlag,
    native_available: bool,
    native_factory: NativeFactory,
    native: Option<EngineSlot>,
    native_failed: bool,
    interpreter: Option<EngineSlot>,
    state: SelectorState,
    next_instance: u64,
}

/// Borrowed engine returned by [`EngineSelector::select`].
pub struct EngineHandle<'a> {
    id: InstanceId,
    engine: &'a mut dyn ShaderEngine,
}

impl EngineSelector {
    /// Create a selector backed by [`JitEngine`]. Whether the target can run compiled programs is
    /// queried once here, when it can't the interpreter is always selected.
    pub fn new(flag: JitFlag) -> Self {
        let native_available = jit::is_supported();
        if !native_available {
            tracing::debug!("native shader engine is not supported on this target");
        }

        let mut selector = Self::with_native_factory(
            flag,
            Box::new(|| -> Result<Box<dyn ShaderEngine>, EngineError> { Ok(Box::new(JitEngine::new()?)) }),
        );

        selector.native_available = native_available;
        selector
    }

    /// Create a selector that builds its native engine with `factory`. The factory reports
    /// unavailability through its error.
    pub fn with_native_factory(flag: JitFlag, factory: NativeFactory) -> Self {
        Self {
            flag,
            native_available: true,
            native_factory: factory,
            native: None,
            native_failed: false,
            interpreter: None,
            state: SelectorState::Uninitialized,
            next_instance: 0,
        }
    }

    pub fn flag(&self) -> &JitFlag {
        &self.flag
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    /// Return the engine for the current flag value. Never fails: if the native engine can't be
    /// built the interpreter is returned, and keeps being returned until the next shutdown.
    pub fn select(&mut self) -> EngineHandle<'_> {
        let Self {
            flag,
            native_available,
            native_factory,
            native,
            native_failed,
            interpreter,
            state,
            next_instance,
        } = self;

        if flag.is_enabled() && *native_available && !*native_failed {
            if native.is_none() {
                match (**native_factory)() {
                    Ok(engine) => {
                        let id = allocate_id(next_instance);
                        tracing::debug!(instance = id.0, kind = ?engine.kind(), "constructed native shader engine");
                        *native = Some(EngineSlot { id, engine });
                    }
                    Err(err) => {
                        tracing::warn!(%err, "native shader engine unavailable, using the interpreter");
                        *native_failed = true;
                    }
                }
            }

            if let Some(slot) = native {
                *state = SelectorState::NativeActive;
                return EngineHandle {
                    id: slot.id,
                    engine: slot.engine.as_mut(),
                };
            }
        }

        let slot = interpreter.get_or_insert_with(|| {
            let id = allocate_id(next_instance);
            tracing::debug!(instance = id.0, "constructed interpreter shader engine");
            EngineSlot {
                id,
                engine: Box::new(InterpreterEngine::new()),
            }
        });

        *state = SelectorState::InterpreterActive;
        EngineHandle {
            id: slot.id,
            engine: slot.engine.as_mut(),
        }
    }

    /// Drop the native engine and forget a failed construction. The next `select` with the flag
    /// set builds a new instance.
    pub fn shutdown(&mut self) {
        if let Some(slot) = self.native.take() {
            tracing::debug!(instance = slot.id.0, "shut down native shader engine");
        }

        self.native_failed = false;
        self.state = SelectorState::Uninitialized;
    }
}

fn allocate_id(next_instance: &mut u64) -> InstanceId {
    let id = InstanceId(*next_instance);
    *next_instance += 1;
    id
}

impl EngineHandle<'_> {
    pub fn id(&self) -> InstanceId {
        self.id
    }
}

impl<'a> Deref for EngineHandle<'a> {
    type Target = dyn ShaderEngine + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.engine
    }
}

impl<'a> DerefMut for EngineHandle<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.engine
    }
}
