use api::{ManagedBackend, MethodResult};
use bridge::BackendRegistry;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Backend double that records calls and replays scripted replies.
struct RecordingBackend {
    calls: Vec<String>,
    replies: VecDeque<MethodResult>,
    initialized: bool,
    init_count: u32,
}

impl RecordingBackend {
    fn new() -> Self {
        Self {
            calls: Vec::new(),
            replies: VecDeque::new(),
            initialized: false,
            init_count: 0,
        }
    }

    fn scripted(replies: Vec<MethodResult>) -> Self {
        Self {
            replies: replies.into(),
            ..Self::new()
        }
    }
}

impl ManagedBackend for RecordingBackend {
    fn initialize(&mut self) {
        self.init_count += 1;
        self.initialized = true;
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn run_method(&mut self, call: &str) -> MethodResult {
        self.calls.push(call.to_string());
        self.replies.pop_front().unwrap_or(MethodResult::None)
    }
}

#[test]
fn test_no_backend_yields_none() {
    let _ = env_logger::builder().is_test(true).try_init();

    let registry = BackendRegistry::new();
    assert!(!registry.is_backend_loaded());
    assert!(registry.backend().is_none());
    assert_eq!(
        registry.run_method("Bridge.Methods.GetVersion()"),
        MethodResult::None
    );

    // Assembly management without a backend is a silent no-op.
    registry.load_assembly("mods/Extra.dll");
    registry.unload_assembly("mods/Extra.dll");
}

#[test]
fn test_load_backend_initializes_it_once() {
    let backend = Arc::new(Mutex::new(RecordingBackend::new()));
    let registry = BackendRegistry::new();
    registry.load_backend(backend.clone());

    assert!(registry.is_backend_loaded());
    let inner = backend.lock().unwrap();
    assert!(inner.initialized);
    assert_eq!(inner.init_count, 1);
    assert!(inner.calls.is_empty());
}

#[test]
fn test_run_method_forwards_call_and_reply() {
    let backend = Arc::new(Mutex::new(RecordingBackend::scripted(vec![
        MethodResult::Float(1.5),
    ])));
    let registry = BackendRegistry::new();
    registry.load_backend(backend.clone());

    let reply = registry.run_method("Game.Stats.GetFps()");
    assert_eq!(reply, MethodResult::Float(1.5));
    assert_eq!(
        backend.lock().unwrap().calls,
        vec!["Game.Stats.GetFps()".to_string()]
    );
}

#[test]
fn test_assembly_calls_use_protocol_encoding() {
    let backend = Arc::new(Mutex::new(RecordingBackend::new()));
    let registry = BackendRegistry::new();
    registry.load_backend(backend.clone());

    registry.load_assembly("foo.dll");
    registry.unload_assembly("foo.dll");

    assert_eq!(
        backend.lock().unwrap().calls,
        vec![
            "Bridge.Assemblies.LoadAssembly(foo.dll)".to_string(),
            "Bridge.Assemblies.UnloadAssembly(foo.dll)".to_string(),
        ]
    );
}

#[test]
fn test_replacing_backend_leaves_previous_untouched() {
    let first = Arc::new(Mutex::new(RecordingBackend::new()));
    let second = Arc::new(Mutex::new(RecordingBackend::new()));
    let registry = BackendRegistry::new();

    registry.load_backend(first.clone());
    registry.load_backend(second.clone());

    registry.run_method("Game.World.Tick()");

    // The replaced backend saw only its own initialize; the call went to
    // the successor, and the caller's handle to the first stays usable.
    assert_eq!(first.lock().unwrap().init_count, 1);
    assert!(first.lock().unwrap().calls.is_empty());
    assert!(first.lock().unwrap().is_initialized());
    assert_eq!(second.lock().unwrap().calls.len(), 1);
}

#[test]
fn test_backend_accessor_returns_active_handle() {
    let backend = Arc::new(Mutex::new(RecordingBackend::new()));
    let registry = BackendRegistry::new();
    registry.load_backend(backend.clone());

    let active = registry.backend().unwrap();
    active.lock().unwrap().run_method("Game.Audio.Mute()");
    assert_eq!(
        backend.lock().unwrap().calls,
        vec!["Game.Audio.Mute()".to_string()]
    );
}
