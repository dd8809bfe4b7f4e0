use posebridge_infer::Backend;
use posebridge_video::SourceProvider;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Named inference backends and capture source providers.
///
/// Sessions created through the C ABI look their collaborators up here by
/// name. Registering a second entry under an existing name replaces it;
/// sessions already holding the old one keep it.
pub struct Registry {
    backends: HashMap<String, Arc<dyn Backend>>,
    providers: HashMap<String, Arc<dyn SourceProvider>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
            providers: HashMap::new(),
        }
    }

    pub fn register_backend(&mut self, backend: Box<dyn Backend>) {
        let name = backend.name().to_string();
        log::debug!("registering backend {}", name);
        self.backends.insert(name, Arc::from(backend));
    }

    pub fn register_provider(&mut self, provider: Box<dyn SourceProvider>) {
        let name = provider.name().to_string();
        log::debug!("registering source provider {}", name);
        self.providers.insert(name, Arc::from(provider));
    }

    pub fn backend(&self, name: &str) -> Option<Arc<dyn Backend>> {
        self.backends.get(name).cloned()
    }

    pub fn provider(&self, name: &str) -> Option<Arc<dyn SourceProvider>> {
        self.providers.get(name).cloned()
    }

    pub fn backend_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.backends.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn provider_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry with every provider compiled into this build.
pub fn create_registry() -> Registry {
    #[cfg(feature = "v4l2")]
    let mut registry = Registry::new();
    #[cfg(not(feature = "v4l2"))]
    let registry = Registry::new();

    #[cfg(feature = "v4l2")]
    registry.register_provider(Box::new(posebridge_video::V4l2Provider));

    registry
}

static GLOBAL: OnceLock<Mutex<Registry>> = OnceLock::new();

/// Process-wide registry used by the C ABI.
pub fn global() -> MutexGuard<'static, Registry> {
    let registry = GLOBAL.get_or_init(|| Mutex::new(create_registry()));
    // the registry holds no invariants a panicking holder could break
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Make a backend available to sessions created by name.
pub fn register_backend(backend: Box<dyn Backend>) {
    global().register_backend(backend);
}

/// Make a source provider available to sessions created by name.
pub fn register_provider(provider: Box<dyn SourceProvider>) {
    global().register_provider(provider);
}
