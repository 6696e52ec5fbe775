use crate::cache::TomlFileCache;
use crate::config::AutoloadConfig;
use crate::error::AutoloadResult;
use crate::resolver::Resolver;
use crate::runtime::{HookChain, HookId, SharedHook};
use std::cell::{Ref, RefCell, RefMut};
use std::path::PathBuf;
use std::rc::Rc;

/// Shared handle to a [`Resolver`] that can install it as an autoload hook.
///
/// Clones share the same resolver. The composition root keeps one clone for
/// configuration while the hook chain holds another.
#[derive(Debug, Clone)]
pub struct ClassLoader {
    resolver: Rc<RefCell<Resolver>>,
}

impl ClassLoader {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver: Rc::new(RefCell::new(resolver)),
        }
    }

    /// Builds a resolver from `config` and attaches a [`TomlFileCache`] when
    /// the configuration has a `[cache]` section.
    pub fn from_config(config: &AutoloadConfig) -> AutoloadResult<Self> {
        let mut resolver = Resolver::from_config(config);
        if let Some(cache) = &config.cache {
            let store = Rc::new(RefCell::new(TomlFileCache::new(&cache.path)));
            resolver.set_cache(store, cache.load_on_set)?;
        }
        Ok(Self::new(resolver))
    }

    pub fn resolver(&self) -> Ref<'_, Resolver> {
        self.resolver.borrow()
    }

    pub fn resolver_mut(&self) -> RefMut<'_, Resolver> {
        self.resolver.borrow_mut()
    }

    pub fn find_path(&self, type_name: &str) -> Option<PathBuf> {
        self.resolver.borrow_mut().find_path(type_name)
    }

    /// Installs the resolver in `chain`, at the front if `prepend`.
    ///
    /// Each call adds a new entry, even if the resolver is already installed.
    pub fn register(&self, chain: &mut HookChain, prepend: bool) -> HookId {
        let id = chain.install(self.hook(), prepend);
        log::info!(
            "Registered class loader ({}), {} hooks installed",
            if prepend { "prepended" } else { "appended" },
            chain.len()
        );
        id
    }

    /// Removes one entry of this resolver from `chain`. Does nothing if there
    /// is none.
    pub fn unregister(&self, chain: &mut HookChain) -> bool {
        let removed = chain.uninstall(&self.hook());
        if removed {
            log::info!("Unregistered class loader, {} hooks installed", chain.len());
        }
        removed
    }

    /// Whether `chain` holds at least one entry for this resolver.
    pub fn is_registered(&self, chain: &HookChain) -> bool {
        self.registrations(chain) > 0
    }

    /// Number of entries `chain` holds for this resolver.
    pub fn registrations(&self, chain: &HookChain) -> usize {
        chain.count(&self.hook())
    }

    fn hook(&self) -> SharedHook {
        self.resolver.clone()
    }
}
