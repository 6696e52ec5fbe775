//! The host side of dynamic type loading.
//!
//! When the runtime meets a type it has not defined yet, it asks every hook
//! in its [`HookChain`], in order, until one of them defines the type.
//! Hooks that do not know the name simply return without defining it.

use crate::error::AutoloadResult;
use crate::load::LoadedUnit;
use fxhash::FxHashMap;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A callback that may define a type on request.
pub trait Autoload {
    /// Called with the name the runtime is missing. Returning `Ok` without
    /// defining `type_name` passes the request on to the next hook.
    fn autoload(&mut self, type_name: &str, types: &mut TypeTable) -> AutoloadResult<()>;
}

/// A hook as stored in the chain; the chain shares it with its owner.
pub type SharedHook = Rc<RefCell<dyn Autoload>>;

/// Identifies one installed entry of a [`HookChain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

struct HookEntry {
    id: HookId,
    hook: SharedHook,
}

/// Ordered list of installed autoload hooks.
///
/// Installing the same hook twice creates two entries.
#[derive(Default)]
pub struct HookChain {
    entries: Vec<HookEntry>,
    next_id: u64,
}

impl HookChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `hook` at the end of the chain, or at the front if `prepend`.
    pub fn install(&mut self, hook: SharedHook, prepend: bool) -> HookId {
        let id = HookId(self.next_id);
        self.next_id += 1;

        let entry = HookEntry { id, hook };
        if prepend {
            self.entries.insert(0, entry);
        } else {
            self.entries.push(entry);
        }
        id
    }

    /// Removes the first entry holding `hook`. Returns whether one was found.
    pub fn uninstall(&mut self, hook: &SharedHook) -> bool {
        match self.entries.iter().position(|e| Rc::ptr_eq(&e.hook, hook)) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// How many entries hold `hook`.
    pub fn count(&self, hook: &SharedHook) -> usize {
        self.entries.iter().filter(|e| Rc::ptr_eq(&e.hook, hook)).count()
    }

    /// Entry ids in call order.
    pub fn ids(&self) -> Vec<HookId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Hooks may be installed or removed while the chain is being walked, so
    // the walk runs over a copy.
    fn snapshot(&self) -> Vec<SharedHook> {
        self.entries.iter().map(|e| e.hook.clone()).collect()
    }
}

/// Types defined so far and the source files they came from.
#[derive(Debug, Default)]
pub struct TypeTable {
    types: FxHashMap<String, PathBuf>,
    units: FxHashMap<PathBuf, LoadedUnit>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_defined(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Records that `type_name` is defined by the file at `path`.
    pub fn define(&mut self, type_name: impl Into<String>, path: impl Into<PathBuf>) {
        self.types.insert(type_name.into(), path.into());
    }

    pub fn is_loaded(&self, path: &Path) -> bool {
        self.units.contains_key(path)
    }

    pub fn insert_unit(&mut self, unit: LoadedUnit) {
        self.units.insert(unit.path.clone(), unit);
    }

    pub fn unit(&self, path: &Path) -> Option<&LoadedUnit> {
        self.units.get(path)
    }

    pub fn path_of(&self, type_name: &str) -> Option<&Path> {
        self.types.get(type_name).map(PathBuf::as_path)
    }

    /// Number of loaded source files.
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}

/// A minimal host: a hook chain plus the table the hooks fill in.
#[derive(Default)]
pub struct Runtime {
    pub hooks: HookChain,
    pub types: TypeTable,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure `type_name` is defined, asking the hooks in order.
    ///
    /// Returns `Ok(false)` when no hook defined the type. Errors from a hook
    /// stop the walk.
    pub fn require(&mut self, type_name: &str) -> AutoloadResult<bool> {
        if self.types.is_defined(type_name) {
            return Ok(true);
        }

        for hook in self.hooks.snapshot() {
            hook.borrow_mut().autoload(type_name, &mut self.types)?;
            if self.types.is_defined(type_name) {
                return Ok(true);
            }
        }

        log::debug!("No autoload hook defined `{}`", type_name);
        Ok(false)
    }
}
