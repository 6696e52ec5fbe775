use crate::cache::{ClassCache, ClassMap};
use crate::config::AutoloadConfig;
use crate::error::{AutoloadError, AutoloadResult};
use crate::load;
use crate::name::{self, DEFAULT_EXTENSION, DEFAULT_SEPARATOR};
use crate::runtime::{Autoload, TypeTable};
use crate::walk::{DirSearch, WalkOptions};
use fxhash::FxHashSet;
use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A cache collaborator shared between the resolver and its owner.
pub type SharedCache = Rc<RefCell<dyn ClassCache>>;

/// Counters describing how lookups were answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Calls to `find_path`
    pub lookups: usize,
    /// Lookups answered from the memo table
    pub memo_hits: usize,
    /// Lookups answered by the literal path probe
    pub probe_hits: usize,
    /// Lookups that fell through to a directory search
    pub searches: usize,
    /// Directories listed by all searches
    pub directories_visited: usize,
    /// Lookups that found nothing
    pub misses: usize,
}

/// Maps fully-qualified type names to the source files defining them.
///
/// Lookups try, in order, the memo table, a literal path probe and a
/// depth-first search of every search root. Every hit is memoized and the
/// memo table only grows.
///
/// A resolver is a plain value. Wrap it in a
/// [`ClassLoader`](crate::ClassLoader) to install it in a
/// [`HookChain`](crate::HookChain).
pub struct Resolver {
    search_roots: Vec<PathBuf>,
    ignored_names: FxHashSet<String>,
    extensions: Vec<String>,
    separator: String,
    walk: WalkOptions,
    memo: ClassMap,
    cache: Option<SharedCache>,
    stats: ResolveStats,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("search_roots", &self.search_roots)
            .field("ignored_names", &self.ignored_names)
            .field("extensions", &self.extensions)
            .field("separator", &self.separator)
            .field("memo", &self.memo.len())
            .field("has_cache", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            search_roots: vec![],
            ignored_names: FxHashSet::default(),
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            separator: DEFAULT_SEPARATOR.to_string(),
            walk: WalkOptions::default(),
            memo: ClassMap::default(),
            cache: None,
            stats: ResolveStats::default(),
        }
    }

    /// Builds a resolver from a validated configuration. The `[cache]`
    /// section is not applied here; see
    /// [`ClassLoader::from_config`](crate::ClassLoader::from_config).
    pub fn from_config(config: &AutoloadConfig) -> Self {
        let mut resolver = Self::new();
        resolver
            .add_search_roots(config.roots.iter().cloned())
            .add_ignored_names(config.ignore.iter().cloned())
            .set_extensions(config.extensions.iter().cloned())
            .set_separator(config.separator.clone())
            .set_walk_options(config.walk);
        resolver
    }

    /// Appends a search root. The path is not checked; a missing directory
    /// just never matches.
    pub fn add_search_root(&mut self, root: impl Into<PathBuf>) -> &mut Self {
        self.search_roots.push(root.into());
        self
    }

    pub fn add_search_roots<I, P>(&mut self, roots: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_roots.extend(roots.into_iter().map(Into::into));
        self
    }

    /// Excludes every directory named exactly `name`, at any depth.
    pub fn add_ignored_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.ignored_names.insert(name.into());
        self
    }

    pub fn add_ignored_names<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Accepts one more file extension. A leading dot is ignored.
    pub fn add_extension(&mut self, extension: impl AsRef<str>) -> &mut Self {
        let extension = extension.as_ref().trim_start_matches('.');
        if !extension.is_empty() && !self.extensions.iter().any(|e| e == extension) {
            self.extensions.push(extension.to_string());
        }
        self
    }

    /// Replaces the accepted extensions.
    pub fn set_extensions<I, S>(&mut self, extensions: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions.clear();
        for extension in extensions {
            self.add_extension(extension);
        }
        self
    }

    pub fn set_separator(&mut self, separator: impl Into<String>) -> &mut Self {
        self.separator = separator.into();
        self
    }

    pub fn set_walk_options(&mut self, walk: WalkOptions) -> &mut Self {
        self.walk = walk;
        self
    }

    /// Attaches a cache collaborator.
    ///
    /// With `load_on_set`, the collaborator's persisted entries are merged
    /// into the memo table first; a loaded entry replaces an existing one
    /// with the same name. If loading fails the collaborator is rejected
    /// and the resolver is left unchanged.
    pub fn set_cache(
        &mut self,
        cache: SharedCache,
        load_on_set: bool,
    ) -> AutoloadResult<&mut Self> {
        if load_on_set {
            let loaded = cache.borrow_mut().load().map_err(|err| {
                AutoloadError::InvalidConfiguration(format!(
                    "cache collaborator failed to load: {err}"
                ))
            })?;

            if let Some(entries) = loaded {
                log::debug!("Merging {} cached classes", entries.len());
                for (type_name, path) in entries {
                    let type_name = name::normalize(&type_name, &self.separator).to_string();
                    self.memo.insert(type_name, path);
                }
            }
        }

        self.cache = Some(cache);
        Ok(self)
    }

    /// Finds the file defining `type_name`, or `None` if no root has one.
    ///
    /// Memoized paths are returned as they are, without checking the disk.
    pub fn find_path(&mut self, type_name: &str) -> Option<PathBuf> {
        self.stats.lookups += 1;
        let type_name = name::normalize(type_name, &self.separator).to_string();

        if let Some(path) = self.memo.get(&type_name) {
            log::debug!("`{}` memoized at {}", type_name, path.display());
            self.stats.memo_hits += 1;
            return Some(path.clone());
        }

        if let Some(path) = self.probe(&type_name) {
            log::debug!("`{}` probed at {}", type_name, path.display());
            self.stats.probe_hits += 1;
            self.memo.insert(type_name, path.clone());
            return Some(path);
        }

        let target = name::basename(&type_name, &self.separator);
        self.stats.searches += 1;
        let mut search = DirSearch::new(&self.ignored_names, &self.extensions, self.walk);
        let found = self
            .search_roots
            .iter()
            .find_map(|root| search.find(root, target));
        self.stats.directories_visited += search.directories_visited();

        match found {
            Some(path) => {
                log::debug!("`{}` found at {}", type_name, path.display());
                self.memo.insert(type_name, path.clone());
                Some(path)
            }
            None => {
                log::debug!("`{}` not found under {} roots", type_name, self.search_roots.len());
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Looks up `type_name` and loads its file into `types`.
    ///
    /// Returns `Ok(false)` when the type is unknown to this resolver. After a
    /// successful load the whole memo table is handed to the cache
    /// collaborator, if there is one.
    pub fn resolve(&mut self, type_name: &str, types: &mut TypeTable) -> AutoloadResult<bool> {
        let Some(path) = self.find_path(type_name) else {
            return Ok(false);
        };

        if !types.is_loaded(&path) {
            let unit = load::require_file(&path).map_err(|source| AutoloadError::Load {
                type_name: type_name.to_string(),
                path: path.clone(),
                source,
            })?;
            types.insert_unit(unit);
        }
        types.define(type_name, path);

        if let Some(cache) = &self.cache {
            cache.borrow_mut().cache(&self.memo);
        }
        Ok(true)
    }

    // The type name itself, read as a path from the filesystem root.
    fn probe(&self, type_name: &str) -> Option<PathBuf> {
        self.extensions
            .iter()
            .map(|ext| name::probe_path(type_name, &self.separator, ext))
            .find(|path| path.is_file())
    }

    pub fn search_roots(&self) -> &[PathBuf] {
        &self.search_roots
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored_names.contains(name)
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn memo(&self) -> &ClassMap {
        &self.memo
    }

    pub fn memoized(&self, type_name: &str) -> Option<&Path> {
        self.memo
            .get(name::normalize(type_name, &self.separator))
            .map(PathBuf::as_path)
    }

    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    pub fn stats(&self) -> ResolveStats {
        self.stats
    }
}

impl Autoload for Resolver {
    fn autoload(&mut self, type_name: &str, types: &mut TypeTable) -> AutoloadResult<()> {
        self.resolve(type_name, types).map(|_| ())
    }
}
