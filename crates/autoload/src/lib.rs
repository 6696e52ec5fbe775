//! Type-name resolution for the Parallax runtime loader.
//!
//! This crate is responsible for:
//! - Mapping a fully-qualified type name (`app::models::User`) to the source
//!   file defining it, by searching a list of root directories
//! - Memoizing every hit and optionally persisting the memo table through a
//!   [`ClassCache`] collaborator
//! - Installing the resolver as an autoload hook of a [`Runtime`] and
//!   removing it again
//!
//! ## Resolution
//!
//! A lookup first consults the memo table, then probes the type name as a
//! literal path, then walks each search root depth-first in listing order.
//! Directories whose basename is ignored are never entered, and only files
//! with an accepted extension can match. A type that cannot be found is not
//! an error: the runtime simply asks the next hook.
//!
//! ```rust,ignore
//! let mut resolver = Resolver::new();
//! resolver.add_search_root("app").add_search_root("libs").add_ignored_name("trash");
//!
//! let loader = ClassLoader::new(resolver);
//! let mut runtime = Runtime::new();
//! loader.register(&mut runtime.hooks, false);
//! runtime.require("app::models::User")?;
//! ```

mod cache;
mod config;
mod error;
mod load;
mod loader;
pub mod name;
mod resolver;
mod runtime;
mod walk;

pub use cache::{ClassCache, ClassMap, TomlFileCache};
pub use config::{AutoloadConfig, CacheConfig};
pub use error::{AutoloadError, AutoloadResult};
pub use load::{require_file, LoadedUnit};
pub use loader::ClassLoader;
pub use resolver::{ResolveStats, Resolver, SharedCache};
pub use runtime::{Autoload, HookChain, HookId, Runtime, SharedHook, TypeTable};
pub use walk::{DirSearch, WalkOptions};
