mod error;

use autoload::{AutoloadConfig, ClassLoader, Runtime};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use error::CliError;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "autoload")]
#[command(about = "Inspect how type names resolve to Parallax source files", long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,

    /// Configuration file
    #[arg(short, long, global = true, value_name = "FILE", default_value = "autoload.toml")]
    config: PathBuf,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Print the file each type resolves to
    Locate {
        /// Fully-qualified type names
        #[arg(value_name = "TYPE", required = true)]
        types: Vec<String>,
    },

    /// Load a type through a registered loader
    Require {
        /// Fully-qualified type name
        #[arg(value_name = "TYPE")]
        type_name: String,
    },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let loader = load_loader(&args.config)?;
    match args.command {
        Command::Locate { types } => locate(&loader, &types)?,
        Command::Require { type_name } => require(&loader, &type_name)?,
    }
    Ok(())
}

fn load_loader(config_path: &Path) -> Result<ClassLoader, CliError> {
    let config = AutoloadConfig::from_file(config_path)?;
    log::debug!("Search roots: {:?}", config.roots);
    Ok(ClassLoader::from_config(&config)?)
}

fn locate(loader: &ClassLoader, types: &[String]) -> Result<(), CliError> {
    let mut missing = 0;
    for type_name in types {
        match loader.find_path(type_name) {
            Some(path) => println!("{} => {}", type_name, path.display()),
            None => {
                println!("{} => not found", type_name);
                missing += 1;
            }
        }
    }

    let stats = loader.resolver().stats();
    log::info!(
        "{} lookups, {} directories searched",
        stats.lookups,
        stats.directories_visited
    );

    if missing > 0 {
        return Err(CliError::NotFound {
            count: missing,
            total: types.len(),
        });
    }
    Ok(())
}

fn require(loader: &ClassLoader, type_name: &str) -> Result<(), CliError> {
    let mut runtime = Runtime::new();
    loader.register(&mut runtime.hooks, false);

    if !runtime.require(type_name)? {
        return Err(CliError::Undefined {
            type_name: type_name.to_string(),
        });
    }

    if let Some(unit) = runtime
        .types
        .path_of(type_name)
        .and_then(|path| runtime.types.unit(path))
    {
        println!("{} ({} bytes)", unit.path.display(), unit.source.len());
    }

    loader.unregister(&mut runtime.hooks);
    Ok(())
}
