#![deny(clippy::pedantic)]
#![deny(clippy::unwrap_in_result)]
#![deny(clippy::unwrap_used)]

mod argument;
mod error;
mod logging;

use argument::Arguments;
use error::{Error, Result};
use javac_ast::CompilationUnit;
use javac_classpath::Classpath;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

fn main() -> Result<()> {
    let arguments = Arguments::parse();
    logging::initialize(arguments.verbose)?;

    let units = arguments
        .files
        .iter()
        .map(|path| read_unit(path))
        .collect::<Result<Vec<_>>>()?;

    let mut classpath = build_classpath(&arguments);
    let outcome = javac::compile(&mut classpath, &units);

    for error in &outcome.errors {
        eprintln!("error: {error}");
    }

    for (binary_name, bytes) in &outcome.classes {
        let path = class_file_path(&arguments.output_dir, binary_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        debug!(class = %binary_name, path = %path.display(), "wrote class file");
    }

    if outcome.is_success() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

fn read_unit(path: &Path) -> Result<CompilationUnit> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| Error::Deserialize {
        path: path.to_path_buf(),
        source,
    })
}

/// Builds the runtime classpath from `--classpath` entries, or an empty one under `--no-rt` or
/// when no entries were given — this repository bundles no platform runtime archive, so the two
/// cases behave identically (see `DESIGN.md`).
fn build_classpath(arguments: &Arguments) -> Classpath {
    if arguments.no_rt {
        return Classpath::empty();
    }
    match &arguments.classpath {
        Some(classpath) => Classpath::new(env::split_paths(classpath)),
        None => Classpath::empty(),
    }
}

/// Translates a `/`-separated binary name into `{output_dir}/a/b/C.class`, `/` mapped to the
/// platform directory separator as §6 requires.
fn class_file_path(output_dir: &Path, binary_name: &str) -> PathBuf {
    let mut path = output_dir.to_path_buf();
    for component in binary_name.split('/') {
        path.push(component);
    }
    path.set_extension("class");
    path
}
