//! Python API reference generator.
//!
//! Parses Python sources with tree-sitter and renders modules, classes and
//! functions as nested Markdown blocks.
//!
//! # Architecture
//!
//! - `syntax`: tree-sitter parse, converted into an owned [`Declaration`] tree
//! - [`docstring`]: Google, reST and NumPy docstring parsing
//! - [`locate()`]: dotted symbol lookup
//! - [`DocBlocks`]: lazy per-kind block rendering
//! - `reconcile`: Arguments/Returns tables from signature and docstring
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use yaarg_config::Options;
//! use yaarg_generator::Generator;
//! use yaarg_python::PythonGenerator;
//!
//! let generator = PythonGenerator::new(Path::new("/project")).unwrap();
//! let blocks = generator
//!     .generate(Path::new("/project/pkg/mod.py"), Some("add"), &Options::new())
//!     .unwrap();
//! println!("{}", blocks.collect::<Vec<_>>().join("\n\n"));
//! ```

mod context;
pub mod docstring;
mod locate;
mod options;
mod reconcile;
mod render;
mod source;
mod syntax;
mod tree;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use yaarg_config::Options;
use yaarg_generator::{Blocks, GenerateError, Generator, LoadError, OptionsError};

pub use context::RenderContext;
pub use locate::locate;
pub use options::PythonOptions;
pub use reconcile::{ArgumentRow, ReturnRow, argument_rows, return_row};
pub use render::DocBlocks;
pub use source::Encoding;
pub use tree::{Class, Declaration, Function, Module, Parameter};

use crate::syntax::PythonParser;

/// Build a boxed [`PythonGenerator`] for a registry.
///
/// # Errors
///
/// Returns an error if the Python grammar cannot be loaded.
pub fn factory(base_dir: &Path) -> Result<Box<dyn Generator>, LoadError> {
    Ok(Box::new(PythonGenerator::new(base_dir)?))
}

/// Generator for Python source files.
pub struct PythonGenerator {
    base_dir: PathBuf,
    parser: RefCell<PythonParser>,
}

impl PythonGenerator {
    /// Create a generator for a project rooted at `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the Python grammar cannot be loaded.
    pub fn new(base_dir: &Path) -> Result<Self, LoadError> {
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            parser: RefCell::new(PythonParser::new()?),
        })
    }

    /// Project root used for module titles.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Read and parse a source file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn parse_file(
        &self,
        file_path: &Path,
        encoding: Encoding,
    ) -> Result<Declaration, GenerateError> {
        let source = source::read_source(file_path, encoding)?;
        let mut parser = self
            .parser
            .try_borrow_mut()
            .map_err(|_| GenerateError::Parse {
                path: file_path.to_path_buf(),
                message: "parser is already in use".to_owned(),
            })?;
        parser.parse(&source, file_path)
    }
}

impl Generator for PythonGenerator {
    fn name(&self) -> &str {
        "python"
    }

    fn validate_options(&self, options: Options) -> Result<Options, OptionsError> {
        let validated = options::schema().validate(options)?;
        PythonOptions::from_options(&validated)?;
        Ok(validated)
    }

    fn generate(
        &self,
        file_path: &Path,
        symbol: Option<&str>,
        options: &Options,
    ) -> Result<Blocks, GenerateError> {
        let options = PythonOptions::from_options(options)?;
        if let Some(version) = &options.version {
            tracing::debug!(version = %version, "Parsing with the Python 3 grammar");
        }

        let module = Rc::new(self.parse_file(file_path, options.encoding)?);

        let target = match symbol {
            Some(symbol) => locate(&module, symbol),
            None => Some(module),
        };
        let Some(target) = target else {
            tracing::debug!(
                path = %file_path.display(),
                symbol = ?symbol,
                "Symbol not found, rendering nothing"
            );
            return Ok(Box::new(DocBlocks::empty()));
        };

        let context = RenderContext::root(&self.base_dir, file_path, symbol, options);
        Ok(Box::new(DocBlocks::new(target, context)))
    }
}
