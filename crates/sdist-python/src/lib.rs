//! Python bindings for sdist-core.
//!
//! Exposes the PEP 517 source distribution hooks so the module can be named
//! as a `build-backend` for sdist-only builds.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

mod config;
mod error;
mod logging;

use config::build_options;
use error::convert_error;
use error::register_exceptions;
use logging::init_logging;

/// Build a source distribution of the project in the current directory.
///
/// PEP 517 runs backend hooks with the project root as the working
/// directory. This is the only place the working directory is read.
///
/// Build events go to stderr at the `logging.level` setting unless
/// `RUST_LOG` is set.
///
/// # Arguments
///
/// * `sdist_directory` - Directory the archive is written to (str or
///   pathlib.Path); created if missing
/// * `config_settings` - Optional dict of str to str or list of str
///
/// # Returns
///
/// The archive's file name, e.g. `"demo-1.2.3.tar.gz"`
///
/// # Raises
///
/// * `ValueError` - Null bytes in the path, or a bad `SOURCE_DATE_EPOCH`
/// * `TypeError` - `config_settings` holds something other than str values
/// * `ConfigurationError` - Missing or unusable project metadata or options
/// * `InvalidPatternError` - Malformed line in the ignore file
/// * `OutputDirectoryError` - `sdist_directory` cannot be created
/// * `FileAccessError` - A project file vanished or became unreadable
/// * `OSError` - Any other I/O failure
///
/// # Examples
///
/// ```python
/// import sdist
///
/// name = sdist.build_sdist("dist", {"sdist.compression-level": "9"})
/// print(f"built dist/{name}")
/// ```
#[pyfunction]
#[pyo3(signature = (sdist_directory, config_settings=None))]
fn build_sdist(
    py: Python<'_>,
    sdist_directory: &Bound<'_, PyAny>,
    config_settings: Option<&Bound<'_, PyDict>>,
) -> PyResult<String> {
    let sdist_directory = path_to_string(py, sdist_directory)?;
    let options = build_options(config_settings)?;
    let settings = options.settings().map_err(convert_error)?;
    init_logging(settings.logging.level);
    let project_root = std::env::current_dir()?;

    // The archive is written without the GIL held
    py.detach(|| sdist_core::build_sdist(&project_root, &sdist_directory, &options))
        .map_err(convert_error)
}

/// PEP 517 hook: extra requirements for building an sdist. There are none.
#[pyfunction]
#[pyo3(signature = (config_settings=None))]
fn get_requires_for_build_sdist(config_settings: Option<&Bound<'_, PyDict>>) -> Vec<String> {
    let _ = config_settings;
    Vec::new()
}

/// Converts a Path-like object to a string with validation.
///
/// Accepts both strings and `pathlib.Path` objects by calling `os.fspath()`.
fn path_to_string(py: Python<'_>, path: &Bound<'_, PyAny>) -> PyResult<String> {
    let path_str = if let Ok(s) = path.extract::<String>() {
        s
    } else {
        let os = py.import("os")?;
        let fspath = os.getattr("fspath")?;
        let result = fspath.call1((path,))?;
        result.extract()?
    };

    if path_str.contains('\0') {
        return Err(PyValueError::new_err("path contains null bytes"));
    }

    Ok(path_str)
}

/// Python module definition.
#[pymodule]
fn sdist(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__doc__", "PEP 517 source distribution builder")?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    m.add_function(wrap_pyfunction!(build_sdist, m)?)?;
    m.add_function(wrap_pyfunction!(get_requires_for_build_sdist, m)?)?;

    register_exceptions(m)?;

    Ok(())
}
