//! Python exception types for sdist build errors.

use pyo3::create_exception;
use pyo3::exceptions::PyException;
use pyo3::prelude::*;
use sdist_core::SdistError as CoreError;

// Base exception for all build errors
create_exception!(sdist, SdistError, PyException);

create_exception!(sdist, ConfigurationError, SdistError);
create_exception!(sdist, InvalidPatternError, SdistError);
create_exception!(sdist, OutputDirectoryError, SdistError);
create_exception!(sdist, FileAccessError, SdistError);
create_exception!(sdist, InvalidArchiveError, SdistError);

/// Converts core errors to Python exceptions.
///
/// Needed because the orphan rule forbids `From<CoreError> for PyErr`.
pub fn convert_error(err: CoreError) -> PyErr {
    let message = err.to_string();
    match err {
        CoreError::Io(e) => PyErr::from(e),
        CoreError::InvalidPattern { .. } => InvalidPatternError::new_err(message),
        CoreError::OutputDirectory { .. } => OutputDirectoryError::new_err(message),
        CoreError::FileAccess { .. } => FileAccessError::new_err(message),
        CoreError::InvalidArchive(_) => InvalidArchiveError::new_err(message),
        ref other if other.is_configuration_error() => ConfigurationError::new_err(message),
        _ => SdistError::new_err(message),
    }
}

/// Registers all exception types with the Python module.
pub fn register_exceptions(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("SdistError", m.py().get_type::<SdistError>())?;
    m.add(
        "ConfigurationError",
        m.py().get_type::<ConfigurationError>(),
    )?;
    m.add(
        "InvalidPatternError",
        m.py().get_type::<InvalidPatternError>(),
    )?;
    m.add(
        "OutputDirectoryError",
        m.py().get_type::<OutputDirectoryError>(),
    )?;
    m.add("FileAccessError", m.py().get_type::<FileAccessError>())?;
    m.add(
        "InvalidArchiveError",
        m.py().get_type::<InvalidArchiveError>(),
    )?;
    Ok(())
}
