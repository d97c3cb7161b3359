//! Conversion of PEP 517 `config_settings` into build options.

use pyo3::exceptions::PyTypeError;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use sdist_core::BuildOptions;
use sdist_core::options::OptionValue;

const SOURCE_DATE_EPOCH: &str = "SOURCE_DATE_EPOCH";

/// Builds [`BuildOptions`] from the frontend's `config_settings` dict.
///
/// Values must be strings or lists of strings.
pub fn build_options(config_settings: Option<&Bound<'_, PyDict>>) -> PyResult<BuildOptions> {
    let mut options = BuildOptions::new().with_source_date_epoch(source_date_epoch()?);

    let Some(settings) = config_settings else {
        return Ok(options);
    };

    for (key, value) in settings.iter() {
        let key: String = key
            .extract()
            .map_err(|_| PyTypeError::new_err("config_settings keys must be str"))?;
        let value = if let Ok(single) = value.extract::<String>() {
            OptionValue::Single(single)
        } else if let Ok(list) = value.extract::<Vec<String>>() {
            OptionValue::List(list)
        } else {
            return Err(PyTypeError::new_err(format!(
                "config_settings[{key:?}] must be str or list of str"
            )));
        };
        options.insert(key, value);
    }

    Ok(options)
}

fn source_date_epoch() -> PyResult<Option<u64>> {
    match std::env::var(SOURCE_DATE_EPOCH) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map(Some).map_err(|e| {
            PyValueError::new_err(format!("{SOURCE_DATE_EPOCH}={raw:?} is not a Unix timestamp: {e}"))
        }),
        _ => Ok(None),
    }
}
