//! NetCDF-backed [`GridSource`] using the native netcdf library.
//!
//! A [`NetcdfSource`] owns one open file handle. The handle is released when the
//! source is dropped, so a batch that fails part way has already closed every
//! file it finished with.

use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::field::Field;
use crate::source::{split_text_records, GridSource, Packing};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints diagnostics even when the Rust side handles the
/// condition, e.g. when probing a variable for an optional `scale_factor`.
/// Call this early in `main()`, before any NetCDF operation. Safe to call more
/// than once.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and null handlers are a documented
        // way to disable error output.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// One open NetCDF file.
pub struct NetcdfSource {
    path: PathBuf,
    file: netcdf::File,
}

impl NetcdfSource {
    /// Open a file read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        silence_hdf5_errors();

        let path = path.as_ref().to_path_buf();
        let file = netcdf::open(&path).map_err(|e| StoreError::Open {
            path: path.clone(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "Opened NetCDF file");

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn variable(&self, name: &str) -> StoreResult<netcdf::Variable<'_>> {
        self.file
            .variable(name)
            .ok_or_else(|| StoreError::MissingVariable(name.to_string()))
    }
}

impl GridSource for NetcdfSource {
    fn read_field(&self, name: &str) -> StoreResult<Field> {
        let var = self.variable(name)?;
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

        let raw = read_numeric(&var, name)?;

        let packing = Packing {
            scale_factor: get_f64_attr(&var, "scale_factor"),
            add_offset: get_f64_attr(&var, "add_offset"),
            fill_value: get_f64_attr(&var, "_FillValue"),
            missing_value: get_f64_attr(&var, "missing_value"),
        };
        if !packing.is_identity() {
            debug!(variable = name, ?packing, "Decoding packed values");
        }

        Field::new(shape, packing.decode(raw))
    }

    fn read_text_records(&self, name: &str) -> StoreResult<Vec<String>> {
        let var = self.variable(name)?;
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let width = match shape.as_slice() {
            [_, width] => *width,
            other => {
                return Err(StoreError::InvalidFormat(format!(
                    "'{}' should be a 2-D character array, found shape {:?}",
                    name, other
                )))
            }
        };

        use netcdf::types::{IntType, NcVariableType};
        let vartype = var.vartype();
        if !matches!(
            vartype,
            NcVariableType::Char
                | NcVariableType::Int(IntType::U8)
                | NcVariableType::Int(IntType::I8)
        ) {
            return Err(StoreError::InvalidFormat(format!(
                "'{}' should hold characters or bytes, found {:?}",
                name, vartype
            )));
        }

        let mut buf = vec![0u8; shape.iter().product()];
        // SAFETY: single-byte element types allocate nothing inside `buf`.
        #[allow(unused_unsafe)]
        let read = unsafe { var.get_raw_values_into(&mut buf, ..) };
        read.map_err(|e| StoreError::Read {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        Ok(split_text_records(&buf, width))
    }

    fn attribute_text(&self, variable: &str, attribute: &str) -> StoreResult<Option<String>> {
        let var = self.variable(variable)?;
        if !has_attr(&var, attribute) {
            return Ok(None);
        }
        match var.attribute_value(attribute) {
            Some(Ok(netcdf::AttributeValue::Str(text))) => Ok(Some(text)),
            Some(Ok(other)) => Err(StoreError::InvalidFormat(format!(
                "attribute {}:{} is not text ({:?})",
                variable, attribute, other
            ))),
            Some(Err(e)) => Err(StoreError::Read {
                name: format!("{}:{}", variable, attribute),
                message: e.to_string(),
            }),
            None => Ok(None),
        }
    }

    fn has_variable(&self, name: &str) -> bool {
        self.file.variable(name).is_some()
    }
}

/// Read every value of a numeric variable, widened to f64 from its stored type.
fn read_numeric(var: &netcdf::Variable, name: &str) -> StoreResult<Vec<f64>> {
    use netcdf::types::{FloatType, IntType, NcVariableType};

    fn widen<T: Into<f64>>(values: Vec<T>) -> Vec<f64> {
        values.into_iter().map(Into::into).collect()
    }

    let read_error = |e: netcdf::Error| StoreError::Read {
        name: name.to_string(),
        message: e.to_string(),
    };

    let values = match var.vartype() {
        NcVariableType::Float(FloatType::F64) => var.get_values::<f64, _>(..).map_err(read_error)?,
        NcVariableType::Float(FloatType::F32) => widen(var.get_values::<f32, _>(..).map_err(read_error)?),
        NcVariableType::Int(IntType::I8) => widen(var.get_values::<i8, _>(..).map_err(read_error)?),
        NcVariableType::Int(IntType::U8) => widen(var.get_values::<u8, _>(..).map_err(read_error)?),
        NcVariableType::Int(IntType::I16) => widen(var.get_values::<i16, _>(..).map_err(read_error)?),
        NcVariableType::Int(IntType::U16) => widen(var.get_values::<u16, _>(..).map_err(read_error)?),
        NcVariableType::Int(IntType::I32) => widen(var.get_values::<i32, _>(..).map_err(read_error)?),
        NcVariableType::Int(IntType::U32) => widen(var.get_values::<u32, _>(..).map_err(read_error)?),
        NcVariableType::Int(IntType::I64) => var
            .get_values::<i64, _>(..)
            .map_err(read_error)?
            .into_iter()
            .map(|v| v as f64)
            .collect(),
        NcVariableType::Int(IntType::U64) => var
            .get_values::<u64, _>(..)
            .map_err(read_error)?
            .into_iter()
            .map(|v| v as f64)
            .collect(),
        other => {
            return Err(StoreError::InvalidFormat(format!(
                "'{}' is not numeric ({:?})",
                name, other
            )))
        }
    };
    Ok(values)
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get a numeric attribute as f64.
fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}
