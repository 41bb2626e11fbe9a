//! The read-side storage seam and its in-memory implementation.

use std::collections::HashMap;

use crate::error::{StoreError, StoreResult};
use crate::field::Field;

/// Read access to one gridded container: named variables with attribute metadata.
pub trait GridSource {
    /// Read a numeric variable, with packing attributes already applied.
    fn read_field(&self, name: &str) -> StoreResult<Field>;

    /// Read a fixed-width character variable as one string per leading-axis index.
    fn read_text_records(&self, name: &str) -> StoreResult<Vec<String>>;

    /// Read a text attribute of a variable, `None` if the attribute is absent.
    fn attribute_text(&self, variable: &str, attribute: &str) -> StoreResult<Option<String>>;

    fn has_variable(&self, name: &str) -> bool;
}

/// Packing attributes attached to a numeric variable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Packing {
    pub scale_factor: Option<f64>,
    pub add_offset: Option<f64>,
    pub fill_value: Option<f64>,
    pub missing_value: Option<f64>,
}

impl Packing {
    pub fn is_identity(&self) -> bool {
        *self == Packing::default()
    }

    /// Decode raw stored values: fill/missing sentinels become NaN, the rest are
    /// scaled and offset.
    pub fn decode(&self, raw: Vec<f64>) -> Vec<f64> {
        if self.is_identity() {
            return raw;
        }
        let scale = self.scale_factor.unwrap_or(1.0);
        let offset = self.add_offset.unwrap_or(0.0);

        raw.into_iter()
            .map(|val| {
                if Some(val) == self.fill_value || Some(val) == self.missing_value {
                    f64::NAN
                } else {
                    val * scale + offset
                }
            })
            .collect()
    }
}

/// A [`GridSource`] held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    fields: HashMap<String, Field>,
    text: HashMap<String, Vec<String>>,
    attributes: HashMap<(String, String), String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: &str, field: Field) -> Self {
        self.fields.insert(name.to_string(), field);
        self
    }

    pub fn with_text_records<S: Into<String>>(
        mut self,
        name: &str,
        records: impl IntoIterator<Item = S>,
    ) -> Self {
        self.text
            .insert(name.to_string(), records.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_attribute(mut self, variable: &str, attribute: &str, value: &str) -> Self {
        self.attributes.insert(
            (variable.to_string(), attribute.to_string()),
            value.to_string(),
        );
        self
    }
}

impl GridSource for MemorySource {
    fn read_field(&self, name: &str) -> StoreResult<Field> {
        self.fields
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::MissingVariable(name.to_string()))
    }

    fn read_text_records(&self, name: &str) -> StoreResult<Vec<String>> {
        self.text
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::MissingVariable(name.to_string()))
    }

    fn attribute_text(&self, variable: &str, attribute: &str) -> StoreResult<Option<String>> {
        if !self.has_variable(variable) {
            return Err(StoreError::MissingVariable(variable.to_string()));
        }
        Ok(self
            .attributes
            .get(&(variable.to_string(), attribute.to_string()))
            .cloned())
    }

    fn has_variable(&self, name: &str) -> bool {
        self.fields.contains_key(name) || self.text.contains_key(name)
    }
}

/// Split a flat fixed-width character buffer into trimmed records.
pub(crate) fn split_text_records(bytes: &[u8], width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    bytes
        .chunks(width)
        .map(|chunk| {
            String::from_utf8_lossy(chunk)
                .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
                .to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_packing_passes_values_through() {
        let raw = vec![1.0, 2.5, -3.0];
        assert_eq!(Packing::default().decode(raw.clone()), raw);
    }

    #[test]
    fn test_packing_scales_and_masks() {
        let packing = Packing {
            scale_factor: Some(0.5),
            add_offset: Some(10.0),
            fill_value: Some(-32767.0),
            missing_value: None,
        };
        let decoded = packing.decode(vec![0.0, 4.0, -32767.0]);
        assert_eq!(decoded[0], 10.0);
        assert_eq!(decoded[1], 12.0);
        assert!(decoded[2].is_nan());
    }

    #[test]
    fn test_missing_value_is_masked() {
        let packing = Packing {
            missing_value: Some(9999.0),
            ..Default::default()
        };
        let decoded = packing.decode(vec![9999.0, 1.0]);
        assert!(decoded[0].is_nan());
        assert_eq!(decoded[1], 1.0);
    }

    #[test]
    fn test_split_text_records_trims_padding() {
        let bytes = b"2020010100\0\02020010106  ";
        let records = split_text_records(bytes, 12);
        assert_eq!(records, vec!["2020010100", "2020010106"]);
    }

    #[test]
    fn test_memory_source_lookup() {
        let source = MemorySource::new()
            .with_field("time", Field::vector(vec![0.0, 1.0]))
            .with_attribute("time", "units", "days since 2020-01-01");

        assert!(source.has_variable("time"));
        assert_eq!(source.read_field("time").unwrap().len(), 2);
        assert_eq!(
            source.attribute_text("time", "units").unwrap().as_deref(),
            Some("days since 2020-01-01")
        );
        assert_eq!(source.attribute_text("time", "calendar").unwrap(), None);
        assert!(matches!(
            source.read_field("uwind"),
            Err(StoreError::MissingVariable(name)) if name == "uwind"
        ));
    }
}
