use crate::error::PdmlError;
use crate::psml::PsmlStructure;
use std::ops;
use std::sync::Arc;

/// A packet summary row from a PSML capture
///
/// The columns are the labels of the shared [`PsmlStructure`], zipped in order with the
/// values of the row. There are always exactly as many values as labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketSummary {
    structure: Arc<PsmlStructure>,
    values: Vec<String>,
}

impl PacketSummary {
    /// Build a summary from the row values
    ///
    /// Missing values are replaced by empty strings, and values in excess are dropped.
    pub fn new(structure: Arc<PsmlStructure>, mut values: Vec<String>) -> PacketSummary {
        if values.len() != structure.len() {
            log::debug!(
                "PSML row has {} sections, structure has {} columns",
                values.len(),
                structure.len()
            );
            values.resize(structure.len(), String::new());
        }
        PacketSummary { structure, values }
    }

    #[inline]
    pub fn structure(&self) -> &Arc<PsmlStructure> {
        &self.structure
    }

    /// Column values, in structure order
    #[inline]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over (label, value) pairs, in structure order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.structure
            .labels()
            .iter()
            .zip(self.values.iter())
            .map(|(l, v)| (l.as_str(), v.as_str()))
    }

    /// Returns the value of the column `label`, if any
    pub fn get(&self, label: &str) -> Option<&str> {
        self.structure
            .position(label)
            .map(|idx| self.values[idx].as_str())
    }

    /// Returns the value of the column `label`
    pub fn column(&self, label: &str) -> Result<&str, PdmlError> {
        self.get(label)
            .ok_or_else(|| PdmlError::FieldNotFound(label.to_owned()))
    }

    /// Returns the value of the column at position `index`
    pub fn column_at(&self, index: usize) -> Result<&str, PdmlError> {
        self.values
            .get(index)
            .map(String::as_str)
            .ok_or(PdmlError::IndexOutOfRange {
                index,
                len: self.values.len(),
            })
    }

    /// Returns the value of the column `label`, or `default` if the column does not exist
    pub fn get_or<'a>(&'a self, label: &str, default: &'a str) -> &'a str {
        self.get(label).unwrap_or(default)
    }

    /// All values joined by a space, as displayed in a packet list
    pub fn summary_line(&self) -> String {
        self.values.join(" ")
    }
}

impl<'s> ops::Index<&'s str> for PacketSummary {
    type Output = str;

    /// Panics if the column does not exist. Use [`PacketSummary::get`] for a fallible lookup.
    fn index(&self, label: &'s str) -> &str {
        match self.get(label) {
            Some(v) => v,
            None => panic!("no column '{}' in packet summary", label),
        }
    }
}
