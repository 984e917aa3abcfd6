use crate::error::PdmlError;
use crate::layer::Layer;
use crate::time::split_epoch;
use std::ops;

/// Layer names considered as transport protocols by [`Packet::transport_layer`]
pub const TRANSPORT_LAYERS: &[&str] = &["udp", "tcp", "sctp", "dccp"];

/// A packet decoded from a PDML `<packet>` element
///
/// `number`, `length`, `sniff_time` and `captured_length` come from the `geninfo` element,
/// `interface_captured` from the `frame` element. Neither of these elements is part of
/// `layers`; the `frame` element is kept as `frame_info`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Packet {
    /// Packet number in the capture (starting at 1)
    pub number: u32,
    /// Length of the packet on the wire
    pub length: u32,
    /// Raw capture timestamp (seconds since epoch, as a decimal string)
    pub sniff_time: String,
    /// Number of bytes captured
    pub captured_length: u32,
    /// Raw interface identifier, if the capture provides one
    pub interface_captured: Option<String>,
    /// Frame metadata
    pub frame_info: Layer,
    pub(crate) layers: Vec<Layer>,
}

impl Packet {
    /// Protocol layers, in document order
    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<Layer> {
        self.layers.iter()
    }

    /// Returns the layer at position `index`
    pub fn get_layer(&self, index: usize) -> Result<&Layer, PdmlError> {
        self.layers.get(index).ok_or(PdmlError::IndexOutOfRange {
            index,
            len: self.layers.len(),
        })
    }

    /// Returns the first layer named `name` (case-insensitive)
    pub fn layer(&self, name: &str) -> Result<&Layer, PdmlError> {
        self.find_layer(name)
            .ok_or_else(|| PdmlError::FieldNotFound(name.to_owned()))
    }

    /// Iterate over all layers named `name` (case-insensitive), for ex all `ip` layers of a
    /// tunneled packet
    pub fn get_layers<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Layer> + 'a {
        self.layers
            .iter()
            .filter(move |l| l.name.eq_ignore_ascii_case(name))
    }

    pub fn has_layer(&self, name: &str) -> bool {
        self.find_layer(name).is_some()
    }

    fn find_layer(&self, name: &str) -> Option<&Layer> {
        self.layers
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
    }

    /// The last layer of the packet, if any
    pub fn highest_layer(&self) -> Option<&Layer> {
        self.layers.last()
    }

    /// The first transport layer (see [`TRANSPORT_LAYERS`]), if any
    pub fn transport_layer(&self) -> Option<&Layer> {
        self.layers
            .iter()
            .find(|l| TRANSPORT_LAYERS.contains(&l.name.as_str()))
    }

    /// The capture timestamp as seconds and nanoseconds since epoch
    ///
    /// Returns `None` if `sniff_time` is not a decimal epoch value.
    pub fn sniff_timestamp(&self) -> Option<(u64, u32)> {
        split_epoch(&self.sniff_time)
    }
}

impl<'a> IntoIterator for &'a Packet {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

impl ops::Index<usize> for Packet {
    type Output = Layer;

    /// Panics if `index` is out of range. Use [`Packet::get_layer`] for a fallible lookup.
    fn index(&self, index: usize) -> &Layer {
        &self.layers[index]
    }
}

impl<'s> ops::Index<&'s str> for Packet {
    type Output = Layer;

    /// Panics if no layer is named `name`. Use [`Packet::layer`] for a fallible lookup.
    fn index(&self, name: &'s str) -> &Layer {
        match self.find_layer(name) {
            Some(l) => l,
            None => panic!("no layer '{}' in packet {}", name, self.number),
        }
    }
}
