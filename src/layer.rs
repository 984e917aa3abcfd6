use crate::error::PdmlError;
use crate::field::Field;
use crate::tree::XmlElement;
use std::ops;

/// A protocol layer: a named, ordered collection of fields
///
/// Fields keep the order of the source document. Duplicate names are all kept; lookups return
/// the first match, and [`Layer::get_field_all`] returns all of them.
///
/// Field names can be given either in full (`eth.src`) or without the layer prefix (`src`).
/// Without the prefix, `.` and `-` may also be written as `_` (`dsfield_dscp` for
/// `ip.dsfield.dscp`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layer {
    pub name: String,
    pub(crate) showname: Option<String>,
    pub(crate) fields: Vec<Field>,
}

impl Layer {
    pub fn new<S: Into<String>>(name: S, fields: Vec<Field>) -> Layer {
        Layer {
            name: name.into(),
            showname: None,
            fields,
        }
    }

    /// Build a layer from a PDML `<proto>` element
    ///
    /// All `<field>` descendants are collected in document order, a field before its nested
    /// fields. Nested `<proto>` elements are sub-layers and are skipped.
    pub fn from_element(elt: &XmlElement) -> Layer {
        let mut fields = Vec::new();
        collect_fields(elt, &mut fields);
        Layer {
            name: elt.attr("name").unwrap_or_default().to_owned(),
            showname: elt.attr("showname").map(str::to_owned),
            fields,
        }
    }

    /// The display name of the layer, for ex `Ethernet II, Src: ...`, or its name
    pub fn showname(&self) -> &str {
        self.showname.as_deref().unwrap_or(&self.name)
    }

    /// All fields, in document order
    #[inline]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<Field> {
        self.fields.iter()
    }

    /// Returns the first field matching `name`, if any
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| name_matches(&self.name, &f.name, name))
    }

    /// Returns the first field matching `name`
    pub fn get_field(&self, name: &str) -> Result<&Field, PdmlError> {
        self.get(name)
            .ok_or_else(|| PdmlError::FieldNotFound(format!("{}.{}", self.name, name)))
    }

    /// Iterate over all fields matching `name`, in document order
    pub fn get_field_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields
            .iter()
            .filter(move |f| name_matches(&self.name, &f.name, name))
    }

    /// Returns the raw (if `raw` is true) or shown value of the first field matching `name`
    pub fn get_field_value(&self, name: &str, raw: bool) -> Result<&str, PdmlError> {
        self.get_field(name).map(|f| f.get_value(raw))
    }

    /// Returns the shown value of field `name`, or `default` if the field does not exist
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).map(Field::show).unwrap_or(default)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Field names without the layer prefix, deduplicated, in document order
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.fields.len());
        for f in &self.fields {
            let short = short_name(&self.name, &f.name);
            if !names.contains(&short) {
                names.push(short);
            }
        }
        names
    }
}

impl<'a> IntoIterator for &'a Layer {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl<'s> ops::Index<&'s str> for Layer {
    type Output = Field;

    /// Panics if the field does not exist. Use [`Layer::get`] for a fallible lookup.
    fn index(&self, name: &'s str) -> &Field {
        match self.get(name) {
            Some(f) => f,
            None => panic!("no field '{}' in layer '{}'", name, self.name),
        }
    }
}

fn collect_fields(elt: &XmlElement, out: &mut Vec<Field>) {
    for child in elt.children_named("field") {
        out.push(Field::from_element(child));
        collect_fields(child, out);
    }
}

fn short_name<'a>(layer: &str, field: &'a str) -> &'a str {
    field
        .strip_prefix(layer)
        .and_then(|s| s.strip_prefix('.'))
        .unwrap_or(field)
}

fn name_matches(layer: &str, field: &str, query: &str) -> bool {
    if field == query {
        return true;
    }
    let short = short_name(layer, field);
    if short == query {
        return true;
    }
    short.len() == query.len()
        && short
            .chars()
            .zip(query.chars())
            .all(|(a, b)| sanitize(a) == sanitize(b))
}

fn sanitize(c: char) -> char {
    match c {
        '.' | '-' => '_',
        c => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static IP_PROTO: &str = r#"
    <proto name="ip" showname="Internet Protocol Version 4" size="20" pos="14">
      <field name="ip.version" showname="0100 .... = Version: 4" size="1" pos="14" show="4" value="4"/>
      <field name="ip.dsfield" showname="Differentiated Services Field: 0x00" size="1" pos="15" show="0x00" value="00">
        <field name="ip.dsfield.dscp" showname="Default (0)" size="1" pos="15" show="0" value="0"/>
      </field>
      <proto name="ip.options" showname="Options">
        <field name="ip.opt.type" show="1"/>
      </proto>
      <field name="ip.addr" show="10.0.0.1" value="0a000001"/>
      <field name="ip.addr" show="10.0.0.2" value="0a000002"/>
    </proto>"#;

    fn ip_layer() -> Layer {
        Layer::from_element(&XmlElement::parse(IP_PROTO).unwrap())
    }

    #[test]
    fn layer_fields_in_order() {
        let layer = ip_layer();
        assert_eq!(layer.name, "ip");
        assert_eq!(layer.showname(), "Internet Protocol Version 4");
        let names: Vec<_> = layer.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            ["ip.version", "ip.dsfield", "ip.dsfield.dscp", "ip.addr", "ip.addr"]
        );
        assert_eq!(layer.field_names(), ["version", "dsfield", "dsfield.dscp", "addr"]);
        assert!(!layer.has_field("opt.type"));
    }

    #[test]
    fn layer_lookup() {
        let layer = ip_layer();
        assert_eq!(layer.get_field_value("version", false), Ok("4"));
        assert_eq!(layer.get_field_value("ip.version", true), Ok("4"));
        assert_eq!(layer.get_field_value("dsfield_dscp", false), Ok("0"));
        assert_eq!(layer.get_field_value("addr", false), Ok("10.0.0.1"));
        assert_eq!(layer.get_field_value("addr", true), Ok("0a000001"));
        let all: Vec<_> = layer.get_field_all("addr").map(|f| f.show()).collect();
        assert_eq!(all, ["10.0.0.1", "10.0.0.2"]);
        assert_eq!(layer["dsfield"].showname(), "Differentiated Services Field: 0x00");
    }

    #[test]
    fn layer_missing_field() {
        let layer = ip_layer();
        for raw in &[false, true] {
            let res = layer.get_field_value("ttl", *raw);
            assert_eq!(res, Err(PdmlError::FieldNotFound("ip.ttl".into())));
        }
        assert_eq!(layer.get_or("ttl", "64"), "64");
        assert_eq!(layer.get_or("version", "6"), "4");
    }
}
