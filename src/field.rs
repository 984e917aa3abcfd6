use crate::tree::XmlElement;

/// One decoded field of a protocol layer
///
/// A field is built from a PDML `<field>` element, for ex:
///
/// ```xml
/// <field name="eth.src" showname="Source: aa:bb:cc:dd:ee:ff" size="6" pos="6" show="aa:bb:cc:dd:ee:ff" value="aabbccddeeff"/>
/// ```
///
/// All attributes are optional in PDML output. Accessors fall back to the other attributes so
/// that a field carrying any value is never empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub(crate) show: Option<String>,
    pub(crate) showname: Option<String>,
    pub(crate) value: Option<String>,
    /// Declared size, in bytes
    pub size: u32,
    /// Offset in the packet data, in bytes
    pub pos: u32,
    /// True if the field is marked as hidden by the dissector
    pub hide: bool,
}

impl Field {
    pub fn new<S: Into<String>>(name: S, show: S, value: S) -> Field {
        Field {
            name: name.into(),
            show: Some(show.into()),
            value: Some(value.into()),
            ..Field::default()
        }
    }

    pub fn from_element(elt: &XmlElement) -> Field {
        let owned = |key| elt.attr(key).map(str::to_owned);
        Field {
            name: elt.attr("name").unwrap_or_default().to_owned(),
            show: owned("show"),
            showname: owned("showname"),
            value: owned("value"),
            size: parse_u32(elt.attr("size")),
            pos: parse_u32(elt.attr("pos")),
            hide: elt.attr("hide") == Some("yes"),
        }
    }

    /// The value as shown by the dissector
    ///
    /// Uses the `show` attribute, then `value`, then the value part of `showname`.
    pub fn show(&self) -> &str {
        self.show
            .as_deref()
            .or(self.value.as_deref())
            .unwrap_or_else(|| self.showname_value())
    }

    /// The raw value (usually hex-encoded bytes), or the shown value if no raw value exists
    pub fn raw_value(&self) -> &str {
        match self.value.as_deref() {
            Some(v) => v,
            None => self.show(),
        }
    }

    /// Returns the raw or the shown value
    pub fn get_value(&self, raw: bool) -> &str {
        if raw {
            self.raw_value()
        } else {
            self.show()
        }
    }

    /// The full display line, for ex `Source: aa:bb:cc:dd:ee:ff`
    pub fn showname(&self) -> &str {
        match self.showname.as_deref() {
            Some(s) => s,
            None => self.show.as_deref().unwrap_or_default(),
        }
    }

    /// The part of `showname` before the first `": "`
    pub fn showname_key(&self) -> &str {
        let showname = self.showname.as_deref().unwrap_or_default();
        match showname.split_once(": ") {
            Some((key, _)) => key,
            None => showname,
        }
    }

    /// The part of `showname` after the first `": "`
    pub fn showname_value(&self) -> &str {
        let showname = self.showname.as_deref().unwrap_or_default();
        match showname.split_once(": ") {
            Some((_, value)) => value,
            None => showname,
        }
    }

    /// Decode the raw value as hex bytes
    ///
    /// Returns `None` if the raw value is absent or is not an even-length hex string.
    pub fn binary_value(&self) -> Option<Vec<u8>> {
        hex::decode(self.value.as_deref()?).ok()
    }
}

fn parse_u32(s: Option<&str>) -> u32 {
    s.and_then(|s| s.parse().ok()).unwrap_or(0)
}
