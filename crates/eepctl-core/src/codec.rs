//! Schema-driven field access
//!
//! [`FieldCodec`] translates named field reads and writes into string
//! operations on an [`Image`]. Every field is stored as a fixed-width
//! NUL-padded string of `size + 1` bytes at `base_offset + offset`.
//!
//! Two behaviours are kept on purpose and pinned by tests:
//!
//! - a value of `size + 1` bytes or more is cut to `size + 1` bytes, which
//!   leaves the field without a terminator
//! - reads are not bounded by the field size; they scan until a NUL, an
//!   erased byte or the end of the image, so an unterminated field runs into
//!   whatever follows it

use crate::error::{Error, Result};
use crate::image::Image;
use crate::schema::{FieldDescriptor, Schema};

/// Named field view over an image
#[derive(Debug)]
pub struct FieldCodec<'a> {
    schema: Schema,
    image: &'a mut Image,
}

impl<'a> FieldCodec<'a> {
    /// Bind `schema` to `image`
    pub fn new(schema: Schema, image: &'a mut Image) -> Self {
        Self { schema, image }
    }

    /// The layout this codec was built from
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The bound image
    pub fn image(&self) -> &Image {
        &*self.image
    }

    /// The bound image, mutable (for reload/save)
    pub fn image_mut(&mut self) -> &mut Image {
        &mut *self.image
    }

    /// Declared field names in sorted order
    pub fn field_names(&self) -> Vec<&str> {
        self.schema.field_names()
    }

    fn descriptor(&self, name: &str) -> Result<&FieldDescriptor> {
        self.schema.field(name).ok_or_else(|| Error::UnknownField {
            name: name.to_string(),
        })
    }

    fn absolute(&self, offset: u32) -> usize {
        self.schema.base_offset as usize + offset as usize
    }

    /// Decode the current value of a field
    pub fn get_field(&self, name: &str) -> Result<String> {
        let field = self.descriptor(name)?;
        Ok(self.image.read_string(self.absolute(field.offset), None))
    }

    /// Encode `value` into a field
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        let field = self.descriptor(name)?;
        let offset = self.absolute(field.offset);
        let width = field.size as usize + 1;

        if value.len() >= width {
            log::warn!(
                "Value for '{}' is {} bytes, truncated to {} without terminator",
                name,
                value.len(),
                width
            );
        }

        log::debug!("Setting {} at 0x{:X} = {:?}", name, offset, value);
        self.image.write_string(offset, value, Some(width));
        Ok(())
    }

    /// Write the schema default into every field that declares one
    pub fn init_defaults(&mut self) -> Result<()> {
        let defaults: Vec<(String, String)> = self
            .schema
            .fields
            .iter()
            .filter_map(|(name, field)| {
                field
                    .default_value
                    .as_ref()
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect();

        for (name, value) in &defaults {
            self.set_field(name, value)?;
        }
        log::info!("Initialized {} field(s) with defaults", defaults.len());
        Ok(())
    }

    /// Erase the schema block
    pub fn erase_block(&mut self) {
        let offset = self.absolute(self.schema.block.offset);
        let size = self.schema.block.size as usize;
        self.image.erase_range(offset, size);
    }

    /// Erase the whole image
    pub fn erase_all(&mut self) {
        let size = self.image.size();
        self.image.erase_range(0, size);
    }

    /// Apply a batch of `(name, value)` assignments
    ///
    /// Every name is looked up before the first write; on an unknown name
    /// the image is left untouched.
    pub fn apply_assignments<S: AsRef<str>>(&mut self, assignments: &[(S, S)]) -> Result<()> {
        for (name, _) in assignments {
            self.descriptor(name.as_ref())?;
        }
        for (name, value) in assignments {
            self.set_field(name.as_ref(), value.as_ref())?;
        }
        Ok(())
    }

    /// Snapshot the layout with every field's value replaced by its live
    /// content
    ///
    /// The block keeps its declared value.
    pub fn export_state(&self) -> Result<Schema> {
        let mut state = self.schema.clone();
        for (name, field) in state.fields.iter_mut() {
            field.default_value = Some(self.get_field(name)?);
        }
        Ok(state)
    }

    /// [`export_state`](Self::export_state) rendered as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        self.export_state()?.to_json_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ERASED_BYTE;
    use crate::schema::SchemaDocument;

    const LAYOUT: &str = r#"
{
    "SysEeprom": {
        "base_offset": 16,
        "block": { "descr": "System info", "value": null, "offset": 0, "size": 32 },
        "fields": {
            "serial": { "descr": "Serial Number", "value": "SN0000", "offset": 0, "size": 7 },
            "model": { "descr": "Model Name", "value": null, "offset": 8, "size": 7 },
            "rev": { "descr": "Revision", "value": "A1", "offset": 16, "size": 3 }
        }
    }
}
"#;

    fn schema() -> Schema {
        SchemaDocument::from_json_str(LAYOUT)
            .unwrap()
            .select(None)
            .unwrap()
    }

    #[test]
    fn test_set_get_roundtrip() {
        let mut image = Image::new("unused.bin", 64);
        let mut codec = FieldCodec::new(schema(), &mut image);

        codec.set_field("serial", "X").unwrap();
        codec.set_field("model", "ABC1234").unwrap();
        assert_eq!(codec.get_field("serial").unwrap(), "X");
        assert_eq!(codec.get_field("model").unwrap(), "ABC1234");

        // base_offset 16 + offset 8, width 8
        assert_eq!(&image.as_bytes()[24..32], b"ABC1234\0");
        assert_eq!(&image.as_bytes()[16..24], b"X\0\0\0\0\0\0\0");
    }

    #[test]
    fn test_non_ascii_roundtrip() {
        let mut image = Image::new("unused.bin", 64);
        let mut codec = FieldCodec::new(schema(), &mut image);

        codec.set_field("serial", "café").unwrap();
        assert_eq!(codec.get_field("serial").unwrap(), "café");
        assert_eq!(&codec.image().as_bytes()[16..22], b"caf\xc3\xa9\0");

        let state = codec.export_state().unwrap();
        assert_eq!(state.fields["serial"].default_value.as_deref(), Some("café"));
    }

    #[test]
    fn test_unknown_field() {
        let mut image = Image::new("unused.bin", 64);
        let mut codec = FieldCodec::new(schema(), &mut image);

        assert!(matches!(
            codec.get_field("foo"),
            Err(Error::UnknownField { ref name }) if name == "foo"
        ));
        assert!(codec.set_field("foo", "bar").is_err());
        assert!(image.as_bytes().iter().all(|&b| b == ERASED_BYTE));
    }

    #[test]
    fn test_overlong_value_has_no_terminator() {
        let mut image = Image::new("unused.bin", 64);
        let mut codec = FieldCodec::new(schema(), &mut image);

        codec.set_field("model", "M").unwrap();
        codec.set_field("serial", "0123456789").unwrap();

        // Exactly size + 1 bytes are stored, the last one is not NUL
        assert_eq!(&codec.image().as_bytes()[16..24], b"01234567");
        // The unbounded read continues into the model field
        assert_eq!(codec.get_field("serial").unwrap(), "01234567M");
    }

    #[test]
    fn test_value_of_width_has_no_terminator() {
        let mut image = Image::new("unused.bin", 64);
        let mut codec = FieldCodec::new(schema(), &mut image);

        codec.set_field("model", "M").unwrap();
        // size 7, so eight bytes fill the whole width
        codec.set_field("serial", "01234567").unwrap();

        let bytes = codec.image().as_bytes();
        assert_eq!(&bytes[16..24], b"01234567");
        assert!(!bytes[16..24].contains(&0x00));
        assert_eq!(codec.get_field("serial").unwrap(), "01234567M");
    }

    #[test]
    fn test_value_of_exact_size_keeps_terminator() {
        let mut image = Image::new("unused.bin", 64);
        let mut codec = FieldCodec::new(schema(), &mut image);

        codec.set_field("rev", "B22").unwrap();
        assert_eq!(&codec.image().as_bytes()[32..36], b"B22\0");
        assert_eq!(codec.get_field("rev").unwrap(), "B22");
    }

    #[test]
    fn test_init_defaults_skips_absent() {
        let mut image = Image::new("unused.bin", 64);
        image.write_string(24, "KEEP", None);

        let mut codec = FieldCodec::new(schema(), &mut image);
        codec.init_defaults().unwrap();

        assert_eq!(codec.get_field("serial").unwrap(), "SN0000");
        assert_eq!(codec.get_field("rev").unwrap(), "A1");
        assert_eq!(codec.get_field("model").unwrap(), "KEEP");
    }

    #[test]
    fn test_erase_block() {
        let mut image = Image::from_bytes("unused.bin", &[0u8; 64]);
        let mut codec = FieldCodec::new(schema(), &mut image);
        codec.erase_block();

        let bytes = image.as_bytes();
        assert!(bytes[..16].iter().all(|&b| b == 0));
        assert!(bytes[16..48].iter().all(|&b| b == ERASED_BYTE));
        assert!(bytes[48..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_erase_huge_block() {
        let mut image = Image::from_bytes("unused.bin", &[0u8; 256]);
        let mut schema = schema();
        schema.block.size = u32::MAX;
        let mut codec = FieldCodec::new(schema, &mut image);
        codec.erase_block();

        let bytes = image.as_bytes();
        assert_eq!(bytes.len(), 256);
        assert!(bytes[..16].iter().all(|&b| b == 0));
        assert!(bytes[16..].iter().all(|&b| b == ERASED_BYTE));
    }

    #[test]
    fn test_erase_all() {
        let mut image = Image::from_bytes("unused.bin", &[0u8; 16]);
        let schema = Schema {
            base_offset: 0,
            fields: Default::default(),
            block: FieldDescriptor {
                description: String::new(),
                default_value: None,
                offset: 0,
                size: 4,
            },
        };
        let mut codec = FieldCodec::new(schema, &mut image);
        codec.erase_all();

        assert!(image.as_bytes().iter().all(|&b| b == ERASED_BYTE));
        let dump = image.dump();
        let first_row = dump.lines().nth(1).unwrap();
        assert_eq!(first_row.split_whitespace().nth(1), Some("ff"));
    }

    #[test]
    fn test_fields_outside_image_are_ignored() {
        let mut image = Image::new("unused.bin", 20);
        let mut codec = FieldCodec::new(schema(), &mut image);

        // model lives at 24..32, past the end of a 20 byte image
        codec.set_field("model", "ABC").unwrap();
        assert_eq!(codec.get_field("model").unwrap(), "");

        // serial straddles the end and is cut short
        codec.set_field("serial", "ABCDEF").unwrap();
        assert_eq!(codec.get_field("serial").unwrap(), "ABCD");
    }

    #[test]
    fn test_apply_assignments_is_all_or_nothing() {
        let mut image = Image::new("unused.bin", 64);
        let mut codec = FieldCodec::new(schema(), &mut image);

        let batch = [("serial", "S1"), ("foo", "bar"), ("rev", "C")];
        assert!(codec.apply_assignments(&batch).is_err());
        assert!(codec.image().as_bytes().iter().all(|&b| b == ERASED_BYTE));

        let batch = [("serial", "S1"), ("rev", "C")];
        codec.apply_assignments(&batch).unwrap();
        assert_eq!(codec.get_field("serial").unwrap(), "S1");
        assert_eq!(codec.get_field("rev").unwrap(), "C");
    }

    #[test]
    fn test_export_reflects_live_values() {
        let mut image = Image::new("unused.bin", 64);
        let mut codec = FieldCodec::new(schema(), &mut image);
        codec.set_field("serial", "42").unwrap();

        let state = codec.export_state().unwrap();
        assert_eq!(state.fields["serial"].default_value.as_deref(), Some("42"));
        assert_eq!(state.fields["model"].default_value.as_deref(), Some(""));
        assert_eq!(state.base_offset, 16);
        assert_eq!(state.block, codec.schema().block);

        // The layout's declared default is unchanged
        assert_eq!(
            codec.schema().fields["serial"].default_value.as_deref(),
            Some("SN0000")
        );

        let json: serde_json::Value = serde_json::from_str(&codec.to_json().unwrap()).unwrap();
        assert_eq!(json["fields"]["serial"]["value"], "42");
        assert_eq!(json["fields"]["serial"]["descr"], "Serial Number");
        assert_eq!(json["fields"]["serial"]["size"], 7);
        assert_eq!(json["block"]["value"], serde_json::Value::Null);
    }
}
