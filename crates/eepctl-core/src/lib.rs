//! eepctl-core - Core library for EEPROM image editing
//!
//! This crate provides the building blocks for inspecting and programming a
//! fixed-size EEPROM image from a host:
//!
//! - [`image::Image`] - a bounds-checked byte buffer mirrored to a file
//! - [`schema::Schema`] - the field layout loaded from a JSON or TOML document
//! - [`codec::FieldCodec`] - named field access on top of an image
//!
//! # Example
//!
//! ```ignore
//! use eepctl_core::{FieldCodec, Image, SchemaDocument};
//!
//! let doc = SchemaDocument::from_file("eeprom.json")?;
//! let schema = doc.select(Some("SysEeprom"))?;
//! let mut image = Image::new("syseeprom.bin", 256);
//! image.reload()?;
//!
//! let mut codec = FieldCodec::new(schema, &mut image);
//! codec.set_field("serial", "SN0001")?;
//! codec.image_mut().save()?;
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod codec;
pub mod error;
pub mod image;
pub mod schema;

pub use codec::FieldCodec;
pub use error::{Error, Result};
pub use image::{Image, DEFAULT_IMAGE_SIZE, ERASED_BYTE};
pub use schema::{BlockDescriptor, FieldDescriptor, Schema, SchemaDocument};
