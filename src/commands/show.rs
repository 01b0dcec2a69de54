//! Read-only commands: show, dump, json

use eepctl_core::FieldCodec;

use super::Result;

/// Format every field as `description: value`, in offset order
pub fn format_fields(codec: &FieldCodec<'_>) -> Result<String> {
    let mut out = String::new();
    for (name, field) in codec.schema().fields_by_offset() {
        let value = codec.get_field(name)?;
        out.push_str(&format!("{:<16}: {}\n", field.description, value));
    }
    Ok(out)
}

/// Reload the image and print the decoded fields
pub fn cmd_show(codec: &mut FieldCodec<'_>) -> Result<()> {
    codec.image_mut().reload()?;
    print!("{}", format_fields(codec)?);
    Ok(())
}

/// Reload the image and print its hex dump
pub fn cmd_dump(codec: &mut FieldCodec<'_>) -> Result<()> {
    codec.image_mut().reload()?;
    print!("{}", codec.image().dump());
    Ok(())
}

/// Reload the image and print the exported state as JSON
pub fn cmd_json(codec: &mut FieldCodec<'_>) -> Result<()> {
    codec.image_mut().reload()?;
    println!("{}", codec.to_json()?);
    Ok(())
}
