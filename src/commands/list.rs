//! Field listing

use eepctl_core::FieldCodec;

/// Format the declared field names as one comma-separated line
pub fn format_field_list(codec: &FieldCodec<'_>) -> String {
    format!("Available fields are: {}", codec.field_names().join(", "))
}

/// Print the declared field names
pub fn cmd_field(codec: &FieldCodec<'_>) {
    println!();
    println!("{}", format_field_list(codec));
}
