//! Write commands: init, update

use eepctl_core::FieldCodec;

use super::{CommandError, Result};
use crate::confirm::{Confirm, PROMPT};

/// Write the schema defaults into a fresh image and save it
///
/// The image is not reloaded: fields without a default stay erased.
/// Returns false when the user declined.
pub fn cmd_init(codec: &mut FieldCodec<'_>, confirm: &mut dyn Confirm) -> Result<bool> {
    if !confirm.confirm(PROMPT)? {
        log::info!("Init cancelled");
        return Ok(false);
    }

    codec.init_defaults()?;
    codec.image().save()?;
    Ok(true)
}

/// Split a `<field>=<value>` argument
///
/// The argument must contain exactly one `=`; the value may be empty.
pub fn parse_assignment(arg: &str) -> Result<(&str, &str)> {
    let mut parts = arg.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(value), None) => Ok((name, value)),
        _ => Err(CommandError::Usage(arg.to_string())),
    }
}

/// Reload the image, apply `<field>=<value>` assignments and save
///
/// Every argument is parsed and every name checked before the first write;
/// on any error nothing is written or saved.
pub fn cmd_update(codec: &mut FieldCodec<'_>, args: &[String]) -> Result<()> {
    codec.image_mut().reload()?;

    let assignments = args
        .iter()
        .map(|arg| parse_assignment(arg))
        .collect::<Result<Vec<_>>>()?;

    if let Err(err) = codec.apply_assignments(&assignments) {
        return Err(match err {
            eepctl_core::Error::UnknownField { name } => CommandError::UnknownField {
                name,
                available: codec.field_names().into_iter().map(String::from).collect(),
            },
            other => other.into(),
        });
    }
    codec.image().save()?;

    log::info!(
        "Updated {} field(s) in {}",
        assignments.len(),
        codec.image().path().display()
    );
    Ok(())
}
