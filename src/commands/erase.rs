//! Erase command implementation

use eepctl_core::FieldCodec;

use super::Result;
use crate::confirm::{Confirm, PROMPT};

/// Erase the image (or just the schema block) and save it
///
/// A whole-image erase starts from scratch and does not read the file; a
/// block erase reloads first so bytes outside the block survive. Returns
/// false when the user declined.
pub fn cmd_erase(
    codec: &mut FieldCodec<'_>,
    confirm: &mut dyn Confirm,
    block_only: bool,
) -> Result<bool> {
    if !confirm.confirm(PROMPT)? {
        log::info!("Erase cancelled");
        return Ok(false);
    }

    if block_only {
        codec.image_mut().reload()?;
        codec.erase_block();
        let block = &codec.schema().block;
        log::info!(
            "Erased block '{}' ({} bytes at 0x{:X})",
            block.description,
            block.size,
            codec.schema().base_offset as usize + block.offset as usize
        );
    } else {
        codec.erase_all();
        log::info!("Erased {} bytes", codec.image().size());
    }

    codec.image().save()?;
    Ok(true)
}
