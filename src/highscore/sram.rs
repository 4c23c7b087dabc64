// High score cartridge SRAM image
//
// The high score cartridge maps 2 KiB of battery-backed RAM at $1000. The
// image is persisted as base64 of the raw bytes, with no header or checksum.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use thiserror::Error;

/// Size of the SRAM image in bytes
pub const SRAM_SIZE: usize = 2048;

/// CPU address of the first SRAM byte
pub const SRAM_OFFSET: u16 = 0x1000;

/// First CPU address of the score tables
///
/// Writes below this address are bookkeeping the cartridge rewrites on every
/// boot and never trigger a save on their own.
pub const SRAM_SCORE_OFFSET: u16 = 0x113D;

/// Fixed-size SRAM image
pub type Sram = [u8; SRAM_SIZE];

/// Standard alphabet; padding optional and loose trailing bits accepted on
/// decode so hand-trimmed snippets load.
const SRAM_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Leading part of the empty score table snippet
const DEFAULT_TABLE_HEAD: &str = "AABog6pVnAILDgIACx0LBAADBBEBDgARAx8AAAAAAAAAAAAAAAAAABE";

/// Errors decoding a persisted SRAM image
#[derive(Debug, Error)]
pub enum SramError {
    /// Not valid base64
    #[error("Invalid SRAM encoding: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decodes to more bytes than the SRAM holds
    #[error("SRAM image is {len} bytes, expected at most {capacity}")]
    TooLarge { len: usize, capacity: usize },
}

/// Encoded empty score table for the cartridge's boot-time layout
fn default_table_snippet() -> String {
    let mut snippet = String::with_capacity(424);
    snippet.push_str(DEFAULT_TABLE_HEAD);
    snippet.push_str(&"A".repeat(183));
    snippet.push('B');
    snippet.push_str(&"/f39".repeat(45));
    snippet.push_str("/f38");
    snippet
}

/// Reset an SRAM image to the empty score table
///
/// Zero-fills the image and decodes the embedded table over its start.
pub fn generate_default(sram: &mut [u8]) {
    sram.fill(0);
    let decoded = decode_into(&default_table_snippet(), sram);
    debug_assert!(decoded.is_ok(), "embedded score table must decode");
}

/// A freshly generated default image
pub fn default_sram() -> Sram {
    let mut sram = [0u8; SRAM_SIZE];
    generate_default(&mut sram);
    sram
}

/// Encode an SRAM image for storage
pub fn encode(sram: &[u8]) -> String {
    SRAM_ENGINE.encode(sram)
}

/// Decode a stored image over the start of `sram`
///
/// ASCII whitespace is ignored. Bytes past the decoded length are left
/// untouched. On error `sram` is not modified.
///
/// # Returns
/// Number of bytes written
pub fn decode_into(encoded: &str, sram: &mut [u8]) -> Result<usize, SramError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = SRAM_ENGINE.decode(compact)?;

    if bytes.len() > sram.len() {
        return Err(SramError::TooLarge {
            len: bytes.len(),
            capacity: sram.len(),
        });
    }

    sram[..bytes.len()].copy_from_slice(&bytes);
    Ok(bytes.len())
}
