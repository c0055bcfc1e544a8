//! File signature matching for recovered byte streams.
//!
//! A [`SignatureTable`] is an ordered list of magic prefixes. The first entry
//! whose magic starts the buffer wins; buffers shorter than a magic never
//! match it.

/// A known file type, recognised by its leading bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature
{
    name: &'static str,
    magic: &'static [u8],
    extension: &'static str,
}

impl Signature
{
    /// Creates a signature. `extension` includes the leading dot.
    #[must_use]
    pub const fn new(
        name: &'static str,
        magic: &'static [u8],
        extension: &'static str,
    ) -> Self
    {
        Self {
            name,
            magic,
            extension,
        }
    }

    /// Human readable type name, e.g. `"JPEG"`.
    #[must_use]
    pub const fn name(&self) -> &'static str
    {
        self.name
    }

    /// Extension appended to recovered files, e.g. `".jpg"`.
    #[must_use]
    pub const fn extension(&self) -> &'static str
    {
        self.extension
    }

    /// Whether `bytes` starts with this signature's magic.
    #[must_use]
    pub fn matches(&self, bytes: &[u8]) -> bool
    {
        bytes.starts_with(self.magic)
    }
}

/// Signatures recognised out of the box, in matching order.
pub const DEFAULT_SIGNATURES: [Signature; 5] = [
    Signature::new("JPEG", &[0xFF, 0xD8, 0xFF], ".jpg"),
    Signature::new("BMP", &[0x42, 0x4D], ".bmp"),
    Signature::new(
        "DOCX",
        &[0x50, 0x4B, 0x03, 0x04, 0x14, 0x00, 0x06, 0x00],
        ".docx",
    ),
    Signature::new("PDF", &[0x25, 0x50, 0x44, 0x46], ".pdf"),
    Signature::new("MP3", &[0x49, 0x44, 0x33], ".mp3"),
];

/// Ordered, read-only collection of signatures.
///
/// Built once and handed to whatever needs to classify buffers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureTable
{
    signatures: Vec<Signature>,
}

impl SignatureTable
{
    /// Creates a table that tries `signatures` in the given order.
    #[must_use]
    pub fn new(signatures: impl Into<Vec<Signature>>) -> Self
    {
        Self {
            signatures: signatures.into(),
        }
    }

    /// Returns the first signature whose magic prefixes `bytes`.
    #[must_use]
    pub fn detect(&self, bytes: &[u8]) -> Option<&Signature>
    {
        self.signatures
            .iter()
            .find(|signature| signature.matches(bytes))
    }
}

impl Default for SignatureTable
{
    fn default() -> Self
    {
        Self::new(DEFAULT_SIGNATURES)
    }
}
