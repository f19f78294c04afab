bitflags::bitflags! {
    /// Style flag bitmask, the stable wire contract for markup and API
    /// consumers.
    ///
    /// Bit assignments are fixed: bit 0 italics, bit 1 bold, bit 2
    /// underline, bit 3 strikethrough, bit 4 url-present. Internally the
    /// crate works with [`TextStyle`]; the mask only appears at the
    /// boundary.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct StyleFlags: u32 {
        const ITALICS = 1 << 0;
        const BOLD = 1 << 1;
        const UNDERLINE = 1 << 2;
        const STRIKETHROUGH = 1 << 3;
        const URL = 1 << 4;
    }
}

/// Structured style record for a text run.
///
/// The flags are independent booleans; any combination is legal. Whether a
/// URL is attached lives on the element itself (`url: Option<String>`), not
/// here, so the record cannot disagree with the payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextStyle {
    pub italic: bool,
    pub bold: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

impl TextStyle {
    /// Decodes the wire bitmask. The URL bit is ignored here; callers pair
    /// it with the URL payload.
    pub fn from_flags(flags: StyleFlags) -> Self {
        Self {
            italic: flags.contains(StyleFlags::ITALICS),
            bold: flags.contains(StyleFlags::BOLD),
            underline: flags.contains(StyleFlags::UNDERLINE),
            strikethrough: flags.contains(StyleFlags::STRIKETHROUGH),
        }
    }

    /// Encodes the wire bitmask. `url_present` sets the URL bit.
    pub fn to_flags(self, url_present: bool) -> StyleFlags {
        let mut flags = StyleFlags::empty();
        flags.set(StyleFlags::ITALICS, self.italic);
        flags.set(StyleFlags::BOLD, self.bold);
        flags.set(StyleFlags::UNDERLINE, self.underline);
        flags.set(StyleFlags::STRIKETHROUGH, self.strikethrough);
        flags.set(StyleFlags::URL, url_present);
        flags
    }
}
