/// The flags control some attributes of the line. These are the values
/// passed in through `linedef_create`
pub enum LineDefFlags {
    /// Players and monsters cannot cross this line. Always set on lines
    /// which lack either side, since there is nothing to cross into
    Blocking = 1,
    /// The upper texture is pasted onto the wall from the top down instead of
    /// from the bottom up like usual
    DontPegTop = 1 << 1,
    /// Lower and middle textures are drawn from the bottom up, instead of
    /// from the top down like usual
    DontPegBottom = 1 << 2,
}

/// Flags the map compiler sets on lines for its own bookkeeping
pub enum LineInFlags {
    /// Line is part of a polyobj and is excluded from window detection
    Polyobj = 1,
}

pub enum SectorFlags {
    /// The partitioner found a gap in the sector's outline
    Unclosed = 1,
}

pub enum HEdgeFlags {
    /// Half-edge was created for a polyobj line rather than by the BSP
    Polyobj = 1,
}

#[cfg(test)]
mod tests {
    use super::LineDefFlags;

    #[test]
    fn check_flags_enum() {
        let flags = LineDefFlags::Blocking as u32 | LineDefFlags::DontPegBottom as u32;
        assert_eq!(flags & LineDefFlags::DontPegTop as u32, 0);
        assert_ne!(flags & LineDefFlags::DontPegBottom as u32, 0);
        assert_eq!(flags, 0b101);
    }
}
