//! Compound fields shared by several trunking messages.

/// Service options carried with voice requests and grants.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ServiceOptions {
    pub emergency: bool,
    /// Whether the call is encrypted.
    pub encrypted: bool,
    pub duplex: bool,
    /// Whether the call is packet rather than circuit switched.
    pub packet: bool,
    /// Priority level (3 bits).
    pub priority: u8,
}

impl ServiceOptions {
    /// Parse service options from the given byte.
    pub fn from_bits(opts: u8) -> ServiceOptions {
        ServiceOptions {
            emergency: opts >> 7 == 1,
            encrypted: opts >> 6 & 1 == 1,
            duplex: opts >> 5 & 1 == 1,
            packet: opts >> 4 & 1 == 1,
            priority: opts & 0x7,
        }
    }

    /// Pack the options into a byte.
    pub fn to_bits(&self) -> u8 {
        assert!(self.priority >> 3 == 0);

        (self.emergency as u8) << 7 | (self.encrypted as u8) << 6 |
            (self.duplex as u8) << 5 | (self.packet as u8) << 4 | self.priority
    }
}

/// Uniquely identifies a channel within a site.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Channel {
    /// Channel ID whose parameters to use (4 bits).
    pub id: u8,
    /// Individual channel number within the channel ID (12 bits).
    pub number: u16,
}

impl Channel {
    /// Construct a new `Channel` with the given ID and number.
    pub fn new(id: u8, number: u16) -> Channel {
        assert!(id >> 4 == 0);
        assert!(number >> 12 == 0);

        Channel { id, number }
    }

    /// Parse a channel from the given 16 bits.
    pub fn from_bits(bits: u16) -> Channel {
        Channel {
            id: (bits >> 12) as u8,
            number: bits & 0xFFF,
        }
    }

    /// Pack the channel into 16 bits.
    pub fn to_bits(&self) -> u16 {
        (self.id as u16) << 12 | self.number
    }

    /// Copy of this channel with an unset (zero) ID replaced by the given one.
    pub fn with_default_id(&self, id: u8) -> Channel {
        if self.id == 0 {
            Channel::new(id, self.number)
        } else {
            *self
        }
    }
}

/// Services a site advertises or supports.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SystemServices(pub u8);

impl SystemServices {
    pub fn is_composite(&self) -> bool { self.0 & 0x01 != 0 }
    pub fn has_updates(&self) -> bool { self.0 & 0x02 != 0 }
    pub fn is_backup(&self) -> bool { self.0 & 0x04 != 0 }
    pub fn has_data(&self) -> bool { self.0 & 0x10 != 0 }
    pub fn has_voice(&self) -> bool { self.0 & 0x20 != 0 }
    pub fn has_registration(&self) -> bool { self.0 & 0x40 != 0 }
    pub fn has_auth(&self) -> bool { self.0 & 0x80 != 0 }
}

/// Status options of an adjacent site (4 bits).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SiteOptions(u8);

impl SiteOptions {
    /// Create a new `SiteOptions` from the given 4-bit word.
    pub fn new(opts: u8) -> SiteOptions {
        assert!(opts >> 4 == 0);
        SiteOptions(opts)
    }

    /// Raw 4-bit word.
    pub fn bits(&self) -> u8 { self.0 }

    /// Whether site is "conventional", with no trunking.
    pub fn conventional(&self) -> bool { self.0 & 0b1000 != 0 }
    /// Whether site is in a failure state.
    pub fn failing(&self) -> bool { self.0 & 0b100 != 0 }
    /// Whether this information is up-to-date (whether broadcasting site is in
    /// communication with adjacent site.)
    pub fn current(&self) -> bool { self.0 & 0b10 != 0 }
    /// Whether site has active network connection with RFSS controller and can
    /// communicate with other sites.
    pub fn networked(&self) -> bool { self.0 & 1 != 0 }
}
