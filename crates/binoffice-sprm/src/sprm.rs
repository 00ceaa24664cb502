use std::fmt;

// Sprm bit layout. See [MS-DOC] 2.2.5.1 (Sprm).
const ISPMD_MASK: u16 = 0x01FF;
const F_SPEC: u16 = 0x0200;
const SGC_SHIFT: u16 = 10;
const SGC_MASK: u16 = 0x0007;
const SPRA_SHIFT: u16 = 13;

/// A single property modifier: a packed 16-bit operation code.
///
/// | bits  | field   | meaning                                |
/// |-------|---------|----------------------------------------|
/// | 0-8   | `ispmd` | operation index within its group       |
/// | 9     | `fSpec` | operation needs special handling       |
/// | 10-12 | `sgc`   | property group (paragraph, character…) |
/// | 13-15 | `spra`  | operand size class                     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sprm(pub u16);

/// Which property group a [`Sprm`] modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SprmScope {
    Paragraph,
    Character,
    Picture,
    Section,
    Table,
    /// `sgc` values that [MS-DOC] does not define.
    Unknown(u8),
}

impl SprmScope {
    pub const fn from_sgc(sgc: u8) -> Self {
        match sgc {
            1 => SprmScope::Paragraph,
            2 => SprmScope::Character,
            3 => SprmScope::Picture,
            4 => SprmScope::Section,
            5 => SprmScope::Table,
            other => SprmScope::Unknown(other),
        }
    }
}

/// Operand size class derived from `spra`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandSize {
    /// One byte holding a [`crate::ToggleOperand`].
    Toggle,
    Fixed(usize),
    /// Length-prefixed operand; the prefix is part of the operand bytes.
    Variable,
}

impl Sprm {
    pub const fn new(raw: u16) -> Self {
        Sprm(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    pub const fn ispmd(self) -> u16 {
        self.0 & ISPMD_MASK
    }

    pub const fn is_special(self) -> bool {
        self.0 & F_SPEC != 0
    }

    pub const fn sgc(self) -> u8 {
        ((self.0 >> SGC_SHIFT) & SGC_MASK) as u8
    }

    pub const fn spra(self) -> u8 {
        (self.0 >> SPRA_SHIFT) as u8
    }

    pub const fn scope(self) -> SprmScope {
        SprmScope::from_sgc(self.sgc())
    }

    pub const fn operand_size(self) -> OperandSize {
        match self.spra() {
            0 => OperandSize::Toggle,
            1 => OperandSize::Fixed(1),
            2 | 4 | 5 => OperandSize::Fixed(2),
            3 => OperandSize::Fixed(4),
            6 => OperandSize::Variable,
            _ => OperandSize::Fixed(3),
        }
    }

    /// Diagnostic name (e.g. `sprmCFBold`), if this crate knows the operation.
    pub fn name(self) -> Option<&'static str> {
        crate::names::sprm_name(self.0)
    }
}

impl From<u16> for Sprm {
    fn from(raw: u16) -> Self {
        Sprm(raw)
    }
}

impl fmt::Display for Sprm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "sprm({:#06X})", self.0),
        }
    }
}
