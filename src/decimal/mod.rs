/*!
Decimal conversion: formatting and parsing.

Formatting uses Grisu3 for native IEEE 754 `f32`/`f64` (shortest
round-trip digits with cached powers of ten) and falls back to a
Dragon4-style big-integer digit generator, which also serves the
arbitrary-precision formats (cascades, `ereal`, wide cfloats).

Parsing accepts decimal scientific notation
`[sign] digits [.digits] [eE [sign] digits]`. The decimal exponent is
applied with an exact integer power of ten and one round-to-odd
division, so no double-precision contamination reaches the target
format's final rounding.

The round-trip contract: for every finite value `v` of any format,
`parse(format(v, precision = max))` reproduces `v` bit for bit.
*/

mod dragon;
mod grisu;
mod parse;

pub use dragon::format_rfloat;
pub use grisu::{format_f32_shortest, format_f64_shortest};
pub use parse::parse_rfloat;

/// Horizontal placement of a padded value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// Formatting controls shared by every number system.
///
/// A plain options struct passed by reference, mirroring the usual
/// stream-formatting flags: significant-digit precision, minimum
/// width with fill and alignment, fixed or scientific layout, forced
/// sign, and uppercase exponent markers.
#[derive(Clone, Debug)]
pub struct FormatOptions {
    pub(crate) precision: Option<usize>,
    pub(crate) width: Option<usize>,
    pub(crate) scientific: bool,
    pub(crate) show_sign: bool,
    pub(crate) uppercase: bool,
    pub(crate) fill: char,
    pub(crate) align: Alignment,
}

impl FormatOptions {
    /// Default options: shortest layout choice, no padding.
    pub fn new() -> Self {
        Self {
            precision: None,
            width: None,
            scientific: false,
            show_sign: false,
            uppercase: false,
            fill: ' ',
            align: Alignment::Right,
        }
    }

    /// Sets the number of significant decimal digits.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision.max(1));
        self
    }

    /// Sets a minimum field width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Selects scientific (`d.dde±k`) layout.
    pub fn with_scientific(mut self, enable: bool) -> Self {
        self.scientific = enable;
        self
    }

    /// Forces a sign on non-negative values.
    pub fn with_sign(mut self, enable: bool) -> Self {
        self.show_sign = enable;
        self
    }

    /// Uppercases the exponent marker and special values.
    pub fn with_uppercase(mut self, enable: bool) -> Self {
        self.uppercase = enable;
        self
    }

    /// Sets the fill character used for padding.
    pub fn with_fill(mut self, fill: char) -> Self {
        self.fill = fill;
        self
    }

    /// Sets the alignment within a padded field.
    pub fn with_alignment(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    // applies width/fill/alignment to a finished rendering
    pub(crate) fn pad(&self, s: String) -> String {
        let Some(width) = self.width else {
            return s;
        };
        let len = s.chars().count();
        if len >= width {
            return s;
        }
        let missing = width - len;
        let fill: String = std::iter::repeat(self.fill).take(missing).collect();
        match self.align {
            Alignment::Left => format!("{}{}", s, fill),
            Alignment::Right => format!("{}{}", fill, s),
            Alignment::Center => {
                let left = missing / 2;
                let lf: String = std::iter::repeat(self.fill).take(left).collect();
                let rf: String = std::iter::repeat(self.fill).take(missing - left).collect();
                format!("{}{}{}", lf, s, rf)
            }
        }
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::new()
    }
}
