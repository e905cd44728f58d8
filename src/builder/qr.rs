use crate::common::bit_utils::BitStream;
use crate::common::iter::PlacementIter;
use crate::common::mask::MaskPattern;
use crate::common::metadata::{
    format_info, format_info_coords, version_info, version_info_coords, Color, ECLevel, Version,
    FORMAT_INFO_BIT_LEN, VERSION_INFO_BIT_LEN,
};

// Module
//------------------------------------------------------------------------------

// A cell of the symbol. Function modules cover the fixed patterns and the
// format/version info; only data modules are subject to masking.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Data(Color),
}

impl Module {
    pub fn color(self) -> Color {
        match self {
            Module::Empty => Color::Dark,
            Module::Func(clr) | Module::Data(clr) => clr,
        }
    }

    fn is_empty(self) -> bool {
        self == Module::Empty
    }
}

// Symbol grid
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct QR {
    version: Version,
    width: usize,
    ec_level: ECLevel,
    grid: Vec<Module>,
}

impl QR {
    pub fn new(version: Version, ec_level: ECLevel) -> Self {
        debug_assert!((1..=40).contains(&*version), "Invalid version");

        let width = version.width();
        Self { version, width, ec_level, grid: vec![Module::Empty; width * width] }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ec_level
    }

    pub fn module(&self, r: usize, c: usize) -> Module {
        debug_assert!(r < self.width && c < self.width, "({r}, {c}) out of grid");
        self.grid[r * self.width + c]
    }

    pub fn color_at(&self, r: usize, c: usize) -> Color {
        self.module(r, c).color()
    }

    pub(crate) fn put(&mut self, r: usize, c: usize, module: Module) {
        debug_assert!(r < self.width && c < self.width, "({r}, {c}) out of grid");
        self.grid[r * self.width + c] = module;
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|m| m.color() == Color::Dark).count()
    }
}

// Function patterns
//------------------------------------------------------------------------------

impl QR {
    fn fill_rect(&mut self, top: usize, left: usize, height: usize, width: usize, clr: Color) {
        for r in top..top + height {
            for c in left..left + width {
                self.put(r, c, Module::Func(clr));
            }
        }
    }

    pub fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_patterns();
        self.draw_alignment_patterns();
    }

    // Three concentric squares per corner, with light separator strips
    // completing each 8x8 keep-out.
    fn draw_finder_patterns(&mut self) {
        let w = self.width;
        for (top, left) in [(0, 0), (0, w - 7), (w - 7, 0)] {
            self.fill_rect(top, left, 7, 7, Color::Dark);
            self.fill_rect(top + 1, left + 1, 5, 5, Color::Light);
            self.fill_rect(top + 2, left + 2, 3, 3, Color::Dark);
        }
        self.fill_rect(7, 0, 1, 8, Color::Light);
        self.fill_rect(0, 7, 8, 1, Color::Light);
        self.fill_rect(7, w - 8, 1, 8, Color::Light);
        self.fill_rect(0, w - 8, 8, 1, Color::Light);
        self.fill_rect(w - 8, 0, 1, 8, Color::Light);
        self.fill_rect(w - 8, 7, 8, 1, Color::Light);
    }

    fn draw_timing_patterns(&mut self) {
        for i in 8..self.width - 8 {
            let clr = if i % 2 == 0 { Color::Dark } else { Color::Light };
            self.put(6, i, Module::Func(clr));
            self.put(i, 6, Module::Func(clr));
        }
    }

    // A dark center in a light ring in a dark 5x5 square, at every pair of
    // center coordinates except the three under the finders.
    fn draw_alignment_patterns(&mut self) {
        let centers = self.version.alignment_pattern();
        let last = self.width - 7;
        for &r in centers {
            for &c in centers {
                if (r == 6 && (c == 6 || c == last)) || (r == last && c == 6) {
                    continue;
                }
                self.fill_rect(r - 2, c - 2, 5, 5, Color::Dark);
                self.fill_rect(r - 1, c - 1, 3, 3, Color::Light);
                self.put(r, c, Module::Func(Color::Dark));
            }
        }
    }
}


// Format & version info
//------------------------------------------------------------------------------

impl QR {
    // Claims the info modules before data placement; apply_mask writes the
    // real format bits once the pattern is known.
    pub(crate) fn reserve_info_areas(&mut self) {
        self.draw_format_info(0);
        self.draw_version_info();
    }

    fn draw_format_info(&mut self, info: u32) {
        for bit in 0..FORMAT_INFO_BIT_LEN {
            let clr = if info >> bit & 1 == 1 { Color::Dark } else { Color::Light };
            for (r, c) in format_info_coords(bit, self.width) {
                self.put(r, c, Module::Func(clr));
            }
        }
        self.put(self.width - 8, 8, Module::Func(Color::Dark));
    }

    fn draw_version_info(&mut self) {
        if *self.version < 7 {
            return;
        }
        let info = version_info(self.version);
        for bit in 0..VERSION_INFO_BIT_LEN {
            let clr = if info >> bit & 1 == 1 { Color::Dark } else { Color::Light };
            for (r, c) in version_info_coords(bit, self.width) {
                self.put(r, c, Module::Func(clr));
            }
        }
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    pub fn draw_encoding_region(&mut self, payload: &BitStream) {
        self.reserve_info_areas();
        self.place_payload(payload);

        debug_assert!(!self.grid.contains(&Module::Empty), "Unfilled module after placement");
    }

    // Drops each payload bit, most significant first, into the next cell
    // the placement walk finds empty. The walk's leftover cells are the
    // remainder bits, always light.
    fn place_payload(&mut self, payload: &BitStream) {
        let mut walk = PlacementIter::new(self.version);
        for &codeword in payload.data() {
            for shift in (0..8).rev() {
                let clr = if (codeword >> shift) & 1 == 1 { Color::Dark } else { Color::Light };
                for (r, c) in walk.by_ref() {
                    if self.module(r, c).is_empty() {
                        self.put(r, c, Module::Data(clr));
                        break;
                    }
                }
            }
        }

        let mut remainder = 0;
        for (r, c) in walk {
            if self.module(r, c).is_empty() {
                self.put(r, c, Module::Data(Color::Light));
                remainder += 1;
            }
        }
        debug_assert!(
            matches!(
                (*self.version, remainder),
                (1, 0)
                    | (2..=6, 7)
                    | (7..=13, 0)
                    | (14..=20, 3)
                    | (21..=27, 4)
                    | (28..=34, 3)
                    | (35..=40, 0)
            ),
            "Unexpected remainder bit count {remainder} for version {:?}",
            self.version
        );
    }

    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        for r in 0..self.width {
            for c in 0..self.width {
                if let Module::Data(clr) = self.module(r, c) {
                    if pattern.is_set(r, c) {
                        self.put(r, c, Module::Data(!clr));
                    }
                }
            }
        }
        self.draw_format_info(format_info(self.ec_level, pattern));
    }
}


// Output
//------------------------------------------------------------------------------

impl QR {
    // Collapses the grid to 1 for dark and 0 for light modules.
    pub fn bit_matrix(&self) -> Vec<Vec<u8>> {
        debug_assert!(!self.grid.contains(&Module::Empty), "Unfilled module in output");

        self.grid
            .chunks(self.width)
            .map(|row| row.iter().map(|m| (m.color() == Color::Dark) as u8).collect())
            .collect()
    }

    // Text preview with the 4 module quiet zone, light rendered as a full
    // block so the symbol reads correctly on dark terminals.
    pub fn to_str(&self, module_size: usize) -> String {
        let quiet = 4;
        let cells = self.width + 2 * quiet;
        let mut out = String::new();
        for r in 0..cells {
            let mut line = String::with_capacity(cells * module_size);
            for c in 0..cells {
                let span = quiet..quiet + self.width;
                let dark = span.contains(&r)
                    && span.contains(&c)
                    && self.color_at(r - quiet, c - quiet) == Color::Dark;
                let glyph = if dark { ' ' } else { '█' };
                for _ in 0..module_size {
                    line.push(glyph);
                }
            }
            line.push('\n');
            for _ in 0..module_size {
                out.push_str(&line);
            }
        }
        out
    }
}
