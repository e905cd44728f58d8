use crate::common::metadata::Version;

// Placement order of the encoding region
//------------------------------------------------------------------------------

// Walks the symbol in two module wide column pairs, starting at the bottom
// right corner, snaking upward and downward toward the left edge. Column 6
// holds the vertical timing pattern, so the pairs hop straight over it.
pub struct PlacementIter {
    width: usize,
    // Right column of the active pair
    col: usize,
    row: usize,
    // 0 emits the right half of the pair, 1 the left
    offset: usize,
    upward: bool,
    done: bool,
}

impl PlacementIter {
    pub fn new(version: Version) -> Self {
        let width = version.width();
        Self { width, col: width - 1, row: width - 1, offset: 0, upward: true, done: false }
    }
}

impl Iterator for PlacementIter {
    type Item = (usize, usize);
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let res = (self.row, self.col - self.offset);
        if self.offset == 0 {
            self.offset = 1;
            return Some(res);
        }
        self.offset = 0;

        let at_edge = if self.upward { self.row == 0 } else { self.row == self.width - 1 };
        if !at_edge {
            if self.upward {
                self.row -= 1;
            } else {
                self.row += 1;
            }
            return Some(res);
        }

        // The pair is exhausted: turn around and shift left, hopping over
        // the timing column.
        self.upward = !self.upward;
        if self.col == 8 {
            self.col = 5;
        } else if self.col < 2 {
            self.done = true;
        } else {
            self.col -= 2;
        }
        Some(res)
    }
}
