use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use tracing::{instrument, trace};

use crate::error::BoardError;
use crate::types::{CellChange, Disk, Position, cell_symbol};

pub const BOARD_SIZE: usize = 8;
const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;
/// Flip-walk directions as `(dx, dy)`, clockwise from the upper left.
/// Flips are reported grouped in this order.
const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 0),
    (-1, 1),
];

/// Reversi board state represented by two bitboards, bit `y * 8 + x` per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    dark: u64,
    light: u64,
}

impl Board {
    /// Creates the opening board:
    /// (3,3)=light, (4,3)=dark, (3,4)=dark, (4,4)=light.
    pub fn new() -> Self {
        Self {
            dark: bit(28) | bit(35),
            light: bit(27) | bit(36),
        }
    }

    /// Creates a board without any disk.
    pub fn empty() -> Self {
        Self { dark: 0, light: 0 }
    }

    /// Returns the disk at `(x, y)`; off-board cells read as empty.
    pub fn disk_at(&self, x: usize, y: usize) -> Option<Disk> {
        if x >= BOARD_SIZE || y >= BOARD_SIZE {
            return None;
        }
        let square = bit(y * BOARD_SIZE + x);
        if self.dark & square != 0 {
            Some(Disk::Dark)
        } else if self.light & square != 0 {
            Some(Disk::Light)
        } else {
            None
        }
    }

    /// Clears every cell in row-major order, then puts the four opening disks.
    /// Returns the 68 changes in that order.
    pub fn reset(&mut self) -> Vec<CellChange> {
        let mut changes = Vec::with_capacity(NUM_SQUARES + 4);
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                self.set_disk(None, x, y, &mut changes);
            }
        }

        let half = BOARD_SIZE / 2;
        self.set_disk(Some(Disk::Light), half - 1, half - 1, &mut changes);
        self.set_disk(Some(Disk::Dark), half, half - 1, &mut changes);
        self.set_disk(Some(Disk::Dark), half - 1, half, &mut changes);
        self.set_disk(Some(Disk::Light), half, half, &mut changes);

        changes
    }

    /// Row-major matrix of cells.
    pub fn dump(&self) -> Vec<Vec<Option<Disk>>> {
        (0..BOARD_SIZE)
            .map(|y| (0..BOARD_SIZE).map(|x| self.disk_at(x, y)).collect())
            .collect()
    }

    /// Overwrites every cell from a [`Board::dump`] matrix.
    ///
    /// Only the shape is checked: 8 rows of 8 cells. The board is left
    /// untouched when the shape is wrong.
    pub fn restore(&mut self, dump: &[Vec<Option<Disk>>]) -> Result<Vec<CellChange>, BoardError> {
        if dump.len() != BOARD_SIZE || dump.iter().any(|row| row.len() != BOARD_SIZE) {
            return Err(BoardError::Restore {
                dump: dump.to_vec(),
            });
        }

        let mut changes = Vec::with_capacity(NUM_SQUARES);
        for (y, row) in dump.iter().enumerate() {
            for (x, disk) in row.iter().enumerate() {
                self.set_disk(*disk, x, y, &mut changes);
            }
        }
        Ok(changes)
    }

    pub fn count_disks(&self, side: Disk) -> usize {
        self.side_bits(side).count_ones() as usize
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> usize {
        NUM_SQUARES - (self.dark | self.light).count_ones() as usize
    }

    /// The side with strictly more disks; `None` on a tie.
    pub fn side_with_more_disks(&self) -> Option<Disk> {
        let dark = self.count_disks(Disk::Dark);
        let light = self.count_disks(Disk::Light);
        match dark.cmp(&light) {
            std::cmp::Ordering::Greater => Some(Disk::Dark),
            std::cmp::Ordering::Less => Some(Disk::Light),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Returns legal move mask for the given side.
    pub fn legal_moves(&self, side: Disk) -> u64 {
        let mut legal = 0u64;
        for pos in 0..NUM_SQUARES {
            let (x, y) = (pos % BOARD_SIZE, pos / BOARD_SIZE);
            if self.can_place_disk(side, x, y) {
                legal |= bit(pos);
            }
        }
        legal
    }

    /// A placement is legal when it flips at least one disk.
    pub fn can_place_disk(&self, disk: Disk, x: usize, y: usize) -> bool {
        !self.flipped_positions(disk, x, y).is_empty()
    }

    /// All legal cells for `side`, row-major.
    pub fn valid_moves(&self, side: Disk) -> Vec<Position> {
        let mut mask = self.legal_moves(side);
        let mut moves = Vec::new();
        while mask != 0 {
            let pos = mask.trailing_zeros() as usize;
            moves.push(Position::new(pos % BOARD_SIZE, pos / BOARD_SIZE));
            mask &= mask - 1;
        }
        moves
    }

    pub fn has_valid_moves(&self, side: Disk) -> bool {
        self.legal_moves(side) != 0
    }

    /// Places `disk` at `(x, y)` and flips the captured runs.
    ///
    /// The returned changes start with the placed cell, followed by the flips
    /// grouped per direction in walk order. An illegal move changes nothing.
    #[instrument(skip(self))]
    pub fn place_disk(&mut self, disk: Disk, x: usize, y: usize) -> Result<Vec<CellChange>, BoardError> {
        let flips = self.flipped_positions(disk, x, y);
        if flips.is_empty() {
            return Err(BoardError::DiskPlacement { disk, x, y });
        }

        let mut changes = Vec::with_capacity(flips.len() + 1);
        self.set_disk(Some(disk), x, y, &mut changes);
        for pos in flips {
            self.set_disk(Some(disk), pos.x, pos.y, &mut changes);
        }
        trace!(flipped = changes.len() - 1, "disk placed");
        Ok(changes)
    }

    fn flipped_positions(&self, disk: Disk, x: usize, y: usize) -> Vec<Position> {
        if x >= BOARD_SIZE || y >= BOARD_SIZE || self.disk_at(x, y).is_some() {
            return Vec::new();
        }

        let mut flips = Vec::new();
        for (dx, dy) in DIRECTIONS {
            let mut cx = x as i32 + dx;
            let mut cy = y as i32 + dy;
            let mut line = Vec::new();

            while in_bounds(cx, cy) {
                match self.disk_at(cx as usize, cy as usize) {
                    Some(found) if found == disk => {
                        flips.append(&mut line);
                        break;
                    }
                    Some(_) => line.push(Position::new(cx as usize, cy as usize)),
                    None => break,
                }
                cx += dx;
                cy += dy;
            }
        }
        flips
    }

    fn set_disk(&mut self, disk: Option<Disk>, x: usize, y: usize, changes: &mut Vec<CellChange>) {
        let square = bit(y * BOARD_SIZE + x);
        self.dark &= !square;
        self.light &= !square;
        match disk {
            Some(Disk::Dark) => self.dark |= square,
            Some(Disk::Light) => self.light |= square,
            None => {}
        }
        changes.push(CellChange { x, y, disk });
    }

    fn side_bits(&self, side: Disk) -> u64 {
        match side {
            Disk::Dark => self.dark,
            Disk::Light => self.light,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Eight lines of `x`/`o`/`-`, top row first, without a trailing newline.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..BOARD_SIZE {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..BOARD_SIZE {
                write!(f, "{}", cell_symbol(self.disk_at(x, y)))?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut dump = Vec::with_capacity(BOARD_SIZE);
        for line in text.lines().filter(|line| !line.is_empty()) {
            match parse_row(line) {
                Some(row) => dump.push(row),
                None => return Err(BoardError::Restore { dump }),
            }
        }

        let mut board = Board::empty();
        board.restore(&dump)?;
        Ok(board)
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.dump().serialize(serializer)
    }
}

/// Parses one line of cell symbols. Any unknown symbol rejects the line.
pub(crate) fn parse_row(line: &str) -> Option<Vec<Option<Disk>>> {
    line.chars().map(Disk::from_symbol).collect()
}

fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}

fn in_bounds(x: i32, y: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&x) && (0..BOARD_SIZE as i32).contains(&y)
}
