use std::ops::{Index, IndexMut};

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Color of a disk, and of the side that plays it.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Disk {
    #[display("dark")]
    Dark,
    #[display("light")]
    Light,
}

impl Disk {
    /// Both sides, dark first.
    pub const SIDES: [Disk; 2] = [Disk::Dark, Disk::Light];

    /// Returns the opposing side.
    pub fn flipped(self) -> Self {
        match self {
            Disk::Dark => Disk::Light,
            Disk::Light => Disk::Dark,
        }
    }

    /// Board/save symbol: `x` for dark, `o` for light.
    pub fn symbol(self) -> char {
        match self {
            Disk::Dark => 'x',
            Disk::Light => 'o',
        }
    }

    /// Parses a cell symbol. `-` is an empty cell, anything else unknown is `None`.
    pub fn from_symbol(symbol: char) -> Option<Option<Disk>> {
        match symbol {
            'x' => Some(Some(Disk::Dark)),
            'o' => Some(Some(Disk::Light)),
            '-' => Some(None),
            _ => None,
        }
    }
}

/// Symbol of an optional disk, `-` for an empty cell.
pub fn cell_symbol(disk: Option<Disk>) -> char {
    disk.map_or('-', Disk::symbol)
}

/// Who decides the moves of a side.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerMode {
    #[default]
    #[display("manual")]
    Manual,
    #[display("computer")]
    Computer,
}

impl PlayerMode {
    /// Digit used by the save format.
    pub fn digit(self) -> char {
        match self {
            PlayerMode::Manual => '0',
            PlayerMode::Computer => '1',
        }
    }

    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '0' => Some(PlayerMode::Manual),
            '1' => Some(PlayerMode::Computer),
            _ => None,
        }
    }
}

/// One value per side, indexable by [`Disk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PerSide<T> {
    pub dark: T,
    pub light: T,
}

impl<T> PerSide<T> {
    pub fn new(dark: T, light: T) -> Self {
        Self { dark, light }
    }

    pub fn from_fn(mut f: impl FnMut(Disk) -> T) -> Self {
        Self {
            dark: f(Disk::Dark),
            light: f(Disk::Light),
        }
    }
}

impl<T> Index<Disk> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Disk) -> &T {
        match side {
            Disk::Dark => &self.dark,
            Disk::Light => &self.light,
        }
    }
}

impl<T> IndexMut<Disk> for PerSide<T> {
    fn index_mut(&mut self, side: Disk) -> &mut T {
        match side {
            Disk::Dark => &mut self.dark,
            Disk::Light => &mut self.light,
        }
    }
}

/// A board coordinate: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// One mutated cell and its content afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellChange {
    pub x: usize,
    pub y: usize,
    pub disk: Option<Disk>,
}
