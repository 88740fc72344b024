use serde::{Deserialize, Serialize};

use crate::game::{Board, Cell, Color, GRID_SIZE, NUM_CELLS};

/// How many values describe one cell of the network input, and what they mean.
///
/// Values are laid out cell-major: index `cell * per_cell + channel`, with
/// `cell = row * 8 + col`. Serialized as the bare channel count (1, 2 or 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum InputEncoding {
    /// One channel: 0 empty, +1 own, -1 opponent.
    Signed,
    /// Two channels: own / opponent occupancy as +1 / -1.
    Occupancy,
    /// Occupancy plus a third empty-cell channel.
    OccupancyWithEmpty,
}

impl InputEncoding {
    pub fn per_cell(self) -> usize {
        match self {
            InputEncoding::Signed => 1,
            InputEncoding::Occupancy => 2,
            InputEncoding::OccupancyWithEmpty => 3,
        }
    }

    /// Length of the encoded vector for a full board.
    pub fn input_size(self) -> usize {
        NUM_CELLS * self.per_cell()
    }
}

impl Default for InputEncoding {
    fn default() -> Self {
        InputEncoding::Signed
    }
}

impl TryFrom<usize> for InputEncoding {
    type Error = String;

    fn try_from(per_cell: usize) -> Result<Self, Self::Error> {
        match per_cell {
            1 => Ok(InputEncoding::Signed),
            2 => Ok(InputEncoding::Occupancy),
            3 => Ok(InputEncoding::OccupancyWithEmpty),
            n => Err(format!("input_per_cell must be 1, 2 or 3, got {n}")),
        }
    }
}

impl From<InputEncoding> for usize {
    fn from(encoding: InputEncoding) -> usize {
        encoding.per_cell()
    }
}

fn flag(set: bool) -> f64 {
    if set {
        1.0
    } else {
        -1.0
    }
}

/// Encode `board` as seen by `perspective`.
pub fn extract_input(board: &Board, perspective: Color, encoding: InputEncoding) -> Vec<f64> {
    let own = perspective.to_cell();
    let other = perspective.opposite().to_cell();
    let mut data = Vec::with_capacity(encoding.input_size());

    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let cell = board.get(row, col);
            match encoding {
                InputEncoding::Signed => data.push(match cell {
                    Cell::Empty => 0.0,
                    c if c == own => 1.0,
                    _ => -1.0,
                }),
                InputEncoding::Occupancy => {
                    data.push(flag(cell == own));
                    data.push(flag(cell == other));
                }
                InputEncoding::OccupancyWithEmpty => {
                    data.push(flag(cell == own));
                    data.push(flag(cell == other));
                    data.push(flag(cell == Cell::Empty));
                }
            }
        }
    }

    data
}
