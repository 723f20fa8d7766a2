use crate::ship::ShipType;
use tokio::time::Duration;

/// Side length of the square board.
pub const BOARD_SIDE: u8 = 10;
/// Total number of cells on a board.
pub const BOARD_CELLS: u8 = 100;

pub const NUM_SHIPS: usize = 5;
pub const SHIPS: [ShipType; NUM_SHIPS] = [
    ShipType::new("Carrier", 5),
    ShipType::new("Battleship", 4),
    ShipType::new("Cruiser", 3),
    ShipType::new("Submarine", 3),
    ShipType::new("Destroyer", 2),
];

/// Sum of all ship lengths; a fleet is destroyed once this many distinct
/// occupied cells have been hit.
pub const TOTAL_SHIP_CELLS: u8 = 17;

/// Pacing delay before the AI opponent commits its shot. The turn indicator
/// flips inside `fire`, so the delay cannot admit an extra human shot.
pub const AI_MOVE_DELAY: Duration = Duration::from_secs(3);

/// Inactivity budget per relay connection, measured from connection open.
pub const RELAY_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Fallback listen port when the `PORT` environment variable is unset.
pub const DEFAULT_PORT: u16 = 3000;

/// Resolve a ship name received over the wire to its static catalog name.
pub fn ship_name_static(name: &str) -> Option<&'static str> {
    SHIPS
        .iter()
        .map(|s| s.name())
        .find(|&catalog| catalog == name)
}
