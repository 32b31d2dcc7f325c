//! Fixed table parameters for a 6-max hand.

use super::entities::Chips;

/// Number of seats at the table.
pub const MAX_PLAYERS: usize = 6;

/// Forced small blind, posted by the first seat after the dealer.
pub const SMALL_BLIND: Chips = 20;

/// Forced big blind. Also the minimum bet and the initial raise increment.
pub const BIG_BLIND: Chips = 40;

/// Community cards dealt across flop, turn, and river.
pub const BOARD_SIZE: usize = 5;

/// Most cards a hand can consume: two hole cards per seat plus the board.
/// The deck can never run dry under correct 6-max usage.
pub const MAX_CARDS_PER_HAND: usize = 2 * MAX_PLAYERS + BOARD_SIZE;
