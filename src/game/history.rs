//! Canonical five-line hand history.
//!
//! Line 1: the hand id.
//! Line 2: `seat:stack` pairs, then `btn=`, `sb=`, `bb=` position markers.
//! Line 3: `seat:<hole cards>` per dealt seat (e.g. `3:AhKd`).
//! Line 4: the action stream. Voluntary actions are `seat:` prefixed
//! (`4:f`, `4:x`, `4:c`, `4:b100`, `4:r240`, `4:allin`); bare tokens are
//! board cards for a newly dealt street (`Ah7d2c`, `Ts`, `4c`). The seat
//! prefix is what keeps the line decodable: a board card string never
//! contains a colon. Blinds are forced, so they never appear here.
//! Line 5: `seat:+n`/`seat:-n` signed nets, which sum to zero.

use std::fmt::Write as _;
use thiserror::Error;

use super::entities::{ActionKind, ActionRecord, Card, Chips, SeatId, Street, Suit, Value};
use super::hand::Hand;

/// Errors from parsing a history action line.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum HistoryError {
    #[error("bad seat in token {0:?}")]
    BadSeat(String),
    #[error("unknown action code in token {0:?}")]
    UnknownAction(String),
    #[error("bad amount in token {0:?}")]
    BadAmount(String),
    #[error("unparseable card string {0:?}")]
    BadCard(String),
    #[error("board segment {0:?} has the wrong card count")]
    BadBoardSegment(String),
    #[error("more board segments than streets")]
    TooManyBoardSegments,
}

/// Parse a concatenated card string such as `Ah7d2c`.
pub fn parse_cards(s: &str) -> Result<Vec<Card>, HistoryError> {
    let chars: Vec<char> = s.chars().collect();
    if chars.is_empty() || chars.len() % 2 != 0 {
        return Err(HistoryError::BadCard(s.to_string()));
    }
    let mut cards = Vec::with_capacity(chars.len() / 2);
    for pair in chars.chunks(2) {
        let value: Value = match pair[0] {
            'A' => 14,
            'K' => 13,
            'Q' => 12,
            'J' => 11,
            'T' => 10,
            c @ '2'..='9' => c as u8 - b'0',
            _ => return Err(HistoryError::BadCard(s.to_string())),
        };
        let suit = match pair[1] {
            'c' => Suit::Club,
            'd' => Suit::Diamond,
            'h' => Suit::Heart,
            's' => Suit::Spade,
            _ => return Err(HistoryError::BadCard(s.to_string())),
        };
        cards.push(Card(value, suit));
    }
    Ok(cards)
}

fn action_token(record: &ActionRecord) -> String {
    let body = match record.kind {
        ActionKind::Fold => "f".to_string(),
        ActionKind::Check => "x".to_string(),
        ActionKind::Call => "c".to_string(),
        ActionKind::Bet => format!("b{}", record.amount.unwrap_or(0)),
        ActionKind::Raise => format!("r{}", record.amount.unwrap_or(0)),
        ActionKind::AllIn => "allin".to_string(),
    };
    format!("{}:{body}", record.seat)
}

fn board_segment(board: &[Card], segment: usize) -> Option<String> {
    let range = match segment {
        0 => 0..3,
        1 => 3..4,
        2 => 4..5,
        _ => return None,
    };
    board
        .get(range)
        .map(|cards| cards.iter().map(ToString::to_string).collect())
}

/// Encode the action stream, interleaving each dealt street's cards at the
/// point the street began. Runout streets with no actions still show their
/// cards at the end.
#[must_use]
pub fn encode_actions(actions: &[ActionRecord], board: &[Card]) -> String {
    let mut tokens: Vec<String> = Vec::new();
    let mut segments = 0;
    for record in actions {
        while record.street.ordinal() > segments {
            if let Some(segment) = board_segment(board, segments) {
                tokens.push(segment);
            }
            segments += 1;
        }
        tokens.push(action_token(record));
    }
    while let Some(segment) = board_segment(board, segments) {
        tokens.push(segment);
        segments += 1;
    }
    tokens.join(" ")
}

/// Parse an action line back into records. Board tokens advance the street;
/// the records come back in the order they were committed.
pub fn decode_actions(line: &str) -> Result<Vec<ActionRecord>, HistoryError> {
    let mut records = Vec::new();
    let mut segments = 0;
    for token in line.split_whitespace() {
        let Some((seat_text, body)) = token.split_once(':') else {
            let cards = parse_cards(token)?;
            let expected = match segments {
                0 => 3,
                1 | 2 => 1,
                _ => return Err(HistoryError::TooManyBoardSegments),
            };
            if cards.len() != expected {
                return Err(HistoryError::BadBoardSegment(token.to_string()));
            }
            segments += 1;
            continue;
        };
        let seat: SeatId = seat_text
            .parse()
            .map_err(|_| HistoryError::BadSeat(token.to_string()))?;
        let street = match segments {
            0 => Street::Preflop,
            1 => Street::Flop,
            2 => Street::Turn,
            _ => Street::River,
        };
        let (kind, amount) = match body {
            "f" => (ActionKind::Fold, None),
            "x" => (ActionKind::Check, None),
            "c" => (ActionKind::Call, None),
            "allin" => (ActionKind::AllIn, None),
            _ => {
                let kind = match body.as_bytes().first() {
                    Some(b'b') => ActionKind::Bet,
                    Some(b'r') => ActionKind::Raise,
                    _ => return Err(HistoryError::UnknownAction(token.to_string())),
                };
                let amount: Chips = body[1..]
                    .parse()
                    .map_err(|_| HistoryError::BadAmount(token.to_string()))?;
                (kind, Some(amount))
            }
        };
        records.push(ActionRecord {
            seat,
            street,
            kind,
            amount,
        });
    }
    Ok(records)
}

/// Render the full five-line history for a hand. Lines 1-4 are complete at
/// any point; line 5 shows the nets once the hand has a result.
pub(crate) fn render(hand: &Hand) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", hand.id());

    let mut line2: Vec<String> = hand
        .players
        .iter()
        .map(|p| format!("{}:{}", p.seat, p.starting_stack))
        .collect();
    for p in &hand.players {
        if p.is_dealer {
            line2.push(format!("btn={}", p.seat));
        }
    }
    for p in &hand.players {
        if p.is_small_blind {
            line2.push(format!("sb={}", p.seat));
        }
    }
    for p in &hand.players {
        if p.is_big_blind {
            line2.push(format!("bb={}", p.seat));
        }
    }
    let _ = writeln!(out, "{}", line2.join(" "));

    let line3: Vec<String> = hand
        .players
        .iter()
        .filter_map(|p| {
            p.hole_cards
                .map(|[a, b]| format!("{}:{a}{b}", p.seat))
        })
        .collect();
    let _ = writeln!(out, "{}", line3.join(" "));

    let _ = writeln!(out, "{}", encode_actions(&hand.actions, &hand.board));

    let line5: Vec<String> = hand
        .result()
        .map(|result| {
            result
                .net
                .iter()
                .map(|(seat, net)| format!("{seat}:{net:+}"))
                .collect()
        })
        .unwrap_or_default();
    let _ = write!(out, "{}", line5.join(" "));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::PlayerAction;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeMap;

    fn record(seat: SeatId, street: Street, kind: ActionKind, amount: Option<Chips>) -> ActionRecord {
        ActionRecord {
            seat,
            street,
            kind,
            amount,
        }
    }

    #[test]
    fn test_parse_cards_compact_strings() {
        assert_eq!(
            parse_cards("Ah7d2c").unwrap(),
            vec![
                Card(14, Suit::Heart),
                Card(7, Suit::Diamond),
                Card(2, Suit::Club)
            ]
        );
        assert_eq!(parse_cards("Ts").unwrap(), vec![Card(10, Suit::Spade)]);
        assert!(parse_cards("").is_err());
        assert!(parse_cards("A").is_err());
        assert!(parse_cards("1h").is_err());
        assert!(parse_cards("Ax").is_err());
    }

    #[test]
    fn test_encode_interleaves_board_per_street() {
        let actions = vec![
            record(4, Street::Preflop, ActionKind::Call, None),
            record(5, Street::Preflop, ActionKind::Fold, None),
            record(2, Street::Flop, ActionKind::Check, None),
            record(4, Street::Flop, ActionKind::Bet, Some(100)),
            record(2, Street::Flop, ActionKind::Call, None),
            record(2, Street::Turn, ActionKind::AllIn, None),
            record(4, Street::Turn, ActionKind::Call, None),
        ];
        let board = parse_cards("Ah7d2cTs4c").unwrap();
        assert_eq!(
            encode_actions(&actions, &board),
            "4:c 5:f Ah7d2c 2:x 4:b100 2:c Ts 2:allin 4:c 4c"
        );
    }

    #[test]
    fn test_encode_runout_streets_without_actions() {
        let actions = vec![
            record(1, Street::Preflop, ActionKind::AllIn, None),
            record(2, Street::Preflop, ActionKind::Call, None),
        ];
        let board = parse_cards("Kd9s3h2dQc").unwrap();
        assert_eq!(
            encode_actions(&actions, &board),
            "1:allin 2:c Kd9s3h 2d Qc"
        );
    }

    #[test]
    fn test_decode_round_trips_tokens() {
        let line = "4:c 5:f Ah7d2c 2:x 4:b100 2:c Ts 2:allin 4:c 4c";
        let records = decode_actions(line).unwrap();
        assert_eq!(records.len(), 7);
        assert_eq!(records[0], record(4, Street::Preflop, ActionKind::Call, None));
        assert_eq!(records[3], record(4, Street::Flop, ActionKind::Bet, Some(100)));
        assert_eq!(records[5], record(2, Street::Turn, ActionKind::AllIn, None));
        let board = parse_cards("Ah7d2cTs4c").unwrap();
        assert_eq!(encode_actions(&records, &board), line);
    }

    #[test]
    fn test_decode_raise_amounts() {
        let records = decode_actions("3:r240 4:c").unwrap();
        assert_eq!(records[0].kind, ActionKind::Raise);
        assert_eq!(records[0].amount, Some(240));
    }

    #[test]
    fn test_decode_rejects_malformed_tokens() {
        assert!(matches!(
            decode_actions("zz:f"),
            Err(HistoryError::BadSeat(_))
        ));
        assert!(matches!(
            decode_actions("3:q"),
            Err(HistoryError::UnknownAction(_))
        ));
        assert!(matches!(
            decode_actions("3:bxyz"),
            Err(HistoryError::BadAmount(_))
        ));
        assert!(matches!(
            decode_actions("Ah7d"),
            Err(HistoryError::BadBoardSegment(_))
        ));
        assert!(matches!(
            decode_actions("Ah7d2c Ts 4c 9h"),
            Err(HistoryError::TooManyBoardSegments)
        ));
    }

    #[test]
    fn test_render_five_lines_for_folded_hand() {
        let stacks: BTreeMap<SeatId, Chips> = [(1, 300), (2, 300)].into_iter().collect();
        let mut hand = Hand::start(&stacks, 1, &mut StdRng::seed_from_u64(9)).unwrap();
        // Heads-up: the dealer posts the small blind and folds.
        hand.submit(1, PlayerAction::new(ActionKind::Fold)).unwrap();
        let text = render(&hand);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], hand.id().to_string());
        assert_eq!(lines[1], "1:300 2:300 btn=1 sb=1 bb=2");
        assert!(lines[2].starts_with("1:") && lines[2].contains(" 2:"));
        assert_eq!(lines[3], "1:f");
        assert_eq!(lines[4], "1:-20 2:+20");
    }

    #[test]
    fn test_render_line_four_round_trips_from_live_hand() {
        let stacks: BTreeMap<SeatId, Chips> =
            [(1, 500), (2, 500), (3, 500)].into_iter().collect();
        let mut hand = Hand::start(&stacks, 1, &mut StdRng::seed_from_u64(77)).unwrap();
        hand.submit(1, PlayerAction::new(ActionKind::Call)).unwrap();
        hand.submit(2, PlayerAction::new(ActionKind::Call)).unwrap();
        hand.submit(3, PlayerAction::new(ActionKind::Check)).unwrap();
        hand.submit(2, PlayerAction::new(ActionKind::Check)).unwrap();
        hand.submit(3, PlayerAction::with_amount(ActionKind::Bet, 80)).unwrap();
        hand.submit(1, PlayerAction::new(ActionKind::Fold)).unwrap();
        hand.submit(2, PlayerAction::new(ActionKind::Call)).unwrap();
        hand.submit(2, PlayerAction::new(ActionKind::Check)).unwrap();
        hand.submit(3, PlayerAction::new(ActionKind::Check)).unwrap();
        hand.submit(2, PlayerAction::new(ActionKind::Check)).unwrap();
        hand.submit(3, PlayerAction::new(ActionKind::Check)).unwrap();
        assert!(hand.is_complete());
        let text = render(&hand);
        let line4 = text.lines().nth(3).unwrap();
        assert_eq!(decode_actions(line4).unwrap(), hand.actions);
    }
}
