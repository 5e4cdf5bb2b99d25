//! Correct-slot derivation and vote scoring helpers.
//!
//! Which displayed slot holds the real image is *derived* from the
//! round id rather than stored. Every process (host and all players)
//! computes the same answer from data it already has, so no extra
//! coordination round-trip is needed to agree on the result.

use uuid::Uuid;

use crate::domain::model::{Choice, Vote};

/// Version of the slot-derivation function.
///
/// The derivation is part of the game's semantics: changing it would
/// silently flip the correct answer for in-flight rounds. Any change
/// must bump this constant and gate on it.
pub const DERIVATION_VERSION: u8 = 1;

/// V1 derivation: the real image sits in slot A iff the first character
/// of the round id's lowercase hyphenated hex rendering has an even
/// code point.
///
/// Pure and stable: calling it twice, or from two different processes,
/// yields the same slot for the same id.
pub fn real_slot(round_id: &Uuid) -> Choice {
    // First character of the hyphenated form is the high nibble of the
    // first byte, rendered as lowercase hex ('0'..'9' / 'a'..'f').
    let nibble = round_id.as_bytes()[0] >> 4;
    let code_point = if nibble < 10 {
        b'0' + nibble
    } else {
        b'a' + (nibble - 10)
    };
    if code_point % 2 == 0 {
        Choice::A
    } else {
        Choice::B
    }
}

/// The winning choice for a round: the question is "which is real?",
/// so the correct choice is wherever the real image landed.
pub fn correct_choice(round_id: &Uuid) -> Choice {
    real_slot(round_id)
}

/// Player ids whose vote matched the round's derived correct choice.
///
/// Votes commute for scoring purposes, so order is irrelevant; the
/// caller issues one atomic increment per returned id.
pub fn tally_correct(round_id: &Uuid, votes: &[Vote]) -> Vec<Uuid> {
    let winning = correct_choice(round_id);
    votes
        .iter()
        .filter(|v| v.choice == winning)
        .map(|v| v.player_id)
        .collect()
}
