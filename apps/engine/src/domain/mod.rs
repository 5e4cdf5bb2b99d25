//! Domain layer: pure game types and helpers.

pub mod avatars;
pub mod model;
pub mod reveal;
pub mod session_code;

pub use model::{
    Choice, CorrectHint, Player, RevealMode, Round, Session, SessionId, SessionSettings,
    SessionStatus, Vote,
};
pub use reveal::{correct_choice, real_slot, tally_correct, DERIVATION_VERSION};
pub use session_code::{generate_code, is_valid_code, CODE_LEN};
