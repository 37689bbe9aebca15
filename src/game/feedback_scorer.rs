use crate::model::{Code, GameFeedback, CODE_LENGTH};

/// Scores `guess` against `secret`.
///
/// Exact matches are counted first and consume both positions. Each remaining
/// guess digit, left to right, then consumes the leftmost unconsumed equal
/// secret digit, so one secret digit never satisfies two guess digits.
pub fn score(guess: &Code, secret: &Code) -> GameFeedback {
    let mut secret_slots: [Option<u8>; CODE_LENGTH] = secret.map(Some);
    let mut guess_slots: [Option<u8>; CODE_LENGTH] = guess.map(Some);
    let mut feedback = GameFeedback::default();

    for i in 0..CODE_LENGTH {
        if guess[i] == secret[i] {
            feedback.correct += 1;
            secret_slots[i] = None;
            guess_slots[i] = None;
        }
    }

    for digit in guess_slots.into_iter().flatten() {
        if let Some(slot) = secret_slots.iter_mut().find(|slot| **slot == Some(digit)) {
            feedback.partial += 1;
            *slot = None;
        }
    }

    feedback
}
