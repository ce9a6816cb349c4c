//! Parent pairing for truncation selection.
//!
//! After ranking, the top half of the roster are parents and the bottom half
//! are replaced by their children. The plan says which parents breed and
//! which slots their children take.

use crate::schema::PairingScheme;

/// One recombination: two ranked parents and the slots their children fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    pub parents: (usize, usize),
    /// Slot for the first child, and for the second child if it is kept.
    pub slots: (usize, Option<usize>),
}

/// Build the pairing plan for a ranked roster of `size` dots.
pub fn pairing_plan(size: usize, scheme: PairingScheme) -> Vec<Pairing> {
    let half = size / 2;

    let mut plan: Vec<Pairing> = (0..half.saturating_sub(1))
        .step_by(2)
        .map(|i| Pairing {
            parents: (i, i + 1),
            slots: (i + half, Some(i + half + 1)),
        })
        .collect();

    // A single parent would only pair with itself.
    if scheme == PairingScheme::Wrapping && half % 2 == 1 && half > 1 {
        plan.push(Pairing {
            parents: (half - 1, 0),
            slots: (2 * half - 1, None),
        });
    }

    plan
}
