//! Track ordering policy: which index plays after (or before) the current
//! one, given the shuffle and repeat flags.
//!
//! Pure functions so the policy is testable without a transport. `None`
//! from [`next_index`] means the playlist is finished; [`previous_index`]
//! never finishes the playlist, clamping at the start or wrapping under
//! repeat.

use rand::seq::SliceRandom;
use rand::thread_rng;

pub fn next_index(len: usize, current: Option<usize>, shuffle: bool, repeat: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }

    if shuffle {
        if len == 1 {
            return Some(0);
        }
        // Uniform pick over everything except the current track, so two
        // consecutive plays never repeat. Shuffle never runs out.
        let candidates: Vec<usize> = (0..len).filter(|&i| Some(i) != current).collect();
        return candidates.choose(&mut thread_rng()).copied();
    }

    let candidate = current.map_or(0, |c| c + 1);
    if candidate < len {
        Some(candidate)
    } else if repeat {
        Some(0)
    } else {
        None
    }
}

pub fn previous_index(len: usize, current: Option<usize>, repeat: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }

    match current {
        Some(c) if c > 0 => Some(c - 1),
        _ if repeat => Some(len - 1),
        _ => Some(0),
    }
}
