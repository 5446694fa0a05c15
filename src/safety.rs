//! Deadlock-avoidance safety check (Banker's algorithm).
//!
//! A static, non-concurrent matrix computation: given per-process
//! allocation and maximum-claim matrices plus the currently available
//! resource vector, find an order in which every process's outstanding
//! need can eventually be satisfied, or report that none exists. It is a
//! pure function over matrices and shares no state with the scheduling
//! core.
//!
//! # Reference
//!
//! - Dijkstra (1965), "Cooperating Sequential Processes" (the banker's
//!   problem)
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 8.6

use crate::error::SchedulerError;

/// Snapshot of resource accounting for a set of processes.
///
/// Rows are processes (matching `processes` by index), columns are
/// resource kinds (matching `available` by index).
#[derive(Debug, Clone)]
pub struct ResourceState {
    processes: Vec<String>,
    allocation: Vec<Vec<u32>>,
    max: Vec<Vec<u32>>,
    available: Vec<u32>,
}

impl ResourceState {
    /// Creates a resource state.
    ///
    /// # Panics
    /// If matrix shapes disagree with the process list or the available
    /// vector, or if any allocation exceeds its maximum claim — malformed
    /// input is a caller bug, not a runtime condition.
    pub fn new(
        processes: Vec<String>,
        allocation: Vec<Vec<u32>>,
        max: Vec<Vec<u32>>,
        available: Vec<u32>,
    ) -> Self {
        assert_eq!(
            allocation.len(),
            processes.len(),
            "allocation must have one row per process"
        );
        assert_eq!(
            max.len(),
            processes.len(),
            "max must have one row per process"
        );
        for (index, (held, claim)) in allocation.iter().zip(&max).enumerate() {
            assert_eq!(
                held.len(),
                available.len(),
                "allocation row {index} must match the resource count"
            );
            assert_eq!(
                claim.len(),
                available.len(),
                "max row {index} must match the resource count"
            );
            assert!(
                held.iter().zip(claim).all(|(h, c)| h <= c),
                "process {index} holds more than its maximum claim"
            );
        }
        Self {
            processes,
            allocation,
            max,
            available,
        }
    }

    /// Outstanding need per process: max − allocation.
    fn need(&self) -> Vec<Vec<u32>> {
        self.max
            .iter()
            .zip(&self.allocation)
            .map(|(claim, held)| claim.iter().zip(held).map(|(c, h)| c - h).collect())
            .collect()
    }
}

/// Computes a safe execution order for the given resource state.
///
/// Each pick scans from the slot after the previous pick and wraps
/// around, so the emitted order follows the classic worked examples
/// rather than always favouring low indices.
///
/// # Errors
/// `NoSafeSequence` when some processes can never have their outstanding
/// need satisfied — the state is unsafe and the caller decides what to do
/// about it.
pub fn safe_sequence(state: &ResourceState) -> Result<Vec<String>, SchedulerError> {
    let need = state.need();
    let mut available = state.available.clone();
    let mut sequence: Vec<usize> = Vec::with_capacity(state.processes.len());
    let mut start = 0;

    while sequence.len() < state.processes.len() {
        let Some(index) = next_executable(&need, &available, &sequence, start) else {
            return Err(SchedulerError::NoSafeSequence);
        };
        // The process can run to completion and release what it holds.
        for (have, held) in available.iter_mut().zip(&state.allocation[index]) {
            *have += held;
        }
        sequence.push(index);
        start = index + 1;
    }

    Ok(sequence
        .into_iter()
        .map(|index| state.processes[index].clone())
        .collect())
}

/// First not-yet-sequenced process, scanning from `start` and wrapping,
/// whose outstanding need fits in `available`.
fn next_executable(
    need: &[Vec<u32>],
    available: &[u32],
    sequence: &[usize],
    start: usize,
) -> Option<usize> {
    (start..need.len())
        .chain(0..start.min(need.len()))
        .find(|&index| !sequence.contains(&index) && fits(&need[index], available))
}

/// Componentwise `need <= available`.
fn fits(need: &[u32], available: &[u32]) -> bool {
    need.iter().zip(available).all(|(n, a)| n <= a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_safe_sequence_three_resources() {
        let state = ResourceState::new(
            names(&["P0", "P1", "P2", "P3", "P4"]),
            vec![
                vec![0, 1, 0],
                vec![2, 0, 0],
                vec![3, 0, 2],
                vec![2, 1, 1],
                vec![0, 0, 2],
            ],
            vec![
                vec![7, 5, 3],
                vec![3, 2, 2],
                vec![9, 0, 2],
                vec![2, 2, 2],
                vec![4, 3, 3],
            ],
            vec![3, 3, 2],
        );
        assert_eq!(
            safe_sequence(&state).unwrap(),
            names(&["P1", "P3", "P4", "P0", "P2"])
        );
    }

    #[test]
    fn test_safe_sequence_four_resources() {
        let state = ResourceState::new(
            names(&["P0", "P1", "P2", "P3", "P4"]),
            vec![
                vec![0, 0, 1, 2],
                vec![1, 0, 0, 0],
                vec![1, 3, 5, 4],
                vec![0, 6, 3, 2],
                vec![0, 0, 1, 4],
            ],
            vec![
                vec![0, 0, 1, 2],
                vec![1, 7, 5, 0],
                vec![2, 3, 5, 6],
                vec![0, 6, 5, 2],
                vec![0, 6, 5, 6],
            ],
            vec![1, 5, 2, 0],
        );
        assert_eq!(
            safe_sequence(&state).unwrap(),
            names(&["P0", "P2", "P3", "P4", "P1"])
        );
    }

    #[test]
    fn test_unsafe_state_reports_no_sequence() {
        let state = ResourceState::new(
            names(&["P0", "P1"]),
            vec![vec![1, 0], vec![0, 1]],
            vec![vec![3, 2], vec![2, 3]],
            vec![0, 0],
        );
        assert_eq!(
            safe_sequence(&state).unwrap_err(),
            SchedulerError::NoSafeSequence
        );
    }

    #[test]
    fn test_no_processes_is_trivially_safe() {
        let state = ResourceState::new(Vec::new(), Vec::new(), Vec::new(), vec![1, 1]);
        assert_eq!(safe_sequence(&state).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_fully_allocated_processes_release_in_any_order() {
        // Nobody needs anything further; the rotating scan emits index
        // order starting from the front.
        let state = ResourceState::new(
            names(&["A", "B"]),
            vec![vec![1], vec![1]],
            vec![vec![1], vec![1]],
            vec![0],
        );
        assert_eq!(safe_sequence(&state).unwrap(), names(&["A", "B"]));
    }

    #[test]
    #[should_panic(expected = "one row per process")]
    fn test_shape_mismatch_panics() {
        let _ = ResourceState::new(
            names(&["P0", "P1"]),
            vec![vec![0]],
            vec![vec![1], vec![1]],
            vec![1],
        );
    }

    #[test]
    #[should_panic(expected = "maximum claim")]
    fn test_allocation_beyond_claim_panics() {
        let _ = ResourceState::new(names(&["P0"]), vec![vec![2]], vec![vec![1]], vec![1]);
    }
}
