//! Turning traversed edges into persisted walk segments.

use crate::graph::{WalkId, WalkSegment};
use crate::random_walk::TraversedEdge;
use crate::store::WalkTransaction;
use crate::Result;

/// Writes the segments of one walk into an open transaction.
///
/// Step indices are assigned here, densely from 0, so the persisted sequence never has gaps
/// even if a caller feeds a self-loop through by mistake.
pub struct SegmentRecorder<'t, T: ?Sized> {
    tx: &'t mut T,
    walk_id: WalkId,
    category: &'t str,
    next_step: u64,
}

impl<'t, T: WalkTransaction + ?Sized> SegmentRecorder<'t, T> {
    pub fn new(tx: &'t mut T, walk_id: WalkId, category: &'t str) -> Self {
        Self { tx, walk_id, category, next_step: 0 }
    }

    /// Persist one transition. Returns `false` for a self-loop, which is dropped.
    pub fn record(&mut self, traversed: TraversedEdge) -> Result<bool> {
        if traversed.edge.is_self_loop() {
            tracing::debug!(
                walk_id = self.walk_id,
                node = traversed.edge.source,
                "dropping self-loop transition"
            );
            return Ok(false);
        }
        debug_assert_eq!(traversed.step, self.next_step, "sampler and recorder disagree on step");

        self.tx.save_segment(WalkSegment {
            walk_id: self.walk_id,
            edge: traversed.edge,
            category: self.category.to_string(),
            step: self.next_step,
        })?;
        self.next_step += 1;
        Ok(true)
    }

    pub fn recorded(&self) -> u64 {
        self.next_step
    }

    pub fn walk_id(&self) -> WalkId {
        self.walk_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;
    use crate::store::StoreError;

    #[derive(Default)]
    struct VecTx {
        saved: Vec<WalkSegment>,
        fail_after: Option<usize>,
    }

    impl WalkTransaction for VecTx {
        fn save_segment(&mut self, segment: WalkSegment) -> std::result::Result<(), StoreError> {
            if self.fail_after.is_some_and(|n| self.saved.len() >= n) {
                return Err(StoreError::Backend("disk full".into()));
            }
            self.saved.push(segment);
            Ok(())
        }

        fn commit(self) -> std::result::Result<(), StoreError> {
            Ok(())
        }
    }

    fn step(u: u64, v: u64, step: u64) -> TraversedEdge {
        TraversedEdge { edge: Edge::new(u, v), step }
    }

    #[test]
    fn segments_carry_walk_id_category_and_dense_steps() {
        let mut tx = VecTx::default();
        let mut rec = SegmentRecorder::new(&mut tx, 17, "news");
        assert!(rec.record(step(1, 2, 0)).unwrap());
        assert!(rec.record(step(2, 3, 1)).unwrap());
        assert_eq!(rec.recorded(), 2);
        assert_eq!(rec.walk_id(), 17);

        let steps: Vec<u64> = tx.saved.iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![0, 1]);
        assert!(tx.saved.iter().all(|s| s.walk_id == 17 && s.category == "news"));
        assert_eq!(tx.saved[1].edge, Edge::new(2, 3));
    }

    #[test]
    fn self_loop_is_never_persisted() {
        let mut tx = VecTx::default();
        let mut rec = SegmentRecorder::new(&mut tx, 1, "global");
        assert!(!rec.record(step(5, 5, 0)).unwrap());
        assert_eq!(rec.recorded(), 0);
        assert!(tx.saved.is_empty());
    }

    #[test]
    fn write_failure_propagates() {
        let mut tx = VecTx { fail_after: Some(1), ..Default::default() };
        let mut rec = SegmentRecorder::new(&mut tx, 1, "global");
        rec.record(step(1, 2, 0)).unwrap();
        let err = rec.record(step(2, 3, 1)).unwrap_err();
        assert!(matches!(err, crate::Error::Storage(_)));
        assert_eq!(rec.recorded(), 1);
    }
}
