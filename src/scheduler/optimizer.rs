//! Pluggable optimizer strategies.
//!
//! A strategy proposes start times for a batch of instances; its output is
//! advisory only. The validator re-checks every proposal against freshly
//! computed availability, so a strategy may be wrong, partial, or absent
//! without affecting correctness.

use crate::models::instance::TaskInstance;
use crate::models::time::TimeSlot;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One day of the batch handed to a strategy: the instances assigned to the
/// date and the availability computed before any of them is placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayBatch {
    pub date: NaiveDate,
    pub instances: Vec<TaskInstance>,
    pub availability: Vec<TimeSlot>,
}

/// The full batch for one scheduling run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizerBatch {
    pub days: Vec<DayBatch>,
}

/// A proposed start time for one instance, keyed by its batch key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeProposal {
    pub instance_key: String,
    pub start: NaiveTime,
    pub justification: String,
}

/// A replaceable component proposing start times for a batch.
///
/// Implementations may wrap anything from a local heuristic to a remote
/// model call. Errors and timeouts degrade to zero proposals upstream.
#[async_trait]
pub trait OptimizerStrategy: Send + Sync {
    async fn propose(&self, batch: &OptimizerBatch) -> anyhow::Result<Vec<TimeProposal>>;
}

/// Strategy that proposes nothing, leaving everything to the gap-filler.
#[derive(Debug, Default)]
pub struct NoopOptimizer;

#[async_trait]
impl OptimizerStrategy for NoopOptimizer {
    async fn propose(&self, _batch: &OptimizerBatch) -> anyhow::Result<Vec<TimeProposal>> {
        Ok(Vec::new())
    }
}

/// Deterministic local strategy: walks each day's instances in priority
/// order and proposes the earliest start honoring fixed times and preferred
/// windows, tracking tentatively consumed time so its own proposals do not
/// collide with each other.
#[derive(Debug, Default)]
pub struct HeuristicOptimizer;

#[async_trait]
impl OptimizerStrategy for HeuristicOptimizer {
    async fn propose(&self, batch: &OptimizerBatch) -> anyhow::Result<Vec<TimeProposal>> {
        let mut proposals = Vec::new();
        for day in &batch.days {
            let mut consumed: Vec<TimeSlot> = Vec::new();
            let mut ordered: Vec<&TaskInstance> = day.instances.iter().collect();
            ordered.sort_by_key(|i| (i.fixed_time.is_none(), i.priority, i.task_id, i.ordinal));

            for instance in ordered {
                let free = subtract(&day.availability, &consumed);
                let found = crate::scheduler::slots::find_slot(
                    &free,
                    instance.duration_minutes,
                    instance.fixed_time,
                    instance.preferred_window,
                );
                if let Some(slot) = found {
                    consumed.push(slot);
                    proposals.push(TimeProposal {
                        instance_key: instance.batch_key(),
                        start: slot.start,
                        justification: describe_choice(instance, &slot),
                    });
                }
            }
        }
        Ok(proposals)
    }
}

fn describe_choice(instance: &TaskInstance, slot: &TimeSlot) -> String {
    if instance.fixed_time.is_some() {
        format!("holds your fixed time of {}", slot.start.format("%H:%M"))
    } else if instance
        .preferred_window
        .is_some_and(|w| w.contains_time(slot.start))
    {
        format!("earliest open time in your preferred window, starting {}", slot.start.format("%H:%M"))
    } else {
        format!("earliest open time of the day, starting {}", slot.start.format("%H:%M"))
    }
}

/// Remove tentatively consumed intervals from a free-slot list.
fn subtract(free: &[TimeSlot], consumed: &[TimeSlot]) -> Vec<TimeSlot> {
    let mut result = free.to_vec();
    for busy in consumed {
        result = result
            .iter()
            .flat_map(|slot| {
                let mut parts = Vec::new();
                if !slot.overlaps(busy) {
                    parts.push(*slot);
                } else {
                    if let Some(before) = TimeSlot::new(slot.start, busy.start) {
                        parts.push(before);
                    }
                    if let Some(after) = TimeSlot::new(busy.end, slot.end) {
                        parts.push(after);
                    }
                }
                parts
            })
            .collect();
    }
    result
}

/// Index proposals by instance key, dropping duplicates beyond the first.
pub fn index_proposals(proposals: Vec<TimeProposal>) -> HashMap<String, TimeProposal> {
    let mut map = HashMap::with_capacity(proposals.len());
    for proposal in proposals {
        map.entry(proposal.instance_key.clone()).or_insert(proposal);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{TaskId, UserId};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn slot(sh: u32, sm: u32, eh: u32, em: u32) -> TimeSlot {
        TimeSlot::new(t(sh, sm), t(eh, em)).unwrap()
    }

    fn instance(task: i64, ordinal: u32, fixed: Option<NaiveTime>) -> TaskInstance {
        TaskInstance {
            task_id: TaskId::new(task),
            user_id: UserId::new(1),
            task_name: format!("task-{}", task),
            date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            ordinal,
            total: 1,
            duration_minutes: 30,
            fixed_time: fixed,
            preferred_window: None,
            priority: task as i32,
        }
    }

    fn batch(instances: Vec<TaskInstance>) -> OptimizerBatch {
        OptimizerBatch {
            days: vec![DayBatch {
                date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
                instances,
                availability: vec![slot(8, 0, 10, 0)],
            }],
        }
    }

    #[tokio::test]
    async fn noop_proposes_nothing() {
        let proposals = NoopOptimizer
            .propose(&batch(vec![instance(1, 1, None)]))
            .await
            .unwrap();
        assert!(proposals.is_empty());
    }

    #[tokio::test]
    async fn heuristic_proposals_do_not_collide() {
        let proposals = HeuristicOptimizer
            .propose(&batch(vec![instance(1, 1, None), instance(2, 1, None)]))
            .await
            .unwrap();
        assert_eq!(proposals.len(), 2);
        assert_eq!(proposals[0].start, t(8, 0));
        assert_eq!(proposals[1].start, t(8, 30));
    }

    #[tokio::test]
    async fn heuristic_places_fixed_instances_first() {
        // The fixed 08:00 task wins its time even though the flexible task
        // has better priority.
        let proposals = HeuristicOptimizer
            .propose(&batch(vec![
                instance(1, 1, None),
                instance(9, 1, Some(t(8, 0))),
            ]))
            .await
            .unwrap();
        let by_key = index_proposals(proposals);
        assert_eq!(by_key["9:2026-08-10:1"].start, t(8, 0));
        assert_eq!(by_key["1:2026-08-10:1"].start, t(8, 30));
    }

    #[test]
    fn subtract_splits_around_consumed_interval() {
        let free = vec![slot(8, 0, 12, 0)];
        let remaining = subtract(&free, &[slot(9, 0, 10, 0)]);
        assert_eq!(remaining, vec![slot(8, 0, 9, 0), slot(10, 0, 12, 0)]);
    }

    #[test]
    fn index_proposals_keeps_first_duplicate() {
        let a = TimeProposal {
            instance_key: "k".to_string(),
            start: t(8, 0),
            justification: "first".to_string(),
        };
        let b = TimeProposal {
            instance_key: "k".to_string(),
            start: t(9, 0),
            justification: "second".to_string(),
        };
        let map = index_proposals(vec![a.clone(), b]);
        assert_eq!(map["k"], a);
    }
}
