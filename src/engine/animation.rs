//! Entrance choreography: reveal sets, staggered delays, one-shot phases.
//!
//! A reveal set groups sibling visual groups under one trigger. When the
//! trigger is first satisfied at time `t`, member `i` becomes `Entering` at
//! `t + i * stagger_unit` and `Settled` one enter duration later.
//!
//! # Invariants
//!
//! 1. Phases only move forward: `Hidden → Entering → Settled`.
//! 2. A set fires at most once per mount; later viewport entries are no-ops.
//! 3. Within a set, entering timestamps strictly increase with member index.
//! 4. After teardown no timer is outstanding and no phase changes.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::events::{Command, TimerId, Timestamp};
use crate::logging::{Domain, Level};

pub type GroupId = String;

/// When a reveal set starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    OnMount,
    OnFirstViewportEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Hidden,
    Entering,
    Settled,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Hidden => "hidden",
            Phase::Entering => "entering",
            Phase::Settled => "settled",
        }
    }

    fn next(self) -> Option<Phase> {
        match self {
            Phase::Hidden => Some(Phase::Entering),
            Phase::Entering => Some(Phase::Settled),
            Phase::Settled => None,
        }
    }
}

/// Delay before sibling `index` starts entering.
pub fn stagger_delay(index: usize, unit_ms: u64) -> u64 {
    unit_ms.saturating_mul(index as u64)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealSet {
    pub id: String,
    pub trigger: Trigger,
    /// Ordered siblings; position is the stagger index
    pub members: Vec<GroupId>,
}

impl RevealSet {
    pub fn new(id: &str, trigger: Trigger, members: Vec<GroupId>) -> Self {
        Self {
            id: id.to_string(),
            trigger,
            members,
        }
    }

    /// A set with one member named like the set itself
    pub fn single(id: &str, trigger: Trigger) -> Self {
        Self::new(id, trigger, vec![id.to_string()])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationError {
    DuplicateSet(String),
    DuplicateGroup(String),
    UnknownSet(String),
    UnknownGroup(String),
    IllegalTransition { group: String, from: Phase, to: Phase },
}

impl fmt::Display for AnimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationError::DuplicateSet(id) => write!(f, "reveal set {} registered twice", id),
            AnimationError::DuplicateGroup(id) => write!(f, "group {} belongs to two reveal sets", id),
            AnimationError::UnknownSet(id) => write!(f, "no reveal set {}", id),
            AnimationError::UnknownGroup(id) => write!(f, "no visual group {}", id),
            AnimationError::IllegalTransition { group, from, to } => write!(
                f,
                "group {}: illegal phase transition {} -> {}",
                group,
                from.as_str(),
                to.as_str()
            ),
        }
    }
}

impl std::error::Error for AnimationError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupState {
    pub set: String,
    pub index: usize,
    pub phase: Phase,
    pub entered_at: Option<Timestamp>,
    pub settled_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TimerPurpose {
    Enter(GroupId),
    Settle(GroupId),
}

#[derive(Debug, Clone)]
pub struct AnimationOrchestrator {
    stagger_unit_ms: u64,
    enter_duration_ms: u64,
    sets: Vec<RevealSet>,
    fired: BTreeSet<String>,
    groups: BTreeMap<GroupId, GroupState>,
    timers: BTreeMap<TimerId, TimerPurpose>,
    next_timer: TimerId,
    torn_down: bool,
}

impl AnimationOrchestrator {
    pub fn new(stagger_unit_ms: u64, enter_duration_ms: u64) -> Self {
        Self {
            stagger_unit_ms,
            enter_duration_ms,
            sets: Vec::new(),
            fired: BTreeSet::new(),
            groups: BTreeMap::new(),
            timers: BTreeMap::new(),
            next_timer: 1,
            torn_down: false,
        }
    }

    pub fn register(&mut self, set: RevealSet) -> Result<(), AnimationError> {
        if self.sets.iter().any(|s| s.id == set.id) {
            return Err(AnimationError::DuplicateSet(set.id));
        }
        let mut seen = BTreeSet::new();
        for member in &set.members {
            if self.groups.contains_key(member) || !seen.insert(member.as_str()) {
                return Err(AnimationError::DuplicateGroup(member.clone()));
            }
        }
        for (index, member) in set.members.iter().enumerate() {
            self.groups.insert(
                member.clone(),
                GroupState {
                    set: set.id.clone(),
                    index,
                    phase: Phase::Hidden,
                    entered_at: None,
                    settled_at: None,
                },
            );
        }
        self.sets.push(set);
        Ok(())
    }

    /// Fire every on-mount set.
    pub fn on_mount(&mut self, now: Timestamp) -> Vec<Command> {
        let ids: Vec<String> = self
            .sets
            .iter()
            .filter(|s| s.trigger == Trigger::OnMount)
            .map(|s| s.id.clone())
            .collect();
        let mut commands = Vec::new();
        for id in ids {
            commands.extend(self.fire(&id, now));
        }
        commands
    }

    /// First viewport entry of a set's container fires it; anything after
    /// that is ignored.
    pub fn on_viewport_enter(&mut self, target: &str, now: Timestamp) -> Result<Vec<Command>, AnimationError> {
        let trigger = match self.sets.iter().find(|s| s.id == target) {
            Some(s) => s.trigger,
            None => return Err(AnimationError::UnknownSet(target.to_string())),
        };
        if trigger != Trigger::OnFirstViewportEntry {
            return Ok(Vec::new());
        }
        Ok(self.fire(target, now))
    }

    fn fire(&mut self, set_id: &str, now: Timestamp) -> Vec<Command> {
        let mut commands = Vec::new();
        if self.torn_down || !self.fired.insert(set_id.to_string()) {
            return commands;
        }
        let members = match self.sets.iter().find(|s| s.id == set_id) {
            Some(s) => s.members.clone(),
            None => return commands,
        };
        commands.push(Command::log(
            Level::Debug,
            Domain::Animation,
            format!("reveal set {} fired at {} ({} members)", set_id, now, members.len()),
        ));
        for (index, member) in members.into_iter().enumerate() {
            let delay = stagger_delay(index, self.stagger_unit_ms);
            if delay == 0 {
                commands.extend(self.begin_entering(&member, now));
            } else {
                commands.push(self.schedule(TimerPurpose::Enter(member), now.saturating_add(delay)));
            }
        }
        commands
    }

    fn schedule(&mut self, purpose: TimerPurpose, at: Timestamp) -> Command {
        let id = self.next_timer;
        self.next_timer += 1;
        self.timers.insert(id, purpose);
        Command::ScheduleTimer { id, at }
    }

    fn advance(&mut self, group: &str, to: Phase, now: Timestamp) -> Result<(), AnimationError> {
        let state = match self.groups.get_mut(group) {
            Some(s) => s,
            None => return Err(AnimationError::UnknownGroup(group.to_string())),
        };
        if state.phase.next() != Some(to) {
            return Err(AnimationError::IllegalTransition {
                group: group.to_string(),
                from: state.phase,
                to,
            });
        }
        let from = state.phase;
        state.phase = to;
        match to {
            Phase::Entering => state.entered_at = Some(now),
            Phase::Settled => state.settled_at = Some(now),
            Phase::Hidden => {}
        }
        crate::logging::log_phase_change(group, from.as_str(), to.as_str(), now);
        Ok(())
    }

    fn begin_entering(&mut self, group: &str, now: Timestamp) -> Vec<Command> {
        match self.advance(group, Phase::Entering, now) {
            Ok(()) => {
                let settle_at = now.saturating_add(self.enter_duration_ms);
                vec![self.schedule(TimerPurpose::Settle(group.to_string()), settle_at)]
            }
            Err(err) => vec![Command::log(Level::Warn, Domain::Animation, err.to_string())],
        }
    }

    /// Returns `None` when the timer is not ours (stale or already cancelled).
    pub fn on_timer(&mut self, id: TimerId, now: Timestamp) -> Option<Vec<Command>> {
        if self.torn_down {
            return None;
        }
        let purpose = self.timers.remove(&id)?;
        let commands = match purpose {
            TimerPurpose::Enter(group) => self.begin_entering(&group, now),
            TimerPurpose::Settle(group) => match self.advance(&group, Phase::Settled, now) {
                Ok(()) => Vec::new(),
                Err(err) => vec![Command::log(Level::Warn, Domain::Animation, err.to_string())],
            },
        };
        Some(commands)
    }

    /// Abandon in-flight transitions and release every pending timer.
    pub fn teardown(&mut self) -> Vec<Command> {
        self.torn_down = true;
        let timers = std::mem::take(&mut self.timers);
        timers.into_keys().map(|id| Command::CancelTimer { id }).collect()
    }

    pub fn phase(&self, group: &str) -> Option<Phase> {
        self.groups.get(group).map(|g| g.phase)
    }

    pub fn group(&self, group: &str) -> Option<&GroupState> {
        self.groups.get(group)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &GroupState)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn phases(&self) -> BTreeMap<String, Phase> {
        self.groups.iter().map(|(k, v)| (k.clone(), v.phase)).collect()
    }

    pub fn sets(&self) -> &[RevealSet] {
        &self.sets
    }

    pub fn has_fired(&self, set_id: &str) -> bool {
        self.fired.contains(set_id)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduled(cmds: &[Command]) -> Vec<(TimerId, Timestamp)> {
        cmds.iter()
            .filter_map(|c| match c {
                Command::ScheduleTimer { id, at } => Some((*id, *at)),
                _ => None,
            })
            .collect()
    }

    fn orchestrator() -> AnimationOrchestrator {
        let mut o = AnimationOrchestrator::new(100, 400);
        o.register(RevealSet::single("header", Trigger::OnMount)).unwrap();
        o.register(RevealSet::new(
            "cards",
            Trigger::OnFirstViewportEntry,
            vec!["a".into(), "b".into(), "c".into()],
        ))
        .unwrap();
        o
    }

    #[test]
    fn test_deadlines_saturate_near_clock_max() {
        let mut o = orchestrator();
        let near_max = u64::MAX - 10;
        assert_eq!(scheduled(&o.on_mount(near_max)), vec![(1, u64::MAX)]);

        let cmds = o.on_viewport_enter("cards", u64::MAX - 150).unwrap();
        let ats: Vec<Timestamp> = scheduled(&cmds).into_iter().map(|(_, at)| at).collect();
        assert_eq!(ats, vec![u64::MAX, u64::MAX - 50, u64::MAX]);
    }

    #[test]
    fn test_stagger_delay_linear() {
        assert_eq!(stagger_delay(0, 80), 0);
        assert_eq!(stagger_delay(1, 80), 80);
        assert_eq!(stagger_delay(5, 80), 400);
    }

    #[test]
    fn test_mount_fires_only_mount_sets() {
        let mut o = orchestrator();
        let cmds = o.on_mount(0);
        assert_eq!(o.phase("header"), Some(Phase::Entering));
        assert_eq!(o.phase("a"), Some(Phase::Hidden));
        assert_eq!(scheduled(&cmds), vec![(1, 400)]);
    }

    #[test]
    fn test_viewport_entry_staggers_members() {
        let mut o = orchestrator();
        let cmds = o.on_viewport_enter("cards", 1000).unwrap();
        // a enters immediately, b and c wait for their offsets
        assert_eq!(o.phase("a"), Some(Phase::Entering));
        assert_eq!(o.phase("b"), Some(Phase::Hidden));
        let ats: Vec<Timestamp> = scheduled(&cmds).into_iter().map(|(_, at)| at).collect();
        assert_eq!(ats, vec![1400, 1100, 1200]);
    }

    #[test]
    fn test_full_cycle_to_settled() {
        let mut o = orchestrator();
        let mut pending = scheduled(&o.on_viewport_enter("cards", 0).unwrap());
        while !pending.is_empty() {
            pending.sort_by_key(|(_, at)| *at);
            let (id, at) = pending.remove(0);
            let cmds = o.on_timer(id, at).unwrap();
            pending.extend(scheduled(&cmds));
        }
        for g in ["a", "b", "c"] {
            assert_eq!(o.phase(g), Some(Phase::Settled));
        }
        assert_eq!(o.group("b").unwrap().entered_at, Some(100));
        assert_eq!(o.group("c").unwrap().settled_at, Some(600));
        assert_eq!(o.pending_timers(), 0);
    }

    #[test]
    fn test_second_entry_is_noop() {
        let mut o = orchestrator();
        o.on_viewport_enter("cards", 0).unwrap();
        let again = o.on_viewport_enter("cards", 50).unwrap();
        assert!(again.is_empty());
        assert_eq!(o.group("a").unwrap().entered_at, Some(0));
    }

    #[test]
    fn test_viewport_on_mount_set_ignored() {
        let mut o = orchestrator();
        assert!(o.on_viewport_enter("header", 10).unwrap().is_empty());
        assert_eq!(o.phase("header"), Some(Phase::Hidden));
    }

    #[test]
    fn test_unknown_set_reported() {
        let mut o = orchestrator();
        assert_eq!(
            o.on_viewport_enter("footer", 0),
            Err(AnimationError::UnknownSet("footer".to_string()))
        );
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut o = orchestrator();
        assert!(matches!(
            o.register(RevealSet::single("header", Trigger::OnMount)),
            Err(AnimationError::DuplicateSet(_))
        ));
        assert!(matches!(
            o.register(RevealSet::new("more", Trigger::OnMount, vec!["a".into()])),
            Err(AnimationError::DuplicateGroup(_))
        ));
    }

    #[test]
    fn test_teardown_cancels_everything() {
        let mut o = orchestrator();
        let cmds = o.on_viewport_enter("cards", 0).unwrap();
        let ids: Vec<TimerId> = scheduled(&cmds).into_iter().map(|(id, _)| id).collect();
        let cancels = o.teardown();
        let cancelled: Vec<TimerId> = cancels
            .iter()
            .filter_map(|c| match c {
                Command::CancelTimer { id } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(cancelled.len(), ids.len());
        assert_eq!(o.pending_timers(), 0);
        // late firing after teardown changes nothing
        assert!(o.on_timer(ids[0], 500).is_none());
        assert_eq!(o.phase("a"), Some(Phase::Entering));
        assert!(o.on_mount(600).is_empty());
    }

    #[test]
    fn test_stale_timer_ignored() {
        let mut o = orchestrator();
        assert!(o.on_timer(999, 0).is_none());
    }
}
