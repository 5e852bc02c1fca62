//! Interaction state machine sequencing one placement at a time.
//!
//! ```text
//! Idle -> SetTier -> CompareTier -> CompareSort -> SetTopic -> Idle
//!                \_____________________/^
//! ```
//!
//! `SetTier` goes straight to `CompareSort` when there is no boundary entry
//! to check against. Every operation is guarded by stage: a command for
//! another stage fails with [`RankError::StageMismatch`] and changes nothing.

use std::fmt;

use crate::engine::{boundary_target, swap_across_boundary, SearchWindow};
use crate::error::{RangeError, RankError};
use crate::stats::{compute_stats, Stats};
use crate::store::{ItemStore, Snapshot};
use crate::tier::{is_tier_logical, Direction, Tier};
use crate::types::{Entry, ItemAttrs, ItemKey, Topic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    SetTier,
    CompareTier,
    CompareSort,
    SetTopic,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Idle => "idle",
            Stage::SetTier => "set-tier",
            Stage::CompareTier => "compare-tier",
            Stage::CompareSort => "compare-sort",
            Stage::SetTopic => "set-topic",
        })
    }
}

/// Working state of the placement in progress. Reset by replacing it with
/// `Session::default()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub stage: Stage,
    pub subject: Option<ItemKey>,
    pub tier: Option<Tier>,
    pub rank: Option<usize>,
    /// Entry the user is currently comparing the subject against.
    pub candidate: Option<Entry>,
    pub window: SearchWindow,
}

/// What the front end should ask next.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    /// Pick one tier, optionally leaning better (`+`) or worse (`-`).
    AskTier { subject: ItemKey },
    /// Is `candidate`, from the tier next to `tier`, better or worse than the subject?
    AskCompare {
        subject: ItemKey,
        tier: Tier,
        candidate: Entry,
    },
    /// Is `candidate`, from the subject's tier, better or worse than the subject?
    AskSort { subject: ItemKey, candidate: Entry },
    /// Pick a topic; `options` are ordered most used first.
    AskTopic {
        subject: ItemKey,
        options: Vec<Topic>,
    },
    /// The subject has been committed to the store.
    Placed { entry: Entry },
}

impl Prompt {
    /// The item that must finish displaying before this prompt is shown.
    pub fn display_target(&self) -> Option<u32> {
        match self {
            Prompt::AskCompare { candidate, .. } | Prompt::AskSort { candidate, .. } => {
                Some(candidate.number())
            }
            Prompt::AskTopic { subject, .. } => Some(subject.number),
            Prompt::AskTier { .. } | Prompt::Placed { .. } => None,
        }
    }
}

/// Something worth telling the user on the way to the next prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A placement in flight was dropped to start another.
    Skipped { subject: ItemKey },
    TierChosen { tier: Tier, feeling: &'static str },
    /// A boundary entry traded tiers with the subject.
    BoundarySwapped { moved: Entry, subject_tier: Tier },
    SortStarted { tier: Tier, feeling: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub events: Vec<Event>,
    pub prompt: Prompt,
}

/// Owns the item store and the single in-flight session.
pub struct Ranker {
    store: ItemStore,
    session: Session,
    total_expected: usize,
}

impl Ranker {
    pub fn new(store: ItemStore, total_expected: usize) -> Self {
        Ranker {
            store,
            session: Session::default(),
            total_expected,
        }
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn stage(&self) -> Stage {
        self.session.stage
    }

    /// The subject currently being placed, if any.
    pub fn current(&self) -> Option<&ItemKey> {
        self.session.subject.as_ref()
    }

    pub fn total_expected(&self) -> usize {
        self.total_expected
    }

    pub fn set_total_expected(&mut self, total: usize) {
        self.total_expected = total;
    }

    pub fn stats(&self) -> Stats {
        compute_stats(&self.store, self.total_expected)
    }

    /// Start placing `subject`, dropping any placement already in flight.
    pub fn begin(&mut self, subject: ItemKey) -> Outcome {
        let mut events = Vec::new();
        if let Some(skipped) = self.abandon() {
            events.push(Event::Skipped { subject: skipped });
        }
        tracing::debug!("Placing {} ({})", subject.title, subject.number);
        self.session = Session {
            stage: Stage::SetTier,
            subject: Some(subject.clone()),
            ..Session::default()
        };
        Outcome {
            events,
            prompt: Prompt::AskTier { subject },
        }
    }

    /// Step A: the user files the subject under `tier`, leaning `direction`.
    pub fn choose_tier(&mut self, tier: Tier, direction: Direction) -> Result<Outcome, RankError> {
        let subject = self.require(Stage::SetTier, "set tier")?;
        self.session.tier = Some(tier);
        self.session.stage = Stage::CompareTier;

        let mut events = vec![Event::TierChosen {
            tier,
            feeling: direction.feeling(),
        }];

        match boundary_target(&self.store, tier, direction) {
            Ok(candidate) => {
                self.session.candidate = Some(candidate.clone());
                Ok(Outcome {
                    events,
                    prompt: Prompt::AskCompare {
                        subject,
                        tier,
                        candidate,
                    },
                })
            }
            Err(skip) => {
                tracing::debug!("No boundary check: {skip}");
                let prompt = self.start_sort(direction, &mut events)?;
                Ok(Outcome { events, prompt })
            }
        }
    }

    /// Answer to a comparison: `direction` says where the subject belongs
    /// relative to the entry shown.
    pub fn compare(&mut self, direction: Direction) -> Result<Outcome, RankError> {
        let stage = self.session.stage;
        if !matches!(stage, Stage::CompareTier | Stage::CompareSort) {
            return Err(RankError::StageMismatch {
                action: "compare",
                stage,
            });
        }
        if direction == Direction::Equal {
            return Err(RangeError::SameTier.into());
        }

        let mut events = Vec::new();
        let prompt = if stage == Stage::CompareTier {
            self.resolve_boundary(direction, &mut events)?
        } else {
            let tier_len = self
                .session
                .tier
                .map_or(0, |tier| self.store.entries_in_tier(tier).len());
            self.session.window = self.session.window.narrow(direction, tier_len);
            self.ask_sort()?
        };
        Ok(Outcome { events, prompt })
    }

    /// Step D: commit the subject under `topic` (a topic name or its number).
    ///
    /// An unknown topic re-issues the topic prompt.
    pub fn choose_topic(&mut self, topic: &str) -> Result<Outcome, RankError> {
        let subject = self.require(Stage::SetTopic, "set topic")?;
        let Some(topic) = resolve_topic(topic) else {
            tracing::debug!("Unknown topic {topic:?}");
            return Ok(Outcome {
                events: Vec::new(),
                prompt: self.ask_topic(subject),
            });
        };

        let (Some(tier), Some(rank)) = (self.session.tier, self.session.rank) else {
            return Err(RankError::StageMismatch {
                action: "set topic",
                stage: self.session.stage,
            });
        };
        let attributes = ItemAttrs { rank, tier, topic };
        self.store.upsert(subject.clone(), attributes)?;
        self.session = Session::default();

        Ok(Outcome {
            events: Vec::new(),
            prompt: Prompt::Placed {
                entry: Entry::new(subject, attributes),
            },
        })
    }

    /// Drop the placement in flight. Returns the subject that was dropped.
    pub fn abandon(&mut self) -> Option<ItemKey> {
        let previous = std::mem::take(&mut self.session);
        match previous.stage {
            Stage::Idle => None,
            _ => previous.subject,
        }
    }

    pub fn clear_all(&mut self) -> Result<Stats, RankError> {
        self.store.clear_all()?;
        self.session = Session::default();
        Ok(self.stats())
    }

    pub fn export_snapshot(&self) -> Snapshot {
        self.store.export_snapshot()
    }

    pub fn import_snapshot(&mut self, snapshot: Snapshot) -> Result<usize, RankError> {
        self.store.import_snapshot(snapshot)
    }

    fn require(&self, stage: Stage, action: &'static str) -> Result<ItemKey, RankError> {
        match (&self.session.subject, self.session.stage) {
            (Some(subject), current) if current == stage => Ok(subject.clone()),
            (_, current) => Err(RankError::StageMismatch {
                action,
                stage: current,
            }),
        }
    }

    fn resolve_boundary(
        &mut self,
        direction: Direction,
        events: &mut Vec<Event>,
    ) -> Result<Prompt, RankError> {
        let (Some(chosen), Some(boundary)) = (self.session.tier, self.session.candidate.take())
        else {
            return Err(RankError::StageMismatch {
                action: "compare",
                stage: self.session.stage,
            });
        };

        if !is_tier_logical(chosen, direction, boundary.tier()) {
            let moved = swap_across_boundary(&mut self.store, chosen, &boundary)?;
            self.session.tier = Some(boundary.tier());
            events.push(Event::BoundarySwapped {
                moved,
                subject_tier: boundary.tier(),
            });
        }

        // The subject sits at the edge facing the entry it was compared with.
        self.start_sort(direction.flip(), events)
    }

    fn start_sort(
        &mut self,
        direction: Direction,
        events: &mut Vec<Event>,
    ) -> Result<Prompt, RankError> {
        let tier = self.session.tier.ok_or(RankError::StageMismatch {
            action: "sort",
            stage: self.session.stage,
        })?;
        self.session.stage = Stage::CompareSort;
        let high = self.store.entries_in_tier(tier).len();
        self.session.window = SearchWindow::start(direction, high);
        events.push(Event::SortStarted {
            tier,
            feeling: direction.feeling(),
        });
        self.ask_sort()
    }

    fn ask_sort(&mut self) -> Result<Prompt, RankError> {
        let subject = self.require(Stage::CompareSort, "sort")?;
        let tier = self.session.tier.ok_or(RankError::StageMismatch {
            action: "sort",
            stage: self.session.stage,
        })?;
        let list = self.store.entries_in_tier(tier);
        let window = self.session.window;

        let probe = if window.is_settled(list.len()) {
            None
        } else {
            window.probe(list.len())
        };

        match probe {
            Some(index) => {
                let candidate = list[index].clone();
                self.session.candidate = Some(candidate.clone());
                Ok(Prompt::AskSort { subject, candidate })
            }
            None => {
                tracing::debug!("Settled {} at {}-tier rank {}", subject.title, tier, window.mid);
                self.session.rank = Some(window.mid);
                self.session.candidate = None;
                self.session.stage = Stage::SetTopic;
                Ok(self.ask_topic(subject))
            }
        }
    }

    fn ask_topic(&self, subject: ItemKey) -> Prompt {
        Prompt::AskTopic {
            subject,
            options: self.stats().topics,
        }
    }
}

/// A topic by name (any case) or by its number in the topic alphabet.
pub fn resolve_topic(input: &str) -> Option<Topic> {
    let input = input.trim();
    match input.parse::<usize>() {
        Ok(index) => Topic::from_index(index),
        Err(_) => input.parse().ok(),
    }
}
