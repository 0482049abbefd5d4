//! Board controller.
//!
//! The board holds the canonical in-memory state (one stage and one client
//! record per slot) and owns the snapshot [`Store`]. Every mutation runs the
//! same pipeline: update state, redraw through the attached [`Renderer`],
//! then write the full snapshot back.

use std::collections::BTreeMap;
use crate::models::{ClientRecord, Field, SlotId, Snapshot, Stage, DEFAULT_SLOT_COUNT};
use crate::store::{KeyValueStore, Store};

/// One card on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub slot: SlotId,
    pub name: String,
    pub manager: String,
    pub stage: Stage,
}

impl Card {
    pub fn label(&self) -> &'static str {
        self.stage.label()
    }

    pub fn icon(&self) -> &'static str {
        self.stage.icon()
    }
}

/// Presentation hook notified after each mutation, before the save
pub trait Renderer {
    /// `changed` is the mutated slot, or None when the whole board changed
    fn redraw(&mut self, cards: &[Card], changed: Option<SlotId>);
}

/// Number of slots sitting at each stage, indexed by stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StageSummary {
    pub counts: [usize; Stage::COUNT],
}

impl StageSummary {
    pub fn count(&self, stage: Stage) -> usize {
        self.counts[stage.index() as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

pub struct Board<S: KeyValueStore> {
    store: Store<S>,
    progress: BTreeMap<SlotId, Stage>,
    clients: BTreeMap<SlotId, ClientRecord>,
    renderer: Option<Box<dyn Renderer>>,
}

impl<S: KeyValueStore> Board<S> {
    /// Load the board from the store, initializing defaults when there is
    /// nothing stored or the stored snapshot cannot be read.
    pub fn mount(store: Store<S>) -> Self {
        let snapshot = match store.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                log::info!("no saved board under '{}', starting with {} empty slots", store.key(), DEFAULT_SLOT_COUNT);
                Snapshot::with_defaults(DEFAULT_SLOT_COUNT)
            }
            Err(e) => {
                log::warn!("could not load saved board ({}), starting with defaults", e);
                Snapshot::with_defaults(DEFAULT_SLOT_COUNT)
            }
        };

        let (progress, clients) = adopt(snapshot);
        Self { store, progress, clients, renderer: None }
    }

    /// Attach the presentation layer
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn contains(&self, slot: SlotId) -> bool {
        self.clients.contains_key(&slot)
    }

    pub fn slots(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.clients.keys().copied()
    }

    pub fn stage(&self, slot: SlotId) -> Option<Stage> {
        self.progress.get(&slot).copied()
    }

    pub fn client(&self, slot: SlotId) -> Option<&ClientRecord> {
        self.clients.get(&slot)
    }

    /// Move a slot one stage forward, saturating at Championship.
    /// Returns the new stage, or None if the slot is not on the board.
    pub fn advance(&mut self, slot: SlotId) -> Option<Stage> {
        let stage = self.progress.get_mut(&slot)?;
        *stage = stage.next();
        let stage = *stage;
        log::debug!("slot {} advanced to stage {}", slot, stage.index());

        self.commit(Some(slot));
        Some(stage)
    }

    /// Overwrite one field of a slot's client record.
    /// Returns false if the slot is not on the board.
    pub fn set_field(&mut self, slot: SlotId, field: Field, value: impl Into<String>) -> bool {
        let Some(record) = self.clients.get_mut(&slot) else {
            return false;
        };
        record.set(field, value.into());
        log::debug!("slot {} {} updated", slot, field);

        self.commit(Some(slot));
        true
    }

    /// Replace the whole board with a fresh default board
    pub fn reset(&mut self) {
        let (progress, clients) = adopt(Snapshot::with_defaults(DEFAULT_SLOT_COUNT));
        self.progress = progress;
        self.clients = clients;
        log::info!("board reset to {} empty slots", DEFAULT_SLOT_COUNT);

        self.commit(None);
    }

    pub fn card(&self, slot: SlotId) -> Option<Card> {
        let record = self.clients.get(&slot)?;
        Some(Card {
            slot,
            name: record.name.clone(),
            manager: record.manager.clone(),
            stage: self.progress.get(&slot).copied().unwrap_or_default(),
        })
    }

    /// All cards in slot order
    pub fn cards(&self) -> Vec<Card> {
        self.slots().filter_map(|slot| self.card(slot)).collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            progress: self
                .progress
                .iter()
                .map(|(&slot, stage)| (slot, stage.index() as i64))
                .collect(),
            clients: self.clients.clone(),
        }
    }

    pub fn summary(&self) -> StageSummary {
        let mut summary = StageSummary::default();
        for stage in self.progress.values() {
            summary.counts[stage.index() as usize] += 1;
        }
        summary
    }

    /// Redraw, then persist the full board
    fn commit(&mut self, changed: Option<SlotId>) {
        if self.renderer.is_some() {
            let cards = self.cards();
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.redraw(&cards, changed);
            }
        }

        let snapshot = self.snapshot();
        if let Err(e) = self.store.save(&snapshot) {
            log::warn!("board change not saved: {}", e);
        }
    }
}

/// Turn a stored snapshot into board state.
///
/// Stages outside the table are clamped, and the progress/client key sets are
/// unioned so every slot has exactly one of each.
fn adopt(snapshot: Snapshot) -> (BTreeMap<SlotId, Stage>, BTreeMap<SlotId, ClientRecord>) {
    let Snapshot { progress: raw_progress, mut clients } = snapshot;

    let mut progress: BTreeMap<SlotId, Stage> = BTreeMap::new();
    for (slot, raw) in raw_progress {
        let stage = Stage::clamped(raw);
        if Stage::from_index(raw).is_none() {
            log::warn!("slot {} has stage {} outside 0..={}, using {}", slot, raw, Stage::COUNT - 1, stage.index());
        }
        progress.insert(slot, stage);
    }

    for (&slot, _) in progress.iter() {
        if !clients.contains_key(&slot) {
            log::warn!("slot {} has progress but no client record, adding an empty one", slot);
            clients.insert(slot, ClientRecord::default());
        }
    }
    for &slot in clients.keys() {
        if !progress.contains_key(&slot) {
            log::warn!("slot {} has no progress, starting it at stage 0", slot);
            progress.insert(slot, Stage::Round1);
        }
    }

    (progress, clients)
}
