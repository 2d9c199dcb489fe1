//! Per-viewer pending-set bookkeeping: decide what to encode, not how.
//!
//! The relay tracks, for every viewer, which properties of which entities
//! still need to be sent. The pending set for an entity is the union of
//! fresh change flags and whatever a previous frame reported as didn't-fit,
//! so unsent properties are never silently dropped; they are retried in
//! the next frame, in canonical order, ahead of nothing.
//!
//! The spatial index owns entity lifetime and supplies borrows through
//! [`WorldView`]; the relay never creates or destroys entities. Everything
//! here is synchronous and thread-agnostic: one `build_frame` call works
//! over caller-held borrows, exactly like the codec underneath it.

use std::collections::{BTreeMap, HashMap};

use bytecoder::ByteWriter;
use codec::{
    encode_record_with_scratch, AppendState, CodecLimits, CodecScratch, CodecResult, WireLimits,
};
use entities::{Entity, EntityId};
use log::{debug, warn};
use schema::PropertyFlags;

/// Viewer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewerId(pub u32);

/// Budget caps for one frame of one viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayConfig {
    /// Byte budget for a single entity record.
    pub record_budget: usize,
    /// Byte budget for a whole frame.
    pub frame_budget: usize,
    /// Maximum records in a frame.
    pub max_records_per_frame: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            record_budget: 1200,
            frame_budget: 8192,
            max_records_per_frame: 64,
        }
    }
}

impl RelayConfig {
    /// Creates a configuration suitable for tests with tight budgets.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            record_budget: 64,
            frame_budget: 256,
            max_records_per_frame: 8,
        }
    }
}

/// World adapter supplying entity borrows for frame building.
pub trait WorldView {
    /// Borrows an entity, or `None` if it no longer exists.
    fn entity(&self, id: EntityId) -> Option<&Entity>;
}

/// Per-frame accounting returned by [`PropertyRelay::build_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Records written into the frame.
    pub records: usize,
    /// Bytes written into the frame.
    pub bytes: usize,
    /// Entities still holding pending properties after this frame.
    pub carried_over: usize,
}

#[derive(Debug, Default)]
struct ViewerState {
    pending: BTreeMap<EntityId, PropertyFlags>,
}

/// Tracks pending property sets per viewer and builds outgoing frames.
#[derive(Debug)]
pub struct PropertyRelay {
    config: RelayConfig,
    wire_limits: WireLimits,
    codec_limits: CodecLimits,
    viewers: HashMap<ViewerId, ViewerState>,
    scratch: CodecScratch,
}

impl PropertyRelay {
    /// Creates a relay with default wire and codec limits.
    #[must_use]
    pub fn new(config: RelayConfig) -> Self {
        Self::with_limits(config, WireLimits::default(), CodecLimits::default())
    }

    /// Creates a relay with explicit limits.
    #[must_use]
    pub fn with_limits(
        config: RelayConfig,
        wire_limits: WireLimits,
        codec_limits: CodecLimits,
    ) -> Self {
        Self {
            config,
            wire_limits,
            codec_limits,
            viewers: HashMap::new(),
            scratch: CodecScratch::new(),
        }
    }

    /// Registers a viewer. Existing pending state is kept on re-add.
    pub fn add_viewer(&mut self, viewer: ViewerId) {
        self.viewers.entry(viewer).or_default();
    }

    /// Removes a viewer and its pending state.
    pub fn remove_viewer(&mut self, viewer: ViewerId) {
        self.viewers.remove(&viewer);
    }

    /// Returns the number of registered viewers.
    #[must_use]
    pub fn viewer_count(&self) -> usize {
        self.viewers.len()
    }

    /// Fans a changed-property set out to every viewer's pending state.
    ///
    /// Call this with [`Entity::take_changed`] output after local edits.
    pub fn mark_changed(&mut self, entity: EntityId, changed: &PropertyFlags) {
        if changed.is_empty() {
            return;
        }
        for state in self.viewers.values_mut() {
            state
                .pending
                .entry(entity)
                .or_default()
                .union_with(changed);
        }
    }

    /// Drops pending state for a destroyed entity.
    pub fn forget_entity(&mut self, entity: EntityId) {
        for state in self.viewers.values_mut() {
            state.pending.remove(&entity);
        }
    }

    /// Returns a viewer's pending flags for an entity, if any.
    #[must_use]
    pub fn pending_for(&self, viewer: ViewerId, entity: EntityId) -> Option<&PropertyFlags> {
        self.viewers.get(&viewer)?.pending.get(&entity)
    }

    /// Builds one frame for a viewer, encoding pending entities in
    /// ascending identifier order until a budget or record cap is hit.
    ///
    /// Properties that did not fit stay pending for the next frame; an
    /// entity missing from the world view loses its pending state with a
    /// warning, since nothing can ever be encoded for it again.
    pub fn build_frame(
        &mut self,
        viewer: ViewerId,
        world: &impl WorldView,
        out: &mut ByteWriter,
    ) -> CodecResult<FrameReport> {
        let Some(state) = self.viewers.get_mut(&viewer) else {
            return Ok(FrameReport::default());
        };

        let frame_start = out.len();
        let mut report = FrameReport::default();
        let mut drained: Vec<EntityId> = Vec::new();

        for (entity_id, pending) in &mut state.pending {
            if report.records >= self.config.max_records_per_frame {
                break;
            }
            let frame_used = out.len() - frame_start;
            let remaining = self.config.frame_budget.saturating_sub(frame_used);
            if remaining == 0 {
                break;
            }

            let Some(entity) = world.entity(*entity_id) else {
                warn!("entity {entity_id} vanished with pending properties; dropping");
                drained.push(*entity_id);
                continue;
            };

            let budget = self.config.record_budget.min(remaining);
            let outcome = encode_record_with_scratch(
                entity,
                pending,
                budget,
                out,
                &self.wire_limits,
                &self.codec_limits,
                &mut self.scratch,
            )?;

            if outcome.property_count > 0 {
                report.records += 1;
            }

            match outcome.state {
                AppendState::DidntFit => {
                    debug!(
                        "entity {entity_id}: {} properties carried to next frame",
                        outcome.didnt_fit.len()
                    );
                    *pending = outcome.didnt_fit;
                }
                AppendState::Finished | AppendState::None => {
                    drained.push(*entity_id);
                }
            }

            if outcome.property_count == 0 && outcome.state == AppendState::DidntFit {
                // The frame is too full for even one more property.
                break;
            }
        }

        for entity_id in drained {
            state.pending.remove(&entity_id);
        }
        report.carried_over = state.pending.len();
        report.bytes = out.len() - frame_start;
        Ok(report)
    }
}
