//! Exposure store: the frame × layer matrix of keyframe cells.
//!
//! Each `(frame, layer)` cell is either a keyframe, holding objects authored
//! on that frame, or a mirror of the nearest keyframe before it on the same
//! layer. Mirrors are kept as independent deep copies so that every write to a
//! keyframe is followed by forward propagation up to the next keyframe.
//!
//! Readers go through [`Timeline::exposed`], which resolves a cell by walking
//! back to its keyframe and never inspects mirror cells. Every operation is a
//! no-op on out-of-range indices.

#[cfg(test)]
#[path = "timeline_test.rs"]
mod timeline_test;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::consts::ONION_BASE_ALPHA;
use crate::doc::SceneObject;

/// One `(frame, layer)` slot of the exposure matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExposureCell {
    pub is_keyframe: bool,
    /// Paint order: last is topmost.
    pub objects: Vec<SceneObject>,
}

/// A named layer. Its z-order is its index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
}

impl Layer {
    fn numbered(n: usize) -> Self {
        Self { name: format!("Layer {n}") }
    }
}

/// Ghost-frame settings for onion skinning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnionSkin {
    pub enabled: bool,
    /// Number of earlier frames shown.
    pub back: usize,
    /// Number of later frames shown.
    pub forward: usize,
}

impl Default for OnionSkin {
    fn default() -> Self {
        Self { enabled: false, back: 3, forward: 0 }
    }
}

/// Why a deserialized timeline snapshot was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    #[error("timeline has no frames")]
    NoFrames,
    #[error("timeline has no layers")]
    NoLayers,
    #[error("frame {frame} has {cells} cells, expected {layers}")]
    RowWidth { frame: usize, cells: usize, layers: usize },
    #[error("playhead {playhead} is past the last frame ({len} frames)")]
    Playhead { playhead: usize, len: usize },
}

impl TimelineError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoFrames => "E_TIMELINE_NO_FRAMES",
            Self::NoLayers => "E_TIMELINE_NO_LAYERS",
            Self::RowWidth { .. } => "E_TIMELINE_ROW_WIDTH",
            Self::Playhead { .. } => "E_TIMELINE_PLAYHEAD",
        }
    }
}

/// Unchecked wire shape of [`Timeline`].
#[derive(Deserialize)]
struct TimelineRepr {
    rows: Vec<Vec<ExposureCell>>,
    layers: Vec<Layer>,
    frame_rate: u32,
    playhead: usize,
}

impl TryFrom<TimelineRepr> for Timeline {
    type Error = TimelineError;

    fn try_from(repr: TimelineRepr) -> Result<Self, Self::Error> {
        let TimelineRepr { rows, layers, frame_rate, playhead } = repr;
        if rows.is_empty() {
            return Err(TimelineError::NoFrames);
        }
        if layers.is_empty() {
            return Err(TimelineError::NoLayers);
        }
        if let Some((frame, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != layers.len()) {
            return Err(TimelineError::RowWidth { frame, cells: row.len(), layers: layers.len() });
        }
        if playhead >= rows.len() {
            return Err(TimelineError::Playhead { playhead, len: rows.len() });
        }
        Ok(Self { rows, layers, frame_rate: frame_rate.max(1), playhead })
    }
}

/// The animation timeline: frame rows, layers, frame rate and playhead.
///
/// Snapshots are checked on the way in: every frame must have one cell per
/// layer and the playhead must point at a frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TimelineRepr")]
pub struct Timeline {
    rows: Vec<Vec<ExposureCell>>,
    layers: Vec<Layer>,
    frame_rate: u32,
    playhead: usize,
}

impl Timeline {
    /// A single-layer timeline of `frame_count` frames (at least one), with
    /// frame 0 of layer 0 seeded as an empty keyframe.
    #[must_use]
    pub fn new(frame_count: usize, frame_rate: u32) -> Self {
        let frame_count = frame_count.max(1);
        let mut rows = vec![vec![ExposureCell::default()]; frame_count];
        rows[0][0].is_keyframe = true;
        Self { rows, layers: vec![Layer::numbered(1)], frame_rate: frame_rate.max(1), playhead: 0 }
    }

    // --- Dimensions ---

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false: construction and deserialization both keep at least one frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[must_use]
    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    /// Set frames per second (at least 1).
    pub fn set_frame_rate(&mut self, fps: u32) {
        self.frame_rate = fps.max(1);
    }

    // --- Playhead ---

    #[must_use]
    pub fn playhead(&self) -> usize {
        self.playhead
    }

    /// Move the playhead. Out-of-range frames are ignored.
    pub fn set_playhead(&mut self, frame: usize) -> bool {
        if frame >= self.len() {
            return false;
        }
        self.playhead = frame;
        true
    }

    /// Step the playhead forward one frame, wrapping to 0 past the end.
    pub fn advance_playhead(&mut self) -> usize {
        self.playhead = (self.playhead + 1) % self.len();
        self.playhead
    }

    // --- Reads ---

    /// Raw access to a cell, keyframe or mirror.
    #[must_use]
    pub fn cell(&self, frame: usize, layer: usize) -> Option<&ExposureCell> {
        self.rows.get(frame)?.get(layer)
    }

    #[must_use]
    pub fn is_keyframe(&self, frame: usize, layer: usize) -> bool {
        self.cell(frame, layer).is_some_and(|c| c.is_keyframe)
    }

    /// Index of the nearest keyframe at or before `frame` on `layer`.
    #[must_use]
    pub fn keyframe_at_or_before(&self, frame: usize, layer: usize) -> Option<usize> {
        if layer >= self.layer_count() {
            return None;
        }
        let last = frame.min(self.len().checked_sub(1)?);
        (0..=last).rev().find(|&i| self.rows[i][layer].is_keyframe)
    }

    /// Index of the nearest keyframe strictly before `frame` on `layer`.
    #[must_use]
    pub fn keyframe_before(&self, frame: usize, layer: usize) -> Option<usize> {
        self.keyframe_at_or_before(frame.checked_sub(1)?, layer)
    }

    /// The objects visible at `(frame, layer)`: those of the nearest keyframe
    /// at or before `frame`, or nothing.
    #[must_use]
    pub fn exposed(&self, frame: usize, layer: usize) -> &[SceneObject] {
        if frame >= self.len() {
            return &[];
        }
        match self.keyframe_at_or_before(frame, layer) {
            Some(key) => self.rows[key][layer].objects.as_slice(),
            None => &[],
        }
    }

    /// Mutable objects of a keyframe cell. `None` when the cell is a mirror or
    /// out of range. Callers must [`Timeline::save_frame`] afterwards so the
    /// edit reaches the following mirrors.
    pub fn keyframe_objects_mut(&mut self, frame: usize, layer: usize) -> Option<&mut Vec<SceneObject>> {
        let cell = self.rows.get_mut(frame)?.get_mut(layer)?;
        cell.is_keyframe.then_some(&mut cell.objects)
    }

    // --- Keyframe edits ---

    /// Make `(frame, layer)` a keyframe holding `objects`, then propagate
    /// forward until the next keyframe.
    pub fn set_keyframe(&mut self, frame: usize, layer: usize, objects: Vec<SceneObject>) {
        let Some(cell) = self.rows.get_mut(frame).and_then(|row| row.get_mut(layer)) else {
            debug!(frame, layer, "set_keyframe out of range");
            return;
        };
        cell.objects = objects;
        cell.is_keyframe = true;
        let swept = self.propagate_from(frame, layer);
        debug!(frame, layer, objects = self.rows[frame][layer].objects.len(), swept, "keyframe set");
    }

    /// Promote a mirror cell to a keyframe, keeping the objects it mirrors.
    /// Returns `true` if the cell changed.
    pub fn ensure_keyframe(&mut self, frame: usize, layer: usize) -> bool {
        let Some(cell) = self.rows.get_mut(frame).and_then(|row| row.get_mut(layer)) else {
            return false;
        };
        if cell.is_keyframe {
            return false;
        }
        cell.is_keyframe = true;
        debug!(frame, layer, "mirror promoted to keyframe");
        true
    }

    /// Mark `(frame, layer)` a keyframe and push its current objects forward.
    pub fn save_frame(&mut self, frame: usize, layer: usize) {
        self.ensure_keyframe(frame, layer);
        if self.is_keyframe(frame, layer) {
            self.propagate_from(frame, layer);
        }
    }

    /// Turn a keyframe back into a mirror of the keyframe before it. Without an
    /// earlier keyframe the swept cells are left empty. No-op on mirror cells.
    pub fn clear_keyframe(&mut self, frame: usize, layer: usize) {
        if !self.is_keyframe(frame, layer) {
            return;
        }
        let cell = &mut self.rows[frame][layer];
        cell.objects.clear();
        cell.is_keyframe = false;

        let source = self
            .keyframe_before(frame, layer)
            .map(|prev| self.rows[prev][layer].objects.clone())
            .unwrap_or_default();
        let mut swept = 0;
        for row in &mut self.rows[frame..] {
            let cell = &mut row[layer];
            if cell.is_keyframe {
                break;
            }
            cell.objects = source.iter().map(SceneObject::deep_copy).collect();
            swept += 1;
        }
        debug!(frame, layer, swept, "keyframe cleared");
    }

    /// Copy the nearest earlier keyframe into `target` as a new keyframe.
    /// No-op when no earlier keyframe exists.
    pub fn duplicate_into(&mut self, target: usize, layer: usize) {
        if target >= self.len() {
            return;
        }
        let Some(source) = self.keyframe_before(target, layer) else {
            debug!(target, layer, "duplicate_into: no earlier keyframe");
            return;
        };
        let copies = self.rows[source][layer].objects.iter().map(SceneObject::deep_copy).collect();
        self.set_keyframe(target, layer, copies);
    }

    /// Overwrite mirrors after `frame` with copies of its objects. Returns the
    /// number of cells written.
    fn propagate_from(&mut self, frame: usize, layer: usize) -> usize {
        let (head, tail) = self.rows.split_at_mut(frame + 1);
        let source = &head[frame][layer].objects;
        let mut swept = 0;
        for row in tail {
            let cell = &mut row[layer];
            if cell.is_keyframe {
                break;
            }
            cell.objects = source.iter().map(SceneObject::deep_copy).collect();
            swept += 1;
        }
        swept
    }

    // --- Structure ---

    /// Grow or truncate to `new_len` frames (at least one). New frames are
    /// mirrors; the playhead is clamped into range.
    pub fn resize(&mut self, new_len: usize) {
        let new_len = new_len.max(1);
        let old_len = self.len();
        if new_len > old_len {
            let layers = self.layer_count();
            self.rows.resize_with(new_len, || vec![ExposureCell::default(); layers]);
            for layer in 0..layers {
                if let Some(key) = self.keyframe_at_or_before(old_len - 1, layer) {
                    self.propagate_from(key, layer);
                }
            }
        } else {
            self.rows.truncate(new_len);
        }
        if self.playhead >= new_len {
            self.playhead = new_len - 1;
        }
        info!(old_len, new_len, "timeline resized");
    }

    /// Append an empty layer on top. Returns its index.
    pub fn add_layer(&mut self) -> usize {
        for row in &mut self.rows {
            row.push(ExposureCell::default());
        }
        self.layers.push(Layer::numbered(self.layers.len() + 1));
        let index = self.layers.len() - 1;
        info!(layer = index, "layer added");
        index
    }

    // --- Onion skin ---

    /// Ghost frames around `frame` and their opacity, nearest first, earlier
    /// frames before later ones. Empty when disabled.
    #[must_use]
    pub fn onion_frames(&self, frame: usize, onion: &OnionSkin) -> Vec<(usize, f64)> {
        if !onion.enabled || frame >= self.len() {
            return Vec::new();
        }
        #[allow(clippy::cast_precision_loss)]
        let falloff = |i: usize, n: usize| ONION_BASE_ALPHA * (1.0 - i as f64 / (n as f64 + 1.0));

        let back = (1..=onion.back)
            .map_while(|i| frame.checked_sub(i).map(|f| (f, falloff(i, onion.back))));
        let forward = (1..=onion.forward)
            .map(|i| (frame + i, falloff(i, onion.forward)))
            .take_while(|&(f, _)| f < self.len());
        back.chain(forward).collect()
    }
}
