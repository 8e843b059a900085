//! Engine: owns the timeline and UI state and turns input into scene edits.
//!
//! The engine is headless. The host forwards pointer events in canvas
//! coordinates plus toolbar and timeline commands, and reacts to the returned
//! [`Action`]s (repaint, refresh the timeline strip, rasterize for a fill).
//! Rendering goes through any [`RenderBackend`].
//!
//! Every drawing tool writes into the cell at (playhead, active layer). The
//! cell becomes a keyframe on pointer-down, keeping whatever it mirrored, and
//! each commit is pushed forward to the following mirror cells.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use image::RgbaImage;
use tracing::{debug, info};

use crate::config::ProjectConfig;
use crate::consts::{COMMIT_STEPS, PREVIEW_STEPS};
use crate::doc::{ObjectId, SceneObject};
use crate::eraser;
use crate::fill;
use crate::geom::{Point, Transform};
use crate::hit::{self, HitPart, ObjectRef};
use crate::input::{InputState, Modifiers, Tool, ToolSettings, UiState};
use crate::playback::{Playback, Tick};
use crate::render::{self, PathCache, RenderBackend, SceneView};
use crate::smooth;
use crate::timeline::{OnionSkin, Timeline};
use crate::transform::TransformDrag;

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The canvas should be repainted.
    RenderNeeded,
    /// Keyframe layout, frame count or layers changed; refresh the timeline strip.
    TimelineChanged,
    PlayheadMoved(usize),
    /// Playback is not running; stop scheduling ticks.
    PlaybackStopped,
    LayerSwitched(usize),
    SelectionChanged(Option<ObjectRef>),
    /// A new object was added to the active cell.
    ObjectCommitted(ObjectId),
    /// Rasterize the current frame and call [`Engine::apply_fill`] with `at`.
    FillRequested { at: Point },
}

/// The editor core.
pub struct Engine {
    pub config: ProjectConfig,
    pub timeline: Timeline,
    pub ui: UiState,
    pub input: InputState,
    pub playback: Playback,
    cache: PathCache,
}

impl Engine {
    #[must_use]
    pub fn new(config: ProjectConfig) -> Self {
        info!(
            width = config.width,
            height = config.height,
            fps = config.frame_rate,
            frames = config.frame_count,
            "project created"
        );
        Self {
            timeline: Timeline::new(config.frame_count as usize, config.frame_rate),
            config,
            ui: UiState::default(),
            input: InputState::Idle,
            playback: Playback::new(),
            cache: PathCache::new(),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn playhead(&self) -> usize {
        self.timeline.playhead()
    }

    #[must_use]
    pub fn active_layer(&self) -> usize {
        self.ui.active_layer
    }

    #[must_use]
    pub fn selection(&self) -> Option<ObjectRef> {
        self.ui.selection
    }

    /// The selected object as currently exposed.
    #[must_use]
    pub fn selected_object(&self) -> Option<&SceneObject> {
        selected_in(&self.timeline, &self.ui)
    }

    /// Objects visible at the playhead on the active layer.
    #[must_use]
    pub fn active_objects(&self) -> &[SceneObject] {
        self.timeline.exposed(self.playhead(), self.ui.active_layer)
    }

    /// The uncommitted object of the gesture in progress, for live preview.
    #[must_use]
    pub fn preview(&self) -> Option<SceneObject> {
        match &self.input {
            InputState::Drawing { samples } if !samples.is_empty() => Some(SceneObject::stroke(
                smooth::catmull_rom(samples, PREVIEW_STEPS),
                self.ui.settings.brush_style(),
                Transform::default(),
            )),
            InputState::Shaping { start, current } => Some(shape_between(&self.ui.settings, *start, *current)),
            _ => None,
        }
    }

    // --- Tools and settings ---

    /// Switch tools. Leaving the transform tool drops the selection.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.ui.tool = tool;
        self.input = InputState::Idle;
        let mut actions = Vec::new();
        if tool != Tool::Transform && self.ui.selection.take().is_some() {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.ui.settings
    }

    pub fn set_onion_skin(&mut self, onion: OnionSkin) -> Vec<Action> {
        self.ui.onion = onion;
        vec![Action::RenderNeeded]
    }

    // --- Layers and frames ---

    /// Make `layer` the drawing target. Out-of-range layers are ignored.
    pub fn select_layer(&mut self, layer: usize) -> Vec<Action> {
        if layer >= self.timeline.layer_count() {
            debug!(layer, "select_layer out of range");
            return Vec::new();
        }
        self.ui.active_layer = layer;
        self.clear_selection();
        vec![Action::LayerSwitched(layer), Action::RenderNeeded]
    }

    /// Append a layer on top and make it active.
    pub fn add_layer(&mut self) -> Vec<Action> {
        let layer = self.timeline.add_layer();
        self.ui.active_layer = layer;
        self.clear_selection();
        vec![Action::LayerSwitched(layer), Action::TimelineChanged, Action::RenderNeeded]
    }

    /// Move the playhead. Out-of-range frames are ignored.
    pub fn select_frame(&mut self, frame: usize) -> Vec<Action> {
        if !self.timeline.set_playhead(frame) {
            debug!(frame, "select_frame out of range");
            return Vec::new();
        }
        self.clear_selection();
        vec![Action::PlayheadMoved(frame), Action::RenderNeeded]
    }

    /// Change the number of frames (at least one).
    pub fn resize_timeline(&mut self, frames: usize) -> Vec<Action> {
        self.timeline.resize(frames);
        self.clear_selection();
        vec![Action::TimelineChanged, Action::PlayheadMoved(self.playhead()), Action::RenderNeeded]
    }

    /// Empty keyframe at the playhead on the active layer.
    pub fn insert_blank_keyframe(&mut self) -> Vec<Action> {
        self.timeline.set_keyframe(self.playhead(), self.ui.active_layer, Vec::new());
        self.clear_selection();
        vec![Action::TimelineChanged, Action::RenderNeeded]
    }

    /// Copy of the previous keyframe at the playhead on the active layer.
    pub fn insert_duplicate_keyframe(&mut self) -> Vec<Action> {
        self.timeline.duplicate_into(self.playhead(), self.ui.active_layer);
        self.clear_selection();
        vec![Action::TimelineChanged, Action::RenderNeeded]
    }

    /// Turn the keyframe at the playhead back into a mirror.
    pub fn delete_keyframe(&mut self) -> Vec<Action> {
        self.timeline.clear_keyframe(self.playhead(), self.ui.active_layer);
        self.clear_selection();
        vec![Action::TimelineChanged, Action::RenderNeeded]
    }

    // --- Playback ---

    pub fn play(&mut self, now: f64) {
        self.clear_selection();
        self.playback.start(now);
    }

    pub fn stop(&mut self) {
        self.playback.stop();
    }

    pub fn set_frame_rate(&mut self, fps: u32, now: f64) {
        self.playback.set_frame_rate(&mut self.timeline, fps, now);
    }

    /// Host animation tick with a millisecond timestamp. Returns
    /// [`Action::PlaybackStopped`] once playback is no longer running.
    pub fn tick(&mut self, now: f64) -> Vec<Action> {
        match self.playback.tick(now, &mut self.timeline) {
            Tick::Advanced(frame) => {
                self.clear_selection();
                vec![Action::PlayheadMoved(frame), Action::RenderNeeded]
            }
            Tick::Idle => Vec::new(),
            Tick::Stopped => vec![Action::PlaybackStopped],
        }
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        let (frame, layer) = (self.playhead(), self.ui.active_layer);
        if self.ui.tool.is_drawing() {
            self.timeline.ensure_keyframe(frame, layer);
        }

        match self.ui.tool {
            Tool::Brush => {
                self.input = InputState::Drawing { samples: vec![pt] };
                vec![Action::RenderNeeded]
            }
            Tool::Shape => {
                self.input = InputState::Shaping { start: pt, current: pt };
                vec![Action::RenderNeeded]
            }
            Tool::Eraser => {
                self.input = InputState::Erasing { last: pt };
                if self.erase_at(pt) { vec![Action::RenderNeeded] } else { Vec::new() }
            }
            Tool::Fill => vec![Action::FillRequested { at: pt }],
            Tool::Transform => self.begin_transform(pt),
        }
    }

    pub fn on_pointer_move(&mut self, pt: Point, modifiers: Modifiers) -> Vec<Action> {
        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Drawing { samples } => {
                samples.push(pt);
                vec![Action::RenderNeeded]
            }
            InputState::Shaping { current, .. } => {
                *current = pt;
                vec![Action::RenderNeeded]
            }
            InputState::Erasing { last } => {
                let from = std::mem::replace(last, pt);
                let radius = self.ui.settings.eraser_radius;
                let mut changed = false;
                for center in eraser::interpolate(from, pt, radius) {
                    changed |= self.erase_at(center);
                }
                if changed { vec![Action::RenderNeeded] } else { Vec::new() }
            }
            InputState::Transforming { target, drag } => {
                let (target, drag) = (*target, *drag);
                let frame = self.timeline.playhead();
                self.timeline.ensure_keyframe(frame, target.layer);
                let moved = self
                    .timeline
                    .keyframe_objects_mut(frame, target.layer)
                    .and_then(|objects| objects.get_mut(target.index))
                    .is_some_and(|obj| drag.update(obj, pt, modifiers.shift));
                if moved { vec![Action::RenderNeeded] } else { Vec::new() }
            }
        }
    }

    pub fn on_pointer_up(&mut self, pt: Point) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle | InputState::Erasing { .. } => Vec::new(),
            InputState::Drawing { samples } => {
                if samples.is_empty() {
                    return Vec::new();
                }
                let smoothed = smooth::catmull_rom(&samples, COMMIT_STEPS);
                let (points, pivot) = smooth::center_on_bounds(&smoothed);
                let stroke = SceneObject::stroke(points, self.ui.settings.brush_style(), Transform::at(pivot));
                self.commit(stroke)
            }
            InputState::Shaping { start, .. } => {
                if start == pt {
                    return vec![Action::RenderNeeded];
                }
                let shape = shape_between(&self.ui.settings, start, pt);
                self.commit(shape)
            }
            InputState::Transforming { target, .. } => {
                let frame = self.playhead();
                if self.timeline.is_keyframe(frame, target.layer) {
                    self.timeline.save_frame(frame, target.layer);
                }
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Complete a fill requested by [`Action::FillRequested`], sampling the
    /// host's rasterization of the current frame.
    pub fn apply_fill(&mut self, at: Point, raster: &RgbaImage) -> Vec<Action> {
        match fill::flood_fill(raster, at, self.ui.settings.fill_color) {
            Some(region) => self.commit(SceneObject::fill(region)),
            None => Vec::new(),
        }
    }

    // --- Rendering ---

    /// Draw the current frame with onion skin, preview and selection.
    ///
    /// # Errors
    ///
    /// Propagates the first backend error.
    pub fn render<B: RenderBackend>(&mut self, backend: &mut B) -> Result<(), B::Error> {
        let frame = self.timeline.playhead();
        let ghosts = if self.input.is_drawing() {
            Vec::new()
        } else {
            self.timeline.onion_frames(frame, &self.ui.onion)
        };
        let overlay: Vec<SceneObject> = self.preview().into_iter().collect();
        let view = SceneView {
            width: f64::from(self.config.width),
            height: f64::from(self.config.height),
            frame,
            ghosts: &ghosts,
            overlay: &overlay,
            selected: selected_in(&self.timeline, &self.ui),
        };
        render::draw_scene(backend, &self.timeline, &view, &mut self.cache)
    }

    // --- Internals ---

    fn clear_selection(&mut self) {
        self.ui.selection = None;
        if matches!(self.input, InputState::Transforming { .. }) {
            self.input = InputState::Idle;
        }
    }

    fn begin_transform(&mut self, pt: Point) -> Vec<Action> {
        if let Some(target) = self.ui.selection {
            if let Some(obj) = self.selected_object() {
                if let (Some(part), Some(t)) = (hit::handle_at(obj, pt), obj.transform()) {
                    let drag = TransformDrag::begin(part, t, pt);
                    self.input = InputState::Transforming { target, drag };
                    return vec![Action::RenderNeeded];
                }
            }
        }

        let frame = self.playhead();
        let Some(target) = hit::object_at(&self.timeline, frame, pt) else {
            let was_selected = self.ui.selection.take().is_some();
            return if was_selected {
                vec![Action::SelectionChanged(None), Action::RenderNeeded]
            } else {
                Vec::new()
            };
        };
        let Some(t) = self.timeline.exposed(frame, target.layer).get(target.index).and_then(SceneObject::transform)
        else {
            return Vec::new();
        };

        let drag = TransformDrag::begin(HitPart::Body, t, pt);
        let mut actions = Vec::new();
        if target.layer != self.ui.active_layer {
            self.ui.active_layer = target.layer;
            actions.push(Action::LayerSwitched(target.layer));
        }
        self.ui.selection = Some(target);
        self.input = InputState::Transforming { target, drag };
        actions.push(Action::SelectionChanged(Some(target)));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// One eraser application on the active cell. Returns whether it changed.
    fn erase_at(&mut self, center: Point) -> bool {
        let (frame, layer) = (self.timeline.playhead(), self.ui.active_layer);
        let erased = eraser::erase(self.timeline.exposed(frame, layer), center, self.ui.settings.eraser_radius);
        if !erased.changed() {
            return false;
        }
        self.timeline.set_keyframe(frame, layer, erased.objects);
        self.ui.selection = None;
        true
    }

    /// Append `obj` to the active cell and push it to the following mirrors.
    fn commit(&mut self, obj: SceneObject) -> Vec<Action> {
        let (frame, layer) = (self.timeline.playhead(), self.ui.active_layer);
        self.timeline.ensure_keyframe(frame, layer);
        let id = obj.id;
        let Some(objects) = self.timeline.keyframe_objects_mut(frame, layer) else {
            return Vec::new();
        };
        objects.push(obj);
        self.timeline.save_frame(frame, layer);
        debug!(frame, layer, %id, "object committed");
        vec![Action::ObjectCommitted(id), Action::RenderNeeded]
    }
}

fn selected_in<'a>(timeline: &'a Timeline, ui: &UiState) -> Option<&'a SceneObject> {
    let sel = ui.selection?;
    timeline.exposed(timeline.playhead(), sel.layer).get(sel.index)
}

/// A shape from the current settings spanning `start` to `end`, pivoted at
/// their midpoint.
fn shape_between(settings: &ToolSettings, start: Point, end: Point) -> SceneObject {
    let pivot = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
    SceneObject::shape(settings.shape_kind, start - pivot, end - pivot, settings.shape_style(), Transform::at(pivot))
}
