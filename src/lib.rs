//! Editor core for frame-by-frame vector animation.
//!
//! Users paint strokes, shapes and fills onto a multi-layer, multi-frame
//! timeline, then scrub or play it back. This crate holds the scene model
//! and the geometric editing algorithms; the host (a browser page, a native
//! shell, a test) wires input events to the [`engine::Engine`], reacts to the
//! returned [`engine::Action`]s, and supplies a [`render::RenderBackend`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Owns timeline and UI state, dispatches input, emits actions |
//! | [`timeline`] | Sparse-keyframe exposure store, layers, onion-skin frames |
//! | [`doc`] | Scene objects: strokes, shapes, fill regions, styles, colors |
//! | [`geom`] | Points, transforms, bounding boxes, segment distance |
//! | [`smooth`] | Catmull-Rom stroke smoothing and re-centering |
//! | [`hit`] | Object and handle hit-testing |
//! | [`transform`] | Move, rotate and resize drag math |
//! | [`eraser`] | Stroke segmentation under the eraser |
//! | [`fill`] | Flood fill over a rendered raster |
//! | [`playback`] | Tick-driven playback clock |
//! | [`render`] | Backend trait, scene and selection drawing, path cache |
//! | `web` | Canvas 2D backend (feature `web`) |
//! | [`input`] | Tools, settings, modifiers, gesture state machine |
//! | [`config`] | Project creation parameters |
//! | [`consts`] | Shared numeric constants |

pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod eraser;
pub mod fill;
pub mod geom;
pub mod hit;
pub mod input;
pub mod playback;
pub mod render;
pub mod smooth;
pub mod timeline;
pub mod transform;
#[cfg(feature = "web")]
pub mod web;
