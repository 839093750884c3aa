// Upload-widget state transitions.
//
// The browser demo drives its form from a shared data-bound store. Here the
// same lifecycle is an explicit reducer: every UI event maps to a pure
// transition on `WidgetState`, and the busy flag keeps at most one
// compression in flight per widget. The surrounding event loop is expected
// to call `Compressor::compress` between `CompressStarted` and
// `CompressFinished`.

use crate::asset::{CompressionParameters, SourceAsset};
use crate::pipeline::{CompressionResult, data_url};

/// File extensions the upload control accepts by default.
///
/// Mirrors the demo page's filter; matching is case-insensitive.
pub const DEFAULT_ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "png", "gif"];

/// Whether `name` passes an extension filter.
pub fn accepts_extension(name: &str, accepted: &[&str]) -> bool {
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => return false,
    };
    accepted.iter().any(|a| a.eq_ignore_ascii_case(ext))
}

// ---------------------------------------------------------------------------
// State and events
// ---------------------------------------------------------------------------

/// Everything the demo page displays about one selected file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetState {
    /// Current resize/quality targets.
    pub params: CompressionParameters,
    /// The file currently selected, if any.
    pub selected: Option<SourceAsset>,
    /// Result of the last finished compression for the current selection.
    pub last_result: Option<CompressionResult>,
    /// A compression call is in flight; further triggers are ignored.
    pub busy: bool,
}

/// One UI event relevant to the pipeline.
#[derive(Debug, Clone)]
pub enum WidgetEvent {
    /// The user picked a file.
    FileSelected(SourceAsset),
    /// The parameter fields changed.
    ParamsChanged(CompressionParameters),
    /// A compression call is about to start.
    CompressStarted,
    /// A compression call came back.
    CompressFinished(CompressionResult),
    /// Selection and result were cleared.
    Cleared,
}

impl WidgetState {
    /// State with explicit starting parameters.
    pub fn with_params(params: CompressionParameters) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Apply one event, producing the next state.
    ///
    /// `CompressStarted` while busy (or with nothing selected) is a no-op;
    /// the widget serializes compression calls by construction. A new
    /// selection while busy is also ignored, matching a file control that
    /// is disabled during processing.
    pub fn apply(mut self, event: WidgetEvent) -> WidgetState {
        match event {
            WidgetEvent::FileSelected(asset) => {
                if !self.busy {
                    self.selected = Some(asset);
                    self.last_result = None;
                }
            }
            WidgetEvent::ParamsChanged(params) => {
                self.params = params;
            }
            WidgetEvent::CompressStarted => {
                if !self.busy && self.selected.is_some() {
                    self.busy = true;
                }
            }
            WidgetEvent::CompressFinished(result) => {
                self.busy = false;
                self.last_result = Some(result);
            }
            WidgetEvent::Cleared => {
                self.selected = None;
                self.last_result = None;
                self.busy = false;
            }
        }
        self
    }

    /// Whether the compress trigger should be enabled.
    pub fn can_compress(&self) -> bool {
        self.selected.is_some() && !self.busy
    }

    /// Encoded size of the selected file, for the "original" pane title.
    pub fn original_size(&self) -> Option<usize> {
        self.selected.as_ref().map(SourceAsset::size)
    }

    /// Output size of the last result, for the "compressed" pane title.
    pub fn compressed_size(&self) -> Option<usize> {
        self.last_result.as_ref().map(CompressionResult::size)
    }

    /// Data URL of the selected file, for the "original" preview pane.
    pub fn original_data_url(&self) -> Option<String> {
        self.selected
            .as_ref()
            .map(|asset| data_url(&asset.media_type, &asset.bytes))
    }

    /// Data URL of the last result, for the "compressed" preview pane.
    pub fn compressed_data_url(&self) -> Option<String> {
        self.last_result.as_ref().map(CompressionResult::data_url)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
