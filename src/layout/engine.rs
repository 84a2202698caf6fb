//! Layout engine: drives a [`CascadeSource`] through one full pass and
//! answers geometry queries against the result.
//!
//! The engine is either invalid (no geometry) or valid (every section built).
//! A pass assembles its sections off to the side and installs them in one
//! step, so a query never sees a half-built layout. Queries issued while
//! invalid return empty results rather than preparing implicitly.

use blake3::Hash;
use serde::Serialize;
use serde_json::json;

use crate::error::{LayoutError, Result};
use crate::geometry::{Rect, Size};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::LayoutMetrics;
use crate::source::CascadeSource;

use super::column::{ItemId, PlacedItem};
use super::config::LayoutConfig;
use super::section::{Section, SectionRequest};

pub const ENGINE_TARGET: &str = "cascade::layout.engine";
pub const METRICS_TARGET: &str = "cascade::layout.metrics";

/// Geometry produced by one completed pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedLayout {
    sections: Vec<Section>,
    content_size: Size,
    container_width: f64,
    fingerprint: Hash,
}

impl PreparedLayout {
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn content_size(&self) -> Size {
        self.content_size
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    pub fn fingerprint(&self) -> Hash {
        self.fingerprint
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LayoutState {
    #[default]
    Invalid,
    Valid(PreparedLayout),
}

/// Summary of a completed [`LayoutEngine::prepare`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepareOutcome {
    pub sections: usize,
    pub items: usize,
    /// Number of clamped inputs and degenerate items seen during the pass.
    pub issues: usize,
    /// False when the pass reproduced the previous pass's geometry exactly.
    pub changed: bool,
}

#[derive(Serialize)]
struct LayoutSnapshot {
    content_size: Size,
    items: Vec<PlacedItem>,
}

/// Cascading (masonry) layout engine.
///
/// ```
/// use cascade_layout::{LayoutConfig, LayoutEngine, Size, StaticSection, StaticSource};
///
/// let source = StaticSource::new(200.0)
///     .with_section(StaticSection::uniform(2, 4, Size::new(100.0, 100.0)));
/// let mut engine = LayoutEngine::new(LayoutConfig::default());
/// engine.prepare(&source);
///
/// assert_eq!(engine.content_size(), Size::new(200.0, 200.0));
/// ```
pub struct LayoutEngine {
    config: LayoutConfig,
    state: LayoutState,
    diagnostics: Vec<LayoutError>,
    last_width: Option<f64>,
    last_fingerprint: Option<Hash>,
    metrics: LayoutMetrics,
    logger: Option<Logger>,
    log_metrics: bool,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            state: LayoutState::Invalid,
            diagnostics: Vec::new(),
            last_width: None,
            last_fingerprint: None,
            metrics: LayoutMetrics::new(),
            logger: None,
            log_metrics: false,
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Emit a metrics snapshot to the logger after every pass.
    pub fn with_metrics_logging(mut self, enabled: bool) -> Self {
        self.log_metrics = enabled;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the configuration. Existing geometry is discarded.
    pub fn set_config(&mut self, config: LayoutConfig) {
        if self.config != config {
            self.config = config;
            self.invalidate_with_reason("config_changed");
        }
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn is_prepared(&self) -> bool {
        matches!(self.state, LayoutState::Valid(_))
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Conditions recorded during the most recent pass.
    pub fn diagnostics(&self) -> &[LayoutError] {
        &self.diagnostics
    }

    /// Rebuild every section from scratch.
    pub fn prepare<S>(&mut self, source: &S) -> PrepareOutcome
    where
        S: CascadeSource + ?Sized,
    {
        let config = self.config.sanitized();
        let mut issues = Vec::new();

        let raw_width = source.container_width();
        let container_width = clamp_width(raw_width);
        if container_width != raw_width {
            issues.push(LayoutError::InvalidWidth(raw_width));
        }

        let mut sections: Vec<Section> = Vec::new();
        for index in 0..source.section_count() {
            let top_y = sections
                .last()
                .map(|section| section.frame().bottom())
                .unwrap_or(0.0);
            let request = SectionRequest {
                index,
                item_count: source.item_count(index),
                column_count: source.column_count(index),
                top_y,
                container_width,
            };
            let section = Section::build(
                request,
                &config,
                |item| source.intrinsic_size(item),
                &mut issues,
            );
            sections.push(section);
        }

        let items: usize = sections.iter().map(Section::item_count).sum();
        let content_size = Size::new(
            container_width,
            sections
                .iter()
                .map(|section| section.frame().bottom())
                .fold(0.0, f64::max),
        );
        let fingerprint = fingerprint_sections(&sections, container_width);
        let outcome = PrepareOutcome {
            sections: sections.len(),
            items,
            issues: issues.len(),
            changed: self.last_fingerprint != Some(fingerprint),
        };

        let degenerate = issues
            .iter()
            .filter(|issue| matches!(issue, LayoutError::DegenerateGeometry { .. }))
            .count();
        self.metrics.record_pass(outcome.sections, items);
        self.metrics.record_degenerate(degenerate);
        self.metrics.record_clamped(issues.len() - degenerate);

        self.state = LayoutState::Valid(PreparedLayout {
            sections,
            content_size,
            container_width,
            fingerprint,
        });
        self.last_width = Some(container_width);
        self.last_fingerprint = Some(fingerprint);
        self.diagnostics = issues;

        self.log_pass(&outcome, content_size);
        outcome
    }

    /// Prepare only when no geometry is cached. Returns whether a pass ran.
    pub fn ensure_prepared<S>(&mut self, source: &S) -> bool
    where
        S: CascadeSource + ?Sized,
    {
        if self.is_prepared() {
            return false;
        }
        self.prepare(source);
        true
    }

    /// Discard cached geometry. Calling this while already invalid is a no-op.
    pub fn invalidate(&mut self) {
        self.invalidate_with_reason("requested");
    }

    /// Whether new viewport bounds require a fresh pass.
    ///
    /// Only a width change matters: column widths derive from it, while
    /// viewport height never feeds into placement. The new width is clamped
    /// the same way `prepare` clamps the container width.
    pub fn should_invalidate_for_bounds(&self, new_bounds: Size) -> bool {
        self.last_width
            .is_some_and(|width| width != clamp_width(new_bounds.width))
    }

    /// Notify the engine of new viewport bounds, invalidating on a width
    /// change. Returns whether the layout was invalidated.
    pub fn bounds_changed(&mut self, new_bounds: Size) -> bool {
        self.metrics.record_bounds_check();
        if !self.should_invalidate_for_bounds(new_bounds) {
            return false;
        }
        self.invalidate_with_reason("width_changed");
        true
    }

    pub fn sections(&self) -> &[Section] {
        match &self.state {
            LayoutState::Valid(layout) => layout.sections(),
            LayoutState::Invalid => &[],
        }
    }

    /// Total scrollable extent; zero while invalid.
    pub fn content_size(&self) -> Size {
        match self.prepared("content_size") {
            Ok(layout) => layout.content_size,
            Err(_) => Size::ZERO,
        }
    }

    /// Items whose rect overlaps `query`, grouped by section then column.
    pub fn items_intersecting(&self, query: Rect) -> Vec<PlacedItem> {
        let Ok(layout) = self.prepared("items_intersecting") else {
            return Vec::new();
        };
        layout
            .sections
            .iter()
            .filter(|section| section.frame().intersects(&query))
            .flat_map(|section| section.items_intersecting(&query).copied())
            .collect()
    }

    pub fn item_at(&self, id: ItemId) -> Option<Rect> {
        let layout = self.prepared("item_at").ok()?;
        layout.sections.get(id.section)?.item_rect(id.item)
    }

    /// Hash of every placed rect from the current pass.
    pub fn fingerprint(&self) -> Option<Hash> {
        match &self.state {
            LayoutState::Valid(layout) => Some(layout.fingerprint),
            LayoutState::Invalid => None,
        }
    }

    /// JSON dump of the current geometry, items in index order.
    pub fn snapshot_json(&self) -> Result<String> {
        let layout = self.prepared("snapshot_json")?;
        let snapshot = LayoutSnapshot {
            content_size: layout.content_size,
            items: layout
                .sections
                .iter()
                .flat_map(Section::items_in_index_order)
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    fn prepared(&self, query: &str) -> Result<&PreparedLayout> {
        match &self.state {
            LayoutState::Valid(layout) => Ok(layout),
            LayoutState::Invalid => {
                self.emit(
                    LogLevel::Debug,
                    "query_before_prepare",
                    [json_kv("query", query)],
                );
                Err(LayoutError::NotPrepared)
            }
        }
    }

    fn invalidate_with_reason(&mut self, reason: &str) {
        if matches!(self.state, LayoutState::Invalid) {
            return;
        }
        self.state = LayoutState::Invalid;
        self.metrics.record_invalidation();
        self.emit(LogLevel::Debug, "invalidated", [json_kv("reason", reason)]);
    }

    fn log_pass(&self, outcome: &PrepareOutcome, content_size: Size) {
        let Some(logger) = &self.logger else {
            return;
        };

        for issue in &self.diagnostics {
            self.emit(
                LogLevel::Warn,
                "layout_issue",
                [
                    json_kv("kind", issue.kind()),
                    json_kv("detail", issue.to_string()),
                ],
            );
        }

        self.emit(
            LogLevel::Info,
            "prepare_completed",
            [
                json_kv("sections", outcome.sections),
                json_kv("items", outcome.items),
                json_kv("issues", outcome.issues),
                json_kv("changed", outcome.changed),
                json_kv("content_width", json!(content_size.width)),
                json_kv("content_height", json!(content_size.height)),
            ],
        );

        if self.log_metrics
            && logger
                .log_event(self.metrics.snapshot().to_log_event(METRICS_TARGET))
                .is_err()
        {
            self.metrics.record_log_failure();
        }
    }

    fn emit<const N: usize>(
        &self,
        level: LogLevel,
        message: &str,
        fields: [(String, serde_json::Value); N],
    ) {
        if let Some(logger) = &self.logger {
            if logger.enabled(level)
                && logger
                    .log_event(event_with_fields(level, ENGINE_TARGET, message, fields))
                    .is_err()
            {
                self.metrics.record_log_failure();
            }
        }
    }
}

/// Negative and non-finite widths lay out as zero.
fn clamp_width(width: f64) -> f64 {
    if width.is_finite() && width >= 0.0 {
        width
    } else {
        0.0
    }
}

fn fingerprint_sections(sections: &[Section], container_width: f64) -> Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&container_width.to_bits().to_le_bytes());
    for section in sections {
        hasher.update(&(section.index() as u64).to_le_bytes());
        hasher.update(&(section.item_count() as u64).to_le_bytes());
        for placed in section.items_in_index_order() {
            hasher.update(&(placed.id.item as u64).to_le_bytes());
            for value in [placed.rect.x, placed.rect.y, placed.rect.width, placed.rect.height] {
                hasher.update(&value.to_bits().to_le_bytes());
            }
        }
    }
    hasher.finalize()
}
