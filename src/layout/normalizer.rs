//! Span normalization: grouping raw spans into reading-ordered lines.

use std::collections::BTreeMap;

use crate::cleanup::CleanupPipeline;
use crate::model::{Line, TextSpan};
use crate::options::{NormalizerOptions, PageSelection, YAxis};

/// Lines of one document plus the counts of spans that needed special handling.
#[derive(Debug, Clone, Default)]
pub struct NormalizedLines {
    /// Lines in reading order: page, then top to bottom, then left to right
    pub lines: Vec<Line>,
    /// Spans dropped for non-finite coordinates
    pub dropped_spans: usize,
    /// Spans kept as content but lacking usable font metadata
    pub degraded_spans: usize,
}

/// Groups spans into lines per page.
pub struct SpanNormalizer<'a> {
    options: &'a NormalizerOptions,
    pages: &'a PageSelection,
    cleanup: CleanupPipeline,
}

impl<'a> SpanNormalizer<'a> {
    /// Create a new normalizer.
    pub fn new(options: &'a NormalizerOptions, pages: &'a PageSelection) -> Self {
        Self {
            options,
            pages,
            cleanup: CleanupPipeline::default(),
        }
    }

    /// Normalize spans into lines. Never fails; unusable spans are counted.
    pub fn normalize(&self, spans: &[TextSpan]) -> NormalizedLines {
        let mut result = NormalizedLines::default();
        let mut pages: BTreeMap<u32, Vec<TextSpan>> = BTreeMap::new();

        for span in spans {
            if !self.pages.includes(span.page) {
                continue;
            }
            if !span.has_finite_geometry() {
                result.dropped_spans += 1;
                continue;
            }

            let text = self.cleanup.process_inline(&span.text);
            if text.is_empty() {
                continue;
            }
            if span.usable_font_size().is_none() {
                result.degraded_spans += 1;
            }

            let mut span = span.clone();
            span.text = text;
            if self.options.y_axis == YAxis::BottomUp {
                // Negating the top edge keeps relative order and gaps
                span.y = -(span.y + span.effective_height());
            }
            pages.entry(span.page).or_default().push(span);
        }

        if result.dropped_spans > 0 {
            log::warn!(
                "Dropped {} spans with non-finite coordinates",
                result.dropped_spans
            );
        }

        for (page, page_spans) in pages {
            let lines = self.group_page(page_spans);
            log::debug!("Page {}: {} lines", page, lines.len());
            result.lines.extend(lines);
        }

        result
    }

    /// Group one page's spans into rows by baseline, then split rows at wide gaps.
    fn group_page(&self, mut spans: Vec<TextSpan>) -> Vec<Line> {
        spans.sort_by(|a, b| {
            baseline(a)
                .partial_cmp(&baseline(b))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
        });

        let mut rows: Vec<Vec<TextSpan>> = Vec::new();
        let mut current_row: Vec<TextSpan> = Vec::new();
        let mut current_baseline: Option<f32> = None;

        for span in spans {
            let tolerance = span.nominal_size() * self.options.line_tolerance_ratio;
            match current_baseline {
                Some(y) if (baseline(&span) - y).abs() <= tolerance => {
                    current_row.push(span);
                }
                _ => {
                    if !current_row.is_empty() {
                        rows.push(std::mem::take(&mut current_row));
                    }
                    current_baseline = Some(baseline(&span));
                    current_row.push(span);
                }
            }
        }
        if !current_row.is_empty() {
            rows.push(current_row);
        }

        rows.into_iter()
            .flat_map(|row| self.split_row(row))
            .collect()
    }

    /// Split a row wherever the horizontal gap exceeds a few character widths.
    fn split_row(&self, mut row: Vec<TextSpan>) -> Vec<Line> {
        row.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        let mut lines = Vec::new();
        let mut current: Vec<TextSpan> = Vec::new();

        for span in row {
            if let Some(prev) = current.last() {
                let gap = span.x - prev.bbox().right();
                let char_width = prev.nominal_size().max(span.nominal_size()) * 0.5;
                if gap > char_width * self.options.max_gap_chars {
                    lines.push(Line::from_spans(std::mem::take(&mut current)));
                }
            }
            current.push(span);
        }
        if !current.is_empty() {
            lines.push(Line::from_spans(current));
        }

        lines
    }
}

fn baseline(span: &TextSpan) -> f32 {
    span.y + span.effective_height()
}
