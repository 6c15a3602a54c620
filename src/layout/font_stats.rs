//! Document-wide font statistics.

use std::collections::HashMap;

use crate::model::Line;

/// Fallback body size when no line carries font metadata.
pub const DEFAULT_BODY_SIZE: f32 = 12.0;

/// Font size distribution of one document.
///
/// Built once per analysis call and dropped with it; nothing is cached
/// across documents.
#[derive(Debug, Clone)]
pub struct FontProfile {
    /// Body text font size
    pub body_size: f32,
    /// Line counts keyed by bucket index (size / bucket, rounded)
    pub size_histogram: HashMap<i32, usize>,
    /// Bucket width in points
    pub bucket: f32,
    /// Number of lines with usable font metadata
    pub sized_lines: usize,
    /// Whether the body size came from the sparse fallback
    pub sparse: bool,
}

impl FontProfile {
    /// Compute the profile from lines.
    ///
    /// The body size is the histogram mode (ties go to the larger size).
    /// With fewer than `sparse_threshold` sized lines it is the smallest
    /// observed size instead.
    pub fn from_lines(lines: &[Line], bucket: f32, sparse_threshold: usize) -> Self {
        let bucket = if bucket.is_finite() && bucket > 0.0 {
            bucket
        } else {
            0.5
        };

        let mut size_histogram: HashMap<i32, usize> = HashMap::new();
        let mut smallest: Option<f32> = None;
        let mut sized_lines = 0;

        for size in lines.iter().filter_map(|l| l.font_size) {
            sized_lines += 1;
            *size_histogram.entry(bucket_key(size, bucket)).or_insert(0) += 1;
            smallest = Some(smallest.map_or(size, |s: f32| s.min(size)));
        }

        let (body_size, sparse) = match smallest {
            None => (DEFAULT_BODY_SIZE, true),
            Some(min) if sized_lines < sparse_threshold => (min, true),
            Some(_) => {
                let (key, _) = size_histogram
                    .iter()
                    .max_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then(ka.cmp(kb)))
                    .map(|(k, c)| (*k, *c))
                    .unwrap_or((bucket_key(DEFAULT_BODY_SIZE, bucket), 0));
                (key as f32 * bucket, false)
            }
        };

        log::debug!(
            "Font profile: body={:.1}pt, {} sized lines, {} buckets{}",
            body_size,
            sized_lines,
            size_histogram.len(),
            if sparse { " (sparse)" } else { "" }
        );

        Self {
            body_size,
            size_histogram,
            bucket,
            sized_lines,
            sparse,
        }
    }

    /// Ratio of a line's font size to the body size; `None` for degraded lines.
    pub fn size_ratio(&self, line: &Line) -> Option<f32> {
        line.font_size.map(|s| self.ratio_of(s))
    }

    /// Ratio of a raw size to the body size.
    pub fn ratio_of(&self, size: f32) -> f32 {
        if self.body_size > 0.0 {
            size / self.body_size
        } else {
            1.0
        }
    }

    /// Round a size to its bucket.
    pub fn bucket_size(&self, size: f32) -> f32 {
        bucket_key(size, self.bucket) as f32 * self.bucket
    }

    /// Whether any line carried font metadata.
    pub fn has_statistics(&self) -> bool {
        self.sized_lines > 0
    }

    /// Histogram as (bucketed size, count), largest size first.
    pub fn histogram(&self) -> Vec<(f32, usize)> {
        let mut entries: Vec<(f32, usize)> = self
            .size_histogram
            .iter()
            .map(|(k, c)| (*k as f32 * self.bucket, *c))
            .collect();
        entries.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        entries
    }
}

fn bucket_key(size: f32, bucket: f32) -> i32 {
    (size / bucket).round() as i32
}
