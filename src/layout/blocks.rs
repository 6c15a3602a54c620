//! Paragraph grouping of content lines.

use crate::model::Line;

/// A run of consecutive lines forming one paragraph.
#[derive(Debug, Clone, Copy)]
pub struct TextBlock<'a> {
    /// The lines in this block
    pub lines: &'a [Line],
}

impl<'a> TextBlock<'a> {
    /// Get the combined text of all lines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Page of the first line.
    pub fn page(&self) -> u32 {
        self.lines.first().map(|l| l.page).unwrap_or(0)
    }

    /// Check if the block is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.text.trim().is_empty())
    }
}

/// Group lines into blocks (paragraphs) based on spacing, font and indentation.
pub fn group_lines_into_blocks(lines: &[Line]) -> Vec<TextBlock<'_>> {
    if lines.is_empty() {
        return vec![];
    }

    let avg_spacing = calculate_avg_line_spacing(lines);
    let mut blocks = Vec::new();
    let mut start = 0;

    for i in 1..lines.len() {
        if should_break_block(&lines[i - 1], &lines[i], avg_spacing) {
            blocks.push(TextBlock {
                lines: &lines[start..i],
            });
            start = i;
        }
    }
    blocks.push(TextBlock {
        lines: &lines[start..],
    });

    blocks
}

/// Calculate average line spacing between consecutive lines on the same page.
fn calculate_avg_line_spacing(lines: &[Line]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .filter(|w| w[0].page == w[1].page)
        .map(|w| (w[1].bbox.y - w[0].bbox.y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }

    spacings.iter().sum::<f32>() / spacings.len() as f32
}

/// Determine if a new block should start.
fn should_break_block(prev_line: &Line, curr_line: &Line, avg_spacing: f32) -> bool {
    if prev_line.page != curr_line.page {
        return true;
    }

    // Large spacing indicates new paragraph
    let spacing = (curr_line.bbox.y - prev_line.bbox.y).abs();
    if spacing > avg_spacing * 1.5 {
        return true;
    }

    if let (Some(prev), Some(curr)) = (prev_line.font_size, curr_line.font_size) {
        if (prev - curr).abs() > 1.0 {
            return true;
        }
    }

    // Significant left margin change (indentation)
    (prev_line.bbox.x - curr_line.bbox.x).abs() > 20.0
}
