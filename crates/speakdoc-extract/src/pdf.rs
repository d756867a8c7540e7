//! Line reconstruction for positioned PDF text.
//!
//! A PDF collaborator yields each page as a list of text items with their
//! vertical position. Items on the same line are concatenated as-is; a
//! change in vertical position larger than the threshold starts a new line.

use speakdoc_core::PositionedText;

/// Rebuild the text of one page from its positioned items.
pub fn reconstruct_page_text(items: &[PositionedText], threshold: f32) -> String {
    let mut out = String::new();
    let mut last_y: Option<f32> = None;

    for item in items {
        if last_y.is_some_and(|y| (item.y - y).abs() > threshold) {
            out.push('\n');
        }
        out.push_str(&item.text);
        last_y = Some(item.y);
    }

    out
}

/// Reconstruct and join every page; each page is terminated by `\n`.
pub fn join_pages(pages: &[Vec<PositionedText>], threshold: f32) -> String {
    pages.iter().fold(String::new(), |mut acc, page| {
        acc.push_str(&reconstruct_page_text(page, threshold));
        acc.push('\n');
        acc
    })
}
