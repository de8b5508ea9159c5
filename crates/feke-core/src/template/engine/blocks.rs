//! Block matching utilities (finding the closing tag of a capture)

use super::tokenize::{TokenKind, TokenStream};

/// Find the `{/capture}` that closes a capture whose body starts at `text`
///
/// Returns (position, length) of the closing tag. Nested captures are
/// skipped over, and tags inside comments are never seen.
pub(crate) fn find_capture_end(text: &str) -> Option<(usize, usize)> {
    let mut depth = 0usize;

    for token in TokenStream::new(text) {
        match token.kind {
            TokenKind::CaptureStart { .. } => depth += 1,
            TokenKind::CaptureEnd => {
                if depth == 0 {
                    return Some((token.start, token.length));
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    None
}
