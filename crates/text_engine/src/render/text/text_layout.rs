//! Text layout engine
//!
//! Pure width, wrapping and height queries over a [`FontResource`]. Nothing
//! here talks to the GPU, so callers can decide what fits before drawing and
//! the results never depend on render side effects.
//!
//! Text is one glyph per byte. An [`ESCAPE`] byte plus the byte after it form
//! a color directive of zero width; an escape at the very end is consumed
//! alone. Tabs have zero width. Bytes of 128 and above have no glyph and fail
//! the whole call with [`FontError::Encoding`](super::FontError::Encoding).

use super::{CodePoint, FontResource, FontResult, ESCAPE};

/// Spacing between baselines of consecutive wrapped lines, in line heights
pub const LINE_SPACING: f64 = 1.5;

/// Where one wrapped line ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBreak {
    /// Bytes that belong to this line
    pub end: usize,
    /// Start of the following line, `None` once the text is consumed
    pub next: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    Glyph(CodePoint),
    Directive,
    Tab,
}

/// Splits validated bytes into glyphs, directives and tabs
pub(crate) struct Tokens<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl Iterator for Tokens<'_> {
    /// Start index and token
    type Item = (usize, Token);

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.pos;
        let byte = *self.bytes.get(start)?;

        let token = match byte {
            ESCAPE => {
                // Marker plus directive, or a lone trailing marker
                self.pos += if start + 1 < self.bytes.len() { 2 } else { 1 };
                return Some((start, Token::Directive));
            }
            b'\t' => Token::Tab,
            _ => Token::Glyph(CodePoint::from_validated(byte)),
        };

        self.pos += 1;
        Some((start, token))
    }
}

/// Pen advance of a single code point as layout sees it
///
/// Tabs and escape markers never move the pen.
pub fn glyph_advance(font: &FontResource, code_point: CodePoint) -> u32 {
    match code_point {
        CodePoint::TAB | CodePoint::ESCAPE => 0,
        _ => font.advance(code_point),
    }
}

/// Longest prefix that fits in `max_pixels`
///
/// Returns the prefix length in bytes and its width. The glyph that would
/// overflow is excluded; directives before it are included.
pub fn fit_width(font: &FontResource, text: &str, max_pixels: u32) -> FontResult<(usize, u32)> {
    let bytes = CodePoint::validate(text)?;
    Ok(fit_bytes(font, bytes, max_pixels))
}

pub(crate) fn fit_bytes(font: &FontResource, bytes: &[u8], max_pixels: u32) -> (usize, u32) {
    let mut width = 0u32;

    for (start, token) in Tokens::new(bytes) {
        if let Token::Glyph(code_point) = token {
            let advance = font.advance(code_point);
            if width + advance > max_pixels {
                return (start, width);
            }
            width += advance;
        }
    }

    (bytes.len(), width)
}

/// Where to break the first line of `text` for a `max_pixels` wide box
///
/// Scans up to the first newline. On overflow the line breaks at the last
/// space seen; a token with no space before the overflow is hard-broken at
/// the overflowing glyph. A line always keeps at least one glyph, so
/// repeated breaking always makes progress.
pub fn wrap_width(font: &FontResource, text: &str, max_pixels: u32) -> FontResult<usize> {
    Ok(break_line(font, text, max_pixels)?.end)
}

/// Like [`wrap_width`] but also reports where the next line starts
pub fn break_line(font: &FontResource, text: &str, max_pixels: u32) -> FontResult<LineBreak> {
    let bytes = CodePoint::validate(text)?;
    Ok(break_bytes(font, bytes, max_pixels))
}

pub(crate) fn break_bytes(font: &FontResource, bytes: &[u8], max_pixels: u32) -> LineBreak {
    let mut width = 0u32;
    let mut last_space = None;
    let mut kept_glyph = false;

    for (start, token) in Tokens::new(bytes) {
        let code_point = match token {
            Token::Glyph(code_point) => code_point,
            Token::Directive | Token::Tab => continue,
        };

        if code_point == CodePoint::NEWLINE {
            return LineBreak {
                end: start,
                next: Some(start + 1),
            };
        }

        width += font.advance(code_point);
        if code_point == CodePoint::SPACE {
            last_space = Some(start);
        }

        if width > max_pixels {
            if let Some(space) = last_space {
                return LineBreak {
                    end: space,
                    next: Some(space + 1),
                };
            }

            // Hard break inside a word too long for the box; a newline
            // right at the break belongs to this line
            let end = if kept_glyph { start } else { start + 1 };
            let next = match bytes.get(end) {
                Some(b'\n') => Some(end + 1),
                Some(_) => Some(end),
                None => None,
            };
            return LineBreak { end, next };
        }

        kept_glyph = true;
    }

    LineBreak {
        end: bytes.len(),
        next: None,
    }
}

/// Height of `text` word-wrapped to `max_width`
///
/// Each line takes `1.5 × line_height`, less the trailing half line after
/// the last one. Empty text is 0.
pub fn block_height(font: &FontResource, text: &str, max_width: u32) -> FontResult<u32> {
    let bytes = CodePoint::validate(text)?;
    Ok(block_height_bytes(font, bytes, max_width))
}

pub(crate) fn block_height_bytes(font: &FontResource, bytes: &[u8], max_width: u32) -> u32 {
    if bytes.is_empty() {
        return 0;
    }

    let mut lines = 0u32;
    let mut pos = 0;
    loop {
        lines += 1;
        match break_bytes(font, &bytes[pos..], max_width).next {
            Some(next) => pos += next,
            None => break,
        }
    }

    let line_height = f64::from(font.line_height());
    let height = f64::from(lines) * LINE_SPACING * line_height - 0.5 * line_height;
    height.max(0.0) as u32
}

/// Fitting prefix of `text` and the x offset that centers it in `box_width`
///
/// The offset is negative when the text is wider than the box.
pub fn center_offset(font: &FontResource, text: &str, box_width: u32) -> FontResult<(usize, f32)> {
    let (count, width) = fit_width(font, text, box_width)?;
    Ok((count, (box_width as f32 - width as f32) / 2.0))
}

/// Width of `text` drawn on one line, ignoring directives and tabs
pub fn measure_width(font: &FontResource, text: &str) -> FontResult<u32> {
    let bytes = CodePoint::validate(text)?;
    Ok(measure_bytes(font, bytes))
}

pub(crate) fn measure_bytes(font: &FontResource, bytes: &[u8]) -> u32 {
    Tokens::new(bytes)
        .filter_map(|(_, token)| match token {
            Token::Glyph(code_point) => Some(font.advance(code_point)),
            Token::Directive | Token::Tab => None,
        })
        .sum()
}
