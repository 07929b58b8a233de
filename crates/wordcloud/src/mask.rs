//! Canvas masks read from disk.
//!
//! Two formats are accepted:
//! - PGM, plain (`P2`) or binary (`P5`): black pixels are free, anything
//!   brighter is blocked
//! - a text grid with one line per row: `.` and space are free, any other
//!   character is blocked; short rows are padded with free pixels

use anyhow::{Context, bail};
use camino::Utf8Path;

use wordcloud_core::Mask;

/// Sentinel for free pixels in masks built here.
const FREE: u32 = 0;

/// Read and parse the mask at `path`.
pub fn read(path: &Utf8Path) -> anyhow::Result<Mask> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read mask {path}"))?;
    parse(&bytes).with_context(|| format!("invalid mask {path}"))
}

/// Parse a PGM image or a text grid.
pub fn parse(bytes: &[u8]) -> anyhow::Result<Mask> {
    let pgm = |magic: &[u8]| {
        bytes.starts_with(magic) && bytes.get(2).is_some_and(u8::is_ascii_whitespace)
    };
    if pgm(b"P2") {
        parse_pgm(bytes, false)
    } else if pgm(b"P5") {
        parse_pgm(bytes, true)
    } else {
        let text = std::str::from_utf8(bytes).context("mask is neither PGM nor UTF-8 text")?;
        parse_text(text)
    }
}

fn parse_text(text: &str) -> anyhow::Result<Mask> {
    let mut rows: Vec<&str> = text.lines().collect();
    while rows.last().is_some_and(|row| row.trim().is_empty()) {
        rows.pop();
    }
    let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
    if width == 0 {
        bail!("text mask is empty");
    }

    let mut pixels = Vec::with_capacity(width * rows.len());
    for row in &rows {
        let start = pixels.len();
        pixels.extend(row.chars().map(|c| u32::from(!matches!(c, '.' | ' '))));
        pixels.resize(start + width, FREE);
    }
    let width = u32::try_from(width).context("text mask is too wide")?;
    let height = u32::try_from(rows.len()).context("text mask is too tall")?;
    Ok(Mask::new(width, height, pixels, FREE)?)
}

fn parse_pgm(bytes: &[u8], binary: bool) -> anyhow::Result<Mask> {
    let mut header = Header { bytes, pos: 2 };
    let width = header.number("width")?;
    let height = header.number("height")?;
    let max_value = header.number("maximum value")?;
    if width == 0 || height == 0 {
        bail!("PGM has no pixels ({width}x{height})");
    }
    if max_value == 0 || max_value > u32::from(u16::MAX) {
        bail!("PGM maximum value {max_value} is out of range");
    }
    let count = width as usize * height as usize;

    let pixels = if binary {
        // One whitespace byte separates the header from the raster.
        let raster = bytes.get(header.pos + 1..).unwrap_or_default();
        let sample = if max_value < 256 { 1 } else { 2 };
        let needed = count * sample;
        if raster.len() < needed {
            bail!(
                "PGM raster is truncated: expected {needed} bytes, found {}",
                raster.len()
            );
        }
        let raster = &raster[..needed];
        if sample == 1 {
            raster.iter().map(|&v| u32::from(v)).collect()
        } else {
            raster
                .chunks_exact(2)
                .map(|pair| u32::from(u16::from_be_bytes([pair[0], pair[1]])))
                .collect()
        }
    } else {
        let mut pixels = Vec::with_capacity(count.min(bytes.len()));
        for i in 0..count {
            let value = header.number("pixel")?;
            if value > max_value {
                bail!("PGM pixel {i} is {value}, above the maximum {max_value}");
            }
            pixels.push(value);
        }
        pixels
    };
    Ok(Mask::new(width, height, pixels, FREE)?)
}

/// Cursor over whitespace-separated PGM header fields.
struct Header<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Header<'a> {
    fn token(&mut self) -> Option<&'a [u8]> {
        loop {
            while self.bytes.get(self.pos).is_some_and(u8::is_ascii_whitespace) {
                self.pos += 1;
            }
            if self.bytes.get(self.pos) != Some(&b'#') {
                break;
            }
            while self.bytes.get(self.pos).is_some_and(|&b| b != b'\n') {
                self.pos += 1;
            }
        }
        let bytes = self.bytes;
        let start = self.pos;
        while bytes.get(self.pos).is_some_and(|b| !b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        let end = self.pos;
        (end > start).then(|| &bytes[start..end])
    }

    fn number(&mut self, what: &str) -> anyhow::Result<u32> {
        let token = self
            .token()
            .with_context(|| format!("PGM ends before the {what}"))?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .with_context(|| format!("invalid PGM {what} '{}'", String::from_utf8_lossy(token)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordcloud_core::OccupancyIndex;

    fn blocked(mask: &Mask) -> u32 {
        OccupancyIndex::from_mask(mask).unwrap().occupied_count()
    }

    #[test]
    fn text_grid_marks_non_dot_cells() {
        let mask = parse(b"..##\n.#..\n").unwrap();
        assert_eq!((mask.width(), mask.height()), (4, 2));
        let index = OccupancyIndex::from_mask(&mask).unwrap();
        assert!(index.is_occupied(2, 0));
        assert!(index.is_occupied(1, 1));
        assert!(!index.is_occupied(0, 0));
        assert_eq!(index.occupied_count(), 3);
    }

    #[test]
    fn text_grid_pads_short_rows() {
        let mask = parse(b"xxx\nx\r\n\n\n").unwrap();
        assert_eq!((mask.width(), mask.height()), (3, 2));
        assert_eq!(blocked(&mask), 4);
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(parse(b"\n  \n").is_err());
    }

    #[test]
    fn plain_pgm_black_is_free() {
        let pgm = b"P2\n# heart\n3 2\n255\n0 255 0\n10 0 0\n";
        let mask = parse(pgm).unwrap();
        assert_eq!((mask.width(), mask.height()), (3, 2));
        let index = OccupancyIndex::from_mask(&mask).unwrap();
        assert!(index.is_occupied(1, 0));
        assert!(index.is_occupied(0, 1));
        assert_eq!(index.occupied_count(), 2);
    }

    #[test]
    fn binary_pgm_is_read() {
        let mut pgm = b"P5 2 2 255\n".to_vec();
        pgm.extend([0, 200, 0, 0]);
        let mask = parse(&pgm).unwrap();
        assert_eq!(blocked(&mask), 1);
    }

    #[test]
    fn sixteen_bit_pgm_is_read() {
        let mut pgm = b"P5\n2 1\n65535\n".to_vec();
        pgm.extend([0, 0, 1, 0]);
        let mask = parse(&pgm).unwrap();
        assert_eq!(blocked(&mask), 1);
    }

    #[test]
    fn truncated_pgm_is_rejected() {
        assert!(parse(b"P5 4 4 255\n\x00\x00").is_err());
        assert!(parse(b"P2 2 2 255\n0 0 0").is_err());
        assert!(parse(b"P2 1 1 15\n16").is_err());
        assert!(parse(b"P2 0 1 255\n").is_err());
    }
}
