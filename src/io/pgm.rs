//! Binary PGM (`P5`) encoding and a directory-backed store.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use super::{ImageError, ImageStore};

/// Magic bytes of a binary greyscale PGM file.
pub const PGM_MAGIC: &[u8; 2] = b"P5";

/// Write a P5 image with maxval 255.
pub fn write_pgm<W: Write>(
    w: &mut W,
    width: usize,
    height: usize,
    cells: &[u8],
) -> Result<(), ImageError> {
    let expected = width
        .checked_mul(height)
        .ok_or_else(|| ImageError::InvalidHeader("dimensions out of range".into()))?;
    if cells.len() != expected {
        return Err(ImageError::Truncated {
            expected,
            found: cells.len(),
        });
    }
    w.write_all(PGM_MAGIC)?;
    write!(w, "\n{} {}\n255\n", width, height)?;
    w.write_all(cells)?;
    w.flush()?;
    Ok(())
}

/// Read a P5 image, returning `(width, height, cells)`.
///
/// Header fields may be separated by any whitespace, and `#` starts a comment
/// that runs to the end of the line.
pub fn read_pgm<R: Read>(r: &mut R) -> Result<(usize, usize, Vec<u8>), ImageError> {
    let mut bytes = Vec::new();
    r.read_to_end(&mut bytes)?;

    if bytes.len() < 2 || &bytes[..2] != PGM_MAGIC {
        return Err(ImageError::InvalidHeader("missing P5 magic".into()));
    }

    let mut pos = 2;
    let width = next_header_value(&bytes, &mut pos, "width")?;
    let height = next_header_value(&bytes, &mut pos, "height")?;
    let maxval = next_header_value(&bytes, &mut pos, "maxval")?;
    // Cells are stored as 0 or 255, so no other scale can hold a live cell.
    if maxval != 255 {
        return Err(ImageError::InvalidHeader(format!(
            "unsupported maxval {}",
            maxval
        )));
    }

    // Exactly one whitespace byte separates the header from the raster.
    if pos >= bytes.len() || !bytes[pos].is_ascii_whitespace() {
        return Err(ImageError::InvalidHeader("missing raster separator".into()));
    }
    pos += 1;

    let expected = width
        .checked_mul(height)
        .ok_or_else(|| ImageError::InvalidHeader("dimensions out of range".into()))?;
    let raster = &bytes[pos..];
    if raster.len() < expected {
        return Err(ImageError::Truncated {
            expected,
            found: raster.len(),
        });
    }

    Ok((width, height, raster[..expected].to_vec()))
}

fn next_header_value(bytes: &[u8], pos: &mut usize, field: &str) -> Result<usize, ImageError> {
    loop {
        match bytes.get(*pos) {
            Some(b) if b.is_ascii_whitespace() => *pos += 1,
            Some(b'#') => {
                while let Some(&b) = bytes.get(*pos) {
                    *pos += 1;
                    if b == b'\n' {
                        break;
                    }
                }
            }
            Some(_) => break,
            None => {
                return Err(ImageError::InvalidHeader(format!("missing {}", field)));
            }
        }
    }

    let start = *pos;
    while bytes.get(*pos).is_some_and(u8::is_ascii_digit) {
        *pos += 1;
    }
    if start == *pos {
        return Err(ImageError::InvalidHeader(format!("non-numeric {}", field)));
    }

    std::str::from_utf8(&bytes[start..*pos])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ImageError::InvalidHeader(format!("{} out of range", field)))
}

/// Reads `<input_dir>/<name>.pgm` and writes `<output_dir>/<name>.pgm`.
#[derive(Debug, Clone)]
pub struct PgmStore {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl PgmStore {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(input_dir: P, output_dir: Q) -> Self {
        Self {
            input_dir: input_dir.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn input_path(&self, name: &str) -> PathBuf {
        self.input_dir.join(format!("{}.pgm", name))
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.pgm", name))
    }
}

impl ImageStore for PgmStore {
    fn load(&mut self, name: &str, width: usize, height: usize) -> Result<Vec<u8>, ImageError> {
        let path = self.input_path(name);
        if !path.exists() {
            return Err(ImageError::NotFound(path.display().to_string()));
        }
        let mut reader = BufReader::new(File::open(&path)?);
        let (w, h, cells) = read_pgm(&mut reader)?;
        if (w, h) != (width, height) {
            return Err(ImageError::DimensionMismatch {
                expected: (width, height),
                found: (w, h),
            });
        }
        log::debug!("loaded {}", path.display());
        Ok(cells)
    }

    fn save(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
        cells: &[u8],
    ) -> Result<(), ImageError> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_path(name);
        let mut writer = BufWriter::new(File::create(&path)?);
        write_pgm(&mut writer, width, height, cells)?;
        log::info!("wrote {}", path.display());
        Ok(())
    }
}
