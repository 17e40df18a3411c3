// File: src/persistence.rs
use crate::core::canvas::Canvas;
use crate::core::dictionary::Dictionary;
use crate::core::script::ScriptVariant;
use crate::error::{Result, TransliterationError};
use image::{ImageOutputFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Bumped whenever the on-disk layout of [`CompiledDictionary`] changes.
pub const FORMAT_VERSION: u32 = 1;

/// A parsed dictionary saved for fast start-up, tagged with the script
/// variant it was parsed for.
#[derive(Clone, Serialize, Deserialize)]
struct CompiledDictionary {
    format_version: u32,
    variant: ScriptVariant,
    dictionary: Dictionary,
}

/// Writes `path` through a temporary file in the same directory, so a
/// crash never leaves a half-written file behind.
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<()>,
{
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        write(&mut writer)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| TransliterationError::Io(e.error))?;
    Ok(())
}

pub fn save_to_disk(dictionary: &Dictionary, variant: ScriptVariant, path: &Path) -> Result<()> {
    let state = CompiledDictionary {
        format_version: FORMAT_VERSION,
        variant,
        dictionary: dictionary.clone(),
    };
    write_atomically(path, |writer| Ok(bincode::serialize_into(writer, &state)?))?;
    log::info!("compiled {} entries to {}", dictionary.len(), path.display());
    Ok(())
}

/// Loads a dictionary saved by [`save_to_disk`] along with its variant.
pub fn load_from_disk(path: &Path) -> Result<(ScriptVariant, Dictionary)> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let state: CompiledDictionary = bincode::deserialize_from(reader)?;
    if state.format_version != FORMAT_VERSION {
        return Err(TransliterationError::CacheVersion {
            found: state.format_version,
            expected: FORMAT_VERSION,
        });
    }
    log::debug!("loaded {} entries from {}", state.dictionary.len(), path.display());
    Ok((state.variant, state.dictionary))
}

/// Encodes a finished page as PNG.
pub fn save_png(canvas: &Canvas, path: &Path) -> Result<()> {
    let image = RgbaImage::from_raw(canvas.width(), canvas.height(), canvas.as_raw().to_vec())
        .ok_or_else(|| {
            TransliterationError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "canvas buffer does not match its dimensions",
            ))
        })?;
    let mut encoded = Cursor::new(Vec::new());
    image.write_to(&mut encoded, ImageOutputFormat::Png)?;
    write_atomically(path, |writer| Ok(writer.write_all(encoded.get_ref())?))?;
    log::info!("wrote {}x{} page to {}", canvas.width(), canvas.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Case, Rgba};
    use tempfile::tempdir;

    #[test]
    fn compiled_dictionary_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dict.bin");
        let dictionary =
            Dictionary::from_entries([("CAT", "k ˈæ t"), ("LEAD%E", "l ˈɛ d")], Case::Upper).unwrap();

        save_to_disk(&dictionary, ScriptVariant::Current, &path).unwrap();
        let (variant, loaded) = load_from_disk(&path).unwrap();
        assert_eq!(variant, ScriptVariant::Current);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.lookup("LEAD%E"), Some("l ˈɛ d"));
        assert_eq!(loaded.case(), Case::Upper);
    }

    #[test]
    fn unknown_format_version_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("old.bin");
        let stale = CompiledDictionary {
            format_version: FORMAT_VERSION + 1,
            variant: ScriptVariant::Legacy,
            dictionary: Dictionary::new(Case::Lower),
        };
        bincode::serialize_into(File::create(&path).unwrap(), &stale).unwrap();

        let err = load_from_disk(&path).err().unwrap();
        assert!(matches!(err, TransliterationError::CacheVersion { found, .. } if found == FORMAT_VERSION + 1));
    }

    #[test]
    fn garbage_cache_is_a_cache_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("junk.bin");
        fs::write(&path, b"\x01").unwrap();
        assert!(matches!(load_from_disk(&path), Err(TransliterationError::Cache(_))));
    }

    #[test]
    fn png_has_the_canvas_dimensions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page.png");
        let mut canvas = Canvas::new(40, 30, Rgba::WHITE);
        canvas.fill_rect(0, 0, 10, 10, Rgba::NAVY);

        save_png(&canvas, &path).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (40, 30));
        assert_eq!(decoded.get_pixel(5, 5).0, Rgba::NAVY.0);
        assert_eq!(decoded.get_pixel(20, 20).0, Rgba::WHITE.0);
    }
}
