//! Files written by training and read back later.
//!
//! Every artifact is four magic bytes, a postcard-encoded format version and a
//! postcard payload.

use postcard::{from_bytes, take_from_bytes, to_allocvec};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::BrainError;
use crate::network::{self, Genome};

/// Identifies one artifact format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactKind {
    pub magic: [u8; 4],
    pub name: &'static str,
    pub version: u16,
}

/// The single trained genome kept after evolution
pub const WINNER: ArtifactKind = ArtifactKind {
    magic: *b"NPWN",
    name: "winner",
    version: 2,
};

/// Encode a value as an artifact
pub fn to_bytes<T: Serialize>(kind: &ArtifactKind, value: &T) -> Result<Vec<u8>, BrainError> {
    let mut bytes = kind.magic.to_vec();
    bytes.extend(to_allocvec(&kind.version)?);
    bytes.extend(to_allocvec(value)?);
    Ok(bytes)
}

/// Decode an artifact, checking magic bytes and version before the payload
pub fn from_bytes_as<T: DeserializeOwned>(
    kind: &ArtifactKind,
    bytes: &[u8],
) -> Result<T, BrainError> {
    let rest = bytes
        .strip_prefix(&kind.magic[..])
        .ok_or(BrainError::BadMagic {
            expected: kind.name,
        })?;

    let (version, payload) = take_from_bytes::<u16>(rest)?;
    if version != kind.version {
        return Err(BrainError::Version {
            expected: kind.version,
            found: version,
        });
    }

    Ok(from_bytes(payload)?)
}

/// Write an artifact file, replacing any previous one
pub fn save<T: Serialize, P: AsRef<Path>>(
    kind: &ArtifactKind,
    value: &T,
    path: P,
) -> Result<(), BrainError> {
    let bytes = to_bytes(kind, value)?;
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    log::debug!("wrote {} artifact {} ({} bytes)", kind.name, path.display(), bytes.len());
    Ok(())
}

/// Read an artifact file
pub fn load<T: DeserializeOwned, P: AsRef<Path>>(
    kind: &ArtifactKind,
    path: P,
) -> Result<T, BrainError> {
    let bytes = std::fs::read(path)?;
    from_bytes_as(kind, &bytes)
}

/// Persist the winning genome
pub fn save_winner<P: AsRef<Path>>(genome: &Genome, path: P) -> Result<(), BrainError> {
    save(&WINNER, genome, path)
}

/// Load a winning genome; it is validated so a damaged file fails here, not mid-game
pub fn load_winner<P: AsRef<Path>>(path: P) -> Result<Genome, BrainError> {
    let genome: Genome = load(&WINNER, path)?;
    network::validate(&genome)?;
    Ok(genome)
}
