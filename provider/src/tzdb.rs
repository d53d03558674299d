//! Providers backed by the IANA time zone database.
//!
//! [`CompiledTzdbProvider`] uses the TZif data bundled with `jiff-tzdb`, so it
//! works the same on every platform. [`FsTzdbProvider`] reads TZif files from
//! a zoneinfo directory, which is how the system database is laid out on
//! most Unix systems.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::provider::{check_identifier, ProviderResult, RulesProvider};
use crate::tzif::Tzif;
use crate::ProviderError;

/// The system zoneinfo directory on Unix platforms.
pub const UNIX_ZONEINFO_DIR: &str = "/usr/share/zoneinfo/";

const TZIF_MAGIC: &[u8; 4] = b"TZif";

/// A cache of parsed zones, keyed by canonical identifier.
#[derive(Debug, Default)]
struct TzifCache(RwLock<BTreeMap<String, Tzif>>);

impl TzifCache {
    fn get_or_load(
        &self,
        identifier: &str,
        load: impl FnOnce() -> ProviderResult<Tzif>,
    ) -> ProviderResult<Tzif> {
        if let Some(tzif) = self
            .0
            .read()
            .map_err(|_| ProviderError::Assert("poisoned RWLock"))?
            .get(identifier)
        {
            return Ok(tzif.clone());
        }
        let tzif = load()?;
        self.0
            .write()
            .map_err(|_| ProviderError::Assert("poisoned RWLock"))?
            .insert(identifier.to_owned(), tzif.clone());
        Ok(tzif)
    }
}

/// A provider over the TZif data compiled into `jiff-tzdb`.
///
/// Identifiers must match the database spelling exactly, case included.
#[derive(Debug, Default)]
pub struct CompiledTzdbProvider {
    cache: TzifCache,
}

impl CompiledTzdbProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RulesProvider for CompiledTzdbProvider {
    type Rules = Tzif;

    fn resolve(&self, identifier: &str) -> ProviderResult<Tzif> {
        check_identifier(identifier)?;
        let Some((canonical_name, tzif_bytes)) = jiff_tzdb::get(identifier) else {
            return Err(ProviderError::UnknownIdentifier);
        };
        // `jiff_tzdb::get` ignores case.
        if canonical_name != identifier {
            return Err(ProviderError::UnknownIdentifier);
        }
        self.cache
            .get_or_load(canonical_name, || Tzif::from_bytes(tzif_bytes))
    }

    fn source(&self) -> &str {
        "jiff-tzdb"
    }

    fn tz_version(&self) -> Option<&str> {
        jiff_tzdb::VERSION
    }

    fn available_identifiers(&self) -> ProviderResult<Vec<String>> {
        let mut identifiers = jiff_tzdb::available()
            .map(str::to_owned)
            .collect::<Vec<_>>();
        identifiers.sort();
        Ok(identifiers)
    }
}

/// A provider over TZif files in a zoneinfo directory.
#[derive(Debug)]
pub struct FsTzdbProvider {
    path: PathBuf,
    tz_version: Option<String>,
    cache: TzifCache,
}

impl Default for FsTzdbProvider {
    fn default() -> Self {
        Self::new(PathBuf::from(UNIX_ZONEINFO_DIR))
    }
}

impl FsTzdbProvider {
    pub fn new(path: PathBuf) -> Self {
        let tz_version = read_tz_version(&path);
        if tz_version.is_none() {
            log::debug!("no tzdb version found under {}", path.display());
        }
        Self {
            path,
            tz_version,
            cache: TzifCache::default(),
        }
    }
}

impl RulesProvider for FsTzdbProvider {
    type Rules = Tzif;

    fn resolve(&self, identifier: &str) -> ProviderResult<Tzif> {
        check_identifier(identifier)?;
        let path = self.path.join(identifier);
        if !path.is_file() {
            return Err(ProviderError::UnknownIdentifier);
        }
        self.cache
            .get_or_load(identifier, || Tzif::from_path(&path))
    }

    fn source(&self) -> &str {
        "zoneinfo"
    }

    fn tz_version(&self) -> Option<&str> {
        self.tz_version.as_deref()
    }

    fn available_identifiers(&self) -> ProviderResult<Vec<String>> {
        let mut identifiers = Vec::new();
        collect_identifiers(&self.path, "", &mut identifiers)?;
        identifiers.sort();
        Ok(identifiers)
    }
}

/// Reads the database version from `+VERSION`, falling back to the header of `tzdata.zi`.
fn read_tz_version(dir: &Path) -> Option<String> {
    if let Ok(version) = fs::read_to_string(dir.join("+VERSION")) {
        let version = version.trim();
        if !version.is_empty() {
            return Some(version.to_owned());
        }
    }
    let zi = fs::read_to_string(dir.join("tzdata.zi")).ok()?;
    zi.lines()
        .next()?
        .strip_prefix("# version ")
        .map(|v| v.trim().to_owned())
}

fn collect_identifiers(dir: &Path, prefix: &str, out: &mut Vec<String>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let identifier = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        if matches!(identifier.as_str(), "posix" | "right" | "posixrules") {
            continue;
        }
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_identifiers(&entry.path(), &identifier, out)?;
        } else if has_tzif_magic(&entry.path()) {
            out.push(identifier);
        }
    }
    Ok(())
}

fn has_tzif_magic(path: &Path) -> bool {
    let mut magic = [0u8; 4];
    fs::File::open(path)
        .and_then(|mut file| file.read_exact(&mut magic))
        .is_ok_and(|()| &magic == TZIF_MAGIC)
}
