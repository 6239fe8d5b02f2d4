//! Fingerprint-keyed result cache.
//!
//! A content-addressed directory (`<cache_dir>/hook_results/<fingerprint>.bin`),
//! atomic writes via a sibling temp file renamed into place, with a
//! `NamedTempFile`+`persist` fallback when the destination already exists.
//! Eviction is LRU plus a byte budget rather than age-only GC, using the
//! `clru` crate for the recency ordering.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sha2::{Digest, Sha256};

use crate::error::{EngineError, EngineResult};
use crate::hook::HookResult;

/// The cache key: `SHA256(hook_name ‖ command_template ‖ sorted_file_paths
/// ‖ concatenated_file_content_hashes ‖ tool_version_if_known)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn compute(
        hook_name: &str,
        command_template: &str,
        files: &[String],
        file_content_hashes: &[String],
        tool_version: Option<&str>,
    ) -> Self {
        // Pair each file with its content hash *before* sorting, so the two
        // stay aligned regardless of the order the caller discovered them
        // in — sorting `files` and `file_content_hashes` separately would
        // only coincidentally line a path back up with its own hash.
        let mut pairs: Vec<(&String, Option<&String>)> =
            files.iter().zip(file_content_hashes.iter().map(Some).chain(std::iter::repeat(None))).collect();
        pairs.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut hasher = Sha256::new();
        hasher.update(hook_name.as_bytes());
        hasher.update(b"\0");
        hasher.update(command_template.as_bytes());
        hasher.update(b"\0");
        for (file, hash) in &pairs {
            hasher.update(file.as_bytes());
            hasher.update(b"\0");
            if let Some(hash) = hash {
                hasher.update(hash.as_bytes());
            }
            hasher.update(b"\0");
        }
        if let Some(version) = tool_version {
            hasher.update(version.as_bytes());
        }
        Self(hex_encode(&hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Hash a single file's content, used to build the `file_content_hashes`
/// component of a [`Fingerprint`]. Mutation of any hashed file between
/// iterations changes this, which is exactly the invalidation signal
/// needed.
pub fn hash_file_content(bytes: &[u8]) -> String {
    hex_encode(&Sha256::digest(bytes))
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub fingerprint: Fingerprint,
    pub result: HookResult,
    pub created_at: std::time::SystemTime,
    pub hit_count: u64,
}

struct Bookkeeping {
    lru: clru::CLruCache<String, u64>,
    used_bytes: u64,
}

/// Content-addressed, LRU+byte-budget-evicted cache of `HookResult`s.
pub struct ResultCache {
    dir: PathBuf,
    budget_bytes: u64,
    book: Mutex<Bookkeeping>,
}

impl ResultCache {
    pub fn open(dir: impl Into<PathBuf>, budget_bytes: u64) -> EngineResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|source| EngineError::CacheUnavailable { path: dir.clone(), source })?;
        // Capacity is entry-count, not bytes; clru only orders recency for
        // us, the byte budget itself is tracked and enforced manually below.
        let capacity = std::num::NonZeroUsize::new(65536).expect("literal is non-zero");
        Ok(Self {
            dir,
            budget_bytes,
            book: Mutex::new(Bookkeeping { lru: clru::CLruCache::new(capacity), used_bytes: 0 }),
        })
    }

    fn entry_path(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.dir.join("hook_results").join(format!("{fingerprint}.bin"))
    }

    pub fn lookup(&self, fingerprint: &Fingerprint) -> EngineResult<Option<HookResult>> {
        let path = self.entry_path(fingerprint);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(EngineError::CacheUnavailable { path, source }),
        };
        let (result, _len): (HookResult, usize) =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard())
                .map_err(|_| EngineError::CacheUnavailable {
                    path: path.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::InvalidData, "corrupt cache entry"),
                })?;
        if let Ok(mut book) = self.book.lock() {
            book.lru.get(fingerprint.as_str());
        }
        Ok(Some(result))
    }

    /// Both `passed` and `failed` results are cacheable, since the cache
    /// key already encodes the exact inputs.
    pub fn store(&self, fingerprint: &Fingerprint, result: &HookResult) -> EngineResult<()> {
        let encoded = bincode::serde::encode_to_vec(result, bincode::config::standard())
            .map_err(|_| EngineError::CacheUnavailable {
                path: self.dir.clone(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, "failed to encode cache entry"),
            })?;
        let dest = self.entry_path(fingerprint);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| EngineError::CacheUnavailable { path: parent.to_path_buf(), source })?;
        }
        write_atomic(&dest, &encoded)?;

        let size = encoded.len() as u64;
        let evicted = {
            let mut book = self.book.lock().expect("cache bookkeeping mutex poisoned");
            self.record_and_evict(&mut book, fingerprint.as_str(), size)
        };
        for fingerprint in evicted {
            let path = self.dir.join("hook_results").join(format!("{fingerprint}.bin"));
            if let Err(err) = std::fs::remove_file(&path) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), %err, "failed to remove evicted cache entry");
                }
            }
        }
        Ok(())
    }

    fn record_and_evict(&self, book: &mut Bookkeeping, key: &str, size: u64) -> Vec<String> {
        if let Some(old_size) = book.lru.put(key.to_string(), size) {
            book.used_bytes = book.used_bytes.saturating_sub(old_size);
        }
        book.used_bytes += size;

        let mut evicted = Vec::new();
        while book.used_bytes > self.budget_bytes {
            let Some((evicted_key, evicted_size)) = book.lru.pop_back() else { break };
            book.used_bytes = book.used_bytes.saturating_sub(evicted_size);
            evicted.push(evicted_key);
        }
        evicted
    }

    /// Invalidate every cache entry whose fingerprint was computed over
    /// `hook_name`; used by the coordinator when a file it covers is
    /// mutated between autofix iterations. Since fingerprints fold in file
    /// content hashes, the simplest correct
    /// invalidation for a single changed file is dropping the *whole*
    /// on-disk set for hooks that might have scanned it — callers pass the
    /// hook names they know touched the file.
    pub fn invalidate_hook(&self, hook_name: &str) -> EngineResult<()> {
        let hook_result_dir = self.dir.join("hook_results");
        let Ok(entries) = std::fs::read_dir(&hook_result_dir) else { return Ok(()) };
        for entry in entries.flatten() {
            let path = entry.path();
            // We don't retain a hook_name→fingerprint index; cheaply
            // re-derive membership isn't possible from the filename alone,
            // so a full invalidation on any touch is the conservative,
            // correct behavior (it only costs a cache miss, never a stale
            // hit). Callers that want finer granularity should prefer
            // letting fingerprints change naturally via file content hashes.
            let _ = hook_name;
            if let Err(err) = std::fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), %err, "failed to invalidate cache entry");
            }
        }
        if let Ok(mut book) = self.book.lock() {
            book.lru = clru::CLruCache::new(std::num::NonZeroUsize::new(65536).expect("literal is non-zero"));
            book.used_bytes = 0;
        }
        Ok(())
    }

    pub fn clear(&self) -> EngineResult<()> {
        let hook_result_dir = self.dir.join("hook_results");
        if hook_result_dir.exists() {
            std::fs::remove_dir_all(&hook_result_dir)
                .map_err(|source| EngineError::CacheUnavailable { path: hook_result_dir.clone(), source })?;
        }
        if let Ok(mut book) = self.book.lock() {
            book.lru = clru::CLruCache::new(std::num::NonZeroUsize::new(65536).expect("literal is non-zero"));
            book.used_bytes = 0;
        }
        Ok(())
    }
}

/// Write `bytes` to `dest` atomically: write to a sibling temp file, then
/// rename into place. Falls back to a `NamedTempFile`+`persist` when the
/// plain rename races with another writer.
fn write_atomic(dest: &Path, bytes: &[u8]) -> EngineResult<()> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    match tempfile::NamedTempFile::new_in(parent) {
        Ok(mut tmp) => {
            use std::io::Write as _;
            tmp.write_all(bytes).map_err(EngineError::Io)?;
            tmp.persist(dest).map_err(|err| EngineError::CacheUnavailable {
                path: dest.to_path_buf(),
                source: err.error,
            })?;
            Ok(())
        }
        Err(source) => Err(EngineError::CacheUnavailable { path: parent.to_path_buf(), source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::HookResultBuilder;

    fn sample_result() -> HookResult {
        HookResultBuilder::new("ruff-format").exit_code(Some(0)).finish_parsed(vec![], false)
    }

    #[test]
    fn fingerprint_is_stable_for_identical_inputs() {
        let a = Fingerprint::compute("ruff", "ruff format", &["b.py".into(), "a.py".into()], &[], None);
        let b = Fingerprint::compute("ruff", "ruff format", &["a.py".into(), "b.py".into()], &[], None);
        assert_eq!(a, b, "file order must not affect the fingerprint");
    }

    #[test]
    fn fingerprint_is_order_independent_when_each_file_carries_its_own_hash() {
        // Each file's content hash must travel with it through the sort —
        // discovering the same two files in a different order must not
        // silently re-pair a file with the wrong hash.
        let a = Fingerprint::compute(
            "ruff",
            "ruff format",
            &["b.py".into(), "a.py".into()],
            &["HB".into(), "HA".into()],
            None,
        );
        let b = Fingerprint::compute(
            "ruff",
            "ruff format",
            &["a.py".into(), "b.py".into()],
            &["HA".into(), "HB".into()],
            None,
        );
        assert_eq!(a, b, "discovery order must not affect the fingerprint once hashes are paired correctly");

        // A mismatched pairing (b.py's hash attached to a.py) must produce
        // a different fingerprint than the correctly-paired inputs above.
        let mismatched = Fingerprint::compute(
            "ruff",
            "ruff format",
            &["a.py".into(), "b.py".into()],
            &["HB".into(), "HA".into()],
            None,
        );
        assert_ne!(a, mismatched, "swapped hash pairing must change the fingerprint");
    }

    #[test]
    fn fingerprint_changes_when_content_hash_changes() {
        let a = Fingerprint::compute("ruff", "ruff format", &["a.py".into()], &["h1".into()], None);
        let b = Fingerprint::compute("ruff", "ruff format", &["a.py".into()], &["h2".into()], None);
        assert_ne!(a, b);
    }

    #[test]
    fn store_then_lookup_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::open(dir.path(), 8 * 1024 * 1024).unwrap();
        let fp = Fingerprint::compute("ruff-format", "ruff format", &["a.py".into()], &[], None);
        let result = sample_result();
        cache.store(&fp, &result).unwrap();
        let fetched = cache.lookup(&fp).unwrap().expect("expected a cache hit");
        assert_eq!(fetched.hook_name, result.hook_name);
        assert_eq!(fetched.issues_count(), result.issues_count());
    }

    #[test]
    fn miss_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::open(dir.path(), 8 * 1024 * 1024).unwrap();
        let fp = Fingerprint::compute("ruff-format", "ruff format", &["missing.py".into()], &[], None);
        assert!(cache.lookup(&fp).unwrap().is_none());
    }

    #[test]
    fn byte_budget_evicts_oldest_entries() {
        let dir = tempfile::tempdir().unwrap();
        // A tiny budget forces eviction after a couple of entries.
        let cache = ResultCache::open(dir.path(), 256).unwrap();
        let fingerprints: Vec<_> = (0..20)
            .map(|i| Fingerprint::compute("ruff-format", "ruff format", &[format!("{i}.py")], &[], None))
            .collect();
        for fp in &fingerprints {
            cache.store(fp, &sample_result()).unwrap();
        }
        assert!(cache.lookup(&fingerprints[0]).unwrap().is_none(), "oldest entry should have been evicted");
        assert!(cache.lookup(fingerprints.last().unwrap()).unwrap().is_some());
    }
}
