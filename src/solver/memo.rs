//! Memoized entropy tables keyed by game history
//!
//! Two games that reach the same sequence of (guess, reply) pairs under the same
//! word lists and frequency weights face the same decision, so the entropy
//! table for that state is computed once and reused. Keys are SHA-256 digests of
//! a versioned, fixed-width encoding of the history.
//!
//! Entries are immutable once inserted. Parallel workers read a shared store
//! and collect what they compute in a private delta; the orchestrator merges the
//! deltas afterwards.

use super::distribution::FrequencyMap;
use super::evaluator::EntropyTable;
use crate::core::{Reply, Word};
use log::{debug, info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const FINGERPRINT_TAG: &[u8] = b"entropy-wordle/fingerprint/v1";
const HISTORY_TAG: &[u8] = b"entropy-wordle/history/v1";

/// Identity of the word lists and frequency weights a game runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Digest of the guess vocabulary, the initial candidates and every weight
    ///
    /// Word order does not matter; both lists are sorted first.
    #[must_use]
    pub fn new(guesses: &[Word], candidates: &[Word], freq: &FrequencyMap) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(FINGERPRINT_TAG);

        for list in [guesses, candidates] {
            let mut sorted: Vec<&Word> = list.iter().collect();
            sorted.sort();
            sorted.dedup();
            hasher.update((sorted.len() as u64).to_le_bytes());
            for word in sorted {
                hasher.update(word.chars());
                hasher.update(freq.weight(word).to_bits().to_le_bytes());
            }
        }

        Self(hasher.finalize().into())
    }
}

/// The guesses and replies of one game so far, under a fingerprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    fingerprint: Fingerprint,
    steps: Vec<(Word, Reply)>,
}

impl History {
    #[must_use]
    pub const fn new(fingerprint: Fingerprint) -> Self {
        Self {
            fingerprint,
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, guess: Word, reply: Reply) {
        self.steps.push((guess, reply));
    }

    #[must_use]
    pub fn steps(&self) -> &[(Word, Reply)] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Cache key for this history
    #[must_use]
    pub fn key(&self) -> HistoryKey {
        let mut hasher = Sha256::new();
        hasher.update(HISTORY_TAG);
        hasher.update(self.fingerprint.0);
        hasher.update((self.steps.len() as u64).to_le_bytes());
        for (guess, reply) in &self.steps {
            hasher.update(guess.chars());
            hasher.update([reply.value()]);
        }
        HistoryKey(hasher.finalize().into())
    }
}

/// Digest identifying one game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HistoryKey([u8; 32]);

impl HistoryKey {
    /// Shard this key lands in for a store split into `chunks` files
    #[must_use]
    pub fn shard(&self, chunks: usize) -> usize {
        usize::from(self.0[0]) % chunks.max(1)
    }

    /// Parse the 64-digit lowercase hex form written by `Display`
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 64 || !hex.is_ascii() {
            return None;
        }
        let mut bytes = [0u8; 32];
        for (byte, pair) in bytes.iter_mut().zip(hex.as_bytes().chunks(2)) {
            let pair = std::str::from_utf8(pair).ok()?;
            *byte = u8::from_str_radix(pair, 16).ok()?;
        }
        Some(Self(bytes))
    }
}

impl fmt::Display for HistoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Lookup and insert access to memoized entropy tables
pub trait EntropyCache {
    fn lookup(&self, key: &HistoryKey) -> Option<Arc<EntropyTable>>;

    /// Record a freshly computed table; existing entries are never replaced
    fn record(&mut self, key: HistoryKey, table: Arc<EntropyTable>);
}

/// In-memory map from history key to entropy table
#[derive(Debug, Clone, Default)]
pub struct MemoStore {
    entries: FxHashMap<HistoryKey, Arc<EntropyTable>>,
}

impl MemoStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &HistoryKey) -> Option<Arc<EntropyTable>> {
        self.entries.get(key).cloned()
    }

    /// Insert unless the key is present; returns whether the entry was new
    pub fn put(&mut self, key: HistoryKey, table: Arc<EntropyTable>) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, table);
        true
    }

    /// Union `other` into this store; returns the number of new entries
    pub fn merge(&mut self, other: Self) -> usize {
        other
            .entries
            .into_iter()
            .filter(|(key, table)| self.put(*key, Arc::clone(table)))
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HistoryKey, &Arc<EntropyTable>)> {
        self.entries.iter()
    }
}

impl EntropyCache for MemoStore {
    fn lookup(&self, key: &HistoryKey) -> Option<Arc<EntropyTable>> {
        self.get(key)
    }

    fn record(&mut self, key: HistoryKey, table: Arc<EntropyTable>) {
        self.put(key, table);
    }
}

/// A worker's view: read the shared store, write a private delta
#[derive(Debug)]
pub struct WorkerCache<'a> {
    shared: &'a MemoStore,
    delta: MemoStore,
}

impl<'a> WorkerCache<'a> {
    #[must_use]
    pub fn new(shared: &'a MemoStore) -> Self {
        Self {
            shared,
            delta: MemoStore::new(),
        }
    }

    /// Tables this worker computed that the shared store lacked
    #[must_use]
    pub fn into_delta(self) -> MemoStore {
        self.delta
    }
}

impl EntropyCache for WorkerCache<'_> {
    fn lookup(&self, key: &HistoryKey) -> Option<Arc<EntropyTable>> {
        self.delta.get(key).or_else(|| self.shared.get(key))
    }

    fn record(&mut self, key: HistoryKey, table: Arc<EntropyTable>) {
        if self.shared.get(&key).is_none() {
            self.delta.put(key, table);
        }
    }
}

/// Where and how the store is persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub dir: PathBuf,
    /// Number of chunk files; only affects I/O granularity
    pub chunks: usize,
}

impl StoreConfig {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, chunks: usize) -> Self {
        Self {
            dir: dir.into(),
            chunks: chunks.max(1),
        }
    }

    fn chunk_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("chunk_{index}.json"))
    }
}

#[derive(Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    table: EntropyTable,
}

/// A memo store backed by sharded JSON files
///
/// A chunk that cannot be read is skipped on load and never written over, so
/// the tables it holds survive for a later repair.
#[derive(Debug)]
pub struct PersistentStore {
    config: StoreConfig,
    store: MemoStore,
    persisted_len: usize,
    damaged: Vec<usize>,
}

impl PersistentStore {
    /// Load every chunk under `config.dir`
    ///
    /// A missing directory or chunk is simply empty. A chunk that fails to
    /// read or parse is logged and left out; the others still load.
    #[must_use]
    pub fn load(config: StoreConfig) -> Self {
        let (store, damaged) = read_chunks(&config);
        info!("loaded {} memoized tables from {}", store.len(), config.dir.display());
        if !damaged.is_empty() {
            warn!(
                "{} unreadable chunk(s) in {} will not be overwritten: {damaged:?}",
                damaged.len(),
                config.dir.display()
            );
        }
        let persisted_len = store.len();

        Self {
            config,
            store,
            persisted_len,
            damaged,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &MemoStore {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut MemoStore {
        &mut self.store
    }

    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Indices of chunks that failed to load
    #[must_use]
    pub fn damaged_chunks(&self) -> &[usize] {
        &self.damaged
    }

    /// Write the store back if it grew since the last load or save
    ///
    /// Damaged chunks are left untouched; tables that shard into them stay in
    /// memory only. Returns whether anything was written. Failures are logged,
    /// not raised.
    pub fn save(&mut self) -> bool {
        if self.store.len() <= self.persisted_len {
            debug!("memo store unchanged ({} tables); skipping save", self.store.len());
            return false;
        }

        match write_chunks(&self.config, &self.store, &self.damaged) {
            Ok(()) => {
                info!(
                    "memo store updated: {} -> {} tables",
                    self.persisted_len,
                    self.store.len()
                );
                self.persisted_len = self.store.len();
                true
            }
            Err(err) => {
                warn!("could not save memo store to {}: {err}", self.config.dir.display());
                false
            }
        }
    }
}

/// Every readable chunk, plus the indices of the ones that were not
fn read_chunks(config: &StoreConfig) -> (MemoStore, Vec<usize>) {
    let mut store = MemoStore::new();
    let mut damaged = Vec::new();

    for index in 0..config.chunks {
        let path = config.chunk_path(index);
        match read_chunk(&path) {
            Ok(entries) => {
                for (key, table) in entries {
                    store.put(key, table);
                }
            }
            Err(err) => {
                warn!("skipping memo chunk {}: {err}", path.display());
                damaged.push(index);
            }
        }
    }

    (store, damaged)
}

fn read_chunk(path: &Path) -> io::Result<Vec<(HistoryKey, Arc<EntropyTable>)>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };

    let entries: Vec<StoredEntry> = serde_json::from_reader(BufReader::new(file))?;
    entries
        .into_iter()
        .map(|entry| {
            let key = HistoryKey::from_hex(&entry.key).ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidData, format!("bad key {:?}", entry.key))
            })?;
            Ok((key, Arc::new(entry.table)))
        })
        .collect()
}

fn write_chunks(config: &StoreConfig, store: &MemoStore, damaged: &[usize]) -> io::Result<()> {
    fs::create_dir_all(&config.dir)?;

    let mut shards: Vec<Vec<StoredEntry>> = (0..config.chunks).map(|_| Vec::new()).collect();
    for (key, table) in store.iter() {
        shards[key.shard(config.chunks)].push(StoredEntry {
            key: key.to_string(),
            table: EntropyTable::clone(table),
        });
    }

    for (index, mut entries) in shards.into_iter().enumerate() {
        if damaged.contains(&index) {
            continue;
        }
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        let path = config.chunk_path(index);
        write_atomically(&path, &entries)?;
    }

    Ok(())
}

fn write_atomically(path: &Path, entries: &[StoredEntry]) -> io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer(&mut writer, entries)?;
        writer.flush()?;
    }
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::evaluator::TableEntry;

    fn words(list: &[&str]) -> Vec<Word> {
        list.iter().map(|w| Word::new(w).unwrap()).collect()
    }

    fn fingerprint() -> Fingerprint {
        let vocab = words(&["cigar", "grade", "bones"]);
        Fingerprint::new(&vocab, &vocab, &FrequencyMap::uniform(&vocab))
    }

    fn table(word: &str, bits: f64) -> Arc<EntropyTable> {
        Arc::new(EntropyTable::from_entries(vec![TableEntry {
            word: Word::new(word).unwrap(),
            expected_entropy: bits,
            prior: 0.5,
        }]))
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("entropy_wordle_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn fingerprint_ignores_order_but_not_weights() {
        let a = words(&["cigar", "grade", "bones"]);
        let b = words(&["bones", "cigar", "grade"]);
        let uniform = FrequencyMap::uniform(&a);
        assert_eq!(Fingerprint::new(&a, &a, &uniform), Fingerprint::new(&b, &b, &uniform));

        let mut skewed = uniform.clone();
        skewed.insert(a[0].clone(), 3.0);
        assert_ne!(Fingerprint::new(&a, &a, &uniform), Fingerprint::new(&a, &a, &skewed));

        // guess vocabulary and candidate set are distinguished
        assert_ne!(
            Fingerprint::new(&a, &a[..2], &uniform),
            Fingerprint::new(&a[..2], &a, &uniform)
        );
    }

    #[test]
    fn history_key_depends_on_order_and_replies() {
        let fp = fingerprint();
        let cigar = Word::new("cigar").unwrap();
        let grade = Word::new("grade").unwrap();
        let r1 = Reply::parse("00111").unwrap();
        let r2 = Reply::parse("11100").unwrap();

        let mut h1 = History::new(fp);
        h1.push(cigar.clone(), r1);
        h1.push(grade.clone(), r2);

        let mut h2 = History::new(fp);
        h2.push(grade.clone(), r2);
        h2.push(cigar.clone(), r1);

        let mut h3 = History::new(fp);
        h3.push(cigar.clone(), r1);
        h3.push(grade.clone(), r1);

        assert_ne!(h1.key(), h2.key());
        assert_ne!(h1.key(), h3.key());
        assert_eq!(h1.key(), h1.clone().key());
        assert_ne!(History::new(fp).key(), h1.key());
    }

    #[test]
    fn history_key_hex_round_trip() {
        let key = History::new(fingerprint()).key();
        let hex = key.to_string();
        assert_eq!(hex.len(), 64);
        assert_eq!(HistoryKey::from_hex(&hex), Some(key));
        assert_eq!(HistoryKey::from_hex("abc"), None);
        assert_eq!(HistoryKey::from_hex(&"zz".repeat(32)), None);
    }

    #[test]
    fn put_never_overwrites() {
        let mut store = MemoStore::new();
        let key = History::new(fingerprint()).key();
        assert!(store.put(key, table("cigar", 1.0)));
        assert!(!store.put(key, table("bones", 2.0)));
        assert_eq!(store.get(&key).unwrap().entries()[0].word.text(), "cigar");
    }

    #[test]
    fn worker_deltas_merge_as_union() {
        let fp = fingerprint();
        let mut shared = MemoStore::new();
        let base = History::new(fp).key();
        shared.put(base, table("cigar", 1.0));

        let mut h = History::new(fp);
        h.push(Word::new("cigar").unwrap(), Reply::parse("00111").unwrap());
        let next = h.key();

        let (delta_a, delta_b) = {
            let mut a = WorkerCache::new(&shared);
            let mut b = WorkerCache::new(&shared);
            a.record(base, table("bones", 9.0));
            a.record(next, table("grade", 1.5));
            b.record(next, table("grade", 1.5));
            assert!(a.lookup(&next).is_some());
            assert!(b.lookup(&base).is_some());
            (a.into_delta(), b.into_delta())
        };
        assert_eq!(delta_a.len(), 1);

        assert_eq!(shared.merge(delta_a), 1);
        assert_eq!(shared.merge(delta_b), 0);
        assert_eq!(shared.len(), 2);
        assert_eq!(shared.get(&base).unwrap().entries()[0].word.text(), "cigar");
    }

    #[test]
    fn persistent_store_round_trip() {
        let dir = temp_dir("round_trip");
        let config = StoreConfig::new(&dir, 4);
        let fp = fingerprint();

        let mut persistent = PersistentStore::load(config.clone());
        assert!(persistent.store().is_empty());
        assert!(!persistent.save());

        let mut keys = Vec::new();
        for (i, w) in ["cigar", "grade", "bones"].iter().enumerate() {
            let mut h = History::new(fp);
            h.push(Word::new(w).unwrap(), Reply::from_value(u8::try_from(i).unwrap()));
            keys.push(h.key());
            persistent.store_mut().put(h.key(), table(w, i as f64));
        }
        assert!(persistent.save());
        assert!(!persistent.save());

        let reloaded = PersistentStore::load(config);
        assert_eq!(reloaded.store().len(), 3);
        for key in &keys {
            assert_eq!(reloaded.store().get(key), persistent.store().get(key));
        }

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_chunk_is_skipped_and_preserved() {
        let dir = temp_dir("corrupt");
        let config = StoreConfig::new(&dir, 4);
        let fp = fingerprint();
        let vocab = words(&["cigar", "grade", "bones", "sissy", "frass"]);

        let mut original = PersistentStore::load(config.clone());
        for (i, w) in vocab.iter().enumerate() {
            for value in 0..8u8 {
                let mut h = History::new(fp);
                h.push(w.clone(), Reply::from_value(value));
                original.store_mut().put(h.key(), table(w.text(), i as f64));
            }
        }
        assert!(original.save());
        assert_eq!(original.store().len(), 40);

        let bad = dir.join("chunk_0.json");
        fs::write(&bad, "garbage").unwrap();

        let mut loaded = PersistentStore::load(config.clone());
        assert_eq!(loaded.damaged_chunks(), &[0]);
        let in_bad_chunk = original.store().iter().filter(|(k, _)| k.shard(4) == 0).count();
        assert_eq!(loaded.store().len(), 40 - in_bad_chunk);
        for (key, _) in original.store().iter().filter(|(k, _)| k.shard(4) != 0) {
            assert!(loaded.store().get(key).is_some());
        }

        let mut h = History::new(fp);
        h.push(Word::new("llama").unwrap(), Reply::ALL_HIT);
        loaded.store_mut().put(h.key(), table("llama", 0.0));
        assert!(loaded.save());

        // the damaged file is untouched and every other table survives
        assert_eq!(fs::read_to_string(&bad).unwrap(), "garbage");
        let reloaded = PersistentStore::load(config);
        for (key, _) in loaded.store().iter().filter(|(k, _)| k.shard(4) != 0) {
            assert!(reloaded.store().get(key).is_some());
        }
        assert!(reloaded.store().len() >= 40 - in_bad_chunk);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn bad_key_marks_only_its_chunk() {
        let dir = temp_dir("bad_key");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("chunk_1.json"), r#"[{"key":"nothex","table":{"entries":[]}}]"#).unwrap();

        let loaded = PersistentStore::load(StoreConfig::new(&dir, 2));
        assert!(loaded.store().is_empty());
        assert_eq!(loaded.damaged_chunks(), &[1]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_into_a_file_path_fails_quietly() {
        let dir = temp_dir("not_a_dir");
        fs::write(&dir, "a file, not a directory").unwrap();

        let mut persistent = PersistentStore::load(StoreConfig::new(&dir, 2));
        persistent
            .store_mut()
            .put(History::new(fingerprint()).key(), table("cigar", 1.0));
        assert!(!persistent.save());
        assert_eq!(persistent.store().len(), 1);

        let _ = fs::remove_file(&dir);
    }

    #[test]
    fn shard_is_within_chunk_count() {
        let key = History::new(fingerprint()).key();
        for chunks in 1..20 {
            assert!(key.shard(chunks) < chunks);
        }
        assert_eq!(key.shard(0), 0);
    }
}
