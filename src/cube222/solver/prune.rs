//! Pattern databases for the A* heuristics.
//!
//! A pattern table maps a fingerprint to the fewest moves needed to reach it from solved. Coarse
//! fingerprints (permutation or orientation only) give lower bounds on the true distance, the full
//! fingerprint gives it exactly. Tables are built by a breadth first search over the whole move
//! graph, and can be stored as text files of `fingerprint depth` lines.

use std::collections::hash_map::Entry;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::cube222::fingerprint::{FullFingerprint, OrientationFingerprint, PermutationFingerprint};
use crate::cube222::Cube222;
use crate::error::TableError;
use crate::fingerprint::Fingerprint;

/// Distances from solved, keyed by the fingerprint `F`.
pub struct PatternTable<F: Fingerprint<Cube222>> {
    table: FxHashMap<u64, u8>,
    _phantom: PhantomData<F>,
}

/// Distances of every piece permutation.
pub type PermutationTable = PatternTable<PermutationFingerprint>;
/// Distances of every twist pattern.
pub type OrientationTable = PatternTable<OrientationFingerprint>;
/// Exact distances of every state.
pub type PerfectTable = PatternTable<FullFingerprint>;

impl<F: Fingerprint<Cube222>> PatternTable<F> {
    /// Generate the table
    pub fn generate() -> Self {
        info!("generating {} table", F::name());

        let mut table = FxHashMap::default();
        table.insert(F::from_puzzle(&Cube222::SOLVED).repr(), 0);
        let mut stack = vec![Cube222::SOLVED];
        let mut next = vec![];
        let mut depth = 1;

        while !stack.is_empty() {
            while let Some(cube) = stack.pop() {
                for succ in cube.successors() {
                    if let Entry::Vacant(e) = table.entry(F::from_puzzle(&succ).repr()) {
                        e.insert(depth);
                        next.push(succ);
                    }
                }
            }

            if !next.is_empty() {
                debug!("{} table: {} new at depth {depth}", F::name(), next.len());
            }
            stack = std::mem::take(&mut next);
            depth += 1;
        }

        info!("generated {} table with {} entries", F::name(), table.len());
        Self {
            table,
            _phantom: PhantomData,
        }
    }

    /// The distance of a fingerprint from solved, if it was reached.
    pub fn depth(&self, fingerprint: F) -> Option<u8> {
        self.table.get(&fingerprint.repr()).copied()
    }

    /// The distance of a fingerprint that must be in the table.
    ///
    /// # Panics
    /// If the fingerprint is missing. Every fingerprint reachable with legal moves is in a
    /// complete table, so this means the table or the fingerprint is broken.
    pub fn lookup_fingerprint(&self, fingerprint: F) -> u8 {
        match self.depth(fingerprint) {
            Some(depth) => depth,
            None => panic!(
                "{} fingerprint {} missing from pattern table",
                F::name(),
                fingerprint.repr()
            ),
        }
    }

    /// The distance recorded for a cube's fingerprint. Panics like
    /// [`lookup_fingerprint`](Self::lookup_fingerprint).
    pub fn lookup(&self, cube: &Cube222) -> u8 {
        self.lookup_fingerprint(F::from_puzzle(cube))
    }

    /// The number of fingerprints in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table holds no fingerprints.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The largest distance in the table.
    pub fn max_depth(&self) -> u8 {
        self.table.values().copied().max().unwrap_or(0)
    }

    /// Every fingerprint and its distance, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (F, u8)> + '_ {
        self.table.iter().map(|(&k, &d)| (F::from_repr(k), d))
    }

    /// Write the table to a new file, sorted by fingerprint. An existing file is never replaced.
    pub fn save(&self, path: &Path) -> Result<(), TableError> {
        if self.is_empty() {
            return Err(TableError::Empty(path.to_path_buf()));
        }
        let io_err = |source| TableError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => TableError::AlreadyExists(path.to_path_buf()),
                _ => io_err(e),
            })?;

        let mut entries: Vec<(u64, u8)> = self.table.iter().map(|(&k, &d)| (k, d)).collect();
        entries.sort_unstable();

        let mut writer = BufWriter::new(file);
        for (fingerprint, depth) in entries {
            writeln!(writer, "{fingerprint} {depth}").map_err(io_err)?;
        }
        writer.flush().map_err(io_err)?;

        info!("saved {} table to {}", F::name(), path.display());
        Ok(())
    }

    /// Read a table written by [`save`](Self::save). Blank lines are ignored.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let io_err = |source| TableError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => TableError::NotFound(path.to_path_buf()),
            _ => io_err(e),
        })?;

        let mut table = FxHashMap::default();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(io_err)?;
            let corrupt = || TableError::Corrupt {
                path: path.to_path_buf(),
                line: i + 1,
                content: line.clone(),
            };

            let mut fields = line.split_whitespace();
            let (fingerprint, depth) = match (fields.next(), fields.next(), fields.next()) {
                (None, _, _) => continue,
                (Some(fingerprint), Some(depth), None) => (fingerprint, depth),
                _ => return Err(corrupt()),
            };
            let fingerprint: u64 = fingerprint.parse().map_err(|_| corrupt())?;
            let depth: u8 = depth.parse().map_err(|_| corrupt())?;
            table.insert(fingerprint, depth);
        }

        if table.is_empty() {
            return Err(TableError::Empty(path.to_path_buf()));
        }

        info!(
            "loaded {} table with {} entries from {}",
            F::name(),
            table.len(),
            path.display()
        );
        Ok(Self {
            table,
            _phantom: PhantomData,
        })
    }

    /// Load the table, or if the file does not exist yet, generate it, save it and load the
    /// saved copy.
    pub fn load_or_generate(path: &Path) -> Result<Self, TableError> {
        match Self::load(path) {
            Err(TableError::NotFound(_)) => {
                info!("no {} table at {}", F::name(), path.display());
                Self::generate().save(path)?;
                Self::load(path)
            }
            result => result,
        }
    }
}

/// Where pattern tables are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Directory holding the table files.
    pub directory: PathBuf,
    /// Whether to build the perfect table as well. It holds every state of the cube, so it is
    /// slow to generate and large on disk.
    pub with_perfect: bool,
}

impl TableConfig {
    /// File name of the permutation table.
    pub const PERMUTATION_FILE: &'static str = "permutation_table.txt";
    /// File name of the orientation table.
    pub const ORIENTATION_FILE: &'static str = "orientation_table.txt";
    /// File name of the perfect table.
    pub const PERFECT_FILE: &'static str = "perfect_table.txt";

    /// Tables stored in `directory`.
    pub fn new(directory: impl Into<PathBuf>, with_perfect: bool) -> Self {
        Self {
            directory: directory.into(),
            with_perfect,
        }
    }

    /// Path of the permutation table.
    pub fn permutation_path(&self) -> PathBuf {
        self.directory.join(Self::PERMUTATION_FILE)
    }

    /// Path of the orientation table.
    pub fn orientation_path(&self) -> PathBuf {
        self.directory.join(Self::ORIENTATION_FILE)
    }

    /// Path of the perfect table.
    pub fn perfect_path(&self) -> PathBuf {
        self.directory.join(Self::PERFECT_FILE)
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new(".", false)
    }
}

/// The pattern tables used by the heuristics, built once and shared by reference with every
/// solver.
pub struct HeuristicTables {
    permutation: PermutationTable,
    orientation: OrientationTable,
    perfect: Option<PerfectTable>,
}

impl HeuristicTables {
    /// Generate the tables in memory.
    pub fn generate(with_perfect: bool) -> Self {
        Self {
            permutation: PatternTable::generate(),
            orientation: PatternTable::generate(),
            perfect: with_perfect.then(PatternTable::generate),
        }
    }

    /// Load the tables from disk, generating and saving any that are missing.
    pub fn load_or_generate(config: &TableConfig) -> Result<Self, TableError> {
        let permutation = PatternTable::load_or_generate(&config.permutation_path())?;
        let orientation = PatternTable::load_or_generate(&config.orientation_path())?;
        let perfect = if config.with_perfect {
            Some(PatternTable::load_or_generate(&config.perfect_path())?)
        } else {
            None
        };

        Ok(Self {
            permutation,
            orientation,
            perfect,
        })
    }

    /// The permutation table.
    pub fn permutation(&self) -> &PermutationTable {
        &self.permutation
    }

    /// The orientation table.
    pub fn orientation(&self) -> &OrientationTable {
        &self.orientation
    }

    /// The perfect table, if it was built.
    pub fn perfect(&self) -> Option<&PerfectTable> {
        self.perfect.as_ref()
    }
}

/// Tables shared by every test in the crate. The perfect table takes a while to build, so it is
/// only built once.
#[cfg(test)]
pub(crate) fn shared_tables() -> &'static HeuristicTables {
    use std::sync::OnceLock;

    static TABLES: OnceLock<HeuristicTables> = OnceLock::new();
    TABLES.get_or_init(|| HeuristicTables::generate(true))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cube222::moves::Move222;
    use crate::moves::MoveSequence;

    use proptest::collection::vec;
    use proptest::prelude::*;
    use std::fs;

    /// A path in the temp directory that is unique to this test.
    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("pocket-cube-{}-{name}", std::process::id()));
        let _ = fs::remove_file(&path);
        path
    }

    fn depth_counts<F: Fingerprint<Cube222>>(table: &PatternTable<F>) -> Vec<usize> {
        let mut counts = vec![0; table.max_depth() as usize + 1];
        for (_, d) in table.iter() {
            counts[d as usize] += 1;
        }
        counts
    }

    #[test]
    fn permutation_table() {
        let table = PermutationTable::generate();
        assert_eq!(table.len(), 5040);
        assert_eq!(table.max_depth(), 7);
        assert_eq!(table.lookup(&Cube222::SOLVED), 0);
    }

    #[test]
    fn orientation_table() {
        let table = OrientationTable::generate();
        assert_eq!(table.len(), 729);
        assert_eq!(table.max_depth(), 6);
        assert_eq!(table.lookup(&Cube222::SOLVED), 0);
        // A whole cube rotation.
        assert_eq!(table.lookup(&Cube222::from_moves("U D'").unwrap()), 0);
    }

    #[test]
    fn perfect_table() {
        let table = shared_tables().perfect().unwrap();
        assert_eq!(table.len(), 3_674_160);
        assert_eq!(table.max_depth(), 11);
        assert_eq!(
            depth_counts(table),
            [
                1, 9, 54, 321, 1847, 9992, 50136, 227536, 870072, 1887748, 623800, 2644
            ]
        );

        assert_eq!(table.lookup(&Cube222::SOLVED), 0);
        for neighbour in Cube222::SOLVED.successors() {
            assert_eq!(table.lookup(&neighbour), 1);
        }
        assert_eq!(table.lookup(&Cube222::from_moves("U R2 D' F' L2 B U2").unwrap()), 7);
    }

    #[test]
    fn save_and_load() {
        let path = temp_path("orientation_table.txt");
        let table = OrientationTable::generate();
        table.save(&path).unwrap();

        assert!(matches!(
            table.save(&path),
            Err(TableError::AlreadyExists(p)) if p == path
        ));

        let loaded = OrientationTable::load(&path).unwrap();
        assert_eq!(loaded.len(), table.len());
        for (fingerprint, depth) in table.iter() {
            assert_eq!(loaded.depth(fingerprint), Some(depth));
        }

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().next(), Some("0 0"));
        assert_eq!(text.lines().count(), 729);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn load_errors() {
        let path = temp_path("corrupt_table.txt");
        assert!(matches!(
            PermutationTable::load(&path),
            Err(TableError::NotFound(_))
        ));

        fs::write(&path, "16434824 0\n\n123 1\n5 x\n").unwrap();
        match PermutationTable::load(&path) {
            Err(TableError::Corrupt { line, content, .. }) => {
                assert_eq!(line, 4);
                assert_eq!(content, "5 x");
            }
            _ => panic!("expected a corrupt table"),
        }

        fs::write(&path, "1 2 3\n").unwrap();
        assert!(matches!(
            PermutationTable::load(&path),
            Err(TableError::Corrupt { line: 1, .. })
        ));

        fs::write(&path, "\n\n").unwrap();
        assert!(matches!(
            PermutationTable::load(&path),
            Err(TableError::Empty(_))
        ));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn load_or_generate_once() {
        let dir = temp_path("tables");
        fs::create_dir_all(&dir).unwrap();
        let config = TableConfig::new(&dir, false);
        let _ = fs::remove_file(config.permutation_path());
        let _ = fs::remove_file(config.orientation_path());

        let tables = HeuristicTables::load_or_generate(&config).unwrap();
        assert!(config.permutation_path().exists());
        assert!(config.orientation_path().exists());
        assert!(!config.perfect_path().exists());
        assert!(tables.perfect().is_none());
        assert_eq!(tables.permutation().len(), 5040);

        // The second time round the files are read back instead of regenerated.
        let again = HeuristicTables::load_or_generate(&config).unwrap();
        assert_eq!(again.orientation().len(), 729);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn empty_table_is_not_saved() {
        let path = temp_path("empty_table.txt");
        let table = PerfectTable {
            table: FxHashMap::default(),
            _phantom: PhantomData,
        };
        assert!(matches!(table.save(&path), Err(TableError::Empty(_))));
        assert!(!path.exists());
    }

    #[test]
    #[should_panic(expected = "missing from pattern table")]
    fn missing_fingerprint() {
        let table = PermutationTable::generate();
        table.lookup_fingerprint(PermutationFingerprint::from_repr(0));
    }

    proptest! {
        #[test]
        fn projections_are_lower_bounds(mvs in vec(any::<Move222>(), 0..20).prop_map(MoveSequence)) {
            let tables = shared_tables();
            let mut cube = Cube222::SOLVED;
            cube.make_moves(&mvs);
            let exact = tables.perfect().unwrap().lookup(&cube);
            assert!(exact as usize <= mvs.len());
            assert!(tables.permutation().lookup(&cube) <= exact);
            assert!(tables.orientation().lookup(&cube) <= exact);
        }
    }
}
