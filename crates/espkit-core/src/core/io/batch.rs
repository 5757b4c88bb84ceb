use crate::core::models::raw::MoleculeRecord;
use crate::core::models::result::EspResult;
use serde::de::{self, DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchIoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed batch JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Molecule '{id}' appears more than once in the batch")]
    DuplicateMolecule { id: String },
}

/// Ordered `id -> value` entries, rejecting duplicate ids while deserializing.
struct OrderedEntries<V>(Vec<(String, V)>);

impl<'de, V: DeserializeOwned> Deserialize<'de> for OrderedEntries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: DeserializeOwned> Visitor<'de> for EntriesVisitor<V> {
            type Value = OrderedEntries<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object keyed by molecule identifier")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut seen = HashSet::new();
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(id) = map.next_key::<String>()? {
                    if !seen.insert(id.clone()) {
                        return Err(de::Error::custom(format!(
                            "duplicate molecule identifier '{}'",
                            id
                        )));
                    }
                    let value = map.next_value::<V>()?;
                    entries.push((id, value));
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

/// A batch request: molecules keyed by identifier, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchInput {
    entries: Vec<(String, MoleculeRecord)>,
}

impl BatchInput {
    /// Builds a batch from in-memory entries. Identifiers must be unique.
    pub fn from_entries(entries: Vec<(String, MoleculeRecord)>) -> Result<Self, BatchIoError> {
        let mut seen = HashSet::new();
        for (id, _) in &entries {
            if !seen.insert(id.as_str()) {
                return Err(BatchIoError::DuplicateMolecule { id: id.clone() });
            }
        }
        Ok(Self { entries })
    }

    pub fn from_json_str(json: &str) -> Result<Self, BatchIoError> {
        let OrderedEntries(entries) = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    pub fn read_from(reader: impl Read) -> Result<Self, BatchIoError> {
        let OrderedEntries(entries) = serde_json::from_reader(reader)?;
        Ok(Self { entries })
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, BatchIoError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MoleculeRecord)> {
        self.entries.iter().map(|(id, m)| (id.as_str(), m))
    }

    pub fn get(&self, id: &str) -> Option<&MoleculeRecord> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, m)| m)
    }

    pub(crate) fn entries(&self) -> &[(String, MoleculeRecord)] {
        &self.entries
    }
}

/// One molecule's entry in a batched result file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchEntry {
    Combined {
        esp_values: Vec<f64>,
        esp_grid: Vec<[f64; 3]>,
    },
    BrokenUp {
        monopole: Vec<f64>,
        dipole: Vec<f64>,
        quadrupole: Vec<f64>,
        grid: Vec<[f64; 3]>,
    },
}

impl BatchEntry {
    pub fn combined(result: EspResult) -> Self {
        let esp_grid = result.grid.to_nested();
        BatchEntry::Combined {
            esp_values: result.combined,
            esp_grid,
        }
    }

    pub fn broken_up(result: EspResult) -> Self {
        let grid = result.grid.to_nested();
        let (monopole, dipole, quadrupole) = result.into_broken_up();
        BatchEntry::BrokenUp {
            monopole,
            dipole,
            quadrupole,
            grid,
        }
    }

    pub fn grid(&self) -> &[[f64; 3]] {
        match self {
            BatchEntry::Combined { esp_grid, .. } => esp_grid,
            BatchEntry::BrokenUp { grid, .. } => grid,
        }
    }
}

/// Results of a whole batch, keyed by molecule identifier in insertion order.
///
/// The result is assembled completely in memory and only then written out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchResult {
    entries: Vec<(String, BatchEntry)>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, id: impl Into<String>, entry: BatchEntry) -> Result<(), BatchIoError> {
        let id = id.into();
        if self.contains(&id) {
            return Err(BatchIoError::DuplicateMolecule { id });
        }
        self.entries.push((id, entry));
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == id)
    }

    pub fn get(&self, id: &str) -> Option<&BatchEntry> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, e)| e)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn write_to(&self, writer: &mut impl Write) -> Result<(), BatchIoError> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the whole result to `path` and returns the absolute path of the file.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf, BatchIoError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        Ok(std::path::absolute(path)?)
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, BatchIoError> {
        let file = File::open(path)?;
        let OrderedEntries(entries) = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self { entries })
    }
}

impl Serialize for BatchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, entry) in &self.entries {
            map.serialize_entry(id, entry)?;
        }
        map.end()
    }
}

/// `<stem>_esp.json` next to the batch input file.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "batch".to_string());
    input.with_file_name(format!("{}_esp.json", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::grid::Grid;
    use crate::core::models::result::PotentialComponents;
    use crate::core::units::{LengthUnit, PotentialUnit};
    use std::io::Cursor;
    use tempfile::tempdir;

    const BATCH_JSON: &str = r#"{
        "zeta": {"elements": ["He"], "coordinates": [[0.0, 0.0, 0.0]]},
        "alpha": {"elements": ["Ne"], "coordinates": [[1.0, 0.0, 0.0]], "grid": [3.0, 0.0, 0.0]}
    }"#;

    fn result() -> EspResult {
        let mut components = PotentialComponents::default();
        components.push(0.5, 0.25, 0.0);
        EspResult::new(
            components,
            Grid::from_nested(&[[1.0, 2.0, 3.0]], LengthUnit::Angstrom),
            PotentialUnit::HartreePerCharge,
        )
    }

    #[test]
    fn batch_input_preserves_file_order() {
        let input = BatchInput::from_json_str(BATCH_JSON).unwrap();
        assert_eq!(input.ids().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert!(input.get("alpha").unwrap().grid.is_some());
    }

    #[test]
    fn batch_input_rejects_duplicate_ids() {
        let json = r#"{"a": {"elements": [], "coordinates": []}, "a": {"elements": [], "coordinates": []}}"#;
        let err = BatchInput::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("duplicate molecule identifier 'a'"));
    }

    #[test]
    fn from_entries_rejects_duplicate_ids() {
        let record = MoleculeRecord::default();
        let err = BatchInput::from_entries(vec![
            ("m".to_string(), record.clone()),
            ("m".to_string(), record),
        ])
        .unwrap_err();
        assert!(matches!(err, BatchIoError::DuplicateMolecule { id } if id == "m"));
    }

    #[test]
    fn combined_entry_uses_esp_field_names() {
        let value = serde_json::to_value(BatchEntry::combined(result())).unwrap();
        assert_eq!(value["esp_values"], serde_json::json!([0.75]));
        assert_eq!(value["esp_grid"], serde_json::json!([[1.0, 2.0, 3.0]]));
    }

    #[test]
    fn broken_up_entry_uses_component_field_names() {
        let value = serde_json::to_value(BatchEntry::broken_up(result())).unwrap();
        assert_eq!(value["monopole"], serde_json::json!([0.5]));
        assert_eq!(value["dipole"], serde_json::json!([0.25]));
        assert_eq!(value["quadrupole"], serde_json::json!([0.0]));
        assert_eq!(value["grid"], serde_json::json!([[1.0, 2.0, 3.0]]));
    }

    #[test]
    fn batch_result_rejects_second_insert_of_same_id() {
        let mut batch = BatchResult::new();
        batch.insert("mol", BatchEntry::combined(result())).unwrap();
        assert!(batch.insert("mol", BatchEntry::combined(result())).is_err());
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn batch_result_serializes_in_insertion_order() {
        let mut batch = BatchResult::new();
        batch.insert("b", BatchEntry::combined(result())).unwrap();
        batch.insert("a", BatchEntry::broken_up(result())).unwrap();

        let mut buffer = Cursor::new(Vec::new());
        batch.write_to(&mut buffer).unwrap();
        let text = String::from_utf8(buffer.into_inner()).unwrap();
        assert!(text.find("\"b\"").unwrap() < text.find("\"a\"").unwrap());
    }

    #[test]
    fn written_file_reads_back_with_same_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out_esp.json");

        let mut batch = BatchResult::new();
        batch.insert("first", BatchEntry::combined(result())).unwrap();
        batch.insert("second", BatchEntry::broken_up(result())).unwrap();

        let written = batch.write_to_path(&path).unwrap();
        assert!(written.is_absolute());

        let read = BatchResult::read_from_path(&written).unwrap();
        assert_eq!(read, batch);
        assert_eq!(read.ids().collect::<Vec<_>>(), vec!["first", "second"]);
    }

    #[test]
    fn default_output_path_appends_esp_suffix() {
        assert_eq!(
            default_output_path(Path::new("/data/conformers.json")),
            PathBuf::from("/data/conformers_esp.json")
        );
    }
}
