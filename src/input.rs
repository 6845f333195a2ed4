//! Common routines for handling input data.
use crate::id::{HasID, IDLike};
use crate::units::Dimensionless;
use anyhow::{Context, Result, bail, ensure};
use indexmap::IndexMap;
use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use std::fs;
use std::path::Path;

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Read a series of type `T`s from CSV data into a `Vec<T>`.
///
/// The data must contain at least one row.
pub fn read_csv_from_reader<T: DeserializeOwned, R: std::io::Read>(reader: R) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_reader(reader);
    let vec: Vec<T> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .context("Could not parse CSV data")?;
    ensure!(!vec.is_empty(), "CSV file cannot be empty");

    Ok(vec)
}

/// Read CSV data whose rows each have a unique ID, returning them in file order.
pub fn read_csv_id_file_from_reader<ID, T, R>(reader: R) -> Result<IndexMap<ID, T>>
where
    ID: IDLike,
    T: HasID<ID> + DeserializeOwned,
    R: std::io::Read,
{
    let mut map = IndexMap::new();
    for record in read_csv_from_reader::<T, R>(reader)? {
        let id = record.get_id().clone();
        if map.insert(id.clone(), record).is_some() {
            bail!("Duplicate ID found: {id}");
        }
    }

    Ok(map)
}

/// Read a [`Dimensionless`] value, checking that it is between 0 and 1
pub fn deserialise_proportion<'de, D>(deserialiser: D) -> Result<Dimensionless, D::Error>
where
    D: Deserializer<'de>,
{
    let value: f64 = Deserialize::deserialize(deserialiser)?;
    if !(0.0..=1.0).contains(&value) {
        Err(serde::de::Error::custom("Value is not between 0 and 1"))?;
    }

    Ok(Dimensionless(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{GenericID, define_id_getter};
    use serde::Deserialize;
    use serde::de::IntoDeserializer;
    use serde::de::value::{Error as ValueError, F64Deserializer};
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Record {
        id: GenericID,
        value: u32,
    }

    define_id_getter! {Record, GenericID}

    #[test]
    fn test_read_csv_from_reader() {
        let data = "id,value\nhello,1\nworld,2\n";
        let records: Vec<Record> = read_csv_from_reader(data.as_bytes()).unwrap();
        assert_eq!(
            records,
            [
                Record {
                    id: "hello".into(),
                    value: 1
                },
                Record {
                    id: "world".into(),
                    value: 2
                }
            ]
        );

        // Empty data is an error
        let result: Result<Vec<Record>> = read_csv_from_reader("id,value\n".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn test_read_csv_id_file_from_reader() {
        let data = "id,value\nb,1\na,2\n";
        let map: IndexMap<GenericID, Record> = read_csv_id_file_from_reader(data.as_bytes()).unwrap();
        assert_eq!(map.keys().map(|id| &*id.0).collect::<Vec<_>>(), ["b", "a"]);

        let data = "id,value\na,1\na,2\n";
        let result: Result<IndexMap<GenericID, Record>> =
            read_csv_id_file_from_reader(data.as_bytes());
        assert_eq!(result.unwrap_err().to_string(), "Duplicate ID found: a");
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct TomlData {
        value: u32,
    }

    #[test]
    fn test_read_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("data.toml");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "value = 1").unwrap();
        }

        assert_eq!(
            read_toml::<TomlData>(&file_path).unwrap(),
            TomlData { value: 1 }
        );

        // Missing file
        assert!(read_toml::<TomlData>(&dir.path().join("missing.toml")).is_err());
    }

    fn deserialise_f64(value: f64) -> Result<Dimensionless, ValueError> {
        let deserialiser: F64Deserializer<ValueError> = value.into_deserializer();
        deserialise_proportion(deserialiser)
    }

    #[test]
    fn test_deserialise_proportion() {
        assert_eq!(deserialise_f64(0.0), Ok(Dimensionless(0.0)));
        assert_eq!(deserialise_f64(0.3), Ok(Dimensionless(0.3)));
        assert_eq!(deserialise_f64(1.0), Ok(Dimensionless(1.0)));

        assert!(deserialise_f64(-1.0).is_err());
        assert!(deserialise_f64(1.5).is_err());
        assert!(deserialise_f64(f64::NAN).is_err());
    }
}
