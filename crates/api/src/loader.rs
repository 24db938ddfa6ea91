//! Training Dataset Loader
//!
//! Reads the historical flights CSV. Only the scheduled/actual timestamps,
//! airline, flight type and month columns are used; the rest are ignored.

use crate::error::ApiError;
use feature_engine::RawFlightRecord;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct DatasetRow {
    #[serde(rename = "Fecha-I")]
    scheduled: String,
    #[serde(rename = "Fecha-O")]
    actual: String,
    #[serde(rename = "OPERA")]
    airline: String,
    #[serde(rename = "TIPOVUELO")]
    flight_type: String,
    #[serde(rename = "MES")]
    month: u32,
}

impl From<DatasetRow> for RawFlightRecord {
    fn from(row: DatasetRow) -> Self {
        Self {
            scheduled: row.scheduled,
            actual: row.actual,
            airline: row.airline,
            flight_type: row.flight_type,
            month: row.month,
        }
    }
}

/// Read flight records from CSV data with a header row
pub fn read_dataset<R: Read>(reader: R) -> Result<Vec<RawFlightRecord>, ApiError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let records = csv_reader
        .deserialize::<DatasetRow>()
        .map(|row| row.map(RawFlightRecord::from))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Load flight records from a CSV file
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Vec<RawFlightRecord>, ApiError> {
    let path = path.as_ref();
    info!("Loading dataset from {}", path.display());
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    let records = read_dataset(file)?;
    info!("Loaded {} flight records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Fecha-I,Vlo-I,Ori-I,Des-I,Emp-I,Fecha-O,Vlo-O,Ori-O,Des-O,Emp-O,DIA,MES,AÑO,DIANOM,TIPOVUELO,OPERA,SIGLAORI,SIGLADES
2017-01-01 23:30:00,226,SCEL,KMIA,AAL,2017-01-01 23:33:00,226,SCEL,KMIA,AAL,1,1,2017,Domingo,I,American Airlines,Santiago,Miami
2017-07-20 10:00:00,572,SCEL,SCFA,LAN,2017-07-20 10:25:00,572,SCEL,SCFA,LAN,20,7,2017,Jueves,N,Grupo LATAM,Santiago,Antofagasta
";

    #[test]
    fn test_read_dataset_maps_columns() {
        let records = read_dataset(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            RawFlightRecord {
                scheduled: "2017-01-01 23:30:00".to_string(),
                actual: "2017-01-01 23:33:00".to_string(),
                airline: "American Airlines".to_string(),
                flight_type: "I".to_string(),
                month: 1,
            }
        );
        assert_eq!(records[1].airline, "Grupo LATAM");
        assert_eq!(records[1].month, 7);
    }

    #[test]
    fn test_read_dataset_missing_column() {
        let data = "Fecha-I,Fecha-O,OPERA,MES\n2017-01-01 10:00:00,2017-01-01 10:05:00,Copa Air,1\n";
        assert!(matches!(read_dataset(data.as_bytes()), Err(ApiError::Dataset(_))));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_dataset("does/not/exist.csv"),
            Err(ApiError::Dataset(_))
        ));
    }
}
