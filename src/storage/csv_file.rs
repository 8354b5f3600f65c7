use crate::model::{COLUMNS, Dataset, StorageError, TransactionRecord};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Writes the header and one row per record, creating parent directories.
pub fn write_records(path: &Path, records: &[TransactionRecord]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StorageError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_to(file, records)?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

pub fn write_to<W: Write>(writer: W, records: &[TransactionRecord]) -> Result<(), StorageError> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(COLUMNS)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Loads every record of a flat file. Any malformed row fails the whole load.
pub fn read_records(path: &Path) -> Result<Dataset, StorageError> {
    let file = File::open(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_from(file)?;
    debug!("Loaded {} records from {}", dataset.records.len(), path.display());
    Ok(dataset)
}

pub fn read_from<R: Read>(reader: R) -> Result<Dataset, StorageError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Ok(Dataset {
            column_count: 0,
            records: Vec::new(),
        });
    }
    if let Some(missing) = COLUMNS.iter().find(|c| !headers.iter().any(|h| h == **c)) {
        return Err(StorageError::MissingColumn(missing.to_string()));
    }

    let mut records = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let fallback_line = row as u64 + 2;
        let raw = result.map_err(|e| StorageError::Malformed {
            line: e.position().map(|p| p.line()).unwrap_or(fallback_line),
            message: e.to_string(),
        })?;
        let line = raw.position().map(|p| p.line()).unwrap_or(fallback_line);
        let record: TransactionRecord = raw
            .deserialize(Some(&headers))
            .map_err(|e| StorageError::Malformed {
                line,
                message: e.to_string(),
            })?;
        if let Some(column) = record.non_finite_column() {
            return Err(StorageError::Malformed {
                line,
                message: format!("{} is not a finite number", column),
            });
        }
        records.push(record);
    }

    Ok(Dataset {
        column_count: headers.len(),
        records,
    })
}

/// Size of the file on disk in bytes.
pub fn file_size(path: &Path) -> Result<u64, StorageError> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::generator::{build_records, rng_for};
    use crate::model::ReturnStatus;

    const HEADER: &str = "Transaction_ID,Date,Time,Store_Name,Store_ID,Region,Category,Product_Name,Brand,SKU,Quantity,Unit_Price,Subtotal,Discount_Percent,Discount_Amount,Tax_Rate,Tax_Amount,Total_Amount,Cost_Per_Unit,Total_Cost,Profit,Profit_Margin,Payment_Method,Customer_Type,Customer_ID,Sales_Channel,Sales_Rep_ID,Promotion_Code,Shipping_Cost,Return_Status,Customer_Rating,Inventory_Status";

    const ROW: &str = "TXN000001,2022-03-15,10:04:59,Miami Beach,ST004,Southeast,Home & Living,Lamp,Classic Brand D,HOM4821,2,55.5,111.0,10,11.1,0.08,7.99,107.89,38.85,77.7,30.19,27.98,Cash,VIP,CUST4410,Online,REP512,NONE,12.4,No,4,In Stock";

    fn seeded(count: u64) -> Vec<TransactionRecord> {
        let cfg = GeneratorConfig {
            record_count: count,
            seed: Some(77),
            ..GeneratorConfig::default()
        };
        build_records(&cfg, &mut rng_for(&cfg)).unwrap()
    }

    #[test]
    fn header_follows_fixed_column_order() {
        let mut buf = Vec::new();
        write_to(&mut buf, &seeded(1)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().next().unwrap(), HEADER);
    }

    #[test]
    fn file_round_trip_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sales.csv");
        let records = seeded(200);

        write_records(&path, &records).unwrap();
        let dataset = read_records(&path).unwrap();

        assert_eq!(dataset.column_count, 32);
        assert_eq!(dataset.records, records);
        assert!(file_size(&path).unwrap() > 0);
    }

    #[test]
    fn parses_handwritten_row() {
        let data = format!("{}\n{}\n", HEADER, ROW);
        let dataset = read_from(data.as_bytes()).unwrap();
        let r = &dataset.records[0];
        assert_eq!(r.category, "Home & Living");
        assert_eq!(r.quantity, 2);
        assert_eq!(r.discount_percent, 10);
        assert!((r.total_amount - 107.89).abs() < 1e-9);
        assert_eq!(r.return_status, ReturnStatus::No);
        assert_eq!(r.inventory_status, "In Stock");
    }

    #[test]
    fn integer_shipping_cost_is_accepted() {
        let row = ROW.replace(",12.4,No,", ",0,No,");
        let data = format!("{}\n{}\n", HEADER, row);
        let dataset = read_from(data.as_bytes()).unwrap();
        assert_eq!(dataset.records[0].shipping_cost, 0.0);
    }

    #[test]
    fn non_numeric_value_is_attributed_to_its_line() {
        let bad = ROW.replace(",107.89,", ",lots,");
        let data = format!("{}\n{}\n{}\n", HEADER, ROW, bad);
        match read_from(data.as_bytes()) {
            Err(StorageError::Malformed { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn non_finite_amounts_are_rejected() {
        for bad_value in ["NaN", "inf", "-inf"] {
            let bad = ROW.replace(",107.89,", &format!(",{},", bad_value));
            let data = format!("{}\n{}\n{}\n", HEADER, ROW, bad);
            match read_from(data.as_bytes()) {
                Err(StorageError::Malformed { line, message }) => {
                    assert_eq!(line, 3);
                    assert!(message.contains("Total_Amount"), "{}", message);
                }
                other => panic!("unexpected result for {}: {:?}", bad_value, other),
            }
        }
    }

    #[test]
    fn short_row_is_rejected() {
        let data = format!("{}\n{}\nTXN000002,2022-01-01\n", HEADER, ROW);
        assert!(matches!(
            read_from(data.as_bytes()),
            Err(StorageError::Malformed { .. })
        ));
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let header = HEADER.replace(",Profit_Margin", "");
        let row = ROW.replace(",27.98,", ",");
        let data = format!("{}\n{}\n", header, row);
        match read_from(data.as_bytes()) {
            Err(StorageError::MissingColumn(name)) => assert_eq!(name, "Profit_Margin"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn empty_input_yields_no_records() {
        let dataset = read_from("".as_bytes()).unwrap();
        assert!(dataset.records.is_empty());
        let dataset = read_from(format!("{}\n", HEADER).as_bytes()).unwrap();
        assert!(dataset.records.is_empty());
        assert_eq!(dataset.column_count, 32);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_records(Path::new("/nonexistent/sales.csv")).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
