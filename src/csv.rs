use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::amount::AmountError;
use crate::model::ItemError;
use crate::{Amount, Command, Item, ItemId};

/// Errors that can occur when reading or writing csv files
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized command type '{command}'")]
    UnrecognizedType { line: usize, command: String },

    #[error("line {line}: {command} missing amount")]
    MissingAmount { line: usize, command: String },

    #[error("line {line}: invalid amount: {source}")]
    InvalidAmount { line: usize, source: AmountError },

    #[error("line {line}: invalid item {item}: {source}")]
    InvalidItem {
        line: usize,
        item: ItemId,
        source: ItemError,
    },

    #[error("failed to write inventory: {0}")]
    Write(#[from] csv::Error),

    #[error("failed to flush inventory: {0}")]
    Flush(#[from] io::Error),
}

#[derive(Debug, Deserialize)]
struct InventoryRow {
    item: ItemId,
    name: String,
    price: f64,
}

#[derive(Debug, Deserialize)]
struct CommandRow {
    r#type: String,
    item: ItemId,
    amount: Option<f64>,
}

#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    item: ItemId,
    name: &'a str,
    price: String,
}

fn open(path: &Path) -> Result<csv::Reader<File>, CsvError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.display().to_string(),
            source,
        })
}

/// Read the items to stock from a csv file with an `item,name,price` header
pub fn read_inventory(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<(ItemId, Item), CsvError>>, CsvError> {
    let reader = open(path.as_ref())?;

    Ok(reader
        .into_deserialize::<InventoryRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            let price = Amount::from_float(row.price)
                .map_err(|source| CsvError::InvalidAmount { line, source })?;
            let item = Item::new(row.name, price).map_err(|source| CsvError::InvalidItem {
                line,
                item: row.item,
                source,
            })?;
            Ok((row.item, item))
        }))
}

/// Read machine commands from a csv file with a `type,item,amount` header
pub fn read_commands(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Command, CsvError>>, CsvError> {
    let reader = open(path.as_ref())?;

    Ok(reader
        .into_deserialize::<CommandRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2;
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            match row.r#type.as_str() {
                "collect" => {
                    let amount = row.amount.ok_or_else(|| CsvError::MissingAmount {
                        line,
                        command: "collect".to_string(),
                    })?;
                    let amount = Amount::from_float(amount)
                        .map_err(|source| CsvError::InvalidAmount { line, source })?;
                    Ok(Command::Collect {
                        item: row.item,
                        amount,
                    })
                }
                "dispense" => Ok(Command::Dispense { item: row.item }),
                "cancel" => Ok(Command::Cancel { item: row.item }),
                other => Err(CsvError::UnrecognizedType {
                    line,
                    command: other.to_string(),
                }),
            }
        }))
}

/// Write the remaining inventory in csv format, sorted by item id
pub fn write_inventory<'a, W: io::Write>(
    writer: W,
    items: impl IntoIterator<Item = (ItemId, &'a Item)>,
) -> Result<(), CsvError> {
    // header written up front so an empty inventory still yields one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(["item", "name", "price"])?;

    let mut items: Vec<_> = items.into_iter().collect();
    items.sort_by_key(|(id, _)| *id);

    for (item, entry) in items {
        let row = OutputRow {
            item,
            name: entry.name(),
            price: entry.price().to_string(),
        };
        writer.serialize(&row)?;
    }

    writer.flush()?;
    Ok(())
}
