use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const HEADER: [&str; 6] = ["type", "amount", "minimal", "arbitrary", "coin", "quantity"];

pub fn exchange_row(amount: &str, minimal: bool, arbitrary: bool) -> [String; 6] {
    [
        "exchange".to_string(),
        amount.to_string(),
        minimal.to_string(),
        arbitrary.to_string(),
        String::new(),
        String::new(),
    ]
}

pub fn generate_exchanges(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(HEADER)?;

    for i in 0..rows {
        // alternate strategies so both orders get exercised
        wtr.write_record(exchange_row("1", i % 2 == 0, false))?;
    }

    wtr.flush()?;
    Ok(())
}
