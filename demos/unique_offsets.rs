use std::env;
use std::fs::File;
use std::io::BufReader;

use metmatch::columns::RangeColumns;
use metmatch::columns::UniqueColumns;
use metmatch::pipeline;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let source = env::args().nth(1).expect("missing source table");
    let ranges = env::args().nth(2).expect("missing ranges table");

    let open = |src: String| -> Result<_, std::io::Error> {
        let reader = File::open(src).map(BufReader::new)?;

        Ok(csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader))
    };

    let mut writer = csv::Writer::from_writer(std::io::stdout());

    let summary = pipeline::unique_offsets(
        open(source)?,
        open(ranges)?,
        &mut writer,
        &UniqueColumns::default(),
        &RangeColumns::default(),
    )?;

    eprintln!("{}", summary);

    Ok(())
}
