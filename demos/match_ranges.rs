use std::env;
use std::fs::File;
use std::io::BufReader;

use flate2::read::GzDecoder;
use metmatch::columns::IntervalColumns;
use metmatch::columns::PointColumns;
use metmatch::matcher::machine;
use metmatch::record::IntervalRecord;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let points = env::args().nth(1).expect("missing points table");
    let intervals = env::args().nth(2).expect("missing intervals table");

    let open = |src: String| -> Result<_, std::io::Error> {
        let file = File::open(&src)?;
        let inner: Box<dyn std::io::Read> = if src.ends_with(".gz") {
            Box::new(BufReader::new(GzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        Ok(csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(inner))
    };

    let machine = machine::Builder::default()
        .try_build_from(open(points)?, &PointColumns::default())?;

    let columns = IntervalColumns::default();

    for result in open(intervals)?.records() {
        let record = result?;

        match IntervalRecord::parse(&record, &columns) {
            Ok(interval) => {
                let report = machine.report(&interval);
                println!(
                    "{}:{}-{} -> [{}] ({})",
                    interval.key(),
                    interval.start(),
                    interval.end(),
                    report.rendered_offsets(),
                    report.flag()
                );
            }
            Err(err) => println!("skipping row: {}", err),
        }
    }

    Ok(())
}
