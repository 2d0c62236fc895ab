//! Write a synthetic training dataset for offline runs of the CLI.
//!
//! Usage: `synth_dataset <dir> [count]`. Pass `--gzip` to also write the
//! `.gz` archives a download mirror would serve.

use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use digitstrip_test_support::fixtures::{SyntheticDataset, gzip_bytes};

const DEFAULT_COUNT: u32 = 100;

fn main() -> Result<(), Box<dyn Error>> {
    let mut gzip = false;
    let mut positional = Vec::new();
    for arg in env::args().skip(1) {
        if arg == "--gzip" {
            gzip = true;
        } else {
            positional.push(arg);
        }
    }
    let mut positional = positional.into_iter();
    let dir = PathBuf::from(positional.next().ok_or("missing output directory")?);
    let count = match positional.next() {
        Some(raw) => raw.trim().parse::<u32>()?,
        None => DEFAULT_COUNT,
    };

    let dataset = SyntheticDataset::new(count);
    let paths = dataset.write_to(&dir)?;
    if gzip {
        for path in [&paths.labels, &paths.images] {
            let mut archive = path.clone().into_os_string();
            archive.push(".gz");
            fs::write(archive, gzip_bytes(&fs::read(path)?))?;
        }
    }

    println!("labels={}", paths.labels.display());
    println!("images={}", paths.images.display());
    println!("records={count}");
    Ok(())
}
