//! Jigsaw puzzle outline generator for laser cutting
//!
use anyhow::{Context, Result};
use jigsaw::patterns::{
    draw_separate, draw_single, piece_file_name, Grid, Mode, SINGLE_FILE_NAME,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "jigsaw_gen",
    about = "Generates SVG outlines of interlocking jigsaw puzzle pieces"
)]
struct Opt {
    /// Generate a separate file for each piece
    #[structopt(long)]
    separate: bool,

    /// Number of pieces across
    #[structopt(long, default_value = "8")]
    columns: u32,

    /// Number of pieces down
    #[structopt(long, default_value = "10")]
    rows: u32,

    /// Size of each piece, in pixels. Doesn't matter much, the drawing can be scaled after import.
    #[structopt(long, default_value = "96")]
    dpi: f64,

    /// Stroke color, any SVG color
    #[structopt(long, default_value = "#000000")]
    color: String,

    /// Seed for the knob shapes. Random if not set.
    #[structopt(long)]
    seed: Option<u64>,

    /// Directory to write the SVG files to
    #[structopt(short, long, parse(from_os_str), default_value = ".")]
    output_dir: PathBuf,
}

impl Opt {
    fn mode(&self) -> Mode {
        if self.separate {
            Mode::Separate
        } else {
            Mode::Single
        }
    }
}

/// Render every document into memory. Nothing touches the disk until all the curves are built.
fn render<R: Rng>(grid: &Grid, mode: Mode, rng: &mut R) -> Result<Vec<(String, Vec<u8>)>> {
    match mode {
        Mode::Single => {
            let mut doc = Vec::new();
            draw_single(grid, rng, &mut doc)?;
            Ok(vec![(SINGLE_FILE_NAME.to_string(), doc)])
        }
        Mode::Separate => {
            let mut docs = vec![Vec::new(); grid.cell_count()];
            draw_separate(grid, rng, &mut docs)?;
            Ok(grid.cells().map(piece_file_name).zip(docs).collect())
        }
    }
}

fn write_document(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = BufWriter::new(
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?,
    );
    file.write_all(data)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Render the puzzle and write every document into `output_dir`. Returns the files written.
fn write_puzzle<R: Rng>(
    grid: &Grid,
    mode: Mode,
    rng: &mut R,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let docs = render(grid, mode, rng)?;
    let mut written = Vec::with_capacity(docs.len());
    for (name, data) in &docs {
        let path = output_dir.join(name);
        write_document(&path, data)?;
        written.push(path);
    }
    Ok(written)
}

fn help_text(opt: &Opt, grid: &Grid, files: usize) {
    println!(
        "Wrote {} file(s) to {}:
        - {} x {} pieces, {} knobbed edges
        - Canvas {} x {}",
        files,
        opt.output_dir.display(),
        grid.columns(),
        grid.rows(),
        grid.internal_edge_count(),
        grid.width(),
        grid.height(),
    )
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let grid = Grid::new(opt.columns, opt.rows, opt.dpi, &opt.color)?;
    let mut rng = match opt.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let written = write_puzzle(&grid, opt.mode(), &mut rng, &opt.output_dir)?;

    help_text(&opt, &grid, written.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("jigsaw_gen_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_output_dir_is_an_error() {
        let dir = scratch_dir("missing").join("not_there");
        let grid = Grid::new(2, 2, 96.0, "#000000").unwrap();
        let err = write_puzzle(&grid, Mode::Single, &mut StdRng::seed_from_u64(1), &dir)
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to open"));
        assert!(err.downcast_ref::<std::io::Error>().is_some());
        assert!(!dir.exists());
    }

    #[test]
    fn test_separate_writes_one_file_per_piece() {
        let dir = scratch_dir("separate");
        fs::create_dir_all(&dir).unwrap();
        let grid = Grid::new(3, 2, 96.0, "#000000").unwrap();
        let written =
            write_puzzle(&grid, Mode::Separate, &mut StdRng::seed_from_u64(8), &dir).unwrap();
        assert_eq!(written.len(), 6);
        assert!(dir.join("jigsaw_1_2.svg").exists());
        let data = fs::read_to_string(dir.join("jigsaw_0_0.svg")).unwrap();
        assert_eq!(jigsaw::parse::read_polylines(&data).unwrap().len(), 4);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_single_file_is_truncated_on_rewrite() {
        let dir = scratch_dir("single");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(SINGLE_FILE_NAME);
        fs::write(&path, "x".repeat(1_000_000)).unwrap();
        let grid = Grid::new(1, 1, 96.0, "#000000").unwrap();
        write_puzzle(&grid, Mode::Single, &mut StdRng::seed_from_u64(2), &dir).unwrap();
        let data = fs::read_to_string(&path).unwrap();
        assert!(data.starts_with("<?xml"));
        assert!(data.ends_with("</svg>\n"));
        assert!(data.len() < 1_000_000);
        fs::remove_dir_all(&dir).unwrap();
    }
}
